mod action;
mod controller;
mod errors;
mod render;
mod session;

pub use controller::DialogController;
pub use session::Session;
