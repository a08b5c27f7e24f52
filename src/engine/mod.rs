mod dispatcher;
#[cfg(test)]
mod tests;

pub use dispatcher::{Dispatcher, DEFAULT_ACTOR_CAPACITY, DEFAULT_IDLE_TIMEOUT};
