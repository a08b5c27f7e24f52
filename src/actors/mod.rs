mod chat_actor;
#[cfg(test)]
mod tests;

pub use chat_actor::ChatActor;
