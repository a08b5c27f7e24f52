mod engine;
mod errors;
mod parser;

pub use engine::{ingest_file, IngestMode};
