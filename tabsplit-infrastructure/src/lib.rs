#![warn(clippy::uninlined_format_args)]

mod json_store;
mod memory_store;
mod records;

pub use json_store::JsonFileStore;
pub use memory_store::MemoryStore;
