//! Engine implementations of the storage ports.

pub mod file;
pub mod memory;
pub mod sqlite;

pub use file::FileEngine;
pub use memory::MemoryEngine;
pub use sqlite::SqliteEngine;
