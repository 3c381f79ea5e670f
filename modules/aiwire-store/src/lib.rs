pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::{migrate, PgStore};
pub use store::ContentStore;
