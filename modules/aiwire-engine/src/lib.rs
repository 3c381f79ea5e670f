pub mod arxiv;
pub mod classify;
pub mod feeds;
pub mod persist;
pub mod scheduler;
pub mod sources;
pub mod sync;
pub mod traits;
