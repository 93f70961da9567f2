//! Storage adapters for front ends that run outside a browser (CLI, tests).

#[cfg(feature = "file-store")]
mod file_session_store;

#[cfg(feature = "file-store")]
pub use file_session_store::FileSessionStore;
