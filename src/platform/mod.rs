//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, JSON files on native)
//! - Frame scheduling tokens for the display-refresh loop

pub mod frame;
pub mod storage;

pub use frame::{FrameLoop, FrameToken};
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
