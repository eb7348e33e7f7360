//! # Shule Persist
//!
//! Snapshot persistence backends for the Shule survey store.
//!
//! This crate provides the lowest-level persistence abstraction for Shule.
//! Backends are **opaque snapshot stores** - they hold one blob of bytes
//! and do not interpret it.
//!
//! ## Design Principles
//!
//! - The contract is "save after every mutating call, restore at startup"
//! - Backends never see entity structure; the store owns the format
//! - A save either replaces the previous snapshot entirely or leaves it
//!   intact (no torn snapshots)
//! - Must be `Send + Sync` so the store can be shared across threads
//!
//! ## Available Backends
//!
//! - [`MemoryBackend`] - For testing and ephemeral stores
//! - [`FileBackend`] - For persistent storage using atomic file replacement
//!
//! ## Example
//!
//! ```rust
//! use shule_persist::{MemoryBackend, SnapshotBackend};
//!
//! let backend = MemoryBackend::new();
//! backend.save(b"{\"sites\":[]}").unwrap();
//! let restored = backend.load().unwrap();
//! assert_eq!(restored.as_deref(), Some(&b"{\"sites\":[]}"[..]));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::SnapshotBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::MemoryBackend;
