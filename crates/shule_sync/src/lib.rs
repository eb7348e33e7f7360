//! # Shule Sync
//!
//! Sync engine and transport adapter for Shule.
//!
//! This crate provides:
//! - The [`SyncTransport`] boundary: push one entity's state to the remote
//!   system, returning an ack or a typed failure
//! - The [`SyncEngine`]: a stateless orchestrator that drives one sync pass
//!   over every dirty entity with partial-failure isolation
//! - An HTTP transport over a pluggable [`HttpClient`]
//! - A deterministic [`ScriptedTransport`] for tests and a randomized
//!   [`DemoTransport`] for offline simulation
//!
//! ## Key Invariants
//!
//! - A pass is strictly sequential: one transport call in flight at a time,
//!   sites before reports
//! - One entity's failure never aborts sibling syncs; failures become sync
//!   log entries and the entity stays dirty
//! - `sync_all` always returns counts; transport errors cannot escape it
//! - Failed entities are retried only by a later pass, never within one

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod demo;
mod engine;
mod error;
mod http;
mod transport;

pub use demo::DemoTransport;
pub use engine::{KindCounts, SyncEngine, SyncSummary};
pub use error::{SyncError, SyncResult, TransportError};
pub use http::{HttpClient, HttpTransport};
pub use transport::{ScriptedTransport, SyncTransport, UpsertAck, UpsertRequest};
