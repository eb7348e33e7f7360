//! Transport adapter boundary for sync operations.

use crate::error::TransportError;
use serde::Serialize;
use shule_core::{EntityId, EntityKind, SyncEntity};
use std::collections::VecDeque;

/// One entity's state, ready to be pushed to the remote system.
///
/// Ids are assigned on the device, so the remote operation is an idempotent
/// upsert: the transport (or server) decides create-vs-update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertRequest {
    /// Which collection the entity belongs to.
    pub kind: EntityKind,
    /// The entity's device-assigned id.
    pub entity_id: EntityId,
    /// The serialized entity state.
    pub body: serde_json::Value,
}

impl UpsertRequest {
    /// Builds a request from any sync entity.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if the entity cannot be serialized.
    pub fn for_entity<E: SyncEntity + Serialize>(entity: &E) -> Result<Self, TransportError> {
        let body = serde_json::to_value(entity)
            .map_err(|err| TransportError::Protocol(err.to_string()))?;
        Ok(Self {
            kind: E::KIND,
            entity_id: entity.id(),
            body,
        })
    }
}

/// Acknowledgement of a successful upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertAck {
    /// The id the server confirmed.
    pub entity_id: EntityId,
}

/// A sync transport pushes one entity's current state to the remote system.
///
/// Contract:
/// - Must not mutate local state
/// - Must resolve within a bounded time with either an ack or a typed
///   failure; it never panics its way out
/// - Performs no retries of its own - retry policy belongs to whoever
///   schedules sync passes
pub trait SyncTransport: Send + Sync {
    /// Attempts to upsert one entity remotely.
    fn upsert(&self, request: &UpsertRequest) -> Result<UpsertAck, TransportError>;
}

/// A deterministic transport fake driven by a scripted outcome sequence.
///
/// Each upsert consumes the next scripted outcome; once the script is
/// exhausted, the default outcome applies. Every request is recorded for
/// assertion.
///
/// # Example
///
/// ```rust
/// use shule_sync::{ScriptedTransport, TransportError};
///
/// let transport = ScriptedTransport::always_succeeds();
/// transport.enqueue_err(TransportError::unreachable("simulated"));
/// // First upsert fails, every later one succeeds.
/// ```
#[derive(Debug)]
pub struct ScriptedTransport {
    script: parking_lot::Mutex<VecDeque<Result<(), TransportError>>>,
    default: Result<(), TransportError>,
    requests: parking_lot::Mutex<Vec<UpsertRequest>>,
}

impl ScriptedTransport {
    /// Creates a transport whose default outcome is success.
    #[must_use]
    pub fn always_succeeds() -> Self {
        Self {
            script: parking_lot::Mutex::new(VecDeque::new()),
            default: Ok(()),
            requests: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Creates a transport whose default outcome is the given failure.
    #[must_use]
    pub fn always_fails(error: TransportError) -> Self {
        Self {
            script: parking_lot::Mutex::new(VecDeque::new()),
            default: Err(error),
            requests: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Queues one outcome ahead of the default.
    pub fn enqueue(&self, outcome: Result<(), TransportError>) {
        self.script.lock().push_back(outcome);
    }

    /// Queues one successful outcome.
    pub fn enqueue_ok(&self) {
        self.enqueue(Ok(()));
    }

    /// Queues one failed outcome.
    pub fn enqueue_err(&self, error: TransportError) {
        self.enqueue(Err(error));
    }

    /// Returns every request seen so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<UpsertRequest> {
        self.requests.lock().clone()
    }
}

impl SyncTransport for ScriptedTransport {
    fn upsert(&self, request: &UpsertRequest) -> Result<UpsertAck, TransportError> {
        self.requests.lock().push(request.clone());

        let outcome = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.default.clone());

        outcome.map(|()| UpsertAck {
            entity_id: request.entity_id,
        })
    }
}
