//! Randomized demo transport for offline simulation.

use crate::error::TransportError;
use crate::transport::{SyncTransport, UpsertAck, UpsertRequest};
use rand::Rng;
use std::time::Duration;

/// A transport that simulates an unreliable field network.
///
/// Each upsert sleeps for a random delay in the configured window, then
/// fails with the configured probability. This mirrors the conditions the
/// sync engine is built for and powers the CLI's `sync` command; tests use
/// [`super::ScriptedTransport`] instead, which is deterministic.
#[derive(Debug, Clone)]
pub struct DemoTransport {
    failure_rate: f64,
    min_delay: Duration,
    max_delay: Duration,
}

impl DemoTransport {
    /// Creates a demo transport with the given failure probability
    /// (clamped to `0.0..=1.0`).
    #[must_use]
    pub fn new(failure_rate: f64) -> Self {
        Self {
            failure_rate: failure_rate.clamp(0.0, 1.0),
            min_delay: Duration::from_millis(500),
            max_delay: Duration::from_millis(1500),
        }
    }

    /// Overrides the simulated latency window.
    #[must_use]
    pub fn with_delay(mut self, min: Duration, max: Duration) -> Self {
        self.min_delay = min;
        self.max_delay = max.max(min);
        self
    }
}

impl Default for DemoTransport {
    /// The historical simulation profile: 500-1500 ms latency, 10% failures.
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl SyncTransport for DemoTransport {
    fn upsert(&self, request: &UpsertRequest) -> Result<UpsertAck, TransportError> {
        let mut rng = rand::thread_rng();

        let delay = if self.max_delay > self.min_delay {
            rng.gen_range(self.min_delay..=self.max_delay)
        } else {
            self.min_delay
        };
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }

        if rng.gen_bool(self.failure_rate) {
            return Err(TransportError::unreachable("simulated network failure"));
        }

        Ok(UpsertAck {
            entity_id: request.entity_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shule_core::Site;

    fn instant(failure_rate: f64) -> DemoTransport {
        DemoTransport::new(failure_rate).with_delay(Duration::ZERO, Duration::ZERO)
    }

    #[test]
    fn zero_failure_rate_always_acks() {
        let transport = instant(0.0);
        let request = UpsertRequest::for_entity(&Site::new("Lucky", "Demo")).unwrap();

        for _ in 0..20 {
            assert!(transport.upsert(&request).is_ok());
        }
    }

    #[test]
    fn full_failure_rate_never_acks() {
        let transport = instant(1.0);
        let request = UpsertRequest::for_entity(&Site::new("Unlucky", "Demo")).unwrap();

        for _ in 0..20 {
            assert!(transport.upsert(&request).is_err());
        }
    }

    #[test]
    fn failure_rate_is_clamped() {
        let transport = instant(7.5);
        let request = UpsertRequest::for_entity(&Site::new("Clamped", "Demo")).unwrap();
        assert!(transport.upsert(&request).is_err());
    }
}
