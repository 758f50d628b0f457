use std::sync::atomic::{AtomicU64, Ordering};

/// The operation a request was issued for. Sequence numbers are only
/// comparable within one endpoint.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Endpoint {
    Simulate,
    Lifetime,
    GapCheck,
    Chat,
}

impl Endpoint {
    pub fn as_str(self) -> &'static str {
        match self {
            Endpoint::Simulate => "simulate",
            Endpoint::Lifetime => "lifetime",
            Endpoint::GapCheck => "gap-check",
            Endpoint::Chat => "chat",
        }
    }
}

/// A value stamped with the endpoint and sequence number of the request that
/// produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequenced<T> {
    pub endpoint: Endpoint,
    pub seq: u64,
    pub value: T,
}

/// Hands out increasing sequence numbers and drops answers to requests that
/// have since been superseded.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.latest()
    }

    /// Returns the value only if no newer request has been issued since.
    pub fn accept<T>(&self, response: Sequenced<T>) -> Option<T> {
        if self.is_current(response.seq) {
            Some(response.value)
        } else {
            tracing::debug!(
                endpoint = response.endpoint.as_str(),
                seq = response.seq,
                latest = self.latest(),
                "discarding stale response"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_is_monotonic() {
        let seq = RequestSequencer::new();
        let a = seq.issue();
        let b = seq.issue();
        let c = seq.issue();
        assert!(a < b && b < c);
        assert_eq!(seq.latest(), c);
    }

    #[test]
    fn only_latest_response_is_accepted() {
        let seq = RequestSequencer::new();
        let first = seq.issue();
        let second = seq.issue();

        assert_eq!(
            seq.accept(Sequenced {
                endpoint: Endpoint::Simulate,
                seq: first,
                value: "stale"
            }),
            None
        );
        assert_eq!(
            seq.accept(Sequenced {
                endpoint: Endpoint::Simulate,
                seq: second,
                value: "fresh"
            }),
            Some("fresh")
        );
    }
}
