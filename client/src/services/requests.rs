//! Sequencing of in-flight account service requests
//!
//! Responses are not guaranteed to arrive in the order requests were issued.
//! Each request is tagged with a sequence number when it is issued and its
//! response is applied only if no newer request of the same kind has been
//! issued since. Closing the tracker discards every later response.

use std::collections::{HashMap, HashSet};

/// Kinds of requests that are sequenced independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    UsernameCheck,
    Verification,
    RestaurantSearch,
    Signup,
}

/// Handle identifying one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    kind: RequestKind,
    seq: u64,
}

impl Ticket {
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Result of feeding a response back to the workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<T> {
    /// The response was current and changed the workflow state
    Applied(T),
    /// A newer request superseded this one, or the workflow was closed
    Discarded,
}

impl<T> Completion<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Completion::Applied(value) => Some(value),
            Completion::Discarded => None,
        }
    }

    pub fn is_discarded(&self) -> bool {
        matches!(self, Completion::Discarded)
    }
}

#[derive(Debug, Default)]
pub struct RequestTracker {
    next_seq: u64,
    latest: HashMap<RequestKind, u64>,
    pending: HashSet<RequestKind>,
    closed: bool,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new request of `kind`, superseding any in flight
    pub fn issue(&mut self, kind: RequestKind) -> Ticket {
        self.next_seq += 1;
        self.latest.insert(kind, self.next_seq);
        self.pending.insert(kind);
        Ticket {
            kind,
            seq: self.next_seq,
        }
    }

    /// Make every in-flight request of `kind` stale without issuing a new one
    pub fn invalidate(&mut self, kind: RequestKind) {
        if self.pending.remove(&kind) {
            self.next_seq += 1;
            self.latest.insert(kind, self.next_seq);
        }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        !self.closed && self.latest.get(&ticket.kind) == Some(&ticket.seq)
    }

    /// Mark `ticket` as answered. Returns whether its response should be applied.
    pub fn settle(&mut self, ticket: &Ticket) -> bool {
        let current = self.is_current(ticket);
        if current {
            self.pending.remove(&ticket.kind);
        }
        current
    }

    /// Whether a current request of `kind` is still waiting for its response
    pub fn is_pending(&self, kind: RequestKind) -> bool {
        !self.closed && self.pending.contains(&kind)
    }

    pub fn close(&mut self) {
        self.closed = true;
        self.pending.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_wins() {
        let mut tracker = RequestTracker::new();
        let first = tracker.issue(RequestKind::UsernameCheck);
        let second = tracker.issue(RequestKind::UsernameCheck);

        assert!(second.seq() > first.seq());
        assert!(tracker.settle(&second));
        assert!(!tracker.settle(&first));
        assert!(!tracker.is_pending(RequestKind::UsernameCheck));
    }

    #[test]
    fn test_out_of_order_arrival() {
        let mut tracker = RequestTracker::new();
        let first = tracker.issue(RequestKind::RestaurantSearch);
        let second = tracker.issue(RequestKind::RestaurantSearch);

        // The older response arrives first and must not be applied
        assert!(!tracker.settle(&first));
        assert!(tracker.is_pending(RequestKind::RestaurantSearch));
        assert!(tracker.settle(&second));
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut tracker = RequestTracker::new();
        let check = tracker.issue(RequestKind::UsernameCheck);
        let _search = tracker.issue(RequestKind::RestaurantSearch);
        assert!(tracker.settle(&check));
    }

    #[test]
    fn test_invalidate_pending() {
        let mut tracker = RequestTracker::new();
        let check = tracker.issue(RequestKind::UsernameCheck);
        tracker.invalidate(RequestKind::UsernameCheck);

        assert!(!tracker.is_pending(RequestKind::UsernameCheck));
        assert!(!tracker.settle(&check));
    }

    #[test]
    fn test_invalidate_without_pending_is_noop() {
        let mut tracker = RequestTracker::new();
        let check = tracker.issue(RequestKind::UsernameCheck);
        assert!(tracker.settle(&check));

        tracker.invalidate(RequestKind::UsernameCheck);
        let next = tracker.issue(RequestKind::UsernameCheck);
        assert_eq!(next.seq(), check.seq() + 1);
    }

    #[test]
    fn test_closed_tracker_discards_everything() {
        let mut tracker = RequestTracker::new();
        let signup = tracker.issue(RequestKind::Signup);
        tracker.close();

        assert!(tracker.is_closed());
        assert!(!tracker.is_pending(RequestKind::Signup));
        assert!(!tracker.settle(&signup));
    }

    #[test]
    fn test_completion_helpers() {
        assert_eq!(Completion::Applied(3).applied(), Some(3));
        assert!(Completion::<u8>::Discarded.is_discarded());
    }
}
