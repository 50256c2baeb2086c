//! Exactly-once settlement of a pending result.

/// Tri-state guard ensuring one call settles exactly once.
///
/// A streaming generate call has two competing terminal paths: the finishing
/// chunk resolves it, and a transport or decode failure rejects it. Both
/// paths go through this guard; whichever settles first wins and every later
/// attempt is a no-op. The state never moves out of `Resolved` or
/// `Rejected`.
#[derive(Debug)]
pub enum Settlement<T, E> {
    /// No terminal signal yet.
    Pending,
    /// Settled with a success value.
    Resolved(T),
    /// Settled with an error.
    Rejected(E),
}

impl<T, E> Settlement<T, E> {
    /// Create a pending settlement.
    pub fn new() -> Self {
        Settlement::Pending
    }

    /// True when no terminal signal has been recorded.
    pub fn is_pending(&self) -> bool {
        matches!(self, Settlement::Pending)
    }

    /// Record a success. Returns `false` (dropping `value`) when already
    /// settled.
    pub fn resolve(&mut self, value: T) -> bool {
        if self.is_pending() {
            *self = Settlement::Resolved(value);
            true
        } else {
            false
        }
    }

    /// Record an error. Returns `false` (dropping `error`) when already
    /// settled.
    pub fn reject(&mut self, error: E) -> bool {
        if self.is_pending() {
            *self = Settlement::Rejected(error);
            true
        } else {
            false
        }
    }

    /// The settled value, or `None` when still pending.
    pub fn into_outcome(self) -> Option<Result<T, E>> {
        match self {
            Settlement::Pending => None,
            Settlement::Resolved(value) => Some(Ok(value)),
            Settlement::Rejected(error) => Some(Err(error)),
        }
    }
}

impl<T, E> Default for Settlement<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_then_reject_keeps_the_resolution() {
        let mut settlement: Settlement<u32, &str> = Settlement::new();
        assert!(settlement.resolve(7));
        assert!(!settlement.reject("too late"));
        assert_eq!(settlement.into_outcome(), Some(Ok(7)));
    }

    #[test]
    fn reject_then_resolve_keeps_the_rejection() {
        let mut settlement: Settlement<u32, &str> = Settlement::new();
        assert!(settlement.reject("boom"));
        assert!(!settlement.resolve(7));
        assert_eq!(settlement.into_outcome(), Some(Err("boom")));
    }

    #[test]
    fn double_resolve_is_a_no_op() {
        let mut settlement: Settlement<u32, &str> = Settlement::new();
        assert!(settlement.resolve(1));
        assert!(!settlement.resolve(2));
        assert_eq!(settlement.into_outcome(), Some(Ok(1)));
    }

    #[test]
    fn pending_yields_no_outcome() {
        let settlement: Settlement<u32, &str> = Settlement::new();
        assert!(settlement.is_pending());
        assert_eq!(settlement.into_outcome(), None);
    }
}
