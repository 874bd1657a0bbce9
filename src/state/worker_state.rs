/// Genre worker state definitions
///
/// A worker walks `Created → Fetching(k) → Extracting(k)`, then either moves
/// on to the next page, stops early at `LimitReached`, or finishes at `Done`
/// once every page has been consumed.
use std::fmt;

/// Represents the current state of a genre worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerState {
    /// Worker exists but has not issued any request yet
    Created,

    /// Waiting on the response for a page (0-based index)
    Fetching { page: usize },

    /// Extracting and writing titles from a fetched page
    Extracting { page: usize },

    /// The per-genre limit was hit; no further pages are requested
    LimitReached,

    // ===== Terminal States =====
    /// Output file flushed, worker finished
    Done,

    /// Worker hit an unrecoverable error
    Aborted,
}

impl WorkerState {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Checks whether moving from `self` to `next` is a legal transition
    ///
    /// Pages must advance one at a time: `Extracting { page: k }` may only be
    /// followed by `Fetching { page: k + 1 }`.
    pub fn can_transition_to(&self, next: WorkerState) -> bool {
        use WorkerState::*;

        match (*self, next) {
            (Created, Fetching { page: 0 }) => true,
            // Zero pages to fetch
            (Created, Done) => true,
            (Fetching { page: a }, Extracting { page: b }) => a == b,
            (Extracting { page: a }, Fetching { page: b }) => b == a + 1,
            (Extracting { .. }, LimitReached) => true,
            // Ran out of pages before the limit
            (Extracting { .. }, Done) => true,
            (LimitReached, Done) => true,
            (Fetching { .. } | Extracting { .. }, Aborted) => true,
            _ => false,
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Fetching { page } => write!(f, "fetching(page={})", page),
            Self::Extracting { page } => write!(f, "extracting(page={})", page),
            Self::LimitReached => write!(f, "limit_reached"),
            Self::Done => write!(f, "done"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use WorkerState::*;

    #[test]
    fn test_is_terminal() {
        assert!(Done.is_terminal());
        assert!(Aborted.is_terminal());

        assert!(!Created.is_terminal());
        assert!(!Fetching { page: 3 }.is_terminal());
        assert!(!Extracting { page: 3 }.is_terminal());
        assert!(!LimitReached.is_terminal());
    }

    #[test]
    fn test_happy_path_transitions() {
        let path = [
            Created,
            Fetching { page: 0 },
            Extracting { page: 0 },
            Fetching { page: 1 },
            Extracting { page: 1 },
            LimitReached,
            Done,
        ];

        for pair in path.windows(2) {
            assert!(
                pair[0].can_transition_to(pair[1]),
                "{} -> {} should be allowed",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_pages_exhausted_and_empty_crawl() {
        assert!(Extracting { page: 9 }.can_transition_to(Done));
        assert!(Created.can_transition_to(Done));
    }

    #[test]
    fn test_pages_cannot_skip_or_repeat() {
        assert!(!Created.can_transition_to(Fetching { page: 1 }));
        assert!(!Extracting { page: 0 }.can_transition_to(Fetching { page: 2 }));
        assert!(!Extracting { page: 1 }.can_transition_to(Fetching { page: 1 }));
        assert!(!Fetching { page: 1 }.can_transition_to(Extracting { page: 0 }));
        assert!(!Fetching { page: 0 }.can_transition_to(Fetching { page: 1 }));
    }

    #[test]
    fn test_abort_only_from_in_flight_states() {
        assert!(Fetching { page: 4 }.can_transition_to(Aborted));
        assert!(Extracting { page: 4 }.can_transition_to(Aborted));

        assert!(!Created.can_transition_to(Aborted));
        assert!(!Done.can_transition_to(Aborted));
        assert!(!LimitReached.can_transition_to(Aborted));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for next in [Created, Fetching { page: 0 }, LimitReached, Done, Aborted] {
            assert!(!Done.can_transition_to(next));
            assert!(!Aborted.can_transition_to(next));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Created), "created");
        assert_eq!(format!("{}", Fetching { page: 2 }), "fetching(page=2)");
        assert_eq!(format!("{}", LimitReached), "limit_reached");
    }
}
