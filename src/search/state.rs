//! Search state machine
//!
//! ```text
//! Idle ──> Searching ──> Results | Empty | Error
//!  │ ^                         │
//!  │ └──────── clear ──────────┤
//!  └── cache hit ──> Results | Empty     (new query re-enters Searching)
//! ```

use serde::{Deserialize, Serialize};

/// Observable state of the search orchestrator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchState {
    #[default]
    Idle,
    Searching,
    Results,
    Empty,
    Error,
}

impl SearchState {
    /// Whether `self -> next` is a legal transition
    ///
    /// `Searching -> Searching` is legal: a newer query replaced the one in
    /// flight. `Error` is only reachable from `Searching`.
    #[must_use]
    pub fn can_transition_to(self, next: SearchState) -> bool {
        use SearchState::{Empty, Error, Idle, Results, Searching};
        match (self, next) {
            (Idle, Searching | Results | Empty) => true,
            (Searching, _) => true,
            (Results | Empty | Error, Searching | Results | Empty | Idle) => true,
            _ => false,
        }
    }

    /// True once a search has finished, successfully or not
    #[must_use]
    pub fn is_settled(self) -> bool {
        matches!(
            self,
            SearchState::Results | SearchState::Empty | SearchState::Error
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SearchState::Idle => "idle",
            SearchState::Searching => "searching",
            SearchState::Results => "results",
            SearchState::Empty => "empty",
            SearchState::Error => "error",
        }
    }
}

impl std::fmt::Display for SearchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::SearchState::*;

    #[test]
    fn test_transition_table() {
        assert!(Idle.can_transition_to(Searching));
        assert!(Idle.can_transition_to(Results));
        assert!(!Idle.can_transition_to(Error));
        assert!(!Idle.can_transition_to(Idle));
        assert!(Searching.can_transition_to(Error));
        assert!(Searching.can_transition_to(Searching));
        assert!(Error.can_transition_to(Searching));
        assert!(!Results.can_transition_to(Error));
        assert!(Empty.can_transition_to(Idle));
    }
}
