// Per-panel query state.
// idle -> loading -> success | error, keeping the last good data visible while refetching.

use std::sync::Arc;

use crate::error::DashError;

/// Loading state for async data.
#[derive(Debug, Clone)]
pub enum QueryState<T> {
    Idle,
    Loading {
        previous: Option<T>,
    },
    Success(T),
    Error {
        error: Arc<DashError>,
        previous: Option<T>,
    },
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        QueryState::Idle
    }
}

impl<T> QueryState<T> {
    /// First load with nothing to show yet.
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading { previous: None })
    }

    /// Any fetch in progress, including background refetches.
    pub fn is_fetching(&self) -> bool {
        matches!(self, QueryState::Loading { .. })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QueryState::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, QueryState::Error { .. })
    }

    /// Latest data, including data kept from before a refetch or failure.
    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Success(data) => Some(data),
            QueryState::Loading { previous } | QueryState::Error { previous, .. } => {
                previous.as_ref()
            }
            QueryState::Idle => None,
        }
    }

    pub fn error(&self) -> Option<&Arc<DashError>> {
        match self {
            QueryState::Error { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Move to loading, carrying any current data along.
    pub fn start(&mut self) {
        let previous = self.take_data();
        *self = QueryState::Loading { previous };
    }

    pub fn succeed(&mut self, data: T) {
        *self = QueryState::Success(data);
    }

    pub fn fail(&mut self, error: Arc<DashError>) {
        let previous = self.take_data();
        *self = QueryState::Error { error, previous };
    }

    fn take_data(&mut self) -> Option<T> {
        match std::mem::take(self) {
            QueryState::Success(data) => Some(data),
            QueryState::Loading { previous } | QueryState::Error { previous, .. } => previous,
            QueryState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_load() {
        let mut state: QueryState<u32> = QueryState::Idle;
        assert!(state.data().is_none());

        state.start();
        assert!(state.is_loading());
        assert!(state.is_fetching());

        state.succeed(7);
        assert!(state.is_success());
        assert_eq!(state.data(), Some(&7));
    }

    #[test]
    fn test_default_needs_no_default_data() {
        struct Opaque;
        let mut state: QueryState<Opaque> = QueryState::default();
        assert!(matches!(state, QueryState::Idle));
        state.succeed(Opaque);
        state.start();
        assert!(state.is_fetching());
        assert!(state.data().is_some());
    }

    #[test]
    fn test_refetch_keeps_previous_data() {
        let mut state = QueryState::Success(1);
        state.start();
        assert!(!state.is_loading());
        assert!(state.is_fetching());
        assert_eq!(state.data(), Some(&1));

        state.fail(Arc::new(DashError::Other("boom".to_string())));
        assert!(state.is_error());
        assert_eq!(state.data(), Some(&1));

        state.start();
        state.succeed(2);
        assert_eq!(state.data(), Some(&2));
        assert!(state.error().is_none());
    }
}
