use std::future::Future;

use crate::api::ApiError;

/// Load state shared by every table: `Idle -> Loading -> Loaded | Error`.
#[derive(Debug, Clone, PartialEq)]
pub enum ListState<T> {
    Idle,
    Loading,
    Loaded(Vec<T>),
    Error(String),
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        ListState::Idle
    }
}

impl<T> ListState<T> {
    /// Settle a fetch. A failure replaces whatever was loaded before.
    pub fn from_result(result: Result<Vec<T>, ApiError>) -> Result<Self, ApiError> {
        match result {
            Ok(items) => Ok(ListState::Loaded(items)),
            Err(ApiError::Unauthorized) => Err(ApiError::Unauthorized),
            Err(e) => {
                log::warn!("List load failed: {e}");
                Ok(ListState::Error(e.to_string()))
            }
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            ListState::Loaded(items) => items,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ListState::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ListState::Loaded(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ListState::Loading)
    }
}

/// A fetched collection and its load state.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView<T> {
    state: ListState<T>,
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self { state: ListState::Idle }
    }
}

impl<T> ListView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ListState<T> {
        &self.state
    }

    /// Enter `Loading`. Valid from any state; a loaded list is refreshed this way.
    pub fn begin(&mut self) {
        self.state = ListState::Loading;
    }

    /// Settle the pending load. Only a backend 401 is returned as an error.
    pub fn settle(&mut self, result: Result<Vec<T>, ApiError>) -> Result<(), ApiError> {
        self.state = ListState::from_result(result)?;
        Ok(())
    }

    /// Fetch the whole collection again.
    pub async fn load<F>(&mut self, fetch: F) -> Result<(), ApiError>
    where
        F: Future<Output = Result<Vec<T>, ApiError>>,
    {
        self.begin();
        let result = fetch.await;
        self.settle(result)
    }

    pub fn items(&self) -> &[T] {
        self.state.items()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    pub fn is_loaded(&self) -> bool {
        self.state.is_loaded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Action, Target};

    fn failure() -> ApiError {
        ApiError::failed(Target::new(Action::Load, "roles"), Some(500), None)
    }

    #[test]
    fn starts_idle() {
        let view: ListView<u8> = ListView::new();
        assert_eq!(view.state(), &ListState::Idle);
        assert!(view.items().is_empty());
    }

    #[test]
    fn begin_then_success_loads() {
        let mut view = ListView::new();
        view.begin();
        assert!(view.state().is_loading());
        view.settle(Ok(vec![1, 2, 3])).unwrap();
        assert_eq!(view.items(), &[1, 2, 3]);
    }

    #[test]
    fn failed_reload_never_keeps_stale_items() {
        let mut view = ListView::new();
        view.settle(Ok(vec![1, 2])).unwrap();
        view.begin();
        view.settle(Err(failure())).unwrap();
        assert!(view.items().is_empty());
        assert_eq!(view.error(), Some("Could not load roles"));
    }

    #[test]
    fn unauthorized_propagates() {
        let mut view: ListView<u8> = ListView::new();
        let err = view.settle(Err(ApiError::Unauthorized)).unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn load_runs_the_fetch() {
        let mut view = ListView::new();
        view.load(async { Ok(vec!["a"]) }).await.unwrap();
        assert!(view.is_loaded());
        assert_eq!(view.items(), &["a"]);
    }
}
