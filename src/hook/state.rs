/// What presentation code renders: the last good data plus request status.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<V> {
    /// Result of the most recent applied fetch. Kept when a later fetch fails.
    pub data: Option<V>,
    pub loading: bool,
    /// Human-readable message for the error banner.
    pub error: Option<String>,
}

impl<V> Default for FetchState<V> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<V> FetchState<V> {
    pub fn status(&self) -> FetchStatus {
        if self.loading {
            FetchStatus::Loading
        } else if self.error.is_some() {
            FetchStatus::Failed
        } else if self.data.is_some() {
            FetchStatus::Ready
        } else {
            FetchStatus::Idle
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

/// Exactly one of these holds for any [`FetchState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Nothing loaded yet.
    Idle,
    Loading,
    Ready,
    /// Last request failed; `data` may still hold stale results.
    Failed,
}

/// Whether a fetch's result made it into the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer load started before this one resolved.
    Superseded,
    /// `refetch` before any `load`.
    Unbound,
}
