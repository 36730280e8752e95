/// Supplies the bearer token attached to outbound requests.
pub trait TokenSource: Send + Sync {
    /// Current token, or `None` to send the request unauthenticated.
    fn token(&self) -> Option<String>;
}

/// A fixed token.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenSource for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}
