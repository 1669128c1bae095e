use thiserror::Error;

pub type Result<T> = std::result::Result<T, IrtError>;

#[derive(Debug, Error)]
pub enum IrtError {
    #[error("invalid item parameter: item {item_id} has {parameter} = {value}")]
    InvalidItemParameter {
        item_id: String,
        parameter: &'static str,
        value: f64,
    },
    #[error("duplicate item id: {0}")]
    DuplicateItemId(String),
    #[error("unknown item: {0}")]
    UnknownItem(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("session not found: {0}")]
    SessionNotFound(String),
    #[error("item already answered: {0}")]
    AlreadyAnswered(String),
    #[error("unexpected answer for {got}, awaiting {expected:?}")]
    UnexpectedAnswer {
        expected: Option<String>,
        got: String,
    },
    /// Storage failure reported by a [`SessionRepository`](crate::SessionRepository)
    /// backend; the in-memory repository never returns it
    #[error("session repository error: {0}")]
    Repository(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
