use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("name is required")]
    EmptyName,
    #[error("phone is required")]
    EmptyPhone,
    #[error("name or phone is required")]
    EmptyQuery,
    #[error("message is required")]
    EmptyMessage,
    #[error("no unique contact match for {query:?}; refine the name or add the contact")]
    NoUniqueMatch {
        query: String,
        candidates: Vec<String>,
    },
    #[error("contact {0} has no valid phone number")]
    InvalidContactPhone(String),
    #[error("invalid phone number: {0}")]
    InvalidPhone(String),
    #[error("invalid link base: {0}")]
    InvalidLinkBase(String),
}
