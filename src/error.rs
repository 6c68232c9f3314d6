use crate::policy::TransactionType;

/// Errors raised while validating, bundling or signing request parameters.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("Required param(s) not found: '{}'", .0.join(", "))]
    RequiredMissing(Vec<String>),
    #[error("Reversed param(s) not found: '{}'", .0.join(", "))]
    ReversedMissing(Vec<String>),
    #[error("Invalid param: '{0}'")]
    Validation(String),
    #[error("Param '{0}' is supplied by the client and cannot be set directly")]
    Reserved(String),
    #[error("Expected a string value, got {0}")]
    NotAString(&'static str),
    #[error("Param '{0}' holds a nested list")]
    NestedList(String),
    #[error("Failed to encode bundled param '{0}': {1}")]
    Encoding(String, String),
    #[error("No field policy is declared for transaction type {0}")]
    NoPolicy(TransactionType),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown transaction type: '{0}'")]
pub struct UnknownTransactionType(pub String);

/// Errors returned by the gateway client.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Params(#[from] ParamError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
