use thiserror::Error;

/// Failures raised while parsing or constructing domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("invalid supplier id `{0}` (expected SUP-XXXX)")]
    InvalidSupplierId(String),
    #[error("unknown country code `{0}`")]
    UnknownCountry(String),
    #[error("unknown supplier status `{0}`")]
    UnknownStatus(String),
    #[error("rating {0} is outside 1..=5")]
    RatingOutOfRange(i64),
}
