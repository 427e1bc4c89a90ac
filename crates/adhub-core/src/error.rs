//! # AppError
//!
//! Centralized error handling for the adhub domain core.
//! Every guarded-transition failure is a variant here; handlers propagate
//! them to the caller unchanged.

use thiserror::Error;
use uuid::Uuid;

/// The primary error type for all adhub-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// VIP-gated operation attempted by a non-VIP provider
    #[error("only a VIP provider can do this")]
    NotVip,

    /// Duplicate advertisement identifier on publish
    #[error("advertisement {0} already exists")]
    AdAlreadyExist(Uuid),

    /// Duplicate premium promotion for the same advertisement
    #[error("advertisement {0} is already promoted")]
    AdvertisementAlreadyPromoted(Uuid),

    /// The visitor hit the 50-message SMS cap
    #[error("the 50 SMS limit was reached")]
    SmsLimitWasReached,

    /// Modify/delete referenced a comment the owner does not hold
    #[error("comment {0} not found")]
    CommentNotFound(Uuid),

    /// Comment/close attempted on a report not in the required status
    #[error("report {0} is not opened")]
    ReportNotOpened(Uuid),

    /// Guarded operation attempted by a disabled user
    #[error("user {0} is not active")]
    UserNotActive(Uuid),

    /// Required lookup came back empty (e.g. user, advertisement, report)
    #[error("{0} not found with ID {1}")]
    NotFound(String, Uuid),

    /// Role mismatch (e.g. a visitor invoking a provider behavior)
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Infrastructure failure inside a port implementation
    #[error("internal service error: {0}")]
    Internal(String),
}

/// A specialized Result type for adhub domain logic.
pub type Result<T> = std::result::Result<T, AppError>;
