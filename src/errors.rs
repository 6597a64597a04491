use thiserror::Error;

/// Errors originating from the server logic (routing, validation, auth)
/// or downstream layers (storage, rendering).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caregiver input rejected before it reaches storage.
    #[error("{0}")]
    Validation(String),

    /// The one-offer-per-caregiver-per-request rule, surfaced from the
    /// UNIQUE(request_id, caregiver_id) constraint in the offer store.
    #[error("an offer for this request was already sent")]
    DuplicateOffer,

    #[error("Database Error: {0}")]
    DbError(String),

    #[error("Internal Server Error")]
    InternalError,
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<astra::Response, ServerError>;
