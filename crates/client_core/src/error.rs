use thiserror::Error;

/// The two failure categories a page operation distinguishes. Controllers
/// handle both at the failing call site; neither propagates past a page
/// operation.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request produced no usable body: connection failure, a
    /// non-success status on endpoints that require one, or undecodable
    /// JSON.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    /// A well-formed response reporting failure in-band, with the
    /// server-provided message when one was given.
    #[error("{}", .message.as_deref().unwrap_or("request rejected by server"))]
    Rejected { message: Option<String> },
}
