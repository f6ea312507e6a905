use thiserror::Error;

/// Failure taxonomy for the classification core.
///
/// Unmapped labels and class indices are deliberately absent: the label table
/// and the category table are total functions that fall back to an `unknown`
/// sentinel instead of failing a request over a single bad mapping.
#[derive(Debug, Error)]
pub enum Error {
    /// The uploaded bytes are not a decodable image. User input error; the
    /// request fails and nothing is written to the ledger.
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// The classifier weights or the label table could not be loaded, or an
    /// inference call failed. Fatal at startup: the process must not serve
    /// predictions without a working model.
    #[error("classifier unavailable: {0}")]
    ModelUnavailable(String),

    /// The leaderboard storage failed. Recoverable: the classification result
    /// is still returned to the caller, the score update is dropped with a
    /// logged warning.
    #[error("leaderboard ledger unavailable: {0}")]
    LedgerUnavailable(#[from] rusqlite::Error),
}
