//! Error taxonomy for the NASA client and the spreadsheet export.
//!
//! Transport and shape failures ([`ApiError`]) surface to the views as a single
//! "fetch failed" message. Per-entry decoding failures ([`FieldError`]) never
//! leave the feed client; they are logged and counted. [`ExportError`] aborts
//! an export as a whole.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Network failure or a non-success HTTP status from upstream.
    #[error("request to NASA API failed: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The body arrived but was not JSON.
    #[error("response body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The body was JSON but lacked a structure the client depends on.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// A single field that was present but could not be decoded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("field {pointer} has type {found}, expected {expected}")]
    WrongType {
        pointer: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("field {pointer} value {value:?} is not a valid {expected}")]
    Unparsable {
        pointer: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Fetch(#[from] ApiError),

    #[error("could not build workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("could not write export file: {0}")]
    Io(#[from] std::io::Error),
}
