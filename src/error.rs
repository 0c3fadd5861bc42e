//! Typed parse failures.
//!
//! Verification failures are always [`crate::Status`] values; errors here
//! only come out of the parsing entry points, before any verifier runs.

use derive_more::Display;

#[derive(Debug, Display)]
pub enum ParseError {
    /// PEM framing could not be decoded.
    #[display("PEM decoding failed: {_0}")]
    Pem(String),
    /// DER structure could not be decoded.
    #[display("DER decoding failed: {_0}")]
    Der(String),
    /// The Intel SGX extension is absent, has the wrong entry count, or
    /// carries malformed inner values.
    #[display("invalid SGX extension: {_0}")]
    InvalidExtension(String),
    /// A concatenated PEM bundle could not be classified into chain slots.
    #[display("invalid certificate chain: {_0}")]
    InvalidChain(String),
    /// Signed JSON collateral (TCB info, enclave identity) is malformed.
    #[display("invalid collateral JSON: {_0}")]
    Json(String),
}

impl std::error::Error for ParseError {}

impl ParseError {
    pub(crate) fn pem(err: impl ToString) -> Self {
        ParseError::Pem(err.to_string())
    }

    pub(crate) fn der(err: impl ToString) -> Self {
        ParseError::Der(err.to_string())
    }

    pub(crate) fn json(err: impl ToString) -> Self {
        ParseError::Json(err.to_string())
    }
}
