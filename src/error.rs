//! Error type shared by every certfuncs operation.

use thiserror::Error;

/// Represents errors that can occur in the certfuncs library.
///
/// The display strings of a few variants are part of the public surface: the
/// template boundary renders them verbatim, so callers can recognise
/// `Unknown type ...`, `failed to generate ...` and
/// `x509: unsupported public key type ...`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CertFuncsError {
    /// Error during data encoding.
    #[error("Failed to encode data: {0}")]
    EncodingError(String),

    /// Error during data decoding.
    #[error("Failed to decode data: {0}")]
    DecodingError(String),

    /// Error due to invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error during key generation.
    #[error("failed to generate private key: {0}")]
    KeyGenerationError(String),

    /// The requested key algorithm name is not recognised.
    #[error("Unknown type {0}")]
    UnknownKeyType(String),

    /// The key cannot be placed in, or sign, an X.509 certificate.
    #[error("x509: unsupported public key type: {0}")]
    UnsupportedKeyType(String),

    /// Error related to certificate operations.
    #[error("Certificate error: {0}")]
    CertificateError(String),

    /// Error from RSA operations.
    #[error("RSA error: {0}")]
    RsaError(String),
}

pub type Result<T> = std::result::Result<T, CertFuncsError>;

impl From<der::Error> for CertFuncsError {
    /// Converts a `der::Error` into a `CertFuncsError`.
    fn from(err: der::Error) -> Self {
        CertFuncsError::DecodingError(err.to_string())
    }
}

impl From<rsa::Error> for CertFuncsError {
    fn from(err: rsa::Error) -> Self {
        CertFuncsError::RsaError(err.to_string())
    }
}

impl From<rsa::pkcs1::Error> for CertFuncsError {
    fn from(err: rsa::pkcs1::Error) -> Self {
        CertFuncsError::DecodingError(err.to_string())
    }
}

impl From<pkcs8::Error> for CertFuncsError {
    fn from(err: pkcs8::Error) -> Self {
        CertFuncsError::DecodingError(err.to_string())
    }
}

impl From<pkcs8::spki::Error> for CertFuncsError {
    fn from(err: pkcs8::spki::Error) -> Self {
        CertFuncsError::EncodingError(err.to_string())
    }
}

impl From<pem::PemError> for CertFuncsError {
    fn from(err: pem::PemError) -> Self {
        CertFuncsError::DecodingError(err.to_string())
    }
}
