use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::cert::{Certificate, SignedCertificate};
use crate::error::{CertFuncsError, Result};
use crate::key::KeyPair;

/// Rebuilds a `{Cert, Key}` pair from base64-encoded PEM text.
///
/// Both halves are validated: the certificate must parse as X.509 and the key
/// must decode as a supported private key. On success the PEM texts are
/// returned exactly as supplied.
pub fn build_custom_certificate(
    certificate_base64: &str,
    private_key_base64: &str,
) -> Result<SignedCertificate> {
    let cert = STANDARD
        .decode(certificate_base64)
        .map_err(|_| CertFuncsError::DecodingError("unable to decode base64 certificate".into()))?;
    let key = STANDARD
        .decode(private_key_base64)
        .map_err(|_| CertFuncsError::DecodingError("unable to decode base64 private key".into()))?;

    let cert = String::from_utf8(cert)
        .map_err(|e| CertFuncsError::CertificateError(format!("error parsing certificate: {e}")))?;
    let key = String::from_utf8(key)
        .map_err(|e| CertFuncsError::DecodingError(format!("error parsing private key: {e}")))?;

    Certificate::from_pem(&cert)
        .map_err(|e| CertFuncsError::CertificateError(format!("error parsing certificate: {e}")))?;
    KeyPair::from_pem(&key)
        .map_err(|e| CertFuncsError::DecodingError(format!("error parsing private key: {e}")))?;

    Ok(SignedCertificate { cert, key })
}
