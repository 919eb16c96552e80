//! Self-signed certificate authorities.

use crate::cert::SignedCertificate;
use crate::cert::params::CertificateTemplate;
use crate::error::Result;
use crate::issuer::SelfIssuer;
use crate::key::{CERTIFICATE_RSA_BITS, KeyPair};

/// Creates a CA certificate valid for `valid_days`, signed by a fresh RSA key.
pub fn generate_certificate_authority(
    common_name: &str,
    valid_days: i64,
) -> Result<SignedCertificate> {
    let key = KeyPair::generate_rsa(CERTIFICATE_RSA_BITS)?;
    certificate_authority_for_key(&key, common_name, valid_days)
}

/// Creates a CA certificate signed by the PEM private key `key_pem`.
///
/// RSA, ECDSA and Ed25519 keys can sign. A DSA key decodes but is refused with
/// an unsupported public key type error.
pub fn generate_certificate_authority_with_key(
    key_pem: &str,
    common_name: &str,
    valid_days: i64,
) -> Result<SignedCertificate> {
    let key = KeyPair::from_pem(key_pem)?;
    certificate_authority_for_key(&key, common_name, valid_days)
}

fn certificate_authority_for_key(
    key: &KeyPair,
    common_name: &str,
    valid_days: i64,
) -> Result<SignedCertificate> {
    let template = CertificateTemplate::for_ca(common_name, valid_days)?;
    let cert = SelfIssuer::self_sign(&template, key)?;
    Ok(SignedCertificate {
        cert: cert.to_pem()?,
        key: key.to_pem()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::Certificate;
    use crate::error::CertFuncsError;

    #[test]
    fn ca_is_self_signed_and_marked_ca() {
        let key = KeyPair::generate_ecdsa_p256();
        let ca = generate_certificate_authority_with_key(&key.to_pem().unwrap(), "ca.local", 30)
            .unwrap();
        let cert = Certificate::from_pem(&ca.cert).unwrap();

        assert!(cert.is_ca().unwrap());
        assert_eq!(cert.subject().common_name, "ca.local");
        assert_eq!(cert.issuer().common_name, "ca.local");
        assert!(cert.dns_names().unwrap().is_empty());
        cert.verify_signed_by(&cert).unwrap();
        assert_eq!(ca.key, key.to_pem().unwrap());
    }

    #[test]
    fn ca_with_dsa_key_is_refused() {
        let key = KeyPair::generate_dsa();
        let err = generate_certificate_authority_with_key(&key.to_pem().unwrap(), "dsa-ca", 30)
            .unwrap_err();
        assert_eq!(err, CertFuncsError::UnsupportedKeyType("DSA".to_string()));
        assert_eq!(err.to_string(), "x509: unsupported public key type: DSA");
    }

    #[test]
    fn ca_with_garbage_key_is_refused() {
        assert!(generate_certificate_authority_with_key("not a key", "ca", 30).is_err());
    }
}
