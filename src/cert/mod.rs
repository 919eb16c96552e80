pub mod extensions;
pub mod params;

use std::net::IpAddr;

use der::{Decode, Encode, EncodePem};
use extensions::{BasicConstraints, SubjectAltName, SubjectKeyIdentifier, ToAndFromX509Extension};
use params::DistinguishedName;
use time::OffsetDateTime;
use x509_cert::certificate::CertificateInner;

use crate::error::{CertFuncsError, Result};
use crate::key::PublicKey;
use crate::pem_utils::{CERTIFICATE_LABEL, pem_to_der};

/// Represents the supported signature algorithms for certificates.
///
/// This enum provides a mapping to the corresponding OIDs for each algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// SHA-256 with RSA encryption.
    Sha256WithRSA,
    /// SHA-256 with ECDSA.
    Sha256WithECDSA,
    /// SHA-384 with ECDSA.
    Sha384WithECDSA,
    /// Pure Ed25519.
    Ed25519,
}

impl From<SignatureAlgorithm> for x509_cert::spki::AlgorithmIdentifierOwned {
    /// Converts a `SignatureAlgorithm` into an `AlgorithmIdentifierOwned`.
    ///
    /// RSA carries explicit NULL parameters (RFC 4055); the others carry none.
    fn from(value: SignatureAlgorithm) -> Self {
        match value {
            SignatureAlgorithm::Sha256WithRSA => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
                parameters: Some(der::Any::null()),
            },
            SignatureAlgorithm::Sha256WithECDSA => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::ECDSA_WITH_SHA_256,
                parameters: None,
            },
            SignatureAlgorithm::Sha384WithECDSA => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::ECDSA_WITH_SHA_384,
                parameters: None,
            },
            SignatureAlgorithm::Ed25519 => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc8410::ID_ED_25519,
                parameters: None,
            },
        }
    }
}

/// A certificate together with the private key it was issued for, both as PEM.
///
/// This is the `{Cert, Key}` value handed back to templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedCertificate {
    pub cert: String,
    pub key: String,
}

/// Represents an X.509 certificate.
///
/// Wraps the decoded structure with PEM encoding and accessors for the fields
/// the certificate functions populate.
#[derive(Debug, Clone)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl Certificate {
    /// Encodes the certificate into PEM format.
    pub fn to_pem(&self) -> Result<String> {
        self.inner
            .to_pem(pkcs8::LineEnding::LF)
            .map_err(|e| CertFuncsError::EncodingError(e.to_string()))
    }

    /// Parses a DER-encoded certificate.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner = CertificateInner::from_der(der)?;
        Ok(Certificate { inner })
    }

    /// Parses the first `CERTIFICATE` block of a PEM document.
    pub fn from_pem(pem_str: &str) -> Result<Self> {
        Self::from_der(&pem_to_der(pem_str, CERTIFICATE_LABEL)?)
    }

    /// Finds the first extension with the given type and decodes it.
    fn extension<E: ToAndFromX509Extension>(&self) -> Result<Option<E>> {
        let Some(extensions) = &self.inner.tbs_certificate.extensions else {
            return Ok(None);
        };
        extensions
            .iter()
            .find(|ext| ext.extn_id == E::OID)
            .map(|ext| E::from_x509_extension_value(ext.extn_value.as_bytes()))
            .transpose()
    }

    /// Subject distinguished name.
    pub fn subject(&self) -> DistinguishedName {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.subject)
    }

    /// Issuer distinguished name.
    pub fn issuer(&self) -> DistinguishedName {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.issuer)
    }

    /// Serial number as unsigned big-endian bytes, without a sign octet.
    pub fn serial_number(&self) -> Vec<u8> {
        let bytes = self.inner.tbs_certificate.serial_number.as_bytes();
        let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        bytes[start..].to_vec()
    }

    /// Whether the serial number encodes a strictly positive integer.
    pub fn serial_number_is_positive(&self) -> bool {
        let bytes = self.inner.tbs_certificate.serial_number.as_bytes();
        match bytes.first() {
            Some(first) => *first & 0x80 == 0 && bytes.iter().any(|b| *b != 0),
            None => false,
        }
    }

    /// Whether the basic constraints extension marks this certificate as a CA.
    pub fn is_ca(&self) -> Result<bool> {
        Ok(self
            .extension::<BasicConstraints>()?
            .map(|bc| bc.is_ca)
            .unwrap_or(false))
    }

    /// DNS names from the subject alternative name extension, in order.
    pub fn dns_names(&self) -> Result<Vec<String>> {
        Ok(self
            .extension::<SubjectAltName>()?
            .map(|san| san.dns_names)
            .unwrap_or_default())
    }

    /// IP addresses from the subject alternative name extension, in order.
    pub fn ip_addresses(&self) -> Result<Vec<IpAddr>> {
        Ok(self
            .extension::<SubjectAltName>()?
            .map(|san| san.ip_addresses)
            .unwrap_or_default())
    }

    /// The subject key identifier extension value, if present.
    pub fn subject_key_identifier(&self) -> Result<Option<Vec<u8>>> {
        Ok(self
            .extension::<SubjectKeyIdentifier>()?
            .map(|ski| ski.key_identifier))
    }

    /// Start of the validity window.
    pub fn not_before(&self) -> Result<OffsetDateTime> {
        to_offset_date_time(self.inner.tbs_certificate.validity.not_before)
    }

    /// End of the validity window.
    pub fn not_after(&self) -> Result<OffsetDateTime> {
        to_offset_date_time(self.inner.tbs_certificate.validity.not_after)
    }

    /// The public key embedded in this certificate.
    pub fn public_key(&self) -> Result<PublicKey> {
        PublicKey::from_x509spki(&self.inner.tbs_certificate.subject_public_key_info)
    }

    /// Checks that this certificate's signature was produced by `issuer`'s key.
    ///
    /// Only the direct signature is checked; names, validity and constraints are not.
    pub fn verify_signed_by(&self, issuer: &Certificate) -> Result<()> {
        if self.inner.signature_algorithm != self.inner.tbs_certificate.signature {
            return Err(CertFuncsError::CertificateError(
                "signature algorithm does not match the TBS certificate".to_string(),
            ));
        }
        let tbs = self.inner.tbs_certificate.to_der()?;
        let signature = self.inner.signature.as_bytes().ok_or_else(|| {
            CertFuncsError::CertificateError("signature has unused bits".to_string())
        })?;
        issuer.public_key()?.verify(&tbs, signature)
    }
}

fn to_offset_date_time(time: x509_cert::time::Time) -> Result<OffsetDateTime> {
    let seconds = time.to_unix_duration().as_secs();
    let seconds = i64::try_from(seconds)
        .map_err(|e| CertFuncsError::DecodingError(format!("certificate time out of range: {e}")))?;
    OffsetDateTime::from_unix_timestamp(seconds)
        .map_err(|e| CertFuncsError::DecodingError(format!("certificate time out of range: {e}")))
}
