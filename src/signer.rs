//! Leaf certificates, either self-signed or signed by a CA.

use crate::cert::SignedCertificate;
use crate::cert::params::CertificateTemplate;
use crate::error::Result;
use crate::issuer::{CertificateAuthority, Issuer, SelfIssuer};
use crate::key::{CERTIFICATE_RSA_BITS, KeyPair};

/// Subject and SAN inputs shared by every leaf certificate function.
#[derive(Debug, Clone, Copy)]
pub struct LeafRequest<'a, I: AsRef<str>, D: AsRef<str>> {
    pub common_name: &'a str,
    pub ip_addresses: &'a [I],
    pub dns_names: &'a [D],
    pub valid_days: i64,
}

impl<I: AsRef<str>, D: AsRef<str>> LeafRequest<'_, I, D> {
    fn template(&self) -> Result<CertificateTemplate> {
        CertificateTemplate::new(
            self.common_name,
            self.valid_days,
            self.ip_addresses,
            self.dns_names,
            false,
        )
    }
}

/// Self-signed leaf certificate for a freshly generated RSA key.
pub fn generate_self_signed_certificate<I: AsRef<str>, D: AsRef<str>>(
    request: &LeafRequest<'_, I, D>,
) -> Result<SignedCertificate> {
    let key = KeyPair::generate_rsa(CERTIFICATE_RSA_BITS)?;
    self_signed_for_key(&key, request)
}

/// Self-signed leaf certificate for the PEM private key `key_pem`.
pub fn generate_self_signed_certificate_with_key<I: AsRef<str>, D: AsRef<str>>(
    key_pem: &str,
    request: &LeafRequest<'_, I, D>,
) -> Result<SignedCertificate> {
    let key = KeyPair::from_pem(key_pem)?;
    self_signed_for_key(&key, request)
}

/// Leaf certificate for a freshly generated RSA key, signed by `ca`.
pub fn generate_signed_certificate<I: AsRef<str>, D: AsRef<str>>(
    request: &LeafRequest<'_, I, D>,
    ca: &SignedCertificate,
) -> Result<SignedCertificate> {
    let authority = CertificateAuthority::from_signed(ca)?;
    let key = KeyPair::generate_rsa(CERTIFICATE_RSA_BITS)?;
    signed_for_key(&authority, &key, request)
}

/// Leaf certificate for the PEM private key `key_pem`, signed by `ca`.
///
/// The CA is checked before the leaf key is decoded, so a broken CA is
/// reported even when the leaf key is also bad.
pub fn generate_signed_certificate_with_key<I: AsRef<str>, D: AsRef<str>>(
    key_pem: &str,
    request: &LeafRequest<'_, I, D>,
    ca: &SignedCertificate,
) -> Result<SignedCertificate> {
    let authority = CertificateAuthority::from_signed(ca)?;
    let key = KeyPair::from_pem(key_pem)?;
    signed_for_key(&authority, &key, request)
}

fn self_signed_for_key<I: AsRef<str>, D: AsRef<str>>(
    key: &KeyPair,
    request: &LeafRequest<'_, I, D>,
) -> Result<SignedCertificate> {
    let template = request.template()?;
    let cert = SelfIssuer::self_sign(&template, key)?;
    Ok(SignedCertificate {
        cert: cert.to_pem()?,
        key: key.to_pem()?,
    })
}

fn signed_for_key<I: AsRef<str>, D: AsRef<str>>(
    authority: &CertificateAuthority,
    key: &KeyPair,
    request: &LeafRequest<'_, I, D>,
) -> Result<SignedCertificate> {
    let template = request.template()?;
    let cert = authority.issue(&template, key.certificate_public_key_info()?)?;
    Ok(SignedCertificate {
        cert: cert.to_pem()?,
        key: key.to_pem()?,
    })
}
