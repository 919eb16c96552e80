use der::Encode;
use sha1::Sha1;
use x509_cert::certificate::CertificateInner;
use x509_cert::name::Name;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::cert::extensions::{
    AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, SubjectAltName,
    SubjectKeyIdentifier,
};
use crate::cert::params::{CertificateTemplate, DistinguishedName, ExtensionParam};
use crate::cert::{Certificate, SignedCertificate};
use crate::error::{CertFuncsError, Result};
use crate::key::KeyPair;
use crate::tbs_certificate::TbsCertificate;

/// Key identifier for a public key: SHA-1 over the subject public key bits
/// (RFC 5280 §4.2.1.2, method 1).
pub fn key_identifier(public_key_info: &SubjectPublicKeyInfoOwned) -> Vec<u8> {
    <Sha1 as sha1::Digest>::digest(public_key_info.subject_public_key.raw_bytes()).to_vec()
}

/// Represents an entity capable of issuing certificates.
///
/// This trait provides methods to retrieve issuer details and issue certificates.
pub trait Issuer {
    /// Returns the name written into the issuer field of issued certificates.
    fn issuer_name(&self) -> Result<Name>;

    /// Returns the signing key of the issuer.
    fn signing_key(&self) -> &KeyPair;

    /// Whether issued certificates name their own subject as issuer.
    fn is_self_issued(&self) -> bool {
        false
    }

    /// Returns the key identifier of the issuer's public key.
    fn issuer_key_identifier(&self) -> Result<Vec<u8>> {
        Ok(key_identifier(&self.signing_key().subject_public_key_info()?))
    }

    /// Issues a certificate for `template`, embedding `subject_public_key`.
    ///
    /// # Arguments
    /// * `template` - The unsigned description of the certificate to issue.
    /// * `subject_public_key` - The public key the certificate is issued for.
    ///
    /// # Returns
    /// The signed `Certificate`, or an error if the issuer key cannot sign.
    fn issue(
        &self,
        template: &CertificateTemplate,
        subject_public_key: SubjectPublicKeyInfoOwned,
    ) -> Result<Certificate> {
        let signature_algorithm = self.signing_key().signature_algorithm()?;

        let subject_key_id = key_identifier(&subject_public_key);

        let mut extensions = vec![
            ExtensionParam::from_extension(&template.key_usage(), true)?,
            ExtensionParam::from_extension(
                &BasicConstraints {
                    is_ca: template.is_ca,
                    max_path_length: None,
                },
                true,
            )?,
        ];

        let usage = template.extended_key_usage();
        if !usage.is_empty() {
            extensions.push(ExtensionParam::from_extension(
                &ExtendedKeyUsage { usage },
                false,
            )?);
        }

        let san = SubjectAltName {
            dns_names: template.dns_names.clone(),
            ip_addresses: template.ip_addresses.clone(),
        };
        if !san.is_empty() {
            extensions.push(ExtensionParam::from_extension(&san, false)?);
        }

        extensions.push(ExtensionParam::from_extension(
            &SubjectKeyIdentifier {
                key_identifier: subject_key_id,
            },
            false,
        )?);

        if !self.is_self_issued() {
            extensions.push(ExtensionParam::from_extension(
                &AuthorityKeyIdentifier {
                    key_identifier: self.issuer_key_identifier()?,
                },
                false,
            )?);
        }

        let tbs_cert = TbsCertificate {
            serial_number: template.serial_number.clone(),
            signature_algorithm,
            issuer: self.issuer_name()?,
            validity: template.validity.clone(),
            subject: template.subject.as_x509_name()?,
            subject_public_key_info: subject_public_key,
            extensions,
        };

        let tbs_cert_inner = tbs_cert.to_tbs_certificate_inner()?;
        let tbs_der = tbs_cert_inner
            .to_der()
            .map_err(|e| CertFuncsError::EncodingError(e.to_string()))?;
        let signature = self.signing_key().sign_data(&tbs_der)?;

        tracing::debug!(
            common_name = %template.subject.common_name,
            is_ca = template.is_ca,
            serial = %hex_serial(&template.serial_number),
            "issued certificate"
        );

        let cert_inner = CertificateInner {
            tbs_certificate: tbs_cert_inner,
            signature_algorithm: signature_algorithm.into(),
            signature: der::asn1::BitString::from_bytes(&signature)?,
        };

        Ok(Certificate { inner: cert_inner })
    }
}

fn hex_serial(serial: &[u8]) -> String {
    serial.iter().map(|b| format!("{b:02x}")).collect()
}

/// Issuer for self-signed certificates: the subject signs for itself.
pub struct SelfIssuer<'a> {
    pub name: &'a DistinguishedName,
    pub key: &'a KeyPair,
}

impl Issuer for SelfIssuer<'_> {
    fn issuer_name(&self) -> Result<Name> {
        self.name.as_x509_name()
    }

    fn signing_key(&self) -> &KeyPair {
        self.key
    }

    fn is_self_issued(&self) -> bool {
        true
    }
}

impl SelfIssuer<'_> {
    /// Self-signs `template` with `key`, embedding the key's own public half.
    pub fn self_sign(template: &CertificateTemplate, key: &KeyPair) -> Result<Certificate> {
        let issuer = SelfIssuer {
            name: &template.subject,
            key,
        };
        issuer.issue(template, key.certificate_public_key_info()?)
    }
}

/// A CA certificate together with its private key, used to sign leaves.
#[derive(Debug)]
pub struct CertificateAuthority {
    pub cert: Certificate,
    pub key: KeyPair,
}

impl CertificateAuthority {
    /// Decodes a CA from the `{Cert, Key}` pair produced by an earlier call.
    ///
    /// Fails if either half does not decode, if the key cannot sign
    /// certificates, or if the key does not belong to the certificate.
    pub fn from_signed(ca: &SignedCertificate) -> Result<Self> {
        let cert = Certificate::from_pem(&ca.cert).map_err(|e| {
            CertFuncsError::CertificateError(format!("error parsing ca certificate: {e}"))
        })?;
        let key = KeyPair::from_pem(&ca.key).map_err(|e| {
            CertFuncsError::DecodingError(format!("unable to decode ca private key: {e}"))
        })?;
        key.signature_algorithm()?;

        if key.subject_public_key_info()? != cert.inner.tbs_certificate.subject_public_key_info {
            return Err(CertFuncsError::CertificateError(
                "ca private key does not match the ca certificate".to_string(),
            ));
        }

        Ok(CertificateAuthority { cert, key })
    }
}

impl Issuer for CertificateAuthority {
    fn issuer_name(&self) -> Result<Name> {
        // The name of the issuer is the subject of the certificate, byte for byte
        Ok(self.cert.inner.tbs_certificate.subject.clone())
    }

    fn signing_key(&self) -> &KeyPair {
        &self.key
    }

    fn issuer_key_identifier(&self) -> Result<Vec<u8>> {
        match self.cert.subject_key_identifier()? {
            Some(id) => Ok(id),
            None => Ok(key_identifier(
                &self.cert.inner.tbs_certificate.subject_public_key_info,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::extensions::ToAndFromX509Extension;

    fn ca_with(key: KeyPair) -> CertificateAuthority {
        let template = CertificateTemplate::for_ca("issuer-test-ca", 30).unwrap();
        let cert = SelfIssuer::self_sign(&template, &key).unwrap();
        CertificateAuthority { cert, key }
    }

    #[test]
    fn self_signed_certificate_verifies_under_itself() {
        for key in [KeyPair::generate_ecdsa_p256(), KeyPair::generate_ed25519()] {
            let template =
                CertificateTemplate::new("self.local", 10, &["127.0.0.1"], &["self.local"], false)
                    .unwrap();
            let cert = SelfIssuer::self_sign(&template, &key).unwrap();
            cert.verify_signed_by(&cert).unwrap();
            assert_eq!(cert.issuer(), cert.subject());
            assert!(!cert.is_ca().unwrap());
        }
    }

    #[test]
    fn ca_signed_leaf_carries_leaf_key_and_ca_signature() {
        let ca = ca_with(KeyPair::generate_ecdsa_p256());
        let leaf_key = KeyPair::generate_ed25519();
        let template =
            CertificateTemplate::new::<&str, &str>("leaf.local", 10, &[], &["leaf.local"], false)
                .unwrap();
        let leaf = ca
            .issue(&template, leaf_key.certificate_public_key_info().unwrap())
            .unwrap();

        leaf.verify_signed_by(&ca.cert).unwrap();
        assert!(leaf.verify_signed_by(&leaf).is_err());
        assert_eq!(
            leaf.inner.tbs_certificate.issuer,
            ca.cert.inner.tbs_certificate.subject
        );
        assert_eq!(
            leaf.inner.tbs_certificate.subject_public_key_info,
            leaf_key.subject_public_key_info().unwrap()
        );
    }

    #[test]
    fn ca_signed_leaf_references_ca_key_identifier() {
        let ca = ca_with(KeyPair::generate_ed25519());
        let template = CertificateTemplate::new::<&str, &str>("leaf", 10, &[], &[], false).unwrap();
        let leaf_key = KeyPair::generate_ecdsa_p256();
        let leaf = ca
            .issue(&template, leaf_key.certificate_public_key_info().unwrap())
            .unwrap();

        let extensions = leaf.inner.tbs_certificate.extensions.as_ref().unwrap();
        let aki = extensions
            .iter()
            .find(|ext| ext.extn_id == AuthorityKeyIdentifier::OID)
            .unwrap();
        let aki = AuthorityKeyIdentifier::from_x509_extension_value(aki.extn_value.as_bytes())
            .unwrap();
        assert_eq!(
            Some(aki.key_identifier),
            ca.cert.subject_key_identifier().unwrap()
        );
    }

    #[test]
    fn leaf_sharing_the_ca_key_still_gets_authority_key_identifier() {
        let ca = ca_with(KeyPair::generate_ecdsa_p256());
        let template = CertificateTemplate::new::<&str, &str>("leaf", 10, &[], &[], false).unwrap();
        let leaf = ca
            .issue(&template, ca.key.certificate_public_key_info().unwrap())
            .unwrap();

        let extensions = leaf.inner.tbs_certificate.extensions.as_ref().unwrap();
        assert!(
            extensions
                .iter()
                .any(|ext| ext.extn_id == AuthorityKeyIdentifier::OID)
        );

        let ca_extensions = ca.cert.inner.tbs_certificate.extensions.as_ref().unwrap();
        assert!(
            !ca_extensions
                .iter()
                .any(|ext| ext.extn_id == AuthorityKeyIdentifier::OID)
        );
    }

    #[test]
    fn mismatched_ca_key_is_rejected() {
        let ca = ca_with(KeyPair::generate_ecdsa_p256());
        let signed = SignedCertificate {
            cert: ca.cert.to_pem().unwrap(),
            key: KeyPair::generate_ecdsa_p256().to_pem().unwrap(),
        };
        let err = CertificateAuthority::from_signed(&signed).unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn garbage_ca_certificate_is_rejected() {
        let signed = SignedCertificate {
            cert: "fail".to_string(),
            key: KeyPair::generate_ed25519().to_pem().unwrap(),
        };
        let err = CertificateAuthority::from_signed(&signed).unwrap_err();
        assert!(err.to_string().contains("error parsing ca certificate"));
    }
}
