use std::net::IpAddr;

use const_oid::AssociatedOid;
use der::{
    Decode, Encode,
    asn1::{Ia5String, OctetString},
    oid::ObjectIdentifier,
};
use x509_cert::ext::pkix::name::GeneralName;

use crate::error::CertFuncsError;

/// An X.509 extension that certfuncs writes into, or reads back from, a certificate.
///
/// Only the `extnValue` contents are handled here; criticality belongs to
/// [`ExtensionParam`](crate::cert::params::ExtensionParam).
///
/// # Example
/// ```
/// use certfuncs::cert::extensions::{SubjectAltName, ToAndFromX509Extension};
/// let san = SubjectAltName {
///     dns_names: vec!["example.com".to_string()],
///     ip_addresses: vec!["10.0.0.1".parse().unwrap()],
/// };
/// let value = san.to_x509_extension_value().unwrap();
/// assert_eq!(SubjectAltName::from_x509_extension_value(&value).unwrap(), san);
/// ```
pub trait ToAndFromX509Extension {
    /// Identifies the extension in `extnID`.
    const OID: ObjectIdentifier;

    /// DER bytes for `extnValue`.
    fn to_x509_extension_value(&self) -> Result<Vec<u8>, CertFuncsError>;

    /// Parses the DER bytes of `extnValue`.
    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CertFuncsError>
    where
        Self: Sized;
}

/// Subject alternative names: DNS names first, then IP addresses.
///
/// Each list keeps its own order. General names of other kinds are skipped
/// when decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectAltName {
    pub dns_names: Vec<String>,
    pub ip_addresses: Vec<IpAddr>,
}

impl SubjectAltName {
    pub fn is_empty(&self) -> bool {
        self.dns_names.is_empty() && self.ip_addresses.is_empty()
    }
}

fn ip_from_octets(octets: &[u8]) -> Result<IpAddr, CertFuncsError> {
    match octets {
        [a, b, c, d] => Ok(IpAddr::from([*a, *b, *c, *d])),
        bytes => <[u8; 16]>::try_from(bytes).map(IpAddr::from).map_err(|_| {
            CertFuncsError::DecodingError(format!(
                "IP address SAN has invalid length {}",
                bytes.len()
            ))
        }),
    }
}

impl ToAndFromX509Extension for SubjectAltName {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::SubjectAltName::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>, CertFuncsError> {
        let mut names = Vec::with_capacity(self.dns_names.len() + self.ip_addresses.len());
        for name in &self.dns_names {
            let dns = Ia5String::new(name).map_err(|e| {
                CertFuncsError::InvalidInput(format!("invalid DNS name {name}: {e}"))
            })?;
            names.push(GeneralName::DnsName(dns));
        }
        for ip in &self.ip_addresses {
            let octets = match ip {
                IpAddr::V4(v4) => v4.octets().to_vec(),
                IpAddr::V6(v6) => v6.octets().to_vec(),
            };
            names.push(GeneralName::IpAddress(OctetString::new(octets)?));
        }

        Ok(x509_cert::ext::pkix::SubjectAltName(names).to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CertFuncsError> {
        let mut decoded = Self::default();
        for name in x509_cert::ext::pkix::SubjectAltName::from_der(extension)?.0 {
            match name {
                GeneralName::DnsName(dns) => decoded.dns_names.push(dns.to_string()),
                GeneralName::IpAddress(octets) => {
                    decoded.ip_addresses.push(ip_from_octets(octets.as_bytes())?)
                }
                _ => {}
            }
        }
        Ok(decoded)
    }
}

/// CA flag and optional path length limit.
#[derive(Debug, Default)]
pub struct BasicConstraints {
    pub is_ca: bool,
    pub max_path_length: Option<u8>,
}

impl ToAndFromX509Extension for BasicConstraints {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::BasicConstraints::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>, CertFuncsError> {
        Ok(x509_cert::ext::pkix::BasicConstraints {
            ca: self.is_ca,
            path_len_constraint: self.max_path_length,
        }
        .to_der()?)
    }

    fn from_x509_extension_value(der_bytes: &[u8]) -> Result<Self, CertFuncsError> {
        let constraints = x509_cert::ext::pkix::BasicConstraints::from_der(der_bytes)?;
        Ok(Self {
            is_ca: constraints.ca,
            max_path_length: constraints.path_len_constraint,
        })
    }
}

pub use der::flagset::FlagSet;
use x509_cert::ext::pkix::KeyUsage as X509KeyUsage;
pub use x509_cert::ext::pkix::KeyUsages;

/// Key usage bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyUsage(pub FlagSet<KeyUsages>);

impl ToAndFromX509Extension for KeyUsage {
    const OID: ObjectIdentifier = <X509KeyUsage as AssociatedOid>::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>, CertFuncsError> {
        Ok(X509KeyUsage::from(self.0).to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CertFuncsError> {
        Ok(Self(X509KeyUsage::from_der(extension)?.0))
    }
}

/// Extended key usage purposes that leaf certificates are issued with.
#[derive(Debug, Clone, Default)]
pub struct ExtendedKeyUsage {
    pub usage: Vec<ExtendedKeyUsageOption>,
}

impl ToAndFromX509Extension for ExtendedKeyUsage {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::ExtendedKeyUsage::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>, CertFuncsError> {
        let purposes = self.usage.iter().copied().map(ObjectIdentifier::from).collect();
        Ok(x509_cert::ext::pkix::ExtendedKeyUsage(purposes).to_der()?)
    }

    /// Purposes other than server and client auth are dropped.
    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CertFuncsError> {
        let purposes = x509_cert::ext::pkix::ExtendedKeyUsage::from_der(extension)?.0;
        let usage = purposes
            .into_iter()
            .filter_map(|oid| match oid {
                const_oid::db::rfc5912::ID_KP_SERVER_AUTH => Some(ExtendedKeyUsageOption::ServerAuth),
                const_oid::db::rfc5912::ID_KP_CLIENT_AUTH => Some(ExtendedKeyUsageOption::ClientAuth),
                _ => None,
            })
            .collect();
        Ok(Self { usage })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendedKeyUsageOption {
    ServerAuth,
    ClientAuth,
}

impl From<ExtendedKeyUsageOption> for ObjectIdentifier {
    fn from(option: ExtendedKeyUsageOption) -> Self {
        match option {
            ExtendedKeyUsageOption::ServerAuth => const_oid::db::rfc5912::ID_KP_SERVER_AUTH,
            ExtendedKeyUsageOption::ClientAuth => const_oid::db::rfc5912::ID_KP_CLIENT_AUTH,
        }
    }
}

/// Identifier of the certified public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectKeyIdentifier {
    pub key_identifier: Vec<u8>,
}

impl ToAndFromX509Extension for SubjectKeyIdentifier {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::SubjectKeyIdentifier::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>, CertFuncsError> {
        let id = OctetString::new(self.key_identifier.as_slice())?;
        Ok(x509_cert::ext::pkix::SubjectKeyIdentifier(id).to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CertFuncsError> {
        let id = x509_cert::ext::pkix::SubjectKeyIdentifier::from_der(extension)?;
        Ok(Self {
            key_identifier: id.0.as_bytes().to_vec(),
        })
    }
}

/// Identifier of the issuing key, in key-identifier form only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityKeyIdentifier {
    pub key_identifier: Vec<u8>,
}

impl ToAndFromX509Extension for AuthorityKeyIdentifier {
    const OID: ObjectIdentifier = x509_cert::ext::pkix::AuthorityKeyIdentifier::OID;

    fn to_x509_extension_value(&self) -> Result<Vec<u8>, CertFuncsError> {
        Ok(x509_cert::ext::pkix::AuthorityKeyIdentifier {
            key_identifier: Some(OctetString::new(self.key_identifier.as_slice())?),
            authority_cert_issuer: None,
            authority_cert_serial_number: None,
        }
        .to_der()?)
    }

    fn from_x509_extension_value(extension: &[u8]) -> Result<Self, CertFuncsError> {
        let aki = x509_cert::ext::pkix::AuthorityKeyIdentifier::from_der(extension)?;
        let key_identifier = aki.key_identifier.ok_or_else(|| {
            CertFuncsError::DecodingError("authority key identifier has no key id".to_string())
        })?;
        Ok(Self {
            key_identifier: key_identifier.as_bytes().to_vec(),
        })
    }
}
