use std::net::IpAddr;

use bon::Builder;
use const_oid::ObjectIdentifier;
use der::asn1::SetOfVec;
use rand::RngCore;
use time::Duration;
use time::OffsetDateTime;
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{RdnSequence, RelativeDistinguishedName};

use super::extensions::{
    ExtendedKeyUsageOption, FlagSet, KeyUsage, KeyUsages, ToAndFromX509Extension,
};
use crate::error::{CertFuncsError, Result};

/// Number of random bytes in a generated serial number (128 bits).
pub const SERIAL_NUMBER_BYTES: usize = 16;

const COMMON_NAME: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");

/// Unsigned certificate description consumed by an [`Issuer`](crate::issuer::Issuer).
///
/// Key usage is not stored: it follows from `is_ca`, so a CA template always
/// carries the cert-sign bit and a leaf template never does.
///
/// # Fields
/// * `subject` - The distinguished name of the certificate subject.
/// * `serial_number` - Unsigned big-endian serial number bytes.
/// * `validity` - The `notBefore`/`notAfter` window.
/// * `ip_addresses` - IP subject alternative names, in order.
/// * `dns_names` - DNS subject alternative names, in order.
/// * `is_ca` - Indicates if the certificate is a CA.
#[derive(Clone, Debug, Builder)]
pub struct CertificateTemplate {
    pub subject: DistinguishedName,
    #[builder(default = random_serial_number())]
    pub serial_number: Vec<u8>,
    pub validity: Validity,
    #[builder(default)]
    pub ip_addresses: Vec<IpAddr>,
    #[builder(default)]
    pub dns_names: Vec<String>,
    #[builder(default)]
    pub is_ca: bool,
}

impl CertificateTemplate {
    /// Builds a template from the values the certificate functions receive.
    ///
    /// `ip_addresses` must all parse as IPv4 or IPv6 addresses and `valid_days`
    /// must be at least one so that `notAfter` falls after `notBefore`.
    pub fn new<I, D>(
        common_name: &str,
        valid_days: i64,
        ip_addresses: &[I],
        dns_names: &[D],
        is_ca: bool,
    ) -> Result<Self>
    where
        I: AsRef<str>,
        D: AsRef<str>,
    {
        let ip_addresses = ip_addresses
            .iter()
            .map(|ip| {
                ip.as_ref().parse::<IpAddr>().map_err(|_| {
                    CertFuncsError::InvalidInput(format!("error parsing ip: {}", ip.as_ref()))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CertificateTemplate::builder()
            .subject(
                DistinguishedName::builder()
                    .common_name(common_name.to_string())
                    .build(),
            )
            .validity(Validity::for_days(valid_days)?)
            .ip_addresses(ip_addresses)
            .dns_names(dns_names.iter().map(|d| d.as_ref().to_string()).collect())
            .is_ca(is_ca)
            .build())
    }

    /// Template for a certificate authority, which carries no SANs.
    pub fn for_ca(common_name: &str, valid_days: i64) -> Result<Self> {
        Self::new::<&str, &str>(common_name, valid_days, &[], &[], true)
    }

    /// Key usage bits implied by the CA flag.
    pub fn key_usage(&self) -> KeyUsage {
        let mut flags: FlagSet<KeyUsages> = KeyUsages::DigitalSignature | KeyUsages::KeyEncipherment;
        if self.is_ca {
            flags |= KeyUsages::KeyCertSign;
        }
        KeyUsage(flags)
    }

    /// Extended key usages implied by the CA flag; CAs get none.
    pub fn extended_key_usage(&self) -> Vec<ExtendedKeyUsageOption> {
        if self.is_ca {
            Vec::new()
        } else {
            vec![
                ExtendedKeyUsageOption::ServerAuth,
                ExtendedKeyUsageOption::ClientAuth,
            ]
        }
    }
}

/// Generates a strictly positive serial number from 128 random bits.
pub fn random_serial_number() -> Vec<u8> {
    let mut rng = rand::rng();
    let mut serial = vec![0u8; SERIAL_NUMBER_BYTES];
    loop {
        rng.fill_bytes(&mut serial);
        if serial.iter().any(|b| *b != 0) {
            return serial;
        }
    }
}

/// Distinguished name parameters for building an X.509 certificate.
///
/// The certificate functions only ever set a common name.
#[derive(Clone, Debug, Builder, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    pub common_name: String,
}

impl DistinguishedName {
    /// Converts the distinguished name to an X.509-compatible format.
    ///
    /// An empty common name yields an empty name, as there is nothing to encode.
    pub fn as_x509_name(&self) -> Result<x509_cert::name::DistinguishedName> {
        if self.common_name.is_empty() {
            return Ok(RdnSequence(Vec::new()));
        }
        let value = der::Any::new(der::Tag::Utf8String, self.common_name.as_bytes())?;
        let attribute = AttributeTypeAndValue {
            oid: COMMON_NAME,
            value,
        };
        let rdn = RelativeDistinguishedName(SetOfVec::try_from(vec![attribute])?);
        Ok(RdnSequence(vec![rdn]))
    }

    /// Creates a `DistinguishedName` from an X.509-compatible format.
    ///
    /// Attributes other than the common name are ignored.
    pub fn from_x509_name(x509dn: &x509_cert::name::DistinguishedName) -> Self {
        let common_name = x509dn
            .0
            .iter()
            .flat_map(|rdn| rdn.0.iter())
            .filter(|attr| attr.oid == COMMON_NAME)
            .find_map(|attr| {
                attr.value
                    .decode_as::<String>()
                    .ok()
                    .or_else(|| {
                        attr.value
                            .decode_as::<der::asn1::PrintableStringRef<'_>>()
                            .ok()
                            .map(|s| s.to_string())
                    })
            })
            .unwrap_or_default();

        DistinguishedName { common_name }
    }
}

/// Certificate validity period.
///
/// This struct represents the `notBefore` and `notAfter` fields in a certificate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    /// Creates a validity period starting now for the given number of days.
    pub fn for_days(days: i64) -> Result<Self> {
        if days < 1 {
            return Err(CertFuncsError::InvalidInput(format!(
                "validity must be at least one day, got {days}"
            )));
        }
        let now = OffsetDateTime::now_utc();
        let not_after = days
            .checked_mul(86_400)
            .and_then(|seconds| now.checked_add(Duration::seconds(seconds)))
            .ok_or_else(|| {
                CertFuncsError::InvalidInput(format!("validity of {days} days is out of range"))
            })?;
        Ok(Self {
            not_before: now,
            not_after,
        })
    }
}

/// Represents an X.509 extension.
///
/// This struct contains the OID, criticality, and value of an extension.
///
/// # Fields
/// * `oid` - The object identifier of the extension.
/// * `critical` - Indicates if the extension is critical.
/// * `value` - The DER-encoded value of the extension.
#[derive(Clone, Debug)]
pub struct ExtensionParam {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// DER-encoded extension value
    pub value: Vec<u8>,
}

impl ExtensionParam {
    /// Creates an `ExtensionParam` from a specific extension.
    pub fn from_extension<E: ToAndFromX509Extension>(extension: &E, critical: bool) -> Result<Self> {
        Ok(Self {
            oid: E::OID,
            critical,
            value: extension.to_x509_extension_value()?,
        })
    }
}
