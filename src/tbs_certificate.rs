use der::asn1::{GeneralizedTime, OctetString, UtcTime};
use x509_cert::Version;
use x509_cert::certificate::TbsCertificateInner;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::SubjectPublicKeyInfoOwned;
use x509_cert::time::Time;

use crate::cert::SignatureAlgorithm;
use crate::cert::params::{ExtensionParam, Validity};
use crate::error::{CertFuncsError, Result};

/// The signed portion of a certificate, before DER encoding.
///
/// Names are carried as ready-made X.509 `Name`s so that a CA's subject is
/// copied into the issuer field byte for byte.
pub struct TbsCertificate {
    /// Unsigned big-endian serial number.
    pub serial_number: Vec<u8>,
    pub signature_algorithm: SignatureAlgorithm,
    pub issuer: Name,
    pub validity: Validity,
    pub subject: Name,
    pub subject_public_key_info: SubjectPublicKeyInfoOwned,
    pub extensions: Vec<ExtensionParam>,
}

impl TbsCertificate {
    /// Assembles the version 3 `TBSCertificate`.
    pub fn to_tbs_certificate_inner(&self) -> Result<TbsCertificateInner> {
        let algorithm_id: x509_cert::spki::AlgorithmIdentifierOwned =
            self.signature_algorithm.into();

        let extensions = self
            .extensions
            .iter()
            .map(|ext| {
                Ok(x509_cert::ext::Extension {
                    extn_id: ext.oid,
                    critical: ext.critical,
                    extn_value: OctetString::new(ext.value.clone())?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let validity = x509_cert::time::Validity {
            not_before: to_x509_time(self.validity.not_before)?,
            not_after: to_x509_time(self.validity.not_after)?,
        };

        let serial_number = SerialNumber::new(self.serial_number.as_slice())?;

        Ok(TbsCertificateInner {
            version: Version::V3,
            serial_number,
            signature: algorithm_id,
            issuer: self.issuer.clone(),
            validity,
            subject: self.subject.clone(),
            subject_public_key_info: self.subject_public_key_info.clone(),
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: Some(extensions),
        })
    }
}

/// RFC 5280 §4.1.2.5: UTCTime through 2049, GeneralizedTime from 2050 on.
fn to_x509_time(time: time::OffsetDateTime) -> Result<Time> {
    let date_time = der::DateTime::from_system_time(time.into())
        .map_err(|e| CertFuncsError::InvalidInput(format!("time {time} out of range: {e}")))?;
    if date_time.year() < 2050 {
        Ok(Time::UtcTime(UtcTime::from_date_time(date_time)?))
    } else {
        Ok(Time::GeneralTime(GeneralizedTime::from_date_time(date_time)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn times_switch_to_generalized_in_2050() {
        // 2049-12-31T23:59:59Z and one second later.
        let before = time::OffsetDateTime::from_unix_timestamp(2_524_607_999).unwrap();
        let after = time::OffsetDateTime::from_unix_timestamp(2_524_608_000).unwrap();
        assert!(matches!(to_x509_time(before).unwrap(), Time::UtcTime(_)));
        assert!(matches!(to_x509_time(after).unwrap(), Time::GeneralTime(_)));
    }
}
