//! DSA private keys in the traditional `DSA PRIVATE KEY` layout.

use der::asn1::Uint;
use der::{Decode, Encode, Sequence};
use dsa::{BigUint, Components, KeySize, SigningKey, VerifyingKey};

use crate::error::{CertFuncsError, Result};

/// `SEQUENCE { version, p, q, g, y, x }`, as written by OpenSSL.
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
struct DsaPrivateKeyDocument {
    version: u8,
    p: Uint,
    q: Uint,
    g: Uint,
    y: Uint,
    x: Uint,
}

fn to_uint(value: &BigUint) -> Result<Uint> {
    Ok(Uint::new(&value.to_bytes_be())?)
}

fn from_uint(value: &Uint) -> BigUint {
    BigUint::from_bytes_be(value.as_bytes())
}

fn invalid(err: impl std::fmt::Display) -> CertFuncsError {
    CertFuncsError::DecodingError(format!("invalid DSA private key: {err}"))
}

/// Generate a fresh 2048/256 parameter set and a key pair over it.
pub(crate) fn generate() -> SigningKey {
    let mut rng = rand_core::OsRng;
    let components = Components::generate(&mut rng, KeySize::DSA_2048_256);
    SigningKey::generate(&mut rng, components)
}

pub(crate) fn to_der(key: &SigningKey) -> Result<Vec<u8>> {
    let verifying_key = key.verifying_key();
    let components = verifying_key.components();
    let document = DsaPrivateKeyDocument {
        version: 0,
        p: to_uint(components.p())?,
        q: to_uint(components.q())?,
        g: to_uint(components.g())?,
        y: to_uint(verifying_key.y())?,
        x: to_uint(key.x())?,
    };
    document
        .to_der()
        .map_err(|e| CertFuncsError::EncodingError(e.to_string()))
}

pub(crate) fn from_der(der: &[u8]) -> Result<SigningKey> {
    let document = DsaPrivateKeyDocument::from_der(der)?;
    if document.version != 0 {
        return Err(CertFuncsError::DecodingError(format!(
            "unsupported DSA private key version {}",
            document.version
        )));
    }

    let components = Components::from_components(
        from_uint(&document.p),
        from_uint(&document.q),
        from_uint(&document.g),
    )
    .map_err(invalid)?;
    let verifying_key =
        VerifyingKey::from_components(components, from_uint(&document.y)).map_err(invalid)?;
    SigningKey::from_components(verifying_key, from_uint(&document.x)).map_err(invalid)
}
