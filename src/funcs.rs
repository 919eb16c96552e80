//! The certificate functions as a name-indexed catalog for a template engine.
//!
//! Template engines pass loosely typed arguments, so every function here takes
//! a slice of [`Value`]s and coerces them into the typed calls of the
//! [`ca`](crate::ca), [`signer`](crate::signer) and [`custom`](crate::custom)
//! modules.

use std::collections::BTreeMap;
use std::fmt;

use crate::ca::{generate_certificate_authority, generate_certificate_authority_with_key};
use crate::cert::SignedCertificate;
use crate::custom::build_custom_certificate;
use crate::error::{CertFuncsError, Result};
use crate::key::{KeyAlgorithm, KeyPair};
use crate::signer::{
    LeafRequest, generate_self_signed_certificate, generate_self_signed_certificate_with_key,
    generate_signed_certificate, generate_signed_certificate_with_key,
};

/// A dynamically typed template value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Int(i64),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Cert(SignedCertificate),
}

impl Value {
    /// Looks up a named field, as a template's `.Cert` or `.Key` would.
    pub fn field(&self, name: &str) -> Option<Value> {
        match (self, name) {
            (Value::Cert(signed), "Cert") => Some(Value::Str(signed.cert.clone())),
            (Value::Cert(signed), "Key") => Some(Value::Str(signed.key.clone())),
            (Value::Map(map), name) => map.get(name).cloned(),
            _ => None,
        }
    }

    /// The string content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Int(_) => "int",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Cert(_) => "certificate",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("map[")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{key}:{value}")?;
                }
                f.write_str("]")
            }
            Value::Cert(signed) => write!(f, "{{{} {}}}", signed.cert, signed.key),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<SignedCertificate> for Value {
    fn from(value: SignedCertificate) -> Self {
        Value::Cert(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

/// Signature shared by every catalog entry.
pub type TemplateFunc = fn(&[Value]) -> Result<Value>;

/// The certificate functions keyed by their template names.
pub fn func_map() -> BTreeMap<&'static str, TemplateFunc> {
    let mut map: BTreeMap<&'static str, TemplateFunc> = BTreeMap::new();
    map.insert("genPrivateKey", gen_private_key_func);
    map.insert("genCA", gen_ca);
    map.insert("genCAWithKey", gen_ca_with_key);
    map.insert("genSelfSignedCert", gen_self_signed_cert);
    map.insert("genSelfSignedCertWithKey", gen_self_signed_cert_with_key);
    map.insert("genSignedCert", gen_signed_cert);
    map.insert("genSignedCertWithKey", gen_signed_cert_with_key);
    map.insert("buildCustomCert", build_custom_cert);
    map.insert("getPubKey", get_pub_key);
    map
}

/// Generates a PEM private key for the algorithm name `algorithm`.
///
/// Never fails: an unknown name yields `Unknown type <name>` and a generation
/// failure yields its message, so templates render the problem inline.
pub fn gen_private_key(algorithm: &str) -> String {
    let generated = algorithm
        .parse::<KeyAlgorithm>()
        .and_then(KeyPair::generate)
        .and_then(|key| key.to_pem());
    match generated {
        Ok(pem) => pem,
        Err(err) => {
            tracing::warn!(%algorithm, error = %err, "genPrivateKey failed");
            err.to_string()
        }
    }
}

/// PEM `PUBLIC KEY` for the private key `key_pem`.
pub fn get_pub_key_pem(key_pem: &str) -> Result<String> {
    KeyPair::from_pem(key_pem)?.public_key_pem()
}

fn check_arity(name: &str, args: &[Value], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(CertFuncsError::InvalidInput(format!(
            "{name}: expected {expected} arguments, got {}",
            args.len()
        )));
    }
    Ok(())
}

fn wrong_type(name: &str, position: usize, wanted: &str, got: &Value) -> CertFuncsError {
    CertFuncsError::InvalidInput(format!(
        "{name}: argument {position} must be a {wanted}, got {}",
        got.kind()
    ))
}

fn string_arg(name: &str, args: &[Value], position: usize) -> Result<String> {
    match &args[position] {
        Value::Str(s) => Ok(s.clone()),
        other => Err(wrong_type(name, position, "string", other)),
    }
}

fn int_arg(name: &str, args: &[Value], position: usize) -> Result<i64> {
    match &args[position] {
        Value::Int(i) => Ok(*i),
        Value::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| wrong_type(name, position, "number", &args[position])),
        other => Err(wrong_type(name, position, "number", other)),
    }
}

fn list_arg(name: &str, args: &[Value], position: usize) -> Result<Vec<String>> {
    match &args[position] {
        Value::List(items) => Ok(items.iter().map(ToString::to_string).collect()),
        other => Err(wrong_type(name, position, "list", other)),
    }
}

fn cert_arg(name: &str, args: &[Value], position: usize) -> Result<SignedCertificate> {
    let value = &args[position];
    if let Value::Cert(signed) = value {
        return Ok(signed.clone());
    }
    let text = |field: &str| {
        value
            .field(field)
            .and_then(|v| v.as_str().map(str::to_string))
    };
    match (value, text("Cert"), text("Key")) {
        (Value::Map(_), Some(cert), Some(key)) => Ok(SignedCertificate { cert, key }),
        _ => Err(wrong_type(name, position, "certificate", value)),
    }
}

fn gen_private_key_func(args: &[Value]) -> Result<Value> {
    check_arity("genPrivateKey", args, 1)?;
    let algorithm = string_arg("genPrivateKey", args, 0)?;
    Ok(Value::Str(gen_private_key(&algorithm)))
}

fn gen_ca(args: &[Value]) -> Result<Value> {
    const NAME: &str = "genCA";
    check_arity(NAME, args, 2)?;
    let common_name = string_arg(NAME, args, 0)?;
    let valid_days = int_arg(NAME, args, 1)?;
    Ok(generate_certificate_authority(&common_name, valid_days)?.into())
}

fn gen_ca_with_key(args: &[Value]) -> Result<Value> {
    const NAME: &str = "genCAWithKey";
    check_arity(NAME, args, 3)?;
    let key = string_arg(NAME, args, 0)?;
    let common_name = string_arg(NAME, args, 1)?;
    let valid_days = int_arg(NAME, args, 2)?;
    Ok(generate_certificate_authority_with_key(&key, &common_name, valid_days)?.into())
}

/// Leaf inputs `cn, ips, dnsNames, validDays` starting at `offset`.
struct LeafArgs {
    common_name: String,
    ip_addresses: Vec<String>,
    dns_names: Vec<String>,
    valid_days: i64,
}

impl LeafArgs {
    fn parse(name: &str, args: &[Value], offset: usize) -> Result<Self> {
        Ok(LeafArgs {
            common_name: string_arg(name, args, offset)?,
            ip_addresses: list_arg(name, args, offset + 1)?,
            dns_names: list_arg(name, args, offset + 2)?,
            valid_days: int_arg(name, args, offset + 3)?,
        })
    }

    fn request(&self) -> LeafRequest<'_, String, String> {
        LeafRequest {
            common_name: &self.common_name,
            ip_addresses: &self.ip_addresses,
            dns_names: &self.dns_names,
            valid_days: self.valid_days,
        }
    }
}

fn gen_self_signed_cert(args: &[Value]) -> Result<Value> {
    const NAME: &str = "genSelfSignedCert";
    check_arity(NAME, args, 4)?;
    let leaf = LeafArgs::parse(NAME, args, 0)?;
    Ok(generate_self_signed_certificate(&leaf.request())?.into())
}

fn gen_self_signed_cert_with_key(args: &[Value]) -> Result<Value> {
    const NAME: &str = "genSelfSignedCertWithKey";
    check_arity(NAME, args, 5)?;
    let key = string_arg(NAME, args, 0)?;
    let leaf = LeafArgs::parse(NAME, args, 1)?;
    Ok(generate_self_signed_certificate_with_key(&key, &leaf.request())?.into())
}

fn gen_signed_cert(args: &[Value]) -> Result<Value> {
    const NAME: &str = "genSignedCert";
    check_arity(NAME, args, 5)?;
    let leaf = LeafArgs::parse(NAME, args, 0)?;
    let ca = cert_arg(NAME, args, 4)?;
    Ok(generate_signed_certificate(&leaf.request(), &ca)?.into())
}

fn gen_signed_cert_with_key(args: &[Value]) -> Result<Value> {
    const NAME: &str = "genSignedCertWithKey";
    check_arity(NAME, args, 6)?;
    let key = string_arg(NAME, args, 0)?;
    let leaf = LeafArgs::parse(NAME, args, 1)?;
    let ca = cert_arg(NAME, args, 5)?;
    Ok(generate_signed_certificate_with_key(&key, &leaf.request(), &ca)?.into())
}

fn build_custom_cert(args: &[Value]) -> Result<Value> {
    const NAME: &str = "buildCustomCert";
    check_arity(NAME, args, 2)?;
    let cert = string_arg(NAME, args, 0)?;
    let key = string_arg(NAME, args, 1)?;
    Ok(build_custom_certificate(&cert, &key)?.into())
}

fn get_pub_key(args: &[Value]) -> Result<Value> {
    check_arity("getPubKey", args, 1)?;
    let key = string_arg("getPubKey", args, 0)?;
    Ok(Value::Str(get_pub_key_pem(&key)?))
}
