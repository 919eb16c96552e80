//! # certfuncs - Certificate Functions for Template Engines
//!
//! certfuncs generates private keys and X.509 certificates with the rustcrypto
//! libraries and exposes them as a catalog of template functions. Every call
//! is synchronous and returns PEM text.
//!
//! ## Supported Key Types
//!
//! - **RSA**: 4096-bit from `genPrivateKey`, 2048-bit when a certificate
//!   function generates its own key
//! - **DSA**: L=2048, N=256 parameters (generation and decoding only; DSA
//!   keys cannot sign certificates)
//! - **ECDSA**: P-256 for generation, P-256 and P-384 for decoding
//! - **Ed25519**: Edwards curve digital signature algorithm
//!
//! ## Quick Start
//!
//! ### Issuing a Certificate Authority and a Leaf
//!
//! ```rust
//! use certfuncs::{
//!     ca::generate_certificate_authority_with_key,
//!     cert::Certificate,
//!     key::KeyPair,
//!     signer::{LeafRequest, generate_signed_certificate_with_key},
//! };
//!
//! # fn main() -> Result<(), certfuncs::error::CertFuncsError> {
//! let ca_key = KeyPair::generate_ecdsa_p256().to_pem()?;
//! let ca = generate_certificate_authority_with_key(&ca_key, "Example CA", 365)?;
//!
//! let leaf_key = KeyPair::generate_ed25519().to_pem()?;
//! let request = LeafRequest {
//!     common_name: "server.example.com",
//!     ip_addresses: &["10.0.0.1"],
//!     dns_names: &["server.example.com"],
//!     valid_days: 90,
//! };
//! let leaf = generate_signed_certificate_with_key(&leaf_key, &request, &ca)?;
//!
//! let cert = Certificate::from_pem(&leaf.cert)?;
//! cert.verify_signed_by(&Certificate::from_pem(&ca.cert)?)?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Calling Functions by Template Name
//!
//! ```rust
//! use certfuncs::funcs::{Value, func_map};
//!
//! # fn main() -> Result<(), certfuncs::error::CertFuncsError> {
//! let funcs = func_map();
//! let key = funcs["genPrivateKey"](&[Value::from("ecdsa")])?;
//! let ca = funcs["genCAWithKey"](&[key, Value::from("Example CA"), Value::Int(30)])?;
//! assert!(ca.field("Cert").is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Everything except `genPrivateKey` returns a [`error::CertFuncsError`]:
//!
//! ```rust
//! use certfuncs::{error::CertFuncsError, key::KeyPair};
//!
//! match KeyPair::from_pem("invalid pem data") {
//!     Ok(_) => println!("Key decoded"),
//!     Err(CertFuncsError::DecodingError(msg)) => println!("Failed to decode key: {}", msg),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`key`]: Key generation, PEM encoding and decoding, signing
//! - [`cert`]: Certificate parameters, extensions and decoding
//! - [`issuer`]: Self-signing and CA signing
//! - [`ca`], [`signer`], [`custom`]: The certificate functions
//! - [`funcs`]: The template-facing function catalog
//! - [`error`]: Error types
//! - [`tbs_certificate`]: Low-level certificate structure

pub mod ca;
pub mod cert;
pub mod custom;
pub mod error;
pub mod funcs;
pub mod issuer;
pub mod key;
pub mod pem_utils;
pub mod signer;
pub mod tbs_certificate;
