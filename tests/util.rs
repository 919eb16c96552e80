#![allow(dead_code)]

use certfuncs::ca::generate_certificate_authority_with_key;
use certfuncs::cert::SignedCertificate;
use certfuncs::funcs::gen_private_key;
use x509_parser::certificate::X509Certificate;
use x509_parser::pem::Pem;

/// Routes `tracing` output through the test harness so `--nocapture` shows it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("certfuncs=debug")),
        )
        .with_test_writer()
        .try_init();
}

/// A CA whose key was produced by `genPrivateKey(algorithm)`.
pub fn generate_ca_cert(algorithm: &str) -> SignedCertificate {
    let key = gen_private_key(algorithm);
    generate_certificate_authority_with_key(&key, "myca.local", 365).unwrap()
}

/// Decodes the PEM block so it can be inspected with [`parse_pem_cert`].
pub fn pem_block(pem: &str) -> Pem {
    let (_, block) = x509_parser::pem::parse_x509_pem(pem.as_bytes()).unwrap();
    block
}

/// Parses a certificate with x509-parser, independently of certfuncs' own decoder.
pub fn parse_pem_cert(block: &Pem) -> X509Certificate<'_> {
    block.parse_x509().unwrap()
}

pub fn common_name(name: &x509_parser::x509::X509Name<'_>) -> String {
    name.iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// DNS and IP SANs, in certificate order.
pub fn subject_alt_names(cert: &X509Certificate<'_>) -> (Vec<String>, Vec<Vec<u8>>) {
    use x509_parser::extensions::GeneralName;

    let mut dns = Vec::new();
    let mut ips = Vec::new();
    if let Some(san) = cert.subject_alternative_name().unwrap() {
        for name in &san.value.general_names {
            match name {
                GeneralName::DNSName(d) => dns.push(d.to_string()),
                GeneralName::IPAddress(ip) => ips.push(ip.to_vec()),
                _ => {}
            }
        }
    }
    (dns, ips)
}
