mod util;

use certfuncs::funcs::gen_private_key;
use certfuncs::signer::{LeafRequest, generate_signed_certificate_with_key};

/// An independent parser sees the CA as a version 3 CA that may sign certificates.
#[test]
fn x509_parser_reads_ca() {
    util::init_tracing();
    let ca = util::generate_ca_cert("ed25519");

    let block = util::pem_block(&ca.cert);
    let cert = util::parse_pem_cert(&block);

    assert_eq!(cert.version(), x509_parser::x509::X509Version::V3);
    assert!(cert.is_ca());
    assert_eq!(util::common_name(cert.subject()), "myca.local");
    assert_eq!(util::common_name(cert.issuer()), "myca.local");
    assert!(cert.raw_serial()[0] & 0x80 == 0, "serial must be positive");

    let key_usage = cert.key_usage().unwrap().unwrap();
    assert!(key_usage.critical);
    assert!(key_usage.value.key_cert_sign());
    assert!(key_usage.value.digital_signature());
    assert!(cert.extended_key_usage().unwrap().is_none());
    assert!(cert.subject_alternative_name().unwrap().is_none());
}

/// An independent parser sees the leaf's SANs, usages and issuer.
#[test]
fn x509_parser_reads_signed_leaf() {
    util::init_tracing();
    let ca = util::generate_ca_cert("ecdsa");
    let key = gen_private_key("ed25519");
    let request = LeafRequest {
        common_name: "server.myca.local",
        ip_addresses: &["10.0.0.1", "2001:db8::1"],
        dns_names: &["server.myca.local", "alt.myca.local"],
        valid_days: 30,
    };
    let signed = generate_signed_certificate_with_key(&key, &request, &ca).unwrap();

    let block = util::pem_block(&signed.cert);
    let cert = util::parse_pem_cert(&block);

    assert!(!cert.is_ca());
    assert_eq!(util::common_name(cert.subject()), "server.myca.local");
    assert_eq!(util::common_name(cert.issuer()), "myca.local");

    let (dns, ips) = util::subject_alt_names(&cert);
    assert_eq!(dns, vec!["server.myca.local", "alt.myca.local"]);
    assert_eq!(
        ips,
        vec![
            vec![10, 0, 0, 1],
            vec![0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        ]
    );

    let key_usage = cert.key_usage().unwrap().unwrap();
    assert!(!key_usage.value.key_cert_sign());
    assert!(key_usage.value.key_encipherment());
    let eku = cert.extended_key_usage().unwrap().unwrap();
    assert!(eku.value.server_auth);
    assert!(eku.value.client_auth);

    let validity = cert.validity();
    assert_eq!(
        validity.not_after.timestamp() - validity.not_before.timestamp(),
        30 * 86_400
    );
}

/// The leaf's authority key identifier points at the CA's subject key identifier.
#[test]
fn x509_parser_links_key_identifiers() {
    use x509_parser::extensions::ParsedExtension;

    util::init_tracing();
    let ca = util::generate_ca_cert("ed25519");
    let key = gen_private_key("ecdsa");
    let request = LeafRequest::<&str, &str> {
        common_name: "leaf",
        ip_addresses: &[],
        dns_names: &[],
        valid_days: 1,
    };
    let signed = generate_signed_certificate_with_key(&key, &request, &ca).unwrap();

    let ca_block = util::pem_block(&ca.cert);
    let ca_cert = util::parse_pem_cert(&ca_block);
    let leaf_block = util::pem_block(&signed.cert);
    let leaf = util::parse_pem_cert(&leaf_block);

    let ski = ca_cert
        .extensions()
        .iter()
        .find_map(|ext| match ext.parsed_extension() {
            ParsedExtension::SubjectKeyIdentifier(id) => Some(id.0.to_vec()),
            _ => None,
        })
        .unwrap();
    let aki = leaf
        .extensions()
        .iter()
        .find_map(|ext| match ext.parsed_extension() {
            ParsedExtension::AuthorityKeyIdentifier(aki) => {
                aki.key_identifier.as_ref().map(|id| id.0.to_vec())
            }
            _ => None,
        })
        .unwrap();
    assert_eq!(ski, aki);
}
