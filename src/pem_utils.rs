use crate::error::{CertFuncsError, Result};

pub const CERTIFICATE_LABEL: &str = "CERTIFICATE";
pub const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";

/// Convert DER‑encoded data into a PEM‑encoded string with the provided label.
pub fn der_to_pem(der: &[u8], label: &str) -> String {
    let pem = pem::Pem::new(label, der);
    pem::encode_config(&pem, pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF))
}

/// Parse the first PEM block in `pem_str`, returning its label and DER contents.
///
/// Text surrounding the block is ignored.
pub fn parse_pem_block(pem_str: &str) -> Result<(String, Vec<u8>)> {
    let block = pem::parse(pem_str)
        .map_err(|e| CertFuncsError::DecodingError(format!("no PEM data in input: {e}")))?;
    Ok((block.tag().to_string(), block.contents().to_vec()))
}

/// Convert a PEM‑encoded string to DER‑encoded bytes, requiring the given label.
pub fn pem_to_der(pem_str: &str, expected_label: &str) -> Result<Vec<u8>> {
    let (label, der) = parse_pem_block(pem_str)?;
    if label != expected_label {
        return Err(CertFuncsError::DecodingError(format!(
            "expected PEM block of type {expected_label}, found {label}"
        )));
    }
    Ok(der)
}
