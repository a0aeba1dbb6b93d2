//! Certificate bundle validation and merging.
//!
//! A bundle is accepted when every PEM block is a `CERTIFICATE` whose DER
//! parses as a trust anchor. Text before a block, such as the `# label`
//! lines `p11-kit extract --comment` writes, is skipped. A non-certificate
//! block, a malformed block, or trailing text holding no block rejects the
//! whole bundle.

use rustls::RootCertStore;
use rustls_pemfile::Item;
use thiserror::Error;

const PEM_BEGIN: &[u8] = b"-----BEGIN ";
const PEM_DASHES: &[u8] = b"-----";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PemError {
    #[error("bundle contains no PEM data")]
    Empty,

    #[error("failed to merge ca bundles, {bundle} trust bundle is empty")]
    EmptyInput { bundle: &'static str },

    #[error("unexpected data outside of a PEM block at byte {offset}")]
    UnexpectedContent { offset: usize },

    #[error("failed to parse PEM block {index}: {reason}")]
    Malformed { index: usize, reason: String },

    #[error("invalid PEM block {index} of type '{kind}', must be of type 'CERTIFICATE'")]
    UnsupportedBlock { index: usize, kind: String },

    #[error("failed to parse certificate {index}: {reason}")]
    InvalidCertificate { index: usize, reason: String },
}

/// Validates `data` as a sequence of PEM certificates and returns how many
/// it holds.
pub fn validate_certificate_bundle(data: &[u8]) -> Result<usize, PemError> {
    if data.iter().all(u8::is_ascii_whitespace) {
        return Err(PemError::Empty);
    }

    let mut roots = RootCertStore::empty();
    let mut rest = data;
    let mut index = 0;

    loop {
        let Some(start) = find_block_start(rest) else {
            let trailing = rest.trim_ascii_start();
            if trailing.is_empty() {
                break;
            }
            return Err(PemError::UnexpectedContent {
                offset: data.len() - trailing.len(),
            });
        };

        let block = &rest[start..];
        index += 1;

        let (item, tail) = match rustls_pemfile::read_one_from_slice(block) {
            Ok(Some(found)) => found,
            Ok(None) => {
                return Err(PemError::UnsupportedBlock {
                    index,
                    kind: section_label(block),
                });
            }
            Err(e) => {
                return Err(PemError::Malformed {
                    index,
                    reason: format!("{e:?}"),
                });
            }
        };

        // read_one_from_slice skips sections it does not know and ends a
        // section on any line that starts with the END marker. Any BEGIN
        // marker past the first in the consumed bytes is a lost section.
        let consumed = &block[..block.len() - tail.len()];
        let markers = begin_marker_positions(consumed);
        if markers
            .iter()
            .any(|&at| at != 0 && consumed[at - 1] != b'\n')
        {
            return Err(PemError::Malformed {
                index,
                reason: "BEGIN marker does not start a line".to_string(),
            });
        }
        if markers.len() != 1 {
            let kind = section_label(block);
            if kind == "CERTIFICATE" {
                return Err(PemError::Malformed {
                    index,
                    reason: "missing END marker before the next BEGIN marker".to_string(),
                });
            }
            return Err(PemError::UnsupportedBlock { index, kind });
        }

        match item {
            Item::X509Certificate(der) => {
                roots
                    .add(der)
                    .map_err(|e| PemError::InvalidCertificate {
                        index,
                        reason: e.to_string(),
                    })?;
            }
            other => {
                return Err(PemError::UnsupportedBlock {
                    index,
                    kind: item_label(&other).to_string(),
                });
            }
        }

        rest = tail;
    }

    Ok(roots.len())
}

/// Concatenates `additional` followed by `system` and validates the result.
/// The returned bytes are exactly the two inputs back to back.
pub fn merge_trust_bundles(additional: &[u8], system: &[u8]) -> Result<Vec<u8>, PemError> {
    if additional.is_empty() {
        return Err(PemError::EmptyInput {
            bundle: "additional",
        });
    }
    if system.is_empty() {
        return Err(PemError::EmptyInput { bundle: "system" });
    }

    let mut merged = Vec::with_capacity(additional.len() + system.len());
    merged.extend_from_slice(additional);
    merged.extend_from_slice(system);

    validate_certificate_bundle(&merged)?;

    Ok(merged)
}

fn begin_marker_positions(data: &[u8]) -> Vec<usize> {
    data.windows(PEM_BEGIN.len())
        .enumerate()
        .filter(|(_, window)| *window == PEM_BEGIN)
        .map(|(at, _)| at)
        .collect()
}

/// Offset of the first BEGIN marker that starts a line.
fn find_block_start(data: &[u8]) -> Option<usize> {
    begin_marker_positions(data)
        .into_iter()
        .find(|&at| at == 0 || data[at - 1] == b'\n')
}

fn section_label(block: &[u8]) -> String {
    let label = &block[PEM_BEGIN.len().min(block.len())..];
    let end = label
        .windows(PEM_DASHES.len())
        .position(|window| window == PEM_DASHES)
        .unwrap_or(label.len());

    String::from_utf8_lossy(&label[..end]).into_owned()
}

fn item_label(item: &Item) -> &'static str {
    match item {
        Item::X509Certificate(_) => "CERTIFICATE",
        Item::Pkcs1Key(_) => "RSA PRIVATE KEY",
        Item::Pkcs8Key(_) => "PRIVATE KEY",
        Item::Sec1Key(_) => "EC PRIVATE KEY",
        Item::Crl(_) => "X509 CRL",
        Item::Csr(_) => "CERTIFICATE REQUEST",
        _ => "UNKNOWN",
    }
}
