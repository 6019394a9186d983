//! Private key file validation.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::errors::IdentityError;

const BEGIN_MARKER: &str = "-----BEGIN ";
const PRIVATE_KEY_MARKER: &str = "PRIVATE KEY-----";

/// Check that `path` is readable and its first line is a private-key header.
///
/// Any `-----BEGIN ... PRIVATE KEY-----` line counts, which covers OpenSSH,
/// PKCS#1/#8, EC, DSA and SSH2 exports, encrypted or not. Only the first line
/// is read; the key material itself is never loaded.
pub fn validate_private_key(path: &Path) -> Result<(), IdentityError> {
    let invalid_path = |source| IdentityError::InvalidKeyPath {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(invalid_path)?;
    let mut first_line = Vec::new();
    BufReader::new(file)
        .read_until(b'\n', &mut first_line)
        .map_err(invalid_path)?;

    if !is_private_key_header(&String::from_utf8_lossy(&first_line)) {
        debug!(path = %path.display(), "first line is not a private key header");
        return Err(IdentityError::InvalidKeyFormat(path.to_path_buf()));
    }
    Ok(())
}

fn is_private_key_header(line: &str) -> bool {
    line.find(BEGIN_MARKER)
        .is_some_and(|start| line[start..].contains(PRIVATE_KEY_MARKER))
}
