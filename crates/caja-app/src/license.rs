//! # License Gate
//!
//! One-time activation: the first launch asks for the license key,
//! hashes it, and - on a match against the master hash - drops a
//! `license.key` file in the data directory. Every later launch just
//! checks that file. This gates startup only; it is not a cryptographic
//! protection scheme.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::warn;

use crate::error::{AppError, AppResult};

/// Activation file name inside the data directory.
pub const LICENSE_FILE: &str = "license.key";

/// SHA-256 of the master activation key.
const ACTIVATION_HASH: &str = "9846ae7fa5b1432460cda6808e7331109e9dccbe812d3c86bea705c56dc33df5";

/// Hashes a typed key (whitespace-trimmed, so a pasted trailing newline
/// doesn't fail activation).
fn hash_key(key: &str) -> String {
    let digest = Sha256::digest(key.trim().as_bytes());
    format!("{digest:x}")
}

/// Whether a typed key is the activation key.
pub fn verify_key(input_key: &str) -> bool {
    hash_key(input_key) == ACTIVATION_HASH
}

/// Whether a valid activation file exists at `path`.
pub fn check_license_file(path: &Path) -> bool {
    match fs::read_to_string(path) {
        Ok(stored) => stored.trim() == ACTIVATION_HASH,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => false,
        Err(err) => {
            warn!(error = %err, path = %path.display(), "License file unreadable");
            false
        }
    }
}

/// Validates `input_key` and writes the activation file.
pub fn activate(path: &Path, input_key: &str) -> AppResult<()> {
    if !verify_key(input_key) {
        return Err(AppError::InvalidLicenseKey);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, ACTIVATION_HASH)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
