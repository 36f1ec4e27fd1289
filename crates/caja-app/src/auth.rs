//! # Administrator Gate
//!
//! In-memory password check gating administrative actions: product edit
//! and delete, cart-line removal, and returns. A wrong password reports
//! [`crate::error::AppError::Unauthorized`] and the gated action is never
//! invoked; the operator may retry inline.

use crate::error::{AppError, AppResult};

/// The admin password gate.
#[derive(Debug, Clone)]
pub struct AdminGate {
    password: String,
}

impl AdminGate {
    /// Builds the gate with the configured password.
    pub fn new(password: impl Into<String>) -> Self {
        AdminGate {
            password: password.into(),
        }
    }

    /// Checks a typed password.
    pub fn verify(&self, input: &str) -> AppResult<()> {
        if input.trim() == self.password {
            Ok(())
        } else {
            Err(AppError::Unauthorized)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
