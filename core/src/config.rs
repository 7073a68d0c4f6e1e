//! Configuration for the payment gateway
//!
//! This module provides the Telr gateway configuration: an explicit
//! test/live mode and one credential pair per mode. A credential pair is
//! only considered present when both its store id and auth key are set.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Which Telr environment the backend talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayMode {
    /// Test environment (no real charges)
    Test,

    /// Live environment
    Live,
}

impl Default for GatewayMode {
    fn default() -> Self {
        GatewayMode::Test
    }
}

/// A store id / auth key pair for one gateway mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayCredentials {
    /// Telr store id
    pub store_id: String,

    /// Telr authentication key
    pub auth_key: String,
}

/// Telr gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelrConfig {
    /// Active gateway mode
    pub mode: GatewayMode,

    /// Credentials for test mode, if configured
    pub test: Option<GatewayCredentials>,

    /// Credentials for live mode, if configured
    pub live: Option<GatewayCredentials>,
}

fn credentials_from_env(store_var: &str, key_var: &str) -> Option<GatewayCredentials> {
    let store_id = std::env::var(store_var).unwrap_or_default();
    let auth_key = std::env::var(key_var).unwrap_or_default();
    if store_id.is_empty() || auth_key.is_empty() {
        return None;
    }
    Some(GatewayCredentials { store_id, auth_key })
}

impl TelrConfig {
    /// Load the gateway configuration from environment variables
    ///
    /// Recognized variables: `TELR_TEST_STORE_ID`, `TELR_TEST_AUTH_KEY`,
    /// `TELR_LIVE_STORE_ID`, `TELR_LIVE_AUTH_KEY` and `TELR_USE_TEST_MODE`
    /// (default `true`).
    pub fn from_env() -> Self {
        let test_mode = std::env::var("TELR_USE_TEST_MODE")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(true);

        TelrConfig {
            mode: if test_mode {
                GatewayMode::Test
            } else {
                GatewayMode::Live
            },
            test: credentials_from_env("TELR_TEST_STORE_ID", "TELR_TEST_AUTH_KEY"),
            live: credentials_from_env("TELR_LIVE_STORE_ID", "TELR_LIVE_AUTH_KEY"),
        }
    }

    /// Whether the configuration points at the test environment
    pub fn is_test_mode(&self) -> bool {
        self.mode == GatewayMode::Test
    }

    /// Get the credentials for the active mode
    ///
    /// Fails with a configuration error when the pair for the active mode
    /// is not set, so callers can bail out before any network I/O.
    pub fn credentials(&self) -> Result<&GatewayCredentials> {
        let creds = match self.mode {
            GatewayMode::Test => self.test.as_ref(),
            GatewayMode::Live => self.live.as_ref(),
        };

        creds.ok_or_else(|| {
            CoreError::Config(format!(
                "Telr credentials not configured for {:?} mode; set the store id and auth key environment variables",
                self.mode
            ))
        })
    }
}
