/// Stayhub - a hotel booking storefront backend
///
/// This is the root crate that provides workspace-level documentation.
/// Actual implementation is in the subcrates:
/// - `stayhub-core`: tabular record store, record services and configuration
/// - `stayhub-gateway`: Telr payment gateway client and webhook parsing
/// - `stayhub-server`: HTTP API server

/// This module is intentionally empty as the actual implementation
/// is in the subcrates.
/// Returns the version of the package.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
