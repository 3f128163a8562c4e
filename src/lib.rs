/// Vehicle Trust Ledger - pseudonymous trust scoring for vehicular networks
///
/// This is the root crate that provides workspace-level documentation.
/// Actual implementation is in the subcrates:
/// - `vehicle-trust-core`: Ledger keyspace, record codecs and the four contracts
/// - `vehicle-trust-node`: Command-line host that executes invocation batches

/// Returns the version of the package.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
