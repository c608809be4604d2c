//! Client for the external availability service.
//!
//! The local inventory ledger is authoritative for every commit; this service
//! can only veto a reservation. Any failure to get a clear answer is reported
//! as an error so the caller can fail closed.

pub mod http;
pub mod oracle;

pub use http::{HttpAvailabilityOracle, OracleConfig};
pub use oracle::{AvailabilityOracle, OracleError, OracleVerdict};
