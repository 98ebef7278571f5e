//! Carrier verification against the FMCSA SAFER Company Snapshot
//!
//! Turns the snapshot HTML into a typed carrier record:
//! - Label/value cells (legal name, status, phone, ...)
//! - Address cells split into street / city / state / zip
//! - Inspection, crash and checkbox grids
//! - A verification service and HTTP endpoint around it

pub mod assembler;
pub mod cache;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod identifiers;
pub mod record;
pub mod server;
pub mod service;

pub use assembler::assemble;
pub use config::ServiceConfig;
pub use error::{ConfigError, FetchError, RequestError, ServiceError};
pub use extractors::{Address, LabelExtractor};
pub use fetch::{SaferClient, SnapshotSource};
pub use identifiers::{CarrierIds, LookupKey};
pub use record::{CarrierRecord, NotFound, Verification};
pub use service::VerificationService;
