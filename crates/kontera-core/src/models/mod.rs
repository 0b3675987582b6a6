//! Data models for invoice extraction and reconciliation results.

pub mod config;
pub mod invoice;
pub mod matching;
pub mod registry;

pub use config::KonteraConfig;
pub use invoice::{InvoiceMetadata, InvoiceResult, LineItem, QualityReport, RawDocument, SupplierIdentity};
pub use matching::{MatchCandidate, MatchResult, MatchStatus};
pub use registry::RegistryRecord;
