//! Core library for Norwegian telecom invoice reconciliation.
//!
//! This crate provides:
//! - Supplier detection with learned document signatures
//! - Invoice field extraction (invoice number, dates, KID, totals)
//! - Itemized-segment parsing into per-person billing lines
//! - Fuzzy cost-bearer matching against an HR registry
//! - Financial reconciliation with a weighted confidence score

pub mod error;
pub mod invoice;
pub mod matching;
pub mod models;
pub mod name;
pub mod pipeline;
pub mod reconcile;
pub mod supplier;

pub use error::{KonteraError, Result};
pub use matching::{CostBearerMatcher, RegistryCache, RegistryCacheKey};
pub use models::config::KonteraConfig;
pub use models::invoice::{InvoiceMetadata, InvoiceResult, LineItem, RawDocument, SupplierIdentity};
pub use models::matching::{MatchResult, MatchStatus};
pub use models::registry::RegistryRecord;
pub use pipeline::InvoicePipeline;
pub use reconcile::ReconciliationEngine;
pub use supplier::SupplierDetector;
