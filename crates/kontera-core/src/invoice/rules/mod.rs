//! Rule-based field extractors for Norwegian telecom invoices.

pub mod amounts;
pub mod category;
pub mod dates;
pub mod patterns;

pub use amounts::{extract_totals, parse_amount, DeclaredTotals};
pub use dates::{normalize_date, parse_date};
