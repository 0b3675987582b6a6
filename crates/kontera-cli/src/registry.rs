//! Cost-bearer registry loading from CSV exports.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use kontera_core::error::{KonteraError, Result};
use kontera_core::{RegistryCache, RegistryCacheKey, RegistryRecord};

const REQUIRED_COLUMNS: &[&str] = &["given_name", "family_name", "cost_center"];

/// Load a registry CSV. Requires the `given_name`, `family_name` and
/// `cost_center` columns; `phone` and `department` are optional.
pub fn load_registry(path: &Path) -> Result<Vec<RegistryRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| KonteraError::Registry(format!("{}: {}", path.display(), e)))?;

    let headers = reader
        .headers()
        .map_err(|e| KonteraError::Registry(format!("{}: {}", path.display(), e)))?;
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(KonteraError::Registry(format!(
                "{}: missing required column '{}'",
                path.display(),
                column
            )));
        }
    }

    let mut records = Vec::new();
    for (row, result) in reader.deserialize::<RegistryRecord>().enumerate() {
        let record = result.map_err(|e| {
            KonteraError::Registry(format!("{} row {}: {}", path.display(), row + 2, e))
        })?;
        records.push(record);
    }

    info!(path = %path.display(), records = records.len(), "registry loaded");
    Ok(records)
}

/// Cache key for a registry file, derived from its modification time.
pub fn cache_key(path: &Path) -> Result<RegistryCacheKey> {
    let metadata = std::fs::metadata(path)?;
    let modified = metadata.modified()?;
    Ok(RegistryCacheKey { source: path.display().to_string(), modified })
}

/// Load through the cache, re-reading only when the file changed.
pub fn load_cached(cache: &RegistryCache, path: &Path) -> Result<Arc<Vec<RegistryRecord>>> {
    let key = cache_key(path)?;
    cache.get_or_load(key, || load_registry(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::with_suffix(".csv").unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_loads_records_with_optional_columns() {
        let file = write_csv(
            "given_name,family_name,cost_center,phone,department\n\
             Annlaug,Amundsen,4501,92078335,Salg\n\
             Allan,Simonsen,4502,,\n",
        );
        let records = load_registry(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].full_name(), "Annlaug Amundsen");
        assert_eq!(records[0].phone.as_deref(), Some("92078335"));
        assert_eq!(records[1].department, None);
    }

    #[test]
    fn test_minimal_columns_suffice() {
        let file = write_csv("given_name,family_name,cost_center\nAnnlaug,Amundsen,4501\n");
        let records = load_registry(file.path()).unwrap();
        assert_eq!(records[0].cost_center, "4501");
    }

    #[test]
    fn test_missing_required_column_is_an_error() {
        let file = write_csv("given_name,family_name\nAnnlaug,Amundsen\n");
        let err = load_registry(file.path()).unwrap_err();
        assert!(err.to_string().contains("cost_center"));
    }

    #[test]
    fn test_cached_load_reuses_snapshot() {
        let file = write_csv("given_name,family_name,cost_center\nAnnlaug,Amundsen,4501\n");
        let cache = RegistryCache::new();
        let first = load_cached(&cache, file.path()).unwrap();
        let second = load_cached(&cache, file.path()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
