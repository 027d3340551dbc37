//! Versioned regulatory table registry
//!
//! Table sets are validated once at registration and published as
//! `Arc<RegulatoryTables>`. A calculation takes a snapshot with
//! [`TableRegistry::current`] and keeps using it even if another version is
//! activated meanwhile; a published set is never changed in place.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut registry = TableRegistry::with_defaults();
//! registry.register(RegulatoryTables::from_json_str(&published)?)?;
//! registry.activate("BCB-352/2024-annex-I")?;
//!
//! let tables = registry.current()?;
//! let result = calculate_basic(&snapshot, &tables.expected_loss, &tables.incurred_loss, now, &config)?;
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::calibration::DEFAULT_TABLES;
use crate::error::ProvisioningError;
use crate::tables::RegulatoryTables;

/// Registry of published table sets keyed by regulation version
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    /// Published table sets by version
    versions: HashMap<String, Arc<RegulatoryTables>>,
    /// Version handed out by `current`
    active: Option<String>,
}

impl TableRegistry {
    /// Creates an empty registry with no active version
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the compiled tables as the active version
    pub fn with_defaults() -> Self {
        let tables = Arc::clone(&*DEFAULT_TABLES);
        let version = tables.version.clone();

        let mut versions = HashMap::new();
        versions.insert(version.clone(), tables);

        Self {
            versions,
            active: Some(version),
        }
    }

    /// Validates and publishes a table set
    ///
    /// The first version registered becomes active.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError::InvalidTable`] when the set fails
    /// validation or its version is already registered.
    pub fn register(&mut self, tables: RegulatoryTables) -> Result<Arc<RegulatoryTables>, ProvisioningError> {
        tables.validate()?;

        if self.versions.contains_key(&tables.version) {
            return Err(ProvisioningError::invalid_table(format!(
                "version {} is already registered",
                tables.version
            )));
        }

        let version = tables.version.clone();
        let published = Arc::new(tables);
        self.versions.insert(version.clone(), Arc::clone(&published));

        info!(
            version = %version,
            expected_loss_rows = published.expected_loss.len(),
            incurred_loss_rows = published.incurred_loss.len(),
            "Registered regulatory tables"
        );

        if self.active.is_none() {
            self.active = Some(version);
        }

        Ok(published)
    }

    /// Parses, validates and publishes a table set from a JSON file
    pub fn register_from_file(&mut self, path: &Path) -> Result<Arc<RegulatoryTables>, ProvisioningError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ProvisioningError::TableParse(format!("{}: {}", path.display(), e)))?;

        self.register(RegulatoryTables::from_json_str(&content)?)
    }

    /// Switches the version handed out by [`current`](Self::current)
    pub fn activate(&mut self, version: &str) -> Result<(), ProvisioningError> {
        if !self.versions.contains_key(version) {
            return Err(ProvisioningError::TableVersionNotFound(version.to_string()));
        }

        info!(
            from = self.active.as_deref().unwrap_or("none"),
            to = version,
            "Activated regulatory tables"
        );
        self.active = Some(version.to_string());
        Ok(())
    }

    /// Snapshot of the active table set
    pub fn current(&self) -> Result<Arc<RegulatoryTables>, ProvisioningError> {
        let version = self
            .active
            .as_deref()
            .ok_or_else(|| ProvisioningError::TableVersionNotFound("no active version".to_string()))?;

        self.get(version)
            .ok_or_else(|| ProvisioningError::TableVersionNotFound(version.to_string()))
    }

    /// Snapshot of a specific version
    pub fn get(&self, version: &str) -> Option<Arc<RegulatoryTables>> {
        self.versions.get(version).cloned()
    }

    pub fn active_version(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Registered versions, sorted
    pub fn versions(&self) -> Vec<&str> {
        let mut versions: Vec<&str> = self.versions.keys().map(String::as_str).collect();
        versions.sort_unstable();
        versions
    }
}
