//! formlist-store - Configuration Store Trait and In-Memory Implementation
//!
//! Defines the external configuration-store collaborator the builder reads
//! from and writes to. The store is keyed by (table, type) for type records
//! and (table, palette) for palette records; writes are full replacements.
//! Production integrations implement [`ConfigStore`]; [`InMemoryStore`] backs
//! tests and store-less composition.

use formlist_core::FormListResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::RwLock;

// ============================================================================
// RECORD TYPES
// ============================================================================

/// Configuration record for one (table, type) key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeConfig {
    /// Comma-delimited show-item list.
    pub showitem: String,
    /// Per-field override blobs, keyed by plain field name. `None` when the
    /// type carries no override map at all; `Some` with an empty map when the
    /// map was explicitly initialized to empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns_overrides: Option<Map<String, Value>>,
}

impl TypeConfig {
    /// Record with a show-item list and no override map.
    pub fn with_showitem(showitem: impl Into<String>) -> Self {
        Self {
            showitem: showitem.into(),
            columns_overrides: None,
        }
    }
}

/// Configuration record for one (table, palette) key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Display label for the palette.
    pub label: String,
    /// Comma-delimited flat field-name list (palette contents carry no
    /// markers, plain field names only).
    pub showitem: String,
}

impl PaletteConfig {
    /// Palette record from a label and field list.
    pub fn new(label: impl Into<String>, showitem: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            showitem: showitem.into(),
        }
    }
}

// ============================================================================
// STORE TRAIT
// ============================================================================

/// Configuration store for type and palette records.
///
/// All reads return `Ok(None)` for absent keys; deciding whether that is an
/// error belongs to the caller. All writes are full replacements.
pub trait ConfigStore: Send + Sync {
    /// Read the record for a (table, type) key.
    fn get_type(&self, table: &str, type_name: &str) -> FormListResult<Option<TypeConfig>>;

    /// Write the record for a (table, type) key, replacing any previous value.
    fn put_type(&self, table: &str, type_name: &str, config: TypeConfig) -> FormListResult<()>;

    /// Delete the record for a (table, type) key. Deleting an absent key is
    /// not an error.
    fn delete_type(&self, table: &str, type_name: &str) -> FormListResult<()>;

    /// Read the record for a (table, palette) key.
    fn get_palette(&self, table: &str, palette_id: &str) -> FormListResult<Option<PaletteConfig>>;

    /// Write the record for a (table, palette) key, replacing any previous
    /// value.
    fn put_palette(
        &self,
        table: &str,
        palette_id: &str,
        config: PaletteConfig,
    ) -> FormListResult<()>;
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// In-memory configuration store for tests and store-less composition.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    types: RwLock<HashMap<(String, String), TypeConfig>>,
    palettes: RwLock<HashMap<(String, String), PaletteConfig>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored records.
    pub fn clear(&self) {
        self.types.write().unwrap().clear();
        self.palettes.write().unwrap().clear();
    }

    /// Get count of stored type records.
    pub fn type_count(&self) -> usize {
        self.types.read().unwrap().len()
    }

    /// Get count of stored palette records.
    pub fn palette_count(&self) -> usize {
        self.palettes.read().unwrap().len()
    }
}

impl ConfigStore for InMemoryStore {
    fn get_type(&self, table: &str, type_name: &str) -> FormListResult<Option<TypeConfig>> {
        let types = self.types.read().unwrap();
        Ok(types.get(&(table.to_string(), type_name.to_string())).cloned())
    }

    fn put_type(&self, table: &str, type_name: &str, config: TypeConfig) -> FormListResult<()> {
        self.types
            .write()
            .unwrap()
            .insert((table.to_string(), type_name.to_string()), config);
        Ok(())
    }

    fn delete_type(&self, table: &str, type_name: &str) -> FormListResult<()> {
        self.types
            .write()
            .unwrap()
            .remove(&(table.to_string(), type_name.to_string()));
        Ok(())
    }

    fn get_palette(&self, table: &str, palette_id: &str) -> FormListResult<Option<PaletteConfig>> {
        let palettes = self.palettes.read().unwrap();
        Ok(palettes
            .get(&(table.to_string(), palette_id.to_string()))
            .cloned())
    }

    fn put_palette(
        &self,
        table: &str,
        palette_id: &str,
        config: PaletteConfig,
    ) -> FormListResult<()> {
        self.palettes
            .write()
            .unwrap()
            .insert((table.to_string(), palette_id.to_string()), config);
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
