//! formlist-builder - Fluent Configuration Session
//!
//! [`FormListBuilder`] holds the mutable working state for one (table, type)
//! configuration record: the main show-item list, the per-field override map,
//! the palettes touched in this session, and the label-file context. Callers
//! chain mutating calls and finish with [`FormListBuilder::save`], which
//! flushes everything to the injected [`ConfigStore`] and readies the session
//! for reuse.
//!
//! Mutations follow the silent-fallback contract of the list editor: an
//! unresolvable position anchor degrades to an append (for inserts) or a
//! no-op (for moves), and removing something that is not there does nothing.

pub mod templates;

use formlist_core::{
    insert_positioned, Entry, FormListResult, Position, ShowItemList, StoreError,
};
use formlist_store::{ConfigStore, PaletteConfig, TypeConfig};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Label prefix rewritten to a locallang reference when a label file is set.
pub const LANG_PREFIX: &str = "LANG:";

// ============================================================================
// BUILDER SESSION
// ============================================================================

/// Fluent editing session for one (table, type) show-item configuration.
///
/// Mutators return `&mut Self` for chaining; lifecycle operations that touch
/// the store return `FormListResult<&mut Self>` so chains compose with `?`.
///
/// ```
/// use formlist_builder::FormListBuilder;
/// use formlist_store::{ConfigStore, InMemoryStore};
/// use std::sync::Arc;
///
/// let store = Arc::new(InMemoryStore::new());
/// let mut builder = FormListBuilder::new(store.clone());
/// builder
///     .set_table("tx_news")
///     .set_type("article")
///     .add_field("title")
///     .add_div("Meta")
///     .add_field_at("author", "after:title")
///     .save()
///     .unwrap();
///
/// let config = store.get_type("tx_news", "article").unwrap().unwrap();
/// assert_eq!(config.showitem, "title,author,--div--;Meta");
/// ```
pub struct FormListBuilder {
    store: Arc<dyn ConfigStore>,
    table: String,
    selected_type: String,
    fields: ShowItemList,
    columns_overrides: Map<String, Value>,
    initialize_overrides: bool,
    /// Palettes created or touched in this session, in touch order.
    custom_palettes: Vec<(String, PaletteConfig)>,
    locallang_file: String,
}

impl FormListBuilder {
    /// Create an empty session against the given store.
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self {
            store,
            table: String::new(),
            selected_type: String::new(),
            fields: ShowItemList::new(),
            columns_overrides: Map::new(),
            initialize_overrides: false,
            custom_palettes: Vec::new(),
            locallang_file: String::new(),
        }
    }

    // === Lifecycle ===

    /// Clear the whole session: table, type, list, overrides, palettes and
    /// label-file context. Valid in any state.
    pub fn reset(&mut self) -> &mut Self {
        self.table.clear();
        self.selected_type.clear();
        self.fields.clear();
        self.columns_overrides.clear();
        self.initialize_overrides = false;
        self.custom_palettes.clear();
        self.locallang_file.clear();
        self
    }

    /// Clear the main list and override map (but not table, type or palettes)
    /// and force the override map to be written on save even when it stays
    /// empty. This is how "explicitly emptied" is distinguished from
    /// "untouched" at the store.
    pub fn initialize(&mut self) -> &mut Self {
        self.fields.clear();
        self.columns_overrides.clear();
        self.initialize_overrides = true;
        self
    }

    /// Set the table to configure. No validation of existence.
    pub fn set_table(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = table.into();
        self
    }

    /// The active table id.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Set the type to configure. No validation of existence.
    pub fn set_type(&mut self, type_name: impl Into<String>) -> &mut Self {
        self.selected_type = type_name.into();
        self
    }

    /// The active type id.
    pub fn selected_type(&self) -> &str {
        &self.selected_type
    }

    /// Use a label file for `LANG:` prefix rewriting in labels.
    pub fn use_locallang_file(&mut self, file_path: impl Into<String>) -> &mut Self {
        self.locallang_file = file_path.into();
        self
    }

    /// Hydrate the session from the store. Fails with
    /// [`StoreError::TypeNotFound`] when the (table, type) key is absent.
    pub fn load(&mut self) -> FormListResult<&mut Self> {
        self.do_load()?;
        Ok(self)
    }

    /// Reset, set table and type, then load.
    pub fn load_configuration(
        &mut self,
        table: impl Into<String>,
        type_name: impl Into<String>,
    ) -> FormListResult<&mut Self> {
        self.reset();
        self.table = table.into();
        self.selected_type = type_name.into();
        self.do_load()?;
        Ok(self)
    }

    /// Copy another type's list and overrides into this session while keeping
    /// the currently selected type, enabling type-inheritance-by-copy. The
    /// active type is restored even when the load fails.
    pub fn copy_from_type(&mut self, type_name: impl Into<String>) -> FormListResult<&mut Self> {
        let saved_type = std::mem::replace(&mut self.selected_type, type_name.into());
        let result = self.do_load();
        self.selected_type = saved_type;
        result?;
        Ok(self)
    }

    /// Flush the session to the store and reset it for reuse. A guarded no-op
    /// when neither table nor type is set.
    pub fn save(&mut self) -> FormListResult<&mut Self> {
        self.do_save(true)?;
        Ok(self)
    }

    /// Same as [`FormListBuilder::save`] but keeps the session state so the
    /// caller can continue editing the same (table, type).
    pub fn save_without_reset(&mut self) -> FormListResult<&mut Self> {
        self.do_save(false)?;
        Ok(self)
    }

    /// The type configuration this session would save, without writing it.
    /// Used for composing configuration without a store round-trip.
    pub fn as_type_config(&self) -> TypeConfig {
        TypeConfig {
            showitem: self.showitem_string(),
            columns_overrides: if !self.columns_overrides.is_empty() || self.initialize_overrides {
                Some(self.columns_overrides.clone())
            } else {
                None
            },
        }
    }

    /// Delete the selected type's record from the store. A guarded no-op when
    /// no type is selected.
    pub fn remove_type(&mut self) -> FormListResult<&mut Self> {
        if !self.selected_type.is_empty() {
            self.store.delete_type(&self.table, &self.selected_type)?;
        }
        Ok(self)
    }

    /// Delete a named type's record from the store.
    pub fn remove_type_named(&mut self, type_name: &str) -> FormListResult<&mut Self> {
        if !type_name.is_empty() {
            self.store.delete_type(&self.table, type_name)?;
        }
        Ok(self)
    }

    // === Fields ===

    /// Append a field at the end of the list.
    pub fn add_field(&mut self, name: &str) -> &mut Self {
        self.push_field(name, "", None)
    }

    /// Add a field at a `direction:anchor` position. An empty or unresolvable
    /// position appends at the end.
    pub fn add_field_at(&mut self, name: &str, position: &str) -> &mut Self {
        self.push_field(name, position, None)
    }

    /// Add a field with an alternative label at a position.
    pub fn add_field_labeled(&mut self, name: &str, position: &str, alt_label: &str) -> &mut Self {
        self.push_field(name, position, Some(alt_label))
    }

    /// Add a field with an alternative label and a columns override blob. The
    /// override is keyed by the plain field name regardless of label.
    pub fn add_field_with_overrides(
        &mut self,
        name: &str,
        position: &str,
        alt_label: &str,
        overrides: Value,
    ) -> &mut Self {
        self.push_field(name, position, Some(alt_label));
        self.columns_overrides.insert(name.to_string(), overrides);
        self
    }

    /// Remove ALL entries whose field name or div/palette label starts with
    /// `name_prefix`. Prefix matching is the deliberate, loose contract.
    pub fn remove_field(&mut self, name_prefix: &str) -> &mut Self {
        self.fields.remove_by_prefix(name_prefix);
        self
    }

    /// Move a field to a new position. When the anchor does not resolve the
    /// list is left untouched.
    pub fn move_field(&mut self, name: &str, position: &str) -> &mut Self {
        self.do_move_field(name, position, None);
        self
    }

    /// Move a field to a new position, giving it an alternative label.
    pub fn move_field_labeled(&mut self, name: &str, position: &str, alt_label: &str) -> &mut Self {
        self.do_move_field(name, position, Some(alt_label));
        self
    }

    /// Whether an entry with exactly this serialized form exists in the list.
    pub fn does_field_exist(&self, raw: &str) -> bool {
        self.fields.contains_raw(raw)
    }

    // === Overrides ===

    /// Set the columns override blob for a field, keyed by plain field name.
    pub fn add_override(&mut self, field_name: &str, override_config: Value) -> &mut Self {
        self.columns_overrides
            .insert(field_name.to_string(), override_config);
        self
    }

    // === Palettes (main list) ===

    /// Append a palette reference at the end of the list.
    pub fn add_palette(&mut self, palette_id: &str) -> &mut Self {
        self.push_palette(palette_id, "", None)
    }

    /// Add a palette reference at a position.
    pub fn add_palette_at(&mut self, palette_id: &str, position: &str) -> &mut Self {
        self.push_palette(palette_id, position, None)
    }

    /// Add a palette reference with a display label at a position.
    pub fn add_palette_labeled(
        &mut self,
        palette_id: &str,
        position: &str,
        alt_label: &str,
    ) -> &mut Self {
        self.push_palette(palette_id, position, Some(alt_label))
    }

    /// Remove the reference to a palette from the main list. The palette's
    /// own field list is untouched.
    pub fn remove_palette(&mut self, palette_id: &str) -> &mut Self {
        let raw = self.palette_string(palette_id);
        if !raw.is_empty() {
            self.fields.remove_first(&raw);
        }
        self
    }

    /// Move a palette reference to a new position. When the anchor does not
    /// resolve the list is left untouched.
    pub fn move_palette(&mut self, palette_id: &str, position: &str) -> &mut Self {
        let Some(raw) = self.fields.palette_by_id(palette_id).map(Entry::to_raw) else {
            return self;
        };
        if !self.resolves(position) {
            return self;
        }
        self.fields.remove_first(&raw);
        insert_positioned(&mut self.fields, Entry::parse(&raw), position);
        self
    }

    /// Serialized form of the palette reference with this id, or the empty
    /// string when the list has none.
    pub fn palette_string(&self, palette_id: &str) -> String {
        self.fields
            .palette_by_id(palette_id)
            .map(Entry::to_raw)
            .unwrap_or_default()
    }

    // === Dividers ===

    /// Append a divider at the end of the list.
    pub fn add_div(&mut self, label: &str) -> &mut Self {
        self.add_div_at(label, "")
    }

    /// Add a divider at a position.
    pub fn add_div_at(&mut self, label: &str, position: &str) -> &mut Self {
        let entry = Entry::div(self.localized_label(label));
        insert_positioned(&mut self.fields, entry, position);
        self
    }

    /// Remove the first divider with this label. No-op when absent.
    pub fn remove_div_by_label(&mut self, label: &str) -> &mut Self {
        let raw = self.div_string(label);
        if !raw.is_empty() {
            self.fields.remove_first(&raw);
        }
        self
    }

    /// Remove the nth divider, counting dividers only (not the full list
    /// index). No-op when out of range.
    pub fn remove_div_at(&mut self, ordinal: usize) -> &mut Self {
        let raw = self.div_string_at(ordinal);
        if !raw.is_empty() {
            self.fields.remove_first(&raw);
        }
        self
    }

    /// Serialized form of the first divider with this label, or the empty
    /// string when there is none.
    pub fn div_string(&self, label: &str) -> String {
        self.fields
            .div_by_label(&self.localized_label(label))
            .map(Entry::to_raw)
            .unwrap_or_default()
    }

    /// Serialized form of the nth divider, or the empty string when out of
    /// range.
    pub fn div_string_at(&self, ordinal: usize) -> String {
        self.fields
            .div_at(ordinal)
            .map(Entry::to_raw)
            .unwrap_or_default()
    }

    // === Palette registry (sub-lists) ===

    /// Register a custom palette with the given flat field list.
    pub fn add_custom_palette(&mut self, palette_id: &str, field_names: &[&str]) -> &mut Self {
        self.add_custom_palette_at(palette_id, field_names, "", "")
    }

    /// Register a custom palette with a label; a non-empty `position` also
    /// inserts a reference to it into the main list.
    pub fn add_custom_palette_at(
        &mut self,
        palette_id: &str,
        field_names: &[&str],
        label: &str,
        position: &str,
    ) -> &mut Self {
        let config = PaletteConfig::new(label, field_names.join(","));
        self.upsert_custom_palette(palette_id, config);
        if !position.is_empty() {
            self.push_palette(palette_id, position, None);
        }
        self
    }

    /// Replace a palette's flat field list, preserving its label.
    pub fn set_palette_fields(&mut self, palette_id: &str, field_names: &[&str]) -> &mut Self {
        let showitem = field_names.join(",");
        match self.custom_palette_index(palette_id) {
            Some(index) => self.custom_palettes[index].1.showitem = showitem,
            None => self.upsert_custom_palette(palette_id, PaletteConfig::new("", showitem)),
        }
        self
    }

    /// Append a field to a palette's own field list.
    pub fn add_field_to_palette(
        &mut self,
        palette_id: &str,
        field_name: &str,
    ) -> FormListResult<&mut Self> {
        self.add_field_to_palette_at(palette_id, field_name, "")
    }

    /// Add a field to a palette's own field list at a position. The palette's
    /// list comes from the session registry, falling back to the store, else
    /// a fresh empty palette is created.
    pub fn add_field_to_palette_at(
        &mut self,
        palette_id: &str,
        field_name: &str,
        position: &str,
    ) -> FormListResult<&mut Self> {
        let entry = Entry::field(field_name);
        let position = position.to_string();
        self.edit_palette(palette_id, |list| {
            insert_positioned(list, entry, &position);
        })?;
        Ok(self)
    }

    /// Remove the first occurrence of a field from a palette's field list.
    /// No-op when the field is absent.
    pub fn remove_field_from_palette(
        &mut self,
        palette_id: &str,
        field_name: &str,
    ) -> FormListResult<&mut Self> {
        let field_name = field_name.to_string();
        self.edit_palette(palette_id, |list| {
            list.remove_first(&field_name);
        })?;
        Ok(self)
    }

    /// Replace a palette's field list with an empty list, preserving the
    /// label.
    pub fn initialize_palette(&mut self, palette_id: &str) -> FormListResult<&mut Self> {
        self.edit_palette(palette_id, ShowItemList::clear)?;
        Ok(self)
    }

    // === Internals ===

    fn do_load(&mut self) -> FormListResult<()> {
        let config = self
            .store
            .get_type(&self.table, &self.selected_type)?
            .ok_or_else(|| StoreError::TypeNotFound {
                table: self.table.clone(),
                type_name: self.selected_type.clone(),
            })?;
        debug!(
            table = %self.table,
            type_name = %self.selected_type,
            "loaded type configuration"
        );
        self.fields = ShowItemList::parse(&config.showitem);
        self.columns_overrides = config.columns_overrides.unwrap_or_default();
        Ok(())
    }

    fn do_save(&mut self, reset_after_save: bool) -> FormListResult<()> {
        if self.table.is_empty() && self.selected_type.is_empty() {
            return Ok(());
        }

        self.store
            .put_type(&self.table, &self.selected_type, self.as_type_config())?;

        for (palette_id, config) in &self.custom_palettes {
            self.store
                .put_palette(&self.table, palette_id, config.clone())?;
        }
        debug!(
            table = %self.table,
            type_name = %self.selected_type,
            palettes = self.custom_palettes.len(),
            "saved type configuration"
        );

        if reset_after_save {
            self.reset();
        }
        Ok(())
    }

    /// Serialized show-item list with empty entries filtered out.
    fn showitem_string(&self) -> String {
        self.fields
            .iter()
            .map(Entry::to_raw)
            .filter(|raw| !raw.is_empty())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn push_field(&mut self, name: &str, position: &str, alt_label: Option<&str>) -> &mut Self {
        let entry = match alt_label.filter(|l| !l.is_empty()) {
            Some(label) => Entry::field_labeled(name, self.localized_label(label)),
            None => Entry::field(name),
        };
        insert_positioned(&mut self.fields, entry, position);
        self
    }

    fn push_palette(
        &mut self,
        palette_id: &str,
        position: &str,
        alt_label: Option<&str>,
    ) -> &mut Self {
        let label = match alt_label.filter(|l| !l.is_empty()) {
            Some(label) => self.localized_label(label),
            None => String::new(),
        };
        let entry = Entry::palette_ref(label, palette_id);
        insert_positioned(&mut self.fields, entry, position);
        self
    }

    fn do_move_field(&mut self, name: &str, position: &str, alt_label: Option<&str>) {
        if !self.resolves(position) {
            return;
        }
        // A field moves by its bare name even when it currently carries a
        // label; the move replaces the old label with the given one (or none).
        // A field not present at all is simply inserted.
        let existing = self
            .fields
            .iter()
            .find(|e| matches!(e, Entry::Field { name: n, .. } if n == name))
            .map(Entry::to_raw);
        if let Some(raw) = existing {
            self.fields.remove_first(&raw);
        }
        let entry = match alt_label.filter(|l| !l.is_empty()) {
            Some(label) => Entry::field_labeled(name, self.localized_label(label)),
            None => Entry::field(name),
        };
        insert_positioned(&mut self.fields, entry, position);
    }

    /// Whether a position directive resolves against the current list.
    fn resolves(&self, position: &str) -> bool {
        Position::parse(position)
            .map(|p| p.resolve(&self.fields).is_some())
            .unwrap_or(false)
    }

    /// Rewrite a `LANG:` prefixed label to a `LLL:<file>:` reference when a
    /// label file is set; otherwise the label passes through untouched.
    fn localized_label(&self, label: &str) -> String {
        if !self.locallang_file.is_empty() {
            if let Some(rest) = label.strip_prefix(LANG_PREFIX) {
                return format!("LLL:{}:{}", self.locallang_file, rest);
            }
        }
        label.to_string()
    }

    fn custom_palette_index(&self, palette_id: &str) -> Option<usize> {
        self.custom_palettes
            .iter()
            .position(|(id, _)| id == palette_id)
    }

    fn upsert_custom_palette(&mut self, palette_id: &str, config: PaletteConfig) {
        match self.custom_palette_index(palette_id) {
            Some(index) => self.custom_palettes[index].1 = config,
            None => self
                .custom_palettes
                .push((palette_id.to_string(), config)),
        }
    }

    /// Load a palette's field list (session registry first, then the store,
    /// else empty), apply `edit`, and write it back into the session
    /// registry so it is flushed on save.
    fn edit_palette(
        &mut self,
        palette_id: &str,
        edit: impl FnOnce(&mut ShowItemList),
    ) -> FormListResult<()> {
        let config = match self.custom_palettes.iter().find(|(id, _)| id == palette_id) {
            Some((_, config)) => config.clone(),
            None => self
                .store
                .get_palette(&self.table, palette_id)?
                .unwrap_or_default(),
        };
        let mut list = ShowItemList::parse(&config.showitem);
        edit(&mut list);
        self.upsert_custom_palette(
            palette_id,
            PaletteConfig::new(config.label, list.serialize()),
        );
        Ok(())
    }
}

impl std::fmt::Debug for FormListBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormListBuilder")
            .field("table", &self.table)
            .field("selected_type", &self.selected_type)
            .field("fields", &self.fields)
            .field("columns_overrides", &self.columns_overrides)
            .field("initialize_overrides", &self.initialize_overrides)
            .field("custom_palettes", &self.custom_palettes)
            .field("locallang_file", &self.locallang_file)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================
