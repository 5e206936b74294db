//! Entry model and classifier for show-item lists.
//!
//! A show-item list is a comma-delimited sequence of entries; each entry is a
//! semicolon-joined tuple. The first segment decides the variant: one of two
//! reserved marker tokens, or a plain field name. Raw strings are decoded into
//! `Entry` once at the boundary; all higher-level logic works on the enum and
//! re-serializes only when talking to the store.

use serde::{Deserialize, Serialize};

/// Marker token for divider entries.
pub const DIV_MARKER: &str = "--div--";

/// Marker token for palette reference entries.
pub const PALETTE_MARKER: &str = "--palette--";

// ============================================================================
// ENTRY
// ============================================================================

/// A single unit in a show-item list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Entry {
    /// A plain field, optionally with an alternative label.
    Field {
        /// Field name (segment 0 of the serialized form).
        name: String,
        /// Alternative label (segment 1, when present and non-empty).
        label: Option<String>,
    },
    /// A labeled section divider. Carries no field value.
    Div {
        /// Divider label (may be empty).
        label: String,
    },
    /// A reference to a named palette.
    PaletteRef {
        /// Display label (may be empty, serialized as `--palette--;;id`).
        label: String,
        /// Palette identifier.
        id: String,
    },
}

impl Entry {
    /// Classify a raw serialized entry. Infallible: any string maps to one of
    /// the three variants, with missing segments degrading to empty strings.
    pub fn parse(raw: &str) -> Self {
        let mut segments = raw.split(';');
        let first = segments.next().unwrap_or("");
        match first {
            DIV_MARKER => Entry::Div {
                label: segments.next().unwrap_or("").to_string(),
            },
            PALETTE_MARKER => Entry::PaletteRef {
                label: segments.next().unwrap_or("").to_string(),
                id: segments.next().unwrap_or("").to_string(),
            },
            name => Entry::Field {
                name: name.to_string(),
                label: segments.next().filter(|s| !s.is_empty()).map(String::from),
            },
        }
    }

    /// Exact serialized form of this entry.
    pub fn to_raw(&self) -> String {
        match self {
            Entry::Field { name, label: None } => name.clone(),
            Entry::Field {
                name,
                label: Some(label),
            } => format!("{};{}", name, label),
            Entry::Div { label } => format!("{};{}", DIV_MARKER, label),
            Entry::PaletteRef { label, id } => {
                format!("{};{};{}", PALETTE_MARKER, label, id)
            }
        }
    }

    /// Whether this entry is a divider.
    pub fn is_div(&self) -> bool {
        matches!(self, Entry::Div { .. })
    }

    /// Whether this entry is a palette reference.
    pub fn is_palette(&self) -> bool {
        matches!(self, Entry::PaletteRef { .. })
    }

    /// Create a plain field entry.
    pub fn field(name: impl Into<String>) -> Self {
        Entry::Field {
            name: name.into(),
            label: None,
        }
    }

    /// Create a plain field entry with an alternative label.
    pub fn field_labeled(name: impl Into<String>, label: impl Into<String>) -> Self {
        Entry::Field {
            name: name.into(),
            label: Some(label.into()),
        }
    }

    /// Create a divider entry.
    pub fn div(label: impl Into<String>) -> Self {
        Entry::Div {
            label: label.into(),
        }
    }

    /// Create a palette reference entry.
    pub fn palette_ref(label: impl Into<String>, id: impl Into<String>) -> Self {
        Entry::PaletteRef {
            label: label.into(),
            id: id.into(),
        }
    }
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_raw())
    }
}

// =============================================================================
// TESTS
// =============================================================================
