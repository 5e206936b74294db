//! Template dictionaries for control and column configuration.
//!
//! Pure data: reusable configuration fragments merged into a record's control
//! section and default column definitions derived from it. The language-parent
//! column template carries a table-name placeholder that is substituted at
//! assembly time.

use serde_json::{json, Map, Value};

/// Placeholder replaced with the concrete table name in column templates.
pub const TABLE_PLACEHOLDER: &str = "###FORMLIST_TABLE###";

// ============================================================================
// CONTROL TEMPLATES
// ============================================================================

/// Baseline control fields every record carries.
pub fn basic_control_template() -> Value {
    json!({
        "tstamp": "tstamp",
        "crdate": "crdate",
        "cruser_id": "cruser_id",
        "delete": "deleted",
        "enablecolumns": {
            "disabled": "hidden",
        },
    })
}

/// Control fields for localized records.
pub fn language_control_template() -> Value {
    json!({
        "languageField": "sys_language_uid",
        "transOrigPointerField": "l10n_parent",
        "transOrigDiffSourceField": "l10n_diffsource",
        "translationSource": "l10n_source",
    })
}

/// Control fields for versioned records.
pub fn version_control_template() -> Value {
    json!({
        "versioningWS": true,
        "origUid": "t3_origuid",
    })
}

/// Default manual-sorting control fields.
pub fn sorting_control_template() -> Value {
    json!({
        "default_sortby": "ORDER BY sorting",
        "sortby": "sorting",
    })
}

// ============================================================================
// COLUMN TEMPLATES
// ============================================================================

/// Column definition for the disabled/hidden flag.
pub fn disabled_column_template() -> Value {
    json!({
        "exclude": true,
        "label": "LLL:EXT:lang/Resources/Private/Language/locallang_general.xlf:LGL.hidden",
        "config": {
            "type": "check",
            "default": 0,
        },
    })
}

/// Column definition for the language selector.
pub fn language_column_template() -> Value {
    json!({
        "exclude": true,
        "label": "LLL:EXT:lang/Resources/Private/Language/locallang_general.xlf:LGL.language",
        "config": {
            "type": "select",
            "renderType": "selectSingle",
            "special": "languages",
            "items": [
                [
                    "LLL:EXT:lang/Resources/Private/Language/locallang_general.xlf:LGL.allLanguages",
                    -1,
                    "flags-multiple",
                ],
            ],
            "default": 0,
        },
    })
}

/// Column definition for the translation-parent pointer, with the table name
/// substituted for [`TABLE_PLACEHOLDER`].
pub fn language_parent_column_template(table_name: &str) -> Value {
    let mut template = json!({
        "displayCond": "FIELD:sys_language_uid:>:0",
        "exclude": true,
        "label": "LLL:EXT:lang/Resources/Private/Language/locallang_general.xlf:LGL.l18n_parent",
        "config": {
            "type": "select",
            "renderType": "selectSingle",
            "items": [
                ["", 0],
            ],
            "foreign_table": TABLE_PLACEHOLDER,
            "foreign_table_where": format!(
                "AND {0}.pid=###CURRENT_PID### AND {0}.sys_language_uid IN (-1,0)",
                TABLE_PLACEHOLDER
            ),
            "default": 0,
        },
    });

    if let Some(config) = template.get_mut("config").and_then(Value::as_object_mut) {
        for key in ["foreign_table", "foreign_table_where"] {
            if let Some(Value::String(value)) = config.get_mut(key) {
                *value = value.replace(TABLE_PLACEHOLDER, table_name);
            }
        }
    }

    template
}

/// Column definition for the translation diff source (passthrough).
pub fn language_diffsource_column_template() -> Value {
    json!({
        "config": {
            "type": "passthrough",
            "default": "",
        },
    })
}

/// Column definition for the translation source (passthrough).
pub fn language_source_column_template() -> Value {
    json!({
        "config": {
            "type": "passthrough",
            "default": 0,
        },
    })
}

// ============================================================================
// ASSEMBLY
// ============================================================================

/// Assemble a control configuration from the templates: title and label
/// first, then the baseline, then the optional language/versioning/sorting
/// blocks, then caller-provided additions (which win on key conflicts).
pub fn control_configuration(
    title: &str,
    label: &str,
    additional: Option<Value>,
    add_language_fields: bool,
    add_versioning_fields: bool,
    default_sorting: bool,
) -> Map<String, Value> {
    let mut configuration = Map::new();
    configuration.insert("title".to_string(), Value::String(title.to_string()));
    configuration.insert("label".to_string(), Value::String(label.to_string()));

    merge_into(&mut configuration, basic_control_template());
    if add_language_fields {
        merge_into(&mut configuration, language_control_template());
    }
    if add_versioning_fields {
        merge_into(&mut configuration, version_control_template());
    }
    if default_sorting {
        merge_into(&mut configuration, sorting_control_template());
    }
    if let Some(additional) = additional {
        merge_into(&mut configuration, additional);
    }

    configuration
}

/// Derive default column definitions from a control configuration: every
/// system field the control section names gets its template, then
/// caller-provided columns (which win on key conflicts).
pub fn columns_configuration(
    control_configuration: &Map<String, Value>,
    table_name: &str,
    additional_columns: Option<Map<String, Value>>,
) -> Map<String, Value> {
    let mut columns = Map::new();

    let disabled = control_configuration
        .get("enablecolumns")
        .and_then(|e| e.get("disabled"))
        .and_then(Value::as_str);
    if let Some(field) = disabled.filter(|f| !f.is_empty()) {
        columns.insert(field.to_string(), disabled_column_template());
    }

    let named_templates: [(&str, fn(&str) -> Value); 4] = [
        ("languageField", |_| language_column_template()),
        ("transOrigPointerField", |table| {
            language_parent_column_template(table)
        }),
        ("transOrigDiffSourceField", |_| {
            language_diffsource_column_template()
        }),
        ("translationSource", |_| language_source_column_template()),
    ];
    for (control_key, template) in named_templates {
        let field = control_configuration
            .get(control_key)
            .and_then(Value::as_str);
        if let Some(field) = field.filter(|f| !f.is_empty()) {
            columns.insert(field.to_string(), template(table_name));
        }
    }

    if let Some(additional) = additional_columns {
        for (key, value) in additional {
            columns.insert(key, value);
        }
    }

    columns
}

/// Merge a JSON object's top-level keys into `target`, later keys winning.
fn merge_into(target: &mut Map<String, Value>, source: Value) {
    if let Value::Object(source) = source {
        for (key, value) in source {
            target.insert(key, value);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
