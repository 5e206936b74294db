//! Integration tests for the fluent configuration session.
//!
//! Scenarios cover:
//! - field/divider/palette insertion with position directives
//! - the silent fallback policy (append on unresolvable insert anchors,
//!   no-op on unresolvable moves and missing removals)
//! - palette sub-list editing and the session palette registry
//! - the load/copy/save/reset lifecycle against the store

use formlist_builder::FormListBuilder;
use formlist_core::{FormListError, StoreError};
use formlist_store::{ConfigStore, InMemoryStore, PaletteConfig, TypeConfig};
use serde_json::json;
use std::sync::Arc;

const TABLE: &str = "table";
const TYPE: &str = "type";

/// Store plus a session pointed at the default (table, type) key.
fn session() -> (Arc<InMemoryStore>, FormListBuilder) {
    let store = Arc::new(InMemoryStore::new());
    let mut builder = FormListBuilder::new(store.clone());
    builder.set_table(TABLE).set_type(TYPE);
    (store, builder)
}

fn saved_showitem(store: &InMemoryStore) -> String {
    store.get_type(TABLE, TYPE).unwrap().unwrap().showitem
}

fn saved_palette(store: &InMemoryStore, palette_id: &str) -> PaletteConfig {
    store.get_palette(TABLE, palette_id).unwrap().unwrap()
}

// ============================================================================
// FIELDS
// ============================================================================

#[test]
fn single_field_saves_as_bare_entry() {
    let (store, mut b) = session();
    b.add_field("newField").save().unwrap();
    assert_eq!(saved_showitem(&store), "newField");
}

#[test]
fn fields_append_in_call_order() {
    let (store, mut b) = session();
    b.add_field("a").add_field("b").save().unwrap();
    assert_eq!(saved_showitem(&store), "a,b");
}

#[test]
fn field_with_before_position_lands_before_anchor() {
    let (store, mut b) = session();
    b.add_field("a")
        .add_field("b")
        .add_field_at("c", "before:a")
        .save()
        .unwrap();
    assert_eq!(saved_showitem(&store), "c,a,b");
}

#[test]
fn field_with_after_position_lands_after_anchor() {
    let (store, mut b) = session();
    b.add_field("a")
        .add_field("b")
        .add_field_at("c", "after:a")
        .save()
        .unwrap();
    assert_eq!(saved_showitem(&store), "a,c,b");
}

#[test]
fn field_with_replace_position_substitutes_anchor() {
    let (store, mut b) = session();
    b.add_field("a")
        .add_field("b")
        .add_field_at("c", "replace:a")
        .save()
        .unwrap();
    assert_eq!(saved_showitem(&store), "c,b");
}

#[test]
fn field_with_unresolvable_anchor_appends() {
    let (store, mut b) = session();
    b.add_field("a")
        .add_field_at("b", "before:doesNotExist")
        .save()
        .unwrap();
    assert_eq!(saved_showitem(&store), "a,b");
}

#[test]
fn field_with_alt_label_serializes_with_label() {
    let (store, mut b) = session();
    b.add_field_labeled("header", "", "My Header").save().unwrap();
    assert_eq!(saved_showitem(&store), "header;My Header");
}

#[test]
fn lang_label_is_rewritten_when_locallang_file_is_set() {
    let (store, mut b) = session();
    b.use_locallang_file("EXT:myext/Resources/Private/Language/locallang.xlf")
        .add_field_labeled("header", "", "LANG:header")
        .save()
        .unwrap();
    assert_eq!(
        saved_showitem(&store),
        "header;LLL:EXT:myext/Resources/Private/Language/locallang.xlf:header"
    );
}

#[test]
fn remove_field_drops_matching_entry() {
    let (store, mut b) = session();
    b.add_field("a")
        .add_field("newField")
        .remove_field("newField")
        .save()
        .unwrap();
    assert_eq!(saved_showitem(&store), "a");
}

#[test]
fn remove_field_with_non_existing_name_is_noop() {
    let (store, mut b) = session();
    b.add_field("a")
        .remove_field("nonExistingField")
        .save()
        .unwrap();
    assert_eq!(saved_showitem(&store), "a");
}

#[test]
fn remove_field_matches_by_prefix() {
    let (store, mut b) = session();
    b.add_field("header")
        .add_field("header_layout")
        .add_field("body")
        .remove_field("header")
        .save()
        .unwrap();
    assert_eq!(saved_showitem(&store), "body");
}

#[test]
fn move_field_reorders_list() {
    let (store, mut b) = session();
    b.add_field("a")
        .add_field("b")
        .add_field("c")
        .move_field("c", "after:a")
        .save()
        .unwrap();
    assert_eq!(saved_showitem(&store), "a,c,b");
}

#[test]
fn move_field_with_replace_substitutes_anchor() {
    let (store, mut b) = session();
    b.add_field("a")
        .add_field("b")
        .add_field("c")
        .move_field("c", "replace:a")
        .save()
        .unwrap();
    assert_eq!(saved_showitem(&store), "c,b");
}

#[test]
fn move_field_with_label_applies_label() {
    let (store, mut b) = session();
    b.add_field("a")
        .add_field("b")
        .add_field("c")
        .move_field_labeled("c", "before:b", "New Label")
        .save()
        .unwrap();
    assert_eq!(saved_showitem(&store), "a,c;New Label,b");
}

#[test]
fn move_field_by_bare_name_moves_labeled_entry_without_duplicating() {
    let (store, mut b) = session();
    b.add_field_labeled("c", "", "Old Label")
        .add_field("a")
        .add_field("b")
        .move_field("c", "after:b")
        .save()
        .unwrap();
    assert_eq!(saved_showitem(&store), "a,b,c");
}

#[test]
fn move_field_replaces_existing_label_with_given_one() {
    let (store, mut b) = session();
    b.add_field_labeled("c", "", "Old Label")
        .add_field("a")
        .move_field_labeled("c", "after:a", "New Label")
        .save()
        .unwrap();
    assert_eq!(saved_showitem(&store), "a,c;New Label");
}

#[test]
fn move_field_with_unresolvable_anchor_leaves_list_untouched() {
    let (store, mut b) = session();
    b.add_field("a")
        .add_field("b")
        .add_field("c")
        .move_field_labeled("c", "before:doesNotExist", "New Label")
        .save()
        .unwrap();
    assert_eq!(saved_showitem(&store), "a,b,c");
}

#[test]
fn does_field_exist_checks_exact_serialized_form() {
    let (_, mut b) = session();
    b.add_field_labeled("header", "", "Label");
    assert!(b.does_field_exist("header;Label"));
    assert!(!b.does_field_exist("header"));
}

// ============================================================================
// PALETTES (MAIN LIST)
// ============================================================================

#[test]
fn palette_serializes_with_empty_label_slot() {
    let (store, mut b) = session();
    b.add_palette("newPalette").save().unwrap();
    assert_eq!(saved_showitem(&store), "--palette--;;newPalette");
}

#[test]
fn palette_with_label_serializes_label_slot() {
    let (store, mut b) = session();
    b.add_palette_labeled("newPalette", "", "My Label").save().unwrap();
    assert_eq!(saved_showitem(&store), "--palette--;My Label;newPalette");
}

#[test]
fn palettes_order_with_before_anchor() {
    let (store, mut b) = session();
    b.add_palette("p1")
        .add_palette("p2")
        .add_palette_at("p3", "before:--palette--;;p2")
        .save()
        .unwrap();
    assert_eq!(
        saved_showitem(&store),
        "--palette--;;p1,--palette--;;p3,--palette--;;p2"
    );
}

#[test]
fn palette_string_builds_position_anchors() {
    let (store, mut b) = session();
    b.add_palette("p1").add_palette("p2");
    let anchor = format!("before:{}", b.palette_string("p2"));
    b.add_palette_at("p3", &anchor).save().unwrap();
    assert_eq!(
        saved_showitem(&store),
        "--palette--;;p1,--palette--;;p3,--palette--;;p2"
    );
}

#[test]
fn palette_string_for_missing_palette_is_empty_sentinel() {
    let (_, mut b) = session();
    b.add_palette("p1");
    assert_eq!(b.palette_string("missing"), "");
}

#[test]
fn remove_palette_drops_reference_by_id() {
    let (store, mut b) = session();
    b.add_palette_labeled("p1", "", "Label")
        .add_palette("p2")
        .remove_palette("p1")
        .save()
        .unwrap();
    assert_eq!(saved_showitem(&store), "--palette--;;p2");
}

#[test]
fn move_palette_reorders_references() {
    let (store, mut b) = session();
    b.add_palette("p1")
        .add_palette("p2")
        .add_palette("p3")
        .move_palette("p2", "after:--palette--;;p3")
        .save()
        .unwrap();
    assert_eq!(
        saved_showitem(&store),
        "--palette--;;p1,--palette--;;p3,--palette--;;p2"
    );
}

#[test]
fn move_palette_with_unresolvable_anchor_is_noop() {
    let (store, mut b) = session();
    b.add_palette("p1")
        .add_palette("p2")
        .move_palette("p2", "after:--palette--;;missing")
        .save()
        .unwrap();
    assert_eq!(saved_showitem(&store), "--palette--;;p1,--palette--;;p2");
}

// ============================================================================
// DIVIDERS
// ============================================================================

#[test]
fn div_serializes_with_label() {
    let (store, mut b) = session();
    b.add_div("General").save().unwrap();
    assert_eq!(saved_showitem(&store), "--div--;General");
}

#[test]
fn div_positioned_before_nth_div() {
    let (store, mut b) = session();
    b.add_div("x").add_div("y");
    let anchor = format!("before:{}", b.div_string_at(0));
    b.add_div_at("first", &anchor).save().unwrap();
    assert_eq!(saved_showitem(&store), "--div--;first,--div--;x,--div--;y");
}

#[test]
fn remove_div_by_ordinal_counts_dividers_only() {
    let (store, mut b) = session();
    b.add_field("a")
        .add_div("x")
        .add_div("y")
        .remove_div_at(0)
        .save()
        .unwrap();
    assert_eq!(saved_showitem(&store), "a,--div--;y");
}

#[test]
fn remove_div_by_label() {
    let (store, mut b) = session();
    b.add_div("x")
        .add_div("y")
        .remove_div_by_label("x")
        .save()
        .unwrap();
    assert_eq!(saved_showitem(&store), "--div--;y");
}

#[test]
fn remove_div_with_out_of_range_ordinal_is_noop() {
    let (store, mut b) = session();
    b.add_div("x").remove_div_at(5).save().unwrap();
    assert_eq!(saved_showitem(&store), "--div--;x");
}

#[test]
fn div_string_lookups_return_empty_sentinel_when_missing() {
    let (_, mut b) = session();
    b.add_div("x").add_div("y");
    assert_eq!(b.div_string_at(1), "--div--;y");
    assert_eq!(b.div_string("x"), "--div--;x");
    assert_eq!(b.div_string_at(5), "");
    assert_eq!(b.div_string("missing"), "");
}

// ============================================================================
// OVERRIDES
// ============================================================================

#[test]
fn add_override_is_flushed_on_save() {
    let (store, mut b) = session();
    let override_config = json!({"config": {"type": "input"}});
    b.add_field("field1")
        .add_override("field1", override_config.clone())
        .save()
        .unwrap();

    let config = store.get_type(TABLE, TYPE).unwrap().unwrap();
    let overrides = config.columns_overrides.unwrap();
    assert_eq!(overrides["field1"], override_config);
}

#[test]
fn field_overrides_are_keyed_by_plain_name_despite_label() {
    let (store, mut b) = session();
    b.add_field_with_overrides("field1", "", "A Label", json!({"config": "input"}))
        .save()
        .unwrap();

    let config = store.get_type(TABLE, TYPE).unwrap().unwrap();
    assert_eq!(config.showitem, "field1;A Label");
    let overrides = config.columns_overrides.unwrap();
    assert!(overrides.contains_key("field1"));
    assert!(!overrides.contains_key("field1;A Label"));
}

#[test]
fn untouched_override_map_is_not_written() {
    let (store, mut b) = session();
    b.add_field("a").save().unwrap();
    let config = store.get_type(TABLE, TYPE).unwrap().unwrap();
    assert_eq!(config.columns_overrides, None);
}

// ============================================================================
// SESSION PALETTE REGISTRY + SUB-LISTS
// ============================================================================

#[test]
fn custom_palette_is_written_with_fields_and_label() {
    let (store, mut b) = session();
    b.add_custom_palette_at("custom", &["field1", "field2"], "My Palette", "")
        .save()
        .unwrap();

    let palette = saved_palette(&store, "custom");
    assert_eq!(palette.label, "My Palette");
    assert_eq!(palette.showitem, "field1,field2");
}

#[test]
fn custom_palette_with_position_also_inserts_reference() {
    let (store, mut b) = session();
    b.add_field("a")
        .add_custom_palette_at("custom", &["f1"], "", "before:a")
        .save()
        .unwrap();
    assert_eq!(saved_showitem(&store), "--palette--;;custom,a");
}

#[test]
fn add_field_to_palette_appends_to_sub_list() {
    let (store, mut b) = session();
    b.add_custom_palette("custom", &["field1", "field2"])
        .add_palette("custom")
        .add_field_to_palette("custom", "field3")
        .unwrap()
        .save()
        .unwrap();

    assert_eq!(saved_palette(&store, "custom").showitem, "field1,field2,field3");
    assert_eq!(saved_showitem(&store), "--palette--;;custom");
}

#[test]
fn palette_sub_list_honors_position_directives() {
    let (store, mut b) = session();
    b.add_custom_palette("custom", &["field1", "field2"])
        .add_palette("custom")
        .add_field_to_palette_at("custom", "field3", "after:field1")
        .unwrap()
        .add_field_to_palette_at("custom", "field5", "replace:field2")
        .unwrap()
        .save()
        .unwrap();

    assert_eq!(saved_palette(&store, "custom").showitem, "field1,field3,field5");
}

#[test]
fn remove_field_from_palette_drops_first_occurrence() {
    let (store, mut b) = session();
    b.add_custom_palette("custom", &["field1", "field2"])
        .add_palette("custom")
        .remove_field_from_palette("custom", "field1")
        .unwrap()
        .save()
        .unwrap();

    assert_eq!(saved_palette(&store, "custom").showitem, "field2");
}

#[test]
fn editing_a_store_only_palette_pulls_it_into_the_session() {
    let (store, mut b) = session();
    store
        .put_palette(TABLE, "existing", PaletteConfig::new("Label", "a,b"))
        .unwrap();

    b.add_field_to_palette("existing", "c").unwrap().save().unwrap();

    let palette = saved_palette(&store, "existing");
    assert_eq!(palette.label, "Label");
    assert_eq!(palette.showitem, "a,b,c");
}

#[test]
fn initialize_palette_empties_sub_list_but_keeps_label_and_reference() {
    let (store, mut b) = session();
    b.add_custom_palette_at("palette", &["field1", "field2"], "Keep Me", "")
        .add_palette("palette")
        .initialize_palette("palette")
        .unwrap()
        .save()
        .unwrap();

    let palette = saved_palette(&store, "palette");
    assert_eq!(palette.showitem, "");
    assert_eq!(palette.label, "Keep Me");
    assert_eq!(saved_showitem(&store), "--palette--;;palette");
}

#[test]
fn set_palette_fields_replaces_sub_list() {
    let (store, mut b) = session();
    b.add_custom_palette("custom", &["field1"])
        .set_palette_fields("custom", &["x", "y"])
        .save()
        .unwrap();
    assert_eq!(saved_palette(&store, "custom").showitem, "x,y");
}

// ============================================================================
// LIFECYCLE: INITIALIZE / LOAD / COPY / SAVE
// ============================================================================

#[test]
fn initialize_clears_list_and_forces_empty_override_map_write() {
    let (store, mut b) = session();
    b.add_field("field1")
        .add_field_with_overrides("field2", "", "", json!({"config": "input"}))
        .initialize()
        .save()
        .unwrap();

    let config = store.get_type(TABLE, TYPE).unwrap().unwrap();
    assert_eq!(config.showitem, "");
    assert_eq!(config.columns_overrides, Some(serde_json::Map::new()));
}

#[test]
fn force_write_flag_does_not_leak_into_next_session() {
    let (store, mut b) = session();
    b.initialize().save().unwrap();

    b.set_table(TABLE)
        .set_type("other")
        .add_field("a")
        .save()
        .unwrap();

    // The first record was explicitly emptied, the second was never touched.
    let first = store.get_type(TABLE, TYPE).unwrap().unwrap();
    assert_eq!(first.columns_overrides, Some(serde_json::Map::new()));
    let second = store.get_type(TABLE, "other").unwrap().unwrap();
    assert_eq!(second.columns_overrides, None);
}

#[test]
fn fields_added_after_initialize_survive() {
    let (store, mut b) = session();
    b.add_field("field1")
        .add_field_with_overrides("field2", "", "", json!({"config": "input"}))
        .initialize()
        .add_field("field3")
        .add_field_with_overrides("field5", "", "", json!({"config": "input"}))
        .save()
        .unwrap();

    let config = store.get_type(TABLE, TYPE).unwrap().unwrap();
    assert_eq!(config.showitem, "field3,field5");
    let overrides = config.columns_overrides.unwrap();
    assert_eq!(overrides.len(), 1);
    assert!(overrides.contains_key("field5"));
}

#[test]
fn load_hydrates_list_and_overrides_from_store() {
    let (store, mut b) = session();
    let mut overrides = serde_json::Map::new();
    overrides.insert("a".to_string(), json!({"config": "input"}));
    store
        .put_type(
            TABLE,
            TYPE,
            TypeConfig {
                showitem: " a , --div--;x ,b".to_string(),
                columns_overrides: Some(overrides),
            },
        )
        .unwrap();

    b.load().unwrap();
    assert!(b.does_field_exist("a"));
    assert!(b.does_field_exist("--div--;x"));
    assert_eq!(b.as_type_config().showitem, "a,--div--;x,b");
}

#[test]
fn load_of_missing_type_is_type_not_found() {
    let (_, mut b) = session();
    let err = b.load().unwrap_err();
    assert!(matches!(
        err,
        FormListError::Store(StoreError::TypeNotFound { .. })
    ));
}

#[test]
fn load_configuration_resets_before_loading() {
    let (store, mut b) = session();
    store
        .put_type("other", "x", TypeConfig::with_showitem("a,b"))
        .unwrap();

    b.add_field("stale");
    b.load_configuration("other", "x").unwrap();
    assert_eq!(b.table(), "other");
    assert_eq!(b.selected_type(), "x");
    assert!(!b.does_field_exist("stale"));
    assert_eq!(b.as_type_config().showitem, "a,b");
}

#[test]
fn copy_from_type_copies_list_under_original_type_name() {
    let (store, mut b) = session();
    b.add_field("a").add_field("b").save().unwrap();

    b.set_table(TABLE)
        .set_type("newType")
        .copy_from_type(TYPE)
        .unwrap()
        .save()
        .unwrap();

    assert_eq!(
        store.get_type(TABLE, "newType").unwrap().unwrap().showitem,
        "a,b"
    );
}

#[test]
fn copy_from_type_then_edit_changes_only_the_copy() {
    let (store, mut b) = session();
    b.add_field("field3").add_field("field5").save().unwrap();

    b.set_table(TABLE)
        .set_type("newType")
        .copy_from_type(TYPE)
        .unwrap()
        .add_field_at("field4", "before:field5")
        .save()
        .unwrap();

    assert_eq!(
        store.get_type(TABLE, "newType").unwrap().unwrap().showitem,
        "field3,field4,field5"
    );
    assert_eq!(saved_showitem(&store), "field3,field5");
}

#[test]
fn copy_from_missing_type_restores_selected_type() {
    let (_, mut b) = session();
    let err = b.copy_from_type("ghost").unwrap_err();
    assert!(matches!(
        err,
        FormListError::Store(StoreError::TypeNotFound { .. })
    ));
    assert_eq!(b.selected_type(), TYPE);
}

#[test]
fn as_type_config_returns_structure_without_store_write() {
    let (store, mut b) = session();
    let override_config = json!({"config": {"label": "Test"}});
    let config = b
        .add_field("field1")
        .add_field("field2")
        .add_override("field1", override_config.clone())
        .as_type_config();

    assert_eq!(config.showitem, "field1,field2");
    assert_eq!(config.columns_overrides.unwrap()["field1"], override_config);
    assert_eq!(store.type_count(), 0);
}

#[test]
fn save_load_round_trip_preserves_list() {
    let (_, mut b) = session();
    b.add_field("a")
        .add_div("x")
        .add_palette_labeled("p", "", "Label")
        .save()
        .unwrap();

    b.load_configuration(TABLE, TYPE).unwrap();
    assert_eq!(
        b.as_type_config().showitem,
        "a,--div--;x,--palette--;Label;p"
    );
}
