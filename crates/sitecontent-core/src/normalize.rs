//! Total normalizers from raw store values to canonical records.
//!
//! A normalizer never fails: absent values, scalars, partially-shaped
//! objects and sequence-vs-mapping drift all degrade to defaults. The
//! canonical shape is an allow-list, so unknown raw fields are dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::raw::{Fields, RawShape, sub_items};

/// A record that lives in a list section (`stats`, `courses`, ...).
pub trait ListRecord: Sized {
    /// Build from one raw object. `id` comes from the store key or the
    /// element's `id` field.
    fn from_fields(id: String, fields: &Fields<'_>) -> Self;

    /// Display position. Never used for identity.
    fn order(&self) -> i64;
}

/// A record that is the whole content of one path (a hero, a header).
pub trait SingletonRecord: Default {
    fn from_fields(fields: &Fields<'_>) -> Self;

    /// Whether the anchor field carries authored content.
    fn has_content(&self) -> bool;
}

/// Normalize a list section and sort it by `order` (stable).
///
/// `section` names the synthetic ids given to sequence elements that
/// carry no `id` of their own.
pub fn normalize_list<R: ListRecord>(section: &str, raw: Option<&Value>) -> Vec<R> {
    let mut records: Vec<R> = RawShape::of(raw)
        .entries(section)
        .into_iter()
        .map(|(id, fields)| R::from_fields(id, &fields))
        .collect();
    // `sort_by_key` is stable: equal orders keep source iteration order.
    records.sort_by_key(R::order);
    records
}

/// Normalize a singleton section. Anything but a mapping yields the default.
pub fn normalize_singleton<R: SingletonRecord>(raw: Option<&Value>) -> R {
    match RawShape::of(raw) {
        RawShape::Mapping(map) => R::from_fields(&Fields::from_map(map)),
        RawShape::Sequence(_) | RawShape::Scalar(_) | RawShape::Absent => R::default(),
    }
}

/// Sub-items for one parent record, stored in a side table keyed by the
/// parent's id (`courseTopics/{courseId}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemGroup {
    pub id: String,
    pub items: Vec<String>,
}

/// Normalize a side table of sub-item groups.
///
/// Mapping: each key is a parent id. The value is either a `{ items }`
/// record or the sub-item collection itself.
/// Sequence: each element is `{ id, items }`; elements without an `id`
/// get `"{section}-{index}"`.
pub fn normalize_item_groups(section: &str, raw: Option<&Value>) -> Vec<ItemGroup> {
    match RawShape::of(raw) {
        RawShape::Mapping(map) => map
            .iter()
            .map(|(id, value)| ItemGroup {
                id: id.clone(),
                items: match Fields::of(value) {
                    Some(fields) if fields.has("items") => fields.items("items"),
                    _ => sub_items(Some(value)),
                },
            })
            .collect(),
        RawShape::Sequence(_) => RawShape::of(raw)
            .entries(section)
            .into_iter()
            .map(|(id, fields)| ItemGroup {
                id,
                items: fields.items("items"),
            })
            .collect(),
        RawShape::Scalar(_) | RawShape::Absent => Vec::new(),
    }
}

/// A list record whose sub-items a side table may override.
pub trait ItemParent: ListRecord {
    fn id(&self) -> &str;
    fn items_mut(&mut self) -> &mut Vec<String>;
}

/// [`attach_items`] for records that know their own id and sub-items.
pub fn attach_groups<R: ItemParent>(records: &mut [R], groups: &[ItemGroup]) {
    attach_items(records, groups, R::id, R::items_mut);
}

/// Replace each record's inline sub-items with its side-table group,
/// when that group exists and is non-empty.
pub fn attach_items<R>(
    records: &mut [R],
    groups: &[ItemGroup],
    id_of: impl Fn(&R) -> &str,
    items_of: impl Fn(&mut R) -> &mut Vec<String>,
) {
    for record in records.iter_mut() {
        let group = groups
            .iter()
            .find(|g| g.id == id_of(record) && !g.items.is_empty());
        if let Some(group) = group {
            *items_of(record) = group.items.clone();
        }
    }
}
