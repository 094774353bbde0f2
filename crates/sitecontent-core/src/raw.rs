//! Raw value shape detection and field coercion.
//!
//! The remote store enforces no schema. A path may hold an ordered
//! sequence, a keyed mapping, a scalar, or nothing at all, and the same
//! logical collection has been written both ways over time. Every
//! normalizer resolves the shape once through [`RawShape::of`] and then
//! reads fields through [`Fields`], which substitutes defaults for
//! anything missing or mistyped.

use serde_json::{Map, Value};

/// Default display position for records without an explicit `order`.
pub const DEFAULT_ORDER: i64 = 999;

/// Shape of a raw value as delivered by the store.
#[derive(Debug, Clone, Copy)]
pub enum RawShape<'a> {
    Sequence(&'a [Value]),
    Mapping(&'a Map<String, Value>),
    Scalar(&'a Value),
    Absent,
}

impl<'a> RawShape<'a> {
    /// Classify a raw value. JSON `null` counts as absent.
    pub fn of(raw: Option<&'a Value>) -> Self {
        match raw {
            None | Some(Value::Null) => Self::Absent,
            Some(Value::Array(items)) => Self::Sequence(items),
            Some(Value::Object(map)) => Self::Mapping(map),
            Some(other) => Self::Scalar(other),
        }
    }

    /// Flatten into `(id, object)` entries.
    ///
    /// Sequence elements take their `id` field, or `"{section}-{index}"`
    /// when it is missing or blank. Mapping entries take their key. Elements that
    /// are not objects (sparse-array holes, stray scalars) are skipped.
    pub fn entries(self, section: &str) -> Vec<(String, Fields<'a>)> {
        match self {
            Self::Sequence(items) => items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| {
                    let fields = Fields::of(item)?;
                    let id = fields
                        .opt_text("id")
                        .filter(|id| !id.trim().is_empty())
                        .unwrap_or_else(|| format!("{section}-{index}"));
                    Some((id, fields))
                })
                .collect(),
            Self::Mapping(map) => map
                .iter()
                .filter_map(|(key, item)| Some((key.clone(), Fields::of(item)?)))
                .collect(),
            Self::Scalar(_) | Self::Absent => Vec::new(),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Typed, defaulting accessor over one raw object.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    /// Wrap a raw value if it is an object.
    pub fn of(value: &'a Value) -> Option<Self> {
        value.as_object().map(Self::from_map)
    }

    pub fn from_map(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    /// A nested object field, if present.
    pub fn nested(&self, key: &str) -> Option<Fields<'a>> {
        self.get(key).and_then(Fields::of)
    }

    /// Whether `key` holds a non-null value.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    /// String field, or `""`.
    pub fn text(&self, key: &str) -> String {
        self.opt_text(key).unwrap_or_default()
    }

    /// String field if present. Numbers are rendered, other types rejected.
    pub fn opt_text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// First non-empty string among `keys`, or `""`.
    pub fn text_any(&self, keys: &[&str]) -> String {
        keys.iter()
            .map(|key| self.text(key))
            .find(|s| !s.is_empty())
            .unwrap_or_default()
    }

    /// Numeric field, parsing strings. Anything unparseable becomes `0`.
    pub fn number(&self, key: &str) -> f64 {
        self.get(key).and_then(coerce_number).unwrap_or(0.0)
    }

    /// Boolean field. Accepts `"true"`/`"false"` strings; otherwise `false`.
    pub fn flag(&self, key: &str) -> bool {
        match self.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// The `order` field, or [`DEFAULT_ORDER`].
    pub fn order(&self) -> i64 {
        self.get("order")
            .and_then(coerce_number)
            .filter(|n| n.is_finite())
            .map(|n| n as i64)
            .unwrap_or(DEFAULT_ORDER)
    }

    /// A nested sub-item collection delivered as a sequence or a mapping.
    pub fn items(&self, key: &str) -> Vec<String> {
        sub_items(self.get(key))
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Reconcile a sub-item collection (topics, deliverables, outcomes).
///
/// Items may be bare strings or objects carrying `text`, `title` or
/// `name` plus an optional `order`. Object items are sorted by `order`
/// (stable); empty items are dropped. One level only: nested
/// collections inside an item are ignored.
pub fn sub_items(raw: Option<&Value>) -> Vec<String> {
    let values: Vec<&Value> = match RawShape::of(raw) {
        RawShape::Sequence(items) => items.iter().collect(),
        RawShape::Mapping(map) => map.values().collect(),
        RawShape::Scalar(_) | RawShape::Absent => return Vec::new(),
    };

    let mut items: Vec<(i64, String)> = values
        .into_iter()
        .filter_map(|value| match value {
            Value::String(s) => Some((DEFAULT_ORDER, s.clone())),
            Value::Object(_) => {
                let fields = Fields::of(value)?;
                Some((fields.order(), fields.text_any(&["text", "title", "name"])))
            }
            _ => None,
        })
        .filter(|(_, text)| !text.trim().is_empty())
        .collect();

    items.sort_by_key(|(order, _)| *order);
    items.into_iter().map(|(_, text)| text).collect()
}
