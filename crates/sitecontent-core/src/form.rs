//! Form validation for the admin editors.
//!
//! Errors, field bands and dirtiness are derived from the current values
//! and the schema on every read. [`FormState`] holds only values and the
//! touched set.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Usage at or above this share of `max_length` is a warning.
pub const WARNING_PERCENTAGE: f64 = 80.0;

/// Usage above this share of `max_length` is an error.
pub const ERROR_PERCENTAGE: f64 = 100.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRule {
    pub max_length: Option<usize>,
    #[serde(default)]
    pub required: bool,
    /// A required field is also satisfied when this other field is filled.
    #[serde(skip)]
    pub unless: Option<&'static str>,
}

impl FieldRule {
    pub fn required(max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
            required: true,
            unless: None,
        }
    }

    /// Required unless `other` holds a value.
    pub fn required_unless(max_length: usize, other: &'static str) -> Self {
        Self {
            unless: Some(other),
            ..Self::required(max_length)
        }
    }

    pub fn optional(max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
            required: false,
            unless: None,
        }
    }
}

/// Field name to rule.
pub type FormSchema = BTreeMap<String, FieldRule>;

/// Field name to current value.
pub type FormValues = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldError {
    Required,
    ExceedsLimit,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Required => "required",
            Self::ExceedsLimit => "exceeds limit",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldBand {
    Normal,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldStatus {
    pub band: FieldBand,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub values: FormValues,
    pub touched: BTreeSet<String>,
}

impl FormState {
    pub fn new(values: FormValues) -> Self {
        Self {
            values,
            touched: BTreeSet::new(),
        }
    }

    /// Set one value and mark the field touched.
    #[must_use]
    pub fn update_field(mut self, field: &str, value: impl Into<String>) -> Self {
        self.values.insert(field.to_string(), value.into());
        self.touched.insert(field.to_string());
        self
    }
}

fn length(value: &str) -> usize {
    value.chars().count()
}

fn blank(values: &FormValues, field: &str) -> bool {
    values.get(field).is_none_or(|v| v.trim().is_empty())
}

/// At most one error per schema field; an empty required field never
/// reports a length error.
pub fn compute_errors(values: &FormValues, schema: &FormSchema) -> BTreeMap<String, FieldError> {
    schema
        .iter()
        .filter_map(|(field, rule)| {
            let value = values.get(field).map(String::as_str).unwrap_or("");
            let error = if rule.required
                && value.trim().is_empty()
                && rule.unless.is_none_or(|other| blank(values, other))
            {
                Some(FieldError::Required)
            } else if rule.max_length.is_some_and(|max| length(value) > max) {
                Some(FieldError::ExceedsLimit)
            } else {
                None
            };
            error.map(|e| (field.clone(), e))
        })
        .collect()
}

/// Character-limit band for one field. Fields without a limit are always
/// normal at 0%.
pub fn field_state(values: &FormValues, schema: &FormSchema, field: &str) -> FieldStatus {
    let max = schema.get(field).and_then(|rule| rule.max_length);
    let percentage = match max {
        Some(max) if max > 0 => {
            let len = values.get(field).map(|v| length(v)).unwrap_or(0);
            (len * 100) as f64 / max as f64
        }
        _ => 0.0,
    };
    let band = if percentage > ERROR_PERCENTAGE {
        FieldBand::Error
    } else if percentage >= WARNING_PERCENTAGE {
        FieldBand::Warning
    } else {
        FieldBand::Normal
    };
    FieldStatus { band, percentage }
}

pub fn is_dirty(values: &FormValues, initial: &FormValues) -> bool {
    values != initial
}

pub fn reset(initial: &FormValues) -> FormState {
    FormState::new(initial.clone())
}

/// An editor form: schema, the snapshot taken at load, and live state.
#[derive(Debug, Clone)]
pub struct Form {
    schema: FormSchema,
    initial: FormValues,
    state: FormState,
}

impl Form {
    pub fn new(schema: FormSchema, initial: FormValues) -> Self {
        let state = FormState::new(initial.clone());
        Self {
            schema,
            initial,
            state,
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn values(&self) -> &FormValues {
        &self.state.values
    }

    pub fn update(&mut self, field: &str, value: impl Into<String>) {
        self.state = std::mem::take(&mut self.state).update_field(field, value);
    }

    pub fn errors(&self) -> BTreeMap<String, FieldError> {
        compute_errors(&self.state.values, &self.schema)
    }

    /// Errors for fields the user has touched.
    pub fn visible_errors(&self) -> BTreeMap<String, FieldError> {
        let mut errors = self.errors();
        errors.retain(|field, _| self.state.touched.contains(field));
        errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        is_dirty(&self.state.values, &self.initial)
    }

    pub fn field_state(&self, field: &str) -> FieldStatus {
        field_state(&self.state.values, &self.schema, field)
    }

    pub fn reset(&mut self) {
        self.state = reset(&self.initial);
    }
}

/// Built-in schemas for the admin editors.
pub mod schemas {
    use super::{FieldRule, FormSchema};

    fn build(rules: &[(&str, FieldRule)]) -> FormSchema {
        rules
            .iter()
            .map(|(field, rule)| (field.to_string(), *rule))
            .collect()
    }

    pub fn testimonial() -> FormSchema {
        build(&[
            ("name", FieldRule::required(60)),
            ("role", FieldRule::optional(60)),
            ("company", FieldRule::optional(80)),
            ("quote", FieldRule::required(250)),
        ])
    }

    pub fn hero() -> FormSchema {
        build(&[
            ("headline", FieldRule::required_unless(80, "title")),
            ("title", FieldRule::required_unless(80, "headline")),
            ("subtitle", FieldRule::optional(160)),
            ("description", FieldRule::optional(300)),
            ("ctaText", FieldRule::optional(30)),
            ("secondaryCtaText", FieldRule::optional(30)),
        ])
    }

    pub fn stat() -> FormSchema {
        build(&[
            ("label", FieldRule::required(40)),
            ("value", FieldRule::required(12)),
            ("suffix", FieldRule::optional(4)),
        ])
    }

    pub fn course() -> FormSchema {
        build(&[
            ("title", FieldRule::required(100)),
            ("description", FieldRule::required(500)),
            ("duration", FieldRule::optional(40)),
            ("level", FieldRule::optional(40)),
        ])
    }

    pub fn section_header() -> FormSchema {
        build(&[
            ("eyebrow", FieldRule::optional(40)),
            ("title", FieldRule::required(80)),
            ("subtitle", FieldRule::optional(200)),
        ])
    }

    /// Look up a built-in schema by editor name.
    pub fn by_name(name: &str) -> Option<FormSchema> {
        match name {
            "testimonial" => Some(testimonial()),
            "hero" => Some(hero()),
            "stat" => Some(stat()),
            "course" => Some(course()),
            "section-header" => Some(section_header()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote_schema() -> FormSchema {
        FormSchema::from([("quote".to_string(), FieldRule::required(250))])
    }

    fn quote(len: usize) -> FormValues {
        FormValues::from([("quote".to_string(), "x".repeat(len))])
    }

    #[test]
    fn empty_required_field() {
        let errors = compute_errors(&quote(0), &quote_schema());
        assert_eq!(errors.get("quote"), Some(&FieldError::Required));
        assert_eq!(errors["quote"].to_string(), "required");
    }

    #[test]
    fn whitespace_counts_as_empty() {
        let values = FormValues::from([("quote".to_string(), "   ".to_string())]);
        let errors = compute_errors(&values, &quote_schema());
        assert_eq!(errors.get("quote"), Some(&FieldError::Required));
    }

    #[test]
    fn missing_value_is_required_error() {
        let errors = compute_errors(&FormValues::new(), &quote_schema());
        assert_eq!(errors.get("quote"), Some(&FieldError::Required));
    }

    #[test]
    fn over_limit() {
        let errors = compute_errors(&quote(251), &quote_schema());
        assert_eq!(errors.get("quote"), Some(&FieldError::ExceedsLimit));
        assert_eq!(errors["quote"].to_string(), "exceeds limit");
        assert!(compute_errors(&quote(250), &quote_schema()).is_empty());
    }

    #[test]
    fn bands() {
        let schema = quote_schema();
        let at_80 = field_state(&quote(200), &schema, "quote");
        assert_eq!(at_80.band, FieldBand::Warning);
        assert_eq!(at_80.percentage, 80.0);

        assert_eq!(field_state(&quote(180), &schema, "quote").band, FieldBand::Normal);
        assert_eq!(field_state(&quote(250), &schema, "quote").band, FieldBand::Warning);
        assert_eq!(field_state(&quote(251), &schema, "quote").band, FieldBand::Error);
    }

    #[test]
    fn unlimited_field_is_normal() {
        let schema = FormSchema::from([("notes".to_string(), FieldRule::default())]);
        let values = FormValues::from([("notes".to_string(), "x".repeat(10_000))]);
        let status = field_state(&values, &schema, "notes");
        assert_eq!(status.band, FieldBand::Normal);
        assert_eq!(status.percentage, 0.0);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let schema = FormSchema::from([("name".to_string(), FieldRule::optional(3))]);
        let values = FormValues::from([("name".to_string(), "été".to_string())]);
        assert!(compute_errors(&values, &schema).is_empty());
    }

    #[test]
    fn update_marks_touched() {
        let state = FormState::default().update_field("quote", "Great course");
        assert_eq!(state.values["quote"], "Great course");
        assert!(state.touched.contains("quote"));
    }

    #[test]
    fn form_lifecycle() {
        let initial = FormValues::from([
            ("name".to_string(), "Asha".to_string()),
            ("quote".to_string(), "Loved it".to_string()),
        ]);
        let mut form = Form::new(schemas::testimonial(), initial);
        assert!(form.is_valid());
        assert!(!form.is_dirty());

        form.update("quote", "");
        assert!(form.is_dirty());
        assert_eq!(form.visible_errors().len(), 1);
        assert_eq!(form.errors().get("quote"), Some(&FieldError::Required));

        form.update("quote", "Loved it");
        assert!(!form.is_dirty());

        form.update("name", "");
        form.reset();
        assert!(form.is_valid());
        assert!(form.visible_errors().is_empty());
        assert_eq!(form.values()["name"], "Asha");
    }

    #[test]
    fn hero_needs_headline_or_title() {
        let schema = schemas::hero();
        let errors = compute_errors(&FormValues::new(), &schema);
        assert_eq!(errors.get("headline"), Some(&FieldError::Required));
        assert_eq!(errors.get("title"), Some(&FieldError::Required));

        let title_only = FormValues::from([("title".to_string(), "Study abroad".to_string())]);
        assert!(compute_errors(&title_only, &schema).is_empty());

        let headline_only = FormValues::from([("headline".to_string(), "Welcome".to_string())]);
        assert!(compute_errors(&headline_only, &schema).is_empty());
    }

    #[test]
    fn visible_errors_hide_untouched_fields() {
        let form = Form::new(schemas::hero(), FormValues::new());
        assert_eq!(form.errors().get("headline"), Some(&FieldError::Required));
        assert!(form.visible_errors().is_empty());
    }
}
