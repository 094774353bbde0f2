//! Canonical records for list sections.
//!
//! Wire names are camelCase to match what the admin panel writes.

use serde::{Deserialize, Serialize};

use crate::normalize::{ItemParent, ListRecord};
use crate::raw::Fields;

/// A headline number ("5000+ graduates").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    pub id: String,
    pub label: String,
    pub value: f64,
    pub prefix: String,
    pub suffix: String,
    pub icon: String,
    pub order: i64,
}

impl ListRecord for Stat {
    fn from_fields(id: String, f: &Fields<'_>) -> Self {
        Self {
            id,
            label: f.text("label"),
            value: f.number("value"),
            prefix: f.text("prefix"),
            suffix: f.text("suffix"),
            icon: f.text("icon"),
            order: f.order(),
        }
    }

    fn order(&self) -> i64 {
        self.order
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub duration: String,
    pub level: String,
    pub mode: String,
    pub price: f64,
    pub image: String,
    pub featured: bool,
    /// Inline topics; replaced by `courseTopics/{id}` when that exists.
    pub topics: Vec<String>,
    pub order: i64,
}

impl ListRecord for Course {
    fn from_fields(id: String, f: &Fields<'_>) -> Self {
        Self {
            id,
            title: f.text("title"),
            slug: f.text("slug"),
            description: f.text("description"),
            category: f.text("category"),
            duration: f.text("duration"),
            level: f.text("level"),
            mode: f.text("mode"),
            price: f.number("price"),
            image: f.text("image"),
            featured: f.flag("featured"),
            topics: f.items("topics"),
            order: f.order(),
        }
    }

    fn order(&self) -> i64 {
        self.order
    }
}

impl ItemParent for Course {
    fn id(&self) -> &str {
        &self.id
    }

    fn items_mut(&mut self) -> &mut Vec<String> {
        &mut self.topics
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: String,
    pub name: String,
    pub role: String,
    pub company: String,
    pub quote: String,
    pub rating: f64,
    pub image: String,
    pub order: i64,
}

impl ListRecord for Testimonial {
    fn from_fields(id: String, f: &Fields<'_>) -> Self {
        Self {
            id,
            name: f.text("name"),
            role: f.text("role"),
            company: f.text("company"),
            quote: f.text("quote"),
            rating: f.number("rating"),
            image: f.text("image"),
            order: f.order(),
        }
    }

    fn order(&self) -> i64 {
        self.order
    }
}

/// A member of the leadership team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leader {
    pub id: String,
    pub name: String,
    pub role: String,
    pub bio: String,
    pub image: String,
    pub linkedin: String,
    pub order: i64,
}

impl ListRecord for Leader {
    fn from_fields(id: String, f: &Fields<'_>) -> Self {
        Self {
            id,
            name: f.text("name"),
            role: f.text("role"),
            bio: f.text("bio"),
            image: f.text("image"),
            linkedin: f.text("linkedin"),
            order: f.order(),
        }
    }

    fn order(&self) -> i64 {
        self.order
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyMember {
    pub id: String,
    pub name: String,
    pub designation: String,
    pub specialization: String,
    pub experience: String,
    pub image: String,
    pub order: i64,
}

impl ListRecord for FacultyMember {
    fn from_fields(id: String, f: &Fields<'_>) -> Self {
        Self {
            id,
            name: f.text("name"),
            designation: f.text("designation"),
            specialization: f.text("specialization"),
            experience: f.text("experience"),
            image: f.text("image"),
            order: f.order(),
        }
    }

    fn order(&self) -> i64 {
        self.order
    }
}

/// A country the institute has placed students from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: String,
    pub name: String,
    pub flag: String,
    pub students: f64,
    pub order: i64,
}

impl ListRecord for Country {
    fn from_fields(id: String, f: &Fields<'_>) -> Self {
        Self {
            id,
            name: f.text("name"),
            flag: f.text("flag"),
            students: f.number("students"),
            order: f.order(),
        }
    }

    fn order(&self) -> i64 {
        self.order
    }
}

/// An accrediting body and what it certifies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccreditationDetail {
    pub id: String,
    pub name: String,
    pub description: String,
    pub logo: String,
    pub link: String,
    pub features: Vec<String>,
    pub order: i64,
}

impl ListRecord for AccreditationDetail {
    fn from_fields(id: String, f: &Fields<'_>) -> Self {
        Self {
            id,
            name: f.text("name"),
            description: f.text("description"),
            logo: f.text("logo"),
            link: f.text("link"),
            features: f.items("features"),
            order: f.order(),
        }
    }

    fn order(&self) -> i64 {
        self.order
    }
}

/// Icon + title + blurb card. Used by `accreditationFeatures` and
/// `certificationBenefits`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub order: i64,
}

impl ListRecord for Feature {
    fn from_fields(id: String, f: &Fields<'_>) -> Self {
        Self {
            id,
            title: f.text("title"),
            description: f.text("description"),
            icon: f.text("icon"),
            order: f.order(),
        }
    }

    fn order(&self) -> i64 {
        self.order
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    /// Inline deliverables; replaced by `serviceDeliverables/{id}` when that exists.
    pub deliverables: Vec<String>,
    pub order: i64,
}

impl ListRecord for Service {
    fn from_fields(id: String, f: &Fields<'_>) -> Self {
        Self {
            id,
            title: f.text("title"),
            description: f.text("description"),
            icon: f.text("icon"),
            deliverables: f.items("deliverables"),
            order: f.order(),
        }
    }

    fn order(&self) -> i64 {
        self.order
    }
}

impl ItemParent for Service {
    fn id(&self) -> &str {
        &self.id
    }

    fn items_mut(&mut self) -> &mut Vec<String> {
        &mut self.deliverables
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Industry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub order: i64,
}

impl ListRecord for Industry {
    fn from_fields(id: String, f: &Fields<'_>) -> Self {
        Self {
            id,
            name: f.text("name"),
            description: f.text("description"),
            icon: f.text("icon"),
            order: f.order(),
        }
    }

    fn order(&self) -> i64 {
        self.order
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStudy {
    pub id: String,
    pub title: String,
    pub client: String,
    pub industry: String,
    pub challenge: String,
    pub solution: String,
    pub image: String,
    /// Inline outcomes; replaced by `caseStudyOutcomes/{id}` when that exists.
    pub outcomes: Vec<String>,
    pub order: i64,
}

impl ListRecord for CaseStudy {
    fn from_fields(id: String, f: &Fields<'_>) -> Self {
        Self {
            id,
            title: f.text("title"),
            client: f.text("client"),
            industry: f.text("industry"),
            challenge: f.text("challenge"),
            solution: f.text("solution"),
            image: f.text("image"),
            outcomes: f.items("outcomes"),
            order: f.order(),
        }
    }

    fn order(&self) -> i64 {
        self.order
    }
}

impl ItemParent for CaseStudy {
    fn id(&self) -> &str {
        &self.id
    }

    fn items_mut(&mut self) -> &mut Vec<String> {
        &mut self.outcomes
    }
}

/// Contact/enquiry card shown beside CTA banners.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaInfoCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub link: String,
    pub order: i64,
}

impl ListRecord for CtaInfoCard {
    fn from_fields(id: String, f: &Fields<'_>) -> Self {
        Self {
            id,
            title: f.text("title"),
            description: f.text("description"),
            icon: f.text("icon"),
            link: f.text("link"),
            order: f.order(),
        }
    }

    fn order(&self) -> i64 {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_list;
    use serde_json::json;

    #[test]
    fn stats_fill_defaults_and_drop_unknown_fields() {
        let raw = json!({
            "s1": { "label": "Graduates", "value": "5000", "suffix": "+", "colour": "red" },
            "s2": { "value": [1, 2] },
        });
        let stats: Vec<Stat> = normalize_list("stats", Some(&raw));
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].value, 5000.0);
        assert_eq!(stats[0].suffix, "+");
        assert_eq!(stats[1], Stat {
            id: "s2".into(),
            order: 999,
            ..Stat::default()
        });
        let out = serde_json::to_value(&stats[0]).unwrap();
        assert!(out.get("colour").is_none());
    }

    #[test]
    fn dual_shape_equivalence() {
        let as_map = json!({
            "pm": { "title": "Project Management", "order": 2, "topics": { "a": "Scope", "b": "Risk" } },
            "ba": { "title": "Business Analysis", "order": 1, "topics": ["Elicitation"] },
        });
        let as_seq = json!([
            { "id": "pm", "title": "Project Management", "order": 2, "topics": ["Scope", "Risk"] },
            { "id": "ba", "title": "Business Analysis", "order": 1, "topics": { "x": "Elicitation" } },
        ]);
        let a: Vec<Course> = normalize_list("courses", Some(&as_map));
        let b: Vec<Course> = normalize_list("courses", Some(&as_seq));
        assert_eq!(a, b);
        assert_eq!(a[0].id, "ba");
        assert_eq!(a[1].topics, vec!["Scope", "Risk"]);
    }

    #[test]
    fn sequence_without_ids_gets_synthetic_ids() {
        let raw = json!([{ "name": "India" }, { "name": "Kenya", "students": "40" }]);
        let countries: Vec<Country> = normalize_list("countries", Some(&raw));
        assert_eq!(countries[0].id, "countries-0");
        assert_eq!(countries[1].id, "countries-1");
        assert_eq!(countries[1].students, 40.0);
    }

    #[test]
    fn featured_flag_coerced() {
        let raw = json!({ "c": { "featured": "TRUE" }, "d": { "featured": 1 } });
        let courses: Vec<Course> = normalize_list("courses", Some(&raw));
        assert!(courses[0].featured);
        assert!(!courses[1].featured);
    }

    #[test]
    fn normalize_is_deterministic() {
        let raw = json!({ "t1": { "name": "A", "order": 3 }, "t2": { "quote": "B" } });
        let first: Vec<Testimonial> = normalize_list("testimonials", Some(&raw));
        let second: Vec<Testimonial> = normalize_list("testimonials", Some(&raw));
        assert_eq!(first, second);
    }
}
