//! Canonical records for singleton sections: one object per path.
//!
//! Each record names its anchor field through
//! [`SingletonRecord::has_content`]. An object holding only defaults is
//! not content, however many keys the raw value had.

use serde::{Deserialize, Serialize};

use crate::normalize::SingletonRecord;
use crate::raw::Fields;

fn filled(s: &str) -> bool {
    !s.trim().is_empty()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    pub linkedin: String,
    pub facebook: String,
    pub instagram: String,
    pub twitter: String,
    pub youtube: String,
}

impl SocialLinks {
    pub fn any(&self) -> bool {
        [
            &self.linkedin,
            &self.facebook,
            &self.instagram,
            &self.twitter,
            &self.youtube,
        ]
        .into_iter()
        .any(|s| filled(s))
    }
}

/// Site-wide settings at `siteContent/global`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    pub site_name: String,
    pub tagline: String,
    pub logo: String,
    pub email: String,
    pub phone: String,
    pub whatsapp: String,
    pub address: String,
    pub footer_text: String,
    pub social: SocialLinks,
}

impl SingletonRecord for GlobalSettings {
    fn from_fields(f: &Fields<'_>) -> Self {
        let social = f
            .nested("social")
            .map(|s| SocialLinks {
                linkedin: s.text("linkedin"),
                facebook: s.text("facebook"),
                instagram: s.text("instagram"),
                twitter: s.text("twitter"),
                youtube: s.text("youtube"),
            })
            .unwrap_or_default();
        Self {
            site_name: f.text("siteName"),
            tagline: f.text("tagline"),
            logo: f.text("logo"),
            email: f.text("email"),
            phone: f.text("phone"),
            whatsapp: f.text("whatsapp"),
            address: f.text("address"),
            footer_text: f.text("footerText"),
            social,
        }
    }

    fn has_content(&self) -> bool {
        filled(&self.site_name)
    }
}

impl GlobalSettings {
    /// Per-field probes for the diagnostics dashboard.
    pub fn field_checks(&self) -> [(&'static str, bool); 5] {
        [
            ("siteName", filled(&self.site_name)),
            ("email", filled(&self.email)),
            ("phone", filled(&self.phone)),
            ("address", filled(&self.address)),
            ("social", self.social.any()),
        ]
    }
}

/// Page hero at `siteContent/heroes/{page}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub headline: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub cta_text: String,
    pub cta_link: String,
    pub secondary_cta_text: String,
    pub secondary_cta_link: String,
    pub background_image: String,
}

impl SingletonRecord for Hero {
    fn from_fields(f: &Fields<'_>) -> Self {
        Self {
            headline: f.text("headline"),
            title: f.text("title"),
            subtitle: f.text("subtitle"),
            description: f.text("description"),
            cta_text: f.text("ctaText"),
            cta_link: f.text("ctaLink"),
            secondary_cta_text: f.text("secondaryCtaText"),
            secondary_cta_link: f.text("secondaryCtaLink"),
            background_image: f.text("backgroundImage"),
        }
    }

    /// Either `headline` or `title` counts.
    fn has_content(&self) -> bool {
        filled(&self.headline) || filled(&self.title)
    }
}

/// Eyebrow/title/subtitle block above a page section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionHeader {
    pub eyebrow: String,
    pub title: String,
    pub subtitle: String,
}

impl SingletonRecord for SectionHeader {
    fn from_fields(f: &Fields<'_>) -> Self {
        Self {
            eyebrow: f.text("eyebrow"),
            title: f.text("title"),
            subtitle: f.text("subtitle"),
        }
    }

    fn has_content(&self) -> bool {
        filled(&self.title)
    }
}

/// `about/story`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutStory {
    pub heading: String,
    pub p1: String,
    pub p2: String,
    pub p3: String,
    pub image: String,
}

impl SingletonRecord for AboutStory {
    fn from_fields(f: &Fields<'_>) -> Self {
        Self {
            heading: f.text("heading"),
            p1: f.text("p1"),
            p2: f.text("p2"),
            p3: f.text("p3"),
            image: f.text("image"),
        }
    }

    fn has_content(&self) -> bool {
        filled(&self.p1)
    }
}

/// `about/mission` and `about/vision`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    pub title: String,
    pub statement: String,
    pub icon: String,
}

impl SingletonRecord for Statement {
    fn from_fields(f: &Fields<'_>) -> Self {
        Self {
            title: f.text("title"),
            statement: f.text("statement"),
            icon: f.text("icon"),
        }
    }

    fn has_content(&self) -> bool {
        filled(&self.statement)
    }
}

/// `about/founder`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Founder {
    pub name: String,
    pub role: String,
    pub bio: String,
    pub quote: String,
    pub image: String,
}

impl SingletonRecord for Founder {
    fn from_fields(f: &Fields<'_>) -> Self {
        Self {
            name: f.text("name"),
            role: f.text("role"),
            bio: f.text("bio"),
            quote: f.text("quote"),
            image: f.text("image"),
        }
    }

    fn has_content(&self) -> bool {
        filled(&self.name)
    }
}

/// Call-to-action banner at `siteContent/ctaBanners/{page}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaBanner {
    pub title: String,
    pub subtitle: String,
    pub button_text: String,
    pub button_link: String,
}

impl SingletonRecord for CtaBanner {
    fn from_fields(f: &Fields<'_>) -> Self {
        Self {
            title: f.text("title"),
            subtitle: f.text("subtitle"),
            button_text: f.text("buttonText"),
            button_link: f.text("buttonLink"),
        }
    }

    fn has_content(&self) -> bool {
        filled(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_singleton;
    use serde_json::json;

    #[test]
    fn hero_total_over_odd_inputs() {
        for raw in [
            json!(null),
            json!({}),
            json!([]),
            json!([{ "headline": "in a list" }]),
            json!("Welcome"),
            json!({ "headline": true, "title": { "nested": true } }),
        ] {
            let hero: Hero = normalize_singleton(Some(&raw));
            assert_eq!(hero, Hero::default(), "input {raw}");
        }
        let hero: Hero = normalize_singleton(None);
        assert_eq!(hero, Hero::default());
    }

    #[test]
    fn hero_anchor_is_headline_or_title() {
        let empty: Hero = normalize_singleton(Some(&json!({ "headline": "", "title": "" })));
        assert!(!empty.has_content());

        let blank: Hero = normalize_singleton(Some(&json!({ "headline": "   " })));
        assert!(!blank.has_content());

        let headline: Hero = normalize_singleton(Some(&json!({ "headline": "Welcome" })));
        assert!(headline.has_content());

        let title: Hero = normalize_singleton(Some(&json!({ "title": "Courses" })));
        assert!(title.has_content());
    }

    #[test]
    fn defaults_only_object_is_not_content() {
        let raw = json!({ "subtitle": "", "ctaText": "", "backgroundImage": "" });
        let hero: Hero = normalize_singleton(Some(&raw));
        assert!(!hero.has_content());
    }

    #[test]
    fn about_anchors() {
        let story: AboutStory = normalize_singleton(Some(&json!({ "heading": "Our story" })));
        assert!(!story.has_content());
        let story: AboutStory = normalize_singleton(Some(&json!({ "p1": "Founded in 2009." })));
        assert!(story.has_content());

        let mission: Statement = normalize_singleton(Some(&json!({ "title": "Mission" })));
        assert!(!mission.has_content());

        let founder: Founder = normalize_singleton(Some(&json!({ "name": "R. Iyer" })));
        assert!(founder.has_content());
    }

    #[test]
    fn global_settings_field_checks() {
        let raw = json!({
            "siteName": "Institute",
            "email": "hello@example.org",
            "social": { "linkedin": "https://linkedin.com/x" },
            "theme": "dark",
        });
        let settings: GlobalSettings = normalize_singleton(Some(&raw));
        let checks = settings.field_checks();
        assert_eq!(checks[0], ("siteName", true));
        assert_eq!(checks[2], ("phone", false));
        assert_eq!(checks[4], ("social", true));
    }
}
