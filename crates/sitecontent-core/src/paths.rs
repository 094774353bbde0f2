//! The `siteContent/` path namespace.
//!
//! This layout is shared with the live site and the admin panel and must
//! not change.

pub const ROOT: &str = "siteContent";

pub const GLOBAL: &str = "global";
pub const STATS: &str = "stats";
pub const HEROES: &str = "heroes";
pub const COURSES: &str = "courses";
pub const COURSE_TOPICS: &str = "courseTopics";
pub const TESTIMONIALS: &str = "testimonials";
pub const SECTION_HEADERS: &str = "sectionHeaders";
pub const ABOUT: &str = "about";
pub const LEADERSHIP: &str = "leadership";
pub const FACULTY: &str = "faculty";
pub const COUNTRIES: &str = "countries";
pub const ACCREDITATION_DETAILS: &str = "accreditationDetails";
pub const ACCREDITATION_FEATURES: &str = "accreditationFeatures";
pub const CERTIFICATION_BENEFITS: &str = "certificationBenefits";
pub const SERVICES: &str = "services";
pub const SERVICE_DELIVERABLES: &str = "serviceDeliverables";
pub const INDUSTRIES: &str = "industries";
pub const CASE_STUDIES: &str = "caseStudies";
pub const CASE_STUDY_OUTCOMES: &str = "caseStudyOutcomes";
pub const CTA_BANNERS: &str = "ctaBanners";
pub const CTA_INFO_CARDS: &str = "ctaInfoCards";

/// Pages that carry a hero and a CTA banner.
pub const PAGES: &[&str] = &[
    "home",
    "about",
    "courses",
    "services",
    "accreditation",
    "industries",
    "case-studies",
    "contact",
];

/// Sections that carry a header block.
pub const HEADER_SECTIONS: &[&str] = &[
    "courses",
    "testimonials",
    "stats",
    "services",
    "industries",
    "case-studies",
    "leadership",
    "faculty",
    "countries",
    "accreditation",
];

pub const ABOUT_STORY: &str = "story";
pub const ABOUT_MISSION: &str = "mission";
pub const ABOUT_VISION: &str = "vision";
pub const ABOUT_FOUNDER: &str = "founder";

pub const ABOUT_SUBSECTIONS: &[&str] = &[ABOUT_STORY, ABOUT_MISSION, ABOUT_VISION, ABOUT_FOUNDER];

/// Full store path for a top-level subtree: `siteContent/{subtree}`.
pub fn content(subtree: &str) -> String {
    format!("{ROOT}/{subtree}")
}

/// Full store path for a keyed child: `siteContent/{subtree}/{key}`.
pub fn keyed(subtree: &str, key: &str) -> String {
    format!("{ROOT}/{subtree}/{key}")
}

pub fn hero(page: &str) -> String {
    keyed(HEROES, page)
}

pub fn section_header(section: &str) -> String {
    keyed(SECTION_HEADERS, section)
}

pub fn about(subsection: &str) -> String {
    keyed(ABOUT, subsection)
}

pub fn cta_banner(page: &str) -> String {
    keyed(CTA_BANNERS, page)
}

/// Split a store path into non-empty segments.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
