//! Section query descriptors: which path to read, how long a read stays
//! fresh, and which normalizer shapes the result.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::content::{
    AccreditationDetail, CaseStudy, Country, Course, CtaInfoCard, FacultyMember, Feature,
    Industry, Leader, Service, Stat, Testimonial,
};
use crate::normalize::{
    ItemGroup, ListRecord, SingletonRecord, normalize_item_groups, normalize_list,
    normalize_singleton,
};
use crate::page::{AboutStory, CtaBanner, Founder, GlobalSettings, Hero, SectionHeader, Statement};
use crate::paths;

/// Staleness window for ordinary content sections.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(5 * 60);

/// Global settings change rarely and are read on every page.
pub const GLOBAL_STALE_TIME: Duration = Duration::from_secs(10 * 60);

type NormalizeFn<T> = Arc<dyn Fn(Option<&Value>) -> T + Send + Sync>;

/// A read of one store path plus the normalizer applied to its raw value.
pub struct Query<T> {
    path: String,
    stale_time: Duration,
    normalize: NormalizeFn<T>,
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            stale_time: self.stale_time,
            normalize: Arc::clone(&self.normalize),
        }
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("path", &self.path)
            .field("stale_time", &self.stale_time)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> Query<T> {
    pub fn new(
        path: impl Into<String>,
        stale_time: Duration,
        normalize: impl Fn(Option<&Value>) -> T + Send + Sync + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            stale_time,
            normalize: Arc::new(normalize),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }

    /// Override the staleness window.
    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    /// Apply this query's normalizer to a raw value.
    pub fn normalize(&self, raw: Option<&Value>) -> T {
        (self.normalize)(raw)
    }
}

impl<T: Serialize + 'static> Query<T> {
    /// Same query, with the normalized record rendered back to JSON.
    pub fn into_json(self) -> Query<Value> {
        let normalize = self.normalize;
        Query {
            path: self.path,
            stale_time: self.stale_time,
            normalize: Arc::new(move |raw: Option<&Value>| {
                serde_json::to_value(normalize(raw)).unwrap_or(Value::Null)
            }),
        }
    }
}

fn list<R: ListRecord + 'static>(subtree: &'static str) -> Query<Vec<R>> {
    Query::new(paths::content(subtree), DEFAULT_STALE_TIME, move |raw| {
        normalize_list(subtree, raw)
    })
}

fn singleton<R: SingletonRecord + 'static>(path: String) -> Query<R> {
    Query::new(path, DEFAULT_STALE_TIME, normalize_singleton::<R>)
}

fn item_groups(subtree: &'static str) -> Query<Vec<ItemGroup>> {
    Query::new(paths::content(subtree), DEFAULT_STALE_TIME, move |raw| {
        normalize_item_groups(subtree, raw)
    })
}

// ── Singletons ──

pub fn global_settings() -> Query<GlobalSettings> {
    singleton(paths::content(paths::GLOBAL)).with_stale_time(GLOBAL_STALE_TIME)
}

pub fn hero(page: &str) -> Query<Hero> {
    singleton(paths::hero(page))
}

pub fn section_header(section: &str) -> Query<SectionHeader> {
    singleton(paths::section_header(section))
}

pub fn about_story() -> Query<AboutStory> {
    singleton(paths::about(paths::ABOUT_STORY))
}

pub fn about_mission() -> Query<Statement> {
    singleton(paths::about(paths::ABOUT_MISSION))
}

pub fn about_vision() -> Query<Statement> {
    singleton(paths::about(paths::ABOUT_VISION))
}

pub fn about_founder() -> Query<Founder> {
    singleton(paths::about(paths::ABOUT_FOUNDER))
}

pub fn cta_banner(page: &str) -> Query<CtaBanner> {
    singleton(paths::cta_banner(page))
}

// ── Lists ──

pub fn stats() -> Query<Vec<Stat>> {
    list(paths::STATS)
}

pub fn courses() -> Query<Vec<Course>> {
    list(paths::COURSES)
}

pub fn testimonials() -> Query<Vec<Testimonial>> {
    list(paths::TESTIMONIALS)
}

pub fn leadership() -> Query<Vec<Leader>> {
    list(paths::LEADERSHIP)
}

pub fn faculty() -> Query<Vec<FacultyMember>> {
    list(paths::FACULTY)
}

pub fn countries() -> Query<Vec<Country>> {
    list(paths::COUNTRIES)
}

pub fn accreditation_details() -> Query<Vec<AccreditationDetail>> {
    list(paths::ACCREDITATION_DETAILS)
}

pub fn accreditation_features() -> Query<Vec<Feature>> {
    list(paths::ACCREDITATION_FEATURES)
}

pub fn certification_benefits() -> Query<Vec<Feature>> {
    list(paths::CERTIFICATION_BENEFITS)
}

pub fn services() -> Query<Vec<Service>> {
    list(paths::SERVICES)
}

pub fn industries() -> Query<Vec<Industry>> {
    list(paths::INDUSTRIES)
}

pub fn case_studies() -> Query<Vec<CaseStudy>> {
    list(paths::CASE_STUDIES)
}

pub fn cta_info_cards() -> Query<Vec<CtaInfoCard>> {
    list(paths::CTA_INFO_CARDS)
}

// ── Side tables ──

pub fn course_topics() -> Query<Vec<ItemGroup>> {
    item_groups(paths::COURSE_TOPICS)
}

pub fn service_deliverables() -> Query<Vec<ItemGroup>> {
    item_groups(paths::SERVICE_DELIVERABLES)
}

pub fn case_study_outcomes() -> Query<Vec<ItemGroup>> {
    item_groups(paths::CASE_STUDY_OUTCOMES)
}

/// Look up a section by its subtree name, rendering records as JSON.
///
/// `key` selects the page, header section or about subsection for keyed
/// subtrees and is ignored otherwise. Returns `None` for unknown names or
/// a keyed subtree with no key.
pub fn by_name(section: &str, key: Option<&str>) -> Option<Query<Value>> {
    let query = match (section, key) {
        (paths::GLOBAL, _) => global_settings().into_json(),
        (paths::STATS, _) => stats().into_json(),
        (paths::COURSES, _) => courses().into_json(),
        (paths::COURSE_TOPICS, _) => course_topics().into_json(),
        (paths::TESTIMONIALS, _) => testimonials().into_json(),
        (paths::LEADERSHIP, _) => leadership().into_json(),
        (paths::FACULTY, _) => faculty().into_json(),
        (paths::COUNTRIES, _) => countries().into_json(),
        (paths::ACCREDITATION_DETAILS, _) => accreditation_details().into_json(),
        (paths::ACCREDITATION_FEATURES, _) => accreditation_features().into_json(),
        (paths::CERTIFICATION_BENEFITS, _) => certification_benefits().into_json(),
        (paths::SERVICES, _) => services().into_json(),
        (paths::SERVICE_DELIVERABLES, _) => service_deliverables().into_json(),
        (paths::INDUSTRIES, _) => industries().into_json(),
        (paths::CASE_STUDIES, _) => case_studies().into_json(),
        (paths::CASE_STUDY_OUTCOMES, _) => case_study_outcomes().into_json(),
        (paths::CTA_INFO_CARDS, _) => cta_info_cards().into_json(),
        (paths::HEROES, Some(page)) => hero(page).into_json(),
        (paths::CTA_BANNERS, Some(page)) => cta_banner(page).into_json(),
        (paths::SECTION_HEADERS, Some(section)) => section_header(section).into_json(),
        (paths::ABOUT, Some(paths::ABOUT_STORY)) => about_story().into_json(),
        (paths::ABOUT, Some(paths::ABOUT_MISSION)) => about_mission().into_json(),
        (paths::ABOUT, Some(paths::ABOUT_VISION)) => about_vision().into_json(),
        (paths::ABOUT, Some(paths::ABOUT_FOUNDER)) => about_founder().into_json(),
        _ => return None,
    };
    Some(query)
}
