//! Sync validator: loads every content section through the shared cache
//! and reports which sections are dynamic and which are zombies.
//!
//! Sections load concurrently and independently. The report is rebuilt
//! from the full probe snapshot each time a section resolves.

use futures::StreamExt;
use futures::future::{BoxFuture, FutureExt};
use futures::stream::FuturesUnordered;
use sitecontent_core::page::GlobalSettings;
use sitecontent_core::{
    ClassificationReport, LoadState, ProbeGroup, Query, SectionProbe, SingletonRecord, classify,
    paths, query,
};
use sitecontent_store::QueryCache;
use tracing::info;

const GLOBAL_FIELDS: [&str; 5] = ["siteName", "email", "phone", "address", "social"];

/// One unit of concurrent work: the probes it will produce, shown as
/// loading until it resolves.
struct ProbeTask {
    pending: Vec<SectionProbe>,
    run: BoxFuture<'static, Vec<SectionProbe>>,
}

pub struct SyncValidator {
    cache: QueryCache,
}

impl SyncValidator {
    pub fn new(cache: QueryCache) -> Self {
        Self { cache }
    }

    /// Load everything and return the final report.
    pub async fn run(&self) -> ClassificationReport {
        self.watch(|_| {}).await
    }

    /// Load everything, calling `on_change` with a fresh report first with
    /// every section loading, then after each section resolves.
    pub async fn watch(&self, mut on_change: impl FnMut(&ClassificationReport)) -> ClassificationReport {
        let tasks = self.tasks();
        let mut snapshot: Vec<Vec<SectionProbe>> =
            tasks.iter().map(|t| t.pending.clone()).collect();
        on_change(&classify(&snapshot.concat()));

        let mut running: FuturesUnordered<_> = tasks
            .into_iter()
            .enumerate()
            .map(|(i, task)| async move { (i, task.run.await) })
            .collect();

        while let Some((i, probes)) = running.next().await {
            snapshot[i] = probes;
            on_change(&classify(&snapshot.concat()));
        }

        let report = classify(&snapshot.concat());
        info!(
            total = report.overall.total,
            dynamic = report.overall.dynamic,
            zombie = report.overall.zombie,
            errored = report.overall.errored,
            "sync validation complete"
        );
        report
    }

    fn tasks(&self) -> Vec<ProbeTask> {
        let mut tasks = vec![
            self.list(paths::STATS, query::stats()),
            self.list(paths::COURSES, query::courses()),
            self.list(paths::COURSE_TOPICS, query::course_topics()),
            self.list(paths::TESTIMONIALS, query::testimonials()),
            self.list(paths::LEADERSHIP, query::leadership()),
            self.list(paths::FACULTY, query::faculty()),
            self.list(paths::COUNTRIES, query::countries()),
            self.list(paths::ACCREDITATION_DETAILS, query::accreditation_details()),
            self.list(paths::ACCREDITATION_FEATURES, query::accreditation_features()),
            self.list(paths::CERTIFICATION_BENEFITS, query::certification_benefits()),
            self.list(paths::SERVICES, query::services()),
            self.list(paths::SERVICE_DELIVERABLES, query::service_deliverables()),
            self.list(paths::INDUSTRIES, query::industries()),
            self.list(paths::CASE_STUDIES, query::case_studies()),
            self.list(paths::CASE_STUDY_OUTCOMES, query::case_study_outcomes()),
            self.list(paths::CTA_INFO_CARDS, query::cta_info_cards()),
        ];

        for page in paths::PAGES {
            tasks.push(self.singleton(format!("hero/{page}"), ProbeGroup::HeroPages, query::hero(page)));
        }
        for page in paths::PAGES {
            tasks.push(self.singleton(
                format!("ctaBanner/{page}"),
                ProbeGroup::HeroPages,
                query::cta_banner(page),
            ));
        }

        tasks.push(self.singleton("about/story".into(), ProbeGroup::AboutSections, query::about_story()));
        tasks.push(self.singleton("about/mission".into(), ProbeGroup::AboutSections, query::about_mission()));
        tasks.push(self.singleton("about/vision".into(), ProbeGroup::AboutSections, query::about_vision()));
        tasks.push(self.singleton("about/founder".into(), ProbeGroup::AboutSections, query::about_founder()));
        for section in paths::HEADER_SECTIONS {
            tasks.push(self.singleton(
                format!("sectionHeader/{section}"),
                ProbeGroup::AboutSections,
                query::section_header(section),
            ));
        }

        tasks.push(self.global_settings());
        tasks
    }

    fn list<T: Send + 'static>(&self, name: &'static str, query: Query<Vec<T>>) -> ProbeTask {
        let cache = self.cache.clone();
        let group = ProbeGroup::DataHooks;
        ProbeTask {
            pending: vec![SectionProbe::new(name, group, true, false)],
            run: async move {
                let state = cache.load_state(&query).await;
                vec![SectionProbe::list(name, group, &state)]
            }
            .boxed(),
        }
    }

    fn singleton<R: SingletonRecord + Send + 'static>(
        &self,
        name: String,
        group: ProbeGroup,
        query: Query<R>,
    ) -> ProbeTask {
        let cache = self.cache.clone();
        ProbeTask {
            pending: vec![SectionProbe::new(name.clone(), group, true, false)],
            run: async move {
                let state = cache.load_state(&query).await;
                vec![SectionProbe::singleton(name, group, &state)]
            }
            .boxed(),
        }
    }

    /// One read, one probe per tracked field.
    fn global_settings(&self) -> ProbeTask {
        let cache = self.cache.clone();
        let group = ProbeGroup::GlobalSettings;
        ProbeTask {
            pending: GLOBAL_FIELDS
                .iter()
                .map(|field| SectionProbe::new(format!("global/{field}"), group, true, false))
                .collect(),
            run: async move {
                let state: LoadState<GlobalSettings> =
                    cache.load_state(&query::global_settings()).await;
                GLOBAL_FIELDS
                    .iter()
                    .enumerate()
                    .map(|(i, field)| {
                        SectionProbe::with(format!("global/{field}"), group, &state, |settings| {
                            settings.field_checks()[i].1
                        })
                    })
                    .collect()
            }
            .boxed(),
        }
    }
}
