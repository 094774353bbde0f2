//! Zombie detection: which content sections hold authored data and which
//! resolved to placeholders only.
//!
//! The report is a pure function of the probe snapshot. Nothing is kept
//! between calls; callers re-run [`classify`] whenever any probe changes.

use std::fmt;

use serde::Serialize;

use crate::normalize::SingletonRecord;

/// Load state of one section read.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    /// The remote read failed; carries the error message.
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Loading | Self::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            Self::Loading | Self::Ready(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadState<U> {
        match self {
            Self::Loading => LoadState::Loading,
            Self::Ready(value) => LoadState::Ready(f(value)),
            Self::Failed(message) => LoadState::Failed(message),
        }
    }
}

impl<T, E: fmt::Display> From<Result<T, E>> for LoadState<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

/// Dashboard grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeGroup {
    DataHooks,
    HeroPages,
    AboutSections,
    GlobalSettings,
}

impl ProbeGroup {
    pub const ALL: [ProbeGroup; 4] = [
        Self::DataHooks,
        Self::HeroPages,
        Self::AboutSections,
        Self::GlobalSettings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DataHooks => "data-hooks",
            Self::HeroPages => "hero-pages",
            Self::AboutSections => "about-sections",
            Self::GlobalSettings => "global-settings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Loading,
    Dynamic,
    Zombie,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Dynamic => "dynamic",
            Self::Zombie => "zombie",
        }
    }
}

/// One section's input to the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionProbe {
    pub name: String,
    pub group: ProbeGroup,
    pub is_loading: bool,
    pub has_data: bool,
    pub error: Option<String>,
}

impl SectionProbe {
    pub fn new(name: impl Into<String>, group: ProbeGroup, is_loading: bool, has_data: bool) -> Self {
        Self {
            name: name.into(),
            group,
            is_loading,
            has_data,
            error: None,
        }
    }

    /// Probe with an arbitrary validity predicate over the loaded value.
    ///
    /// A failed read is not loading and has no data.
    pub fn with<T>(
        name: impl Into<String>,
        group: ProbeGroup,
        state: &LoadState<T>,
        has_data: impl FnOnce(&T) -> bool,
    ) -> Self {
        Self {
            name: name.into(),
            group,
            is_loading: state.is_loading(),
            has_data: state.ready().is_some_and(has_data),
            error: state.error().map(str::to_owned),
        }
    }

    /// List section: data means at least one record.
    pub fn list<T>(name: impl Into<String>, group: ProbeGroup, state: &LoadState<Vec<T>>) -> Self {
        Self::with(name, group, state, |records| !records.is_empty())
    }

    /// Singleton section: data means the anchor field is filled.
    pub fn singleton<R: SingletonRecord>(
        name: impl Into<String>,
        group: ProbeGroup,
        state: &LoadState<R>,
    ) -> Self {
        Self::with(name, group, state, R::has_content)
    }

    /// Evaluated in order: loading, then zombie, then dynamic.
    pub fn verdict(&self) -> Verdict {
        if self.is_loading {
            Verdict::Loading
        } else if !self.has_data {
            Verdict::Zombie
        } else {
            Verdict::Dynamic
        }
    }
}

/// Classified section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionStatus {
    pub name: String,
    pub group: ProbeGroup,
    pub is_loading: bool,
    pub has_data: bool,
    pub verdict: Verdict,
    /// Set when the zombie verdict comes from a failed read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VerdictCounts {
    pub total: usize,
    pub dynamic: usize,
    pub zombie: usize,
    pub loading: usize,
    /// Zombies caused by a failed read. Included in `zombie`.
    pub errored: usize,
}

impl VerdictCounts {
    fn add(&mut self, status: &SectionStatus) {
        self.total += 1;
        match status.verdict {
            Verdict::Loading => self.loading += 1,
            Verdict::Dynamic => self.dynamic += 1,
            Verdict::Zombie => {
                self.zombie += 1;
                if status.error.is_some() {
                    self.errored += 1;
                }
            }
        }
    }

    /// Share of resolved sections that are dynamic, 0–100.
    pub fn health_percentage(&self) -> f64 {
        let resolved = self.dynamic + self.zombie;
        if resolved == 0 {
            0.0
        } else {
            self.dynamic as f64 / resolved as f64 * 100.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupSummary {
    pub group: ProbeGroup,
    pub counts: VerdictCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub sections: Vec<SectionStatus>,
    pub groups: Vec<GroupSummary>,
    pub overall: VerdictCounts,
}

impl ClassificationReport {
    pub fn group(&self, group: ProbeGroup) -> VerdictCounts {
        self.groups
            .iter()
            .find(|g| g.group == group)
            .map(|g| g.counts)
            .unwrap_or_default()
    }

    pub fn zombies(&self) -> impl Iterator<Item = &SectionStatus> {
        self.sections
            .iter()
            .filter(|s| s.verdict == Verdict::Zombie)
    }

    pub fn in_group(&self, group: ProbeGroup) -> impl Iterator<Item = &SectionStatus> {
        self.sections.iter().filter(move |s| s.group == group)
    }

    pub fn health_percentage(&self) -> f64 {
        self.overall.health_percentage()
    }
}

/// Classify every probe and aggregate per group and overall.
///
/// Every group appears in the report, even with no probes.
pub fn classify(probes: &[SectionProbe]) -> ClassificationReport {
    let sections: Vec<SectionStatus> = probes
        .iter()
        .map(|p| SectionStatus {
            name: p.name.clone(),
            group: p.group,
            is_loading: p.is_loading,
            has_data: p.has_data,
            verdict: p.verdict(),
            error: p.error.clone(),
        })
        .collect();

    let mut overall = VerdictCounts::default();
    let mut groups: Vec<GroupSummary> = ProbeGroup::ALL
        .iter()
        .map(|&group| GroupSummary {
            group,
            counts: VerdictCounts::default(),
        })
        .collect();

    for status in &sections {
        overall.add(status);
        if let Some(summary) = groups.iter_mut().find(|g| g.group == status.group) {
            summary.counts.add(status);
        }
    }

    ClassificationReport {
        sections,
        groups,
        overall,
    }
}
