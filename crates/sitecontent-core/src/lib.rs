//! Core content model: raw shape detection, total normalizers, the
//! `siteContent/` namespace, section queries, zombie detection and form
//! validation.

pub mod content;
pub mod form;
pub mod normalize;
pub mod page;
pub mod paths;
pub mod query;
pub mod raw;
pub mod zombie;

pub use normalize::{
    ItemGroup, ItemParent, ListRecord, SingletonRecord, attach_groups, normalize_list,
    normalize_singleton,
};
pub use query::Query;
pub use raw::{DEFAULT_ORDER, Fields, RawShape};
pub use zombie::{
    ClassificationReport, LoadState, ProbeGroup, SectionProbe, SectionStatus, Verdict,
    VerdictCounts, classify,
};
