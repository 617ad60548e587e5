pub mod docs;
pub mod error;
pub mod hierarchy;
pub mod scan;
pub mod script;
pub mod search;
pub mod settings;
pub mod task;
pub mod tracing;
pub mod tree;

pub use docs::{ClassDoc, DocSource, DocStore};
pub use hierarchy::{ClassGraph, ClassHierarchy, DisabledClasses, FeatureProfile};
pub use scan::{DocRunner, DocScan, DocScanConfig, ScannedScript};
pub use script::{ScriptInfo, ScriptReflection, ScriptRegistry};
pub use search::{Scope, SearchCategories, SearchConfig, SearchContext, SearchRunner};
pub use settings::SelectorSettings;
pub use task::{DEFAULT_WORK_BUDGET, IncrementalTask, PhaseStatus};
pub use tree::{IconProvider, IconSet, ItemMeta, ResultSink, ResultTree};
