//! The search runner: a phased, time-sliced state machine that scans the
//! documentation store, builds the result tree and selects the best match.
//!
//! Each phase does a bounded amount of work per slice (one class during the
//! scan, one match while building items), so a caller driving the runner with
//! [`IncrementalTask::work`] regains control after at most one slice past its
//! budget.

use super::config::SearchConfig;
use super::flags::{Scope, SearchCategories};
use super::matching::TermMatcher;
use super::scoring::{BestMatch, match_score};
use crate::docs::{ClassDoc, DocSource, MethodDoc, PropertyDoc};
use crate::hierarchy::{
    ClassGraph, FeatureProfile, MAX_INHERITANCE_DEPTH, OBJECT_CLASS, is_disabled_by_profile,
};
use crate::script::ScriptReflection;
use crate::task::{IncrementalTask, PhaseStatus};
use crate::tree::{Column, IconProvider, ItemMeta, MemberKind, ResultSink};
use ahash::{AHashMap, AHashSet};
use std::borrow::Cow;
use std::time::Instant;

const CLASS_KIND_LABEL: &str = "Class";
/// Placeholder icon for classes without one of their own.
const EMPTY_ICON: &str = "ArrowRight";
const CONSTRUCTORS_SUFFIX: &str = " (constructors)";

/// Read-only collaborators a search runs against.
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    pub docs: &'a dyn DocSource,
    pub classes: &'a dyn ClassGraph,
    pub scripts: &'a dyn ScriptReflection,
    pub icons: &'a dyn IconProvider,
    pub profile: Option<&'a dyn FeatureProfile>,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        docs: &'a dyn DocSource,
        classes: &'a dyn ClassGraph,
        scripts: &'a dyn ScriptReflection,
        icons: &'a dyn IconProvider,
    ) -> Self {
        Self {
            docs,
            classes,
            scripts,
            icons,
            profile: None,
        }
    }

    pub fn with_profile(mut self, profile: &'a dyn FeatureProfile) -> Self {
        self.profile = Some(profile);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchPhase {
    InitScriptClasses,
    InitClassScan,
    ScanClasses,
    InitClassItems,
    BuildClassItems,
    InitMemberItems,
    BuildMemberItems,
    SelectBestMatch,
    Done,
}

impl SearchPhase {
    const fn next(self) -> Self {
        match self {
            Self::InitScriptClasses => Self::InitClassScan,
            Self::InitClassScan => Self::ScanClasses,
            Self::ScanClasses => Self::InitClassItems,
            Self::InitClassItems => Self::BuildClassItems,
            Self::BuildClassItems => Self::InitMemberItems,
            Self::InitMemberItems => Self::BuildMemberItems,
            Self::BuildMemberItems => Self::SelectBestMatch,
            Self::SelectBestMatch | Self::Done => Self::Done,
        }
    }
}

/// Where a scanned class's doc lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassOrigin {
    Store,
    /// The synthetic entry seeded for the bound script.
    Script,
}

/// Which method list a match's method indices point into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodSource {
    Doc,
    /// Methods reflected from the script with this identity.
    Script(String),
}

/// Per-class match record for one search pass.
///
/// Member lists hold indices into the class doc's member vectors (or into the
/// reflected script methods, see [`MethodSource`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMatch {
    class_name: String,
    origin: ClassOrigin,
    method_source: MethodSource,
    pub name_matched: bool,
    pub constructors: Vec<usize>,
    pub methods: Vec<usize>,
    pub operators: Vec<usize>,
    pub signals: Vec<usize>,
    pub constants: Vec<usize>,
    pub properties: Vec<usize>,
    pub theme_properties: Vec<usize>,
}

impl ClassMatch {
    fn new(class_name: String, origin: ClassOrigin, method_source: MethodSource) -> Self {
        Self {
            class_name,
            origin,
            method_source,
            name_matched: false,
            constructors: Vec::new(),
            methods: Vec::new(),
            operators: Vec::new(),
            signals: Vec::new(),
            constants: Vec::new(),
            properties: Vec::new(),
            theme_properties: Vec::new(),
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn origin(&self) -> ClassOrigin {
        self.origin
    }

    pub fn method_source(&self) -> &MethodSource {
        &self.method_source
    }

    /// Whether the class earns a tree node of its own.
    pub fn required(&self) -> bool {
        self.name_matched
            || !self.constructors.is_empty()
            || !self.operators.is_empty()
            || self.has_member_items()
    }

    /// Whether any category that produces member items matched.
    fn has_member_items(&self) -> bool {
        !self.methods.is_empty()
            || !self.signals.is_empty()
            || !self.constants.is_empty()
            || !self.properties.is_empty()
            || !self.theme_properties.is_empty()
    }
}

/// Inconsistencies that end a search early with whatever tree was built.
#[derive(Debug, thiserror::Error)]
enum SearchAbort {
    #[error("class '{0}' is no longer documented")]
    MissingDoc(String),
    #[error("class '{0}' has members to list but no tree item")]
    MissingClassItem(String),
    #[error("member #{index} of '{class}' is out of range")]
    StaleMember { class: String, index: usize },
    #[error("inheritance chain of '{0}' does not terminate")]
    InheritanceCycle(String),
    #[error("result tree has no root")]
    MissingRoot,
}

struct ClassItemPlan {
    name: String,
    icon: String,
    tooltip: String,
    grayed: bool,
}

struct MemberItemPlan {
    kind: MemberKind,
    class: String,
    name: String,
    label: String,
    tooltip: String,
}

/// Incremental search over a documentation store.
///
/// Owns its result sink for the duration of the search; read it between
/// [`work`](IncrementalTask::work) calls with [`sink`](Self::sink), or take it
/// with [`into_sink`](Self::into_sink) once done.
pub struct SearchRunner<'a, S: ResultSink> {
    ctx: SearchContext<'a>,
    config: SearchConfig,
    sink: S,
    phase: SearchPhase,

    script_class: Option<ClassDoc>,
    script_methods: AHashMap<String, Vec<MethodDoc>>,

    scan_order: Vec<(String, ClassOrigin)>,
    descendants: AHashSet<String>,
    matches: Vec<ClassMatch>,
    match_index: AHashMap<String, usize>,
    cursor: usize,

    root: Option<S::Item>,
    class_items: AHashMap<String, S::Item>,
    best: BestMatch<S::Item>,

    started: Option<Instant>,
    items_created: usize,
}

impl<'a, S: ResultSink> SearchRunner<'a, S> {
    pub fn new(ctx: SearchContext<'a>, config: SearchConfig, sink: S) -> Self {
        Self {
            ctx,
            config,
            sink,
            phase: SearchPhase::InitScriptClasses,
            script_class: None,
            script_methods: AHashMap::new(),
            scan_order: Vec::new(),
            descendants: AHashSet::new(),
            matches: Vec::new(),
            match_index: AHashMap::new(),
            cursor: 0,
            root: None,
            class_items: AHashMap::new(),
            best: BestMatch::new(),
            started: None,
            items_created: 0,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == SearchPhase::Done
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Every class that survived profile and scope filtering, in scan order.
    pub fn matches(&self) -> &[ClassMatch] {
        &self.matches
    }

    pub fn class_match(&self, class_name: &str) -> Option<&ClassMatch> {
        self.match_index.get(class_name).map(|&i| &self.matches[i])
    }

    /// Names of the classes whose match is required, in scan order.
    pub fn matched_classes(&self) -> impl Iterator<Item = &str> {
        self.matches
            .iter()
            .filter(|m| m.required())
            .map(ClassMatch::class_name)
    }

    pub fn best_score(&self) -> Option<f64> {
        self.best.score()
    }

    fn root(&self) -> Result<S::Item, SearchAbort> {
        self.root.ok_or(SearchAbort::MissingRoot)
    }

    fn class_doc(&self, found: &ClassMatch) -> Result<&ClassDoc, SearchAbort> {
        let doc = match found.origin {
            ClassOrigin::Store => self.ctx.docs.lookup(&found.class_name),
            ClassOrigin::Script => self.script_class.as_ref(),
        };
        doc.ok_or_else(|| SearchAbort::MissingDoc(found.class_name.clone()))
    }

    fn methods_of<'d>(&'d self, found: &ClassMatch, doc: &'d ClassDoc) -> &'d [MethodDoc] {
        match &found.method_source {
            MethodSource::Doc => &doc.methods,
            MethodSource::Script(identity) => self
                .script_methods
                .get(identity)
                .map(Vec::as_slice)
                .unwrap_or_default(),
        }
    }

    fn finish_phase(&mut self) -> PhaseStatus {
        let finished = self.phase;
        self.phase = finished.next();
        tracing::trace!("Search phase {:?} complete", finished);
        if self.phase != SearchPhase::Done {
            return PhaseStatus::PhaseComplete;
        }

        let elapsed = self.started.map(|t| t.elapsed()).unwrap_or_default();
        tracing::info!(
            "Search for '{}' finished: {} of {} classes matched, {} items in {:?}",
            self.config.term(),
            self.matched_classes().count(),
            self.scan_order.len(),
            self.items_created,
            elapsed
        );
        PhaseStatus::AllComplete
    }

    fn abort(&mut self, reason: SearchAbort) -> PhaseStatus {
        tracing::error!("Aborting search in phase {:?}: {}", self.phase, reason);
        self.phase = SearchPhase::Done;
        PhaseStatus::AllComplete
    }

    fn init_script_classes(&mut self) -> Result<bool, SearchAbort> {
        self.script_class = self
            .config
            .base_script()
            .map(|identity| ClassDoc::new(identity).inheriting(self.config.base_class()));
        self.script_methods.clear();
        Ok(true)
    }

    fn init_class_scan(&mut self) -> Result<bool, SearchAbort> {
        self.matches.clear();
        self.match_index.clear();
        self.best.reset();
        self.cursor = 0;

        let docs = self.ctx.docs;
        self.scan_order = docs
            .classes()
            .map(|doc| (doc.name.clone(), ClassOrigin::Store))
            .collect();
        if let Some(script) = &self.script_class
            && docs.lookup(&script.name).is_none()
        {
            self.scan_order.push((script.name.clone(), ClassOrigin::Script));
        }

        let base = self.config.base_class();
        let classes = self.ctx.classes;
        self.descendants = if base.is_empty() {
            AHashSet::new()
        } else {
            classes.descendants_of(base)
        };
        if !base.is_empty() && !classes.exists(base) {
            match classes.suggest(base) {
                Some((closest, _)) => tracing::warn!(
                    "Base class '{}' is not registered, did you mean '{}'?",
                    base,
                    closest
                ),
                None => tracing::warn!("Base class '{}' is not registered", base),
            }
        }

        tracing::debug!(
            "Scanning {} classes for '{}' (base '{}', {} inheriters)",
            self.scan_order.len(),
            self.config.term(),
            base,
            self.descendants.len()
        );
        Ok(true)
    }

    fn scan_classes(&mut self) -> Result<bool, SearchAbort> {
        let Some((name, origin)) = self.scan_order.get(self.cursor).cloned() else {
            return Ok(true);
        };
        self.cursor += 1;

        let docs: &'a dyn DocSource = self.ctx.docs;
        let doc: Cow<'a, ClassDoc> = match origin {
            ClassOrigin::Store => Cow::Borrowed(
                docs.lookup(&name)
                    .ok_or_else(|| SearchAbort::MissingDoc(name.clone()))?,
            ),
            ClassOrigin::Script => Cow::Owned(
                self.script_class
                    .clone()
                    .ok_or_else(|| SearchAbort::MissingDoc(name.clone()))?,
            ),
        };

        if let Some(profile) = self.ctx.profile
            && is_disabled_by_profile(self.ctx.classes, profile, &name)
        {
            tracing::trace!("Skipping '{}': disabled by feature profile", name);
        } else if !self.in_scope(&name) {
            tracing::trace!("Skipping '{}': outside search scope", name);
        } else {
            let found = self.match_class(&doc, origin);
            self.record_match(found);
        }

        Ok(self.cursor >= self.scan_order.len())
    }

    fn in_scope(&self, class_name: &str) -> bool {
        let base = self.config.base_class();
        let is_base_script = self.config.base_script() == Some(class_name);
        let is_base = base == class_name;
        let is_parent = !is_base && self.ctx.classes.is_ancestor(class_name, base);
        let is_inheriter = self.descendants.contains(class_name);

        let scope = self.config.scope();
        (scope.intersects(Scope::BASE) && (is_base_script || is_base || is_parent))
            || (scope.intersects(Scope::INHERITERS) && (is_base_script || is_base || is_inheriter))
            || (scope.intersects(Scope::UNRELATED)
                && !(is_base_script || is_base || is_parent || is_inheriter))
    }

    fn match_class(&mut self, doc: &ClassDoc, origin: ClassOrigin) -> ClassMatch {
        let categories = self.config.categories();
        let method_source = if categories.intersects(SearchCategories::METHODS)
            && !self.ctx.classes.exists(&doc.name)
        {
            self.load_script_methods(&doc.name)
        } else {
            MethodSource::Doc
        };

        let matcher = TermMatcher::from_config(&self.config);
        let mut found = ClassMatch::new(doc.name.clone(), origin, method_source);

        if categories.intersects(SearchCategories::CLASSES) {
            found.name_matched = matcher.term().is_empty() || matcher.matches_text(&doc.name);
        }
        if categories.intersects(SearchCategories::CONSTRUCTORS) {
            found.constructors =
                matching_indices(&doc.constructors, |m| matcher.matches_callable(&m.name));
        }
        if categories.intersects(SearchCategories::METHODS) {
            let methods = self.methods_of(&found, doc);
            found.methods = matching_indices(methods, |m| matcher.matches_callable(&m.name));
        }
        if categories.intersects(SearchCategories::OPERATORS) {
            found.operators =
                matching_indices(&doc.operators, |m| matcher.matches_callable(&m.name));
        }
        if categories.intersects(SearchCategories::SIGNALS) {
            found.signals = matching_indices(&doc.signals, |s| matcher.matches_text(&s.name));
        }
        if categories.intersects(SearchCategories::CONSTANTS) {
            found.constants = matching_indices(&doc.constants, |c| matcher.matches_text(&c.name));
        }
        if categories.intersects(SearchCategories::PROPERTIES) {
            found.properties = matching_indices(&doc.properties, |p| {
                matcher.matches_text(&p.name)
                    || matcher.matches_text(&p.getter)
                    || matcher.matches_text(&p.setter)
            });
        }
        if categories.intersects(SearchCategories::THEME_ITEMS) {
            found.theme_properties =
                matching_indices(&doc.theme_properties, |t| matcher.matches_text(&t.name));
        }
        found
    }

    /// Reflect the methods of an unregistered class's backing script, once per pass.
    fn load_script_methods(&mut self, identity: &str) -> MethodSource {
        if self.script_methods.contains_key(identity) {
            return MethodSource::Script(identity.to_string());
        }
        match self.ctx.scripts.load_script(identity) {
            Ok(info) => {
                self.script_methods
                    .insert(identity.to_string(), info.method_docs());
                MethodSource::Script(identity.to_string())
            }
            Err(e) => {
                tracing::debug!("Using documented methods for '{}': {}", identity, e);
                MethodSource::Doc
            }
        }
    }

    fn record_match(&mut self, found: ClassMatch) {
        match self.match_index.get(&found.class_name) {
            Some(&index) => self.matches[index] = found,
            None => {
                self.match_index
                    .insert(found.class_name.clone(), self.matches.len());
                self.matches.push(found);
            }
        }
    }

    fn init_class_items(&mut self) -> Result<bool, SearchAbort> {
        self.sink.clear();
        self.root = Some(self.sink.create_item(None));
        self.class_items.clear();
        self.items_created = 0;
        self.cursor = 0;
        tracing::debug!("Building items for {} matches", self.matches.len());
        Ok(true)
    }

    fn build_class_items(&mut self) -> Result<bool, SearchAbort> {
        let index = self.cursor;
        if index >= self.matches.len() {
            return Ok(true);
        }
        self.cursor += 1;

        let found = &self.matches[index];
        if self.config.shows_hierarchy() {
            if found.required() {
                self.ensure_class_hierarchy(index)?;
            }
        } else if found.name_matched {
            let root = self.root()?;
            let plan = self.plan_class_item(index)?;
            self.emit_class_item(root, plan);
        }

        Ok(self.cursor >= self.matches.len())
    }

    /// Create the item for `matches[index]`, creating items for its matched
    /// ancestors first. An ancestor that was not scanned ends the chain at the root.
    fn ensure_class_hierarchy(&mut self, index: usize) -> Result<(), SearchAbort> {
        if self.class_items.contains_key(&self.matches[index].class_name) {
            return Ok(());
        }

        let mut chain = vec![index];
        let mut attach = self.root()?;
        let mut current = index;
        loop {
            let doc = self.class_doc(&self.matches[current])?;
            let Some(parent) = doc.parent() else {
                break;
            };
            if let Some(&item) = self.class_items.get(parent) {
                attach = item;
                break;
            }
            let Some(&parent_index) = self.match_index.get(parent) else {
                break;
            };
            if chain.len() > MAX_INHERITANCE_DEPTH || chain.contains(&parent_index) {
                return Err(SearchAbort::InheritanceCycle(
                    self.matches[index].class_name.clone(),
                ));
            }
            chain.push(parent_index);
            current = parent_index;
        }

        for &link in chain.iter().rev() {
            let plan = self.plan_class_item(link)?;
            attach = self.emit_class_item(attach, plan);
        }
        Ok(())
    }

    fn plan_class_item(&self, index: usize) -> Result<ClassItemPlan, SearchAbort> {
        let found = &self.matches[index];
        let doc = self.class_doc(found)?;
        let name = doc.name.as_str();
        let classes = self.ctx.classes;

        let icon = if self.ctx.icons.has_icon(name) {
            name
        } else if classes.exists(name)
            && (name == OBJECT_CLASS || classes.is_ancestor(OBJECT_CLASS, name))
        {
            OBJECT_CLASS
        } else {
            EMPTY_ICON
        };

        Ok(ClassItemPlan {
            name: name.to_string(),
            icon: icon.to_string(),
            tooltip: doc.brief_description.trim().to_string(),
            grayed: !found.name_matched,
        })
    }

    fn emit_class_item(&mut self, parent: S::Item, plan: ClassItemPlan) -> S::Item {
        let item = self.sink.create_item(Some(parent));
        self.sink.set_icon(item, &plan.icon);
        self.sink.set_text(item, Column::Name, &plan.name);
        self.sink.set_text(item, Column::Kind, CLASS_KIND_LABEL);
        for column in Column::ALL {
            self.sink.set_tooltip(item, column, &plan.tooltip);
        }
        self.sink.set_metadata(item, ItemMeta::class(plan.name.as_str()));
        if plan.grayed {
            self.sink.set_grayed(item);
        }
        self.score_item(item, &plan.name);
        self.class_items.insert(plan.name, item);
        item
    }

    fn init_member_items(&mut self) -> Result<bool, SearchAbort> {
        self.cursor = 0;
        Ok(true)
    }

    fn build_member_items(&mut self) -> Result<bool, SearchAbort> {
        let index = self.cursor;
        if index >= self.matches.len() {
            return Ok(true);
        }
        self.cursor += 1;

        let plans = self.plan_member_items(index)?;
        if !plans.is_empty() {
            let parent = if self.config.shows_hierarchy() {
                let class_name = &self.matches[index].class_name;
                *self
                    .class_items
                    .get(class_name)
                    .ok_or_else(|| SearchAbort::MissingClassItem(class_name.clone()))?
            } else {
                self.root()?
            };
            for plan in plans {
                self.emit_member_item(parent, plan);
            }
        }

        Ok(self.cursor >= self.matches.len())
    }

    fn plan_member_items(&self, index: usize) -> Result<Vec<MemberItemPlan>, SearchAbort> {
        let found = &self.matches[index];
        if !found.has_member_items() {
            return Ok(Vec::new());
        }
        let doc = self.class_doc(found)?;
        let class = doc.name.as_str();
        let flat = !self.config.shows_hierarchy();

        let stale = |index: usize| SearchAbort::StaleMember {
            class: class.to_string(),
            index,
        };
        let mut plans = Vec::new();
        let mut push = |kind: MemberKind, name: &str, label: String, tooltip: String| {
            let label = if flat {
                format!("{}.{}", class, label)
            } else {
                label
            };
            plans.push(MemberItemPlan {
                kind,
                class: class.to_string(),
                name: name.to_string(),
                label,
                tooltip,
            });
        };

        let methods = self.methods_of(found, doc);
        let mut constructors_listed = false;
        for &i in &found.methods {
            let method = methods.get(i).ok_or_else(|| stale(i))?;
            let mut label = method.name.clone();
            if method.name == class {
                if constructors_listed {
                    continue;
                }
                label.push_str(CONSTRUCTORS_SUFFIX);
                constructors_listed = true;
            }
            push(MemberKind::Method, &method.name, label, method.signature(class));
        }
        for &i in &found.signals {
            let signal = doc.signals.get(i).ok_or_else(|| stale(i))?;
            push(
                MemberKind::Signal,
                &signal.name,
                signal.name.clone(),
                signal.signature(class),
            );
        }
        for &i in &found.constants {
            let constant = doc.constants.get(i).ok_or_else(|| stale(i))?;
            push(
                MemberKind::Constant,
                &constant.name,
                constant.name.clone(),
                format!("{}.{}", class, constant.name),
            );
        }
        for &i in &found.properties {
            let property = doc.properties.get(i).ok_or_else(|| stale(i))?;
            push(
                MemberKind::Property,
                &property.name,
                property.name.clone(),
                property_tooltip(class, property),
            );
        }
        for &i in &found.theme_properties {
            let item = doc.theme_properties.get(i).ok_or_else(|| stale(i))?;
            push(
                MemberKind::ThemeItem,
                &item.name,
                item.name.clone(),
                format!("{} {}.{}", item.type_name, class, item.name),
            );
        }
        Ok(plans)
    }

    fn emit_member_item(&mut self, parent: S::Item, plan: MemberItemPlan) {
        let item = self.sink.create_item(Some(parent));
        self.sink.set_icon(item, plan.kind.icon());
        self.sink.set_text(item, Column::Name, &plan.label);
        self.sink.set_text(item, Column::Kind, plan.kind.label());
        for column in Column::ALL {
            self.sink.set_tooltip(item, column, &plan.tooltip);
        }
        self.score_item(item, &plan.name);
        self.sink
            .set_metadata(item, ItemMeta::member(plan.kind, plan.class, plan.name));
    }

    fn score_item(&mut self, item: S::Item, text: &str) {
        let score = match_score(&TermMatcher::from_config(&self.config), text);
        self.best.offer(item, score);
        self.items_created += 1;
    }

    fn select_best_match(&mut self) -> Result<bool, SearchAbort> {
        if let Some(item) = self.best.item() {
            self.sink.select(item);
        }
        Ok(true)
    }
}

impl<S: ResultSink> IncrementalTask for SearchRunner<'_, S> {
    fn advance_one_slice(&mut self) -> PhaseStatus {
        if self.phase == SearchPhase::Done {
            return PhaseStatus::AllComplete;
        }
        self.started.get_or_insert_with(Instant::now);

        let outcome = match self.phase {
            SearchPhase::InitScriptClasses => self.init_script_classes(),
            SearchPhase::InitClassScan => self.init_class_scan(),
            SearchPhase::ScanClasses => self.scan_classes(),
            SearchPhase::InitClassItems => self.init_class_items(),
            SearchPhase::BuildClassItems => self.build_class_items(),
            SearchPhase::InitMemberItems => self.init_member_items(),
            SearchPhase::BuildMemberItems => self.build_member_items(),
            SearchPhase::SelectBestMatch => self.select_best_match(),
            SearchPhase::Done => return PhaseStatus::AllComplete,
        };

        match outcome {
            Ok(true) => self.finish_phase(),
            Ok(false) => PhaseStatus::Continue,
            Err(reason) => self.abort(reason),
        }
    }
}

fn matching_indices<T>(items: &[T], mut accept: impl FnMut(&T) -> bool) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| accept(item))
        .map(|(i, _)| i)
        .collect()
}

fn property_tooltip(class: &str, property: &PropertyDoc) -> String {
    let mut tooltip = format!("{} {}.{}", property.type_name, class, property.name);
    if !property.setter.is_empty() {
        tooltip.push_str(&format!("\n    {}.{}(value) setter", class, property.setter));
    }
    if !property.getter.is_empty() {
        tooltip.push_str(&format!("\n    {}.{}() getter", class, property.getter));
    }
    tooltip
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::{ConstantDoc, DocStore, PropertyDoc, ThemeItemDoc};
    use crate::hierarchy::{ClassHierarchy, DisabledClasses};
    use crate::script::{ScriptInfo, ScriptMethod, ScriptRegistry};
    use crate::tree::{IconSet, ResultTree};
    use assert2::check;
    use rstest::{fixture, rstest};

    struct World {
        docs: DocStore,
        classes: ClassHierarchy,
        scripts: ScriptRegistry,
        icons: IconSet,
    }

    impl World {
        fn ctx(&self) -> SearchContext<'_> {
            SearchContext::new(&self.docs, &self.classes, &self.scripts, &self.icons)
        }

        fn run(&self, config: SearchConfig) -> ResultTree {
            let mut runner = SearchRunner::new(self.ctx(), config, ResultTree::new());
            runner.run_to_completion();
            runner.into_sink()
        }
    }

    #[fixture]
    fn world() -> World {
        let mut object = ClassDoc::new("Object");
        object.methods.push(MethodDoc::new("get_class"));
        object.signals.push(MethodDoc::new("script_changed"));

        let mut node = ClassDoc::new("Node").inheriting("Object");
        node.brief_description = "  Base class for all scene objects.\n".to_string();
        node.methods.push(MethodDoc::new("get_child"));
        node.methods.push(MethodDoc::new("add_child"));
        node.constants.push(ConstantDoc {
            name: "NOTIFICATION_READY".to_string(),
            ..ConstantDoc::default()
        });

        let mut color = ClassDoc::new("Color");
        color.methods.push(MethodDoc::new("Color"));
        color.methods.push(MethodDoc::new("Color"));
        color.methods.push(MethodDoc::new("lerp"));

        let mut control = ClassDoc::new("Control").inheriting("Node");
        control.properties.push(PropertyDoc {
            name: "size".to_string(),
            type_name: "Vector2".to_string(),
            setter: "set_size".to_string(),
            getter: "get_size".to_string(),
            ..PropertyDoc::default()
        });
        control.theme_properties.push(ThemeItemDoc {
            name: "font_color".to_string(),
            type_name: "Color".to_string(),
            ..ThemeItemDoc::default()
        });

        let docs: DocStore = [object, node, color, control].into_iter().collect();
        let classes = ClassHierarchy::from_docs(&docs);
        World {
            docs,
            classes,
            scripts: ScriptRegistry::new(),
            icons: IconSet::new(["Node"]),
        }
    }

    #[rstest]
    fn finished_runner_is_idempotent(world: World) {
        let mut runner = SearchRunner::new(
            world.ctx(),
            SearchConfig::new("child", "Node"),
            ResultTree::new(),
        );
        check!(runner.work(std::time::Duration::MAX));
        let before = runner.sink().clone();
        check!(runner.work(std::time::Duration::ZERO));
        check!(runner.advance_one_slice() == PhaseStatus::AllComplete);
        check!(runner.sink() == &before);
        check!(runner.is_done());
    }

    #[rstest]
    fn first_constructor_is_relabelled_and_duplicates_dropped(world: World) {
        let config = SearchConfig::new("", "Color")
            .with_categories(SearchCategories::METHODS)
            .with_hierarchy(false);
        let tree = world.run(config);
        let labels: Vec<_> = tree
            .walk()
            .into_iter()
            .map(|id| tree.item(id).text(Column::Name).to_string())
            .collect();
        check!(labels == vec!["Color.Color (constructors)", "Color.lerp"]);
    }

    #[rstest]
    fn class_items_carry_icon_and_trimmed_tooltip(world: World) {
        let config = SearchConfig::new("", "Control").with_categories(SearchCategories::CLASSES);
        let tree = world.run(config);

        let node = tree.find(&ItemMeta::class("Node")).unwrap();
        check!(tree.item(node).icon.as_deref() == Some("Node"));
        check!(tree.item(node).tooltip(Column::Kind) == "Base class for all scene objects.");

        let control = tree.find(&ItemMeta::class("Control")).unwrap();
        check!(tree.item(control).icon.as_deref() == Some("Object"));
        check!(tree.item(control).text(Column::Kind) == "Class");
    }

    #[rstest]
    fn property_tooltip_lists_accessors(world: World) {
        let tree = world.run(
            SearchConfig::new("size", "Control").with_categories(SearchCategories::PROPERTIES),
        );
        let size = tree
            .find(&ItemMeta::member(MemberKind::Property, "Control", "size"))
            .unwrap();
        check!(
            tree.item(size).tooltip(Column::Name)
                == concat!(
                    "Vector2 Control.size\n",
                    "    Control.set_size(value) setter\n",
                    "    Control.get_size() getter",
                )
        );
        check!(tree.item(size).icon.as_deref() == Some("MemberProperty"));
    }

    #[rstest]
    fn unregistered_classes_use_script_methods(mut world: World) {
        world.docs.insert(ClassDoc::new("res://enemy.gd").inheriting("Node"));
        world.scripts.insert(
            "res://enemy.gd",
            ScriptInfo::new("Node").with_method(ScriptMethod::new("take_damage")),
        );

        let config = SearchConfig::new("damage", "Node")
            .with_categories(SearchCategories::METHODS)
            .with_scope(Scope::UNRELATED);
        let mut runner = SearchRunner::new(world.ctx(), config, ResultTree::new());
        runner.run_to_completion();

        let found = runner.class_match("res://enemy.gd").unwrap();
        check!(found.method_source() == &MethodSource::Script("res://enemy.gd".to_string()));
        check!(found.methods == vec![0]);
    }

    #[rstest]
    fn unloadable_script_falls_back_to_doc_methods(mut world: World) {
        let mut enemy = ClassDoc::new("res://enemy.gd").inheriting("Node");
        enemy.methods = vec![MethodDoc::new("patrol"), MethodDoc::new("take_damage")];
        world.docs.insert(enemy);

        let config = SearchConfig::new("damage", "Node")
            .with_categories(SearchCategories::METHODS)
            .with_scope(Scope::UNRELATED)
            .with_hierarchy(false);
        let mut runner = SearchRunner::new(world.ctx(), config, ResultTree::new());
        runner.run_to_completion();

        let found = runner.class_match("res://enemy.gd").unwrap();
        check!(found.method_source() == &MethodSource::Doc);
        check!(found.methods == vec![1]);

        let tree = runner.into_sink();
        check!(
            tree.find(&ItemMeta::member(MemberKind::Method, "res://enemy.gd", "take_damage"))
                .is_some()
        );
    }

    #[rstest]
    fn bound_script_is_scanned_after_the_store(world: World) {
        let config = SearchConfig::new("res://", "Node")
            .with_base_script("res://player.gd")
            .with_categories(SearchCategories::CLASSES);
        let mut runner = SearchRunner::new(world.ctx(), config, ResultTree::new());
        runner.run_to_completion();

        let last = runner.matches().last().unwrap();
        check!(last.class_name() == "res://player.gd");
        check!(last.origin() == ClassOrigin::Script);

        let tree = runner.into_sink();
        let script = tree.find(&ItemMeta::class("res://player.gd")).unwrap();
        let node = tree.find(&ItemMeta::class("Node")).unwrap();
        check!(tree.item(script).parent == Some(node));
        check!(tree.item(node).grayed);
    }

    #[rstest]
    fn profile_excludes_subtree(world: World) {
        let profile = DisabledClasses::new(["Node"]);
        let config = SearchConfig::new("", "Object").with_scope(Scope::RELATED);
        let mut runner = SearchRunner::new(
            world.ctx().with_profile(&profile),
            config,
            ResultTree::new(),
        );
        runner.run_to_completion();
        check!(runner.class_match("Node").is_none());
        check!(runner.class_match("Control").is_none());
        check!(runner.class_match("Object").is_some());
    }

    #[rstest]
    fn cyclic_docs_abort_with_partial_tree() {
        let docs: DocStore = [
            ClassDoc::new("A").inheriting("B"),
            ClassDoc::new("B").inheriting("A"),
        ]
        .into_iter()
        .collect();
        let classes = ClassHierarchy::new();
        let scripts = ScriptRegistry::new();
        let icons = IconSet::default();
        let ctx = SearchContext::new(&docs, &classes, &scripts, &icons);

        let config = SearchConfig::new("", "").with_scope(Scope::UNRELATED);
        let mut runner = SearchRunner::new(ctx, config, ResultTree::new());
        runner.run_to_completion();

        check!(runner.is_done());
        check!(runner.sink().selected().is_none());
        check!(runner.sink().is_empty());
    }
}
