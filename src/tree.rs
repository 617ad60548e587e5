//! Result tree: the sink the search runner writes into, and its metadata tags.
//!
//! The runner never touches widgets. It drives a [`ResultSink`], which a UI layer
//! implements over its own tree control; [`ResultTree`] is the in-memory
//! implementation used by headless callers and tests.

use ahash::AHashSet;
use std::fmt::{self, Display, Formatter, Write as _};
use std::hash::Hash;
use std::str::FromStr;

/// Tree column written by the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Display label.
    Name = 0,
    /// Human-readable kind ("Class", "Method", ...).
    Kind = 1,
}

impl Column {
    pub const ALL: [Self; 2] = [Self::Name, Self::Kind];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Member category of a member item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Method,
    Signal,
    Constant,
    Property,
    ThemeItem,
}

impl MemberKind {
    /// Tag used inside item metadata (`class_<tag>:...`).
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::Signal => "signal",
            Self::Constant => "constant",
            Self::Property => "property",
            Self::ThemeItem => "theme_item",
        }
    }

    /// Text shown in the kind column.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Method => "Method",
            Self::Signal => "Signal",
            Self::Constant => "Constant",
            Self::Property => "Property",
            Self::ThemeItem => "Theme Property",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Method => "MemberMethod",
            Self::Signal => "MemberSignal",
            Self::Constant => "MemberConstant",
            Self::Property => "MemberProperty",
            Self::ThemeItem => "MemberTheme",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "method" => Self::Method,
            "signal" => Self::Signal,
            "constant" => Self::Constant,
            "property" => Self::Property,
            "theme_item" => Self::ThemeItem,
            _ => return None,
        })
    }
}

/// Metadata attached to every non-root item; resolves a selection back to a
/// class or member.
///
/// Renders as `class_name:<Class>` or `class_<kind>:<Class>:<Name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemMeta {
    Class {
        class: String,
    },
    Member {
        kind: MemberKind,
        class: String,
        name: String,
    },
}

impl ItemMeta {
    pub fn class(class: impl Into<String>) -> Self {
        Self::Class {
            class: class.into(),
        }
    }

    pub fn member(kind: MemberKind, class: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Member {
            kind,
            class: class.into(),
            name: name.into(),
        }
    }

    /// Owning class of the item.
    pub fn class_name(&self) -> &str {
        match self {
            Self::Class { class } | Self::Member { class, .. } => class,
        }
    }
}

impl Display for ItemMeta {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class { class } => write!(f, "class_name:{}", class),
            Self::Member { kind, class, name } => {
                write!(f, "class_{}:{}:{}", kind.tag(), class, name)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Malformed item metadata: '{0}'")]
pub struct ParseMetaError(String);

impl FromStr for ItemMeta {
    type Err = ParseMetaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseMetaError(s.to_string());

        if let Some(class) = s.strip_prefix("class_name:") {
            return Ok(Self::class(class));
        }

        // Class identities may contain ':' (res://...), member names never do.
        let rest = s.strip_prefix("class_").ok_or_else(malformed)?;
        let (tag, rest) = rest.split_once(':').ok_or_else(malformed)?;
        let kind = MemberKind::from_tag(tag).ok_or_else(malformed)?;
        let (class, name) = rest.rsplit_once(':').ok_or_else(malformed)?;
        Ok(Self::member(kind, class, name))
    }
}

/// Capability to build the result tree.
pub trait ResultSink {
    /// Opaque item handle.
    type Item: Copy + Eq + Hash + fmt::Debug;

    /// Remove every item, including the root.
    fn clear(&mut self);

    /// Create an item; `None` creates the root.
    fn create_item(&mut self, parent: Option<Self::Item>) -> Self::Item;

    fn set_text(&mut self, item: Self::Item, column: Column, text: &str);

    fn set_icon(&mut self, item: Self::Item, icon: &str);

    fn set_tooltip(&mut self, item: Self::Item, column: Column, tooltip: &str);

    fn set_metadata(&mut self, item: Self::Item, meta: ItemMeta);

    /// Render the item in the disabled ("grayed out") color.
    fn set_grayed(&mut self, item: Self::Item);

    fn select(&mut self, item: Self::Item);
}

/// Capability to query the icon theme.
pub trait IconProvider {
    fn has_icon(&self, name: &str) -> bool;
}

/// Icon provider backed by a fixed set of icon names.
#[derive(Debug, Clone, Default)]
pub struct IconSet {
    names: AHashSet<String>,
}

impl IconSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl IconProvider for IconSet {
    fn has_icon(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

/// Handle into a [`ResultTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(usize);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeItem {
    pub parent: Option<ItemId>,
    pub children: Vec<ItemId>,
    pub text: [String; 2],
    pub tooltip: [String; 2],
    pub icon: Option<String>,
    pub metadata: Option<ItemMeta>,
    pub grayed: bool,
}

impl TreeItem {
    pub fn text(&self, column: Column) -> &str {
        &self.text[column.index()]
    }

    pub fn tooltip(&self, column: Column) -> &str {
        &self.tooltip[column.index()]
    }
}

/// In-memory result tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTree {
    items: Vec<TreeItem>,
    root: Option<ItemId>,
    selected: Option<ItemId>,
}

impl ResultTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<ItemId> {
        self.root
    }

    pub fn item(&self, id: ItemId) -> &TreeItem {
        &self.items[id.0]
    }

    pub fn children(&self, id: ItemId) -> &[ItemId] {
        &self.items[id.0].children
    }

    pub fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    pub fn selected_meta(&self) -> Option<&ItemMeta> {
        self.selected.and_then(|id| self.item(id).metadata.as_ref())
    }

    /// Number of items, root included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when there is nothing to pick: no root, or a root without children.
    pub fn is_empty(&self) -> bool {
        self.root.is_none_or(|root| self.items[root.0].children.is_empty())
    }

    /// Items in depth-first pre-order, root excluded.
    pub fn walk(&self) -> Vec<ItemId> {
        let mut order = Vec::with_capacity(self.items.len());
        let mut pending: Vec<ItemId> = self
            .root
            .map(|root| self.children(root).iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(id) = pending.pop() {
            order.push(id);
            pending.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    /// First item (pre-order) carrying the given metadata.
    pub fn find(&self, meta: &ItemMeta) -> Option<ItemId> {
        self.walk()
            .into_iter()
            .find(|id| self.item(*id).metadata.as_ref() == Some(meta))
    }

    /// Indented outline, one item per line: `label [kind]`, grayed items
    /// suffixed with `(gray)`, the selection prefixed with `>`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let Some(root) = self.root else {
            return out;
        };
        let mut pending: Vec<(ItemId, usize)> =
            self.children(root).iter().rev().map(|id| (*id, 0)).collect();
        while let Some((id, depth)) = pending.pop() {
            let item = self.item(id);
            let marker = if self.selected == Some(id) { '>' } else { ' ' };
            let _ = write!(
                out,
                "{}{}{} [{}]",
                marker,
                "  ".repeat(depth),
                item.text(Column::Name),
                item.text(Column::Kind)
            );
            if item.grayed {
                out.push_str(" (gray)");
            }
            out.push('\n');
            pending.extend(self.children(id).iter().rev().map(|c| (*c, depth + 1)));
        }
        out
    }
}

impl ResultSink for ResultTree {
    type Item = ItemId;

    fn clear(&mut self) {
        self.items.clear();
        self.root = None;
        self.selected = None;
    }

    fn create_item(&mut self, parent: Option<ItemId>) -> ItemId {
        let id = ItemId(self.items.len());
        self.items.push(TreeItem {
            parent,
            ..TreeItem::default()
        });
        match parent {
            Some(parent) => self.items[parent.0].children.push(id),
            None => self.root = Some(id),
        }
        id
    }

    fn set_text(&mut self, item: ItemId, column: Column, text: &str) {
        self.items[item.0].text[column.index()] = text.to_string();
    }

    fn set_icon(&mut self, item: ItemId, icon: &str) {
        self.items[item.0].icon = Some(icon.to_string());
    }

    fn set_tooltip(&mut self, item: ItemId, column: Column, tooltip: &str) {
        self.items[item.0].tooltip[column.index()] = tooltip.to_string();
    }

    fn set_metadata(&mut self, item: ItemId, meta: ItemMeta) {
        self.items[item.0].metadata = Some(meta);
    }

    fn set_grayed(&mut self, item: ItemId) {
        self.items[item.0].grayed = true;
    }

    fn select(&mut self, item: ItemId) {
        self.selected = Some(item);
    }
}
