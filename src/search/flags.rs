//! Category and scope bitmasks, plus the named filters a settings file selects from.

use serde::{Deserialize, Serialize};
use std::ops::{BitOr, BitOrAssign};

macro_rules! bitmask {
    ($name:ident) => {
        impl $name {
            pub const fn empty() -> Self {
                Self(0)
            }

            /// All bits of `other` are set.
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            /// Any bit of `other` is set.
            pub const fn intersects(self, other: Self) -> bool {
                self.0 & other.0 != 0
            }

            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }
        }

        impl BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }
    };
}

/// Member categories a search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SearchCategories(u8);

impl SearchCategories {
    pub const CLASSES: Self = Self(1 << 0);
    pub const CONSTRUCTORS: Self = Self(1 << 1);
    pub const METHODS: Self = Self(1 << 2);
    pub const OPERATORS: Self = Self(1 << 3);
    pub const SIGNALS: Self = Self(1 << 4);
    pub const CONSTANTS: Self = Self(1 << 5);
    pub const PROPERTIES: Self = Self(1 << 6);
    pub const THEME_ITEMS: Self = Self(1 << 7);
    pub const ALL: Self = Self(u8::MAX);
}

bitmask!(SearchCategories);

/// Region of the class hierarchy, relative to the base class, eligible for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Scope(u8);

impl Scope {
    /// The base class and its ancestors.
    pub const BASE: Self = Self(1 << 0);
    /// The base class and its descendants.
    pub const INHERITERS: Self = Self(1 << 1);
    /// Everything outside the base class's lineage.
    pub const UNRELATED: Self = Self(1 << 2);
    pub const RELATED: Self = Self(Self::BASE.0 | Self::INHERITERS.0);
}

bitmask!(Scope);

/// Named category filter, as offered by the popup's filter menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Classes,
    Constructors,
    Methods,
    Operators,
    Signals,
    Constants,
    Properties,
    ThemeItems,
}

impl From<CategoryFilter> for SearchCategories {
    fn from(filter: CategoryFilter) -> Self {
        match filter {
            CategoryFilter::All => Self::ALL,
            CategoryFilter::Classes => Self::CLASSES,
            CategoryFilter::Constructors => Self::CONSTRUCTORS,
            CategoryFilter::Methods => Self::METHODS,
            CategoryFilter::Operators => Self::OPERATORS,
            CategoryFilter::Signals => Self::SIGNALS,
            CategoryFilter::Constants => Self::CONSTANTS,
            CategoryFilter::Properties => Self::PROPERTIES,
            CategoryFilter::ThemeItems => Self::THEME_ITEMS,
        }
    }
}

/// Named scope filter, as offered by the popup's scope menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeFilter {
    #[default]
    Related,
    Base,
    Inheriters,
    Unrelated,
}

impl From<ScopeFilter> for Scope {
    fn from(filter: ScopeFilter) -> Self {
        match filter {
            ScopeFilter::Related => Self::RELATED,
            ScopeFilter::Base => Self::BASE,
            ScopeFilter::Inheriters => Self::INHERITERS,
            ScopeFilter::Unrelated => Self::UNRELATED,
        }
    }
}
