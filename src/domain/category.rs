use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Named origin of a log record.
///
/// Equality and hashing are by name only. The well-known categories are
/// constants; any other name can be minted at runtime with [`Category::new`]
/// and needs no registration. A minted category whose name matches a
/// well-known one is equal to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category {
    name: Cow<'static, str>,
}

impl Category {
    pub const GENERAL: Category = Category::from_static("General");
    pub const NETWORK: Category = Category::from_static("Network");
    pub const DATABASE: Category = Category::from_static("Database");
    pub const UI: Category = Category::from_static("UI");
    pub const ANALYTICS: Category = Category::from_static("Analytics");

    /// Well-known categories in declaration order.
    pub const BUILT_IN: [Category; 5] = [
        Category::GENERAL,
        Category::NETWORK,
        Category::DATABASE,
        Category::UI,
        Category::ANALYTICS,
    ];

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
        }
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_built_in(&self) -> bool {
        Self::BUILT_IN.iter().any(|c| c == self)
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::GENERAL
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&'static str> for Category {
    fn from(name: &'static str) -> Self {
        Category::from_static(name)
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Category::new(name)
    }
}
