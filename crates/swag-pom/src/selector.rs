//! Selector registry: semantic element names mapped to locators.
//!
//! Each screen declares its element names as an enum implementing
//! [`ElementName`]. A [`SelectorRegistry`] for that screen must hold exactly
//! one [`Selector`] per declared name; the builder refuses to produce an
//! incomplete registry, so a missing selector surfaces at startup instead of
//! as a flaky assertion halfway through a scenario.

use crate::result::{SwagError, SwagResult};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// CSS selector (e.g., ".shopping_cart_badge")
    Css(String),
    /// `data-test` attribute selector
    DataTest(String),
    /// Element id selector
    Id(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a `data-test` attribute selector
    #[must_use]
    pub fn data_test(value: impl Into<String>) -> Self {
        Self::DataTest(value.into())
    }

    /// Create an element id selector
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Convert to the CSS query handed to the browser driver
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::Css(s) => s.clone(),
            Self::DataTest(v) => format!("[data-test=\"{v}\"]"),
            Self::Id(id) => format!("#{id}"),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Semantic element names of one screen.
pub trait ElementName: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Screen these elements belong to
    const SCREEN: &'static str;

    /// Every element the screen's page object uses
    const ALL: &'static [Self];

    /// Stable name used in logs and by-name lookups
    fn name(self) -> &'static str;
}

/// Immutable mapping from element names to selectors for one screen
#[derive(Debug, Clone)]
pub struct SelectorRegistry<K: ElementName> {
    entries: HashMap<K, Selector>,
}

impl<K: ElementName> SelectorRegistry<K> {
    /// Start building a registry
    #[must_use]
    pub fn builder() -> SelectorRegistryBuilder<K> {
        SelectorRegistryBuilder {
            entries: HashMap::new(),
            duplicates: Vec::new(),
        }
    }

    /// Look up the selector for an element
    pub fn lookup(&self, key: K) -> SwagResult<&Selector> {
        self.entries
            .get(&key)
            .ok_or_else(|| SwagError::UnknownSelector {
                screen: K::SCREEN.to_string(),
                name: key.name().to_string(),
            })
    }

    /// Look up a selector by its semantic name
    pub fn lookup_by_name(&self, name: &str) -> SwagResult<&Selector> {
        K::ALL
            .iter()
            .find(|k| k.name() == name)
            .and_then(|k| self.entries.get(k))
            .ok_or_else(|| SwagError::UnknownSelector {
                screen: K::SCREEN.to_string(),
                name: name.to_string(),
            })
    }

    /// Number of registered selectors
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered element names, in declaration order
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        K::ALL
            .iter()
            .filter(|k| self.entries.contains_key(k))
            .map(|k| k.name())
            .collect()
    }
}

/// Builder that validates completeness on [`build`](Self::build)
#[derive(Debug)]
pub struct SelectorRegistryBuilder<K: ElementName> {
    entries: HashMap<K, Selector>,
    duplicates: Vec<K>,
}

impl<K: ElementName> SelectorRegistryBuilder<K> {
    /// Register the selector for an element
    #[must_use]
    pub fn with(mut self, key: K, selector: Selector) -> Self {
        if self.entries.insert(key, selector).is_some() {
            self.duplicates.push(key);
        }
        self
    }

    /// Finish the registry.
    ///
    /// Fails with [`SwagError::UnknownSelector`] naming the first declared
    /// element without a selector, or [`SwagError::Config`] when an element
    /// was registered more than once.
    pub fn build(self) -> SwagResult<SelectorRegistry<K>> {
        if let Some(dup) = self.duplicates.first() {
            return Err(SwagError::Config {
                message: format!(
                    "selector '{}' registered twice on {} screen",
                    dup.name(),
                    K::SCREEN
                ),
            });
        }
        if let Some(missing) = K::ALL.iter().find(|k| !self.entries.contains_key(k)) {
            return Err(SwagError::UnknownSelector {
                screen: K::SCREEN.to_string(),
                name: missing.name().to_string(),
            });
        }
        Ok(SelectorRegistry {
            entries: self.entries,
        })
    }
}
