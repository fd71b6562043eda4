//! Declared layouts.
//!
//! A declared layout is the static description of the panel grid: named
//! tabs in display order, each holding groups of component specifiers, plus
//! a settings record that only the host reads.
//!
//! # File format
//!
//! ```toml
//! description = "Basic layout"
//!
//! [components]
//! Main = ["data-table-module", "datapoint-editor-module"]
//! Predictions = [["classification-module"], ["scalar-module"]]
//!
//! [settings]
//! hide_toolbar = true
//! ```
//!
//! A flat list is a single group; a list of lists is one group per inner
//! list. Tabs keep the order in which they appear in the file.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::module::ComponentSpecifier;

/// One declared group of component specifiers.
pub type ComponentGroup = Vec<ComponentSpecifier>;

/// Opaque host settings carried by a layout.
pub type LayoutSettings = BTreeMap<String, serde_json::Value>;

/// A named tab and its component groups.
#[derive(Debug, Clone)]
pub struct TabLayout {
    pub name: String,
    pub groups: Vec<ComponentGroup>,
}

impl TabLayout {
    /// A tab with a single group.
    pub fn new<I, S>(name: impl Into<String>, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ComponentSpecifier>,
    {
        Self {
            name: name.into(),
            groups: vec![components.into_iter().map(Into::into).collect()],
        }
    }

    /// Appends another group.
    #[must_use]
    pub fn with_group<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ComponentSpecifier>,
    {
        self.groups
            .push(components.into_iter().map(Into::into).collect());
        self
    }

    /// Every specifier across all groups, in declared order.
    pub fn specifiers(&self) -> impl Iterator<Item = &ComponentSpecifier> {
        self.groups.iter().flatten()
    }

    pub fn component_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }
}

/// Tabs in display order.
#[derive(Debug, Clone, Default)]
pub struct TabComponents(Vec<TabLayout>);

impl TabComponents {
    pub fn new(tabs: Vec<TabLayout>) -> Self {
        Self(tabs)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TabLayout> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&TabLayout> {
        self.0.iter().find(|tab| tab.name == name)
    }

    pub fn tab_names(&self) -> Vec<&str> {
        self.0.iter().map(|tab| tab.name.as_str()).collect()
    }

    /// First tab name that appears more than once, if any.
    pub fn duplicate_tab(&self) -> Option<&str> {
        let mut seen = BTreeSet::new();
        self.0
            .iter()
            .map(|tab| tab.name.as_str())
            .find(|name| !seen.insert(*name))
    }
}

impl<'a> IntoIterator for &'a TabComponents {
    type Item = &'a TabLayout;
    type IntoIter = std::slice::Iter<'a, TabLayout>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<TabLayout> for TabComponents {
    fn from_iter<T: IntoIterator<Item = TabLayout>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GroupsRepr {
    Flat(Vec<ComponentSpecifier>),
    Nested(Vec<Vec<ComponentSpecifier>>),
}

struct TabComponentsVisitor;

impl<'de> Visitor<'de> for TabComponentsVisitor {
    type Value = TabComponents;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of tab names to component lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut tabs: Vec<TabLayout> = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((name, groups)) = map.next_entry::<String, GroupsRepr>()? {
            if tabs.iter().any(|tab| tab.name == name) {
                return Err(serde::de::Error::custom(format!("duplicate tab: {name}")));
            }
            let groups = match groups {
                GroupsRepr::Flat(components) => vec![components],
                GroupsRepr::Nested(groups) => groups,
            };
            tabs.push(TabLayout { name, groups });
        }
        Ok(TabComponents(tabs))
    }
}

impl<'de> Deserialize<'de> for TabComponents {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TabComponentsVisitor)
    }
}

impl Serialize for TabComponents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for tab in &self.0 {
            if tab.groups.len() == 1 {
                map.serialize_entry(&tab.name, &tab.groups[0])?;
            } else {
                map.serialize_entry(&tab.name, &tab.groups)?;
            }
        }
        map.end()
    }
}

/// Static description of the panel grid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeclaredLayout {
    pub components: TabComponents,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Missing settings deserialize to an empty record.
    #[serde(default)]
    pub settings: LayoutSettings,
}

impl DeclaredLayout {
    pub fn new(tabs: Vec<TabLayout>) -> Self {
        Self {
            components: TabComponents::new(tabs),
            description: None,
            settings: LayoutSettings::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_setting(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.settings.insert(name.into(), value);
        self
    }

    pub fn setting(&self, name: &str) -> Option<&serde_json::Value> {
        self.settings.get(name)
    }

    /// Total declared components across all tabs.
    pub fn component_count(&self) -> usize {
        self.components.iter().map(TabLayout::component_count).sum()
    }
}
