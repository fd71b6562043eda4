//! Render layout types.
//!
//! The render layout is the derived, instance-level view of a declared
//! layout: every panel that should actually be drawn, duplicated per model
//! and per selection slot where the class asks for it.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use lit_model::ModuleRef;

/// Which of the two parallel selections a compare-mode instance reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SelectionSlot {
    /// The main selection (slot 0).
    Primary,
    /// The reference selection shown alongside it (slot 1).
    Reference,
}

impl SelectionSlot {
    pub fn index(self) -> u8 {
        match self {
            Self::Primary => 0,
            Self::Reference => 1,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Primary),
            1 => Some(Self::Reference),
            _ => None,
        }
    }
}

impl fmt::Display for SelectionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

impl Serialize for SelectionSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.index())
    }
}

/// One panel instance to render.
#[derive(Debug, Clone)]
pub struct InstanceConfig {
    /// Shared by every instance derived from the same declared component.
    pub key: String,
    pub component_class: ModuleRef,
    /// Model this copy is bound to; `None` means all active models.
    pub model_name: Option<String>,
    /// Selection this copy reads from; `None` outside compare mode.
    pub selection_slot: Option<SelectionSlot>,
}

impl InstanceConfig {
    pub fn title(&self) -> &str {
        self.component_class.title()
    }
}

impl PartialEq for InstanceConfig {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && Arc::ptr_eq(&self.component_class, &other.component_class)
            && self.model_name == other.model_name
            && self.selection_slot == other.selection_slot
    }
}

impl Serialize for InstanceConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("InstanceConfig", 4)?;
        state.serialize_field("key", &self.key)?;
        state.serialize_field("title", self.title())?;
        state.serialize_field("model_name", &self.model_name)?;
        state.serialize_field("selection_slot", &self.selection_slot)?;
        state.end()
    }
}

/// All instances derived from one declared component.
pub type InstanceGroup = Vec<InstanceConfig>;

/// A tab that has at least one group to show.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTab {
    pub name: String,
    pub groups: Vec<InstanceGroup>,
}

impl RenderTab {
    pub fn instance_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// Group keys in render order.
    pub fn keys(&self) -> Vec<&str> {
        self.groups
            .iter()
            .filter_map(|group| group.first())
            .map(|instance| instance.key.as_str())
            .collect()
    }
}

/// Counts over a render layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LayoutSummary {
    pub tabs: usize,
    pub groups: usize,
    pub instances: usize,
}

/// Tab name -> instance groups, in declared tab order.
///
/// Tabs that produced nothing are absent, so an empty tab and a tab whose
/// panels are all filtered out look the same.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderLayout {
    tabs: Vec<RenderTab>,
}

impl RenderLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_tab(&mut self, tab: RenderTab) {
        self.tabs.push(tab);
    }

    pub fn tabs(&self) -> &[RenderTab] {
        &self.tabs
    }

    pub fn tab(&self, name: &str) -> Option<&RenderTab> {
        self.tabs.iter().find(|tab| tab.name == name)
    }

    pub fn contains_tab(&self, name: &str) -> bool {
        self.tab(name).is_some()
    }

    pub fn tab_names(&self) -> Vec<&str> {
        self.tabs.iter().map(|tab| tab.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Every instance, tab by tab, group by group.
    pub fn instances(&self) -> impl Iterator<Item = &InstanceConfig> {
        self.tabs
            .iter()
            .flat_map(|tab| tab.groups.iter().flatten())
    }

    /// Distinct instance keys.
    pub fn keys(&self) -> BTreeSet<String> {
        self.instances().map(|instance| instance.key.clone()).collect()
    }

    pub fn summary(&self) -> LayoutSummary {
        LayoutSummary {
            tabs: self.tabs.len(),
            groups: self.tabs.iter().map(|tab| tab.groups.len()).sum(),
            instances: self.tabs.iter().map(RenderTab::instance_count).sum(),
        }
    }
}

impl Serialize for RenderLayout {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tabs.len()))?;
        for tab in &self.tabs {
            map.serialize_entry(&tab.name, &tab.groups)?;
        }
        map.end()
    }
}

/// Instance key for a component in a tab.
///
/// Two components with the same title in one tab share a key.
pub fn instance_key(tab_name: &str, title: &str) -> String {
    format!("{tab_name}_{title}")
}
