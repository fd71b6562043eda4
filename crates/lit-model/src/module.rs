//! Component class contract.
//!
//! A layout names the panels it wants either directly, by handing over a
//! class, or indirectly, by registry name. Both resolve to a
//! [`ModuleClass`], which decides whether it has anything to show for the
//! current models and dataset and how it should be duplicated.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::spec::{DatasetSpec, ModelSpecs};

/// Capabilities of one kind of panel.
pub trait ModuleClass: fmt::Debug + Send + Sync {
    /// Display title. Also the second half of the instance key.
    fn title(&self) -> &str;

    /// Whether the panel has anything to show for these models and dataset.
    fn should_display_module(&self, model_specs: &ModelSpecs, dataset_spec: &DatasetSpec) -> bool;

    /// Render one copy per active model.
    fn duplicate_for_model_comparison(&self) -> bool {
        false
    }

    /// Render one copy per selection slot while comparing examples.
    fn duplicate_for_example_comparison(&self) -> bool {
        false
    }

    /// Start collapsed.
    fn collapse_by_default(&self) -> bool {
        false
    }
}

/// Shared handle to a resolved component class.
pub type ModuleRef = Arc<dyn ModuleClass>;

/// Reference to a component class inside a declared layout.
#[derive(Clone)]
pub enum ComponentSpecifier {
    /// Registry name, resolved at layout time.
    ByName(String),
    /// Class handed over directly.
    ByClass(ModuleRef),
}

impl ComponentSpecifier {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self::ByName(name.into())
    }

    pub fn by_class(class: impl ModuleClass + 'static) -> Self {
        Self::ByClass(Arc::new(class))
    }

    /// Registry name, or the class title for direct references.
    pub fn label(&self) -> &str {
        match self {
            Self::ByName(name) => name,
            Self::ByClass(class) => class.title(),
        }
    }
}

impl fmt::Debug for ComponentSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByName(name) => f.debug_tuple("ByName").field(name).finish(),
            Self::ByClass(class) => f.debug_tuple("ByClass").field(&class.title()).finish(),
        }
    }
}

impl From<&str> for ComponentSpecifier {
    fn from(name: &str) -> Self {
        Self::ByName(name.to_string())
    }
}

impl From<String> for ComponentSpecifier {
    fn from(name: String) -> Self {
        Self::ByName(name)
    }
}

impl From<ModuleRef> for ComponentSpecifier {
    fn from(class: ModuleRef) -> Self {
        Self::ByClass(class)
    }
}

impl Serialize for ComponentSpecifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ComponentSpecifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        if name.trim().is_empty() {
            return Err(serde::de::Error::custom("module name must not be empty"));
        }
        Ok(Self::ByName(name))
    }
}

type DisplayPredicate = dyn Fn(&ModelSpecs, &DatasetSpec) -> bool + Send + Sync;

/// Data-driven [`ModuleClass`] for hosts that do not need a dedicated type.
///
/// ```ignore
/// let scores = ModuleDescriptor::new("Scores")
///     .with_model_duplication(true)
///     .display_when(|models, _| !models.is_empty());
/// ```
#[derive(Clone)]
pub struct ModuleDescriptor {
    title: String,
    duplicate_for_model_comparison: bool,
    duplicate_for_example_comparison: bool,
    collapse_by_default: bool,
    predicate: Option<Arc<DisplayPredicate>>,
}

impl ModuleDescriptor {
    /// A panel that always displays and is never duplicated.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            duplicate_for_model_comparison: false,
            duplicate_for_example_comparison: false,
            collapse_by_default: false,
            predicate: None,
        }
    }

    #[must_use]
    pub fn with_model_duplication(mut self, enabled: bool) -> Self {
        self.duplicate_for_model_comparison = enabled;
        self
    }

    #[must_use]
    pub fn with_example_duplication(mut self, enabled: bool) -> Self {
        self.duplicate_for_example_comparison = enabled;
        self
    }

    #[must_use]
    pub fn collapsed_by_default(mut self, collapsed: bool) -> Self {
        self.collapse_by_default = collapsed;
        self
    }

    /// Replaces the display predicate.
    #[must_use]
    pub fn display_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&ModelSpecs, &DatasetSpec) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Wraps the descriptor in a shared handle.
    pub fn into_ref(self) -> ModuleRef {
        Arc::new(self)
    }
}

impl ModuleClass for ModuleDescriptor {
    fn title(&self) -> &str {
        &self.title
    }

    fn should_display_module(&self, model_specs: &ModelSpecs, dataset_spec: &DatasetSpec) -> bool {
        self.predicate
            .as_ref()
            .is_none_or(|predicate| predicate(model_specs, dataset_spec))
    }

    fn duplicate_for_model_comparison(&self) -> bool {
        self.duplicate_for_model_comparison
    }

    fn duplicate_for_example_comparison(&self) -> bool {
        self.duplicate_for_example_comparison
    }

    fn collapse_by_default(&self) -> bool {
        self.collapse_by_default
    }
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("title", &self.title)
            .field(
                "duplicate_for_model_comparison",
                &self.duplicate_for_model_comparison,
            )
            .field(
                "duplicate_for_example_comparison",
                &self.duplicate_for_example_comparison,
            )
            .field("collapse_by_default", &self.collapse_by_default)
            .field("has_predicate", &self.predicate.is_some())
            .finish()
    }
}
