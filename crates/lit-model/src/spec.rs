//! Model and dataset specs.
//!
//! A spec maps field names to field types. Models expose an input and an
//! output spec; datasets expose a single spec. Module display predicates
//! are written against these types.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Field name -> field type.
pub type Spec = BTreeMap<String, FieldType>;

/// Schema of the active dataset.
pub type DatasetSpec = Spec;

/// Active models keyed by model name.
///
/// Iteration follows insertion order (file order when loaded), which is the
/// order in which per-model duplicates are laid out.
pub type ModelSpecs = IndexMap<String, ModelInfo>;

/// Type of a single field in a spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldType {
    /// Concrete type name (e.g. `TextSegment`, `MulticlassPreds`).
    #[serde(rename = "__name__", alias = "type")]
    pub name: String,
    /// Ancestor type names, nearest first.
    #[serde(rename = "__mro__", alias = "mro", default, skip_serializing_if = "Vec::is_empty")]
    pub mro: Vec<String>,
    /// Field this one is derived from (e.g. the label field of a prediction).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Field this one is aligned to (e.g. tokens for a salience map).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    /// Label vocabulary, for categorical outputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocab: Option<Vec<String>>,
}

impl FieldType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style ancestor list.
    #[must_use]
    pub fn with_mro<I, S>(mut self, ancestors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mro = ancestors.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub fn with_align(mut self, align: impl Into<String>) -> Self {
        self.align = Some(align.into());
        self
    }

    /// True if this field is `type_name` or derives from it.
    pub fn is_a(&self, type_name: &str) -> bool {
        self.name == type_name || self.mro.iter().any(|ancestor| ancestor == type_name)
    }

    /// True if this field matches any of `type_names`.
    pub fn is_any_of(&self, type_names: &[&str]) -> bool {
        type_names.iter().any(|type_name| self.is_a(type_name))
    }
}

/// Input and output specs of a model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSpec {
    pub input: Spec,
    pub output: Spec,
}

/// Everything the host knows about one loaded model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelInfo {
    pub spec: ModelSpec,
    /// Datasets the model is compatible with.
    pub datasets: Vec<String>,
    /// Interpreters available for the model.
    pub interpreters: Vec<String>,
    /// Generators available for the model.
    pub generators: Vec<String>,
    pub description: Option<String>,
}

impl ModelInfo {
    pub fn new(spec: ModelSpec) -> Self {
        Self {
            spec,
            ..Self::default()
        }
    }

    /// Output field names whose type matches any of `type_names`.
    pub fn output_keys_of(&self, type_names: &[&str]) -> Vec<String> {
        find_spec_keys(&self.spec.output, type_names)
    }

    /// Input field names whose type matches any of `type_names`.
    pub fn input_keys_of(&self, type_names: &[&str]) -> Vec<String> {
        find_spec_keys(&self.spec.input, type_names)
    }
}

/// Field names in `spec` whose type matches any of `type_names`.
pub fn find_spec_keys(spec: &Spec, type_names: &[&str]) -> Vec<String> {
    spec.iter()
        .filter(|(_, field)| field.is_any_of(type_names))
        .map(|(name, _)| name.clone())
        .collect()
}

/// True if the spec has at least one field matching `type_names`.
pub fn spec_contains(spec: &Spec, type_names: &[&str]) -> bool {
    spec.values().any(|field| field.is_any_of(type_names))
}

/// Checks model input specs for `type_names`.
///
/// With `check_all` every model must match; otherwise one is enough. An
/// empty model set never matches.
pub fn does_input_spec_contain(
    model_specs: &ModelSpecs,
    type_names: &[&str],
    check_all: bool,
) -> bool {
    models_match(model_specs, check_all, |info| {
        spec_contains(&info.spec.input, type_names)
    })
}

/// Checks model output specs for `type_names`. See [`does_input_spec_contain`].
pub fn does_output_spec_contain(
    model_specs: &ModelSpecs,
    type_names: &[&str],
    check_all: bool,
) -> bool {
    models_match(model_specs, check_all, |info| {
        spec_contains(&info.spec.output, type_names)
    })
}

fn models_match(
    model_specs: &ModelSpecs,
    check_all: bool,
    predicate: impl Fn(&ModelInfo) -> bool,
) -> bool {
    if model_specs.is_empty() {
        return false;
    }
    if check_all {
        model_specs.values().all(predicate)
    } else {
        model_specs.values().any(predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> ModelInfo {
        let mut output = Spec::new();
        output.insert(
            "probas".to_string(),
            FieldType::new("MulticlassPreds").with_parent("label"),
        );
        output.insert(
            "grads".to_string(),
            FieldType::new("TokenGradients").with_mro(["Salience"]),
        );
        ModelInfo::new(ModelSpec {
            input: Spec::new(),
            output,
        })
    }

    #[test]
    fn is_a_follows_ancestors() {
        let field = FieldType::new("TokenGradients").with_mro(["Salience", "LitType"]);
        assert!(field.is_a("TokenGradients"));
        assert!(field.is_a("Salience"));
        assert!(!field.is_a("MulticlassPreds"));
    }

    #[test]
    fn finds_output_keys_by_type() {
        let info = classifier();
        assert_eq!(info.output_keys_of(&["MulticlassPreds"]), vec!["probas"]);
        assert_eq!(info.output_keys_of(&["Salience"]), vec!["grads"]);
        assert!(info.input_keys_of(&["TextSegment"]).is_empty());
    }

    #[test]
    fn check_all_requires_every_model() {
        let mut models = ModelSpecs::new();
        models.insert("a".to_string(), classifier());
        models.insert("b".to_string(), ModelInfo::default());

        assert!(does_output_spec_contain(&models, &["MulticlassPreds"], false));
        assert!(!does_output_spec_contain(&models, &["MulticlassPreds"], true));
        assert!(!does_output_spec_contain(
            &ModelSpecs::new(),
            &["MulticlassPreds"],
            false
        ));
    }

    #[test]
    fn field_type_reads_dunder_names() {
        let json = r#"{"__name__": "MulticlassPreds", "__mro__": ["LitType"], "vocab": ["0", "1"]}"#;
        let field: FieldType = serde_json::from_str(json).expect("parse field type");
        assert_eq!(field.name, "MulticlassPreds");
        assert!(field.is_a("LitType"));
        assert_eq!(field.vocab.as_deref().map(<[String]>::len), Some(2));
    }
}
