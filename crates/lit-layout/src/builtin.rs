//! Built-in panels.
//!
//! Registry names follow the `<name>-module` convention used in layout
//! files. Display predicates only look at field types, so they work for any
//! model that declares its outputs properly.

use lit_model::{
    DatasetSpec, ModelSpecs, ModuleDescriptor, does_output_spec_contain, spec_contains,
};

use crate::registry::ModuleRegistry;

const CLASSIFICATION_TYPES: &[&str] = &["MulticlassPreds"];
const REGRESSION_TYPES: &[&str] = &["RegressionScore"];
const SCALAR_TYPES: &[&str] = &["MulticlassPreds", "RegressionScore", "Scalar"];
const SALIENCE_TYPES: &[&str] = &[
    "Salience",
    "TokenSalience",
    "FeatureSalience",
    "ImageSalience",
    "SequenceSalience",
];
const EMBEDDING_TYPES: &[&str] = &["Embeddings"];
const GENERATION_TYPES: &[&str] = &["GeneratedText", "GeneratedTextCandidates"];
const ATTENTION_TYPES: &[&str] = &["AttentionHeads"];
const ANNOTATION_TYPES: &[&str] = &["SpanLabels", "EdgeLabels", "MultiSegmentAnnotations"];
const METRIC_TYPES: &[&str] = &[
    "MulticlassPreds",
    "RegressionScore",
    "GeneratedText",
    "GeneratedTextCandidates",
    "SpanLabels",
];

/// Registry names of every built-in panel.
pub const BUILTIN_MODULE_NAMES: &[&str] = &[
    "annotated-text-module",
    "attention-module",
    "classification-module",
    "color-module",
    "confusion-matrix-module",
    "data-table-module",
    "datapoint-editor-module",
    "embeddings-module",
    "generated-text-module",
    "generator-module",
    "lit-slice-module",
    "metrics-module",
    "regression-module",
    "salience-map-module",
    "scalar-module",
];

/// Adds every built-in panel to `registry`.
pub fn register_builtin_modules(registry: &mut ModuleRegistry) {
    for name in BUILTIN_MODULE_NAMES {
        if let Some(descriptor) = builtin_module(name) {
            registry.register(*name, descriptor);
        }
    }
}

/// Descriptor for a built-in panel, by registry name.
pub fn builtin_module(name: &str) -> Option<ModuleDescriptor> {
    let descriptor = match name {
        "data-table-module" => ModuleDescriptor::new("Data Table"),
        "datapoint-editor-module" => {
            ModuleDescriptor::new("Datapoint Editor").with_example_duplication(true)
        }
        "lit-slice-module" => ModuleDescriptor::new("Slice Editor"),
        "color-module" => ModuleDescriptor::new("Color"),
        "classification-module" => ModuleDescriptor::new("Classification Results")
            .with_example_duplication(true)
            .display_when(|models, _| outputs_any(models, CLASSIFICATION_TYPES)),
        "regression-module" => ModuleDescriptor::new("Regression Results")
            .with_example_duplication(true)
            .display_when(|models, _| outputs_any(models, REGRESSION_TYPES)),
        "scalar-module" => ModuleDescriptor::new("Scalars")
            .with_model_duplication(true)
            .display_when(|models, _| outputs_any(models, SCALAR_TYPES)),
        "metrics-module" => ModuleDescriptor::new("Metrics")
            .display_when(|models, _| outputs_any(models, METRIC_TYPES)),
        "confusion-matrix-module" => ModuleDescriptor::new("Confusion Matrix")
            .display_when(|models, _| outputs_any(models, CLASSIFICATION_TYPES)),
        "salience-map-module" => ModuleDescriptor::new("Salience Maps")
            .with_model_duplication(true)
            .with_example_duplication(true)
            .display_when(|models, _| {
                outputs_any(models, SALIENCE_TYPES)
                    || models.values().any(|info| !info.interpreters.is_empty())
            }),
        "embeddings-module" => ModuleDescriptor::new("Embeddings")
            .display_when(|models, _| outputs_any(models, EMBEDDING_TYPES)),
        "generated-text-module" => ModuleDescriptor::new("Generated Text")
            .with_model_duplication(true)
            .with_example_duplication(true)
            .display_when(|models, _| outputs_any(models, GENERATION_TYPES)),
        "attention-module" => ModuleDescriptor::new("Attention")
            .with_model_duplication(true)
            .with_example_duplication(true)
            .collapsed_by_default(true)
            .display_when(|models, _| outputs_any(models, ATTENTION_TYPES)),
        "annotated-text-module" => ModuleDescriptor::new("Annotated Text")
            .with_example_duplication(true)
            .display_when(|models, dataset| {
                dataset_has(dataset, ANNOTATION_TYPES) || outputs_any(models, ANNOTATION_TYPES)
            }),
        "generator-module" => ModuleDescriptor::new("Counterfactual Explorer")
            .collapsed_by_default(true)
            .display_when(|models, dataset| {
                !dataset.is_empty() && models.values().any(|info| !info.generators.is_empty())
            }),
        _ => return None,
    };
    Some(descriptor)
}

fn outputs_any(models: &ModelSpecs, type_names: &[&str]) -> bool {
    does_output_spec_contain(models, type_names, false)
}

fn dataset_has(dataset: &DatasetSpec, type_names: &[&str]) -> bool {
    spec_contains(dataset, type_names)
}
