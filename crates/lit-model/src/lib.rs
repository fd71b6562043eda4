#![deny(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod layout;
pub mod module;
pub mod spec;

pub use catalog::{LayoutCatalog, load_dataset_spec, load_model_specs};
pub use error::{ModelError, Result};
pub use layout::{ComponentGroup, DeclaredLayout, LayoutSettings, TabComponents, TabLayout};
pub use module::{ComponentSpecifier, ModuleClass, ModuleDescriptor, ModuleRef};
pub use spec::{
    DatasetSpec, FieldType, ModelInfo, ModelSpec, ModelSpecs, Spec, does_input_spec_contain,
    does_output_spec_contain, find_spec_keys, spec_contains,
};
