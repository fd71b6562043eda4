//! Command implementations.
//!
//! Each command returns a serializable report; printing is left to
//! [`crate::summary`] so the reports can be tested without capturing stdout.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, info_span};

use lit_layout::{LayoutEngine, LayoutSummary, ModuleRegistry, RenderLayout, UrlConfiguration};
use lit_model::{DatasetSpec, LayoutCatalog, ModelSpecs, load_dataset_spec, load_model_specs};

/// Inputs for [`run_render`].
#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    pub catalog: PathBuf,
    pub layout: Option<String>,
    pub models: Option<PathBuf>,
    pub dataset: Option<PathBuf>,
    pub compare: bool,
    pub url_config: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    pub layout: String,
    pub models: Vec<String>,
    pub compare_examples: bool,
    pub summary: LayoutSummary,
    pub selected_tab: Option<String>,
    pub hidden_modules: BTreeSet<String>,
    /// Query string that restores the hidden modules and selected tab.
    pub url_query: String,
    pub render_layout: RenderLayout,
}

impl RenderReport {
    pub fn is_hidden(&self, key: &str) -> bool {
        self.hidden_modules.contains(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutListing {
    pub name: String,
    pub is_default: bool,
    pub description: Option<String>,
    pub tabs: Vec<String>,
    pub components: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleListing {
    pub name: String,
    pub title: String,
    pub duplicate_for_model_comparison: bool,
    pub duplicate_for_example_comparison: bool,
    pub collapse_by_default: bool,
}

pub fn load_catalog(path: &Path) -> Result<LayoutCatalog> {
    LayoutCatalog::load(path).with_context(|| format!("load layout catalog {}", path.display()))
}

pub fn run_render(request: &RenderRequest) -> Result<RenderReport> {
    let catalog = load_catalog(&request.catalog)?;
    let layout_name = match &request.layout {
        Some(name) => name.clone(),
        None => catalog.default_name()?.to_string(),
    };
    let span = info_span!("render", layout = %layout_name);
    let _guard = span.enter();

    let declared = catalog
        .get(&layout_name)
        .with_context(|| format!("select layout from {}", request.catalog.display()))?
        .clone();
    let model_specs = match &request.models {
        Some(path) => load_model_specs(path).context("load model specs")?,
        None => ModelSpecs::new(),
    };
    let dataset_spec = match &request.dataset {
        Some(path) => load_dataset_spec(path).context("load dataset spec")?,
        None => DatasetSpec::new(),
    };
    debug!(
        models = model_specs.len(),
        dataset_fields = dataset_spec.len(),
        compare_examples = request.compare,
        "inputs loaded"
    );

    let mut engine = LayoutEngine::with_builtin_modules();
    // Restored state goes in first so stale keys get pruned by the layout.
    if let Some(query) = &request.url_config {
        engine.apply_url_configuration(&UrlConfiguration::from_query(query));
    }
    engine
        .initialize_layout(declared, &model_specs, &dataset_spec, request.compare)
        .with_context(|| format!("compute layout '{layout_name}'"))?;

    let render_layout = engine.render_layout().clone();
    let summary = render_layout.summary();
    info!(
        tabs = summary.tabs,
        groups = summary.groups,
        instances = summary.instances,
        hidden = engine.hidden_module_keys().len(),
        "render layout computed"
    );

    Ok(RenderReport {
        layout: layout_name,
        models: model_specs.keys().cloned().collect(),
        compare_examples: request.compare,
        summary,
        selected_tab: engine.selected_tab().map(str::to_string),
        hidden_modules: engine.hidden_module_keys().clone(),
        url_query: engine.url_configuration().to_query(),
        render_layout,
    })
}

pub fn list_layouts(catalog: &LayoutCatalog) -> Result<Vec<LayoutListing>> {
    let default_name = catalog.default_name().ok();
    Ok(catalog
        .layouts
        .iter()
        .map(|(name, layout)| LayoutListing {
            name: name.clone(),
            is_default: default_name == Some(name.as_str()),
            description: layout.description.clone(),
            tabs: layout
                .components
                .tab_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            components: layout.component_count(),
        })
        .collect())
}

pub fn run_layouts(path: &Path) -> Result<Vec<LayoutListing>> {
    let catalog = load_catalog(path)?;
    list_layouts(&catalog)
}

pub fn list_modules(registry: &ModuleRegistry) -> Vec<ModuleListing> {
    registry
        .iter()
        .map(|(name, class)| ModuleListing {
            name: name.to_string(),
            title: class.title().to_string(),
            duplicate_for_model_comparison: class.duplicate_for_model_comparison(),
            duplicate_for_example_comparison: class.duplicate_for_example_comparison(),
            collapse_by_default: class.collapse_by_default(),
        })
        .collect()
}

pub fn run_modules() -> Vec<ModuleListing> {
    list_modules(&ModuleRegistry::with_builtin_modules())
}
