//! Layout engine.
//!
//! The engine owns the declared layout and everything derived from it: the
//! render layout, the set of instance keys it produced, and the set of keys
//! the user has collapsed. Hosts construct one engine, hand it a registry,
//! and drive it from their own event loop:
//!
//! 1. [`LayoutEngine::initialize_layout`] once at startup.
//! 2. [`LayoutEngine::quick_update_layout`] or [`LayoutEngine::clear_layout`]
//!    whenever models, the dataset, or compare mode change.
//! 3. Visibility mutators in response to user interaction.
//!
//! The engine never draws anything. It signals "layout changed, please
//! redraw" through the render callback and publishes finer-grained
//! [`LayoutEvent`]s to subscribers. The host is expected to diff instance
//! keys rather than recreate every panel, since a recreated panel loses its
//! internal state.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use lit_model::{ComponentSpecifier, DatasetSpec, DeclaredLayout, ModelSpecs, ModuleRef};

use crate::error::{LayoutError, Result};
use crate::observer::{LayoutEvent, Observers, SubscriptionId, UpdateKind};
use crate::registry::{ModuleRegistry, ModuleResolver, get_module_constructor};
use crate::render::{
    InstanceConfig, InstanceGroup, RenderLayout, RenderTab, SelectionSlot, instance_key,
};
use crate::url_config::UrlConfiguration;

/// Stateful layout service.
pub struct LayoutEngine<R = ModuleRegistry> {
    resolver: R,
    declared_layout: DeclaredLayout,
    render_layout: RenderLayout,
    all_module_keys: BTreeSet<String>,
    hidden_module_keys: BTreeSet<String>,
    selected_tab: Option<String>,
    render_callback: Option<Box<dyn FnMut()>>,
    observers: Observers,
}

impl LayoutEngine<ModuleRegistry> {
    /// Engine backed by a registry holding the built-in panels.
    pub fn with_builtin_modules() -> Self {
        Self::new(ModuleRegistry::with_builtin_modules())
    }
}

impl<R: ModuleResolver> LayoutEngine<R> {
    /// Create an engine with an empty declared layout.
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            declared_layout: DeclaredLayout::default(),
            render_layout: RenderLayout::new(),
            all_module_keys: BTreeSet::new(),
            hidden_module_keys: BTreeSet::new(),
            selected_tab: None,
            render_callback: None,
            observers: Observers::default(),
        }
    }

    /// Registry used to resolve component names.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    // =========================================================================
    // LAYOUT COMPUTATION
    // =========================================================================

    /// Replace the declared layout and compute its render layout.
    ///
    /// Tab names are checked and every specifier is resolved before anything
    /// is stored, so a repeated tab or an unknown module leaves the engine
    /// exactly as it was.
    pub fn initialize_layout(
        &mut self,
        layout: DeclaredLayout,
        model_specs: &ModelSpecs,
        dataset_spec: &DatasetSpec,
        compare_examples: bool,
    ) -> Result<()> {
        if let Some(name) = layout.components.duplicate_tab() {
            warn!(tab = name, "Declared layout repeats a tab name");
            return Err(LayoutError::DuplicateTab {
                name: name.to_string(),
            });
        }
        let computed = {
            let resolved = resolve_layout(&self.resolver, &layout)?;
            compute_render_layout(&resolved, model_specs, dataset_spec, compare_examples)
        };
        debug!(
            tabs = layout.components.len(),
            components = layout.component_count(),
            "Declared layout initialized"
        );
        self.declared_layout = layout;
        self.observers.notify(&LayoutEvent::DeclaredLayoutChanged);
        self.commit(computed, UpdateKind::Full, model_specs.len(), compare_examples);
        Ok(())
    }

    /// Recompute the render layout for the current declared layout.
    pub fn update_render_layout(
        &mut self,
        model_specs: &ModelSpecs,
        dataset_spec: &DatasetSpec,
        compare_examples: bool,
    ) -> Result<()> {
        self.recompute(model_specs, dataset_spec, compare_examples, UpdateKind::Full)
    }

    /// Reset to the panels that display without any models or data, then
    /// request a redraw.
    pub fn clear_layout(&mut self) -> Result<()> {
        self.recompute(
            &ModelSpecs::new(),
            &DatasetSpec::new(),
            false,
            UpdateKind::Cleared,
        )?;
        self.render_modules();
        Ok(())
    }

    /// Recompute without invalidating per-module host state, then request a
    /// redraw.
    pub fn quick_update_layout(
        &mut self,
        model_specs: &ModelSpecs,
        dataset_spec: &DatasetSpec,
        compare_examples: bool,
    ) -> Result<()> {
        self.recompute(model_specs, dataset_spec, compare_examples, UpdateKind::Quick)?;
        self.render_modules();
        Ok(())
    }

    /// Resolve a specifier through this engine's registry.
    pub fn get_module_constructor(&self, specifier: &ComponentSpecifier) -> Result<ModuleRef> {
        get_module_constructor(&self.resolver, specifier)
    }

    fn recompute(
        &mut self,
        model_specs: &ModelSpecs,
        dataset_spec: &DatasetSpec,
        compare_examples: bool,
        kind: UpdateKind,
    ) -> Result<()> {
        let computed = {
            let resolved = resolve_layout(&self.resolver, &self.declared_layout)?;
            compute_render_layout(&resolved, model_specs, dataset_spec, compare_examples)
        };
        self.commit(computed, kind, model_specs.len(), compare_examples);
        Ok(())
    }

    fn commit(
        &mut self,
        computed: ComputedLayout,
        kind: UpdateKind,
        model_count: usize,
        compare_examples: bool,
    ) {
        let ComputedLayout {
            render_layout,
            all_module_keys,
            collapsed_keys,
        } = computed;

        let before = self.hidden_module_keys.len();
        let added = collapsed_keys
            .into_iter()
            .filter(|key| self.hidden_module_keys.insert(key.clone()))
            .count();
        self.hidden_module_keys.retain(|key| all_module_keys.contains(key));
        let pruned = before + added - self.hidden_module_keys.len();

        let summary = render_layout.summary();
        self.render_layout = render_layout;
        self.all_module_keys = all_module_keys;

        debug!(
            update = ?kind,
            models = model_count,
            compare_examples,
            tabs = summary.tabs,
            groups = summary.groups,
            instances = summary.instances,
            hidden = self.hidden_module_keys.len(),
            pruned,
            "Render layout computed"
        );

        self.observers.notify(&LayoutEvent::RenderLayoutChanged(kind));
        if added > 0 || pruned > 0 {
            self.observers.notify(&LayoutEvent::HiddenModulesChanged);
        }
    }

    // =========================================================================
    // HIDDEN MODULES
    // =========================================================================

    /// Replace the hidden key set with a copy of `keys`.
    pub fn set_hidden_modules<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: BTreeSet<String> = keys.into_iter().map(Into::into).collect();
        if keys != self.hidden_module_keys {
            self.hidden_module_keys = keys;
            self.observers.notify(&LayoutEvent::HiddenModulesChanged);
        }
    }

    /// Hide or show the instance group `config` belongs to.
    pub fn toggle_hidden_module(&mut self, config: &InstanceConfig, is_hidden: bool) {
        let changed = if is_hidden {
            self.hidden_module_keys.insert(config.key.clone())
        } else {
            self.hidden_module_keys.remove(&config.key)
        };
        if changed {
            trace!(key = %config.key, hidden = is_hidden, "Module visibility toggled");
            self.observers.notify(&LayoutEvent::HiddenModulesChanged);
        }
    }

    /// Whether the instance group `config` belongs to is hidden.
    pub fn is_module_group_hidden(&self, config: &InstanceConfig) -> bool {
        self.hidden_module_keys.contains(&config.key)
    }

    // =========================================================================
    // SELECTED TAB & URL STATE
    // =========================================================================

    /// Currently selected tab, if any.
    pub fn selected_tab(&self) -> Option<&str> {
        self.selected_tab.as_deref()
    }

    /// Select a tab. The name is kept even if the tab is not currently
    /// rendered, so a selection survives layouts that are waiting on data.
    pub fn set_selected_tab(&mut self, tab: Option<String>) {
        if tab != self.selected_tab {
            self.selected_tab = tab;
            self.observers.notify(&LayoutEvent::SelectedTabChanged {
                selected_tab: self.selected_tab.clone(),
            });
        }
    }

    /// Replace hidden modules and selected tab with URL-derived state.
    pub fn apply_url_configuration(&mut self, config: &UrlConfiguration) {
        self.set_hidden_modules(config.hidden_modules.iter());
        self.set_selected_tab(config.selected_tab.clone());
    }

    /// Current layout state in URL form.
    pub fn url_configuration(&self) -> UrlConfiguration {
        UrlConfiguration {
            hidden_modules: self.hidden_module_keys.clone(),
            selected_tab: self.selected_tab.clone(),
        }
    }

    // =========================================================================
    // RENDER TRIGGER & OBSERVERS
    // =========================================================================

    /// Install the redraw callback, replacing any previous one.
    pub fn set_render_modules_callback<F>(&mut self, callback: F)
    where
        F: FnMut() + 'static,
    {
        self.render_callback = Some(Box::new(callback));
    }

    /// Ask the host to redraw. No-op until a callback is installed.
    pub fn render_modules(&mut self) {
        if let Some(callback) = self.render_callback.as_mut() {
            callback();
        }
    }

    /// Register an observer for [`LayoutEvent`]s.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&LayoutEvent) + 'static,
    {
        self.observers.subscribe(Box::new(observer))
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Number of registered observers.
    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Render layout from the latest computation.
    pub fn render_layout(&self) -> &RenderLayout {
        &self.render_layout
    }

    /// Layout stored by the last successful `initialize_layout`.
    pub fn declared_layout(&self) -> &DeclaredLayout {
        &self.declared_layout
    }

    /// Every instance key produced by the latest computation.
    pub fn all_module_keys(&self) -> &BTreeSet<String> {
        &self.all_module_keys
    }

    /// Keys of the instance groups currently hidden.
    pub fn hidden_module_keys(&self) -> &BTreeSet<String> {
        &self.hidden_module_keys
    }

    /// Host setting from the declared layout.
    pub fn get_setting(&self, name: &str) -> Option<&serde_json::Value> {
        self.declared_layout.setting(name)
    }
}

impl<R: fmt::Debug> fmt::Debug for LayoutEngine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("resolver", &self.resolver)
            .field("declared_layout", &self.declared_layout)
            .field("render_layout", &self.render_layout.summary())
            .field("hidden_module_keys", &self.hidden_module_keys)
            .field("selected_tab", &self.selected_tab)
            .field("has_render_callback", &self.render_callback.is_some())
            .field("observers", &self.observers)
            .finish()
    }
}

struct ResolvedTab<'a> {
    name: &'a str,
    classes: Vec<ModuleRef>,
}

#[derive(Default)]
struct ComputedLayout {
    render_layout: RenderLayout,
    all_module_keys: BTreeSet<String>,
    collapsed_keys: BTreeSet<String>,
}

fn resolve_layout<'a, R: ModuleResolver + ?Sized>(
    resolver: &R,
    layout: &'a DeclaredLayout,
) -> Result<Vec<ResolvedTab<'a>>> {
    layout
        .components
        .iter()
        .map(|tab| {
            let classes = tab
                .specifiers()
                .map(|specifier| {
                    get_module_constructor(resolver, specifier).inspect_err(|_| {
                        warn!(
                            tab = %tab.name,
                            module = specifier.label(),
                            "Layout references an unregistered module"
                        );
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(ResolvedTab {
                name: tab.name.as_str(),
                classes,
            })
        })
        .collect()
}

fn compute_render_layout(
    tabs: &[ResolvedTab<'_>],
    model_specs: &ModelSpecs,
    dataset_spec: &DatasetSpec,
    compare_examples: bool,
) -> ComputedLayout {
    let mut computed = ComputedLayout::default();

    for tab in tabs {
        let mut groups: Vec<InstanceGroup> = Vec::new();

        for class in &tab.classes {
            if !class.should_display_module(model_specs, dataset_spec) {
                trace!(tab = tab.name, module = class.title(), "Module not displayed");
                continue;
            }

            let key = instance_key(tab.name, class.title());
            let model_names: Vec<Option<&str>> = if class.duplicate_for_model_comparison() {
                model_specs.keys().map(|name| Some(name.as_str())).collect()
            } else {
                vec![None]
            };
            let slots =
                selection_slots(compare_examples, class.duplicate_for_example_comparison());

            let mut group = InstanceGroup::with_capacity(model_names.len() * slots.len());
            for model_name in model_names {
                for slot in slots {
                    group.push(InstanceConfig {
                        key: key.clone(),
                        component_class: Arc::clone(class),
                        model_name: model_name.map(str::to_string),
                        selection_slot: *slot,
                    });
                }
            }

            if group.is_empty() {
                continue;
            }
            trace!(key = %key, instances = group.len(), "Instance group added");
            if class.collapse_by_default() {
                computed.collapsed_keys.insert(key.clone());
            }
            computed.all_module_keys.insert(key);
            groups.push(group);
        }

        if !groups.is_empty() {
            computed.render_layout.push_tab(RenderTab {
                name: tab.name.to_string(),
                groups,
            });
        }
    }

    computed
}

/// Slot 1 comes first so the reference selection renders on the left.
fn selection_slots(
    compare_examples: bool,
    duplicate_for_example_comparison: bool,
) -> &'static [Option<SelectionSlot>] {
    match (compare_examples, duplicate_for_example_comparison) {
        (true, true) => &[Some(SelectionSlot::Reference), Some(SelectionSlot::Primary)],
        (true, false) => &[Some(SelectionSlot::Primary)],
        (false, _) => &[None],
    }
}
