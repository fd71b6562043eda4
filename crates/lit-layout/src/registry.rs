//! Module registry.
//!
//! Layouts refer to most panels by name (`"data-table-module"`). The engine
//! resolves those names through a [`ModuleResolver`]; [`ModuleRegistry`] is
//! the in-memory implementation hosts normally use.

use std::collections::BTreeMap;
use std::sync::Arc;

use lit_model::{ComponentSpecifier, ModuleClass, ModuleRef};

use crate::builtin;
use crate::error::{LayoutError, Result};

/// Looks up component classes by registry name.
pub trait ModuleResolver {
    /// Resolves `name`, failing with [`LayoutError::UnknownModule`] if absent.
    fn resolve(&self, name: &str) -> Result<ModuleRef>;
}

/// Name -> class registry.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: BTreeMap<String, ModuleRef>,
}

impl ModuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the built-in panels.
    pub fn with_builtin_modules() -> Self {
        let mut registry = Self::new();
        builtin::register_builtin_modules(&mut registry);
        registry
    }

    /// Register a class under `name`, returning the class it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        class: impl ModuleClass + 'static,
    ) -> Option<ModuleRef> {
        self.register_ref(name, Arc::new(class))
    }

    /// Register an already shared class under `name`.
    pub fn register_ref(&mut self, name: impl Into<String>, class: ModuleRef) -> Option<ModuleRef> {
        self.modules.insert(name.into(), class)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ModuleRef> {
        self.modules.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.modules.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModuleRef)> {
        self.modules.iter().map(|(name, class)| (name.as_str(), class))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl ModuleResolver for ModuleRegistry {
    fn resolve(&self, name: &str) -> Result<ModuleRef> {
        self.modules
            .get(name)
            .cloned()
            .ok_or_else(|| LayoutError::UnknownModule {
                name: name.to_string(),
            })
    }
}

impl<R: ModuleResolver + ?Sized> ModuleResolver for &R {
    fn resolve(&self, name: &str) -> Result<ModuleRef> {
        (**self).resolve(name)
    }
}

/// Resolves a specifier to its class. Direct references pass through.
pub fn get_module_constructor<R: ModuleResolver + ?Sized>(
    resolver: &R,
    specifier: &ComponentSpecifier,
) -> Result<ModuleRef> {
    match specifier {
        ComponentSpecifier::ByName(name) => resolver.resolve(name),
        ComponentSpecifier::ByClass(class) => Ok(Arc::clone(class)),
    }
}
