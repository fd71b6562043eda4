//! Render layout computation for the LIT panel grid.
//!
//! [`LayoutEngine`] turns a declared layout (tabs of component specifiers)
//! into the concrete panel instances to draw for the active models, dataset
//! and compare mode, and tracks which instance groups the user collapsed.

#![deny(unsafe_code)]

pub mod builtin;
pub mod engine;
pub mod error;
pub mod observer;
pub mod registry;
pub mod render;
pub mod url_config;

pub use engine::LayoutEngine;
pub use error::{LayoutError, Result};
pub use observer::{LayoutEvent, SubscriptionId, UpdateKind};
pub use registry::{ModuleRegistry, ModuleResolver, get_module_constructor};
pub use render::{
    InstanceConfig, InstanceGroup, LayoutSummary, RenderLayout, RenderTab, SelectionSlot,
    instance_key,
};
pub use url_config::UrlConfiguration;
