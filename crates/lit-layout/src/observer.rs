//! Change notifications for layout state.
//!
//! Hosts subscribe once and react to the events they care about. Observers
//! run synchronously, in subscription order, after the engine has finished
//! mutating its state.

use std::fmt;

/// How a render layout recomputation was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// Layout was (re)initialized or recomputed directly.
    Full,
    /// Fast path; per-module host state keyed by instance key stays valid.
    Quick,
    /// Reset to the model- and data-independent baseline.
    Cleared,
}

/// Something observable about the engine changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutEvent {
    DeclaredLayoutChanged,
    RenderLayoutChanged(UpdateKind),
    HiddenModulesChanged,
    SelectedTabChanged { selected_tab: Option<String> },
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&LayoutEvent)>;

#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Observer)>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn notify(&mut self, event: &LayoutEvent) {
        for (_, observer) in &mut self.entries {
            observer(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.entries.len())
            .finish()
    }
}
