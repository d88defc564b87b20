use std::collections::BTreeSet;

use crate::spans::{SpanId, TokenError};

/// Receiver of decorated span mount/unmount events from the render pass.
pub trait SpanLifecycle {
    fn on_mount(&mut self, id: SpanId);
    fn on_unmount(&mut self, id: &SpanId);
}

/// The set of decorated spans currently mounted in the rendered document.
///
/// One instance per editing session. Adds are idempotent, removes of absent
/// ids are no-ops, so re-renders never leak entries.
#[derive(Debug, Default, Clone)]
pub struct SpanRegistry {
    mounted: BTreeSet<SpanId>,
}

impl SpanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `id` if absent. Returns true if it was newly added.
    pub fn add(&mut self, id: SpanId) -> bool {
        self.mounted.insert(id)
    }

    /// Remove `id` if present. Returns true if it was there.
    pub fn remove(&mut self, id: &SpanId) -> bool {
        self.mounted.remove(id)
    }

    /// Mounted ids in a stable (sorted) order.
    pub fn list(&self) -> impl Iterator<Item = &SpanId> {
        self.mounted.iter()
    }

    pub fn contains(&self, id: &SpanId) -> bool {
        self.mounted.contains(id)
    }

    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }

    /// Mount a span reported as a flat token by an external decorator.
    ///
    /// A malformed token is logged at error level and skipped, leaving the
    /// registry untouched; the error is still returned to the caller.
    pub fn mount_token(&mut self, token: &str) -> Result<(), TokenError> {
        let id = decode_or_skip(token, "mount")?;
        self.on_mount(id);
        Ok(())
    }

    pub fn unmount_token(&mut self, token: &str) -> Result<(), TokenError> {
        let id = decode_or_skip(token, "unmount")?;
        self.on_unmount(&id);
        Ok(())
    }
}

fn decode_or_skip(token: &str, event: &str) -> Result<SpanId, TokenError> {
    SpanId::decode(token).inspect_err(|e| log::error!("skipping span {event}: {e}"))
}

impl SpanLifecycle for SpanRegistry {
    fn on_mount(&mut self, id: SpanId) {
        log::debug!("span mounted: {id}");
        self.add(id);
    }

    fn on_unmount(&mut self, id: &SpanId) {
        log::debug!("span unmounted: {id}");
        self.remove(id);
    }
}
