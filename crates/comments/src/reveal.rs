//! Scroll-into-view requests
//!
//! The rendering layer registers an opaque handle for every annotation card it mounts
//! and removes it on unmount. The panel only ever asks for an id to be revealed; it never
//! looks inside the handle.

use comment_model::AnnotationId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

/// Where the revealed card lands in the scroll viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScrollBlock {
    Start,
    #[default]
    Center,
    End,
    Nearest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RevealOptions {
    #[serde(default)]
    pub behavior: ScrollBehavior,
    #[serde(default)]
    pub block: ScrollBlock,
}

/// Rendering-side receiver of reveal requests.
pub trait Revealer {
    type Handle;

    fn reveal(&mut self, handle: &Self::Handle, options: RevealOptions);
}

/// Revealer for hosts without a scrollable view.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRevealer;

impl Revealer for NoopRevealer {
    type Handle = ();

    fn reveal(&mut self, _handle: &(), _options: RevealOptions) {}
}

/// Handles of the currently mounted annotation cards.
#[derive(Debug, Clone)]
pub struct RevealRegistry<H> {
    handles: HashMap<AnnotationId, H>,
}

impl<H> RevealRegistry<H> {
    pub fn new() -> Self {
        Self { handles: HashMap::new() }
    }

    /// Register a handle, replacing any previous one for the same id.
    pub fn register(&mut self, id: AnnotationId, handle: H) -> Option<H> {
        self.handles.insert(id, handle)
    }

    pub fn unregister(&mut self, id: &AnnotationId) -> Option<H> {
        self.handles.remove(id)
    }

    pub fn get(&self, id: &AnnotationId) -> Option<&H> {
        self.handles.get(id)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl<H> Default for RevealRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_scroll_smoothly_to_center() {
        let options = RevealOptions::default();
        assert_eq!(options.behavior, ScrollBehavior::Smooth);
        assert_eq!(options.block, ScrollBlock::Center);
    }

    #[test]
    fn remount_replaces_handle() {
        let mut registry = RevealRegistry::new();
        assert_eq!(registry.register(AnnotationId::from("a1"), 1), None);
        assert_eq!(registry.register(AnnotationId::from("a1"), 2), Some(1));
        assert_eq!(registry.get(&AnnotationId::from("a1")), Some(&2));

        assert_eq!(registry.unregister(&AnnotationId::from("a1")), Some(2));
        assert!(registry.is_empty());
    }
}
