//! Interaction-mode controller
//!
//! Tracks which annotation is selected and which single text surface is open. Only one
//! surface (an annotation body editor, a reply compose box, or a reply body editor) can
//! exist at a time; [`ActiveEdit`] is one value, so opening a surface necessarily closes
//! the previous one.
//!
//! The controller only holds references to ledger entities. Committing a draft is done by
//! the caller through the ledger.

use comment_model::{AnnotationId, ReplyId};
use tracing::debug;

/// The open text surface, with the text typed into it so far.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveEdit {
    #[default]
    None,
    /// Editing the primary comment of an annotation
    EditingBody { annotation: AnnotationId, draft: String },
    /// Writing a new reply under an annotation
    ComposingReply { annotation: AnnotationId, draft: String },
    /// Editing an existing reply
    EditingReply { annotation: AnnotationId, reply: ReplyId, draft: String },
}

impl ActiveEdit {
    pub fn is_none(&self) -> bool {
        matches!(self, ActiveEdit::None)
    }

    /// Annotation the surface belongs to.
    pub fn annotation(&self) -> Option<&AnnotationId> {
        match self {
            ActiveEdit::None => None,
            ActiveEdit::EditingBody { annotation, .. }
            | ActiveEdit::ComposingReply { annotation, .. }
            | ActiveEdit::EditingReply { annotation, .. } => Some(annotation),
        }
    }

    pub fn reply(&self) -> Option<&ReplyId> {
        match self {
            ActiveEdit::EditingReply { reply, .. } => Some(reply),
            _ => None,
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match self {
            ActiveEdit::None => None,
            ActiveEdit::EditingBody { draft, .. }
            | ActiveEdit::ComposingReply { draft, .. }
            | ActiveEdit::EditingReply { draft, .. } => Some(draft),
        }
    }

    fn draft_mut(&mut self) -> Option<&mut String> {
        match self {
            ActiveEdit::None => None,
            ActiveEdit::EditingBody { draft, .. }
            | ActiveEdit::ComposingReply { draft, .. }
            | ActiveEdit::EditingReply { draft, .. } => Some(draft),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ActiveEdit::None => "none",
            ActiveEdit::EditingBody { .. } => "edit-body",
            ActiveEdit::ComposingReply { .. } => "compose-reply",
            ActiveEdit::EditingReply { .. } => "edit-reply",
        }
    }
}

/// Selection plus the active text surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    selected: Option<AnnotationId>,
    active: ActiveEdit,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&AnnotationId> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, id: &AnnotationId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    pub fn active(&self) -> &ActiveEdit {
        &self.active
    }

    /// Move the selection. Selection is sticky: only deletion clears it.
    pub fn select(&mut self, id: AnnotationId) {
        if !self.is_selected(&id) {
            debug!(%id, "selection moved");
        }
        self.selected = Some(id);
    }

    /// Open the body editor, seeded with the stored text.
    pub fn begin_edit_body(&mut self, annotation: AnnotationId, stored_text: &str) -> ActiveEdit {
        self.open(ActiveEdit::EditingBody { annotation, draft: stored_text.to_owned() })
    }

    /// Open an empty reply compose box.
    pub fn begin_reply(&mut self, annotation: AnnotationId) -> ActiveEdit {
        self.open(ActiveEdit::ComposingReply { annotation, draft: String::new() })
    }

    /// Open the reply editor, seeded with the stored reply content.
    pub fn begin_edit_reply(
        &mut self,
        annotation: AnnotationId,
        reply: ReplyId,
        stored_content: &str,
    ) -> ActiveEdit {
        self.open(ActiveEdit::EditingReply { annotation, reply, draft: stored_content.to_owned() })
    }

    /// Record the current contents of the open surface. Returns false when nothing is open.
    pub fn set_draft(&mut self, text: impl Into<String>) -> bool {
        match self.active.draft_mut() {
            Some(draft) => {
                *draft = text.into();
                true
            }
            None => false,
        }
    }

    /// Close the open surface, returning it with its final draft.
    ///
    /// Used both for blur (the draft is dropped) and confirm (the draft is committed).
    pub fn close(&mut self) -> ActiveEdit {
        let closed = std::mem::take(&mut self.active);
        if !closed.is_none() {
            debug!(surface = closed.kind(), "edit surface closed");
        }
        closed
    }

    /// Drop every reference to a deleted annotation, including its replies.
    pub fn forget_annotation(&mut self, id: &AnnotationId) {
        if self.is_selected(id) {
            self.selected = None;
        }
        if self.active.annotation() == Some(id) {
            self.close();
        }
    }

    /// Drop the reply editor if it points at a deleted reply of `annotation`.
    pub fn forget_reply(&mut self, annotation: &AnnotationId, reply: &ReplyId) {
        if self.is_editing_reply(annotation, reply) {
            self.close();
        }
    }

    /// Whether the open surface edits `reply` of `annotation`.
    pub fn is_editing_reply(&self, annotation: &AnnotationId, reply: &ReplyId) -> bool {
        matches!(
            &self.active,
            ActiveEdit::EditingReply { annotation: owner, reply: editing, .. }
                if owner == annotation && editing == reply
        )
    }

    /// Whether the "Click to reply" prompt shows under `id`.
    ///
    /// Only the selected annotation offers it, and only while no surface is open anywhere.
    pub fn shows_reply_prompt(&self, id: &AnnotationId) -> bool {
        self.is_selected(id) && self.active.is_none()
    }

    fn open(&mut self, next: ActiveEdit) -> ActiveEdit {
        let previous = std::mem::replace(&mut self.active, next);
        debug!(
            previous = previous.kind(),
            next = self.active.kind(),
            "edit surface opened"
        );
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> AnnotationId {
        AnnotationId::from(value)
    }

    #[test]
    fn opening_a_surface_replaces_the_previous_one() {
        let mut state = InteractionState::new();
        state.begin_edit_body(id("a1"), "stored");
        state.set_draft("pending");

        let previous = state.begin_reply(id("a2"));

        assert_eq!(
            previous,
            ActiveEdit::EditingBody { annotation: id("a1"), draft: "pending".to_owned() }
        );
        assert_eq!(
            state.active(),
            &ActiveEdit::ComposingReply { annotation: id("a2"), draft: String::new() }
        );
    }

    #[test]
    fn drafts_start_from_stored_text_for_edits_and_empty_for_replies() {
        let mut state = InteractionState::new();

        state.begin_edit_reply(id("a1"), ReplyId::from("r1"), "old reply");
        assert_eq!(state.active().draft(), Some("old reply"));

        state.begin_reply(id("a1"));
        assert_eq!(state.active().draft(), Some(""));
    }

    #[test]
    fn set_draft_without_open_surface_is_ignored() {
        let mut state = InteractionState::new();
        assert!(!state.set_draft("nobody listening"));
        assert!(state.active().is_none());
    }

    #[test]
    fn reply_prompt_requires_selection_and_no_open_surface() {
        let mut state = InteractionState::new();
        assert!(!state.shows_reply_prompt(&id("a1")));

        state.select(id("a1"));
        assert!(state.shows_reply_prompt(&id("a1")));
        assert!(!state.shows_reply_prompt(&id("a2")));

        state.begin_edit_reply(id("a2"), ReplyId::from("r9"), "");
        assert!(!state.shows_reply_prompt(&id("a1")));

        state.close();
        assert!(state.shows_reply_prompt(&id("a1")));
    }

    #[test]
    fn forgetting_annotation_clears_selection_and_its_surfaces() {
        let mut state = InteractionState::new();
        state.select(id("a1"));
        state.begin_edit_reply(id("a1"), ReplyId::from("r1"), "text");

        state.forget_annotation(&id("a1"));

        assert_eq!(state.selected(), None);
        assert!(state.active().is_none());
    }

    #[test]
    fn forgetting_other_entities_leaves_state_alone() {
        let mut state = InteractionState::new();
        state.select(id("a1"));
        state.begin_edit_reply(id("a1"), ReplyId::from("r1"), "text");

        state.forget_annotation(&id("a2"));
        state.forget_reply(&id("a1"), &ReplyId::from("r2"));

        assert_eq!(state.selected(), Some(&id("a1")));
        assert_eq!(state.active().reply(), Some(&ReplyId::from("r1")));

        state.forget_reply(&id("a1"), &ReplyId::from("r1"));
        assert!(state.active().is_none());
        assert_eq!(state.selected(), Some(&id("a1")));
    }

    #[test]
    fn reply_editor_is_scoped_to_its_owner() {
        let mut state = InteractionState::new();
        state.begin_edit_reply(id("a1"), ReplyId::from("r1"), "text");

        assert!(state.is_editing_reply(&id("a1"), &ReplyId::from("r1")));
        assert!(!state.is_editing_reply(&id("a2"), &ReplyId::from("r1")));

        state.forget_reply(&id("a2"), &ReplyId::from("r1"));
        assert!(state.is_editing_reply(&id("a1"), &ReplyId::from("r1")));
    }
}
