//! Comment panel
//!
//! Ties the ledger, the interaction controller and the page index together behind the
//! event methods a host UI dispatches (clicks, menu actions, keystrokes, blur, confirm).
//! Every ledger mutation is followed by a page index sync and one store notification.
//!
//! Events are handled one at a time to completion; nothing here blocks or spawns.

use crate::config::CommentConfig;
use crate::interaction::{ActiveEdit, InteractionState};
use crate::ledger::{CommentResult, Ledger};
use crate::ports::{AnnotationStore, Clock, ReplyIdSource};
use crate::projection::{project, PageGroups, PageIndex};
use crate::reveal::{NoopRevealer, RevealRegistry, Revealer};
use crate::view::PanelView;
use comment_model::{Annotation, AnnotationId, ReplyId};
use tracing::debug;

pub struct CommentPanel<S, R = NoopRevealer>
where
    S: AnnotationStore,
    R: Revealer,
{
    config: CommentConfig,
    ledger: Ledger,
    interaction: InteractionState,
    pages: PageIndex,
    handles: RevealRegistry<R::Handle>,
    revealer: R,
    store: S,
}

impl<S: AnnotationStore> CommentPanel<S> {
    /// Panel without a scrollable view; reveal requests only move the selection.
    pub fn new(store: S) -> Self {
        Self::with_revealer(CommentConfig::default(), store, NoopRevealer)
    }
}

impl<S, R> CommentPanel<S, R>
where
    S: AnnotationStore,
    R: Revealer,
{
    pub fn with_revealer(config: CommentConfig, store: S, revealer: R) -> Self {
        let ledger = Ledger::new().with_current_user(config.current_user.clone());
        Self {
            config,
            ledger,
            interaction: InteractionState::new(),
            pages: PageIndex::new(),
            handles: RevealRegistry::new(),
            revealer,
            store,
        }
    }

    pub fn with_reply_ids(mut self, reply_ids: impl ReplyIdSource + 'static) -> Self {
        self.ledger = self.ledger.with_reply_ids(reply_ids);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.ledger = self.ledger.with_clock(clock);
        self
    }

    pub fn config(&self) -> &CommentConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn selected(&self) -> Option<&AnnotationId> {
        self.interaction.selected()
    }

    pub fn active(&self) -> &ActiveEdit {
        self.interaction.active()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn revealer(&self) -> &R {
        &self.revealer
    }

    pub fn page_index(&self) -> &PageIndex {
        &self.pages
    }

    pub fn project(&self) -> PageGroups<'_> {
        project(&self.ledger)
    }

    pub fn view(&self) -> PanelView {
        PanelView::build(&self.ledger, &self.interaction)
    }

    pub fn shows_reply_prompt(&self, id: &AnnotationId) -> bool {
        self.ledger.contains(id) && self.interaction.shows_reply_prompt(id)
    }

    // Inbound requests from the document view

    /// A new annotation was created elsewhere and must appear in the list.
    pub fn add_annotation(&mut self, annotation: Annotation) -> CommentResult<()> {
        self.ledger.add_annotation(annotation)?;
        self.pages.sync(&self.ledger);
        Ok(())
    }

    /// Jump to an annotation picked on the document: select it and scroll it into view.
    ///
    /// Does not echo `on_selected` back to the store.
    pub fn select_annotation(&mut self, id: &AnnotationId) -> bool {
        self.reveal_annotation(id, true)
    }

    // Rendering layer hooks

    pub fn mount(&mut self, id: AnnotationId, handle: R::Handle) {
        self.handles.register(id, handle);
    }

    pub fn unmount(&mut self, id: &AnnotationId) {
        self.handles.unregister(id);
    }

    /// Ask the rendering layer to bring an annotation card into view.
    ///
    /// Returns false, and does nothing, when the id is not in the projection.
    pub fn reveal_annotation(&mut self, id: &AnnotationId, select: bool) -> bool {
        self.pages.sync(&self.ledger);
        if !self.pages.contains(id) {
            debug!(%id, "reveal of unknown annotation ignored");
            return false;
        }

        if select {
            self.interaction.select(id.clone());
        }

        match self.handles.get(id) {
            Some(handle) => self.revealer.reveal(handle, self.config.reveal),
            None => debug!(%id, "annotation card not mounted, nothing to scroll"),
        }
        true
    }

    // Events from the comment list itself

    /// The user clicked an annotation card.
    pub fn click_annotation(&mut self, id: &AnnotationId) {
        let Some(annotation) = self.ledger.get(id) else {
            debug!(%id, "click on unknown annotation ignored");
            return;
        };

        self.interaction.select(id.clone());
        self.store.on_selected(annotation);
    }

    /// "Edit" on an annotation card.
    pub fn start_edit_body(&mut self, id: &AnnotationId) {
        let Some(annotation) = self.ledger.get(id) else {
            debug!(%id, "edit of unknown annotation ignored");
            return;
        };

        self.interaction.select(id.clone());
        self.interaction.begin_edit_body(id.clone(), &annotation.body_text);
    }

    /// "Reply" in the card menu, or the "Click to reply" prompt.
    pub fn start_reply(&mut self, id: &AnnotationId) {
        if !self.ledger.contains(id) {
            debug!(%id, "reply on unknown annotation ignored");
            return;
        }

        self.interaction.select(id.clone());
        self.interaction.begin_reply(id.clone());
    }

    /// "Edit" on a reply.
    pub fn start_edit_reply(&mut self, id: &AnnotationId, reply_id: &ReplyId) {
        let Some(reply) = self.ledger.get(id).and_then(|annotation| annotation.reply(reply_id))
        else {
            debug!(%id, reply = %reply_id, "edit of unknown reply ignored");
            return;
        };

        self.interaction.select(id.clone());
        self.interaction.begin_edit_reply(id.clone(), reply_id.clone(), &reply.content);
    }

    /// The open text field changed; `text` is its full current contents.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        if !self.interaction.set_draft(text) {
            debug!("keystrokes without an open text field ignored");
        }
    }

    /// The open text field lost focus without confirming: its draft is discarded.
    pub fn blur(&mut self) {
        self.interaction.close();
    }

    /// Confirm the open text field, committing its latest draft.
    pub fn confirm(&mut self) {
        match self.interaction.close() {
            ActiveEdit::None => debug!("confirm without an open text field ignored"),
            ActiveEdit::EditingBody { annotation, draft } => {
                self.update_annotation_body(&annotation, draft);
            }
            ActiveEdit::ComposingReply { annotation, draft } => {
                self.add_reply(&annotation, draft);
            }
            ActiveEdit::EditingReply { annotation, reply, draft } => {
                self.update_reply(&annotation, &reply, draft);
            }
        }
    }

    // Ledger operations with their notifications

    pub fn update_annotation_body(&mut self, id: &AnnotationId, text: impl Into<String>) {
        if let Some(annotation) = self.ledger.update_annotation_body(id, text) {
            self.store.on_update(annotation);
            self.pages.sync(&self.ledger);
        }
    }

    pub fn add_reply(&mut self, id: &AnnotationId, content: impl Into<String>) {
        if let Some(annotation) = self.ledger.add_reply(id, content) {
            self.store.on_update(annotation);
            self.pages.sync(&self.ledger);
        }
    }

    pub fn update_reply(&mut self, id: &AnnotationId, reply_id: &ReplyId, content: impl Into<String>) {
        if let Some(annotation) = self.ledger.update_reply(id, reply_id, content) {
            self.store.on_update(annotation);
            self.pages.sync(&self.ledger);
        }
    }

    /// "Delete" on an annotation card.
    pub fn delete_annotation(&mut self, id: &AnnotationId) {
        if self.ledger.delete_annotation(id).is_none() {
            return;
        }

        self.interaction.forget_annotation(id);
        self.handles.unregister(id);
        self.pages.sync(&self.ledger);
        self.store.on_delete(id);
    }

    /// "Delete" on a reply. Reported to the store as an update of the owning annotation.
    pub fn delete_reply(&mut self, id: &AnnotationId, reply_id: &ReplyId) {
        let Some(annotation) = self.ledger.delete_reply(id, reply_id) else {
            return;
        };

        self.store.on_update(annotation);
        self.interaction.forget_reply(id, reply_id);
        self.pages.sync(&self.ledger);
    }
}
