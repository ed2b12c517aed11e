//! Annotation ledger
//!
//! Authoritative in-memory list of annotations and their replies. Every operation
//! that names an id missing from the ledger is a silent no-op: stale references from
//! the UI (a delete confirmed twice, an edit on a card that was just removed) are
//! expected and never an error.

use crate::ports::{Clock, ReplyIdSource, SystemClock, UuidReplyIds};
use comment_model::{Annotation, AnnotationId, Reply, ReplyId};
use tracing::{debug, info, warn};

/// Author label stamped on replies when no configuration is supplied.
pub const DEFAULT_CURRENT_USER: &str = "username";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommentError {
    #[error("annotation {0} is already in the ledger")]
    DuplicateAnnotation(AnnotationId),
    #[error("annotation {annotation} carries reply {reply}, which is already in use")]
    DuplicateReply { annotation: AnnotationId, reply: ReplyId },
}

pub type CommentResult<T> = Result<T, CommentError>;

/// Ordered collection of annotations.
///
/// Insertion order is display order, both for annotations within a page and for the
/// replies of an annotation.
pub struct Ledger {
    annotations: Vec<Annotation>,
    /// Bumped on every successful mutation
    version: u64,
    current_user: String,
    reply_ids: Box<dyn ReplyIdSource>,
    clock: Box<dyn Clock>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            annotations: Vec::new(),
            version: 0,
            current_user: DEFAULT_CURRENT_USER.to_owned(),
            reply_ids: Box::new(UuidReplyIds),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_current_user(mut self, current_user: impl Into<String>) -> Self {
        self.current_user = current_user.into();
        self
    }

    pub fn with_reply_ids(mut self, reply_ids: impl ReplyIdSource + 'static) -> Self {
        self.reply_ids = Box::new(reply_ids);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn current_user(&self) -> &str {
        &self.current_user
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn get(&self, id: &AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|annotation| annotation.id() == id)
    }

    pub fn contains(&self, id: &AnnotationId) -> bool {
        self.get(id).is_some()
    }

    /// Annotation that owns `reply_id`, if any.
    pub fn owner_of(&self, reply_id: &ReplyId) -> Option<&Annotation> {
        self.annotations.iter().find(|annotation| annotation.owns_reply(reply_id))
    }

    /// Append an annotation created elsewhere. The store is not notified.
    ///
    /// Its replies must not reuse a reply id held anywhere in the ledger, or each other's.
    pub fn add_annotation(&mut self, annotation: Annotation) -> CommentResult<()> {
        if self.contains(annotation.id()) {
            warn!(id = %annotation.id(), "rejecting duplicate annotation");
            return Err(CommentError::DuplicateAnnotation(annotation.id().clone()));
        }

        for (index, reply) in annotation.replies.iter().enumerate() {
            let repeated = annotation.replies[..index].iter().any(|earlier| earlier.id == reply.id);
            if repeated || self.reply_id_in_use(&reply.id) {
                warn!(id = %annotation.id(), reply = %reply.id, "rejecting duplicate reply id");
                return Err(CommentError::DuplicateReply {
                    annotation: annotation.id().clone(),
                    reply: reply.id.clone(),
                });
            }
        }

        debug!(id = %annotation.id(), page = annotation.page_number(), "annotation added");
        self.annotations.push(annotation);
        self.bump();
        Ok(())
    }

    pub fn update_annotation_body(
        &mut self,
        id: &AnnotationId,
        text: impl Into<String>,
    ) -> Option<&Annotation> {
        let Some(index) = self.position(id) else {
            debug!(%id, "body update for unknown annotation ignored");
            return None;
        };

        self.annotations[index].body_text = text.into();
        self.bump();
        info!(%id, "annotation body updated");
        Some(&self.annotations[index])
    }

    /// Append a reply authored by the current user, stamped now.
    pub fn add_reply(&mut self, id: &AnnotationId, content: impl Into<String>) -> Option<&Annotation> {
        let Some(index) = self.position(id) else {
            debug!(%id, "reply to unknown annotation ignored");
            return None;
        };

        let reply = Reply {
            id: self.fresh_reply_id(),
            title: self.current_user.clone(),
            date: self.clock.now(),
            content: content.into(),
        };
        info!(%id, reply = %reply.id, "reply added");

        self.annotations[index].replies.push(reply);
        self.bump();
        Some(&self.annotations[index])
    }

    /// Replace a reply's content, re-stamping its author and date.
    ///
    /// The date never moves backwards, even if the clock does.
    pub fn update_reply(
        &mut self,
        id: &AnnotationId,
        reply_id: &ReplyId,
        content: impl Into<String>,
    ) -> Option<&Annotation> {
        let now = self.clock.now();
        let current_user = self.current_user.clone();

        let Some(index) = self.position(id) else {
            debug!(%id, reply = %reply_id, "reply update for unknown annotation ignored");
            return None;
        };
        let Some(reply) = self.annotations[index].reply_mut(reply_id) else {
            debug!(%id, reply = %reply_id, "update of unknown reply ignored");
            return None;
        };

        reply.content = content.into();
        reply.title = current_user;
        reply.date = reply.date.max(now);
        info!(%id, reply = %reply_id, "reply updated");

        self.bump();
        Some(&self.annotations[index])
    }

    /// Remove an annotation together with its replies.
    pub fn delete_annotation(&mut self, id: &AnnotationId) -> Option<Annotation> {
        let Some(index) = self.position(id) else {
            debug!(%id, "delete of unknown annotation ignored");
            return None;
        };

        let removed = self.annotations.remove(index);
        self.bump();
        info!(%id, replies = removed.replies.len(), "annotation deleted");
        Some(removed)
    }

    /// Remove one reply, leaving the annotation and its other replies untouched.
    pub fn delete_reply(&mut self, id: &AnnotationId, reply_id: &ReplyId) -> Option<&Annotation> {
        let Some(index) = self.position(id) else {
            debug!(%id, reply = %reply_id, "reply delete for unknown annotation ignored");
            return None;
        };

        let replies = &mut self.annotations[index].replies;
        let Some(reply_index) = replies.iter().position(|reply| &reply.id == reply_id) else {
            debug!(%id, reply = %reply_id, "delete of unknown reply ignored");
            return None;
        };

        replies.remove(reply_index);
        self.bump();
        info!(%id, reply = %reply_id, "reply deleted");
        Some(&self.annotations[index])
    }

    fn position(&self, id: &AnnotationId) -> Option<usize> {
        self.annotations.iter().position(|annotation| annotation.id() == id)
    }

    fn bump(&mut self) {
        self.version += 1;
    }

    fn reply_id_in_use(&self, reply_id: &ReplyId) -> bool {
        self.owner_of(reply_id).is_some()
    }

    fn fresh_reply_id(&mut self) -> ReplyId {
        let base = self.reply_ids.next_id();
        if !self.reply_id_in_use(&base) {
            return base;
        }

        let mut suffix = 1u64;
        loop {
            let candidate = ReplyId(format!("{base}-{suffix}"));
            if !self.reply_id_in_use(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
