//! Presentation snapshot of the comment sidebar
//!
//! A serializable description of what the sidebar shows for the current ledger and
//! interaction state. Rendering layers draw from it; they never read the ledger directly.

use crate::interaction::{ActiveEdit, InteractionState};
use crate::ledger::Ledger;
use crate::projection::project;
use comment_model::{display_date, Annotation, AnnotationId, IconKind, Reply, ReplyId};
use serde::Serialize;

/// Context-menu entries offered on an annotation card.
pub const ANNOTATION_ACTIONS: [CardAction; 3] =
    [CardAction::Reply, CardAction::Edit, CardAction::Delete];

/// Context-menu entries offered on a reply.
pub const REPLY_ACTIONS: [CardAction; 2] = [CardAction::Edit, CardAction::Delete];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardAction {
    Reply,
    Edit,
    Delete,
}

/// A text block that is either shown as-is or open in an editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum Surface {
    Static { text: String },
    Editing { draft: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyView {
    pub id: ReplyId,
    pub title: String,
    pub date: String,
    pub body: Surface,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub id: AnnotationId,
    pub icon: IconKind,
    pub title: String,
    pub date: String,
    pub selected: bool,
    pub body: Surface,
    pub replies: Vec<ReplyView>,
    /// Draft of the open reply compose box
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compose: Option<String>,
    pub show_reply_prompt: bool,
}

impl CardView {
    pub fn actions(&self) -> &'static [CardAction] {
        &ANNOTATION_ACTIONS
    }
}

impl ReplyView {
    pub fn actions(&self) -> &'static [CardAction] {
        &REPLY_ACTIONS
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub page_number: u32,
    pub cards: Vec<CardView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelView {
    pub total: usize,
    pub pages: Vec<PageView>,
}

impl PanelView {
    pub fn build(ledger: &Ledger, interaction: &InteractionState) -> Self {
        let pages = project(ledger)
            .into_iter()
            .map(|(page_number, annotations)| PageView {
                page_number,
                cards: annotations
                    .into_iter()
                    .map(|annotation| card(annotation, interaction))
                    .collect(),
            })
            .collect();

        Self { total: ledger.len(), pages }
    }

    pub fn card(&self, id: &AnnotationId) -> Option<&CardView> {
        self.pages.iter().flat_map(|page| &page.cards).find(|card| &card.id == id)
    }
}

fn card(annotation: &Annotation, interaction: &InteractionState) -> CardView {
    let id = annotation.id();
    let active = interaction.active();

    let body = match active {
        ActiveEdit::EditingBody { annotation: target, draft } if target == id => {
            Surface::Editing { draft: draft.clone() }
        }
        _ => Surface::Static { text: annotation.body_text.clone() },
    };

    let compose = match active {
        ActiveEdit::ComposingReply { annotation: target, draft } if target == id => {
            Some(draft.clone())
        }
        _ => None,
    };

    CardView {
        id: id.clone(),
        icon: annotation.subtype().icon(),
        title: annotation.title().to_owned(),
        date: display_date(&annotation.date()),
        selected: interaction.is_selected(id),
        body,
        replies: annotation.replies.iter().map(|reply| reply_view(id, reply, active)).collect(),
        compose,
        show_reply_prompt: interaction.shows_reply_prompt(id),
    }
}

fn reply_view(owner: &AnnotationId, reply: &Reply, active: &ActiveEdit) -> ReplyView {
    let body = match active {
        ActiveEdit::EditingReply { annotation, reply: editing, draft }
            if annotation == owner && editing == &reply.id =>
        {
            Surface::Editing { draft: draft.clone() }
        }
        _ => Surface::Static { text: reply.content.clone() },
    };

    ReplyView {
        id: reply.id.clone(),
        title: reply.title.clone(),
        date: display_date(&reply.date),
        body,
    }
}
