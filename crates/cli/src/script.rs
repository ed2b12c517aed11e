//! Replay scripts
//!
//! A script seeds the panel with annotations and then plays back the UI events a user
//! would produce in the comment sidebar.

use butterpaper_comments::dates::parse_pdf_date;
use butterpaper_comments::{
    Annotation, AnnotationId, AnnotationStore, CommentError, CommentPanel, Reply, ReplyId,
    Revealer, Subtype,
};
use chrono::Utc;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("{id}: invalid PDF date {raw:?}")]
    InvalidDate { id: String, raw: String },
    #[error("annotation {id}: page numbers start at 1")]
    InvalidPage { id: String },
    #[error("event {index}: {source}")]
    Rejected {
        index: usize,
        #[source]
        source: CommentError,
    },
    #[error("seed annotation: {0}")]
    Seed(#[source] CommentError),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub annotations: Vec<SeedAnnotation>,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// Annotation as exported by the document layer, with a raw PDF date.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedAnnotation {
    pub id: String,
    pub page: u32,
    pub subtype: Subtype,
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub body: String,
    /// Thread already attached to the annotation, oldest first
    #[serde(default)]
    pub replies: Vec<SeedReply>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedReply {
    pub id: String,
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub content: String,
}

fn seed_date(id: &str, raw: &str) -> Result<chrono::DateTime<chrono::FixedOffset>, ScriptError> {
    parse_pdf_date(raw)
        .ok_or_else(|| ScriptError::InvalidDate { id: id.to_owned(), raw: raw.to_owned() })
}

impl SeedAnnotation {
    pub fn to_annotation(&self) -> Result<Annotation, ScriptError> {
        if self.page == 0 {
            return Err(ScriptError::InvalidPage { id: self.id.clone() });
        }
        let date = seed_date(&self.id, &self.date)?;

        let mut annotation =
            Annotation::new(self.id.as_str(), self.page, self.subtype, self.title.as_str(), date)
                .with_body(self.body.as_str());
        for reply in &self.replies {
            annotation.replies.push(Reply {
                id: ReplyId::from(reply.id.as_str()),
                title: reply.title.clone(),
                date: seed_date(&reply.id, &reply.date)?.with_timezone(&Utc),
                content: reply.content.clone(),
            });
        }
        Ok(annotation)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum Event {
    /// Annotation drawn on the document
    Add { annotation: SeedAnnotation },
    /// Card clicked in the sidebar
    Click { id: AnnotationId },
    /// Annotation picked on the document
    Select { id: AnnotationId },
    EditBody { id: AnnotationId },
    Reply { id: AnnotationId },
    EditReply { id: AnnotationId, reply: ReplyId },
    /// Full contents of the open text field after a keystroke
    Type { text: String },
    Blur,
    Confirm,
    Delete { id: AnnotationId },
    DeleteReply { id: AnnotationId, reply: ReplyId },
}

impl Script {
    pub fn replay<S, R>(&self, panel: &mut CommentPanel<S, R>) -> Result<(), ScriptError>
    where
        S: AnnotationStore,
        R: Revealer,
    {
        for seed in &self.annotations {
            panel.add_annotation(seed.to_annotation()?).map_err(ScriptError::Seed)?;
        }

        for (index, event) in self.events.iter().enumerate() {
            tracing::debug!(index, ?event, "replaying event");
            apply(panel, event).map_err(|source| match source {
                Applied::Script(error) => error,
                Applied::Panel(source) => ScriptError::Rejected { index, source },
            })?;
        }
        Ok(())
    }
}

enum Applied {
    Script(ScriptError),
    Panel(CommentError),
}

fn apply<S, R>(panel: &mut CommentPanel<S, R>, event: &Event) -> Result<(), Applied>
where
    S: AnnotationStore,
    R: Revealer,
{
    match event {
        Event::Add { annotation } => {
            let annotation = annotation.to_annotation().map_err(Applied::Script)?;
            panel.add_annotation(annotation).map_err(Applied::Panel)?;
        }
        Event::Click { id } => panel.click_annotation(id),
        Event::Select { id } => {
            panel.select_annotation(id);
        }
        Event::EditBody { id } => panel.start_edit_body(id),
        Event::Reply { id } => panel.start_reply(id),
        Event::EditReply { id, reply } => panel.start_edit_reply(id, reply),
        Event::Type { text } => panel.set_draft(text.as_str()),
        Event::Blur => panel.blur(),
        Event::Confirm => panel.confirm(),
        Event::Delete { id } => panel.delete_annotation(id),
        Event::DeleteReply { id, reply } => panel.delete_reply(id, reply),
    }
    Ok(())
}
