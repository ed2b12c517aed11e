//! Annotation comment data model
//!
//! Plain data types shared by the comment sidebar: annotations pinned to a page,
//! their threaded replies, and the small pure helpers used to present them.

pub mod dates;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub use dates::{display_date, format_pdf_date, parse_pdf_date, to_pdf_date};

/// Point in time used for annotation and reply dates.
pub type Timestamp = DateTime<Utc>;

/// Document date, kept in the UTC offset it was recorded with.
pub type RecordedDate = DateTime<FixedOffset>;

/// Opaque annotation identifier assigned by the annotation store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(pub String);

impl AnnotationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnnotationId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Opaque reply identifier, unique across all annotations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplyId(pub String);

impl ReplyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReplyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReplyId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// PDF annotation kinds that can carry comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subtype {
    Circle,
    FreeText,
    Ink,
    Highlight,
    Underline,
    Squiggly,
    StrikeOut,
    Stamp,
    Line,
    Square,
    Polygon,
    PolyLine,
    Caret,
    Link,
    Text,
    FileAttachment,
    Popup,
    Widget,
}

impl Subtype {
    /// Sidebar icon shown next to an annotation of this kind.
    pub fn icon(self) -> IconKind {
        match self {
            Subtype::Circle => IconKind::Circle,
            Subtype::FreeText | Subtype::Text => IconKind::FreeText,
            Subtype::Highlight => IconKind::Highlight,
            Subtype::Underline => IconKind::Underline,
            Subtype::Squiggly => IconKind::FreeHighlight,
            Subtype::StrikeOut => IconKind::Strikeout,
            Subtype::Stamp => IconKind::Stamp,
            Subtype::Square => IconKind::Rectangle,
            Subtype::FileAttachment => IconKind::Download,
            Subtype::Ink
            | Subtype::Line
            | Subtype::Polygon
            | Subtype::PolyLine
            | Subtype::Caret
            | Subtype::Link
            | Subtype::Popup
            | Subtype::Widget => IconKind::Freehand,
        }
    }
}

/// Icon resource keys understood by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconKind {
    Circle,
    FreeText,
    Freehand,
    Highlight,
    Underline,
    FreeHighlight,
    Strikeout,
    Stamp,
    Rectangle,
    Download,
}

/// A threaded reply owned by exactly one annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub id: ReplyId,
    /// Author label, reset to the current user on every edit
    pub title: String,
    /// Last modification time
    pub date: Timestamp,
    pub content: String,
}

/// Annotation pinned to a document page, with its primary comment and replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    id: AnnotationId,
    #[serde(deserialize_with = "deserialize_page_number")]
    page_number: u32,
    subtype: Subtype,
    title: String,
    date: RecordedDate,
    pub body_text: String,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

impl Annotation {
    /// Create an annotation with no comment text and no replies.
    ///
    /// Page numbers are 1-based; 0 is clamped to 1.
    pub fn new(
        id: impl Into<AnnotationId>,
        page_number: u32,
        subtype: Subtype,
        title: impl Into<String>,
        date: impl Into<RecordedDate>,
    ) -> Self {
        Self {
            id: id.into(),
            page_number: page_number.max(1),
            subtype,
            title: title.into(),
            date: date.into(),
            body_text: String::new(),
            replies: Vec::new(),
        }
    }

    pub fn with_body(mut self, body_text: impl Into<String>) -> Self {
        self.body_text = body_text.into();
        self
    }

    pub fn id(&self) -> &AnnotationId {
        &self.id
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn subtype(&self) -> Subtype {
        self.subtype
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn date(&self) -> RecordedDate {
        self.date
    }

    pub fn reply(&self, reply_id: &ReplyId) -> Option<&Reply> {
        self.replies.iter().find(|reply| &reply.id == reply_id)
    }

    pub fn reply_mut(&mut self, reply_id: &ReplyId) -> Option<&mut Reply> {
        self.replies.iter_mut().find(|reply| &reply.id == reply_id)
    }

    pub fn owns_reply(&self, reply_id: &ReplyId) -> bool {
        self.reply(reply_id).is_some()
    }
}

fn deserialize_page_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let page = u32::deserialize(deserializer)?;
    if page == 0 {
        return Err(serde::de::Error::invalid_value(
            serde::de::Unexpected::Unsigned(0),
            &"a page number starting at 1",
        ));
    }
    Ok(page)
}

impl From<String> for AnnotationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<String> for ReplyId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn epoch() -> Timestamp {
        Utc.timestamp_opt(0, 0).single().expect("epoch is valid")
    }

    #[test]
    fn page_zero_is_clamped_to_first_page() {
        let annotation = Annotation::new("a", 0, Subtype::Square, "alice", epoch());
        assert_eq!(annotation.page_number(), 1);
    }

    #[test]
    fn shape_kinds_without_dedicated_icon_fall_back_to_freehand() {
        assert_eq!(Subtype::Ink.icon(), IconKind::Freehand);
        assert_eq!(Subtype::Widget.icon(), IconKind::Freehand);
        assert_eq!(Subtype::Square.icon(), IconKind::Rectangle);
        assert_eq!(Subtype::Text.icon(), IconKind::FreeText);
        assert_eq!(Subtype::FileAttachment.icon(), IconKind::Download);
    }

    #[test]
    fn annotation_deserializes_without_replies() {
        let json = r#"{
            "id": "a1",
            "page_number": 3,
            "subtype": "Highlight",
            "title": "alice",
            "date": "2024-05-01T10:00:00Z",
            "body_text": "check this"
        }"#;

        let annotation: Annotation = serde_json::from_str(json).expect("annotation should parse");
        assert_eq!(annotation.id().as_str(), "a1");
        assert_eq!(annotation.page_number(), 3);
        assert!(annotation.replies.is_empty());
    }

    #[test]
    fn deserialized_annotation_rejects_page_zero() {
        let json = r#"{
            "id": "a1",
            "page_number": 0,
            "subtype": "Text",
            "title": "alice",
            "date": "2024-05-01T10:00:00Z",
            "body_text": ""
        }"#;

        let error = serde_json::from_str::<Annotation>(json).expect_err("page 0 must be rejected");
        assert!(error.to_string().contains("page number"));
    }

    #[test]
    fn recorded_offset_survives_serialization() {
        let json = r#"{
            "id": "a1",
            "page_number": 1,
            "subtype": "Text",
            "title": "alice",
            "date": "2024-03-15T09:30:05+08:00",
            "body_text": ""
        }"#;

        let annotation: Annotation = serde_json::from_str(json).expect("annotation should parse");
        assert_eq!(annotation.date().offset().local_minus_utc(), 8 * 3600);
        assert_eq!(display_date(&annotation.date()), "2024-03-15 09:30:05");

        let value = serde_json::to_value(&annotation).expect("annotation should serialize");
        assert_eq!(value["date"], "2024-03-15T09:30:05+08:00");
    }

    #[test]
    fn reply_lookup_is_scoped_to_owner() {
        let mut annotation = Annotation::new("a", 1, Subtype::Text, "alice", epoch());
        annotation.replies.push(Reply {
            id: ReplyId::from("r1"),
            title: "bob".to_owned(),
            date: epoch(),
            content: "ok".to_owned(),
        });

        assert!(annotation.owns_reply(&ReplyId::from("r1")));
        assert!(!annotation.owns_reply(&ReplyId::from("r2")));
    }
}
