//! ButterPaper comment sidebar core
//!
//! Headless state for the annotation comment list: the ledger of annotations and replies,
//! the single-surface interaction controller, the per-page projection and the panel that
//! dispatches UI events across them.

pub mod config;
pub mod interaction;
pub mod ledger;
pub mod panel;
pub mod ports;
pub mod projection;
pub mod reveal;
pub mod view;

pub use comment_model::{
    dates, Annotation, AnnotationId, IconKind, RecordedDate, Reply, ReplyId, Subtype, Timestamp,
};
pub use config::{CommentConfig, ConfigError};
pub use interaction::{ActiveEdit, InteractionState};
pub use ledger::{CommentError, CommentResult, Ledger, DEFAULT_CURRENT_USER};
pub use panel::CommentPanel;
pub use ports::{
    AnnotationStore, Clock, FixedClock, RecordingStore, ReplyIdSource, SequentialReplyIds,
    StoreEvent, SystemClock, UuidReplyIds,
};
pub use projection::{project, PageGroups, PageIndex};
pub use reveal::{
    NoopRevealer, RevealOptions, RevealRegistry, Revealer, ScrollBehavior, ScrollBlock,
};
pub use view::{CardAction, CardView, PageView, PanelView, ReplyView, Surface};
