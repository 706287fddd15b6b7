//! Webhook dispatch pipeline
//!
//! Request → body decoding → verification → template selection →
//! rendering → escaping → Telegram.

mod body;
mod dispatch;
mod escape;
mod extract;
mod render;
mod select;
mod verify;

pub use body::{body_kind, decode_body, BodyKind, FORM_URL_ENCODED, JSON};
pub use dispatch::{dispatch, handle_webhook};
pub use escape::escape;
pub use extract::{as_text, display, header_value, resolve, Message, HEADER_MARKER};
pub use render::{format_positional, render, RenderError};
pub use select::{select_template, SelectError};
pub use verify::is_valid;
