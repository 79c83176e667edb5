//! HTML pages.
//!
//! Pages are rendered into [`Html`] strings by small builder functions.
//! Interpolated values are always escaped.
//!
//! [`Html`]: axum::response::Html

mod add_file;
mod bucket;
mod configuration;
mod detail;
mod error;
mod format;
mod html;
mod index;
mod layout;
pub mod url;

pub use crate::view::add_file::{FILE_FIELD, add_file};
pub use crate::view::bucket::bucket;
pub use crate::view::configuration::configuration;
pub use crate::view::detail::detail;
pub use crate::view::error::error_page;
pub use crate::view::format::{human_size, timestamp};
pub use crate::view::html::{Markup, escape};
pub use crate::view::index::index;
pub use crate::view::layout::{TITLE, layout};
