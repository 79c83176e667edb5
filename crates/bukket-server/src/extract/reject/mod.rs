//! Request extractors that reject with the HTML error page.
//!
//! Drop-in replacements for their axum counterparts.

mod enhanced_form;
mod enhanced_multipart;
mod enhanced_path;
mod enhanced_query;

pub use self::enhanced_form::Form;
pub use self::enhanced_multipart::Multipart;
pub use self::enhanced_path::Path;
pub use self::enhanced_query::Query;
