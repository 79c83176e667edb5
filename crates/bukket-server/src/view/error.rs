use axum::http::StatusCode;
use axum::response::Html;

use super::html::Markup;
use super::{layout, url};

/// Renders the generic failure page.
pub fn error_page(status: StatusCode, name: &str, message: &str) -> Html<String> {
    let heading = match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    };

    let mut page = Markup::new();
    page.element("h1", &[], &heading)
        .element("h3", &[("class", "flash")], message)
        .element("p", &[("class", "error-name")], name)
        .void("hr", &[])
        .link(url::INDEX, "All buckets")
        .separator()
        .configuration_link();

    layout(page)
}
