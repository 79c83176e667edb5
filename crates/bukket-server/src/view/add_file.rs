use axum::response::Html;

use super::html::Markup;
use super::{layout, url};

/// Name of the multipart field holding the uploaded file.
pub const FILE_FIELD: &str = "File";

/// Renders the upload form for `bucket`.
pub fn add_file(bucket: &str) -> Html<String> {
    let action = url::add_file(bucket);

    let mut page = Markup::new();
    page.element("h1", &[], &format!("Add a new file to {bucket}"))
        .open("fieldset", &[])
        .element("legend", &[], "File to upload")
        .open(
            "form",
            &[
                ("action", &action),
                ("method", "post"),
                ("enctype", "multipart/form-data"),
            ],
        )
        .void(
            "input",
            &[("name", FILE_FIELD), ("type", "file"), ("size", "30")],
        )
        .open("p", &[])
        .void("input", &[("type", "submit"), ("value", "Upload")])
        .close("p")
        .close("form")
        .close("fieldset");

    layout(page)
}
