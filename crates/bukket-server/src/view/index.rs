use axum::response::Html;
use bukket_storage::BucketInfo;

use super::html::Markup;
use super::{layout, url};

/// Renders the bucket list with the creation form.
///
/// `flash` is shown above the list when present.
pub fn index(buckets: &[BucketInfo], flash: Option<&str>) -> Html<String> {
    let mut page = Markup::new();
    page.element("h1", &[], "Welcome to your S3 Storage")
        .element("h2", &[], "Your current buckets are:");

    if let Some(flash) = flash {
        page.element("h3", &[("class", "flash")], flash);
    }

    page.open("ul", &[]);
    for bucket in buckets {
        page.open("li", &[])
            .element(
                "a",
                &[("class", "bucket"), ("href", &url::bucket(&bucket.name))],
                &bucket.name,
            )
            .open("span", &[("class", "delete")])
            .delete_bucket_link(&bucket.name, "[Delete]")
            .close("span")
            .close("li");
    }
    page.close("ul");

    page.open("form", &[("action", url::INDEX), ("method", "post")])
        .open("fieldset", &[])
        .element("label", &[("for", "bucket")], "Create a new bucket")
        .void(
            "input",
            &[
                ("type", "text"),
                ("id", "bucket"),
                ("name", "bucket"),
                ("size", "25"),
                ("class", "bucket"),
            ],
        )
        .void(
            "input",
            &[("type", "submit"), ("name", "Submit"), ("value", "Make it so!")],
        )
        .close("fieldset")
        .close("form")
        .void("hr", &[])
        .configuration_link();

    layout(page)
}
