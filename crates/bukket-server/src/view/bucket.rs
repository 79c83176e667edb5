use axum::response::Html;

use super::html::Markup;
use super::{human_size, layout, url};
use crate::service::BucketPage;

/// Renders one page of a bucket's objects.
pub fn bucket(page: &BucketPage) -> Html<String> {
    let name = page.bucket.as_str();
    let count = page.objects.len();

    let mut html = Markup::new();
    html.element("h1", &[], &format!("Files in bucket {name}"))
        .element("h3", &[], &format!("{count} objects in this bucket"))
        .link(url::INDEX, "All buckets")
        .separator()
        .delete_bucket_link(name, "Delete this bucket")
        .separator()
        .configuration_link()
        .separator()
        .link(&url::add_file(name), "Upload a file");

    html.open("ul", &[]);
    for object in &page.objects {
        html.open("li", &[])
            .link(
                &url::details(name, &object.key),
                &format!("{} ({})", object.key, human_size(object.size)),
            )
            .open("span", &[("class", "delete")])
            .confirm_link(
                &url::delete(name, &object.key),
                "[Delete]",
                &format!("Are you sure you want to delete {}?", object.key),
            )
            .close("span")
            .close("li");
    }
    html.close("ul");

    if let Some(previous) = &page.previous_url {
        html.link(previous, "Back");
    }
    if page.previous_url.is_some() && page.next_url.is_some() {
        html.separator();
    }
    if let Some(next) = &page.next_url {
        html.link(next, "More");
    }

    layout(html)
}
