use axum::response::Html;
use bukket_storage::ObjectInfo;

use super::html::Markup;
use super::{format, human_size, layout, url};

/// Renders an object's attributes with its signed download link.
pub fn detail(bucket: &str, object: &ObjectInfo, download_url: &str) -> Html<String> {
    let key = object.key.as_str();

    let mut page = Markup::new();
    page.element("h1", &[], &format!("Attributes for {key}"))
        .link(url::INDEX, "All buckets")
        .separator()
        .link(&url::bucket(bucket), &format!("Back to {bucket}"))
        .separator()
        .configuration_link();

    let content_type = object.content_type.as_deref().unwrap_or_default();
    let etag = object.etag.as_deref().unwrap_or_default();
    page.open("ul", &[])
        .element("li", &[], &format!("Content-Type: {content_type}"))
        .element("li", &[], &format!("E-Tag: {etag}"))
        .element(
            "li",
            &[],
            &format!("Last-Modified: {}", format::timestamp(object.last_modified)),
        )
        .element("li", &[], &format!("Size: {}", human_size(object.size)))
        .close("ul");

    page.link(download_url, "Download this file")
        .separator()
        .confirm_link(
            &url::delete(bucket, key),
            "Delete this file",
            "Are you sure you want to delete this object?",
        );

    layout(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_attributes() -> anyhow::Result<()> {
        let object = ObjectInfo::new("dir/cat.png", 2048)
            .with_content_type("image/png")
            .with_etag("\"abc\"")
            .with_last_modified("2024-03-01T12:30:00Z".parse()?);

        let Html(page) = detail("photos", &object, "https://s3.example/photos/dir/cat.png?sig");
        assert!(page.contains("<h1>Attributes for dir/cat.png</h1>"));
        assert!(page.contains("<a href=\"/buckets/photos\">Back to photos</a>"));
        assert!(page.contains("<li>Content-Type: image/png</li>"));
        assert!(page.contains("<li>E-Tag: &quot;abc&quot;</li>"));
        assert!(page.contains("<li>Last-Modified: Fri, 01 Mar 2024 12:30:00 GMT</li>"));
        assert!(page.contains("<li>Size: 2 KB</li>"));
        assert!(page.contains("href=\"https://s3.example/photos/dir/cat.png?sig\">Download this file"));
        assert!(page.contains("/delete/photos/dir/cat.png"));
        Ok(())
    }
}
