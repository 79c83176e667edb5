use axum::response::Html;

use super::html::Markup;
use super::url;

/// Title of every page.
pub const TITLE: &str = "Chikken in a Bukket";

/// Wraps page content in the shared document shell.
pub fn layout(content: Markup) -> Html<String> {
    let mut page = Markup::new();
    page.raw("<!DOCTYPE html>")
        .open("html", &[])
        .open("head", &[])
        .element("title", &[], TITLE)
        .void(
            "link",
            &[
                ("rel", "stylesheet"),
                ("type", "text/css"),
                ("href", url::STYLESHEET),
                ("media", "screen"),
            ],
        )
        .close("head")
        .open("body", &[])
        .raw(content.as_str())
        .open("div", &[("class", "bucket")])
        .void("img", &[("src", url::BUCKET_IMAGE), ("alt", "")])
        .close("div")
        .close("body")
        .close("html");

    Html(page.into_string())
}

impl Markup {
    /// Appends the separator between navigation links.
    pub(crate) fn separator(&mut self) -> &mut Self {
        self.element("span", &[("class", "separator")], "|")
    }

    /// Appends the link to the configuration form.
    pub(crate) fn configuration_link(&mut self) -> &mut Self {
        self.link(url::CONFIGURATION, "S3 Configuration")
    }

    /// Appends a link deleting `bucket` after confirmation.
    pub(crate) fn delete_bucket_link(&mut self, bucket: &str, text: &str) -> &mut Self {
        self.confirm_link(
            &url::delete_bucket(bucket),
            text,
            &format!("Are you sure you want to delete the bucket {bucket}?"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_content() {
        let mut content = Markup::new();
        content.element("h1", &[], "Hello");

        let Html(page) = layout(content);
        assert!(page.starts_with("<!DOCTYPE html><html><head><title>Chikken in a Bukket</title>"));
        assert!(page.contains("href=\"/style.css\""));
        assert!(page.contains("<body><h1>Hello</h1><div class=\"bucket\"><img src=\"/bucket.png\""));
        assert!(page.ends_with("</body></html>"));
    }
}
