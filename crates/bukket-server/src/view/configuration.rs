use axum::response::Html;

use super::html::Markup;
use super::{layout, url};

/// Renders the credential form pre-filled with the current values.
pub fn configuration(access_key: &str, secret_key: &str) -> Html<String> {
    let mut page = Markup::new();
    page.element("h1", &[], "Your S3 Configuration")
        .link(url::INDEX, "Return to top")
        .element(
            "p",
            &[],
            "You're not letting anyone look at this over your shoulder, are you?",
        );

    page.open(
        "form",
        &[
            ("action", url::CONFIGURATION),
            ("method", "post"),
            (
                "onsubmit",
                "return confirm('Are you sure you want to change these?');",
            ),
        ],
    )
    .element("label", &[("for", "access_key")], "Access Key:")
    .void(
        "input",
        &[
            ("value", access_key),
            ("name", "access_key"),
            ("id", "access_key"),
            ("type", "text"),
            ("size", "30"),
        ],
    )
    .element("label", &[("for", "secret_key")], "Secret Key")
    .void(
        "input",
        &[
            ("value", secret_key),
            ("name", "secret_key"),
            ("id", "secret_key"),
            ("type", "text"),
            ("size", "40"),
        ],
    )
    .void("br", &[])
    .open("p", &[])
    .void(
        "input",
        &[("type", "submit"), ("name", "submit"), ("value", "Change 'em!")],
    )
    .void(
        "input",
        &[("type", "reset"), ("name", "reset"), ("value", "Nah, forget it")],
    )
    .close("p")
    .close("form");

    layout(page)
}
