//! Credential form and reconnection.

use axum::Router;
use axum::extract::State;
use axum::response::{Html, Redirect};
use axum::routing::get;

use crate::extract::Form;
use crate::handler::request::ConfigurationForm;
use crate::handler::{ErrorKind, Result};
use crate::service::{Credentials, CredentialsFile, ServiceState, StorageHandle};
use crate::view::{self, url};

/// Tracing target for configuration operations.
const TRACING_TARGET: &str = "bukket_server::handler::configuration";

/// Shows the credential form filled with the current credentials.
#[tracing::instrument(skip_all)]
async fn show_configuration(State(storage): State<StorageHandle>) -> Html<String> {
    let connection = storage.current().await;
    let credentials = connection.as_deref().and_then(|c| c.credentials());

    let (access_key, secret_key) = credentials
        .map(|c| (c.access_key(), c.secret_key()))
        .unwrap_or_default();

    view::configuration(access_key, secret_key)
}

/// Saves new credentials and reconnects with them.
#[tracing::instrument(skip_all)]
async fn update_configuration(
    State(storage): State<StorageHandle>,
    State(credentials_file): State<CredentialsFile>,
    Form(form): Form<ConfigurationForm>,
) -> Result<Redirect> {
    let access_key = form.access_key.trim();
    let secret_key = form.secret_key.trim();
    if access_key.is_empty() || secret_key.is_empty() {
        return Err(ErrorKind::BadRequest
            .with_message("Both the access key and the secret key are required"));
    }

    let use_ssl = match credentials_file.load().await {
        Ok(Some(existing)) => existing.use_ssl,
        Ok(None) => true,
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "replacing unreadable credential file"
            );
            true
        }
    };

    let credentials = Credentials::new(access_key, secret_key).with_use_ssl(use_ssl);
    credentials_file.save(&credentials).await?;
    storage.reconnect(Some(credentials)).await?;

    tracing::info!(
        target: TRACING_TARGET,
        path = %credentials_file.path().display(),
        use_ssl,
        "storage configuration updated"
    );

    Ok(Redirect::to(url::INDEX))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route(
        url::CONFIGURATION,
        get(show_configuration).post(update_configuration),
    )
}
