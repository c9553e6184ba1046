//! Print routes
//!
//! | Path | Params | Job |
//! |------|--------|-----|
//! | /print | text, cut | plain line |
//! | /pmarkdown | doc | Markdown-lite document |
//! | /part | doc (raw) | fixed-width document |
//! | /qr | text, cut | QR code |
//! | /cut | | cut only |
//! | /image | | configured image asset |
//!
//! Every route requires `x-PrintRAPI-key`. The key is checked before the
//! length limit on `text` and Markdown `doc`, and both before the printer
//! is opened.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::ApiKey;
use crate::core::AppState;
use crate::printing::PrintJob;
use crate::utils::validation::{decode_text, validate_text_len};
use crate::utils::{AppError, AppResult};

use super::query::ValidQuery;

#[derive(Debug, Deserialize)]
pub struct TextQuery {
    pub text: String,
    #[serde(default)]
    pub cut: bool,
}

#[derive(Debug, Deserialize)]
pub struct DocQuery {
    pub doc: String,
}

/// Response echoing the printed text
#[derive(Debug, Serialize)]
pub struct PrintResponse {
    pub text: String,
    pub status: &'static str,
}

impl PrintResponse {
    fn ok(text: String) -> Json<Self> {
        Json(Self { text, status: "ok" })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    fn ok() -> Json<Self> {
        Json(Self { status: "ok" })
    }
}

/// Run a job on the blocking pool with a fresh printer handle
async fn dispatch(state: &AppState, job: PrintJob) -> AppResult<()> {
    let connector = state.connector.clone();
    let kind = job.kind();

    tokio::task::spawn_blocking(move || job.execute(connector.as_ref()))
        .await
        .map_err(|e| AppError::Internal(format!("Print task failed: {}", e)))??;

    info!(kind, "Printed");
    Ok(())
}

/// GET /print - print one line
pub async fn print_text(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<TextQuery>,
    _key: ApiKey,
) -> AppResult<Json<PrintResponse>> {
    let text = decode_text(&query.text);
    validate_text_len(&text)?;

    dispatch(
        &state,
        PrintJob::PlainText {
            text: text.clone(),
            cut: query.cut,
        },
    )
    .await?;

    Ok(PrintResponse::ok(text))
}

/// GET /pmarkdown - print a Markdown-lite document
pub async fn print_markdown(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<DocQuery>,
    _key: ApiKey,
) -> AppResult<Json<PrintResponse>> {
    let document = decode_text(&query.doc);
    validate_text_len(&document)?;

    dispatch(
        &state,
        PrintJob::MarkdownDocument {
            document: document.clone(),
        },
    )
    .await?;

    Ok(PrintResponse::ok(document))
}

/// GET /part - print a fixed-width document
///
/// The document is taken as bound from the query string, without a
/// second decoding pass, and is not subject to the length limit.
pub async fn print_part(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<DocQuery>,
    _key: ApiKey,
) -> AppResult<Json<PrintResponse>> {
    let document = query.doc;

    dispatch(
        &state,
        PrintJob::FixedWidthPart {
            document: document.clone(),
        },
    )
    .await?;

    Ok(PrintResponse::ok(document))
}

/// GET /qr - print a QR code
pub async fn print_qr(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<TextQuery>,
    _key: ApiKey,
) -> AppResult<Json<PrintResponse>> {
    let text = decode_text(&query.text);
    validate_text_len(&text)?;

    dispatch(
        &state,
        PrintJob::Qr {
            text: text.clone(),
            cut: query.cut,
        },
    )
    .await?;

    Ok(PrintResponse::ok(text))
}

/// GET /cut - cut the paper
pub async fn cut(State(state): State<AppState>, _key: ApiKey) -> AppResult<Json<StatusResponse>> {
    dispatch(&state, PrintJob::Cut).await?;
    Ok(StatusResponse::ok())
}

/// GET /image - print the configured image asset
pub async fn print_image(
    State(state): State<AppState>,
    _key: ApiKey,
) -> AppResult<Json<StatusResponse>> {
    let path = state.config.image_path.clone();
    dispatch(&state, PrintJob::Image { path }).await?;
    Ok(StatusResponse::ok())
}
