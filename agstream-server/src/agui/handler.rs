//! HTTP handlers for the AG-UI endpoint.

use agstream_core::{JsonArrayEncoder, OutputFormat, RunAgentInput};
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{
        header::{
            ACCEPT, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONTENT_TYPE,
        },
        HeaderMap, StatusCode,
    },
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;
use tracing::instrument::WithSubscriber;
use tracing::Instrument;

use super::stream::{drive, RunOutcome};
use crate::error::{ServerError, ServerResult};
use crate::source::RunContext;
use crate::state::AppState;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Capacity of the pipe between the run task and the response body.
const STREAM_BUFFER_SIZE: usize = 64 * 1024;

/// Handle `POST` run requests.
///
/// The body must be a `RunAgentInput`; anything else is rejected with 400
/// before any event is produced. Logging goes to the configured logger.
pub async fn agui_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ServerResult<Response> {
    let dispatch = state.config.dispatch();
    handle_run(state, headers, body)
        .with_subscriber(dispatch)
        .await
}

/// Handle CORS preflight requests.
pub async fn preflight_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (
                ACCESS_CONTROL_ALLOW_HEADERS,
                "Content-Type, Accept, Authorization, X-User-ID",
            ),
        ],
    )
}

async fn handle_run(state: AppState, headers: HeaderMap, body: Bytes) -> ServerResult<Response> {
    let mut input: RunAgentInput = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "rejecting malformed run input");
        ServerError::from(e)
    })?;
    let (thread_id, run_id) = input.ensure_ids();

    let accept = header_str(&headers, ACCEPT.as_str()).unwrap_or_default();
    let format = OutputFormat::negotiate(accept);
    let user_id = header_str(&headers, USER_ID_HEADER).map(String::from);

    let span = tracing::info_span!(
        "agui_run",
        app = %state.config.app_name,
        thread_id = %thread_id,
        run_id = %run_id,
    );
    span.in_scope(|| tracing::info!(format = %format, user_id = ?user_id, "run started"));

    let cancel = CancellationToken::new();
    let ctx = RunContext {
        thread_id,
        run_id,
        user_id,
        input,
        headers,
        cancel: cancel.clone(),
    };

    if format.is_streaming() {
        streaming_response(state, ctx, format, cancel, span)
    } else {
        buffered_response(state, ctx, cancel).instrument(span).await
    }
}

fn streaming_response(
    state: AppState,
    ctx: RunContext,
    format: OutputFormat,
    cancel: CancellationToken,
    span: tracing::Span,
) -> ServerResult<Response> {
    let (writer, reader) = tokio::io::duplex(STREAM_BUFFER_SIZE);
    let dispatch = state.config.dispatch();

    tokio::spawn(
        async move {
            let config = state.config;
            let mut encoder = format.encoder(writer);
            let outcome = drive(config.source.as_ref(), config.options, ctx, encoder.as_mut()).await;
            log_outcome(outcome);
        }
        .instrument(span)
        .with_subscriber(dispatch),
    );

    // Dropping the body (client gone) cancels the run.
    let guard = cancel.drop_guard();
    let stream = ReaderStream::new(reader).map(move |chunk| {
        let _guard = &guard;
        chunk
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, format.content_type())
        .header(CACHE_CONTROL, "no-cache")
        .header("x-accel-buffering", "no")
        .header(ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Body::from_stream(stream))
        .map_err(|e| ServerError::Internal(e.to_string()))
}

async fn buffered_response(
    state: AppState,
    ctx: RunContext,
    cancel: CancellationToken,
) -> ServerResult<Response> {
    // Dropping the request future cancels the run.
    let _guard = cancel.drop_guard();

    let mut encoder = JsonArrayEncoder::new(Vec::new());
    let outcome = drive(
        state.config.source.as_ref(),
        state.config.options,
        ctx,
        &mut encoder,
    )
    .await;
    log_outcome(outcome);

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, OutputFormat::Json.content_type())
        .header(ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .body(Body::from(encoder.into_inner()))
        .map_err(|e| ServerError::Internal(e.to_string()))
}

fn log_outcome(outcome: RunOutcome) {
    match outcome {
        RunOutcome::Completed | RunOutcome::ErrorTerminated => {
            tracing::info!(outcome = outcome.as_str(), "run ended");
        }
        RunOutcome::Disconnected | RunOutcome::Cancelled => {
            tracing::debug!(outcome = outcome.as_str(), "run ended");
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
