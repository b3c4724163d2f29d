//! Echo server example with AG-UI support.
//!
//! Streams the last user message back word by word, after a pretend lookup
//! tool call.
//!
//! Run with:
//! ```sh
//! RUST_LOG=debug cargo run -p agstream-server --example echo_server
//! ```
//!
//! Test with curl:
//! ```sh
//! curl -X POST http://localhost:3000/api/agent \
//!   -H "Content-Type: application/json" \
//!   -d '{"messages": [{"id": "1", "role": "user", "content": "Hello there!"}]}' \
//!   -N
//! ```

use std::time::Duration;

use agstream_core::{ConverterOptions, DomainEvent};
use agstream_server::{
    AgstreamRouter, EventSource, HandlerConfig, RunContext, SourceError, SourceEvent, SourceStream,
};
use futures::StreamExt;
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Replies with the caller's own words.
struct EchoSource {
    delay: Duration,
}

impl EventSource for EchoSource {
    fn run(&self, ctx: RunContext) -> SourceStream {
        let text = ctx
            .input
            .last_user_text()
            .unwrap_or_else(|| "Nothing to echo.".to_string());
        let delay = self.delay;
        let client = ctx
            .headers
            .get(axum::http::header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown");
        tracing::debug!(run_id = %ctx.run_id, client, "echoing");

        let mut script: Vec<DomainEvent> = vec![
            DomainEvent::thought("Looking up what the user said").by("echo"),
            DomainEvent::function_call(
                Some(format!("lookup-{}", ctx.run_id)),
                "lookup_message",
                Some(json!({ "threadId": ctx.thread_id, "client": client })),
            ),
            DomainEvent::function_response(
                Some(format!("lookup-{}", ctx.run_id)),
                Some(json!({ "found": true, "length": text.len() })),
            ),
        ];
        script.extend(
            text.split_inclusive(' ')
                .map(|word| DomainEvent::text(word).by("echo")),
        );

        let cancel = ctx.cancel;
        futures::stream::iter(script)
            .then(move |event| async move {
                tokio::time::sleep(delay).await;
                Ok::<SourceEvent, SourceError>(event.into())
            })
            .take_until(cancel.cancelled_owned())
            .boxed()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,agstream_server=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());

    let mut config = HandlerConfig::new(EchoSource {
        delay: Duration::from_millis(50),
    });
    config.app_name = "echo".to_string();
    config.options = ConverterOptions {
        emit_step_events: true,
        emit_activity_events: true,
        ..Default::default()
    };
    config.logger = Some(tracing::dispatcher::get_default(|d| d.clone()));

    let app = AgstreamRouter::new(config)
        .with_agui("/api/agent")
        .with_health("/health")
        .build()?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Server running at http://localhost:{}", port);
    tracing::info!("AG-UI endpoint: POST http://localhost:{}/api/agent", port);

    axum::serve(listener, app).await?;

    Ok(())
}
