//! Drives one run from its event source to an encoder.

use agstream_core::{Adapter, Converter, ConverterOptions, Encoder, Event, RunLifecycle};
use futures::StreamExt;

use crate::source::{EventSource, RunContext, SourceEvent};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The source finished and `RUN_FINISHED` was written.
    Completed,
    /// The source failed and `RUN_ERROR` was written.
    ErrorTerminated,
    /// Writing to the client failed.
    Disconnected,
    /// The client went away while the source was idle or still setting up.
    Cancelled,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::Completed => "completed",
            RunOutcome::ErrorTerminated => "error",
            RunOutcome::Disconnected => "disconnected",
            RunOutcome::Cancelled => "cancelled",
        }
    }
}

/// Run `source` for `ctx`, writing every event through `encoder`.
///
/// The encoder is flushed after the terminal event. Nothing is written once
/// the transport fails or the run is cancelled.
pub async fn drive<E>(
    source: &dyn EventSource,
    options: ConverterOptions,
    ctx: RunContext,
    encoder: &mut E,
) -> RunOutcome
where
    E: Encoder + ?Sized,
{
    let adapter = Adapter::new(Converter::new(
        ctx.thread_id.clone(),
        ctx.run_id.clone(),
        options,
    ));
    let converter = adapter.converter();
    let cancel = ctx.cancel.clone();

    tracing::debug!(format = %encoder.format(), "streaming run events");

    if send(encoder, &[converter.start_run()]).await.is_err() {
        return RunOutcome::Disconnected;
    }

    let prepared = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::debug!("run cancelled by client during setup");
            return RunOutcome::Cancelled;
        }
        prepared = source.prepare(&ctx) => prepared,
    };

    if let Err(e) = prepared {
        tracing::warn!(error = %e, "run setup failed");
        let events = converter.error_run_with_code(&e, e.code());
        return terminate(encoder, &events, RunOutcome::ErrorTerminated).await;
    }

    let mut stream = source.run(ctx);

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("run cancelled by client");
                return RunOutcome::Cancelled;
            }
            next = stream.next() => next,
        };

        let events = match next {
            Some(Ok(SourceEvent::Domain(event))) => adapter.convert(&event),
            Some(Ok(SourceEvent::Protocol(event))) => vec![event],
            Some(Err(e)) => {
                tracing::warn!(error = %e, code = e.code(), "event source failed");
                let events = converter.error_run_with_code(&e, e.code());
                return terminate(encoder, &events, RunOutcome::ErrorTerminated).await;
            }
            None => {
                let events = converter.finish_run();
                return terminate(encoder, &events, RunOutcome::Completed).await;
            }
        };

        if send(encoder, &events).await.is_err() {
            return RunOutcome::Disconnected;
        }
    }
}

async fn send<E>(encoder: &mut E, events: &[Event]) -> Result<(), ()>
where
    E: Encoder + ?Sized,
{
    encoder.encode_multiple(events).await.map_err(|e| {
        tracing::debug!(error = %e, "client disconnected");
    })
}

async fn terminate<E>(encoder: &mut E, events: &[Event], outcome: RunOutcome) -> RunOutcome
where
    E: Encoder + ?Sized,
{
    if send(encoder, events).await.is_err() {
        return RunOutcome::Disconnected;
    }
    if let Err(e) = encoder.flush().await {
        tracing::debug!(error = %e, "client disconnected");
        return RunOutcome::Disconnected;
    }
    outcome
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;
