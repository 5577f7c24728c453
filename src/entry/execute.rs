use std::io::Write as _;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::error;

use crate::args::{OutputFormat, RunArgs};
use crate::engine::{RunEvent, RunOrchestrator, RunProgress, RunSettings, RunSummary};
use crate::error::{AppError, AppResult, SinkError};
use crate::http::{ClientOptions, ReqwestTransport, Transport, build_client};
use crate::shutdown::{cancel_channel, setup_signal_cancel_handler};
use crate::sinks::{json_report, jsonl_event, jsonl_summary, progress_line, summary_text};

/// Runs `settings` against the network and writes the report to stdout.
///
/// Events travel over a channel to a printer task, so output never holds up
/// the run itself.
///
/// # Errors
///
/// Returns an error when the client cannot be built, the run is rejected, or
/// output cannot be written.
pub async fn execute_run(args: &RunArgs, settings: RunSettings) -> AppResult<()> {
    let client = build_client(&ClientOptions::default())?;
    let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new(client));

    let (cancel_tx, cancel_rx) = cancel_channel();
    let signal_handle = setup_signal_cancel_handler(cancel_tx);

    let iterations = settings.iterations;
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(print_events(
        event_rx,
        args.output_format,
        args.stream,
        iterations,
    ));

    let orchestrator = RunOrchestrator::new(transport).with_cancellation(cancel_rx);
    let outcome = orchestrator.run(settings.clone(), &event_tx).await;
    drop(event_tx);
    signal_handle.abort();
    printer.await??;

    let result = match outcome {
        Ok(result) => result,
        Err(err) => {
            if let Some(errors) = err.run_rejection() {
                for message in errors {
                    error!("{}", message);
                }
            }
            return Err(err);
        }
    };

    let summary = RunSummary::from_result(&result, iterations);
    let report = match args.output_format {
        OutputFormat::Text => summary_text(&settings, &summary)?,
        OutputFormat::Json => json_report(&settings, &result, &summary)?,
        OutputFormat::Jsonl => jsonl_summary(&summary)?,
    };
    write_stdout(report.trim_end())
}

async fn print_events(
    mut event_rx: mpsc::UnboundedReceiver<RunEvent>,
    format: OutputFormat,
    stream: bool,
    iterations: usize,
) -> AppResult<()> {
    while let Some(event) = event_rx.recv().await {
        match format {
            OutputFormat::Jsonl => {
                if let Some(line) = jsonl_event(&event, iterations)? {
                    write_stdout(&line)?;
                }
            }
            OutputFormat::Text if stream => {
                if let RunEvent::Response { log, logs, .. } = &event {
                    let progress = RunProgress::new(logs.len(), iterations);
                    write_stdout(&progress_line(log, progress))?;
                }
            }
            OutputFormat::Text | OutputFormat::Json => {}
        }
    }
    Ok(())
}

fn write_stdout(line: &str) -> AppResult<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", line)
        .and_then(|()| stdout.flush())
        .map_err(|err| AppError::sink(SinkError::WriteReport { source: err }))
}
