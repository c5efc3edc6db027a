//! Watch command implementation
//!
//! Runs the alert monitor against the configured endpoints and renders every
//! change of the alert view to the terminal.

use crate::alerts::AlertView;
use crate::cli::args::OutputFormat;
use crate::cli::output::{render_view, supports_color, TableDisplay};
use crate::config::Config;
use crate::error::Result;
use crate::services::{AlertMonitor, MonitorSettings};
use crate::sources::{AlertStream, HttpPredictionFetcher, PredictionFetcher, SseAlertStream};

use std::future::Future;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Execute the watch command until Ctrl+C
pub async fn run_watch(config: &Config, format: OutputFormat) -> Result<()> {
    let timeout = config.request_timeout();
    let fetcher = HttpPredictionFetcher::new(&config.endpoints.api_url, timeout)?;
    let stream = SseAlertStream::new(&config.endpoints.stream_url, timeout)?;

    log::info!(
        "Watching alerts (api: {}, stream: {})",
        fetcher.endpoint(),
        stream.url()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let stop = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    follow(
        fetcher,
        &stream,
        tokio::io::stdin(),
        &mut out,
        format,
        supports_color(),
        stop,
    )
    .await
}

/// Run one monitor lifetime, rendering into `out` until `stop` resolves
///
/// Every line read from `input` dismisses the current notification.
pub async fn follow<F, S, R, W, T>(
    fetcher: F,
    stream: &S,
    input: R,
    out: &mut W,
    format: OutputFormat,
    use_colors: bool,
    stop: T,
) -> Result<()>
where
    F: PredictionFetcher + 'static,
    S: AlertStream + ?Sized,
    R: AsyncRead + Unpin,
    W: Write,
    T: Future<Output = ()>,
{
    let handle = AlertMonitor::start(fetcher, stream, MonitorSettings::default());
    let mut changes = handle.changes();
    let mut lines = BufReader::new(input).lines();
    let mut input_open = true;
    tokio::pin!(stop);

    let initial = changes.borrow_and_update().clone();
    write_view(out, &initial, format, use_colors)?;

    loop {
        tokio::select! {
            _ = &mut stop => break,

            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = changes.borrow_and_update().clone();
                write_view(out, &view, format, use_colors)?;
            }

            line = lines.next_line(), if input_open => match line {
                Ok(Some(_)) => handle.dismiss_notification()?,
                Ok(None) => input_open = false,
                Err(e) => {
                    log::warn!("Stopped reading input: {}", e);
                    input_open = false;
                }
            },
        }
    }

    handle.shutdown().await
}

fn write_view<W: Write>(
    out: &mut W,
    view: &AlertView,
    format: OutputFormat,
    use_colors: bool,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            if use_colors {
                // Clear screen and home the cursor
                write!(out, "\x1b[2J\x1b[H")?;
            } else {
                writeln!(out, "{:-<60}", "")?;
            }
            write!(out, "{}", render_view(view, use_colors))?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string(view)?;
            writeln!(out, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(out, "{}", view.to_compact())?;
        }
    }
    out.flush()?;
    Ok(())
}
