//! `chatmark replay` command implementation.
//!
//! Feeds a markdown file through the streaming renderer in fixed-size
//! chunks on a simulated clock, then checks the result against a one-shot
//! render of the same text.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chatmark_config::CliSettings;
use chatmark_renderer::Renderers;
use chatmark_stream::{
    MessageDelta, PatchOutcome, RenderThrottle, RenderTick, StreamDriver, StreamEvent,
    StreamSession,
};
use clap::Args;

use super::settings::{SettingsArgs, renderers};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the replay command.
#[derive(Args)]
pub(crate) struct ReplayArgs {
    /// Path to the markdown file.
    markdown_file: PathBuf,

    /// Characters per simulated delta (overrides config).
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Simulated delay between deltas in milliseconds.
    #[arg(long, default_value_t = 10)]
    delay_ms: u64,

    /// Abort the stream before sending this chunk.
    #[arg(long)]
    abort_at: Option<usize>,

    /// Render throttle interval in milliseconds (overrides config).
    #[arg(long)]
    throttle_ms: Option<u64>,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

impl ReplayArgs {
    /// Execute the replay command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.settings.load_config(CliSettings {
            throttle_ms: self.throttle_ms,
            chunk_size: self.chunk_size,
            ..Default::default()
        })?;
        let markdown = std::fs::read_to_string(&self.markdown_file)?;
        output.info(&format!("Replaying {}...", self.markdown_file.display()));

        let options = ReplayOptions {
            chunk_size: config.replay.chunk_size,
            delay: Duration::from_millis(self.delay_ms),
            throttle: config.throttle_interval(),
            abort_at: self.abort_at,
        };
        let report = replay(&markdown, Arc::new(renderers(&config)), &options);

        output.html(&report.html)?;
        print_report(&output, &report);

        if report.converged {
            Ok(())
        } else {
            Err(CliError::Validation(
                "streamed output differs from the final render".to_owned(),
            ))
        }
    }
}

/// How the markdown is streamed.
#[derive(Debug)]
struct ReplayOptions {
    chunk_size: usize,
    delay: Duration,
    throttle: Duration,
    abort_at: Option<usize>,
}

/// Counters over all render ticks of a replay.
#[derive(Debug, Default, PartialEq, Eq)]
struct ReplayStats {
    chunks: usize,
    ticks: usize,
    promoted_bytes: usize,
    appended: usize,
    replaced: usize,
    unchanged: usize,
    failed: usize,
    resets: usize,
    charts: Vec<String>,
}

impl ReplayStats {
    fn record(&mut self, tick: &RenderTick) {
        self.ticks += 1;
        self.promoted_bytes += tick.promoted;
        match tick.patch {
            Some(PatchOutcome::Appended) => self.appended += 1,
            Some(PatchOutcome::Replaced) => self.replaced += 1,
            Some(PatchOutcome::Unchanged) => self.unchanged += 1,
            None => self.failed += 1,
        }
        if tick.reset {
            self.resets += 1;
        }
        self.charts.extend(tick.charts.iter().cloned());

        tracing::info!(
            tick = self.ticks,
            promoted = tick.promoted,
            patch = ?tick.patch,
            reset = tick.reset,
            "Render tick"
        );
    }
}

/// Outcome of a replay.
#[derive(Debug)]
struct ReplayReport {
    html: String,
    expected: String,
    converged: bool,
    aborted: bool,
    stats: ReplayStats,
}

/// Stream `markdown` through a [`StreamDriver`] and compare the final DOM
/// with a Full render of the received text.
fn replay(markdown: &str, renderers: Arc<Renderers>, options: &ReplayOptions) -> ReplayReport {
    let full = renderers.full.clone();
    let session = StreamSession::new(renderers);
    let mut driver = StreamDriver::new(session, RenderThrottle::new(options.throttle));
    let mut stats = ReplayStats::default();
    let mut now = Instant::now();
    let mut aborted = false;

    for (index, chunk) in chunks(markdown, options.chunk_size).into_iter().enumerate() {
        if options.abort_at == Some(index) {
            aborted = true;
            break;
        }
        stats.chunks += 1;
        let event = StreamEvent::Delta(MessageDelta::content(chunk));
        if let Some(tick) = driver.handle(event, now) {
            stats.record(&tick);
        }

        now += options.delay;
        if let Some(deadline) = driver.next_deadline()
            && deadline <= now
            && let Some(tick) = driver.tick(deadline)
        {
            stats.record(&tick);
        }
    }

    let last = if aborted {
        StreamEvent::Abort
    } else {
        StreamEvent::Done
    };
    if let Some(tick) = driver.handle(last, now) {
        stats.record(&tick);
    }

    let (session, message) = driver.into_parts();
    let html = session.output().inner_html();
    let expected = full.render_html(message.content());
    ReplayReport {
        converged: html == expected,
        html,
        expected,
        aborted,
        stats,
    }
}

/// Split `text` into pieces of at most `size` characters.
fn chunks(text: &str, size: usize) -> Vec<&str> {
    let size = size.max(1);
    let mut pieces = Vec::new();
    let mut start = 0;
    for (count, (index, _)) in text.char_indices().enumerate() {
        if count > 0 && count % size == 0 {
            pieces.push(&text[start..index]);
            start = index;
        }
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

fn print_report(output: &Output, report: &ReplayReport) {
    let stats = &report.stats;
    if report.aborted {
        output.highlight(&format!("\nStream aborted after {} chunk(s).", stats.chunks));
    } else {
        output.highlight(&format!("\nStreamed {} chunk(s).", stats.chunks));
    }
    output.info(&format!("Renders: {}", stats.ticks));
    output.info(&format!("Promoted: {} bytes", stats.promoted_bytes));
    output.info(&format!(
        "Patches: {} appended, {} replaced, {} unchanged",
        stats.appended, stats.replaced, stats.unchanged
    ));
    if stats.failed > 0 {
        output.warning(&format!("Unparseable renders kept: {}", stats.failed));
    }
    if stats.resets > 0 {
        output.info(&format!("Resets: {}", stats.resets));
    }
    if !stats.charts.is_empty() {
        output.info(&format!("Charts: {}", stats.charts.join(", ")));
    }

    if report.converged {
        output.success("\nStreamed output matches the final render.");
    } else {
        output.error("\nStreamed output differs from the final render.");
        output.info(&format!("Expected: {}", report.expected));
    }
}
