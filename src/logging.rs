//! A `tracing_subscriber::Layer` that turns log events into plain text
//! lines and hands them to the UI over a channel, so nothing is printed to
//! the terminal while the full-screen interface owns it.

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Lines buffered between ticks before new ones are dropped.
pub(crate) const LOG_CHANNEL_CAPACITY: usize = 1024;
const LOG_FILTER_ENV: &str = "CHATTY_LOG";
const DEFAULT_LOG_FILTER: &str = "info";

pub(crate) fn build_log_channel() -> (LogCaptureLayer, Receiver<String>) {
    let (tx, rx) = bounded(LOG_CHANNEL_CAPACITY);
    (LogCaptureLayer { tx }, rx)
}

/// Install the capture layer as the global subscriber and return the
/// receiving end for the debug overlay.
pub(crate) fn init() -> Receiver<String> {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let (layer, rx) = build_log_channel();
    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init();
    rx
}

pub(crate) struct LogCaptureLayer {
    tx: Sender<String>,
}

impl<S> Layer<S> for LogCaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);

        let line = format!("{:>5} {}: {}", meta.level().as_str(), meta.target(), visitor.0);
        // Full or closed channel: drop the line, logging must never block a tick.
        let _ = self.tx.try_send(line);
    }
}

struct MessageVisitor(String);

impl MessageVisitor {
    fn push_field(&mut self, name: &str, value: std::fmt::Arguments<'_>) {
        if name == "message" {
            let rest = std::mem::take(&mut self.0);
            self.0 = value.to_string();
            if !rest.is_empty() {
                self.0.push_str(", ");
                self.0.push_str(&rest);
            }
        } else if self.0.is_empty() {
            self.0 = format!("{name}={value}");
        } else {
            self.0.push_str(&format!(", {name}={value}"));
        }
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.push_field(field.name(), format_args!("{value:?}"));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.push_field(field.name(), format_args!("{value}"));
    }
}
