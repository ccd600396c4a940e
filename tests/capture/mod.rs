//! Collects the events emitted while a closure runs.

use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// An emitted event: its level and its `key` field, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub level: Level,
    pub key: Option<String>,
}

/// A layer that stores every event it sees.
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<Record>>>);

impl<S: Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &Event<'_>, _: Context<'_, S>) {
        let mut visitor = KeyVisitor(None);
        event.record(&mut visitor);
        self.0.lock().push(Record { level: *event.metadata().level(), key: visitor.0 });
    }
}

/// Extracts the `key` field of an event.
struct KeyVisitor(Option<String>);

impl Visit for KeyVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "key" {
            self.0 = Some(value.into());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "key" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

/// Run `f` with a capturing subscriber on this thread.
pub fn events<T>(f: impl FnOnce() -> T) -> (T, Vec<Record>) {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let output = tracing::subscriber::with_default(subscriber, f);
    let records = std::mem::take(&mut *capture.0.lock());
    (output, records)
}

/// Whether an event with the given level and key was emitted.
#[allow(dead_code)]
pub fn emitted(records: &[Record], level: Level, key: &str) -> bool {
    records
        .iter()
        .any(|record| record.level == level && record.key.as_deref() == Some(key))
}
