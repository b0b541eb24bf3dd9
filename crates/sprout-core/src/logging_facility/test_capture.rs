//! In-memory capture of operation events for test assertions
//!
//! Only events emitted through the `log_op_*` macros (those carrying both an
//! `op` and an `event` field) are kept. Each one is reduced to its operation,
//! its event name and the remaining fields rendered as strings, so a test can
//! follow one sprout, user or migration run through its
//! `start` / `end` / `end_error` trail.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use sprout_core_types::schema::{FIELD_COMPONENT, FIELD_EVENT, FIELD_OP};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One `log_op_*` event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpEvent {
    pub op: String,
    pub event: String,
    fields: BTreeMap<String, String>,
}

impl OpEvent {
    /// Field value as recorded; `?`-formatted fields keep their Debug form
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn has(&self, key: &str, value: &str) -> bool {
        self.field(key) == Some(value)
    }
}

#[derive(Default)]
struct FieldMap(BTreeMap<String, String>);

impl Visit for FieldMap {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

struct CaptureLayer {
    sink: Arc<Mutex<Vec<OpEvent>>>,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldMap::default();
        event.record(&mut visitor);
        let mut fields = visitor.0;

        let (Some(op), Some(name)) = (fields.remove(FIELD_OP), fields.remove(FIELD_EVENT)) else {
            return;
        };
        fields.remove(FIELD_COMPONENT);

        if let Ok(mut sink) = self.sink.lock() {
            sink.push(OpEvent {
                op,
                event: name,
                fields,
            });
        }
    }
}

fn capture_layer() -> (CaptureLayer, TestCapture) {
    let sink = Arc::new(Mutex::new(Vec::new()));
    let layer = CaptureLayer {
        sink: Arc::clone(&sink),
    };
    (layer, TestCapture { sink })
}

/// Shared handle onto the captured events
#[derive(Clone)]
pub struct TestCapture {
    sink: Arc<Mutex<Vec<OpEvent>>>,
}

impl TestCapture {
    /// Every captured event of `op`, in emission order
    pub fn events_for_op(&self, op: &str) -> Vec<OpEvent> {
        self.sink
            .lock()
            .map(|events| events.iter().filter(|e| e.op == op).cloned().collect())
            .unwrap_or_default()
    }

    /// Event names of `op` tagged `key = value`, in emission order
    ///
    /// Tests run in parallel against one global capture, so filtering on an
    /// entity id keeps assertions independent of other tests.
    pub fn trail(&self, op: &str, key: &str, value: &str) -> Vec<String> {
        self.events_for_op(op)
            .into_iter()
            .filter(|e| e.has(key, value))
            .map(|e| e.event)
            .collect()
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer as the global subscriber on first use and
/// return the shared handle on every call
///
/// # Example
///
/// ```
/// use sprout_core::log_op_start;
/// use sprout_core::logging_facility::init_test_capture;
///
/// let capture = init_test_capture();
/// log_op_start!("sprout_repo.create", sprout_id = "s-1");
/// assert_eq!(capture.trail("sprout_repo.create", "sprout_id", "s-1"), vec!["start"]);
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let (layer, capture) = capture_layer();
            if tracing_subscriber::registry().with(layer).try_init().is_err() {
                tracing::debug!("global subscriber already installed; test capture sees no events");
            }
            capture
        })
        .clone()
}
