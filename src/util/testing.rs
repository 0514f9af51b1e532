use std::sync::Once;

use serde_json::{json, Value};
use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("treeline=debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else if let Err(e) = subscriber.try_init() {
        eprintln!("Error: Failed to set up logging: {}", e);
    }
}

/// Flat records of a small tree used across tests:
///
/// ```text
/// 1 root
/// ├─2 a
/// │ └─4 c
/// │   └─5 d
/// └─3 b
/// ```
pub fn sample_records() -> Vec<Value> {
    vec![
        json!({"id": 1, "name": "root"}),
        json!({"id": 2, "parent_id": 1, "name": "a"}),
        json!({"id": 3, "parent_id": 1, "name": "b"}),
        json!({"id": 4, "parent_id": 2, "name": "c"}),
        json!({"id": 5, "parent_id": 4, "name": "d"}),
    ]
}

/// The same tree as [`sample_records`] in nested form.
pub fn sample_nested() -> Vec<Value> {
    vec![json!({
        "id": 1, "name": "root",
        "children": [
            {"id": 2, "name": "a", "children": [
                {"id": 4, "name": "c", "children": [
                    {"id": 5, "name": "d"}
                ]}
            ]},
            {"id": 3, "name": "b"}
        ]
    })]
}
