//! Structured logging schema and field name constants.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation can query by standardized names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, stale data served |
//! | INFO  | Lifecycle events, mutation completions |
//! | DEBUG | Decision points, intermediate values |
//! | TRACE | Per-item iteration (per-field match scores) |

use tracing_subscriber::EnvFilter;

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "catalog", "search", "store"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "merge", "session", "fuzzy", "tool_service"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "materialize", "search", "rate", "save"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Tool id being operated on.
pub const TOOL_ID: &str = "tool_id";

/// Viewer (user) id performing or scoping the operation.
pub const VIEWER_ID: &str = "viewer_id";

/// Search query text.
pub const QUERY: &str = "query";

/// Feed name: "published", "drafts", "saved".
pub const FEED: &str = "feed";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a search or merge.
pub const RESULT_COUNT: &str = "result_count";

/// Number of records in a feed snapshot.
pub const SNAPSHOT_SIZE: &str = "snapshot_size";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Install a fmt subscriber honoring `RUST_LOG`, falling back to
/// `default_filter`. Safe to call more than once; later calls are no-ops.
///
/// Library hosts that bring their own subscriber can skip this entirely.
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
