//! Structured telemetry for contract violations.
//!
//! Situations that are legal but suspicious (an engine handing back an empty
//! buffer, a read following a seek past the end, a rejected snapshot) and
//! internal invariant failures are reported as structured [`Violation`]
//! values instead of bare log lines. They can be:
//!
//! - Logged via tracing (default behavior)
//! - Collected programmatically for testing
//! - Sent to custom observers (metrics, alerting, etc.)
//!
//! # Example
//!
//! ```
//! use fuzz_stream::telemetry::{CollectingObserver, ViolationObserver};
//! use fuzz_stream::{MutatingStream, StreamConfig};
//! use std::sync::Arc;
//!
//! let observer = Arc::new(CollectingObserver::new());
//! let mut stream = MutatingStream::new(b"GET /index.html".to_vec(), StreamConfig::seeded(7))?;
//! stream.set_violation_observer(observer.clone());
//!
//! let _ = stream.read(Some(4))?;
//! assert!(observer.is_empty(), "unexpected violations");
//! # Ok::<(), fuzz_stream::StreamError>(())
//! ```

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Severity of a violation.
///
/// Severities are ordered from least to most severe, allowing filtering
/// and comparison operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    /// Unexpected but recoverable - operation continued with fallback.
    Warning,
    /// Serious issue - operation may have degraded behavior.
    Error,
    /// Critical invariant broken - stream state may be corrupted.
    Critical,
}

impl ViolationSeverity {
    /// Returns a string representation suitable for logging/metrics labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for ViolationSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categories of violations.
///
/// # Forward Compatibility
///
/// This enum is marked `#[non_exhaustive]`. Always include a wildcard arm when matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ViolationKind {
    /// The mutation engine produced something surprising.
    ///
    /// Examples:
    /// - An empty buffer on regeneration
    Engine,
    /// The cursor was somewhere a reader would not expect.
    ///
    /// Examples:
    /// - A read starting past the end of the buffer after an absolute seek
    Position,
    /// Configuration constraint violated.
    ///
    /// Examples:
    /// - An RNG asked for a value from an empty range
    Configuration,
    /// A snapshot was rejected on restore.
    ///
    /// Examples:
    /// - Unsupported version or a buffer checksum mismatch in `load_snapshot`
    Snapshot,
    /// Runtime invariant check failed.
    ///
    /// Only checked in debug builds or when `paranoid` feature is enabled.
    Invariant,
}

impl ViolationKind {
    /// Returns a string representation suitable for logging/metrics labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Engine => "engine",
            Self::Position => "position",
            Self::Configuration => "configuration",
            Self::Snapshot => "snapshot",
            Self::Invariant => "invariant",
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded violation.
///
/// # Example
///
/// ```
/// use fuzz_stream::telemetry::{Violation, ViolationKind, ViolationSeverity};
///
/// let violation = Violation::new(
///     ViolationSeverity::Warning,
///     ViolationKind::Engine,
///     "engine returned an empty buffer",
///     "mutating.rs:42",
/// )
/// .with_position(128)
/// .with_context("budget", "12");
///
/// assert_eq!(violation.position, Some(128));
/// assert_eq!(violation.context.get("budget").map(String::as_str), Some("12"));
/// ```
#[derive(Debug, Clone, serde::Serialize)]
pub struct Violation {
    /// The severity level of this violation.
    pub severity: ViolationSeverity,
    /// The category where the violation occurred.
    pub kind: ViolationKind,
    /// Human-readable description of what went wrong.
    pub message: String,
    /// Source location where the violation was detected (file:line).
    pub location: &'static str,
    /// The stream position at which the violation occurred, if applicable.
    pub position: Option<u64>,
    /// Additional structured context as key-value pairs.
    pub context: BTreeMap<String, String>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        severity: ViolationSeverity,
        kind: ViolationKind,
        message: impl Into<String>,
        location: &'static str,
    ) -> Self {
        Self {
            severity,
            kind,
            message: message.into(),
            location,
            position: None,
            context: BTreeMap::new(),
        }
    }

    /// Sets the stream position at which this violation occurred.
    #[must_use]
    pub fn with_position(mut self, position: u64) -> Self {
        self.position = Some(position);
        self
    }

    /// Adds a context key-value pair.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Serializes this violation to a JSON string.
    ///
    /// Returns `None` if serialization fails (which should not happen for
    /// well-formed violations).
    #[cfg(feature = "json")]
    #[must_use]
    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }

    /// Like [`to_json`](Self::to_json), but with indentation for readability.
    #[cfg(feature = "json")]
    #[must_use]
    pub fn to_json_pretty(&self) -> Option<String> {
        serde_json::to_string_pretty(self).ok()
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}/{}] {} (at {}",
            self.severity, self.kind, self.message, self.location
        )?;
        if let Some(position) = self.position {
            write!(f, ", position={position}")?;
        }
        if !self.context.is_empty() {
            write!(f, ", context={:?}", self.context)?;
        }
        write!(f, ")")
    }
}

/// Trait for observing violations.
///
/// Implement this trait to react to violations (logging, metrics, alerting).
///
/// ```
/// use fuzz_stream::telemetry::{Violation, ViolationObserver};
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// #[derive(Default)]
/// struct CountingObserver(AtomicUsize);
///
/// impl ViolationObserver for CountingObserver {
///     fn on_violation(&self, _violation: &Violation) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
/// ```
pub trait ViolationObserver: Send + Sync {
    /// Called when a violation is detected. Should be quick to execute.
    fn on_violation(&self, violation: &Violation);
}

/// Built-in observer that logs violations via the `tracing` crate.
///
/// - `Warning` severity → `tracing::warn!`
/// - `Error` and `Critical` severity → `tracing::error!`
///
/// All fields are emitted as structured tracing fields, so JSON formatters
/// from `tracing-subscriber` pick them up unchanged.
#[derive(Debug, Default, Clone)]
pub struct TracingObserver;

impl TracingObserver {
    /// Creates a new tracing observer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

}

impl ViolationObserver for TracingObserver {
    fn on_violation(&self, violation: &Violation) {
        let Violation {
            severity,
            kind,
            message,
            location,
            position,
            context,
        } = violation;

        if *severity == ViolationSeverity::Warning {
            tracing::warn!(
                severity = severity.as_str(),
                kind = kind.as_str(),
                location,
                position = ?position,
                context = ?context,
                "{message}"
            );
        } else {
            tracing::error!(
                severity = severity.as_str(),
                kind = kind.as_str(),
                location,
                position = ?position,
                context = ?context,
                "{message}"
            );
        }
    }
}

/// Built-in observer that collects violations for testing.
///
/// ```
/// use fuzz_stream::telemetry::{
///     CollectingObserver, Violation, ViolationKind, ViolationObserver, ViolationSeverity,
/// };
///
/// let observer = CollectingObserver::new();
/// observer.on_violation(&Violation::new(
///     ViolationSeverity::Warning,
///     ViolationKind::Position,
///     "read past end",
///     "test.rs:1",
/// ));
///
/// assert_eq!(observer.len(), 1);
/// assert!(observer.has_violation(ViolationKind::Position));
/// ```
#[derive(Debug, Default)]
pub struct CollectingObserver {
    violations: Mutex<Vec<Violation>>,
}

impl CollectingObserver {
    /// Creates a new collecting observer with an empty violation list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            violations: Mutex::new(Vec::new()),
        }
    }

    /// Returns a copy of all collected violations.
    #[must_use]
    pub fn violations(&self) -> Vec<Violation> {
        self.violations.lock().clone()
    }

    /// Returns the number of collected violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.lock().len()
    }

    /// Returns true if no violations have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.lock().is_empty()
    }

    /// Checks if any violation of the specified kind has been collected.
    #[must_use]
    pub fn has_violation(&self, kind: ViolationKind) -> bool {
        self.violations.lock().iter().any(|v| v.kind == kind)
    }

    /// Returns all violations matching the specified kind.
    #[must_use]
    pub fn violations_of_kind(&self, kind: ViolationKind) -> Vec<Violation> {
        self.violations
            .lock()
            .iter()
            .filter(|v| v.kind == kind)
            .cloned()
            .collect()
    }

    /// Clears all collected violations.
    pub fn clear(&self) {
        self.violations.lock().clear();
    }
}

impl ViolationObserver for CollectingObserver {
    fn on_violation(&self, violation: &Violation) {
        self.violations.lock().push(violation.clone());
    }
}

/// Reports a violation to an optional observer, falling back to [`TracingObserver`] if `None`.
pub fn report_to_observer(observer: Option<&Arc<dyn ViolationObserver>>, violation: &Violation) {
    match observer {
        Some(obs) => obs.on_violation(violation),
        None => TracingObserver.on_violation(violation),
    }
}

/// Reports a violation with location tracking via [`TracingObserver`].
///
/// # Syntax
///
/// ```text
/// report_violation!(severity, kind, "message");
/// report_violation!(severity, kind, "message with {}", format_args);
/// ```
#[macro_export]
macro_rules! report_violation {
    ($severity:expr, $kind:expr, $msg:literal) => {{
        use $crate::telemetry::ViolationObserver as _;
        let violation = $crate::telemetry::Violation::new(
            $severity,
            $kind,
            $msg,
            concat!(file!(), ":", line!()),
        );
        $crate::telemetry::TracingObserver.on_violation(&violation);
    }};

    ($severity:expr, $kind:expr, $fmt:literal, $($arg:tt)+) => {{
        use $crate::telemetry::ViolationObserver as _;
        let violation = $crate::telemetry::Violation::new(
            $severity,
            $kind,
            format!($fmt, $($arg)+),
            concat!(file!(), ":", line!()),
        );
        $crate::telemetry::TracingObserver.on_violation(&violation);
    }};
}

/// Reports a violation through an `Option<Arc<dyn ViolationObserver>>`,
/// falling back to [`TracingObserver`] when it is `None`.
///
/// The violation is built by the caller so position and context can be attached.
#[macro_export]
macro_rules! report_violation_to {
    ($observer:expr, $violation:expr) => {{
        let violation = $violation;
        $crate::telemetry::report_to_observer($observer.as_ref(), &violation);
    }};
}

/// Asserts that no violations have been collected.
///
/// # Panics
///
/// Panics if the observer contains any violations, printing them for debugging.
#[macro_export]
macro_rules! assert_no_violations {
    ($observer:expr) => {{
        let violations = $observer.violations();
        assert!(
            violations.is_empty(),
            "Expected no violations, but found {}:\n{:#?}",
            violations.len(),
            violations
        );
    }};
}

/// Asserts that a violation of the specified kind was collected.
///
/// # Panics
///
/// Panics if no violation of the specified kind was found.
#[macro_export]
macro_rules! assert_violation {
    ($observer:expr, $kind:expr) => {{
        assert!(
            $observer.has_violation($kind),
            "Expected violation of kind {:?}, but found: {:#?}",
            $kind,
            $observer.violations()
        );
    }};
}

// ==========================================
// Runtime Invariant Checking
// ==========================================

/// Describes which invariant of which type was broken.
#[derive(Debug, Clone, serde::Serialize)]
pub struct InvariantViolation {
    /// Name of the type whose invariant was violated.
    pub type_name: &'static str,
    /// Description of the violated invariant.
    pub invariant: String,
    /// Additional diagnostic context.
    pub details: Option<String>,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    #[must_use]
    pub fn new(type_name: &'static str, invariant: impl Into<String>) -> Self {
        Self {
            type_name,
            invariant: invariant.into(),
            details: None,
        }
    }

    /// Adds additional details to the violation.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.type_name, self.invariant)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

/// Trait for types that maintain internal invariants.
///
/// Checked at runtime in debug builds or when the `paranoid` feature is enabled.
pub trait InvariantChecker {
    /// Returns `Ok(())` if all invariants hold, or the first broken one.
    fn check_invariants(&self) -> Result<(), InvariantViolation>;
}

/// Checks invariants in debug builds (or with `paranoid`), reporting a
/// critical violation instead of panicking.
#[macro_export]
#[cfg(any(debug_assertions, feature = "paranoid"))]
macro_rules! debug_check_invariants {
    ($expr:expr, $context:expr) => {{
        use $crate::telemetry::InvariantChecker as _;
        if let Err(violation) = $expr.check_invariants() {
            $crate::report_violation!(
                $crate::telemetry::ViolationSeverity::Critical,
                $crate::telemetry::ViolationKind::Invariant,
                "{} [context: {}]",
                violation,
                $context
            );
        }
    }};
}

/// No-op version for release builds without `paranoid` feature.
#[macro_export]
#[cfg(not(any(debug_assertions, feature = "paranoid")))]
macro_rules! debug_check_invariants {
    ($expr:expr, $context:expr) => {{}};
}
