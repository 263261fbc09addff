//! Structured security event logging.
//!
//! Every security-relevant operation in the core emits an [`Event`]:
//! login attempts and outcomes, registration, MFA enrollment and
//! verification, role changes, and rate-limit rejections. Events carry
//! timestamp, type, outcome, the principal involved when known, and
//! free-form details.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event type categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    // Authentication events
    /// Login completed.
    Login,
    /// Login failed.
    LoginError,
    /// Logout.
    Logout,
    /// Login rejected by the rate limiter.
    RateLimited,

    // Account events
    /// Principal registered.
    Register,
    /// Registration failed.
    RegisterError,
    /// Principal role changed.
    RoleChanged,

    // MFA events
    /// MFA enrollment started (secret generated, not yet confirmed).
    MfaEnrollStarted,
    /// MFA enrollment confirmed.
    MfaEnrollConfirmed,
    /// MFA code verified during login.
    MfaVerify,
    /// MFA code rejected.
    MfaVerifyError,
}

/// Outcome of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOutcome {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Failure,
}

/// A security event for audit logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub id: Uuid,

    /// Timestamp of the event.
    pub timestamp: DateTime<Utc>,

    /// Type of event.
    pub event_type: EventType,

    /// Outcome of the event.
    pub outcome: EventOutcome,

    /// Principal the event concerns, when resolved.
    pub principal_id: Option<Uuid>,

    /// Login identifier as submitted (normalized).
    pub identifier: Option<String>,

    /// Source IP address, when the transport supplies one.
    pub ip_address: Option<String>,

    /// Session or ticket identifier involved.
    pub session_id: Option<String>,

    /// Error message (for failure events).
    pub error: Option<String>,

    /// Additional details as key-value pairs.
    pub details: Vec<(String, String)>,
}

impl Event {
    /// Creates a new event builder.
    #[must_use]
    pub const fn builder(event_type: EventType) -> EventBuilder {
        EventBuilder::new(event_type)
    }
}

/// Builder for creating events.
pub struct EventBuilder {
    event_type: EventType,
    outcome: EventOutcome,
    principal_id: Option<Uuid>,
    identifier: Option<String>,
    ip_address: Option<String>,
    session_id: Option<String>,
    error: Option<String>,
    details: Vec<(String, String)>,
}

impl EventBuilder {
    /// Creates a new event builder.
    #[must_use]
    pub const fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            outcome: EventOutcome::Success,
            principal_id: None,
            identifier: None,
            ip_address: None,
            session_id: None,
            error: None,
            details: Vec::new(),
        }
    }

    /// Sets the outcome to success.
    #[must_use]
    pub const fn success(mut self) -> Self {
        self.outcome = EventOutcome::Success;
        self
    }

    /// Sets the outcome to failure with an error message.
    #[must_use]
    pub fn failure(mut self, error: impl Into<String>) -> Self {
        self.outcome = EventOutcome::Failure;
        self.error = Some(error.into());
        self
    }

    /// Sets the principal ID.
    #[must_use]
    pub const fn principal(mut self, principal_id: Uuid) -> Self {
        self.principal_id = Some(principal_id);
        self
    }

    /// Sets the submitted identifier.
    #[must_use]
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Sets the source IP address.
    #[must_use]
    pub fn ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    /// Sets the session or ticket identifier.
    #[must_use]
    pub fn session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Adds a detail key-value pair.
    #[must_use]
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push((key.into(), value.into()));
        self
    }

    /// Builds the event.
    #[must_use]
    pub fn build(self) -> Event {
        Event {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            event_type: self.event_type,
            outcome: self.outcome,
            principal_id: self.principal_id,
            identifier: self.identifier,
            ip_address: self.ip_address,
            session_id: self.session_id,
            error: self.error,
            details: self.details,
        }
    }
}

/// Trait for logging security events.
///
/// Implementations can write to various destinations: the tracing
/// framework, a database, or an in-memory buffer for tests.
#[async_trait]
pub trait EventLogger: Send + Sync {
    /// Logs an event. Logging failures are swallowed by callers; audit
    /// sinks must not abort the operation they describe.
    async fn log(&self, event: Event);
}

/// Event logger that writes to the tracing framework.
///
/// Events are logged as structured fields at the INFO level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventLogger;

impl TracingEventLogger {
    /// Creates a new tracing logger.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventLogger for TracingEventLogger {
    async fn log(&self, event: Event) {
        tracing::info!(
            event_id = %event.id,
            event_type = ?event.event_type,
            outcome = ?event.outcome,
            principal_id = ?event.principal_id,
            identifier = ?event.identifier,
            ip_address = ?event.ip_address,
            error = ?event.error,
            "auth_event"
        );
    }
}

/// In-memory event logger for testing.
#[derive(Debug, Default)]
pub struct InMemoryEventLogger {
    events: std::sync::RwLock<Vec<Event>>,
}

impl InMemoryEventLogger {
    /// Creates a new in-memory logger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all logged events.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events.read().unwrap().clone()
    }

    /// Returns how many events of a given type were logged.
    #[must_use]
    pub fn count_of(&self, event_type: EventType) -> usize {
        self.events
            .read()
            .unwrap()
            .iter()
            .filter(|e| e.event_type == event_type)
            .count()
    }

    /// Clears all logged events.
    pub fn clear(&self) {
        self.events.write().unwrap().clear();
    }
}

#[async_trait]
impl EventLogger for InMemoryEventLogger {
    async fn log(&self, event: Event) {
        self.events.write().unwrap().push(event);
    }
}
