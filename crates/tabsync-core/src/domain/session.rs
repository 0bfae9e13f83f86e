//! Session values and the immutable construction payload.
//!
//! The host never interprets the session value: it is an opaque string minted
//! by the embedded application (or absent entirely) and passed through
//! unmodified in both directions.  Wrapping it in a newtype keeps it from
//! being confused with storage keys, mount ids, or any other plain string
//! flowing through the host.
//!
//! # The construction payload
//!
//! At bootstrap the host hands the embedded application a one-shot, immutable
//! [`InitFlags`] value:
//!
//! ```text
//! InitFlags {
//!     session: Option<SessionValue>,   // whatever the store held at load
//!     today:   Option<DateStamp>,      // only in the date-flag deployment
//! }
//! ```
//!
//! The flags are computed exactly once.  Nothing updates them afterwards;
//! later session changes travel through the inbound port as
//! [`SessionNotice`] values instead.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ── Session value ─────────────────────────────────────────────────────────────

/// An opaque session value.
///
/// The content is owned by the embedded application; the host stores and
/// forwards it verbatim.  Absence (no session) is modelled as
/// `Option<SessionValue>`, never as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionValue(String);

impl SessionValue {
    /// Wraps a raw string as a session value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the underlying string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the owned string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for SessionValue {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SessionValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for SessionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Date stamp ────────────────────────────────────────────────────────────────

/// A plain calendar date record `{day, month, year}`.
///
/// Computed once from the wall clock at bootstrap in the date-flag deployment
/// variant and passed as part of [`InitFlags`].  It is never refreshed: an
/// application left open across midnight keeps the date it was constructed
/// with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateStamp {
    /// Day of month, 1-31.
    pub day: u32,
    /// Month of year, 1-12.
    pub month: u32,
    /// Calendar year (e.g., 2026).
    pub year: i32,
}

impl DateStamp {
    /// Reads the current local date from the wall clock.
    pub fn today() -> Self {
        Self::from_date(chrono::Local::now().date_naive())
    }

    /// Converts a `chrono` calendar date into the plain record shape.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            day: date.day(),
            month: date.month(),
            year: date.year(),
        }
    }
}

// ── Construction flags ────────────────────────────────────────────────────────

/// Shape of the construction-time flag payload.
///
/// The deployment variants disagree on what the embedded application expects
/// at construction: the session value alone, or the session value together
/// with the current date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlagPayload {
    /// The stored session value only.
    TokenOnly,
    /// The stored session value plus a [`DateStamp`] for the current date.
    TokenWithDate,
}

/// The immutable initialization payload handed to the embedded application.
///
/// Built exactly once at bootstrap and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitFlags {
    /// The session value read from storage at load, or `None` if the
    /// designated entry was unset.
    pub session: Option<SessionValue>,
    /// The current date, present only when the deployment's payload shape is
    /// [`FlagPayload::TokenWithDate`].
    pub today: Option<DateStamp>,
}

impl InitFlags {
    /// Builds the flags from the stored session value, reading the wall clock
    /// only when the payload shape requires a date.
    pub fn build(stored: Option<SessionValue>, payload: FlagPayload) -> Self {
        let today = matches!(payload, FlagPayload::TokenWithDate).then(DateStamp::today);
        Self {
            session: stored,
            today,
        }
    }

    /// Builds the flags with an explicit date, for callers that already hold
    /// one (tests, replay tooling).
    pub fn build_at(stored: Option<SessionValue>, payload: FlagPayload, today: DateStamp) -> Self {
        Self {
            session: stored,
            today: matches!(payload, FlagPayload::TokenWithDate).then_some(today),
        }
    }
}

// ── Inbound notification ──────────────────────────────────────────────────────

/// A session change observed in another browsing context, delivered to the
/// embedded application through its inbound port.
///
/// `new_value` is `None` when the other context removed the entry.  The host
/// forwards whatever the change event carried; it never substitutes a
/// default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionNotice {
    /// The value the storage entry now holds.
    pub new_value: Option<SessionValue>,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
