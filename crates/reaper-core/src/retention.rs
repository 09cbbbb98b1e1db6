//! Retention window and per-job eligibility.
//!
//! A job's artifacts are eligible for deletion when the job has at least one
//! artifact and finished strictly before the cutoff instant. The cutoff is
//! always passed in explicitly so evaluation never depends on the wall clock.

use std::fmt;
use std::str::FromStr;

use jiff::tz::TimeZone;
use jiff::{Span, Timestamp};
use strum::{AsRefStr, Display};

use crate::types::Job;
use crate::{Error, Result};

/// Tracing target for retention evaluation.
pub const TRACING_TARGET: &str = "reaper_core::retention";

/// How far back artifacts are kept.
///
/// Parsed from a bare day count (`28`) or a span in friendly or ISO 8601
/// form (`4w`, `30 days`, `P4W`).
#[derive(Debug, Clone, Copy)]
pub struct RetentionWindow {
    span: Span,
}

impl RetentionWindow {
    /// Creates a window from a span, rejecting negative spans.
    pub fn new(span: Span) -> Result<Self> {
        if span.is_negative() {
            return Err(Error::invalid_input()
                .with_message(format!("Retention window '{span}' must not be negative")));
        }
        Ok(Self { span })
    }

    /// Creates a window of whole days.
    pub fn days(days: u32) -> Result<Self> {
        let span = Span::new().try_days(i64::from(days))?;
        Self::new(span)
    }

    /// Returns the window as a span.
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Computes the cutoff instant by stepping back from `now` in UTC.
    pub fn cutoff_from(&self, now: Timestamp) -> Result<Timestamp> {
        let cutoff = now.to_zoned(TimeZone::UTC).checked_sub(self.span)?;
        Ok(cutoff.timestamp())
    }
}

impl Default for RetentionWindow {
    fn default() -> Self {
        Self {
            span: Span::new().weeks(4),
        }
    }
}

impl fmt::Display for RetentionWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.span)
    }
}

impl FromStr for RetentionWindow {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            let days = s.parse::<u32>().map_err(|e| {
                Error::invalid_input()
                    .with_message(format!("Retention window '{s}' is out of range"))
                    .with_source(e)
            })?;
            return Self::days(days);
        }

        let span = s.parse::<Span>().map_err(|e| {
            Error::invalid_input()
                .with_message(format!("Retention window '{s}' is not a valid span"))
                .with_source(e)
        })?;
        Self::new(span)
    }
}

/// Why a job's artifacts are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    /// The job has no artifacts.
    NoArtifacts,
    /// The job has not finished.
    Unfinished,
    /// The job finished at or after the cutoff.
    TooRecent,
}

/// Outcome of evaluating a job against the cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The job's artifacts should be deleted.
    Eligible,
    /// The job's artifacts are kept.
    Skipped(SkipReason),
}

/// Eligibility of a job together with its artifact size.
///
/// The size is reported for skipped jobs as well so callers can tell an
/// empty job apart from a recent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// Whether the artifacts should be deleted.
    pub decision: Decision,
    /// Combined size of the job's artifacts.
    pub byte_total: u64,
}

impl Evaluation {
    /// Returns `true` if the job's artifacts should be deleted.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        matches!(self.decision, Decision::Eligible)
    }
}

/// Parses a job completion time.
pub fn parse_finished_at(raw: &str) -> Result<Timestamp> {
    raw.parse::<Timestamp>().map_err(|e| {
        Error::malformed_timestamp()
            .with_message(format!("Cannot parse finished_at '{raw}'"))
            .with_source(e)
    })
}

/// Decides whether `job`'s artifacts fall before `cutoff`.
///
/// # Errors
///
/// Returns a [`MalformedTimestamp`](crate::ErrorKind::MalformedTimestamp)
/// error if the job has artifacts and its completion time cannot be parsed.
pub fn evaluate(job: &Job, cutoff: Timestamp) -> Result<Evaluation> {
    let byte_total = job.byte_total();
    let skipped = |reason| Evaluation {
        decision: Decision::Skipped(reason),
        byte_total,
    };

    if !job.has_artifacts() {
        return Ok(skipped(SkipReason::NoArtifacts));
    }

    let Some(raw) = job.finished_at.as_deref() else {
        return Ok(skipped(SkipReason::Unfinished));
    };

    let finished_at = parse_finished_at(raw).map_err(|e| e.with_context(format!("job {}", job.id)))?;
    if finished_at < cutoff {
        Ok(Evaluation {
            decision: Decision::Eligible,
            byte_total,
        })
    } else {
        Ok(skipped(SkipReason::TooRecent))
    }
}
