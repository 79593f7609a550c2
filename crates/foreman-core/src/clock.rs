//! Time source and identifier sequence for record stores.
//!
//! Stores never read the wall clock directly. Production wires in
//! [`SystemClock`]; tests pin time with [`ManualClock`].

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeZone, Utc};

/// Source of "now" for timestamps and generated ids.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    #[must_use]
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(instant.timestamp_millis())),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        self.millis.store(instant.timestamp_millis(), Ordering::SeqCst);
    }

    pub fn advance_millis(&self, delta: i64) {
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let millis = self.millis.load(Ordering::SeqCst);
        Utc.timestamp_millis_opt(millis)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// Generates `<prefix>_<millis>` identifiers.
///
/// The millisecond component is `max(now, last + 1)`, so two creates in the
/// same millisecond (or under a frozen clock) still get distinct ids.
#[derive(Debug)]
pub struct IdSequence {
    prefix: &'static str,
    last: i64,
}

impl IdSequence {
    #[must_use]
    pub const fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            last: i64::MIN,
        }
    }

    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Next identifier for a record created at `now`.
    pub fn next_id(&mut self, now: DateTime<Utc>) -> String {
        let next = std::cmp::max(now.timestamp_millis(), self.last.saturating_add(1));
        self.last = next;
        format!("{}_{next}", self.prefix)
    }

    /// Advance past an id that was assigned elsewhere (seed data), so
    /// generated ids never collide with it.
    ///
    /// Suffixes past the last representable instant are ignored; they are
    /// not timestamps and would leave `next_id` no room to count up.
    pub fn observe(&mut self, id: &str) {
        let Some(rest) = id
            .strip_prefix(self.prefix)
            .and_then(|r| r.strip_prefix('_'))
        else {
            return;
        };
        if let Ok(millis) = rest.parse::<i64>()
            && millis <= DateTime::<Utc>::MAX_UTC.timestamp_millis()
        {
            self.last = self.last.max(millis);
        }
    }
}
