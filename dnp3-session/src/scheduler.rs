//! Periodic class-based scan scheduling
//!
//! The scheduler keeps a table of scan tasks and advances it from an
//! externally supplied clock: callers invoke [`ScanScheduler::tick`] with
//! `now`, and any task whose fire time has been reached emits exactly one
//! class poll and is rescheduled to `now + period`. Rescheduling is
//! fixed-period rather than drift-corrected, which also suppresses
//! re-firing when `tick` is called more often than the period.
//!
//! Scan failures are never fatal: if the channel is not open when a task
//! comes due, the firing is skipped silently and the task simply waits for
//! its next period.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use dnp3_core::{ClassField, Dnp3Error, Dnp3Result};

use crate::channel::RequestChannel;

/// Handle identifying one registered scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanHandle(u32);

#[derive(Debug)]
struct ScanTask {
    classes: ClassField,
    period: Duration,
    next_fire: Instant,
}

/// Table of periodic scan tasks
///
/// Overlapping class masks across tasks are permitted and independent; no
/// de-duplication is performed. The usual configuration is exactly two
/// tasks: a slow integrity scan over all classes and a fast exception scan
/// over the event classes.
#[derive(Debug, Default)]
pub struct ScanScheduler {
    // BTreeMap so tasks due at the same instant fire in registration order
    tasks: BTreeMap<u32, ScanTask>,
    next_id: u32,
}

impl ScanScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a periodic scan
    ///
    /// The first firing happens one full period after `now`.
    ///
    /// # Errors
    /// Returns a configuration error for a zero period or an empty class
    /// mask; both would make the task meaningless.
    pub fn add_scan(
        &mut self,
        classes: ClassField,
        period: Duration,
        now: Instant,
    ) -> Dnp3Result<ScanHandle> {
        if period.is_zero() {
            return Err(Dnp3Error::Configuration(
                "scan period must be non-zero".to_string(),
            ));
        }
        if classes.is_empty() {
            return Err(Dnp3Error::Configuration(
                "scan class mask must not be empty".to_string(),
            ));
        }

        let id = self.next_id;
        self.next_id += 1;
        self.tasks.insert(
            id,
            ScanTask {
                classes,
                period,
                next_fire: now + period,
            },
        );
        log::debug!("registered scan {:?} every {:?} ({})", id, period, classes);
        Ok(ScanHandle(id))
    }

    /// Remove a scan; returns whether the handle was known
    pub fn cancel(&mut self, handle: ScanHandle) -> bool {
        self.tasks.remove(&handle.0).is_some()
    }

    /// Remove every scan (session teardown)
    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The earliest fire time of any task, for drivers that want to sleep
    /// instead of polling
    pub fn next_due(&self) -> Option<Instant> {
        self.tasks.values().map(|t| t.next_fire).min()
    }

    /// Advance time and fire due tasks
    ///
    /// Each due task emits exactly one class poll and is rescheduled to
    /// `now + period` whether or not the poll could be sent. A channel that
    /// is not open, or that rejects the poll, only costs the task this one
    /// firing.
    pub async fn tick(&mut self, now: Instant, channel: &dyn RequestChannel) {
        for (id, task) in self.tasks.iter_mut() {
            if task.next_fire > now {
                continue;
            }
            task.next_fire = now + task.period;

            if !channel.state().is_open() {
                log::debug!(
                    "scan {} due but channel is {}, retrying next period",
                    id,
                    channel.state().as_str()
                );
                continue;
            }
            if let Err(err) = channel.class_poll(task.classes).await {
                log::warn!("scan {} poll failed: {}", id, err);
            } else {
                log::trace!("scan {} fired ({})", id, task.classes);
            }
        }
    }
}
