//! Time-and-leave accounting engine.
//!
//! [`Tracker`] owns the record store handle, the clock and the policy; the
//! operations live in the submodules as `impl Tracker` blocks.

pub mod activity;
pub mod aggregate;
pub mod calendar;
pub mod conflict;
pub mod leave;
pub mod report;

use std::sync::Arc;

use chrono::NaiveDate;

use crate::clock::Clock;
use crate::config::Policy;
use crate::store::RecordStore;
use crate::utils::user_locks::UserLocks;

pub use activity::ActivityReceipt;
pub use aggregate::{Dashboard, OverallProductivity, ProductivitySummary, UserProductivity};
pub use calendar::Period;
pub use leave::Decision;
pub use report::{DailyReport, DayKind, LogDay, ReportDay, ReportTotals};

pub struct Tracker {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    policy: Policy,
    locks: UserLocks,
}

impl Tracker {
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>, policy: Policy) -> Self {
        Self {
            store,
            clock,
            policy,
            locks: UserLocks::new(),
        }
    }

    /// Today in the organization's zone.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// The current month, used when a caller does not pick one.
    pub fn current_period(&self) -> Period {
        Period::of(self.today())
    }
}
