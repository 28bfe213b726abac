//! Daily reset timer

use chrono::{DateTime, Local, NaiveTime, TimeDelta, TimeZone};
use tracing::{debug, error, info};

use crate::state::{StateError, StateManager, StateResponse};

/// Longest DST gap searched past a nonexistent local time
const MAX_GAP_MINUTES: i64 = 180;

/// The first instant strictly after `after` whose local time is `at`
///
/// If `at` does not exist on a day (clocks jump over it), that day's
/// occurrence is the first valid local minute after it. If it occurs twice,
/// the earlier instant is used.
pub fn next_fire<Tz: TimeZone>(after: &DateTime<Tz>, at: NaiveTime) -> DateTime<Tz> {
    let tz = after.timezone();

    after
        .date_naive()
        .iter_days()
        .find_map(|date| {
            let naive = date.and_time(at);
            let occurrence = tz.from_local_datetime(&naive).earliest().or_else(|| {
                (1..=MAX_GAP_MINUTES)
                    .find_map(|m| tz.from_local_datetime(&(naive + TimeDelta::minutes(m))).earliest())
            })?;
            (occurrence > *after).then_some(occurrence)
        })
        .unwrap_or_else(|| after.clone() + TimeDelta::days(1))
}

/// Recurring reset of all checklists at a fixed local time
pub struct DailyReset {
    state: StateManager,
    at: NaiveTime,
}

impl DailyReset {
    pub fn new(state: StateManager, at: NaiveTime) -> Self {
        debug!(%at, "DailyReset::new: called");
        Self { state, at }
    }

    /// Run one reset now, returning the number of flags cleared
    pub async fn fire(&self) -> StateResponse<usize> {
        info!("Running daily reset at {}", Local::now());
        let cleared = self.state.reset_all().await?;
        info!(cleared, "Daily reset complete");
        Ok(cleared)
    }

    /// Run the timer loop
    ///
    /// This runs until the StateManager shuts down.
    pub async fn run(self) {
        info!(at = %self.at, "DailyReset started");
        let mut last_fire: Option<DateTime<Local>> = None;

        loop {
            let now = Local::now();
            let from = last_fire.map_or(now, |last| last.max(now));
            let next = next_fire(&from, self.at);
            let wait = (next - now).to_std().unwrap_or_default();
            info!(next = %next, wait_secs = wait.as_secs(), "Next daily reset scheduled");

            tokio::time::sleep(wait).await;
            last_fire = Some(next);

            match self.fire().await {
                Ok(_) => {}
                Err(StateError::ChannelError) => {
                    info!("StateManager gone, stopping DailyReset");
                    break;
                }
                Err(e) => {
                    error!(error = %e, "Daily reset failed");
                }
            }
        }
    }
}
