use crate::handlers::Dispatcher;
use crate::types::{BotError, Result};
use chrono::{DateTime, Days, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{error, info};

// Longest transition gap in the tz database is a day-line shift.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// A fixed wall-clock time of day in a fixed timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    pub hour: u32,
    pub minute: u32,
    pub timezone: Tz,
}

impl Default for DailySchedule {
    fn default() -> Self {
        Self {
            hour: 9,
            minute: 0,
            timezone: chrono_tz::Europe::London,
        }
    }
}

impl DailySchedule {
    pub fn new(hour: u32, minute: u32, timezone: Tz) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(BotError::Config(format!(
                "Invalid time of day {:02}:{:02}",
                hour, minute
            )));
        }
        Ok(Self {
            hour,
            minute,
            timezone,
        })
    }

    /// Accepts `M H * * *` with a fixed minute and hour.
    pub fn from_cron(expression: &str, timezone: &str) -> Result<Self> {
        let timezone: Tz = timezone
            .parse()
            .map_err(|e| BotError::Config(format!("Unknown timezone {}: {}", timezone, e)))?;

        let fields: Vec<&str> = expression.split_whitespace().collect();
        let invalid = || BotError::Config(format!("Unsupported schedule expression: {}", expression));

        if fields.len() != 5 || fields[2..].iter().any(|field| *field != "*") {
            return Err(invalid());
        }
        let minute = fields[0].parse::<u32>().map_err(|_| invalid())?;
        let hour = fields[1].parse::<u32>().map_err(|_| invalid())?;

        Self::new(hour, minute, timezone)
    }

    /// Next occurrence strictly after `now`. A time skipped by a DST jump
    /// fires at the earliest valid instant, when the gap ends.
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let mut date = now.with_timezone(&self.timezone).date_naive();

        for _ in 0..3 {
            if let Some(naive) = date.and_hms_opt(self.hour, self.minute, 0) {
                if let Some(local) = self.resolve_local(naive) {
                    let candidate = local.with_timezone(&Utc);
                    if candidate > now {
                        return candidate;
                    }
                }
            }
            match date.checked_add_days(Days::new(1)) {
                Some(next) => date = next,
                None => break,
            }
        }

        now + Duration::days(1)
    }

    /// Earliest instant at or after the wall-clock time `naive`. Inside a
    /// DST gap that is the moment the clocks jump forward.
    fn resolve_local(&self, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
        (0..=MAX_GAP_MINUTES)
            .map(|minutes| naive + Duration::minutes(minutes))
            .find_map(|candidate| self.timezone.from_local_datetime(&candidate).earliest())
    }

    pub fn label(&self) -> String {
        format!("{:02}:{:02} ({})", self.hour, self.minute, self.timezone)
    }
}

/// Sends the digest to every user with stored preferences, one at a time.
/// Returns how many deliveries succeeded.
pub async fn trigger(dispatcher: &Dispatcher) -> usize {
    let users = dispatcher.preferences().users().await;
    info!("Daily digest run for {} users", users.len());

    let mut delivered = 0;
    for user in users {
        match dispatcher.send_digest(user).await {
            Ok(()) => delivered += 1,
            Err(e) => error!("Daily digest for user {} failed: {}", user, e),
        }
    }

    info!("Daily digest run finished: {} delivered", delivered);
    delivered
}

pub struct Scheduler {
    schedule: DailySchedule,
    dispatcher: Arc<Dispatcher>,
}

impl Scheduler {
    pub fn new(schedule: DailySchedule, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            schedule,
            dispatcher,
        }
    }

    /// Runs forever. A tick missed while the process was down is not replayed.
    pub async fn run(self) {
        loop {
            let now = Utc::now();
            let next = self.schedule.next_after(now);
            let wait = (next - now).to_std().unwrap_or_default();
            info!("Next daily digest at {} ({:?} from now)", next, wait);

            tokio::time::sleep(wait).await;
            trigger(&self.dispatcher).await;
        }
    }
}
