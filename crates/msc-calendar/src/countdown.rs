use std::fmt;

use serde::{Deserialize, Serialize};

const SECS_PER_DAY: i64 = 86_400;
const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_MINUTE: i64 = 60;

/// Display units of a countdown.
///
/// `hours`, `minutes` and `seconds` are always two digits. `days` is present
/// only when at least one whole day remains; it is plain integer text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<String>,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl Countdown {
    pub fn zero() -> Self {
        Self {
            days: None,
            hours: "00".to_string(),
            minutes: "00".to_string(),
            seconds: "00".to_string(),
        }
    }

    /// Whole seconds represented by the fields. Unparseable fields count as 0.
    pub fn total_seconds(&self) -> i64 {
        let field = |s: &str| s.parse::<i64>().unwrap_or(0);
        let days = self.days.as_deref().map_or(0, field);
        days * SECS_PER_DAY
            + field(&self.hours) * SECS_PER_HOUR
            + field(&self.minutes) * SECS_PER_MINUTE
            + field(&self.seconds)
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(days) = &self.days {
            write!(f, "{days}d ")?;
        }
        write!(f, "{}:{}:{}", self.hours, self.minutes, self.seconds)
    }
}

/// Split a millisecond duration into display units. Sub-second remainders are
/// truncated; non-positive input yields [`Countdown::zero`].
pub fn format_countdown(millis: i64) -> Countdown {
    if millis <= 0 {
        return Countdown::zero();
    }

    let total = millis / 1_000;
    let days = total / SECS_PER_DAY;
    let hours = (total % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (total % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total % SECS_PER_MINUTE;

    Countdown {
        days: (days > 0).then(|| days.to_string()),
        hours: format!("{hours:02}"),
        minutes: format!("{minutes:02}"),
        seconds: format!("{seconds:02}"),
    }
}
