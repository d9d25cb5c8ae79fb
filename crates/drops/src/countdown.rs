//! Time-remaining arithmetic shared by the lifecycle sweep and any
//! countdown-rendering consumer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Remaining time until launch, broken into display units.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub is_live: bool,
}

impl Countdown {
    pub const LIVE: Countdown = Countdown {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        is_live: true,
    };
}

/// Pure function of `(now, launch_date)`. Once `now >= launch_date` all
/// components are zero and `is_live` is set.
pub fn countdown(now: DateTime<Utc>, launch_date: DateTime<Utc>) -> Countdown {
    let remaining = launch_date - now;
    if remaining.num_seconds() <= 0 {
        return Countdown::LIVE;
    }

    let total_seconds = remaining.num_seconds();
    Countdown {
        days: total_seconds / 86_400,
        hours: (total_seconds % 86_400) / 3_600,
        minutes: (total_seconds % 3_600) / 60,
        seconds: total_seconds % 60,
        is_live: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn counts_down_component_wise() {
        let now = Utc::now();
        let launch = now + Duration::days(2) + Duration::hours(3) + Duration::minutes(4) + Duration::seconds(5);
        let c = countdown(now, launch);
        assert_eq!((c.days, c.hours, c.minutes, c.seconds), (2, 3, 4, 5));
        assert!(!c.is_live);
    }

    #[test]
    fn at_or_after_launch_is_live_with_zeroes() {
        let now = Utc::now();
        assert_eq!(countdown(now, now), Countdown::LIVE);
        assert_eq!(countdown(now, now - Duration::hours(1)), Countdown::LIVE);
    }

    #[test]
    fn sub_second_remainder_rounds_down_to_live() {
        let now = Utc::now();
        let c = countdown(now, now + Duration::milliseconds(400));
        assert!(c.is_live);
    }
}
