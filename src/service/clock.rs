use chrono::{DateTime, SubsecRound, Utc};

/// Source of wall-clock time for check-in and check-out stamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock at microsecond precision, the resolution of the `DATETIME(6)`
/// columns, so a stamp reads back exactly as it was returned.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_has_no_sub_microsecond_part() {
        for _ in 0..100 {
            assert_eq!(SystemClock.now().timestamp_subsec_nanos() % 1_000, 0);
        }
    }
}
