use chrono::{DateTime, FixedOffset, Utc};

/// IST, UTC+05:30. India observes no daylight saving, so a fixed offset is exact.
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

const IST: FixedOffset = match FixedOffset::east_opt(IST_OFFSET_SECS) {
    Some(offset) => offset,
    None => panic!("IST offset out of range"),
};

/// Renders stored UTC timestamps in the fixed display timezone.
#[derive(Debug, Clone, Copy)]
pub struct DisplayZone {
    offset: FixedOffset,
    pattern: &'static str,
}

impl DisplayZone {
    pub fn ist() -> Self {
        Self {
            offset: IST,
            pattern: "%Y-%m-%d %H:%M:%S IST",
        }
    }

    pub fn format(&self, at: &DateTime<Utc>) -> String {
        at.with_timezone(&self.offset)
            .format(self.pattern)
            .to_string()
    }

    /// Absent timestamps render as an empty string.
    pub fn format_opt(&self, at: Option<&DateTime<Utc>>) -> String {
        at.map(|t| self.format(t)).unwrap_or_default()
    }
}

impl Default for DisplayZone {
    fn default() -> Self {
        Self::ist()
    }
}
