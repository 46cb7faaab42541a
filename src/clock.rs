use chrono::{DateTime, Local, TimeZone};

/// Turn stamp for the current local time, e.g. `03:07 PM`.
pub fn now_display() -> String {
    format_clock(&Local::now())
}

pub fn format_clock<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%I:%M %p").to_string()
}

pub fn now_ms() -> i64 {
    Local::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_clock_pads_hour_and_minute() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 15, 7, 42).unwrap();
        assert_eq!(format_clock(&t), "03:07 PM");
    }

    #[test]
    fn test_format_clock_morning() {
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        assert_eq!(format_clock(&t), "09:30 AM");
    }
}
