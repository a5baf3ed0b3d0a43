use chrono::{DateTime, SecondsFormat, TimeZone, Timelike, Utc};

/// Format a wall-clock time as unpadded H:M:S.ms
pub fn log_timestamp<Tz: TimeZone>(time: &DateTime<Tz>) -> String {
    format!(
        "{}:{}:{}.{}",
        time.hour(),
        time.minute(),
        time.second(),
        time.timestamp_subsec_millis()
    )
}

/// First instant of the given time's local calendar date
///
/// Usually local midnight. Where a DST jump skips midnight, the first local
/// time that exists on that date is used instead.
pub fn start_of_day<Tz: TimeZone>(time: &DateTime<Tz>) -> DateTime<Utc> {
    let tz = time.timezone();
    let date = time.date_naive();
    let mut local = date.and_time(chrono::NaiveTime::MIN);

    while local.date() == date {
        match tz.from_local_datetime(&local) {
            chrono::LocalResult::Single(dt) => return dt.with_timezone(&Utc),
            chrono::LocalResult::Ambiguous(earliest, _) => return earliest.with_timezone(&Utc),
            chrono::LocalResult::None => local += chrono::Duration::minutes(15),
        }
    }

    // No resolvable local time before `time` itself
    time.with_timezone(&Utc)
}

/// ISO-8601 UTC timestamp with millisecond precision
pub fn to_iso_millis(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_log_timestamp_is_unpadded() {
        let time = Utc.with_ymd_and_hms(2023, 1, 1, 9, 5, 3).unwrap()
            + chrono::Duration::milliseconds(42);
        assert_eq!(log_timestamp(&time), "9:5:3.42");
    }

    #[test]
    fn test_start_of_day_fixed_offset() {
        // 20:00 in Chicago standard time
        let offset = FixedOffset::west_opt(6 * 3600).unwrap();
        let now = offset.with_ymd_and_hms(2024, 3, 10, 20, 0, 0).unwrap();
        let midnight = start_of_day(&now);
        assert_eq!(to_iso_millis(&midnight), "2024-03-10T06:00:00.000Z");
    }

    #[test]
    fn test_start_of_day_utc() {
        let now = Utc.with_ymd_and_hms(2023, 1, 4, 23, 59, 59).unwrap();
        assert_eq!(to_iso_millis(&start_of_day(&now)), "2023-01-04T00:00:00.000Z");
    }

    #[test]
    fn test_start_of_day_named_zone_across_dst() {
        // DST starts in Chicago at 02:00 on this date; midnight is still CST
        let now = chrono_tz::America::Chicago
            .with_ymd_and_hms(2024, 3, 10, 20, 0, 0)
            .unwrap();
        assert_eq!(to_iso_millis(&start_of_day(&now)), "2024-03-10T06:00:00.000Z");
    }

    #[test]
    fn test_start_of_day_when_dst_skips_midnight() {
        // Sao Paulo jumped from 00:00 straight to 01:00 on this date
        let now = chrono_tz::America::Sao_Paulo
            .with_ymd_and_hms(2018, 11, 4, 12, 0, 0)
            .unwrap();
        let start = start_of_day(&now);
        assert_eq!(to_iso_millis(&start), "2018-11-04T03:00:00.000Z");
        assert_eq!(
            start.with_timezone(&chrono_tz::America::Sao_Paulo).date_naive(),
            now.date_naive()
        );
    }
}
