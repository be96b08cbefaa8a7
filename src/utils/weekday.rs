use chrono::Datelike;

use crate::model::store::DatePresence;
use crate::utils::time_math::{Mean, interval, mean, seconds_since_midnight, seconds_to_clock_string};

/// Display labels indexed Monday = 0 .. Sunday = 6.
pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Presence intervals (seconds) per weekday.
pub type DurationBuckets = [Vec<i64>; 7];

/// Start/end seconds since midnight for one weekday, as parallel lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartEnd {
    pub starts: Vec<i64>,
    pub ends: Vec<i64>,
}

pub type StartEndBuckets = [StartEnd; 7];

pub fn group_durations_by_weekday(days: &DatePresence) -> DurationBuckets {
    let mut result = DurationBuckets::default();
    for (date, presence) in days {
        let weekday = date.weekday().num_days_from_monday() as usize;
        result[weekday].push(interval(presence.start, presence.end));
    }
    result
}

/// Dates are visited in ascending order, so the parallel lists are
/// reproducible.
pub fn group_start_end_by_weekday(days: &DatePresence) -> StartEndBuckets {
    let mut result = StartEndBuckets::default();
    for (date, presence) in days {
        let bucket = &mut result[date.weekday().num_days_from_monday() as usize];
        bucket.starts.push(seconds_since_midnight(presence.start));
        bucket.ends.push(seconds_since_midnight(presence.end));
    }
    result
}

pub fn mean_durations_per_weekday(buckets: &DurationBuckets) -> [Mean; 7] {
    std::array::from_fn(|weekday| mean(&buckets[weekday]))
}

pub fn total_durations_per_weekday(buckets: &DurationBuckets) -> [i64; 7] {
    std::array::from_fn(|weekday| buckets[weekday].iter().sum())
}

pub fn mean_start_end_per_weekday(buckets: &StartEndBuckets) -> [(String, String); 7] {
    std::array::from_fn(|weekday| {
        let bucket = &buckets[weekday];
        (
            seconds_to_clock_string(mean(&bucket.starts).as_seconds()),
            seconds_to_clock_string(mean(&bucket.ends).as_seconds()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::Presence;
    use chrono::{NaiveDate, NaiveTime};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn presence(start: (u32, u32, u32), end: (u32, u32, u32)) -> Presence {
        Presence {
            start: NaiveTime::from_hms_opt(start.0, start.1, start.2).unwrap(),
            end: NaiveTime::from_hms_opt(end.0, end.1, end.2).unwrap(),
        }
    }

    /// 2013-09-05 and 2013-09-12 are Thursdays, 2013-09-09 is a Monday.
    fn sample_days() -> DatePresence {
        let mut days = DatePresence::new();
        days.insert(day(2013, 9, 12), presence((9, 28, 8), (15, 51, 27)));
        days.insert(day(2013, 9, 9), presence((9, 12, 14), (15, 54, 17)));
        days.insert(day(2013, 9, 5), presence((10, 18, 36), (16, 41, 25)));
        days.insert(day(2013, 9, 13), presence((13, 16, 56), (15, 4, 2)));
        days
    }

    #[test]
    fn durations_are_bucketed_by_weekday() {
        let grouped = group_durations_by_weekday(&sample_days());
        assert_eq!(
            grouped,
            [
                vec![24_123],
                vec![],
                vec![],
                vec![22_969, 22_999],
                vec![6_426],
                vec![],
                vec![],
            ]
        );
    }

    #[test]
    fn start_end_lists_follow_date_order() {
        let grouped = group_start_end_by_weekday(&sample_days());
        assert_eq!(grouped.len(), 7);
        assert_eq!(grouped[0].starts, vec![33_134]);
        assert_eq!(grouped[0].ends, vec![57_257]);
        assert_eq!(grouped[3].starts, vec![37_116, 34_088]);
        assert_eq!(grouped[3].ends, vec![60_085, 57_087]);
        assert_eq!(grouped[5], StartEnd::default());
        assert_eq!(grouped[6], StartEnd::default());
    }

    #[test]
    fn empty_input_yields_seven_empty_buckets() {
        let days = DatePresence::new();
        let durations = group_durations_by_weekday(&days);
        assert!(durations.iter().all(Vec::is_empty));
        assert_eq!(total_durations_per_weekday(&durations), [0; 7]);
        assert_eq!(mean_durations_per_weekday(&durations), [Mean::NoData; 7]);

        let start_end = group_start_end_by_weekday(&days);
        let rows = mean_start_end_per_weekday(&start_end);
        for (start, end) in rows {
            assert_eq!(start, "00:00:00");
            assert_eq!(end, "00:00:00");
        }
    }

    #[test]
    fn totals_and_means_per_weekday() {
        let grouped = group_durations_by_weekday(&sample_days());
        assert_eq!(
            total_durations_per_weekday(&grouped),
            [24_123, 0, 0, 45_968, 6_426, 0, 0]
        );
        assert_eq!(
            mean_durations_per_weekday(&grouped),
            [
                Mean::Value(24_123.0),
                Mean::NoData,
                Mean::NoData,
                Mean::Value(22_984.0),
                Mean::Value(6_426.0),
                Mean::NoData,
                Mean::NoData,
            ]
        );
    }

    #[test]
    fn single_monday_mean_duration() {
        let mut days = DatePresence::new();
        days.insert(day(2013, 9, 9), presence((9, 2, 0), (15, 30, 0)));

        let means = mean_durations_per_weekday(&group_durations_by_weekday(&days));
        assert_eq!(means[0], Mean::Value(23_280.0));
        assert!(means[1..].iter().all(|m| *m == Mean::NoData));
    }

    #[test]
    fn negative_intervals_are_kept() {
        let mut days = DatePresence::new();
        days.insert(day(2013, 9, 10), presence((17, 0, 0), (9, 0, 0)));

        let grouped = group_durations_by_weekday(&days);
        assert_eq!(grouped[1], vec![-28_800]);
    }

    #[test]
    fn mean_start_end_rendered_as_clock() {
        let rows = mean_start_end_per_weekday(&group_start_end_by_weekday(&sample_days()));
        assert_eq!(rows[0], ("09:12:14".to_string(), "15:54:17".to_string()));
        assert_eq!(rows[3], ("09:53:22".to_string(), "16:16:26".to_string()));
        assert_eq!(rows[4], ("13:16:56".to_string(), "15:04:02".to_string()));
        assert_eq!(rows[6], ("00:00:00".to_string(), "00:00:00".to_string()));
    }
}
