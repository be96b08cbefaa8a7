use chrono::{NaiveTime, Timelike};
use serde::{Serialize, Serializer};

const SECONDS_PER_DAY: i64 = 86_400;

/// Arithmetic mean of a list of seconds.
///
/// An empty list has no mean; it serializes as the plain integer `0` so the
/// JSON output tells "no data" apart from a float `0.0` only by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mean {
    NoData,
    Value(f64),
}

impl Mean {
    pub fn as_f64(self) -> f64 {
        match self {
            Mean::NoData => 0.0,
            Mean::Value(v) => v,
        }
    }

    /// Whole seconds, truncated toward zero.
    pub fn as_seconds(self) -> i64 {
        self.as_f64().trunc() as i64
    }
}

impl Serialize for Mean {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Mean::NoData => serializer.serialize_u64(0),
            Mean::Value(v) => serializer.serialize_f64(*v),
        }
    }
}

pub fn seconds_since_midnight(time: NaiveTime) -> i64 {
    time.hour() as i64 * 3600 + time.minute() as i64 * 60 + time.second() as i64
}

/// Signed number of seconds between two times of the same day.
pub fn interval(start: NaiveTime, end: NaiveTime) -> i64 {
    seconds_since_midnight(end) - seconds_since_midnight(start)
}

pub fn mean(values: &[i64]) -> Mean {
    if values.is_empty() {
        return Mean::NoData;
    }
    let sum: i64 = values.iter().sum();
    Mean::Value(sum as f64 / values.len() as f64)
}

/// Renders an offset from midnight as `HH:MM:SS`, rolling over past a day.
pub fn seconds_to_clock_string(seconds: i64) -> String {
    let seconds = seconds.rem_euclid(SECONDS_PER_DAY);
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        seconds % 3600 / 60,
        seconds % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn seconds_since_midnight_counts_from_zero() {
        assert_eq!(seconds_since_midnight(hms(0, 0, 0)), 0);
        assert_eq!(seconds_since_midnight(hms(0, 0, 3)), 3);
        assert_eq!(seconds_since_midnight(hms(1, 1, 1)), 3661);
        assert_eq!(seconds_since_midnight(hms(23, 59, 59)), 86_399);
    }

    #[test]
    fn seconds_since_midnight_is_monotonic() {
        let mut previous = -1;
        for minute_of_day in 0..(24 * 60) {
            let t = hms(minute_of_day / 60, minute_of_day % 60, 30);
            let current = seconds_since_midnight(t);
            assert!(current > previous);
            previous = current;
        }
    }

    #[test]
    fn interval_is_signed() {
        assert_eq!(interval(hms(0, 0, 3), hms(0, 0, 5)), 2);
        assert_eq!(interval(hms(0, 0, 5), hms(0, 0, 3)), -2);
        assert_eq!(interval(hms(9, 2, 0), hms(15, 30, 0)), 23_280);

        let pairs = [
            (hms(8, 0, 0), hms(16, 45, 12)),
            (hms(23, 59, 59), hms(0, 0, 0)),
            (hms(12, 0, 0), hms(12, 0, 0)),
        ];
        for (a, b) in pairs {
            assert_eq!(interval(a, b), -interval(b, a));
        }
    }

    #[test]
    fn mean_of_values() {
        assert_eq!(mean(&[]), Mean::NoData);
        assert_eq!(mean(&[5]), Mean::Value(5.0));
        assert_eq!(mean(&[2, 4]), Mean::Value(3.0));
        assert_eq!(mean(&[1, 2]), Mean::Value(1.5));
    }

    #[test]
    fn empty_mean_serializes_as_integer_zero() {
        assert_eq!(serde_json::to_string(&mean(&[])).unwrap(), "0");
        assert_eq!(serde_json::to_string(&mean(&[23_280])).unwrap(), "23280.0");
    }

    #[test]
    fn clock_string_formatting() {
        assert_eq!(seconds_to_clock_string(0), "00:00:00");
        assert_eq!(seconds_to_clock_string(33_134), "09:12:14");
        assert_eq!(seconds_to_clock_string(86_399), "23:59:59");
    }

    #[test]
    fn clock_string_rolls_over() {
        assert_eq!(seconds_to_clock_string(86_400), "00:00:00");
        assert_eq!(seconds_to_clock_string(86_461), "00:01:01");
        assert_eq!(seconds_to_clock_string(-1), "23:59:59");
    }

    #[test]
    fn mean_truncates_to_whole_seconds() {
        assert_eq!(mean(&[1, 2]).as_seconds(), 1);
        assert_eq!(Mean::NoData.as_seconds(), 0);
    }
}
