//! GPS calendar: weeks, weekdays, second of week and GPS System Time.

use core::fmt;

use crate::duration::{MICROS_PER_SEC, SECS_PER_DAY};
use crate::{leap_seconds, DateTimeError, Duration, Timestamp};

/// Number of weeks in a cycle of the legacy 10-bit GPS week number.
const WEEKS_PER_ROLLOVER: i64 = 1024;

/// The GPS epoch, 1980-01-06 00:00:00 UTC.
pub const GPS_EPOCH: Timestamp = Timestamp::midnight(1980, 1, 6);

/// The GPS calendar view of a date: day of the year, GPS week and GPS
/// weekday.
///
/// The `Display` implementation renders the conventional `wwwwd` label used
/// in IGS product names, e.g. `17732` for week 1773, Tuesday.
///
/// # Examples
///
/// ```
/// use gnss_calendar::{GpsCalendar, Timestamp};
///
/// let cal = Timestamp::from_date(2013, 12, 31).unwrap().gps_calendar();
///
/// assert_eq!(cal, GpsCalendar { day_of_year: 365, week: 1773, weekday: 2 });
/// assert_eq!(cal.to_string(), "17732");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpsCalendar {
    /// Day of the year, from 1 to 366.
    pub day_of_year: u16,
    /// Number of whole weeks elapsed since the GPS epoch.
    pub week: i64,
    /// Day of the GPS week, from 0 (Sunday) to 6 (Saturday).
    pub weekday: u8,
}

impl From<GpsCalendar> for (u16, i64, u8) {
    fn from(cal: GpsCalendar) -> Self {
        (cal.day_of_year, cal.week, cal.weekday)
    }
}

impl fmt::Display for GpsCalendar {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{:04}{}", self.week, self.weekday)
    }
}

impl Timestamp {
    /// Creates a timestamp from a GPS week, optionally refined by a weekday or
    /// a second of week.
    ///
    /// * `weekday` is the day of the GPS week, from 0 (Sunday) to 6
    ///   (Saturday). When it is provided, `second_of_week` is ignored and the
    ///   result is at midnight.
    /// * `second_of_week` is only used when `weekday` is `None`: its whole
    ///   days select the weekday and the remainder is the time of day, rounded
    ///   to the nearest microsecond.
    /// * `rollover` is the number of 1024-week cycles to add to `week`, for
    ///   week numbers broadcast by legacy receivers on 10 bits.
    ///
    /// With neither `weekday` nor `second_of_week`, the result is the Sunday
    /// starting the week.
    ///
    /// Returns an error if an argument is not finite or if the result is
    /// outside the supported range.
    ///
    /// # Examples
    ///
    /// ```
    /// use gnss_calendar::Timestamp;
    ///
    /// let t = Timestamp::from_gps_week(1616, Some(6), None, 0).unwrap();
    /// assert_eq!(t, Timestamp::from_date(2011, 1, 1).unwrap());
    ///
    /// let t = Timestamp::from_gps_week(592, None, Some(561_600.5), 1).unwrap();
    /// assert_eq!(t, Timestamp::new(2011, 1, 1, 12, 0, 0, 500_000).unwrap());
    /// ```
    pub fn from_gps_week(
        week: i64,
        weekday: Option<i64>,
        second_of_week: Option<f64>,
        rollover: i64,
    ) -> Result<Self, DateTimeError> {
        // Whole days of the second of week select the weekday.
        let (weekday, seconds) = match (weekday, second_of_week) {
            (Some(weekday), _) => (weekday, Duration::ZERO),
            (None, Some(sow)) => (
                0,
                Duration::checked_from_secs_f64(sow).ok_or(DateTimeError::OutOfRange)?,
            ),
            (None, None) => (0, Duration::ZERO),
        };

        WEEKS_PER_ROLLOVER
            .checked_mul(rollover)
            .and_then(|w| w.checked_add(week))
            .and_then(|w| w.checked_mul(7))
            .and_then(|d| d.checked_add(weekday))
            .and_then(|d| Duration::checked_new(d, 0, 0))
            .and_then(|d| d.checked_add(seconds))
            .and_then(|d| GPS_EPOCH.checked_add(d))
            .ok_or(DateTimeError::OutOfRange)
    }

    /// Returns the number of whole weeks elapsed since the GPS epoch.
    ///
    /// The elapsed days are counted from the date (rounded towards `-∞`) and
    /// the division by 7 truncates towards zero, so every date of the week
    /// preceding the epoch maps to week 0 as well.
    pub const fn gps_week(&self) -> i64 {
        self.difference(GPS_EPOCH).num_days() / 7
    }

    /// Returns the day of the GPS week, from 0 (Sunday) to 6 (Saturday).
    pub const fn gps_weekday(&self) -> u8 {
        self.iso_weekday() % 7
    }

    /// Returns the number of seconds elapsed since the start of the GPS week,
    /// including the fractional microseconds.
    ///
    /// The result is in the UTC scale of this timestamp: apply
    /// [`gpst`](Self::gpst) first to obtain a GPS time of week.
    ///
    /// # Examples
    ///
    /// ```
    /// use gnss_calendar::Timestamp;
    ///
    /// let t = Timestamp::new(2011, 1, 1, 12, 0, 0, 500_000).unwrap();
    /// assert_eq!(t.gps_second_of_week(), 561_600.5);
    /// ```
    pub fn gps_second_of_week(&self) -> f64 {
        let secs = self.gps_weekday() as i64 * SECS_PER_DAY
            + self.hour() as i64 * 3600
            + self.minute() as i64 * 60
            + self.second() as i64;

        Duration::from_micros(secs * MICROS_PER_SEC + self.microsecond() as i64).as_secs_f64()
    }

    /// Returns the day of the year, the GPS week and the GPS weekday.
    pub fn gps_calendar(&self) -> GpsCalendar {
        GpsCalendar {
            day_of_year: self.day_of_year(),
            week: self.gps_week(),
            weekday: self.gps_weekday(),
        }
    }

    /// Returns the cumulative leap second offset applicable at this UTC
    /// timestamp, from the built-in [`LeapSecondTable`](crate::LeapSecondTable).
    ///
    /// The offset is counted negatively (UTC minus GPST): it is 0 before
    /// 1981-07-01 and -17 since 2015-07-01.
    pub fn leap_seconds(&self) -> i64 {
        leap_seconds::cumulative_offset_seconds(self)
    }

    /// Converts this UTC timestamp to GPS System Time, checking for overflow.
    ///
    /// Returns `None` if the result is outside the supported range.
    pub fn checked_gpst(&self) -> Option<Self> {
        self.checked_sub(Duration::from_secs(self.leap_seconds()))
    }

    /// Converts this UTC timestamp to GPS System Time.
    ///
    /// GPST runs ahead of UTC by the accumulated leap seconds, so this
    /// subtracts the (negative) [`leap_seconds`](Self::leap_seconds) offset.
    ///
    /// # Panics
    ///
    /// This function panics if the result is outside the supported range. See
    /// [`Timestamp::checked_gpst`] for a panic-free version.
    ///
    /// # Examples
    ///
    /// ```
    /// use gnss_calendar::Timestamp;
    ///
    /// let t = Timestamp::from_date(2011, 1, 1).unwrap();
    /// assert_eq!(t.gpst(), Timestamp::new(2011, 1, 1, 0, 0, 15, 0).unwrap());
    /// ```
    pub fn gpst(&self) -> Self {
        *self - Duration::from_secs(self.leap_seconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u8, day: u8) -> Timestamp {
        Timestamp::from_date(year, month, day).unwrap()
    }

    #[test]
    fn gps_calendar_smoke() {
        let as_tuple = |t: Timestamp| -> (u16, i64, u8) { t.gps_calendar().into() };

        assert_eq!(as_tuple(ymd(2011, 1, 1)), (1, 1616, 6));
        assert_eq!(as_tuple(ymd(2013, 12, 31)), (365, 1773, 2));
        assert_eq!(as_tuple(GPS_EPOCH), (6, 0, 0));
    }

    #[test]
    fn gps_week_boundaries() {
        let saturday = Timestamp::new(1980, 1, 12, 23, 59, 59, 999_999).unwrap();

        assert_eq!(saturday.gps_week(), 0);
        assert_eq!(saturday.gps_weekday(), 6);
        assert_eq!(ymd(1980, 1, 13).gps_week(), 1);
        assert_eq!(ymd(1980, 1, 13).gps_weekday(), 0);
        // The 10-bit week number rolled over for the first time on this date.
        assert_eq!(ymd(1999, 8, 22).gps_week(), 1024);
        // Truncated division before the epoch.
        assert_eq!(ymd(1980, 1, 5).gps_week(), 0);
        assert_eq!(ymd(1979, 12, 29).gps_week(), -1);
    }

    #[test]
    fn gps_weekday_range() {
        let mut t = ymd(2011, 1, 1);
        for _ in 0..30 {
            assert!(t.gps_weekday() <= 6);
            assert_eq!(t.gps_weekday(), t.iso_weekday() % 7);
            t += Duration::from_days(1);
        }
    }

    #[test]
    fn gps_second_of_week() {
        assert_eq!(GPS_EPOCH.gps_second_of_week(), 0.0);
        assert_eq!(ymd(2011, 1, 1).gps_second_of_week(), 518_400.0);
        assert_eq!(
            Timestamp::new(2011, 1, 1, 23, 59, 59, 250_000)
                .unwrap()
                .gps_second_of_week(),
            604_799.25
        );
    }

    #[test]
    fn from_gps_week() {
        assert_eq!(Timestamp::from_gps_week(0, None, None, 0), Ok(GPS_EPOCH));
        assert_eq!(
            Timestamp::from_gps_week(1616, Some(6), None, 0),
            Ok(ymd(2011, 1, 1))
        );
        assert_eq!(
            Timestamp::from_gps_week(1773, Some(2), Some(1.0), 0),
            Ok(ymd(2013, 12, 31))
        );
        assert_eq!(
            Timestamp::from_gps_week(1616, None, Some(518_400.0 + 3_661.000_001), 0),
            Timestamp::new(2011, 1, 1, 1, 1, 1, 1)
        );
        assert_eq!(
            Timestamp::from_gps_week(1616, None, None, 0),
            Ok(ymd(2010, 12, 26))
        );
    }

    #[test]
    fn from_gps_week_rollover() {
        assert_eq!(
            Timestamp::from_gps_week(1616 - 1024, Some(6), None, 1),
            Ok(ymd(2011, 1, 1))
        );
        assert_eq!(
            Timestamp::from_gps_week(0, None, None, 2),
            Ok(ymd(2019, 4, 7))
        );
    }

    #[test]
    fn from_gps_week_invalid() {
        assert_eq!(
            Timestamp::from_gps_week(0, None, Some(f64::INFINITY), 0),
            Err(DateTimeError::OutOfRange)
        );
        assert_eq!(
            Timestamp::from_gps_week(0, None, Some(f64::NAN), 0),
            Err(DateTimeError::OutOfRange)
        );
        assert_eq!(
            Timestamp::from_gps_week(0, None, Some(1e19), 0),
            Err(DateTimeError::OutOfRange)
        );
        assert_eq!(
            Timestamp::from_gps_week(0, None, Some(-1e19), 0),
            Err(DateTimeError::OutOfRange)
        );
        assert_eq!(
            Timestamp::from_gps_week(0, None, Some(1e15), 0),
            Err(DateTimeError::OutOfRange)
        );
        assert_eq!(
            Timestamp::from_gps_week(i64::MAX, None, None, 0),
            Err(DateTimeError::OutOfRange)
        );
        assert_eq!(
            Timestamp::from_gps_week(1_000_000, None, None, 0),
            Err(DateTimeError::OutOfRange)
        );
    }

    #[test]
    fn gps_week_round_trip() {
        let mut t = Timestamp::new(1980, 1, 6, 13, 14, 15, 16).unwrap();
        while t < ymd(2030, 1, 1) {
            let back =
                Timestamp::from_gps_week(t.gps_week(), Some(t.gps_weekday() as i64), None, 0)
                    .unwrap();
            assert_eq!(back.date(), t.date());

            let back =
                Timestamp::from_gps_week(t.gps_week(), None, Some(t.gps_second_of_week()), 0)
                    .unwrap();
            assert_eq!(back, t);

            t += Duration::new(17, 3_333, 0);
        }
    }

    #[test]
    fn gpst() {
        assert_eq!(
            ymd(2011, 1, 1).gpst(),
            Timestamp::new(2011, 1, 1, 0, 0, 15, 0).unwrap()
        );
        assert_eq!(ymd(1980, 1, 6).gpst(), GPS_EPOCH);
        assert_eq!(
            ymd(2016, 1, 1).gpst(),
            Timestamp::new(2016, 1, 1, 0, 0, 17, 0).unwrap()
        );
        assert_eq!(Timestamp::MAX.checked_gpst(), None);
    }
}
