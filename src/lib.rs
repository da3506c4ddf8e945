//! Calendar arithmetic for GNSS analysis.
//!
//! # Overview
//!
//! GNSS processing constantly juggles several labels for the same instant: a
//! civil UTC date, a GPS week and day-of-week, a day of the year, a Modified
//! Julian Day and GPS System Time (GPST), which runs ahead of UTC by the
//! number of leap seconds accumulated since 1980.
//!
//! This crate provides a [`Timestamp`], an immutable UTC instant of the
//! proleptic Gregorian calendar with microsecond resolution, together with a
//! signed [`Duration`] and the conversions between all the above
//! representations. Timestamps are stored as an exact integer count of
//! seconds and microseconds, so that adding and subtracting durations never
//! drifts; floating-point values only appear in the views that are
//! intrinsically fractional ([`Timestamp::modified_julian_day`] and
//! [`Timestamp::gps_second_of_week`]).
//!
//! The offset between UTC and GPST is looked up in a compiled-in
//! [`LeapSecondTable`]. The table is static data: supporting a newly
//! announced leap second requires a new release of this crate.
//!
//!
//! # Features flags
//!
//! ### Support for `no-std`
//!
//! By default, this crate enables the `std` feature to implement
//! `std::error::Error` on error types, but specifying `default-features =
//! false` makes it `no-std`-compatible.
//!
//! ### Support for time-related crates
//!
//! Conversion methods to and from the [chrono] crate's `NaiveDateTime` and
//! `Duration` are available with the `chrono` feature.
//!
//! ### Serialization
//!
//! `Timestamp`, `Duration` and related types can be (de)serialized with
//! `serde` by activating the `serde` feature.
//!
//! [chrono]: https://crates.io/crates/chrono
//!
//!
//! # Examples
//!
//! ```
//! use gnss_calendar::{Duration, Timestamp};
//!
//! let t = Timestamp::from_date(2011, 1, 1).unwrap();
//!
//! assert_eq!(t.day_of_year(), 1);
//! assert_eq!(t.gps_week(), 1616);
//! assert_eq!(t.gps_weekday(), 6);
//! assert_eq!(t.modified_julian_day(), 55562.0);
//! assert_eq!(t.leap_seconds(), -15);
//! assert_eq!(t.gpst().to_string(), "2011-01-01T00:00:15");
//!
//! assert_eq!((t + Duration::from_days(2)).to_string(), "2011-01-03T00:00:00");
//! assert_eq!((t - Duration::from_days(2)).to_string(), "2010-12-30T00:00:00");
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod calendar_input;
mod date_time;
mod duration;
mod errors;
mod gps;
mod leap_seconds;

use core::fmt;
use core::ops::{Add, AddAssign, Sub, SubAssign};
use core::str::FromStr;

pub use calendar_input::{gps_calendar, CalendarInput, CalendarQuery};
pub use duration::Duration;
pub use errors::{CalendarInputError, DateTimeError, ParseDateTimeError};
pub use gps::{GpsCalendar, GPS_EPOCH};
pub use leap_seconds::{cumulative_offset_seconds, LeapSecond, LeapSecondTable};

use duration::{MICROS_PER_SEC, SECS_PER_DAY};

const MICROS_PER_SEC_U32: u32 = MICROS_PER_SEC as u32;

/// The smallest supported year.
const MIN_YEAR: i32 = -9999;

/// The largest supported year.
const MAX_YEAR: i32 = 9999;

/// Number of days between 0000-01-01 and 0001-01-01, the first day of the
/// proleptic Gregorian ordinal count.
const ORDINAL_OFFSET: i64 = 366;

/// The epoch of Modified Julian Days, 1858-11-17 00:00:00 UTC.
pub const MJD_EPOCH: Timestamp = Timestamp::midnight(1858, 11, 17);

/// A UTC instant of the proleptic Gregorian calendar, with microsecond
/// resolution.
///
/// A `Timestamp` is an immutable value: all arithmetic returns a new
/// instance. It is represented as a signed number of seconds relative to
/// 0000-01-01 00:00:00 (ISO 8601 year 0, i.e. 1 BC) and a positive number of
/// microseconds. Supported years range from -9999 to 9999.
///
/// Leap seconds are not representable: the second field is always between 0
/// and 59, and a day always lasts 86400 seconds.
///
/// # Examples
///
/// ```
/// use gnss_calendar::{Duration, Timestamp};
///
/// let t0 = Timestamp::new(2013, 12, 31, 23, 59, 59, 500_000).unwrap();
/// let t1 = t0 + Duration::from_micros(500_000);
///
/// assert_eq!(t1, Timestamp::from_date(2014, 1, 1).unwrap());
/// assert_eq!(t1 - t0, Duration::from_micros(500_000));
/// assert_eq!(t1.day_of_year(), 1);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawTimestamp"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp {
    /// The number of whole seconds in the future (if positive) or in the past
    /// (if negative) of 0000-01-01 00:00:00.
    ///
    /// Note that the automatic derivation of `PartialOrd` relies on
    /// lexicographical comparison so the `secs` field must appear before
    /// `micros` in declaration order to be given higher priority.
    secs: i64,
    /// The sub-second number of microseconds in the future of the point in
    /// time defined by `secs`.
    micros: u32,
}

impl Timestamp {
    /// The earliest supported timestamp, -9999-01-01 00:00:00.
    pub const MIN: Self = Self {
        secs: date_time::days_from_year_0(MIN_YEAR) * SECS_PER_DAY,
        micros: 0,
    };

    /// The latest supported timestamp, 9999-12-31 23:59:59.999999.
    pub const MAX: Self = Self {
        secs: date_time::days_from_year_0(MAX_YEAR + 1) * SECS_PER_DAY - 1,
        micros: MICROS_PER_SEC_U32 - 1,
    };

    /// Creates a timestamp from its date-time components.
    ///
    /// Returns an error if the components do not denote a valid instant or if
    /// the year is outside the supported range.
    ///
    /// # Examples
    ///
    /// ```
    /// use gnss_calendar::{DateTimeError, Timestamp};
    ///
    /// assert!(Timestamp::new(2012, 2, 29, 23, 59, 59, 999_999).is_ok());
    /// assert_eq!(
    ///     Timestamp::new(2011, 4, 31, 0, 0, 0, 0),
    ///     Err(DateTimeError::InvalidDayOfMonth(31))
    /// );
    /// ```
    pub fn new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        min: u8,
        sec: u8,
        micros: u32,
    ) -> Result<Self, DateTimeError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(DateTimeError::InvalidYear(year));
        }
        if !(1..=12).contains(&month) {
            return Err(DateTimeError::InvalidMonth(month));
        }
        if day < 1 || day > date_time::days_in_month(year, month) {
            return Err(DateTimeError::InvalidDayOfMonth(day));
        }
        if hour > 23 {
            return Err(DateTimeError::InvalidHour(hour));
        }
        if min > 59 {
            return Err(DateTimeError::InvalidMinute(min));
        }
        if sec > 59 {
            return Err(DateTimeError::InvalidSecond(sec));
        }
        if micros >= MICROS_PER_SEC_U32 {
            return Err(DateTimeError::InvalidMicrosecond(micros));
        }

        let secs = Self::midnight(year, month, day).secs
            + hour as i64 * 3600
            + min as i64 * 60
            + sec as i64;

        Ok(Self { secs, micros })
    }

    /// Creates a timestamp at midnight of the specified date.
    ///
    /// Returns an error if the date is not valid or if the year is outside the
    /// supported range.
    pub fn from_date(year: i32, month: u8, day: u8) -> Result<Self, DateTimeError> {
        Self::new(year, month, day, 0, 0, 0, 0)
    }

    /// Creates a timestamp at midnight of a date that is known to be valid.
    pub(crate) const fn midnight(year: i32, month: u8, day: u8) -> Self {
        let days = date_time::days_from_year_0(year)
            + date_time::day_of_year(year, month, day) as i64;

        Self {
            secs: days * SECS_PER_DAY,
            micros: 0,
        }
    }

    /// Creates a timestamp from a `yyyy/mm/dd` calendar date string, at
    /// midnight.
    ///
    /// Fields may have any width, so `2011/1/1` is valid.
    ///
    /// # Examples
    ///
    /// ```
    /// use gnss_calendar::{ParseDateTimeError, Timestamp};
    ///
    /// let t = Timestamp::from_calendar_str("2013/12/31").unwrap();
    /// assert_eq!(t, Timestamp::from_date(2013, 12, 31).unwrap());
    ///
    /// assert_eq!(
    ///     Timestamp::from_calendar_str("2013/12"),
    ///     Err(ParseDateTimeError::MissingField)
    /// );
    /// ```
    pub fn from_calendar_str(ymd: &str) -> Result<Self, ParseDateTimeError> {
        let (year, month, day) = date_time::parse_calendar_date(ymd)?;

        Ok(Self::from_date(year, month, day)?)
    }

    /// Creates a timestamp from a Modified Julian Day.
    ///
    /// The fractional part of the day is rounded to the nearest microsecond,
    /// with ties to even.
    ///
    /// Returns an error if the argument is not finite or if the result is
    /// outside the supported range.
    ///
    /// # Examples
    ///
    /// ```
    /// use gnss_calendar::Timestamp;
    ///
    /// let t = Timestamp::from_modified_julian_day(56657.75).unwrap();
    /// assert_eq!(t, Timestamp::new(2013, 12, 31, 18, 0, 0, 0).unwrap());
    /// ```
    pub fn from_modified_julian_day(mjd: f64) -> Result<Self, DateTimeError> {
        Duration::checked_from_days_f64(mjd)
            .and_then(|elapsed| MJD_EPOCH.checked_add(elapsed))
            .ok_or(DateTimeError::OutOfRange)
    }

    /// Creates a timestamp from a year and a 1-based day of the year, at
    /// midnight.
    ///
    /// Two-digit years are expanded the usual way in GNSS file naming:
    /// `0..=79` maps to `2000..=2079` and `80..=99` to `1980..=1999`. Negative
    /// years are left unchanged.
    ///
    /// Days of the year past the end of the year are not rejected and roll
    /// over into the following years, so that day 366 of 2013 is 2014-01-01.
    ///
    /// Returns an error if the day of the year is less than 1 or if the
    /// result is outside the supported range.
    ///
    /// # Examples
    ///
    /// ```
    /// use gnss_calendar::{DateTimeError, Timestamp};
    ///
    /// let t = Timestamp::from_day_of_year(13, 365).unwrap();
    /// assert_eq!(t, Timestamp::from_date(2013, 12, 31).unwrap());
    ///
    /// assert_eq!(
    ///     Timestamp::from_day_of_year(2013, 0),
    ///     Err(DateTimeError::InvalidDayOfYear(0))
    /// );
    /// ```
    pub fn from_day_of_year(year: i32, doy: i64) -> Result<Self, DateTimeError> {
        let year = match year {
            0..=79 => year + 2000,
            80..=99 => year + 1900,
            _ => year,
        };
        if doy < 1 {
            return Err(DateTimeError::InvalidDayOfYear(doy));
        }

        Self::from_date(year, 1, 1)?
            .checked_add(Duration::checked_new(doy - 1, 0, 0).ok_or(DateTimeError::OutOfRange)?)
            .ok_or(DateTimeError::OutOfRange)
    }

    /// Returns a timestamp with the same time of day but a different date.
    ///
    /// Returns an error if the date is not valid.
    pub fn with_date(&self, year: i32, month: u8, day: u8) -> Result<Self, DateTimeError> {
        let date = Self::from_date(year, month, day)?;

        Ok(Self {
            secs: date.secs + self.second_of_day(),
            micros: self.micros,
        })
    }

    /// Creates a timestamp from a `chrono::NaiveDateTime`, interpreted as UTC.
    ///
    /// Sub-microsecond digits are truncated. A leap second, which `chrono`
    /// encodes as a nanosecond value above 999 999 999, is carried over to the
    /// next second.
    ///
    /// Returns an error if the year is outside the supported range.
    #[cfg(feature = "chrono")]
    pub fn from_chrono_date_time(date_time: &chrono::NaiveDateTime) -> Result<Self, DateTimeError> {
        use chrono::{Datelike, Timelike};

        const NANOS_PER_SEC: u32 = 1_000_000_000;

        let nanos = date_time.nanosecond();
        let (secs_carry, nanos) = if nanos < NANOS_PER_SEC {
            (0, nanos)
        } else {
            (1, nanos - NANOS_PER_SEC)
        };

        Self::new(
            date_time.year(),
            date_time.month() as u8,
            date_time.day() as u8,
            date_time.hour() as u8,
            date_time.minute() as u8,
            date_time.second() as u8,
            nanos / 1_000,
        )?
        .checked_add(Duration::from_secs(secs_carry))
        .ok_or(DateTimeError::OutOfRange)
    }

    /// Returns a `chrono::NaiveDateTime` with the same date-time components.
    ///
    /// Returns `None` if the timestamp is outside the range supported by
    /// `chrono`.
    #[cfg(feature = "chrono")]
    pub fn to_chrono_date_time(&self) -> Option<chrono::NaiveDateTime> {
        chrono::NaiveDate::from_ymd_opt(self.year(), self.month() as u32, self.day() as u32)?
            .and_hms_micro_opt(
                self.hour() as u32,
                self.minute() as u32,
                self.second() as u32,
                self.micros,
            )
    }

    /// Number of days elapsed since 0000-01-01, rounded towards `-∞`.
    const fn days(&self) -> i64 {
        self.secs.div_euclid(SECS_PER_DAY)
    }

    /// Number of whole seconds elapsed since midnight.
    const fn second_of_day(&self) -> i64 {
        self.secs.rem_euclid(SECS_PER_DAY)
    }

    /// Returns the year, the month and the day of the month.
    pub fn date(&self) -> (i32, u8, u8) {
        let (year, doy) = date_time::days_to_date(self.days());
        let (month, day) = date_time::month_and_day_of_month(year, doy);

        (year, month, day)
    }

    /// Returns the proleptic Gregorian year.
    pub fn year(&self) -> i32 {
        date_time::days_to_date(self.days()).0
    }

    /// Returns the month, from 1 to 12.
    pub fn month(&self) -> u8 {
        self.date().1
    }

    /// Returns the day of the month, from 1 to 31.
    pub fn day(&self) -> u8 {
        self.date().2
    }

    /// Returns the hour, from 0 to 23.
    pub const fn hour(&self) -> u8 {
        (self.second_of_day() / 3600) as u8
    }

    /// Returns the minute, from 0 to 59.
    pub const fn minute(&self) -> u8 {
        ((self.second_of_day() / 60) % 60) as u8
    }

    /// Returns the second, from 0 to 59.
    pub const fn second(&self) -> u8 {
        (self.second_of_day() % 60) as u8
    }

    /// Returns the microsecond, from 0 to 999 999.
    pub const fn microsecond(&self) -> u32 {
        self.micros
    }

    /// Returns the 1-based day of the year, from 1 to 366.
    pub fn day_of_year(&self) -> u16 {
        date_time::days_to_date(self.days()).1 as u16 + 1
    }

    /// Returns the proleptic Gregorian ordinal of the date, where 0001-01-01
    /// has ordinal 1.
    pub const fn to_ordinal(&self) -> i64 {
        self.days() - ORDINAL_OFFSET + 1
    }

    /// Returns the ISO 8601 day of the week, from 1 (Monday) to 7 (Sunday).
    pub const fn iso_weekday(&self) -> u8 {
        // 0001-01-01 is a Monday.
        (self.to_ordinal() - 1).rem_euclid(7) as u8 + 1
    }

    /// Returns the day of the week, from 0 (Monday) to 6 (Sunday).
    pub const fn weekday(&self) -> u8 {
        self.iso_weekday() - 1
    }

    /// Returns the Modified Julian Day, i.e. the fractional number of days
    /// elapsed since 1858-11-17 00:00:00.
    ///
    /// This is a view for reporting purposes: converting it back with
    /// [`from_modified_julian_day`](Self::from_modified_julian_day) is exact
    /// only to within the precision of an `f64`.
    pub fn modified_julian_day(&self) -> f64 {
        self.difference(MJD_EPOCH).as_days_f64()
    }

    /// Returns the number of whole seconds and the sub-second microseconds as
    /// a single count of microseconds since 0000-01-01.
    const fn as_micros(&self) -> i64 {
        self.secs * MICROS_PER_SEC + self.micros as i64
    }

    /// Creates a timestamp from a count of microseconds since 0000-01-01,
    /// checking the supported range.
    const fn from_micros(micros: i64) -> Option<Self> {
        if micros < Self::MIN.as_micros() || micros > Self::MAX.as_micros() {
            return None;
        }

        Some(Self {
            secs: micros.div_euclid(MICROS_PER_SEC),
            micros: micros.rem_euclid(MICROS_PER_SEC) as u32,
        })
    }

    /// Adds a duration to a timestamp, checking for overflow.
    ///
    /// Returns `None` if the result is outside the supported range.
    ///
    /// # Examples
    ///
    /// ```
    /// use gnss_calendar::{Duration, Timestamp};
    ///
    /// let t = Timestamp::from_date(2011, 1, 1).unwrap();
    /// assert!(t.checked_add(Duration::from_days(2)).is_some());
    /// assert!(t.checked_add(Duration::MAX).is_none());
    /// ```
    pub const fn checked_add(self, rhs: Duration) -> Option<Self> {
        match self.as_micros().checked_add(rhs.num_microseconds()) {
            Some(micros) => Self::from_micros(micros),
            None => None,
        }
    }

    /// Subtracts a duration from a timestamp, checking for overflow.
    ///
    /// Returns `None` if the result is outside the supported range.
    pub const fn checked_sub(self, rhs: Duration) -> Option<Self> {
        match self.as_micros().checked_sub(rhs.num_microseconds()) {
            Some(micros) => Self::from_micros(micros),
            None => None,
        }
    }

    /// Computes the signed duration elapsed from `other` to `self`.
    ///
    /// The result is negative if `other` lies in the future of `self`. The
    /// difference is exact, down to the microsecond.
    ///
    /// # Examples
    ///
    /// ```
    /// use gnss_calendar::{Duration, Timestamp};
    ///
    /// let t0 = Timestamp::new(2010, 12, 31, 23, 59, 59, 750_000).unwrap();
    /// let t1 = Timestamp::new(2011, 1, 1, 0, 0, 0, 250_000).unwrap();
    ///
    /// assert_eq!(t1.difference(t0), Duration::from_micros(500_000));
    /// assert_eq!(t0.difference(t1), Duration::from_micros(-500_000));
    /// ```
    pub const fn difference(self, other: Self) -> Duration {
        // Cannot overflow within the supported range of years.
        Duration::new(
            self.days() - other.days(),
            self.second_of_day() - other.second_of_day(),
            self.micros as i64 - other.micros as i64,
        )
    }
}

/// The unchecked fields of a deserialized [`Timestamp`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawTimestamp {
    secs: i64,
    micros: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawTimestamp> for Timestamp {
    type Error = DateTimeError;

    fn try_from(raw: RawTimestamp) -> Result<Self, Self::Error> {
        if raw.micros >= MICROS_PER_SEC_U32 {
            return Err(DateTimeError::InvalidMicrosecond(raw.micros));
        }
        if raw.secs < Self::MIN.secs || raw.secs > Self::MAX.secs {
            return Err(DateTimeError::OutOfRange);
        }

        Ok(Self {
            secs: raw.secs,
            micros: raw.micros,
        })
    }
}

impl Add<Duration> for Timestamp {
    type Output = Self;

    /// Adds a duration to a timestamp.
    ///
    /// # Panics
    ///
    /// This function panics if the resulting timestamp is outside the
    /// supported range. See [`Timestamp::checked_add`] for a panic-free
    /// version.
    fn add(self, other: Duration) -> Self {
        self.checked_add(other)
            .expect("overflow when adding duration to timestamp")
    }
}

impl Sub<Duration> for Timestamp {
    type Output = Self;

    /// Subtracts a duration from a timestamp.
    ///
    /// # Panics
    ///
    /// This function panics if the resulting timestamp is outside the
    /// supported range. See [`Timestamp::checked_sub`] for a panic-free
    /// version.
    fn sub(self, other: Duration) -> Self {
        self.checked_sub(other)
            .expect("overflow when subtracting duration from timestamp")
    }
}

impl Sub for Timestamp {
    type Output = Duration;

    /// Computes the signed duration elapsed from `other` to `self`.
    ///
    /// See [`Timestamp::difference`].
    fn sub(self, other: Self) -> Duration {
        self.difference(other)
    }
}

impl AddAssign<Duration> for Timestamp {
    /// Increments the timestamp by a duration.
    ///
    /// # Panics
    ///
    /// This function panics if the resulting timestamp is outside the
    /// supported range.
    fn add_assign(&mut self, other: Duration) {
        *self = *self + other;
    }
}

impl SubAssign<Duration> for Timestamp {
    /// Decrements the timestamp by a duration.
    ///
    /// # Panics
    ///
    /// This function panics if the resulting timestamp is outside the
    /// supported range.
    fn sub_assign(&mut self, other: Duration) {
        *self = *self - other;
    }
}

impl fmt::Display for Timestamp {
    /// Formats the timestamp as `YYYY-MM-DDThh:mm:ss`, followed by a
    /// 6-digit fraction if the microsecond is not zero.
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day) = self.date();
        if year < 0 {
            write!(fmt, "-{:04}", -year)?;
        } else {
            write!(fmt, "{:04}", year)?;
        }
        write!(
            fmt,
            "-{:02}-{:02}T{:02}:{:02}:{:02}",
            month,
            day,
            self.hour(),
            self.minute(),
            self.second()
        )?;
        if self.micros != 0 {
            write!(fmt, ".{:06}", self.micros)?;
        }

        Ok(())
    }
}

impl FromStr for Timestamp {
    type Err = ParseDateTimeError;

    /// Parses an RFC3339-like date-time, such as `2011-01-01T00:00:00.5` or
    /// `-0044-03-15 12:00:00`.
    ///
    /// The fractional part is optional and truncated to the microsecond. Time
    /// zones and offsets are not accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month, day, hour, min, sec, micros) = date_time::parse_date_time(s)?;

        Ok(Self::new(year, month, day, hour, min, sec, micros)?)
    }
}
