//! Signed elapsed time with microsecond resolution.

use core::fmt;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

pub(crate) const MICROS_PER_SEC: i64 = 1_000_000;
pub(crate) const SECS_PER_DAY: i64 = 86_400;
pub(crate) const MICROS_PER_DAY: i64 = SECS_PER_DAY * MICROS_PER_SEC;

/// A signed span of time, stored as an exact number of microseconds.
///
/// Unlike [`core::time::Duration`], a `Duration` may be negative so that the
/// difference between two [`Timestamp`](crate::Timestamp)s is always
/// representable. All integer constructors and arithmetic are exact; the
/// floating-point constructors and views exist for reporting and for inputs
/// that are naturally fractional, such as a Modified Julian Day.
///
/// # Examples
///
/// ```
/// use gnss_calendar::Duration;
///
/// let d = Duration::new(1, -1, 250_000);
/// assert_eq!(d.num_microseconds(), 86_399_250_000);
/// assert_eq!(d.num_days(), 0);
/// assert_eq!(d.num_seconds(), 86_399);
/// assert_eq!(d.subsec_micros(), 250_000);
/// assert_eq!(-d, Duration::from_micros(-86_399_250_000));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Duration {
    micros: i64,
}

impl Duration {
    /// A null duration.
    pub const ZERO: Self = Self { micros: 0 };

    /// The smallest representable duration.
    pub const MIN: Self = Self { micros: i64::MIN };

    /// The largest representable duration.
    pub const MAX: Self = Self { micros: i64::MAX };

    /// Creates a duration from whole days, whole seconds and microseconds.
    ///
    /// Each component may be negative and need not be normalized.
    ///
    /// # Panics
    ///
    /// Panics if the total number of microseconds overflows an `i64`. See
    /// [`Duration::checked_new`] for a panic-free version.
    pub const fn new(days: i64, seconds: i64, microseconds: i64) -> Self {
        match Self::checked_new(days, seconds, microseconds) {
            Some(d) => d,
            None => panic!("overflow when creating a duration"),
        }
    }

    /// Creates a duration from whole days, whole seconds and microseconds,
    /// checking for overflow.
    pub const fn checked_new(days: i64, seconds: i64, microseconds: i64) -> Option<Self> {
        let days = match days.checked_mul(MICROS_PER_DAY) {
            Some(d) => d,
            None => return None,
        };
        let seconds = match seconds.checked_mul(MICROS_PER_SEC) {
            Some(s) => s,
            None => return None,
        };
        let micros = match days.checked_add(seconds) {
            Some(m) => m,
            None => return None,
        };
        match micros.checked_add(microseconds) {
            Some(micros) => Some(Self { micros }),
            None => None,
        }
    }

    /// Creates a duration spanning a whole number of days.
    ///
    /// # Panics
    ///
    /// Panics if the number of microseconds overflows an `i64`.
    pub const fn from_days(days: i64) -> Self {
        Self::new(days, 0, 0)
    }

    /// Creates a duration spanning a whole number of seconds.
    ///
    /// # Panics
    ///
    /// Panics if the number of microseconds overflows an `i64`.
    pub const fn from_secs(seconds: i64) -> Self {
        Self::new(0, seconds, 0)
    }

    /// Creates a duration from a number of microseconds.
    pub const fn from_micros(microseconds: i64) -> Self {
        Self {
            micros: microseconds,
        }
    }

    /// Creates a duration from a fractional number of seconds, rounded to the
    /// nearest microsecond with ties to even.
    ///
    /// # Panics
    ///
    /// Panics if the argument is not finite or out of range. See
    /// [`Duration::checked_from_secs_f64`] for a panic-free version.
    pub fn from_secs_f64(seconds: f64) -> Self {
        Self::checked_from_secs_f64(seconds).expect("invalid or out-of-range number of seconds")
    }

    /// Creates a duration from a fractional number of seconds, rounded to the
    /// nearest microsecond with ties to even.
    ///
    /// Returns `None` if the argument is not finite or out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use gnss_calendar::Duration;
    ///
    /// assert_eq!(Duration::checked_from_secs_f64(1.5), Some(Duration::from_micros(1_500_000)));
    /// assert_eq!(Duration::checked_from_secs_f64(f64::NAN), None);
    /// ```
    pub fn checked_from_secs_f64(seconds: f64) -> Option<Self> {
        round_ties_even(seconds * MICROS_PER_SEC as f64).map(Self::from_micros)
    }

    /// Creates a duration from a fractional number of days, rounded to the
    /// nearest microsecond with ties to even.
    ///
    /// # Panics
    ///
    /// Panics if the argument is not finite or out of range. See
    /// [`Duration::checked_from_days_f64`] for a panic-free version.
    pub fn from_days_f64(days: f64) -> Self {
        Self::checked_from_days_f64(days).expect("invalid or out-of-range number of days")
    }

    /// Creates a duration from a fractional number of days, rounded to the
    /// nearest microsecond with ties to even.
    ///
    /// Returns `None` if the argument is not finite or out of range.
    pub fn checked_from_days_f64(days: f64) -> Option<Self> {
        round_ties_even(days * MICROS_PER_DAY as f64).map(Self::from_micros)
    }

    /// Returns the number of whole days, rounded towards `-∞`.
    ///
    /// Together with [`num_seconds`](Self::num_seconds), this follows the
    /// usual calendar convention where a negative duration of one second is
    /// `-1` day plus `86399` seconds.
    pub const fn num_days(&self) -> i64 {
        self.micros.div_euclid(MICROS_PER_DAY)
    }

    /// Returns the number of whole seconds, rounded towards `-∞`.
    pub const fn num_seconds(&self) -> i64 {
        self.micros.div_euclid(MICROS_PER_SEC)
    }

    /// Returns the total number of microseconds.
    pub const fn num_microseconds(&self) -> i64 {
        self.micros
    }

    /// Returns the sub-second fractional part in microseconds.
    ///
    /// The fraction always points towards the future, consistently with
    /// [`num_seconds`](Self::num_seconds).
    pub const fn subsec_micros(&self) -> u32 {
        self.micros.rem_euclid(MICROS_PER_SEC) as u32
    }

    /// Returns the duration as a fractional number of seconds.
    pub fn as_secs_f64(&self) -> f64 {
        self.micros as f64 / MICROS_PER_SEC as f64
    }

    /// Returns the duration as a fractional number of days.
    pub fn as_days_f64(&self) -> f64 {
        self.micros as f64 / MICROS_PER_DAY as f64
    }

    /// Returns whether the duration is strictly negative.
    pub const fn is_negative(&self) -> bool {
        self.micros < 0
    }

    /// Adds two durations, checking for overflow.
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.micros.checked_add(rhs.micros) {
            Some(micros) => Some(Self { micros }),
            None => None,
        }
    }

    /// Subtracts two durations, checking for overflow.
    pub const fn checked_sub(self, rhs: Self) -> Option<Self> {
        match self.micros.checked_sub(rhs.micros) {
            Some(micros) => Some(Self { micros }),
            None => None,
        }
    }

    /// Negates the duration, checking for overflow.
    pub const fn checked_neg(self) -> Option<Self> {
        match self.micros.checked_neg() {
            Some(micros) => Some(Self { micros }),
            None => None,
        }
    }

    /// Converts to a `chrono::Duration`.
    ///
    /// Returns `None` if the duration exceeds the range of `chrono::Duration`.
    #[cfg(feature = "chrono")]
    pub fn to_chrono_duration(&self) -> Option<chrono::Duration> {
        let secs = self.num_seconds();
        let nanos = self.subsec_micros() as i64 * 1_000;

        chrono::Duration::try_seconds(secs)?.checked_add(&chrono::Duration::nanoseconds(nanos))
    }

    /// Creates a duration from a `chrono::Duration`, truncating sub-microsecond
    /// digits towards zero.
    ///
    /// Returns `None` if the number of microseconds overflows an `i64`.
    #[cfg(feature = "chrono")]
    pub fn from_chrono_duration(duration: &chrono::Duration) -> Option<Self> {
        duration.num_microseconds().map(Self::from_micros)
    }
}

impl Add for Duration {
    type Output = Self;

    /// Adds two durations.
    ///
    /// # Panics
    ///
    /// This function panics on overflow. See [`Duration::checked_add`] for a
    /// panic-free version.
    fn add(self, other: Self) -> Self {
        self.checked_add(other)
            .expect("overflow when adding durations")
    }
}

impl Sub for Duration {
    type Output = Self;

    /// Subtracts two durations.
    ///
    /// # Panics
    ///
    /// This function panics on overflow. See [`Duration::checked_sub`] for a
    /// panic-free version.
    fn sub(self, other: Self) -> Self {
        self.checked_sub(other)
            .expect("overflow when subtracting durations")
    }
}

impl Neg for Duration {
    type Output = Self;

    fn neg(self) -> Self {
        self.checked_neg().expect("overflow when negating duration")
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl SubAssign for Duration {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl fmt::Display for Duration {
    /// Formats the duration as `[D day[s], ]h:mm:ss[.ffffff]`, with a floored
    /// (possibly negative) number of days and a positive time of day.
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days = self.num_days();
        let secs = self.num_seconds().rem_euclid(SECS_PER_DAY);
        let micros = self.subsec_micros();

        if days != 0 {
            let plural = if days == 1 || days == -1 { "" } else { "s" };
            write!(fmt, "{} day{}, ", days, plural)?;
        }
        write!(
            fmt,
            "{}:{:02}:{:02}",
            secs / 3600,
            (secs / 60) % 60,
            secs % 60
        )?;
        if micros != 0 {
            write!(fmt, ".{:06}", micros)?;
        }

        Ok(())
    }
}

/// Rounds to the nearest integer with ties to even.
///
/// This is implemented by hand because `f64::round_ties_even` is neither
/// available in `core` nor within the MSRV.
///
/// Returns `None` if the argument is not finite or does not fit in an `i64`.
pub(crate) fn round_ties_even(x: f64) -> Option<i64> {
    // Slightly below 2^63 so that the truncating cast cannot saturate.
    const LIMIT: f64 = 9.2e18;

    if !x.is_finite() || x >= LIMIT || x <= -LIMIT {
        return None;
    }

    // Above 2^53 every float is an integer, so `frac` is exact and zero.
    let int = x as i64;
    let frac = x - int as f64;
    let rounded = if frac > 0.5 || (frac == 0.5 && int % 2 != 0) {
        int + 1
    } else if frac < -0.5 || (frac == -0.5 && int % 2 != 0) {
        int - 1
    } else {
        int
    };

    Some(rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_are_normalized() {
        let d = Duration::new(2, 3_600, 5);

        assert_eq!(d.num_microseconds(), 2 * MICROS_PER_DAY + 3_600_000_000 + 5);
        assert_eq!(d.num_days(), 2);
        assert_eq!(d.num_seconds(), 2 * 86_400 + 3_600);
        assert_eq!(d.subsec_micros(), 5);
    }

    #[test]
    fn negative_durations_floor() {
        let d = Duration::from_micros(-1);

        assert_eq!(d.num_days(), -1);
        assert_eq!(d.num_seconds(), -1);
        assert_eq!(d.subsec_micros(), 999_999);
        assert!(d.is_negative());
    }

    #[test]
    fn arithmetic_smoke() {
        let d1 = Duration::from_days(2);
        let d2 = Duration::from_secs(30);

        assert_eq!(d1 + d2, Duration::new(2, 30, 0));
        assert_eq!(d2 - d1, Duration::new(-2, 30, 0));
        assert_eq!(-(d1 - d2), d2 - d1);

        let mut d = d1;
        d += d2;
        d -= d1;
        assert_eq!(d, d2);
    }

    #[test]
    fn checked_overflow() {
        assert_eq!(Duration::checked_new(i64::MAX, 0, 0), None);
        assert_eq!(Duration::MAX.checked_add(Duration::from_micros(1)), None);
        assert_eq!(Duration::MIN.checked_sub(Duration::from_micros(1)), None);
        assert_eq!(Duration::MIN.checked_neg(), None);
    }

    #[test]
    #[should_panic]
    fn add_overflow() {
        let _ = Duration::MAX + Duration::from_micros(1);
    }

    #[test]
    fn float_views() {
        let d = Duration::new(1, 43_200, 0);

        assert_eq!(d.as_days_f64(), 1.5);
        assert_eq!(d.as_secs_f64(), 129_600.0);
    }

    #[test]
    fn float_constructors_round() {
        assert_eq!(Duration::from_secs_f64(1.25), Duration::from_micros(1_250_000));
        assert_eq!(Duration::from_secs_f64(0.000_001_4), Duration::from_micros(1));
        assert_eq!(Duration::from_secs_f64(-0.000_001_6), Duration::from_micros(-2));
        assert_eq!(Duration::from_days_f64(0.5), Duration::from_secs(43_200));
        assert_eq!(Duration::checked_from_days_f64(f64::INFINITY), None);
        assert_eq!(Duration::checked_from_days_f64(1e300), None);
    }

    #[test]
    fn round_ties_even_smoke() {
        assert_eq!(round_ties_even(2.5), Some(2));
        assert_eq!(round_ties_even(3.5), Some(4));
        assert_eq!(round_ties_even(-2.5), Some(-2));
        assert_eq!(round_ties_even(-3.5), Some(-4));
        assert_eq!(round_ties_even(2.4), Some(2));
        assert_eq!(round_ties_even(-2.6), Some(-3));
        assert_eq!(round_ties_even(f64::NAN), None);
    }

    #[cfg(feature = "std")]
    #[test]
    fn display() {
        assert_eq!(Duration::from_days(2).to_string(), "2 days, 0:00:00");
        assert_eq!(Duration::from_secs(3_661).to_string(), "1:01:01");
        assert_eq!(
            Duration::from_micros(-1).to_string(),
            "-1 day, 23:59:59.999999"
        );
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn chrono_duration() {
        let d = Duration::new(-1, 2, 3);
        let chrono_d = d.to_chrono_duration().unwrap();

        assert_eq!(chrono_d.num_microseconds(), Some(d.num_microseconds()));
        assert_eq!(Duration::from_chrono_duration(&chrono_d), Some(d));
    }
}
