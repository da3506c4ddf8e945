//! Resolution of the various ways a date can be specified.

use crate::{CalendarInputError, GpsCalendar, Timestamp};

/// A single date representation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CalendarInput<'a> {
    /// An explicit timestamp.
    DateTime(Timestamp),
    /// A year, month and day, at midnight.
    YearMonthDay(i32, u8, u8),
    /// A `yyyy/mm/dd` calendar string, at midnight.
    CalendarString(&'a str),
    /// A Modified Julian Day.
    ModifiedJulianDay(f64),
}

impl CalendarInput<'_> {
    /// Converts the representation to a timestamp.
    pub fn resolve(&self) -> Result<Timestamp, CalendarInputError> {
        let t = match *self {
            Self::DateTime(t) => t,
            Self::YearMonthDay(year, month, day) => Timestamp::from_date(year, month, day)?,
            Self::CalendarString(ymd) => Timestamp::from_calendar_str(ymd)?,
            Self::ModifiedJulianDay(mjd) => Timestamp::from_modified_julian_day(mjd)?,
        };

        Ok(t)
    }
}

impl From<Timestamp> for CalendarInput<'_> {
    fn from(t: Timestamp) -> Self {
        Self::DateTime(t)
    }
}

impl<'a> From<&'a str> for CalendarInput<'a> {
    fn from(ymd: &'a str) -> Self {
        Self::CalendarString(ymd)
    }
}

impl From<(i32, u8, u8)> for CalendarInput<'_> {
    fn from((year, month, day): (i32, u8, u8)) -> Self {
        Self::YearMonthDay(year, month, day)
    }
}

/// A set of optional date representations resolved with a fixed precedence.
///
/// When several representations are set, the first one in the following
/// order wins:
///
/// 1. [`date`](Self::date), an explicit timestamp;
/// 2. [`year_month_day`](Self::year_month_day), which replaces the date of
///    the positional input (or of the fallback timestamp) and keeps its time
///    of day, or denotes midnight if there is neither;
/// 3. [`calendar_string`](Self::calendar_string), a `yyyy/mm/dd` string;
/// 4. [`mjd`](Self::mjd), a Modified Julian Day;
/// 5. [`positional`](Self::positional), any [`CalendarInput`];
/// 6. the fallback timestamp passed to [`resolve`](Self::resolve), if any.
///
/// Only the winning representations are validated.
///
/// # Examples
///
/// ```
/// use gnss_calendar::{CalendarQuery, Timestamp};
///
/// let query = CalendarQuery::new()
///     .with_calendar_string("2013/12/31")
///     .with_mjd(55562.0);
///
/// assert_eq!(
///     query.resolve(None).unwrap(),
///     Timestamp::from_date(2013, 12, 31).unwrap()
/// );
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CalendarQuery<'a> {
    /// An explicit timestamp.
    pub date: Option<Timestamp>,
    /// A year, month and day.
    pub year_month_day: Option<(i32, u8, u8)>,
    /// A `yyyy/mm/dd` calendar string.
    pub calendar_string: Option<&'a str>,
    /// A Modified Julian Day.
    pub mjd: Option<f64>,
    /// A date given without naming its representation.
    pub positional: Option<CalendarInput<'a>>,
}

impl<'a> CalendarQuery<'a> {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the explicit timestamp.
    pub fn with_date(self, date: Timestamp) -> Self {
        Self {
            date: Some(date),
            ..self
        }
    }

    /// Sets the year, month and day.
    pub fn with_year_month_day(self, year: i32, month: u8, day: u8) -> Self {
        Self {
            year_month_day: Some((year, month, day)),
            ..self
        }
    }

    /// Sets the `yyyy/mm/dd` calendar string.
    pub fn with_calendar_string(self, ymd: &'a str) -> Self {
        Self {
            calendar_string: Some(ymd),
            ..self
        }
    }

    /// Sets the Modified Julian Day.
    pub fn with_mjd(self, mjd: f64) -> Self {
        Self {
            mjd: Some(mjd),
            ..self
        }
    }

    /// Sets the positional input.
    pub fn with_positional(self, input: impl Into<CalendarInput<'a>>) -> Self {
        Self {
            positional: Some(input.into()),
            ..self
        }
    }

    /// Resolves the query to a single timestamp.
    ///
    /// Returns [`CalendarInputError::AmbiguousInput`] if no representation is
    /// set and no fallback is provided, or the error of the winning
    /// representation if it is invalid.
    pub fn resolve(&self, fallback: Option<Timestamp>) -> Result<Timestamp, CalendarInputError> {
        if let Some(date) = self.date {
            return Ok(date);
        }

        let base = match self.positional {
            Some(input) if self.year_month_day.is_some()
                || (self.calendar_string.is_none() && self.mjd.is_none()) =>
            {
                Some(input.resolve()?)
            }
            _ => fallback,
        };

        if let Some((year, month, day)) = self.year_month_day {
            let t = match base {
                Some(base) => base.with_date(year, month, day)?,
                None => Timestamp::from_date(year, month, day)?,
            };
            return Ok(t);
        }
        if let Some(ymd) = self.calendar_string {
            return Ok(Timestamp::from_calendar_str(ymd)?);
        }
        if let Some(mjd) = self.mjd {
            return Ok(Timestamp::from_modified_julian_day(mjd)?);
        }

        base.ok_or(CalendarInputError::AmbiguousInput)
    }
}

impl<'a> From<CalendarInput<'a>> for CalendarQuery<'a> {
    fn from(input: CalendarInput<'a>) -> Self {
        Self::new().with_positional(input)
    }
}

impl From<Timestamp> for CalendarQuery<'_> {
    fn from(t: Timestamp) -> Self {
        Self::new().with_date(t)
    }
}

impl<'a> From<&'a str> for CalendarQuery<'a> {
    fn from(ymd: &'a str) -> Self {
        Self::new().with_calendar_string(ymd)
    }
}

impl From<(i32, u8, u8)> for CalendarQuery<'_> {
    fn from((year, month, day): (i32, u8, u8)) -> Self {
        Self::new().with_year_month_day(year, month, day)
    }
}

impl Timestamp {
    /// Returns the GPS calendar of the date described by the query, or of
    /// this timestamp if the query is empty.
    ///
    /// See [`CalendarQuery`] for the precedence between representations.
    ///
    /// # Examples
    ///
    /// ```
    /// use gnss_calendar::{CalendarQuery, Timestamp};
    ///
    /// let t = Timestamp::from_date(2011, 1, 1).unwrap();
    ///
    /// assert_eq!(t.gps_calendar_of(CalendarQuery::new()).unwrap().week, 1616);
    /// assert_eq!(t.gps_calendar_of("2013/12/31").unwrap().week, 1773);
    /// ```
    pub fn gps_calendar_of<'a>(
        &self,
        query: impl Into<CalendarQuery<'a>>,
    ) -> Result<GpsCalendar, CalendarInputError> {
        query
            .into()
            .resolve(Some(*self))
            .map(|t| t.gps_calendar())
    }
}

/// Returns the GPS calendar of the date described by the query.
///
/// See [`CalendarQuery`] for the precedence between representations.
///
/// Returns [`CalendarInputError::AmbiguousInput`] if the query is empty.
///
/// # Examples
///
/// ```
/// use gnss_calendar::{gps_calendar, CalendarInput, CalendarQuery, GpsCalendar};
///
/// let expected = GpsCalendar { day_of_year: 365, week: 1773, weekday: 2 };
///
/// assert_eq!(gps_calendar((2013, 12, 31)), Ok(expected));
/// assert_eq!(gps_calendar("2013/12/31"), Ok(expected));
/// assert_eq!(gps_calendar(CalendarInput::ModifiedJulianDay(56657.0)), Ok(expected));
/// assert!(gps_calendar(CalendarQuery::new()).is_err());
/// ```
pub fn gps_calendar<'a>(
    query: impl Into<CalendarQuery<'a>>,
) -> Result<GpsCalendar, CalendarInputError> {
    query.into().resolve(None).map(|t| t.gps_calendar())
}
