//! Error types.

use core::fmt;

/// The error type returned when date-time components do not denote a valid
/// instant, or when the result of a computation falls outside the supported
/// range of years.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DateTimeError {
    /// The year is outside the supported range (see
    /// [`Timestamp::MIN`](crate::Timestamp::MIN) and
    /// [`Timestamp::MAX`](crate::Timestamp::MAX)).
    InvalidYear(i32),
    /// The month is not between 1 and 12.
    InvalidMonth(u8),
    /// The day of the month is less than 1, or more than the maximum value for
    /// this combination of year and month.
    InvalidDayOfMonth(u8),
    /// The hour field value is not between 0 and 23.
    InvalidHour(u8),
    /// The minute field value is not between 0 and 59.
    InvalidMinute(u8),
    /// The second field value is not between 0 and 59.
    InvalidSecond(u8),
    /// The microsecond field value is more than 999 999.
    InvalidMicrosecond(u32),
    /// The day of the year is less than 1.
    InvalidDayOfYear(i64),
    /// The result lies outside the supported range of years, or a
    /// floating-point input is not finite.
    OutOfRange,
}

impl fmt::Display for DateTimeError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidYear(year) => write!(fmt, "year '{}' is out of range", year),
            Self::InvalidMonth(month) => write!(fmt, "month numeral '{}' is not valid", month),
            Self::InvalidDayOfMonth(day) => {
                write!(fmt, "day of month '{}' is not valid for this date", day)
            }
            Self::InvalidHour(hour) => write!(fmt, "hour numeral '{}' is not valid", hour),
            Self::InvalidMinute(min) => write!(fmt, "minute numeral '{}' is not valid", min),
            Self::InvalidSecond(sec) => write!(fmt, "second numeral '{}' is not valid", sec),
            Self::InvalidMicrosecond(micros) => {
                write!(fmt, "microsecond value '{}' is not valid", micros)
            }
            Self::InvalidDayOfYear(doy) => {
                write!(fmt, "day of year '{}' is not valid, it must be positive", doy)
            }
            Self::OutOfRange => "timestamp outside supported range".fmt(fmt),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DateTimeError {}

/// The error type returned when a date or date-time string is malformed or
/// does not denote a valid instant.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseDateTimeError {
    /// A field value is either not of the expected numeric type or is out of
    /// range for the expected numeric type.
    InvalidFieldValue,
    /// The width of a fixed-width or minimum-width field is invalid.
    InvalidFieldWidth,
    /// A field is missing.
    MissingField,
    /// The string contains more fields than expected.
    UnexpectedField,
    /// The fields were parsed but do not denote a valid instant.
    RangeError(DateTimeError),
}

impl fmt::Display for ParseDateTimeError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFieldValue => "one of the fields is invalid".fmt(fmt),
            Self::InvalidFieldWidth => "the width of one of the fields is invalid".fmt(fmt),
            Self::MissingField => "a field is missing".fmt(fmt),
            Self::UnexpectedField => "unexpected trailing field".fmt(fmt),
            Self::RangeError(err) => err.fmt(fmt),
        }
    }
}

impl From<DateTimeError> for ParseDateTimeError {
    fn from(err: DateTimeError) -> Self {
        Self::RangeError(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseDateTimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RangeError(err) => Some(err),
            _ => None,
        }
    }
}

/// The error type returned when a [`CalendarQuery`](crate::CalendarQuery)
/// cannot be resolved to a timestamp.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalendarInputError {
    /// No representation was supplied and there is no timestamp to fall back
    /// on.
    AmbiguousInput,
    /// The supplied components do not denote a valid instant.
    Date(DateTimeError),
    /// The supplied calendar string is malformed.
    Format(ParseDateTimeError),
}

impl fmt::Display for CalendarInputError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmbiguousInput => "no date representation was provided".fmt(fmt),
            Self::Date(err) => err.fmt(fmt),
            Self::Format(err) => err.fmt(fmt),
        }
    }
}

impl From<DateTimeError> for CalendarInputError {
    fn from(err: DateTimeError) -> Self {
        Self::Date(err)
    }
}

impl From<ParseDateTimeError> for CalendarInputError {
    fn from(err: ParseDateTimeError) -> Self {
        Self::Format(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CalendarInputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::AmbiguousInput => None,
            Self::Date(err) => Some(err),
            Self::Format(err) => Some(err),
        }
    }
}
