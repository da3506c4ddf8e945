//! Date-time processing.

use core::str::FromStr;

use super::ParseDateTimeError;

const DAYS_IN_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const DAYS_IN_MONTH_LEAP: [u8; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const DOY_AT_MONTH: [i32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
const DOY_AT_MONTH_LEAP: [i32; 12] = [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

/// Number of days in a 400-year Gregorian cycle.
const DAYS_IN_400_YEARS: i64 = 146_097;

/// Returns whether the year is a leap year.
///
/// The argument is the proleptic Gregorian year, with the ISO 8601
/// interpretation of year 0 as year 1 BC. Year 0 does not obey the usual rule
/// and is considered a leap year.
pub(crate) const fn is_leap(year: i32) -> bool {
    (year & 0b11) == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Calculates the number of days in a month.
///
/// The month must be in the range 1 to 12.
pub(crate) const fn days_in_month(year: i32, month: u8) -> u8 {
    let month_idx = (month - 1) as usize;

    if is_leap(year) {
        DAYS_IN_MONTH_LEAP[month_idx]
    } else {
        DAYS_IN_MONTH[month_idx]
    }
}

/// Calculates the 0-based day of the year.
pub(crate) const fn day_of_year(year: i32, month: u8, day: u8) -> i32 {
    let month_idx = (month - 1) as usize;
    let table = if is_leap(year) {
        &DOY_AT_MONTH_LEAP
    } else {
        &DOY_AT_MONTH
    };

    (day - 1) as i32 + table[month_idx]
}

/// Calculates the month and the day of the month for a 0-based day of the year.
pub(crate) fn month_and_day_of_month(year: i32, doy: i32) -> (u8, u8) {
    let table = if is_leap(year) {
        &DOY_AT_MONTH_LEAP
    } else {
        &DOY_AT_MONTH
    };

    let idx = table.binary_search(&doy).unwrap_or_else(|e| e - 1);
    let month = idx as u8 + 1;
    let day = (doy - table[idx]) as u8 + 1;

    (month, day)
}

/// Returns the number of elapsed days since the first day of year 0 to the
/// first day of the provided year.
///
/// The argument is the proleptic Gregorian year, with the ISO 8601
/// interpretation of year 0 as year 1 BC.
///
/// The result is negative for negative years.
pub(crate) const fn days_from_year_0(year: i32) -> i64 {
    let year = year as i64;
    let offset = (year > 0) as i64;
    let y = year - offset;
    let m4 = y / 4 + offset;
    let m100 = y / 100;
    let m400 = m100 / 4;

    year * 365 + m4 - m100 + m400
}

/// Returns the year and the 0-based day of the year for a number of days
/// elapsed since the first day of year 0.
pub(crate) fn days_to_date(days_from_year_0: i64) -> (i32, i32) {
    // Find the nearest 400-year boundary that is before or at the date.
    let n_period = days_from_year_0.div_euclid(DAYS_IN_400_YEARS);
    let mut day = days_from_year_0.rem_euclid(DAYS_IN_400_YEARS);

    // -- `day` is now guaranteed to be positive.

    let mut year = 400 * n_period;
    if day < 366 {
        return (year as i32, day as i32);
    }

    // Find the nearest 100-year, 4-year and 1-year boundaries that are before
    // or at the date.
    for (years_in_period, days_in_period, starts_with_non_leap_year) in
        [(100, 36524, 1), (4, 1461, 0), (1, 365, 1)]
    {
        day -= starts_with_non_leap_year;
        let n_period = day / days_in_period;
        year += years_in_period * n_period;
        day -= n_period * days_in_period;
        if day < (366 - starts_with_non_leap_year) {
            return (year as i32, day as i32);
        }
        day += starts_with_non_leap_year;
    }

    unreachable!();
}

/// Parses a `yyyy/mm/dd` calendar date.
///
/// Each field may have any width and may be surrounded by whitespace; the
/// year may be signed.
pub(crate) fn parse_calendar_date(stream: &str) -> Result<(i32, u8, u8), ParseDateTimeError> {
    fn pull_field<'a, T: FromStr>(
        fields: &mut impl Iterator<Item = &'a str>,
    ) -> Result<T, ParseDateTimeError> {
        fields
            .next()
            .ok_or(ParseDateTimeError::MissingField)?
            .trim()
            .parse()
            .map_err(|_| ParseDateTimeError::InvalidFieldValue)
    }

    let mut fields = stream.trim().split('/');

    let year = pull_field(&mut fields)?;
    let month = pull_field(&mut fields)?;
    let day = pull_field(&mut fields)?;
    if fields.next().is_some() {
        return Err(ParseDateTimeError::UnexpectedField);
    }

    Ok((year, month, day))
}

/// Parses an RFC3339-like UTC date-time with signed years. Time zones and
/// offsets suffixes are invalid.
///
/// Expected format:
///
/// `[±][Y]...[Y]YYYY-MM-DD hh:mm:ss[.d[d]...[d]]`
///
/// or:
///
/// `[±][Y]...[Y]YYYY-MM-DD'T'hh:mm:ss[.d[d]...[d]]`
///
/// where delimiter `T` between date and time may also be a lowercase `t`.
///
/// Digits of the fractional part beyond the microsecond are validated, then
/// truncated.
#[allow(clippy::type_complexity)]
pub(crate) fn parse_date_time(
    stream: &str,
) -> Result<(i32, u8, u8, u8, u8, u8, u32), ParseDateTimeError> {
    // Expect 2 leading digits optionally followed by one of the provided
    // delimiters, and return them as a single `u8`, together with the remaining part
    // of the stream if a delimiter was found.
    fn pull_two_digits<'a, E>(
        stream: &'a str,
        delimiter: &'a [char],
        missing_delimiter_error: E,
    ) -> Result<(u8, Result<&'a str, E>), ParseDateTimeError> {
        let (token, stream) = stream
            .split_once(delimiter)
            .map(|(t, s)| (t, Ok(s)))
            .unwrap_or((stream, Err(missing_delimiter_error)));

        if token.len() != 2 {
            return Err(ParseDateTimeError::InvalidFieldWidth);
        }
        if !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseDateTimeError::InvalidFieldValue);
        }

        token
            .parse()
            .map_err(|_| ParseDateTimeError::InvalidFieldValue)
            .map(|token| (token, stream))
    }

    // Pull the leading sign of the year, if any.
    let (stream, sign) = match stream.chars().next() {
        Some('+') => (&stream[1..], 1),
        Some('-') => (&stream[1..], -1),
        _ => (stream, 1),
    };

    // Pull the year.
    let (year, stream) = stream
        .split_once('-')
        .ok_or(ParseDateTimeError::MissingField)?;
    if year.len() < 4 {
        return Err(ParseDateTimeError::InvalidFieldWidth);
    }
    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseDateTimeError::InvalidFieldValue);
    }
    let year = year
        .parse()
        .map(|year: i32| sign * year)
        .map_err(|_| ParseDateTimeError::InvalidFieldValue)?;

    // Pull month, day, hour, minute and second.
    let (month, stream) = pull_two_digits(stream, &['-'], ParseDateTimeError::MissingField)?;
    let (day, stream) =
        pull_two_digits(stream?, &[' ', 'T', 't'], ParseDateTimeError::MissingField)?;
    let (hour, stream) = pull_two_digits(stream?, &[':'], ParseDateTimeError::MissingField)?;
    let (min, stream) = pull_two_digits(stream?, &[':'], ParseDateTimeError::MissingField)?;
    let (sec, stream) = pull_two_digits(stream?, &['.'], ())?;

    // Parse the fraction.
    let mut micros = 0u32;
    match stream {
        Ok("") => return Err(ParseDateTimeError::MissingField),
        Ok(stream) => {
            let mut weight = 100_000;
            for c in stream.chars() {
                // All digits are validated even if their weight is 0.
                let digit = c
                    .to_digit(10)
                    .ok_or(ParseDateTimeError::InvalidFieldValue)?;
                micros += digit * weight;
                weight /= 10;
            }
        }
        Err(_) => {}
    }

    Ok((year, month, day, hour, min, sec, micros))
}
