//! The UTC to GPST leap second table.

use crate::{date_time, Timestamp};

/// A change of the cumulative leap second offset between UTC and GPST.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LeapSecond {
    effective_date: Timestamp,
    offset: i64,
}

impl LeapSecond {
    /// Creates an entry taking effect at midnight UTC of the specified date.
    ///
    /// The offset is the cumulative UTC minus GPST difference in seconds from
    /// that date on; it is negative since GPST runs ahead of UTC.
    ///
    /// # Panics
    ///
    /// Panics if the date is not valid, which is a compile-time error when
    /// used in a constant.
    pub const fn new(year: i32, month: u8, day: u8, offset: i64) -> Self {
        assert!(month >= 1 && month <= 12, "invalid month");
        assert!(
            day >= 1 && day <= date_time::days_in_month(year, month),
            "invalid day of month"
        );

        Self {
            effective_date: Timestamp::midnight(year, month, day),
            offset,
        }
    }

    /// The instant, at midnight UTC, from which this offset applies.
    pub const fn effective_date(&self) -> Timestamp {
        self.effective_date
    }

    /// The cumulative offset in seconds.
    pub const fn offset_seconds(&self) -> i64 {
        self.offset
    }
}

/// Leap seconds announced by the IERS since the GPS epoch, newest first.
///
/// Source: IERS Bulletin C (https://hpiers.obspm.fr/iers/bul/bulc/Leap_Second.dat).
/// A new leap second must be prepended here.
const IERS_LEAP_SECONDS: &[LeapSecond] = &[
    LeapSecond::new(2015, 7, 1, -17),
    LeapSecond::new(2012, 7, 1, -16),
    LeapSecond::new(2009, 1, 1, -15),
    LeapSecond::new(2006, 1, 1, -14),
    LeapSecond::new(1999, 1, 1, -13),
    LeapSecond::new(1997, 7, 1, -12),
    LeapSecond::new(1996, 1, 1, -11),
    LeapSecond::new(1994, 7, 1, -10),
    LeapSecond::new(1993, 7, 1, -9),
    LeapSecond::new(1992, 7, 1, -8),
    LeapSecond::new(1991, 1, 1, -7),
    LeapSecond::new(1990, 1, 1, -6),
    LeapSecond::new(1988, 1, 1, -5),
    LeapSecond::new(1985, 7, 1, -4),
    LeapSecond::new(1983, 7, 1, -3),
    LeapSecond::new(1982, 7, 1, -2),
    LeapSecond::new(1981, 7, 1, -1),
];

/// An immutable table of leap seconds, ordered from the most recent entry to
/// the oldest.
///
/// The built-in table is [`LeapSecondTable::IERS`]; its offset is 0 before
/// 1981-07-01 and -17 since 2015-07-01.
///
/// # Examples
///
/// ```
/// use gnss_calendar::{LeapSecondTable, Timestamp};
///
/// let table = LeapSecondTable::IERS;
///
/// let t = Timestamp::new(2015, 6, 30, 23, 59, 59, 999_999).unwrap();
/// assert_eq!(table.cumulative_offset_seconds(&t), -16);
///
/// let t = Timestamp::from_date(2015, 7, 1).unwrap();
/// assert_eq!(table.cumulative_offset_seconds(&t), -17);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LeapSecondTable {
    entries: &'static [LeapSecond],
}

impl LeapSecondTable {
    /// The leap seconds published by the IERS.
    pub const IERS: Self = Self::new(IERS_LEAP_SECONDS);

    /// Creates a table from entries sorted from the most recent to the oldest.
    ///
    /// # Panics
    ///
    /// Panics if the effective dates are not strictly decreasing or if the
    /// magnitude of the offsets increases backwards in time, which is a
    /// compile-time error when used in a constant.
    pub const fn new(entries: &'static [LeapSecond]) -> Self {
        let mut i = 1;
        while i < entries.len() {
            let newer = &entries[i - 1];
            let older = &entries[i];
            assert!(
                older.effective_date.secs < newer.effective_date.secs,
                "leap seconds must be sorted from the most recent to the oldest"
            );
            assert!(
                older.offset.abs() <= newer.offset.abs(),
                "leap second offsets must not shrink forward in time"
            );
            i += 1;
        }

        Self { entries }
    }

    /// The entries, from the most recent to the oldest.
    pub const fn entries(&self) -> &'static [LeapSecond] {
        self.entries
    }

    /// Returns the offset of the most recent entry that took effect at or
    /// before the specified UTC timestamp, or 0 if it precedes all entries.
    pub fn cumulative_offset_seconds(&self, t: &Timestamp) -> i64 {
        self.entries
            .iter()
            .find(|leap| *t >= leap.effective_date)
            .map_or(0, |leap| leap.offset)
    }
}

impl Default for LeapSecondTable {
    fn default() -> Self {
        Self::IERS
    }
}

/// Returns the cumulative UTC minus GPST offset in seconds applicable at the
/// specified UTC timestamp, from the built-in [`LeapSecondTable::IERS`] table.
///
/// # Examples
///
/// ```
/// use gnss_calendar::{cumulative_offset_seconds, Timestamp};
///
/// assert_eq!(cumulative_offset_seconds(&Timestamp::from_date(1980, 1, 1).unwrap()), 0);
/// assert_eq!(cumulative_offset_seconds(&Timestamp::from_date(2016, 1, 1).unwrap()), -17);
/// ```
pub fn cumulative_offset_seconds(t: &Timestamp) -> i64 {
    LeapSecondTable::IERS.cumulative_offset_seconds(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Duration;

    fn ymd(year: i32, month: u8, day: u8) -> Timestamp {
        Timestamp::from_date(year, month, day).unwrap()
    }

    #[test]
    fn before_first_entry() {
        assert_eq!(cumulative_offset_seconds(&ymd(1980, 1, 1)), 0);
        assert_eq!(cumulative_offset_seconds(&ymd(1980, 1, 6)), 0);
        assert_eq!(
            cumulative_offset_seconds(&Timestamp::new(1981, 6, 30, 23, 59, 59, 999_999).unwrap()),
            0
        );
        assert_eq!(cumulative_offset_seconds(&Timestamp::MIN), 0);
    }

    #[test]
    fn entries_apply_from_their_effective_date() {
        for leap in LeapSecondTable::IERS.entries() {
            let date = leap.effective_date();
            let just_before = date - Duration::from_micros(1);

            assert_eq!(cumulative_offset_seconds(&date), leap.offset_seconds());
            assert_eq!(
                cumulative_offset_seconds(&just_before),
                leap.offset_seconds() + 1
            );
        }
    }

    #[test]
    fn known_offsets() {
        assert_eq!(cumulative_offset_seconds(&ymd(2011, 1, 1)), -15);
        assert_eq!(cumulative_offset_seconds(&ymd(2016, 1, 1)), -17);
        assert_eq!(cumulative_offset_seconds(&Timestamp::MAX), -17);
        assert_eq!(ymd(1999, 8, 22).leap_seconds(), -13);
    }

    #[test]
    fn table_shape() {
        let entries = LeapSecondTable::IERS.entries();

        assert_eq!(entries.len(), 17);
        assert_eq!(entries.first().map(|l| l.effective_date()), Some(ymd(2015, 7, 1)));
        assert_eq!(entries.last().map(|l| l.effective_date()), Some(ymd(1981, 7, 1)));
        assert_eq!(LeapSecondTable::default(), LeapSecondTable::IERS);
    }

    #[test]
    fn offset_is_monotonic() {
        let mut t = ymd(1979, 1, 1);
        let mut previous = cumulative_offset_seconds(&t);
        while t < ymd(2020, 1, 1) {
            t += Duration::from_days(10);
            let offset = cumulative_offset_seconds(&t);
            assert!(offset <= previous);
            assert!(previous - offset <= 1);
            previous = offset;
        }
        assert_eq!(previous, -17);
    }

    #[test]
    fn custom_table() {
        const ENTRIES: &[LeapSecond] = &[
            LeapSecond::new(2000, 1, 1, -2),
            LeapSecond::new(1990, 1, 1, -1),
        ];
        const TABLE: LeapSecondTable = LeapSecondTable::new(ENTRIES);

        assert_eq!(TABLE.cumulative_offset_seconds(&ymd(1995, 1, 1)), -1);
        assert_eq!(TABLE.cumulative_offset_seconds(&ymd(2000, 1, 1)), -2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_validates_effective_date() {
        let leap = LeapSecondTable::IERS.entries()[0];
        let json = serde_json::to_string(&leap).unwrap();
        assert_eq!(serde_json::from_str::<LeapSecond>(&json).unwrap(), leap);

        let json = r#"{"effective_date":{"secs":0,"micros":1000000},"offset":-1}"#;
        assert!(serde_json::from_str::<LeapSecond>(json).is_err());
    }

    #[test]
    #[should_panic]
    fn unsorted_table() {
        static ENTRIES: [LeapSecond; 2] =
            [LeapSecond::new(1990, 1, 1, -1), LeapSecond::new(2000, 1, 1, -2)];
        let _ = LeapSecondTable::new(&ENTRIES);
    }
}
