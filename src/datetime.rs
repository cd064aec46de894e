//! Civil date and time in the proleptic gregorian calendar.

use std::fmt;

use crate::timezone::ZoneName;
use crate::{
    Error, DAYS_PER_400_YEARS, DAYS_TO_UNIX_EPOCH, MONTH_LENGTH_LEAP_YEAR,
    MONTH_LENGTH_NORMAL_YEAR, MONTH_START_LEAP_YEAR, MONTH_START_NORMAL_YEAR, SECONDS_PER_DAY,
    SECONDS_PER_HOUR,
};

/// Month of every day of a leap-shaped year
const MONTH_OF_YEAR_DAY: [u8; 366] = {
    let mut table = [0; 366];
    let mut day = 0;
    while day < 366 {
        let mut month = 11;
        while MONTH_START_LEAP_YEAR[month] > day as i64 {
            month -= 1;
        }
        table[day] = month as u8;
        day += 1;
    }
    table
};

/// Day of the month of every day of a leap-shaped year
const MONTH_DAY_OF_YEAR_DAY: [u8; 366] = {
    let mut table = [0; 366];
    let mut day = 0;
    while day < 366 {
        let month = MONTH_OF_YEAR_DAY[day] as usize;
        table[day] = (day as i64 - MONTH_START_LEAP_YEAR[month] + 1) as u8;
        day += 1;
    }
    table
};

/// Daylight saving disposition of a civil time record
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DaylightFlag {
    /// Standard time applies
    Standard,
    /// Daylight saving time applies
    Daylight,
    /// Not decided yet; zone-aware conversions classify the record against the zone rules
    Unknown,
}

/// Civil date and time record.
///
/// The record is the broken-down form of a timestamp: all fields are public and the record
/// carries no hidden state, like the `tm` structure of the C library. Records produced by the
/// conversion functions always have mutually consistent `month`, `month_day`, `week_day` and
/// `year_day` fields; hand-built records are validated when they are converted.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CivilTime {
    /// Astronomical year; year 0 exists and negative years precede it
    pub year: i64,
    /// Month in `[0, 11]` from January
    pub month: u8,
    /// Day of the month in `[1, 31]`
    pub month_day: u8,
    /// Hour in `[0, 23]`
    pub hour: u8,
    /// Minute in `[0, 59]`
    pub minute: u8,
    /// Second in `[0, 60]`, where `60` admits a positive leap second
    pub second: u8,
    /// Day of the week in `[0, 6]` from Sunday
    pub week_day: u8,
    /// Day of the year in `[0, 365]` from January 1
    pub year_day: u16,
    /// Daylight saving disposition
    pub daylight: DaylightFlag,
    /// Offset from UTC in seconds; local time = UTC + offset
    pub ut_offset: i32,
    /// Designation of the zone the record was projected into
    pub zone_name: Option<ZoneName>,
}

impl Default for CivilTime {
    /// The consistent record for 0000-01-01T00:00:00, with an unknown daylight disposition
    fn default() -> Self {
        Self {
            year: 0,
            month: 0,
            month_day: 1,
            hour: 0,
            minute: 0,
            second: 0,
            week_day: 6,
            year_day: 0,
            daylight: DaylightFlag::Unknown,
            ut_offset: 0,
            zone_name: None,
        }
    }
}

impl CivilTime {
    /// Construct a civil time record with consistent derived fields.
    ///
    /// The record is rebuilt from its own timestamp, so `week_day` and `year_day` are always
    /// filled in and a second of `60` rolls over into the next minute. The daylight disposition
    /// of the result is [`DaylightFlag::Unknown`].
    pub fn new(
        year: i64,
        month: u8,
        month_day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) -> Result<Self, Error> {
        let civil =
            Self { year, month, month_day, hour, minute, second, ..Self::default() };

        let mut civil = Self::from_unix_time(civil.unix_time()?);
        civil.daylight = DaylightFlag::Unknown;
        Ok(civil)
    }

    /// Unix time of the record interpreted as UTC.
    ///
    /// Fields outside of their domain are rejected with [`Error::OutOfRange`], including a day
    /// of the month past the end of the month for the record's year; nothing is clamped.
    pub fn unix_time(&self) -> Result<i64, Error> {
        let start = year_start(self.year)?;
        let year_time = seconds_into_year(self, start.leap)?;

        match start.unix_time.checked_add(year_time) {
            Some(unix_time) => Ok(unix_time),
            None => Err(Error::OutOfRange("unix time out of range")),
        }
    }

    /// Civil time of a Unix time instant in UTC.
    ///
    /// The conversion is total: every 64-bit second count maps to a valid record. The result
    /// carries a zero UTC offset, no zone designation and a standard daylight disposition.
    pub fn from_unix_time(unix_time: i64) -> Self {
        let position = year_position(unix_time);

        let mut day = position.year_day;
        if !position.leap && day >= 59 {
            day += 1; // skip the February 29 slot of the leap-shaped tables
        }

        Self {
            year: position.year,
            month: MONTH_OF_YEAR_DAY[day as usize],
            month_day: MONTH_DAY_OF_YEAR_DAY[day as usize],
            hour: (position.day_time / SECONDS_PER_HOUR) as u8,
            minute: (position.day_time % SECONDS_PER_HOUR / 60) as u8,
            second: (position.day_time % 60) as u8,
            week_day: position.week_day,
            year_day: position.year_day as u16,
            daylight: DaylightFlag::Standard,
            ut_offset: 0,
            zone_name: None,
        }
    }

    /// Historical year of the record.
    ///
    /// The astronomical calendar has a year 0, the historical one does not: historical year 1 BC
    /// is astronomical year 0, 2 BC is -1, and so on.
    pub fn historical_year(&self) -> i64 {
        if self.year <= 0 {
            self.year - 1
        } else {
            self.year
        }
    }
}

impl fmt::Display for CivilTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.year < 0 {
            write!(f, "-{:04}", self.year.unsigned_abs())?;
        } else {
            write!(f, "{:04}", self.year)?;
        }

        write!(
            f,
            "-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.month + 1,
            self.month_day,
            self.hour,
            self.minute,
            self.second
        )?;

        if self.ut_offset == 0 {
            return f.write_str("Z");
        }

        let (sign, offset) =
            if self.ut_offset < 0 { ('-', -self.ut_offset) } else { ('+', self.ut_offset) };
        write!(f, "{}{:02}:{:02}", sign, offset / 3600, offset % 3600 / 60)?;
        if offset % 60 != 0 {
            write!(f, ":{:02}", offset % 60)?;
        }
        Ok(())
    }
}

/// Check if a year is a leap year in the proleptic gregorian calendar
pub fn is_leap_year(year: i64) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Start of a civil year on the Unix time scale
pub(crate) struct YearStart {
    /// Unix time of January 1, 00:00:00 UTC
    pub(crate) unix_time: i64,
    /// Week day of January 1, from Sunday
    pub(crate) week_day: u8,
    /// Leap year flag
    pub(crate) leap: bool,
}

/// Compute the start of a civil year in closed form.
///
/// The year is normalized into a 400-year epoch, then whole centuries, the leap-free head years
/// of a century, 1461-day quadrennia and residual years are added from fixed day counts.
pub(crate) fn year_start(year: i64) -> Result<YearStart, Error> {
    let epoch = year.div_euclid(400);
    let mut rest = year.rem_euclid(400);

    let epoch_days = match epoch.checked_mul(DAYS_PER_400_YEARS) {
        Some(days) => days,
        None => return Err(Error::OutOfRange("year out of range")),
    };

    let mut days: i64 = 0;
    let mut leap_aligned = true;

    if rest >= 100 {
        let centuries = rest / 100;
        days += 36_525 + (centuries - 1) * 36_524;
        rest -= centuries * 100;

        if rest >= 4 {
            // the first four years of a century carry no leap day
            days += 4 * 365;
            rest -= 4;
        } else {
            leap_aligned = false;
        }
    }

    let leap;
    if leap_aligned {
        // the remaining quadrennia each start with a leap year
        days += rest / 4 * 1461;
        rest %= 4;
        days += [0, 366, 731, 1096][rest as usize];
        leap = rest == 0;
    } else {
        days += rest * 365;
        leap = false;
    }

    let days = match epoch_days.checked_add(days) {
        Some(days) => days,
        None => return Err(Error::OutOfRange("year out of range")),
    };

    let unix_time = days
        .checked_sub(DAYS_TO_UNIX_EPOCH)
        .and_then(|days| days.checked_mul(SECONDS_PER_DAY));
    let unix_time = match unix_time {
        Some(unix_time) => unix_time,
        None => return Err(Error::OutOfRange("year out of range")),
    };

    // every 400-year epoch starts on the same week day, Saturday
    let week_day = ((days.rem_euclid(7) + 6) % 7) as u8;

    Ok(YearStart { unix_time, week_day, leap })
}

/// Seconds between the start of the year and the civil time, validating the record fields
pub(crate) fn seconds_into_year(civil: &CivilTime, leap: bool) -> Result<i64, Error> {
    if civil.second > 60 {
        // 60 admits the specification of a positive leap second
        return Err(Error::OutOfRange("invalid second"));
    }
    if civil.minute > 59 {
        return Err(Error::OutOfRange("invalid minute"));
    }
    if civil.hour > 23 {
        return Err(Error::OutOfRange("invalid hour"));
    }
    if civil.month > 11 {
        return Err(Error::OutOfRange("invalid month"));
    }

    let month = civil.month as usize;
    let (month_starts, month_lengths) = if leap {
        (&MONTH_START_LEAP_YEAR, &MONTH_LENGTH_LEAP_YEAR)
    } else {
        (&MONTH_START_NORMAL_YEAR, &MONTH_LENGTH_NORMAL_YEAR)
    };

    if civil.month_day < 1 || civil.month_day as i64 > month_lengths[month] {
        return Err(Error::OutOfRange("invalid month day"));
    }

    Ok((month_starts[month] + civil.month_day as i64 - 1) * SECONDS_PER_DAY
        + civil.hour as i64 * SECONDS_PER_HOUR
        + civil.minute as i64 * 60
        + civil.second as i64)
}

/// Position of a Unix time instant within its civil year
pub(crate) struct YearPosition {
    /// Civil year of the instant
    pub(crate) year: i64,
    /// Day within the year, 0-based
    pub(crate) year_day: i64,
    /// Seconds within the day
    pub(crate) day_time: i64,
    /// Week day of the instant's day, from Sunday
    pub(crate) week_day: u8,
    /// Week day of January 1 of the instant's year, from Sunday
    pub(crate) year_week_day: u8,
    /// Leap year flag
    pub(crate) leap: bool,
}

/// Decompose a Unix time instant into its position within a civil year.
///
/// The dual of [`year_start`]: the 400-year epoch index is peeled off with floor division, then
/// at most three centuries, the leap-free head years of a century, 1461-day quadrennia and
/// residual years. Total over the whole 64-bit scale; the epoch shift runs in 128 bits so the
/// extreme ends cannot overflow.
pub(crate) fn year_position(unix_time: i64) -> YearPosition {
    let seconds =
        unix_time as i128 + DAYS_TO_UNIX_EPOCH as i128 * SECONDS_PER_DAY as i128;
    let total_days = seconds.div_euclid(SECONDS_PER_DAY as i128) as i64;
    let day_time = seconds.rem_euclid(SECONDS_PER_DAY as i128) as i64;

    let week_day = ((total_days.rem_euclid(7) + 6) % 7) as u8;

    let epoch = total_days.div_euclid(DAYS_PER_400_YEARS);
    let mut day = total_days - epoch * DAYS_PER_400_YEARS;
    let mut year = epoch * 400;

    let mut leap = false;
    let mut century_head = false;

    if day >= 36_525 {
        day -= 36_525;
        year += 100;

        if day >= 36_524 {
            day -= 36_524;
            year += 100;

            if day >= 36_524 {
                day -= 36_524;
                year += 100;
            }
        }

        if day >= 1460 {
            // past the leap-free head years, the remaining quadrennia start with a leap year
            day -= 1460;
            year += 4;
        } else {
            century_head = true;
            while day >= 365 {
                day -= 365;
                year += 1;
            }
        }
    }

    let quadrennia = day / 1461;
    year += quadrennia * 4;
    day -= quadrennia * 1461;

    if day >= 1096 {
        year += 3;
        day -= 1096;
    } else if day >= 731 {
        year += 2;
        day -= 731;
    } else if day >= 366 {
        year += 1;
        day -= 366;
    } else if !century_head {
        leap = true;
    }

    let year_week_day = (((total_days - day).rem_euclid(7) + 6) % 7) as u8;

    YearPosition { year, year_day: day, day_time, week_day, year_week_day, leap }
}

/// ISO 8601 calendar week of the year of a civil time record, in `[1, 53]`.
///
/// Week 1 is the week containing the first Thursday of the year; weeks start on Monday. A
/// result of 53 for a date in early January refers to the last week of the previous year.
pub fn calendar_week_of_year(civil: &CivilTime) -> u8 {
    // shift by one: the calendar week starts on Monday, the record's week day on Sunday
    let mut year_start = (civil.week_day as i64 - civil.year_day as i64 - 1).rem_euclid(7);

    if year_start >= 4 {
        year_start -= 7; // January 1 still belongs to week 53 of the previous year
    }

    let mut week = (civil.year_day as i64 + year_start + 7) / 7;

    if week == 53 {
        // week 53 is week 1 of the next year unless December 31 falls on or after Thursday
        let year_length = 365 + is_leap_year(civil.year) as i64;
        if (year_start + year_length).rem_euclid(7) < 4 {
            week = 1;
        }
    }

    if week == 0 {
        week = 53;
    }

    week as u8
}

/// ISO 8601 calendar week of the year of a Unix time instant, interpreted in UTC
pub fn calendar_week_of_time(unix_time: i64) -> u8 {
    calendar_week_of_year(&CivilTime::from_unix_time(unix_time))
}

/// ISO 8601 calendar week of a date, with the month in `[0, 11]`.
///
/// Out-of-range arguments are rejected with [`Error::OutOfRange`].
pub fn week_of_year(year: i64, month: u8, month_day: u8) -> Result<u8, Error> {
    let civil = CivilTime::new(year, month, month_day, 12, 0, 0)?;
    Ok(calendar_week_of_year(&civil))
}
