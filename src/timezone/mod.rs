//! Time zone rules and zone-aware conversions.

use std::{fmt, str};

use crate::datetime::{seconds_into_year, year_position, year_start, CivilTime, DaylightFlag};
use crate::parse::parse_zone_info;
use crate::{
    Error, MONTH_LENGTH_LEAP_YEAR, MONTH_LENGTH_NORMAL_YEAR, MONTH_START_LEAP_YEAR,
    MONTH_START_NORMAL_YEAR, SECONDS_PER_DAY, SECONDS_PER_WEEK,
};

#[cfg(test)]
mod tests;

/// Designation of the UTC fallback zone
const UTC_NAME: ZoneName =
    ZoneName { bytes: [3, b'U', b'T', b'C', 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0] };

/// ASCII-encoded fixed-capacity zone designation
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct ZoneName {
    /// Length-prefixed string buffer
    bytes: [u8; 16],
}

impl ZoneName {
    /// Construct a zone designation.
    ///
    /// Designations have between 3 and 15 characters from `[0-9A-Za-z+-]`; anything longer is an
    /// error, never a silent truncation.
    pub fn new(input: &[u8]) -> Result<Self, Error> {
        let len = input.len();

        if !(3..=15).contains(&len) {
            return Err(Error::ZoneName("designation must have between 3 and 15 characters"));
        }

        let mut bytes = [0; 16];
        bytes[0] = len as u8;

        for (i, &b) in input.iter().enumerate() {
            if !matches!(b, b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z' | b'+' | b'-') {
                return Err(Error::ZoneName("invalid character in designation"));
            }

            bytes[i + 1] = b;
        }

        Ok(Self { bytes })
    }

    /// Returns the designation as a byte slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[1..1 + self.bytes[0] as usize]
    }

    /// Returns the designation as a string
    pub fn as_str(&self) -> &str {
        // SAFETY: only ASCII bytes are accepted at construction
        unsafe { str::from_utf8_unchecked(self.as_bytes()) }
    }
}

impl fmt::Debug for ZoneName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl fmt::Display for ZoneName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Julian day in `[1, 365]`; February 29 of leap years is skipped over and not referenceable
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct JulianDay(u16);

impl JulianDay {
    /// Construct a transition day represented by a Julian day in `[1, 365]`
    pub fn new(day: u16) -> Result<Self, Error> {
        if !(1..=365).contains(&day) {
            return Err(Error::ZoneRule("invalid julian day"));
        }

        Ok(Self(day))
    }

    /// Returns the inner value
    pub fn get(&self) -> u16 {
        self.0
    }
}

/// Zero-based day of the year in `[0, 365]`, counting February 29 in leap years
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DayOfYear(u16);

impl DayOfYear {
    /// Construct a transition day represented by a zero-based day of the year in `[0, 365]`
    pub fn new(day: u16) -> Result<Self, Error> {
        if day > 365 {
            return Err(Error::ZoneRule("invalid day of the year"));
        }

        Ok(Self(day))
    }

    /// Returns the inner value
    pub fn get(&self) -> u16 {
        self.0
    }
}

/// Day selected by a month, a week of the month and a week day
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MonthWeekDay {
    /// Month in `[1, 12]`
    month: u8,
    /// Week of the month in `[1, 5]`, with `5` meaning the last occurrence of the week day
    week: u8,
    /// Day of the week in `[0, 6]` from Sunday
    week_day: u8,
}

impl MonthWeekDay {
    /// Construct a transition day represented by a month, a week of the month and a week day
    pub fn new(month: u8, week: u8, week_day: u8) -> Result<Self, Error> {
        if !(1..=12).contains(&month) {
            return Err(Error::ZoneRule("invalid month"));
        }

        if !(1..=5).contains(&week) {
            return Err(Error::ZoneRule("invalid week of the month"));
        }

        if week_day > 6 {
            return Err(Error::ZoneRule("invalid week day"));
        }

        Ok(Self { month, week, week_day })
    }

    /// Returns the month in `[1, 12]`
    pub fn month(&self) -> u8 {
        self.month
    }

    /// Returns the week of the month in `[1, 5]`
    pub fn week(&self) -> u8 {
        self.week
    }

    /// Returns the day of the week in `[0, 6]` from Sunday
    pub fn week_day(&self) -> u8 {
        self.week_day
    }
}

/// Day on which a zone rule takes effect
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RuleDay {
    /// Julian day, February 29 not referenceable
    JulianDay(JulianDay),
    /// Zero-based day of the year, counting February 29
    DayOfYear(DayOfYear),
    /// Month, week of the month and week day
    MonthWeekDay(MonthWeekDay),
}

impl From<JulianDay> for RuleDay {
    fn from(inner: JulianDay) -> Self {
        Self::JulianDay(inner)
    }
}

impl From<DayOfYear> for RuleDay {
    fn from(inner: DayOfYear) -> Self {
        Self::DayOfYear(inner)
    }
}

impl From<MonthWeekDay> for RuleDay {
    fn from(inner: MonthWeekDay) -> Self {
        Self::MonthWeekDay(inner)
    }
}

/// One side of a time zone: a UTC bias plus the rule selecting when it takes effect.
///
/// The bias follows the convention UTC = local time + bias, so zones east of Greenwich carry a
/// negative bias.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ZoneRule {
    /// Offset such that UTC = local time + bias, in seconds
    bias: i32,
    /// Day on which the rule takes effect
    day: RuleDay,
    /// Local clock time of the transition in seconds since midnight; may be negative or exceed
    /// 24 hours
    day_time: i32,
    /// Zone designation while the rule applies
    name: Option<ZoneName>,
    /// Seconds between the start of the year and the transition, indexed by the week day the
    /// year starts on, plus 7 for leap years; derived from the fields above
    year_offsets: [i32; 14],
}

impl ZoneRule {
    /// Construct a zone rule. The transition offsets are filled in when the rule is paired into
    /// an [`AlternateZone`].
    pub fn new(
        bias: i32,
        day: RuleDay,
        day_time: i32,
        name: Option<ZoneName>,
    ) -> Result<Self, Error> {
        if (day_time as i64).abs() >= SECONDS_PER_WEEK {
            return Err(Error::ZoneRule("invalid transition day time"));
        }

        if (bias as i64).abs() >= SECONDS_PER_WEEK {
            return Err(Error::ZoneRule("invalid UTC bias"));
        }

        Ok(Self { bias, day, day_time, name, year_offsets: [0; 14] })
    }

    /// Returns the UTC bias in seconds, with UTC = local time + bias
    pub fn bias(&self) -> i32 {
        self.bias
    }

    /// Returns the day on which the rule takes effect
    pub fn day(&self) -> &RuleDay {
        &self.day
    }

    /// Returns the local clock time of the transition in seconds since midnight
    pub fn day_time(&self) -> i32 {
        self.day_time
    }

    /// Returns the zone designation while the rule applies
    pub fn name(&self) -> Option<&ZoneName> {
        self.name.as_ref()
    }

    /// Fill in the transition offsets of the rule.
    ///
    /// For each of the 7 week days a year can start on, crossed with the leap year flag, the
    /// entry holds the seconds between January 1, 00:00 and the transition. `shift` is the bias
    /// in force before this rule fires: a transition instant is expressed in the clock that is
    /// running up to the switch, so the entries are comparable to UTC-based year offsets.
    fn precompute(&mut self, shift: i32) {
        for &leap in &[false, true] {
            let (month_starts, month_lengths) = if leap {
                (&MONTH_START_LEAP_YEAR, &MONTH_LENGTH_LEAP_YEAR)
            } else {
                (&MONTH_START_NORMAL_YEAR, &MONTH_LENGTH_NORMAL_YEAR)
            };

            for year_week_day in 0..7 {
                let day = match self.day {
                    RuleDay::MonthWeekDay(MonthWeekDay { month, week, week_day }) => {
                        let month = month as usize - 1;
                        let month_start = month_starts[month];

                        // first occurrence of the week day in the month
                        let month_week_day = (year_week_day + month_start) % 7;
                        let mut switch_day = (week_day as i64 - month_week_day).rem_euclid(7);

                        // later occurrences never step past the end of the month, so week 5
                        // degrades to the last one
                        let limit = month_lengths[month] - 7;
                        let mut week = week;
                        while week > 1 && switch_day < limit {
                            switch_day += 7;
                            week -= 1;
                        }

                        month_start + switch_day
                    }
                    RuleDay::JulianDay(JulianDay(day)) => {
                        let mut day = day as i64 - 1;
                        if leap && day >= 59 {
                            day += 1; // the rule never references February 29
                        }
                        day
                    }
                    RuleDay::DayOfYear(DayOfYear(day)) => day as i64,
                };

                let index = year_week_day as usize + if leap { 7 } else { 0 };
                self.year_offsets[index] =
                    (day * SECONDS_PER_DAY + self.day_time as i64 + shift as i64) as i32;
            }
        }
    }

    /// Transition offset for a year starting on `year_week_day` with the provided leap year flag
    fn year_offset(&self, year_week_day: u8, leap: bool) -> i64 {
        self.year_offsets[year_week_day as usize + if leap { 7 } else { 0 }] as i64
    }
}

/// Classification of an instant against the rules of a zone
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DaylightStatus {
    /// The instant falls into the standard time interval
    Standard,
    /// The instant falls into the daylight saving interval
    Daylight,
}

impl From<DaylightStatus> for DaylightFlag {
    fn from(status: DaylightStatus) -> Self {
        match status {
            DaylightStatus::Standard => Self::Standard,
            DaylightStatus::Daylight => Self::Daylight,
        }
    }
}

/// Alternating standard and daylight saving rules of a zone
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AlternateZone {
    /// Rules while standard time applies
    standard: ZoneRule,
    /// Rules while daylight saving time applies
    daylight: ZoneRule,
}

impl AlternateZone {
    /// Pair a standard and a daylight saving rule, precomputing the transition offsets of both
    pub fn new(mut standard: ZoneRule, mut daylight: ZoneRule) -> Self {
        standard.precompute(daylight.bias);
        daylight.precompute(standard.bias);
        Self { standard, daylight }
    }

    /// Returns the standard time rule
    pub fn standard(&self) -> &ZoneRule {
        &self.standard
    }

    /// Returns the daylight saving rule
    pub fn daylight(&self) -> &ZoneRule {
        &self.daylight
    }

    /// Classify a position within a year against the two rules.
    ///
    /// When daylight saving starts after the return to standard time within the calendar year
    /// (southern hemisphere), the span between the two transitions is standard time and the rest
    /// of the year is daylight saving; otherwise (northern hemisphere) the span in between is
    /// daylight saving.
    fn classify(&self, year_week_day: u8, leap: bool, year_time: i64) -> DaylightStatus {
        let daylight_start = self.daylight.year_offset(year_week_day, leap);
        let standard_start = self.standard.year_offset(year_week_day, leap);

        let daylight = if daylight_start > standard_start {
            !(standard_start <= year_time && year_time < daylight_start)
        } else {
            daylight_start <= year_time && year_time < standard_start
        };

        if daylight {
            DaylightStatus::Daylight
        } else {
            DaylightStatus::Standard
        }
    }

    /// Returns the rule in force for a classification
    fn rule(&self, status: DaylightStatus) -> &ZoneRule {
        match status {
            DaylightStatus::Standard => &self.standard,
            DaylightStatus::Daylight => &self.daylight,
        }
    }
}

/// Zone with a single UTC bias and no daylight saving
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FixedZone {
    /// Offset such that UTC = local time + bias, in seconds
    bias: i32,
    /// Zone designation
    name: Option<ZoneName>,
}

impl FixedZone {
    /// Construct a fixed zone with the provided UTC bias in seconds
    pub fn new(bias: i32, name: Option<ZoneName>) -> Result<Self, Error> {
        if bias == i32::MIN {
            return Err(Error::ZoneRule("invalid UTC bias"));
        }

        Ok(Self { bias, name })
    }

    /// Returns the UTC bias in seconds, with UTC = local time + bias
    pub fn bias(&self) -> i32 {
        self.bias
    }

    /// Returns the zone designation
    pub fn name(&self) -> Option<&ZoneName> {
        self.name.as_ref()
    }
}

/// Time zone: either a fixed bias or an alternating standard/daylight rule pair.
///
/// Zone values are self-contained and immutable; the conversion methods read no shared state, so
/// a zone can be used from any number of threads at once.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ZoneInfo {
    /// Standard time only
    Fixed(FixedZone),
    /// Standard time alternating with daylight saving time
    Alternating(AlternateZone),
}

impl ZoneInfo {
    /// The UTC zone, also used as the last-resort fallback of the zone cache
    pub const fn utc() -> Self {
        Self::Fixed(FixedZone { bias: 0, name: Some(UTC_NAME) })
    }

    /// Parse a POSIX zone description string, as described in [the POSIX documentation of the
    /// `TZ` environment variable](https://pubs.opengroup.org/onlinepubs/9699919799/basedefs/V1_chap08.html).
    ///
    /// Transition times accept the extended syntax of recent tzdata releases: signed, up to
    /// 167 hours.
    ///
    /// ```rust
    /// # fn main() -> Result<(), civiltime::Error> {
    /// use civiltime::ZoneInfo;
    ///
    /// ZoneInfo::from_posix_tz("HST10")?;
    /// ZoneInfo::from_posix_tz("<-03>3")?;
    /// ZoneInfo::from_posix_tz("NZST-12NZDT,M9.5.0,M4.1.0/3")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_posix_tz(tz_string: &str) -> Result<Self, Error> {
        parse_zone_info(tz_string.as_bytes())
    }

    /// Unix time of a civil time record interpreted in this zone.
    ///
    /// A record with a [`DaylightFlag::Unknown`] daylight disposition is classified against the
    /// zone rules; a forced disposition is honoured without recomputation. Field validation is
    /// the same as for [`CivilTime::unix_time`].
    pub fn unix_time(&self, civil: &CivilTime) -> Result<i64, Error> {
        let start = year_start(civil.year)?;
        let year_time = seconds_into_year(civil, start.leap)?;

        let bias = match self {
            Self::Fixed(fixed) => fixed.bias,
            Self::Alternating(zone) => {
                let status = match civil.daylight {
                    DaylightFlag::Standard => DaylightStatus::Standard,
                    DaylightFlag::Daylight => DaylightStatus::Daylight,
                    DaylightFlag::Unknown => {
                        zone.classify(start.week_day, start.leap, year_time)
                    }
                };
                zone.rule(status).bias
            }
        };

        let unix_time = start
            .unix_time
            .checked_add(year_time)
            .and_then(|unix_time| unix_time.checked_add(bias as i64));
        match unix_time {
            Some(unix_time) => Ok(unix_time),
            None => Err(Error::OutOfRange("unix time out of range")),
        }
    }

    /// Civil time of a Unix time instant in this zone.
    ///
    /// The result carries the daylight disposition, the UTC offset and the designation of the
    /// rule in force at the instant.
    pub fn civil_time(&self, unix_time: i64) -> Result<CivilTime, Error> {
        let (bias, status, name) = match self {
            Self::Fixed(fixed) => (fixed.bias, DaylightStatus::Standard, fixed.name),
            Self::Alternating(zone) => {
                let position = year_position(unix_time);
                let year_time = position.year_day * SECONDS_PER_DAY + position.day_time;

                let status = zone.classify(position.year_week_day, position.leap, year_time);
                let rule = zone.rule(status);
                (rule.bias, status, rule.name)
            }
        };

        let shifted = match unix_time.checked_sub(bias as i64) {
            Some(shifted) => shifted,
            None => return Err(Error::OutOfRange("unix time out of range")),
        };

        let mut civil = CivilTime::from_unix_time(shifted);
        civil.daylight = status.into();
        civil.ut_offset = -bias;
        civil.zone_name = name;
        Ok(civil)
    }
}
