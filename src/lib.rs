#![deny(missing_docs)]
#![warn(unreachable_pub)]

//! This crate reimplements the civil calendar functions of the C library (`gmtime`, `timegm`,
//! `localtime` and `mktime`) on a signed 64-bit second scale over the [proleptic gregorian
//! calendar](https://en.wikipedia.org/wiki/Proleptic_Gregorian_calendar), with an astronomical
//! year 0 and negative years before it.
//!
//! Time zones follow the two-rule standard/daylight model of the [POSIX `TZ` environment
//! variable](https://pubs.opengroup.org/onlinepubs/9699919799/basedefs/V1_chap08.html). A zone
//! is either parsed from such a rule description, or read from the trailing rule line of an
//! on-disk zoneinfo entry; the binary zoneinfo format itself is never interpreted.
//!
//! All conversions are pure functions of their inputs. The only shared state in the crate is the
//! optional process-wide [`ZoneCache`], which hands out immutable zone snapshots, so conversions
//! never run under a lock.
//!
//! # Usage
//!
//! ## UTC conversions
//!
//! ```rust
//! # fn main() -> Result<(), civiltime::Error> {
//! use civiltime::CivilTime;
//!
//! // 2000-01-01T00:00:00Z
//! let civil = CivilTime::new(2000, 0, 1, 0, 0, 0)?;
//! assert_eq!(civil.unix_time()?, 946_684_800);
//! assert_eq!(civil.week_day, 6); // Saturday
//!
//! let civil = CivilTime::from_unix_time(946_684_800);
//! assert_eq!((civil.year, civil.month, civil.month_day), (2000, 0, 1));
//! assert_eq!(civil.to_string(), "2000-01-01T00:00:00Z");
//!
//! // years before the epoch work the same, including year 0 and negative years
//! let civil = CivilTime::new(-20_000, 11, 31, 23, 59, 59)?;
//! assert_eq!(civil.unix_time()?, -693_274_636_801);
//! # Ok(())
//! # }
//! ```
//!
//! ## Zone conversions
//!
//! ```rust
//! # fn main() -> Result<(), civiltime::Error> {
//! use civiltime::{CivilTime, DaylightFlag, ZoneInfo};
//!
//! let zone = ZoneInfo::from_posix_tz("CET-1CEST,M3.5.0,M10.5.0/3")?;
//!
//! // project a UTC instant into the zone
//! let local = zone.civil_time(946_684_800)?;
//! assert_eq!(local.hour, 1);
//! assert_eq!(local.ut_offset, 3_600);
//! assert_eq!(local.daylight, DaylightFlag::Standard);
//!
//! // and back: with an unknown daylight flag the zone rules decide
//! let civil = CivilTime::new(2024, 2, 31, 3, 0, 0)?;
//! assert_eq!(zone.unix_time(&civil)?, 1_711_846_800);
//! # Ok(())
//! # }
//! ```
//!
//! ## Local zone
//!
//! [`local_unix_time`] and [`local_civil_time`] convert through the zone configured in the `TZ`
//! environment variable, reparsing it only when it changes. An explicit [`ZoneCache`] with an
//! injected [`ZoneDatabase`] provides the same behavior without touching process globals.

#[macro_use]
mod logging;

mod error;
pub use error::Error;

mod datetime;
pub use datetime::{
    calendar_week_of_time, calendar_week_of_year, is_leap_year, week_of_year, CivilTime,
    DaylightFlag,
};

mod parse;

mod timezone;
pub use timezone::{
    AlternateZone, DayOfYear, DaylightStatus, FixedZone, JulianDay, MonthWeekDay, RuleDay,
    ZoneInfo, ZoneName, ZoneRule,
};

mod local;
pub use local::{
    local_civil_time, local_unix_time, local_zone, SystemZoneDatabase, ZoneCache, ZoneDatabase,
};

/// Number of seconds in one hour
const SECONDS_PER_HOUR: i64 = 3600;
/// Number of seconds in one day
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;
/// Number of seconds in one week
const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;
/// Number of days in 400 gregorian years
const DAYS_PER_400_YEARS: i64 = 146_097;
/// Number of days between 0000-01-01 and the Unix epoch
const DAYS_TO_UNIX_EPOCH: i64 = 719_528;

/// Start day of every month in a normal year
const MONTH_START_NORMAL_YEAR: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
/// Start day of every month in a leap year
const MONTH_START_LEAP_YEAR: [i64; 12] = [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];
/// Number of days of every month in a normal year
const MONTH_LENGTH_NORMAL_YEAR: [i64; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
/// Number of days of every month in a leap year
const MONTH_LENGTH_LEAP_YEAR: [i64; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
