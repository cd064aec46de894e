use super::*;

fn alternating(zone: ZoneInfo) -> AlternateZone {
    match zone {
        ZoneInfo::Alternating(zone) => zone,
        ZoneInfo::Fixed(_) => panic!("expected an alternating zone"),
    }
}

#[test]
fn test_zone_name() -> Result<(), Error> {
    let name = ZoneName::new(b"CEST")?;
    assert_eq!(name.as_bytes(), b"CEST");
    assert_eq!(name.as_str(), "CEST");
    assert_eq!(name.to_string(), "CEST");

    assert_eq!(UTC_NAME.as_str(), "UTC");

    ZoneName::new(b"+0330")?;
    assert!(matches!(ZoneName::new(b"CE"), Err(Error::ZoneName(_))));
    assert!(matches!(ZoneName::new(b"ABCDEFGHIJKLMNOP"), Err(Error::ZoneName(_))));
    assert!(matches!(ZoneName::new(b"CE T"), Err(Error::ZoneName(_))));
    Ok(())
}

#[test]
fn test_rule_day_bounds() {
    assert!(JulianDay::new(1).is_ok());
    assert!(JulianDay::new(365).is_ok());
    assert!(JulianDay::new(0).is_err());
    assert!(JulianDay::new(366).is_err());

    assert!(DayOfYear::new(0).is_ok());
    assert!(DayOfYear::new(365).is_ok());
    assert!(DayOfYear::new(366).is_err());

    assert!(MonthWeekDay::new(12, 5, 6).is_ok());
    assert!(MonthWeekDay::new(0, 1, 0).is_err());
    assert!(MonthWeekDay::new(13, 1, 0).is_err());
    assert!(MonthWeekDay::new(3, 0, 0).is_err());
    assert!(MonthWeekDay::new(3, 6, 0).is_err());
    assert!(MonthWeekDay::new(3, 1, 7).is_err());
}

#[test]
fn test_precomputed_offsets() -> Result<(), Error> {
    let zone = alternating(ZoneInfo::from_posix_tz("CET-1CEST,M3.5.0,M10.5.0/3")?);

    // a leap year starting on Monday, like 2024: the last Sunday of March is the 31st and the
    // last Sunday of October the 27th
    assert_eq!(zone.daylight.year_offset(1, true), 90 * 86_400 + 7200 - 3600);
    assert_eq!(zone.standard.year_offset(1, true), 300 * 86_400 + 10_800 - 7200);

    // a normal year starting on Monday, like 2018: March 25 and October 28
    assert_eq!(zone.daylight.year_offset(1, false), 83 * 86_400 + 7200 - 3600);
    assert_eq!(zone.standard.year_offset(1, false), 300 * 86_400 + 10_800 - 7200);
    Ok(())
}

#[test]
fn test_week_5_degrades_to_last_occurrence() -> Result<(), Error> {
    // the last Tuesday of February: the 29th in 2000, but already the 27th in 2001, where the
    // fifth occurrence would run past the end of the month
    let zone = alternating(ZoneInfo::from_posix_tz("AAA0BBB,M2.5.2,M10.5.0")?);

    // 2000 is a leap year starting on Saturday
    assert_eq!(zone.daylight.year_offset(6, true), 59 * 86_400 + 7200);
    // 2001 is a normal year starting on Monday
    assert_eq!(zone.daylight.year_offset(1, false), 57 * 86_400 + 7200);
    Ok(())
}

#[test]
fn test_julian_day_skips_leap_day() -> Result<(), Error> {
    let zone = alternating(ZoneInfo::from_posix_tz("AAA0BBB,J60,100")?);

    // J60 is March 1 whether or not the year is a leap year
    assert_eq!(zone.daylight.year_offset(0, false), 59 * 86_400 + 7200);
    assert_eq!(zone.daylight.year_offset(0, true), 60 * 86_400 + 7200);

    // a zero-based day of the year counts February 29
    assert_eq!(zone.standard.year_offset(0, false), 100 * 86_400 + 7200);
    assert_eq!(zone.standard.year_offset(0, true), 100 * 86_400 + 7200);
    Ok(())
}

#[test]
fn test_cet_spring_transition() -> Result<(), Error> {
    let zone = ZoneInfo::from_posix_tz("CET-1CEST,M3.5.0,M10.5.0/3")?;

    // the night before the 2024 transition is still standard time
    let civil = CivilTime::new(2024, 2, 30, 0, 0, 0)?;
    assert_eq!(civil.daylight, DaylightFlag::Unknown);
    assert_eq!(zone.unix_time(&civil)?, 1_711_753_200);

    // 03:00 local on March 31 is one hour after the jump from 02:00 to 03:00
    let civil = CivilTime::new(2024, 2, 31, 3, 0, 0)?;
    assert_eq!(zone.unix_time(&civil)?, 1_711_846_800);

    // a forced disposition bypasses the rules
    let mut civil = CivilTime::new(2024, 2, 30, 0, 0, 0)?;
    civil.daylight = DaylightFlag::Daylight;
    assert_eq!(zone.unix_time(&civil)?, 1_711_749_600);
    civil.daylight = DaylightFlag::Standard;
    assert_eq!(zone.unix_time(&civil)?, 1_711_753_200);

    let civil = zone.civil_time(1_711_753_200)?;
    assert_eq!((civil.year, civil.month, civil.month_day), (2024, 2, 30));
    assert_eq!((civil.hour, civil.minute, civil.second), (0, 0, 0));
    assert_eq!(civil.daylight, DaylightFlag::Standard);
    assert_eq!(civil.ut_offset, 3600);
    assert_eq!(civil.zone_name.as_ref().map(ZoneName::as_str), Some("CET"));

    // one second before the transition instant, and the transition instant itself
    let civil = zone.civil_time(1_711_846_799)?;
    assert_eq!((civil.hour, civil.minute, civil.second), (1, 59, 59));
    assert_eq!(civil.daylight, DaylightFlag::Standard);

    let civil = zone.civil_time(1_711_846_800)?;
    assert_eq!((civil.hour, civil.minute, civil.second), (3, 0, 0));
    assert_eq!(civil.daylight, DaylightFlag::Daylight);
    assert_eq!(civil.ut_offset, 7200);
    assert_eq!(civil.zone_name.as_ref().map(ZoneName::as_str), Some("CEST"));
    Ok(())
}

#[test]
fn test_southern_hemisphere() -> Result<(), Error> {
    let zone = ZoneInfo::from_posix_tz("NZST-12NZDT,M9.5.0,M4.1.0/3")?;

    // January is daylight saving time in New Zealand, June is standard time
    let civil = CivilTime::new(2024, 0, 15, 12, 0, 0)?;
    assert_eq!(zone.unix_time(&civil)?, 1_705_273_200);

    let civil = CivilTime::new(2024, 5, 15, 12, 0, 0)?;
    assert_eq!(zone.unix_time(&civil)?, 1_718_409_600);

    let civil = zone.civil_time(1_705_273_200)?;
    assert_eq!((civil.month, civil.month_day, civil.hour), (0, 15, 12));
    assert_eq!(civil.daylight, DaylightFlag::Daylight);
    assert_eq!(civil.ut_offset, 46_800);
    assert_eq!(civil.zone_name.as_ref().map(ZoneName::as_str), Some("NZDT"));

    let civil = zone.civil_time(1_718_409_600)?;
    assert_eq!((civil.month, civil.month_day, civil.hour), (5, 15, 12));
    assert_eq!(civil.daylight, DaylightFlag::Standard);
    assert_eq!(civil.ut_offset, 43_200);
    assert_eq!(civil.zone_name.as_ref().map(ZoneName::as_str), Some("NZST"));
    Ok(())
}

#[test]
fn test_negative_daylight_saving() -> Result<(), Error> {
    // Ireland encodes winter as the daylight side: GMT is "daylight", IST standard
    let zone = ZoneInfo::from_posix_tz("IST-1GMT0,M10.5.0,M3.5.0/1")?;

    let civil = CivilTime::new(2024, 6, 1, 12, 0, 0)?;
    assert_eq!(zone.unix_time(&civil)?, 1_719_831_600);

    let civil = zone.civil_time(1_719_831_600)?;
    assert_eq!((civil.month, civil.month_day, civil.hour), (6, 1, 12));
    assert_eq!(civil.daylight, DaylightFlag::Standard);
    assert_eq!(civil.ut_offset, 3600);
    assert_eq!(civil.zone_name.as_ref().map(ZoneName::as_str), Some("IST"));

    let civil = CivilTime::new(2024, 0, 15, 12, 0, 0)?;
    assert_eq!(zone.unix_time(&civil)?, 1_705_320_000);

    let civil = zone.civil_time(1_705_320_000)?;
    assert_eq!(civil.daylight, DaylightFlag::Daylight);
    assert_eq!(civil.ut_offset, 0);
    assert_eq!(civil.zone_name.as_ref().map(ZoneName::as_str), Some("GMT"));
    Ok(())
}

#[test]
fn test_fixed_zone() -> Result<(), Error> {
    let zone = ZoneInfo::from_posix_tz("HST10")?;

    let civil = zone.civil_time(0)?;
    assert_eq!((civil.year, civil.month, civil.month_day), (1969, 11, 31));
    assert_eq!(civil.hour, 14);
    assert_eq!(civil.daylight, DaylightFlag::Standard);
    assert_eq!(civil.ut_offset, -36_000);
    assert_eq!(civil.zone_name.as_ref().map(ZoneName::as_str), Some("HST"));

    assert_eq!(zone.unix_time(&civil)?, 0);

    // a forced daylight disposition has no effect without daylight saving rules
    let mut civil = civil;
    civil.daylight = DaylightFlag::Daylight;
    assert_eq!(zone.unix_time(&civil)?, 0);
    Ok(())
}

#[test]
fn test_utc_fallback_zone() -> Result<(), Error> {
    let zone = ZoneInfo::utc();

    let civil = zone.civil_time(0)?;
    assert_eq!((civil.year, civil.month, civil.month_day), (1970, 0, 1));
    assert_eq!(civil.ut_offset, 0);
    assert_eq!(civil.zone_name.as_ref().map(ZoneName::as_str), Some("UTC"));
    assert_eq!(zone.unix_time(&civil)?, 0);
    Ok(())
}

#[test]
fn test_zone_round_trips() -> Result<(), Error> {
    let zones = [
        ZoneInfo::from_posix_tz("CET-1CEST,M3.5.0,M10.5.0/3")?,
        ZoneInfo::from_posix_tz("NZST-12NZDT,M9.5.0,M4.1.0/3")?,
        ZoneInfo::from_posix_tz("IST-1GMT0,M10.5.0,M3.5.0/1")?,
        ZoneInfo::from_posix_tz("<-0330>3:30")?,
        ZoneInfo::utc(),
    ];

    // instants spread over both hemispheres' seasons, leap and normal years, and years
    // before the epoch and before year 0
    let instants = [
        0,
        946_684_800,
        1_705_273_200,
        1_711_846_799,
        1_711_846_800,
        1_718_409_600,
        -2_208_988_800,
        -62_167_219_200,
        -693_274_636_801,
    ];

    for zone in &zones {
        for &unix_time in &instants {
            let civil = zone.civil_time(unix_time)?;
            assert_eq!(zone.unix_time(&civil)?, unix_time, "{:?} at {}", zone, unix_time);

            // classification is stable: clearing the flag reproduces it away from transitions
            let mut unknown = civil;
            unknown.daylight = DaylightFlag::Unknown;
            assert_eq!(zone.unix_time(&unknown)?, unix_time, "{:?} at {}", zone, unix_time);
        }
    }
    Ok(())
}

#[test]
fn test_conversion_overflow() -> Result<(), Error> {
    let zone = ZoneInfo::from_posix_tz("CET-1CEST,M3.5.0,M10.5.0/3")?;

    let civil = CivilTime { year: i64::MAX, ..CivilTime::default() };
    assert!(matches!(zone.unix_time(&civil), Err(Error::OutOfRange(_))));

    // shifting by the bias would leave the 64-bit scale
    assert!(matches!(zone.civil_time(i64::MAX), Err(Error::OutOfRange(_))));

    let zone = ZoneInfo::from_posix_tz("<-01>1")?;
    assert!(matches!(zone.civil_time(i64::MIN), Err(Error::OutOfRange(_))));
    Ok(())
}
