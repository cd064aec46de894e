//! Parsing of POSIX zone description strings.

use crate::timezone::{
    AlternateZone, DayOfYear, FixedZone, JulianDay, MonthWeekDay, RuleDay, ZoneInfo, ZoneName,
    ZoneRule,
};
use crate::Error;

/// A `Cursor` over the bytes of a zone string
#[derive(Debug)]
struct Cursor<'a> {
    /// Remaining data to be read
    remaining: &'a [u8],
}

impl<'a> Cursor<'a> {
    fn new(remaining: &'a [u8]) -> Self {
        Self { remaining }
    }

    fn peek(&self) -> Option<&u8> {
        self.remaining.first()
    }

    fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Read exactly `count` bytes, reducing the remaining data
    fn read_exact(&mut self, count: usize) -> Result<&'a [u8], Error> {
        match (self.remaining.get(..count), self.remaining.get(count..)) {
            (Some(result), Some(remaining)) => {
                self.remaining = remaining;
                Ok(result)
            }
            _ => Err(Error::InvalidZoneString("unexpected end of zone string")),
        }
    }

    /// Read bytes and compare them to the provided tag
    fn read_tag(&mut self, tag: &[u8]) -> Result<(), Error> {
        if self.read_exact(tag.len())? == tag {
            Ok(())
        } else {
            Err(Error::InvalidZoneString("unexpected character in zone string"))
        }
    }

    /// Read bytes if the remaining data is prefixed by the provided tag
    fn read_optional_tag(&mut self, tag: &[u8]) -> bool {
        if self.remaining.starts_with(tag) {
            self.remaining = &self.remaining[tag.len()..];
            true
        } else {
            false
        }
    }

    /// Read bytes as long as the provided predicate is true
    fn read_while<F: Fn(&u8) -> bool>(&mut self, f: F) -> Result<&'a [u8], Error> {
        match self.remaining.iter().position(|x| !f(x)) {
            None => self.read_exact(self.remaining.len()),
            Some(position) => self.read_exact(position),
        }
    }

    /// Read bytes until the provided byte is found, not consuming it
    fn read_until(&mut self, stop: u8) -> Result<&'a [u8], Error> {
        match self.remaining.iter().position(|&x| x == stop) {
            None => self.read_exact(self.remaining.len()),
            Some(position) => self.read_exact(position),
        }
    }

    /// Read an unsigned decimal integer of at least one and at most `max_digits` digits
    fn read_int(&mut self, max_digits: usize) -> Result<i32, Error> {
        let digits = self.read_while(u8::is_ascii_digit)?;

        if digits.is_empty() || digits.len() > max_digits {
            return Err(Error::InvalidZoneString("invalid number in zone string"));
        }

        let mut value = 0;
        for &digit in digits {
            value = value * 10 + (digit - b'0') as i32;
        }
        Ok(value)
    }

    /// Read an optional `+` or `-` sign
    fn read_sign(&mut self) -> i32 {
        match self.peek() {
            Some(b'-') => {
                self.remaining = &self.remaining[1..];
                -1
            }
            Some(b'+') => {
                self.remaining = &self.remaining[1..];
                1
            }
            _ => 1,
        }
    }
}

/// Parse a zone designation, either bracket-quoted or a bare run of letters
fn parse_designation<'a>(cursor: &mut Cursor<'a>) -> Result<&'a [u8], Error> {
    match cursor.peek() {
        Some(b'<') => {}
        _ => return cursor.read_while(u8::is_ascii_alphabetic),
    }

    cursor.read_exact(1)?;
    let unquoted = cursor.read_until(b'>')?;
    cursor.read_exact(1)?;
    Ok(unquoted)
}

/// Parse a zone offset, `[+|-]H[H][:MM[:SS]]`.
///
/// Hours range over `[0, 24]` and seconds over `[0, 59]`, but minutes only over `[0, 58]`; the
/// 59-exclusive minute bound matches the accepted grammar exactly.
fn parse_offset(cursor: &mut Cursor) -> Result<i32, Error> {
    let sign = cursor.read_sign();

    let hour = cursor.read_int(2)?;
    let mut minute = 0;
    let mut second = 0;

    if cursor.read_optional_tag(b":") {
        minute = cursor.read_int(2)?;

        if cursor.read_optional_tag(b":") {
            second = cursor.read_int(2)?;
        }
    }

    if hour > 24 {
        return Err(Error::InvalidZoneString("invalid offset hour"));
    }
    if minute >= 59 {
        return Err(Error::InvalidZoneString("invalid offset minute"));
    }
    if second > 59 {
        return Err(Error::InvalidZoneString("invalid offset second"));
    }

    Ok(sign * (hour * 3600 + minute * 60 + second))
}

/// Parse a transition day, `Mm.w.d`, `Jn` or `n`
fn parse_rule_day(cursor: &mut Cursor) -> Result<RuleDay, Error> {
    match cursor.peek() {
        Some(b'M') => {
            cursor.read_exact(1)?;
            let month = cursor.read_int(2)?;
            cursor.read_tag(b".")?;
            let week = cursor.read_int(1)?;
            cursor.read_tag(b".")?;
            let week_day = cursor.read_int(1)?;
            Ok(MonthWeekDay::new(month as u8, week as u8, week_day as u8)?.into())
        }
        Some(b'J') => {
            cursor.read_exact(1)?;
            Ok(JulianDay::new(cursor.read_int(3)? as u16)?.into())
        }
        _ => Ok(DayOfYear::new(cursor.read_int(3)? as u16)?.into()),
    }
}

/// Parse a transition day time, `[+|-]h[h[h]][:MM[:SS]]`, with hours in `[-167, 167]`
fn parse_rule_time(cursor: &mut Cursor) -> Result<i32, Error> {
    let sign = cursor.read_sign();

    let hour = cursor.read_int(3)?;
    let mut minute = 0;
    let mut second = 0;

    if cursor.read_optional_tag(b":") {
        minute = cursor.read_int(2)?;

        if cursor.read_optional_tag(b":") {
            second = cursor.read_int(2)?;
        }
    }

    if hour > 167 {
        return Err(Error::InvalidZoneString("invalid transition time hour"));
    }
    if minute > 59 {
        return Err(Error::InvalidZoneString("invalid transition time minute"));
    }
    if second > 59 {
        return Err(Error::InvalidZoneString("invalid transition time second"));
    }

    Ok(sign * (hour * 3600 + minute * 60 + second))
}

/// Parse a transition rule: a day with an optional `/time`, defaulting to 02:00:00 local time
fn parse_rule(cursor: &mut Cursor) -> Result<(RuleDay, i32), Error> {
    let day = parse_rule_day(cursor)?;

    let time = if cursor.read_optional_tag(b"/") { parse_rule_time(cursor)? } else { 2 * 3600 };

    Ok((day, time))
}

/// Parse a POSIX zone description string,
/// `<std-name><std-offset>[<dst-name>[<dst-offset>][,<rule>,<rule>]]`.
///
/// The first rule is the transition into daylight saving time, the second the return to
/// standard time. A daylight designation without an offset means one hour ahead of standard
/// time; a daylight designation without rules is an error.
pub(crate) fn parse_zone_info(tz_string: &[u8]) -> Result<ZoneInfo, Error> {
    let mut cursor = Cursor::new(tz_string);

    if let Some(b':') = cursor.peek() {
        return Err(Error::InvalidZoneString("implementation-defined zone string"));
    }

    let std_name = ZoneName::new(parse_designation(&mut cursor)?)?;
    let std_bias = parse_offset(&mut cursor)?;

    if cursor.is_empty() {
        return Ok(ZoneInfo::Fixed(FixedZone::new(std_bias, Some(std_name))?));
    }

    let dst_name = ZoneName::new(parse_designation(&mut cursor)?)?;

    let dst_bias = match cursor.peek() {
        Some(&b',') => std_bias - 3600,
        Some(_) => parse_offset(&mut cursor)?,
        None => return Err(Error::InvalidZoneString("daylight saving rules are missing")),
    };

    if cursor.is_empty() {
        return Err(Error::InvalidZoneString("daylight saving rules are missing"));
    }

    cursor.read_tag(b",")?;
    let (daylight_day, daylight_time) = parse_rule(&mut cursor)?;

    cursor.read_tag(b",")?;
    let (standard_day, standard_time) = parse_rule(&mut cursor)?;

    if !cursor.is_empty() {
        return Err(Error::InvalidZoneString("remaining data after the zone rules"));
    }

    let standard = ZoneRule::new(std_bias, standard_day, standard_time, Some(std_name))?;
    let daylight = ZoneRule::new(dst_bias, daylight_day, daylight_time, Some(dst_name))?;

    Ok(ZoneInfo::Alternating(AlternateZone::new(standard, daylight)))
}
