//! Zone-specifier resolution for the scanner's trailing text.

use core::{iter::Peekable, str::Chars};

use crate::{provider::ZoneProvider, timezone::TimeZone, ScanError, ScanResult};

/// Resolves the remaining text of a scan as a zone specifier.
///
/// Accepted forms are the offset shapes of the reference grammar, `±HH`,
/// `±HH:MM`, and `±HHMM`, plus any identifier the provider recognizes.
/// Everything else fails as an unknown zone; the taxonomy is deliberate, as
/// a bad trailing specifier is a zone problem for the caller, not a
/// structural one.
#[inline]
pub(crate) fn resolve_zone(source: &str, provider: &impl ZoneProvider) -> ScanResult<TimeZone> {
    let mut cursor = source.chars().peekable();
    if cursor.peek().is_some_and(is_ascii_sign) {
        let offset_minutes = parse_offset(&mut cursor).ok_or_else(|| unknown_zone(source))?;
        // The full tail must be an offset; "+01:00sweden" is not a zone.
        if cursor.next().is_some() {
            return Err(unknown_zone(source));
        }
        return Ok(TimeZone::OffsetMinutes(offset_minutes));
    }
    if provider.check_identifier(source) {
        return Ok(TimeZone::IanaIdentifier(source.into()));
    }
    Err(unknown_zone(source))
}

/// Parses `±HH`, `±HH:MM`, or `±HHMM` into offset minutes.
fn parse_offset(chars: &mut Peekable<Chars<'_>>) -> Option<i16> {
    let sign = chars.next().map_or(1, |c| if c == '+' { 1 } else { -1 });
    let hours = parse_digit_pair(chars)?;

    let sep = chars.peek().is_some_and(|ch| *ch == ':');
    if sep {
        let _ = chars.next();
    }

    let minutes = match chars.peek().map(|ch| ch.is_ascii_digit()) {
        Some(true) => parse_digit_pair(chars)?,
        // A separator with nothing after it is not a valid offset.
        Some(false) | None if sep => return None,
        _ => 0,
    };

    if hours > 23 || minutes > 59 {
        return None;
    }
    Some((hours * 60 + minutes) * sign)
}

fn parse_digit_pair(chars: &mut Peekable<Chars<'_>>) -> Option<i16> {
    let first = chars.next().filter(char::is_ascii_digit)?;
    let second = chars.next().filter(char::is_ascii_digit)?;
    let tens = (first.to_digit(10)? * 10) as i16;
    let ones = second.to_digit(10)? as i16;
    Some(tens + ones)
}

fn is_ascii_sign(ch: &char) -> bool {
    *ch == '+' || *ch == '-'
}

fn unknown_zone(source: &str) -> ScanError {
    ScanError::unknown_zone(source)
}
