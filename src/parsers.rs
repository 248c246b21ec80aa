//! The timestamp scanner.
//!
//! This module is the hot path of the crate: a single left-to-right pass
//! over the input that extracts fixed-width numeric fields at fixed
//! offsets, branching on the presence of the `-`, `T`, `:`, and `.`/`,`
//! separators to decide how far to proceed. The first absent optional
//! component ends the scan with a less-specific result, so `"2023"`,
//! `"2023-06"`, `"2023-06-15"`, `"2023-06-15T10:30"`, and
//! `"2023-06-15T10:30:45.123Z"` all succeed with progressively richer
//! values.
//!
//! Every numeric field is read as an unrolled digit-by-digit accumulation
//! with a bounds check per position; there is no general-purpose integer
//! parsing and no allocation on the offset and UTC paths.
//!
//! One compatibility quirk is preserved deliberately: trailing text after a
//! bare date that does not start a plausible time is ignored rather than
//! rejected, so `"2023-01-01Turkey"` and `"2023-01-01Taa"` both scan as
//! plain dates. Once a time is underway, errors are hard: `"2023-01-01T0a"`
//! fails at the offending byte.

use crate::{
    iso::{IsoDate, IsoDateTime, IsoTime},
    provider::ZoneProvider,
    timezone::TimeZone,
    EpochNanoseconds, ScanError, ScanResult,
};

mod timezone;

pub(crate) use timezone::resolve_zone;

/// The result of a successful scan: exactly one of the three shapes,
/// chosen by how far the input reached before an optional component was
/// absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scanned {
    /// A date with no time of day. Absent month and day default to 1.
    Date(IsoDate),
    /// A date and time of day with no zone. Absent minute, second, and
    /// fraction default to zero.
    DateTime(IsoDateTime),
    /// A date, time of day, and zone.
    Zoned(ZonedTimestamp),
}

/// A date-time paired with the zone it was scanned with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZonedTimestamp {
    pub iso: IsoDateTime,
    pub zone: TimeZone,
}

impl ZonedTimestamp {
    /// Resolves this timestamp to an instant. Named zones consult the
    /// provider; fixed offsets and UTC do not.
    pub fn epoch_nanoseconds(
        &self,
        provider: &impl ZoneProvider,
    ) -> ScanResult<EpochNanoseconds> {
        let epoch = self.zone.get_epoch_nanoseconds_for(self.iso, provider)?;
        epoch.check_validity()?;
        Ok(epoch)
    }
}

/// Scans a timestamp, resolving named zones through the given provider.
///
/// This is the sole entry point of the scanner core. The input is borrowed
/// only for the duration of the call.
pub fn parse_with_provider(source: &str, provider: &impl ZoneProvider) -> ScanResult<Scanned> {
    let bytes = source.as_bytes();

    let year = four_digits(bytes, 0)?;
    if !byte_is(bytes, 4, b'-') {
        return date_only(year, 1, 1);
    }
    let month = two_digits(bytes, 5)?;
    if !byte_is(bytes, 7, b'-') {
        return date_only(year, month, 1);
    }
    let day = two_digits(bytes, 8)?;
    if !byte_is(bytes, 10, b'T') {
        return date_only(year, month, day);
    }
    // A time designator not followed by a digit makes the whole suffix an
    // unexamined remainder, not a time. See the module docs.
    if !bytes.get(11).is_some_and(u8::is_ascii_digit) {
        return date_only(year, month, day);
    }

    let hour = two_digits(bytes, 11)?;
    if !byte_is(bytes, 13, b':') {
        return with_time(source, provider, year, month, day, hour, 0, 0, 0, 13);
    }
    let minute = two_digits(bytes, 14)?;
    if !byte_is(bytes, 16, b':') {
        return with_time(source, provider, year, month, day, hour, minute, 0, 0, 16);
    }
    let second = two_digits(bytes, 17)?;
    if !matches!(bytes.get(19), Some(b'.' | b',')) {
        return with_time(
            source, provider, year, month, day, hour, minute, second, 0, 19,
        );
    }
    let (nanosecond, zone_start) = fraction(bytes, 20)?;
    with_time(
        source, provider, year, month, day, hour, minute, second, nanosecond, zone_start,
    )
}

#[inline]
fn date_only(year: i32, month: u8, day: u8) -> ScanResult<Scanned> {
    IsoDate::new(year, i32::from(month), i32::from(day)).map(Scanned::Date)
}

/// Builds the time-bearing result shapes, handing any remaining text to
/// zone resolution.
#[allow(clippy::too_many_arguments)]
#[inline]
fn with_time(
    source: &str,
    provider: &impl ZoneProvider,
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    nanosecond: u32,
    zone_start: usize,
) -> ScanResult<Scanned> {
    let date = IsoDate::new(year, i32::from(month), i32::from(day))?;
    let time = IsoTime::new(hour, minute, second, nanosecond)?;
    let iso = IsoDateTime::new(date, time);

    // Every byte before zone_start is ASCII, so the slice is infallible.
    let tail = source.get(zone_start..).unwrap_or("");
    if tail.is_empty() {
        return Ok(Scanned::DateTime(iso));
    }
    // A lone designator is the zero-allocation UTC path; anything longer,
    // including text that merely starts with 'Z', is a zone lookup.
    let zone = if tail == "Z" {
        TimeZone::UTC
    } else {
        resolve_zone(tail, provider)?
    };
    Ok(Scanned::Zoned(ZonedTimestamp { iso, zone }))
}

/// Reads the variable-length fraction digit run starting at `start`,
/// returning nanoseconds and the position of the first unconsumed byte.
///
/// The fraction is normalized by positional weight to nine digits; digits
/// past the ninth are consumed but truncated, never rounded. At least one
/// digit must be present.
#[inline]
fn fraction(bytes: &[u8], start: usize) -> ScanResult<(u32, usize)> {
    let mut pos = start;
    let mut nanosecond: u32 = 0;
    let mut weight: u32 = 100_000_000;
    if !bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        return Err(ScanError::malformed(pos.min(bytes.len())));
    }
    while let Some(digit) = bytes.get(pos).map(|b| b.wrapping_sub(b'0')) {
        if digit > 9 {
            break;
        }
        if weight > 0 {
            nanosecond += u32::from(digit) * weight;
            weight /= 10;
        }
        pos += 1;
    }
    Ok((nanosecond, pos))
}

/// Reads a fixed pair of digits, failing at the first non-digit position.
#[inline]
fn two_digits(bytes: &[u8], at: usize) -> ScanResult<u8> {
    let tens = digit_at(bytes, at)?;
    let ones = digit_at(bytes, at + 1)?;
    Ok(tens * 10 + ones)
}

/// Reads the fixed four-digit year, failing at the first non-digit position.
#[inline]
fn four_digits(bytes: &[u8], at: usize) -> ScanResult<i32> {
    let d0 = digit_at(bytes, at)?;
    let d1 = digit_at(bytes, at + 1)?;
    let d2 = digit_at(bytes, at + 2)?;
    let d3 = digit_at(bytes, at + 3)?;
    Ok(i32::from(d0) * 1000 + i32::from(d1) * 100 + i32::from(d2) * 10 + i32::from(d3))
}

#[inline]
fn digit_at(bytes: &[u8], at: usize) -> ScanResult<u8> {
    match bytes.get(at) {
        Some(byte) => {
            let digit = byte.wrapping_sub(b'0');
            if digit > 9 {
                return Err(ScanError::malformed(at));
            }
            Ok(digit)
        }
        // Truncated input reports the end of the buffer.
        None => Err(ScanError::malformed(bytes.len())),
    }
}

#[inline]
fn byte_is(bytes: &[u8], at: usize, expected: u8) -> bool {
    bytes.get(at) == Some(&expected)
}

/// Scans a timestamp with the bundled tzdb provider.
///
/// Convenience wrapper over [`parse_with_provider`] using a process-global
/// [`crate::tzdb::CompiledTzdbProvider`].
#[cfg(feature = "tzdb")]
pub fn parse(source: &str) -> ScanResult<Scanned> {
    let provider = crate::tzdb::TZ_PROVIDER
        .lock()
        .map_err(|_| ScanError::provider("unable to acquire the global tzdb provider lock"))?;
    parse_with_provider(source, &*provider)
}
