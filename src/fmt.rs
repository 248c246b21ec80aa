//! `Writeable`-based formatting for the scanned value types.
//!
//! The writers here emit the same fixed-width grammar the scanner accepts:
//! zero-padded fields, `T` as the time designator, fractions printed to
//! their significant digits, offsets as `±HH:MM`. Scanning the output of
//! any writer reproduces an equal value.

use writeable::{impl_display_with_writeable, LengthHint, Writeable};

use crate::{
    iso::{IsoDate, IsoDateTime, IsoTime},
    parsers::{Scanned, ZonedTimestamp},
    timezone::TimeZone,
    Sign,
};

#[derive(Debug)]
pub(crate) struct FormattableDate(pub(crate) i32, pub(crate) u8, pub(crate) u8);

impl Writeable for FormattableDate {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        write_padded_year(self.0, sink)?;
        sink.write_char('-')?;
        write_padded_u8(self.1, sink)?;
        sink.write_char('-')?;
        write_padded_u8(self.2, sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::exact(10)
    }
}

#[derive(Debug)]
pub(crate) struct FormattableTime {
    pub(crate) hour: u8,
    pub(crate) minute: u8,
    pub(crate) second: u8,
    pub(crate) nanosecond: u32,
}

impl Writeable for FormattableTime {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        write_padded_u8(self.hour, sink)?;
        sink.write_char(':')?;
        write_padded_u8(self.minute, sink)?;
        sink.write_char(':')?;
        write_padded_u8(self.second, sink)?;
        if self.nanosecond == 0 {
            return Ok(());
        }
        sink.write_char('.')?;
        write_nanosecond(self.nanosecond, sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        if self.nanosecond == 0 {
            return LengthHint::exact(8);
        }
        LengthHint::between(10, 18)
    }
}

#[derive(Debug)]
pub(crate) struct FormattableOffset {
    pub(crate) sign: Sign,
    pub(crate) hour: u8,
    pub(crate) minute: u8,
}

impl FormattableOffset {
    pub(crate) fn from_minutes(minutes: i16) -> Self {
        let sign = if minutes < 0 {
            Sign::Negative
        } else {
            Sign::Positive
        };
        Self {
            sign,
            hour: (minutes.unsigned_abs() / 60) as u8,
            minute: (minutes.unsigned_abs() % 60) as u8,
        }
    }
}

impl Writeable for FormattableOffset {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        match self.sign {
            Sign::Negative => sink.write_char('-')?,
            _ => sink.write_char('+')?,
        }
        write_padded_u8(self.hour, sink)?;
        sink.write_char(':')?;
        write_padded_u8(self.minute, sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::exact(6)
    }
}

impl_display_with_writeable!(FormattableDate);
impl_display_with_writeable!(FormattableTime);
impl_display_with_writeable!(FormattableOffset);

fn write_padded_u8<W: core::fmt::Write + ?Sized>(num: u8, sink: &mut W) -> core::fmt::Result {
    if num < 10 {
        sink.write_char('0')?;
    }
    num.write_to(sink)
}

fn write_padded_year<W: core::fmt::Write + ?Sized>(year: i32, sink: &mut W) -> core::fmt::Result {
    let mut weight = 1000;
    while weight > 0 {
        let digit = (year / weight) % 10;
        sink.write_char((b'0' + digit as u8) as char)?;
        weight /= 10;
    }
    Ok(())
}

/// Writes the significant digits of a sub-second value, most significant
/// first, with trailing zeros trimmed.
fn write_nanosecond<W: core::fmt::Write + ?Sized>(
    nanosecond: u32,
    sink: &mut W,
) -> core::fmt::Result {
    let (digits, precision) = u32_to_digits(nanosecond);
    for digit in digits.iter().take(precision) {
        digit.write_to(sink)?;
    }
    Ok(())
}

/// Splits a nanosecond value into nine decimal digits plus the index just
/// past the last non-zero digit.
fn u32_to_digits(mut value: u32) -> ([u8; 9], usize) {
    let mut output = [0; 9];
    let mut precision = 0;
    let mut i = 9;
    while i != 0 {
        let v = (value % 10) as u8;
        value /= 10;
        if precision == 0 && v != 0 {
            precision = i;
        }
        output[i - 1] = v;
        i -= 1;
    }
    (output, precision)
}

impl Writeable for IsoDate {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        FormattableDate(self.year, self.month, self.day).write_to(sink)
    }

    fn writeable_length_hint(&self) -> LengthHint {
        LengthHint::exact(10)
    }
}

impl Writeable for IsoTime {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        FormattableTime {
            hour: self.hour,
            minute: self.minute,
            second: self.second,
            nanosecond: self.nanosecond,
        }
        .write_to(sink)
    }
}

impl Writeable for IsoDateTime {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        self.date.write_to(sink)?;
        sink.write_char('T')?;
        self.time.write_to(sink)
    }
}

impl Writeable for TimeZone {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        match self {
            // The zero offset prints as the designator it was scanned from.
            TimeZone::OffsetMinutes(0) => sink.write_char('Z'),
            TimeZone::OffsetMinutes(minutes) => {
                FormattableOffset::from_minutes(*minutes).write_to(sink)
            }
            TimeZone::IanaIdentifier(identifier) => sink.write_str(identifier),
        }
    }
}

impl Writeable for ZonedTimestamp {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        self.iso.write_to(sink)?;
        self.zone.write_to(sink)
    }
}

impl Writeable for Scanned {
    fn write_to<W: core::fmt::Write + ?Sized>(&self, sink: &mut W) -> core::fmt::Result {
        match self {
            Scanned::Date(date) => date.write_to(sink),
            Scanned::DateTime(iso) => iso.write_to(sink),
            Scanned::Zoned(zoned) => zoned.write_to(sink),
        }
    }
}

impl_display_with_writeable!(IsoDate);
impl_display_with_writeable!(IsoTime);
impl_display_with_writeable!(IsoDateTime);
impl_display_with_writeable!(TimeZone);
impl_display_with_writeable!(ZonedTimestamp);
impl_display_with_writeable!(Scanned);

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn date_writes_fixed_width() {
        assert_eq!(IsoDate::new_unchecked(2023, 6, 5).to_string(), "2023-06-05");
        assert_eq!(IsoDate::new_unchecked(33, 11, 30).to_string(), "0033-11-30");
    }

    #[test]
    fn time_trims_trailing_fraction_zeros() {
        let t = IsoTime::new_unchecked(10, 30, 45, 123_000_000);
        assert_eq!(t.to_string(), "10:30:45.123");
        let t = IsoTime::new_unchecked(10, 30, 45, 0);
        assert_eq!(t.to_string(), "10:30:45");
        let t = IsoTime::new_unchecked(10, 30, 45, 123_456_789);
        assert_eq!(t.to_string(), "10:30:45.123456789");
        let t = IsoTime::new_unchecked(10, 30, 45, 1);
        assert_eq!(t.to_string(), "10:30:45.000000001");
    }

    #[test]
    fn offset_formats_signed_and_padded() {
        assert_eq!(FormattableOffset::from_minutes(570).to_string(), "+09:30");
        assert_eq!(FormattableOffset::from_minutes(-330).to_string(), "-05:30");
        assert_eq!(TimeZone::OffsetMinutes(0).to_string(), "Z");
    }
}
