//! Calendar equations shared by the field records and the tzdb provider.

/// Seconds per day.
pub(crate) const SECONDS_PER_DAY: i64 = 86_400;

/// Returns whether the given proleptic Gregorian year is a leap year.
#[inline]
pub(crate) const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// `ISODaysInMonth ( year, month )`
///
/// Month is in the range 1-12.
#[inline]
pub(crate) const fn iso_days_in_month(year: i32, month: i32) -> i32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => 28 + is_leap_year(year) as i32,
        _ => unreachable!(),
    }
}

/// Returns the day number since the Unix epoch for a civil date.
///
/// Month is in the range 1-12. Days before 1970-01-01 are negative.
#[inline]
pub(crate) const fn iso_date_to_epoch_days(year: i32, month: i32, day: i32) -> i64 {
    let y = (if month <= 2 { year - 1 } else { year }) as i64;
    let era = y.div_euclid(400);
    let year_of_era = y - era * 400;
    let shifted_month = ((month + 9) % 12) as i64;
    let day_of_year = (153 * shifted_month + 2) / 5 + day as i64 - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}

/// Inverse of [`iso_date_to_epoch_days`]: epoch day number to (year, month, day).
#[inline]
pub(crate) const fn epoch_days_to_iso_date(epoch_days: i64) -> (i32, u8, u8) {
    let z = epoch_days + 719_468;
    let era = z.div_euclid(146_097);
    let day_of_era = z - era * 146_097;
    let year_of_era =
        (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let year = year_of_era + era * 400;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let shifted_month = (5 * day_of_year + 2) / 153;
    let day = (day_of_year - (153 * shifted_month + 2) / 5 + 1) as u8;
    let month = (if shifted_month < 10 {
        shifted_month + 3
    } else {
        shifted_month - 9
    }) as u8;
    let year = (if month <= 2 { year + 1 } else { year }) as i32;
    (year, month, day)
}

/// Epoch seconds to the day number containing them.
#[inline]
pub(crate) const fn epoch_seconds_to_epoch_days(seconds: i64) -> i64 {
    seconds.div_euclid(SECONDS_PER_DAY)
}

/// Epoch seconds to the second-of-day component.
#[inline]
pub(crate) const fn epoch_seconds_to_seconds_in_day(seconds: i64) -> i64 {
    seconds.rem_euclid(SECONDS_PER_DAY)
}

/// Epoch seconds to day of week, with 0 = Sunday (the POSIX TZ convention).
#[inline]
pub(crate) const fn epoch_seconds_to_day_of_week(seconds: i64) -> u16 {
    // 1970-01-01 was a Thursday.
    (epoch_seconds_to_epoch_days(seconds) + 4).rem_euclid(7) as u16
}

/// Epoch seconds to the zero-based day of the year.
#[inline]
pub(crate) const fn epoch_seconds_to_day_in_year(seconds: i64) -> u16 {
    let days = epoch_seconds_to_epoch_days(seconds);
    let (year, _, _) = epoch_days_to_iso_date(days);
    (days - iso_date_to_epoch_days(year, 1, 1)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_day_round_trips() {
        assert_eq!(iso_date_to_epoch_days(1970, 1, 1), 0);
        assert_eq!(iso_date_to_epoch_days(2000, 1, 1), 10_957);
        assert_eq!(iso_date_to_epoch_days(2023, 1, 1), 19_358);
        assert_eq!(iso_date_to_epoch_days(0, 1, 1), -719_528);

        for &days in &[-719_528i64, -1, 0, 1, 10_957, 19_358, 2_932_896] {
            let (y, m, d) = epoch_days_to_iso_date(days);
            assert_eq!(iso_date_to_epoch_days(y, i32::from(m), i32::from(d)), days);
        }
        assert_eq!(epoch_days_to_iso_date(2_932_896), (9999, 12, 31));
    }

    #[test]
    fn leap_year_rule() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2020));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert_eq!(iso_days_in_month(2020, 2), 29);
        assert_eq!(iso_days_in_month(2023, 2), 28);
        assert_eq!(iso_days_in_month(2023, 4), 30);
    }

    #[test]
    fn day_of_week_convention() {
        // 1970-01-01 was a Thursday, 2023-01-01 a Sunday.
        assert_eq!(epoch_seconds_to_day_of_week(0), 4);
        assert_eq!(epoch_seconds_to_day_of_week(1_672_531_200), 0);
        // Negative seconds stay on the 0-6 wheel.
        assert_eq!(epoch_seconds_to_day_of_week(-86_400), 3);
    }

    #[test]
    fn day_in_year_is_zero_based() {
        assert_eq!(epoch_seconds_to_day_in_year(0), 0);
        // 2020-12-31 in a leap year.
        let d = iso_date_to_epoch_days(2020, 12, 31) * SECONDS_PER_DAY;
        assert_eq!(epoch_seconds_to_day_in_year(d), 365);
    }
}
