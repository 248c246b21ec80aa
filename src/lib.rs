//! `timescan` scans ISO-8601-flavored timestamps in a single left-to-right
//! pass, for workloads that parse timestamps by the millions: log
//! ingestion, search indexing, metrics pipelines.
//!
//! ```rust
//! use timescan::{parse, Scanned, TimeZone};
//!
//! let scanned = parse("2023-06-15T10:30:45.123Z").unwrap();
//! let Scanned::Zoned(zoned) = scanned else { unreachable!() };
//! assert_eq!(zoned.iso.time.nanosecond, 123_000_000);
//! assert_eq!(zoned.zone, TimeZone::UTC);
//! ```
//!
//! The accepted grammar is a strict `date, optional time, optional
//! fraction, optional zone` shape. Scanning stops at the first absent
//! optional component and returns the less-specific value instead of
//! failing, so `"2023"`, `"2023-06"`, and `"2023-06-15"` are all valid
//! dates, and a date-time may end with no zone, a `Z`, a numeric offset, or
//! an IANA zone identifier:
//!
//! ```rust
//! use timescan::{parse, Scanned};
//!
//! assert!(matches!(parse("2023-06"), Ok(Scanned::Date(d)) if d.month == 6));
//! assert!(matches!(parse("2023-06-15T10:30"), Ok(Scanned::DateTime(_))));
//! assert!(matches!(parse("2023-06-15T10:30:45+02:00"), Ok(Scanned::Zoned(_))));
//! assert!(matches!(parse("2023-06-15T10:30:45Europe/Stockholm"), Ok(Scanned::Zoned(_))));
//! ```
//!
//! Named zones are resolved through a [`provider::ZoneProvider`]; the
//! `tzdb` feature (default) bundles one backed by the compiled IANA
//! database. Scanning itself allocates only when it carries a zone
//! identifier through to the result.
//!
//! One compatibility behavior is intentional and worth knowing: trailing
//! text after a bare date is ignored rather than rejected (see
//! [`parsers`]), matching the permissive reference grammar this crate is
//! drop-in compatible with.
#![no_std]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod iso;
pub mod parsers;
pub mod provider;

mod epoch_nanoseconds;
mod fmt;
mod timezone;

#[cfg(feature = "tzdb")]
pub mod tzdb;

#[doc(hidden)]
pub(crate) mod utils;

#[doc(inline)]
pub use error::{ErrorKind, ScanError};

/// The `timescan` result type.
pub type ScanResult<T> = Result<T, ScanError>;

pub use epoch_nanoseconds::EpochNanoseconds;
#[cfg(feature = "tzdb")]
pub use parsers::parse;
pub use parsers::{parse_with_provider, Scanned, ZonedTimestamp};
pub use timezone::TimeZone;

/// A general sign type for formatted offsets.
#[repr(i8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    #[default]
    Positive = 1,
    Negative = -1,
}

// Relevant numeric constants
/// Nanoseconds per second constant: 10^9
pub const NS_PER_SECOND: u32 = 1_000_000_000;
/// Nanoseconds per day constant: 8.64e+13
pub const NS_PER_DAY: u64 = 86_400 * NS_PER_SECOND as u64;
/// Earliest supported instant: 0000-01-01T00:00:00Z, with a day of slack
/// for offset arithmetic.
#[doc(hidden)]
pub(crate) const NS_MIN_INSTANT: i128 =
    (utils::iso_date_to_epoch_days(0, 1, 1) as i128 - 1) * NS_PER_DAY as i128;
/// Latest supported instant: the last nanosecond of 9999-12-31 UTC, with a
/// day of slack for offset arithmetic.
#[doc(hidden)]
pub(crate) const NS_MAX_INSTANT: i128 =
    (utils::iso_date_to_epoch_days(9999, 12, 31) as i128 + 2) * NS_PER_DAY as i128 - 1;
