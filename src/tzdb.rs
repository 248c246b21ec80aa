//! A `ZoneProvider` backed by the compiled IANA database.
//!
//! Zone data comes from `jiff-tzdb`, which bundles the TZif compilation of
//! the IANA tables, and is parsed with the `tzif` crate. TZif is laid out
//! by [RFC 8536][rfc8536]: a sorted list of UTC transition instants, the
//! local-time records they select, and a POSIX TZ footer string describing
//! the ongoing rule past the final transition. Slim compilations lean
//! heavily on the footer, so both lookup paths are implemented here.
//!
//! [rfc8536]: https://datatracker.ietf.org/doc/html/rfc8536

use std::path::Path;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use core::cell::RefCell;
use std::sync::{LazyLock, Mutex};

use combine::Parser;

use tzif::{
    self,
    data::{
        posix::{DstTransitionInfo, PosixTzString, TransitionDay},
        time::Seconds,
        tzif::{DataBlock, TzifData, TzifHeader},
    },
};

use crate::{
    iso::IsoDateTime,
    provider::{CandidateOffsets, GapOffsets, UtcOffsetSeconds, ZoneProvider},
    utils, EpochNanoseconds, ScanError, ScanResult,
};

/// The provider behind the global [`crate::parse`] entry point.
pub(crate) static TZ_PROVIDER: LazyLock<Mutex<CompiledTzdbProvider>> =
    LazyLock::new(|| Mutex::new(CompiledTzdbProvider::default()));

/// Parsed TZif data for one zone.
///
/// This wraps the parse result of the `tzif` crate with the two lookups
/// scanning needs: the offset in force at an instant, and the candidate
/// offsets for a local wall-clock reading.
#[derive(Debug, Clone)]
pub struct Tzif {
    pub header1: TzifHeader,
    pub data_block1: DataBlock,
    pub header2: Option<TzifHeader>,
    pub data_block2: Option<DataBlock>,
    pub footer: Option<PosixTzString>,
}

impl From<TzifData> for Tzif {
    fn from(value: TzifData) -> Self {
        let TzifData {
            header1,
            data_block1,
            header2,
            data_block2,
            footer,
        } = value;

        Self {
            header1,
            data_block1,
            header2,
            data_block2,
            footer,
        }
    }
}

impl Tzif {
    pub fn from_bytes(data: &[u8]) -> ScanResult<Self> {
        let Ok((parse_result, _)) = tzif::parse::tzif::tzif().parse(data) else {
            return Err(ScanError::provider("illformed TZif data"));
        };
        Ok(Self::from(parse_result))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> ScanResult<Self> {
        tzif::parse_tzif_file(path.as_ref())
            .map(Into::into)
            .map_err(|e| ScanError::provider("unreadable TZif file").with_message(e.to_string()))
    }

    fn data_block2(&self) -> ScanResult<&DataBlock> {
        self.data_block2
            .as_ref()
            .ok_or(ScanError::provider("only TZif version 2+ data is supported"))
    }

    /// Returns the UTC offset in force at the given instant.
    pub(crate) fn offset_at(&self, epoch_seconds: i64) -> ScanResult<UtcOffsetSeconds> {
        let db = self.data_block2()?;
        let n = db.transition_times.len();
        match db.transition_times.binary_search(&Seconds(epoch_seconds)) {
            // A transition instant already belongs to the new record.
            Ok(idx) => Ok(UtcOffsetSeconds(offset_after(db, idx))),
            Err(idx) if idx == n => match self.footer.as_ref() {
                Some(posix) => Ok(posix_offset_at(posix, epoch_seconds)),
                None if n == 0 => Ok(UtcOffsetSeconds(initial_offset(db))),
                None => Ok(UtcOffsetSeconds(offset_after(db, n - 1))),
            },
            Err(0) => Ok(UtcOffsetSeconds(initial_offset(db))),
            Err(idx) => Ok(UtcOffsetSeconds(offset_after(db, idx - 1))),
        }
    }

    /// Returns the candidate offsets for a local wall-clock reading.
    ///
    /// A local time around a transition can be skipped (the forward jump)
    /// or duplicated (the backward one), so the result carries zero, one,
    /// or two offsets. Transition times are stored as UTC instants; each is
    /// readable on a wall clock both with the offset before it and the one
    /// after it, and the search below works on those wall-clock readings.
    pub(crate) fn local_candidates(&self, local_seconds: i64) -> ScanResult<CandidateOffsets> {
        let db = self.data_block2()?;
        let n = db.transition_times.len();

        // Count the transitions whose post-transition wall reading is at or
        // before the local time.
        let mut lo = 0usize;
        let mut hi = n;
        while lo < hi {
            let mid = (lo + hi) / 2;
            if db.transition_times[mid].0 + offset_after(db, mid) <= local_seconds {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        let idx = lo;

        if idx == n {
            // Past every explicit transition; the ongoing rule decides.
            return match self.footer.as_ref() {
                Some(posix) => Ok(posix_local_candidates(posix, local_seconds)),
                None if n == 0 => Ok(CandidateOffsets::Single(UtcOffsetSeconds(initial_offset(
                    db,
                )))),
                None => Ok(CandidateOffsets::Single(UtcOffsetSeconds(offset_after(
                    db,
                    n - 1,
                )))),
            };
        }

        let current = if idx == 0 {
            initial_offset(db)
        } else {
            offset_after(db, idx - 1)
        };

        // Skipped range of the next transition: readable with neither the
        // old offset (already passed) nor the new one (not yet reached).
        let next_time = db.transition_times[idx].0;
        let next_offset = offset_after(db, idx);
        if local_seconds >= next_time + current {
            return Ok(CandidateOffsets::Empty(GapOffsets {
                before: UtcOffsetSeconds(current),
                after: UtcOffsetSeconds(next_offset),
            }));
        }

        // Duplicated range of the previous transition: still readable with
        // the offset that preceded it.
        if idx > 0 {
            let prev_time = db.transition_times[idx - 1].0;
            let prev_offset = if idx == 1 {
                initial_offset(db)
            } else {
                offset_after(db, idx - 2)
            };
            if local_seconds < prev_time + prev_offset {
                return Ok(CandidateOffsets::Ambiguous {
                    first: UtcOffsetSeconds(prev_offset),
                    second: UtcOffsetSeconds(current),
                });
            }
        }

        Ok(CandidateOffsets::Single(UtcOffsetSeconds(current)))
    }
}

#[inline]
fn offset_after(db: &DataBlock, idx: usize) -> i64 {
    // An absent transition type selects the first record.
    let record = db.transition_types.get(idx).copied().unwrap_or(0);
    db.local_time_type_records[record].utoff.0
}

#[inline]
fn initial_offset(db: &DataBlock) -> i64 {
    db.local_time_type_records
        .first()
        .map_or(0, |record| record.utoff.0)
}

// ==== POSIX TZ footer evaluation ====
//
// Footer offsets follow the POSIX convention, seconds west of Greenwich,
// and are negated into the east-positive convention used everywhere else.

fn posix_std_offset(posix: &PosixTzString) -> i64 {
    -posix.std_info.offset.0
}

fn posix_dst_offset(dst: &DstTransitionInfo) -> i64 {
    -dst.variant_info.offset.0
}

/// Offset in force at a UTC instant, per the footer rule.
fn posix_offset_at(posix: &PosixTzString, epoch_seconds: i64) -> UtcOffsetSeconds {
    let std_offset = posix_std_offset(posix);
    let Some(dst) = &posix.dst_info else {
        return UtcOffsetSeconds(std_offset);
    };
    let dst_offset = posix_dst_offset(dst);

    // The start rule is given on the standard wall clock, the end rule on
    // the daylight one.
    let local_std = epoch_seconds + std_offset;
    let local_dst = epoch_seconds + dst_offset;

    let is_dst = if matches_transition_day(&dst.start_date.day, local_std) {
        utils::epoch_seconds_to_seconds_in_day(local_std) >= dst.start_date.time.0
    } else if matches_transition_day(&dst.end_date.day, local_dst) {
        utils::epoch_seconds_to_seconds_in_day(local_dst) < dst.end_date.time.0
    } else {
        in_dst_period(&dst.start_date.day, &dst.end_date.day, local_std)
    };

    UtcOffsetSeconds(if is_dst { dst_offset } else { std_offset })
}

/// Candidate offsets for a local wall-clock reading, per the footer rule.
fn posix_local_candidates(posix: &PosixTzString, local_seconds: i64) -> CandidateOffsets {
    let std_offset = posix_std_offset(posix);
    let Some(dst) = &posix.dst_info else {
        return CandidateOffsets::Single(UtcOffsetSeconds(std_offset));
    };
    let dst_offset = posix_dst_offset(dst);
    let gap = dst_offset - std_offset;
    let time = utils::epoch_seconds_to_seconds_in_day(local_seconds);

    if matches_transition_day(&dst.start_date.day, local_seconds) {
        let start = dst.start_date.time.0;
        if time < start {
            return CandidateOffsets::Single(UtcOffsetSeconds(std_offset));
        }
        if time < start + gap {
            return CandidateOffsets::Empty(GapOffsets {
                before: UtcOffsetSeconds(std_offset),
                after: UtcOffsetSeconds(dst_offset),
            });
        }
        return CandidateOffsets::Single(UtcOffsetSeconds(dst_offset));
    }

    if matches_transition_day(&dst.end_date.day, local_seconds) {
        let end = dst.end_date.time.0;
        if time < end - gap {
            return CandidateOffsets::Single(UtcOffsetSeconds(dst_offset));
        }
        if time < end {
            return CandidateOffsets::Ambiguous {
                first: UtcOffsetSeconds(dst_offset),
                second: UtcOffsetSeconds(std_offset),
            };
        }
        return CandidateOffsets::Single(UtcOffsetSeconds(std_offset));
    }

    if in_dst_period(&dst.start_date.day, &dst.end_date.day, local_seconds) {
        CandidateOffsets::Single(UtcOffsetSeconds(dst_offset))
    } else {
        CandidateOffsets::Single(UtcOffsetSeconds(std_offset))
    }
}

/// The month, week-of-month, and day-of-week of a local reading, with a
/// flag marking the last occurrence of that weekday in its month. Week 5 in
/// a rule means "the last week the day occurs".
fn month_week_day(local_seconds: i64) -> (u16, u16, u16, bool) {
    let days = utils::epoch_seconds_to_epoch_days(local_seconds);
    let (year, month, day) = utils::epoch_days_to_iso_date(days);
    let week = ((i32::from(day) - 1) / 7 + 1) as u16;
    let is_last = i32::from(day) + 7 > utils::iso_days_in_month(year, i32::from(month));
    let day_of_week = utils::epoch_seconds_to_day_of_week(local_seconds);
    (u16::from(month), week, day_of_week, is_last)
}

/// The day-of-year value a rule of the given flavor would use for a local
/// reading. `NoLeap` days are 1-based and never count February 29.
fn rule_day_in_year(day: &TransitionDay, local_seconds: i64) -> u16 {
    let day0 = utils::epoch_seconds_to_day_in_year(local_seconds);
    match day {
        TransitionDay::WithLeap(_) => day0,
        _ => {
            let (year, _, _) =
                utils::epoch_days_to_iso_date(utils::epoch_seconds_to_epoch_days(local_seconds));
            if utils::is_leap_year(year) && day0 >= 59 {
                day0
            } else {
                day0 + 1
            }
        }
    }
}

fn matches_transition_day(rule: &TransitionDay, local_seconds: i64) -> bool {
    match rule {
        TransitionDay::Mwd(month, week, day_of_week) => {
            let (m, w, d, is_last) = month_week_day(local_seconds);
            m == *month && d == *day_of_week && (w == *week || (*week == 5 && is_last))
        }
        TransitionDay::NoLeap(day) | TransitionDay::WithLeap(day) => {
            rule_day_in_year(rule, local_seconds) == *day
        }
    }
}

/// Whether the local reading falls between the start and end rules, with
/// wrap-around for zones whose daylight period spans the new year.
fn in_dst_period(start: &TransitionDay, end: &TransitionDay, local_seconds: i64) -> bool {
    match (start, end) {
        (
            TransitionDay::Mwd(start_month, start_week, start_day),
            TransitionDay::Mwd(end_month, end_week, end_day),
        ) => {
            let (m, w, d, _) = month_week_day(local_seconds);
            let current = (m, w, d);
            let start = (*start_month, *start_week, *start_day);
            let end = (*end_month, *end_week, *end_day);
            if start > end {
                current < end || start <= current
            } else {
                start <= current && current < end
            }
        }
        (TransitionDay::NoLeap(start), TransitionDay::NoLeap(end)) => {
            let day = rule_day_in_year(&TransitionDay::NoLeap(*start), local_seconds);
            if start > end {
                day < *end || *start <= day
            } else {
                *start <= day && day < *end
            }
        }
        (TransitionDay::WithLeap(start), TransitionDay::WithLeap(end)) => {
            let day = rule_day_in_year(&TransitionDay::WithLeap(*start), local_seconds);
            if start > end {
                day < *end || *start <= day
            } else {
                *start <= day && day < *end
            }
        }
        // Mismatched rule flavors only occur in illformed footers.
        _ => false,
    }
}

/// A `ZoneProvider` over the compiled database, caching parsed zones per
/// identifier.
#[derive(Debug, Default)]
pub struct CompiledTzdbProvider {
    cache: RefCell<BTreeMap<String, Tzif>>,
}

impl CompiledTzdbProvider {
    pub fn get(&self, identifier: &str) -> ScanResult<Tzif> {
        if let Some(tzif) = self.cache.borrow().get(identifier) {
            return Ok(tzif.clone());
        }
        let Some((canonical, data)) = jiff_tzdb::get(identifier) else {
            return Err(ScanError::unknown_zone(identifier));
        };
        #[cfg(feature = "log")]
        log::trace!("parsing TZif data for {canonical} (requested as {identifier})");
        #[cfg(not(feature = "log"))]
        let _ = canonical;
        let tzif = Tzif::from_bytes(data)?;
        Ok(self
            .cache
            .borrow_mut()
            .entry(identifier.into())
            .or_insert(tzif)
            .clone())
    }
}

impl ZoneProvider for CompiledTzdbProvider {
    fn check_identifier(&self, identifier: &str) -> bool {
        jiff_tzdb::get(identifier).is_some()
    }

    fn local_offsets_for(
        &self,
        identifier: &str,
        local: IsoDateTime,
    ) -> ScanResult<CandidateOffsets> {
        self.get(identifier)?.local_candidates(local.as_seconds())
    }

    fn offset_seconds_for(
        &self,
        identifier: &str,
        epoch: EpochNanoseconds,
    ) -> ScanResult<UtcOffsetSeconds> {
        self.get(identifier)?.offset_at(epoch.as_seconds()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iso::{IsoDate, IsoDateTime, IsoTime};

    fn local(year: i32, month: u8, day: u8, hour: u8, minute: u8) -> IsoDateTime {
        IsoDateTime::new(
            IsoDate::new_unchecked(year, month, day),
            IsoTime::new_unchecked(hour, minute, 0, 0),
        )
    }

    #[test]
    fn new_york_fall_back_is_ambiguous() {
        let provider = CompiledTzdbProvider::default();
        let candidates = provider
            .local_offsets_for("America/New_York", local(2017, 11, 5, 1, 30))
            .unwrap();
        assert_eq!(
            candidates,
            CandidateOffsets::Ambiguous {
                first: UtcOffsetSeconds(-14_400),
                second: UtcOffsetSeconds(-18_000),
            }
        );
    }

    #[test]
    fn new_york_spring_forward_is_empty() {
        let provider = CompiledTzdbProvider::default();
        let candidates = provider
            .local_offsets_for("America/New_York", local(2017, 3, 12, 2, 30))
            .unwrap();
        assert_eq!(
            candidates,
            CandidateOffsets::Empty(GapOffsets {
                before: UtcOffsetSeconds(-18_000),
                after: UtcOffsetSeconds(-14_400),
            })
        );

        // One second before the gap, and the first instant after it, are
        // both unambiguous.
        let candidates = provider
            .local_offsets_for("America/New_York", local(2017, 3, 12, 1, 59))
            .unwrap();
        assert_eq!(
            candidates,
            CandidateOffsets::Single(UtcOffsetSeconds(-18_000))
        );
        let candidates = provider
            .local_offsets_for("America/New_York", local(2017, 3, 12, 3, 0))
            .unwrap();
        assert_eq!(
            candidates,
            CandidateOffsets::Single(UtcOffsetSeconds(-14_400))
        );
    }

    #[test]
    fn sydney_fall_back_is_ambiguous() {
        let provider = CompiledTzdbProvider::default();
        let candidates = provider
            .local_offsets_for("Australia/Sydney", local(2017, 4, 2, 2, 30))
            .unwrap();
        assert_eq!(
            candidates,
            CandidateOffsets::Ambiguous {
                first: UtcOffsetSeconds(39_600),
                second: UtcOffsetSeconds(36_000),
            }
        );
    }

    #[test]
    fn stockholm_summer_and_winter_offsets() {
        let provider = CompiledTzdbProvider::default();
        let summer = provider
            .local_offsets_for("Europe/Stockholm", local(2023, 7, 15, 12, 0))
            .unwrap();
        assert_eq!(summer, CandidateOffsets::Single(UtcOffsetSeconds(7200)));
        let winter = provider
            .local_offsets_for("Europe/Stockholm", local(2023, 1, 15, 12, 0))
            .unwrap();
        assert_eq!(winter, CandidateOffsets::Single(UtcOffsetSeconds(3600)));
    }

    #[test]
    fn far_future_resolves_through_the_footer() {
        let provider = CompiledTzdbProvider::default();
        let summer = provider
            .local_offsets_for("Europe/Stockholm", local(2050, 7, 15, 12, 0))
            .unwrap();
        assert_eq!(summer, CandidateOffsets::Single(UtcOffsetSeconds(7200)));
    }

    #[test]
    fn historical_transition_lookup() {
        let provider = CompiledTzdbProvider::default();
        let candidates = provider
            .local_offsets_for("America/New_York", local(2000, 7, 1, 12, 0))
            .unwrap();
        assert_eq!(
            candidates,
            CandidateOffsets::Single(UtcOffsetSeconds(-14_400))
        );
    }

    #[test]
    fn offset_at_instant_and_idempotence() {
        let provider = CompiledTzdbProvider::default();
        // 2023-07-15T10:00:00Z.
        let epoch = EpochNanoseconds::from(1_689_415_200_000_000_000i128);
        let first = provider
            .offset_seconds_for("Europe/Stockholm", epoch)
            .unwrap();
        let second = provider
            .offset_seconds_for("Europe/Stockholm", epoch)
            .unwrap();
        assert_eq!(first, UtcOffsetSeconds(7200));
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_identifier_is_rejected() {
        let provider = CompiledTzdbProvider::default();
        assert!(!provider.check_identifier("Atlantis/Central"));
        assert!(provider.check_identifier("Europe/Stockholm"));
        assert!(provider.check_identifier("Zulu"));
        assert!(provider.get("Atlantis/Central").is_err());
    }
}
