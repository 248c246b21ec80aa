//! The `ZoneProvider` trait.
//!
//! Zone identifiers and their offset rules live in a regularly-updated
//! database that does not belong in the scanner. Providers are the
//! swappable authority for that data; [`crate::tzdb::CompiledTzdbProvider`]
//! is the bundled implementation. A provider's tables are expected to be
//! immutable for the lifetime of the process, so resolving the same zone
//! text twice always yields identical results.

use crate::{iso::IsoDateTime, EpochNanoseconds, ScanResult};

/// A UTC offset in seconds, positive east of Greenwich.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UtcOffsetSeconds(pub i64);

/// The offsets on either side of a skipped local-time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapOffsets {
    /// The offset in force just before the transition.
    pub before: UtcOffsetSeconds,
    /// The offset in force at and after the transition.
    pub after: UtcOffsetSeconds,
}

/// The result of looking up a local wall-clock time in a named zone.
///
/// Around daylight-saving transitions a local time can correspond to zero
/// (spring-forward gap) or two (fall-back overlap) instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOffsets {
    /// The local time was skipped by a forward transition.
    Empty(GapOffsets),
    /// The local time maps to exactly one instant.
    Single(UtcOffsetSeconds),
    /// The local time occurs twice; `first` produces the earlier instant.
    Ambiguous {
        first: UtcOffsetSeconds,
        second: UtcOffsetSeconds,
    },
}

/// The interface required to source time zone data for scanning.
pub trait ZoneProvider {
    /// Returns whether `identifier` names a zone known to this provider.
    fn check_identifier(&self, identifier: &str) -> bool;

    /// Returns the candidate UTC offsets for a local wall-clock time in the
    /// named zone.
    fn local_offsets_for(
        &self,
        identifier: &str,
        local: IsoDateTime,
    ) -> ScanResult<CandidateOffsets>;

    /// Returns the UTC offset in force in the named zone at the given
    /// instant.
    fn offset_seconds_for(
        &self,
        identifier: &str,
        epoch: EpochNanoseconds,
    ) -> ScanResult<UtcOffsetSeconds>;
}

/// A provider for contexts where named zones never occur.
pub struct NeverProvider;

impl ZoneProvider for NeverProvider {
    fn check_identifier(&self, _: &str) -> bool {
        false
    }

    fn local_offsets_for(&self, _: &str, _: IsoDateTime) -> ScanResult<CandidateOffsets> {
        unimplemented!()
    }

    fn offset_seconds_for(&self, _: &str, _: EpochNanoseconds) -> ScanResult<UtcOffsetSeconds> {
        unimplemented!()
    }
}
