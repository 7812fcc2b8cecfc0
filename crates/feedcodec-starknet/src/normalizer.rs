//! Price-feed normalizer.
//!
//! Turns the decoded inputs of a `submit_many_entries` style call into
//! [`PriceObservation`]s. Each `Entry` struct carries four felts: `key` and
//! `publisher` are short strings packed into the felt, `value` is the raw
//! integer price and `timestamp` is Unix seconds.
//!
//! A call either yields all of its observations or none of them.

use feedcodec_core::{
    error::{NormalizeError, WordError},
    feed::PriceObservation,
    value::{find_node, DecodedNode, DecodedStruct},
    word::Word,
};
use serde::Serialize;
use tracing::{debug, warn};

/// Input member that carries the submitted entries.
pub const NEW_ENTRIES: &str = "new_entries";

/// Why a call produced no observations.
#[derive(Debug)]
pub enum NoDataReason {
    /// The call has no `new_entries` input (e.g. an admin call)
    MissingEntries,
    /// `new_entries` was present but could not be normalized
    Malformed(NormalizeError),
}

/// Outcome of normalizing one decoded call.
#[derive(Debug)]
pub enum FeedOutcome {
    Observations(Vec<PriceObservation>),
    NoData(NoDataReason),
}

impl FeedOutcome {
    /// Observations if any were produced; empty otherwise.
    pub fn observations(&self) -> &[PriceObservation] {
        match self {
            FeedOutcome::Observations(obs) => obs,
            FeedOutcome::NoData(_) => &[],
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, FeedOutcome::NoData(_))
    }
}

impl Serialize for FeedOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.observations().serialize(serializer)
    }
}

/// Normalize the decoded inputs of one call.
pub fn normalize_submit_many_entries(inputs: &[DecodedNode]) -> FeedOutcome {
    let Some(node) = find_node(inputs, NEW_ENTRIES) else {
        debug!("call has no {NEW_ENTRIES} input");
        return FeedOutcome::NoData(NoDataReason::MissingEntries);
    };

    let Some(entries) = node.value.as_struct_array() else {
        let err = NormalizeError::UnexpectedShape {
            member: node.name.clone(),
            expected: "an array of entry structs",
        };
        warn!(error = %err, "dropping call");
        return FeedOutcome::NoData(NoDataReason::Malformed(err));
    };

    let normalized: Result<Vec<_>, _> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| normalize_entry(index, entry))
        .collect();

    match normalized {
        Ok(obs) => FeedOutcome::Observations(obs),
        Err(err) => {
            warn!(error = %err, entries = entries.len(), "dropping call");
            FeedOutcome::NoData(NoDataReason::Malformed(err))
        }
    }
}

/// Normalize a single decoded entry struct.
pub fn normalize_entry(
    index: usize,
    entry: &DecodedStruct,
) -> Result<PriceObservation, NormalizeError> {
    let field = |name: &'static str| -> Result<&Word, NormalizeError> {
        entry
            .get(name)
            .and_then(|v| v.as_felt())
            .ok_or(NormalizeError::MissingField { index, field: name })
    };
    let malformed = |name: &'static str| {
        move |source: WordError| NormalizeError::MalformedEntry {
            index,
            field: name,
            source,
        }
    };

    Ok(PriceObservation {
        feed: field("key")?.to_text().map_err(malformed("key"))?,
        price: field("value")?.to_u128().map_err(malformed("value"))?,
        timestamp: field("timestamp")?.to_u64().map_err(malformed("timestamp"))?,
        publisher: field("publisher")?.to_text().map_err(malformed("publisher"))?,
    })
}
