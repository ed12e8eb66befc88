//! # Timestamp association between two streams
//!
//! An **association** pairs each index of a *primary* stream (camera frames, RGB-D association
//! lists) with the closest-in-time index of a *secondary* stream (ground truth poses). The result
//! is an [`AssociationMap`], built once per dataset and read-only afterwards.
//!
//! Modules
//! -----------------
//! * [`associator`](crate::association::associator) – Greedy nearest-timestamp matching under a
//!   maximum time difference ([`associate`]).
//! * [`cache`](crate::association::cache) – JSON sidecar persistence so the matching runs once
//!   per dataset directory.
//!
//! Invariants
//! -----------------
//! * Every primary index maps to at most one secondary index, and every secondary index is the
//!   target of at most one primary index.
//! * Every entry satisfies `time_diff < max_difference` for the threshold it was built with.
//!
//! Entry layouts
//! -----------------
//! Entries either carry only `(secondary_index, time_diff)` ([`EntryLayout::Compact`]) or also the
//! two matched timestamps ([`EntryLayout::WithTimestamps`]). The layout is fixed per dataset
//! format and is reflected in the sidecar file.
use std::fmt;

use serde::{
    de::{self, SeqAccess, Visitor},
    ser::SerializeSeq,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::constants::{FastHashMap, Seconds};

pub mod associator;
pub mod cache;

pub use associator::associate;

/// Shape of the entries produced by [`associate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryLayout {
    /// `[secondary_index, time_diff]`
    Compact,
    /// `[secondary_index, time_diff, primary_timestamp, secondary_timestamp]`
    WithTimestamps,
}

/// Target of one primary index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssociationEntry {
    pub secondary_index: usize,
    pub time_diff: Seconds,
    pub primary_timestamp: Option<Seconds>,
    pub secondary_timestamp: Option<Seconds>,
}

impl AssociationEntry {
    pub fn compact(secondary_index: usize, time_diff: Seconds) -> Self {
        AssociationEntry {
            secondary_index,
            time_diff,
            primary_timestamp: None,
            secondary_timestamp: None,
        }
    }

    pub fn with_timestamps(
        secondary_index: usize,
        time_diff: Seconds,
        primary_timestamp: Seconds,
        secondary_timestamp: Seconds,
    ) -> Self {
        AssociationEntry {
            secondary_index,
            time_diff,
            primary_timestamp: Some(primary_timestamp),
            secondary_timestamp: Some(secondary_timestamp),
        }
    }

    pub fn layout(&self) -> EntryLayout {
        match (self.primary_timestamp, self.secondary_timestamp) {
            (Some(_), Some(_)) => EntryLayout::WithTimestamps,
            _ => EntryLayout::Compact,
        }
    }
}

impl Serialize for AssociationEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match (self.primary_timestamp, self.secondary_timestamp) {
            (Some(ta), Some(tb)) => {
                let mut seq = serializer.serialize_seq(Some(4))?;
                seq.serialize_element(&self.secondary_index)?;
                seq.serialize_element(&self.time_diff)?;
                seq.serialize_element(&ta)?;
                seq.serialize_element(&tb)?;
                seq.end()
            }
            _ => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(&self.secondary_index)?;
                seq.serialize_element(&self.time_diff)?;
                seq.end()
            }
        }
    }
}

/// Timestamps may be stored as JSON numbers or as the raw text token they were read from.
#[derive(Deserialize)]
#[serde(untagged)]
enum Stamp {
    Number(f64),
    Text(String),
}

impl Stamp {
    fn into_f64<E: de::Error>(self) -> Result<f64, E> {
        match self {
            Stamp::Number(v) => Ok(v),
            Stamp::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid timestamp {s:?}"))),
        }
    }
}

struct EntryVisitor;

impl<'de> Visitor<'de> for EntryVisitor {
    type Value = AssociationEntry;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("[secondary_index, time_diff] or [secondary_index, time_diff, t_first, t_second]")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let secondary_index: usize = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let time_diff: f64 = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;

        let primary: Option<Stamp> = seq.next_element()?;
        let Some(primary) = primary else {
            return Ok(AssociationEntry::compact(secondary_index, time_diff));
        };
        let secondary: Stamp = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(3, &self))?;
        if seq.next_element::<de::IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(5, &self));
        }

        Ok(AssociationEntry::with_timestamps(
            secondary_index,
            time_diff,
            primary.into_f64()?,
            secondary.into_f64()?,
        ))
    }
}

impl<'de> Deserialize<'de> for AssociationEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(EntryVisitor)
    }
}

/// Injective map `primary index → AssociationEntry`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssociationMap {
    entries: FastHashMap<usize, AssociationEntry>,
}

impl AssociationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, primary_index: usize) -> Option<&AssociationEntry> {
        self.entries.get(&primary_index)
    }

    pub fn contains(&self, primary_index: usize) -> bool {
        self.entries.contains_key(&primary_index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(primary_index, entry)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &AssociationEntry)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    /// Entries sorted by primary index.
    pub fn sorted(&self) -> Vec<(usize, &AssociationEntry)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by_key(|(k, _)| *k);
        entries
    }

    pub(crate) fn insert(&mut self, primary_index: usize, entry: AssociationEntry) {
        self.entries.insert(primary_index, entry);
    }
}

impl FromIterator<(usize, AssociationEntry)> for AssociationMap {
    fn from_iter<I: IntoIterator<Item = (usize, AssociationEntry)>>(iter: I) -> Self {
        AssociationMap {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for AssociationMap {
    type Item = (usize, AssociationEntry);
    type IntoIter = std::collections::hash_map::IntoIter<usize, AssociationEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Output of [`associate`]: the map and the primary indices left without a match.
#[derive(Debug, Clone, PartialEq)]
pub struct Association {
    pub map: AssociationMap,
    pub missing: Vec<usize>,
}

impl Association {
    /// Number of primary indices without an association.
    pub fn missing_count(&self) -> usize {
        self.missing.len()
    }
}
