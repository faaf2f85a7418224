//! Cross-version reconciliation
//!
//! Given the icons of one or more releases, every name (identifier or alias)
//! lands either in the `common` group, when all releases agree on its code
//! point, or in one group per major version, when they don't.

use std::cmp::Reverse;
use std::collections::{btree_map, BTreeMap, BTreeSet};
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::icons::IconRecord;

/// Icons of every requested release, tagged with their major version
pub type VersionedIconSet = Vec<(u32, Vec<IconRecord>)>;

/// Group key of a [`ReconciledTable`]
///
/// The derived ordering puts `Common` first, then versions ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Group {
    Common,
    Version(u32),
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::Common => write!(f, "common"),
            Group::Version(version) => write!(f, "{version}"),
        }
    }
}

/// A single reconciled name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub identifier: String,
    pub code_point: String,
    pub solid_only: bool,
}

impl Entry {
    pub fn new(identifier: &str, code_point: &str, solid_only: bool) -> Self {
        Self {
            identifier: identifier.to_string(),
            code_point: code_point.to_string(),
            solid_only,
        }
    }
}

/// Reconciled icons grouped by [`Group`]
///
/// Entries of every group are sorted by `(code_point, identifier)`. The
/// common group is always present, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledTable {
    groups: BTreeMap<Group, Vec<Entry>>,
}

impl Default for ReconciledTable {
    fn default() -> Self {
        let mut groups = BTreeMap::new();
        groups.insert(Group::Common, Vec::new());
        Self { groups }
    }
}

impl ReconciledTable {
    pub fn common(&self) -> &[Entry] {
        self.get(Group::Common).unwrap_or_default()
    }

    pub fn get(&self, group: Group) -> Option<&[Entry]> {
        self.groups.get(&group).map(Vec::as_slice)
    }

    /// All groups, common first
    pub fn groups(&self) -> impl Iterator<Item = (Group, &[Entry])> {
        self.groups
            .iter()
            .map(|(group, entries)| (*group, entries.as_slice()))
    }

    /// Version groups in ascending order
    pub fn conflicts(&self) -> impl Iterator<Item = (u32, &[Entry])> {
        self.groups.iter().filter_map(|(group, entries)| match group {
            Group::Version(version) => Some((*version, entries.as_slice())),
            Group::Common => None,
        })
    }

    /// Highest version that has a conflict group
    pub fn latest_conflict_version(&self) -> Option<u32> {
        self.conflicts().map(|(version, _)| version).max()
    }

    /// Total number of entries across all groups
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for ReconciledTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (group, entries) in &self.groups {
            map.serialize_entry(&group.to_string(), entries)?;
        }
        map.end()
    }
}

/// Code point one release assigns to a name
#[derive(Debug, Clone, Copy)]
struct Observation<'a> {
    code_point: &'a str,
    solid_only: bool,
    /// The name is the icon's identifier rather than one of its aliases
    primary: bool,
    /// Position of the release in the input
    release: usize,
}

impl<'a> Observation<'a> {
    /// Higher ranks replace lower ones under the same major version
    fn rank(&self) -> (bool, usize, Reverse<&'a str>) {
        (self.primary, self.release, Reverse(self.code_point))
    }
}

/// Reconcile the icons of several releases
///
/// A name is common only when every release that has it agrees on one code
/// point. Otherwise each major version gets one entry for it, so with
/// releases 5, 6, 7 where 5 and 7 agree and 6 differs, the name shows up
/// under all three groups.
///
/// Each major version resolves a name to a single code point. An identifier
/// beats an alias of another icon, a later release beats an earlier one of
/// the same major, and the lower code point breaks any remaining tie.
///
/// The solid-only flag of a common entry comes from the highest version that
/// has the name.
pub fn reconcile(sets: &[(u32, Vec<IconRecord>)]) -> ReconciledTable {
    // name -> major version -> winning observation
    let mut observed: BTreeMap<&str, BTreeMap<u32, Observation>> = BTreeMap::new();

    for (release, (version, records)) in sets.iter().enumerate() {
        for record in records {
            let solid_only = record.is_solid_only();
            for name in record.names() {
                let observation = Observation {
                    code_point: record.code_point.as_str(),
                    solid_only,
                    primary: name == record.identifier,
                    release,
                };

                match observed.entry(name).or_default().entry(*version) {
                    btree_map::Entry::Vacant(slot) => {
                        slot.insert(observation);
                    }
                    btree_map::Entry::Occupied(mut slot) => {
                        if observation.rank() > slot.get().rank() {
                            slot.insert(observation);
                        }
                    }
                }
            }
        }
    }

    let mut table = ReconciledTable::default();

    for (name, versions) in observed {
        let code_points: BTreeSet<&str> = versions.values().map(|o| o.code_point).collect();

        if code_points.len() == 1 {
            if let Some(latest) = versions.values().next_back() {
                table
                    .groups
                    .entry(Group::Common)
                    .or_default()
                    .push(Entry::new(name, latest.code_point, latest.solid_only));
            }
            continue;
        }

        for (version, observation) in versions {
            table
                .groups
                .entry(Group::Version(version))
                .or_default()
                .push(Entry::new(name, observation.code_point, observation.solid_only));
        }
    }

    for entries in table.groups.values_mut() {
        entries.sort_by(|a, b| {
            (a.code_point.as_str(), a.identifier.as_str())
                .cmp(&(b.code_point.as_str(), b.identifier.as_str()))
        });
    }

    table
}
