use crate::{FamilyGraph, Selection};
use lineage_core::PersonId;
use std::collections::{HashSet, VecDeque};

/// Why an ascent stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AscentEnd {
    /// No parent inside the scope: the last person is the eldest traceable ancestor.
    Founder,
    /// A parent already on the path was reached again.
    Cycle,
    /// The configured hop limit was reached before a founder.
    HopLimit,
}

/// Walk from a person up through first recorded parents.
#[derive(Debug, Clone, PartialEq)]
pub struct Ascent {
    /// Starting person first, root last.
    pub path: Vec<PersonId>,
    pub root: PersonId,
    pub end: AscentEnd,
}

impl Ascent {
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Climbs from `start` through parents that pass `in_scope`. Among co-parents
/// a blood member is followed before an in-law, then record order decides.
/// Each person is visited at most once, so malformed cyclic data ends the walk
/// at the last good ancestor.
pub fn ascend(
    graph: &FamilyGraph,
    start: PersonId,
    in_scope: impl Fn(PersonId) -> bool,
    max_hops: Option<usize>,
) -> Ascent {
    let mut path = vec![start];
    let mut visited = HashSet::from([start]);
    let mut current = start;

    let end = loop {
        if let Some(limit) = max_hops
            && path.len() > limit
        {
            tracing::warn!(
                "Ancestry of {} truncated at {} after {} hops",
                start,
                current,
                limit
            );
            break AscentEnd::HopLimit;
        }

        let parent = graph
            .parents_of(current)
            .iter()
            .copied()
            .filter(|&parent| in_scope(parent))
            .filter_map(|parent| graph.person(parent))
            .min_by_key(|parent| parent.is_in_law())
            .map(|parent| parent.id);
        let Some(parent) = parent else {
            break AscentEnd::Founder;
        };

        if !visited.insert(parent) {
            tracing::warn!(
                "Cycle in parent edges above {}; using {} as root",
                start,
                current
            );
            break AscentEnd::Cycle;
        }
        path.push(parent);
        current = parent;
    };

    Ascent {
        path,
        root: current,
        end,
    }
}

/// The strict working set for a focused render.
#[derive(Debug, Clone)]
pub struct Bloodline {
    pub focal: PersonId,
    /// People connected to the focal person through parent-child steps.
    pub members: HashSet<PersonId>,
    /// Display-only partners of members, never expanded further.
    pub spouses: HashSet<PersonId>,
    pub ascent: Ascent,
}

impl Bloodline {
    pub fn root(&self) -> PersonId {
        self.ascent.root
    }

    pub fn is_member(&self, id: PersonId) -> bool {
        self.members.contains(&id)
    }

    pub fn is_renderable(&self, id: PersonId) -> bool {
        self.members.contains(&id) || self.spouses.contains(&id)
    }

    /// Direct line from the focal person to the root.
    pub fn ancestry_path(&self) -> HashSet<PersonId> {
        self.ascent.path.iter().copied().collect()
    }
}

/// Turns the coarse selection into one connected bloodline component,
/// finds its root and attaches display spouses.
pub fn trace_bloodline(
    graph: &FamilyGraph,
    selection: &Selection,
    max_hops: Option<usize>,
) -> Bloodline {
    let focal = selection.focal;
    let in_selection =
        |id: PersonId| selection.relevant.contains(&id) && graph.contains(id);

    let mut members = HashSet::from([focal]);
    let mut queue = VecDeque::from([focal]);
    while let Some(current) = queue.pop_front() {
        let neighbors = graph
            .parents_of(current)
            .iter()
            .chain(graph.children_of(current));
        for &neighbor in neighbors {
            if in_selection(neighbor) && members.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    let dropped = selection.relevant.len().saturating_sub(members.len());
    let ascent = ascend(graph, focal, |id| members.contains(&id), max_hops);

    let spouses: HashSet<PersonId> = members
        .iter()
        .filter_map(|&id| graph.spouse_of(id))
        .filter(|&spouse| graph.contains(spouse) && !members.contains(&spouse))
        .collect();

    tracing::debug!(
        "Bloodline of {}: {} members, {} attached spouses, {} selected people outside, root {} after {} hops",
        focal,
        members.len(),
        spouses.len(),
        dropped,
        ascent.root,
        ascent.hops()
    );

    Bloodline {
        focal,
        members,
        spouses,
        ascent,
    }
}
