//! Coarse relatedness pass: shrinks the full family to the people worth
//! showing around one focal person before the strict tree is built.

use crate::FamilyGraph;
use lineage_core::{Person, PersonId};
use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Person the view is built around, after fallback and in-law redirect.
    pub focal: PersonId,
    /// Set when an in-law was asked for and their blood partner took over.
    pub redirected_from: Option<PersonId>,
    pub relevant: HashSet<PersonId>,
}

/// Collects ancestors, siblings at every ancestor level, descendants and one
/// level of partners around `requested`.
///
/// An unknown id falls back to the first person on record. Returns `None`
/// only when the graph holds nobody at all.
pub fn select_relevant(graph: &FamilyGraph, requested: PersonId) -> Option<Selection> {
    let start = match graph.person(requested) {
        Some(person) => person,
        None => {
            let first = graph.first_person()?;
            tracing::warn!(
                "Focal person {} not found; falling back to {}",
                requested,
                first.id
            );
            first
        }
    };

    let (focal, redirected_from) = redirect_in_law(graph, start);

    let mut relevant = HashSet::new();
    relevant.insert(focal);

    let ancestors = collect_ancestors(graph, focal);
    relevant.extend(ancestors.iter().copied());

    // Lateral branches: siblings of the focal person and of every ancestor.
    for &person in std::iter::once(&focal).chain(ancestors.iter()) {
        relevant.extend(graph.siblings_of(person));
    }

    relevant.extend(collect_descendants(graph, focal));

    for sibling in graph.siblings_of(focal) {
        relevant.insert(sibling);
        relevant.extend(collect_descendants(graph, sibling));
    }

    let partners: Vec<PersonId> = relevant
        .iter()
        .flat_map(|&id| graph.partners_of(id).iter().copied())
        .collect();
    relevant.extend(partners);

    tracing::debug!(
        "Selected {} relevant people around {} (ancestors: {})",
        relevant.len(),
        focal,
        ancestors.len()
    );

    Some(Selection {
        focal,
        redirected_from,
        relevant,
    })
}

/// In-laws carry no bloodline of their own; show their first recorded
/// partner instead when that partner is a blood member.
fn redirect_in_law(graph: &FamilyGraph, person: &Person) -> (PersonId, Option<PersonId>) {
    if person.is_in_law()
        && let Some(&partner) = graph.partners_of(person.id).first()
        && graph.person(partner).is_some_and(Person::is_blood)
    {
        tracing::info!("In-law {} redirected to blood partner {}", person.id, partner);
        return (partner, Some(person.id));
    }
    (person.id, None)
}

/// Every person reachable over parent edges, nearest first.
pub(crate) fn collect_ancestors(graph: &FamilyGraph, start: PersonId) -> Vec<PersonId> {
    walk(start, |id| graph.parents_of(id))
}

/// Every person reachable over child edges, nearest first.
pub(crate) fn collect_descendants(graph: &FamilyGraph, start: PersonId) -> Vec<PersonId> {
    walk(start, |id| graph.children_of(id))
}

fn walk<'g>(start: PersonId, next: impl Fn(PersonId) -> &'g [PersonId]) -> Vec<PersonId> {
    let mut visited = HashSet::new();
    visited.insert(start);
    let mut queue = VecDeque::from([start]);
    let mut reached = Vec::new();

    while let Some(current) = queue.pop_front() {
        for &neighbor in next(current) {
            if visited.insert(neighbor) {
                reached.push(neighbor);
                queue.push_back(neighbor);
            }
        }
    }
    reached
}
