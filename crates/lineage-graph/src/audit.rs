use crate::FamilyGraph;
use lineage_core::{Person, PersonId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A record that breaks the generation rules. Reported, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationIssue {
    MissingGeneration {
        person: PersonId,
    },
    /// Blood member whose generation is not one below a parent's.
    /// `expected` saturates when the parent's generation cannot be exceeded.
    ChildGeneration {
        person: PersonId,
        parent: PersonId,
        expected: u32,
        actual: u32,
    },
    FounderWithParent {
        person: PersonId,
        parent: PersonId,
    },
    /// Blood member below generation 1 with no recorded parent.
    MissingParent {
        person: PersonId,
        generation: u32,
    },
    InLawWithParent {
        person: PersonId,
        parent: PersonId,
    },
    InLawWithoutSpouse {
        person: PersonId,
    },
    SpouseGeneration {
        person: PersonId,
        spouse: PersonId,
        expected: u32,
        actual: u32,
    },
}

impl fmt::Display for GenerationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationIssue::MissingGeneration { person } => {
                write!(f, "{person}: no generation recorded")
            }
            GenerationIssue::ChildGeneration {
                person,
                parent,
                expected,
                actual,
            } => write!(
                f,
                "{person}: generation {actual}, expected {expected} as child of {parent}"
            ),
            GenerationIssue::FounderWithParent { person, parent } => {
                write!(f, "{person}: founder has parent {parent}")
            }
            GenerationIssue::MissingParent { person, generation } => {
                write!(f, "{person}: blood member at generation {generation} has no parent")
            }
            GenerationIssue::InLawWithParent { person, parent } => {
                write!(f, "{person}: in-law has parent {parent}")
            }
            GenerationIssue::InLawWithoutSpouse { person } => {
                write!(f, "{person}: in-law has no recorded spouse")
            }
            GenerationIssue::SpouseGeneration {
                person,
                spouse,
                expected,
                actual,
            } => write!(
                f,
                "{person}: generation {actual}, expected {expected} as spouse of {spouse}"
            ),
        }
    }
}

/// Checks every person against the generation rules: blood members sit one
/// generation below their parents (founders at 1 with no parent), in-laws
/// share their spouse's generation and have no parents.
pub fn check_generations(graph: &FamilyGraph) -> Vec<GenerationIssue> {
    let mut issues = Vec::new();
    for person in graph.people() {
        if person.generation == 0 {
            issues.push(GenerationIssue::MissingGeneration { person: person.id });
            continue;
        }
        let parents: Vec<&Person> = graph
            .parents_of(person.id)
            .iter()
            .filter_map(|&id| graph.person(id))
            .collect();

        if person.is_blood() {
            check_blood(person, &parents, &mut issues);
        } else {
            check_in_law(graph, person, &parents, &mut issues);
        }
    }

    if issues.is_empty() {
        tracing::debug!("Generation audit passed for {} people", graph.len());
    } else {
        tracing::warn!(
            "Generation audit found {} issues among {} people",
            issues.len(),
            graph.len()
        );
    }
    issues
}

fn check_blood(person: &Person, parents: &[&Person], issues: &mut Vec<GenerationIssue>) {
    if person.is_founder() {
        if let Some(parent) = parents.first() {
            issues.push(GenerationIssue::FounderWithParent {
                person: person.id,
                parent: parent.id,
            });
        }
        return;
    }

    if parents.is_empty() {
        issues.push(GenerationIssue::MissingParent {
            person: person.id,
            generation: person.generation,
        });
        return;
    }

    for parent in parents.iter().filter(|p| p.generation != 0) {
        // A parent at the top of the range has no valid child generation.
        let expected = parent.generation.checked_add(1);
        if expected != Some(person.generation) {
            issues.push(GenerationIssue::ChildGeneration {
                person: person.id,
                parent: parent.id,
                expected: expected.unwrap_or(u32::MAX),
                actual: person.generation,
            });
        }
    }
}

fn check_in_law(
    graph: &FamilyGraph,
    person: &Person,
    parents: &[&Person],
    issues: &mut Vec<GenerationIssue>,
) {
    if let Some(parent) = parents.first() {
        issues.push(GenerationIssue::InLawWithParent {
            person: person.id,
            parent: parent.id,
        });
    }

    let partners: Vec<&Person> = graph
        .partners_of(person.id)
        .iter()
        .filter_map(|&id| graph.person(id))
        .collect();
    if partners.is_empty() {
        issues.push(GenerationIssue::InLawWithoutSpouse { person: person.id });
        return;
    }

    for spouse in partners.iter().filter(|s| s.generation != 0) {
        if spouse.generation != person.generation {
            issues.push(GenerationIssue::SpouseGeneration {
                person: person.id,
                spouse: spouse.id,
                expected: spouse.generation,
                actual: person.generation,
            });
        }
    }
}
