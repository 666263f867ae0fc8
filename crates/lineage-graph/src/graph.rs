use lineage_core::{
    FamilySnapshot, MarriageEdge, ParentChildEdge, Person, PersonId, Placement, PlacementError,
    place_member,
};
use std::collections::HashMap;

/// Read-only lookup indexes over one family snapshot.
///
/// Built fresh for every render and never mutated afterwards. Dangling edges
/// and self-references are kept as-is; the stages downstream skip ids they
/// cannot resolve.
#[derive(Debug, Default)]
pub struct FamilyGraph {
    people: Vec<Person>,
    by_id: HashMap<PersonId, usize>,
    spouse_of: HashMap<PersonId, PersonId>,
    partners_of: HashMap<PersonId, Vec<PersonId>>,
    children_of: HashMap<PersonId, Vec<PersonId>>,
    parents_of: HashMap<PersonId, Vec<PersonId>>,
}

impl FamilyGraph {
    pub fn new(
        people: Vec<Person>,
        relationships: &[ParentChildEdge],
        marriages: &[MarriageEdge],
    ) -> Self {
        let mut by_id = HashMap::with_capacity(people.len());
        for (idx, person) in people.iter().enumerate() {
            if by_id.contains_key(&person.id) {
                tracing::warn!("Duplicate person id {}; keeping the first record", person.id);
                continue;
            }
            by_id.insert(person.id, idx);
        }

        let mut children_of: HashMap<PersonId, Vec<PersonId>> = HashMap::new();
        let mut parents_of: HashMap<PersonId, Vec<PersonId>> = HashMap::new();
        let mut dangling = 0usize;
        for edge in relationships {
            if !by_id.contains_key(&edge.parent_id) || !by_id.contains_key(&edge.child_id) {
                dangling += 1;
            }
            push_unique(children_of.entry(edge.parent_id).or_default(), edge.child_id);
            push_unique(parents_of.entry(edge.child_id).or_default(), edge.parent_id);
        }

        let mut spouse_of = HashMap::new();
        let mut partners_of: HashMap<PersonId, Vec<PersonId>> = HashMap::new();
        for marriage in marriages {
            let Some((a, b)) = marriage.pair() else {
                continue;
            };
            spouse_of.insert(a, b);
            spouse_of.insert(b, a);
            push_unique(partners_of.entry(a).or_default(), b);
            push_unique(partners_of.entry(b).or_default(), a);
        }

        if dangling > 0 {
            tracing::debug!(
                "{} parent-child edges reference unknown people; keeping them unresolved",
                dangling
            );
        }

        Self {
            people,
            by_id,
            spouse_of,
            partners_of,
            children_of,
            parents_of,
        }
    }

    pub fn from_snapshot(snapshot: FamilySnapshot) -> Self {
        let FamilySnapshot {
            people,
            relationships,
            marriages,
        } = snapshot;
        Self::new(people, &relationships, &marriages)
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// People in storage order.
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn first_person(&self) -> Option<&Person> {
        self.people.first()
    }

    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.by_id.get(&id).map(|&idx| &self.people[idx])
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// The displayed spouse. With several marriages the last recorded one wins.
    pub fn spouse_of(&self, id: PersonId) -> Option<PersonId> {
        self.spouse_of.get(&id).copied()
    }

    /// Every recorded partner, in record order.
    pub fn partners_of(&self, id: PersonId) -> &[PersonId] {
        self.partners_of.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn children_of(&self, id: PersonId) -> &[PersonId] {
        self.children_of.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn parents_of(&self, id: PersonId) -> &[PersonId] {
        self.parents_of.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Full siblings and half siblings: every other child of any parent.
    pub fn siblings_of(&self, id: PersonId) -> Vec<PersonId> {
        let mut siblings = Vec::new();
        for &parent in self.parents_of(id) {
            for &child in self.children_of(parent) {
                if child != id {
                    push_unique(&mut siblings, child);
                }
            }
        }
        siblings
    }

    /// Generation-1 members in storage order.
    pub fn founders(&self) -> impl Iterator<Item = &Person> {
        self.people.iter().filter(|p| p.is_founder())
    }

    /// Resolves ids and applies the placement rules for a new member.
    pub fn place_new_member(
        &self,
        requested_generation: Option<u32>,
        parent_id: Option<PersonId>,
        spouse_id: Option<PersonId>,
    ) -> Result<Placement, PlacementError> {
        let parent = parent_id
            .map(|id| self.person(id).ok_or(PlacementError::UnknownParent(id)))
            .transpose()?;
        let spouse = spouse_id
            .map(|id| self.person(id).ok_or(PlacementError::UnknownSpouse(id)))
            .transpose()?;
        place_member(requested_generation, parent, spouse)
    }
}

fn push_unique(list: &mut Vec<PersonId>, id: PersonId) {
    if !list.contains(&id) {
        list.push(id);
    }
}
