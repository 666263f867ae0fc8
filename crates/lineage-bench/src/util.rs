use lineage_core::{FamilySnapshot, Gender, MarriageEdge, ParentChildEdge, Person, PersonId};

/// Deterministic synthetic families for benchmarking.
pub struct FamilyGenerator {
    next_id: i64,
    snapshot: FamilySnapshot,
}

impl Default for FamilyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl FamilyGenerator {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            snapshot: FamilySnapshot::default(),
        }
    }

    /// Adds one founding couple and `generations - 1` generations below it.
    /// Every blood member marries and has `children` children.
    pub fn add_lineage(&mut self, generations: u32, children: usize) -> PersonId {
        let founder = self.push(Person::founder(
            self.peek_id(),
            format!("Founder {}", self.next_id),
            Gender::Male,
        ));
        let founder_id = founder.id;
        self.grow(founder, generations.saturating_sub(1), children);
        founder_id
    }

    pub fn finish(self) -> FamilySnapshot {
        self.snapshot
    }

    fn grow(&mut self, blood: Person, remaining: u32, children: usize) {
        let spouse = Person::in_law_of(
            self.peek_id(),
            format!("Spouse {}", self.next_id),
            opposite(blood.gender),
            &blood,
        );
        let spouse = self.push(spouse);
        self.snapshot
            .marriages
            .push(MarriageEdge::new(blood.id, spouse.id));

        if remaining == 0 {
            return;
        }
        for n in 0..children {
            let gender = if n % 2 == 0 { Gender::Male } else { Gender::Female };
            let child = Person::child_of(
                self.peek_id(),
                format!("Child {}", self.next_id),
                gender,
                &blood,
            )
            .with_birth_date(format!("{:04}-01-{:02}", 1900 + blood.generation * 25, n % 28 + 1));
            let child = self.push(child);
            self.snapshot
                .relationships
                .push(ParentChildEdge::new(blood.id, child.id));
            self.grow(child, remaining - 1, children);
        }
    }

    fn peek_id(&self) -> PersonId {
        PersonId(self.next_id)
    }

    fn push(&mut self, person: Person) -> Person {
        self.next_id += 1;
        self.snapshot.people.push(person.clone());
        person
    }
}

fn opposite(gender: Gender) -> Gender {
    match gender {
        Gender::Male => Gender::Female,
        Gender::Female => Gender::Male,
    }
}

/// `lineages` independent families of the same shape.
pub fn generate_forest(lineages: usize, generations: u32, children: usize) -> FamilySnapshot {
    let mut generator = FamilyGenerator::new();
    for _ in 0..lineages {
        generator.add_lineage(generations, children);
    }
    generator.finish()
}

/// Id of the last person generated, a deep blood descendant when the last
/// lineage has more than one generation.
pub fn deepest_descendant(snapshot: &FamilySnapshot) -> Option<PersonId> {
    snapshot
        .relationships
        .last()
        .map(|edge| edge.child_id)
}
