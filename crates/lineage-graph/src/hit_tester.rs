use crate::{LayoutSettings, Rect, Scene, Vec2};
use lineage_core::PersonId;

/// Result of a hit test at a given position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitResult {
    /// Nothing was hit at the tested position.
    None,
    /// The main card of a node.
    Person(PersonId),
    /// The spouse card drawn beside `person`.
    Spouse { person: PersonId, spouse: PersonId },
}

impl HitResult {
    /// The person whose card was hit.
    pub fn person_id(&self) -> Option<PersonId> {
        match *self {
            HitResult::None => None,
            HitResult::Person(id) => Some(id),
            HitResult::Spouse { spouse, .. } => Some(spouse),
        }
    }
}

/// Card rectangles of one scene, in scene coordinates.
///
/// Cards never overlap in a laid-out scene, but with a tolerance the
/// expanded rectangles can; the card drawn last wins.
#[derive(Debug, Clone, Default)]
pub struct SceneHitTester {
    cards: Vec<(HitResult, Rect)>,
    tolerance: f32,
}

impl SceneHitTester {
    pub fn new(scene: &Scene, settings: &LayoutSettings) -> Self {
        let size = Vec2::new(settings.card_width, settings.card_height);
        let mut cards = Vec::with_capacity(scene.nodes.len() * 2);
        for node in &scene.nodes {
            let person = node.person.id;
            cards.push((
                HitResult::Person(person),
                Rect::from_pos_size(Vec2::new(node.x, node.y), size),
            ));
            if let (Some(spouse), Some(spouse_x)) = (&node.spouse, node.spouse_x) {
                cards.push((
                    HitResult::Spouse {
                        person,
                        spouse: spouse.id,
                    },
                    Rect::from_pos_size(Vec2::new(spouse_x, node.y), size),
                ));
            }
        }
        Self {
            cards,
            tolerance: 0.0,
        }
    }

    /// Extra margin, in scene units, counted as part of every card.
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance.max(0.0);
        self
    }

    pub fn hit_test(&self, point: Vec2) -> HitResult {
        self.cards
            .iter()
            .rev()
            .find(|(_, rect)| rect.expand(self.tolerance).contains(point))
            .map(|(hit, _)| *hit)
            .unwrap_or(HitResult::None)
    }

    pub fn card_rect(&self, id: PersonId) -> Option<Rect> {
        self.cards
            .iter()
            .find(|(hit, _)| hit.person_id() == Some(id))
            .map(|(_, rect)| *rect)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
