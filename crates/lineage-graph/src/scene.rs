//! Render output handed to the drawing sink.

use crate::{FamilyGraph, TreeLayouter, TreeNode, Vec2};
use lineage_core::{Gender, MemberType, Person, PersonId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Display-ready labels for one person card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonCard {
    pub id: PersonId,
    pub display_name: String,
    /// Four-digit year or `?`.
    pub birth_year: String,
    pub gender: Gender,
    pub generation: u32,
    pub member_type: MemberType,
    pub deceased: bool,
    pub is_focal: bool,
}

impl PersonCard {
    pub fn from_person(person: &Person, focal: Option<PersonId>) -> Self {
        Self {
            id: person.id,
            display_name: person.display_name(),
            birth_year: person.birth_year_label(),
            gender: person.gender,
            generation: person.generation,
            member_type: person.member_type,
            deceased: person.is_deceased(),
            is_focal: focal == Some(person.id),
        }
    }
}

/// A card (and optional spouse card) with its top-left corner on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    pub person: PersonCard,
    pub x: f32,
    pub y: f32,
    pub spouse: Option<PersonCard>,
    pub spouse_x: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorKind {
    /// From the couple down to the mid-line between generations.
    Stub,
    /// Along the mid-line, first child to last child.
    Bar,
    /// From the mid-line down to one child.
    Drop,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    /// Part of the direct line from the focal person up to the root.
    pub emphasized: bool,
    pub kind: ConnectorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasBounds {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SceneMode {
    Empty,
    Focused {
        focal: PersonId,
        root: PersonId,
        redirected_from: Option<PersonId>,
    },
    Forest {
        tree_count: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub mode: SceneMode,
    /// Pre-order, tree by tree.
    pub nodes: Vec<PositionedNode>,
    pub connectors: Vec<Connector>,
    pub bounds: CanvasBounds,
}

impl Scene {
    /// Explicit empty state: nothing to draw.
    pub fn empty() -> Self {
        Self {
            mode: SceneMode::Empty,
            nodes: Vec::new(),
            connectors: Vec::new(),
            bounds: CanvasBounds::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn focal(&self) -> Option<PersonId> {
        match self.mode {
            SceneMode::Focused { focal, .. } => Some(focal),
            _ => None,
        }
    }

    /// Top-left corner of the card showing `id`, whether as person or spouse.
    pub fn card_origin(&self, id: PersonId) -> Option<Vec2> {
        self.nodes.iter().find_map(|node| {
            if node.person.id == id {
                Some(Vec2::new(node.x, node.y))
            } else if node.spouse.as_ref().is_some_and(|s| s.id == id) {
                node.spouse_x.map(|x| Vec2::new(x, node.y))
            } else {
                None
            }
        })
    }

    /// Every card in drawing order, with its top-left corner.
    pub fn cards(&self) -> impl Iterator<Item = (&PersonCard, Vec2)> {
        self.nodes.iter().flat_map(|node| {
            let main = std::iter::once((&node.person, Vec2::new(node.x, node.y)));
            let spouse = node
                .spouse
                .as_ref()
                .zip(node.spouse_x)
                .map(|(card, x)| (card, Vec2::new(x, node.y)));
            main.chain(spouse)
        })
    }
}

/// Accumulates positioned nodes and connectors from laid-out trees.
pub(crate) struct SceneWriter<'a> {
    graph: &'a FamilyGraph,
    layouter: &'a TreeLayouter,
    focal: Option<PersonId>,
    pub(crate) nodes: Vec<PositionedNode>,
    pub(crate) connectors: Vec<Connector>,
}

impl<'a> SceneWriter<'a> {
    pub(crate) fn new(
        graph: &'a FamilyGraph,
        layouter: &'a TreeLayouter,
        focal: Option<PersonId>,
    ) -> Self {
        Self {
            graph,
            layouter,
            focal,
            nodes: Vec::new(),
            connectors: Vec::new(),
        }
    }

    /// Emits cards in pre-order and fork connectors for every parent node.
    /// `lineage` holds the people whose connecting lines are emphasized.
    pub(crate) fn add_tree(&mut self, root: &TreeNode, lineage: &HashSet<PersonId>) {
        for node in root.flatten() {
            if let Some(positioned) = self.position(node) {
                self.nodes.push(positioned);
            }
            if !node.children.is_empty() {
                self.add_fork(node, lineage);
            }
        }
    }

    /// Right and bottom edges of everything emitted so far.
    pub(crate) fn extent(&self) -> Vec2 {
        let card = Vec2::new(
            self.layouter.settings().card_width,
            self.layouter.settings().card_height,
        );
        self.nodes.iter().fold(Vec2::ZERO, |acc, node| {
            let right = node.spouse_x.unwrap_or(node.x) + card.x;
            Vec2::new(acc.x.max(right), acc.y.max(node.y + card.y))
        })
    }

    fn card(&self, id: PersonId) -> Option<PersonCard> {
        self.graph
            .person(id)
            .map(|person| PersonCard::from_person(person, self.focal))
    }

    fn position(&self, node: &TreeNode) -> Option<PositionedNode> {
        let person = self.card(node.person)?;
        let spouse = node.spouse.and_then(|id| self.card(id));
        let spouse_x = spouse.as_ref().map(|_| self.layouter.spouse_x(node));
        Some(PositionedNode {
            person,
            x: node.x,
            y: node.y,
            spouse,
            spouse_x,
        })
    }

    fn add_fork(&mut self, node: &TreeNode, lineage: &HashSet<PersonId>) {
        let settings = self.layouter.settings();
        let on_line = |n: &TreeNode| {
            lineage.contains(&n.person) || n.spouse.is_some_and(|s| lineage.contains(&s))
        };
        let parent_on_line = on_line(node);

        let start_x = self.layouter.anchor_x(node);
        let start_y = node.y + settings.card_height;
        let mid_y = start_y + settings.generation_gap / 2.0;

        self.connectors.push(Connector {
            x1: start_x,
            y1: start_y,
            x2: start_x,
            y2: mid_y,
            emphasized: parent_on_line,
            kind: ConnectorKind::Stub,
        });

        let first = node.children.first().map(|c| self.layouter.anchor_x(c));
        let last = node.children.last().map(|c| self.layouter.anchor_x(c));
        if let (Some(first), Some(last)) = (first, last) {
            self.connectors.push(Connector {
                x1: first,
                y1: mid_y,
                x2: last,
                y2: mid_y,
                emphasized: false,
                kind: ConnectorKind::Bar,
            });
        }

        for child in &node.children {
            let child_x = self.layouter.anchor_x(child);
            self.connectors.push(Connector {
                x1: child_x,
                y1: mid_y,
                x2: child_x,
                y2: child.y,
                emphasized: parent_on_line && on_line(child),
                kind: ConnectorKind::Drop,
            });
        }
    }
}
