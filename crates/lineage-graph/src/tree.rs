use crate::{Bloodline, FamilyGraph};
use lineage_core::{Person, PersonId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One couple in the rendered hierarchy. Rebuilt on every render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub person: PersonId,
    pub spouse: Option<PersonId>,
    pub children: Vec<TreeNode>,
    pub self_width: f32,
    pub total_width: f32,
    pub x: f32,
    pub y: f32,
}

impl TreeNode {
    pub fn new(person: PersonId, spouse: Option<PersonId>, children: Vec<TreeNode>) -> Self {
        Self {
            person,
            spouse,
            children,
            self_width: 0.0,
            total_width: 0.0,
            x: 0.0,
            y: 0.0,
        }
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// Number of generations below and including this node.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(TreeNode::depth).max().unwrap_or(0)
    }

    /// Pre-order: parent before children, children left to right.
    pub fn flatten(&self) -> Vec<&TreeNode> {
        let mut out = Vec::with_capacity(self.node_count());
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a TreeNode>) {
        out.push(self);
        for child in &self.children {
            child.flatten_into(out);
        }
    }

    /// Every person shown in this subtree, spouses included, in pre-order.
    pub fn person_ids(&self) -> Vec<PersonId> {
        self.flatten()
            .into_iter()
            .flat_map(|node| std::iter::once(node.person).chain(node.spouse))
            .collect()
    }

    /// The node showing `id`, either as the person or as the attached spouse.
    pub fn find(&self, id: PersonId) -> Option<&TreeNode> {
        self.flatten()
            .into_iter()
            .find(|node| node.person == id || node.spouse == Some(id))
    }
}

enum TreeScope<'a> {
    Whole,
    Bloodline(&'a Bloodline),
}

/// Projects the family graph onto a strict tree.
///
/// Every person is claimed the first time the pre-order walk reaches them,
/// either as a node, a spouse or a child, so no id can appear twice even when
/// cousins marry or parent edges loop.
pub struct TreeBuilder<'a> {
    graph: &'a FamilyGraph,
    scope: TreeScope<'a>,
    placed: HashSet<PersonId>,
}

impl<'a> TreeBuilder<'a> {
    /// Unrestricted builder used for whole-forest trees.
    pub fn whole(graph: &'a FamilyGraph) -> Self {
        Self {
            graph,
            scope: TreeScope::Whole,
            placed: HashSet::new(),
        }
    }

    /// Builder limited to a bloodline and its attached spouses.
    pub fn within(graph: &'a FamilyGraph, bloodline: &'a Bloodline) -> Self {
        Self {
            graph,
            scope: TreeScope::Bloodline(bloodline),
            placed: HashSet::new(),
        }
    }

    pub fn build(mut self, root: PersonId) -> Option<TreeNode> {
        if !self.graph.contains(root) {
            tracing::warn!("Tree root {} is not a known person", root);
            return None;
        }
        self.placed.insert(root);
        let tree = self.build_node(root);
        tracing::debug!("Built tree at {} with {} nodes", root, tree.node_count());
        Some(tree)
    }

    fn build_node(&mut self, person: PersonId) -> TreeNode {
        let spouse = self
            .display_spouse(person)
            .filter(|&spouse| self.placed.insert(spouse));

        let mut children: Vec<PersonId> = Vec::new();
        for parent in std::iter::once(person).chain(spouse) {
            for &child in self.graph.children_of(parent) {
                if self.edge_in_scope(parent, child)
                    && !self.placed.contains(&child)
                    && !children.contains(&child)
                {
                    children.push(child);
                }
            }
        }
        children.sort_by(|a, b| self.birth_key(*a).cmp(self.birth_key(*b)));
        self.placed.extend(children.iter().copied());

        let children = children
            .into_iter()
            .map(|child| self.build_node(child))
            .collect();
        TreeNode::new(person, spouse, children)
    }

    fn display_spouse(&self, person: PersonId) -> Option<PersonId> {
        let spouse = self.graph.spouse_of(person)?;
        if !self.graph.contains(spouse) {
            return None;
        }
        match self.scope {
            TreeScope::Whole => Some(spouse),
            TreeScope::Bloodline(bloodline) => {
                let attached = bloodline.is_renderable(spouse)
                    && (bloodline.is_member(person) || bloodline.is_member(spouse));
                attached.then_some(spouse)
            }
        }
    }

    fn edge_in_scope(&self, parent: PersonId, child: PersonId) -> bool {
        if !self.graph.contains(child) {
            return false;
        }
        match self.scope {
            TreeScope::Whole => true,
            TreeScope::Bloodline(bloodline) => {
                (bloodline.is_member(parent) || bloodline.is_member(child))
                    && bloodline.is_renderable(parent)
                    && bloodline.is_renderable(child)
            }
        }
    }

    fn birth_key(&self, id: PersonId) -> &'a str {
        self.graph
            .person(id)
            .map(Person::birth_sort_key)
            .unwrap_or_default()
    }
}
