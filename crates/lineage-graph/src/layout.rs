use crate::{LayoutSettings, TreeNode, Vec2};

pub trait Layouter {
    /// Sizes `root` and places it in the horizontal band starting at `origin`.
    fn execute(&self, root: &mut TreeNode, origin: Vec2);
}

/// Two-pass tidy layout: subtree widths bottom-up, then positions top-down.
///
/// Each subtree owns the band `[x, x + total_width)`. A couple is centered in
/// its band and its children's bands are packed left to right, centered under
/// the couple, so sibling bands never overlap.
#[derive(Debug, Clone)]
pub struct TreeLayouter {
    settings: LayoutSettings,
}

impl TreeLayouter {
    pub fn new(settings: &LayoutSettings) -> Self {
        Self {
            settings: settings.clone(),
        }
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    /// Width of one card, or of two cards and the spouse gap.
    pub fn couple_width(&self, has_spouse: bool) -> f32 {
        if has_spouse {
            self.settings.card_width * 2.0 + self.settings.spouse_gap
        } else {
            self.settings.card_width
        }
    }

    /// Sizing pass (post-order). Returns the node's total width.
    pub fn measure(&self, node: &mut TreeNode) -> f32 {
        node.self_width = self.couple_width(node.spouse.is_some());
        for child in &mut node.children {
            self.measure(child);
        }
        node.total_width = node.self_width.max(self.children_width(node));
        node.total_width
    }

    /// Combined band width of the children, gaps included. Zero without children.
    pub fn children_width(&self, node: &TreeNode) -> f32 {
        if node.children.is_empty() {
            return 0.0;
        }
        let widths: f32 = node.children.iter().map(|child| child.total_width).sum();
        widths + self.settings.sibling_gap * (node.children.len() - 1) as f32
    }

    /// Positioning pass (pre-order) over an already measured subtree.
    pub fn place(&self, node: &mut TreeNode, x: f32, y: f32) {
        node.x = x + (node.total_width - node.self_width) / 2.0;
        node.y = y;

        let child_y = y + self.generation_step();
        let mut child_x = x + (node.total_width - self.children_width(node)) / 2.0;
        for child in &mut node.children {
            self.place(child, child_x, child_y);
            child_x += child.total_width + self.settings.sibling_gap;
        }
    }

    /// Vertical distance between the tops of consecutive generations.
    pub fn generation_step(&self) -> f32 {
        self.settings.card_height + self.settings.generation_gap
    }

    /// From the top of `root` to the bottom of its deepest card.
    pub fn tree_height(&self, root: &TreeNode) -> f32 {
        let bottom = root
            .flatten()
            .iter()
            .map(|node| node.y + self.settings.card_height)
            .fold(root.y + self.settings.card_height, f32::max);
        bottom - root.y
    }

    pub fn spouse_x(&self, node: &TreeNode) -> f32 {
        node.x + self.settings.card_width + self.settings.spouse_gap
    }

    /// Horizontal center of the couple (or single card).
    pub fn anchor_x(&self, node: &TreeNode) -> f32 {
        node.x + node.self_width / 2.0
    }
}

impl Layouter for TreeLayouter {
    fn execute(&self, root: &mut TreeNode, origin: Vec2) {
        self.measure(root);
        self.place(root, origin.x, origin.y);
        tracing::debug!(
            "Laid out {} nodes, total width {}",
            root.node_count(),
            root.total_width
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_core::PersonId;
    use proptest::prelude::*;

    const W: f32 = 160.0;
    const SG: f32 = 10.0;
    const GX: f32 = 40.0;

    fn node(raw: i64, spouse: Option<i64>, children: Vec<TreeNode>) -> TreeNode {
        TreeNode::new(PersonId(raw), spouse.map(PersonId), children)
    }

    fn layouter() -> TreeLayouter {
        TreeLayouter::new(&LayoutSettings::default())
    }

    #[test]
    fn test_couple_with_one_child() {
        let mut tree = node(1, Some(2), vec![node(3, None, vec![])]);
        layouter().execute(&mut tree, Vec2::new(80.0, 80.0));

        assert_eq!(tree.self_width, 2.0 * W + SG);
        assert_eq!(tree.total_width, 2.0 * W + SG);
        assert_eq!(tree.x, 80.0);
        assert_eq!(tree.y, 80.0);

        let child = &tree.children[0];
        assert_eq!(child.y, 80.0 + 200.0 + 100.0);
        // Child card centered under the couple.
        assert_eq!(child.x + W / 2.0, tree.x + tree.self_width / 2.0);
    }

    #[test]
    fn test_solitary_person() {
        let mut tree = node(1, None, vec![]);
        layouter().execute(&mut tree, Vec2::ZERO);

        assert_eq!(tree.self_width, W);
        assert_eq!(tree.total_width, W);
        assert_eq!(layouter().tree_height(&tree), 200.0);
    }

    #[test]
    fn test_wide_children_push_parent_to_center() {
        let kids = (10..13).map(|raw| node(raw, None, vec![])).collect();
        let mut tree = node(1, None, kids);
        let layouter = layouter();
        layouter.execute(&mut tree, Vec2::ZERO);

        assert_eq!(tree.total_width, 3.0 * W + 2.0 * GX);
        assert_eq!(tree.x, (tree.total_width - W) / 2.0);
        assert_eq!(tree.children[0].x, 0.0);
        assert_eq!(tree.children[1].x, W + GX);
        assert_eq!(tree.children[2].x, 2.0 * (W + GX));
        assert_eq!(layouter.tree_height(&tree), 200.0 + 100.0 + 200.0);
    }

    fn arb_tree() -> impl Strategy<Value = TreeNode> {
        let leaf = any::<bool>().prop_map(|married| node(0, married.then_some(0), vec![]));
        leaf.prop_recursive(5, 64, 4, |inner| {
            (any::<bool>(), prop::collection::vec(inner, 0..4))
                .prop_map(|(married, children)| node(0, married.then_some(0), children))
        })
    }

    fn check_bands(
        layouter: &TreeLayouter,
        node: &TreeNode,
        band_x: f32,
    ) -> Result<(), TestCaseError> {
        let eps = 1e-2;
        prop_assert!(node.total_width + eps >= node.self_width);
        prop_assert!(node.total_width + eps >= layouter.children_width(node));
        let expected_x = band_x + (node.total_width - node.self_width) / 2.0;
        prop_assert!((node.x - expected_x).abs() < eps);

        let mut child_band = band_x + (node.total_width - layouter.children_width(node)) / 2.0;
        let mut previous_end: Option<f32> = None;
        for child in &node.children {
            if let Some(end) = previous_end {
                prop_assert!(child_band + eps >= end, "sibling bands overlap");
            }
            prop_assert!(child_band + eps >= band_x);
            prop_assert!(child_band + child.total_width <= band_x + node.total_width + eps);
            check_bands(layouter, child, child_band)?;
            previous_end = Some(child_band + child.total_width);
            child_band += child.total_width + layouter.settings().sibling_gap;
        }

        // The couple sits over the middle of its own band, which is also the
        // middle of the children's combined band.
        prop_assert!((layouter.anchor_x(node) - (band_x + node.total_width / 2.0)).abs() < eps);
        Ok(())
    }

    proptest! {
        #[test]
        fn prop_sibling_bands_never_overlap(tree in arb_tree(), x in 0.0f32..500.0) {
            let layouter = layouter();
            let mut tree = tree;
            layouter.execute(&mut tree, Vec2::new(x, 0.0));
            check_bands(&layouter, &tree, x)?;
        }

        #[test]
        fn prop_layout_is_deterministic(tree in arb_tree()) {
            let layouter = layouter();
            let mut first = tree.clone();
            let mut second = tree;
            layouter.execute(&mut first, Vec2::new(80.0, 80.0));
            layouter.execute(&mut second, Vec2::new(80.0, 80.0));
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_generations_share_rows(tree in arb_tree()) {
            let layouter = layouter();
            let mut tree = tree;
            layouter.execute(&mut tree, Vec2::ZERO);
            for parent in tree.flatten() {
                for child in &parent.children {
                    prop_assert!((child.y - parent.y - layouter.generation_step()).abs() < 1e-3);
                }
            }
        }
    }
}
