//! Pure render pipeline: family data in, positioned scene out.
//!
//! Focused mode runs selector, bloodline tracer, tree builder and layout in
//! sequence; whole-forest mode runs builder and layout once per founder group.
//! Nothing is cached between calls.

use crate::forest::compose_forest;
use crate::scene::SceneWriter;
use crate::{
    CanvasBounds, FamilyGraph, LayoutSettings, Layouter, Scene, SceneMode, TreeBuilder,
    TreeLayouter, Vec2, select_relevant, trace_bloodline,
};
use lineage_core::PersonId;

/// Renders the bloodline around `requested`, rooted at its eldest traceable
/// ancestor. Unknown ids fall back to the first person; an empty graph gives
/// the empty scene.
pub fn render_focused(
    graph: &FamilyGraph,
    requested: PersonId,
    settings: &LayoutSettings,
) -> Scene {
    let Some(selection) = select_relevant(graph, requested) else {
        tracing::warn!("No people on record; rendering empty state");
        return Scene::empty();
    };
    let bloodline = trace_bloodline(graph, &selection, settings.max_ancestor_hops);

    let root = bloodline.root();
    let Some(mut tree) = TreeBuilder::within(graph, &bloodline).build(root) else {
        return Scene::empty();
    };

    let layouter = TreeLayouter::new(settings);
    layouter.execute(&mut tree, Vec2::new(settings.padding, settings.padding));

    let mut writer = SceneWriter::new(graph, &layouter, Some(bloodline.focal));
    writer.add_tree(&tree, &bloodline.ancestry_path());

    let extent = writer.extent();
    let bounds = CanvasBounds {
        width: (extent.x + settings.padding).max(settings.min_canvas_width),
        height: (extent.y + settings.padding).max(settings.min_canvas_height),
    };
    tracing::info!(
        "Rendered {} around {} (root {}): {} nodes, canvas {}x{}",
        graph.len(),
        bloodline.focal,
        root,
        writer.nodes.len(),
        bounds.width,
        bounds.height
    );

    Scene {
        mode: SceneMode::Focused {
            focal: bloodline.focal,
            root,
            redirected_from: selection.redirected_from,
        },
        nodes: writer.nodes,
        connectors: writer.connectors,
        bounds,
    }
}

/// Renders every founder lineage side by side.
pub fn render_forest(graph: &FamilyGraph, settings: &LayoutSettings) -> Scene {
    if graph.is_empty() {
        tracing::warn!("No people on record; rendering empty state");
        return Scene::empty();
    }
    compose_forest(graph, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{id, in_law_co_parent, sample_family};

    #[test]
    fn test_focused_scene_mode_and_bounds() {
        let graph = sample_family();
        let settings = LayoutSettings::default();
        let scene = render_focused(&graph, id(10), &settings);

        assert_eq!(
            scene.mode,
            SceneMode::Focused {
                focal: id(10),
                root: id(1),
                redirected_from: None,
            }
        );
        assert_eq!(scene.focal(), Some(id(10)));
        // Four generations: 80 + 3 * 300 + 200 + 80.
        assert_eq!(scene.bounds.height, 1260.0);
        assert_eq!(scene.bounds.width, 1000.0);
        let focal_cards = scene.cards().filter(|(card, _)| card.is_focal).count();
        assert_eq!(focal_cards, 1);
    }

    #[test]
    fn test_emphasis_follows_ancestry() {
        let graph = sample_family();
        let scene = render_focused(&graph, id(10), &LayoutSettings::default());

        // Stubs under Dong, Minh and Khoa plus drops to Minh, Khoa and An.
        let emphasized = scene.connectors.iter().filter(|c| c.emphasized).count();
        assert_eq!(emphasized, 6);
    }

    #[test]
    fn test_empty_graph_renders_empty_state() {
        let graph = FamilyGraph::default();
        let settings = LayoutSettings::default();

        let scene = render_focused(&graph, id(1), &settings);
        assert!(scene.is_empty());
        assert_eq!(scene.mode, SceneMode::Empty);
        assert!(render_forest(&graph, &settings).is_empty());
    }

    #[test]
    fn test_minimum_canvas_for_small_trees() {
        let graph = sample_family();
        let settings = LayoutSettings::default();
        let scene = render_focused(&graph, id(12), &settings);

        assert_eq!(scene.bounds.width, 1000.0);
        assert_eq!(scene.bounds.height, 800.0);
        assert_eq!(scene.nodes.len(), 2);
    }

    #[test]
    fn test_in_law_co_parent_does_not_become_root() {
        let graph = in_law_co_parent();
        let scene = render_focused(&graph, id(4), &LayoutSettings::default());

        assert_eq!(
            scene.mode,
            SceneMode::Focused {
                focal: id(4),
                root: id(1),
                redirected_from: None,
            }
        );
        let ids: Vec<_> = scene.nodes.iter().map(|node| node.person.id).collect();
        assert_eq!(ids, vec![id(1), id(2), id(4)]);
        assert_eq!(scene.nodes[1].spouse.as_ref().map(|card| card.id), Some(id(3)));
    }
}
