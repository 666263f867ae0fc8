use crate::scene::SceneWriter;
use crate::{
    CanvasBounds, FamilyGraph, LayoutSettings, Layouter, Scene, SceneMode, TreeBuilder,
    TreeLayouter, Vec2,
};
use lineage_core::{Gender, PersonId};
use std::collections::HashSet;

/// Founders drawn as one tree: a single founder or a founding couple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FounderGroup {
    pub root: PersonId,
    pub partner: Option<PersonId>,
}

/// Pairs founders who are recorded as each other's spouse. The husband roots
/// a couple's tree when there is one; otherwise the earlier record does.
pub fn group_founders(graph: &FamilyGraph) -> Vec<FounderGroup> {
    let founders: Vec<_> = graph.founders().collect();
    let founder_ids: HashSet<PersonId> = founders.iter().map(|p| p.id).collect();
    let mut grouped = HashSet::new();
    let mut groups = Vec::new();

    for founder in &founders {
        if grouped.contains(&founder.id) {
            continue;
        }
        grouped.insert(founder.id);

        let partner = graph
            .spouse_of(founder.id)
            .filter(|spouse| founder_ids.contains(spouse) && !grouped.contains(spouse));

        let group = match partner.and_then(|id| graph.person(id)) {
            Some(spouse) => {
                grouped.insert(spouse.id);
                if founder.gender != Gender::Male && spouse.gender == Gender::Male {
                    FounderGroup {
                        root: spouse.id,
                        partner: Some(founder.id),
                    }
                } else {
                    FounderGroup {
                        root: founder.id,
                        partner: Some(spouse.id),
                    }
                }
            }
            None => FounderGroup {
                root: founder.id,
                partner: None,
            },
        };
        groups.push(group);
    }

    tracing::debug!(
        "Grouped {} founders into {} trees",
        founders.len(),
        groups.len()
    );
    groups
}

/// Lays out one tree per founder group, left to right on a shared canvas.
pub(crate) fn compose_forest(graph: &FamilyGraph, settings: &LayoutSettings) -> Scene {
    let groups = group_founders(graph);
    if groups.is_empty() {
        tracing::warn!(
            "No founders among {} people; nothing to show in whole-forest mode",
            graph.len()
        );
        return Scene::empty();
    }

    let layouter = TreeLayouter::new(settings);
    let margin = settings.forest_margin;
    let no_emphasis = HashSet::new();
    let mut writer = SceneWriter::new(graph, &layouter, None);

    let mut cursor_x = margin;
    let mut right = 0.0f32;
    let mut bottom = 0.0f32;
    let mut tree_count = 0;

    for group in groups {
        let Some(mut tree) = TreeBuilder::whole(graph).build(group.root) else {
            continue;
        };
        layouter.execute(&mut tree, Vec2::new(cursor_x, margin));
        writer.add_tree(&tree, &no_emphasis);

        right = right.max(cursor_x + tree.total_width);
        bottom = bottom.max(tree.y + layouter.tree_height(&tree));
        cursor_x += tree.total_width + settings.forest_tree_spacing;
        tree_count += 1;
    }

    let bounds = CanvasBounds {
        width: right + margin,
        height: bottom + margin,
    };
    tracing::info!(
        "Whole forest: {} trees, {} nodes, canvas {}x{}",
        tree_count,
        writer.nodes.len(),
        bounds.width,
        bounds.height
    );

    Scene {
        mode: SceneMode::Forest { tree_count },
        nodes: writer.nodes,
        connectors: writer.connectors,
        bounds,
    }
}
