use lineage_core::{
    FamilySnapshot, Gender, MarriageEdge, MemorySource, ParentChildEdge, Person, PersonId,
    place_member,
};
use lineage_graph::{
    FamilyGraph, LayoutSettings, Layouter, Rect, SceneMode, TreeBuilder, TreeLayouter, TreeSettings,
    TreeView, Vec2, check_generations, render_focused, render_forest, select_relevant,
    trace_bloodline,
};
use proptest::prelude::*;
use std::collections::HashSet;

const W: f32 = 160.0;
const H: f32 = 200.0;
const SG: f32 = 10.0;

fn id(raw: i64) -> PersonId {
    PersonId(raw)
}

/// A (1) = B (2) with child C (3).
fn couple_with_child() -> (Vec<Person>, Vec<ParentChildEdge>, Vec<MarriageEdge>) {
    let a = Person::founder(id(1), "Alpha", Gender::Male);
    let b = Person::in_law_of(id(2), "Beta", Gender::Female, &a);
    let c = Person::child_of(id(3), "Gamma", Gender::Male, &a);
    (
        vec![a, b, c],
        vec![ParentChildEdge::new(id(1), id(3))],
        vec![MarriageEdge::new(id(1), id(2))],
    )
}

#[test]
fn married_founders_share_the_root_node() {
    let (people, edges, marriages) = couple_with_child();
    let graph = FamilyGraph::new(people, &edges, &marriages);
    let settings = LayoutSettings::default();

    let mut tree = TreeBuilder::whole(&graph).build(id(1)).unwrap();
    TreeLayouter::new(&settings).execute(&mut tree, Vec2::ZERO);
    assert_eq!(tree.spouse, Some(id(2)));
    assert_eq!(tree.self_width, 2.0 * W + SG);
    assert_eq!(tree.children.len(), 1);

    let scene = render_focused(&graph, id(1), &settings);
    let root = &scene.nodes[0];
    assert_eq!(root.person.id, id(1));
    assert_eq!(root.spouse.as_ref().map(|card| card.id), Some(id(2)));
    assert_eq!(root.spouse_x, Some(root.x + W + SG));

    let child = &scene.nodes[1];
    assert_eq!(child.person.id, id(3));
    assert_eq!(child.x + W / 2.0, root.x + (2.0 * W + SG) / 2.0);
    assert!(child.y > root.y + H);
}

#[test]
fn solitary_founder_is_one_card_wide() {
    let d = Person::founder(id(4), "Delta", Gender::Male);
    let graph = FamilyGraph::new(vec![d], &[], &[]);

    let mut tree = TreeBuilder::whole(&graph).build(id(4)).unwrap();
    TreeLayouter::new(&LayoutSettings::default()).execute(&mut tree, Vec2::ZERO);
    assert_eq!(tree.self_width, W);
    assert_eq!(tree.total_width, W);
}

#[test]
fn grandchild_climbs_two_hops_to_founder() {
    let d = Person::founder(id(4), "Delta", Gender::Male);
    let f = Person::child_of(id(6), "Foxtrot", Gender::Female, &d);
    let e = Person::child_of(id(5), "Echo", Gender::Male, &f);
    let graph = FamilyGraph::new(
        vec![d, f, e],
        &[
            ParentChildEdge::new(id(4), id(6)),
            ParentChildEdge::new(id(6), id(5)),
        ],
        &[],
    );

    let selection = select_relevant(&graph, id(5)).unwrap();
    let bloodline = trace_bloodline(&graph, &selection, None);
    assert_eq!(bloodline.ascent.hops(), 2);
    assert_eq!(bloodline.root(), id(4));

    let scene = render_focused(&graph, id(5), &LayoutSettings::default());
    assert_eq!(
        scene.mode,
        SceneMode::Focused {
            focal: id(5),
            root: id(4),
            redirected_from: None,
        }
    );
}

#[test]
fn in_law_focus_renders_partner_ancestry() {
    let (mut people, edges, mut marriages) = couple_with_child();
    let g = Person::in_law_of(id(7), "Golf", Gender::Female, &people[2]);
    people.push(g);
    marriages.push(MarriageEdge::new(id(3), id(7)));
    let snapshot = FamilySnapshot::new(people, edges, marriages);

    let mut view = TreeView::new(MemorySource::new(snapshot), TreeSettings::default());
    let scene = view.render_focused_on(id(7)).unwrap();

    assert_eq!(
        scene.mode,
        SceneMode::Focused {
            focal: id(3),
            root: id(1),
            redirected_from: Some(id(7)),
        }
    );
    let c = scene.nodes.iter().find(|node| node.person.id == id(3)).unwrap();
    assert_eq!(c.spouse.as_ref().map(|card| card.id), Some(id(7)));
    assert!(scene.nodes.iter().all(|node| node.person.id != id(7)));
}

#[test]
fn unrelated_founders_sit_side_by_side() {
    let h = Person::founder(id(8), "Hotel", Gender::Male);
    let i = Person::founder(id(9), "India", Gender::Female);
    let graph = FamilyGraph::new(vec![h, i], &[], &[]);
    let settings = LayoutSettings::default();

    let scene = render_forest(&graph, &settings);
    assert_eq!(scene.mode, SceneMode::Forest { tree_count: 2 });

    let size = Vec2::new(W, H);
    let h_card = Rect::from_pos_size(scene.card_origin(id(8)).unwrap(), size);
    let i_card = Rect::from_pos_size(scene.card_origin(id(9)).unwrap(), size);
    assert_eq!(i_card.min.x - h_card.max.x, settings.forest_tree_spacing);
    assert_eq!(h_card.min.y, i_card.min.y);
    assert!(!h_card.overlaps(&i_card));
}

#[test]
fn identical_input_gives_identical_scene() {
    let (people, edges, marriages) = couple_with_child();
    let settings = LayoutSettings::default();

    let first = render_focused(
        &FamilyGraph::new(people.clone(), &edges, &marriages),
        id(3),
        &settings,
    );
    let second = render_focused(&FamilyGraph::new(people, &edges, &marriages), id(3), &settings);
    assert_eq!(first, second);
}

/// Grows a family one member at a time. Each step either adds a child to, or
/// marries someone into, the person picked by the index.
fn grow_family(steps: &[(bool, usize)]) -> FamilyGraph {
    let mut people = vec![Person::founder(id(1), "Root", Gender::Male)];
    let mut edges = Vec::new();
    let mut marriages = Vec::new();

    for (n, &(as_child, pick)) in steps.iter().enumerate() {
        let anchor = people[pick % people.len()].clone();
        let new_id = id(n as i64 + 2);
        let placement = if as_child {
            edges.push(ParentChildEdge::new(anchor.id, new_id));
            place_member(None, Some(&anchor), None)
        } else {
            marriages.push(MarriageEdge::new(anchor.id, new_id));
            place_member(None, None, Some(&anchor))
        }
        .unwrap();

        people.push(Person {
            generation: placement.generation,
            member_type: placement.member_type,
            ..Person::founder(new_id, format!("Member {}", n), Gender::Female)
        });
    }
    FamilyGraph::new(people, &edges, &marriages)
}

proptest! {
    #[test]
    fn placed_members_keep_generation_rules(
        steps in prop::collection::vec((any::<bool>(), 0usize..64), 0..40),
    ) {
        let graph = grow_family(&steps);
        prop_assert!(check_generations(&graph).is_empty());
    }

    #[test]
    fn trees_place_each_person_once(
        steps in prop::collection::vec((any::<bool>(), 0usize..64), 0..40),
        focus in 1i64..42,
    ) {
        let graph = grow_family(&steps);
        let selection = select_relevant(&graph, id(focus)).unwrap();
        let bloodline = trace_bloodline(&graph, &selection, None);
        let trees = [
            TreeBuilder::whole(&graph).build(id(1)),
            TreeBuilder::within(&graph, &bloodline).build(bloodline.root()),
        ];

        for tree in trees.into_iter().flatten() {
            let ids = tree.person_ids();
            let unique: HashSet<PersonId> = ids.iter().copied().collect();
            prop_assert_eq!(unique.len(), ids.len());
        }
    }

    #[test]
    fn focused_render_is_deterministic(
        steps in prop::collection::vec((any::<bool>(), 0usize..64), 0..40),
        focus in 1i64..42,
    ) {
        let graph = grow_family(&steps);
        let settings = LayoutSettings::default();
        let first = render_focused(&graph, id(focus), &settings);
        let second = render_focused(&graph, id(focus), &settings);
        prop_assert_eq!(first, second);
    }
}
