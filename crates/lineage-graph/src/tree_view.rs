use crate::{
    FamilyGraph, Scene, SceneHitTester, SceneMode, Transform, TreeSettings, Vec2, ViewController,
    render_focused, render_forest,
};
use anyhow::{Context, Result};
use lineage_core::{FamilySource, PersonId};
use lineage_events::{Event, EventListener};
use serde::{Deserialize, Serialize};

/// What the drawing sink receives: the scene and the transform to apply to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub scene: Scene,
    pub transform: Transform,
}

/// One renderer instance: the current scene plus the view transform.
///
/// Family data is pulled from the source in full on every render and
/// dropped once the scene is built. Pan and zoom only touch the transform.
pub struct TreeView<S> {
    source: S,
    settings: TreeSettings,
    view: ViewController,
    scene: Scene,
    hit_tester: SceneHitTester,
}

impl<S: FamilySource> TreeView<S> {
    pub fn new(source: S, settings: TreeSettings) -> Self {
        let view = ViewController::new(&settings.view);
        Self {
            source,
            settings,
            view,
            scene: Scene::empty(),
            hit_tester: SceneHitTester::default(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn transform(&self) -> Transform {
        self.view.transform()
    }

    pub fn view(&self) -> &ViewController {
        &self.view
    }

    pub fn settings(&self) -> &TreeSettings {
        &self.settings
    }

    pub fn frame(&self) -> Frame {
        Frame {
            scene: self.scene.clone(),
            transform: self.view.transform(),
        }
    }

    /// Rebuilds the scene around `id` and centers the focal card.
    pub fn render_focused_on(&mut self, id: PersonId) -> Result<&Scene> {
        let graph = self.load_graph()?;
        let scene = render_focused(&graph, id, &self.settings.layout);
        self.install(scene);
        self.recenter();
        Ok(&self.scene)
    }

    /// Rebuilds the scene with every founder lineage. The transform is kept.
    pub fn render_whole_forest(&mut self) -> Result<&Scene> {
        let graph = self.load_graph()?;
        let scene = render_forest(&graph, &self.settings.layout);
        self.install(scene);
        Ok(&self.scene)
    }

    pub fn reset_zoom(&mut self) {
        self.view.reset_zoom();
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.view.pan_by(dx, dy);
    }

    pub fn zoom_at(&mut self, x: f32, y: f32, delta: f32) -> bool {
        self.view.zoom_at(Vec2::new(x, y), delta)
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.view.set_viewport(width, height);
    }

    /// Person card under a canvas point, if any.
    pub fn person_at(&self, x: f32, y: f32) -> Option<PersonId> {
        let world = self.view.screen_to_world(Vec2::new(x, y));
        self.hit_tester.hit_test(world).person_id()
    }

    fn load_graph(&self) -> Result<FamilyGraph> {
        let snapshot = self
            .source
            .load_snapshot()
            .context("Failed to load family data")?;
        Ok(FamilyGraph::from_snapshot(snapshot))
    }

    fn install(&mut self, scene: Scene) {
        self.hit_tester = SceneHitTester::new(&scene, &self.settings.layout)
            .with_tolerance(self.settings.view.hit_tolerance);
        self.scene = scene;
    }

    fn recenter(&mut self) {
        let SceneMode::Focused { focal, .. } = self.scene.mode else {
            return;
        };
        if let Some(origin) = self.scene.card_origin(focal) {
            let layout = &self.settings.layout;
            let center = Vec2::new(
                origin.x + layout.card_width / 2.0,
                origin.y + layout.card_height / 2.0,
            );
            self.view.center_on(center);
        }
    }

    fn click(&mut self, x: f32, y: f32) {
        if !self.view.take_click() {
            tracing::debug!("Click at ({}, {}) suppressed after drag", x, y);
            return;
        }
        let Some(id) = self.person_at(x, y) else {
            return;
        };
        if let Err(e) = self.render_focused_on(id) {
            tracing::error!("Failed to focus on {}: {:#}", id, e);
        }
    }
}

impl<S: FamilySource> EventListener for TreeView<S> {
    fn handle_event(&mut self, event: &Event) {
        match *event {
            Event::FocusPerson { id } => {
                if let Err(e) = self.render_focused_on(id) {
                    tracing::error!("Failed to render tree for {}: {:#}", id, e);
                }
            }
            Event::ShowWholeForest => {
                if let Err(e) = self.render_whole_forest() {
                    tracing::error!("Failed to render whole forest: {:#}", e);
                }
            }
            Event::ResetZoom => self.reset_zoom(),
            Event::PanBy { dx, dy } => self.pan_by(dx, dy),
            Event::ZoomAt { x, y, delta } => {
                self.zoom_at(x, y, delta);
            }
            Event::ViewportResized { width, height } => self.set_viewport(width, height),
            Event::PointerDown { x, y } => self.view.pointer_down(Vec2::new(x, y)),
            Event::PointerMove { x, y } => {
                self.view.pointer_move(Vec2::new(x, y));
            }
            Event::PointerUp => self.view.pointer_up(),
            Event::Click { x, y } => self.click(x, y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{id, sample_edges, sample_marriages, sample_people};
    use lineage_core::{DataError, FamilySnapshot, MemorySource};
    use lineage_events::EventBus;

    fn view() -> TreeView<MemorySource> {
        let snapshot = FamilySnapshot::new(sample_people(), sample_edges(), sample_marriages());
        TreeView::new(MemorySource::new(snapshot), TreeSettings::default())
    }

    struct FailingSource;

    impl FamilySource for FailingSource {
        fn load_snapshot(&self) -> Result<FamilySnapshot, DataError> {
            Err(DataError::Json(
                serde_json::from_str::<FamilySnapshot>("{").unwrap_err(),
            ))
        }
    }

    #[test]
    fn test_focus_centers_focal_card() {
        let mut view = view();
        view.render_focused_on(id(6)).unwrap();

        let origin = view.scene().card_origin(id(6)).unwrap();
        let center = Vec2::new(origin.x + 80.0, origin.y + 100.0);
        let screen = view.view().world_to_screen(center);
        assert!((screen.x - 400.0).abs() < 1e-3);
        assert!((screen.y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_forest_keeps_transform() {
        let mut view = view();
        view.pan_by(12.0, 34.0);
        view.render_whole_forest().unwrap();

        assert_eq!(view.scene().mode, SceneMode::Forest { tree_count: 2 });
        assert_eq!(view.transform().pan(), Vec2::new(12.0, 34.0));
    }

    #[test]
    fn test_click_on_card_refocuses() {
        let mut view = view();
        view.render_whole_forest().unwrap();

        let cuong = view.scene().card_origin(id(12)).unwrap();
        let bus = EventBus::new();
        bus.publish(Event::Click {
            x: cuong.x + 10.0,
            y: cuong.y + 10.0,
        });
        bus.dispatch_to(&mut view);

        assert_eq!(view.scene().focal(), Some(id(12)));
    }

    #[test]
    fn test_drag_release_does_not_select() {
        let mut view = view();
        view.render_whole_forest().unwrap();
        let dong = view.scene().card_origin(id(1)).unwrap();

        let bus = EventBus::new();
        bus.publish(Event::PointerDown {
            x: dong.x + 10.0,
            y: dong.y + 10.0,
        });
        bus.publish(Event::PointerMove {
            x: dong.x + 60.0,
            y: dong.y + 10.0,
        });
        bus.publish(Event::PointerUp);
        bus.publish(Event::Click {
            x: dong.x + 60.0,
            y: dong.y + 10.0,
        });
        bus.dispatch_to(&mut view);

        assert!(matches!(view.scene().mode, SceneMode::Forest { .. }));
        assert_eq!(view.transform().pan(), Vec2::new(50.0, 0.0));
        // Dragging moved the card with the pointer.
        assert_eq!(view.person_at(dong.x + 60.0, dong.y + 10.0), Some(id(1)));
    }

    #[test]
    fn test_load_failure_keeps_previous_scene() {
        let mut view = TreeView::new(FailingSource, TreeSettings::default());
        let err = view.render_focused_on(id(1)).unwrap_err();

        assert!(err.to_string().contains("Failed to load family data"));
        assert!(view.scene().is_empty());
        view.handle_event(&Event::ShowWholeForest);
        assert!(view.scene().is_empty());
    }

    #[test]
    fn test_viewport_events() {
        let mut view = view();
        view.handle_event(&Event::ViewportResized {
            width: 1600.0,
            height: 900.0,
        });
        view.handle_event(&Event::ZoomAt {
            x: 0.0,
            y: 0.0,
            delta: -100.0,
        });
        assert!(view.transform().scale > 1.0);
        view.handle_event(&Event::ResetZoom);
        assert_eq!(view.transform(), Transform::IDENTITY);
        assert_eq!(view.view().viewport(), Vec2::new(1600.0, 900.0));
    }

    #[test]
    fn test_hit_tolerance_setting_reaches_clicks() {
        let snapshot = FamilySnapshot::new(sample_people(), sample_edges(), sample_marriages());
        let mut settings = TreeSettings::default();
        settings.view.hit_tolerance = 6.0;
        let mut view = TreeView::new(MemorySource::new(snapshot), settings);
        view.render_whole_forest().unwrap();

        let cuong = view.scene().card_origin(id(12)).unwrap();
        assert_eq!(view.person_at(cuong.x - 4.0, cuong.y + 10.0), Some(id(12)));
        assert_eq!(view.person_at(cuong.x - 8.0, cuong.y + 10.0), None);
    }
}
