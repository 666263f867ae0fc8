pub mod audit;
pub mod bloodline;
pub mod forest;
pub mod geometry;
pub mod graph;
pub mod hit_tester;
pub mod layout;
pub mod pipeline;
pub mod scene;
pub mod select;
pub mod settings;
pub mod tree;
pub mod tree_view;
pub mod view;

pub use audit::{GenerationIssue, check_generations};
pub use bloodline::{Ascent, AscentEnd, Bloodline, ascend, trace_bloodline};
pub use forest::{FounderGroup, group_founders};
pub use geometry::{Rect, Vec2};
pub use graph::FamilyGraph;
pub use hit_tester::{HitResult, SceneHitTester};
pub use layout::{Layouter, TreeLayouter};
pub use pipeline::{render_focused, render_forest};
pub use scene::{
    CanvasBounds, Connector, ConnectorKind, PersonCard, PositionedNode, Scene, SceneMode,
};
pub use select::{Selection, select_relevant};
pub use settings::{LayoutSettings, SettingsError, TreeSettings, ViewSettings};
pub use tree::{TreeBuilder, TreeNode};
pub use tree_view::{Frame, TreeView};
pub use view::{DragState, Transform, ViewController};
