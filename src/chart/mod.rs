//! Layout and view-state core of the family chart. Nothing in here touches
//! the DOM, so all of it runs under plain `cargo test`.

pub mod camera;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod hierarchy;
pub mod layout;
pub mod model;
pub mod scene;
pub mod search;
mod simulation;
mod tidy;
pub mod tooltip;
pub mod view;

pub use camera::{Camera, ViewTransform};
pub use config::ChartConfig;
pub use controller::{ChartController, Command};
pub use error::{ChartError, Result};
pub use geometry::{LinkPath, Point, Viewport};
pub use layout::{ChartLayout, LayoutEngine, LayoutMode};
pub use model::{Dataset, DatasetStats, Gender, Person, PersonId, RelationKind, Relationship};
pub use scene::Scene;
pub use search::{SearchResults, search};
pub use tooltip::Tooltip;
pub use view::{DisplayOptions, ViewState};
