mod component;
mod render;

pub use component::{ChartStatus, FamilyChart};
