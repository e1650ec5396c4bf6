pub mod family_chart;
pub mod side_panel;
pub mod tooltip;
