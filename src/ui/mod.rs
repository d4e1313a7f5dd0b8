pub mod chart;
pub mod layout;
pub mod statusbar;
pub mod traces;

pub use chart::ChartView;
pub use layout::LayoutManager;
pub use statusbar::StatusBar;
pub use traces::{ChartPayload, render};
