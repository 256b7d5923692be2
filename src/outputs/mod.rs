pub mod chart;
pub mod text;

pub use chart::PlotData;
pub use text::render_view;
