//! Charts module - Scales, drawing surface and the population chart renderer

mod export;
mod renderer;
mod scale;
mod scene;
mod surface;
mod tooltip;

pub use export::{export, ExportError};
pub use renderer::{
    ChartError, ChartFrame, ChartRenderer, DataLayer, DATA_POINT_CLASS, LABEL_CLASS, LINE_CLASS,
    TOOLTIP_CLASS, X_AXIS_CLASS, Y_AXIS_CLASS,
};
pub use scale::{format_tick, nice_step, ChartScales, LinearScale, RenderError, TimeScale};
pub use scene::{Node, Scene};
pub use surface::{
    Color, DrawingSurface, NodeId, Point, PointerEvent, PointerHandler, PointerKind, Shape, Style,
    TextAnchor,
};
pub use tooltip::tooltip_lines;
