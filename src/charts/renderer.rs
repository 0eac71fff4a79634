//! Population Chart Renderer
//! Draws the population line chart onto an injected drawing surface.
//!
//! Layout (plot coordinates, origin at the top-left of the plot area):
//! 1. Root group translated by the left/top margins
//! 2. X axis at the bottom (time ticks), Y axis on the left (linear ticks)
//! 3. One line through every record, ordered by year
//! 4. One marker per record with a hover tooltip
//! 5. Title, axis labels, footnote and credit
//!
//! The static labels do not depend on the data. The pipeline draws them
//! before the load completes, so they survive a failed load.

use crate::charts::scale::{format_tick, ChartScales, RenderError};
use crate::charts::surface::{DrawingSurface, NodeId, Point, Shape, Style, TextAnchor};
use crate::charts::tooltip;
use crate::config::ChartConfig;
use crate::data::{DataSource, LoaderError, Record};
use thiserror::Error;
use tracing::debug;

pub const DATA_POINT_CLASS: &str = "data-point";
pub const LINE_CLASS: &str = "line";
pub const X_AXIS_CLASS: &str = "x-axis";
pub const Y_AXIS_CLASS: &str = "y-axis";
pub const TOOLTIP_CLASS: &str = "tooltip";
pub const LABEL_CLASS: &str = "label";

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Nodes every chart owns before any data arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartFrame {
    /// Group translated by the margins. Plot content is drawn inside it.
    pub root: NodeId,
    /// Shared hover annotation, at surface root so it is positioned in surface pixels.
    pub tooltip: NodeId,
}

/// Nodes drawn from the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayer {
    pub x_axis: NodeId,
    pub y_axis: NodeId,
    pub line: NodeId,
    /// One marker per record, in input order.
    pub markers: Vec<NodeId>,
}

pub struct ChartRenderer {
    config: ChartConfig,
}

impl ChartRenderer {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Scales for the configured plot area.
    pub fn compute_scales(&self, records: &[Record]) -> Result<ChartScales, RenderError> {
        ChartScales::compute(records, self.config.width, self.config.height)
    }

    /// Create the margin group and the hidden tooltip.
    pub fn mount(&self, surface: &mut dyn DrawingSurface) -> ChartFrame {
        let margin = self.config.margin;
        let root = surface.append(
            None,
            Shape::Group {
                offset: Point::new(margin.left, margin.top),
            },
        );
        let tooltip = surface.append_styled(
            None,
            Shape::Label {
                at: Point::ORIGIN,
                lines: Vec::new(),
            },
            Style::default()
                .class(TOOLTIP_CLASS)
                .fill(self.config.text_color)
                .opacity(0.0),
        );
        ChartFrame { root, tooltip }
    }

    /// Draw the title, axis labels, footnote and credit.
    pub fn draw_furniture(&self, surface: &mut dyn DrawingSurface, frame: &ChartFrame) {
        let c = &self.config;
        let (w, h) = (c.width, c.height);
        let text_style = Style::default()
            .class(LABEL_CLASS)
            .fill(c.text_color)
            .font_family(c.font_family.clone());

        // Title
        surface.append_styled(
            Some(frame.root),
            Shape::text(Point::new(w / 2.0, -20.0), &c.title, TextAnchor::Middle, c.font_size),
            text_style.clone(),
        );

        // X axis label
        surface.append_styled(
            Some(frame.root),
            Shape::text(
                Point::new(w / 2.0, h + c.margin.bottom - 10.0),
                &c.x_label,
                TextAnchor::Middle,
                c.font_size,
            ),
            text_style.clone(),
        );

        // Y axis label, rotated to read bottom-up along the axis
        surface.append_styled(
            Some(frame.root),
            Shape::Text {
                at: Point::new(-c.margin.left + 20.0, h / 2.0),
                content: c.y_label.clone(),
                anchor: TextAnchor::Middle,
                rotation: -90.0,
                font_size: c.font_size,
            },
            text_style.clone(),
        );

        // Footnote
        surface.append_styled(
            Some(frame.root),
            Shape::text(
                Point::new(w / 2.0, h + c.margin.bottom + 30.0),
                &c.footnote,
                TextAnchor::Middle,
                c.font_size,
            ),
            text_style.clone(),
        );

        // Credit
        surface.append_styled(
            Some(frame.root),
            Shape::text(
                Point::new(w, h + c.margin.top + c.margin.bottom - 10.0),
                &c.credit,
                TextAnchor::End,
                c.credit_font_size,
            ),
            text_style,
        );
    }

    /// Draw axes, the line, and the markers with their tooltips.
    pub fn render_data(
        &self,
        surface: &mut dyn DrawingSurface,
        frame: &ChartFrame,
        records: &[Record],
        scales: &ChartScales,
    ) -> DataLayer {
        let x_axis = self.draw_x_axis(surface, frame, scales);
        let y_axis = self.draw_y_axis(surface, frame, scales);

        // Stable sort keeps input order among equal years
        let mut ordered: Vec<&Record> = records.iter().collect();
        ordered.sort_by_key(|r| r.year);
        let points = ordered
            .iter()
            .map(|r| {
                let (x, y) = scales.position(r);
                Point::new(x, y)
            })
            .collect();

        let line = surface.append_styled(
            Some(frame.root),
            Shape::Polyline { points },
            Style::default()
                .class(LINE_CLASS)
                .stroke(self.config.line_color, self.config.line_width),
        );

        let markers: Vec<NodeId> = records
            .iter()
            .map(|record| {
                let (x, y) = scales.position(record);
                let marker = surface.append_styled(
                    Some(frame.root),
                    Shape::Circle {
                        center: Point::new(x, y),
                        radius: self.config.marker_radius,
                    },
                    Style::default()
                        .class(DATA_POINT_CLASS)
                        .fill(self.config.marker_color),
                );
                self.attach_tooltip(surface, frame, marker, record);
                marker
            })
            .collect();

        debug!(markers = markers.len(), "rendered data layer");

        DataLayer {
            x_axis,
            y_axis,
            line,
            markers,
        }
    }

    /// Draw the whole chart on a fresh frame. Call `surface.clear()` first
    /// when re-rendering, otherwise elements accumulate.
    pub fn render(
        &self,
        surface: &mut dyn DrawingSurface,
        records: &[Record],
        scales: &ChartScales,
    ) -> (ChartFrame, DataLayer) {
        let frame = self.mount(surface);
        let layer = self.render_data(surface, &frame, records, scales);
        self.draw_furniture(surface, &frame);
        (frame, layer)
    }

    /// Show the tooltip for `record` while the pointer is over `marker`.
    pub fn attach_tooltip(
        &self,
        surface: &mut dyn DrawingSurface,
        frame: &ChartFrame,
        marker: NodeId,
        record: &Record,
    ) {
        tooltip::bind(surface, frame.tooltip, marker, record, &self.config.tooltip);
    }

    /// The data-dependent half of the pipeline, for loads that ran elsewhere.
    pub fn finish(
        &self,
        surface: &mut dyn DrawingSurface,
        frame: &ChartFrame,
        loaded: Result<Vec<Record>, LoaderError>,
    ) -> Result<DataLayer, ChartError> {
        let records = loaded?;
        let scales = self.compute_scales(&records)?;
        Ok(self.render_data(surface, frame, &records, &scales))
    }

    /// Full pipeline: static furniture first, then one awaited load, then the
    /// data layer. On error the furniture stays on the surface.
    pub async fn run(
        &self,
        surface: &mut dyn DrawingSurface,
        source: DataSource,
    ) -> Result<DataLayer, ChartError> {
        let frame = self.mount(surface);
        self.draw_furniture(surface, &frame);
        let loaded = source.load_async().await;
        self.finish(surface, &frame, loaded)
    }

    fn draw_x_axis(
        &self,
        surface: &mut dyn DrawingSurface,
        frame: &ChartFrame,
        scales: &ChartScales,
    ) -> NodeId {
        let c = &self.config;
        let axis = surface.append_styled(
            Some(frame.root),
            Shape::Group {
                offset: Point::new(0.0, c.height),
            },
            Style::default().class(X_AXIS_CLASS),
        );
        let line_style = Style::default().stroke(c.axis_color, 1.0);
        let (r0, r1) = scales.x.range();

        // Domain line
        surface.append_styled(
            Some(axis),
            Shape::Line {
                from: Point::new(r0, 0.0),
                to: Point::new(r1, 0.0),
            },
            line_style.clone(),
        );

        for tick in scales.x.ticks(c.x_ticks) {
            let x = scales.x.map(tick);
            surface.append_styled(
                Some(axis),
                Shape::Line {
                    from: Point::new(x, 0.0),
                    to: Point::new(x, TICK_SIZE),
                },
                line_style.clone(),
            );
            surface.append_styled(
                Some(axis),
                Shape::text(
                    Point::new(x, TICK_SIZE + TICK_PADDING + c.font_size * 0.71),
                    tick.format("%Y").to_string(),
                    TextAnchor::Middle,
                    c.font_size * 0.85,
                ),
                Style::default().fill(c.text_color).font_family(c.font_family.clone()),
            );
        }
        axis
    }

    fn draw_y_axis(
        &self,
        surface: &mut dyn DrawingSurface,
        frame: &ChartFrame,
        scales: &ChartScales,
    ) -> NodeId {
        let c = &self.config;
        let axis = surface.append_styled(
            Some(frame.root),
            Shape::Group {
                offset: Point::ORIGIN,
            },
            Style::default().class(Y_AXIS_CLASS),
        );
        let line_style = Style::default().stroke(c.axis_color, 1.0);
        let (r0, r1) = scales.y.range();

        // Domain line
        surface.append_styled(
            Some(axis),
            Shape::Line {
                from: Point::new(0.0, r0),
                to: Point::new(0.0, r1),
            },
            line_style.clone(),
        );

        let step = scales.y.tick_step(c.y_ticks);
        for tick in scales.y.ticks(c.y_ticks) {
            let y = scales.y.map(tick);
            surface.append_styled(
                Some(axis),
                Shape::Line {
                    from: Point::new(-TICK_SIZE, y),
                    to: Point::new(0.0, y),
                },
                line_style.clone(),
            );
            surface.append_styled(
                Some(axis),
                Shape::text(
                    Point::new(-(TICK_SIZE + TICK_PADDING), y + c.font_size * 0.32),
                    format_tick(tick, step),
                    TextAnchor::End,
                    c.font_size * 0.85,
                ),
                Style::default().fill(c.text_color).font_family(c.font_family.clone()),
            );
        }
        axis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::scene::Scene;
    use crate::charts::surface::{PointerEvent, PointerKind};
    use std::time::Duration;

    fn records() -> Vec<Record> {
        [(2000, 6.1), (1960, 3.0), (1980, 4.4), (2020, 7.8)]
            .into_iter()
            .map(|(y, p)| Record::new(y, p).unwrap())
            .collect()
    }

    fn render(scene: &mut Scene) -> (ChartFrame, DataLayer) {
        let renderer = ChartRenderer::new(ChartConfig::default());
        let records = records();
        let scales = renderer.compute_scales(&records).unwrap();
        renderer.render(scene, &records, &scales)
    }

    #[test]
    fn test_one_marker_per_record() {
        let mut scene = Scene::new();
        let (_, layer) = render(&mut scene);

        assert_eq!(layer.markers.len(), 4);
        assert_eq!(scene.find_by_class(DATA_POINT_CLASS).count(), 4);
        assert_eq!(scene.find_by_class(LINE_CLASS).count(), 1);
    }

    #[test]
    fn test_line_touches_markers_in_year_order() {
        let mut scene = Scene::new();
        let (_, layer) = render(&mut scene);

        let Shape::Polyline { points } = &scene.node(layer.line).unwrap().shape else {
            panic!("line is not a polyline");
        };
        assert_eq!(points.len(), 4);
        assert!(points.windows(2).all(|w| w[0].x <= w[1].x));

        for marker in &layer.markers {
            let Shape::Circle { center, .. } = scene.node(*marker).unwrap().shape else {
                panic!("marker is not a circle");
            };
            assert!(points.contains(&center));
        }
    }

    #[test]
    fn test_draw_order() {
        let mut scene = Scene::new();
        let (frame, layer) = render(&mut scene);

        let children = &scene.node(frame.root).unwrap().children;
        let pos = |id: NodeId| children.iter().position(|c| *c == id).unwrap();
        assert!(pos(layer.x_axis) < pos(layer.y_axis));
        assert!(pos(layer.y_axis) < pos(layer.line));
        assert!(pos(layer.line) < pos(layer.markers[0]));

        let first_label = scene.find_by_class(LABEL_CLASS).next().unwrap().id;
        assert!(pos(*layer.markers.last().unwrap()) < pos(first_label));
    }

    #[test]
    fn test_axes_have_ticks() {
        let mut scene = Scene::new();
        let (_, layer) = render(&mut scene);

        let x_ticks = scene.node(layer.x_axis).unwrap().children.len();
        let y_ticks = scene.node(layer.y_axis).unwrap().children.len();
        // domain line + (tick, label) pairs
        assert_eq!(x_ticks, 1 + 2 * 7);
        assert!(y_ticks > 1);
        assert_eq!(scene.origin(layer.x_axis), Point::new(50.0, 450.0));
    }

    #[test]
    fn test_furniture_labels() {
        let mut scene = Scene::new();
        render(&mut scene);

        let texts: Vec<String> = scene
            .find_by_class(LABEL_CLASS)
            .filter_map(|n| match &n.shape {
                Shape::Text { content, .. } => Some(content.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            texts,
            vec![
                "Population Chart",
                "Year",
                "Population (millions)",
                "Data source: World Bank",
                "Code by Your Name"
            ]
        );
    }

    #[test]
    fn test_tooltip_fades_in_and_out() {
        let mut scene = Scene::new();
        let (frame, layer) = render(&mut scene);
        let marker = layer.markers[1];

        scene.dispatch(
            marker,
            PointerEvent {
                kind: PointerKind::Enter,
                position: Point::new(60.0, 200.0),
            },
        );
        let tip = scene.node(frame.tooltip).unwrap();
        assert_eq!(
            tip.shape,
            Shape::Label {
                at: Point::new(70.0, 190.0),
                lines: vec!["Year: 1960".to_string(), "Population: 3".to_string()],
            }
        );
        assert_eq!(tip.style.opacity, 0.0);

        scene.advance(Duration::from_millis(200));
        assert!((scene.node(frame.tooltip).unwrap().style.opacity - 0.9).abs() < 1e-4);

        scene.dispatch(
            marker,
            PointerEvent {
                kind: PointerKind::Leave,
                position: Point::new(60.0, 200.0),
            },
        );
        scene.advance(Duration::from_millis(250));
        assert!((scene.node(frame.tooltip).unwrap().style.opacity - 0.45).abs() < 1e-4);
        scene.advance(Duration::from_millis(250));
        assert_eq!(scene.node(frame.tooltip).unwrap().style.opacity, 0.0);
    }

    #[test]
    fn test_rerender_without_clear_accumulates() {
        let mut scene = Scene::new();
        render(&mut scene);
        render(&mut scene);
        assert_eq!(scene.find_by_class(DATA_POINT_CLASS).count(), 8);

        scene.clear();
        render(&mut scene);
        assert_eq!(scene.find_by_class(DATA_POINT_CLASS).count(), 4);
    }

    #[test]
    fn test_finish_with_empty_records_draws_nothing() {
        let mut scene = Scene::new();
        let renderer = ChartRenderer::new(ChartConfig::default());
        let frame = renderer.mount(&mut scene);
        let before = scene.len();

        let err = renderer.finish(&mut scene, &frame, Ok(Vec::new())).unwrap_err();
        assert!(matches!(err, ChartError::Render(RenderError::EmptyDataset)));
        assert_eq!(scene.len(), before);
    }
}
