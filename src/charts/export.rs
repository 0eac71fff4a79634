//! Static Chart Export
//! Draws a [`Scene`] to an SVG or PNG file with plotters.
//! Pointer handlers do not survive export. Nodes are drawn at their
//! current opacity, so a hidden tooltip stays hidden.

use crate::charts::scene::{Node, Scene};
use crate::charts::surface::{self, Point, Shape, TextAnchor};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to draw chart: {0}")]
    Draw(String),
}

fn draw_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> ExportError {
    ExportError::Draw(e.to_string())
}

/// Write `scene` to `path`. `.svg` files use the SVG backend, anything else is
/// encoded as a bitmap (PNG).
pub fn export(scene: &Scene, size: (u32, u32), path: &Path) -> Result<(), ExportError> {
    let is_svg = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("svg"))
        .unwrap_or(false);

    if is_svg {
        let root = SVGBackend::new(path, size).into_drawing_area();
        draw_scene(scene, &root)?;
    } else {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        draw_scene(scene, &root)?;
    }

    info!(path = %path.display(), nodes = scene.len(), "chart exported");
    Ok(())
}

fn draw_scene<DB: DrawingBackend>(
    scene: &Scene,
    root: &DrawingArea<DB, Shift>,
) -> Result<(), ExportError> {
    root.fill(&WHITE).map_err(draw_err)?;

    for node in scene.iter() {
        let opacity = scene.effective_opacity(node.id);
        if opacity <= 0.0 {
            continue;
        }
        let origin = scene.origin(node.id);
        draw_node(root, node, origin, opacity)?;
    }

    root.present().map_err(draw_err)?;
    Ok(())
}

fn draw_node<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    node: &Node,
    origin: Point,
    opacity: f32,
) -> Result<(), ExportError> {
    let at = |p: Point| {
        (
            (p.x + origin.x).round() as i32,
            (p.y + origin.y).round() as i32,
        )
    };
    let style = &node.style;
    let stroke = style.stroke.map(|c| {
        rgba(c, opacity).stroke_width(style.stroke_width.round().max(1.0) as u32)
    });
    let fill = style.fill.map(|c| rgba(c, opacity));

    match &node.shape {
        Shape::Group { .. } => {}
        Shape::Line { from, to } => {
            if let Some(stroke) = stroke {
                root.draw(&PathElement::new(vec![at(*from), at(*to)], stroke))
                    .map_err(draw_err)?;
            }
        }
        Shape::Polyline { points } => {
            if let Some(stroke) = stroke {
                let coords: Vec<(i32, i32)> = points.iter().map(|p| at(*p)).collect();
                root.draw(&PathElement::new(coords, stroke))
                    .map_err(draw_err)?;
            }
        }
        Shape::Circle { center, radius } => {
            let radius = radius.round() as i32;
            if let Some(fill) = fill {
                root.draw(&Circle::new(at(*center), radius, fill.filled()))
                    .map_err(draw_err)?;
            }
            if let Some(stroke) = stroke {
                root.draw(&Circle::new(at(*center), radius, stroke))
                    .map_err(draw_err)?;
            }
        }
        Shape::Text {
            at: anchor_point,
            content,
            anchor,
            rotation,
            font_size,
        } => {
            let color = fill.unwrap_or_else(|| BLACK.mix(opacity as f64));
            let mut font = ("sans-serif", *font_size).into_font();
            if (*rotation + 90.0).abs() < f64::EPSILON {
                font = font.transform(FontTransform::Rotate270);
            } else if (*rotation - 90.0).abs() < f64::EPSILON {
                font = font.transform(FontTransform::Rotate90);
            }
            let text_style = TextStyle::from(font)
                .color(&color)
                .pos(Pos::new(h_pos(*anchor), VPos::Bottom));
            root.draw(&Text::new(content.as_str(), at(*anchor_point), text_style))
                .map_err(draw_err)?;
        }
        Shape::Label { at: label_at, lines } => {
            let color = fill.unwrap_or_else(|| BLACK.mix(opacity as f64));
            let line_height = 14;
            for (i, line) in lines.iter().enumerate() {
                let (x, y) = at(*label_at);
                let text_style = TextStyle::from(("sans-serif", 12.0).into_font()).color(&color);
                root.draw(&Text::new(
                    line.as_str(),
                    (x, y + i as i32 * line_height),
                    text_style,
                ))
                .map_err(draw_err)?;
            }
        }
    }
    Ok(())
}

fn rgba(color: surface::Color, opacity: f32) -> RGBAColor {
    RGBColor(color.r, color.g, color.b).mix(opacity as f64)
}

fn h_pos(anchor: TextAnchor) -> HPos {
    match anchor {
        TextAnchor::Start => HPos::Left,
        TextAnchor::Middle => HPos::Center,
        TextAnchor::End => HPos::Right,
    }
}
