//! Chart Viewer Widget
//! Paints the chart scene with egui and feeds hover motion back into it.

use crate::charts::{self, Node, Point, Scene, Shape, TextAnchor};
use egui::epaint::TextShape;
use egui::{Align2, Color32, FontId, Pos2, RichText, ScrollArea, Sense, Stroke};

const LABEL_PADDING: f32 = 6.0;
const LABEL_LINE_HEIGHT: f32 = 16.0;

/// Scrollable chart display area.
#[derive(Default)]
pub struct ChartViewer;

impl ChartViewer {
    pub fn new() -> Self {
        Self
    }

    /// Draw `scene` on a canvas of `size` (surface pixels, margins included).
    pub fn show(&mut self, ui: &mut egui::Ui, scene: &mut Scene, size: (f64, f64)) {
        if scene.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        }

        ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(
                egui::vec2(size.0 as f32, size.1 as f32),
                Sense::hover(),
            );
            let origin = response.rect.min;
            painter.rect_filled(response.rect, 0.0, Color32::WHITE);

            let pointer = response
                .hover_pos()
                .map(|p| Point::new((p.x - origin.x) as f64, (p.y - origin.y) as f64));
            scene.pointer_moved(pointer);

            for node in scene.iter() {
                let opacity = scene.effective_opacity(node.id);
                if opacity <= 0.0 {
                    continue;
                }
                let offset = scene.origin(node.id);
                let base = origin + egui::vec2(offset.x as f32, offset.y as f32);
                Self::paint_node(&painter, node, base, opacity);
            }
        });
    }

    fn paint_node(painter: &egui::Painter, node: &Node, base: Pos2, opacity: f32) {
        let to_pos = |p: &Point| base + egui::vec2(p.x as f32, p.y as f32);
        let style = &node.style;
        let stroke = style
            .stroke
            .map(|c| Stroke::new(style.stroke_width as f32, color32(c, opacity)));
        let fill = style.fill.map(|c| color32(c, opacity));

        match &node.shape {
            Shape::Group { .. } => {}
            Shape::Line { from, to } => {
                if let Some(stroke) = stroke {
                    painter.line_segment([to_pos(from), to_pos(to)], stroke);
                }
            }
            Shape::Polyline { points } => {
                if let Some(stroke) = stroke {
                    let points: Vec<Pos2> = points.iter().map(to_pos).collect();
                    painter.add(egui::Shape::line(points, stroke));
                }
            }
            Shape::Circle { center, radius } => {
                if let Some(fill) = fill {
                    painter.circle_filled(to_pos(center), *radius as f32, fill);
                }
                if let Some(stroke) = stroke {
                    painter.circle_stroke(to_pos(center), *radius as f32, stroke);
                }
            }
            Shape::Text {
                at,
                content,
                anchor,
                rotation,
                font_size,
            } => {
                let color = fill.unwrap_or(Color32::from_black_alpha((opacity * 255.0) as u8));
                let font = FontId::proportional(*font_size as f32);
                let pos = to_pos(at);

                if *rotation == 0.0 {
                    let align = match anchor {
                        TextAnchor::Start => Align2::LEFT_BOTTOM,
                        TextAnchor::Middle => Align2::CENTER_BOTTOM,
                        TextAnchor::End => Align2::RIGHT_BOTTOM,
                    };
                    painter.text(pos, align, content, font, color);
                } else {
                    let galley = painter.layout_no_wrap(content.clone(), font, color);
                    let size = galley.size();
                    // Keep the anchor at the middle of the baseline after rotating
                    let start = match anchor {
                        TextAnchor::Start => 0.0,
                        TextAnchor::Middle => size.x / 2.0,
                        TextAnchor::End => size.x,
                    };
                    let angle = (*rotation as f32).to_radians();
                    let (sin, cos) = angle.sin_cos();
                    let shift = egui::vec2(-start * cos + size.y * sin, -start * sin - size.y * cos);
                    painter.add(TextShape::new(pos + shift, galley, color).with_angle(angle));
                }
            }
            Shape::Label { at, lines } => {
                let text_color = fill.unwrap_or(Color32::from_black_alpha((opacity * 255.0) as u8));
                let font = FontId::proportional(12.0);
                let top_left = to_pos(at);

                let width = lines
                    .iter()
                    .map(|line| {
                        painter
                            .layout_no_wrap(line.clone(), font.clone(), text_color)
                            .size()
                            .x
                    })
                    .fold(0.0_f32, f32::max);
                let height = lines.len() as f32 * LABEL_LINE_HEIGHT;
                let rect = egui::Rect::from_min_size(
                    top_left,
                    egui::vec2(width + 2.0 * LABEL_PADDING, height + 2.0 * LABEL_PADDING),
                );
                painter.rect_filled(
                    rect,
                    4.0,
                    Color32::from_rgba_unmultiplied(176, 196, 222, (opacity * 255.0) as u8),
                );

                for (i, line) in lines.iter().enumerate() {
                    painter.text(
                        top_left
                            + egui::vec2(LABEL_PADDING, LABEL_PADDING + i as f32 * LABEL_LINE_HEIGHT),
                        Align2::LEFT_TOP,
                        line,
                        font.clone(),
                        text_color,
                    );
                }
            }
        }
    }
}

fn color32(color: charts::Color, opacity: f32) -> Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color32_applies_opacity() {
        let c = color32(charts::Color::STEELBLUE, 1.0);
        assert_eq!(c, Color32::from_rgb(70, 130, 180));
        assert_eq!(color32(charts::Color::BLACK, 0.0).a(), 0);
    }
}
