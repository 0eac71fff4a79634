//! Tooltip Module
//! Hover annotations for data markers.

use crate::charts::surface::{DrawingSurface, NodeId, PointerEvent, PointerKind, Shape};
use crate::config::TooltipConfig;
use crate::data::Record;

/// Tooltip lines for a record: the year (`%Y`) and the raw population.
pub fn tooltip_lines(record: &Record) -> Vec<String> {
    vec![
        format!("Year: {}", record.year.format("%Y")),
        format!("Population: {}", record.population),
    ]
}

/// Bind enter/leave handlers on `marker` that drive the shared `tooltip` node.
///
/// Enter moves the tooltip next to the pointer with this record's text and
/// fades it in. Leave fades it out. Overlapping fades are not queued. The
/// latest transition wins.
pub fn bind(
    surface: &mut dyn DrawingSurface,
    tooltip: NodeId,
    marker: NodeId,
    record: &Record,
    config: &TooltipConfig,
) {
    let lines = tooltip_lines(record);
    let (dx, dy) = config.offset;
    let opacity = config.opacity;
    let fade_in = config.fade_in();
    let fade_out = config.fade_out();

    surface.on_pointer(
        marker,
        PointerKind::Enter,
        Box::new(move |surface: &mut dyn DrawingSurface, event: &PointerEvent| {
            surface.transition_opacity(tooltip, opacity, fade_in);
            surface.set_shape(
                tooltip,
                Shape::Label {
                    at: event.position.offset(dx, dy),
                    lines: lines.clone(),
                },
            );
        }),
    );

    surface.on_pointer(
        marker,
        PointerKind::Leave,
        Box::new(move |surface: &mut dyn DrawingSurface, _event: &PointerEvent| {
            surface.transition_opacity(tooltip, 0.0, fade_out);
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tooltip_lines() {
        let record = Record::new(1987, 1_234_567.0).unwrap();
        assert_eq!(
            tooltip_lines(&record),
            vec!["Year: 1987".to_string(), "Population: 1234567".to_string()]
        );
    }

    #[test]
    fn test_tooltip_lines_fractional() {
        let record = Record::new(2001, 6.25).unwrap();
        assert_eq!(tooltip_lines(&record)[1], "Population: 6.25");
    }
}
