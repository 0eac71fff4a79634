//! Scene Module
//! In-memory retained implementation of [`DrawingSurface`].
//!
//! The scene keeps nodes in append order. It resolves absolute positions
//! through group offsets and hit-tests pointer motion into enter/leave events.
//! It also steps opacity transitions on an explicit clock, so the GUI
//! viewer, the exporter and the tests all read the same node tree.

use crate::charts::surface::{
    DrawingSurface, NodeId, Point, PointerEvent, PointerHandler, PointerKind, Shape, Style,
};
use std::collections::HashMap;
use std::time::Duration;
use tracing::trace;

/// Extra pixels around a circle that still count as a hit.
const HIT_SLOP: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub shape: Shape,
    pub style: Style,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Transition {
    from: f32,
    to: f32,
    duration: Duration,
    elapsed: Duration,
}

impl Transition {
    fn value(&self) -> f32 {
        if self.duration.is_zero() {
            return self.to;
        }
        let t = (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0);
        self.from + (self.to - self.from) * t
    }

    fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[derive(Default)]
pub struct Scene {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    handlers: HashMap<(NodeId, PointerKind), Vec<PointerHandler>>,
    transitions: HashMap<NodeId, Transition>,
    hovered: Option<NodeId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Nodes in document order (parents before children, siblings in append order).
    pub fn iter(&self) -> impl Iterator<Item = &Node> + '_ {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if let Some(node) = self.node(id) {
                order.push(node);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order.into_iter()
    }

    pub fn find_by_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.iter().filter(move |n| n.style.has_class(class))
    }

    /// Sum of the group offsets above `id` (and of `id` itself, for groups).
    pub fn origin(&self, id: NodeId) -> Point {
        let mut origin = Point::ORIGIN;
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.node(c)) {
            if let Shape::Group { offset } = node.shape {
                origin = origin.offset(offset.x, offset.y);
            }
            current = node.parent;
        }
        origin
    }

    /// Effective opacity: own opacity multiplied by every ancestor's.
    pub fn effective_opacity(&self, id: NodeId) -> f32 {
        let mut opacity = 1.0;
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.node(c)) {
            opacity *= node.style.opacity;
            current = node.parent;
        }
        opacity
    }

    pub fn has_handlers(&self, id: NodeId) -> bool {
        self.handlers.contains_key(&(id, PointerKind::Enter))
            || self.handlers.contains_key(&(id, PointerKind::Leave))
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    pub fn is_animating(&self) -> bool {
        !self.transitions.is_empty()
    }

    /// Run the handlers bound to `node` for `event.kind`.
    pub fn dispatch(&mut self, node: NodeId, event: PointerEvent) {
        let key = (node, event.kind);
        let Some(mut handlers) = self.handlers.remove(&key) else {
            return;
        };
        trace!(node = node.0, kind = ?event.kind, "dispatching pointer event");

        for handler in handlers.iter_mut() {
            handler(&mut *self, &event);
        }

        // Handlers bound while dispatching run on the next event
        if let Some(added) = self.handlers.remove(&key) {
            handlers.extend(added);
        }
        self.handlers.insert(key, handlers);
    }

    /// Topmost interactive circle under `point`, if any.
    pub fn hit_test(&self, point: Point) -> Option<NodeId> {
        self.iter()
            .filter(|node| self.has_handlers(node.id))
            .filter(|node| match node.shape {
                Shape::Circle { center, radius } => {
                    let origin = self.origin(node.id);
                    let center = center.offset(origin.x, origin.y);
                    center.distance(point) <= radius + HIT_SLOP
                }
                _ => false,
            })
            .last()
            .map(|node| node.id)
    }

    /// Feed pointer motion (or `None` when the pointer left the surface) and
    /// emit enter/leave events for interactive nodes.
    pub fn pointer_moved(&mut self, position: Option<Point>) {
        let target = position.and_then(|p| self.hit_test(p));
        if target == self.hovered {
            return;
        }
        let at = position.unwrap_or(Point::ORIGIN);

        if let Some(previous) = self.hovered.take() {
            self.dispatch(
                previous,
                PointerEvent {
                    kind: PointerKind::Leave,
                    position: at,
                },
            );
        }
        if let Some(next) = target {
            self.hovered = Some(next);
            self.dispatch(
                next,
                PointerEvent {
                    kind: PointerKind::Enter,
                    position: at,
                },
            );
        }
    }

    /// Step every running transition by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        let mut finished = Vec::new();
        for (id, transition) in self.transitions.iter_mut() {
            transition.elapsed += dt;
            if let Some(node) = self.nodes.get_mut(id.0) {
                node.style.opacity = transition.value();
            }
            if transition.is_done() {
                finished.push(*id);
            }
        }
        for id in finished {
            self.transitions.remove(&id);
        }
    }
}

impl DrawingSurface for Scene {
    fn append(&mut self, parent: Option<NodeId>, shape: Shape) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = parent.filter(|p| p.0 < self.nodes.len());
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        self.nodes.push(Node {
            id,
            parent,
            children: Vec::new(),
            shape,
            style: Style::default(),
        });
        id
    }

    fn set_shape(&mut self, node: NodeId, shape: Shape) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.shape = shape;
        }
    }

    fn set_style(&mut self, node: NodeId, style: Style) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.style = style;
        }
    }

    fn on_pointer(&mut self, node: NodeId, kind: PointerKind, handler: PointerHandler) {
        self.handlers.entry((node, kind)).or_default().push(handler);
    }

    fn transition_opacity(&mut self, node: NodeId, target: f32, duration: Duration) {
        let Some(n) = self.nodes.get(node.0) else {
            return;
        };
        // A new transition interrupts the running one from its current value
        let transition = Transition {
            from: n.style.opacity,
            to: target,
            duration,
            elapsed: Duration::ZERO,
        };
        if duration.is_zero() {
            self.transitions.remove(&node);
            if let Some(n) = self.nodes.get_mut(node.0) {
                n.style.opacity = target;
            }
        } else {
            self.transitions.insert(node, transition);
        }
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
        self.handlers.clear();
        self.transitions.clear();
        self.hovered = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::surface::Color;
    use std::cell::Cell;
    use std::rc::Rc;

    fn circle(scene: &mut Scene, parent: Option<NodeId>, x: f64, y: f64) -> NodeId {
        scene.append(
            parent,
            Shape::Circle {
                center: Point::new(x, y),
                radius: 5.0,
            },
        )
    }

    #[test]
    fn test_document_order_and_origin() {
        let mut scene = Scene::new();
        let root = scene.append(
            None,
            Shape::Group {
                offset: Point::new(50.0, 50.0),
            },
        );
        let axis = scene.append(
            Some(root),
            Shape::Group {
                offset: Point::new(0.0, 400.0),
            },
        );
        let tick = scene.append(
            Some(axis),
            Shape::Line {
                from: Point::ORIGIN,
                to: Point::new(0.0, 6.0),
            },
        );
        let dot = circle(&mut scene, Some(root), 10.0, 10.0);
        let overlay = scene.append(None, Shape::Label { at: Point::ORIGIN, lines: vec![] });

        let order: Vec<NodeId> = scene.iter().map(|n| n.id).collect();
        assert_eq!(order, vec![root, axis, tick, dot, overlay]);
        assert_eq!(scene.origin(tick), Point::new(50.0, 450.0));
        assert_eq!(scene.origin(dot), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_find_by_class() {
        let mut scene = Scene::new();
        for x in [0.0, 10.0, 20.0] {
            let id = circle(&mut scene, None, x, 0.0);
            scene.set_style(id, Style::default().class("data-point").fill(Color::STEELBLUE));
        }
        circle(&mut scene, None, 30.0, 0.0);
        assert_eq!(scene.find_by_class("data-point").count(), 3);
    }

    #[test]
    fn test_pointer_enter_leave() {
        let mut scene = Scene::new();
        let dot = circle(&mut scene, None, 100.0, 100.0);
        let entered = Rc::new(Cell::new(0));
        let left = Rc::new(Cell::new(0));

        let counter = entered.clone();
        scene.on_pointer(dot, PointerKind::Enter, Box::new(move |_, _| counter.set(counter.get() + 1)));
        let counter = left.clone();
        scene.on_pointer(dot, PointerKind::Leave, Box::new(move |_, _| counter.set(counter.get() + 1)));

        scene.pointer_moved(Some(Point::new(0.0, 0.0)));
        assert_eq!(entered.get(), 0);

        scene.pointer_moved(Some(Point::new(102.0, 101.0)));
        scene.pointer_moved(Some(Point::new(101.0, 101.0)));
        assert_eq!(entered.get(), 1);
        assert_eq!(scene.hovered(), Some(dot));

        scene.pointer_moved(None);
        assert_eq!(left.get(), 1);
        assert_eq!(scene.hovered(), None);
    }

    #[test]
    fn test_handler_can_restyle_other_nodes() {
        let mut scene = Scene::new();
        let dot = circle(&mut scene, None, 0.0, 0.0);
        let tip = scene.append(None, Shape::Label { at: Point::ORIGIN, lines: vec![] });

        scene.on_pointer(
            dot,
            PointerKind::Enter,
            Box::new(move |surface: &mut dyn DrawingSurface, event: &PointerEvent| {
                surface.set_shape(
                    tip,
                    Shape::Label {
                        at: event.position,
                        lines: vec!["hello".to_string()],
                    },
                );
            }),
        );
        scene.dispatch(
            dot,
            PointerEvent {
                kind: PointerKind::Enter,
                position: Point::new(3.0, 4.0),
            },
        );

        let shape = &scene.node(tip).unwrap().shape;
        assert_eq!(
            shape,
            &Shape::Label {
                at: Point::new(3.0, 4.0),
                lines: vec!["hello".to_string()]
            }
        );
    }

    #[test]
    fn test_opacity_transition() {
        let mut scene = Scene::new();
        let tip = scene.append_styled(None, Shape::Label { at: Point::ORIGIN, lines: vec![] }, Style::default().opacity(0.0));

        scene.transition_opacity(tip, 0.8, Duration::from_millis(200));
        scene.advance(Duration::from_millis(100));
        let halfway = scene.node(tip).unwrap().style.opacity;
        assert!((halfway - 0.4).abs() < 1e-4);
        assert!(scene.is_animating());

        scene.advance(Duration::from_millis(150));
        assert_eq!(scene.node(tip).unwrap().style.opacity, 0.8);
        assert!(!scene.is_animating());
    }

    #[test]
    fn test_transition_interrupts_running_one() {
        let mut scene = Scene::new();
        let tip = scene.append_styled(None, Shape::Label { at: Point::ORIGIN, lines: vec![] }, Style::default().opacity(0.0));

        scene.transition_opacity(tip, 1.0, Duration::from_millis(200));
        scene.advance(Duration::from_millis(100));
        scene.transition_opacity(tip, 0.0, Duration::from_millis(500));
        scene.advance(Duration::from_millis(250));

        let opacity = scene.node(tip).unwrap().style.opacity;
        assert!((opacity - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_clear() {
        let mut scene = Scene::new();
        let dot = circle(&mut scene, None, 0.0, 0.0);
        scene.on_pointer(dot, PointerKind::Enter, Box::new(|_, _| {}));
        scene.clear();

        assert!(scene.is_empty());
        assert!(!scene.has_handlers(dot));
        assert_eq!(scene.iter().count(), 0);
    }
}
