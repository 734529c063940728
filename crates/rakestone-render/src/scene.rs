//! In-memory scene graph implementing [`RenderEngine`].

use crate::SceneError;
use crate::tween::Tween;
use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use rakestone_core::{Cursor, DrawableId, Easing, RenderEngine, SerializableColor};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// What a node draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Container,
    Rect {
        /// Geometry in the node's local coordinates.
        rect: Rect,
        stroke: SerializableColor,
        fill: SerializableColor,
    },
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    position: Point,
    cursor: Cursor,
    parent: Option<DrawableId>,
    /// Back to front.
    children: Vec<DrawableId>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            position: Point::ZERO,
            cursor: Cursor::Default,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Serializable view of a node and its subtree.
#[derive(Debug, Clone, Serialize)]
pub struct NodeSnapshot {
    pub id: DrawableId,
    #[serde(flatten)]
    pub kind: NodeKind,
    pub position: Point,
    pub cursor: Cursor,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

/// A headless scene engine.
///
/// Keeps a tree of containers and rectangles rooted at the stage, runs
/// tweens, and coalesces redraw requests into at most one frame per tick.
#[derive(Debug, Clone)]
pub struct SceneEngine {
    nodes: HashMap<DrawableId, Node>,
    stage: DrawableId,
    next_id: u64,
    tweens: HashMap<DrawableId, Tween>,
    redraw_requested: bool,
    frames_rendered: u64,
}

impl Default for SceneEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneEngine {
    /// Create an engine holding only an empty stage.
    pub fn new() -> Self {
        let stage = DrawableId(0);
        let mut nodes = HashMap::new();
        nodes.insert(stage, Node::new(NodeKind::Container));
        Self {
            nodes,
            stage,
            next_id: 1,
            tweens: HashMap::new(),
            redraw_requested: false,
            frames_rendered: 0,
        }
    }

    fn insert(&mut self, kind: NodeKind) -> DrawableId {
        let id = DrawableId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node::new(kind));
        id
    }

    fn node(&self, id: DrawableId) -> Result<&Node, SceneError> {
        self.nodes.get(&id).ok_or(SceneError::UnknownDrawable(id))
    }

    /// Advance animations by `elapsed` and render a frame if anything changed.
    ///
    /// Returns whether a frame was rendered.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        let animating = !self.tweens.is_empty();
        for (id, tween) in self.tweens.iter_mut() {
            let position = tween.advance(elapsed);
            if let Some(node) = self.nodes.get_mut(id) {
                node.position = position;
            }
        }
        self.tweens.retain(|_, tween| !tween.is_finished());

        if animating || self.redraw_requested {
            self.redraw_requested = false;
            self.frames_rendered += 1;
            log::trace!("Frame {}", self.frames_rendered);
            true
        } else {
            false
        }
    }

    /// Tick at `interval` until animations finish and no redraw is pending.
    ///
    /// Gives up after `max_ticks`. Returns the number of ticks run.
    pub fn run_until_idle(&mut self, interval: Duration, max_ticks: u32) -> u32 {
        let mut ticks = 0;
        while ticks < max_ticks && (self.is_animating() || self.redraw_requested) {
            self.tick(interval);
            ticks += 1;
        }
        ticks
    }

    pub fn is_animating(&self) -> bool {
        !self.tweens.is_empty()
    }

    pub fn redraw_pending(&self) -> bool {
        self.redraw_requested
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Number of live drawables, the stage included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, id: DrawableId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Position relative to the parent.
    pub fn position(&self, id: DrawableId) -> Result<Point, SceneError> {
        Ok(self.node(id)?.position)
    }

    /// Position in stage coordinates.
    pub fn world_position(&self, id: DrawableId) -> Result<Point, SceneError> {
        let mut node = self.node(id)?;
        let mut offset = node.position.to_vec2();
        while let Some(parent) = node.parent {
            node = self.node(parent)?;
            offset += node.position.to_vec2();
        }
        Ok(offset.to_point())
    }

    /// Children back to front.
    pub fn children(&self, id: DrawableId) -> Result<&[DrawableId], SceneError> {
        Ok(&self.node(id)?.children)
    }

    pub fn parent(&self, id: DrawableId) -> Result<Option<DrawableId>, SceneError> {
        Ok(self.node(id)?.parent)
    }

    pub fn cursor(&self, id: DrawableId) -> Result<Cursor, SceneError> {
        Ok(self.node(id)?.cursor)
    }

    pub fn kind(&self, id: DrawableId) -> Result<NodeKind, SceneError> {
        Ok(self.node(id)?.kind)
    }

    /// Where a drawable will end up once its tween finishes.
    pub fn resting_position(&self, id: DrawableId) -> Result<Point, SceneError> {
        match self.tweens.get(&id) {
            Some(tween) => Ok(tween.target()),
            None => self.position(id),
        }
    }

    /// Topmost rectangle under a stage point.
    pub fn hit_test(&self, point: Point) -> Option<DrawableId> {
        self.hit_test_in(self.stage, point, Vec2::ZERO)
    }

    fn hit_test_in(&self, id: DrawableId, point: Point, offset: Vec2) -> Option<DrawableId> {
        let node = self.nodes.get(&id)?;
        let offset = offset + node.position.to_vec2();
        // Front to back.
        for &child in node.children.iter().rev() {
            if let Some(hit) = self.hit_test_in(child, point, offset) {
                return Some(hit);
            }
        }
        match node.kind {
            NodeKind::Rect { rect, .. } => {
                // Edges inclusive on all sides.
                let b = rect + offset;
                (point.x >= b.x0 && point.x <= b.x1 && point.y >= b.y0 && point.y <= b.y1)
                    .then_some(id)
            }
            _ => None,
        }
    }

    /// Snapshot of the whole scene.
    pub fn describe(&self) -> Result<NodeSnapshot, SceneError> {
        self.describe_node(self.stage)
    }

    fn describe_node(&self, id: DrawableId) -> Result<NodeSnapshot, SceneError> {
        let node = self.node(id)?;
        let children = node
            .children
            .iter()
            .map(|&child| self.describe_node(child))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(NodeSnapshot {
            id,
            kind: node.kind,
            position: node.position,
            cursor: node.cursor,
            children,
        })
    }

    fn detach(&mut self, child: DrawableId) {
        let Some(parent) = self.nodes.get_mut(&child).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(&parent) {
            parent.children.retain(|&c| c != child);
        }
    }

    fn destroy_subtree(&mut self, id: DrawableId) {
        if let Some(node) = self.nodes.remove(&id) {
            self.tweens.remove(&id);
            for child in node.children {
                self.destroy_subtree(child);
            }
        }
    }
}

impl RenderEngine for SceneEngine {
    fn stage(&self) -> DrawableId {
        self.stage
    }

    fn create_rect(&mut self, rect: Rect, stroke: Color, fill: Color) -> DrawableId {
        self.insert(NodeKind::Rect {
            rect,
            stroke: stroke.into(),
            fill: fill.into(),
        })
    }

    fn create_container(&mut self) -> DrawableId {
        self.insert(NodeKind::Container)
    }

    fn attach_child(&mut self, parent: DrawableId, child: DrawableId) {
        if !self.nodes.contains_key(&parent) || !self.nodes.contains_key(&child) {
            log::warn!("Cannot attach {child} to {parent}: unknown drawable");
            return;
        }
        self.detach(child);
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
    }

    fn remove_child(&mut self, parent: DrawableId, child: DrawableId) {
        if self.nodes.get(&child).and_then(|n| n.parent) != Some(parent) {
            log::warn!("{child} is not a child of {parent}");
            return;
        }
        self.detach(child);
        self.destroy_subtree(child);
    }

    fn reorder_child_to_top(&mut self, container: DrawableId, child: DrawableId) {
        let Some(node) = self.nodes.get_mut(&container) else {
            log::warn!("Cannot reorder in unknown container {container}");
            return;
        };
        if let Some(index) = node.children.iter().position(|&c| c == child) {
            let id = node.children.remove(index);
            node.children.push(id);
        }
    }

    fn set_position(&mut self, drawable: DrawableId, position: Point) {
        self.tweens.remove(&drawable);
        match self.nodes.get_mut(&drawable) {
            Some(node) => node.position = position,
            None => log::warn!("Cannot position unknown drawable {drawable}"),
        }
    }

    fn drawn_position(&self, drawable: DrawableId) -> Option<Point> {
        self.nodes.get(&drawable).map(|node| node.position)
    }

    fn schedule_animated_move(
        &mut self,
        drawable: DrawableId,
        target: Point,
        duration: Duration,
        easing: Easing,
    ) {
        let Some(node) = self.nodes.get(&drawable) else {
            log::warn!("Cannot animate unknown drawable {drawable}");
            return;
        };
        let tween = Tween::new(node.position, target, duration, easing);
        self.tweens.insert(drawable, tween);
    }

    fn set_cursor(&mut self, drawable: DrawableId, cursor: Cursor) {
        if let Some(node) = self.nodes.get_mut(&drawable) {
            node.cursor = cursor;
        }
    }

    fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }
}
