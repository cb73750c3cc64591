//! Editing session over a single room polygon.
//!
//! Mirrors the canvas interactions: click to place points while drawing,
//! drag an edge midpoint to split the edge, drag a vertex to move it, remove
//! a vertex, or drag the whole room. Every placed point goes through
//! [`apply_snapping`]; angle snapping is opt-in per interaction.

use super::snapping::{apply_snapping, SnappingConfig};
use super::{Point, RoomShape, MIN_ROOM_POINTS};
use crate::error::ValidationError;

/// Result of placing a point while drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    /// Fewer than three points so far.
    Continue,
    /// The polygon has enough points; drawing mode ends.
    Complete,
}

#[derive(Debug, Clone)]
pub struct PolygonEditor {
    shape: RoomShape,
    snapping: SnappingConfig,
}

fn out_of_bounds(index: usize, len: usize) -> ValidationError {
    ValidationError::OutOfBounds {
        collection: "room points".into(),
        index,
        len,
    }
}

impl PolygonEditor {
    /// Edit an existing outline.
    pub fn new(shape: RoomShape, snapping: SnappingConfig) -> Self {
        Self { shape, snapping }
    }

    /// Start drawing a new room with no points.
    pub fn draw(id: impl Into<String>, name: impl Into<String>, snapping: SnappingConfig) -> Self {
        Self::new(
            RoomShape {
                id: id.into(),
                name: name.into(),
                points: Vec::new(),
            },
            snapping,
        )
    }

    pub fn shape(&self) -> &RoomShape {
        &self.shape
    }

    pub fn points(&self) -> &[Point] {
        &self.shape.points
    }

    fn snap(
        &self,
        raw: Point,
        anchor: Option<Point>,
        angle_snap: bool,
    ) -> Result<Point, ValidationError> {
        if !raw.is_valid() {
            return Err(ValidationError::InvalidValue {
                field: "point".into(),
                message: format!("({}, {}) lies outside the floor plan", raw.x, raw.y),
            });
        }
        Ok(apply_snapping(raw, anchor.as_ref(), &self.snapping.with_angle(angle_snap)))
    }

    /// Place the next point of a room being drawn, anchored on the last one.
    pub fn add_point(
        &mut self,
        raw: Point,
        angle_snap: bool,
    ) -> Result<DrawOutcome, ValidationError> {
        let anchor = self.shape.points.last().copied();
        let point = self.snap(raw, anchor, angle_snap)?;
        self.shape.points.push(point);
        if self.shape.points.len() >= MIN_ROOM_POINTS {
            Ok(DrawOutcome::Complete)
        } else {
            Ok(DrawOutcome::Continue)
        }
    }

    fn edge_count(&self) -> usize {
        let n = self.shape.points.len();
        if n >= MIN_ROOM_POINTS {
            n
        } else {
            n.saturating_sub(1)
        }
    }

    /// Midpoint of every edge, keyed by the index of the edge's first point.
    /// The closing edge from the last point back to the first is included.
    pub fn edge_midpoints(&self) -> Vec<(usize, Point)> {
        let pts = &self.shape.points;
        (0..self.edge_count())
            .map(|i| (i, pts[i].midpoint(&pts[(i + 1) % pts.len()])))
            .collect()
    }

    /// Split edge `edge` by inserting a point after its first vertex.
    ///
    /// Without a `target` the exact midpoint is inserted; with one, the
    /// dragged position is snapped relative to the edge's first vertex.
    /// Returns the index of the new point.
    pub fn insert_midpoint(
        &mut self,
        edge: usize,
        target: Option<Point>,
        angle_snap: bool,
    ) -> Result<usize, ValidationError> {
        let edges = self.edge_count();
        if edge >= edges {
            return Err(out_of_bounds(edge, edges));
        }
        let pts = &self.shape.points;
        let start = pts[edge];
        let point = match target {
            Some(raw) => self.snap(raw, Some(start), angle_snap)?,
            None => start.midpoint(&pts[(edge + 1) % pts.len()]),
        };
        self.shape.points.insert(edge + 1, point);
        Ok(edge + 1)
    }

    /// Move one vertex, snapping relative to the previous vertex.
    pub fn move_point(
        &mut self,
        index: usize,
        raw: Point,
        angle_snap: bool,
    ) -> Result<Point, ValidationError> {
        let len = self.shape.points.len();
        if index >= len {
            return Err(out_of_bounds(index, len));
        }
        let prev = if index == 0 { len - 1 } else { index - 1 };
        let anchor = (prev != index).then(|| self.shape.points[prev]);
        let point = self.snap(raw, anchor, angle_snap)?;
        self.shape.points[index] = point;
        Ok(point)
    }

    /// Remove a vertex. Refused when the room would drop below three points.
    pub fn remove_point(&mut self, index: usize) -> Result<Point, ValidationError> {
        let len = self.shape.points.len();
        if index >= len {
            return Err(out_of_bounds(index, len));
        }
        if len <= MIN_ROOM_POINTS {
            return Err(ValidationError::InvalidValue {
                field: "room points".into(),
                message: format!("A room must have at least {MIN_ROOM_POINTS} points"),
            });
        }
        Ok(self.shape.points.remove(index))
    }

    /// Drag the whole room. Each point is clamped independently, so a room
    /// pushed against an edge flattens rather than leaving the plan.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        for p in &mut self.shape.points {
            *p = Point::new(p.x + dx, p.y + dy).clamped();
        }
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.shape.name = name.into();
    }

    /// End the session, returning the outline if it is a valid room.
    pub fn finish(self) -> Result<RoomShape, ValidationError> {
        self.shape.validate()?;
        Ok(self.shape)
    }
}
