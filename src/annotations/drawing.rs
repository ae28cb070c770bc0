//! Shape drawing state machine
//!
//! Rectangles and circles are drawn by dragging; polylines by clicking points
//! and then finishing. A finished shape waits for a name, then for its crop.
//!
//! ```text
//! Idle -> Drawing  -> PendingName -> AwaitingCrop -> Idle
//! Idle -> Tracing  -> PendingName
//! any  -> Idle     (cancel, too small, too few points)
//! ```

use crate::config::ShapeTool;
use crate::domain::{Bounds, MIN_POLYLINE_POINTS, Point, RegionShape};
use crate::error::{Result, TagError};

/// Shapes drawn by dragging from a start point
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragKind {
    Rectangle,
    Circle,
}

impl DragKind {
    fn from_tool(tool: ShapeTool) -> Option<Self> {
        match tool {
            ShapeTool::Rectangle => Some(DragKind::Rectangle),
            ShapeTool::Circle => Some(DragKind::Circle),
            ShapeTool::Polyline => None,
        }
    }

    /// Shape spanned by a drag; circles are centered on the start point
    fn shape(self, start: Point, end: Point) -> RegionShape {
        match self {
            DragKind::Rectangle => RegionShape::rectangle(Bounds::from_corners(start, end)),
            DragKind::Circle => RegionShape::circle(start, start.distance(end)),
        }
    }

    /// Whether a drag is large enough to be deliberate
    fn exceeds(self, start: Point, end: Point, min_size: f32) -> bool {
        match self {
            DragKind::Rectangle => {
                (end.x - start.x).abs() > min_size && (end.y - start.y).abs() > min_size
            }
            DragKind::Circle => start.distance(end) > min_size,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DrawState {
    #[default]
    Idle,
    /// Rectangle or circle drag in progress
    Drawing {
        kind: DragKind,
        start: Point,
        current: Point,
    },
    /// Polyline points clicked so far
    Tracing {
        points: Vec<Point>,
        hover: Option<Point>,
    },
    /// Finished shape waiting for a non-empty name
    PendingName { shape: RegionShape },
    /// Named shape whose crop has not resolved yet
    AwaitingCrop { shape: RegionShape, name: String },
}

/// What a pointer or gesture did to the draft
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// Nothing changed
    Ignored,
    /// Draft changed, preview needs a repaint
    Updated,
    /// Draft finished and now needs a name
    NeedsName,
    /// Draft dropped without committing anything
    Discarded,
}

impl DrawOutcome {
    pub fn needs_repaint(self) -> bool {
        !matches!(self, DrawOutcome::Ignored)
    }
}

#[derive(Clone, Debug)]
pub struct ShapeDrawer {
    tool: ShapeTool,
    min_size: f32,
    state: DrawState,
}

impl ShapeDrawer {
    pub fn new(tool: ShapeTool, min_size: f32) -> Self {
        Self {
            tool,
            min_size,
            state: DrawState::Idle,
        }
    }

    pub fn tool(&self) -> ShapeTool {
        self.tool
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == DrawState::Idle
    }

    /// Switch tool, dropping any draft
    pub fn set_tool(&mut self, tool: ShapeTool) -> DrawOutcome {
        self.tool = tool;
        self.reset()
    }

    pub fn pointer_down(&mut self, p: Point) -> DrawOutcome {
        match &mut self.state {
            DrawState::Idle => {
                self.state = match DragKind::from_tool(self.tool) {
                    Some(kind) => DrawState::Drawing {
                        kind,
                        start: p,
                        current: p,
                    },
                    None => DrawState::Tracing {
                        points: vec![p],
                        hover: None,
                    },
                };
                DrawOutcome::Updated
            }
            DrawState::Tracing { points, .. } => {
                // A double-click delivers the same point twice
                if points.last() == Some(&p) {
                    return DrawOutcome::Ignored;
                }
                points.push(p);
                DrawOutcome::Updated
            }
            _ => DrawOutcome::Ignored,
        }
    }

    pub fn pointer_move(&mut self, p: Point) -> DrawOutcome {
        match &mut self.state {
            DrawState::Drawing { current, .. } => {
                *current = p;
                DrawOutcome::Updated
            }
            DrawState::Tracing { hover, .. } => {
                *hover = Some(p);
                DrawOutcome::Updated
            }
            _ => DrawOutcome::Ignored,
        }
    }

    pub fn pointer_up(&mut self, p: Point) -> DrawOutcome {
        let DrawState::Drawing { kind, start, .. } = self.state else {
            return DrawOutcome::Ignored;
        };

        if kind.exceeds(start, p, self.min_size) {
            self.state = DrawState::PendingName {
                shape: kind.shape(start, p),
            };
            DrawOutcome::NeedsName
        } else {
            log::debug!("Discarding {kind:?} drag below {} units", self.min_size);
            self.state = DrawState::Idle;
            DrawOutcome::Discarded
        }
    }

    /// Close the traced polyline
    pub fn finish(&mut self) -> DrawOutcome {
        let DrawState::Tracing { points, .. } = &mut self.state else {
            return DrawOutcome::Ignored;
        };

        if points.len() < MIN_POLYLINE_POINTS {
            log::debug!("Discarding polyline with {} points", points.len());
            self.state = DrawState::Idle;
            return DrawOutcome::Discarded;
        }

        let points = std::mem::take(points);
        self.state = DrawState::PendingName {
            shape: RegionShape::polyline(points),
        };
        DrawOutcome::NeedsName
    }

    /// Drop whatever is in progress
    pub fn cancel(&mut self) -> DrawOutcome {
        self.reset()
    }

    /// Back to idle; reports `Discarded` if there was a draft
    pub fn reset(&mut self) -> DrawOutcome {
        if self.is_idle() {
            DrawOutcome::Ignored
        } else {
            self.state = DrawState::Idle;
            DrawOutcome::Discarded
        }
    }

    /// Shape to draw on top of the committed regions, if any
    pub fn preview(&self) -> Option<RegionShape> {
        match &self.state {
            DrawState::Idle => None,
            DrawState::Drawing {
                kind,
                start,
                current,
            } => Some(kind.shape(*start, *current)),
            DrawState::Tracing { points, hover } => {
                let mut outline = points.clone();
                outline.extend(*hover);
                Some(RegionShape::polyline(outline))
            }
            DrawState::PendingName { shape } | DrawState::AwaitingCrop { shape, .. } => {
                Some(shape.clone())
            }
        }
    }

    /// Whether `name` would be accepted right now (the commit button state)
    pub fn can_confirm(&self, name: &str) -> bool {
        matches!(self.state, DrawState::PendingName { .. }) && !name.trim().is_empty()
    }

    /// Accept a name and move to awaiting the crop
    ///
    /// Returns the shape to crop and the trimmed name. An empty name leaves the
    /// draft waiting for a name.
    pub fn begin_crop(&mut self, name: &str) -> Result<(RegionShape, String)> {
        let DrawState::PendingName { shape } = &self.state else {
            return Err(TagError::NothingPending);
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(TagError::EmptyName);
        }

        let shape = shape.clone();
        self.state = DrawState::AwaitingCrop {
            shape: shape.clone(),
            name: name.to_string(),
        };
        Ok((shape, name.to_string()))
    }

    /// The crop for the awaited shape resolved (either way)
    pub fn crop_resolved(&mut self) {
        if matches!(self.state, DrawState::AwaitingCrop { .. }) {
            self.state = DrawState::Idle;
        }
    }
}
