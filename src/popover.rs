//! Screen placement for the node detail overlay.

use crate::model::Point;

const GAP: f64 = 24.0;
const EDGE_MARGIN: f64 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quadrant {
    Right,
    Left,
    Below,
    Above,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopoverPlacement {
    /// Top-left corner in container coordinates.
    pub x: f64,
    pub y: f64,
    pub quadrant: Quadrant,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PopoverPresenter;

impl PopoverPresenter {
    /// Places a `popover`-sized box beside a node drawn at `anchor` with `radius` pixels,
    /// preferring right, left, below, then above.
    pub fn place(&self, anchor: Point, radius: f64, container: Size, popover: Size) -> PopoverPlacement {
        let reach = radius.max(0.0) + GAP;
        let room = [
            (Quadrant::Right, container.width - (anchor.x + reach), popover.width),
            (Quadrant::Left, anchor.x - reach, popover.width),
            (Quadrant::Below, container.height - (anchor.y + reach), popover.height),
            (Quadrant::Above, anchor.y - reach, popover.height),
        ];

        let quadrant = room
            .iter()
            .find(|(_, space, needed)| space >= needed)
            .or_else(|| room.iter().max_by(|a, b| a.1.total_cmp(&b.1)))
            .map(|(quadrant, ..)| *quadrant)
            .unwrap_or(Quadrant::Right);

        let (x, y) = match quadrant {
            Quadrant::Right => (anchor.x + reach, anchor.y - popover.height / 2.0),
            Quadrant::Left => (anchor.x - reach - popover.width, anchor.y - popover.height / 2.0),
            Quadrant::Below => (anchor.x - popover.width / 2.0, anchor.y + reach),
            Quadrant::Above => (anchor.x - popover.width / 2.0, anchor.y - reach - popover.height),
        };

        PopoverPlacement {
            x: clamp_inside(x, popover.width, container.width),
            y: clamp_inside(y, popover.height, container.height),
            quadrant,
        }
    }
}

fn clamp_inside(start: f64, extent: f64, available: f64) -> f64 {
    let max = available - extent - EDGE_MARGIN;
    start.min(max).max(EDGE_MARGIN)
}
