use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Self) -> f64 {
        (other - self).length()
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned world-space rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl WorldBounds {
    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.max_x.is_finite()
            && self.min_y.is_finite()
            && self.max_y.is_finite()
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }

    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            max_x: self.max_x + margin,
            min_y: self.min_y - margin,
            max_y: self.max_y + margin,
        }
    }

    pub fn intersects_circle(&self, center: Point, radius: f64) -> bool {
        center.x + radius >= self.min_x
            && center.x - radius <= self.max_x
            && center.y + radius >= self.min_y
            && center.y - radius <= self.max_y
    }

    /// Clips the segment against each slab in turn; it is visible while the
    /// entry parameter stays below the exit parameter.
    pub fn intersects_segment(&self, start: Point, end: Point) -> bool {
        let delta = end - start;
        let mut enter: f64 = 0.0;
        let mut exit: f64 = 1.0;

        for (direction, room) in [
            (-delta.x, start.x - self.min_x),
            (delta.x, self.max_x - start.x),
            (-delta.y, start.y - self.min_y),
            (delta.y, self.max_y - start.y),
        ] {
            if direction == 0.0 {
                if room < 0.0 {
                    return false;
                }
                continue;
            }

            let t = room / direction;
            if direction < 0.0 {
                enter = enter.max(t);
            } else {
                exit = exit.min(t);
            }
            if enter > exit {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> WorldBounds {
        WorldBounds {
            min_x: 0.0,
            max_x: 100.0,
            min_y: 0.0,
            max_y: 50.0,
        }
    }

    #[test]
    fn segment_crossing_without_endpoints_inside_is_visible() {
        let view = bounds();
        assert!(view.intersects_segment(Point::new(-20.0, 25.0), Point::new(140.0, 25.0)));
        assert!(view.intersects_segment(Point::new(50.0, -10.0), Point::new(50.0, 90.0)));
        assert!(view.intersects_segment(Point::new(10.0, 10.0), Point::new(20.0, 20.0)));
    }

    #[test]
    fn segment_outside_is_culled() {
        let view = bounds();
        assert!(!view.intersects_segment(Point::new(-20.0, 60.0), Point::new(140.0, 70.0)));
        assert!(!view.intersects_segment(Point::new(-30.0, 40.0), Point::new(10.0, 80.0)));
        assert!(!view.intersects_segment(Point::new(120.0, 10.0), Point::new(120.0, 40.0)));
    }

    #[test]
    fn circle_overlapping_edge_is_visible() {
        let view = bounds();
        assert!(view.intersects_circle(Point::new(-5.0, 25.0), 6.0));
        assert!(!view.intersects_circle(Point::new(-5.0, 25.0), 4.0));
        assert!(view.expanded(2.0).intersects_circle(Point::new(-5.0, 25.0), 4.0));
    }
}
