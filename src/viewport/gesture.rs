use crate::model::Point;

/// One live touch in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TouchGesture {
    #[default]
    Idle,
    /// `anchor` is the touch position minus the pan at the moment panning began.
    Panning { anchor: Point },
    Pinching { last_distance: f64, last_midpoint: Point },
}

impl TouchGesture {
    pub fn is_pinching(&self) -> bool {
        matches!(self, Self::Pinching { .. })
    }
}

/// Distance and midpoint of the first two touches.
pub(super) fn pinch_metrics(touches: &[TouchPoint]) -> Option<(f64, Point)> {
    let [first, second, ..] = touches else {
        return None;
    };
    let (a, b) = (first.position(), second.position());
    Some((a.distance(b), a.midpoint(b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_need_two_touches() {
        assert_eq!(pinch_metrics(&[TouchPoint::new(1, 0.0, 0.0)]), None);
        let (distance, midpoint) = pinch_metrics(&[
            TouchPoint::new(1, 0.0, 0.0),
            TouchPoint::new(2, 30.0, 40.0),
            TouchPoint::new(3, 999.0, 999.0),
        ])
        .unwrap();
        assert_eq!(distance, 50.0);
        assert_eq!(midpoint, Point::new(15.0, 20.0));
    }
}
