use crate::model::Point;

/// Soft pairwise separation for documents sharing a space. Pinned entries never move;
/// when only one side of a pair is pinned the other side takes the push alone.
/// A pass that would raise the worst overlap is rolled back and relaxation stops.
pub(super) fn relax_positions(
    positions: &mut [Point],
    pinned: &[bool],
    min_distance: f64,
    passes: usize,
) {
    if positions.len() < 2 || min_distance <= 0.0 {
        return;
    }

    let mut overlap = max_overlap(positions, min_distance);
    for _ in 0..passes {
        let snapshot = positions.to_vec();
        relax_pass(positions, pinned, min_distance);

        let relaxed = max_overlap(positions, min_distance);
        if relaxed > overlap {
            positions.copy_from_slice(&snapshot);
            break;
        }
        overlap = relaxed;
    }
}

fn relax_pass(positions: &mut [Point], pinned: &[bool], min_distance: f64) {
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let delta = positions[j] - positions[i];
            let distance = delta.length();
            if distance >= min_distance {
                continue;
            }

            let norm = if distance == 0.0 { 1.0 } else { distance };
            let damping = (distance / min_distance).clamp(0.1, 1.0);
            let push = (min_distance - distance) / 8.0 * damping * 0.5;
            let step = Point::new(delta.x / norm * push, delta.y / norm * push);

            let pin_i = pinned.get(i).copied().unwrap_or(false);
            let pin_j = pinned.get(j).copied().unwrap_or(false);
            match (pin_i, pin_j) {
                (false, false) => {
                    positions[i] = positions[i] - step;
                    positions[j] = positions[j] + step;
                }
                (true, false) => positions[j] = positions[j] + step + step,
                (false, true) => positions[i] = positions[i] - step - step,
                (true, true) => {}
            }
        }
    }
}

fn max_overlap(positions: &[Point], min_distance: f64) -> f64 {
    let mut overlap: f64 = 0.0;
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            overlap = overlap.max(min_distance - positions[i].distance(positions[j]));
        }
    }
    overlap.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_pair_moves_apart_symmetrically() {
        let mut positions = [Point::new(0.0, 0.0), Point::new(450.0, 0.0)];
        relax_positions(&mut positions, &[false, false], 900.0, 1);

        let push = (900.0 - 450.0) / 8.0 * 0.5 * 0.5;
        assert!((positions[0].x + push).abs() < 1e-9);
        assert!((positions[1].x - 450.0 - push).abs() < 1e-9);
        assert_eq!(positions[0].y, 0.0);
    }

    #[test]
    fn coincident_nodes_stay_finite() {
        let mut positions = [Point::new(5.0, 5.0), Point::new(5.0, 5.0)];
        relax_positions(&mut positions, &[false, false], 900.0, 2);
        assert!(positions.iter().all(|point| point.is_finite()));
    }

    #[test]
    fn pinned_nodes_hold_position() {
        let mut positions = [Point::new(0.0, 0.0), Point::new(300.0, 0.0)];
        relax_positions(&mut positions, &[true, false], 900.0, 2);
        assert_eq!(positions[0], Point::new(0.0, 0.0));
        assert!(positions[1].x > 300.0);
    }

    #[test]
    fn relaxation_never_increases_overlap() {
        let mut positions = [
            Point::new(0.0, 0.0),
            Point::new(400.0, 0.0),
            Point::new(200.0, 300.0),
            Point::new(900.0, 100.0),
        ];
        let before = max_overlap(&positions, 900.0);
        relax_positions(&mut positions, &[false; 4], 900.0, 2);
        assert!(max_overlap(&positions, 900.0) <= before);
    }

    #[test]
    fn free_node_between_two_pins_does_not_get_worse() {
        let mut positions = [
            Point::new(-100.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(100.0, 0.0),
        ];
        let before = max_overlap(&positions, 900.0);
        relax_positions(&mut positions, &[true, false, true], 900.0, 2);

        assert_eq!(positions[0], Point::new(-100.0, 0.0));
        assert_eq!(positions[2], Point::new(100.0, 0.0));
        assert!(max_overlap(&positions, 900.0) <= before);
    }

    #[test]
    fn distant_nodes_are_untouched() {
        let mut positions = [Point::new(0.0, 0.0), Point::new(1000.0, 0.0)];
        relax_positions(&mut positions, &[false, false], 900.0, 2);
        assert_eq!(positions, [Point::new(0.0, 0.0), Point::new(1000.0, 0.0)]);
    }
}
