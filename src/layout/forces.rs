use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use super::quadtree::Quadtree;

/// Distances below this are treated as this for every force.
pub(super) const MIN_DISTANCE: f32 = 1.0;

/// Unit vector from `b` to `a`, with a stable fallback when they coincide.
fn separation(delta: Vec2, distance: f32, a: usize, b: usize) -> Vec2 {
    if distance > 0.0001 {
        delta / distance
    } else {
        let angle = ((a as f32) * 0.618_034 + (b as f32) * 0.414_214) * TAU;
        vec2(angle.cos(), angle.sin())
    }
}

pub(super) fn accumulate_gravity(
    positions: &[Vec2],
    pinned: &[bool],
    center: Vec2,
    strength: f32,
    forces: &mut [Vec2],
) {
    for ((position, force), &is_pinned) in positions.iter().zip(forces.iter_mut()).zip(pinned) {
        if !is_pinned {
            *force += (center - *position) * strength;
        }
    }
}

/// Inverse-square repulsion over every unordered pair. `strength` is the already
/// alpha-scaled magnitude; the caller negates the configured constant.
pub(super) fn accumulate_repulsion_exact(positions: &[Vec2], strength: f32, forces: &mut [Vec2]) {
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let delta = positions[i] - positions[j];
            let length = delta.length();
            let distance = length.max(MIN_DISTANCE);
            let push = separation(delta, length, i, j) * (strength / (distance * distance));
            forces[i] += push;
            forces[j] -= push;
        }
    }
}

/// Barnes-Hut repulsion on one point. A cell that does not contain the point and
/// looks smaller than `theta` from it acts as a single body at its mass center.
pub(super) fn accumulate_repulsion_for_node(
    tree: &Quadtree,
    index: usize,
    positions: &[Vec2],
    strength: f32,
    theta: f32,
    force: &mut Vec2,
) {
    let point = positions[index];
    let mut pending = vec![tree.root()];

    while let Some(cell) = pending.pop() {
        if cell.mass <= 0.0 {
            continue;
        }

        if cell.is_leaf() {
            for &other in cell.members.iter().filter(|&&other| other != index) {
                let delta = point - positions[other];
                let length = delta.length();
                let distance = length.max(MIN_DISTANCE);
                *force +=
                    separation(delta, length, index, other) * (strength / (distance * distance));
            }
            continue;
        }

        let delta = point - cell.mass_center;
        let distance = delta.length().max(MIN_DISTANCE);
        let far_enough = !cell.square.contains(point) && cell.square.side() / distance < theta;
        if far_enough && cell.mass > 1.0 {
            *force += (delta / distance) * (strength * cell.mass / (distance * distance));
        } else {
            pending.extend(cell.children.iter().map(|&child| tree.cell(child)));
        }
    }
}

/// Hookean springs toward `rest_length`; stretched links pull, compressed links push.
pub(super) fn accumulate_springs(
    positions: &[Vec2],
    links: &[(usize, usize)],
    rest_length: f32,
    strength: f32,
    forces: &mut [Vec2],
) {
    for &(from, to) in links {
        if from == to || from >= positions.len() || to >= positions.len() {
            continue;
        }

        let delta = positions[to] - positions[from];
        let length = delta.length();
        let distance = length.max(MIN_DISTANCE);
        let pull = separation(delta, length, to, from) * ((distance - rest_length) * strength);
        forces[from] += pull;
        forces[to] -= pull;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repulsion_is_symmetric_and_inverse_square() {
        let positions = [vec2(0.0, 0.0), vec2(10.0, 0.0)];
        let mut forces = [Vec2::ZERO; 2];
        accumulate_repulsion_exact(&positions, 300.0, &mut forces);

        assert!((forces[0].x + 3.0).abs() < 1e-4);
        assert!((forces[1].x - 3.0).abs() < 1e-4);

        let far = [vec2(0.0, 0.0), vec2(20.0, 0.0)];
        let mut far_forces = [Vec2::ZERO; 2];
        accumulate_repulsion_exact(&far, 300.0, &mut far_forces);
        assert!((far_forces[1].x - 0.75).abs() < 1e-4);
    }

    #[test]
    fn coincident_nodes_stay_finite() {
        let positions = [vec2(3.0, 3.0), vec2(3.0, 3.0)];
        let mut forces = [Vec2::ZERO; 2];
        accumulate_repulsion_exact(&positions, 300.0, &mut forces);
        accumulate_springs(&positions, &[(0, 1)], 120.0, 0.05, &mut forces);

        assert!(forces.iter().all(|f| f.x.is_finite() && f.y.is_finite()));
        assert!(forces[0].length() > 0.0);
    }

    #[test]
    fn springs_pull_stretched_and_push_compressed_links() {
        let stretched = [vec2(0.0, 0.0), vec2(200.0, 0.0)];
        let mut forces = [Vec2::ZERO; 2];
        accumulate_springs(&stretched, &[(0, 1)], 120.0, 0.1, &mut forces);
        assert!((forces[0].x - 8.0).abs() < 1e-4);
        assert!((forces[1].x + 8.0).abs() < 1e-4);

        let compressed = [vec2(0.0, 0.0), vec2(60.0, 0.0)];
        let mut forces = [Vec2::ZERO; 2];
        accumulate_springs(&compressed, &[(0, 1)], 120.0, 0.1, &mut forces);
        assert!(forces[0].x < 0.0 && forces[1].x > 0.0);
    }

    #[test]
    fn gravity_skips_pinned_nodes() {
        let positions = [vec2(100.0, 0.0), vec2(0.0, 100.0)];
        let mut forces = [Vec2::ZERO; 2];
        accumulate_gravity(&positions, &[false, true], Vec2::ZERO, 0.5, &mut forces);

        assert_eq!(forces[0], vec2(-50.0, 0.0));
        assert_eq!(forces[1], Vec2::ZERO);
    }

    #[test]
    fn barnes_hut_matches_exact_for_small_leaves() {
        let positions = [vec2(0.0, 0.0), vec2(40.0, 10.0), vec2(-25.0, 30.0)];
        let mut exact = [Vec2::ZERO; 3];
        accumulate_repulsion_exact(&positions, 300.0, &mut exact);

        let tree = Quadtree::build(&positions).unwrap();
        for (index, expected) in exact.iter().enumerate() {
            let mut force = Vec2::ZERO;
            accumulate_repulsion_for_node(&tree, index, &positions, 300.0, 0.72, &mut force);
            assert!((force - *expected).length() < 1e-4);
        }
    }
}
