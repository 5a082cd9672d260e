//! Arena quadtree over node positions for Barnes-Hut repulsion.

use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 12;
const MAX_DEPTH: usize = 10;

/// Axis-aligned square region.
#[derive(Clone, Copy, Debug)]
pub(super) struct Square {
    center: Vec2,
    half: f32,
}

impl Square {
    /// Smallest padded square around every point; `None` when empty or non-finite.
    fn enclosing(points: &[Vec2]) -> Option<Self> {
        let (min, max) = points.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), point| (min.min(*point), max.max(*point)),
        );
        if !(min.is_finite() && max.is_finite()) {
            return None;
        }

        let span = (max - min).max(Vec2::splat(1.0));
        Some(Self {
            center: (min + max) * 0.5,
            half: span.max_elem() * 0.5 + 1.0,
        })
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        let offset = (point - self.center).abs();
        offset.x <= self.half && offset.y <= self.half
    }

    pub(super) fn side(self) -> f32 {
        self.half * 2.0
    }

    /// Quadrant index: bit 0 set for the right half, bit 1 for the lower half.
    fn quadrant_of(self, point: Vec2) -> usize {
        usize::from(point.x >= self.center.x) | (usize::from(point.y >= self.center.y) << 1)
    }

    fn quadrant(self, quadrant: usize) -> Self {
        let half = self.half * 0.5;
        let sign = |bit: usize| if quadrant & bit == 0 { -half } else { half };
        Self {
            center: self.center + vec2(sign(1), sign(2)),
            half,
        }
    }
}

#[derive(Debug)]
pub(super) struct Cell {
    pub(super) square: Square,
    pub(super) mass_center: Vec2,
    pub(super) mass: f32,
    /// Point indices held directly; empty for interior cells.
    pub(super) members: Vec<usize>,
    pub(super) children: Vec<usize>,
    depth: usize,
}

impl Cell {
    pub(super) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// One square of the repulsion quadtree, for debug overlays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadtreeCell {
    pub center: Vec2,
    pub half_extent: f32,
    pub depth: usize,
    pub is_leaf: bool,
}

/// Cells in depth-first order; index 0 is the root.
#[derive(Debug)]
pub(super) struct Quadtree {
    cells: Vec<Cell>,
}

impl Quadtree {
    pub(super) fn build(positions: &[Vec2]) -> Option<Self> {
        let square = Square::enclosing(positions)?;
        let mut tree = Self { cells: Vec::new() };
        tree.insert(square, (0..positions.len()).collect(), positions, 0);
        Some(tree)
    }

    fn insert(
        &mut self,
        square: Square,
        members: Vec<usize>,
        positions: &[Vec2],
        depth: usize,
    ) -> usize {
        let mass = members.len() as f32;
        let mass_center = if members.is_empty() {
            square.center
        } else {
            members
                .iter()
                .fold(Vec2::ZERO, |sum, &index| sum + positions[index])
                / mass
        };

        let id = self.cells.len();
        self.cells.push(Cell {
            square,
            mass_center,
            mass,
            members: Vec::new(),
            children: Vec::new(),
            depth,
        });

        if depth >= MAX_DEPTH || members.len() <= LEAF_CAPACITY {
            self.cells[id].members = members;
            return id;
        }

        let mut buckets: [Vec<usize>; 4] = Default::default();
        for index in &members {
            buckets[square.quadrant_of(positions[*index])].push(*index);
        }

        // Coincident points never separate; keep them together.
        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() < 2 {
            self.cells[id].members = members;
            return id;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if !bucket.is_empty() {
                let child = self.insert(square.quadrant(quadrant), bucket, positions, depth + 1);
                self.cells[id].children.push(child);
            }
        }
        id
    }

    pub(super) fn root(&self) -> &Cell {
        &self.cells[0]
    }

    pub(super) fn cell(&self, id: usize) -> &Cell {
        &self.cells[id]
    }

    pub(super) fn overlay(&self) -> Vec<QuadtreeCell> {
        self.cells
            .iter()
            .map(|cell| QuadtreeCell {
                center: cell.square.center,
                half_extent: cell.square.half,
                depth: cell.depth,
                is_leaf: cell.is_leaf(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spread_points_split_and_keep_their_mass() {
        let positions = (0..40)
            .map(|index| vec2((index % 8) as f32 * 30.0, (index / 8) as f32 * 30.0))
            .collect::<Vec<_>>();

        let tree = Quadtree::build(&positions).unwrap();
        assert!(!tree.root().is_leaf());
        assert_eq!(tree.root().mass, 40.0);

        let leaf_mass = tree
            .cells
            .iter()
            .filter(|cell| cell.is_leaf())
            .map(|cell| cell.members.len())
            .sum::<usize>();
        assert_eq!(leaf_mass, 40);

        let overlay = tree.overlay();
        assert!(overlay.len() > 1);
        assert_eq!(overlay[0].depth, 0);
    }

    #[test]
    fn coincident_points_share_one_leaf() {
        let positions = vec![vec2(5.0, 5.0); 30];
        let tree = Quadtree::build(&positions).unwrap();
        assert!(tree.root().is_leaf());
        assert_eq!(tree.root().members.len(), 30);
    }

    #[test]
    fn no_points_no_tree() {
        assert!(Quadtree::build(&[]).is_none());
    }

    #[test]
    fn quadrants_tile_the_parent() {
        let square = Square {
            center: vec2(0.0, 0.0),
            half: 4.0,
        };
        for point in [vec2(-1.0, -1.0), vec2(1.0, -1.0), vec2(-1.0, 1.0), vec2(1.0, 1.0)] {
            let child = square.quadrant(square.quadrant_of(point));
            assert!(child.contains(point));
            assert_eq!(child.side(), 4.0);
        }
    }
}
