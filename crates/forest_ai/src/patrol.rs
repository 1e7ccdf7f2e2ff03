//! Patrol rings around a spawn point

use forest_math::{consts, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Distance at which a patrol point counts as reached
pub const PATROL_ARRIVAL_RADIUS: f32 = 3.0;

/// A closed loop of 3-5 points, 10-25 units from an anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatrolRoute {
    anchor: Vec3,
    offsets: Vec<Vec3>,
    index: usize,
}

impl PatrolRoute {
    /// Evenly spaced bearings with a random distance per point
    pub fn generate<R: Rng>(anchor: Vec3, rng: &mut R) -> Self {
        let count: usize = rng.gen_range(3..=5);
        let offsets = (0..count)
            .map(|i| {
                let angle = consts::TAU * i as f32 / count as f32;
                let distance: f32 = rng.gen_range(10.0..25.0);
                Vec3::ground(angle.cos() * distance, angle.sin() * distance)
            })
            .collect();

        Self {
            anchor,
            offsets,
            index: 0,
        }
    }

    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// World positions of every point
    pub fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.offsets.iter().map(move |o| self.anchor + *o)
    }

    pub fn current(&self) -> Vec3 {
        self.offsets
            .get(self.index)
            .map_or(self.anchor, |o| self.anchor + *o)
    }

    /// Advance when `position` is on the current point; returns the point to head for
    pub fn next_target(&mut self, position: Vec3) -> Vec3 {
        if !self.offsets.is_empty() && position.planar_distance(self.current()) < PATROL_ARRIVAL_RADIUS {
            self.index = (self.index + 1) % self.offsets.len();
        }
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_ring_shape() {
        for seed in 0..20 {
            let anchor = Vec3::ground(100.0, -40.0);
            let route = PatrolRoute::generate(anchor, &mut StdRng::seed_from_u64(seed));
            assert!((3..=5).contains(&route.len()));
            for point in route.points() {
                let d = point.planar_distance(anchor);
                assert!((10.0..=25.0).contains(&d), "point at {d}");
            }
        }
    }

    #[test]
    fn test_advances_on_arrival_and_wraps() {
        let mut route = PatrolRoute::generate(Vec3::ZERO, &mut StdRng::seed_from_u64(7));
        let len = route.len();

        let first = route.current();
        assert_eq!(route.next_target(Vec3::ZERO), first);

        for _ in 0..len {
            let here = route.current();
            route.next_target(here);
        }
        assert_eq!(route.index(), 0);
    }
}
