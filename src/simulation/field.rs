use bytemuck::Zeroable;
use glam::Vec3;

use crate::config::{DISPLACEMENT_DEPTH, DISPLACEMENT_RADIUS, TIME_STEP};
use crate::simulation::height::HeightFunction;

/// One rendered particle: fixed x/z, time-varying y, per-vertex color.
/// Matches the vertex layout in `shaders/points.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// The animated particle lattice.
///
/// `vertices` holds the displayed positions that get uploaded to the GPU;
/// `base_heights` shadows the undisplaced, clock-animated height of every
/// particle. The invariant between them is
///
///   displayed_y = base_y + displacement
///
/// where displacement is recomputed from scratch on every step, so cursor
/// presses can never compound across frames.
pub struct HeightField {
    vertices: Vec<PointVertex>,
    base_heights: Vec<f32>,
    active: HeightFunction,
    clock: f32,
    grid_size: usize,
    scale: f32,
}

impl HeightField {
    /// Build a centered square lattice of `particle_count` particles spanning
    /// `[-scale/2, scale/2]` on x and z, at the rest heights of `active`.
    ///
    /// `grid_size` is `floor(sqrt(particle_count))`. When `particle_count` is
    /// not a perfect square the trailing `particle_count - grid_size^2` slots
    /// are left zeroed rather than placed on the lattice; callers that want
    /// every slot meaningful should pass a square count.
    pub fn new(particle_count: usize, scale: f32, active: HeightFunction) -> Self {
        let grid_size = (particle_count as f64).sqrt().floor() as usize;
        let mut vertices = vec![PointVertex::zeroed(); particle_count];
        let base_heights = vec![0.0; particle_count];

        for i in 0..grid_size {
            for j in 0..grid_size {
                let idx = i * grid_size + j;
                if idx >= particle_count {
                    break;
                }

                let x = (i as f32 / (grid_size - 1) as f32 - 0.5) * scale;
                let z = (j as f32 / (grid_size - 1) as f32 - 0.5) * scale;
                let y = active.init(x, z);

                vertices[idx] = PointVertex {
                    position: [x, y, z],
                    color: [1.0, 1.0, 1.0],
                };
            }
        }

        let mut field = Self {
            vertices,
            base_heights,
            active,
            clock: 0.0,
            grid_size,
            scale,
        };
        // base starts equal to the displayed rest heights
        for (base, v) in field.base_heights.iter_mut().zip(&field.vertices) {
            *base = v.position[1];
        }
        field
    }

    /// Advance the field by one frame.
    ///
    /// Every particle's base height is recomputed from the clock, then the
    /// cursor press (if any) is layered on top for particles within
    /// `DISPLACEMENT_RADIUS` of the hit point, with linear falloff. The clock
    /// advances by `TIME_STEP` once, after all particles - the whole field
    /// stays phase-locked.
    ///
    /// `cursor_hit` is the cursor ray's intersection with the surface this
    /// frame; `None` (no intersection) is a normal outcome and leaves every
    /// particle at its base height.
    pub fn step(&mut self, cursor_hit: Option<Vec3>) {
        let active = self.active;
        let t = self.clock;

        for (v, base) in self.vertices.iter_mut().zip(self.base_heights.iter_mut()) {
            let [x, _, z] = v.position;
            *base = active.animate(x, z, t);
            v.position[1] = *base;
        }

        if let Some(hit) = cursor_hit {
            for (v, base) in self.vertices.iter_mut().zip(self.base_heights.iter()) {
                let dx = v.position[0] - hit.x;
                let dz = v.position[2] - hit.z;
                let dist = (dx * dx + dz * dz).sqrt();
                if dist < DISPLACEMENT_RADIUS {
                    let strength = 1.0 - dist / DISPLACEMENT_RADIUS;
                    v.position[1] = *base + DISPLACEMENT_DEPTH * strength;
                }
            }
        }

        self.clock += TIME_STEP;
    }

    /// Put every particle back at the rest height of the active function and
    /// rewind the clock, discarding displacement and animation state.
    /// Idempotent.
    pub fn reset(&mut self) {
        for (v, base) in self.vertices.iter_mut().zip(self.base_heights.iter_mut()) {
            let [x, _, z] = v.position;
            let y = self.active.init(x, z);
            *base = y;
            v.position[1] = y;
        }
        self.clock = 0.0;
    }

    /// Switch the active height function and reset onto its rest state
    pub fn set_active(&mut self, f: HeightFunction) {
        self.active = f;
        self.reset();
    }

    pub fn active(&self) -> HeightFunction {
        self.active
    }

    /// Displayed positions, uploaded to the vertex buffer once per frame
    pub fn vertices(&self) -> &[PointVertex] {
        &self.vertices
    }

    pub fn particle_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Half the lattice extent; the footprint is `[-half, half]` on x and z
    pub fn half_extent(&self) -> f32 {
        self.scale * 0.5
    }

    /// Animated surface height at an arbitrary planar point, at the current
    /// clock value. Used by ray picking against the analytic surface.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        self.active.animate(x, z, self.clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DISPLACEMENT_DEPTH, DISPLACEMENT_RADIUS};

    fn field(count: usize, scale: f32, f: HeightFunction) -> HeightField {
        HeightField::new(count, scale, f)
    }

    #[test]
    fn test_grid_dimensions() {
        let field = field(10000, 60.0, HeightFunction::DoubleSine);
        assert_eq!(field.grid_size(), 100);
        assert_eq!(field.particle_count(), 10000);
    }

    #[test]
    fn test_lattice_spans_footprint() {
        let scale = 60.0;
        let field = field(10000, scale, HeightFunction::DoubleSine);
        let half = scale / 2.0;
        for v in field.vertices() {
            let [x, _, z] = v.position;
            assert!(x >= -half - 1e-4 && x <= half + 1e-4, "x out of range: {x}");
            assert!(z >= -half - 1e-4 && z <= half + 1e-4, "z out of range: {z}");
        }
    }

    #[test]
    fn test_corner_and_center_particles() {
        let scale = 60.0;
        let f = field(10000, scale, HeightFunction::DoubleSine);
        let corner = f.vertices()[0];
        assert_eq!(corner.position[0], -scale / 2.0);
        assert_eq!(corner.position[2], -scale / 2.0);

        // 100x100 lattice has no exact center; (50, 50) sits half a cell past
        // it, well within one spacing of the origin
        let spacing = scale / 99.0;
        let near_center = f.vertices()[50 * 100 + 50];
        assert!(near_center.position[0].abs() <= spacing);
        assert!(near_center.position[2].abs() <= spacing);
    }

    #[test]
    fn test_non_square_count_leaves_tail_zeroed() {
        // grid_size = floor(sqrt(10)) = 3, so slot 9 is never placed
        let f = field(10, 10.0, HeightFunction::Radial);
        assert_eq!(f.grid_size(), 3);
        let tail = f.vertices()[9];
        assert_eq!(tail.position, [0.0, 0.0, 0.0]);
        assert_eq!(tail.color, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_interference_scenario() {
        // 120x120 lattice at scale 70: particle (60, 60) sits at
        // x = z = (60/119 - 0.5) * 70, and its height must match the closed
        // form exactly.
        let scale = 70.0;
        let f = field(14400, scale, HeightFunction::Interference);
        assert_eq!(f.grid_size(), 120);

        let expected_xz = (60.0 / 119.0 - 0.5) * scale;
        let v = f.vertices()[60 * 120 + 60];
        assert_eq!(v.position[0], expected_xz);
        assert_eq!(v.position[2], expected_xz);

        let expected_y = (expected_xz * 0.5).sin() * (expected_xz * 0.5).cos();
        assert_eq!(v.position[1].to_bits(), expected_y.to_bits());
    }

    #[test]
    fn test_step_matches_closed_form() {
        let mut f = field(100, 10.0, HeightFunction::DoubleSine);
        f.step(None);
        f.step(None);
        // after two steps the displayed heights reflect the clock value used
        // on the second step, i.e. one TIME_STEP
        for v in f.vertices() {
            let [x, y, z] = v.position;
            let expected = HeightFunction::DoubleSine.animate(x, z, crate::config::TIME_STEP);
            assert_eq!(y.to_bits(), expected.to_bits());
        }
    }

    #[test]
    fn test_clock_accumulation() {
        let mut f = field(100, 10.0, HeightFunction::Radial);
        for _ in 0..50 {
            f.step(None);
        }
        assert!(
            (f.clock() - 1.0).abs() < 1e-5,
            "50 steps of 0.02 should accumulate to 1.0, got {}",
            f.clock()
        );

        // the animated surface now evaluates at t = 1.0
        let (x, z) = (2.5, -4.0);
        let expected = HeightFunction::Radial.animate(x, z, 1.0);
        assert!((f.height_at(x, z) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_displacement_at_hit_point_is_exact() {
        let mut f = field(10000, 60.0, HeightFunction::Interference);
        let target = f.vertices()[42].position;
        let hit = Vec3::new(target[0], 0.0, target[2]);

        f.step(Some(hit));

        // distance zero: full-strength press, displayed = base + depth exactly
        let [x, y, z] = f.vertices()[42].position;
        let base = HeightFunction::Interference.animate(x, z, 0.0);
        assert_eq!(y, base + DISPLACEMENT_DEPTH);
        assert_eq!(y, base - 2.0);
    }

    #[test]
    fn test_particles_outside_radius_untouched() {
        let scale = 60.0;
        let mut f = field(10000, scale, HeightFunction::Interference);
        // press at one corner; the opposite corner is ~85 units away
        let hit = Vec3::new(-scale / 2.0, 0.0, -scale / 2.0);

        f.step(Some(hit));

        let far = f.vertices()[10000 - 1];
        let [x, y, z] = far.position;
        let base = HeightFunction::Interference.animate(x, z, 0.0);
        assert_eq!(y, base, "particle beyond the radius must keep its base height");
    }

    #[test]
    fn test_displacement_does_not_accumulate() {
        let mut f = field(10000, 60.0, HeightFunction::DoubleSine);
        let target = f.vertices()[0].position;
        let hit = Vec3::new(target[0], 0.0, target[2]);

        // hold the cursor still for several frames
        for _ in 0..5 {
            f.step(Some(hit));
        }

        let [x, y, z] = f.vertices()[0].position;
        let base = HeightFunction::DoubleSine.animate(x, z, 4.0 * crate::config::TIME_STEP);
        assert!(
            (y - (base + DISPLACEMENT_DEPTH)).abs() < 1e-6,
            "press depth must stay at one DISPLACEMENT_DEPTH, got {} vs base {}",
            y,
            base
        );
    }

    #[test]
    fn test_release_returns_to_base() {
        let mut f = field(10000, 60.0, HeightFunction::DoubleSine);
        let target = f.vertices()[0].position;
        f.step(Some(Vec3::new(target[0], 0.0, target[2])));
        f.step(None);

        let [x, y, z] = f.vertices()[0].position;
        let base = HeightFunction::DoubleSine.animate(x, z, crate::config::TIME_STEP);
        assert_eq!(y.to_bits(), base.to_bits());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut f = field(400, 20.0, HeightFunction::SaddleTwist);
        for _ in 0..7 {
            f.step(Some(Vec3::new(1.0, 0.0, 1.0)));
        }

        f.reset();
        let once: Vec<[f32; 3]> = f.vertices().iter().map(|v| v.position).collect();
        f.reset();
        let twice: Vec<[f32; 3]> = f.vertices().iter().map(|v| v.position).collect();

        assert_eq!(once, twice);
        assert_eq!(f.clock(), 0.0);
    }

    #[test]
    fn test_reset_restores_rest_heights() {
        let mut f = field(400, 20.0, HeightFunction::Radial);
        for _ in 0..10 {
            f.step(None);
        }
        f.reset();
        for v in f.vertices() {
            let [x, y, z] = v.position;
            assert_eq!(y.to_bits(), HeightFunction::Radial.init(x, z).to_bits());
        }
    }

    #[test]
    fn test_set_active_lands_on_new_rest_state() {
        let mut f = field(400, 20.0, HeightFunction::DoubleSine);
        for _ in 0..3 {
            f.step(None);
        }
        f.set_active(HeightFunction::Radial);
        assert_eq!(f.active(), HeightFunction::Radial);
        assert_eq!(f.clock(), 0.0);
        let v = f.vertices()[7];
        let [x, y, z] = v.position;
        assert_eq!(y.to_bits(), HeightFunction::Radial.init(x, z).to_bits());
    }

    #[test]
    fn test_radius_edge_math() {
        // strength at the edge of the influence radius is exactly zero
        let d = DISPLACEMENT_RADIUS;
        let strength = 1.0 - d / DISPLACEMENT_RADIUS;
        assert_eq!(strength, 0.0);
    }
}
