use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::simulation::HeightField;

/// Steps taken across the footprint when searching for a surface crossing
const MARCH_STEPS: usize = 256;

/// Bisection iterations once a crossing is bracketed
const REFINE_ITERS: usize = 16;

/// Distance beyond which the search gives up even inside the footprint slab
const T_LIMIT: f32 = 500.0;

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    /// normalized
    pub dir: Vec3,
}

impl Ray {
    /// Map the ray through `mat`; used to undo the cloud's spin so the
    /// intersection test runs in lattice space.
    pub fn transformed(&self, mat: Mat4) -> Ray {
        Ray {
            origin: mat.transform_point3(self.origin),
            dir: mat.transform_vector3(self.dir).normalize(),
        }
    }
}

/// Unproject a cursor position (physical pixels) into a world-space ray.
pub fn ray_from_screen(cursor_px: Vec2, width: f32, height: f32, view: Mat4, proj: Mat4) -> Ray {
    // pixel -> NDC
    let x = (cursor_px.x / width) * 2.0 - 1.0;
    let y = 1.0 - (cursor_px.y / height) * 2.0;

    let inv_view = view.inverse();
    let inv_view_proj = (proj * view).inverse();

    let far4 = inv_view_proj * Vec4::new(x, y, 1.0, 1.0);
    let far = far4.truncate() / far4.w;

    let origin = inv_view.transform_point3(Vec3::ZERO);
    Ray {
        origin,
        dir: (far - origin).normalize(),
    }
}

/// Nearest intersection of `ray` with the field's animated surface, or
/// `None` when the ray misses the lattice footprint or never crosses the
/// surface. A miss is a normal per-frame outcome, not an error.
///
/// The surface is analytic, so instead of walking grid cells the ray is
/// clipped to the footprint slab, marched in fixed steps until the signed
/// distance `p.y - h(p.x, p.z)` changes sign, then refined by bisection.
pub fn intersect_height_surface(ray: &Ray, field: &HeightField) -> Option<Vec3> {
    let half = field.half_extent();

    let mut t0 = 0.0_f32;
    let mut t1 = T_LIMIT;
    if !clip_slab(ray.origin.x, ray.dir.x, -half, half, &mut t0, &mut t1) {
        return None;
    }
    if !clip_slab(ray.origin.z, ray.dir.z, -half, half, &mut t0, &mut t1) {
        return None;
    }
    if t0 > t1 {
        return None;
    }

    let signed = |t: f32| {
        let p = ray.origin + ray.dir * t;
        p.y - field.height_at(p.x, p.z)
    };

    // starting below the surface counts as an immediate hit
    let f0 = signed(t0);
    if f0 <= 0.0 {
        return Some(surface_point(ray, field, t0));
    }

    let dt = (t1 - t0) / MARCH_STEPS as f32;
    let mut prev_t = t0;
    let mut prev_f = f0;

    for s in 1..=MARCH_STEPS {
        let t = t0 + dt * s as f32;
        let f = signed(t);

        if prev_f > 0.0 && f <= 0.0 {
            // bracketed a front-face crossing; bisect to refine
            let mut a = prev_t;
            let mut b = t;
            for _ in 0..REFINE_ITERS {
                let m = 0.5 * (a + b);
                if signed(m) > 0.0 {
                    a = m;
                } else {
                    b = m;
                }
            }
            return Some(surface_point(ray, field, 0.5 * (a + b)));
        }

        prev_t = t;
        prev_f = f;
    }

    None
}

/// Point on the analytic surface under the ray position at `t`
fn surface_point(ray: &Ray, field: &HeightField, t: f32) -> Vec3 {
    let p = ray.origin + ray.dir * t;
    Vec3::new(p.x, field.height_at(p.x, p.z), p.z)
}

/// Intersect the ray's [t0, t1] range with one axis slab. Returns false when
/// the ray runs parallel to the slab outside its bounds.
fn clip_slab(origin: f32, dir: f32, min: f32, max: f32, t0: &mut f32, t1: &mut f32) -> bool {
    if dir.abs() < 1e-8 {
        return origin >= min && origin <= max;
    }
    let inv = 1.0 / dir;
    let mut a = (min - origin) * inv;
    let mut b = (max - origin) * inv;
    if a > b {
        std::mem::swap(&mut a, &mut b);
    }
    *t0 = t0.max(a);
    *t1 = t1.min(b);
    *t0 <= *t1
}
