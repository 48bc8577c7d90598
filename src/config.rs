/// Number of particles in the cloud (120x120 lattice)
pub const PARTICLE_COUNT: usize = 14400;

/// World-space extent of the lattice along x and z
pub const GRID_SCALE: f32 = 70.0;

/// Clock increment applied once per frame.
/// Animation speed is tied to the frame rate on purpose, matching the
/// fixed-step origin of the effect.
pub const TIME_STEP: f32 = 0.02;

// ============================================
// Cursor Displacement
// ============================================

/// Planar radius around the cursor hit inside which particles are pressed down
pub const DISPLACEMENT_RADIUS: f32 = 10.0;

/// Vertical offset at the hit point itself; falls off linearly to zero at
/// the radius edge. Negative values press the surface down.
pub const DISPLACEMENT_DEPTH: f32 = -2.0;

// ============================================
// Rendering
// ============================================

/// Cloud spin about +Y in radians per frame
pub const SPIN_RATE: f32 = 0.001;

/// Background clear color (linear RGB)
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.05,
    b: 0.08,
    a: 1.0,
};

// ============================================
// Camera
// ============================================

/// Orbit distance from the lattice center
pub const CAMERA_RADIUS: f32 = 60.0;

/// Initial orbit yaw in degrees (rotation around +Y)
pub const CAMERA_YAW_DEG: f32 = -45.0;

/// Initial orbit pitch in degrees (elevation above the xz plane)
pub const CAMERA_PITCH_DEG: f32 = 35.0;

/// Vertical field of view in degrees
pub const CAMERA_FOV_DEG: f32 = 75.0;

/// Near clip plane
pub const CAMERA_NEAR: f32 = 0.1;

/// Far clip plane
pub const CAMERA_FAR: f32 = 1000.0;
