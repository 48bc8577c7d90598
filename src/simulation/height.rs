/// Closed-form height functions for the particle lattice.
///
/// Each variant provides two mappings over the horizontal plane:
/// - `init(x, z)` - the height at rest, used when (re)building the lattice
/// - `animate(x, z, t)` - the height at clock value `t`
///
/// Every variant satisfies `animate(x, z, 0.0) == init(x, z)`, so switching
/// into a freshly reset field starts the animation without a visible jump.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeightFunction {
    /// `sin(x) + sin(z)`, amplitude 2
    DoubleSine,
    /// `sin(0.5x) * cos(0.5z)`, amplitude 1
    Interference,
    /// `sin(sqrt(x^2 + z^2))`, rings expanding from the origin
    Radial,
    /// `0.05(x^2 - z^2) + 0.4 sin(x + z)`, a static saddle with a
    /// travelling ripple on top
    SaddleTwist,
}

impl HeightFunction {
    /// Height at rest, before any clock advance
    pub fn init(self, x: f32, z: f32) -> f32 {
        match self {
            HeightFunction::DoubleSine => x.sin() + z.sin(),
            HeightFunction::Interference => (x * 0.5).sin() * (z * 0.5).cos(),
            HeightFunction::Radial => (x * x + z * z).sqrt().sin(),
            HeightFunction::SaddleTwist => (x * x - z * z) * 0.05 + (x + z).sin() * 0.4,
        }
    }

    /// Height at clock value `time`. Time enters the oscillating term only;
    /// the saddle's quadratic term is time-invariant.
    pub fn animate(self, x: f32, z: f32, time: f32) -> f32 {
        match self {
            HeightFunction::DoubleSine => (x + time).sin() + (z + time).sin(),
            HeightFunction::Interference => (x * 0.5 + time).sin() * (z * 0.5 + time).cos(),
            HeightFunction::Radial => ((x * x + z * z).sqrt() + time).sin(),
            HeightFunction::SaddleTwist => {
                (x * x - z * z) * 0.05 + (x + z + time).sin() * 0.4
            }
        }
    }

    /// Short name for logs and the window title
    pub fn label(self) -> &'static str {
        match self {
            HeightFunction::DoubleSine => "double sine",
            HeightFunction::Interference => "interference",
            HeightFunction::Radial => "radial",
            HeightFunction::SaddleTwist => "saddle twist",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [HeightFunction; 4] = [
        HeightFunction::DoubleSine,
        HeightFunction::Interference,
        HeightFunction::Radial,
        HeightFunction::SaddleTwist,
    ];

    /// Sample points spread over the lattice footprint, including the origin
    /// and both sign quadrants
    const SAMPLES: [(f32, f32); 6] = [
        (0.0, 0.0),
        (1.0, -1.0),
        (-17.3, 4.2),
        (35.0, 35.0),
        (-35.0, 35.0),
        (0.21, 0.21),
    ];

    #[test]
    fn test_animate_at_zero_matches_init() {
        for f in ALL {
            for (x, z) in SAMPLES {
                let a = f.init(x, z);
                let b = f.animate(x, z, 0.0);
                assert!(
                    (a - b).abs() < 1e-6,
                    "{}: init({x}, {z}) = {a}, animate(.., 0) = {b}",
                    f.label()
                );
            }
        }
    }

    #[test]
    fn test_animate_is_deterministic() {
        for f in ALL {
            for (x, z) in SAMPLES {
                let a = f.animate(x, z, 1.37);
                let b = f.animate(x, z, 1.37);
                assert_eq!(a.to_bits(), b.to_bits(), "{} not bit-identical", f.label());
            }
        }
    }

    #[test]
    fn test_double_sine_formula() {
        use std::f32::consts::FRAC_PI_2;
        let y = HeightFunction::DoubleSine.init(FRAC_PI_2, FRAC_PI_2);
        assert!((y - 2.0).abs() < 1e-6, "peak of sin(x)+sin(z) should be 2, got {y}");
    }

    #[test]
    fn test_interference_formula() {
        let (x, z, t) = (3.0f32, -2.0f32, 0.7f32);
        let expected = (x * 0.5 + t).sin() * (z * 0.5 + t).cos();
        let y = HeightFunction::Interference.animate(x, z, t);
        assert_eq!(y.to_bits(), expected.to_bits());
    }

    #[test]
    fn test_radial_is_rotation_symmetric() {
        let a = HeightFunction::Radial.animate(3.0, 4.0, 0.5);
        let b = HeightFunction::Radial.animate(5.0, 0.0, 0.5);
        assert!((a - b).abs() < 1e-6, "same radius should give same height");
    }

    #[test]
    fn test_saddle_quadratic_term_ignores_time() {
        // Along x + z = 0 the sine term vanishes at t = 0 and oscillates with
        // t, while the quadratic term never moves.
        let (x, z) = (4.0, -4.0);
        let at_zero = HeightFunction::SaddleTwist.animate(x, z, 0.0);
        let quadratic = (x * x - z * z) * 0.05;
        assert!((at_zero - quadratic).abs() < 1e-6);
    }
}
