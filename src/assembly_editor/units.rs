use crate::assembly_editor::DEFAULT_PIXELS_PER_MM;

/// Fixed millimeter <-> pixel scale, chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConverter {
    pixels_per_mm: f64,
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self {
            pixels_per_mm: DEFAULT_PIXELS_PER_MM,
        }
    }
}

impl UnitConverter {
    /// Returns `None` for a scale that would make the pair non-invertible.
    pub fn new(pixels_per_mm: f64) -> Option<Self> {
        (pixels_per_mm.is_finite() && pixels_per_mm > 0.0).then_some(Self { pixels_per_mm })
    }

    pub fn pixels_per_mm(&self) -> f64 {
        self.pixels_per_mm
    }

    pub fn to_pixels(&self, mm: f64) -> f64 {
        mm * self.pixels_per_mm
    }

    pub fn to_physical(&self, px: f64) -> f64 {
        px / self.pixels_per_mm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn default_scale_is_ten_pixels_per_mm() {
        let units = UnitConverter::default();
        assert_relative_eq!(units.to_pixels(20.0), 200.0);
        assert_relative_eq!(units.to_physical(-125.0), -12.5);
    }

    #[test]
    fn rejects_degenerate_scales() {
        assert!(UnitConverter::new(0.0).is_none());
        assert!(UnitConverter::new(-2.0).is_none());
        assert!(UnitConverter::new(f64::NAN).is_none());
        assert!(UnitConverter::new(f64::INFINITY).is_none());
        assert!(UnitConverter::new(2.0).is_some());
    }

    proptest! {
        #[test]
        fn pixel_round_trip(px in -1.0e6f64..1.0e6, scale in 0.1f64..100.0) {
            let units = UnitConverter::new(scale).unwrap();
            let back = units.to_pixels(units.to_physical(px));
            prop_assert!((back - px).abs() <= 1e-9 * px.abs().max(1.0));
        }

        #[test]
        fn physical_round_trip(mm in -1.0e6f64..1.0e6, scale in 0.1f64..100.0) {
            let units = UnitConverter::new(scale).unwrap();
            let back = units.to_physical(units.to_pixels(mm));
            prop_assert!((back - mm).abs() <= 1e-9 * mm.abs().max(1.0));
        }
    }
}
