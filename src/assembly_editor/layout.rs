use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("camera count {0} is outside 1..=4")]
    InvalidCameraCount(i64),
}

/// Number of cameras in the assembly. Only 1 to 4 are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CameraCount {
    One,
    Two,
    Three,
    Four,
}

impl CameraCount {
    pub const ALL: [CameraCount; 4] = [Self::One, Self::Two, Self::Three, Self::Four];

    pub fn get(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }

    pub fn clamped(value: i64) -> Self {
        match value {
            i64::MIN..=1 => Self::One,
            2 => Self::Two,
            3 => Self::Three,
            _ => Self::Four,
        }
    }
}

impl TryFrom<u8> for CameraCount {
    type Error = LayoutError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            other => Err(LayoutError::InvalidCameraCount(other as i64)),
        }
    }
}

impl From<CameraCount> for u8 {
    fn from(count: CameraCount) -> Self {
        count.get() as u8
    }
}

/// Center-relative position in pixel space. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Fixed placement table. The three-camera case is an L (top-left, top-right,
/// bottom-left), not a centered triangle.
pub fn compute_positions(count: CameraCount, spacing_x_px: f64, spacing_y_px: f64) -> Vec<Position> {
    let hx = spacing_x_px / 2.0;
    let hy = spacing_y_px / 2.0;

    match count {
        CameraCount::One => vec![Position::new(0.0, 0.0)],
        CameraCount::Two => vec![Position::new(-hx, 0.0), Position::new(hx, 0.0)],
        CameraCount::Three => vec![
            Position::new(-hx, -hy),
            Position::new(hx, -hy),
            Position::new(-hx, hy),
        ],
        CameraCount::Four => vec![
            Position::new(-hx, -hy),
            Position::new(hx, -hy),
            Position::new(-hx, hy),
            Position::new(hx, hy),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(CameraCount::One, vec![(0.0, 0.0)])]
    #[case(CameraCount::Two, vec![(-100.0, 0.0), (100.0, 0.0)])]
    #[case(CameraCount::Three, vec![(-100.0, -50.0), (100.0, -50.0), (-100.0, 50.0)])]
    #[case(
        CameraCount::Four,
        vec![(-100.0, -50.0), (100.0, -50.0), (-100.0, 50.0), (100.0, 50.0)]
    )]
    fn placement_table(#[case] count: CameraCount, #[case] expected: Vec<(f64, f64)>) {
        let positions: Vec<(f64, f64)> = compute_positions(count, 200.0, 100.0)
            .into_iter()
            .map(|p| (p.x, p.y))
            .collect();
        assert_eq!(positions, expected);
    }

    #[rstest]
    #[case(-7, CameraCount::One)]
    #[case(0, CameraCount::One)]
    #[case(1, CameraCount::One)]
    #[case(2, CameraCount::Two)]
    #[case(3, CameraCount::Three)]
    #[case(4, CameraCount::Four)]
    #[case(99, CameraCount::Four)]
    fn clamps_raw_counts(#[case] raw: i64, #[case] expected: CameraCount) {
        assert_eq!(CameraCount::clamped(raw), expected);
    }

    #[test]
    fn try_from_rejects_out_of_range() {
        assert_eq!(CameraCount::try_from(0u8), Err(LayoutError::InvalidCameraCount(0)));
        assert_eq!(CameraCount::try_from(5u8), Err(LayoutError::InvalidCameraCount(5)));
        assert_eq!(CameraCount::try_from(3u8), Ok(CameraCount::Three));
    }

    #[test]
    fn count_deserializes_from_integer() {
        let count: CameraCount = ron::de::from_str("3").unwrap();
        assert_eq!(count, CameraCount::Three);
        assert!(ron::de::from_str::<CameraCount>("9").is_err());
    }

    proptest! {
        #[test]
        fn length_matches_count_and_is_deterministic(
            raw in 1u8..=4,
            sx in -5000.0f64..5000.0,
            sy in -5000.0f64..5000.0,
        ) {
            let count = CameraCount::try_from(raw).unwrap();
            let first = compute_positions(count, sx, sy);
            let second = compute_positions(count, sx, sy);
            prop_assert_eq!(first.len(), count.get());
            for (a, b) in first.iter().zip(&second) {
                prop_assert_eq!(a.x.to_bits(), b.x.to_bits());
                prop_assert_eq!(a.y.to_bits(), b.y.to_bits());
            }
        }
    }
}
