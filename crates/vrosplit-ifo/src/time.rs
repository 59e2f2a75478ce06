//! Presentation time stamp conversions.

/// PTS ticks per second (90 kHz clock).
pub const PTS_PER_SECOND: u32 = 90_000;

/// PTS ticks per NTSC frame (29.97 fps).
pub const PTS_PER_FRAME: u32 = 3_003;

pub fn pts_to_seconds(pts: u32) -> f64 {
    f64::from(pts) / f64::from(PTS_PER_SECOND)
}

pub fn pts_to_frames(pts: u32) -> f64 {
    f64::from(pts) / f64::from(PTS_PER_FRAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(pts_to_seconds(900_000), 10.0);
        assert_eq!(pts_to_seconds(45_000), 0.5);
        assert_eq!(pts_to_frames(3_003 * 30), 30.0);
        assert_eq!(pts_to_seconds(0), 0.0);
    }
}
