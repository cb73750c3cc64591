//! Grid and angle snapping for floor plan points.

use serde::{Deserialize, Serialize};

use super::Point;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnappingConfig {
    #[serde(default = "default_true")]
    pub grid_enabled: bool,
    /// Grid pitch in normalized units (0.025 gives 40 lines per side).
    #[serde(default = "default_grid_size")]
    pub grid_size: f64,
    #[serde(default = "default_true")]
    pub angle_enabled: bool,
    /// Angles in degrees, measured with y pointing down.
    #[serde(default = "default_snap_angles")]
    pub snap_angles: Vec<f64>,
    /// Minimum distance from the anchor before angle snapping applies.
    #[serde(default = "default_angle_snap_threshold")]
    pub angle_snap_threshold: f64,
}

fn default_true() -> bool {
    true
}
fn default_grid_size() -> f64 {
    0.025
}
fn default_snap_angles() -> Vec<f64> {
    (0..8).map(|i| f64::from(i) * 45.0).collect()
}
fn default_angle_snap_threshold() -> f64 {
    0.1
}

impl Default for SnappingConfig {
    fn default() -> Self {
        Self {
            grid_enabled: true,
            grid_size: default_grid_size(),
            angle_enabled: true,
            snap_angles: default_snap_angles(),
            angle_snap_threshold: default_angle_snap_threshold(),
        }
    }
}

impl SnappingConfig {
    /// Copy of this config with angle snapping switched on or off.
    pub fn with_angle(&self, enabled: bool) -> Self {
        Self {
            angle_enabled: enabled,
            ..self.clone()
        }
    }
}

pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    if grid_size <= 0.0 {
        return point;
    }
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}

/// Angle from `from` to `to` in degrees, normalized to `[0, 360)`.
fn angle_between(from: &Point, to: &Point) -> f64 {
    let deg = (to.y - from.y).atan2(to.x - from.x).to_degrees();
    if deg < 0.0 {
        deg + 360.0
    } else {
        deg
    }
}

/// Angular distance on the circle, so 359 degrees is next to 0.
fn angular_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    diff.min(360.0 - diff)
}

fn nearest_angle(angle: f64, snap_angles: &[f64]) -> Option<f64> {
    snap_angles
        .iter()
        .copied()
        .min_by(|a, b| angular_distance(angle, *a).total_cmp(&angular_distance(angle, *b)))
}

/// Rotate `point` around `anchor` onto the nearest snap angle, keeping its
/// distance. Points closer than `threshold` are left alone.
pub fn snap_to_angle(point: Point, anchor: &Point, snap_angles: &[f64], threshold: f64) -> Point {
    let distance = anchor.distance_to(&point);
    if distance < threshold {
        return point;
    }
    let Some(snapped) = nearest_angle(angle_between(anchor, &point), snap_angles) else {
        return point;
    };
    let rad = snapped.to_radians();
    Point::new(anchor.x + distance * rad.cos(), anchor.y + distance * rad.sin())
}

/// Snap a point: angle first (when an anchor is given), then grid, then
/// clamp to the unit square.
pub fn apply_snapping(point: Point, anchor: Option<&Point>, config: &SnappingConfig) -> Point {
    let mut snapped = point;

    if config.angle_enabled {
        if let Some(anchor) = anchor {
            snapped = snap_to_angle(
                snapped,
                anchor,
                &config.snap_angles,
                config.angle_snap_threshold,
            );
        }
    }

    if config.grid_enabled {
        snapped = snap_to_grid(snapped, config.grid_size);
    }

    snapped.clamped()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn grid_rounds_to_nearest_line() {
        let p = snap_to_grid(Point::new(0.26, 0.511), 0.025);
        assert!(close(p, Point::new(0.25, 0.5)));
    }

    #[test]
    fn angle_snap_keeps_distance() {
        let anchor = Point::new(0.2, 0.2);
        // Slightly below horizontal.
        let p = snap_to_angle(Point::new(0.5, 0.23), &anchor, &default_snap_angles(), 0.1);
        assert!((p.y - 0.2).abs() < 1e-9);
        assert!((anchor.distance_to(&p) - anchor.distance_to(&Point::new(0.5, 0.23))).abs() < 1e-9);
    }

    #[test]
    fn angle_snap_ignores_points_near_anchor() {
        let anchor = Point::new(0.5, 0.5);
        let p = Point::new(0.53, 0.52);
        assert_eq!(snap_to_angle(p, &anchor, &default_snap_angles(), 0.1), p);
    }

    #[test]
    fn diagonal_snaps_to_forty_five_degrees() {
        let anchor = Point::new(0.0, 0.0);
        let p = snap_to_angle(Point::new(0.3, 0.28), &anchor, &default_snap_angles(), 0.1);
        assert!((p.x - p.y).abs() < 1e-9);
    }

    #[test]
    fn nearly_full_turn_snaps_to_zero() {
        assert_eq!(nearest_angle(358.0, &default_snap_angles()), Some(0.0));
        assert_eq!(nearest_angle(300.0, &default_snap_angles()), Some(315.0));
    }

    #[test]
    fn snapped_points_stay_in_bounds() {
        let cfg = SnappingConfig::default();
        let p = apply_snapping(Point::new(0.999, 0.001), None, &cfg);
        assert!(p.is_valid());
        assert!(close(p, Point::new(1.0, 0.0)));
    }

    #[test]
    fn angle_snapping_can_be_disabled() {
        let cfg = SnappingConfig {
            grid_enabled: false,
            ..SnappingConfig::default()
        }
        .with_angle(false);
        let anchor = Point::new(0.2, 0.2);
        let p = Point::new(0.5, 0.23);
        assert_eq!(apply_snapping(p, Some(&anchor), &cfg), p);
    }
}
