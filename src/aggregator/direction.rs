// src/aggregator/direction.rs
//! True wind direction, either read from a sensor or derived from heading and
//! apparent wind angle.

use std::f64::consts::TAU;

/// How the true wind direction is obtained. Chosen once from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DirectionMode {
    /// Direction comes straight from the configured direction path
    #[default]
    Direct,
    /// Direction is heading + apparent wind angle, recomputed on every speed sample
    Computed,
}

/// Convert radians to whole degrees in [0, 360).
pub fn radians_to_degrees(radians: f64) -> u16 {
    let degrees = radians.to_degrees().round().rem_euclid(360.0);
    degrees as u16
}

/// Sum of heading and apparent angle, wrapped into [0, 2π) with a single
/// correction step. Both inputs are expected in [0, 2π) already.
pub fn true_wind_heading(heading: f64, apparent_angle: f64) -> f64 {
    let sum = heading + apparent_angle;
    if sum >= TAU {
        sum - TAU
    } else if sum < 0.0 {
        sum + TAU
    } else {
        sum
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DirectionResolver {
    mode: DirectionMode,
}

impl DirectionResolver {
    pub fn new(mode: DirectionMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> DirectionMode {
        self.mode
    }

    /// Direction from a sensor reading. None in computed mode, where sensor
    /// readings are ignored.
    pub fn from_sensor(&self, radians: f64) -> Option<u16> {
        match self.mode {
            DirectionMode::Direct => Some(radians_to_degrees(radians)),
            DirectionMode::Computed => None,
        }
    }

    /// Direction from the latest heading and apparent angle. None in direct
    /// mode or while either reading is still missing.
    pub fn from_heading(&self, heading: Option<f64>, apparent_angle: Option<f64>) -> Option<u16> {
        if self.mode != DirectionMode::Computed {
            return None;
        }
        let (heading, apparent_angle) = (heading?, apparent_angle?);
        Some(radians_to_degrees(true_wind_heading(
            heading,
            apparent_angle,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn direct_mode_converts_radians() {
        let resolver = DirectionResolver::new(DirectionMode::Direct);
        assert_eq!(resolver.from_sensor(FRAC_PI_2), Some(90));
        assert_eq!(resolver.from_sensor(PI), Some(180));
        assert_eq!(resolver.from_sensor(0.0), Some(0));
    }

    #[test]
    fn direct_mode_ignores_heading_inputs() {
        let resolver = DirectionResolver::new(DirectionMode::Direct);
        assert_eq!(resolver.from_heading(Some(1.0), Some(1.0)), None);
    }

    #[test]
    fn computed_mode_ignores_sensor() {
        let resolver = DirectionResolver::new(DirectionMode::Computed);
        assert_eq!(resolver.from_sensor(FRAC_PI_2), None);
    }

    #[test]
    fn computed_without_wraparound() {
        let resolver = DirectionResolver::new(DirectionMode::Computed);
        let expected = (5.8_f64).to_degrees().round() as u16;
        assert_eq!(resolver.from_heading(Some(3.0), Some(2.8)), Some(expected));
        assert_eq!(expected, 332);
    }

    #[test]
    fn computed_wraps_once_past_full_turn() {
        let resolver = DirectionResolver::new(DirectionMode::Computed);
        assert_eq!(resolver.from_heading(Some(5.0), Some(2.0)), Some(41));
        assert!((true_wind_heading(5.0, 2.0) - (7.0 - TAU)).abs() < 1e-12);
    }

    #[test]
    fn computed_wraps_negative_sum() {
        assert!((true_wind_heading(0.5, -1.0) - (TAU - 0.5)).abs() < 1e-12);
    }

    #[test]
    fn computed_waits_for_both_readings() {
        let resolver = DirectionResolver::new(DirectionMode::Computed);
        assert_eq!(resolver.from_heading(None, Some(1.0)), None);
        assert_eq!(resolver.from_heading(Some(1.0), None), None);
        // Zero is a valid reading, not a missing one
        assert_eq!(resolver.from_heading(Some(0.0), Some(0.0)), Some(0));
    }

    #[test]
    fn degrees_stay_below_full_circle() {
        assert_eq!(radians_to_degrees(TAU - 0.001), 0);
        assert_eq!(radians_to_degrees(-FRAC_PI_2), 270);
    }
}
