pub const POSITION_PATH: &str = "navigation.position";
pub const HEADING_PATH: &str = "navigation.headingTrue";
pub const APPARENT_ANGLE_PATH: &str = "environment.wind.angleApparent";
pub const DEFAULT_WIND_SPEED_PATH: &str = "environment.wind.speedOverGround";
pub const DEFAULT_WIND_DIRECTION_PATH: &str = "environment.wind.angleTrueGround";

/// Type-safe representation of the telemetry streams the reporter consumes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TelemetryKind {
    Position,
    WindSpeed,
    WindDirection,
    Heading,
    ApparentAngle,
    Unknown,
}

impl TelemetryKind {
    /// All kinds the reporter subscribes to
    pub fn subscribed() -> &'static [TelemetryKind] {
        &[
            TelemetryKind::Position,
            TelemetryKind::WindDirection,
            TelemetryKind::WindSpeed,
            TelemetryKind::Heading,
            TelemetryKind::ApparentAngle,
        ]
    }
}

/// Path names for each telemetry kind. Wind speed and direction paths are
/// configurable, the navigation paths are fixed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TelemetryPaths {
    pub wind_speed: String,
    pub wind_direction: String,
}

impl Default for TelemetryPaths {
    fn default() -> Self {
        Self {
            wind_speed: DEFAULT_WIND_SPEED_PATH.to_string(),
            wind_direction: DEFAULT_WIND_DIRECTION_PATH.to_string(),
        }
    }
}

impl TelemetryPaths {
    pub fn new(wind_speed: impl Into<String>, wind_direction: impl Into<String>) -> Self {
        Self {
            wind_speed: wind_speed.into(),
            wind_direction: wind_direction.into(),
        }
    }

    /// Resolve a path string to its kind
    pub fn resolve(&self, path: &str) -> TelemetryKind {
        // Configured paths win over the fixed ones so a user can point wind
        // speed at any key, including one of the navigation paths.
        if path == self.wind_speed {
            TelemetryKind::WindSpeed
        } else if path == self.wind_direction {
            TelemetryKind::WindDirection
        } else {
            match path {
                POSITION_PATH => TelemetryKind::Position,
                HEADING_PATH => TelemetryKind::Heading,
                APPARENT_ANGLE_PATH => TelemetryKind::ApparentAngle,
                _ => TelemetryKind::Unknown,
            }
        }
    }

    /// Path string for a kind (None for Unknown)
    pub fn path_for(&self, kind: TelemetryKind) -> Option<&str> {
        match kind {
            TelemetryKind::Position => Some(POSITION_PATH),
            TelemetryKind::WindSpeed => Some(&self.wind_speed),
            TelemetryKind::WindDirection => Some(&self.wind_direction),
            TelemetryKind::Heading => Some(HEADING_PATH),
            TelemetryKind::ApparentAngle => Some(APPARENT_ANGLE_PATH),
            TelemetryKind::Unknown => None,
        }
    }

    /// Paths to subscribe to, in subscription order
    pub fn subscription_paths(&self) -> Vec<&str> {
        TelemetryKind::subscribed()
            .iter()
            .filter_map(|kind| self.path_for(*kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribed_kinds_round_trip_through_path() {
        let paths = TelemetryPaths::default();
        for kind in TelemetryKind::subscribed() {
            let path = paths.path_for(*kind).unwrap();
            assert_eq!(paths.resolve(path), *kind);
        }
    }

    #[test]
    fn unknown_paths_resolve_to_unknown() {
        let paths = TelemetryPaths::default();
        assert_eq!(
            paths.resolve("environment.outside.temperature"),
            TelemetryKind::Unknown
        );
        assert_eq!(paths.path_for(TelemetryKind::Unknown), None);
    }

    #[test]
    fn configured_paths_are_honoured() {
        let paths = TelemetryPaths::new(
            "environment.wind.speedTrue",
            "environment.wind.directionTrue",
        );
        assert_eq!(
            paths.resolve("environment.wind.speedTrue"),
            TelemetryKind::WindSpeed
        );
        assert_eq!(
            paths.resolve("environment.wind.directionTrue"),
            TelemetryKind::WindDirection
        );
        assert_eq!(
            paths.resolve(DEFAULT_WIND_SPEED_PATH),
            TelemetryKind::Unknown
        );
    }

    #[test]
    fn subscribes_to_five_paths() {
        let paths = TelemetryPaths::default();
        let subscribed = paths.subscription_paths();
        assert_eq!(subscribed.len(), 5);
        assert_eq!(subscribed[0], POSITION_PATH);
    }
}
