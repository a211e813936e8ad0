//! Creation and scheduling descriptors.
//!
//! These are the records the surrounding controller hands to the model:
//! [`EntityDescriptor`] for `create_entity` and [`TripRequest`] for
//! `schedule_trip`.  Both deserialize from the JSON shapes used in scenario
//! files:
//!
//! ```json
//! { "type": "lightDrone", "name": "drone-1", "position": [0, 270, 0],
//!   "speed": 30, "battery_cap": 3000, "weight_cap": 10 }
//!
//! { "name": "robot-1", "start": [10, 270, 5], "end": [400, 270, -90],
//!   "weight": 3, "search": "astar" }
//! ```

use serde::{Deserialize, Serialize};

use crate::Vec3;

/// Default package weight when a descriptor or trip omits one.
pub const DEFAULT_PACKAGE_WEIGHT: u32 = 5;

/// Default travel speed (units per second) when a descriptor omits one.
pub const DEFAULT_SPEED: f64 = 30.0;

fn default_direction() -> Vec3 {
    Vec3::UNIT_X
}

fn default_weight() -> u32 {
    DEFAULT_PACKAGE_WEIGHT
}

/// Keyed record describing one entity to create.
///
/// `kind` (JSON `type`) selects the factory.  The type-specific fields are
/// optional at the parse level; each factory checks the ones it needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub name: String,

    pub position: Vec3,

    #[serde(default = "default_direction")]
    pub direction: Vec3,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,

    // ── Drone ─────────────────────────────────────────────────────────────
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_cap: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_cap: Option<u32>,

    // ── Charging station ──────────────────────────────────────────────────
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_speed: Option<f64>,

    // ── Package ───────────────────────────────────────────────────────────
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Vec3>,
}

impl EntityDescriptor {
    /// Bare descriptor with no type-specific fields.
    pub fn new(kind: impl Into<String>, name: impl Into<String>, position: Vec3) -> Self {
        Self {
            kind:         kind.into(),
            name:         name.into(),
            position,
            direction:    default_direction(),
            speed:        None,
            battery_cap:  None,
            weight_cap:   None,
            slots:        None,
            charge_speed: None,
            destination:  None,
        }
    }

    pub fn drone(name: impl Into<String>, position: Vec3, battery_cap: u32, weight_cap: u32) -> Self {
        Self {
            battery_cap: Some(battery_cap),
            weight_cap:  Some(weight_cap),
            ..Self::new("drone", name, position)
        }
    }

    pub fn package(name: impl Into<String>, position: Vec3, destination: Vec3) -> Self {
        Self {
            destination: Some(destination),
            ..Self::new("package", name, position)
        }
    }

    pub fn robot(name: impl Into<String>, position: Vec3) -> Self {
        Self::new("robot", name, position)
    }

    pub fn charging_station(
        name:         impl Into<String>,
        position:     Vec3,
        slots:        u32,
        charge_speed: f64,
    ) -> Self {
        Self {
            slots:        Some(slots),
            charge_speed: Some(charge_speed),
            ..Self::new("chargingStation", name, position)
        }
    }

    /// Override the travel speed.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    /// The descriptor's speed, or [`DEFAULT_SPEED`].
    #[inline]
    pub fn speed_or_default(&self) -> f64 {
        self.speed.unwrap_or(DEFAULT_SPEED)
    }
}

/// A delivery request from a named requester.
///
/// `start`/`end` are informational (the package's own position and
/// destination govern routing); the whole record is echoed back in the
/// `DeliveryScheduled` notification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    pub name: String,

    #[serde(default)]
    pub start: Vec3,

    #[serde(default)]
    pub end: Vec3,

    #[serde(default = "default_weight")]
    pub weight: u32,

    #[serde(default)]
    pub search: String,
}

impl TripRequest {
    pub fn new(name: impl Into<String>, weight: u32, search: impl Into<String>) -> Self {
        Self {
            name:   name.into(),
            start:  Vec3::ZERO,
            end:    Vec3::ZERO,
            weight,
            search: search.into(),
        }
    }

    /// Name of the package this request claims: `<name>_package`.
    pub fn package_name(&self) -> String {
        format!("{}_package", self.name)
    }
}
