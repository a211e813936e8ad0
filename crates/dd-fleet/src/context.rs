//! Mutable world view handed to a drone during its update.

use crate::{PackageTable, RobotTable, StationTable};

/// The tables a drone may touch while it updates.
///
/// The simulation model owns every table; it lends them out one drone at a
/// time, so a drone sees the effects of every entity updated before it in
/// the same tick.  Drones never receive the drone table itself.
pub struct FleetContext<'a> {
    pub packages: &'a mut PackageTable,
    pub stations: &'a mut StationTable,
    pub robots:   &'a mut RobotTable,
}

impl<'a> FleetContext<'a> {
    pub fn new(
        packages: &'a mut PackageTable,
        stations: &'a mut StationTable,
        robots:   &'a mut RobotTable,
    ) -> Self {
        Self { packages, stations, robots }
    }
}
