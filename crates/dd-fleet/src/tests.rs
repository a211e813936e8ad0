//! Unit tests for dd-fleet.
//!
//! Drone tests run against a miniature world that updates drones, then
//! stations, once per tick.

#[cfg(test)]
mod helpers {
    use dd_core::{EntityDescriptor, EntityId, Vec3};

    use crate::{
        Body, ChargingStation, Drone, DroneTable, FleetContext, Handoff, Package, PackageTable,
        Robot, RobotTable, StationTable,
    };

    pub fn body(id: u32, kind: &str, position: Vec3, speed: f64) -> Body {
        let desc = EntityDescriptor::new(kind, format!("{kind}-{id}"), position).with_speed(speed);
        Body::from_descriptor(EntityId(id), &desc)
    }

    pub fn drone(id: u32, position: Vec3, speed: f64, battery: u32, weight: u32) -> Drone {
        Drone::new(body(id, "drone", position, speed), battery, weight)
    }

    pub fn station(id: u32, position: Vec3, slots: u32, rate: f64) -> ChargingStation {
        ChargingStation::new(body(id, "chargingStation", position, 0.0), slots, rate)
    }

    pub fn package(id: u32, position: Vec3, destination: Vec3) -> Package {
        Package::new(body(id, "package", position, 0.0), destination)
    }

    pub fn robot(id: u32, position: Vec3) -> Robot {
        Robot::new(body(id, "robot", position, 0.0))
    }

    /// Every occupied slot plus every free slot equals capacity, and no
    /// drone is both queued and plugged in.
    pub fn assert_slots_conserved(station: &ChargingStation) {
        let occupied = station.occupants().count();
        assert_eq!(station.slots_available() as usize + occupied, station.capacity());
        for d in station.occupants() {
            assert!(!station.is_queued(d), "{d} is both plugged and queued");
        }
    }

    #[derive(Default)]
    pub struct World {
        pub drones:   DroneTable,
        pub packages: PackageTable,
        pub stations: StationTable,
        pub robots:   RobotTable,
    }

    impl World {
        pub fn with_drone(mut self, d: Drone) -> Self {
            self.drones.insert(d.id(), d);
            self
        }

        pub fn with_station(mut self, s: ChargingStation) -> Self {
            self.stations.insert(s.id(), s);
            self
        }

        pub fn with_package(mut self, p: Package) -> Self {
            self.packages.insert(p.id(), p);
            self
        }

        pub fn with_robot(mut self, r: Robot) -> Self {
            self.robots.insert(r.body.id, r);
            self
        }

        pub fn tick(&mut self, dt: f64) -> Vec<Handoff> {
            let mut handoffs = Vec::new();
            for drone in self.drones.values_mut() {
                let mut ctx =
                    FleetContext::new(&mut self.packages, &mut self.stations, &mut self.robots);
                handoffs.extend(drone.update(dt, &mut ctx));
            }
            for station in self.stations.values_mut() {
                station.update(dt, &mut self.drones);
                assert_slots_conserved(station);
            }
            handoffs
        }

        pub fn assign(&mut self, drone: u32, package: u32, charge_required: f64, station: u32) {
            let pos = self.stations[&EntityId(station)].position();
            let pkg = self.packages.get_mut(&EntityId(package)).unwrap();
            self.drones
                .get_mut(&EntityId(drone))
                .unwrap()
                .set_next_delivery(pkg, charge_required, (EntityId(station), pos), None);
        }

        pub fn drone(&self, id: u32) -> &Drone {
            &self.drones[&EntityId(id)]
        }

        pub fn station(&self, id: u32) -> &ChargingStation {
            &self.stations[&EntityId(id)]
        }
    }
}

// ── ChargingStation ───────────────────────────────────────────────────────────

#[cfg(test)]
mod station {
    use dd_core::{EntityId, Vec3};

    use super::helpers::{assert_slots_conserved, drone, station};
    use crate::{closest_station, DroneTable, StationTable};

    fn drones(ids: &[u32]) -> DroneTable {
        ids.iter()
            .map(|&id| (EntityId(id), drone(id, Vec3::ZERO, 10.0, 100, 10)))
            .collect()
    }

    #[test]
    fn update_fills_free_slots_in_queue_order() {
        let mut table = drones(&[1, 2, 3]);
        let mut s = station(0, Vec3::ZERO, 2, 5.0);
        for id in [3, 1, 2] {
            s.queue_up(EntityId(id));
        }
        s.update(1.0, &mut table);
        assert_eq!(s.occupants().collect::<Vec<_>>(), vec![EntityId(3), EntityId(1)]);
        assert_eq!(s.queued().collect::<Vec<_>>(), vec![EntityId(2)]);
        assert_eq!(s.slots_available(), 0);
        assert_slots_conserved(&s);
    }

    #[test]
    fn unplug_frees_slot_when_queue_empty() {
        let mut table = drones(&[1]);
        let mut s = station(0, Vec3::ZERO, 1, 5.0);
        s.queue_up(EntityId(1));
        s.update(1.0, &mut table);
        assert!(s.unplug(EntityId(1)));
        assert_eq!(s.slots_available(), 1);
        assert!(!s.unplug(EntityId(1)), "second unplug is a no-op");
        assert_slots_conserved(&s);
    }

    #[test]
    fn unplug_hands_slot_to_queue_front() {
        let mut table = drones(&[1, 2]);
        let mut s = station(0, Vec3::ZERO, 1, 5.0);
        s.queue_up(EntityId(1));
        s.update(1.0, &mut table);
        s.queue_up(EntityId(2));
        s.unplug(EntityId(1));
        assert!(s.is_plugged(EntityId(2)));
        assert_eq!(s.slots_available(), 0, "occupancy transferred, count unchanged");
        assert_eq!(s.queued().count(), 0);
    }

    #[test]
    fn recharge_tops_up_and_clamps() {
        let mut table = drones(&[1]);
        table.get_mut(&EntityId(1)).unwrap().recharge(-1_000.0);
        let mut s = station(0, Vec3::ZERO, 1, 30.0);
        s.queue_up(EntityId(1));

        // Tick 1 only promotes (recharge runs before promotion).
        s.update(1.0, &mut table);
        assert_eq!(table[&EntityId(1)].battery_charge(), 0.0);

        for _ in 0..4 {
            s.update(1.0, &mut table);
        }
        assert_eq!(table[&EntityId(1)].battery_charge(), 100.0, "clamped at capacity");
        assert!(s.is_plugged(EntityId(1)));

        // Next tick sees a full battery and unplugs without charging.
        s.update(1.0, &mut table);
        assert!(!s.is_plugged(EntityId(1)));
        assert_eq!(s.slots_available(), 1);
    }

    #[test]
    fn full_occupant_is_replaced_by_queued_drone_same_tick() {
        let mut table = drones(&[1, 2]);
        table.get_mut(&EntityId(1)).unwrap().recharge(-10.0);
        let mut s = station(0, Vec3::ZERO, 1, 10.0);
        s.queue_up(EntityId(1));
        s.update(1.0, &mut table);
        s.queue_up(EntityId(2));

        // 90 → 100.
        s.update(1.0, &mut table);
        assert!(s.is_plugged(EntityId(1)));
        // Full: unplugged and drone 2 promoted within this update.
        s.update(1.0, &mut table);
        assert!(s.is_plugged(EntityId(2)));
        assert!(!s.is_plugged(EntityId(1)));
        assert!(!s.is_queued(EntityId(2)));
        assert_slots_conserved(&s);
    }

    #[test]
    fn queue_up_ignores_docked_drone() {
        let mut table = drones(&[1]);
        let mut s = station(0, Vec3::ZERO, 1, 5.0);
        s.queue_up(EntityId(1));
        s.queue_up(EntityId(1));
        assert_eq!(s.queued().count(), 1);
        s.update(1.0, &mut table);
        s.queue_up(EntityId(1));
        assert_eq!(s.queued().count(), 0);
    }

    #[test]
    fn release_leaves_queue_or_slot() {
        let mut table = drones(&[1, 2]);
        let mut s = station(0, Vec3::ZERO, 1, 5.0);
        s.queue_up(EntityId(1));
        s.queue_up(EntityId(2));
        s.update(1.0, &mut table);
        assert!(s.release(EntityId(2)));
        assert!(!s.is_queued(EntityId(2)));
        assert!(s.release(EntityId(1)));
        assert_eq!(s.slots_available(), 1);
        assert!(!s.release(EntityId(1)));
    }

    #[test]
    fn dangling_occupant_is_dropped() {
        let mut table = drones(&[1]);
        let mut s = station(0, Vec3::ZERO, 1, 5.0);
        s.queue_up(EntityId(1));
        s.update(1.0, &mut table);
        table.clear();
        s.update(1.0, &mut table);
        assert_eq!(s.occupants().count(), 0);
        assert_slots_conserved(&s);
    }

    #[test]
    fn closest_station_prefers_lowest_id_on_tie() {
        let mut stations = StationTable::new();
        assert_eq!(closest_station(&stations, Vec3::ZERO), None);
        for (id, x) in [(7, -5.0), (4, 5.0), (9, 50.0)] {
            stations.insert(EntityId(id), station(id, Vec3::new(x, 0.0, 0.0), 1, 1.0));
        }
        let (id, pos) = closest_station(&stations, Vec3::ZERO).unwrap();
        assert_eq!(id, EntityId(4));
        assert_eq!(pos, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(closest_station(&stations, Vec3::new(40.0, 0.0, 0.0)).unwrap().0, EntityId(9));
    }
}

// ── Drone ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod drone {
    use dd_core::{EntityId, Vec3};

    use super::helpers::{drone, package, robot, station, World};
    use crate::DroneState;

    const STATION: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    const PICKUP: Vec3 = Vec3::new(10.0, 0.0, 0.0);
    const DEST: Vec3 = Vec3::new(10.0, 0.0, 20.0);

    /// Drone 1 (speed 10) at the station, station 0 with one slot, package
    /// 2 addressed to robot 3.
    fn world() -> World {
        let mut w = World::default()
            .with_station(station(0, STATION, 1, 10.0))
            .with_drone(drone(1, STATION, 10.0, 1_000, 10))
            .with_package(package(2, PICKUP, DEST))
            .with_robot(robot(3, DEST));
        w.packages.get_mut(&EntityId(2)).unwrap().init_delivery(EntityId(3));
        w
    }

    #[test]
    fn new_drone_is_available_and_full() {
        let d = drone(1, Vec3::ZERO, 30.0, 500, 8);
        assert!(d.is_available());
        assert_eq!(d.battery_charge(), 500.0);
        assert_eq!(d.battery_percent(), 100.0);
        assert_eq!(d.state(), DroneState::SeekingStation);
    }

    #[test]
    fn first_update_binds_and_docks_at_closest_station() {
        let mut w = world().with_station(station(5, Vec3::new(500.0, 0.0, 0.0), 1, 1.0));
        w.tick(1.0);
        let d = w.drone(1);
        assert_eq!(d.next_station(), Some(EntityId(0)));
        assert_eq!(d.docked_station(), Some(EntityId(0)));
        assert_eq!(d.state(), DroneState::Docked);
        assert!(w.station(0).is_plugged(EntityId(1)), "queued then promoted in the same tick");
    }

    #[test]
    fn no_station_keeps_seeking() {
        let mut w = World::default().with_drone(drone(1, Vec3::ZERO, 10.0, 100, 1));
        w.tick(1.0);
        assert_eq!(w.drone(1).state(), DroneState::SeekingStation);
        w = w.with_station(station(0, Vec3::new(10.0, 0.0, 0.0), 1, 1.0));
        w.tick(1.0);
        assert_eq!(w.drone(1).next_station(), Some(EntityId(0)));
    }

    #[test]
    fn assignment_makes_drone_unavailable_and_claims_package() {
        let mut w = world();
        w.tick(1.0);
        w.assign(1, 2, 45.0, 0);
        let d = w.drone(1);
        assert!(!d.is_available());
        assert_eq!(d.state(), DroneState::ToPackage);
        assert_eq!(d.package(), Some(EntityId(2)));
        assert_eq!(w.packages[&EntityId(2)].carrier(), Some(EntityId(1)));
    }

    #[test]
    fn full_delivery_cycle() {
        let mut w = world();
        w.tick(1.0);
        w.assign(1, 2, 45.0, 0);

        // Tick 2: reach pickup (10 units), release the slot.
        assert!(w.tick(1.0).is_empty());
        let d = w.drone(1);
        assert!(d.is_picked_up());
        assert_eq!(d.charge_required(), 0.0);
        assert_eq!(d.docked_station(), None);
        assert_eq!(w.station(0).slots_available(), 1);

        // Tick 3: halfway, the package rides along.
        assert!(w.tick(1.0).is_empty());
        assert!(w.packages[&EntityId(2)].position().approx_eq(Vec3::new(10.0, 0.0, 10.0), 1e-9));

        // Tick 4: delivered.
        let handoffs = w.tick(1.0);
        assert_eq!(handoffs.len(), 1);
        assert_eq!(handoffs[0].package, EntityId(2));
        assert_eq!(handoffs[0].recipient, Some(EntityId(3)));
        let p = &w.packages[&EntityId(2)];
        assert_eq!(p.position(), DEST);
        assert!(p.is_delivered());
        assert_eq!(p.carrier(), None);
        assert_eq!(w.robots[&EntityId(3)].received(), &[EntityId(2)]);
        assert!(!w.robots[&EntityId(3)].requested_delivery());
        assert_eq!(w.drone(1).package(), None);
        assert_eq!(w.drone(1).state(), DroneState::ToStation);

        // Ticks 5-7: ~22.4 units back to the station.
        for _ in 0..3 {
            w.tick(1.0);
        }
        let d = w.drone(1);
        assert!(d.is_available());
        assert_eq!(d.position(), STATION);
        assert_eq!(d.docked_station(), Some(EntityId(0)));
        // Seven moving ticks at 10/s, counting the zero-length hop onto the
        // station in tick 1.
        assert!((d.battery_charge() - 930.0).abs() < 1e-9, "got {}", d.battery_charge());
    }

    #[test]
    fn waits_in_place_until_charge_exceeds_requirement() {
        let mut w = world();
        w.tick(1.0);
        w.drones.get_mut(&EntityId(1)).unwrap().recharge(-970.0); // 20 left
        w.assign(1, 2, 35.0, 0);

        // Station adds 10/tick: 30 after one tick, 40 after two.
        w.tick(1.0);
        assert_eq!(w.drone(1).position(), STATION);
        assert!(w.station(0).is_plugged(EntityId(1)));
        w.tick(1.0);
        assert_eq!(w.drone(1).position(), STATION, "30 < 35, still waiting");
        w.tick(1.0);
        assert_eq!(w.drone(1).position(), PICKUP);
        assert!(!w.station(0).is_plugged(EntityId(1)));
    }

    #[test]
    fn battery_drains_per_tick_not_per_distance() {
        let mut w = World::default()
            .with_station(station(0, Vec3::new(1.0, 0.0, 0.0), 1, 0.0))
            .with_drone(drone(1, Vec3::ZERO, 10.0, 100, 1));
        // Only 1 unit to fly, but a whole tick of drain.
        w.tick(1.0);
        assert_eq!(w.drone(1).battery_charge(), 90.0);
    }

    #[test]
    fn battery_never_negative() {
        let mut w = World::default()
            .with_station(station(0, Vec3::new(1_000.0, 0.0, 0.0), 1, 0.0))
            .with_drone(drone(1, Vec3::ZERO, 10.0, 25, 1));
        for _ in 0..5 {
            w.tick(1.0);
            assert!(w.drone(1).battery_charge() >= 0.0);
        }
        assert_eq!(w.drone(1).battery_charge(), 0.0);
    }

    #[test]
    fn recharge_clamps_at_capacity() {
        let mut d = drone(1, Vec3::ZERO, 10.0, 50, 1);
        d.recharge(-20.0);
        d.recharge(1_000.0);
        assert_eq!(d.battery_charge(), 50.0);
    }

    #[test]
    fn abandoned_delivery_returns_to_station() {
        let mut w = world();
        w.tick(1.0);
        w.assign(1, 2, 45.0, 0);
        w.tick(1.0);
        w.drones.get_mut(&EntityId(1)).unwrap().abandon_delivery(&mut w.stations);
        w.packages.clear();

        let d = w.drone(1);
        assert!(!d.is_available(), "not matchable until docked");
        assert_eq!(d.package(), None);
        assert_eq!(d.state(), DroneState::ToStation);
        w.tick(1.0);
        let d = w.drone(1);
        assert!(d.is_available());
        assert_eq!(d.docked_station(), Some(EntityId(0)));
    }

    #[test]
    fn waiting_drone_away_from_stations_docks_first() {
        let mut w = World::default()
            .with_station(station(0, STATION, 1, 10.0))
            .with_drone(drone(1, Vec3::new(30.0, 0.0, 0.0), 10.0, 1_000, 10))
            .with_package(package(2, PICKUP, DEST))
            .with_robot(robot(3, DEST));
        w.packages.get_mut(&EntityId(2)).unwrap().init_delivery(EntityId(3));
        w.assign(1, 2, 2_000.0, 0);

        w.tick(1.0);
        let d = w.drone(1);
        assert_eq!(d.position(), Vec3::new(20.0, 0.0, 0.0));
        assert_eq!(d.docked_station(), None);
        assert_eq!(d.battery_charge(), 990.0);

        w.tick(1.0);
        w.tick(1.0);
        let d = w.drone(1);
        assert_eq!(d.position(), STATION);
        assert_eq!(d.docked_station(), Some(EntityId(0)));
        assert_eq!(d.state(), DroneState::ToPackage);
        assert!(!d.is_available());
        assert!(w.station(0).is_plugged(EntityId(1)));
    }

    #[test]
    fn forgotten_station_is_replaced_by_next_closest() {
        let mut w = world().with_station(station(9, Vec3::new(0.0, 0.0, 5.0), 1, 1.0));
        w.tick(1.0);
        w.stations.remove(&EntityId(0));
        w.drones.get_mut(&EntityId(1)).unwrap().forget_station(EntityId(0));
        assert_eq!(w.drone(1).state(), DroneState::SeekingStation);

        w.tick(1.0);
        let d = w.drone(1);
        assert_eq!(d.next_station(), Some(EntityId(9)));
        assert_eq!(d.docked_station(), Some(EntityId(9)));
    }
}

// ── Factories ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod factory {
    use dd_core::{descriptor::DEFAULT_SPEED, EntityDescriptor, EntityId, Vec3};

    use crate::{CompositeFactory, Entity, EntityFactory, EntityKind, FleetError};

    fn build(desc: &EntityDescriptor) -> Option<Entity> {
        CompositeFactory::default().create(EntityId(0), desc).unwrap()
    }

    #[test]
    fn drone_descriptor_roundtrip() {
        let desc = EntityDescriptor::drone("d", Vec3::new(1.0, 2.0, 3.0), 3_000, 12);
        let Some(Entity::Drone(d)) = build(&desc) else { panic!("expected a drone") };
        assert_eq!(d.battery_capacity(), 3_000);
        assert_eq!(d.weight_capacity(), 12);
        assert_eq!(d.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(d.speed(), DEFAULT_SPEED);
        assert_eq!(d.body.name, "d");
    }

    #[test]
    fn drone_variants_share_a_factory() {
        for kind in ["lightDrone", "mediumDrone", "heavyDrone"] {
            let desc = EntityDescriptor { kind: kind.into(), ..EntityDescriptor::drone("d", Vec3::ZERO, 1, 1) };
            let entity = build(&desc).unwrap();
            assert_eq!(entity.kind(), EntityKind::Drone);
            assert_eq!(entity.body().kind, kind);
        }
    }

    #[test]
    fn station_and_package_fields() {
        let desc = EntityDescriptor::charging_station("cs", Vec3::ZERO, 3, 12.5);
        let Some(Entity::ChargingStation(s)) = build(&desc) else { panic!("expected a station") };
        assert_eq!(s.capacity(), 3);
        assert_eq!(s.slots_available(), 3);
        assert_eq!(s.charge_rate(), 12.5);

        let desc = EntityDescriptor::package("p", Vec3::ZERO, Vec3::new(5.0, 0.0, 5.0));
        let Some(Entity::Package(p)) = build(&desc) else { panic!("expected a package") };
        assert_eq!(p.destination(), Vec3::new(5.0, 0.0, 5.0));
        assert_eq!(p.weight(), 5);
        assert!(p.requires_delivery());
    }

    #[test]
    fn unknown_type_builds_nothing() {
        let desc = EntityDescriptor::new("helicopter", "h", Vec3::ZERO);
        assert!(build(&desc).is_none());
        assert!(CompositeFactory::empty().create(EntityId(0), &EntityDescriptor::robot("r", Vec3::ZERO)).unwrap().is_none());
    }

    #[test]
    fn missing_field_is_an_error() {
        let desc = EntityDescriptor::new("drone", "d", Vec3::ZERO);
        let err = CompositeFactory::default().create(EntityId(0), &desc).unwrap_err();
        assert!(matches!(err, FleetError::MissingField { field: "battery_cap", .. }), "{err}");

        let desc = EntityDescriptor::new("chargingStation", "cs", Vec3::ZERO);
        let err = CompositeFactory::default().create(EntityId(0), &desc).unwrap_err();
        assert!(matches!(err, FleetError::MissingField { field: "slots", .. }));
    }

    #[test]
    fn negative_values_are_rejected() {
        let desc = EntityDescriptor::charging_station("cs", Vec3::ZERO, 1, -1.0);
        assert!(matches!(
            CompositeFactory::default().create(EntityId(0), &desc),
            Err(FleetError::InvalidField { field: "charge_speed", .. })
        ));
        let desc = EntityDescriptor::drone("d", Vec3::ZERO, 1, 1).with_speed(f64::NAN);
        assert!(matches!(
            CompositeFactory::default().create(EntityId(0), &desc),
            Err(FleetError::InvalidField { field: "speed", .. })
        ));
    }
}
