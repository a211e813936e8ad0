//! Integration tests for dd-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::{CsvWriter, BATTERY_FILE, SUMMARY_FILE};
    use crate::row::{BatteryRow, TickSummaryRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn battery_row(drone_id: u32, tick: u64) -> BatteryRow {
        BatteryRow { tick, elapsed_secs: tick as f64 * 0.5, drone_id, battery_percent: 87.5 }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join(BATTERY_FILE).exists());
        assert!(dir.path().join(SUMMARY_FILE).exists());
    }

    #[test]
    fn csv_creates_missing_directory() {
        let dir = tmp();
        let nested = dir.path().join("runs").join("a");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join(BATTERY_FILE).exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join(BATTERY_FILE)).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["tick", "elapsed_secs", "drone_id", "battery_percent"]);

        let mut rdr2 = csv::Reader::from_path(dir.path().join(SUMMARY_FILE)).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(
            headers2,
            ["tick", "elapsed_secs", "drones", "available_drones", "matched", "pending", "delivered", "removed"]
        );
    }

    #[test]
    fn csv_battery_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_batteries(&[battery_row(0, 4), battery_row(3, 4)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join(BATTERY_FILE)).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "4");      // tick
        assert_eq!(&rows[0][1], "2");      // 4 * 0.5
        assert_eq!(&rows[1][2], "3");      // drone_id
        assert_eq!(&rows[1][3], "87.500"); // battery_percent
    }

    #[test]
    fn csv_tick_summary_row() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&TickSummaryRow {
            tick:             3,
            elapsed_secs:     1.5,
            drones:           4,
            available_drones: 2,
            matched:          1,
            pending:          0,
            delivered:        1,
            removed:          0,
        })
        .unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join(SUMMARY_FILE)).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "3");
        assert_eq!(&rows[0][1], "1.5");
        assert_eq!(&rows[0][3], "2");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

#[cfg(test)]
mod controller_tests {
    use std::io;

    use tempfile::TempDir;

    use dd_core::{EntityDescriptor, EntityId, SimConfig, TripRequest, Vec3};
    use dd_sim::SimBuilder;

    use crate::csv::{CsvWriter, BATTERY_FILE, SUMMARY_FILE};
    use crate::row::{BatteryRow, TickSummaryRow};
    use crate::writer::OutputWriter;
    use crate::{OutputController, OutputError, OutputResult};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn config(total_ticks: u64, output_interval_ticks: u64) -> SimConfig {
        SimConfig { tick_dt: 1.0, total_ticks, seed: 1, output_interval_ticks }
    }

    /// Keeps rows in memory.
    #[derive(Default)]
    struct MemoryWriter {
        batteries: Vec<BatteryRow>,
        summaries: Vec<TickSummaryRow>,
        finished:  usize,
    }

    impl OutputWriter for MemoryWriter {
        fn write_batteries(&mut self, rows: &[BatteryRow]) -> OutputResult<()> {
            self.batteries.extend_from_slice(rows);
            Ok(())
        }

        fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
            self.summaries.push(*row);
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    /// Fails every write with a numbered error.
    #[derive(Default)]
    struct FailingWriter {
        calls: usize,
    }

    impl FailingWriter {
        fn fail(&mut self) -> OutputResult<()> {
            self.calls += 1;
            Err(OutputError::Io(io::Error::other(format!("write {}", self.calls))))
        }
    }

    impl OutputWriter for FailingWriter {
        fn write_batteries(&mut self, _rows: &[BatteryRow]) -> OutputResult<()> {
            self.fail()
        }

        fn write_tick_summary(&mut self, _row: &TickSummaryRow) -> OutputResult<()> {
            self.fail()
        }

        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    #[test]
    fn integration_csv() {
        let config = config(6, 2);
        let dir = tmp();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let controller = OutputController::new(writer, &config);

        let mut model = SimBuilder::new(config, controller)
            .entity(EntityDescriptor::charging_station("cs", Vec3::ZERO, 1, 10.0))
            .entity(EntityDescriptor::drone("d1", Vec3::ZERO, 1_000, 10).with_speed(10.0))
            .entity(EntityDescriptor::drone("d2", Vec3::ZERO, 1_000, 10).with_speed(10.0))
            .build()
            .unwrap();
        model.run();
        let mut controller = model.into_controller();
        controller.finish();
        assert!(controller.take_error().is_none(), "no write errors expected");

        // Interval 2 over 6 ticks: snapshots at 0, 2, 4 for two drones.
        let mut rdr = csv::Reader::from_path(dir.path().join(BATTERY_FILE)).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 6, "expected 3 ticks × 2 drones, got {}", rows.len());
        assert_eq!(&rows[0][2], "1");
        assert_eq!(&rows[1][2], "2");

        let mut rdr = csv::Reader::from_path(dir.path().join(SUMMARY_FILE)).unwrap();
        assert_eq!(rdr.records().count(), 6);
    }

    #[test]
    fn battery_rows_follow_removals() {
        let config = config(10, 1);
        let mut model = SimBuilder::new(config.clone(), OutputController::new(MemoryWriter::default(), &config))
            .entity(EntityDescriptor::drone("a", Vec3::ZERO, 100, 10).with_speed(10.0))
            .entity(EntityDescriptor::drone("b", Vec3::ZERO, 200, 10).with_speed(10.0))
            .build()
            .unwrap();
        model.run_ticks(1);
        model.remove_entity(EntityId(0));
        model.run_ticks(1);
        model.run_ticks(1);

        let writer = model.into_controller().into_writer();
        let ids: Vec<_> = writer.batteries.iter().map(|r| (r.tick, r.drone_id)).collect();
        // The removal lands after tick 1's battery report.
        assert_eq!(ids, vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 1)]);
        // No stations: nothing moves or drains.
        assert!(writer.batteries.iter().all(|r| r.battery_percent == 100.0));
        assert_eq!(writer.summaries.len(), 3);
        assert_eq!(writer.summaries[1].removed, 1);
        assert_eq!(writer.summaries[2].drones, 1);
    }

    #[test]
    fn deliveries_are_counted() {
        let config = config(30, 0);
        let mut model = SimBuilder::new(config.clone(), OutputController::new(MemoryWriter::default(), &config))
            .entity(EntityDescriptor::charging_station("cs", Vec3::ZERO, 1, 10.0))
            .entity(EntityDescriptor::drone("d", Vec3::ZERO, 1_000, 10).with_speed(10.0))
            .entity(EntityDescriptor::robot("amy", Vec3::new(0.0, 0.0, 40.0)))
            .entity(EntityDescriptor::package(
                "amy_package",
                Vec3::new(30.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 40.0),
            ))
            .trip(TripRequest::new("amy", 1, ""))
            .build()
            .unwrap();
        model.run();
        let controller = model.into_controller();
        assert_eq!(controller.delivered(), 1);
        // Interval 0 disables battery snapshots.
        assert!(controller.into_writer().batteries.is_empty());
    }

    #[test]
    fn first_error_is_kept() {
        let config = config(3, 1);
        let mut model = SimBuilder::new(config.clone(), OutputController::new(FailingWriter::default(), &config))
            .entity(EntityDescriptor::drone("d", Vec3::ZERO, 100, 10))
            .build()
            .unwrap();
        model.run();
        model.stop();
        let mut controller = model.into_controller();
        let err = controller.take_error().expect("write error stored");
        assert_eq!(err.to_string(), "I/O error: write 1");
        assert!(controller.take_error().is_none());
        assert_eq!(controller.into_writer().calls, 6, "writes continue after a failure");
    }
}
