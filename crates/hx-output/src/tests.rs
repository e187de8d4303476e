//! Integration tests for hx-output.

#[cfg(test)]
mod helpers {
    use hx_core::{AgentId, Coord, ExposureConfig, TravelMode};
    use hx_exposure::{Aggregator, LinkExposureStore};
    use hx_spatial::{LinkSpec, NetworkBuilder, Parcel, ParcelStoreBuilder, SpatialJoin, ThermalIndex};
    use hx_thermal::{CurveStore, TemperatureCurve};
    use hx_trajectory::{Activity, Agent, Event, Leg, Population};

    /// Links "w" (radiant 40 °C) and "x" (no radiant), air 30 °C; one
    /// parcel "P1" at 20 °C.
    pub fn index() -> ThermalIndex {
        let mut curves = CurveStore::new();
        let air = curves.insert(TemperatureCurve::constant("air", 30.0).unwrap()).unwrap();
        let mrt = curves.insert(TemperatureCurve::constant("mrt", 40.0).unwrap()).unwrap();
        let home = curves.insert(TemperatureCurve::constant("home", 20.0).unwrap()).unwrap();

        let mut j = SpatialJoin::new();
        j.add_site(Coord::new(0.0, 0.0), air);

        let mut b = NetworkBuilder::new();
        let a = b.add_node("a", Coord::new(0.0, 0.0), None).unwrap();
        let c = b.add_node("c", Coord::new(100.0, 0.0), None).unwrap();
        let mut w = LinkSpec::new("w", a, c, 100.0);
        w.radiant_curve = Some(mrt);
        b.add_link(w).unwrap();
        b.add_link(LinkSpec::new("x", c, a, 100.0)).unwrap();
        let net = b.build(&j.build()).unwrap();

        let mut p = ParcelStoreBuilder::new();
        p.add_parcel(Parcel { name: "P1".into(), curve: home, coord: Some(Coord::new(0.0, 0.0)) }).unwrap();
        ThermalIndex::new(curves, net, p.build()).unwrap()
    }

    fn agent(idx: &ThermalIndex, id: u32, name: &str, aborted: bool) -> Agent {
        let w = idx.network().resolve_link("w").unwrap();
        let x = idx.network().resolve_link("x").unwrap();
        let parcel = idx.activity_parcel(w).unwrap();
        let act = |start, end| Activity { act_type: "home".into(), link: w, parcel, start, end, air: None };
        let cfg = ExposureConfig::default();

        let mut leg = Leg::open("walk", cfg.classify(TravelMode::Walk), 28_800, w);
        leg.end = Some(29_400);
        leg.end_link = Some(x);
        leg.traveled = true;
        leg.events = vec![Event::new(w, 28_800, 29_100), Event::new(x, 29_100, 29_400)];

        let mut a = Agent::new(AgentId(id), name);
        a.activities = vec![act(0, Some(28_800)), act(29_400, Some(86_400))];
        a.legs = vec![leg];
        a.aborted = aborted;
        a
    }

    /// A complete agent whose two legs carry tags outside the known mode set.
    pub fn unlisted_modes(idx: &ThermalIndex) -> Agent {
        let w = idx.network().resolve_link("w").unwrap();
        let parcel = idx.activity_parcel(w).unwrap();
        let act = |start, end| Activity { act_type: "home".into(), link: w, parcel, start, end, air: None };
        let cfg = ExposureConfig::default();

        let mut legs = Vec::new();
        for (tag, start) in [("access_walk", 28_800), ("car_passenger", 30_000)] {
            let mut leg = Leg::open(tag, cfg.classify(TravelMode::from_tag(tag)), start, w);
            leg.end = Some(start + 600);
            leg.end_link = Some(w);
            legs.push(leg);
        }

        let mut a = Agent::new(AgentId(0), "3");
        a.activities = vec![act(0, Some(28_800)), act(29_400, Some(30_000)), act(30_600, Some(86_400))];
        a.legs = legs;
        a
    }

    /// Agent "1" complete, agent "2" aborted; both aggregated.
    pub fn results(idx: &ThermalIndex) -> (Population, LinkExposureStore) {
        let mut pop = Population::new(vec![agent(idx, 0, "1", false), agent(idx, 1, "2", true)], vec![]);
        let cfg = ExposureConfig::default();
        let agg = Aggregator::new(idx, &cfg).unwrap();
        let mut links = agg.link_store();
        agg.run(&mut pop, &mut links).unwrap();
        (pop, links)
    }
}

// ── Row flattening ────────────────────────────────────────────────────────────

#[cfg(test)]
mod rows {
    use super::helpers::*;
    use crate::{ExportCounts, RowBatch, link_rows};

    #[test]
    fn agent_flattens_to_rows() {
        let idx = index();
        let (pop, _) = results(&idx);
        let mut batch = RowBatch::new();
        batch.push_agent(&pop.agents()[0], &idx);

        assert_eq!(batch.agents.len(), 1);
        assert_eq!(batch.agents[0].agent_id, "1");
        assert_eq!(batch.agents[0].segments, 3);
        assert_eq!(batch.activities.len(), 2);
        assert_eq!(batch.activities[1].parcel_id, "P1");
        assert_eq!(batch.activities[1].duration, Some(57_000));
        assert_eq!(batch.legs[0].mode, "walk");
        assert_eq!(batch.legs[0].air, Some(18_000.0));
        // "x" has no radiant curve, so the leg's radiant is undefined.
        assert_eq!(batch.legs[0].radiant, None);
        let links: Vec<&str> = batch.events.iter().map(|e| e.link_id.as_str()).collect();
        assert_eq!(links, ["w", "x"]);
        assert_eq!(batch.events[0].radiant, Some(12_000.0));
    }

    #[test]
    fn leg_rows_carry_logged_mode_tag() {
        let idx = index();
        let mut batch = RowBatch::new();
        batch.push_agent(&unlisted_modes(&idx), &idx);
        let modes: Vec<&str> = batch.legs.iter().map(|l| l.mode.as_str()).collect();
        assert_eq!(modes, ["access_walk", "car_passenger"]);
    }

    #[test]
    fn sequence_numbers_continue_across_flushes() {
        struct Sink(Vec<u64>);
        impl crate::OutputWriter for Sink {
            fn write_agents(&mut self, _: &[crate::AgentRow]) -> crate::OutputResult<()> { Ok(()) }
            fn write_activities(&mut self, rows: &[crate::ActivityRow]) -> crate::OutputResult<()> {
                self.0.extend(rows.iter().map(|r| r.activity_id));
                Ok(())
            }
            fn write_legs(&mut self, _: &[crate::LegRow]) -> crate::OutputResult<()> { Ok(()) }
            fn write_events(&mut self, _: &[crate::EventRow]) -> crate::OutputResult<()> { Ok(()) }
            fn write_links(&mut self, _: &[crate::LinkRow]) -> crate::OutputResult<()> { Ok(()) }
            fn finish(&mut self) -> crate::OutputResult<()> { Ok(()) }
        }

        let idx = index();
        let (pop, links) = results(&idx);
        let mut sink = Sink(Vec::new());
        let counts = crate::export(&mut sink, &pop, &idx, &links, 1).unwrap();
        assert_eq!(sink.0, vec![0, 1, 2, 3]);
        assert_eq!(
            counts,
            ExportCounts { agents: 2, activities: 4, legs: 2, events: 4, links: 2 }
        );
    }

    #[test]
    fn link_rows_cover_network() {
        let idx = index();
        let (_, links) = results(&idx);
        let rows = link_rows(&idx, &links);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].link_id, "w");
        assert_eq!(rows[0].traversals, 2);
        assert_eq!(rows[0].radiant, Some(24_000.0));
        assert_eq!(rows[1].radiant, None);
    }
}

// ── CSV tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::helpers::*;
    use crate::csv::CsvWriter;
    use crate::writer::OutputWriter;
    use crate::{DEFAULT_BATCH, export};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn headers(dir: &TempDir, name: &str) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(dir.path().join(name)).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    #[test]
    fn csv_files_and_headers() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert_eq!(headers(&dir, "agents.csv"), ["agent_id", "segments", "aborted", "air", "radiant"]);
        assert_eq!(headers(&dir, "links.csv"), ["link_id", "traversals", "air", "radiant"]);
        assert_eq!(headers(&dir, "events.csv")[1], "leg_idx");
        assert!(dir.path().join("activities.csv").exists());
        assert!(dir.path().join("legs.csv").exists());
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_export_writes_nulls_as_empty() {
        let dir = tmp();
        let idx = index();
        let (pop, links) = results(&idx);
        let mut w = CsvWriter::new(dir.path()).unwrap();
        export(&mut w, &pop, &idx, &links, DEFAULT_BATCH).unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("agents.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "1");
        assert_eq!(&rows[0][2], "0");
        assert!(!rows[0][3].is_empty());
        assert_eq!(&rows[1][2], "1"); // aborted
        assert_eq!(&rows[1][3], ""); // air undefined

        let mut rdr = csv::Reader::from_path(dir.path().join("events.csv")).unwrap();
        assert_eq!(rdr.records().count(), 4);
    }

    #[test]
    fn csv_leg_mode_column_keeps_tag() {
        let dir = tmp();
        let idx = index();
        let mut pop = hx_trajectory::Population::new(vec![unlisted_modes(&idx)], vec![]);
        let cfg = hx_core::ExposureConfig::default();
        let agg = hx_exposure::Aggregator::new(&idx, &cfg).unwrap();
        let mut links = agg.link_store();
        agg.run(&mut pop, &mut links).unwrap();

        let mut w = CsvWriter::new(dir.path()).unwrap();
        export(&mut w, &pop, &idx, &links, DEFAULT_BATCH).unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("legs.csv")).unwrap();
        let modes: Vec<String> = rdr.records().map(|r| r.unwrap()[3].to_owned()).collect();
        assert_eq!(modes, ["access_walk", "car_passenger"]);
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use super::helpers::*;
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;
    use crate::{DEFAULT_BATCH, export};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert!(dir.path().join("results.db").exists());
    }

    #[test]
    fn sqlite_export_counts_and_nulls() {
        let dir = tmp();
        let idx = index();
        let (pop, links) = results(&idx);
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        export(&mut w, &pop, &idx, &links, DEFAULT_BATCH).unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("results.db")).unwrap();
        let count = |table: &str| -> i64 {
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0)).unwrap()
        };
        assert_eq!(count("agents"), 2);
        assert_eq!(count("activities"), 4);
        assert_eq!(count("legs"), 2);
        assert_eq!(count("events"), 4);
        assert_eq!(count("links"), 2);

        let air: Option<f64> = conn
            .query_row("SELECT air FROM agents WHERE agent_id = '2'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(air, None);
        let leg_air: Option<f64> = conn
            .query_row("SELECT air FROM legs WHERE agent_id = '1'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(leg_air, Some(18_000.0));
        let radiant: Option<f64> = conn
            .query_row("SELECT radiant FROM links WHERE link_id = 'x'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(radiant, None);
    }
}

// ── Parquet tests ─────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parquet"))]
mod parquet_tests {
    use tempfile::TempDir;

    use arrow::datatypes::DataType;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use super::helpers::*;
    use crate::parquet::ParquetWriter;
    use crate::writer::OutputWriter;
    use crate::{DEFAULT_BATCH, export};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn rows(dir: &TempDir, name: &str) -> usize {
        let file = std::fs::File::open(dir.path().join(name)).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file).unwrap().build().unwrap();
        reader.map(|b| b.unwrap().num_rows()).sum()
    }

    #[test]
    fn parquet_files_created() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        for name in ["agents", "activities", "legs", "events", "links"] {
            assert!(dir.path().join(format!("{name}.parquet")).exists());
        }
    }

    #[test]
    fn parquet_export_round_trip() {
        let dir = tmp();
        let idx = index();
        let (pop, links) = results(&idx);
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        export(&mut w, &pop, &idx, &links, DEFAULT_BATCH).unwrap();

        assert_eq!(rows(&dir, "agents.parquet"), 2);
        assert_eq!(rows(&dir, "events.parquet"), 4);
        assert_eq!(rows(&dir, "links.parquet"), 2);

        let file = std::fs::File::open(dir.path().join("agents.parquet")).unwrap();
        let schema = ParquetRecordBatchReaderBuilder::try_new(file).unwrap().schema().clone();
        let air = schema.field_with_name("air").unwrap();
        assert_eq!(*air.data_type(), DataType::Float64);
        assert!(air.is_nullable());
    }

    #[test]
    fn parquet_finish_required() {
        let dir = tmp();
        {
            let idx = index();
            let (pop, _) = results(&idx);
            let mut batch = crate::RowBatch::new();
            batch.push_agent(&pop.agents()[0], &idx);
            let mut w = ParquetWriter::new(dir.path()).unwrap();
            w.write_agents(&batch.agents).unwrap();
            // Dropped without finish(): no footer.
        }
        let file = std::fs::File::open(dir.path().join("agents.parquet")).unwrap();
        assert!(ParquetRecordBatchReaderBuilder::try_new(file).is_err());
    }
}
