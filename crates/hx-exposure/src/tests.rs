//! Unit tests for hx-exposure.

#[cfg(test)]
mod helpers {
    use hx_core::{AgentId, Coord, ExposureConfig, LinkId, TravelMode};
    use hx_spatial::{LinkSpec, NetworkBuilder, Parcel, ParcelStoreBuilder, SpatialJoin, ThermalIndex};
    use hx_thermal::{CurveStore, TemperatureCurve};
    use hx_trajectory::{Activity, Agent, Event, Leg};

    pub const EPS: f64 = 1e-6;

    pub fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    /// Two links a → b → c, 100 m each, air at 30 °C.
    ///
    /// "w" carries a 40 °C radiant curve, "x" none.  Parcel "home" is 20 °C
    /// and pinned to "w"; "work" is 24 °C and pinned to "x".
    pub fn index() -> ThermalIndex {
        let mut curves = CurveStore::new();
        let mut add = |n: &str, v: f64| curves.insert(TemperatureCurve::constant(n, v).unwrap()).unwrap();
        let air = add("air", 30.0);
        let mrt = add("mrt", 40.0);
        let home = add("home", 20.0);
        let work = add("work", 24.0);

        let mut b = NetworkBuilder::new();
        let a = b.add_node("a", Coord::new(0.0, 0.0), None).unwrap();
        let bn = b.add_node("b", Coord::new(100.0, 0.0), None).unwrap();
        let c = b.add_node("c", Coord::new(200.0, 0.0), None).unwrap();
        let mut w = LinkSpec::new("w", a, bn, 100.0);
        w.air_curve = Some(air);
        w.radiant_curve = Some(mrt);
        let mut x = LinkSpec::new("x", bn, c, 100.0);
        x.air_curve = Some(air);
        let w = b.add_link(w).unwrap();
        let x = b.add_link(x).unwrap();
        let net = b.build(&SpatialJoin::new().build()).unwrap();

        let mut p = ParcelStoreBuilder::new();
        let ph = p.add_parcel(Parcel { name: "home".into(), curve: home, coord: None }).unwrap();
        let pw = p.add_parcel(Parcel { name: "work".into(), curve: work, coord: None }).unwrap();
        p.assign_link(w, ph);
        p.assign_link(x, pw);

        ThermalIndex::new(curves, net, p.build()).unwrap()
    }

    pub fn link(idx: &ThermalIndex, name: &str) -> LinkId {
        idx.network().resolve_link(name).unwrap()
    }

    pub fn activity(idx: &ThermalIndex, on: &str, start: i64, end: Option<i64>) -> Activity {
        let l = link(idx, on);
        Activity {
            act_type: on.to_owned(),
            link: l,
            parcel: idx.activity_parcel(l).unwrap(),
            start,
            end,
            air: None,
        }
    }

    pub fn leg(
        idx:    &ThermalIndex,
        mode:   TravelMode,
        start:  i64,
        end:    Option<i64>,
        events: &[(&str, i64, i64)],
    ) -> Leg {
        let cfg = ExposureConfig::default();
        let mut l = Leg::open(mode.as_str(), cfg.classify(mode), start, link(idx, "w"));
        l.end = end;
        l.traveled = !events.is_empty();
        l.events = events.iter().map(|&(n, a, b)| Event::new(link(idx, n), a, b)).collect();
        l
    }

    /// Home 0–28800, walk 600 s on "w", work 29400–61200, walk 600 s on
    /// "w", home 61800–86400.
    pub fn commuter(idx: &ThermalIndex) -> Agent {
        let mut a = Agent::new(AgentId(0), "1");
        a.activities = vec![
            activity(idx, "w", 0, Some(28_800)),
            activity(idx, "x", 29_400, Some(61_200)),
            activity(idx, "w", 61_800, Some(86_400)),
        ];
        a.legs = vec![
            leg(idx, TravelMode::Walk, 28_800, Some(29_400), &[("w", 28_800, 29_400)]),
            leg(idx, TravelMode::Walk, 61_200, Some(61_800), &[("w", 61_200, 61_800)]),
        ];
        a
    }
}

// ── Segments and agent totals ─────────────────────────────────────────────────

#[cfg(test)]
mod agent {
    use hx_core::{AgentId, ExposureClass, ExposureConfig, TravelMode};
    use hx_trajectory::Agent;

    use super::helpers::*;
    use crate::Aggregator;

    #[test]
    fn walking_commuter() {
        let idx = index();
        let cfg = ExposureConfig::default();
        let agg = Aggregator::new(&idx, &cfg).unwrap();
        let mut a = commuter(&idx);
        agg.aggregate_agent(&mut a);

        assert_eq!(a.legs[0].air, Some(18_000.0));
        assert_eq!(a.legs[1].air, Some(18_000.0));
        assert_eq!(a.legs[0].events[0].air, Some(18_000.0));
        let home1 = 20.0 * 28_800.0;
        let work = 24.0 * 31_800.0;
        let home2 = 20.0 * 24_600.0;
        assert_eq!(a.activities[0].air, Some(home1));
        assert!(approx(a.air.unwrap(), home1 + 18_000.0 + work + 18_000.0 + home2));
        // Both walks are in daylight on the 40 °C radiant link.
        assert_eq!(a.legs[0].radiant, Some(24_000.0));
        assert_eq!(a.radiant, Some(48_000.0));
    }

    #[test]
    fn car_leg_uses_cabin_rate_only() {
        let idx = index();
        let cfg = ExposureConfig::default();
        let agg = Aggregator::new(&idx, &cfg).unwrap();
        let mut a = commuter(&idx);
        // Route data present but must not be consulted.
        a.legs[0] = leg(&idx, TravelMode::Car, 28_800, Some(30_000), &[("w", 28_800, 30_000)]);
        a.activities[1].start = 30_000;
        let part = agg.aggregate_agent(&mut a);

        assert_eq!(a.legs[0].class, ExposureClass::VehicleCabin);
        assert_eq!(a.legs[0].air, Some(30_600.0));
        assert_eq!(a.legs[0].radiant, None);
        assert_eq!(a.legs[0].events[0].air, None);
        // Only the remaining walk touched "w".
        assert_eq!(part.get(link(&idx, "w")).unwrap().traversals, 1);
        // Radiant total covers outdoor legs only.
        assert_eq!(a.radiant, Some(24_000.0));
    }

    #[test]
    fn transit_rate_is_separate() {
        let idx = index();
        let cfg = ExposureConfig { transit_rate: 28.0, ..ExposureConfig::default() };
        let agg = Aggregator::new(&idx, &cfg).unwrap();
        let mut a = commuter(&idx);
        a.legs[1] = leg(&idx, TravelMode::Pt, 61_200, Some(61_800), &[]);
        agg.aggregate_agent(&mut a);
        assert_eq!(a.legs[1].class, ExposureClass::Transit);
        assert_eq!(a.legs[1].air, Some(28.0 * 600.0));
    }

    #[test]
    fn aborted_agent_has_null_totals() {
        let idx = index();
        let cfg = ExposureConfig::default();
        let agg = Aggregator::new(&idx, &cfg).unwrap();
        let mut a = commuter(&idx);
        a.aborted = true;
        let part = agg.aggregate_agent(&mut a);
        assert_eq!(a.air, None);
        assert_eq!(a.radiant, None);
        // Closed segments still carry values and still reach the links.
        assert_eq!(a.legs[0].air, Some(18_000.0));
        assert_eq!(part.get(link(&idx, "w")).unwrap().traversals, 2);
    }

    #[test]
    fn agent_stopped_after_arrival_has_null_totals() {
        let idx = index();
        let cfg = ExposureConfig::default();
        let agg = Aggregator::new(&idx, &cfg).unwrap();
        let mut a = Agent::new(AgentId(0), "6");
        a.activities = vec![activity(&idx, "w", 0, Some(28_800))];
        a.legs = vec![leg(&idx, TravelMode::Car, 28_800, Some(29_400), &[])];
        a.truncated = true;
        agg.aggregate_agent(&mut a);
        assert_eq!(a.legs[0].air, Some(25.5 * 600.0));
        assert_eq!(a.air, None);
        assert_eq!(a.radiant, None);
    }

    #[test]
    fn open_segment_is_skipped() {
        let idx = index();
        let cfg = ExposureConfig::default();
        let agg = Aggregator::new(&idx, &cfg).unwrap();
        let mut a = Agent::new(AgentId(0), "5");
        a.activities = vec![activity(&idx, "w", 0, Some(28_800))];
        a.legs = vec![leg(&idx, TravelMode::Walk, 28_800, None, &[])];
        let part = agg.aggregate_agent(&mut a);
        assert_eq!(a.activities[0].air, Some(20.0 * 28_800.0));
        assert_eq!(a.legs[0].air, None);
        assert_eq!(a.air, None);
        assert_eq!(a.radiant, None);
        assert!(part.is_empty());
    }

    #[test]
    fn undefined_radiant_propagates() {
        let idx = index();
        let cfg = ExposureConfig::default();
        let agg = Aggregator::new(&idx, &cfg).unwrap();
        let mut a = commuter(&idx);
        // Second half of the walk crosses "x", which has no radiant curve.
        a.legs[0] = leg(
            &idx,
            TravelMode::Walk,
            28_800,
            Some(29_400),
            &[("w", 28_800, 29_100), ("x", 29_100, 29_400)],
        );
        agg.aggregate_agent(&mut a);
        assert_eq!(a.legs[0].events[0].radiant, Some(12_000.0));
        assert_eq!(a.legs[0].events[1].radiant, None);
        assert_eq!(a.legs[0].radiant, None);
        assert_eq!(a.radiant, None);
        // Air is unaffected.
        assert_eq!(a.legs[0].air, Some(18_000.0));
        assert!(a.air.is_some());
    }

    #[test]
    fn night_walk_has_no_radiant() {
        let idx = index();
        let cfg = ExposureConfig::default();
        let agg = Aggregator::new(&idx, &cfg).unwrap();
        let mut a = Agent::new(AgentId(0), "3");
        a.activities = vec![activity(&idx, "w", 0, Some(3_600)), activity(&idx, "x", 4_200, Some(86_400))];
        a.legs = vec![leg(&idx, TravelMode::Walk, 3_600, Some(4_200), &[("w", 3_600, 4_200)])];
        agg.aggregate_agent(&mut a);
        assert_eq!(a.legs[0].air, Some(18_000.0));
        assert_eq!(a.legs[0].radiant, None);
        assert_eq!(a.radiant, None);
    }

    #[test]
    fn straddling_window_start_is_null() {
        let idx = index();
        let cfg = ExposureConfig::default();
        let agg = Aggregator::new(&idx, &cfg).unwrap();
        let mut a = Agent::new(AgentId(0), "4");
        a.activities = vec![activity(&idx, "w", 0, Some(17_000)), activity(&idx, "x", 19_000, Some(86_400))];
        a.legs = vec![leg(&idx, TravelMode::Walk, 17_000, Some(19_000), &[("w", 17_000, 19_000)])];
        agg.aggregate_agent(&mut a);
        assert_eq!(a.legs[0].events[0].radiant, None);
        assert_eq!(a.radiant, None);
    }

    #[test]
    fn eventless_outdoor_leg_is_zero() {
        let idx = index();
        let cfg = ExposureConfig::default();
        let agg = Aggregator::new(&idx, &cfg).unwrap();
        let mut a = commuter(&idx);
        a.legs[1] = leg(&idx, TravelMode::Bike, 61_200, Some(61_800), &[]);
        agg.aggregate_agent(&mut a);
        assert_eq!(a.legs[1].air, Some(0.0));
        assert_eq!(a.legs[1].radiant, Some(0.0));
        assert_eq!(a.radiant, Some(24_000.0));
    }

    #[test]
    fn driver_only_agent_has_zero_radiant() {
        let idx = index();
        let cfg = ExposureConfig::default();
        let agg = Aggregator::new(&idx, &cfg).unwrap();
        let mut a = commuter(&idx);
        a.legs[0] = leg(&idx, TravelMode::Car, 28_800, Some(29_400), &[]);
        a.legs[1] = leg(&idx, TravelMode::Car, 61_200, Some(61_800), &[]);
        agg.aggregate_agent(&mut a);
        assert_eq!(a.radiant, Some(0.0));
    }
}

// ── Runs, link store and summary ──────────────────────────────────────────────

#[cfg(test)]
mod run {
    use hx_core::{AgentId, ExposureConfig};
    use hx_trajectory::Population;

    use super::helpers::*;
    use crate::{Aggregator, ExposureError, LinkExposureStore};

    fn population() -> Population {
        let idx = index();
        let a = commuter(&idx);
        let mut b = commuter(&idx);
        b.id = AgentId(1);
        b.name = "2".into();
        b.aborted = true;
        Population::new(vec![a, b], vec!["bad".into()])
    }

    #[test]
    fn link_totals_and_summary() {
        let idx = index();
        let cfg = ExposureConfig::default();
        let agg = Aggregator::new(&idx, &cfg).unwrap();
        let mut pop = population();
        let mut links = agg.link_store();
        let s = agg.run(&mut pop, &mut links).unwrap();

        let w = links.get(link(&idx, "w"));
        assert_eq!(w.traversals, 4);
        assert!(approx(w.air, 4.0 * 18_000.0));
        assert_eq!(w.radiant, Some(4.0 * 24_000.0));
        let x = links.get(link(&idx, "x"));
        assert_eq!(x.traversals, 0);
        assert_eq!(x.radiant, None);
        assert_eq!(links.touched(), 1);

        assert_eq!(s.agents, 2);
        assert_eq!(s.aborted, 1);
        assert_eq!(s.dropped, 1);
        assert_eq!(s.null_air, 1);
        assert_eq!(s.null_radiant, 1);
        assert!(approx(s.total_air, pop.get(AgentId(0)).air.unwrap()));
    }

    #[test]
    fn wrong_store_size_rejected() {
        let idx = index();
        let cfg = ExposureConfig::default();
        let agg = Aggregator::new(&idx, &cfg).unwrap();
        let mut pop = population();
        let err = agg.run(&mut pop, &mut LinkExposureStore::new(7)).unwrap_err();
        assert!(matches!(err, ExposureError::StoreSize { store: 7, network: 2 }));
    }

    #[test]
    fn invalid_config_rejected() {
        let idx = index();
        let cfg = ExposureConfig { daylight_start: 80_000, ..ExposureConfig::default() };
        assert!(matches!(Aggregator::new(&idx, &cfg), Err(ExposureError::Config(_))));
    }
}

// ── End to end ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pipeline {
    use std::io::Cursor;

    use hx_core::ExposureConfig;
    use hx_spatial::{Route, RouteBook};
    use hx_trajectory::{Reconstructor, event_reader};

    use super::helpers::*;
    use crate::Aggregator;

    #[test]
    fn log_to_totals() {
        let idx = index();
        let cfg = ExposureConfig::default();
        let mut routes = RouteBook::new();
        routes.insert(
            None,
            Route { mode: "walk".into(), links: vec![link(&idx, "w"), link(&idx, "x")], distance_m: 200.0 },
        );
        let log = "time,type,person,link,actType,legMode\n\
                   28800,actend,1,w,home,\n\
                   28800,departure,1,w,,walk\n\
                   29400,travelled,1,,,walk\n\
                   29400,arrival,1,x,,walk\n\
                   29400,actstart,1,x,work,\n\
                   61200,actend,1,x,work,\n\
                   61200,departure,1,x,,car\n\
                   61800,arrival,1,w,,car\n\
                   61800,actstart,1,w,home,\n";
        let mut pop = Reconstructor::new(&idx, &routes, &cfg).run(event_reader(Cursor::new(log))).unwrap();

        let agg = Aggregator::new(&idx, &cfg).unwrap();
        let mut links = agg.link_store();
        agg.run(&mut pop, &mut links).unwrap();

        let a = pop.by_name("1").unwrap();
        assert_eq!(a.legs[0].events.len(), 2);
        assert_eq!(a.legs[0].air, Some(18_000.0));
        assert_eq!(a.legs[1].air, Some(25.5 * 600.0));
        let expected = 20.0 * 28_800.0 + 18_000.0 + 24.0 * 31_800.0 + 25.5 * 600.0 + 20.0 * 24_600.0;
        assert!(approx(a.air.unwrap(), expected));
        // "x" has no radiant curve.
        assert_eq!(a.radiant, None);
        assert_eq!(links.get(link(&idx, "x")).traversals, 1);
    }
}
