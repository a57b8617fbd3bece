#[cfg(test)]
mod circuit_geometry_tests {
    use std::collections::BTreeMap;
    use std::f64::consts::PI;
    use std::path::Path;

    use circuitnet::config::{CfgParams, InitialConfig, ModelSpec, NetParams, VehicleTypeConfig};
    use circuitnet::config_loader::load_config;
    use circuitnet::network::{build_layout, check_partition, partition};
    use circuitnet::scenario::Scenario;
    use circuitnet::topology::{NetParam, Topology, TopologyKind};

    const FIGURE8_ORDER: [&str; 10] = [
        "bottom_lower_ring",
        "right_lower_ring_in",
        "right_lower_ring_out",
        "left_upper_ring",
        "top_upper_ring",
        "right_upper_ring",
        "bottom_upper_ring_in",
        "bottom_upper_ring_out",
        "top_lower_ring",
        "left_lower_ring",
    ];

    fn figure8_net(radius_ring: f64, lanes: u32) -> NetParams {
        NetParams {
            radius_ring: Some(radius_ring),
            lanes: Some(lanes),
            speed_limit: Some(35.0),
            resolution: Some(40),
            net_path: Some("debug/net/".to_string()),
            ..NetParams::default()
        }
    }

    fn vehicle_types(count: u32) -> BTreeMap<String, VehicleTypeConfig> {
        let spec = |model: &str| ModelSpec {
            model: model.to_string(),
            params: BTreeMap::new(),
        };
        let mut types = BTreeMap::new();
        types.insert(
            "ovm".to_string(),
            VehicleTypeConfig {
                count,
                controller: spec("IDMController"),
                lane_changer: spec("StaticLaneChanger"),
                extra: 0.0,
            },
        );
        types
    }

    fn figure8(net: &NetParams) -> Scenario {
        Scenario::new(
            "figure8",
            TopologyKind::FigureEight,
            net,
            vehicle_types(14),
            CfgParams::default(),
            InitialConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_total_length_closed_form() {
        for radius in [5.0, 20.0, 37.5, 120.0] {
            for lanes in 1..=4 {
                let scenario = figure8(&figure8_net(radius, lanes));
                let ring = radius * PI / 2.0;
                let intersection = 2.0 * radius;
                let junction = 2.9 + 3.3 * lanes as f64;
                let expected = 6.0 * ring + 2.0 * intersection + 2.0 * junction + 10.0 * 0.28;
                assert!(
                    (scenario.total_length() - expected).abs() < 1e-9,
                    "radius {radius} lanes {lanes}"
                );
            }
        }
    }

    #[test]
    fn test_reference_example() {
        let scenario = figure8(&figure8_net(20.0, 1));
        let lengths = scenario.lengths();
        assert!((lengths.ring_edgelen - 31.4159).abs() < 1e-4);
        assert!((lengths.intersection_len - 40.0).abs() < 1e-12);
        assert!((lengths.junction_len - 6.2).abs() < 1e-12);
        assert!((lengths.inner_space_len - 0.28).abs() < 1e-12);
        // 6 * 31.4159 + 2 * 40 + 2 * 6.2 + 10 * 0.28
        assert!((scenario.total_length() - 283.6956).abs() < 1e-3);
    }

    #[test]
    fn test_through_edges_order_and_monotonic() {
        let scenario = figure8(&figure8_net(20.0, 2));
        let names: Vec<&str> = scenario.edge_starts().iter().map(|e| e.edge.as_str()).collect();
        assert_eq!(names, FIGURE8_ORDER);
        assert!(scenario
            .edge_starts()
            .windows(2)
            .all(|w| w[0].offset < w[1].offset));
        assert!(scenario.edge_starts().iter().all(|e| e.offset >= 0.0));
    }

    #[test]
    fn test_internal_edges_precede_through_edges() {
        let scenario = figure8(&figure8_net(20.0, 1));
        let internal = scenario.internal_edge_starts();
        assert_eq!(internal.len(), 10);
        assert!(internal.windows(2).all(|w| w[0].offset < w[1].offset));
        for (n, t) in internal.iter().zip(scenario.edge_starts()) {
            assert!(n.offset <= t.offset);
            assert!(n.is_internal());
        }
    }

    #[test]
    fn test_two_intersection_connectors() {
        let scenario = figure8(&figure8_net(20.0, 1));
        let crossings = scenario.intersection_edge_starts();
        assert_eq!(crossings.len(), 2);
        assert_eq!(crossings[0].edge, ":center_intersection_2");
        assert_eq!(crossings[1].edge, ":center_intersection_1");
        assert!(crossings[0].offset < crossings[1].offset);
    }

    #[test]
    fn test_each_missing_field_is_named() {
        let cases = [
            (NetParams { radius_ring: None, ..figure8_net(20.0, 1) }, NetParam::RadiusRing, "radius_ring"),
            (NetParams { lanes: None, ..figure8_net(20.0, 1) }, NetParam::Lanes, "lanes"),
            (NetParams { speed_limit: None, ..figure8_net(20.0, 1) }, NetParam::SpeedLimit, "speed_limit"),
            (NetParams { resolution: None, ..figure8_net(20.0, 1) }, NetParam::Resolution, "resolution"),
        ];

        for (net, param, name) in cases {
            let err = Scenario::new(
                "figure8",
                TopologyKind::FigureEight,
                &net,
                vehicle_types(1),
                CfgParams::default(),
                InitialConfig::default(),
            )
            .unwrap_err();
            assert_eq!(err.fields(), vec![param]);
            assert!(err.to_string().contains(name), "{err}");
        }
    }

    #[test]
    fn test_all_missing_fields_named_at_once() {
        let err = NetParams::default()
            .validate(TopologyKind::FigureEight)
            .unwrap_err();
        assert_eq!(
            err.fields(),
            TopologyKind::FigureEight.required_parameters().to_vec()
        );
    }

    #[test]
    fn test_construction_is_deterministic() {
        let a = figure8(&figure8_net(27.0, 2));
        let b = figure8(&figure8_net(27.0, 2));
        assert_eq!(a.edge_starts(), b.edge_starts());
        assert_eq!(a.internal_edge_starts(), b.internal_edge_starts());
        assert_eq!(a.intersection_edge_starts(), b.intersection_edge_starts());
        assert_eq!(a.initial_positions(), b.initial_positions());
    }

    #[test]
    fn test_circuit_is_closed() {
        let scenario = figure8(&figure8_net(20.0, 1));
        let segments = partition(scenario.edge_starts(), scenario.total_length());
        assert!(check_partition(&segments, scenario.total_length()).is_ok());

        let last = segments.last().unwrap();
        let end = last.start + last.length.unwrap();
        let first = scenario.edge_starts()[0].offset;
        assert!((end - first - scenario.total_length()).abs() < 1e-9);
    }

    #[test]
    fn test_loop_layout() {
        let net = NetParams {
            length: Some(230.0),
            lanes: Some(1),
            speed_limit: Some(30.0),
            resolution: Some(40),
            ..NetParams::default()
        };
        let scenario = Scenario::new(
            "ring",
            TopologyKind::Loop,
            &net,
            vehicle_types(22),
            CfgParams::default(),
            InitialConfig {
                shuffle: true,
                seed: Some(3),
                ..InitialConfig::default()
            },
        )
        .unwrap();

        assert!((scenario.total_length() - 230.0).abs() < 1e-9);
        assert!(scenario.internal_edge_starts().is_empty());
        assert!(scenario.intersection_edge_starts().is_empty());

        let layout = build_layout(&scenario).unwrap();
        let lengths: Vec<f64> = layout.edges.iter().filter_map(|e| e.length).collect();
        assert!(lengths.iter().all(|l| (l - 57.5).abs() < 1e-9));
        assert_eq!(scenario.initial_positions().len(), 22);
    }

    #[test]
    fn test_figure8_layout_edges() {
        let scenario = figure8(&figure8_net(20.0, 1));
        let layout = build_layout(&scenario).unwrap();
        assert_eq!(layout.edges.len(), 10);
        assert_eq!(layout.internal_edges.len(), 10);
        assert_eq!(layout.intersections.len(), 2);

        let sum: f64 = layout.edges.iter().filter_map(|e| e.length).sum();
        assert!((sum - scenario.total_length()).abs() < 1e-9);

        // Internal edges cover exactly the gap before their through-edge.
        assert!(layout
            .internal_edges
            .iter()
            .all(|e| (e.length.unwrap() - 0.28).abs() < 1e-9));
    }

    #[test]
    fn test_bundled_configs_build() {
        for (file, kind) in [
            ("configs/figure8.yaml", TopologyKind::FigureEight),
            ("configs/loop.yaml", TopologyKind::Loop),
        ] {
            let config = load_config(Path::new(file)).unwrap();
            let scenario = Scenario::from_config(&config).unwrap();
            assert_eq!(scenario.kind(), kind);
            assert_eq!(scenario.initial_positions().len(), config.vehicle_count());
            assert!(build_layout(&scenario).is_ok());
        }
    }
}
