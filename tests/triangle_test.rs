use std::io::Write;
use tempfile::NamedTempFile;
use tricount::algo::{count_triangles_brute_force, generators};
use tricount::{
    coo_to_csc, EdgePolicy, InputFormat, RunConfig, StrategyKind, TriCountError, TriangleEngine,
};

fn write_graph(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Matrix Market text for an edge list, lower triangle, 1-based
fn to_matrix_market(vertices: usize, pairs: &[(usize, usize)]) -> String {
    let mut text = String::from("%%MatrixMarket matrix coordinate pattern symmetric\n");
    text.push_str(&format!("{} {} {}\n", vertices, vertices, pairs.len()));
    for (row, col) in pairs {
        text.push_str(&format!("{} {}\n", row + 1, col + 1));
    }
    text
}

#[test]
fn test_matrix_market_k4_every_strategy() {
    let k4 = generators::complete(4);
    let pairs: Vec<_> = k4.iter().collect();
    let file = write_graph(".mtx", &to_matrix_market(4, &pairs));

    for strategy in StrategyKind::ALL {
        let engine = TriangleEngine::new(RunConfig {
            strategy,
            threads: Some(2),
            ..RunConfig::default()
        });
        let report = engine.run(file.path()).unwrap();
        assert_eq!(report.triangles, 4, "{:?}", strategy);
        assert_eq!(report.graph.vertices, 4);
        assert_eq!(report.graph.stored_edges, 6);
    }
}

#[test]
fn test_edge_list_triangle_with_per_vertex() {
    let file = write_graph(".txt", "# triangle plus tail\n0 1\n1 2\n2 0\n2 3\n");
    let engine = TriangleEngine::new(RunConfig {
        strategy: StrategyKind::Static,
        threads: Some(4),
        per_vertex: true,
        ..RunConfig::default()
    });

    let report = engine.run(file.path()).unwrap();
    assert_eq!(report.triangles, 1);
    assert_eq!(report.per_vertex, Some(vec![1, 1, 1, 0]));
    assert_eq!(report.partitions.len(), 4);
    assert!(report.partitions.iter().all(|p| p.end - p.start == 1));
}

#[test]
fn test_star_and_empty_graphs() {
    let star: Vec<_> = generators::star(25).iter().collect();
    let file = write_graph(".mtx", &to_matrix_market(26, &star));
    let engine = TriangleEngine::new(RunConfig::default());
    assert_eq!(engine.run(file.path()).unwrap().triangles, 0);

    let empty = write_graph(".mtx", &to_matrix_market(9, &[]));
    let report = engine.run(empty.path()).unwrap();
    assert_eq!(report.triangles, 0);
    assert_eq!(report.graph.vertices, 9);
    assert_eq!(report.graph.stored_edges, 0);
}

#[test]
fn test_general_matrix_with_both_directions() {
    // Both directions of every edge plus a diagonal entry, as in a general matrix
    let text = "%%MatrixMarket matrix coordinate real general\n\
                3 3 7\n\
                1 2 1.0\n2 1 1.0\n2 3 1.0\n3 2 1.0\n1 3 1.0\n3 1 1.0\n2 2 1.0\n";
    let file = write_graph(".mtx", text);

    let engine = TriangleEngine::new(RunConfig::default());
    let report = engine.run(file.path()).unwrap();
    assert_eq!(report.triangles, 1);
    assert_eq!(report.graph.self_loops_dropped, 1);
    assert_eq!(report.graph.duplicates_dropped, 3);

    let strict = TriangleEngine::new(RunConfig {
        edge_policy: EdgePolicy::Reject,
        ..RunConfig::default()
    });
    assert!(matches!(strict.run(file.path()), Err(TriCountError::Build(_))));
}

#[test]
fn test_out_of_range_endpoint_is_fatal() {
    let text = "%%MatrixMarket matrix coordinate pattern general\n3 3 2\n2 1\n4 1\n";
    let file = write_graph(".mtx", text);
    let engine = TriangleEngine::new(RunConfig::default());
    assert!(matches!(engine.run(file.path()), Err(TriCountError::Build(_))));
}

#[test]
fn test_thread_count_above_vertex_count_is_rejected() {
    let file = write_graph(".txt", "0 1\n1 2\n2 0\n");
    for strategy in [StrategyKind::Static, StrategyKind::Dynamic] {
        let engine = TriangleEngine::new(RunConfig {
            strategy,
            threads: Some(4),
            ..RunConfig::default()
        });
        assert!(matches!(
            engine.run(file.path()),
            Err(TriCountError::Schedule(_))
        ));
    }
}

#[test]
fn test_expected_edges_hint() {
    let file = write_graph(".txt", "0 1\n1 2\n2 0\n");
    let engine = TriangleEngine::new(RunConfig {
        expected_edges: Some(4),
        ..RunConfig::default()
    });
    assert!(matches!(
        engine.run(file.path()),
        Err(TriCountError::HeaderMismatch(_))
    ));
}

#[test]
fn test_explicit_format_overrides_extension() {
    let file = write_graph(".dat", &to_matrix_market(3, &[(1, 0), (2, 0), (2, 1)]));
    let engine = TriangleEngine::new(RunConfig {
        format: InputFormat::MatrixMarket,
        ..RunConfig::default()
    });
    assert_eq!(engine.run(file.path()).unwrap().triangles, 1);
}

#[test]
fn test_compare_on_random_graph_matches_brute_force() {
    let edges = generators::erdos_renyi(80, 0.15, 2024);
    let expected = count_triangles_brute_force(&coo_to_csc(edges.clone(), EdgePolicy::Simplify).unwrap());

    let engine = TriangleEngine::new(RunConfig {
        threads: Some(5),
        chunk_size: 3,
        per_vertex: true,
        ..RunConfig::default()
    });
    let loaded = engine.build(edges, "gnp", 0.0).unwrap();
    let reports = engine.compare(&loaded).unwrap();

    for report in &reports {
        assert_eq!(report.triangles, expected, "{}", report.strategy);
        let per_vertex = report.per_vertex.as_ref().unwrap();
        assert_eq!(per_vertex.iter().sum::<u64>(), 3 * expected);
    }
}

#[test]
fn test_yaml_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "strategy: sequential\nedge_policy: preserve\nper_vertex: true").unwrap();

    let config = RunConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(config.strategy, StrategyKind::Sequential);
    assert_eq!(config.edge_policy, EdgePolicy::Preserve);
    assert!(config.per_vertex);
}

#[test]
fn test_report_serializes_to_json() {
    let engine = TriangleEngine::new(RunConfig {
        strategy: StrategyKind::Static,
        threads: Some(2),
        ..RunConfig::default()
    });
    let loaded = engine.build(generators::complete(5), "k5", 0.0).unwrap();
    let report = engine.count(&loaded).unwrap();

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["triangles"], 10);
    assert_eq!(json["strategy"], "static");
    assert_eq!(json["partitions"].as_array().unwrap().len(), 2);
    assert!(json.get("per_vertex").is_none());
}
