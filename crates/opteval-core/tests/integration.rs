#![allow(clippy::float_cmp)]

use opteval_core::{
    ArchGrouping, CurveMetric, Filter, FilterSet, GainTransform, MatrixField, MatrixValue, Method,
    ParseConfig, ReferenceSelection, ResultReader, compare_architectures, evaluation_curve,
    per_graph_stats, read_contexts, total_combined_cost, value_matrix,
};
use opteval_core::context::IC_AREA_PER_PE;
use std::io::Cursor;

const SA_LOG: &str = "\
MARK: fft-8
optimization_method: simulated_annealing
ntasks: 8
pes: 2
edges: 12
sa_acceptor: exp
evaluations: 1000
initial_objective: 100.0
best_objective: 50.0
best_time: 0.5
power_k: 1.0
pe: id 0 freq 100000000 perf 1.0 area 1e-6
pe: id 1 freq 100000000 perf 1.0 area 1e-6
interconnect: id 0 freq 50000000 width 32 latency 8
pe_utilisations: 0.5 0.25
ic_utilisations: 0.5
best_cost_so_far: 0 100.0
best_cost_so_far: 0 80.0
best_cost_so_far: 0 80.0
best_cost_so_far: 0 60.0
best_cost_so_far: 0 50.0

MARK: fft-8
optimization_method: simulated_annealing
ntasks: 8
pes: 2
edges: 12
sa_acceptor: exp
evaluations: 1000
initial_objective: 100.0
best_objective: 40.0
best_time: 0.4
power_k: 1.0
pe: id 0 freq 200000000 perf 1.0 area 2e-6
pe: id 1 freq 100000000 perf 1.0 area 1e-6
interconnect: id 0 freq 50000000 width 32 latency 8
pe_utilisations: 0.5 0.5
ic_utilisations: 0.25
best_cost_so_far: 0 100.0
best_cost_so_far: 0 70.0
best_cost_so_far: 0 60.0
best_cost_so_far: 0 50.0
best_cost_so_far: 0 40.0

MARK: lu-16
optimization_method: random_mapping
ntasks: 16
pes: 3
initial_objective: 10.0
best_random_cost_so_far: 5 8.0
best_random_cost_so_far: 9 5.0
";

#[test]
fn test_log_to_filtered_curve() {
    let contexts = read_contexts(Cursor::new(SA_LOG), &ParseConfig::new()).unwrap();
    assert_eq!(contexts.len(), 3);

    let first = &contexts[0];
    assert_eq!(first.schedule_length(), Some(8));
    assert_eq!(first.evaluations(), &[200, 400, 800, 1000]);
    assert_eq!(first.saved(), 1);
    assert_eq!(first.gains(), &[1.0, 1.25, 100.0 / 60.0, 2.0]);
    assert_eq!(first.ic_areas(), &[IC_AREA_PER_PE * 2.0]);

    let filters = FilterSet::new()
        .with(Filter::from_arg("method", "simulated_annealing").unwrap())
        .with(Filter::from_arg("graph", "fft-8:qr-4").unwrap())
        .with(Filter::from_arg("pe-freq", "ge100000000").unwrap());
    let selected = filters.apply(contexts);
    assert_eq!(selected.len(), 2);

    let curve = evaluation_curve(&selected, CurveMetric::default()).unwrap();
    assert_eq!(curve.evaluations, vec![200, 400, 600, 800, 1000]);
    assert!((curve.means[0] - 1.0).abs() < 1e-12);
    // second run reaches 600 with cost 60; the first holds 80
    assert!((curve.means[2] - (1.25 + 100.0 / 60.0) / 2.0).abs() < 1e-12);
    assert!((curve.means[4] - (2.0 + 2.5) / 2.0).abs() < 1e-12);

    let relative = evaluation_curve(
        &selected,
        CurveMetric::Gain(GainTransform::PerEvaluation),
    )
    .unwrap();
    assert!((relative.means[4] - (2.0 + 2.5) / 2.0 / 1000.0).abs() < 1e-12);
}

#[test]
fn test_views_over_parsed_log() {
    let contexts = read_contexts(Cursor::new(SA_LOG), &ParseConfig::new()).unwrap();

    let stats = per_graph_stats(&contexts).unwrap();
    assert_eq!(stats.pes, vec![2, 3]);
    assert_eq!(
        stats.methods,
        vec![Method::RandomMapping, Method::SimulatedAnnealing]
    );
    assert_eq!(stats.graphs[0].graph, "fft-8");
    assert!((stats.graphs[0].mean - 2.25).abs() < 1e-12);
    assert_eq!(stats.graphs[1].graph, "lu-16");
    assert_eq!(stats.graphs[1].mean, 2.0);

    assert_eq!(total_combined_cost(&contexts).unwrap(), 50.0 + 40.0 + 5.0);

    let matrix = value_matrix(
        &contexts,
        MatrixField::Method,
        MatrixField::Pes,
        MatrixValue::Gain,
    )
    .unwrap();
    assert_eq!(matrix.rows, vec![1.0, 10.0]);
    assert_eq!(matrix.columns, vec![2.0, 3.0]);
    assert_eq!(matrix.means, vec![vec![2.25, 0.0], vec![0.0, 2.0]]);
    assert_eq!(matrix.std_devs, vec![vec![0.25, 0.0], vec![0.0, 0.0]]);
}

#[test]
fn test_architecture_comparison_from_log() {
    let contexts = read_contexts(Cursor::new(SA_LOG), &ParseConfig::new()).unwrap();
    let selected = FilterSet::new()
        .with(Filter::from_arg("k", "1.0").unwrap())
        .with(Filter::from_arg("graph-regex", "^fft").unwrap())
        .apply(contexts);
    assert_eq!(selected.len(), 2);

    let comparison =
        compare_architectures(&selected, 1.0, ArchGrouping::Code, &ReferenceSelection::Auto)
            .unwrap();
    assert_eq!(comparison.len(), 2);
    assert_eq!(comparison.archs[0].code, "AA");
    assert_eq!(comparison.archs[1].code, "AB");
    assert_eq!(comparison.reference.as_ref().unwrap().code, "AA");
    assert_eq!(comparison.archs[0].speedup, 1.0);
    assert!((comparison.archs[1].speedup - 1.25).abs() < 1e-12);
    assert_eq!(comparison.archs[0].info, "2 x 100 MHz 1.00 1.00 mm^2");

    let curve = comparison.arch_curve("AB").unwrap();
    assert_eq!(curve.evaluations, vec![200, 400, 600, 800, 1000]);
}

#[test]
fn test_incomplete_results_across_files() {
    let broken = "MARK: g\noptimization_method: random_mapping\ninitial_objective: 1.0\n";

    let mut reader = ResultReader::new(ParseConfig::new().with_allow_incomplete(true));
    reader.read(Cursor::new(SA_LOG)).unwrap();
    reader.read(Cursor::new(broken)).unwrap();
    assert_eq!(reader.dropped(), 1);
    assert_eq!(reader.into_contexts().len(), 3);

    let err = read_contexts(Cursor::new(broken), &ParseConfig::new()).unwrap_err();
    assert_eq!(err.code(), "DATASET_EMPTY");
    assert!(err.to_string().starts_with("[DATASET_EMPTY] "));
}
