//! Shared builders for unit tests.

use crate::context::{PendingContext, ResultContext};
use crate::record::LogUpdate;

/// Finalize one record given as log lines.
pub(crate) fn context_from(lines: &[&str]) -> ResultContext {
    let mut pending = PendingContext::new();
    for line in lines {
        let update = LogUpdate::parse(line).unwrap_or_else(|| panic!("blank line in fixture"));
        pending
            .update(&update.label, &update.values)
            .unwrap_or_else(|err| panic!("{line}: {err}"));
    }
    pending.finalize().unwrap_or_else(|err| panic!("{err}"))
}

/// A random-mapping run with explicit evaluation counts and costs.
pub(crate) fn curve_context(graph: &str, initial: f64, samples: &[(u64, f64)]) -> ResultContext {
    let mut lines = vec![
        format!("MARK: {graph}"),
        "optimization_method: random_mapping".to_string(),
        format!("initial_objective: {initial}"),
    ];
    for (evaluation, cost) in samples {
        lines.push(format!("best_random_cost_so_far: {evaluation} {cost}"));
    }
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    context_from(&refs)
}

/// A finished run on the given PEs: `(frequency, performance, area, utilization)`.
///
/// Every run gets one interconnect segment at `ic_frequency` with area 1.0 and
/// utilization 0.5.
pub(crate) fn arch_context(
    graph: &str,
    pes: &[(u64, f64, f64, f64)],
    ic_frequency: u64,
    best_objective: f64,
    best_time: f64,
) -> ResultContext {
    let mut lines = vec![
        format!("MARK: {graph}"),
        "optimization_method: simulated_annealing".to_string(),
        "evaluations: 100".to_string(),
        "sa_schedule_max: 10".to_string(),
        format!("initial_objective: {}", best_objective * 2.0),
        format!("best_objective: {best_objective}"),
        format!("best_time: {best_time}"),
        format!("pes: {}", pes.len()),
        format!("best_sa_cost_so_far: 0 50 {best_objective}"),
    ];
    for (idx, (frequency, performance, area, _)) in pes.iter().enumerate() {
        lines.push(format!(
            "pe: id {idx} freq {frequency} perf {performance} area {area}"
        ));
    }
    lines.push(format!(
        "interconnect: id 0 freq {ic_frequency} area 1.0 width 32 latency 8 policy 0"
    ));
    let utilizations: Vec<String> = pes.iter().map(|pe| pe.3.to_string()).collect();
    lines.push(format!("pe_utilisations: {}", utilizations.join(" ")));
    lines.push("ic_utilisations: 0.5".to_string());
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    context_from(&refs)
}
