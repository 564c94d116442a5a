//! Text output: Octave/Matlab array declarations and tab-separated tables.

use opteval_core::{
    ArchResult, EvaluationCurve, GaMatrix, PerGraphStats, ResultContext, SampleSeries, SampleSummary,
    ValueMatrix,
};
use std::fmt::Write;

/// Blank lines between the tables of the sorted architecture view.
const TABLE_GAP: usize = 20;

/// C `%e` formatting: six fraction digits and an exponent of at least two
/// digits with an explicit sign.
pub fn sci(value: f64) -> String {
    sci_with(value, 6)
}

/// C `%.Ne` formatting.
pub fn sci_with(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let formatted = format!("{value:.precision$e}");
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

/// Shortest decimal with at most 12 significant digits, always carrying a
/// fraction or an exponent: `95.0`, `0.3`, `1e+16`.
pub fn scalar(value: f64) -> String {
    if !value.is_finite() {
        return sci(value);
    }
    let formatted = general(value, 12);
    if formatted.contains(['.', 'e']) {
        formatted
    } else {
        format!("{formatted}.0")
    }
}

/// C `%.Ng` formatting.
fn general(value: f64, significant: usize) -> String {
    let precision = significant.saturating_sub(1);
    let exponent = format!("{value:.precision$e}")
        .split_once('e')
        .and_then(|(_, exponent)| exponent.parse::<i32>().ok())
        .unwrap_or(0);
    if exponent < -4 || exponent >= significant as i32 {
        let formatted = sci_with(value, precision);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) => format!("{}e{exponent}", trim_fraction(mantissa)),
            None => formatted,
        };
    }
    let decimals = (significant as i32 - 1 - exponent).max(0) as usize;
    trim_fraction(&format!("{value:.decimals$}")).to_string()
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// `name = [v v v ];` with `%e` values.
pub fn octave_vector(name: &str, values: &[f64]) -> String {
    let mut out = format!("{name} = [");
    for value in values {
        let _ = write!(out, "{} ", sci(*value));
    }
    out.push_str("];\n");
    out
}

/// `name = [1 2 3 ];` with integer values.
pub fn octave_int_vector(name: &str, values: &[u64]) -> String {
    let mut out = format!("{name} = [");
    for value in values {
        let _ = write!(out, "{value} ");
    }
    out.push_str("];\n");
    out
}

/// `x`, `y` and `s` vectors of an evaluation curve.
pub fn curve(curve: &EvaluationCurve) -> String {
    let mut out = octave_int_vector("x", &curve.evaluations);
    out.push_str(&octave_vector("y", &curve.means));
    out.push_str(&octave_vector("s", &curve.std_devs));
    out
}

pub fn per_graph(stats: &PerGraphStats) -> String {
    let mut out = String::from("Number of PEs in these data sets: ");
    for pes in &stats.pes {
        let _ = write!(out, "{pes} ");
    }
    out.push('\n');
    for method in &stats.methods {
        let _ = write!(out, "{method} ");
    }
    for graph in &stats.graphs {
        let _ = write!(out, "{} {:.3} ({}) ", graph.graph, graph.mean, sci(graph.std_dev));
    }
    out.push('\n');
    out
}

/// Matrix `A`, one row per population.
pub fn ga_matrix(matrix: &GaMatrix) -> String {
    let mut out = String::from("A = [");
    for row in &matrix.rows {
        for value in row {
            let _ = write!(out, "{}, ", sci(*value));
        }
        out.push_str(";\n");
    }
    out.push_str("];\n");
    out
}

/// `rows`, `columns`, mean table `A` and deviation table `stdA`.
pub fn value_matrix(matrix: &ValueMatrix) -> String {
    let mut out = String::new();
    for (name, values) in [("rows", &matrix.rows), ("columns", &matrix.columns)] {
        let _ = write!(out, "{name} = [");
        for value in values {
            let _ = write!(out, "{}, ", sci(*value));
        }
        out.push_str("];\n");
    }
    for (name, table) in [("A", &matrix.means), ("stdA", &matrix.std_devs)] {
        let _ = writeln!(out, "{name} = [");
        for row in table {
            for value in row {
                let _ = write!(out, "{} ", sci(*value));
            }
            out.push('\n');
        }
        out.push_str("];\n");
    }
    out
}

/// Raw record lines of every context.
pub fn context_text(contexts: &[ResultContext]) -> String {
    let mut out = String::new();
    for ctx in contexts {
        for line in ctx.text() {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// `x` energies and `y` times of every architecture.
pub fn arch_plot(archs: &[ArchResult<'_>]) -> String {
    let energies: Vec<f64> = archs.iter().map(|arch| arch.energy).collect();
    let times: Vec<f64> = archs.iter().map(|arch| arch.time).collect();
    let mut out = octave_vector("x", &energies);
    out.push_str(&octave_vector("y", &times));
    out
}

/// Tab-separated architecture table with a header line.
pub fn arch_table(archs: &[&ArchResult<'_>]) -> String {
    let reference = archs
        .first()
        .and_then(|arch| arch.reference_code.as_deref())
        .unwrap_or("None");

    let mut out = format!(
        "Arch code\tCost sum\tT\tEnergy\tIC energy\tGain ({reference})\tSpeedup ({reference})\t\
         k\tStatic proportion\tStatic energy\tDynamic energy\tA\tA pes\tA IC\tPEs\tPE util.\t\
         IC util.\tEvaluations\tOpt. Method\tArch info\n"
    );
    for arch in archs {
        let method = arch
            .method
            .map_or_else(|| "None".to_string(), |method| method.to_string());
        let _ = writeln!(
            out,
            "{}\t{:.9}\t{:.9}\t{:.9}\t{:.9}\t{:.3}\t{:.3}\t{:.9}\t{:.2}\t{:.9}\t{:.9}\t{:.9}\t{:.9}\t{:.9}\t{}\t{:.3}\t{:.3}\t{}\t{}\t{}",
            arch.code,
            arch.best_cost_sum,
            arch.time,
            arch.energy,
            arch.ic_energy,
            arch.gain,
            arch.speedup,
            arch.k,
            arch.static_proportion,
            arch.static_energy,
            arch.dynamic_energy,
            arch.area,
            arch.pe_area,
            arch.ic_area,
            arch.pes,
            arch.pe_utilization,
            arch.ic_utilization,
            arch.total_evaluations,
            method,
            arch.info,
        );
    }
    out
}

/// Cost-sorted, time-sorted and Pareto tables separated by blank lines.
pub fn arch_sorted(
    by_cost: &[&ArchResult<'_>],
    by_time: &[&ArchResult<'_>],
    pareto: &[&ArchResult<'_>],
) -> String {
    let gap = "\n".repeat(TABLE_GAP);
    let mut out = String::from("First field sorted\n");
    out.push_str(&arch_table(by_cost));
    out.push_str(&gap);
    out.push_str("Second field sorted\n");
    out.push_str(&arch_table(by_time));
    out.push_str(&gap);
    out.push_str("Pareto optimums\n");
    out.push_str(&arch_table(pareto));
    out
}

/// One sample field with a marker at its minimum.
pub fn samples(name: &str, series: &SampleSeries) -> String {
    let mut out = format!("{name} = [");
    for value in &series.values {
        let _ = write!(out, "{}, ", sci_with(*value, 3));
    }
    out.push_str("];\n");
    let _ = writeln!(out, "[mini, ind] = min({name});");
    let _ = writeln!(
        out,
        "plot(1:{}, {name}, 'r', [ind], [0.9*mini], 'bx')",
        series.values.len()
    );
    let _ = writeln!(
        out,
        "% minimum {} at {}, median {}",
        sci(series.minimum),
        series.min_index + 1,
        sci(series.median)
    );
    out
}

/// One `%`-comment line summarizing the minima of several sample vectors.
pub fn sample_summary(name: &str, summary: &SampleSummary) -> String {
    format!(
        "% {name} over {} vectors: mean/median minimum {} {}, mean/median index {} {}, mean length {}\n",
        summary.vectors,
        sci(summary.mean_minimum),
        sci(summary.median_minimum),
        scalar(summary.mean_min_index + 1.0),
        scalar(summary.median_min_index + 1.0),
        scalar(summary.mean_length),
    )
}
