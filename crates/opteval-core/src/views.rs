//! Summary views over selected contexts.

use crate::context::ResultContext;
use crate::method::Method;
use crate::stats::{mean_and_std, unique_sorted};
use crate::AnalysisError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Value used for GA matrix cells no run covered.
pub const GA_MATRIX_PAD: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphGain {
    pub graph: String,
    pub mean: f64,
    pub std_dev: f64,
    pub runs: usize,
}

/// Final-gain statistics per graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerGraphStats {
    /// Distinct PE counts, ascending.
    pub pes: Vec<u32>,
    /// Distinct methods, ascending by name.
    pub methods: Vec<Method>,
    /// One entry per graph, ascending by name.
    pub graphs: Vec<GraphGain>,
}

pub fn per_graph_stats(contexts: &[ResultContext]) -> Result<PerGraphStats, AnalysisError> {
    if contexts.is_empty() {
        return Err(AnalysisError::EmptyDataset("contexts"));
    }

    let mut by_graph: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for ctx in contexts {
        let graph = ctx.graph().ok_or(AnalysisError::MissingField("graph"))?;
        let gain = ctx
            .final_gain()
            .ok_or(AnalysisError::EmptyDataset("gains"))?;
        by_graph.entry(graph).or_default().push(gain);
    }

    let mut graphs = Vec::with_capacity(by_graph.len());
    for (graph, gains) in by_graph {
        let (mean, std_dev) = mean_and_std(&gains)?;
        graphs.push(GraphGain {
            graph: graph.to_string(),
            mean,
            std_dev,
            runs: gains.len(),
        });
    }

    let mut methods = unique_sorted(contexts.iter().filter_map(ResultContext::method));
    methods.sort_by_key(|method| method.as_str());

    Ok(PerGraphStats {
        pes: unique_sorted(contexts.iter().filter_map(ResultContext::pes)),
        methods,
        graphs,
    })
}

/// Final gains of genetic-algorithm runs laid out by population (rows) and
/// elitism (columns).
///
/// Each row lists the gains of its runs in elitism order and is padded with
/// [`GA_MATRIX_PAD`] up to the column count. A row holds more values than
/// there are columns when several runs share a cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaMatrix {
    pub populations: Vec<u32>,
    pub elitisms: Vec<u32>,
    pub rows: Vec<Vec<f64>>,
}

pub fn ga_matrix(contexts: &[ResultContext]) -> Result<GaMatrix, AnalysisError> {
    if contexts.is_empty() {
        return Err(AnalysisError::EmptyDataset("contexts"));
    }

    let mut cells = Vec::with_capacity(contexts.len());
    for ctx in contexts {
        let population = ctx
            .population()
            .ok_or(AnalysisError::MissingField("population_size"))?;
        let elitism = ctx.elitism().ok_or(AnalysisError::MissingField("elitism"))?;
        let gain = ctx
            .final_gain()
            .ok_or(AnalysisError::EmptyDataset("gains"))?;
        cells.push((population, elitism, gain));
    }

    let populations = unique_sorted(cells.iter().map(|cell| cell.0));
    let elitisms = unique_sorted(cells.iter().map(|cell| cell.1));

    let rows = populations
        .iter()
        .map(|&population| {
            let mut row: Vec<f64> = elitisms
                .iter()
                .flat_map(|&elitism| {
                    cells
                        .iter()
                        .filter(move |cell| cell.0 == population && cell.1 == elitism)
                        .map(|cell| cell.2)
                })
                .collect();
            if row.len() < elitisms.len() {
                row.resize(elitisms.len(), GA_MATRIX_PAD);
            }
            row
        })
        .collect();

    Ok(GaMatrix {
        populations,
        elitisms,
        rows,
    })
}

/// Sum of every context's final best cost.
pub fn total_combined_cost(contexts: &[ResultContext]) -> Result<f64, AnalysisError> {
    if contexts.is_empty() {
        return Err(AnalysisError::EmptyDataset("contexts"));
    }
    let mut total = 0.0;
    for ctx in contexts {
        total += ctx
            .final_cost()
            .ok_or(AnalysisError::EmptyDataset("best_cost"))?;
    }
    Ok(total)
}

/// Numeric context field used as a matrix coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixField {
    Pes,
    Tasks,
    Edges,
    /// The method's [`crate::Method::index`].
    Method,
    PowerK,
    ScheduleLength,
    Elitism,
    Population,
    ChromosomeMutation,
    GeneMutation,
    IcFrequency,
    Evaluations,
}

impl MatrixField {
    pub const ALL: [MatrixField; 12] = [
        MatrixField::Pes,
        MatrixField::Tasks,
        MatrixField::Edges,
        MatrixField::Method,
        MatrixField::PowerK,
        MatrixField::ScheduleLength,
        MatrixField::Elitism,
        MatrixField::Population,
        MatrixField::ChromosomeMutation,
        MatrixField::GeneMutation,
        MatrixField::IcFrequency,
        MatrixField::Evaluations,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MatrixField::Pes => "pes",
            MatrixField::Tasks => "tasks",
            MatrixField::Edges => "edges",
            MatrixField::Method => "method",
            MatrixField::PowerK => "k",
            MatrixField::ScheduleLength => "L",
            MatrixField::Elitism => "elitism",
            MatrixField::Population => "population",
            MatrixField::ChromosomeMutation => "chromosome-mutation",
            MatrixField::GeneMutation => "gene-mutation",
            MatrixField::IcFrequency => "ic-freq",
            MatrixField::Evaluations => "evaluations",
        }
    }

    pub fn value(self, ctx: &ResultContext) -> Option<f64> {
        match self {
            MatrixField::Pes => ctx.pes().map(f64::from),
            MatrixField::Tasks => ctx.ntasks().map(f64::from),
            MatrixField::Edges => ctx.edges().map(f64::from),
            MatrixField::Method => ctx.method().map(|method| f64::from(method.index())),
            MatrixField::PowerK => Some(ctx.power_k()),
            MatrixField::ScheduleLength => ctx.schedule_length().map(|l| l as f64),
            MatrixField::Elitism => ctx.elitism().map(f64::from),
            MatrixField::Population => ctx.population().map(f64::from),
            MatrixField::ChromosomeMutation => ctx.chromosome_mutation(),
            MatrixField::GeneMutation => ctx.gene_mutation(),
            MatrixField::IcFrequency => ctx.ic_frequency().map(|f| f as f64),
            MatrixField::Evaluations => ctx.total_evaluations().map(|e| e as f64),
        }
    }
}

impl FromStr for MatrixField {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MatrixField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| {
                AnalysisError::invalid_filter("matrix", format!("unknown coordinate field '{s}'"))
            })
    }
}

/// Result averaged in every matrix cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixValue {
    /// Final gain.
    #[default]
    Gain,
    /// Final best cost.
    Cost,
    /// `best_time`.
    Time,
    /// Total evaluations.
    Evaluations,
}

impl MatrixValue {
    pub fn as_str(self) -> &'static str {
        match self {
            MatrixValue::Gain => "gain",
            MatrixValue::Cost => "cost",
            MatrixValue::Time => "time",
            MatrixValue::Evaluations => "evaluations",
        }
    }

    fn value(self, ctx: &ResultContext) -> Option<f64> {
        match self {
            MatrixValue::Gain => ctx.final_gain(),
            MatrixValue::Cost => ctx.final_cost(),
            MatrixValue::Time => ctx.best_time(),
            MatrixValue::Evaluations => ctx.total_evaluations().map(|e| e as f64),
        }
    }
}

impl FromStr for MatrixValue {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            MatrixValue::Gain,
            MatrixValue::Cost,
            MatrixValue::Time,
            MatrixValue::Evaluations,
        ]
        .into_iter()
        .find(|value| value.as_str() == s)
        .ok_or_else(|| AnalysisError::invalid_filter("matrix", format!("unknown result value '{s}'")))
    }
}

/// Mean and standard deviation of a result value over two coordinate fields.
///
/// `means[r][c]` belongs to `rows[r]` and `columns[c]`. Cells no context
/// falls into hold 0.0 in both tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueMatrix {
    pub rows: Vec<f64>,
    pub columns: Vec<f64>,
    pub means: Vec<Vec<f64>>,
    pub std_devs: Vec<Vec<f64>>,
}

/// Lay `value` out by `row_field` and `column_field`.
///
/// # Errors
///
/// Fails with `DATASET_EMPTY` on no contexts and with `FIELD_MISSING` when a
/// context lacks a coordinate or the value.
pub fn value_matrix(
    contexts: &[ResultContext],
    row_field: MatrixField,
    column_field: MatrixField,
    value: MatrixValue,
) -> Result<ValueMatrix, AnalysisError> {
    if contexts.is_empty() {
        return Err(AnalysisError::EmptyDataset("contexts"));
    }

    let mut cells = Vec::with_capacity(contexts.len());
    for ctx in contexts {
        let row = row_field
            .value(ctx)
            .ok_or(AnalysisError::MissingField(row_field.as_str()))?;
        let column = column_field
            .value(ctx)
            .ok_or(AnalysisError::MissingField(column_field.as_str()))?;
        let result = value
            .value(ctx)
            .ok_or(AnalysisError::MissingField(value.as_str()))?;
        cells.push((row, column, result));
    }

    let rows = sorted_coordinates(cells.iter().map(|cell| cell.0));
    let columns = sorted_coordinates(cells.iter().map(|cell| cell.1));

    let mut means = vec![vec![0.0; columns.len()]; rows.len()];
    let mut std_devs = vec![vec![0.0; columns.len()]; rows.len()];
    for (r, &row) in rows.iter().enumerate() {
        for (c, &column) in columns.iter().enumerate() {
            let values: Vec<f64> = cells
                .iter()
                .filter(|cell| cell.0 == row && cell.1 == column)
                .map(|cell| cell.2)
                .collect();
            if values.is_empty() {
                continue;
            }
            let (mean, std_dev) = mean_and_std(&values)?;
            means[r][c] = mean;
            std_devs[r][c] = std_dev;
        }
    }

    tracing::debug!(
        component = "views",
        operation = "value_matrix",
        status = "success",
        rows = rows.len(),
        columns = columns.len(),
        contexts = contexts.len(),
        "Matrix is based on {} contexts",
        contexts.len()
    );

    Ok(ValueMatrix {
        rows,
        columns,
        means,
        std_devs,
    })
}

fn sorted_coordinates(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values
}
