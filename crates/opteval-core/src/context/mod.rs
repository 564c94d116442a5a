//! Result contexts: one normalized optimization run per `MARK` record.
//!
//! A [`PendingContext`] accumulates field updates while its record is being
//! read. [`PendingContext::finalize`] validates the accumulated samples,
//! compacts redundant cost samples and computes gains, producing an immutable
//! [`ResultContext`].
//!
//! # Module Organization
//!
//! - [`label`]: the closed set of recognized record labels
//! - [`hardware`]: PE descriptors and interconnect constants

mod hardware;
mod label;

use crate::AnalysisError;
use crate::method::Method;
use std::str::FromStr;

pub use hardware::{IC_AREA_PER_PE, PeData};
pub use label::{CostLayout, Label};

/// A finalized optimization run.
#[derive(Debug, Clone, Default)]
pub struct ResultContext {
    pub(crate) graph: Option<String>,
    pub(crate) method: Option<Method>,
    pub(crate) ntasks: Option<u32>,
    pub(crate) pes: Option<u32>,
    pub(crate) edges: Option<u32>,
    pub(crate) ic_frequency: Option<u64>,
    pub(crate) power_k: f64,
    pub(crate) acceptor: Option<String>,
    pub(crate) total_evaluations: Option<u64>,
    pub(crate) initial_objective: Option<f64>,
    pub(crate) initial_time: Option<f64>,
    pub(crate) best_objective: Option<f64>,
    pub(crate) best_time: Option<f64>,
    pub(crate) schedule_length: Option<i64>,
    pub(crate) elitism: Option<u32>,
    pub(crate) population: Option<u32>,
    pub(crate) chromosome_mutation: Option<f64>,
    pub(crate) gene_mutation: Option<f64>,
    pub(crate) best_costs: Vec<f64>,
    pub(crate) evaluations: Vec<u64>,
    pub(crate) gains: Vec<f64>,
    pub(crate) pe_data: Vec<PeData>,
    pub(crate) ic_areas: Vec<f64>,
    pub(crate) pe_utilizations: Vec<f64>,
    pub(crate) ic_utilizations: Vec<f64>,
    pub(crate) saved: usize,
    pub(crate) text: Vec<String>,
}

impl ResultContext {
    /// Graph identifier from the `MARK` line.
    pub fn graph(&self) -> Option<&str> {
        self.graph.as_deref()
    }

    pub fn method(&self) -> Option<Method> {
        self.method
    }

    /// True iff the method belongs to the simulated annealing family.
    pub fn is_simulated_annealing(&self) -> bool {
        self.method.is_some_and(Method::is_simulated_annealing)
    }

    pub fn ntasks(&self) -> Option<u32> {
        self.ntasks
    }

    pub fn pes(&self) -> Option<u32> {
        self.pes
    }

    pub fn edges(&self) -> Option<u32> {
        self.edges
    }

    /// Shared frequency of every interconnect segment.
    pub fn ic_frequency(&self) -> Option<u64> {
        self.ic_frequency
    }

    /// Dynamic power constant the run was optimized with (default 0.0).
    pub fn power_k(&self) -> f64 {
        self.power_k
    }

    /// Simulated annealing acceptor function name.
    pub fn acceptor(&self) -> Option<&str> {
        self.acceptor.as_deref()
    }

    pub fn total_evaluations(&self) -> Option<u64> {
        self.total_evaluations
    }

    pub fn initial_objective(&self) -> Option<f64> {
        self.initial_objective
    }

    pub fn initial_time(&self) -> Option<f64> {
        self.initial_time
    }

    pub fn best_objective(&self) -> Option<f64> {
        self.best_objective
    }

    pub fn best_time(&self) -> Option<f64> {
        self.best_time
    }

    /// Annealing schedule length `L`.
    pub fn schedule_length(&self) -> Option<i64> {
        self.schedule_length
    }

    pub fn elitism(&self) -> Option<u32> {
        self.elitism
    }

    pub fn population(&self) -> Option<u32> {
        self.population
    }

    pub fn chromosome_mutation(&self) -> Option<f64> {
        self.chromosome_mutation
    }

    pub fn gene_mutation(&self) -> Option<f64> {
        self.gene_mutation
    }

    /// Best cost samples after compaction.
    pub fn best_costs(&self) -> &[f64] {
        &self.best_costs
    }

    /// Evaluation counts aligned with [`best_costs`](Self::best_costs).
    pub fn evaluations(&self) -> &[u64] {
        &self.evaluations
    }

    /// `initial_objective / cost` for every retained sample.
    pub fn gains(&self) -> &[f64] {
        &self.gains
    }

    pub fn pe_data(&self) -> &[PeData] {
        &self.pe_data
    }

    pub fn ic_areas(&self) -> &[f64] {
        &self.ic_areas
    }

    pub fn pe_utilizations(&self) -> &[f64] {
        &self.pe_utilizations
    }

    pub fn ic_utilizations(&self) -> &[f64] {
        &self.ic_utilizations
    }

    /// Number of redundant cost samples removed by compaction.
    pub fn saved(&self) -> usize {
        self.saved
    }

    /// Raw record lines, kept only when text retention is enabled.
    pub fn text(&self) -> &[String] {
        &self.text
    }

    pub fn final_cost(&self) -> Option<f64> {
        self.best_costs.last().copied()
    }

    pub fn final_gain(&self) -> Option<f64> {
        self.gains.last().copied()
    }
}

impl std::fmt::Display for ResultContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} costs {} tasks {} pes {} totalevals",
            self.best_costs.len(),
            self.ntasks.unwrap_or(0),
            self.pes.unwrap_or(0),
            self.total_evaluations.unwrap_or(0)
        )
    }
}

/// A context whose record is still being read.
#[derive(Debug, Clone, Default)]
pub struct PendingContext {
    ctx: ResultContext,
}

impl PendingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one `label values...` record.
    ///
    /// Unrecognized labels are ignored. Values outside their documented
    /// range fail immediately.
    pub fn update<S: AsRef<str>>(&mut self, label: &str, values: &[S]) -> Result<(), AnalysisError> {
        let Some(kind) = Label::parse(label) else {
            return Ok(());
        };
        let ctx = &mut self.ctx;

        match kind {
            Label::Mark => ctx.graph = Some(value(label, values, 0)?.to_string()),
            Label::BestCostSoFar
            | Label::BestSaCostSoFar
            | Label::BestGaCostSoFar
            | Label::BestGmCostSoFar
            | Label::BestOsmCostSoFar
            | Label::BestRandomCostSoFar => {
                if let Some(layout) = kind.cost_layout() {
                    self.add_cost(label, values, layout)?;
                }
            }
            Label::SaAcceptor => ctx.acceptor = Some(value(label, values, 0)?.to_string()),
            Label::SaScheduleMax => ctx.schedule_length = Some(number(label, values, 0)?),
            Label::Edges => ctx.edges = Some(positive_int(label, values, 0)?),
            Label::Evaluations => ctx.total_evaluations = Some(positive_int(label, values, 0)?),
            Label::InitialObjective => {
                ctx.initial_objective = Some(positive_float(label, values, 0)?)
            }
            Label::InitialTime => ctx.initial_time = Some(positive_float(label, values, 0)?),
            Label::BestObjective => ctx.best_objective = Some(positive_float(label, values, 0)?),
            Label::BestTime => ctx.best_time = Some(positive_float(label, values, 0)?),
            Label::Ntasks => {
                if values.len() != 1 {
                    return Err(AnalysisError::Arity {
                        label: label.to_string(),
                        expected: 1,
                        found: values.len(),
                    });
                }
                ctx.ntasks = Some(positive_int(label, values, 0)?);
            }
            Label::OptimizationMethod => {
                let method = Method::from_str(value(label, values, 0)?)?;
                ctx.method = Some(method);
            }
            Label::Pe => {
                let frequency = positive_int(label, values, 3)?;
                let performance = positive_float(label, values, 5)?;
                let area = positive_float(label, values, 7)?;
                ctx.pe_data.push(PeData::new(frequency, performance, area));
            }
            Label::Pes => ctx.pes = Some(positive_int(label, values, 0)?),
            Label::Interconnect => {
                let frequency: u64 = positive_int(label, values, 3)?;
                match ctx.ic_frequency {
                    Some(expected) if expected != frequency => {
                        return Err(AnalysisError::NonSymmetricBuses {
                            expected,
                            found: frequency,
                        });
                    }
                    _ => {}
                }
                let area = if values.len() >= 10 {
                    positive_float(label, values, 5)?
                } else {
                    IC_AREA_PER_PE * ctx.pe_data.len() as f64
                };
                ctx.ic_frequency = Some(frequency);
                ctx.ic_areas.push(area);
            }
            Label::IcUtilisations => {
                for idx in 0..ctx.ic_areas.len() {
                    ctx.ic_utilizations.push(fraction(label, values, idx)?);
                }
            }
            Label::PeUtilisations => {
                for idx in 0..values.len() {
                    ctx.pe_utilizations.push(fraction(label, values, idx)?);
                }
            }
            Label::PowerK => {
                let k: f64 = number(label, values, 0)?;
                if k.is_nan() || k < 0.0 {
                    return Err(AnalysisError::out_of_range(label, k));
                }
                ctx.power_k = k;
            }
            Label::PopulationSize => ctx.population = Some(number(label, values, 0)?),
            Label::Elitism => ctx.elitism = Some(number(label, values, 0)?),
            Label::ChromosomeMutationProbability => {
                ctx.chromosome_mutation = Some(fraction(label, values, 0)?)
            }
            Label::GeneMutationProbability => {
                ctx.gene_mutation = Some(fraction(label, values, 0)?)
            }
        }
        Ok(())
    }

    /// Keep a raw line for verbatim re-emission.
    pub fn push_text(&mut self, line: &str) {
        self.ctx.text.push(line.to_string());
    }

    /// Graph identifier seen so far, for diagnostics.
    pub fn graph(&self) -> Option<&str> {
        self.ctx.graph()
    }

    fn add_cost<S: AsRef<str>>(
        &mut self,
        label: &str,
        values: &[S],
        layout: CostLayout,
    ) -> Result<(), AnalysisError> {
        let cost = positive_float(label, values, layout.cost)?;
        if let Some(idx) = layout.evaluations {
            let evaluation: u64 = number(label, values, idx)?;
            self.ctx.evaluations.push(evaluation);
        }
        self.ctx.best_costs.push(cost);
        Ok(())
    }

    /// Validate and normalize the accumulated record.
    ///
    /// SA-family runs get a derived schedule length when none was logged and
    /// evenly spaced evaluation counts when no per-sample counts were
    /// recorded. Consecutive equal costs are collapsed to their first
    /// occurrence, then gains are computed for the retained samples.
    pub fn finalize(self) -> Result<ResultContext, AnalysisError> {
        let mut ctx = self.ctx;
        let samples = ctx.best_costs.len();
        if samples == 0 {
            return Err(AnalysisError::EmptyDataset("best_cost"));
        }

        if ctx.is_simulated_annealing() {
            if ctx.schedule_length.is_none_or(|length| length < 0) {
                let ntasks = ctx.ntasks.ok_or(AnalysisError::MissingField("ntasks"))?;
                let pes = ctx.pes.ok_or(AnalysisError::MissingField("pes"))?;
                let length = i64::from(ntasks) * (i64::from(pes) - 1);
                if length <= 0 {
                    return Err(AnalysisError::out_of_range("sa_schedule_max", length));
                }
                ctx.schedule_length = Some(length);
            }

            if ctx.evaluations.is_empty() {
                let total = ctx
                    .total_evaluations
                    .ok_or(AnalysisError::MissingField("evaluations"))?;
                let step = total / samples as u64;
                if step == 0 {
                    return Err(AnalysisError::out_of_range("evaluations", total));
                }
                ctx.evaluations = (1..=samples as u64).map(|i| i * step).collect();
            }
        }

        if ctx.evaluations.len() != samples {
            return Err(AnalysisError::Arity {
                label: "evaluations".to_string(),
                expected: samples,
                found: ctx.evaluations.len(),
            });
        }

        let mut best_costs = Vec::with_capacity(samples);
        let mut evaluations = Vec::with_capacity(samples);
        let mut previous: Option<f64> = None;
        for (&cost, &evaluation) in ctx.best_costs.iter().zip(&ctx.evaluations) {
            if previous != Some(cost) {
                best_costs.push(cost);
                evaluations.push(evaluation);
            }
            previous = Some(cost);
        }
        ctx.saved = samples - best_costs.len();
        ctx.best_costs = best_costs;
        ctx.evaluations = evaluations;

        let initial = ctx
            .initial_objective
            .ok_or(AnalysisError::MissingField("initial_objective"))?;
        ctx.gains = ctx.best_costs.iter().map(|cost| initial / cost).collect();

        Ok(ctx)
    }
}

fn value<'v, S: AsRef<str>>(label: &str, values: &'v [S], idx: usize) -> Result<&'v str, AnalysisError> {
    values
        .get(idx)
        .map(|raw| raw.as_ref())
        .ok_or_else(|| AnalysisError::Arity {
            label: label.to_string(),
            expected: idx + 1,
            found: values.len(),
        })
}

fn number<T: FromStr, S: AsRef<str>>(label: &str, values: &[S], idx: usize) -> Result<T, AnalysisError> {
    let raw = value(label, values, idx)?;
    raw.parse().map_err(|_| AnalysisError::NotANumber {
        label: label.to_string(),
        value: raw.to_string(),
    })
}

fn positive_int<T: TryFrom<i64>, S: AsRef<str>>(
    label: &str,
    values: &[S],
    idx: usize,
) -> Result<T, AnalysisError> {
    let raw: i64 = number(label, values, idx)?;
    if raw <= 0 {
        return Err(AnalysisError::out_of_range(label, raw));
    }
    T::try_from(raw).map_err(|_| AnalysisError::out_of_range(label, raw))
}

fn positive_float<S: AsRef<str>>(label: &str, values: &[S], idx: usize) -> Result<f64, AnalysisError> {
    let raw: f64 = number(label, values, idx)?;
    if raw.is_nan() || raw <= 0.0 {
        return Err(AnalysisError::out_of_range(label, raw));
    }
    Ok(raw)
}

fn fraction<S: AsRef<str>>(label: &str, values: &[S], idx: usize) -> Result<f64, AnalysisError> {
    let raw: f64 = number(label, values, idx)?;
    if !(0.0..=1.0).contains(&raw) {
        return Err(AnalysisError::out_of_range(label, raw));
    }
    Ok(raw)
}
