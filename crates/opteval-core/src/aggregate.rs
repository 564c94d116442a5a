//! Merging many runs onto one evaluation axis.
//!
//! Every context samples its best cost at its own evaluation counts. The
//! aggregator builds the sorted union of those counts, starting where the
//! slowest-starting context has its first sample, and walks it once. Each
//! context keeps a forward-only cursor and contributes its most recent sample
//! at or before the current axis point (step-hold, never interpolated).

use crate::context::ResultContext;
use crate::stats::mean_and_std;
use crate::AnalysisError;
use serde::Serialize;

/// Transformation applied to a context's gain before averaging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GainTransform {
    /// The gain itself.
    Identity,
    /// Gain divided by the evaluation count.
    PerEvaluation,
    /// Gain divided by the square root of the evaluation count.
    PerSqrtEvaluation,
    /// Gain divided by the squared evaluation count.
    PerSquaredEvaluation,
    /// Gain rescaled as if every run had started from `base` objective.
    Rescaled { base: f64 },
}

impl GainTransform {
    /// `evaluation` is the context's last known evaluation position, at least 1.
    pub fn apply(&self, ctx: &ResultContext, gain: f64, evaluation: u64) -> f64 {
        let e = evaluation as f64;
        match self {
            GainTransform::Identity => gain,
            GainTransform::PerEvaluation => gain / e,
            GainTransform::PerSqrtEvaluation => gain / e.sqrt(),
            GainTransform::PerSquaredEvaluation => gain / (e * e),
            GainTransform::Rescaled { base } => match ctx.initial_objective() {
                Some(initial) => gain * base / initial,
                None => gain,
            },
        }
    }
}

/// What is averaged at every axis point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurveMetric {
    Gain(GainTransform),
    Cost,
}

impl Default for CurveMetric {
    fn default() -> Self {
        CurveMetric::Gain(GainTransform::Identity)
    }
}

/// Mean and standard deviation per shared evaluation count.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationCurve {
    pub evaluations: Vec<u64>,
    pub means: Vec<f64>,
    pub std_devs: Vec<f64>,
}

impl EvaluationCurve {
    pub fn len(&self) -> usize {
        self.evaluations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluations.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Cursor {
    idx: usize,
    gain: Option<f64>,
    cost: Option<f64>,
}

/// Aggregate contexts into one curve.
///
/// # Errors
///
/// Fails with `DATASET_EMPTY` when no contexts are given or a context has no
/// samples.
pub fn evaluation_curve<'a, I>(contexts: I, metric: CurveMetric) -> Result<EvaluationCurve, AnalysisError>
where
    I: IntoIterator<Item = &'a ResultContext>,
{
    let contexts: Vec<&ResultContext> = contexts.into_iter().collect();
    if contexts.is_empty() {
        return Err(AnalysisError::EmptyDataset("contexts"));
    }

    let mut start = 0;
    for ctx in &contexts {
        let first = ctx
            .evaluations()
            .first()
            .ok_or(AnalysisError::EmptyDataset("evaluations"))?;
        start = start.max(*first);
    }

    let mut axis: Vec<u64> = contexts
        .iter()
        .flat_map(|ctx| ctx.evaluations().iter().copied())
        .filter(|&e| e >= start)
        .collect();
    axis.sort_unstable();
    axis.dedup();

    let mut cursors = vec![Cursor::default(); contexts.len()];
    let mut curve = EvaluationCurve {
        evaluations: Vec::with_capacity(axis.len()),
        means: Vec::with_capacity(axis.len()),
        std_devs: Vec::with_capacity(axis.len()),
    };
    let mut values = Vec::with_capacity(contexts.len());
    let mut next_report = 0;

    for (point_idx, &e) in axis.iter().enumerate() {
        values.clear();

        for (ctx, cursor) in contexts.iter().zip(cursors.iter_mut()) {
            let evaluations = ctx.evaluations();
            while cursor.idx < evaluations.len() {
                let at = evaluations[cursor.idx];
                if at == e {
                    cursor.gain = Some(ctx.gains()[cursor.idx]);
                    cursor.cost = Some(ctx.best_costs()[cursor.idx]);
                    break;
                }
                if at > e {
                    break;
                }
                cursor.idx += 1;
            }

            let last_known = e.min(*evaluations.last().unwrap_or(&e)).max(1);
            match metric {
                CurveMetric::Gain(transform) => {
                    if let Some(gain) = cursor.gain {
                        values.push(transform.apply(ctx, gain, last_known));
                    }
                }
                CurveMetric::Cost => {
                    if let Some(cost) = cursor.cost {
                        values.push(cost);
                    }
                }
            }
        }

        let (mean, std) = mean_and_std(&values)?;
        curve.evaluations.push(e);
        curve.means.push(mean);
        curve.std_devs.push(std);

        let progress = point_idx * 100 / axis.len();
        if progress >= next_report {
            tracing::info!(
                component = "aggregate",
                operation = "evaluation_curve",
                status = "progress",
                progress_pct = progress,
                "{}% complete",
                progress
            );
            next_report = progress - progress % 5 + 5;
        }
    }

    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::curve_context;

    fn approx_eq(left: f64, right: f64) {
        assert!((left - right).abs() < 1e-9, "left={left}, right={right}");
    }

    #[test]
    fn test_axis_starts_at_latest_first_sample() {
        let a = curve_context("a", 100.0, &[(10, 100.0), (20, 90.0), (30, 80.0)]);
        let b = curve_context("b", 100.0, &[(15, 50.0), (25, 40.0)]);

        let curve = evaluation_curve([&a, &b], CurveMetric::Cost).unwrap();
        assert_eq!(curve.evaluations, vec![15, 20, 25, 30]);

        // a has no in-range sample before 20
        approx_eq(curve.means[0], 50.0);
        approx_eq(curve.std_devs[0], 0.0);
        approx_eq(curve.means[1], (90.0 + 50.0) / 2.0);
        approx_eq(curve.std_devs[1], 20.0);
        approx_eq(curve.means[2], (90.0 + 40.0) / 2.0);
        approx_eq(curve.means[3], (80.0 + 40.0) / 2.0);
    }

    #[test]
    fn test_gain_curve_holds_last_sample() {
        let a = curve_context("a", 100.0, &[(10, 100.0), (20, 50.0)]);
        let b = curve_context("b", 60.0, &[(10, 60.0), (40, 20.0)]);

        let curve = evaluation_curve([&a, &b], CurveMetric::default()).unwrap();
        assert_eq!(curve.evaluations, vec![10, 20, 40]);
        approx_eq(curve.means[0], 1.0);
        approx_eq(curve.means[1], (2.0 + 1.0) / 2.0);
        approx_eq(curve.means[2], (2.0 + 3.0) / 2.0);
    }

    #[test]
    fn test_gain_transforms_use_last_known_evaluation() {
        let a = curve_context("a", 100.0, &[(4, 50.0)]);
        let b = curve_context("b", 100.0, &[(2, 100.0), (16, 25.0)]);

        let curve = evaluation_curve(
            [&a, &b],
            CurveMetric::Gain(GainTransform::PerSqrtEvaluation),
        )
        .unwrap();
        assert_eq!(curve.evaluations, vec![4, 16]);
        // b has no sample at 4; a contributes 2 / sqrt(4)
        approx_eq(curve.means[0], 1.0);
        // a's last sample is at 4, b's at 16
        approx_eq(curve.means[1], (2.0 / 2.0 + 4.0 / 4.0) / 2.0);

        let curve = evaluation_curve([&a], CurveMetric::Gain(GainTransform::PerEvaluation)).unwrap();
        approx_eq(curve.means[0], 0.5);

        let curve =
            evaluation_curve([&a], CurveMetric::Gain(GainTransform::PerSquaredEvaluation)).unwrap();
        approx_eq(curve.means[0], 2.0 / 16.0);
    }

    #[test]
    fn test_rescaled_transform() {
        let a = curve_context("a", 50.0, &[(1, 25.0)]);
        let curve = evaluation_curve(
            [&a],
            CurveMetric::Gain(GainTransform::Rescaled { base: 200.0 }),
        )
        .unwrap();
        approx_eq(curve.means[0], 2.0 * 200.0 / 50.0);
    }

    #[test]
    fn test_empty_input_fails() {
        let err = evaluation_curve(std::iter::empty(), CurveMetric::Cost).unwrap_err();
        assert_eq!(err, AnalysisError::EmptyDataset("contexts"));
    }
}
