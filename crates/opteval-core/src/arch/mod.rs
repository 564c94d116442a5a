//! Architecture energy model.
//!
//! Contexts are grouped into architectures, each group accumulates static
//! and dynamic energy over its member runs, and finalized groups are compared
//! against a reference architecture.
//!
//! For one run with time `T`:
//!
//! - static energy is `(sum of PE areas + sum of interconnect areas) * T * f_max`
//! - dynamic energy is `sum(A_i * T * f_i * k * U_i)` over PEs plus the same
//!   sum over interconnect segments at the interconnect frequency
//!
//! `f_max` is the highest PE or interconnect frequency and `k` weights the
//! dynamic part. `k` is shared by every architecture in one comparison.

mod pareto;

pub use pareto::pareto_front;

use crate::aggregate::{evaluation_curve, CurveMetric, EvaluationCurve, GainTransform};
use crate::context::{PeData, ResultContext};
use crate::method::Method;
use crate::stats::{count_duplicity, mean, mean_and_std};
use crate::AnalysisError;
use serde::Serialize;
use std::collections::BTreeMap;

/// Letter codes for every distinct PE descriptor of one comparison.
///
/// Descriptors are ranked by (frequency * performance, area); the lowest
/// gets `A`.
#[derive(Debug, Clone, Default)]
pub struct ArchCodeMap {
    ranked: Vec<(PeData, char)>,
}

impl ArchCodeMap {
    pub fn from_contexts<'a, I>(contexts: I) -> Result<Self, AnalysisError>
    where
        I: IntoIterator<Item = &'a ResultContext>,
    {
        let mut unique: Vec<PeData> = Vec::new();
        for ctx in contexts {
            unique.extend_from_slice(ctx.pe_data());
        }
        unique.sort_by(PeData::rank_cmp);
        unique.dedup_by(|a, b| a.rank_cmp(b).is_eq());

        let mut ranked = Vec::with_capacity(unique.len());
        for (idx, pe) in unique.into_iter().enumerate() {
            let letter = u32::try_from(idx)
                .ok()
                .and_then(|offset| char::from_u32(u32::from(b'A') + offset))
                .ok_or_else(|| {
                    AnalysisError::InvalidGrouping(format!("too many distinct PEs ({})", idx + 1))
                })?;
            ranked.push((pe, letter));
        }
        Ok(Self { ranked })
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn letter(&self, pe: &PeData) -> Option<char> {
        self.ranked
            .binary_search_by(|(probe, _)| probe.rank_cmp(pe))
            .ok()
            .map(|idx| self.ranked[idx].1)
    }

    /// Sorted concatenation of the letters of `pes`.
    pub fn code_for(&self, pes: &[PeData]) -> Result<String, AnalysisError> {
        let mut letters = Vec::with_capacity(pes.len());
        for pe in pes {
            let letter = self
                .letter(pe)
                .ok_or_else(|| AnalysisError::UnknownArchitecture(pe.fingerprint()))?;
            letters.push(letter);
        }
        letters.sort_unstable();
        Ok(letters.into_iter().collect())
    }
}

/// Exact hardware fingerprint of a context, independent of PE order.
pub fn fingerprint(ctx: &ResultContext) -> String {
    let mut items: Vec<String> = ctx.pe_data().iter().map(PeData::fingerprint).collect();
    items.sort();
    items.join(":")
}

/// How contexts are partitioned into architectures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchGrouping {
    /// Every `per_arch` consecutive contexts form one architecture.
    Consecutive { per_arch: usize },
    /// Contexts with equal letter codes share an architecture.
    Code,
    /// Contexts with equal exact fingerprints share an architecture.
    Fingerprint,
}

/// Which architecture gains and speedups are relative to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReferenceSelection {
    None,
    /// `AA` when present, otherwise the architecture with the largest total time.
    #[default]
    Auto,
    Code(String),
}

/// Running sums for one architecture.
#[derive(Debug, Clone)]
pub struct ArchAccumulator<'a> {
    k: f64,
    members: Vec<&'a ResultContext>,
    time: f64,
    best_cost_sum: f64,
    energy: f64,
    ic_energy: f64,
    static_energy: f64,
    dynamic_energy: f64,
    static_proportions: Vec<f64>,
    pe_area: f64,
    ic_area: f64,
    max_frequency: u64,
}

impl<'a> ArchAccumulator<'a> {
    pub fn new(k: f64) -> Self {
        Self {
            k,
            members: Vec::new(),
            time: 0.0,
            best_cost_sum: 0.0,
            energy: 0.0,
            ic_energy: 0.0,
            static_energy: 0.0,
            dynamic_energy: 0.0,
            static_proportions: Vec::new(),
            pe_area: 0.0,
            ic_area: 0.0,
            max_frequency: 0,
        }
    }

    /// Add one run. Areas and the maximum frequency come from the first run.
    pub fn add(&mut self, ctx: &'a ResultContext) -> Result<(), AnalysisError> {
        let time = ctx.best_time().ok_or(AnalysisError::MissingField("best_time"))?;
        let best_objective = ctx
            .best_objective()
            .ok_or(AnalysisError::MissingField("best_objective"))?;
        if ctx.pe_data().is_empty() {
            return Err(AnalysisError::MissingField("pe"));
        }
        if ctx.pe_utilizations().len() < ctx.pe_data().len() {
            return Err(AnalysisError::Arity {
                label: "pe_utilisations".to_string(),
                expected: ctx.pe_data().len(),
                found: ctx.pe_utilizations().len(),
            });
        }
        let ic_frequency = ctx.ic_frequency().unwrap_or(0);
        if !ctx.ic_areas().is_empty() && ctx.ic_frequency().is_none() {
            return Err(AnalysisError::MissingField("interconnect"));
        }

        if self.members.is_empty() {
            self.pe_area = ctx.pe_data().iter().map(|pe| pe.area).sum();
            self.ic_area = ctx.ic_areas().iter().sum();
            self.max_frequency = ctx
                .pe_data()
                .iter()
                .map(|pe| pe.frequency)
                .fold(ic_frequency, u64::max);
        }
        let f_max = self.max_frequency as f64;

        let pe_static = self.pe_area * time * f_max;
        let pe_dynamic: f64 = ctx
            .pe_data()
            .iter()
            .zip(ctx.pe_utilizations())
            .map(|(pe, util)| pe.area * time * pe.frequency as f64 * self.k * util)
            .sum();
        let ic_static = self.ic_area * time * f_max;
        let ic_dynamic: f64 = ctx
            .ic_areas()
            .iter()
            .zip(ctx.ic_utilizations())
            .map(|(area, util)| area * time * ic_frequency as f64 * self.k * util)
            .sum();

        let static_energy = pe_static + ic_static;
        let dynamic_energy = pe_dynamic + ic_dynamic;
        let total = static_energy + dynamic_energy;

        self.members.push(ctx);
        self.time += time;
        self.best_cost_sum += best_objective;
        self.static_proportions.push(static_energy / total);
        self.energy += total;
        self.ic_energy += ic_static + ic_dynamic;
        self.static_energy += static_energy;
        self.dynamic_energy += dynamic_energy;
        Ok(())
    }

    pub fn members(&self) -> &[&'a ResultContext] {
        &self.members
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Derive the summary, relative to `reference` when one is given.
    pub fn finalize(
        self,
        codes: &ArchCodeMap,
        reference: Option<&ReferenceArch>,
    ) -> Result<ArchResult<'a>, AnalysisError> {
        let first = *self
            .members
            .first()
            .ok_or(AnalysisError::EmptyDataset("architecture"))?;

        let (static_proportion, _) = mean_and_std(&self.static_proportions)?;

        let mut total_evaluations = 0;
        let mut pe_utils = Vec::with_capacity(self.members.len());
        let mut ic_utils = Vec::with_capacity(self.members.len());
        for ctx in &self.members {
            total_evaluations += ctx
                .total_evaluations()
                .ok_or(AnalysisError::MissingField("evaluations"))?;
            pe_utils.push(mean(ctx.pe_utilizations())?);
            if !ctx.ic_utilizations().is_empty() {
                ic_utils.push(mean(ctx.ic_utilizations())?);
            }
        }
        let ic_utilization = if ic_utils.is_empty() {
            0.0
        } else {
            mean(&ic_utils)?
        };

        let (reference_code, gain, speedup) = match reference {
            Some(reference) => (
                Some(reference.code.clone()),
                reference.energy / self.energy,
                reference.time / self.time,
            ),
            None => (None, 0.0, 0.0),
        };

        Ok(ArchResult {
            code: codes.code_for(first.pe_data())?,
            reference_code,
            k: self.k,
            pes: first.pe_data().len(),
            time: self.time,
            power: self.energy / self.time,
            best_cost_sum: self.best_cost_sum,
            energy: self.energy,
            ic_energy: self.ic_energy,
            static_energy: self.static_energy,
            dynamic_energy: self.dynamic_energy,
            static_proportion,
            gain,
            speedup,
            area: self.pe_area + self.ic_area,
            pe_area: self.pe_area,
            ic_area: self.ic_area,
            pe_utilization: mean(&pe_utils)?,
            ic_utilization,
            total_evaluations,
            method: first.method(),
            info: describe_pes(first.pe_data()),
            members: self.members,
        })
    }
}

/// What other architectures are compared against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceArch {
    pub code: String,
    pub energy: f64,
    pub time: f64,
    pub members: usize,
}

/// Finalized summary of one architecture.
#[derive(Debug, Clone, Serialize)]
pub struct ArchResult<'a> {
    pub code: String,
    pub reference_code: Option<String>,
    pub k: f64,
    pub pes: usize,
    pub time: f64,
    pub power: f64,
    pub best_cost_sum: f64,
    pub energy: f64,
    pub ic_energy: f64,
    pub static_energy: f64,
    pub dynamic_energy: f64,
    /// Mean over member runs of static / total energy.
    pub static_proportion: f64,
    /// Reference energy over this energy, 0 without a reference.
    pub gain: f64,
    /// Reference time over this time, 0 without a reference.
    pub speedup: f64,
    pub area: f64,
    pub pe_area: f64,
    pub ic_area: f64,
    pub pe_utilization: f64,
    pub ic_utilization: f64,
    pub total_evaluations: u64,
    pub method: Option<Method>,
    /// PE summary such as `2 x 100 MHz 1.00 2.00 mm^2`.
    pub info: String,
    #[serde(skip)]
    pub members: Vec<&'a ResultContext>,
}

fn describe_pes(pes: &[PeData]) -> String {
    let described: Vec<String> = pes
        .iter()
        .map(|pe| {
            let area = (pe.area * 1e8).round() / 100.0;
            format!(
                "{:03} MHz {:.2} {:.2} mm^2",
                pe.frequency / 1_000_000,
                pe.performance,
                area
            )
        })
        .collect();
    count_duplicity(&described)
        .into_iter()
        .map(|(count, pe)| format!("{count} x {pe}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Finalized architectures of one comparison session.
#[derive(Debug, Clone)]
pub struct ArchComparison<'a> {
    pub archs: Vec<ArchResult<'a>>,
    pub reference: Option<ReferenceArch>,
}

/// Group contexts into architectures and compare them.
///
/// # Errors
///
/// Fails with `DATASET_EMPTY` on no contexts, `ARCH_GROUPING` when consecutive
/// grouping does not divide the context count, `ARCH_UNKNOWN_PE` when the
/// requested reference code matches nothing, and with any missing field an
/// energy computation needs.
pub fn compare_architectures<'a>(
    contexts: &'a [ResultContext],
    k: f64,
    grouping: ArchGrouping,
    reference: &ReferenceSelection,
) -> Result<ArchComparison<'a>, AnalysisError> {
    if contexts.is_empty() {
        return Err(AnalysisError::EmptyDataset("contexts"));
    }
    if k.is_nan() || k < 0.0 {
        return Err(AnalysisError::out_of_range("k", k));
    }
    let codes = ArchCodeMap::from_contexts(contexts)?;

    let groups: Vec<Vec<&'a ResultContext>> = match grouping {
        ArchGrouping::Consecutive { per_arch } => {
            if per_arch == 0 || contexts.len() % per_arch != 0 {
                return Err(AnalysisError::InvalidGrouping(format!(
                    "{} contexts do not split into groups of {}",
                    contexts.len(),
                    per_arch
                )));
            }
            contexts
                .chunks(per_arch)
                .map(|chunk| chunk.iter().collect())
                .collect()
        }
        ArchGrouping::Code => {
            let mut keys = Vec::with_capacity(contexts.len());
            for ctx in contexts {
                keys.push(codes.code_for(ctx.pe_data())?);
            }
            group_by_first_seen(contexts, keys)
        }
        ArchGrouping::Fingerprint => {
            let keys = contexts.iter().map(fingerprint).collect();
            group_by_first_seen(contexts, keys)
        }
    };

    let mut accumulators = Vec::with_capacity(groups.len());
    for group in groups {
        let mut acc = ArchAccumulator::new(k);
        for ctx in group {
            acc.add(ctx)?;
        }
        accumulators.push(acc);
    }

    let reference = select_reference(&accumulators, &codes, reference)?;
    match &reference {
        Some(arch) => tracing::info!(
            component = "arch",
            operation = "select_reference",
            status = "success",
            reference = %arch.code,
            "Reference arch is {}",
            arch.code
        ),
        None => tracing::debug!(
            component = "arch",
            operation = "select_reference",
            status = "skipped",
            "No reference architecture"
        ),
    }

    let mut archs = Vec::with_capacity(accumulators.len());
    for acc in accumulators {
        archs.push(acc.finalize(&codes, reference.as_ref())?);
    }

    tracing::info!(
        component = "arch",
        operation = "compare",
        status = "success",
        architectures = archs.len(),
        contexts = contexts.len(),
        "Compared {} architectures",
        archs.len()
    );

    Ok(ArchComparison { archs, reference })
}

fn group_by_first_seen<'a>(
    contexts: &'a [ResultContext],
    keys: Vec<String>,
) -> Vec<Vec<&'a ResultContext>> {
    let mut index: BTreeMap<String, usize> = BTreeMap::new();
    let mut groups: Vec<Vec<&'a ResultContext>> = Vec::new();
    for (ctx, key) in contexts.iter().zip(keys) {
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(ctx);
    }
    groups
}

fn select_reference(
    accumulators: &[ArchAccumulator<'_>],
    codes: &ArchCodeMap,
    selection: &ReferenceSelection,
) -> Result<Option<ReferenceArch>, AnalysisError> {
    let mut coded = Vec::with_capacity(accumulators.len());
    for acc in accumulators {
        let Some(first) = acc.members.first() else {
            continue;
        };
        coded.push((codes.code_for(first.pe_data())?, acc));
    }

    let chosen = match selection {
        ReferenceSelection::None => None,
        ReferenceSelection::Code(code) => Some(
            coded
                .iter()
                .find(|(candidate, _)| candidate == code)
                .ok_or_else(|| AnalysisError::UnknownArchitecture(code.clone()))?,
        ),
        ReferenceSelection::Auto => coded
            .iter()
            .find(|(code, _)| code == "AA")
            .or_else(|| {
                coded
                    .iter()
                    .reduce(|best, next| if next.1.time > best.1.time { next } else { best })
            }),
    };

    Ok(chosen.map(|(code, acc)| ReferenceArch {
        code: code.clone(),
        energy: acc.energy,
        time: acc.time,
        members: acc.members.len(),
    }))
}

impl<'a> ArchComparison<'a> {
    pub fn len(&self) -> usize {
        self.archs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archs.is_empty()
    }

    /// Ascending by best-cost sum, ties by time.
    pub fn sorted_by_cost(&self) -> Vec<&ArchResult<'a>> {
        let mut sorted: Vec<&ArchResult<'a>> = self.archs.iter().collect();
        sorted.sort_by(|a, b| {
            a.best_cost_sum
                .total_cmp(&b.best_cost_sum)
                .then_with(|| a.time.total_cmp(&b.time))
        });
        sorted
    }

    /// Ascending by time, ties by best-cost sum.
    pub fn sorted_by_time(&self) -> Vec<&ArchResult<'a>> {
        let mut sorted: Vec<&ArchResult<'a>> = self.archs.iter().collect();
        sorted.sort_by(|a, b| {
            a.time
                .total_cmp(&b.time)
                .then_with(|| a.best_cost_sum.total_cmp(&b.best_cost_sum))
        });
        sorted
    }

    /// Architectures not dominated in (best-cost sum, time).
    pub fn pareto(&self) -> Vec<&ArchResult<'a>> {
        let points = self
            .archs
            .iter()
            .map(|arch| (arch.best_cost_sum, arch.time, arch))
            .collect();
        pareto_front(points)
            .into_iter()
            .map(|(_, _, arch)| arch)
            .collect()
    }

    /// Evaluation curve over every run of the architectures coded `code`.
    ///
    /// Gains are rescaled as if every run had started from the reference's
    /// mean energy per run.
    pub fn arch_curve(&self, code: &str) -> Result<EvaluationCurve, AnalysisError> {
        let reference = self.reference.as_ref().ok_or_else(|| {
            AnalysisError::InvalidGrouping("no reference architecture selected".to_string())
        })?;
        let base = reference.energy / reference.members as f64;

        let contexts: Vec<&ResultContext> = self
            .archs
            .iter()
            .filter(|arch| arch.code == code)
            .flat_map(|arch| arch.members.iter().copied())
            .collect();
        if contexts.is_empty() {
            return Err(AnalysisError::UnknownArchitecture(code.to_string()));
        }

        evaluation_curve(contexts, CurveMetric::Gain(GainTransform::Rescaled { base }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::arch_context;

    const MHZ: u64 = 1_000_000;

    fn approx_eq(left: f64, right: f64) {
        assert!(
            (left - right).abs() <= 1e-9 * right.abs().max(1.0),
            "left={left}, right={right}"
        );
    }

    fn mixed_contexts() -> Vec<ResultContext> {
        let slow = (100 * MHZ, 1.0, 2e-6, 0.5);
        let fast = (200 * MHZ, 1.0, 4e-6, 0.25);
        vec![
            arch_context("g1", &[fast, slow], 50 * MHZ, 10.0, 2.0),
            arch_context("g1", &[slow, slow], 50 * MHZ, 20.0, 4.0),
            arch_context("g2", &[slow, fast], 50 * MHZ, 30.0, 1.0),
            arch_context("g2", &[slow, slow], 50 * MHZ, 40.0, 6.0),
        ]
    }

    #[test]
    fn test_lowest_pe_gets_a() {
        let contexts = mixed_contexts();
        let codes = ArchCodeMap::from_contexts(&contexts).unwrap();
        assert_eq!(codes.len(), 2);
        assert_eq!(codes.letter(&PeData::new(100 * MHZ, 1.0, 2e-6)), Some('A'));
        assert_eq!(codes.letter(&PeData::new(200 * MHZ, 1.0, 4e-6)), Some('B'));
        assert_eq!(codes.code_for(contexts[0].pe_data()).unwrap(), "AB");
        assert_eq!(codes.code_for(contexts[2].pe_data()).unwrap(), "AB");

        let err = codes
            .code_for(&[PeData::new(1, 1.0, 1.0)])
            .unwrap_err();
        assert_eq!(err.code(), "ARCH_UNKNOWN_PE");
    }

    #[test]
    fn test_fingerprint_ignores_pe_order() {
        let contexts = mixed_contexts();
        assert_eq!(fingerprint(&contexts[0]), fingerprint(&contexts[2]));
        assert_ne!(fingerprint(&contexts[0]), fingerprint(&contexts[1]));
    }

    #[test]
    fn test_energy_of_single_run() {
        let ctx = arch_context("g", &[(100, 1.0, 2.0, 0.5)], 50, 7.0, 2.0);
        let mut acc = ArchAccumulator::new(1.0);
        acc.add(&ctx).unwrap();
        let codes = ArchCodeMap::from_contexts([&ctx]).unwrap();
        let arch = acc.finalize(&codes, None).unwrap();

        // static: (2 + 1) * 2 * 100, dynamic: 2*2*100*0.5 + 1*2*50*0.5
        approx_eq(arch.static_energy, 600.0);
        approx_eq(arch.dynamic_energy, 250.0);
        approx_eq(arch.energy, 850.0);
        approx_eq(arch.ic_energy, 200.0 + 50.0);
        approx_eq(arch.power, 425.0);
        approx_eq(arch.static_proportion, 600.0 / 850.0);
        approx_eq(arch.area, 3.0);
        approx_eq(arch.best_cost_sum, 7.0);
        assert_eq!(arch.code, "A");
        assert_eq!(arch.reference_code, None);
        assert_eq!(arch.gain, 0.0);
        assert_eq!(arch.total_evaluations, 100);
        assert_eq!(arch.method, Some(Method::SimulatedAnnealing));
    }

    #[test]
    fn test_summary_serializes_without_members() {
        let ctx = arch_context("g", &[(100, 1.0, 2.0, 0.5)], 50, 7.0, 2.0);
        let mut acc = ArchAccumulator::new(1.0);
        acc.add(&ctx).unwrap();
        let codes = ArchCodeMap::from_contexts([&ctx]).unwrap();
        let arch = acc.finalize(&codes, None).unwrap();

        let value = serde_json::to_value(&arch).unwrap();
        assert_eq!(value["code"], "A");
        assert_eq!(value["method"], "simulated_annealing");
        assert_eq!(value["reference_code"], serde_json::Value::Null);
        assert!(value.get("members").is_none());
    }

    #[test]
    fn test_zero_k_leaves_only_static_energy() {
        let ctx = arch_context("g", &[(100, 1.0, 2.0, 0.5)], 50, 7.0, 2.0);
        let mut acc = ArchAccumulator::new(0.0);
        acc.add(&ctx).unwrap();
        assert_eq!(acc.energy(), 600.0);
    }

    #[test]
    fn test_negative_or_nan_k_is_rejected() {
        let contexts = mixed_contexts();
        for k in [-1.0, f64::NAN] {
            let err = compare_architectures(&contexts, k, ArchGrouping::Code, &ReferenceSelection::Auto)
                .unwrap_err();
            assert_eq!(err.code(), "FIELD_OUT_OF_RANGE");
        }
    }

    #[test]
    fn test_code_grouping_with_auto_reference() {
        let contexts = mixed_contexts();
        let comparison =
            compare_architectures(&contexts, 1.0, ArchGrouping::Code, &ReferenceSelection::Auto)
                .unwrap();

        assert_eq!(comparison.len(), 2);
        assert_eq!(comparison.archs[0].code, "AB");
        assert_eq!(comparison.archs[1].code, "AA");
        assert_eq!(comparison.archs[0].members.len(), 2);

        let reference = comparison.reference.as_ref().unwrap();
        assert_eq!(reference.code, "AA");
        assert_eq!(reference.members, 2);

        let aa = &comparison.archs[1];
        approx_eq(aa.gain, 1.0);
        approx_eq(aa.speedup, 1.0);
        let ab = &comparison.archs[0];
        approx_eq(ab.speedup, 10.0 / 3.0);
        approx_eq(ab.gain, aa.energy / ab.energy);
        assert_eq!(ab.reference_code.as_deref(), Some("AA"));
    }

    #[test]
    fn test_auto_reference_falls_back_to_slowest() {
        let b = (200 * MHZ, 1.0, 4e-6, 0.5);
        let c = (300 * MHZ, 1.0, 5e-6, 0.5);
        let a = (100 * MHZ, 1.0, 1e-6, 0.5);
        let contexts = vec![
            arch_context("g", &[a, b], MHZ, 1.0, 3.0),
            arch_context("g", &[b, c], MHZ, 1.0, 5.0),
        ];
        let comparison = compare_architectures(
            &contexts,
            1.0,
            ArchGrouping::Fingerprint,
            &ReferenceSelection::Auto,
        )
        .unwrap();
        assert_eq!(comparison.reference.unwrap().code, "BC");
    }

    #[test]
    fn test_consecutive_grouping() {
        let contexts = mixed_contexts();
        let comparison = compare_architectures(
            &contexts,
            1.0,
            ArchGrouping::Consecutive { per_arch: 2 },
            &ReferenceSelection::None,
        )
        .unwrap();
        assert_eq!(comparison.len(), 2);
        approx_eq(comparison.archs[0].time, 6.0);
        approx_eq(comparison.archs[1].time, 7.0);
        assert!(comparison.reference.is_none());

        let err = compare_architectures(
            &contexts,
            1.0,
            ArchGrouping::Consecutive { per_arch: 3 },
            &ReferenceSelection::None,
        )
        .unwrap_err();
        assert_eq!(err.code(), "ARCH_GROUPING");
    }

    #[test]
    fn test_unknown_reference_code() {
        let contexts = mixed_contexts();
        let err = compare_architectures(
            &contexts,
            1.0,
            ArchGrouping::Code,
            &ReferenceSelection::Code("ZZ".to_string()),
        )
        .unwrap_err();
        assert_eq!(err, AnalysisError::UnknownArchitecture("ZZ".to_string()));
    }

    #[test]
    fn test_sorted_views_and_pareto() {
        let contexts = mixed_contexts();
        let comparison = compare_architectures(
            &contexts,
            1.0,
            ArchGrouping::Fingerprint,
            &ReferenceSelection::Auto,
        )
        .unwrap();

        // AB: cost 40, time 3. AA: cost 60, time 10.
        let by_cost: Vec<&str> = comparison
            .sorted_by_cost()
            .iter()
            .map(|arch| arch.code.as_str())
            .collect();
        assert_eq!(by_cost, vec!["AB", "AA"]);
        let by_time: Vec<&str> = comparison
            .sorted_by_time()
            .iter()
            .map(|arch| arch.code.as_str())
            .collect();
        assert_eq!(by_time, vec!["AB", "AA"]);

        let pareto = comparison.pareto();
        assert_eq!(pareto.len(), 1);
        assert_eq!(pareto[0].code, "AB");
    }

    #[test]
    fn test_arch_curve_rescales_to_reference() {
        let contexts = mixed_contexts();
        let comparison =
            compare_architectures(&contexts, 1.0, ArchGrouping::Code, &ReferenceSelection::Auto)
                .unwrap();
        let reference = comparison.reference.clone().unwrap();
        let base = reference.energy / 2.0;

        let curve = comparison.arch_curve("AB").unwrap();
        assert_eq!(curve.evaluations, vec![50]);
        // every fixture run has gain 2 and initial objective 2 * best
        approx_eq(curve.means[0], (2.0 * base / 20.0 + 2.0 * base / 60.0) / 2.0);

        let err = comparison.arch_curve("BB").unwrap_err();
        assert_eq!(err.code(), "ARCH_UNKNOWN_PE");
    }

    #[test]
    fn test_info_groups_equal_pes() {
        let pes = [
            PeData::new(100 * MHZ, 1.0, 2e-6),
            PeData::new(100 * MHZ, 1.0, 2e-6),
            PeData::new(50 * MHZ, 0.5, 1e-6),
        ];
        assert_eq!(
            describe_pes(&pes),
            "1 x 050 MHz 0.50 1.00 mm^2, 2 x 100 MHz 1.00 2.00 mm^2"
        );
    }
}
