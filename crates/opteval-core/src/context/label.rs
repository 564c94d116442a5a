//! Record labels recognized by the context accumulator.

/// Where a cost-sample label keeps its evaluation count and cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostLayout {
    /// Position of the evaluation count, `None` when the record carries none.
    pub evaluations: Option<usize>,
    /// Position of the cost value.
    pub cost: usize,
}

/// The closed set of labels a context reacts to.
///
/// Anything else in a log is passed over without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Mark,
    BestCostSoFar,
    BestSaCostSoFar,
    BestGaCostSoFar,
    BestGmCostSoFar,
    BestOsmCostSoFar,
    BestRandomCostSoFar,
    SaAcceptor,
    SaScheduleMax,
    Edges,
    Evaluations,
    InitialObjective,
    InitialTime,
    BestObjective,
    BestTime,
    Ntasks,
    OptimizationMethod,
    Pe,
    Pes,
    Interconnect,
    IcUtilisations,
    PeUtilisations,
    PowerK,
    PopulationSize,
    Elitism,
    ChromosomeMutationProbability,
    GeneMutationProbability,
}

impl Label {
    pub fn parse(label: &str) -> Option<Label> {
        let label = match label {
            "MARK" => Label::Mark,
            "best_cost_so_far" => Label::BestCostSoFar,
            "best_sa_cost_so_far" => Label::BestSaCostSoFar,
            "best_ga_cost_so_far" => Label::BestGaCostSoFar,
            "best_gm_cost_so_far" => Label::BestGmCostSoFar,
            "best_osm_cost_so_far" => Label::BestOsmCostSoFar,
            "best_random_cost_so_far" => Label::BestRandomCostSoFar,
            "sa_acceptor" => Label::SaAcceptor,
            "sa_schedule_max" => Label::SaScheduleMax,
            "edges" => Label::Edges,
            "evaluations" => Label::Evaluations,
            "initial_objective" => Label::InitialObjective,
            "initial_time" => Label::InitialTime,
            "best_objective" => Label::BestObjective,
            "best_time" => Label::BestTime,
            "ntasks" => Label::Ntasks,
            "optimization_method" => Label::OptimizationMethod,
            "pe" => Label::Pe,
            "pes" => Label::Pes,
            "interconnect" => Label::Interconnect,
            "ic_utilisation" | "ic_utilisations" => Label::IcUtilisations,
            "pe_utilisations" => Label::PeUtilisations,
            "power_k" => Label::PowerK,
            "population_size" => Label::PopulationSize,
            "elitism" => Label::Elitism,
            "chromosome_mutation_probability" => Label::ChromosomeMutationProbability,
            "gene_mutation_probability" => Label::GeneMutationProbability,
            _ => return None,
        };
        Some(label)
    }

    /// Field positions for cost-sample labels.
    pub fn cost_layout(self) -> Option<CostLayout> {
        let (evaluations, cost) = match self {
            Label::BestCostSoFar => (None, 1),
            Label::BestSaCostSoFar => (Some(1), 2),
            Label::BestGaCostSoFar => (Some(3), 0),
            Label::BestGmCostSoFar => (Some(1), 2),
            Label::BestOsmCostSoFar => (Some(2), 3),
            Label::BestRandomCostSoFar => (Some(0), 1),
            _ => return None,
        };
        Some(CostLayout { evaluations, cost })
    }
}
