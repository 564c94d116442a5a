//! Optimization methods known to the result logs.

use crate::AnalysisError;
use serde::Serialize;
use std::str::FromStr;

/// An optimization method named by an `optimization_method` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    SimulatedAnnealing,
    SimulatedAnnealingAutotemp,
    FastHybridGmSa,
    FastHybridGmSaAutotemp,
    SlowHybridGmSa,
    SlowHybridGmSaAutotemp,
    IteratedSimulatedAnnealing,
    IteratedSimulatedAnnealingAutotemp,
    GroupMigration,
    RandomMapping,
    OptimalSubsetMapping,
    SimulatedAnnealingAutotemp3,
    GeneticAlgorithm,
}

impl Method {
    pub const ALL: [Method; 13] = [
        Method::SimulatedAnnealing,
        Method::SimulatedAnnealingAutotemp,
        Method::FastHybridGmSa,
        Method::FastHybridGmSaAutotemp,
        Method::SlowHybridGmSa,
        Method::SlowHybridGmSaAutotemp,
        Method::IteratedSimulatedAnnealing,
        Method::IteratedSimulatedAnnealingAutotemp,
        Method::GroupMigration,
        Method::RandomMapping,
        Method::OptimalSubsetMapping,
        Method::SimulatedAnnealingAutotemp3,
        Method::GeneticAlgorithm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Method::SimulatedAnnealing => "simulated_annealing",
            Method::SimulatedAnnealingAutotemp => "simulated_annealing_autotemp",
            Method::FastHybridGmSa => "fast_hybrid_gm_sa",
            Method::FastHybridGmSaAutotemp => "fast_hybrid_gm_sa_autotemp",
            Method::SlowHybridGmSa => "slow_hybrid_gm_sa",
            Method::SlowHybridGmSaAutotemp => "slow_hybrid_gm_sa_autotemp",
            Method::IteratedSimulatedAnnealing => "iterated_simulated_annealing",
            Method::IteratedSimulatedAnnealingAutotemp => "iterated_simulated_annealing_autotemp",
            Method::GroupMigration => "group_migration",
            Method::RandomMapping => "random_mapping",
            Method::OptimalSubsetMapping => "optimal_subset_mapping",
            Method::SimulatedAnnealingAutotemp3 => "simulated_annealing_autotemp3",
            Method::GeneticAlgorithm => "genetic_algorithm",
        }
    }

    /// Whether the method belongs to the simulated annealing family.
    ///
    /// SA-family logs sample the best cost at a fixed rate, so their
    /// evaluation counts are synthesized from the run's total evaluations.
    pub fn is_simulated_annealing(self) -> bool {
        !matches!(
            self,
            Method::GroupMigration
                | Method::RandomMapping
                | Method::OptimalSubsetMapping
                | Method::GeneticAlgorithm
        )
    }

    /// Stable 1-based index used when methods become matrix coordinates.
    pub fn index(self) -> u32 {
        match self {
            Method::SimulatedAnnealing => 1,
            Method::SimulatedAnnealingAutotemp => 2,
            Method::FastHybridGmSa => 3,
            Method::FastHybridGmSaAutotemp => 4,
            Method::SlowHybridGmSa => 5,
            Method::SlowHybridGmSaAutotemp => 6,
            Method::IteratedSimulatedAnnealing => 7,
            Method::IteratedSimulatedAnnealingAutotemp => 8,
            Method::GroupMigration => 9,
            Method::RandomMapping => 10,
            Method::OptimalSubsetMapping => 11,
            Method::SimulatedAnnealingAutotemp3 => 12,
            Method::GeneticAlgorithm => 13,
        }
    }
}

impl FromStr for Method {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| AnalysisError::UnknownMethod(s.to_string()))
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
