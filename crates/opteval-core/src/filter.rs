//! Context selection by conjunction of predicates.

use crate::context::ResultContext;
use crate::method::Method;
use crate::AnalysisError;
use regex::Regex;
use std::str::FromStr;

/// Tolerance for floating point filter values.
pub const FLOAT_EPSILON: f64 = 1e-7;

/// Relational operator of a numeric comparison filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
    Ne,
}

impl Comparison {
    pub const ALL: [Comparison; 6] = [
        Comparison::Eq,
        Comparison::Lt,
        Comparison::Le,
        Comparison::Gt,
        Comparison::Ge,
        Comparison::Ne,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Comparison::Eq => "eq",
            Comparison::Lt => "lt",
            Comparison::Le => "le",
            Comparison::Gt => "gt",
            Comparison::Ge => "ge",
            Comparison::Ne => "ne",
        }
    }

    pub fn holds(self, left: u64, right: u64) -> bool {
        match self {
            Comparison::Eq => left == right,
            Comparison::Lt => left < right,
            Comparison::Le => left <= right,
            Comparison::Gt => left > right,
            Comparison::Ge => left >= right,
            Comparison::Ne => left != right,
        }
    }
}

/// A comparison against a fixed value, written `ge2000` or `2000` (equality).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub op: Comparison,
    pub value: u64,
}

impl Relation {
    pub fn holds(&self, left: u64) -> bool {
        self.op.holds(left, self.value)
    }
}

impl FromStr for Relation {
    type Err = AnalysisError;

    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        let (op, digits) = if expr.starts_with(|c: char| c.is_ascii_digit()) {
            (Comparison::Eq, expr)
        } else {
            let op = Comparison::ALL
                .into_iter()
                .find(|op| expr.starts_with(op.as_str()))
                .ok_or_else(|| {
                    AnalysisError::invalid_filter(expr, "expected eq, lt, le, gt, ge or ne")
                })?;
            (op, &expr[2..])
        };
        let value = digits
            .parse()
            .map_err(|_| AnalysisError::invalid_filter(expr, "value is not an integer"))?;
        Ok(Self { op, value })
    }
}

/// One predicate over a finalized context.
#[derive(Debug, Clone)]
pub enum Filter {
    /// Graph id equal to one of the alternatives.
    Graph(Vec<String>),
    /// Regex search on the graph id.
    GraphRegex(Regex),
    Method(Method),
    Pes(u32),
    Edges(u32),
    Tasks(u32),
    Acceptor(String),
    PowerK(f64),
    ScheduleLength(f64),
    Elitism(u32),
    Population(u32),
    ChromosomeMutation(f64),
    GeneMutation(f64),
    IcFrequency(Relation),
    /// Every PE frequency satisfies the relation.
    PeFrequency(Relation),
}

impl Filter {
    /// Build a filter from a command-line key and its argument.
    ///
    /// Keys are the option names without dashes: `graph`, `graph-regex`,
    /// `method`, `pes`, `edges`, `tasks`, `acceptor`, `k`, `L`, `elitism`,
    /// `population`, `chromosome-mutation`, `gene-mutation`, `ic-freq` and
    /// `pe-freq`.
    pub fn from_arg(key: &str, value: &str) -> Result<Self, AnalysisError> {
        let filter = match key {
            "graph" => {
                if value.is_empty() {
                    return Err(AnalysisError::invalid_filter(key, "empty graph name"));
                }
                Filter::Graph(value.split(':').map(str::to_string).collect())
            }
            "graph-regex" => Filter::GraphRegex(
                Regex::new(value).map_err(|err| AnalysisError::invalid_filter(key, err.to_string()))?,
            ),
            "method" => Filter::Method(Method::from_str(value)?),
            "pes" => Filter::Pes(positive(key, value)?),
            "edges" => Filter::Edges(positive(key, value)?),
            "tasks" => Filter::Tasks(positive(key, value)?),
            "acceptor" => Filter::Acceptor(value.to_string()),
            "k" => {
                let k = float(key, value)?;
                if k < 0.0 {
                    return Err(AnalysisError::invalid_filter(key, "must be non-negative"));
                }
                Filter::PowerK(k)
            }
            "L" => {
                let length = float(key, value)?;
                if length <= 0.0 {
                    return Err(AnalysisError::invalid_filter(key, "must be positive"));
                }
                Filter::ScheduleLength(length)
            }
            "elitism" => Filter::Elitism(
                value
                    .parse()
                    .map_err(|_| AnalysisError::invalid_filter(key, "not a non-negative integer"))?,
            ),
            "population" => Filter::Population(positive(key, value)?),
            "chromosome-mutation" => Filter::ChromosomeMutation(probability(key, value)?),
            "gene-mutation" => Filter::GeneMutation(probability(key, value)?),
            "ic-freq" => Filter::IcFrequency(value.parse()?),
            "pe-freq" => Filter::PeFrequency(value.parse()?),
            _ => return Err(AnalysisError::invalid_filter(key, "unknown filter")),
        };
        Ok(filter)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Filter::Graph(_) => "graph",
            Filter::GraphRegex(_) => "graph-regex",
            Filter::Method(_) => "method",
            Filter::Pes(_) => "pes",
            Filter::Edges(_) => "edges",
            Filter::Tasks(_) => "tasks",
            Filter::Acceptor(_) => "acceptor",
            Filter::PowerK(_) => "k",
            Filter::ScheduleLength(_) => "L",
            Filter::Elitism(_) => "elitism",
            Filter::Population(_) => "population",
            Filter::ChromosomeMutation(_) => "chromosome-mutation",
            Filter::GeneMutation(_) => "gene-mutation",
            Filter::IcFrequency(_) => "ic-freq",
            Filter::PeFrequency(_) => "pe-freq",
        }
    }

    pub fn matches(&self, ctx: &ResultContext) -> bool {
        match self {
            Filter::Graph(graphs) => ctx
                .graph()
                .is_some_and(|graph| graphs.iter().any(|g| g == graph)),
            Filter::GraphRegex(re) => ctx.graph().is_some_and(|graph| re.is_match(graph)),
            Filter::Method(method) => ctx.method() == Some(*method),
            Filter::Pes(pes) => ctx.pes() == Some(*pes),
            Filter::Edges(edges) => ctx.edges() == Some(*edges),
            Filter::Tasks(ntasks) => ctx.ntasks() == Some(*ntasks),
            Filter::Acceptor(acceptor) => ctx.acceptor() == Some(acceptor.as_str()),
            Filter::PowerK(k) => close(ctx.power_k(), *k),
            Filter::ScheduleLength(length) => ctx
                .schedule_length()
                .is_some_and(|l| close(l as f64, *length)),
            Filter::Elitism(elitism) => ctx.elitism() == Some(*elitism),
            Filter::Population(population) => ctx.population() == Some(*population),
            Filter::ChromosomeMutation(p) => ctx.chromosome_mutation().is_some_and(|v| close(v, *p)),
            Filter::GeneMutation(p) => ctx.gene_mutation().is_some_and(|v| close(v, *p)),
            Filter::IcFrequency(relation) => ctx.ic_frequency().is_some_and(|f| relation.holds(f)),
            Filter::PeFrequency(relation) => ctx
                .pe_data()
                .iter()
                .all(|pe| relation.holds(pe.frequency)),
        }
    }
}

fn close(left: f64, right: f64) -> bool {
    (left - right).abs() < FLOAT_EPSILON
}

fn positive(key: &str, value: &str) -> Result<u32, AnalysisError> {
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AnalysisError::invalid_filter(key, "not a positive integer")),
    }
}

fn float(key: &str, value: &str) -> Result<f64, AnalysisError> {
    value
        .parse()
        .map_err(|_| AnalysisError::invalid_filter(key, "not a number"))
}

fn probability(key: &str, value: &str) -> Result<f64, AnalysisError> {
    let p = float(key, value)?;
    if !(0.0..=1.0).contains(&p) {
        return Err(AnalysisError::invalid_filter(key, "must be within [0, 1]"));
    }
    Ok(p)
}

/// Conjunction of filters.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    pub fn with(mut self, filter: Filter) -> Self {
        self.push(filter);
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// True iff every filter accepts the context.
    pub fn matches(&self, ctx: &ResultContext) -> bool {
        self.filters.iter().all(|filter| filter.matches(ctx))
    }

    /// Keep the contexts every filter accepts, in input order.
    pub fn apply(&self, contexts: Vec<ResultContext>) -> Vec<ResultContext> {
        let before = contexts.len();
        let mut selected = contexts;
        for filter in &self.filters {
            let count = selected.len();
            selected.retain(|ctx| filter.matches(ctx));
            tracing::debug!(
                component = "filter",
                operation = "apply",
                status = "success",
                filter = filter.name(),
                "{} {} -> {}",
                filter.name(),
                count,
                selected.len()
            );
        }
        tracing::info!(
            component = "filter",
            operation = "apply",
            status = "success",
            before,
            after = selected.len(),
            "{} -> {} contexts",
            before,
            selected.len()
        );
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::context_from;

    fn sample() -> ResultContext {
        context_from(&[
            "MARK: fft_8",
            "optimization_method: genetic_algorithm",
            "ntasks: 30",
            "pes: 2",
            "edges: 45",
            "power_k: 0.5",
            "sa_schedule_max: 40",
            "population_size: 16",
            "elitism: 2",
            "chromosome_mutation_probability: 0.3",
            "gene_mutation_probability: 0.05",
            "pe: id 0 freq 1000 perf 1.0 area 1e-6",
            "pe: id 1 freq 3000 perf 1.0 area 1e-6",
            "interconnect: id 0 freq 500 width 32 latency 8",
            "initial_objective: 2.0",
            "best_ga_cost_so_far: 1.0 2.0 16 100 2.0",
        ])
    }

    #[test]
    fn test_relation_parsing() {
        assert_eq!(
            "ge2000".parse::<Relation>().unwrap(),
            Relation {
                op: Comparison::Ge,
                value: 2000
            }
        );
        assert_eq!("150".parse::<Relation>().unwrap().op, Comparison::Eq);
        assert!("xx100".parse::<Relation>().is_err());
        assert!("lt".parse::<Relation>().is_err());
        assert!("ge2k".parse::<Relation>().is_err());
    }

    #[test]
    fn test_relation_accepts_every_operator_name() {
        for op in Comparison::ALL {
            let relation: Relation = format!("{}42", op.as_str()).parse().unwrap();
            assert_eq!(relation, Relation { op, value: 42 });
        }
        assert!(Comparison::Le.holds(42, 42));
        assert!(!Comparison::Lt.holds(42, 42));
    }

    #[test]
    fn test_pe_frequency_filter_is_universal() {
        let ctx = sample();
        assert!(!Filter::from_arg("pe-freq", "ge2000").unwrap().matches(&ctx));
        assert!(Filter::from_arg("pe-freq", "ge1000").unwrap().matches(&ctx));
        assert!(Filter::from_arg("pe-freq", "ne2000").unwrap().matches(&ctx));
        assert!(!Filter::from_arg("pe-freq", "lt3000").unwrap().matches(&ctx));
    }

    #[test]
    fn test_ic_frequency_filter() {
        let ctx = sample();
        assert!(Filter::from_arg("ic-freq", "500").unwrap().matches(&ctx));
        assert!(Filter::from_arg("ic-freq", "le500").unwrap().matches(&ctx));
        assert!(!Filter::from_arg("ic-freq", "gt500").unwrap().matches(&ctx));
    }

    #[test]
    fn test_scalar_filters() {
        let ctx = sample();
        let accepting = [
            ("graph", "dct:fft_8"),
            ("graph-regex", "^fft"),
            ("method", "genetic_algorithm"),
            ("pes", "2"),
            ("edges", "45"),
            ("tasks", "30"),
            ("k", "0.5"),
            ("L", "40"),
            ("elitism", "2"),
            ("population", "16"),
            ("chromosome-mutation", "0.3"),
            ("gene-mutation", "0.05"),
        ];
        for (key, value) in accepting {
            assert!(Filter::from_arg(key, value).unwrap().matches(&ctx), "{key} {value}");
        }

        let rejecting = [
            ("graph", "fft"),
            ("graph-regex", "^dct"),
            ("method", "random_mapping"),
            ("pes", "4"),
            ("tasks", "31"),
            ("acceptor", "exponential"),
            ("gene-mutation", "0.06"),
        ];
        for (key, value) in rejecting {
            assert!(!Filter::from_arg(key, value).unwrap().matches(&ctx), "{key} {value}");
        }
    }

    #[test]
    fn test_invalid_filter_arguments() {
        for (key, value) in [
            ("pes", "0"),
            ("graph", ""),
            ("graph-regex", "("),
            ("k", "-1"),
            ("L", "0"),
            ("gene-mutation", "1.5"),
            ("colour", "red"),
        ] {
            let err = Filter::from_arg(key, value).unwrap_err();
            assert_eq!(err.code(), "FILTER_INVALID", "{key} {value}");
        }
        assert_eq!(
            Filter::from_arg("method", "annealing").unwrap_err().code(),
            "METHOD_UNKNOWN"
        );
    }

    #[test]
    fn test_filter_set_is_conjunction_and_order_independent() {
        let other = context_from(&[
            "MARK: dct",
            "pes: 2",
            "initial_objective: 2.0",
            "best_random_cost_so_far: 1 1.0",
        ]);
        let contexts = vec![sample(), other];

        let forward = FilterSet::new()
            .with(Filter::from_arg("pes", "2").unwrap())
            .with(Filter::from_arg("graph-regex", "fft").unwrap());
        let backward = FilterSet::new()
            .with(Filter::from_arg("graph-regex", "fft").unwrap())
            .with(Filter::from_arg("pes", "2").unwrap());

        let a = forward.apply(contexts.clone());
        let b = backward.apply(contexts.clone());
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert_eq!(a[0].graph(), b[0].graph());

        assert_eq!(FilterSet::new().apply(contexts).len(), 2);
    }
}
