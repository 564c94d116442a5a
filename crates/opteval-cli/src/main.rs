mod logging;
mod render;

use clap::{Args, Parser, Subcommand, ValueEnum};
use opteval_core::{
    ArchGrouping, BlankLinePolicy, CurveMetric, Filter, FilterSet, GainTransform, MatrixField,
    MatrixValue, Method, ParseConfig, ReferenceSelection, ResultContext, ResultReader,
    SampleField, compare_architectures, evaluation_curve, ga_matrix, per_graph_stats,
    read_sample_file, sample_series, sample_summary, total_combined_cost, value_matrix,
};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Energy weight used when `-k` is not given.
const DEFAULT_K: f64 = 1.0;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Statistics and plots from mapping optimization result logs"
)]
struct Cli {
    /// Log level or filter directive (overrides OPTEVAL_TRACE)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mean gain or cost over evaluations
    Curve(CurveArgs),
    /// Final gain statistics per graph
    PerGraph(InputArgs),
    /// Genetic algorithm final gains by population and elitism
    GaMatrix(GaMatrixArgs),
    /// Mean and standard deviation of a result over two fields
    Matrix(MatrixArgs),
    /// Sum of final costs of the selected runs
    TotalCost(InputArgs),
    /// Re-emit the selected records verbatim
    Filter(InputArgs),
    /// Architecture energy comparison
    Power(PowerArgs),
    /// Print one field of a binary sample vector
    Samples(SamplesArgs),
    /// Minima of one field across several binary sample vectors
    SampleSummary(SampleSummaryArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Result log files, read in order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    #[command(flatten)]
    filters: FilterArgs,

    /// Drop runs that cannot be finalized instead of failing
    #[arg(long)]
    allow_incomplete_results: bool,

    /// Keep only the first N selected runs
    #[arg(long)]
    max: Option<usize>,

    /// Whether a blank line is skipped or ends the log
    #[arg(long, value_enum, default_value = "skip")]
    blank_lines: BlankLinesArg,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "octave")]
    format: OutputFormat,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Graph ids separated by ':'
    #[arg(long)]
    graph: Option<String>,

    /// Regex searched in graph ids
    #[arg(long)]
    graph_regex: Option<String>,

    /// Optimization method name
    #[arg(long)]
    method: Option<String>,

    /// Number of PEs
    #[arg(long)]
    pes: Option<u32>,

    /// Number of edges
    #[arg(long)]
    edges: Option<u32>,

    /// Number of tasks
    #[arg(long)]
    tasks: Option<u32>,

    /// SA acceptor name
    #[arg(long)]
    acceptor: Option<String>,

    /// Dynamic energy weight; also selects runs logged with this power_k
    #[arg(short = 'k')]
    k: Option<f64>,

    /// SA schedule length
    #[arg(short = 'L')]
    schedule_length: Option<f64>,

    /// GA elitism
    #[arg(long)]
    elitism: Option<u32>,

    /// GA population size
    #[arg(long)]
    population: Option<u32>,

    /// GA chromosome mutation probability
    #[arg(long)]
    chromosome_mutation: Option<f64>,

    /// GA gene mutation probability
    #[arg(long)]
    gene_mutation: Option<f64>,

    /// Interconnect frequency relation, e.g. ge100000000
    #[arg(long)]
    ic_freq: Option<String>,

    /// Relation every PE frequency must satisfy
    #[arg(long)]
    pe_freq: Option<String>,
}

impl FilterArgs {
    fn to_filter_set(&self) -> Result<FilterSet, opteval_core::AnalysisError> {
        let pairs: [(&str, Option<String>); 15] = [
            ("graph", self.graph.clone()),
            ("graph-regex", self.graph_regex.clone()),
            ("method", self.method.clone()),
            ("pes", self.pes.map(|v| v.to_string())),
            ("edges", self.edges.map(|v| v.to_string())),
            ("tasks", self.tasks.map(|v| v.to_string())),
            ("acceptor", self.acceptor.clone()),
            ("k", self.k.map(|v| v.to_string())),
            ("L", self.schedule_length.map(|v| v.to_string())),
            ("elitism", self.elitism.map(|v| v.to_string())),
            ("population", self.population.map(|v| v.to_string())),
            (
                "chromosome-mutation",
                self.chromosome_mutation.map(|v| v.to_string()),
            ),
            ("gene-mutation", self.gene_mutation.map(|v| v.to_string())),
            ("ic-freq", self.ic_freq.clone()),
            ("pe-freq", self.pe_freq.clone()),
        ];

        let mut filters = FilterSet::new();
        for (key, value) in pairs {
            if let Some(value) = value {
                filters.push(Filter::from_arg(key, &value)?);
            }
        }
        Ok(filters)
    }
}

#[derive(Args, Debug)]
struct CurveArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Average best cost instead of gain
    #[arg(long, conflicts_with_all = ["relative_gain", "sqrt_gain", "square_gain"])]
    cost: bool,

    /// Gain divided by evaluations
    #[arg(long, conflicts_with_all = ["sqrt_gain", "square_gain"])]
    relative_gain: bool,

    /// Gain divided by the square root of evaluations
    #[arg(long, conflicts_with = "square_gain")]
    sqrt_gain: bool,

    /// Gain divided by squared evaluations
    #[arg(long)]
    square_gain: bool,
}

impl CurveArgs {
    fn metric(&self) -> CurveMetric {
        if self.cost {
            CurveMetric::Cost
        } else if self.relative_gain {
            CurveMetric::Gain(GainTransform::PerEvaluation)
        } else if self.sqrt_gain {
            CurveMetric::Gain(GainTransform::PerSqrtEvaluation)
        } else if self.square_gain {
            CurveMetric::Gain(GainTransform::PerSquaredEvaluation)
        } else {
            CurveMetric::Gain(GainTransform::Identity)
        }
    }
}

#[derive(Args, Debug)]
struct GaMatrixArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Gene mutation probability of the runs to lay out
    #[arg(long)]
    ga_gene_mutation: f64,
}

#[derive(Args, Debug)]
struct MatrixArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Field giving the row coordinate, e.g. pes or method
    #[arg(long)]
    rows: MatrixField,

    /// Field giving the column coordinate
    #[arg(long)]
    columns: MatrixField,

    /// Result averaged per cell: gain, cost, time or evaluations
    #[arg(long, default_value = "gain")]
    value: MatrixValue,
}

#[derive(Args, Debug)]
struct PowerArgs {
    #[command(flatten)]
    input: InputArgs,

    /// How runs are grouped into architectures
    #[arg(long, value_enum, default_value = "fingerprint")]
    grouping: GroupingMode,

    /// Runs per architecture for consecutive grouping
    #[arg(long, required_if_eq("grouping", "consecutive"))]
    per_arch: Option<usize>,

    /// Reference architecture: auto, none, or a letter code
    #[arg(long)]
    reference: Option<String>,

    /// What to print
    #[arg(long, value_enum, default_value = "plot")]
    view: PowerView,

    /// Architecture code for --view arch
    #[arg(long, required_if_eq("view", "arch"))]
    arch: Option<String>,
}

impl PowerArgs {
    fn grouping(&self) -> Result<ArchGrouping, Box<dyn std::error::Error>> {
        match self.grouping {
            GroupingMode::Consecutive => {
                let per_arch = self
                    .per_arch
                    .ok_or_else(|| boxed_input_error("--per-arch is required for consecutive grouping"))?;
                Ok(ArchGrouping::Consecutive { per_arch })
            }
            GroupingMode::Code => Ok(ArchGrouping::Code),
            GroupingMode::Fingerprint => Ok(ArchGrouping::Fingerprint),
        }
    }

    /// Consecutive grouping has no reference unless one is named.
    fn reference(&self) -> ReferenceSelection {
        match self.reference.as_deref() {
            Some(value) => parse_reference(value),
            None if self.grouping == GroupingMode::Consecutive => ReferenceSelection::None,
            None => ReferenceSelection::Auto,
        }
    }
}

fn parse_reference(value: &str) -> ReferenceSelection {
    if value.eq_ignore_ascii_case("auto") {
        ReferenceSelection::Auto
    } else if value.eq_ignore_ascii_case("none") {
        ReferenceSelection::None
    } else {
        ReferenceSelection::Code(value.to_string())
    }
}

#[derive(Args, Debug)]
struct SamplesArgs {
    /// Binary sample vector file
    file: PathBuf,

    /// Field to print
    #[arg(long, value_enum, default_value = "objective")]
    field: SampleFieldArg,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "octave")]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct SampleSummaryArgs {
    /// Binary sample vector files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Field whose minima are summarized
    #[arg(long, value_enum, default_value = "objective")]
    field: SampleFieldArg,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "octave")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Octave,
    Json,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum GroupingMode {
    Consecutive,
    Code,
    Fingerprint,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum PowerView {
    Plot,
    Sort,
    Arch,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum SampleFieldArg {
    Memory,
    Objective,
    Time,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum BlankLinesArg {
    Skip,
    Terminate,
}

impl From<BlankLinesArg> for BlankLinePolicy {
    fn from(policy: BlankLinesArg) -> Self {
        match policy {
            BlankLinesArg::Skip => BlankLinePolicy::Skip,
            BlankLinesArg::Terminate => BlankLinePolicy::Terminate,
        }
    }
}

impl From<SampleFieldArg> for SampleField {
    fn from(field: SampleFieldArg) -> Self {
        match field {
            SampleFieldArg::Memory => SampleField::Memory,
            SampleFieldArg::Objective => SampleField::Objective,
            SampleFieldArg::Time => SampleField::Time,
        }
    }
}

#[derive(Debug, Serialize)]
struct SortedArchs<'r, 'a> {
    by_cost: Vec<&'r opteval_core::ArchResult<'a>>,
    by_time: Vec<&'r opteval_core::ArchResult<'a>>,
    pareto: Vec<&'r opteval_core::ArchResult<'a>>,
}

#[derive(Debug, Serialize)]
struct TotalCost {
    contexts: usize,
    total_cost: f64,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref())?;
    match cli.command {
        Command::Curve(args) => curve_command(args),
        Command::PerGraph(args) => per_graph_command(args),
        Command::GaMatrix(args) => ga_matrix_command(args),
        Command::Matrix(args) => matrix_command(args),
        Command::TotalCost(args) => total_cost_command(args),
        Command::Filter(args) => filter_command(args),
        Command::Power(args) => power_command(args),
        Command::Samples(args) => samples_command(args),
        Command::SampleSummary(args) => sample_summary_command(args),
    }
}

fn load_contexts(
    args: &InputArgs,
    extra: Vec<Filter>,
    retain_text: bool,
) -> Result<Vec<ResultContext>, Box<dyn std::error::Error>> {
    let config = ParseConfig::new()
        .with_retain_text(retain_text)
        .with_allow_incomplete(args.allow_incomplete_results)
        .with_blank_lines(args.blank_lines.into());
    let mut reader = ResultReader::new(config);
    for path in &args.files {
        let file =
            File::open(path).map_err(|err| format!("Failed to open {}: {err}", path.display()))?;
        let added = reader.read(BufReader::new(file))?;
        tracing::info!(
            component = "cli",
            operation = "read",
            status = "success",
            path = %path.display(),
            contexts = added,
            "Read {} contexts from {}",
            added,
            path.display()
        );
    }
    if reader.dropped() > 0 {
        tracing::warn!(
            component = "cli",
            operation = "read",
            status = "warning",
            dropped = reader.dropped(),
            "Dropped {} incomplete contexts",
            reader.dropped()
        );
    }

    let mut filters = args.filters.to_filter_set()?;
    for filter in extra {
        filters.push(filter);
    }
    let mut selected = filters.apply(reader.into_contexts());
    if let Some(max) = args.max {
        selected.truncate(max);
    }
    Ok(selected)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn curve_command(args: CurveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let contexts = load_contexts(&args.input, Vec::new(), false)?;
    let curve = evaluation_curve(&contexts, args.metric())?;
    match args.input.format {
        OutputFormat::Octave => print!("{}", render::curve(&curve)),
        OutputFormat::Json => print_json(&curve)?,
    }
    Ok(())
}

fn per_graph_command(args: InputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let contexts = load_contexts(&args, Vec::new(), false)?;
    let stats = per_graph_stats(&contexts)?;
    match args.format {
        OutputFormat::Octave => print!("{}", render::per_graph(&stats)),
        OutputFormat::Json => print_json(&stats)?,
    }
    Ok(())
}

fn ga_matrix_command(args: GaMatrixArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ga_runs = vec![
        Filter::Method(Method::GeneticAlgorithm),
        Filter::from_arg("gene-mutation", &args.ga_gene_mutation.to_string())?,
    ];
    let contexts = load_contexts(&args.input, ga_runs, false)?;
    let matrix = ga_matrix(&contexts)?;
    match args.input.format {
        OutputFormat::Octave => print!("{}", render::ga_matrix(&matrix)),
        OutputFormat::Json => print_json(&matrix)?,
    }
    Ok(())
}

fn matrix_command(args: MatrixArgs) -> Result<(), Box<dyn std::error::Error>> {
    let contexts = load_contexts(&args.input, Vec::new(), false)?;
    let matrix = value_matrix(&contexts, args.rows, args.columns, args.value)?;
    match args.input.format {
        OutputFormat::Octave => print!("{}", render::value_matrix(&matrix)),
        OutputFormat::Json => print_json(&matrix)?,
    }
    Ok(())
}

fn total_cost_command(args: InputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let contexts = load_contexts(&args, Vec::new(), false)?;
    let total_cost = total_combined_cost(&contexts)?;
    match args.format {
        OutputFormat::Octave => println!("{}", render::scalar(total_cost)),
        OutputFormat::Json => print_json(&TotalCost {
            contexts: contexts.len(),
            total_cost,
        })?,
    }
    Ok(())
}

fn filter_command(args: InputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let contexts = load_contexts(&args, Vec::new(), true)?;
    match args.format {
        OutputFormat::Octave => print!("{}", render::context_text(&contexts)),
        OutputFormat::Json => {
            let records: Vec<&[String]> = contexts.iter().map(ResultContext::text).collect();
            print_json(&records)?;
        }
    }
    Ok(())
}

fn power_command(args: PowerArgs) -> Result<(), Box<dyn std::error::Error>> {
    let k = args.input.filters.k.unwrap_or(DEFAULT_K);
    if k < 0.0 {
        return Err(boxed_input_error("k must be non-negative"));
    }
    let grouping = args.grouping()?;
    let reference = args.reference();

    let contexts = load_contexts(&args.input, Vec::new(), false)?;
    let comparison = compare_architectures(&contexts, k, grouping, &reference)?;

    match (args.view, args.input.format) {
        (PowerView::Plot, OutputFormat::Octave) => {
            print!("{}", render::arch_plot(&comparison.archs));
        }
        (PowerView::Plot, OutputFormat::Json) => print_json(&comparison.archs)?,
        (PowerView::Sort, format) => {
            let sorted = SortedArchs {
                by_cost: comparison.sorted_by_cost(),
                by_time: comparison.sorted_by_time(),
                pareto: comparison.pareto(),
            };
            match format {
                OutputFormat::Octave => print!(
                    "{}",
                    render::arch_sorted(&sorted.by_cost, &sorted.by_time, &sorted.pareto)
                ),
                OutputFormat::Json => print_json(&sorted)?,
            }
        }
        (PowerView::Arch, format) => {
            let code = args
                .arch
                .as_deref()
                .ok_or_else(|| boxed_input_error("--arch is required for --view arch"))?;
            let curve = comparison.arch_curve(code)?;
            match format {
                OutputFormat::Octave => print!("{}", render::curve(&curve)),
                OutputFormat::Json => print_json(&curve)?,
            }
        }
    }
    Ok(())
}

fn samples_command(args: SamplesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let records = read_sample_file(&args.file)?;
    let field = SampleField::from(args.field);
    let series = sample_series(&records, field)?;
    match args.format {
        OutputFormat::Octave => print!("{}", render::samples(field.as_str(), &series)),
        OutputFormat::Json => print_json(&series)?,
    }
    Ok(())
}

fn sample_summary_command(args: SampleSummaryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut vectors = Vec::with_capacity(args.files.len());
    for path in &args.files {
        vectors.push(read_sample_file(path)?);
    }
    let field = SampleField::from(args.field);
    let summary = sample_summary(&vectors, field)?;
    match args.format {
        OutputFormat::Octave => print!("{}", render::sample_summary(field.as_str(), &summary)),
        OutputFormat::Json => print_json(&summary)?,
    }
    Ok(())
}

fn boxed_input_error(message: &str) -> Box<dyn std::error::Error> {
    Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        message.to_string(),
    ))
}
