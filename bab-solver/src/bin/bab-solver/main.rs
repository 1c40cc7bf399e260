mod os_signal_termination;
mod result;

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use bab_solver::baseball::Division;
use bab_solver::baseball::EliminationMethod;
use bab_solver::branching::BranchingRule;
use bab_solver::branching::DynamicBranchingStrategy;
use bab_solver::convert_case::Case;
use bab_solver::flow::max_flow;
use bab_solver::oracle::GoodLpOracle;
use bab_solver::oracle::LpBackend;
use bab_solver::parsers::parse_flow_network;
use bab_solver::parsers::parse_lp_format;
use bab_solver::parsers::parse_vrp_rep;
use bab_solver::parsers::VrpFormat;
use bab_solver::results::SearchStatus;
use bab_solver::routing::local_search;
use bab_solver::routing::solve_cvrp;
use bab_solver::routing::CvrpObjective;
use bab_solver::routing::CvrpOutcome;
use bab_solver::search::NodeOrdering;
use bab_solver::search::SearchOptions;
use bab_solver::statistics::configure_statistic_logging;
use bab_solver::termination::Combinator;
use bab_solver::termination::NodeBudget;
use bab_solver::termination::TerminationCondition;
use bab_solver::termination::TimeBudget;
use bab_solver::BranchAndBound;
use clap::Parser;
use clap::Subcommand;
use log::error;
use log::info;
use log::warn;
use log::Level;
use log::LevelFilter;
use os_signal_termination::OsSignal;
use result::BabSolverError;
use result::BabSolverResult;

#[derive(Debug, Parser)]
#[command(
    help_template = "\
{before-help}{name} {version}
About: {about}

{usage-heading}\n{tab}{usage}

{all-args}{after-help}
",
    version,
    about,
    arg_required_else_help = true
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// The order in which nodes are taken from the queue.
    ///
    /// - "descending-bound" explores the node with the best bound first (best-first search)
    /// - "ascending-bound" explores the node with the worst bound first
    #[arg(long, value_enum, default_value_t, global = true, verbatim_doc_comment)]
    node_ordering: NodeOrdering,

    /// Decides on which fractional variable a node is split.
    #[arg(long, value_enum, default_value_t, global = true)]
    branching: BranchingRule,

    /// The solver of the linear relaxations.
    #[arg(long, value_enum, default_value_t, global = true)]
    lp_backend: LpBackend,

    /// The time budget for the search, given in milliseconds.
    ///
    /// Possible values: u64 (Optional)
    #[arg(short = 't', long = "time-limit", global = true, verbatim_doc_comment)]
    time_limit: Option<u64>,

    /// The maximum number of nodes which are explored.
    ///
    /// Possible values: u64 (Optional)
    #[arg(long = "node-limit", global = true, verbatim_doc_comment)]
    node_limit: Option<u64>,

    /// Enables log message output from the solver.
    ///
    /// Possible values: bool
    #[arg(short = 'v', long = "verbose", global = true, verbatim_doc_comment)]
    verbose: bool,

    /// Enables logging of the statistics of the search.
    ///
    /// Possible values: bool
    #[arg(short = 's', long = "log-statistics", global = true, verbatim_doc_comment)]
    log_statistics: bool,

    /// If `--verbose` is enabled then this option removes the timestamp information from the log
    /// messages.
    ///
    /// Possible values: bool
    #[arg(long = "omit-timestamp", global = true, verbatim_doc_comment)]
    omit_timestamp: bool,

    /// If `--verbose` is enabled then this option removes the call site information from the log
    /// messages. The call site is the file and line from which the message originated.
    ///
    /// Possible values: bool
    #[arg(long = "omit-call-site", global = true, verbatim_doc_comment)]
    omit_call_site: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve an integer program given in the text format.
    ///
    /// The file has exactly one objective line ("max: ..." or "min: ..."), one constraint per
    /// line ("c1: x + 2 y <= 4", the label is optional) and declarations of integer ("int x, y"),
    /// binary ("bin z") and free ("free w") variables. Everything after a '#' is a comment.
    #[command(verbatim_doc_comment)]
    Ip {
        /// The program to solve.
        instance_path: PathBuf,
    },

    /// Decide for every team of a division whether it can still finish first.
    ///
    /// The first line of the file holds the number of teams; every further line describes a team
    /// as "name wins losses remaining" followed by the games left against every team.
    #[command(verbatim_doc_comment)]
    Baseball {
        /// The division to read.
        instance_path: PathBuf,

        /// How the maximum flow of the elimination network is computed.
        #[arg(long, value_enum, default_value_t)]
        method: EliminationMethod,
    },

    /// Compute the maximum flow from the first to the last node of a network.
    ///
    /// The network is given as a line "n m" followed by m lines "u v capacity", with nodes
    /// numbered from 1 to n.
    #[command(verbatim_doc_comment)]
    MaxFlow {
        /// The network to read; standard input when absent.
        instance_path: Option<PathBuf>,
    },

    /// Solve a capacitated vehicle routing instance in the VRP-REP format.
    ///
    /// Routes are printed with the node ids of the file, the depot being node 1.
    #[command(verbatim_doc_comment)]
    Cvrp {
        /// The instance to solve.
        instance_path: PathBuf,

        /// Whether the network gives coordinates ("a") or links ("c").
        #[arg(long, value_enum, default_value_t)]
        format: VrpFormat,

        /// What the routing program optimises.
        #[arg(long, value_enum, default_value_t)]
        objective: CvrpObjective,

        /// Improve the routes of the integer program by moving single customers.
        #[arg(long)]
        local_search: bool,

        /// The maximum number of passes of the local search.
        #[arg(long, default_value_t = 10)]
        max_iterations: usize,
    },
}

fn configure_logging(
    verbose: bool,
    log_statistics: bool,
    omit_timestamp: bool,
    omit_call_site: bool,
) -> std::io::Result<()> {
    if log_statistics {
        configure_statistic_logging("% stat:", Some("% stat-end"), Some(Case::Snake), None);
    }
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(move |buf, record| {
            write!(buf, "% ")?;
            if record.level() != Level::Info && !omit_timestamp {
                write!(buf, "{} ", buf.timestamp())?;
            }
            write!(buf, "{} ", record.level())?;
            if record.level() != Level::Info && !omit_call_site {
                write!(
                    buf,
                    "[{}:{}] ",
                    record.file().unwrap_or("unknown"),
                    record.line().unwrap_or(0)
                )?;
            }
            writeln!(buf, "{}", record.args())
        })
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();
    info!("Logging successfully configured");
    Ok(())
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            error!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> BabSolverResult<()> {
    let args = Args::parse();

    configure_logging(
        args.verbose,
        args.log_statistics,
        args.omit_timestamp,
        args.omit_call_site,
    )?;

    let mut search = BranchAndBound::with_options(
        GoodLpOracle::new(args.lp_backend),
        args.branching.create_strategy(),
        SearchOptions {
            node_ordering: args.node_ordering,
            ..Default::default()
        },
    );
    let mut termination = Combinator::new(
        Combinator::new(
            args.time_limit
                .map(|limit| TimeBudget::starting_now(Duration::from_millis(limit))),
            args.node_limit.map(NodeBudget::new),
        ),
        OsSignal::install(),
    );

    match args.command {
        Command::Ip { instance_path } => {
            solve_program(&instance_path, &mut search, &mut termination)
        }
        Command::Baseball {
            instance_path,
            method,
        } => decide_elimination(&instance_path, method, &mut search, &mut termination),
        Command::MaxFlow { instance_path } => compute_max_flow(instance_path.as_deref()),
        Command::Cvrp {
            instance_path,
            format,
            objective,
            local_search,
            max_iterations,
        } => solve_routing(
            &instance_path,
            format,
            objective,
            local_search.then_some(max_iterations),
            &mut search,
            &mut termination,
        ),
    }
}

type Search = BranchAndBound<GoodLpOracle, DynamicBranchingStrategy>;

fn open_instance(path: &Path) -> BabSolverResult<File> {
    File::open(path).map_err(|e| {
        warn!("Could not open {}: {e}", path.display());
        BabSolverError::invalid_instance(path.display())
    })
}

fn solve_program(
    instance_path: &Path,
    search: &mut Search,
    termination: &mut impl TerminationCondition,
) -> BabSolverResult<()> {
    let program = parse_lp_format(open_instance(instance_path)?)?;

    let outcome = search.solve(&program, termination, ())?;
    search.log_statistics();

    match (outcome.status(), outcome.has_solution()) {
        (SearchStatus::NoFeasibleSolution, _) => println!("===== UNSATISFIABLE ====="),
        (_, false) => println!("===== UNKNOWN ====="),
        (status, true) => {
            println!("objective: {}", outcome.objective_value());
            for (variable, definition) in program.variables().iter_with_keys() {
                let value = outcome.assignment()[variable];
                if definition.is_integer() {
                    println!("{} = {}", definition.name(), value.round() as i64);
                } else {
                    println!("{} = {value}", definition.name());
                }
            }
            if status == SearchStatus::Optimal {
                println!("==========");
            }
        }
    }

    Ok(())
}

fn decide_elimination(
    instance_path: &Path,
    method: EliminationMethod,
    search: &mut Search,
    termination: &mut impl TerminationCondition,
) -> BabSolverResult<()> {
    let division = Division::parse(open_instance(instance_path)?)?;

    for (index, team) in division.teams().iter().enumerate() {
        let is_eliminated = match method {
            EliminationMethod::NetworkFlow => division.is_eliminated_by_network_flow(index)?,
            EliminationMethod::LinearProgramming => {
                division.is_eliminated_by_linear_programming(index, search, termination)?
            }
        };

        if !is_eliminated {
            println!("{}: not eliminated", team.name());
            continue;
        }

        match division.certificate_of_elimination(index)? {
            Some(certificate) => {
                let names = certificate
                    .iter()
                    .map(|&other| division.teams()[other].name())
                    .collect::<Vec<_>>();
                println!("{}: eliminated by {{{}}}", team.name(), names.join(", "));
            }
            None => println!("{}: eliminated", team.name()),
        }
    }

    Ok(())
}

fn compute_max_flow(instance_path: Option<&Path>) -> BabSolverResult<()> {
    let source: Box<dyn Read> = match instance_path {
        Some(path) => Box::new(open_instance(path)?),
        None => Box::new(std::io::stdin()),
    };

    let mut network = parse_flow_network(source)?;
    println!(
        "{}",
        max_flow(&mut network.graph, network.source, network.sink)
    );

    Ok(())
}

fn solve_routing(
    instance_path: &Path,
    format: VrpFormat,
    objective: CvrpObjective,
    local_search_iterations: Option<usize>,
    search: &mut Search,
    termination: &mut impl TerminationCondition,
) -> BabSolverResult<()> {
    let instance = parse_vrp_rep(open_instance(instance_path)?, format)?;

    let outcome = solve_cvrp(&instance, objective, search, termination)?;
    search.log_statistics();
    let solution = match outcome {
        CvrpOutcome::Optimal(solution) | CvrpOutcome::Feasible(solution) => solution,
        CvrpOutcome::Infeasible => {
            println!("===== UNSATISFIABLE =====");
            return Ok(());
        }
        CvrpOutcome::Unknown => {
            println!("===== UNKNOWN =====");
            return Ok(());
        }
    };

    let (travel_cost, routes) = match local_search_iterations {
        Some(max_iterations) => {
            let improved = local_search(&instance, &solution.routes, max_iterations);
            info!(
                "Local search changed the travel cost from {} to {}",
                solution.travel_cost, improved.travel_cost
            );
            (improved.travel_cost, improved.routes)
        }
        None => (solution.travel_cost, solution.routes),
    };

    println!("travel cost: {travel_cost}");
    for (index, route) in routes.iter().enumerate() {
        let stops = route
            .iter()
            .map(|&customer| (customer + 1).to_string())
            .collect::<Vec<_>>();
        println!("route {}: 1 -> {} -> 1", index + 1, stops.join(" -> "));
    }

    Ok(())
}
