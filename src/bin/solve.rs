use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use spdpf::constructors::deterministic_construction;
use spdpf::io::{parse_instance, write_solution};
use spdpf::metaheuristics::{
    genetic_algorithm, grasp_metaheuristic, large_neighborhood_search, local_search, simulated_annealing,
    variable_neighborhood_descent, GeneticParams, GraspMetaheuristicParams, LnsParams,
};
use spdpf::neighborhoods::ALL_KINDS;
use spdpf::types::Fairness;
use std::fs;
use std::io::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Metaheuristic {
    Ls,
    Vnd,
    Sa,
    Grasp,
    Ln,
    Ga,
}

/// Runs a chosen metaheuristic over an SPDPF instance and writes the result.
#[derive(Parser)]
struct Args {
    /// Path to the instance file.
    instance: PathBuf,

    /// Which metaheuristic to run.
    #[arg(long, value_enum, default_value_t = Metaheuristic::Vnd)]
    method: Metaheuristic,

    /// Fairness index (the instance file doesn't encode one).
    #[arg(long, default_value = "jain")]
    fairness: String,

    /// Iteration budget for iterated metaheuristics.
    #[arg(long, default_value_t = 1000)]
    max_iter: usize,

    /// PRNG seed.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Output path; stdout if omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let fairness: Fairness = match args.fairness.parse() {
        Ok(f) => f,
        Err(e) => {
            tracing::error!("invalid --fairness value: {e}");
            return ExitCode::FAILURE;
        }
    };

    let text = match fs::read_to_string(&args.instance) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("failed to read {}: {e}", args.instance.display());
            return ExitCode::FAILURE;
        }
    };

    let instance = match parse_instance(&text, fairness) {
        Ok(i) => i,
        Err(e) => {
            tracing::error!("failed to parse instance: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(args.seed);

    let initial = match deterministic_construction(&instance, &mut rng) {
        Ok(sol) => sol,
        Err(e) => {
            tracing::error!("initial construction failed: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        served = initial.served_count(&instance),
        gamma = instance.gamma,
        "constructed initial solution"
    );

    let (cost, solution) = match args.method {
        Metaheuristic::Ls => local_search(&instance, initial, &ALL_KINDS, args.max_iter, &mut rng),
        Metaheuristic::Vnd => variable_neighborhood_descent(&instance, initial, &ALL_KINDS),
        Metaheuristic::Sa => simulated_annealing(
            &instance,
            initial,
            &ALL_KINDS,
            args.max_iter,
            args.max_iter / 10,
            0.01,
            0.8,
            &mut rng,
        ),
        Metaheuristic::Grasp => {
            let params = GraspMetaheuristicParams::default();
            match grasp_metaheuristic(&instance, &params, &ALL_KINDS, &mut rng) {
                Some(result) => result,
                None => {
                    tracing::error!("GRASP failed to produce any feasible solution");
                    return ExitCode::FAILURE;
                }
            }
        }
        Metaheuristic::Ln => {
            let encoding = spdpf::encoding::Encoding::from_solution(
                &instance,
                &initial,
                spdpf::encoding::DEFAULT_BEAM_WIDTH,
            );
            let params = LnsParams { max_iter: args.max_iter, ..Default::default() };
            let (cost, encoding) = large_neighborhood_search(&instance, encoding, &params);
            (cost, encoding.decode(&instance))
        }
        Metaheuristic::Ga => {
            let params = GeneticParams { generations: args.max_iter.min(500), ..Default::default() };
            match genetic_algorithm(&instance, &params, &mut rng) {
                Some((cost, encoding)) => (cost, encoding.decode(&instance)),
                None => {
                    tracing::error!("genetic algorithm failed to produce any feasible solution");
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    tracing::info!(objective = cost, served = solution.served_count(&instance), "search finished");

    let instance_name = args.instance.file_stem().and_then(|s| s.to_str()).unwrap_or("instance");
    match args.out {
        Some(path) => {
            let mut file = match fs::File::create(&path) {
                Ok(f) => f,
                Err(e) => {
                    tracing::error!("failed to create {}: {e}", path.display());
                    return ExitCode::FAILURE;
                }
            };
            if let Err(e) = write_solution(&mut file, instance_name, &solution) {
                tracing::error!("failed to write solution: {e}");
                return ExitCode::FAILURE;
            }
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            if let Err(e) = write_solution(&mut handle, instance_name, &solution) {
                tracing::error!("failed to write solution: {e}");
                return ExitCode::FAILURE;
            }
            let _ = handle.flush();
        }
    }

    ExitCode::SUCCESS
}
