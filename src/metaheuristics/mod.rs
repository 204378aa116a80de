mod genetic;
mod grasp;
mod large_neighborhood;
mod local_search;
mod simulated_annealing;
mod vnd;

pub use genetic::{genetic_algorithm, GeneticParams};
pub use grasp::{grasp_metaheuristic, GraspMetaheuristicParams};
pub use large_neighborhood::{large_neighborhood_search, LnsParams};
pub use local_search::local_search;
pub use simulated_annealing::simulated_annealing;
pub use vnd::variable_neighborhood_descent;
