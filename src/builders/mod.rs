mod beam;
mod greedy;

pub use beam::beam_build_route;
pub use greedy::build_route;
