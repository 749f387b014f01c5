pub mod describe;
pub mod missing;
pub mod pareto;
