//! # SPVAR
//!
//! Sample persistence variable reduction for Ising problems. A stochastic sampler is run on the
//! model, the best samples are kept, and every variable that agrees across them is fixed and folded
//! out of the model, leaving a smaller problem for the remaining sampling budget.
//!
//! The sampler itself is abstract, anything implementing [`sample::SampleOracle`] works. The crate
//! ships a multi start local search sampler for testing and benchmarking.

pub mod elite;
pub mod evaluation;
pub mod evaluation_logger;
pub mod fixing;
pub mod initial_points;
pub mod ising;
pub mod local_search;
pub mod reconstruct;
pub mod reduction;
pub mod sample;
pub mod spvar;
pub mod spvar_error;
pub mod spvar_options;
pub mod statistics;
pub mod sweep;

#[cfg(feature = "python")]
mod python_interopt;
