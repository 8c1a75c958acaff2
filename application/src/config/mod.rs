//! Application-level configuration.
//!
//! - [`ConsensusParams`] - adapter timeouts and suite parallelism

pub mod consensus_params;

pub use consensus_params::ConsensusParams;
