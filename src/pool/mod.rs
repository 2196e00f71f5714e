//! Candidate pool subsystem
//!
//! Loading, accounting and random selection without replacement.

mod candidate;
pub mod parser;
mod pool;
mod sampler;

pub use candidate::{Candidate, CandidateId};
pub use pool::{CandidatePool, PoolStatus};
pub use sampler::{RngSampler, Sampler};
