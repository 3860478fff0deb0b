//! Demo shop: simulated clients sharing one catalog through a worker pool.

pub mod client;
pub mod demo;
pub mod pool;

pub use client::{ClientPlan, plan_clients, run_client};
pub use pool::{JobOutcome, PoolConfig, PoolError, WorkerPool};
