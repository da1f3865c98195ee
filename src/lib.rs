//! Deploys the cross-chain distribution contracts and runs the transfer
//! scenario against them.

pub mod artifacts;
pub mod bindings;
pub mod calls;
pub mod chain;
pub mod cli;
pub mod commands;
pub mod constants;
pub mod delivery;
pub mod deploy;
pub mod gas;
pub mod scenario;
pub mod transactions;

pub use deploy::deploy;
pub use scenario::test;
