//! Fixed values used by the deploy and scenario flows

use std::time::Duration;

use alloy::primitives::{address, Address};

/// Partner address and numeric parameter passed to every
/// `DistributionExecutable` constructor
pub const DISTRIBUTION_PARTNER: Address = address!("2c852e740B62308c46DD29B982FBb650D063Bd07");
pub const DISTRIBUTION_PARAMETER: u64 = 10;

pub const TOKEN_SYMBOL: &str = "aUSDC";
/// 6 decimals
pub const TOKEN_UNIT: u64 = 1_000_000;
pub const DEFAULT_AMOUNT: u64 = 10 * TOKEN_UNIT;

/// Sent to the source contract before every run, independent of the amount
pub const PREFUND_AMOUNT: u64 = 10_000_000;

/// Gas limit the cross-chain message fee is priced at
pub const GAS_LIMIT: u64 = 3_000_000;

pub const DEFAULT_SOURCE_CHAIN: &str = "Avalanche";
pub const DEFAULT_DESTINATION_CHAIN: &str = "Polygon";

pub const POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const POLL_TIMEOUT: Duration = Duration::from_secs(600);

pub const DEFAULT_CHAINS_FILE: &str = "chains.json";
pub const DEFAULT_TREASURY_ARTIFACT: &str = "artifacts/Treasury.json";
pub const DEFAULT_DISTRIBUTION_ARTIFACT: &str = "artifacts/DistributionExecutable.json";
