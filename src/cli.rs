//! Definitions of CLI arguments and commands

use std::path::{Path, PathBuf};

use alloy::signers::local::PrivateKeySigner;
use clap::{Args, Parser, Subcommand};

use crate::{
    calls::{ConstructorShape, TriggerMethod},
    commands::{run_deploy, run_test},
    constants::{
        DEFAULT_CHAINS_FILE, DEFAULT_DESTINATION_CHAIN, DEFAULT_DISTRIBUTION_ARTIFACT,
        DEFAULT_SOURCE_CHAIN, DEFAULT_TREASURY_ARTIFACT, POLL_INTERVAL, POLL_TIMEOUT,
    },
};

#[derive(Parser)]
#[command(version, about = "Deploy and exercise the cross-chain distribution contracts")]
pub struct Cli {
    /// JSON file describing the chains
    #[arg(short, long, env = "CHAINS_FILE", default_value = DEFAULT_CHAINS_FILE)]
    pub chains: PathBuf,

    /// Private key of the deployer, also used as the test wallet
    #[arg(short, long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Deploy a treasury and distribution contract to each chain
    Deploy(DeployArgs),
    /// Send a distribution from the source chain and wait for it to land
    Test(TestArgs),
}

impl Command {
    pub async fn run(self, chains_path: &Path, signer: &PrivateKeySigner) -> eyre::Result<()> {
        match self {
            Command::Deploy(args) => run_deploy(args, chains_path, signer).await,
            Command::Test(args) => run_test(args, chains_path, signer).await,
        }
    }
}

#[derive(Args)]
pub struct DeployArgs {
    /// Only deploy to these chains, all of them when omitted
    #[arg(long = "chain")]
    pub chains: Vec<String>,

    /// Argument layout of the distribution contract's constructor
    #[arg(long, value_enum, default_value_t)]
    pub constructor_shape: ConstructorShape,

    /// Compiled Treasury artifact
    #[arg(long, default_value = DEFAULT_TREASURY_ARTIFACT)]
    pub treasury_artifact: PathBuf,

    /// Compiled DistributionExecutable artifact
    #[arg(long, default_value = DEFAULT_DISTRIBUTION_ARTIFACT)]
    pub distribution_artifact: PathBuf,
}

#[derive(Args)]
pub struct TestArgs {
    /// Chain the distribution is sent from
    #[arg(long, default_value = DEFAULT_SOURCE_CHAIN)]
    pub source: String,

    /// Destination used when the positional arguments name none
    #[arg(long, default_value = DEFAULT_DESTINATION_CHAIN)]
    pub default_destination: String,

    /// Contract method that starts the transfer
    #[arg(long, value_enum, default_value_t)]
    pub trigger: TriggerMethod,

    /// Fixed gas price quote
    #[arg(long, default_value_t = 1.0)]
    pub gas_price: f64,

    /// Quote the destination node's gas price instead of a fixed one
    #[arg(long, conflicts_with = "gas_price")]
    pub rpc_gas_price: bool,

    /// Seconds between two destination balance reads
    #[arg(
        long,
        default_value_t = POLL_INTERVAL.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_interval_secs: u64,

    /// Seconds to wait for delivery before giving up
    #[arg(long, default_value_t = POLL_TIMEOUT.as_secs())]
    pub poll_timeout_secs: u64,

    /// `<name> [destination] [amount] [accounts...]`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
