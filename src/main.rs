use std::str::FromStr;

use alloy::signers::local::PrivateKeySigner;
use clap::Parser;
use eyre::WrapErr;
use tracing_subscriber::EnvFilter;
use xchain_distribution::cli::Cli;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let Cli {
        chains,
        private_key,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let signer = PrivateKeySigner::from_str(&private_key).wrap_err("invalid private key")?;

    command.run(&chains, &signer).await
}
