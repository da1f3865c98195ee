//! Implementations of the CLI commands

use std::{path::Path, time::Duration};

use alloy::signers::local::PrivateKeySigner;
use tracing::info;

use crate::{
    artifacts::Artifact,
    chain::{find_chain, load_chains, save_chains},
    cli::{DeployArgs, TestArgs},
    delivery::{Delivery, PollConfig},
    deploy::{deploy, DeployOptions},
    gas::{FixedGasPrice, GasPriceOracle, RpcGasPrice},
    scenario::{test, ScenarioOptions},
};

/// Deploys to the selected chains, writing each result back to the chains
/// file as soon as it is known
pub async fn run_deploy(
    args: DeployArgs,
    chains_path: &Path,
    signer: &PrivateKeySigner,
) -> eyre::Result<()> {
    let mut chains = load_chains(chains_path)?;
    for name in &args.chains {
        find_chain(&chains, name)?;
    }

    let options = DeployOptions {
        constructor_shape: args.constructor_shape,
        treasury: Artifact::load(&args.treasury_artifact)?,
        distribution: Artifact::load(&args.distribution_artifact)?,
    };

    for i in 0..chains.len() {
        if !args.chains.is_empty() && !args.chains.contains(&chains[i].name) {
            continue;
        }

        let deployment = deploy(&chains[i], signer, &options).await?;
        chains[i] = chains[i].with_deployment(deployment);
        save_chains(chains_path, &chains)?;
    }

    Ok(())
}

pub async fn run_test(
    args: TestArgs,
    chains_path: &Path,
    signer: &PrivateKeySigner,
) -> eyre::Result<()> {
    let chains = load_chains(chains_path)?;
    let oracle: Box<dyn GasPriceOracle> = if args.rpc_gas_price {
        Box::new(RpcGasPrice)
    } else {
        Box::new(FixedGasPrice(args.gas_price))
    };

    let options = ScenarioOptions {
        args: args.args,
        gas_price: oracle.as_ref(),
        source: args.source,
        default_destination: args.default_destination,
        trigger: args.trigger,
        poll: PollConfig {
            interval: Duration::from_secs(args.poll_interval_secs),
            timeout: Duration::from_secs(args.poll_timeout_secs),
        },
    };

    let report = test(&chains, signer, &options).await?;
    match report.delivery {
        Delivery::Delivered { .. } => {
            info!(
                "Distribution of {} to {} completed",
                report.amount, report.tracked_account
            );
            Ok(())
        }
        Delivery::TimedOut { elapsed, .. } => {
            eyre::bail!("cross-chain delivery not observed after {elapsed:?}")
        }
    }
}
