//! Deployment of the `Treasury` and `DistributionExecutable` contracts

use alloy::{
    network::Ethereum, primitives::Address, providers::Provider,
    signers::local::PrivateKeySigner, transports::Transport,
};
use tracing::info;

use crate::{
    artifacts::Artifact,
    calls::{ConstructorShape, DistributionConstructor},
    chain::{ChainDescriptor, Deployment},
    transactions::send_deploy,
};

pub struct DeployOptions {
    pub constructor_shape: ConstructorShape,
    pub treasury: Artifact,
    pub distribution: Artifact,
}

/// Deploys a fresh treasury and distribution contract to `chain`.
///
/// Nothing is reused from earlier runs; the caller records the returned
/// addresses with [`ChainDescriptor::with_deployment`].
pub async fn deploy(
    chain: &ChainDescriptor,
    signer: &PrivateKeySigner,
    options: &DeployOptions,
) -> eyre::Result<Deployment> {
    let provider = chain.connect(signer)?;
    deploy_with(&provider, chain, signer.address(), options).await
}

pub async fn deploy_with<T, P>(
    provider: &P,
    chain: &ChainDescriptor,
    signer: Address,
    options: &DeployOptions,
) -> eyre::Result<Deployment>
where
    T: Transport + Clone,
    P: Provider<T, Ethereum>,
{
    // Both deployments are irreversible, refuse a mismatched artifact up front
    options.constructor_shape.check(&options.distribution)?;

    info!("Deploying {} for {}.", options.treasury.name, chain.name);
    let treasury = send_deploy(
        provider,
        options.treasury.bytecode.clone(),
        &format!("{} deployment", options.treasury.name),
    )
    .await?;
    info!(
        "Deployed {} for {} at {treasury}.",
        options.treasury.name, chain.name
    );

    info!("Deploying {} for {}.", options.distribution.name, chain.name);
    let code = DistributionConstructor {
        gateway: chain.gateway,
        gas_receiver: chain.gas_receiver,
        treasury,
        signer,
    }
    .deploy_code(&options.distribution, options.constructor_shape)?;
    let distribution_executable = send_deploy(
        provider,
        code,
        &format!("{} deployment", options.distribution.name),
    )
    .await?;
    info!(
        "Deployed {} for {} at {distribution_executable}.",
        options.distribution.name, chain.name
    );

    let deployment = Deployment {
        distribution_executable,
        treasury,
    };
    deployment.validate(chain)?;

    Ok(deployment)
}

#[cfg(test)]
mod tests {
    use alloy::{
        json_abi::JsonAbi,
        primitives::{address, Bytes},
        providers::ProviderBuilder,
    };

    use super::*;

    fn artifact(name: &str, abi: &str) -> Artifact {
        Artifact {
            name: name.into(),
            abi: serde_json::from_str::<JsonAbi>(abi).unwrap(),
            bytecode: Bytes::from(vec![0x60, 0x80]),
        }
    }

    #[tokio::test]
    async fn mismatched_artifact_fails_before_sending() {
        let chain: ChainDescriptor = serde_json::from_str(
            r#"{
                "name": "Avalanche",
                "rpc": "http://127.0.0.1:1",
                "gateway": "0x0000000000000000000000000000000000000a01",
                "gasReceiver": "0x0000000000000000000000000000000000000a02"
            }"#,
        )
        .unwrap();
        let provider = ProviderBuilder::new().on_http(chain.rpc_url().unwrap());
        let options = DeployOptions {
            constructor_shape: ConstructorShape::DuplicatedSigner,
            treasury: artifact("Treasury", "[]"),
            distribution: artifact("DistributionExecutable", "[]"),
        };

        let err = deploy_with(
            &provider,
            &chain,
            address!("0000000000000000000000000000000000000a04"),
            &options,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("takes 0 arguments"));
    }
}
