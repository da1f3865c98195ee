use std::{fs, path::Path};

use alloy::{
    network::{Ethereum, EthereumWallet},
    primitives::Address,
    providers::{Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::{reqwest::Url, Client, Http},
};
use eyre::{OptionExt, WrapErr};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A network the contracts are deployed to, as described by the chains file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    pub name: String,
    pub rpc: String,
    pub gateway: Address,
    #[serde(alias = "gasService")]
    pub gas_receiver: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution_executable: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treasury: Option<Address>,
    /// Keys we do not use but must write back untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Addresses produced by deploying to one chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    pub distribution_executable: Address,
    pub treasury: Address,
}

impl ChainDescriptor {
    pub fn with_deployment(&self, deployment: Deployment) -> Self {
        Self {
            distribution_executable: Some(deployment.distribution_executable),
            treasury: Some(deployment.treasury),
            ..self.clone()
        }
    }

    pub fn deployment(&self) -> eyre::Result<Deployment> {
        let missing = || format!("chain {} has not been deployed to yet", self.name);
        Ok(Deployment {
            distribution_executable: self
                .distribution_executable
                .ok_or_else(|| eyre::eyre!(missing()))?,
            treasury: self.treasury.ok_or_else(|| eyre::eyre!(missing()))?,
        })
    }

    pub fn rpc_url(&self) -> eyre::Result<Url> {
        self.rpc
            .parse()
            .wrap_err_with(|| format!("invalid rpc url for chain {}: {}", self.name, self.rpc))
    }

    pub fn connect(
        &self,
        signer: &PrivateKeySigner,
    ) -> eyre::Result<impl Provider<Http<Client>, Ethereum> + Clone> {
        let wallet = EthereumWallet::from(signer.clone());
        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(wallet)
            .on_http(self.rpc_url()?);

        Ok(provider)
    }

    pub fn connect_read_only(
        &self,
    ) -> eyre::Result<impl Provider<Http<Client>, Ethereum> + Clone> {
        Ok(ProviderBuilder::new().on_http(self.rpc_url()?))
    }
}

impl Deployment {
    pub fn validate(&self, chain: &ChainDescriptor) -> eyre::Result<()> {
        let Deployment {
            distribution_executable,
            treasury,
        } = *self;

        eyre::ensure!(
            !distribution_executable.is_zero() && !treasury.is_zero(),
            "deployment on {} produced a zero address",
            chain.name
        );
        eyre::ensure!(
            distribution_executable != treasury,
            "deployment on {} produced the same address twice: {}",
            chain.name,
            treasury
        );
        for deployed in [distribution_executable, treasury] {
            eyre::ensure!(
                deployed != chain.gateway && deployed != chain.gas_receiver,
                "deployment on {} collides with a gateway or gas receiver address: {}",
                chain.name,
                deployed
            );
        }

        Ok(())
    }
}

pub fn find_chain<'a>(
    chains: &'a [ChainDescriptor],
    name: &str,
) -> eyre::Result<&'a ChainDescriptor> {
    chains
        .iter()
        .find(|chain| chain.name == name)
        .ok_or_eyre(format!("no chain found with name {name}"))
}

pub fn load_chains(path: &Path) -> eyre::Result<Vec<ChainDescriptor>> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read chains file at {}", path.display()))?;
    serde_json::from_str(&content)
        .wrap_err_with(|| format!("failed to parse chains file at {}", path.display()))
}

pub fn save_chains(path: &Path, chains: &[ChainDescriptor]) -> eyre::Result<()> {
    let content = serde_json::to_string_pretty(chains)?;
    fs::write(path, content)
        .wrap_err_with(|| format!("failed to write chains file at {}", path.display()))
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    const CHAINS: &str = r#"[
        {
            "name": "Avalanche",
            "chainId": 2501,
            "rpc": "http://localhost:8500/1",
            "gateway": "0x0000000000000000000000000000000000000a01",
            "gasReceiver": "0x0000000000000000000000000000000000000a02"
        },
        {
            "name": "Polygon",
            "rpc": "http://localhost:8500/2",
            "gateway": "0x0000000000000000000000000000000000000b01",
            "gasService": "0x0000000000000000000000000000000000000b02",
            "treasury": "0x0000000000000000000000000000000000000b03"
        }
    ]"#;

    fn chains() -> Vec<ChainDescriptor> {
        serde_json::from_str(CHAINS).unwrap()
    }

    fn deployment() -> Deployment {
        Deployment {
            distribution_executable: address!("00000000000000000000000000000000000000d1"),
            treasury: address!("00000000000000000000000000000000000000d2"),
        }
    }

    #[test]
    fn parses_descriptors_with_aliases() {
        let chains = chains();
        assert_eq!(chains.len(), 2);
        assert_eq!(
            chains[1].gas_receiver,
            address!("0000000000000000000000000000000000000b02")
        );
        assert_eq!(chains[0].distribution_executable, None);
        assert_eq!(
            chains[1].treasury,
            Some(address!("0000000000000000000000000000000000000b03"))
        );
        assert_eq!(chains[0].extra.get("chainId"), Some(&Value::from(2501u64)));
    }

    #[test]
    fn unknown_keys_survive_a_rewrite() {
        let chains = chains();
        let written = serde_json::to_value(&chains).unwrap();
        assert_eq!(written[0]["chainId"], 2501);
        assert!(written[0].get("treasury").is_none());
        assert!(written[1].get("gasReceiver").is_some());
        assert!(written[1].get("gasService").is_none());
    }

    #[test]
    fn find_chain_by_name() {
        let chains = chains();
        assert_eq!(find_chain(&chains, "Polygon").unwrap().name, "Polygon");

        let err = find_chain(&chains, "Fantom").unwrap_err();
        assert!(err.to_string().contains("no chain found"));
    }

    #[test]
    fn with_deployment_leaves_the_original_untouched() {
        let chains = chains();
        let deployed = chains[0].with_deployment(deployment());

        assert_eq!(chains[0].treasury, None);
        assert_eq!(deployed.deployment().unwrap(), deployment());
        assert_eq!(deployed.gateway, chains[0].gateway);
    }

    #[test]
    fn deployment_requires_both_addresses() {
        let chains = chains();
        let err = chains[1].deployment().unwrap_err();
        assert!(err.to_string().contains("Polygon has not been deployed"));
    }

    #[test]
    fn validate_deployment() {
        let chain = &chains()[0];
        deployment().validate(chain).unwrap();

        let zero = Deployment {
            treasury: Address::ZERO,
            ..deployment()
        };
        assert!(zero.validate(chain).is_err());

        let same = Deployment {
            treasury: deployment().distribution_executable,
            ..deployment()
        };
        assert!(same.validate(chain).is_err());

        let collides = Deployment {
            treasury: chain.gas_receiver,
            ..deployment()
        };
        assert!(collides.validate(chain).is_err());
    }

    #[test]
    fn chains_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chains.json");

        let chains: Vec<_> = chains()
            .iter()
            .map(|chain| chain.with_deployment(deployment()))
            .collect();
        save_chains(&path, &chains).unwrap();

        assert_eq!(load_chains(&path).unwrap(), chains);
    }

    #[test]
    fn rejects_invalid_rpc_url() {
        let mut chain = chains()[0].clone();
        chain.rpc = "not a url".to_string();
        assert!(chain.rpc_url().is_err());
    }
}
