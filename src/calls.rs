use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, Bytes, U256},
};
use clap::ValueEnum;

use crate::{
    artifacts::Artifact,
    constants::{DISTRIBUTION_PARAMETER, DISTRIBUTION_PARTNER, GAS_LIMIT},
};

/// Argument layout of the `DistributionExecutable` constructor.
///
/// Builds of the contract differ in whether the treasury or the signer is
/// passed twice; the artifact ABI decides which one fits.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConstructorShape {
    /// `(gateway, gasReceiver, treasury, signer, partner, parameter)`
    Compact,
    /// `(gateway, gasReceiver, treasury, signer, signer, partner, parameter)`
    #[default]
    DuplicatedSigner,
    /// `(gateway, gasReceiver, treasury, treasury, signer, partner, parameter)`
    DuplicatedTreasury,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerMethod {
    #[default]
    SendToMany,
    Claim,
}

impl ConstructorShape {
    pub fn arity(self) -> usize {
        match self {
            ConstructorShape::Compact => 6,
            ConstructorShape::DuplicatedSigner | ConstructorShape::DuplicatedTreasury => 7,
        }
    }

    pub fn check(self, artifact: &Artifact) -> eyre::Result<()> {
        eyre::ensure!(
            self.arity() == artifact.constructor_arity(),
            "{} constructor takes {} arguments but the {:?} layout provides {}",
            artifact.name,
            artifact.constructor_arity(),
            self,
            self.arity()
        );

        Ok(())
    }
}

pub struct DistributionConstructor {
    pub gateway: Address,
    pub gas_receiver: Address,
    pub treasury: Address,
    pub signer: Address,
}

impl DistributionConstructor {
    pub fn args(&self, shape: ConstructorShape) -> Vec<DynSolValue> {
        let Self {
            gateway,
            gas_receiver,
            treasury,
            signer,
        } = *self;

        let mut addresses = vec![gateway, gas_receiver, treasury];
        match shape {
            ConstructorShape::Compact => addresses.push(signer),
            ConstructorShape::DuplicatedSigner => addresses.extend([signer, signer]),
            ConstructorShape::DuplicatedTreasury => addresses.extend([treasury, signer]),
        }
        addresses.push(DISTRIBUTION_PARTNER);

        addresses
            .into_iter()
            .map(DynSolValue::Address)
            .chain([DynSolValue::Uint(U256::from(DISTRIBUTION_PARAMETER), 256)])
            .collect()
    }

    pub fn deploy_code(
        &self,
        artifact: &Artifact,
        shape: ConstructorShape,
    ) -> eyre::Result<Bytes> {
        shape.check(artifact)?;

        let encoded = DynSolValue::Tuple(self.args(shape)).abi_encode_params();
        Ok([artifact.bytecode.as_ref(), encoded.as_slice()].concat().into())
    }
}

pub fn gas_value(gas_price: f64) -> eyre::Result<U256> {
    eyre::ensure!(
        gas_price.is_finite() && gas_price >= 0.0,
        "invalid gas price quote: {gas_price}"
    );

    let value = (GAS_LIMIT as f64 * gas_price).floor();
    eyre::ensure!(
        value < u128::MAX as f64,
        "gas value out of range: {value}"
    );

    Ok(U256::from(value as u128))
}
