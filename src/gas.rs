//! Gas price quotes for the cross-chain message fee

use alloy::{primitives::Address, providers::Provider};
use eyre::WrapErr;
use futures_util::future::BoxFuture;

use crate::chain::ChainDescriptor;

/// Price of one unit of message gas, in source chain base units. The quote
/// is attached as native value on the source chain without conversion.
pub trait GasPriceOracle: Send + Sync {
    fn gas_price<'a>(
        &'a self,
        source: &'a ChainDescriptor,
        destination: &'a ChainDescriptor,
        token: Address,
    ) -> BoxFuture<'a, eyre::Result<f64>>;
}

#[derive(Debug, Clone, Copy)]
pub struct FixedGasPrice(pub f64);

impl GasPriceOracle for FixedGasPrice {
    fn gas_price<'a>(
        &'a self,
        _source: &'a ChainDescriptor,
        _destination: &'a ChainDescriptor,
        _token: Address,
    ) -> BoxFuture<'a, eyre::Result<f64>> {
        Box::pin(async move { Ok(self.0) })
    }
}

/// Uses the destination node's current `eth_gasPrice`, in destination wei.
///
/// The price is passed on unconverted. It only matches the source units when
/// both chains share a native token, as local networks do.
#[derive(Debug, Clone, Copy, Default)]
pub struct RpcGasPrice;

impl GasPriceOracle for RpcGasPrice {
    fn gas_price<'a>(
        &'a self,
        _source: &'a ChainDescriptor,
        destination: &'a ChainDescriptor,
        _token: Address,
    ) -> BoxFuture<'a, eyre::Result<f64>> {
        Box::pin(async move {
            let provider = destination.connect_read_only()?;
            let price = provider
                .get_gas_price()
                .await
                .wrap_err_with(|| format!("failed to fetch gas price from {}", destination.name))?;

            Ok(price as f64)
        })
    }
}
