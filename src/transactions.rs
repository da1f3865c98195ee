//! Utilities for sending and waiting on transactions

use alloy::{
    contract::{CallBuilder, CallDecoder},
    network::{Ethereum, ReceiptResponse, TransactionBuilder},
    primitives::{Address, Bytes},
    providers::Provider,
    rpc::types::{TransactionReceipt, TransactionRequest},
    transports::Transport,
};
use eyre::{OptionExt, WrapErr};
use tracing::debug;

/// Send a contract call and wait for a successful receipt
pub async fn send_tx<T, P, D>(
    tx: CallBuilder<T, P, D, Ethereum>,
    description: &str,
) -> eyre::Result<TransactionReceipt>
where
    T: Transport + Clone,
    P: Provider<T, Ethereum>,
    D: CallDecoder,
{
    let receipt = tx
        .send()
        .await
        .wrap_err_with(|| format!("failed to send {description}"))?
        .get_receipt()
        .await
        .wrap_err_with(|| format!("failed to confirm {description}"))?;

    ensure_success(&receipt, description)?;
    Ok(receipt)
}

/// Send a contract creation and return the address of the new contract
pub async fn send_deploy<T, P>(
    provider: &P,
    code: Bytes,
    description: &str,
) -> eyre::Result<Address>
where
    T: Transport + Clone,
    P: Provider<T, Ethereum>,
{
    let tx = TransactionRequest::default().with_deploy_code(code);
    let receipt = provider
        .send_transaction(tx)
        .await
        .wrap_err_with(|| format!("failed to send {description}"))?
        .get_receipt()
        .await
        .wrap_err_with(|| format!("failed to confirm {description}"))?;

    ensure_success(&receipt, description)?;
    receipt
        .contract_address
        .ok_or_eyre(format!("{description} receipt has no contract address"))
}

fn ensure_success(receipt: &TransactionReceipt, description: &str) -> eyre::Result<()> {
    debug!(
        tx = %receipt.transaction_hash,
        gas_used = ?receipt.gas_used,
        "{description} mined"
    );
    eyre::ensure!(
        receipt.status(),
        "{description} reverted in tx {}",
        receipt.transaction_hash
    );

    Ok(())
}
