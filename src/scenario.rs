//! The cross-chain distribution scenario.
//!
//! Tokens are sent through the source chain's distribution contract and the
//! run waits until a tracked account's balance moves on the destination.

use std::str::FromStr;

use alloy::{
    network::Ethereum,
    primitives::{Address, U256},
    providers::Provider,
    signers::local::PrivateKeySigner,
    transports::Transport,
};
use eyre::WrapErr;
use tracing::{info, warn};

use crate::{
    bindings::{
        DistributionExecutable::{self, DistributionExecutableInstance},
        IAxelarGateway::{self, IAxelarGatewayInstance},
        IERC20::{self, IERC20Instance},
    },
    calls::{gas_value, TriggerMethod},
    chain::{find_chain, ChainDescriptor, Deployment},
    constants::{DEFAULT_AMOUNT, PREFUND_AMOUNT, TOKEN_SYMBOL, TOKEN_UNIT},
    delivery::{wait_for_change, Delivery, PollConfig},
    gas::GasPriceOracle,
    transactions::send_tx,
};

pub struct ScenarioOptions<'a> {
    // `[_, destination?, amount?, ...accounts]`
    pub args: Vec<String>,
    pub gas_price: &'a dyn GasPriceOracle,
    pub source: String,
    pub default_destination: String,
    pub trigger: TriggerMethod,
    pub poll: PollConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioArgs {
    pub destination: Option<String>,
    /// In token base units
    pub amount: U256,
    pub accounts: Vec<Address>,
}

impl ScenarioArgs {
    pub fn parse(args: &[String]) -> eyre::Result<Self> {
        let destination = args.get(1).filter(|name| !name.is_empty()).cloned();
        let amount = parse_amount(args.get(2).map(String::as_str))?;
        let accounts = args
            .iter()
            .skip(3)
            .map(|account| {
                Address::from_str(account)
                    .wrap_err_with(|| format!("invalid account address: {account}"))
            })
            .collect::<eyre::Result<_>>()?;

        Ok(Self {
            destination,
            amount,
            accounts,
        })
    }
}

/// Whole tokens to base units, truncating any fraction.
///
/// Only the leading number counts, so `5abc` is 5. Missing, unparsable,
/// non-finite and zero inputs fall back to [`DEFAULT_AMOUNT`].
pub fn parse_amount(arg: Option<&str>) -> eyre::Result<U256> {
    let whole = match arg.and_then(leading_number) {
        Some(value) if value.is_finite() => value.floor(),
        _ => return Ok(U256::from(DEFAULT_AMOUNT)),
    };

    if whole == 0.0 {
        return Ok(U256::from(DEFAULT_AMOUNT));
    }
    eyre::ensure!(whole > 0.0, "amount must be positive, got {whole}");
    eyre::ensure!(whole < u128::MAX as f64, "amount too large: {whole}");

    Ok(U256::from(whole as u128) * U256::from(TOKEN_UNIT))
}

/// The longest decimal number at the start of `arg`, after leading whitespace
fn leading_number(arg: &str) -> Option<f64> {
    let arg = arg.trim_start();
    let bytes = arg.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }

    arg[..end].parse().ok()
}

/// Everything the scenario decides before touching the network
#[derive(Debug, Clone)]
pub struct ScenarioPlan<'a> {
    pub source: &'a ChainDescriptor,
    pub destination: &'a ChainDescriptor,
    pub source_deployment: Deployment,
    pub destination_deployment: Deployment,
    pub amount: U256,
    pub prefund: U256,
    pub tracked_account: Address,
}

impl<'a> ScenarioPlan<'a> {
    pub fn new(
        chains: &'a [ChainDescriptor],
        options: &ScenarioOptions<'_>,
    ) -> eyre::Result<Self> {
        let args = ScenarioArgs::parse(&options.args)?;
        let destination_name = args
            .destination
            .as_deref()
            .unwrap_or(&options.default_destination);

        let source = find_chain(chains, &options.source)?;
        let destination = find_chain(chains, destination_name)?;
        let source_deployment = source.deployment()?;
        let destination_deployment = destination.deployment()?;

        let tracked_account = args
            .accounts
            .first()
            .copied()
            .unwrap_or(source_deployment.treasury);

        Ok(Self {
            source,
            destination,
            source_deployment,
            destination_deployment,
            amount: args.amount,
            prefund: U256::from(PREFUND_AMOUNT),
            tracked_account,
        })
    }
}

struct ChainHandles<'a, T, P> {
    chain: &'a ChainDescriptor,
    deployment: Deployment,
    distribution: DistributionExecutableInstance<T, P>,
    usdc: IERC20Instance<T, P>,
}

impl<'a, T, P> ChainHandles<'a, T, P>
where
    T: Transport + Clone,
    P: Provider<T, Ethereum> + Clone,
{
    async fn connect(
        chain: &'a ChainDescriptor,
        deployment: Deployment,
        provider: P,
    ) -> eyre::Result<Self> {
        let distribution =
            DistributionExecutable::new(deployment.distribution_executable, provider.clone());
        let gateway: IAxelarGatewayInstance<T, P> =
            IAxelarGateway::new(chain.gateway, provider.clone());

        let usdc_address = gateway
            .tokenAddresses(TOKEN_SYMBOL.to_string())
            .call()
            .await
            .wrap_err_with(|| format!("failed to look up {TOKEN_SYMBOL} on {}", chain.name))?
            ._0;
        eyre::ensure!(
            !usdc_address.is_zero(),
            "gateway on {} has no token registered for {TOKEN_SYMBOL}",
            chain.name
        );

        Ok(Self {
            chain,
            deployment,
            distribution,
            usdc: IERC20::new(usdc_address, provider),
        })
    }

    async fn balance_of(&self, account: Address) -> eyre::Result<U256> {
        let balance = self
            .usdc
            .balanceOf(account)
            .call()
            .await
            .wrap_err_with(|| {
                format!("failed to read balance of {account} on {}", self.chain.name)
            })?;

        Ok(balance._0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub source_treasury: U256,
    pub destination_treasury: U256,
    pub source_contract: U256,
    pub destination_contract: U256,
    pub source_wallet: U256,
    pub destination_wallet: U256,
}

impl BalanceSnapshot {
    async fn read<T, P>(
        source: &ChainHandles<'_, T, P>,
        destination: &ChainHandles<'_, T, P>,
        wallet: Address,
    ) -> eyre::Result<Self>
    where
        T: Transport + Clone,
        P: Provider<T, Ethereum> + Clone,
    {
        Ok(Self {
            source_treasury: source.balance_of(source.deployment.treasury).await?,
            destination_treasury: destination
                .balance_of(destination.deployment.treasury)
                .await?,
            source_contract: source
                .balance_of(source.deployment.distribution_executable)
                .await?,
            destination_contract: destination
                .balance_of(destination.deployment.distribution_executable)
                .await?,
            source_wallet: source.balance_of(wallet).await?,
            destination_wallet: destination.balance_of(wallet).await?,
        })
    }

    fn log(&self, label: &str, source: &str, destination: &str) {
        let rows = [
            ("treasury", source, self.source_treasury),
            ("treasury", destination, self.destination_treasury),
            ("contract", source, self.source_contract),
            ("contract", destination, self.destination_contract),
            ("wallet", source, self.source_wallet),
            ("wallet", destination, self.destination_wallet),
        ];
        for (holder, chain, balance) in rows {
            info!("{label}: {holder} balance on {chain} is {balance}");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    pub amount: U256,
    pub gas_value: U256,
    pub tracked_account: Address,
    pub before: BalanceSnapshot,
    pub after: BalanceSnapshot,
    pub delivery: Delivery,
}

/// Runs the distribution from the source chain to the destination chain.
///
/// Returns once the tracked balance changed on the destination or the poll
/// timeout ran out; the report tells the two apart.
pub async fn test(
    chains: &[ChainDescriptor],
    signer: &PrivateKeySigner,
    options: &ScenarioOptions<'_>,
) -> eyre::Result<ScenarioReport> {
    let plan = ScenarioPlan::new(chains, options)?;

    let source = ChainHandles::connect(
        plan.source,
        plan.source_deployment,
        plan.source.connect(signer)?,
    )
    .await?;
    let destination = ChainHandles::connect(
        plan.destination,
        plan.destination_deployment,
        plan.destination.connect(signer)?,
    )
    .await?;

    run(&plan, &source, &destination, signer.address(), options).await
}

async fn run<T, P>(
    plan: &ScenarioPlan<'_>,
    source: &ChainHandles<'_, T, P>,
    destination: &ChainHandles<'_, T, P>,
    wallet: Address,
    options: &ScenarioOptions<'_>,
) -> eyre::Result<ScenarioReport>
where
    T: Transport + Clone,
    P: Provider<T, Ethereum> + Clone,
{
    let (source_name, destination_name) = (&plan.source.name, &plan.destination.name);
    let treasury = source.deployment.treasury;
    info!("Source treasury address is {treasury}");
    info!(
        "Destination treasury address is {}",
        destination.deployment.treasury
    );
    info!(
        "Source distribution address is {}",
        source.deployment.distribution_executable
    );
    info!(
        "Destination distribution address is {}",
        destination.deployment.distribution_executable
    );
    info!("Tracking {} on {destination_name}", plan.tracked_account);

    send_tx(
        source
            .usdc
            .transfer(source.deployment.distribution_executable, plan.prefund),
        "prefund transfer",
    )
    .await?;

    let before = BalanceSnapshot::read(source, destination, wallet).await?;
    before.log("before", source_name, destination_name);

    let baseline = destination.balance_of(plan.tracked_account).await?;

    send_tx(
        source
            .usdc
            .approve(source.deployment.distribution_executable, plan.amount),
        "approval",
    )
    .await?;

    let price = options
        .gas_price
        .gas_price(plan.source, plan.destination, Address::ZERO)
        .await?;
    let gas_value = gas_value(price)?;
    info!(
        "Sending {} with {gas_value} for gas ({price} per unit)",
        plan.amount
    );

    let receipt = match options.trigger {
        TriggerMethod::SendToMany => {
            let call = source.distribution.sendToMany(plan.amount, treasury);
            send_tx(call.value(gas_value), "sendToMany").await?
        }
        TriggerMethod::Claim => {
            let call = source.distribution.claim(plan.amount);
            send_tx(call.value(gas_value), "claim").await?
        }
    };
    info!("Triggered on {source_name} in tx {}", receipt.transaction_hash);

    let tracked = plan.tracked_account;
    let delivery =
        wait_for_change(baseline, options.poll, move || destination.balance_of(tracked)).await?;
    match delivery {
        Delivery::Delivered {
            current, attempts, ..
        } => info!(
            "Delivered to {destination_name} after {attempts} reads, balance now {current}"
        ),
        Delivery::TimedOut { elapsed, .. } => warn!(
            "Nothing arrived on {destination_name} after {elapsed:?}, balance still {baseline}"
        ),
    }

    let after = BalanceSnapshot::read(source, destination, wallet).await?;
    after.log("after", source_name, destination_name);

    Ok(ScenarioReport {
        amount: plan.amount,
        gas_value,
        tracked_account: tracked,
        before,
        after,
        delivery,
    })
}
