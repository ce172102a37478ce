//! Pool report - read-only snapshot of every configured staking pool
//!
//! Run with: cargo run --bin pool-report -- --user 0x...

use clap::Parser;
use color_eyre::eyre::Result;
use console::style;
use permit_staker::{fetch_stake_pool_info, fetch_user_info, Config, PermitKind, RpcTransport};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "pool-report", about = "Print APR and balances for configured staking pools")]
struct Args {
    /// Config file (defaults to STAKER_CONFIG or ./staker.toml)
    #[arg(long)]
    config: Option<String>,

    /// Only report this chain id
    #[arg(long)]
    chain: Option<u64>,

    /// Also show balances for this address
    #[arg(long)]
    user: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("permit_staker=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    config.validate()?;
    config.print_summary();
    println!();

    for network in &config.networks {
        if args.chain.is_some_and(|c| c != network.chain_id) {
            continue;
        }

        println!(
            "{}",
            style(format!("═══ {} ({}) ═══", network.name, network.chain_id)).cyan().bold()
        );

        let transport = match RpcTransport::connect(&network.rpc_url).await {
            Ok(t) => t,
            Err(e) => {
                error!("Failed to connect to {}: {}", network.name, e);
                continue;
            }
        };

        let kind = PermitKind::for_chain(network.chain_id, config.primary_chain_id);
        info!("{}: {} permits", network.name, kind);

        for pool in &network.pools {
            match fetch_stake_pool_info(
                &transport,
                pool.pool_address,
                pool.lm_address,
                network,
                pool.has_liquidity_pool,
            )
            .await
            {
                Ok(snapshot) => {
                    let apr = snapshot
                        .apr
                        .map(|a| format!("{:.2}%", a))
                        .unwrap_or_else(|| "n/a".to_string());

                    println!(
                        "  {} {} | staked {} | APR {}",
                        style("✓").green(),
                        style(&pool.name).bold(),
                        snapshot.tokens_in_pool.round_dp(4),
                        style(apr).yellow()
                    );
                    if let Some(lp) = &snapshot.liquidity_pool {
                        println!(
                            "     reserves {} / {} | LP supply {}",
                            lp.reserves.0.round_dp(4),
                            lp.reserves.1.round_dp(4),
                            lp.total_supply.round_dp(4)
                        );
                    }
                }
                Err(e) => {
                    println!("  {} {} | {}", style("✗").red(), pool.name, e);
                    continue;
                }
            }

            if let Some(user) = &args.user {
                let user_info =
                    fetch_user_info(&transport, user, pool.pool_address, pool.lm_address, network);
                match user_info.await {
                    Ok(u) => println!(
                        "     you: staked {} | earned {} {} | wallet {} wei | allowance {} wei",
                        u.staked_lp_tokens.round_dp(4),
                        u.earned.amount.round_dp(4),
                        u.earned.display_token,
                        u.not_staked_lp_tokens_wei,
                        u.allowance_lp_tokens
                    ),
                    Err(e) => error!("User info for {} failed: {}", pool.name, e),
                }
            }
        }
        println!();
    }

    Ok(())
}
