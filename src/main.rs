mod amount;
mod args;
mod batch;
mod config;
mod distributor;
mod error;
mod network;
mod payees;
mod plan;
mod types;

use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use args::Args;
use clap::Parser;
use clap::error::ErrorKind;
use config::Config;
use distributor::Distributor;
use error::PayoutError;
use network::Environment;
use solana_sdk::signature::read_keypair_file;
use tracing::{error, info};
use types::{BatchReceipt, DistributionPlan};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Parsed here rather than in run() so usage errors bypass the
    // PayoutError exit-code mapping.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(usage_exit_code(&err));
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let started = Instant::now();

    let config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    let env = Environment::from_config(args.network, &config)?;

    let funder = read_keypair_file(&config.keypair_path).map_err(|e| {
        anyhow!(
            "Failed to read keypair file {:?}: {}",
            config.keypair_path,
            e
        )
    })?;

    info!(
        "Distributing on {} ({}), amount: {}",
        env.network, env.rpc_url, args.amount
    );

    // Source the payee list before any network traffic
    let payees = env.source_payees()?;
    info!("Sourced {} payees", payees.len());

    let distributor = Distributor::new(&env, funder);

    // The plan is computed once against this snapshot and never revised
    let balance = distributor.funder_balance().await?;
    info!(
        "Funding account {} holds {} lamports ({:.9} SOL)",
        distributor.funder_pubkey(),
        balance,
        balance as f64 / 1_000_000_000.0
    );

    let plan = plan::compute_plan(
        balance,
        payees.len(),
        args.amount,
        config.fee_per_transfer_lamports,
    )?;
    info!(
        "Plan: {} lamports per payee, {} in total across {} payees, {} reserved for fees",
        plan.per_payee_lamports, plan.total_lamports, plan.payee_count, plan.fee_reserve_lamports
    );

    distributor.ensure_funded(&plan, balance).await?;

    distributor
        .preview_payees(&payees, plan.per_payee_lamports)
        .await;

    let batches = batch::build_batches(
        &distributor.funder_pubkey(),
        &payees,
        plan.per_payee_lamports,
    );
    info!(
        "Packed {} transfers into {} batches (max {} instructions each)",
        payees.len(),
        batches.len(),
        batch::MAX_INSTRUCTIONS_PER_TX
    );

    let receipts = distributor.submit_batches(&batches).await?;

    print_summary(&env, &plan, &receipts, started.elapsed());
    Ok(())
}

fn print_summary(
    env: &Environment,
    plan: &DistributionPlan,
    receipts: &[BatchReceipt],
    elapsed: Duration,
) {
    println!("\n{:-^100}", " PAYOUT SUMMARY ");
    println!(
        "{:<7} {:<10} {:<90} {:<10}",
        "Batch", "Transfers", "Signature", "Time (ms)"
    );
    println!("{:-^100}", "");
    for receipt in receipts {
        println!(
            "{:<7} {:<10} {:<90} {:<10}",
            receipt.index,
            receipt.transfers,
            receipt.signature.to_string(),
            receipt.duration_ms
        );
    }

    println!("\n{:-^100}", " TOTALS ");
    println!(
        "Completed at: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!("Network: {}", env.network);
    println!("Payees paid: {}", plan.payee_count);
    println!(
        "Per-payee amount: {} lamports ({:.9} SOL)",
        plan.per_payee_lamports,
        plan.per_payee_lamports as f64 / 1_000_000_000.0
    );
    println!(
        "Total distributed: {} lamports ({:.9} SOL)",
        plan.distributed_lamports(),
        plan.distributed_lamports() as f64 / 1_000_000_000.0
    );
    println!("Fee reserve: {} lamports", plan.fee_reserve_lamports);
    println!("Batches confirmed: {}", receipts.len());
    println!("Total execution time: {}ms", elapsed.as_millis());
}

// Clap exits 2 for its own usage errors, which would collide with the
// planning exit code below; bad arguments exit 1 with the other
// configuration failures instead. Help and version keep their zero exit.
fn usage_exit_code(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

// Planning failures and a mainnet shortfall get their own exit codes so
// calling automation can tell "fix the amount" from "add funds" from
// everything else.
fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(payout) = cause.downcast_ref::<PayoutError>() {
            return match payout {
                PayoutError::NoPayees
                | PayoutError::NonPositiveShare { .. }
                | PayoutError::AmountTooLarge => 2,
                PayoutError::InsufficientFunds { .. } => 3,
                PayoutError::MalformedAddress { .. } => 1,
            };
        }
    }
    1
}
