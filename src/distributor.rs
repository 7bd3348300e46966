use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use futures::future::join_all;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::PayoutError;
use crate::network::{Environment, Network};
use crate::types::{BatchReceipt, DistributionPlan, TransferBatch};

/// How long a requested top-up may take to confirm before the run fails.
const AIRDROP_CONFIRM_TIMEOUT: Duration = Duration::from_secs(60);

/// Payees per balance-preview chunk, to stay under public RPC rate limits.
const PREVIEW_CHUNK_SIZE: usize = 25;

/// The distribution engine. Owns the RPC connection and the funding
/// keypair; everything network-specific arrives through the `Environment`
/// built at startup.
pub struct Distributor {
    client: Arc<RpcClient>,
    funder: Keypair,
    network: Network,
}

impl Distributor {
    pub fn new(env: &Environment, funder: Keypair) -> Self {
        let client = Arc::new(RpcClient::new_with_commitment(
            env.rpc_url.clone(),
            CommitmentConfig::confirmed(),
        ));
        Self {
            client,
            funder,
            network: env.network,
        }
    }

    pub fn funder_pubkey(&self) -> Pubkey {
        self.funder.pubkey()
    }

    /// Point-in-time snapshot. The run plans against this value and never
    /// re-reads it, so concurrent external spends are out of scope.
    pub async fn funder_balance(&self) -> Result<u64> {
        self.client
            .get_balance(&self.funder.pubkey())
            .await
            .context("Failed to query funding account balance")
    }

    /// Balance guard: checks the snapshot against the plan and, on test
    /// networks, covers any shortfall with a single airdrop. Runs exactly
    /// once, before any transfer is built.
    pub async fn ensure_funded(
        &self,
        plan: &DistributionPlan,
        balance_lamports: u64,
    ) -> Result<()> {
        let required = plan.required_lamports();
        if balance_lamports >= required {
            info!(
                "Funding account holds {} lamports, {} required; no top-up needed",
                balance_lamports, required
            );
            return Ok(());
        }

        if self.network.is_production() {
            return Err(PayoutError::InsufficientFunds {
                network: self.network,
                required_lamports: required,
                available_lamports: balance_lamports,
            }
            .into());
        }

        let shortfall = required - balance_lamports;
        info!(
            "Requesting airdrop of {} lamports ({:.9} SOL) to cover the shortfall",
            shortfall,
            shortfall as f64 / 1_000_000_000.0
        );
        let signature = self
            .client
            .request_airdrop(&self.funder.pubkey(), shortfall)
            .await
            .context("Airdrop request failed")?;
        self.await_airdrop(&signature).await?;
        info!("Airdrop confirmed: {}", signature);
        Ok(())
    }

    // Single attempt: a failed or unconfirmed top-up fails the whole run.
    async fn await_airdrop(&self, signature: &Signature) -> Result<()> {
        let deadline = Instant::now() + AIRDROP_CONFIRM_TIMEOUT;
        while Instant::now() < deadline {
            match self.client.get_signature_status(signature).await {
                Ok(Some(status)) => {
                    return status.map_err(|e| anyhow!("Airdrop transaction failed: {:?}", e));
                }
                Ok(None) => {
                    sleep(Duration::from_millis(500)).await;
                }
                Err(e) => {
                    warn!("Error checking airdrop status: {}", e);
                    sleep(Duration::from_millis(1000)).await;
                }
            }
        }
        bail!(
            "Airdrop {} was not confirmed within {:?}",
            signature,
            AIRDROP_CONFIRM_TIMEOUT
        )
    }

    /// Best-effort display of each payee's balance before and after the
    /// payout. Read-only; failures are logged and never abort the run.
    pub async fn preview_payees(&self, payees: &[Pubkey], per_payee_lamports: u64) {
        for (chunk_idx, chunk) in payees.chunks(PREVIEW_CHUNK_SIZE).enumerate() {
            let tasks: Vec<_> = chunk
                .iter()
                .map(|payee| {
                    let client = Arc::clone(&self.client);
                    let payee = *payee;
                    tokio::spawn(async move {
                        client
                            .get_balance(&payee)
                            .await
                            .map(|balance| (payee, balance))
                    })
                })
                .collect();

            for result in join_all(tasks).await {
                match result {
                    Ok(Ok((payee, balance))) => {
                        let projected = balance.saturating_add(per_payee_lamports);
                        info!(
                            "{}: {:.9} SOL, {:.9} SOL after payout",
                            payee,
                            balance as f64 / 1_000_000_000.0,
                            projected as f64 / 1_000_000_000.0
                        );
                    }
                    Ok(Err(e)) => warn!("Balance preview failed: {}", e),
                    Err(e) => warn!("Balance preview task panicked: {}", e),
                }
            }

            // Brief pause between chunks to avoid rate limits
            if chunk_idx < payees.chunks(PREVIEW_CHUNK_SIZE).len() - 1 {
                sleep(Duration::from_millis(100)).await;
            }
        }
    }

    /// Strictly sequential submission: batch i+1 is not sent until batch i
    /// is confirmed, so every transaction sees a settled view of the
    /// funding account's ordering state.
    pub async fn submit_batches(&self, batches: &[TransferBatch]) -> Result<Vec<BatchReceipt>> {
        let total = batches.len();
        let mut receipts = Vec::with_capacity(total);

        for (i, batch) in batches.iter().enumerate() {
            let index = i + 1;
            info!(
                "Submitting batch {}/{} ({} transfers)",
                index,
                total,
                batch.transfer_count()
            );

            // A fresh blockhash per batch: confirming earlier batches can
            // outlive the validity window of one fetched up front.
            let recent_blockhash = self
                .client
                .get_latest_blockhash()
                .await
                .context("Failed to get recent blockhash")?;

            let tx = Transaction::new_signed_with_payer(
                &batch.instructions,
                Some(&self.funder.pubkey()),
                &[&self.funder],
                recent_blockhash,
            );

            let started = Instant::now();
            let signature = self
                .client
                .send_and_confirm_transaction(&tx)
                .await
                .with_context(|| format!("Batch {}/{} failed", index, total))?;
            let duration_ms = started.elapsed().as_millis() as u64;

            info!(
                "Batch {}/{} confirmed: {} in {}ms",
                index, total, signature, duration_ms
            );

            receipts.push(BatchReceipt {
                index,
                transfers: batch.transfer_count(),
                signature,
                duration_ms,
            });
        }

        Ok(receipts)
    }
}
