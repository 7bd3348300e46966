use solana_sdk::{instruction::Instruction, signature::Signature};

/// Fee-aware split of the funding balance, fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributionPlan {
    pub total_lamports: u64,
    pub per_payee_lamports: u64,
    pub payee_count: usize,
    pub fee_reserve_lamports: u64,
}

impl DistributionPlan {
    /// Balance the funding account must hold before submission starts.
    /// `compute_plan` guarantees this sum fits in u64.
    pub fn required_lamports(&self) -> u64 {
        self.total_lamports + self.fee_reserve_lamports
    }

    /// Lamports that actually leave the funding account; the floor-division
    /// remainder stays behind.
    pub fn distributed_lamports(&self) -> u64 {
        self.per_payee_lamports * self.payee_count as u64
    }
}

/// Transfer instructions packed to stay under the per-transaction limit.
/// Immutable once built; submitted in creation order.
#[derive(Debug, Clone)]
pub struct TransferBatch {
    pub instructions: Vec<Instruction>,
}

impl TransferBatch {
    pub fn transfer_count(&self) -> usize {
        self.instructions.len()
    }
}

/// Submission record for one confirmed batch.
#[derive(Debug)]
pub struct BatchReceipt {
    /// 1-based position in the submission order.
    pub index: usize,
    pub transfers: usize,
    pub signature: Signature,
    pub duration_ms: u64,
}
