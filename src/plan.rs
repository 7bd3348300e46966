use crate::amount::AmountSpec;
use crate::error::PayoutError;
use crate::types::DistributionPlan;

/// Computes the fee-aware distribution plan from a balance snapshot.
///
/// Pure: identical inputs always produce the identical plan, and nothing has
/// touched the network when this fails. The caller treats any error as fatal
/// misconfiguration.
pub fn compute_plan(
    balance_lamports: u64,
    payee_count: usize,
    amount: AmountSpec,
    fee_per_transfer_lamports: u64,
) -> Result<DistributionPlan, PayoutError> {
    if payee_count == 0 {
        return Err(PayoutError::NoPayees);
    }

    // One flat fee per transfer, reserved up front so the distribution
    // cannot drain the account below what its own transactions cost.
    let fee_reserve = payee_count as u128 * fee_per_transfer_lamports as u128;

    let total: i128 = match amount {
        AmountSpec::Maximum => balance_lamports as i128 - fee_reserve as i128,
        // Convert SOL to lamports (1 SOL = 10^9 lamports)
        AmountSpec::Fixed(sol) => (sol * 1_000_000_000.0) as i128,
    };

    let per_payee = total / payee_count as i128;
    if per_payee <= 0 {
        return Err(PayoutError::NonPositiveShare {
            total_lamports: total,
            payee_count,
            fee_reserve_lamports: fee_reserve,
        });
    }

    // total is positive past this point. The guard later checks the funding
    // account against total + reserve, so that sum must be representable;
    // once it fits in u64, every narrowing below is lossless.
    let required = total as u128 + fee_reserve;
    if required > u64::MAX as u128 {
        return Err(PayoutError::AmountTooLarge);
    }

    Ok(DistributionPlan {
        total_lamports: total as u64,
        per_payee_lamports: per_payee as u64,
        payee_count,
        fee_reserve_lamports: fee_reserve as u64,
    })
}
