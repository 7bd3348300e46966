use solana_sdk::{pubkey::Pubkey, system_instruction};

use crate::types::TransferBatch;

/// Upper bound on transfer instructions packed into one transaction. The
/// network rejects transactions over its size budget outright, so the
/// batcher enforces the limit structurally instead of reacting to
/// rejections.
pub const MAX_INSTRUCTIONS_PER_TX: usize = 20;

/// Packs one transfer per payee, in source order, into batches of at most
/// `MAX_INSTRUCTIONS_PER_TX` instructions. Every batch except possibly the
/// last is full.
pub fn build_batches(
    funder: &Pubkey,
    payees: &[Pubkey],
    per_payee_lamports: u64,
) -> Vec<TransferBatch> {
    payees
        .chunks(MAX_INSTRUCTIONS_PER_TX)
        .map(|chunk| TransferBatch {
            instructions: chunk
                .iter()
                .map(|payee| system_instruction::transfer(funder, payee, per_payee_lamports))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use solana_sdk::system_program;

    use super::*;

    fn payees(n: usize) -> Vec<Pubkey> {
        (0..n).map(|_| Pubkey::new_unique()).collect()
    }

    #[test]
    fn forty_five_payees_pack_into_20_20_5() {
        let funder = Pubkey::new_unique();
        let batches = build_batches(&funder, &payees(45), 1_000);
        let sizes: Vec<usize> = batches.iter().map(|b| b.transfer_count()).collect();
        assert_eq!(sizes, vec![20, 20, 5]);
    }

    #[test]
    fn exact_multiple_fills_every_batch() {
        let funder = Pubkey::new_unique();
        let batches = build_batches(&funder, &payees(40), 1_000);
        let sizes: Vec<usize> = batches.iter().map(|b| b.transfer_count()).collect();
        assert_eq!(sizes, vec![20, 20]);
    }

    #[test]
    fn a_short_list_fits_in_one_batch() {
        let funder = Pubkey::new_unique();
        assert_eq!(build_batches(&funder, &payees(1), 1).len(), 1);
        assert_eq!(build_batches(&funder, &payees(20), 1).len(), 1);
    }

    #[test]
    fn no_payees_builds_no_batches() {
        let funder = Pubkey::new_unique();
        assert!(build_batches(&funder, &[], 1).is_empty());
    }

    #[test]
    fn batches_preserve_payee_order_and_target_the_system_program() {
        let funder = Pubkey::new_unique();
        let list = payees(23);
        let batches = build_batches(&funder, &list, 42);

        let recipients: Vec<Pubkey> = batches
            .iter()
            .flat_map(|b| b.instructions.iter())
            .map(|ix| ix.accounts[1].pubkey)
            .collect();
        assert_eq!(recipients, list);

        for batch in &batches {
            for ix in &batch.instructions {
                assert_eq!(ix.program_id, system_program::id());
                assert_eq!(ix.accounts[0].pubkey, funder);
            }
        }
    }

    #[test]
    fn duplicate_payees_each_get_an_instruction() {
        let funder = Pubkey::new_unique();
        let payee = Pubkey::new_unique();
        let batches = build_batches(&funder, &[payee, payee, payee], 7);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].transfer_count(), 3);
    }

    proptest! {
        /// ceil(n/20) batches; every batch but the last full; the last
        /// holds the remainder, or a full 20 when 20 divides n.
        #[test]
        fn batch_sizes_follow_the_instruction_limit(n in 1usize..2_000) {
            let funder = Pubkey::new_unique();
            let list: Vec<Pubkey> = (0..n).map(|_| Pubkey::new_unique()).collect();
            let batches = build_batches(&funder, &list, 1);

            prop_assert_eq!(batches.len(), n.div_ceil(MAX_INSTRUCTIONS_PER_TX));

            for batch in &batches[..batches.len() - 1] {
                prop_assert_eq!(batch.transfer_count(), MAX_INSTRUCTIONS_PER_TX);
            }
            let expected_last = match n % MAX_INSTRUCTIONS_PER_TX {
                0 => MAX_INSTRUCTIONS_PER_TX,
                rem => rem,
            };
            prop_assert_eq!(batches.last().unwrap().transfer_count(), expected_last);

            let packed: usize = batches.iter().map(|b| b.transfer_count()).sum();
            prop_assert_eq!(packed, n);
        }
    }
}
