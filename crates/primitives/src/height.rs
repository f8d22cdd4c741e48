//! Block-number arithmetic shared by the relay workers and both ledgers.
//!
//! Blocks built by the child-ledger authority live at multiples of the block interval. Deposit
//! blocks take the sequential numbers in between, so any height that is not a multiple of the
//! interval belongs to a deposit.

use crate::types::BlockHeight;

/// Next plasma block number that may still be missing from the root ledger, given the root
/// ledger's `current` block number.
///
/// * `0` maps to `interval`,
/// * `interval` maps to `2 * interval`,
/// * anything else is rounded up to the nearest multiple of `interval`.
///
/// A multiple of the interval beyond the first one maps to itself, so callers iterating over
/// blocks must resume from the number after the one they just handled.
pub const fn next_plasma_block_num(current: BlockHeight, interval: u64) -> BlockHeight {
    if current == 0 {
        interval
    } else if current == interval {
        2 * interval
    } else {
        current.div_ceil(interval) * interval
    }
}

/// Height the child-ledger authority assigns to the next block it seals, which is also the
/// number the root ledger assigns to the next submitted root.
pub const fn next_child_block_height(current: BlockHeight, interval: u64) -> BlockHeight {
    (current / interval + 1) * interval
}

/// Whether `height` is a deposit block rather than one sealed by the authority.
pub const fn is_deposit_block(height: BlockHeight, interval: u64) -> bool {
    height % interval != 0
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const INTERVAL: u64 = 1000;

    #[test]
    fn next_plasma_block_num_rounds_up() {
        assert_eq!(next_plasma_block_num(9, INTERVAL), 1000);
        assert_eq!(next_plasma_block_num(999, INTERVAL), 1000);
        assert_eq!(next_plasma_block_num(0, INTERVAL), 1000);
        assert_eq!(next_plasma_block_num(1000, INTERVAL), 2000);
        assert_eq!(next_plasma_block_num(1001, INTERVAL), 2000);
        assert_eq!(next_plasma_block_num(1999, INTERVAL), 2000);
        assert_eq!(next_plasma_block_num(2000, INTERVAL), 2000);
    }

    #[test]
    fn next_child_block_height_always_advances() {
        assert_eq!(next_child_block_height(0, INTERVAL), 1000);
        assert_eq!(next_child_block_height(1000, INTERVAL), 2000);
        assert_eq!(next_child_block_height(1003, INTERVAL), 2000);
        assert_eq!(next_child_block_height(2000, INTERVAL), 3000);
    }

    #[test]
    fn deposit_blocks_sit_between_multiples() {
        assert!(is_deposit_block(1, INTERVAL));
        assert!(is_deposit_block(1001, INTERVAL));
        assert!(!is_deposit_block(1000, INTERVAL));
        assert!(!is_deposit_block(0, INTERVAL));
    }

    proptest! {
        #[test]
        fn both_rules_agree_off_the_interval_grid(current in 1u64..1_000_000_000) {
            prop_assume!(current % INTERVAL != 0);
            prop_assert_eq!(
                next_plasma_block_num(current, INTERVAL),
                next_child_block_height(current, INTERVAL)
            );
        }
    }
}
