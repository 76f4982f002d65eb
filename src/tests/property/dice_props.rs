//! Property tests for the dice roller.

use proptest::prelude::*;

use crate::core::dice::DiceRoller;

proptest! {
    #[test]
    fn prop_result_bounded_by_sides(seed in any::<u64>(), sides in 1..100u32) {
        let mut roller = DiceRoller::seeded(seed);
        for _ in 0..20 {
            let roll = roller.roll(sides);
            prop_assert!(roll.result >= 1);
            prop_assert!(roll.result <= sides);
        }
    }

    #[test]
    fn prop_crit_fumble_agree_with_d20(seed in any::<u64>()) {
        let mut roller = DiceRoller::seeded(seed);
        for _ in 0..50 {
            let roll = roller.roll(20);
            prop_assert_eq!(roll.is_critical, roll.result == 20);
            prop_assert_eq!(roll.is_fumble, roll.result == 1);
        }
    }

    #[test]
    fn prop_non_d20_never_flags(seed in any::<u64>(), sides in 1..100u32) {
        prop_assume!(sides != 20);
        let mut roller = DiceRoller::seeded(seed);
        for _ in 0..20 {
            let roll = roller.roll(sides);
            prop_assert!(!roll.is_critical);
            prop_assert!(!roll.is_fumble);
        }
    }

    #[test]
    fn prop_seeded_replay_is_identical(seed in any::<u64>(), sides in 1..100u32) {
        let mut a = DiceRoller::seeded(seed);
        let mut b = DiceRoller::seeded(seed);
        for _ in 0..20 {
            prop_assert_eq!(a.roll(sides).result, b.roll(sides).result);
        }
    }
}
