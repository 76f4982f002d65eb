//! Dice rolling for checks, damage, and initiative.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The dice the roller panel offers.
pub const STANDARD_DICE: [u32; 6] = [4, 6, 8, 10, 12, 20];

/// Result of rolling a single die.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DieRoll {
    pub sides: u32,
    pub result: u32,
    /// Natural 20 on a d20.
    pub is_critical: bool,
    /// Natural 1 on a d20.
    pub is_fumble: bool,
}

impl DieRoll {
    /// "d20"-style label for history lines.
    pub fn notation(&self) -> String {
        format!("d{}", self.sides)
    }
}

/// Stateful roller owning its RNG.
pub struct DiceRoller {
    rng: StdRng,
}

impl DiceRoller {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Fixed seed for reproducible rolls in tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Roll one die, uniform in `1..=sides`. A zero-sided die is treated
    /// as one-sided rather than a panic path. Criticals and fumbles are a
    /// d20 concern only.
    pub fn roll(&mut self, sides: u32) -> DieRoll {
        let sides = sides.max(1);
        let result = self.rng.gen_range(1..=sides);
        DieRoll {
            sides,
            result,
            is_critical: sides == 20 && result == 20,
            is_fumble: sides == 20 && result == 1,
        }
    }

    /// d20 roll for a combatant entering the initiative order.
    pub fn roll_initiative(&mut self) -> i32 {
        self.roll(20).result as i32
    }
}

impl Default for DiceRoller {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(4)]
    #[case(6)]
    #[case(8)]
    #[case(10)]
    #[case(12)]
    #[case(20)]
    fn test_roll_in_range(#[case] sides: u32) {
        let mut roller = DiceRoller::seeded(42);
        for _ in 0..200 {
            let roll = roller.roll(sides);
            assert!((1..=sides).contains(&roll.result));
            assert_eq!(roll.sides, sides);
        }
    }

    #[test]
    fn test_crit_and_fumble_only_on_d20() {
        let mut roller = DiceRoller::seeded(1);
        for _ in 0..500 {
            let roll = roller.roll(6);
            assert!(!roll.is_critical);
            assert!(!roll.is_fumble);
        }
        for _ in 0..500 {
            let roll = roller.roll(20);
            assert_eq!(roll.is_critical, roll.result == 20);
            assert_eq!(roll.is_fumble, roll.result == 1);
        }
    }

    #[test]
    fn test_zero_sides_does_not_panic() {
        let mut roller = DiceRoller::seeded(3);
        let roll = roller.roll(0);
        assert_eq!(roll.result, 1);
        assert_eq!(roll.sides, 1);
    }

    #[test]
    fn test_seeded_rolls_reproduce() {
        let mut a = DiceRoller::seeded(99);
        let mut b = DiceRoller::seeded(99);
        let rolls_a: Vec<u32> = (0..50).map(|_| a.roll(20).result).collect();
        let rolls_b: Vec<u32> = (0..50).map(|_| b.roll(20).result).collect();
        assert_eq!(rolls_a, rolls_b);
    }

    #[test]
    fn test_initiative_is_d20() {
        let mut roller = DiceRoller::seeded(5);
        for _ in 0..100 {
            assert!((1..=20).contains(&roller.roll_initiative()));
        }
    }

    #[test]
    fn test_notation_label() {
        let mut roller = DiceRoller::seeded(0);
        assert_eq!(roller.roll(12).notation(), "d12");
    }
}
