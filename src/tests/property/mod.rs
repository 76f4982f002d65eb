//! Property-based tests using the proptest framework.
//!
//! Property tests verify invariants that should hold for all inputs,
//! rather than testing specific cases.
//!
//! ## Running Property Tests
//!
//! ```sh
//! cargo test property --release
//! ```
//!
//! ## Test Modules
//!
//! - `combat_props`: Invariants of the combat session
//!   - Initiative order is always sorted descending, ties stable
//!   - HP stays within `0..=max_hp` after any mutation
//!   - Advancing `len` turns returns to the starting cursor
//!   - Rewind undoes advance
//!   - The death toggle is an involution on the "Dead" label
//!   - Short rest never lowers HP; long rest restores everyone
//!   - Duplicate ids never enter the order
//!
//! - `dice_props`: Invariants of the dice roller
//!   - Results are uniform-range bounded by the die size
//!   - Critical/fumble flags agree with the d20 result
//!   - Seeded rollers replay identically
//!
//! By default, proptest runs 256 cases per property; tune with the
//! `PROPTEST_CASES` environment variable.

mod combat_props;
mod dice_props;
