//! Property tests for the combat session invariants.

use proptest::prelude::*;

use crate::core::combat::{CombatSession, CombatantKind, NewCombatant, STATUS_DEAD};

/// Build a started session from (initiative, max_hp) pairs, ids "c0".."cN".
fn session_with(entries: &[(i32, i32)]) -> CombatSession {
    let mut session = CombatSession::new();
    session.start();
    for (i, (initiative, max_hp)) in entries.iter().enumerate() {
        session
            .add_combatant(NewCombatant::new(
                format!("c{i}"),
                format!("Combatant {i}"),
                if i % 2 == 0 {
                    CombatantKind::Player
                } else {
                    CombatantKind::Monster
                },
                *initiative,
                *max_hp,
            ))
            .expect("ids are unique by construction");
    }
    session
}

/// (initiative, max_hp) pairs for 1..20 combatants.
fn entries() -> impl Strategy<Value = Vec<(i32, i32)>> {
    prop::collection::vec((-100..100i32, 0..500i32), 1..20)
}

proptest! {
    #[test]
    fn prop_order_sorted_descending(entries in entries()) {
        let session = session_with(&entries);
        for pair in session.combatants.windows(2) {
            prop_assert!(pair[0].initiative >= pair[1].initiative);
        }
    }

    #[test]
    fn prop_ties_keep_insertion_order(count in 1..15usize, initiative in -50..50i32) {
        let entries: Vec<(i32, i32)> = (0..count).map(|_| (initiative, 10)).collect();
        let session = session_with(&entries);
        let ids: Vec<String> = session.combatants.iter().map(|c| c.id.clone()).collect();
        let expected: Vec<String> = (0..count).map(|i| format!("c{i}")).collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn prop_hp_clamped_after_any_deltas(
        max_hp in 0..500i32,
        deltas in prop::collection::vec(any::<i32>(), 1..40),
    ) {
        let mut session = session_with(&[(10, max_hp)]);
        for delta in deltas {
            session.adjust_hp("c0", delta).unwrap();
            let combatant = session.get("c0").unwrap();
            prop_assert!(combatant.hp >= 0);
            prop_assert!(combatant.hp <= combatant.max_hp);
        }
    }

    #[test]
    fn prop_advance_full_cycle_returns_home(entries in entries(), offset in 0..10usize) {
        let mut session = session_with(&entries);
        for _ in 0..offset {
            session.advance_turn().unwrap();
        }
        let home = session.turn;
        for _ in 0..session.len() {
            session.advance_turn().unwrap();
        }
        prop_assert_eq!(session.turn, home);
    }

    #[test]
    fn prop_rewind_undoes_advance(entries in entries(), offset in 0..10usize) {
        let mut session = session_with(&entries);
        for _ in 0..offset {
            session.advance_turn().unwrap();
        }
        let before = session.turn;
        session.advance_turn().unwrap();
        session.rewind_turn().unwrap();
        prop_assert_eq!(session.turn, before);
    }

    #[test]
    fn prop_turn_always_in_bounds(entries in entries(), steps in prop::collection::vec(any::<bool>(), 0..60)) {
        let mut session = session_with(&entries);
        for forward in steps {
            if forward {
                session.advance_turn().unwrap();
            } else {
                session.rewind_turn().unwrap();
            }
            prop_assert!(session.turn < session.len());
        }
    }

    #[test]
    fn prop_death_toggle_is_involution(max_hp in 0..500i32, pre_flagged in any::<bool>()) {
        let mut session = session_with(&[(10, max_hp)]);
        if pre_flagged {
            session.toggle_death("c0").unwrap();
        }
        let was_dead = session.get("c0").unwrap().has_status(STATUS_DEAD);

        session.toggle_death("c0").unwrap();
        session.toggle_death("c0").unwrap();
        prop_assert_eq!(session.get("c0").unwrap().has_status(STATUS_DEAD), was_dead);
    }

    #[test]
    fn prop_short_rest_never_lowers_hp(
        entries in entries(),
        damage in prop::collection::vec(0..1000i32, 1..20),
    ) {
        let mut session = session_with(&entries);
        for (i, amount) in damage.iter().enumerate() {
            let id = format!("c{}", i % session.len());
            session.adjust_hp(&id, -amount).unwrap();
        }
        let before: Vec<i32> = session.combatants.iter().map(|c| c.hp).collect();

        session.short_rest().unwrap();
        for (combatant, old_hp) in session.combatants.iter().zip(before) {
            prop_assert!(combatant.hp >= old_hp);
            prop_assert!(combatant.hp <= combatant.max_hp);
        }
    }

    #[test]
    fn prop_short_rest_cures_only_listed(entries in entries()) {
        let mut session = session_with(&entries);
        let id = "c0";
        session.add_status(id, "Poisoned").unwrap();
        session.add_status(id, "Blessed").unwrap();
        session.add_status(id, "Stunned").unwrap();
        session.add_status(id, "Prone").unwrap();

        session.short_rest().unwrap();
        let statuses = &session.get(id).unwrap().status_effects;
        prop_assert!(!statuses.iter().any(|s| s == "Poisoned"));
        prop_assert!(!statuses.iter().any(|s| s == "Stunned"));
        prop_assert!(statuses.iter().any(|s| s == "Blessed"));
        prop_assert!(statuses.iter().any(|s| s == "Prone"));
    }

    #[test]
    fn prop_long_rest_restores_everyone(
        entries in entries(),
        damage in prop::collection::vec(0..1000i32, 1..20),
    ) {
        let mut session = session_with(&entries);
        for (i, amount) in damage.iter().enumerate() {
            let id = format!("c{}", i % session.len());
            session.adjust_hp(&id, -amount).unwrap();
            session.add_status(&id, "Poisoned").unwrap();
        }

        session.long_rest().unwrap();
        for combatant in &session.combatants {
            prop_assert_eq!(combatant.hp, combatant.max_hp);
            prop_assert!(combatant.status_effects.is_empty());
        }
    }

    #[test]
    fn prop_duplicate_add_leaves_order_unchanged(entries in entries(), initiative in -100..100i32) {
        let mut session = session_with(&entries);
        let snapshot: Vec<(String, i32, i32)> = session
            .combatants
            .iter()
            .map(|c| (c.id.clone(), c.initiative, c.hp))
            .collect();

        let result = session.add_combatant(NewCombatant::new(
            "c0",
            "Impostor",
            CombatantKind::Monster,
            initiative,
            50,
        ));
        prop_assert!(result.is_err());

        let after: Vec<(String, i32, i32)> = session
            .combatants
            .iter()
            .map(|c| (c.id.clone(), c.initiative, c.hp))
            .collect();
        prop_assert_eq!(snapshot, after);
    }

    #[test]
    fn prop_status_multiset_add_then_remove_is_identity(
        entries in entries(),
        label in "[A-Za-z]{1,12}",
    ) {
        let mut session = session_with(&entries);
        let before = session.get("c0").unwrap().status_effects.clone();

        session.add_status("c0", label.clone()).unwrap();
        let removed = session.remove_status("c0", &label).unwrap();
        prop_assert!(removed);
        prop_assert_eq!(&session.get("c0").unwrap().status_effects, &before);
    }
}
