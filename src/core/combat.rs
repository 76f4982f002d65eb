//! Combat session state for a single encounter.
//!
//! The session owns the initiative order, the active-turn cursor, and every
//! combatant's hit points and status effects. All state is ephemeral: it
//! lives in memory for one encounter and is discarded by [`CombatSession::end`]
//! or process exit.
//!
//! Every mutating operation returns `Result<_, CombatError>` and leaves the
//! session untouched on `Err`, so a caller that discards the error gets plain
//! no-op semantics. Nothing in here panics.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::dice::DiceRoller;
use crate::core::roster::MonsterEntry;

/// Status label managed by the death toggle.
pub const STATUS_DEAD: &str = "Dead";
/// Status labels a short rest shakes off. Everything else sticks.
pub const SHORT_REST_CURES: [&str; 2] = ["Poisoned", "Stunned"];

// ============================================================================
// Errors
// ============================================================================

/// Rejected combat operations. An `Err` never mutates the session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CombatError {
    /// The initiative field was empty or not a number.
    #[error("initiative must be a number")]
    InvalidInitiative,

    /// The combatant is already in the initiative order.
    #[error("'{id}' is already in the initiative order")]
    DuplicateCombatant {
        /// Id of the combatant that was already present.
        id: String,
    },

    /// No combatant with the given id in the order.
    #[error("no combatant with id '{id}'")]
    UnknownCombatant {
        /// The id that was not found.
        id: String,
    },

    /// The initiative order is empty.
    #[error("the initiative order is empty")]
    EmptySession,

    /// Combat has not been started (or was already ended).
    #[error("combat has not been started")]
    CombatInactive,
}

/// Result type alias for combat operations.
pub type CombatResult<T> = Result<T, CombatError>;

// ============================================================================
// Combatant
// ============================================================================

/// Whether a combatant came from the party roster or the bestiary.
/// Determines iconography only; turn order and mutations treat both alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatantKind {
    Player,
    Monster,
}

impl CombatantKind {
    pub fn label(self) -> &'static str {
        match self {
            CombatantKind::Player => "Player",
            CombatantKind::Monster => "Monster",
        }
    }
}

/// One participant in the initiative order.
///
/// `name` is copied from the roster at insertion time and does not track
/// later roster edits. `hp` stays within `0..=max_hp` after every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub id: String,
    pub name: String,
    pub kind: CombatantKind,
    /// Sort key for the order; higher acts first.
    pub initiative: i32,
    pub hp: i32,
    pub max_hp: i32,
    /// Insertion-ordered status labels. Duplicates are allowed: applying
    /// the same effect twice tracks two stacks of it.
    pub status_effects: Vec<String>,
    /// Hides HP and statuses from non-master viewers. Display only.
    pub hidden: bool,
}

impl Combatant {
    fn new(
        id: String,
        name: String,
        kind: CombatantKind,
        initiative: i32,
        max_hp: i32,
    ) -> Self {
        let max_hp = max_hp.max(0);
        Self {
            id,
            name,
            kind,
            initiative,
            hp: max_hp,
            max_hp,
            status_effects: Vec::new(),
            hidden: false,
        }
    }

    pub fn has_status(&self, label: &str) -> bool {
        self.status_effects.iter().any(|s| s == label)
    }

    /// Whether the death toggle has flagged this combatant. Reaching 0 HP
    /// does not set this on its own.
    pub fn is_dead(&self) -> bool {
        self.has_status(STATUS_DEAD)
    }

    /// Current HP as a fraction of max, for HP bars. 0.0 when max is 0.
    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp > 0 {
            (self.hp as f64 / self.max_hp as f64).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Validated request to insert one combatant.
#[derive(Debug, Clone)]
pub struct NewCombatant {
    pub id: String,
    pub name: String,
    pub kind: CombatantKind,
    pub initiative: i32,
    pub max_hp: i32,
}

impl NewCombatant {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: CombatantKind,
        initiative: i32,
        max_hp: i32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            initiative,
            max_hp,
        }
    }

    /// Build a request from the entry form, parsing the initiative field
    /// as typed. Empty or non-numeric input is rejected here so the
    /// session itself only ever sees typed values.
    pub fn parse(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: CombatantKind,
        initiative: &str,
        max_hp: i32,
    ) -> CombatResult<Self> {
        let initiative: i32 = initiative
            .trim()
            .parse()
            .map_err(|_| CombatError::InvalidInitiative)?;
        Ok(Self::new(id, name, kind, initiative, max_hp))
    }
}

// ============================================================================
// Combat session
// ============================================================================

/// One encounter's worth of combat state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatSession {
    /// Initiative order, kept sorted descending by `initiative`
    /// (ties keep insertion order).
    pub combatants: Vec<Combatant>,
    /// Position of the active turn in `combatants`. Meaningful only while
    /// the order is non-empty.
    pub turn: usize,
    /// Lifecycle flag; insertion requires an active session.
    pub active: bool,
}

impl CombatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin an encounter: cursor to the top, session live. Any existing
    /// order is kept — ending combat is what clears it. Since insertion
    /// requires an active session and `end` clears, the order is always
    /// empty here in practice.
    pub fn start(&mut self) {
        self.active = true;
        self.turn = 0;
    }

    /// Finish the encounter and discard all combat state. Idempotent.
    pub fn end(&mut self) {
        self.active = false;
        self.combatants.clear();
        self.turn = 0;
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.combatants.iter().any(|c| c.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    /// The combatant whose turn it is, if any.
    pub fn current(&self) -> Option<&Combatant> {
        self.combatants.get(self.turn)
    }

    // ── Roster entry ────────────────────────────────────────────────────

    /// Insert one combatant at full HP and re-sort the order.
    pub fn add_combatant(&mut self, new: NewCombatant) -> CombatResult<()> {
        if !self.active {
            return Err(CombatError::CombatInactive);
        }
        if self.contains(&new.id) {
            return Err(CombatError::DuplicateCombatant { id: new.id });
        }
        self.combatants.push(Combatant::new(
            new.id,
            new.name,
            new.kind,
            new.initiative,
            new.max_hp,
        ));
        self.sort_initiative();
        Ok(())
    }

    /// Roll d20 initiative for every roster monster not already in the
    /// order and insert them at full HP. Monsters already present keep
    /// their roll. Returns how many were added.
    pub fn roll_for_monsters(
        &mut self,
        monsters: &[MonsterEntry],
        roller: &mut DiceRoller,
    ) -> CombatResult<usize> {
        if !self.active {
            return Err(CombatError::CombatInactive);
        }
        let mut added = 0;
        for monster in monsters {
            if self.contains(&monster.id) {
                continue;
            }
            self.combatants.push(Combatant::new(
                monster.id.clone(),
                monster.name.clone(),
                CombatantKind::Monster,
                roller.roll_initiative(),
                monster.max_hp(),
            ));
            added += 1;
        }
        if added > 0 {
            self.sort_initiative();
        }
        Ok(added)
    }

    // ── Turn cursor ─────────────────────────────────────────────────────

    /// Move the cursor to the next position, wrapping at the end. Pure
    /// position motion: dead and hidden combatants still get a turn.
    pub fn advance_turn(&mut self) -> CombatResult<usize> {
        if self.combatants.is_empty() {
            return Err(CombatError::EmptySession);
        }
        self.turn = (self.turn + 1) % self.combatants.len();
        Ok(self.turn)
    }

    /// Move the cursor to the previous position, wrapping at the top.
    pub fn rewind_turn(&mut self) -> CombatResult<usize> {
        if self.combatants.is_empty() {
            return Err(CombatError::EmptySession);
        }
        self.turn = (self.turn + self.combatants.len() - 1) % self.combatants.len();
        Ok(self.turn)
    }

    // ── Per-combatant mutations ─────────────────────────────────────────

    /// Heal (positive delta) or damage (negative) one combatant, clamped
    /// to `0..=max_hp`. Dropping to 0 does not flag death; that is the
    /// explicit toggle's job. Returns the new HP.
    pub fn adjust_hp(&mut self, id: &str, delta: i32) -> CombatResult<i32> {
        let combatant = self.find_mut(id)?;
        combatant.hp = combatant.hp.saturating_add(delta).clamp(0, combatant.max_hp);
        Ok(combatant.hp)
    }

    /// Flip the "Dead" flag: kill (flag + 0 HP) or revive (unflag + 1 HP).
    /// Independent of HP thresholds. Returns `true` if now dead.
    pub fn toggle_death(&mut self, id: &str) -> CombatResult<bool> {
        let combatant = self.find_mut(id)?;
        if let Some(pos) = combatant
            .status_effects
            .iter()
            .position(|s| s == STATUS_DEAD)
        {
            combatant.status_effects.remove(pos);
            combatant.hp = 1.min(combatant.max_hp);
            Ok(false)
        } else {
            combatant.status_effects.push(STATUS_DEAD.to_string());
            combatant.hp = 0;
            Ok(true)
        }
    }

    /// Append a status label. No dedup: a second application stacks.
    pub fn add_status(&mut self, id: &str, label: impl Into<String>) -> CombatResult<()> {
        let combatant = self.find_mut(id)?;
        combatant.status_effects.push(label.into());
        Ok(())
    }

    /// Remove the first matching status label. Returns `false` when the
    /// label was not present (the combatant is left unchanged).
    pub fn remove_status(&mut self, id: &str, label: &str) -> CombatResult<bool> {
        let combatant = self.find_mut(id)?;
        match combatant.status_effects.iter().position(|s| s == label) {
            Some(pos) => {
                combatant.status_effects.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Flip visibility for non-master viewers. Returns the new flag.
    pub fn toggle_hidden(&mut self, id: &str) -> CombatResult<bool> {
        let combatant = self.find_mut(id)?;
        combatant.hidden = !combatant.hidden;
        Ok(combatant.hidden)
    }

    // ── Rest recovery ───────────────────────────────────────────────────

    /// Everyone recovers a quarter of their max HP (clamped) and loses the
    /// [`SHORT_REST_CURES`] labels. Other statuses, "Dead" included, stick.
    pub fn short_rest(&mut self) -> CombatResult<()> {
        if self.combatants.is_empty() {
            return Err(CombatError::EmptySession);
        }
        for combatant in &mut self.combatants {
            combatant.hp = combatant
                .hp
                .saturating_add(combatant.max_hp / 4)
                .clamp(0, combatant.max_hp);
            combatant
                .status_effects
                .retain(|s| !SHORT_REST_CURES.contains(&s.as_str()));
        }
        Ok(())
    }

    /// Everyone back to full HP, all statuses cleared.
    pub fn long_rest(&mut self) -> CombatResult<()> {
        if self.combatants.is_empty() {
            return Err(CombatError::EmptySession);
        }
        for combatant in &mut self.combatants {
            combatant.hp = combatant.max_hp;
            combatant.status_effects.clear();
        }
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn find_mut(&mut self, id: &str) -> CombatResult<&mut Combatant> {
        self.combatants
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CombatError::UnknownCombatant { id: id.to_string() })
    }

    /// Stable descending sort: equal initiatives keep insertion order.
    /// TODO: re-anchor `turn` by combatant id here — a mid-combat insert
    /// that sorts above the cursor silently shifts whose turn is active,
    /// because the cursor tracks position rather than identity.
    fn sort_initiative(&mut self) {
        self.combatants.sort_by(|a, b| b.initiative.cmp(&a.initiative));
    }
}

// ============================================================================
// Tests
// ============================================================================
