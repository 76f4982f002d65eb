//! Campaign roster: the players and monsters a master can pull into combat.
//!
//! The roster is read-only input from the campaign records. The tracker
//! copies names and hit points at insertion time and never writes back;
//! editing campaign entities happens elsewhere.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::combat::CombatantKind;

/// Fallback maximum HP when an entry has no parseable hit-point value.
pub const DEFAULT_MAX_HP: i32 = 100;

/// Errors loading a roster file.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read roster file '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse roster file '{path}'")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// A player character as recorded in the campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub class: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub ancestry: String,
}

fn default_level() -> u32 {
    1
}

/// A bestiary entry as recorded in the campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterEntry {
    pub id: String,
    pub name: String,
    /// Challenge rating, free text ("1/2", "3").
    #[serde(default)]
    pub challenge: String,
    #[serde(default)]
    pub category: String,
    /// Hit points as entered in the codex. Stat blocks write things like
    /// "7 (2d6)", so this stays a string and is parsed on demand.
    #[serde(default)]
    pub hit_points: String,
}

impl MonsterEntry {
    /// Maximum HP parsed from the leading number of `hit_points`, falling
    /// back to [`DEFAULT_MAX_HP`] when there is none.
    pub fn max_hp(&self) -> i32 {
        leading_number(&self.hit_points).unwrap_or(DEFAULT_MAX_HP)
    }
}

/// The full pickable roster for one campaign.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Roster {
    pub players: Vec<PlayerEntry>,
    pub monsters: Vec<MonsterEntry>,
}

/// One flattened roster line for the entity picker.
#[derive(Debug, Clone)]
pub struct RosterItem {
    pub id: String,
    pub name: String,
    pub kind: CombatantKind,
    pub max_hp: i32,
    /// Secondary label: "Fighter lvl 5" or "CR 1/2 Beast".
    pub detail: String,
}

impl Roster {
    /// Load a roster from a TOML file.
    pub fn load(path: &Path) -> Result<Self, RosterError> {
        let contents = std::fs::read_to_string(path).map_err(|source| RosterError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| RosterError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn len(&self) -> usize {
        self.players.len() + self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.monsters.is_empty()
    }

    /// Players first, then monsters — the order the entity picker shows.
    /// Player characters carry the fallback HP; their sheets live outside
    /// the roster file.
    pub fn items(&self) -> Vec<RosterItem> {
        let players = self.players.iter().map(|p| RosterItem {
            id: p.id.clone(),
            name: p.name.clone(),
            kind: CombatantKind::Player,
            max_hp: DEFAULT_MAX_HP,
            detail: if p.class.is_empty() {
                format!("lvl {}", p.level)
            } else {
                format!("{} lvl {}", p.class, p.level)
            },
        });
        let monsters = self.monsters.iter().map(|m| RosterItem {
            id: m.id.clone(),
            name: m.name.clone(),
            kind: CombatantKind::Monster,
            max_hp: m.max_hp(),
            detail: if m.challenge.is_empty() {
                m.category.clone()
            } else {
                format!("CR {} {}", m.challenge, m.category)
            },
        });
        players.chain(monsters).collect()
    }

    /// Built-in sample so the binary runs without a campaign file.
    pub fn demo() -> Self {
        Self {
            players: vec![
                PlayerEntry {
                    id: "pc-aria".to_string(),
                    name: "Aria".to_string(),
                    class: "Ranger".to_string(),
                    level: 4,
                    ancestry: "Elf".to_string(),
                },
                PlayerEntry {
                    id: "pc-bruni".to_string(),
                    name: "Bruni".to_string(),
                    class: "Cleric".to_string(),
                    level: 4,
                    ancestry: "Dwarf".to_string(),
                },
                PlayerEntry {
                    id: "pc-thorn".to_string(),
                    name: "Thorn".to_string(),
                    class: "Fighter".to_string(),
                    level: 5,
                    ancestry: "Human".to_string(),
                },
            ],
            monsters: vec![
                MonsterEntry {
                    id: "mon-goblin-1".to_string(),
                    name: "Goblin Skirmisher".to_string(),
                    challenge: "1/4".to_string(),
                    category: "Humanoid".to_string(),
                    hit_points: "7 (2d6)".to_string(),
                },
                MonsterEntry {
                    id: "mon-goblin-2".to_string(),
                    name: "Goblin Archer".to_string(),
                    challenge: "1/4".to_string(),
                    category: "Humanoid".to_string(),
                    hit_points: "7 (2d6)".to_string(),
                },
                MonsterEntry {
                    id: "mon-ogre".to_string(),
                    name: "Ogre".to_string(),
                    challenge: "2".to_string(),
                    category: "Giant".to_string(),
                    hit_points: "59 (7d10+21)".to_string(),
                },
            ],
        }
    }
}

/// Parse the leading unsigned integer of a stat-block field.
fn leading_number(s: &str) -> Option<i32> {
    let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[rstest]
    #[case("7", 7)]
    #[case("7 (2d6)", 7)]
    #[case("  59 (7d10+21) ", 59)]
    #[case("", DEFAULT_MAX_HP)]
    #[case("2d6", 2)]
    #[case("unknown", DEFAULT_MAX_HP)]
    #[case("99999999999999999999", DEFAULT_MAX_HP)]
    fn test_hit_point_parsing(#[case] field: &str, #[case] expected: i32) {
        let monster = MonsterEntry {
            id: "m".to_string(),
            name: "M".to_string(),
            challenge: String::new(),
            category: String::new(),
            hit_points: field.to_string(),
        };
        assert_eq!(monster.max_hp(), expected);
    }

    #[test]
    fn test_demo_roster_is_usable() {
        let roster = Roster::demo();
        assert!(!roster.is_empty());
        assert_eq!(roster.len(), roster.players.len() + roster.monsters.len());
        // Ids must be unique across both lists
        let mut ids: Vec<String> = roster.items().into_iter().map(|i| i.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), roster.len());
    }

    #[test]
    fn test_items_players_first() {
        let roster = Roster::demo();
        let items = roster.items();
        assert!(matches!(items[0].kind, CombatantKind::Player));
        assert!(matches!(items.last().unwrap().kind, CombatantKind::Monster));
        assert!(items[0].detail.contains("Ranger"));
    }

    #[test]
    fn test_load_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let toml = r#"
            [[players]]
            id = "pc-1"
            name = "Lyra"
            class = "Wizard"
            level = 3

            [[monsters]]
            id = "mon-1"
            name = "Dire Wolf"
            challenge = "1"
            category = "Beast"
            hit_points = "37 (5d10+10)"
        "#;
        file.write_all(toml.as_bytes()).unwrap();

        let roster = Roster::load(file.path()).unwrap();
        assert_eq!(roster.players.len(), 1);
        assert_eq!(roster.players[0].name, "Lyra");
        assert_eq!(roster.players[0].ancestry, ""); // defaulted
        assert_eq!(roster.monsters[0].max_hp(), 37);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Roster::load(Path::new("/nonexistent/roster.toml")).unwrap_err();
        assert!(matches!(err, RosterError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"players = \"not a table\"").unwrap();
        let err = Roster::load(file.path()).unwrap_err();
        assert!(matches!(err, RosterError::Parse { .. }));
    }
}
