use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::LoadError;
use crate::tiers::{Gamemode, Tier, GAMEMODES};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    pub stats: Stats,
    pub players: Vec<Player>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_tests: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub active_players: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_testers: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub weekly_tests: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    #[serde(default, deserialize_with = "lenient_text")]
    pub uuid: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub username: String,
    /// Gamemode key -> tier label, as found in the document.
    #[serde(default, deserialize_with = "lenient_labels")]
    pub tiers: BTreeMap<String, Option<String>>,
}

impl Player {
    /// Raw label for a gamemode; null and blank labels count as absent.
    pub fn tier_label(&self, gamemode: Gamemode) -> Option<&str> {
        self.tiers
            .get(gamemode.key())
            .and_then(|label| label.as_deref())
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }

    pub fn tier(&self, gamemode: Gamemode) -> Option<Tier> {
        self.tier_label(gamemode).and_then(Tier::parse)
    }

    /// Labels that are present but not part of the tier table.
    pub fn unrecognized_tiers(&self) -> Vec<(Gamemode, &str)> {
        GAMEMODES
            .iter()
            .filter_map(|gm| {
                let label = self.tier_label(*gm)?;
                if Tier::parse(label).is_none() {
                    Some((*gm, label))
                } else {
                    None
                }
            })
            .collect()
    }
}

impl ResultsDocument {
    pub fn find_player(&self, uuid: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.uuid == uuid)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    #[serde(default)]
    last_updated: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    stats: Stats,
    #[serde(default)]
    players: Option<Vec<Player>>,
}

pub fn parse_results_json(raw: &str) -> Result<ResultsDocument, LoadError> {
    let root: RawDocument = serde_json::from_str(raw.trim())?;
    let players = root.players.ok_or(LoadError::MissingPlayers)?;
    let last_updated = root.last_updated.and_then(|value| match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });
    Ok(ResultsDocument {
        last_updated,
        stats: root.stats,
        players,
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Anything but a string reads as an empty field.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        _ => String::new(),
    })
}

// Non-string labels are kept in their JSON form so they surface as
// unrecognized tiers instead of failing the whole document.
fn lenient_labels<'de, D>(deserializer: D) -> Result<BTreeMap<String, Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(Value::Object(map)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };
    Ok(map
        .into_iter()
        .map(|(key, value)| {
            let label = match value {
                Value::Null => None,
                Value::String(s) => Some(s),
                other => Some(other.to_string()),
            };
            (key, label)
        })
        .collect())
}

// Counts occasionally arrive as strings from the export pipeline.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_tiers_decode_as_empty() {
        let doc = parse_results_json(
            r#"{"players":[{"uuid":"u1","username":"Steve","tiers":null}]}"#,
        )
        .unwrap();
        assert!(doc.players[0].tiers.is_empty());
        assert_eq!(doc.stats, Stats::default());
        assert!(doc.last_updated.is_none());
    }

    #[test]
    fn blank_and_null_labels_are_absent() {
        let doc = parse_results_json(
            r#"{"players":[{"uuid":"u1","username":"Steve","tiers":{"crystal":"","beast":null,"mace":" HT2 "}}]}"#,
        )
        .unwrap();
        let p = &doc.players[0];
        assert_eq!(p.tier_label(Gamemode::Crystal), None);
        assert_eq!(p.tier_label(Gamemode::Beast), None);
        assert_eq!(p.tier(Gamemode::Mace), Some(Tier::Ht2));
    }

    #[test]
    fn string_counts_are_accepted() {
        let doc = parse_results_json(
            r#"{"stats":{"totalTests":"12","activePlayers":3,"weeklyTests":"n/a"},"players":[]}"#,
        )
        .unwrap();
        assert_eq!(doc.stats.total_tests, Some(12));
        assert_eq!(doc.stats.active_players, Some(3));
        assert_eq!(doc.stats.total_testers, None);
        assert_eq!(doc.stats.weekly_tests, None);
    }

    #[test]
    fn missing_players_is_an_error() {
        let err = parse_results_json(r#"{"stats":{}}"#).unwrap_err();
        assert!(matches!(err, LoadError::MissingPlayers));
    }

    #[test]
    fn unrecognized_labels_are_reported() {
        let doc = parse_results_json(
            r#"{"players":[{"uuid":"u1","username":"Steve","tiers":{"sword":"RHT1","uhc":"LT2"}}]}"#,
        )
        .unwrap();
        let unknown = doc.players[0].unrecognized_tiers();
        assert_eq!(unknown, vec![(Gamemode::Sword, "RHT1")]);
    }

    #[test]
    fn odd_field_types_do_not_fail_the_document() {
        let doc = parse_results_json(
            r#"{"players":[
                {"uuid":"u1","username":"Alex","tiers":{"crystal":"HT1"}},
                {"uuid":"u2","username":42,"tiers":{"crystal":3,"sword":"LT2"}},
                {"uuid":7,"username":"Steve","tiers":["HT1"]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(doc.players.len(), 3);
        assert_eq!(doc.players[0].tier(Gamemode::Crystal), Some(Tier::Ht1));

        let odd = &doc.players[1];
        assert_eq!(odd.username, "");
        assert_eq!(odd.tier(Gamemode::Crystal), None);
        assert_eq!(odd.tier(Gamemode::Sword), Some(Tier::Lt2));
        assert_eq!(odd.unrecognized_tiers(), vec![(Gamemode::Crystal, "3")]);

        assert_eq!(doc.players[2].uuid, "");
        assert!(doc.players[2].tiers.is_empty());
    }
}
