use crate::results::Player;
use crate::tiers::{Tier, GAMEMODES};

/// Points for a tier label; absent or unrecognized labels score 0.
pub fn tier_points(label: Option<&str>) -> u32 {
    label.and_then(Tier::parse).map(Tier::points).unwrap_or(0)
}

pub fn total_points(player: &Player) -> u32 {
    GAMEMODES
        .iter()
        .map(|gm| tier_points(player.tier_label(*gm)))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiers::TIER_RANKS;

    fn player(tiers: &[(&str, &str)]) -> Player {
        Player {
            uuid: "u".to_string(),
            username: "P".to_string(),
            tiers: tiers
                .iter()
                .map(|(k, v)| (k.to_string(), Some(v.to_string())))
                .collect(),
        }
    }

    #[test]
    fn unknown_and_absent_score_zero() {
        assert_eq!(tier_points(None), 0);
        assert_eq!(tier_points(Some("HT9")), 0);
        assert_eq!(tier_points(Some("")), 0);
    }

    #[test]
    fn points_never_increase_down_the_ladder() {
        let points: Vec<u32> = TIER_RANKS
            .iter()
            .map(|t| tier_points(Some(t.label())))
            .collect();
        assert!(points.windows(2).all(|w| w[0] >= w[1]));
        assert!(points.iter().all(|p| *p > 0));
    }

    #[test]
    fn total_ignores_keys_outside_the_gamemode_set() {
        let p = player(&[("crystal", "HT1"), ("bedwars", "HT1"), ("sword", "LT5")]);
        assert_eq!(total_points(&p), 55);
    }
}
