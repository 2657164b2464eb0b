use crate::results::{Player, ResultsDocument};
use crate::scoring::total_points;
use crate::tiers::{Gamemode, Mode, TIER_RANKS};

/// Sort key for players without a tier in the ranked gamemode.
const UNRANKED: usize = TIER_RANKS.len();

fn rank_key(player: &Player, gamemode: Gamemode) -> usize {
    player
        .tier(gamemode)
        .map(|t| t.rank_position())
        .unwrap_or(UNRANKED)
}

/// Orders players for a mode. `sort_by_key` is stable, so ties keep document order.
pub fn rank<'a>(players: &[&'a Player], mode: Mode) -> Vec<&'a Player> {
    let mut ranked = players.to_vec();
    match mode {
        Mode::Overall => ranked.sort_by_key(|p| std::cmp::Reverse(total_points(p))),
        Mode::Gamemode(gm) => ranked.sort_by_key(|p| rank_key(p, gm)),
    }
    ranked
}

pub fn filter_by_mode<'a>(players: &[&'a Player], mode: Mode) -> Vec<&'a Player> {
    match mode {
        Mode::Overall => players.to_vec(),
        Mode::Gamemode(gm) => players
            .iter()
            .copied()
            .filter(|p| p.tier(gm).is_some())
            .collect(),
    }
}

pub fn search<'a>(players: &[&'a Player], query: &str) -> Vec<&'a Player> {
    // Whitespace-only means no filter; otherwise the query is matched as typed.
    if query.trim().is_empty() {
        return players.to_vec();
    }
    let query = query.to_lowercase();
    players
        .iter()
        .copied()
        .filter(|p| !p.username.is_empty() && p.username.to_lowercase().contains(&query))
        .collect()
}

pub fn players_for_mode(doc: &ResultsDocument, mode: Mode) -> Vec<&Player> {
    let all: Vec<&Player> = doc.players.iter().collect();
    rank(&filter_by_mode(&all, mode), mode)
}

/// The list the table shows: filter, then rank, then search.
pub fn leaderboard<'a>(doc: &'a ResultsDocument, mode: Mode, query: &str) -> Vec<&'a Player> {
    search(&players_for_mode(doc, mode), query)
}
