use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tierlist_terminal::config::DEFAULT_DATA_FILE;
use tierlist_terminal::results::{Player, ResultsDocument, Stats};
use tierlist_terminal::tiers::{GAMEMODES, TIER_RANKS};

const NAME_PARTS: &[&str] = &[
    "Crystal", "Shadow", "Pearl", "Nether", "Blaze", "Frost", "Ender", "Totem", "Anchor", "Mace",
    "Golden", "Iron", "Storm", "Pixel", "Void", "Ghast",
];

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let out = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));
    let count = args
        .next()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(40)
        .max(1);
    let mut rng = match args.next().and_then(|val| val.parse::<u64>().ok()) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let players = (0..count).map(|idx| random_player(&mut rng, idx)).collect::<Vec<_>>();
    let tested: u64 = players.iter().map(|p| p.tiers.len() as u64).sum();
    let doc = ResultsDocument {
        last_updated: Some(Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()),
        stats: Stats {
            total_tests: Some(tested),
            active_players: Some(players.len() as u64),
            total_testers: Some(rng.gen_range(3..12)),
            weekly_tests: Some(rng.gen_range(0..=tested.max(1))),
        },
        players,
    };

    if let Some(dir) = out.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(&doc).context("serialize results")?;
    fs::write(&out, json).with_context(|| format!("write {}", out.display()))?;
    println!("Wrote {} players to {}", doc.players.len(), out.display());
    Ok(())
}

fn random_player(rng: &mut StdRng, idx: usize) -> Player {
    let first = NAME_PARTS[rng.gen_range(0..NAME_PARTS.len())];
    let second = NAME_PARTS[rng.gen_range(0..NAME_PARTS.len())];
    let username = format!("{first}{second}{}", rng.gen_range(0..100));

    let mut tiers = BTreeMap::new();
    for gm in GAMEMODES {
        if rng.gen_bool(0.6) {
            // Skew towards the lower tiers, like real testing results.
            let a = rng.gen_range(0..TIER_RANKS.len());
            let b = rng.gen_range(0..TIER_RANKS.len());
            let tier = TIER_RANKS[a.max(b)];
            tiers.insert(gm.key().to_string(), Some(tier.label().to_string()));
        }
    }

    Player {
        uuid: random_uuid(rng, idx),
        username,
        tiers,
    }
}

fn random_uuid(rng: &mut StdRng, idx: usize) -> String {
    let hi: u64 = rng.r#gen();
    let lo: u64 = rng.r#gen::<u64>() ^ idx as u64;
    format!(
        "{:08x}-{:04x}-4{:03x}-{:04x}-{:012x}",
        (hi >> 32) as u32,
        (hi >> 16) as u16,
        (hi & 0x0fff) as u16,
        ((lo >> 48) as u16 & 0x3fff) | 0x8000,
        lo & 0xffff_ffff_ffff
    )
}
