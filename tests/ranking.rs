use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tierlist_terminal::ranking::{filter_by_mode, leaderboard, players_for_mode, rank, search};
use tierlist_terminal::results::{parse_results_json, Player, ResultsDocument};
use tierlist_terminal::scoring::{tier_points, total_points};
use tierlist_terminal::tiers::{Gamemode, Mode, GAMEMODES, MODES};

fn fixture_doc() -> ResultsDocument {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("results.json");
    let raw = fs::read_to_string(path).expect("fixture file should be readable");
    parse_results_json(&raw).expect("fixture should parse")
}

fn player(name: &str, tiers: &[(&str, &str)]) -> Player {
    Player {
        uuid: format!("uuid-{}", name.to_lowercase()),
        username: name.to_string(),
        tiers: tiers
            .iter()
            .map(|(k, v)| (k.to_string(), Some(v.to_string())))
            .collect::<BTreeMap<_, _>>(),
    }
}

fn names(players: &[&Player]) -> Vec<String> {
    players.iter().map(|p| p.username.clone()).collect()
}

#[test]
fn crystal_example_orders_high_tier_first() {
    let a = player("A", &[("crystal", "HT1")]);
    let b = player("B", &[("crystal", "LT1")]);
    let input = vec![&b, &a];

    let crystal = rank(&input, Mode::Gamemode(Gamemode::Crystal));
    assert_eq!(names(&crystal), vec!["A", "B"]);

    let overall = rank(&input, Mode::Overall);
    assert_eq!(names(&overall), vec!["A", "B"]);
    assert_eq!(total_points(&a), 50);
    assert_eq!(total_points(&b), 45);
}

#[test]
fn untested_player_is_excluded_from_mode_but_kept_overall() {
    let a = player("A", &[("crystal", "HT3")]);
    let b = player("B", &[("beast", "LT4"), ("crystal", "HT3")]);
    let input = vec![&a, &b];

    let beast = rank(&filter_by_mode(&input, Mode::Gamemode(Gamemode::Beast)), Mode::Gamemode(Gamemode::Beast));
    assert_eq!(names(&beast), vec!["B"]);

    let overall = rank(&filter_by_mode(&input, Mode::Overall), Mode::Overall);
    assert_eq!(names(&overall), vec!["B", "A"]);
    assert_eq!(total_points(&a), 30);
}

#[test]
fn total_is_sum_over_gamemodes_regardless_of_key_order() {
    let forward = player("F", &[("crystal", "HT2"), ("uhc", "LT3"), ("sword", "HT5")]);
    let backward = player("R", &[("sword", "HT5"), ("uhc", "LT3"), ("crystal", "HT2")]);
    assert_eq!(total_points(&forward), total_points(&backward));

    let expected: u32 = GAMEMODES
        .iter()
        .map(|gm| tier_points(forward.tier_label(*gm)))
        .sum();
    assert_eq!(total_points(&forward), expected);
    assert_eq!(expected, 40 + 25 + 10);
}

#[test]
fn overall_is_descending_and_stable() {
    let doc = fixture_doc();
    let ranked = players_for_mode(&doc, Mode::Overall);
    assert_eq!(
        names(&ranked),
        vec!["Steve", "Alex", "Kalani", "Weird", "NoTiers", "zeroone"]
    );
    let totals: Vec<u32> = ranked.iter().map(|p| total_points(p)).collect();
    assert!(totals.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn equal_tiers_keep_document_order() {
    let doc = fixture_doc();
    let crystal = players_for_mode(&doc, Mode::Gamemode(Gamemode::Crystal));
    assert_eq!(names(&crystal), vec!["Alex", "Kalani", "Steve"]);
}

#[test]
fn mode_views_never_include_untested_players() {
    let doc = fixture_doc();
    for mode in MODES {
        let Mode::Gamemode(gm) = mode else {
            continue;
        };
        for p in players_for_mode(&doc, mode) {
            assert!(p.tier(gm).is_some(), "{} has no {} tier", p.username, gm.key());
        }
    }
    assert!(players_for_mode(&doc, Mode::Gamemode(Gamemode::Diapot)).is_empty());
}

#[test]
fn rank_without_filter_puts_missing_tiers_last() {
    let a = player("A", &[]);
    let b = player("B", &[("mace", "LT5")]);
    let c = player("C", &[("mace", "HT1")]);
    let ranked = rank(&[&a, &b, &c], Mode::Gamemode(Gamemode::Mace));
    assert_eq!(names(&ranked), vec!["C", "B", "A"]);
}

#[test]
fn empty_query_returns_input_unchanged() {
    let doc = fixture_doc();
    let ranked = players_for_mode(&doc, Mode::Overall);
    let searched = search(&ranked, "");
    assert_eq!(searched.len(), ranked.len());
    assert!(searched.iter().zip(&ranked).all(|(a, b)| std::ptr::eq(*a, *b)));
    assert_eq!(search(&ranked, "   ").len(), ranked.len());
}

#[test]
fn search_keeps_surrounding_spaces_of_a_query() {
    let doc = fixture_doc();
    assert_eq!(names(&leaderboard(&doc, Mode::Overall, "alex")), vec!["Alex"]);
    assert!(leaderboard(&doc, Mode::Overall, " alex").is_empty());
}

#[test]
fn search_is_case_insensitive_substring() {
    let doc = fixture_doc();
    let hits = leaderboard(&doc, Mode::Overall, "al");
    assert_eq!(names(&hits), vec!["Alex", "Kalani"]);

    let hits = leaderboard(&doc, Mode::Overall, "ZERO");
    assert_eq!(names(&hits), vec!["zeroone"]);

    let hits = leaderboard(&doc, Mode::Gamemode(Gamemode::Crystal), "ste");
    assert_eq!(names(&hits), vec!["Steve"]);
}

#[test]
fn nameless_players_never_match_a_query() {
    let nameless = player("", &[("crystal", "HT1")]);
    assert!(search(&[&nameless], "a").is_empty());
    assert_eq!(search(&[&nameless], "").len(), 1);
}
