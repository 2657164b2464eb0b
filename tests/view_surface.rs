use std::fs;
use std::path::PathBuf;

use tierlist_terminal::avatar::AvatarConfig;
use tierlist_terminal::results::{parse_results_json, ResultsDocument};
use tierlist_terminal::state::{apply_delta, AppState, Delta};
use tierlist_terminal::tiers::{Gamemode, Mode};
use tierlist_terminal::view::{
    self, build_detail, build_table, Badge, DetailView, StatsView, Surface, TableRow, TextSurface,
    CROWN, NOT_TESTED, UNTESTED,
};

fn fixture_doc() -> ResultsDocument {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("results.json");
    let raw = fs::read_to_string(path).expect("fixture file should be readable");
    parse_results_json(&raw).expect("fixture should parse")
}

#[derive(Default)]
struct RecordingSurface {
    calls: Vec<String>,
    header: Vec<String>,
    rows: Vec<TableRow>,
    detail: Option<DetailView>,
    stats: Option<StatsView>,
}

impl Surface for RecordingSurface {
    fn render_stats(&mut self, stats: &StatsView) {
        self.calls.push("stats".to_string());
        self.stats = Some(stats.clone());
    }

    fn render_table(&mut self, header: &[String], rows: &[TableRow]) {
        self.calls.push("table".to_string());
        self.header = header.to_vec();
        self.rows = rows.to_vec();
    }

    fn render_empty(&mut self, mode: Mode, _query: &str) {
        self.calls.push(format!("empty:{}", mode.key()));
    }

    fn render_detail(&mut self, detail: &DetailView) {
        self.calls.push("detail".to_string());
        self.detail = Some(detail.clone());
    }

    fn render_load_error(&mut self, message: &str) {
        self.calls.push(format!("error:{message}"));
    }
}

fn state_with(doc: ResultsDocument) -> AppState {
    let mut state = AppState::default();
    apply_delta(&mut state, Delta::Loaded(doc));
    state
}

#[test]
fn overall_table_has_a_column_per_gamemode() {
    let doc = fixture_doc();
    let players: Vec<_> = doc.players.iter().collect();
    let table = build_table(&players, Mode::Overall, &AvatarConfig::default());
    assert_eq!(table.header.len(), 10);
    assert_eq!(table.header.first().map(String::as_str), Some("Rank"));
    assert_eq!(table.header.last().map(String::as_str), Some("Points"));
    for row in &table.rows {
        assert_eq!(row.tiers.len(), 7);
    }
    let alex = &table.rows[0];
    assert_eq!(alex.rank_label, CROWN);
    assert_eq!(alex.tiers[0].text, "HT1");
    assert_eq!(alex.tiers[0].badge, Badge::High);
    assert_eq!(alex.tiers[1].text, UNTESTED);
    assert_eq!(alex.tiers[1].badge, Badge::Empty);
    assert_eq!(alex.tiers[6].badge, Badge::Low);
    assert!(alex.avatar_url.ends_with(&alex.uuid));
}

#[test]
fn mode_table_shows_single_tier_and_total_points() {
    let mut state = state_with(fixture_doc());
    state.set_mode(Mode::Gamemode(Gamemode::Crystal));
    let mut surface = RecordingSurface::default();
    view::present(&mut surface, &state);

    assert_eq!(surface.calls, vec!["stats", "table"]);
    assert_eq!(surface.header, vec!["Rank", "Player", "Tier", "Points"]);
    let summary: Vec<(String, String, u32)> = surface
        .rows
        .iter()
        .map(|r| (r.username.clone(), r.tiers[0].text.clone(), r.points))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Alex".to_string(), "HT1".to_string(), 85),
            ("Kalani".to_string(), "HT1".to_string(), 55),
            ("Steve".to_string(), "LT1".to_string(), 115),
        ]
    );
    assert_eq!(surface.rows[1].rank_label, "2");
}

#[test]
fn empty_mode_renders_empty_state() {
    let mut state = state_with(fixture_doc());
    state.set_mode(Mode::Gamemode(Gamemode::Diapot));
    let mut surface = RecordingSurface::default();
    view::present(&mut surface, &state);
    assert_eq!(surface.calls, vec!["stats", "empty:diapot"]);
}

#[test]
fn load_error_replaces_everything_else() {
    let mut state = AppState::default();
    apply_delta(&mut state, Delta::LoadFailed("http 500".to_string()));
    let mut surface = RecordingSurface::default();
    view::present(&mut surface, &state);
    assert_eq!(surface.calls, vec!["error:http 500"]);
}

#[test]
fn detail_is_rendered_after_the_table() {
    let mut state = state_with(fixture_doc());
    state
        .open_detail("0b3c7a4e-4444-4a5b-9c6d-000000000004")
        .expect("player exists");
    let mut surface = RecordingSurface::default();
    view::present(&mut surface, &state);
    assert_eq!(surface.calls, vec!["stats", "table", "detail"]);

    let detail = surface.detail.expect("detail rendered");
    assert_eq!(detail.username, "NoTiers");
    assert_eq!(detail.total_points, 0);
    assert_eq!(detail.tiers.len(), 7);
    assert!(detail.tiers.iter().all(|t| t.cell.text == NOT_TESTED));
}

#[test]
fn detail_for_unknown_uuid_is_not_found() {
    let doc = fixture_doc();
    let err = build_detail(&doc, "missing", &AvatarConfig::default()).unwrap_err();
    assert_eq!(err.to_string(), "no player with uuid missing");
}

#[test]
fn stats_view_uses_placeholders_and_formats_date() {
    let state = state_with(fixture_doc());
    let mut surface = RecordingSurface::default();
    view::present(&mut surface, &state);
    let stats = surface.stats.expect("stats rendered");
    let values: Vec<&str> = stats.cards.iter().map(|(_, v)| v.as_str()).collect();
    assert_eq!(values, vec!["42", "6", "3", "0"]);
    assert_eq!(stats.last_updated.as_deref(), Some("2025-06-01 12:30"));
}

#[test]
fn text_surface_prints_table_and_detail() {
    let mut state = state_with(fixture_doc());
    state.set_query("steve");
    state.open_selected().expect("steve is visible");
    let mut surface = TextSurface::new();
    view::present(&mut surface, &state);
    let out = surface.into_string();

    assert!(out.contains("Total Tests: 42"));
    assert!(out.contains("Last updated: 2025-06-01 12:30"));
    assert!(out.contains("Steve"));
    assert!(!out.contains("Alex"));
    assert!(out.contains("Total points: 115"));
    assert!(out.contains("https://mc-heads.net/body/0b3c7a4e-2222-4a5b-9c6d-000000000002"));
}

#[test]
fn text_surface_reports_empty_search() {
    let mut state = state_with(fixture_doc());
    state.set_query("herobrine");
    let mut surface = TextSurface::new();
    view::present(&mut surface, &state);
    assert!(surface
        .into_string()
        .contains("No players matching \"herobrine\" in Overall"));
}
