//! Projection from ranked players onto a presentation surface.
//!
//! Everything here is pure apart from the `Surface` calls; the terminal UI, the
//! dump binary and the tests each bring their own surface.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::avatar::{AvatarConfig, AvatarSource};
use crate::error::NotFound;
use crate::results::{Player, ResultsDocument, Stats};
use crate::scoring::total_points;
use crate::state::{AppState, Screen};
use crate::tiers::{Gamemode, Mode, GAMEMODES};

pub const UNTESTED: &str = "Untested";
pub const NOT_TESTED: &str = "Not Tested";
pub const CROWN: &str = "👑";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    High,
    Low,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierCell {
    pub text: String,
    pub badge: Badge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub uuid: String,
    pub rank: usize,
    pub rank_label: String,
    pub username: String,
    pub avatar_url: String,
    /// One cell per gamemode in overall mode, a single cell otherwise.
    pub tiers: Vec<TierCell>,
    /// Always the player's total, also in single-gamemode views.
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub mode: Mode,
    pub header: Vec<String>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTier {
    pub gamemode: Gamemode,
    pub cell: TierCell,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub uuid: String,
    pub username: String,
    pub avatar_url: String,
    pub body_url: String,
    /// `None` until the background probe reports back.
    pub body_source: Option<AvatarSource>,
    pub total_points: u32,
    pub tiers: Vec<DetailTier>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub cards: Vec<(&'static str, String)>,
    pub last_updated: Option<String>,
}

pub trait Surface {
    fn render_stats(&mut self, stats: &StatsView);
    fn render_table(&mut self, header: &[String], rows: &[TableRow]);
    fn render_empty(&mut self, mode: Mode, query: &str);
    fn render_detail(&mut self, detail: &DetailView);
    fn render_load_error(&mut self, message: &str);
}

pub fn header_for(mode: Mode) -> Vec<String> {
    let mut header = vec!["Rank".to_string(), "Player".to_string()];
    match mode {
        Mode::Overall => header.extend(
            GAMEMODES
                .iter()
                .map(|gm| format!("{} {}", gm.icon(), gm.label())),
        ),
        Mode::Gamemode(_) => header.push("Tier".to_string()),
    }
    header.push("Points".to_string());
    header
}

pub fn tier_cell(player: &Player, gamemode: Gamemode, placeholder: &str) -> TierCell {
    match player.tier(gamemode) {
        Some(tier) => TierCell {
            text: tier.label().to_string(),
            badge: if tier.is_high() { Badge::High } else { Badge::Low },
        },
        None => TierCell {
            text: placeholder.to_string(),
            badge: Badge::Empty,
        },
    }
}

pub fn rank_label(rank: usize) -> String {
    if rank == 1 {
        CROWN.to_string()
    } else {
        rank.to_string()
    }
}

pub fn build_table(players: &[&Player], mode: Mode, avatars: &AvatarConfig) -> TableView {
    let rows = players
        .iter()
        .enumerate()
        .map(|(idx, player)| {
            let tiers = match mode {
                Mode::Overall => GAMEMODES
                    .iter()
                    .map(|gm| tier_cell(player, *gm, UNTESTED))
                    .collect(),
                Mode::Gamemode(gm) => vec![tier_cell(player, gm, UNTESTED)],
            };
            TableRow {
                uuid: player.uuid.clone(),
                rank: idx + 1,
                rank_label: rank_label(idx + 1),
                username: player.username.clone(),
                avatar_url: avatars.avatar_url(&player.uuid),
                tiers,
                points: total_points(player),
            }
        })
        .collect();
    TableView {
        mode,
        header: header_for(mode),
        rows,
    }
}

pub fn build_detail(
    doc: &ResultsDocument,
    uuid: &str,
    avatars: &AvatarConfig,
) -> Result<DetailView, NotFound> {
    let player = doc.find_player(uuid).ok_or_else(|| NotFound {
        uuid: uuid.to_string(),
    })?;
    Ok(DetailView {
        uuid: player.uuid.clone(),
        username: player.username.clone(),
        avatar_url: avatars.avatar_url(&player.uuid),
        body_url: avatars.body_url(&player.uuid),
        body_source: None,
        total_points: total_points(player),
        tiers: GAMEMODES
            .iter()
            .map(|gm| DetailTier {
                gamemode: *gm,
                cell: tier_cell(player, *gm, NOT_TESTED),
            })
            .collect(),
    })
}

pub fn build_stats(doc: &ResultsDocument) -> StatsView {
    let Stats {
        total_tests,
        active_players,
        total_testers,
        weekly_tests,
    } = &doc.stats;
    let count = |v: &Option<u64>| v.unwrap_or(0).to_string();
    StatsView {
        cards: vec![
            ("Total Tests", count(total_tests)),
            ("Active Players", count(active_players)),
            ("Total Testers", count(total_testers)),
            ("Weekly Tests", count(weekly_tests)),
        ],
        last_updated: doc.last_updated.as_deref().map(format_last_updated),
    }
}

pub fn format_last_updated(raw: &str) -> String {
    let cleaned = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return dt.format("%Y-%m-%d %H:%M").to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(cleaned, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    cleaned.to_string()
}

/// Drives a surface from the current state. Load errors replace the stats and
/// table; a detail request for an unknown uuid renders nothing extra.
pub fn present<S: Surface + ?Sized>(surface: &mut S, state: &AppState) {
    if let Some(err) = &state.load_error {
        surface.render_load_error(err);
        return;
    }
    let Some(doc) = &state.doc else {
        return;
    };
    surface.render_stats(&build_stats(doc));

    let players = state.visible_players();
    if players.is_empty() {
        surface.render_empty(state.mode, &state.query);
    } else {
        let table = build_table(&players, state.mode, &state.avatars);
        surface.render_table(&table.header, &table.rows);
    }

    if let Screen::Detail { uuid } = &state.screen
        && let Ok(detail) = state.detail_view(uuid)
    {
        surface.render_detail(&detail);
    }
}

/// Plain-text surface used by `board_dump`.
#[derive(Debug, Default)]
pub struct TextSurface {
    out: String,
}

impl TextSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn line(&mut self, text: impl AsRef<str>) {
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }
}

impl Surface for TextSurface {
    fn render_stats(&mut self, stats: &StatsView) {
        let cards = stats
            .cards
            .iter()
            .map(|(label, value)| format!("{label}: {value}"))
            .collect::<Vec<_>>()
            .join(" | ");
        self.line(cards);
        if let Some(updated) = &stats.last_updated {
            self.line(format!("Last updated: {updated}"));
        }
        self.line("");
    }

    fn render_table(&mut self, header: &[String], rows: &[TableRow]) {
        let mut grid: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
        grid.push(header.to_vec());
        for row in rows {
            let mut cells = vec![row.rank_label.clone(), row.username.clone()];
            cells.extend(row.tiers.iter().map(|c| c.text.clone()));
            cells.push(row.points.to_string());
            grid.push(cells);
        }
        let columns = header.len();
        let widths: Vec<usize> = (0..columns)
            .map(|col| {
                grid.iter()
                    .filter_map(|cells| cells.get(col))
                    .map(|c| c.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        for cells in &grid {
            let line = cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| {
                    let pad = width.saturating_sub(cell.chars().count());
                    format!("{cell}{}", " ".repeat(pad))
                })
                .collect::<Vec<_>>()
                .join("  ");
            self.line(line.trim_end());
        }
    }

    fn render_empty(&mut self, mode: Mode, query: &str) {
        if query.trim().is_empty() {
            self.line(format!("No players ranked in {}", mode.label()));
        } else {
            self.line(format!(
                "No players matching \"{}\" in {}",
                query.trim(),
                mode.label()
            ));
        }
    }

    fn render_detail(&mut self, detail: &DetailView) {
        self.line("");
        self.line(format!("== {} ==", detail.username));
        self.line(format!("UUID: {}", detail.uuid));
        self.line(format!("Skin: {}", detail.body_url));
        for tier in &detail.tiers {
            self.line(format!(
                "  {:<8} {}",
                tier.gamemode.label(),
                tier.cell.text
            ));
        }
        self.line(format!("Total points: {}", detail.total_points));
    }

    fn render_load_error(&mut self, message: &str) {
        self.line(format!("Failed to load leaderboard data: {message}"));
    }
}
