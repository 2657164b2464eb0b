use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::block::Title;
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};

use tierlist_terminal::avatar::source_label;
use tierlist_terminal::config::Config;
use tierlist_terminal::feed;
use tierlist_terminal::state::{apply_delta, AppState, Delta, ProviderCommand, Screen};
use tierlist_terminal::tiers::{Mode, MODES};
use tierlist_terminal::view::{self, Badge, DetailView, StatsView, Surface, TableRow};

/// Screen regions from the last draw, used to route mouse clicks.
#[derive(Debug, Default)]
struct HitMap {
    tabs: Vec<(Rect, Mode)>,
    rows: Vec<(Rect, String)>,
    popup: Option<Rect>,
}

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
    hits: HitMap,
}

impl App {
    fn new(state: AppState, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state,
            should_quit: false,
            cmd_tx,
            hits: HitMap::default(),
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.search_active {
            self.on_search_key(key);
            return;
        }
        if matches!(self.state.screen, Screen::Detail { .. }) {
            match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('b') | KeyCode::Esc | KeyCode::Enter => self.state.close_detail(),
                KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => self.state.next_mode(),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => self.state.prev_mode(),
            KeyCode::Char(c @ '0'..='7') => {
                if let Some(mode) = c.to_digit(10).and_then(|d| MODES.get(d as usize)) {
                    self.state.set_mode(*mode);
                }
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('d') | KeyCode::Enter => {
                if let Ok(uuid) = self.state.open_selected() {
                    self.request_avatar(&uuid);
                }
            }
            KeyCode::Char('/') => self.state.search_active = true,
            KeyCode::Esc => {
                if !self.state.query.is_empty() {
                    self.state.clear_query();
                }
            }
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.clear_query(),
            KeyCode::Enter => self.state.search_active = false,
            KeyCode::Backspace => self.state.pop_query_char(),
            KeyCode::Down => self.state.select_next(),
            KeyCode::Up => self.state.select_prev(),
            KeyCode::Char(c) => self.state.push_query_char(c),
            _ => {}
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.on_click(mouse.column, mouse.row);
            }
            MouseEventKind::ScrollDown => self.state.select_next(),
            MouseEventKind::ScrollUp => self.state.select_prev(),
            _ => {}
        }
    }

    fn on_click(&mut self, x: u16, y: u16) {
        if matches!(self.state.screen, Screen::Detail { .. }) {
            let inside = self.hits.popup.is_some_and(|r| contains(r, x, y));
            if !inside {
                self.state.close_detail();
            }
            return;
        }
        if self.state.load_error.is_some() {
            return;
        }
        if let Some((_, mode)) = self.hits.tabs.iter().find(|(r, _)| contains(*r, x, y)) {
            let mode = *mode;
            self.state.set_mode(mode);
            return;
        }
        let clicked = self
            .hits
            .rows
            .iter()
            .find(|(r, _)| contains(*r, x, y))
            .map(|(_, uuid)| uuid.clone());
        if let Some(uuid) = clicked {
            self.open_player(&uuid);
        }
    }

    fn open_player(&mut self, uuid: &str) {
        // Unknown uuids leave the list as it is.
        if self.state.open_detail(uuid).is_ok() {
            self.request_avatar(uuid);
        }
    }

    fn request_avatar(&mut self, uuid: &str) {
        if self.state.resolved_bodies.contains_key(uuid) {
            return;
        }
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Avatar lookup unavailable");
            return;
        };
        if tx
            .send(ProviderCommand::ResolveAvatar {
                uuid: uuid.to_string(),
            })
            .is_err()
        {
            self.state.push_log("[WARN] Avatar request failed");
        }
    }
}

fn main() -> io::Result<()> {
    let arg = std::env::args().nth(1);
    if matches!(arg.as_deref(), Some("-h") | Some("--help")) {
        println!("usage: tierlist_terminal [PATH_OR_URL]");
        println!("  defaults to $TIERLIST_DATA or data/results.json");
        return Ok(());
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();
    let config = Config::load().with_source_arg(arg);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let state = AppState::new(config.avatars.clone());
    feed::spawn_loader(config, tx, cmd_rx);

    let mut app = App::new(state, Some(cmd_tx));
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        let mut hits = HitMap::default();
        terminal.draw(|f| hits = ui(f, &app.state))?;
        app.hits = hits;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, state: &AppState) -> HitMap {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    // A load error covers the tab and search rows, so they get no click targets.
    let mut hits = HitMap::default();
    if state.load_error.is_none() {
        hits.tabs = render_tabs(frame, chunks[2], state.mode);
        render_search(frame, chunks[3], state);
    }

    if state.loading && state.doc.is_none() && state.load_error.is_none() {
        let loading = Paragraph::new("Loading leaderboard...")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(loading, chunks[4]);
    }

    let error_area = Rect {
        x: chunks[1].x,
        y: chunks[1].y,
        width: chunks[1].width,
        height: chunks[1].height + chunks[2].height + chunks[3].height + chunks[4].height,
    };
    {
        let mut surface = TuiSurface {
            frame: &mut *frame,
            stats_area: chunks[1],
            table_area: chunks[4],
            error_area,
            selected: state.selected,
            hits: &mut hits,
        };
        view::present(&mut surface, state);
    }

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[5]);

    let footer = Paragraph::new(footer_text(state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[6]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
    hits
}

struct TuiSurface<'a, 'f> {
    frame: &'a mut Frame<'f>,
    stats_area: Rect,
    table_area: Rect,
    error_area: Rect,
    selected: usize,
    hits: &'a mut HitMap,
}

impl Surface for TuiSurface<'_, '_> {
    fn render_stats(&mut self, stats: &StatsView) {
        let mut block = Block::default().title("Stats").borders(Borders::ALL);
        if let Some(updated) = &stats.last_updated {
            block = block.title(
                Title::from(format!(" Last updated: {updated} ")).alignment(Alignment::Right),
            );
        }
        let inner = block.inner(self.stats_area);
        self.frame.render_widget(block, self.stats_area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let constraints = vec![Constraint::Ratio(1, stats.cards.len().max(1) as u32); stats.cards.len()];
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(inner);
        for ((label, value), area) in stats.cards.iter().zip(cols.iter()) {
            let text = vec![
                Line::from(Span::styled(*label, Style::default().fg(Color::DarkGray))),
                Line::from(Span::styled(
                    value.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
            ];
            let card = Paragraph::new(text).alignment(Alignment::Center);
            self.frame.render_widget(card, *area);
        }
    }

    fn render_table(&mut self, header: &[String], rows: &[TableRow]) {
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(self.table_area);
        let visible = inner.height.saturating_sub(1) as usize;
        let selected = self.selected;
        let (start, end) = visible_range(selected, rows.len(), visible);

        let header_row = Row::new(header.iter().map(|h| Cell::from(h.clone())))
            .style(Style::default().add_modifier(Modifier::BOLD));
        let body = rows[start..end].iter().enumerate().map(|(i, row)| {
            let mut cells = vec![
                Cell::from(row.rank_label.clone()),
                Cell::from(row.username.clone()),
            ];
            cells.extend(row.tiers.iter().map(|tier| {
                Cell::from(Span::styled(tier.text.clone(), badge_style(tier.badge)))
            }));
            cells.push(Cell::from(Span::styled(
                row.points.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            let style = if start + i == selected {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Row::new(cells).style(style)
        });

        let table = Table::new(body, column_widths(header.len()))
            .header(header_row)
            .block(block);
        self.frame.render_widget(table, self.table_area);

        for (i, row) in rows[start..end].iter().enumerate() {
            let area = Rect {
                x: inner.x,
                y: inner.y + 1 + i as u16,
                width: inner.width,
                height: 1,
            };
            self.hits.rows.push((area, row.uuid.clone()));
        }
    }

    fn render_empty(&mut self, mode: Mode, query: &str) {
        let text = if query.trim().is_empty() {
            format!("No players tested in {} yet", mode.label())
        } else {
            format!("No players matching \"{}\"", query.trim())
        };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        self.frame.render_widget(empty, self.table_area);
    }

    fn render_detail(&mut self, detail: &DetailView) {
        let popup_area = centered_rect(60, 70, self.frame.size());
        self.frame.render_widget(Clear, popup_area);

        let skin_note = match detail.body_source {
            Some(source) => source_label(source).to_string(),
            None => "resolving...".to_string(),
        };
        let mut lines = vec![
            Line::from(format!("UUID: {}", detail.uuid)),
            Line::from(format!("Avatar: {}", detail.avatar_url)),
            Line::from(format!("Skin: {} ({skin_note})", detail.body_url)),
            Line::from(""),
        ];
        for tier in &detail.tiers {
            lines.push(Line::from(vec![
                Span::raw(format!(
                    "{} {:<8} ",
                    tier.gamemode.icon(),
                    tier.gamemode.label()
                )),
                Span::styled(tier.cell.text.clone(), badge_style(tier.cell.badge)),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Total points: {}", detail.total_points),
            Style::default().add_modifier(Modifier::BOLD),
        )));

        let popup = Paragraph::new(lines).block(
            Block::default()
                .title(detail.username.clone())
                .title(Title::from(" Esc/click outside to close ").alignment(Alignment::Right))
                .borders(Borders::ALL),
        );
        self.frame.render_widget(popup, popup_area);
        self.hits.popup = Some(popup_area);
    }

    fn render_load_error(&mut self, message: &str) {
        let text = format!("Failed to load leaderboard data.\n\n{message}");
        let error = Paragraph::new(text)
            .style(Style::default().fg(Color::Red))
            .block(Block::default().title("Error").borders(Borders::ALL));
        self.frame.render_widget(Clear, self.error_area);
        self.frame.render_widget(error, self.error_area);
    }
}

fn column_widths(columns: usize) -> Vec<Constraint> {
    let mut widths = vec![Constraint::Length(5), Constraint::Min(16)];
    let tier_columns = columns.saturating_sub(3);
    let tier_width = if tier_columns == 1 { 10 } else { 8 };
    widths.extend(std::iter::repeat(Constraint::Length(tier_width)).take(tier_columns));
    widths.push(Constraint::Length(7));
    widths
}

fn badge_style(badge: Badge) -> Style {
    match badge {
        Badge::High => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        Badge::Low => Style::default().fg(Color::Cyan),
        Badge::Empty => Style::default().fg(Color::DarkGray),
    }
}

fn render_tabs(frame: &mut Frame, area: Rect, current: Mode) -> Vec<(Rect, Mode)> {
    let mut spans = Vec::with_capacity(MODES.len() * 2);
    let mut hits = Vec::with_capacity(MODES.len());
    let mut x = area.x;
    for (idx, mode) in MODES.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
            x = x.saturating_add(1);
        }
        let label = format!(" {} {} ", idx, mode.label());
        let width = label.chars().count() as u16;
        let style = if *mode == current {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(label, style));
        let right = area.x.saturating_add(area.width);
        if x < right {
            hits.push((
                Rect {
                    x,
                    y: area.y,
                    width: width.min(right - x),
                    height: 1,
                },
                *mode,
            ));
        }
        x = x.saturating_add(width);
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
    hits
}

fn render_search(frame: &mut Frame, area: Rect, state: &AppState) {
    let line = if state.search_active {
        Line::from(vec![
            Span::styled("Search: ", Style::default().fg(Color::Yellow)),
            Span::raw(state.query.clone()),
            Span::styled("▏", Style::default().fg(Color::Yellow)),
        ])
    } else if !state.query.is_empty() {
        Line::from(vec![
            Span::raw("Search: "),
            Span::styled(
                state.query.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled("  (/ edit, Esc clear)", Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(Span::styled(
            "/ to search players",
            Style::default().fg(Color::DarkGray),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn header_text(state: &AppState) -> String {
    let count = state.visible_players().len();
    let status = if state.load_error.is_some() {
        "LOAD FAILED".to_string()
    } else if state.doc.is_none() {
        "LOADING".to_string()
    } else {
        format!("{count} players")
    };
    format!(" MC TIERS | {} {} | {status}", state.mode.icon(), state.mode.label())
}

fn footer_text(state: &AppState) -> String {
    if state.search_active {
        return "Type to filter | Enter Keep | Esc Clear | ↑/↓ Move".to_string();
    }
    match state.screen {
        Screen::List => {
            "Tab/←/→ Mode | 0-7 Jump | j/k/↑/↓ Move | Enter Details | / Search | ? Help | q Quit"
                .to_string()
        }
        Screen::Detail { .. } => "b/Esc Back | click outside to close | ? Help | q Quit".to_string(),
    }
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x
        && x < area.x.saturating_add(area.width)
        && y >= area.y
        && y < area.y.saturating_add(area.height)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "MC Tiers - Help",
        "",
        "Leaderboard:",
        "  Tab / → / l    Next gamemode",
        "  S-Tab / ← / h  Previous gamemode",
        "  0-7            Jump to gamemode",
        "  j/k or ↑/↓     Move selection",
        "  Enter / d      Player details",
        "  /              Search by name",
        "  Esc            Clear search",
        "",
        "Details:",
        "  b / Esc        Back to list",
        "  click outside  Back to list",
        "",
        "  ?              Toggle help",
        "  q              Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
