use std::collections::{HashMap, VecDeque};

use crate::avatar::{source_label, AvatarConfig, AvatarResolution};
use crate::error::NotFound;
use crate::ranking::leaderboard;
use crate::results::{Player, ResultsDocument};
use crate::tiers::Mode;
use crate::view::{build_detail, DetailView};

const LOG_CAPACITY: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    List,
    Detail { uuid: String },
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub mode: Mode,
    pub query: String,
    pub search_active: bool,
    pub selected: usize,
    pub doc: Option<ResultsDocument>,
    pub loading: bool,
    pub load_error: Option<String>,
    pub avatars: AvatarConfig,
    pub resolved_bodies: HashMap<String, AvatarResolution>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AvatarConfig::default())
    }
}

impl AppState {
    pub fn new(avatars: AvatarConfig) -> Self {
        Self {
            screen: Screen::List,
            mode: Mode::Overall,
            query: String::new(),
            search_active: false,
            selected: 0,
            doc: None,
            loading: true,
            load_error: None,
            avatars,
            resolved_bodies: HashMap::new(),
            logs: VecDeque::with_capacity(LOG_CAPACITY),
            help_overlay: false,
        }
    }

    /// Rows of the table as currently filtered, ranked and searched.
    pub fn visible_players(&self) -> Vec<&Player> {
        match &self.doc {
            Some(doc) => leaderboard(doc, self.mode, &self.query),
            None => Vec::new(),
        }
    }

    pub fn selected_player(&self) -> Option<&Player> {
        self.visible_players().get(self.selected).copied()
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.selected = 0;
    }

    pub fn next_mode(&mut self) {
        self.set_mode(self.mode.next());
    }

    pub fn prev_mode(&mut self) {
        self.set_mode(self.mode.prev());
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.clamp_selection();
    }

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
        self.clamp_selection();
    }

    pub fn pop_query_char(&mut self) {
        self.query.pop();
        self.clamp_selection();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.search_active = false;
        self.clamp_selection();
    }

    pub fn clamp_selection(&mut self) {
        let total = self.visible_players().len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    pub fn select_next(&mut self) {
        let total = self.visible_players().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.visible_players().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    /// `list -> detail` for the given player.
    pub fn open_detail(&mut self, uuid: &str) -> Result<(), NotFound> {
        let found = self
            .doc
            .as_ref()
            .and_then(|doc| doc.find_player(uuid))
            .is_some();
        if !found {
            return Err(NotFound {
                uuid: uuid.to_string(),
            });
        }
        let pos = self.visible_players().iter().position(|p| p.uuid == uuid);
        if let Some(pos) = pos {
            self.selected = pos;
        }
        self.search_active = false;
        self.screen = Screen::Detail {
            uuid: uuid.to_string(),
        };
        Ok(())
    }

    pub fn open_selected(&mut self) -> Result<String, NotFound> {
        let uuid = self
            .selected_player()
            .map(|p| p.uuid.clone())
            .ok_or_else(|| NotFound {
                uuid: String::new(),
            })?;
        self.open_detail(&uuid)?;
        Ok(uuid)
    }

    /// `detail -> list`.
    pub fn close_detail(&mut self) {
        self.screen = Screen::List;
    }

    pub fn detail_view(&self, uuid: &str) -> Result<DetailView, NotFound> {
        let Some(doc) = &self.doc else {
            return Err(NotFound {
                uuid: uuid.to_string(),
            });
        };
        let mut detail = build_detail(doc, uuid, &self.avatars)?;
        if let Some(resolved) = self.resolved_bodies.get(uuid) {
            detail.body_url = resolved.url.clone();
            detail.body_source = Some(resolved.source);
        }
        Ok(detail)
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        if self.logs.len() >= LOG_CAPACITY {
            self.logs.pop_front();
        }
        self.logs.push_back(msg.into());
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    Loaded(ResultsDocument),
    LoadFailed(String),
    AvatarResolved {
        uuid: String,
        resolution: AvatarResolution,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    ResolveAvatar { uuid: String },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Loaded(doc) => {
            let count = doc.players.len();
            state.doc = Some(doc);
            state.loading = false;
            state.load_error = None;
            state.clamp_selection();
            state.push_log(format!("[INFO] Loaded {count} players"));
        }
        Delta::LoadFailed(err) => {
            state.loading = false;
            state.push_log(format!("[ERROR] {err}"));
            state.load_error = Some(err);
        }
        Delta::AvatarResolved { uuid, resolution } => {
            state.push_log(format!(
                "[INFO] Skin for {uuid}: {}",
                source_label(resolution.source)
            ));
            state.resolved_bodies.insert(uuid, resolution);
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
