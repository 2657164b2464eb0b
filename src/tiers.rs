/// Tier labels in rank order. Position 0 is the best tier.
pub const TIER_RANKS: [Tier; 10] = [
    Tier::Ht1,
    Tier::Lt1,
    Tier::Ht2,
    Tier::Lt2,
    Tier::Ht3,
    Tier::Lt3,
    Tier::Ht4,
    Tier::Lt4,
    Tier::Ht5,
    Tier::Lt5,
];

pub const MAX_TIER_POINTS: u32 = 50;
pub const TIER_POINTS_STEP: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    Ht1,
    Lt1,
    Ht2,
    Lt2,
    Ht3,
    Lt3,
    Ht4,
    Lt4,
    Ht5,
    Lt5,
}

impl Tier {
    /// Accepts `HT1`..`LT5`, ignoring surrounding whitespace and ASCII case.
    pub fn parse(raw: &str) -> Option<Tier> {
        let cleaned = raw.trim();
        TIER_RANKS
            .iter()
            .copied()
            .find(|tier| tier.label().eq_ignore_ascii_case(cleaned))
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Ht1 => "HT1",
            Tier::Lt1 => "LT1",
            Tier::Ht2 => "HT2",
            Tier::Lt2 => "LT2",
            Tier::Ht3 => "HT3",
            Tier::Lt3 => "LT3",
            Tier::Ht4 => "HT4",
            Tier::Lt4 => "LT4",
            Tier::Ht5 => "HT5",
            Tier::Lt5 => "LT5",
        }
    }

    pub fn rank_position(self) -> usize {
        self as usize
    }

    pub fn points(self) -> u32 {
        MAX_TIER_POINTS.saturating_sub(TIER_POINTS_STEP * self.rank_position() as u32)
    }

    pub fn is_high(self) -> bool {
        matches!(
            self,
            Tier::Ht1 | Tier::Ht2 | Tier::Ht3 | Tier::Ht4 | Tier::Ht5
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gamemode {
    Crystal,
    Beast,
    Diapot,
    Nethpot,
    Mace,
    Uhc,
    Sword,
}

pub const GAMEMODES: [Gamemode; 7] = [
    Gamemode::Crystal,
    Gamemode::Beast,
    Gamemode::Diapot,
    Gamemode::Nethpot,
    Gamemode::Mace,
    Gamemode::Uhc,
    Gamemode::Sword,
];

impl Gamemode {
    /// Key used in the results document.
    pub fn key(self) -> &'static str {
        match self {
            Gamemode::Crystal => "crystal",
            Gamemode::Beast => "beast",
            Gamemode::Diapot => "diapot",
            Gamemode::Nethpot => "nethpot",
            Gamemode::Mace => "mace",
            Gamemode::Uhc => "uhc",
            Gamemode::Sword => "sword",
        }
    }

    pub fn from_key(raw: &str) -> Option<Gamemode> {
        let cleaned = raw.trim();
        GAMEMODES
            .iter()
            .copied()
            .find(|gm| gm.key().eq_ignore_ascii_case(cleaned))
    }

    pub fn label(self) -> &'static str {
        match self {
            Gamemode::Crystal => "Crystal",
            Gamemode::Beast => "Beast",
            Gamemode::Diapot => "DiaPot",
            Gamemode::Nethpot => "NethPot",
            Gamemode::Mace => "Mace",
            Gamemode::Uhc => "UHC",
            Gamemode::Sword => "Sword",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Gamemode::Crystal => "🔮",
            Gamemode::Beast => "👹",
            Gamemode::Diapot => "💎",
            Gamemode::Nethpot => "🌋",
            Gamemode::Mace => "🔨",
            Gamemode::Uhc => "⚔️",
            Gamemode::Sword => "🗡️",
        }
    }
}

/// Leaderboard view: the aggregate over all gamemodes, or a single gamemode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Overall,
    Gamemode(Gamemode),
}

/// Tab order.
pub const MODES: [Mode; 8] = [
    Mode::Overall,
    Mode::Gamemode(Gamemode::Crystal),
    Mode::Gamemode(Gamemode::Beast),
    Mode::Gamemode(Gamemode::Diapot),
    Mode::Gamemode(Gamemode::Nethpot),
    Mode::Gamemode(Gamemode::Mace),
    Mode::Gamemode(Gamemode::Uhc),
    Mode::Gamemode(Gamemode::Sword),
];

impl Mode {
    pub fn parse(raw: &str) -> Option<Mode> {
        if raw.trim().eq_ignore_ascii_case("overall") {
            return Some(Mode::Overall);
        }
        Gamemode::from_key(raw).map(Mode::Gamemode)
    }

    pub fn key(self) -> &'static str {
        match self {
            Mode::Overall => "overall",
            Mode::Gamemode(gm) => gm.key(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Overall => "Overall",
            Mode::Gamemode(gm) => gm.label(),
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Mode::Overall => "📊",
            Mode::Gamemode(gm) => gm.icon(),
        }
    }

    pub fn tab_index(self) -> usize {
        MODES.iter().position(|m| *m == self).unwrap_or(0)
    }

    pub fn next(self) -> Mode {
        MODES[(self.tab_index() + 1) % MODES.len()]
    }

    pub fn prev(self) -> Mode {
        let idx = self.tab_index();
        if idx == 0 {
            MODES[MODES.len() - 1]
        } else {
            MODES[idx - 1]
        }
    }
}
