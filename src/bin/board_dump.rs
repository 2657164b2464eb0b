use anyhow::{Context, Result, anyhow};

use tierlist_terminal::config::Config;
use tierlist_terminal::loader;
use tierlist_terminal::state::{apply_delta, AppState, Delta};
use tierlist_terminal::tiers::Mode;
use tierlist_terminal::view::{self, TextSurface};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = Config::load().with_source_arg(args.next());
    let mode = match args.next() {
        Some(raw) => Mode::parse(&raw).ok_or_else(|| anyhow!("unknown mode {raw:?}"))?,
        None => Mode::Overall,
    };
    let query = args.collect::<Vec<_>>().join(" ");

    let doc = loader::load(&config.source, config.request_timeout)
        .with_context(|| format!("loading {}", config.source))?;

    let mut state = AppState::new(config.avatars.clone());
    apply_delta(&mut state, Delta::Loaded(doc));
    state.set_mode(mode);
    state.set_query(query);
    // Show the leader's card under the table, as the TUI would after Enter.
    let _ = state.open_selected();

    let mut surface = TextSurface::new();
    view::present(&mut surface, &state);
    print!("{}", surface.into_string());
    Ok(())
}
