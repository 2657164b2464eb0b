use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::avatar::probe_image;
use crate::config::Config;
use crate::http_client::http_client;
use crate::loader;
use crate::state::{Delta, ProviderCommand};

/// Loads the results document once, then serves avatar lookups until the UI
/// hangs up.
pub fn spawn_loader(config: Config, tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let _ = tx.send(Delta::Log(format!("[INFO] Loading {}", config.source)));
        match loader::load(&config.source, config.request_timeout) {
            Ok(doc) => {
                let unknown: usize = doc
                    .players
                    .iter()
                    .map(|p| p.unrecognized_tiers().len())
                    .sum();
                if unknown > 0 {
                    let _ = tx.send(Delta::Log(format!(
                        "[WARN] {unknown} unknown tier labels treated as untested"
                    )));
                }
                if tx.send(Delta::Loaded(doc)).is_err() {
                    return;
                }
            }
            Err(err) => {
                log::error!("load failed: {err}");
                if tx.send(Delta::LoadFailed(err.to_string())).is_err() {
                    return;
                }
            }
        }

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::ResolveAvatar { uuid } => {
                    let resolution = match http_client(config.request_timeout) {
                        Ok(client) => config
                            .avatars
                            .resolve_body(&uuid, |url| probe_image(client, url)),
                        Err(err) => {
                            let _ = tx.send(Delta::Log(format!(
                                "[WARN] Avatar lookup unavailable: {err}"
                            )));
                            config.avatars.resolve_body(&uuid, |_| false)
                        }
                    };
                    if tx.send(Delta::AvatarResolved { uuid, resolution }).is_err() {
                        return;
                    }
                }
            }
        }
    });
}
