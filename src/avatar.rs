use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;

pub const DEFAULT_AVATAR_URL: &str = "https://mc-heads.net/avatar/{uuid}";
pub const DEFAULT_BODY_URL: &str = "https://mc-heads.net/body/{uuid}";
pub const DEFAULT_BODY_FALLBACK_URL: &str = "https://crafatar.com/renders/body/{uuid}";
pub const DEFAULT_PLACEHOLDER_URL: &str = "https://mc-heads.net/body/MHF_Steve";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarConfig {
    pub avatar_template: String,
    pub body_template: String,
    pub body_fallback_template: String,
    pub placeholder_url: String,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            avatar_template: DEFAULT_AVATAR_URL.to_string(),
            body_template: DEFAULT_BODY_URL.to_string(),
            body_fallback_template: DEFAULT_BODY_FALLBACK_URL.to_string(),
            placeholder_url: DEFAULT_PLACEHOLDER_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarSource {
    Primary,
    Fallback,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarResolution {
    pub url: String,
    pub source: AvatarSource,
}

impl AvatarConfig {
    pub fn avatar_url(&self, uuid: &str) -> String {
        fill(&self.avatar_template, uuid).unwrap_or_else(|| self.placeholder_url.clone())
    }

    pub fn body_url(&self, uuid: &str) -> String {
        fill(&self.body_template, uuid).unwrap_or_else(|| self.placeholder_url.clone())
    }

    /// Tries the primary body endpoint, then the alternate one, then the placeholder.
    pub fn resolve_body(&self, uuid: &str, mut probe: impl FnMut(&str) -> bool) -> AvatarResolution {
        let candidates = [
            (AvatarSource::Primary, &self.body_template),
            (AvatarSource::Fallback, &self.body_fallback_template),
        ];
        for (source, template) in candidates {
            let Some(url) = fill(template, uuid) else {
                continue;
            };
            if probe(&url) {
                return AvatarResolution { url, source };
            }
        }
        AvatarResolution {
            url: self.placeholder_url.clone(),
            source: AvatarSource::Placeholder,
        }
    }
}

pub fn source_label(source: AvatarSource) -> &'static str {
    match source {
        AvatarSource::Primary => "primary",
        AvatarSource::Fallback => "alternate",
        AvatarSource::Placeholder => "placeholder",
    }
}

/// HEAD request; any transport error or non-2xx status counts as unavailable.
pub fn probe_image(client: &Client, url: &str) -> bool {
    client
        .head(url)
        .header(USER_AGENT, "Mozilla/5.0")
        .send()
        .map(|resp| resp.status().is_success())
        .unwrap_or(false)
}

fn fill(template: &str, uuid: &str) -> Option<String> {
    let uuid = uuid.trim();
    if template.trim().is_empty() || !is_url_safe_uuid(uuid) {
        return None;
    }
    Some(template.replace("{uuid}", uuid))
}

fn is_url_safe_uuid(uuid: &str) -> bool {
    !uuid.is_empty()
        && uuid
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
