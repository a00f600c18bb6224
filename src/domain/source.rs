//! Classification of user supplied source urls

use url::Url;

use super::item::ItemId;

const HOST_PREFIXES: &[&str] = &["www.", "m.", "music."];

/// What a source url points to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceUrl {
    /// A playlist, listed by the retriever to get its items
    Collection(String),
    /// A single video, its id taken from the url itself
    Single(ItemId),
}

impl SourceUrl {
    /// Recognises playlist urls, watch urls and short links.
    ///
    /// Returns `None` for anything else, including text that is not a url.
    pub fn classify(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let normalized = if raw.contains("://") {
            raw.to_string()
        } else {
            format!("https://{raw}")
        };

        let url = Url::parse(&normalized).ok()?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return None;
        }

        let host = url.host_str()?.to_lowercase();
        let host = strip_host_prefixes(&host);
        let path = url.path().trim_end_matches('/').to_lowercase();

        match host {
            "youtube.com" if path == "/playlist" => Some(Self::Collection(normalized)),
            "youtube.com" if path == "/watch" => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .and_then(|(_, id)| ItemId::new(&id))
                .map(Self::Single),
            "youtu.be" => url
                .path_segments()?
                .next()
                .and_then(ItemId::new)
                .map(Self::Single),
            _ => None,
        }
    }
}

fn strip_host_prefixes(host: &str) -> &str {
    HOST_PREFIXES
        .iter()
        .find_map(|prefix| host.strip_prefix(prefix))
        .unwrap_or(host)
}
