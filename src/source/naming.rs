use std::path::Path;
use url::Url;

/// Display name derived from a playlist URL: the site's second-level label,
/// capitalized, plus the last path segment unless it is the playlist file.
pub fn name_from_url(source: &str) -> String {
    let Ok(url) = Url::parse(source) else {
        return source
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("Playlist")
            .to_string();
    };

    let mut name = String::new();

    if let Some(host) = url.host_str() {
        let labels: Vec<&str> = host.split('.').collect();
        if labels.len() >= 2 {
            name = capitalize(labels[labels.len() - 2]);
        }
    }

    let last_segment = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last());

    if let Some(segment) = last_segment.filter(|s| !s.ends_with(".m3u") && !s.ends_with(".m3u8")) {
        if !name.is_empty() {
            name.push_str(" - ");
        }
        name.push_str(segment);
    }

    name
}

/// File name of a local playlist path.
pub fn name_from_path(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("Local Playlist")
        .to_string()
}

/// `"Playlist <n>"` when `name` came out empty.
pub fn or_numbered(name: String, position: usize) -> String {
    if name.trim().is_empty() {
        format!("Playlist {}", position)
    } else {
        name
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
