//! Publisher allow-listing and PDF fetching for URL-mode ingestion.

use url::Url;

/// `*` accepts any host. Otherwise a host is allowed when it equals an entry
/// or is a subdomain of one (`.entry` suffix). Non-http(s) URLs never pass.
pub fn host_allowed(raw_url: &str, allowlist: &[String]) -> bool {
    let Ok(parsed) = Url::parse(raw_url) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    allowlist.iter().any(|entry| {
        let entry = entry.trim().to_ascii_lowercase();
        !entry.is_empty()
            && (entry == "*" || host == entry || host.ends_with(&format!(".{entry}")))
    })
}

/// Download rulebook bytes. Bodies smaller than `min_bytes` are rejected as
/// error pages rather than PDFs.
pub async fn fetch_pdf(
    client: &reqwest::Client,
    url: &str,
    min_bytes: usize,
) -> anyhow::Result<Vec<u8>> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        anyhow::bail!("fetch failed with status {}", response.status());
    }
    let bytes = response.bytes().await?;
    if bytes.len() < min_bytes {
        anyhow::bail!("response too small to be a rulebook PDF ({} bytes)", bytes.len());
    }
    Ok(bytes.to_vec())
}

/// Derive `(game_id, title)` from the URL's final path segment.
pub fn identity_from_url(raw_url: &str) -> (String, String) {
    let file_name = Url::parse(raw_url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|segments| segments.last().map(str::to_string))
        })
        .filter(|segment| !segment.is_empty())
        .unwrap_or_else(|| "rulebook".to_string());

    let (id, title) = rulescout_text::naming::guess_title(&file_name);
    if id.is_empty() {
        ("rulebook".to_string(), title)
    } else {
        (id, title)
    }
}
