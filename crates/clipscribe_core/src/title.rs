use url::Url;

/// Longest artifact filename (stem plus extension) kept as is, in characters.
pub const MAX_FILENAME_CHARS: usize = 25;
/// Stem length that over-long names are cut down to, in characters.
pub const TRUNCATED_STEM_CHARS: usize = 20;
pub const ARTIFACT_EXTENSION: &str = "md";

const CODE_FENCE: &str = "```";
const LEADING_MARKUP: &[char] = &['*', '#', '>', '-', ' '];
const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Pull a human title out of generated Markdown.
///
/// The first level-one heading wins. Without one, the first non-empty line
/// that is not a code fence is used with its leading markup stripped.
pub fn extract_title(content: Option<&str>) -> Option<String> {
    let content = content?;

    if let Some(title) = content.lines().find_map(heading_text) {
        return Some(title.to_string());
    }

    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with(CODE_FENCE))
        .map(|line| line.trim_start_matches(LEADING_MARKUP).trim())
        .filter(|title| !title.is_empty())
        .map(ToOwned::to_owned)
}

fn heading_text(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('#')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let title = rest.trim();
    (!title.is_empty()).then_some(title)
}

/// Replace characters that filesystems reject with `_`, then trim.
pub fn sanitize_filename(input: &str) -> String {
    input
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Name used when the generated text carries no usable title:
/// `Video_{v}` from the URL's `v` query parameter, or `Video_unknown`.
pub fn fallback_stem(url: &str) -> String {
    let video_id = video_id(url).unwrap_or_else(|| "unknown".to_string());
    format!("Video_{video_id}")
}

fn video_id(url: &str) -> Option<String> {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty()),
        Err(_) => scan_video_param(url),
    }
}

/// Loose `[?&]v=` lookup for strings that are not valid absolute URLs.
fn scan_video_param(raw: &str) -> Option<String> {
    let mut rest = raw;
    while let Some(idx) = rest.find("v=") {
        let preceded_by_separator = rest[..idx].ends_with(&['?', '&'][..]);
        let after = &rest[idx + 2..];
        if preceded_by_separator {
            let value = after.split('&').next().unwrap_or_default();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
        rest = after;
    }
    None
}

/// Append the extension, cutting the stem when the whole name is too long.
pub fn bounded_filename(stem: &str) -> String {
    let name = format!("{stem}.{ARTIFACT_EXTENSION}");
    if name.chars().count() <= MAX_FILENAME_CHARS {
        return name;
    }
    let cut: String = stem.chars().take(TRUNCATED_STEM_CHARS).collect();
    format!("{}.{ARTIFACT_EXTENSION}", cut.trim_end())
}

/// `{stem}-{suffix}.md`, with the stem cut so the whole name still fits in
/// `MAX_FILENAME_CHARS`.
pub fn suffixed_filename(stem: &str, suffix: &str) -> String {
    let reserved = suffix.chars().count() + 1 + ARTIFACT_EXTENSION.len() + 1;
    let room = MAX_FILENAME_CHARS.saturating_sub(reserved);
    let cut: String = stem.chars().take(room).collect();
    let cut = cut.trim_end();
    if cut.is_empty() {
        format!("{suffix}.{ARTIFACT_EXTENSION}")
    } else {
        format!("{cut}-{suffix}.{ARTIFACT_EXTENSION}")
    }
}

/// Full derivation: title (or URL fallback) -> sanitized -> length bounded.
pub fn derive_filename(content: Option<&str>, url: &str) -> String {
    let stem = extract_title(content)
        .map(|title| sanitize_filename(&title))
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| sanitize_filename(&fallback_stem(url)));
    bounded_filename(&stem)
}

#[cfg(test)]
mod tests {
    use super::{heading_text, scan_video_param};

    #[test]
    fn heading_requires_whitespace_after_marker() {
        assert_eq!(heading_text("# Title"), Some("Title"));
        assert_eq!(heading_text("#Title"), None);
        assert_eq!(heading_text("## Sub"), None);
        assert_eq!(heading_text("#   "), None);
    }

    #[test]
    fn scan_finds_parameter_after_separator_only() {
        assert_eq!(scan_video_param("watch?v=abc&t=1"), Some("abc".into()));
        assert_eq!(scan_video_param("watch?x=1&v=def"), Some("def".into()));
        assert_eq!(scan_video_param("dev=1"), None);
        assert_eq!(scan_video_param("watch?v="), None);
    }
}
