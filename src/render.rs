//! Status Rendering
//!
//! Turns a status into the plain chat lines the bridge prints for it.

use crate::cache::ShortKey;
use crate::models::StatusRecord;

/// Lines announcing `status` under `key`, each starting with `prefix`.
///
/// Layout: author and time, the tag-stripped body, one line per media
/// attachment, then the key with the permalink.
pub fn status_lines(status: &StatusRecord, key: &ShortKey, prefix: &str) -> Vec<String> {
    let mut lines = Vec::with_capacity(3 + status.media_attachments.len());

    lines.push(format!(
        "{prefix}By: {} At: {}",
        status.account.acct,
        status.created_at.to_rfc3339()
    ));
    lines.push(format!("{prefix}{}", strip_tags(&status.content)));
    // Media links of restricted posts aren't restricted, so these always work.
    for media in &status.media_attachments {
        lines.push(format!("{prefix}Media: {}", media.url));
    }
    lines.push(key_line(key, &status.url, prefix));

    lines
}

/// `[key] url`, the line that tells chat users how to refer to a status.
pub fn key_line(key: &ShortKey, url: &str, prefix: &str) -> String {
    format!("{prefix}[{key}] {url}")
}

/// Drops markup and decodes the entities instances emit.
///
/// Line breaks and paragraph ends become spaces so a status stays on one
/// chat line.
pub fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut tag = String::new();
    let mut in_tag = false;

    for ch in html.chars() {
        match ch {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                let closing = tag.starts_with('/');
                let name = tag
                    .trim_start_matches('/')
                    .split(|c: char| c.is_whitespace() || c == '/')
                    .next()
                    .unwrap_or_default()
                    .to_ascii_lowercase();
                let breaks = name == "br" || (closing && name == "p");
                if breaks && !text.ends_with(' ') {
                    text.push(' ');
                }
            }
            _ if in_tag => tag.push(ch),
            _ => text.push(ch),
        }
    }

    decode_html_entities(text.trim())
}

/// Single pass, so an escaped `&amp;lt;` decodes to `&lt;` and no further.
fn decode_html_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let decoded = tail
            .find(';')
            .filter(|&end| end <= MAX_ENTITY_LEN)
            .and_then(|end| decode_entity(&tail[1..end]).map(|ch| (ch, end)));
        match decoded {
            Some((ch, end)) => {
                out.push(ch);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Longest reference between `&` and `;` worth looking at (`#x10FFFF`).
const MAX_ENTITY_LEN: usize = 9;

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
