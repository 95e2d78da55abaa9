use std::sync::LazyLock;

use regex::Regex;

static FRONT_MATTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A\x{FEFF}?\s*---[ \t]*\r?\n(.*?)\r?\n---").unwrap());
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^title:[ \t]*(.*?)\s*$").unwrap());
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+?)\s*$").unwrap());
static OUTLINE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+(\.\d+)*\.?\s+").unwrap());

/// Title from the leading `---` front-matter block; empty when absent.
pub fn front_matter_title(text: &str) -> String {
    let Some(block) = FRONT_MATTER_RE.captures(text) else {
        return String::new();
    };
    TITLE_RE
        .captures(&block[1])
        .map(|c| unquote(c[1].trim()).to_string())
        .unwrap_or_default()
}

fn unquote(s: &str) -> &str {
    for q in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(q).and_then(|r| r.strip_suffix(q)) {
            return inner;
        }
    }
    s
}

/// Heading text with any leading outline number (`1.`, `2.2`) removed.
fn heading_title(line: &str) -> Option<String> {
    let caps = HEADING_RE.captures(line.trim())?;
    let text = OUTLINE_NUMBER_RE.replace(caps[2].trim(), "");
    Some(text.trim().to_lowercase())
}

/// Body of the first section whose heading reads `title`, up to the next
/// heading or end of document.
pub fn find_section<'a>(text: &'a str, title: &str) -> Option<&'a str> {
    let wanted = title.trim().to_lowercase();
    let mut offset = 0;
    let mut start: Option<usize> = None;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let Some(heading) = heading_title(line) else {
            continue;
        };
        match start {
            Some(s) => return Some(&text[s..line_start]),
            None if heading == wanted => start = Some(offset),
            None => {}
        }
    }

    start.map(|s| &text[s..])
}

/// Non-empty lines of a section with the bullet marker stripped.
pub fn bullet_lines(body: &str) -> impl Iterator<Item = &str> {
    body.lines()
        .map(|l| l.trim().trim_start_matches(['-', '*', '+']).trim())
        .filter(|l| !l.is_empty())
}
