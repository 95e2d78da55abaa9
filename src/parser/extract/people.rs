use std::sync::LazyLock;

use regex::Regex;

use crate::parser::sections::{bullet_lines, find_section};

static OWNER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+?)\s<(.+?)>").unwrap());

/// `(name, id)` pairs from `Name <id>` bullets; other lines are dropped whole.
pub fn owners(text: &str, heading: &str) -> Vec<(String, String)> {
    let Some(body) = find_section(text, heading) else {
        return Vec::new();
    };
    bullet_lines(body)
        .filter_map(|line| {
            let caps = OWNER_RE.captures(line)?;
            Some((caps[1].trim().to_string(), caps[2].trim().to_string()))
        })
        .collect()
}

pub fn authors(text: &str, heading: &str) -> Vec<String> {
    find_section(text, heading)
        .map(|body| bullet_lines(body).map(str::to_string).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_pairs() {
        let md = "## Document Owner\n- Jane Doe <jdoe>\n- Jean-Luc Picard <jl.picard@corp.example>\n";
        let o = owners(md, "Document Owner");
        assert_eq!(
            o,
            vec![
                ("Jane Doe".to_string(), "jdoe".to_string()),
                ("Jean-Luc Picard".to_string(), "jl.picard@corp.example".to_string()),
            ]
        );
    }

    #[test]
    fn unmatched_owner_lines_dropped() {
        let md = "## Document Owner\n- Nobody Special\n- Ann <a1>\n";
        let o = owners(md, "Document Owner");
        assert_eq!(o, vec![("Ann".to_string(), "a1".to_string())]);
    }

    #[test]
    fn missing_owner_section() {
        assert!(owners("## Author/Contributors\n- X", "Document Owner").is_empty());
    }

    #[test]
    fn author_lines() {
        let md = "## Author/Contributors\n- Alice\n\n- Bob Smith\n## Next\n- Not an author";
        assert_eq!(authors(md, "Author/Contributors"), vec!["Alice", "Bob Smith"]);
    }
}
