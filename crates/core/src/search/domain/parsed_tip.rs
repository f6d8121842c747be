pub const DEFAULT_NAME: &str = "Unknown";
pub const DEFAULT_OVERVIEW: &str = "No identifiable personal information found.";

const TIPS_HEADER: &str = "Tips for socializing";
const MIN_LOOSE_TIP_CHARS: usize = 4;

/// A snippet split into the parts the overlay panel shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedTip {
    pub name: String,
    pub overview: String,
    pub tips: Vec<String>,
}

impl ParsedTip {
    /// Best-effort parse of `Name:` / `Overview:` lines followed by a
    /// bulleted tip list.
    ///
    /// Bullets may start with `•`, `-`, `*` or a number (`1.` / `1)`).
    /// When no bullet lines exist, every other non-empty line becomes a tip.
    pub fn parse(snippet: &str) -> Self {
        let mut name = None;
        let mut overview = None;
        let mut bullets = Vec::new();
        let mut loose = Vec::new();

        for raw in snippet.lines() {
            let cleaned = raw.replace("???", "").replace("**", "");
            let line = cleaned.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(rest) = line.strip_prefix("Name:") {
                name = non_empty(rest);
                continue;
            }
            if let Some(rest) = line.strip_prefix("Overview:") {
                overview = non_empty(rest);
                continue;
            }
            if line.contains(TIPS_HEADER) {
                continue;
            }
            match strip_bullet(line) {
                Some(tip) if !tip.is_empty() => bullets.push(tip.to_string()),
                Some(_) => {}
                None => loose.push(line.to_string()),
            }
        }

        let tips = if bullets.is_empty() {
            loose
                .into_iter()
                .filter(|l| l.chars().count() >= MIN_LOOSE_TIP_CHARS)
                .collect()
        } else {
            bullets
        };

        Self {
            name: name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
            overview: overview.unwrap_or_else(|| DEFAULT_OVERVIEW.to_string()),
            tips,
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn strip_bullet(line: &str) -> Option<&str> {
    for marker in ["•", "-", "*"] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Some(rest.trim());
        }
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = &line[digits..];
    rest.strip_prefix('.')
        .or_else(|| rest.strip_prefix(')'))
        .map(str::trim)
}
