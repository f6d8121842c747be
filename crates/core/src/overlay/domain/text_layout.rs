/// Pixel width of rendered text, abstracted so layout runs without fonts.
pub trait TextMeasure {
    fn text_width(&self, text: &str, scale: f32) -> u32;
}

/// Lines fitted below this many characters are never shortened further.
pub const MIN_FITTED_CHARS: usize = 10;

const ELLIPSIS: &str = "...";

/// Greedy word wrap into lines of at most `max_chars` characters.
///
/// Words longer than a whole line are split across lines.
pub fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let word: String = word.into_iter().collect();
        let needed = current.chars().count() + usize::from(!current.is_empty()) + word.chars().count();
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Cuts text longer than `max_chars` to `max_chars - 3` characters plus `...`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Shortens `text` four characters at a time (re-appending `...`) until it
/// fits `max_width` pixels or reaches [`MIN_FITTED_CHARS`].
pub fn fit_to_width(text: &str, scale: f32, max_width: u32, measure: &dyn TextMeasure) -> String {
    let mut fitted = text.to_string();
    loop {
        let chars = fitted.chars().count();
        if measure.text_width(&fitted, scale) <= max_width || chars <= MIN_FITTED_CHARS {
            return fitted;
        }
        let keep = chars.saturating_sub(4);
        fitted = fitted.chars().take(keep).collect();
        fitted.push_str(ELLIPSIS);
    }
}
