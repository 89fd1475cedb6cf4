// Cleans scraped post text before it is embedded in a completion prompt.

use crate::error::AppError;

// Character budget for a prompt body and for outgoing replies.
pub const CHAR_BUDGET: usize = 280;

// Word cap applied to generated replies.
pub const REPLY_WORD_CAP: usize = 20;

// Collapses every line break and whitespace run to a single space, drops
// control characters and trims both ends.
// `char::is_whitespace` covers `\r`, `\n`, `\t` and the Unicode line and
// paragraph separators, so `\r\n` folds into the same run as any other gap.
pub fn normalize_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;

    for ch in input.chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if ch.is_control() {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(ch);
    }

    out
}

// Cuts `text` to at most `budget` characters. A cut that lands inside a word
// backs up to the previous space, unless that space sits before the middle
// of the budget, in which case the hard cut is kept.
pub fn truncate_at_word_boundary(text: &str, budget: usize) -> String {
    let Some((cut_byte, next)) = text.char_indices().nth(budget) else {
        return text.to_string();
    };

    let head = &text[..cut_byte];
    if next.is_whitespace() {
        return head.trim_end().to_string();
    }

    match head.rfind(' ') {
        Some(space) if head[..space].chars().count() >= budget / 2 => {
            head[..space].trim_end().to_string()
        }
        _ => head.to_string(),
    }
}

// Keeps the first `cap` words. Text already within the cap is returned as is.
pub fn cap_words(text: &str, cap: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= cap {
        return text.to_string();
    }
    words[..cap].join(" ")
}

// Builds the user message for a reply prompt:
// `"Tweet by {handle}:\n{body}"`, or just the body when no handle is known.
pub fn prompt_body(tweet_text: &str, author_handle: Option<&str>) -> Result<String, AppError> {
    let body = truncate_at_word_boundary(&normalize_text(tweet_text), CHAR_BUDGET);
    if body.is_empty() {
        return Err(AppError::EmptyInput);
    }

    let handle = author_handle.map(normalize_text).unwrap_or_default();
    if handle.is_empty() {
        Ok(body)
    } else {
        Ok(format!("Tweet by {}:\n{}", handle, body))
    }
}

// First `max` characters, never splitting a code point.
pub fn take_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_line_breaks_and_whitespace() {
        let input = "  first\r\nsecond\rthird\nfourth\u{2028}fifth\u{2029}sixth \t\t seventh  ";
        assert_eq!(
            normalize_text(input),
            "first second third fourth fifth sixth seventh"
        );
    }

    #[test]
    fn strips_control_characters() {
        let input = "gm\u{0007} frens\u{0000}\n\u{001b}wagmi";
        let out = normalize_text(input);
        assert_eq!(out, "gm frens wagmi");
        assert!(!out.chars().any(char::is_control));
    }

    #[test]
    fn mixed_noise_leaves_no_breaks_or_double_spaces() {
        let input = "a\n\n\nb\r\n\r\nc \u{0001} \u{0002} d\t\u{000b}e";
        let out = normalize_text(input);
        assert!(!out.contains('\n') && !out.contains('\r'));
        assert!(!out.contains("  "));
        assert!(!out.chars().any(char::is_control));
        assert_eq!(out, "a b c d e");
    }

    #[test]
    fn empty_input_normalizes_to_empty() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(" \n\r\t\u{0003} "), "");
    }

    #[test]
    fn truncation_backs_up_to_space_past_midpoint() {
        // 400 chars of ten-letter words separated by spaces
        let word = "abcdefghij";
        let input = vec![word; 40].join(" ");
        assert!(input.chars().count() > 400);

        let out = truncate_at_word_boundary(&input, CHAR_BUDGET);
        assert!(out.chars().count() <= CHAR_BUDGET);
        assert!(out.chars().count() >= CHAR_BUDGET / 2);
        assert!(out.ends_with(word));
        assert!(input.starts_with(&out));
        assert_eq!(input[out.len()..].chars().next(), Some(' '));
    }

    #[test]
    fn truncation_keeps_hard_cut_without_late_space() {
        let input = format!("short {}", "x".repeat(394));
        assert_eq!(input.chars().count(), 400);

        let out = truncate_at_word_boundary(&input, CHAR_BUDGET);
        assert_eq!(out.chars().count(), CHAR_BUDGET);
        assert!(input.starts_with(&out));
    }

    #[test]
    fn truncation_at_word_end_is_clean() {
        let input = format!("{} tail", "y".repeat(CHAR_BUDGET));
        assert_eq!(truncate_at_word_boundary(&input, CHAR_BUDGET), "y".repeat(CHAR_BUDGET));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let input = "é".repeat(300);
        let out = truncate_at_word_boundary(&input, CHAR_BUDGET);
        assert_eq!(out.chars().count(), CHAR_BUDGET);
    }

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_at_word_boundary("gm", CHAR_BUDGET), "gm");
    }

    #[test]
    fn caps_thirty_words_to_twenty_in_order() {
        let words: Vec<String> = (1..=30).map(|i| format!("w{}", i)).collect();
        let out = cap_words(&words.join(" "), REPLY_WORD_CAP);
        let kept: Vec<&str> = out.split(' ').collect();
        assert_eq!(kept.len(), 20);
        assert_eq!(kept.first(), Some(&"w1"));
        assert_eq!(kept.last(), Some(&"w20"));
    }

    #[test]
    fn word_cap_leaves_short_replies_alone() {
        assert_eq!(cap_words("ngmi ser", REPLY_WORD_CAP), "ngmi ser");
    }

    #[test]
    fn prompt_body_puts_newline_only_after_prefix() {
        let prompt = prompt_body("gm frens\nwho's buying the dip", Some("@user")).unwrap();
        assert_eq!(prompt, "Tweet by @user:\ngm frens who's buying the dip");
        assert_eq!(prompt.matches('\n').count(), 1);
    }

    #[test]
    fn prompt_body_without_handle() {
        assert_eq!(prompt_body("hello\nworld", None).unwrap(), "hello world");
        assert_eq!(prompt_body("hello", Some("  ")).unwrap(), "hello");
    }

    #[test]
    fn prompt_body_rejects_blank_text() {
        assert!(matches!(
            prompt_body("\n\r \u{0007}", Some("@user")),
            Err(AppError::EmptyInput)
        ));
    }

    #[test]
    fn take_chars_respects_code_points() {
        assert_eq!(take_chars("héllo", 2), "hé");
        assert_eq!(take_chars("hi", 10), "hi");
    }
}
