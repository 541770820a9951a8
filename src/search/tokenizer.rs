use deunicode::deunicode;
use regex::Regex;
use std::sync::LazyLock;

// Apostrophes used like quotation marks, e.g. "The 'one' word" or
// "'One' is a word", get removed. Apostrophes inside a word like
// "they're" or "o'clock" stay, so the word survives as one token.
static QUOTE_APOSTROPHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\B'|'\B").expect("quote apostrophe pattern"));

static JUNK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\[\](){}".?!,:;-]"#).expect("junk pattern"));

/// Normalize text into lowercase tokens, in order. When a token has an
/// ASCII transliteration that differs from it, the transliteration is
/// appended after the base tokens and the second return value is true;
/// the planner uses that flag to skip completed-word marking, since the
/// appended terms perturb the token sequence.
pub fn clean_words(text: &str) -> (Vec<String>, bool) {
    let stripped = QUOTE_APOSTROPHES.replace_all(text, "");
    let spaced = JUNK.replace_all(&stripped, " ");
    let mut terms: Vec<String> = spaced
        .split_whitespace()
        .map(|fragment| fragment.trim_matches(' ').trim_matches('.').to_lowercase())
        .collect();

    let mut expanded = false;
    for i in 0..terms.len() {
        let ascii = deunicode(&terms[i]);
        if ascii != terms[i] {
            terms.push(ascii);
            expanded = true;
        }
    }
    (terms, expanded)
}

/// Every searchable form of every token of `title`: the strict character
/// prefixes, the token itself, and the token closed with the `$` sentinel
/// marking it as a completed word. Duplicates are allowed; the sorted-set
/// writes downstream absorb them.
pub fn prefixes(title: &str) -> Vec<String> {
    let (words, _) = clean_words(title);
    let mut prefixes = Vec::new();
    for word in &words {
        for (i, _) in word.char_indices() {
            if i > 0 {
                prefixes.push(word[..i].to_string());
            }
        }
        prefixes.push(word.clone());
        prefixes.push(format!("{}$", word));
    }
    prefixes
}
