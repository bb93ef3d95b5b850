//! Language-agnostic tokenizer.
//!
//! Pipeline: case-fold → UAX #29 word segmentation → drop punctuation and
//! whitespace segments → strip intra-word punctuation. Runs of scripts that
//! are written without spaces (Han, kana, Thai, Lao, Khmer, Myanmar) are
//! emitted as overlapping unigrams and bigrams instead of words.
//! No stemming and no stop-word list.

use unicode_segmentation::UnicodeSegmentation;

/// Tokenize text into comparable terms, in input order.
///
/// # Example
///
/// ```
/// use polyglot_text::tokenizer::tokenize;
///
/// assert_eq!(tokenize("The Sky, is BLUE!"), vec!["the", "sky", "is", "blue"]);
/// assert_eq!(tokenize("富士山"), vec!["富", "富士", "士", "士山", "山"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let folded = fold_case(text);
    let mut tokens = Vec::new();
    let mut run: Vec<char> = Vec::new();

    for segment in folded.split_word_bounds() {
        if segment.chars().all(is_unspaced_script) {
            run.extend(segment.chars());
            continue;
        }
        flush_run(&mut run, &mut tokens);
        if segment.chars().any(char::is_alphanumeric) {
            let word: String = segment.chars().filter(|&c| !is_intra_word_punctuation(c)).collect();
            tokens.push(word);
        }
    }
    flush_run(&mut run, &mut tokens);
    tokens
}

/// Full Unicode case folding (`CaseFolding.txt`, statuses C and F).
pub fn fold_case(text: &str) -> String {
    caseless::default_case_fold_str(text)
}

fn flush_run(run: &mut Vec<char>, tokens: &mut Vec<String>) {
    for (i, &c) in run.iter().enumerate() {
        tokens.push(c.to_string());
        if let Some(&next) = run.get(i + 1) {
            tokens.push([c, next].iter().collect());
        }
    }
    run.clear();
}

fn is_unspaced_script(c: char) -> bool {
    matches!(c,
        '\u{0E00}'..='\u{0EFF}'     // Thai, Lao
        | '\u{1000}'..='\u{109F}'   // Myanmar
        | '\u{1780}'..='\u{17FF}'   // Khmer
        | '\u{3005}'                // 々
        | '\u{3040}'..='\u{30FF}'   // Hiragana, Katakana
        | '\u{31F0}'..='\u{31FF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{FF66}'..='\u{FF9F}'   // halfwidth katakana
        | '\u{20000}'..='\u{2FA1F}'
    )
}

/// Chars UAX #29 keeps inside a word segment that carry no lexical content.
fn is_intra_word_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || c.is_whitespace()
        || matches!(
            c,
            '\u{00AD}'
                | '\u{00B7}'
                | '\u{037E}'
                | '\u{0387}'
                | '\u{055F}'
                | '\u{0589}'
                | '\u{05F4}'
                | '\u{060C}'
                | '\u{060D}'
                | '\u{066C}'
                | '\u{07F8}'
                | '\u{200B}'..='\u{200D}'
                | '\u{2018}'
                | '\u{2019}'
                | '\u{2024}'
                | '\u{2027}'
                | '\u{203F}'
                | '\u{2040}'
                | '\u{2044}'
                | '\u{2054}'
                | '\u{2060}'
                | '\u{FE10}'
                | '\u{FE13}'
                | '\u{FE14}'
                | '\u{FE33}'
                | '\u{FE34}'
                | '\u{FE4D}'..='\u{FE4F}'
                | '\u{FE50}'
                | '\u{FE52}'
                | '\u{FE54}'
                | '\u{FE55}'
                | '\u{FEFF}'
                | '\u{FF07}'
                | '\u{FF0C}'
                | '\u{FF0E}'
                | '\u{FF1A}'
                | '\u{FF1B}'
                | '\u{FF3F}'
        )
}
