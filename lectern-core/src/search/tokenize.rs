use unicode_segmentation::UnicodeSegmentation;

/// English stop words, kept sorted for binary search.
const STOP_WORDS: &[&str] = &[
    "a", "able", "about", "across", "after", "all", "almost", "also", "am", "among", "an", "and",
    "any", "are", "as", "at", "be", "because", "been", "but", "by", "can", "cannot", "could",
    "dear", "did", "do", "does", "either", "else", "ever", "every", "for", "from", "get", "got",
    "had", "has", "have", "he", "her", "hers", "him", "his", "how", "however", "i", "if", "in",
    "into", "is", "it", "its", "just", "least", "let", "like", "likely", "may", "me", "might",
    "most", "must", "my", "neither", "no", "nor", "not", "of", "off", "often", "on", "only", "or",
    "other", "our", "own", "rather", "said", "say", "says", "she", "should", "since", "so",
    "some", "than", "that", "the", "their", "them", "then", "there", "these", "they", "this",
    "tis", "to", "too", "twas", "us", "wants", "was", "we", "were", "what", "when", "where",
    "which", "while", "who", "whom", "why", "will", "with", "would", "yet", "you", "your",
];

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.binary_search(&word).is_ok()
}

/// Split text into lowercase index terms, dropping stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.unicode_words()
        .map(str::to_lowercase)
        .filter(|w| !w.is_empty() && !is_stop_word(w))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    /// Cases shared with the browser script's tokenizer
    const SHARED_CASES: &str = include_str!("../../tests/fixtures/tokenizer.json");

    #[derive(Deserialize)]
    struct Case {
        input: String,
        tokens: Vec<String>,
    }

    #[test]
    fn tokenize_matches_shared_cases() {
        let cases: Vec<Case> = serde_json::from_str(SHARED_CASES).unwrap();
        assert!(!cases.is_empty());
        for case in cases {
            assert_eq!(tokenize(&case.input), case.tokens, "input {:?}", case.input);
        }
    }

    #[test]
    fn stop_words_are_sorted() {
        assert!(STOP_WORDS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn tokenize_lowercases_and_drops_punctuation() {
        assert_eq!(
            tokenize("Configuring the Preview-Server, quickly!"),
            vec!["configuring", "preview", "server", "quickly"]
        );
    }

    #[test]
    fn tokenize_handles_unicode_words() {
        assert_eq!(tokenize("Überblick: Größe"), vec!["überblick", "größe"]);
    }

    #[test]
    fn stop_word_only_text_yields_nothing() {
        assert!(tokenize("to be or not to be").is_empty());
        assert!(tokenize("   ").is_empty());
    }
}
