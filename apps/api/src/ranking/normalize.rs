//! Text Normalizer — lowercases free text and blanks out every character
//! outside the allowed class before tokenization.

/// Characters that survive normalization. Everything else becomes a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// `[a-z0-9 ]` — resume bodies and job descriptions.
    Alphanumeric,
    /// `[a-z ]` — short skill lists.
    Alphabetic,
}

impl CharClass {
    fn keeps(self, c: char) -> bool {
        match self {
            CharClass::Alphanumeric => c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' ',
            CharClass::Alphabetic => c.is_ascii_lowercase() || c == ' ',
        }
    }
}

/// English stop words dropped from description-mode vocabularies.
/// Words that are meaningful on a resume ("system", "computer") are left out.
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "but", "by", "can", "cannot", "cant", "could", "couldnt", "do", "does",
    "done", "down", "due", "during", "each", "eg", "either", "else", "elsewhere", "enough",
    "etc", "even", "ever", "every", "everyone", "everything", "everywhere", "except", "few",
    "for", "former", "formerly", "from", "further", "get", "give", "had", "has", "hasnt",
    "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein", "hereupon", "hers",
    "herself", "him", "himself", "his", "how", "however", "i", "ie", "if", "in", "inc",
    "indeed", "into", "is", "it", "its", "itself", "just", "keep", "latter", "latterly",
    "least", "less", "ltd", "made", "many", "may", "me", "meanwhile", "might", "mine", "more",
    "moreover", "most", "mostly", "much", "must", "my", "myself", "namely", "neither", "never",
    "nevertheless", "next", "no", "nobody", "none", "noone", "nor", "not", "nothing", "now",
    "nowhere", "of", "off", "often", "on", "once", "only", "onto", "or", "other", "others",
    "otherwise", "our", "ours", "ourselves", "out", "over", "own", "per", "perhaps", "please",
    "put", "rather", "re", "same", "see", "seem", "seemed", "seeming", "seems", "several",
    "she", "should", "since", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "than", "that", "the", "their", "them",
    "themselves", "then", "thence", "there", "thereafter", "thereby", "therefore", "therein",
    "thereupon", "these", "they", "this", "those", "though", "through", "throughout", "thru",
    "thus", "to", "together", "too", "toward", "towards", "under", "until", "up", "upon", "us",
    "very", "via", "was", "we", "well", "were", "what", "whatever", "when", "whence",
    "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever",
    "whether", "which", "while", "whither", "who", "whoever", "whole", "whom", "whose", "why",
    "will", "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Lowercases `raw` and replaces each character outside `class` with a space.
/// No other transformation: length in characters is preserved for ASCII input.
pub fn normalize_text(raw: &str, class: CharClass) -> String {
    raw.to_lowercase()
        .chars()
        .map(|c| if class.keeps(c) { c } else { ' ' })
        .collect()
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Normalizes then splits on whitespace, optionally dropping stop words.
pub fn tokenize(raw: &str, class: CharClass, drop_stop_words: bool) -> Vec<String> {
    normalize_text(raw, class)
        .split_whitespace()
        .filter(|token| !(drop_stop_words && is_stop_word(token)))
        .map(str::to_string)
        .collect()
}
