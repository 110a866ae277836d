use std::collections::BTreeSet;

use super::config::EstimatorConfig;

/// Italian filler words that carry no signal about shared interests.
pub(crate) const ITALIAN_STOP_WORDS: &[&str] = &[
    "il", "lo", "la", "gli", "le", "un", "uno", "una", "di", "da", "in", "con", "su", "per",
    "tra", "fra", "del", "dello", "della", "dei", "degli", "delle", "nel", "nello", "nella",
    "nei", "negli", "nelle", "sul", "sullo", "sulla", "sui", "sugli", "sulle", "al", "allo",
    "alla", "ai", "agli", "alle", "dal", "dallo", "dalla", "dai", "dagli", "dalle", "che",
    "chi", "non", "come", "anche", "ma", "però", "perché", "quando", "dove", "cosa", "sono",
    "sei", "siamo", "siete", "era", "essere", "avere", "ho", "hai", "abbiamo", "hanno",
    "fare", "faccio", "molto", "tanto", "poco", "più", "meno", "tutto", "tutti", "tutte",
    "questo", "questa", "questi", "queste", "quello", "quella", "quelli", "quelle", "mio",
    "mia", "miei", "mie", "tuo", "tua", "suo", "sua", "nostro", "nostra", "loro", "mi",
    "ti", "si", "ci", "vi", "me", "te", "lui", "lei", "noi", "voi", "poi", "già", "ancora",
    "sempre", "mai", "spesso", "ogni", "qualche", "altro", "altri", "altre", "solo", "bene",
    "piace", "piacciono", "amo", "adoro", "tempo", "libero", "nulla", "niente", "etc", "ecc",
    "cose", "volte", "anni", "stato", "stata",
];

pub(crate) fn default_stop_words() -> BTreeSet<String> {
    ITALIAN_STOP_WORDS
        .iter()
        .map(|word| word.to_string())
        .collect()
}

/// Lower-cases, splits on anything that is not a letter or digit, and keeps
/// the distinct tokens long enough to be meaningful.
pub(crate) fn tokenize<'a, I>(texts: I, config: &EstimatorConfig) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tokens = BTreeSet::new();
    for text in texts {
        let lowered = text.to_lowercase();
        for raw in lowered.split(|ch: char| !ch.is_alphanumeric()) {
            if raw.chars().count() < config.min_token_chars {
                continue;
            }
            if config.stop_words.contains(raw) {
                continue;
            }
            tokens.insert(raw.to_string());
        }
    }
    tokens
}

pub(crate) fn shared_token_count(left: &BTreeSet<String>, right: &BTreeSet<String>) -> usize {
    left.intersection(right).count()
}
