use rand::Rng;
use rand::rngs::SmallRng;

const PUNCT_PROB: f64 = 0.15;
const MARKS: [char; 4] = ['.', ',', '!', '?'];

/// Post-processing pass that decorates a word sequence with punctuation.
///
/// Each word independently gets one trailing mark with probability 0.15.
/// A word left unmarked is capitalized when it is the first word or follows
/// a sentence end. Marked words keep their case.
pub fn apply_punctuation(words: Vec<String>, rng: &mut SmallRng) -> Vec<String> {
    let mut result: Vec<String> = Vec::with_capacity(words.len());

    for mut word in words {
        let sentence_start = result.last().is_none_or(|prev| ends_sentence(prev));
        if rng.gen_bool(PUNCT_PROB) {
            word.push(MARKS[rng.gen_range(0..MARKS.len())]);
        } else if sentence_start {
            word = capitalize(&word);
        }
        result.push(word);
    }

    result
}

fn ends_sentence(word: &str) -> bool {
    matches!(word.chars().last(), Some('.' | '!' | '?'))
}

/// Uppercase the first character and lowercase the rest.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}
