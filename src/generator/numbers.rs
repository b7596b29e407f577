use rand::Rng;
use rand::rngs::SmallRng;

const NUMBER_PROB: f64 = 0.10;
const MAX_NUMBER: u32 = 9999;

/// Post-processing pass that swaps words for number tokens.
///
/// Each word is independently replaced by an integer in [0, 9999] with
/// probability 0.10.
pub fn apply_numbers(words: Vec<String>, rng: &mut SmallRng) -> Vec<String> {
    words
        .into_iter()
        .map(|word| {
            if rng.gen_bool(NUMBER_PROB) {
                rng.gen_range(0..=MAX_NUMBER).to_string()
            } else {
                word
            }
        })
        .collect()
}
