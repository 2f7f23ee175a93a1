//! Random selection helpers for question draws and answer options.

use rand::Rng;
use rand::seq::{SliceRandom, index};

/// Number of wrong answers shown next to the correct one when enough exist.
pub const DISTRACTOR_COUNT: usize = 3;

/// Draws `min(amount, items.len())` items without replacement.
///
/// Every subset of that size is equally likely, and the returned order is random.
pub fn sample_without_replacement<T, R>(items: Vec<T>, amount: usize, rng: &mut R) -> Vec<T>
where
    R: Rng + ?Sized,
{
    let amount = amount.min(items.len());
    let picked = index::sample(rng, items.len(), amount);
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    picked
        .into_iter()
        .filter_map(|i| slots.get_mut(i).and_then(Option::take))
        .collect()
}

/// Builds the shuffled option list for one question.
///
/// The result holds `correct` exactly once plus up to `DISTRACTOR_COUNT`
/// distinct wrong answers drawn from `answers`.
pub fn build_options<R>(
    correct: &str,
    answers: impl IntoIterator<Item = String>,
    rng: &mut R,
) -> Vec<String>
where
    R: Rng + ?Sized,
{
    // sorted so a seeded rng gives the same draw regardless of input order
    let mut wrong: Vec<String> = answers.into_iter().filter(|a| a != correct).collect();
    wrong.sort_unstable();
    wrong.dedup();

    let mut options = Vec::with_capacity(1 + DISTRACTOR_COUNT);
    options.push(correct.to_string());
    options.extend(sample_without_replacement(wrong, DISTRACTOR_COUNT, rng));
    options.shuffle(rng);
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::{HashMap, HashSet};

    fn answers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn sample_caps_at_available() {
        let mut rng = StdRng::seed_from_u64(1);
        let picked = sample_without_replacement(vec![1, 2, 3], 10, &mut rng);
        let set: HashSet<_> = picked.iter().copied().collect();
        assert_eq!(picked.len(), 3);
        assert_eq!(set, HashSet::from([1, 2, 3]));
    }

    #[test]
    fn sample_of_empty_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(sample_without_replacement(Vec::<u8>::new(), 3, &mut rng).is_empty());
    }

    #[test]
    fn sample_is_roughly_uniform_over_subsets() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut counts: HashMap<Vec<u8>, usize> = HashMap::new();
        let draws = 6000;
        for _ in 0..draws {
            let mut subset = sample_without_replacement(vec![0_u8, 1, 2, 3], 2, &mut rng);
            subset.sort_unstable();
            *counts.entry(subset).or_default() += 1;
        }
        // C(4, 2) = 6 subsets, ~1000 each
        assert_eq!(counts.len(), 6);
        for count in counts.values() {
            assert!((800..1200).contains(count), "skewed count {count}");
        }
    }

    #[test]
    fn options_contain_correct_once_and_three_distractors() {
        let mut rng = StdRng::seed_from_u64(3);
        let options = build_options(
            "Tashkent",
            answers(&["Tashkent", "Moscow", "Paris", "Rome", "Berlin"]),
            &mut rng,
        );
        assert_eq!(options.len(), 4);
        assert_eq!(options.iter().filter(|o| *o == "Tashkent").count(), 1);
        let unique: HashSet<_> = options.iter().collect();
        assert_eq!(unique.len(), options.len());
    }

    #[test]
    fn options_with_one_other_answer() {
        let mut rng = StdRng::seed_from_u64(3);
        let options = build_options("Tashkent", answers(&["Tashkent", "Moscow"]), &mut rng);
        assert_eq!(options.len(), 2);
        assert!(options.contains(&"Moscow".to_string()));
    }

    #[test]
    fn options_without_other_answers() {
        let mut rng = StdRng::seed_from_u64(3);
        let options = build_options("Tashkent", Vec::new(), &mut rng);
        assert_eq!(options, vec!["Tashkent".to_string()]);
    }

    #[test]
    fn duplicate_inputs_do_not_produce_duplicate_options() {
        let mut rng = StdRng::seed_from_u64(5);
        let options = build_options("a", answers(&["b", "b", "c", "c"]), &mut rng);
        assert_eq!(options.len(), 3);
    }

    #[test]
    fn correct_answer_position_varies() {
        let mut rng = StdRng::seed_from_u64(11);
        let pool = answers(&["w", "x", "y", "z"]);
        let positions: HashSet<usize> = (0..200)
            .map(|_| {
                build_options("a", pool.clone(), &mut rng)
                    .iter()
                    .position(|o| o == "a")
                    .unwrap_or(usize::MAX)
            })
            .collect();
        assert_eq!(positions, HashSet::from([0, 1, 2, 3]));
    }
}
