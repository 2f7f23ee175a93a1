use quiz_core::Randomness;
use quiz_core::model::Category;
use quiz_core::sampling::build_options;

use crate::questions::QuestionRepository;

/// Builds the shuffled answer options for one question.
#[derive(Clone)]
pub struct DistractorSampler {
    questions: QuestionRepository,
    randomness: Randomness,
}

impl DistractorSampler {
    #[must_use]
    pub fn new(questions: QuestionRepository, randomness: Randomness) -> Self {
        Self {
            questions,
            randomness,
        }
    }

    /// Returns `correct` plus up to three distinct wrong answers from the same
    /// category, in random order.
    ///
    /// A failing store degrades to a single option rather than an error.
    pub async fn build_options(&self, correct: &str, category: Category) -> Vec<String> {
        let answers = match self.questions.fetch_distinct_answers(category).await {
            Ok(answers) => answers,
            Err(e) => {
                log::warn!("distractor lookup for {category} failed, showing answer only: {e}");
                Default::default()
            }
        };
        self.randomness
            .with_rng(|rng| build_options(correct, answers, rng))
    }
}
