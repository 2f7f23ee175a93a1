use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use quiz_core::model::{Category, Language, Question, QuestionCount, QuizEvent, UserId};
use services::{QuestionRepository, QuizController, QuizError, QuizReply, Randomness};
use storage::repository::{QuestionStore, StorageError};

/// Serves a fixed question set until switched off, then reports itself unavailable.
struct FlakyStore {
    questions: Vec<Question>,
    answers_down: AtomicBool,
    questions_down: AtomicBool,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            questions: (1..=4)
                .map(|i| Question::new(format!("Savol {i}"), format!("Javob {i}")))
                .collect(),
            answers_down: AtomicBool::new(false),
            questions_down: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl QuestionStore for FlakyStore {
    async fn check_available(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn questions_for(
        &self,
        _category: Category,
        _lang: Language,
    ) -> Result<Vec<Question>, StorageError> {
        if self.questions_down.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("questions offline".into()));
        }
        Ok(self.questions.clone())
    }

    async fn distinct_answers(&self, _category: Category) -> Result<BTreeSet<String>, StorageError> {
        if self.answers_down.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("answers offline".into()));
        }
        Ok(self.questions.iter().map(|q| q.answer().to_string()).collect())
    }
}

fn controller(store: Arc<FlakyStore>) -> QuizController {
    QuizController::from_repository(QuestionRepository::new(store, Randomness::seeded(17)))
}

async fn choose_up_to_count(ctl: &QuizController, uid: UserId) {
    ctl.handle(uid, QuizEvent::ChooseLanguage(Language::Uz))
        .await
        .unwrap();
    ctl.handle(uid, QuizEvent::ChooseCategory(Category::Football))
        .await
        .unwrap();
}

#[tokio::test]
async fn lost_answer_lookup_keeps_the_quiz_going() {
    let store = Arc::new(FlakyStore::new());
    let ctl = controller(Arc::clone(&store));
    let uid = UserId::new(1);
    choose_up_to_count(&ctl, uid).await;

    let QuizReply::Question(first) = ctl
        .handle(uid, QuizEvent::ChooseCount(QuestionCount::new(3).unwrap()))
        .await
        .unwrap()
    else {
        panic!("expected first question");
    };
    assert_eq!(first.options.len(), 4);

    store.answers_down.store(true, Ordering::SeqCst);
    let reply = ctl
        .handle(uid, QuizEvent::SubmitAnswer(first.options[0].clone()))
        .await
        .unwrap();
    let QuizReply::Answered {
        next: services::NextStep::Question(second),
        ..
    } = reply
    else {
        panic!("expected a second question");
    };
    // only the correct answer is left to show
    assert_eq!(second.options.len(), 1);
    assert_eq!(second.options[0], second.text.replace("Savol", "Javob"));
}

#[tokio::test]
async fn lost_question_lookup_reads_as_empty_category() {
    let store = Arc::new(FlakyStore::new());
    store.questions_down.store(true, Ordering::SeqCst);
    let ctl = controller(Arc::clone(&store));
    let uid = UserId::new(2);
    choose_up_to_count(&ctl, uid).await;

    let err = ctl
        .handle(uid, QuizEvent::ChooseCount(QuestionCount::new(5).unwrap()))
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::NoQuestions { .. }));

    // the store comes back and the same session can start
    store.questions_down.store(false, Ordering::SeqCst);
    let reply = ctl
        .handle(uid, QuizEvent::ChooseCount(QuestionCount::new(5).unwrap()))
        .await
        .unwrap();
    assert!(matches!(reply, QuizReply::Question(p) if p.total == 4));
}
