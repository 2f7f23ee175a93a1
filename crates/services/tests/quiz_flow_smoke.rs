use quiz_core::model::{Category, Language, QuestionCount, QuizEvent, SessionPhase, UserId};
use services::{NextStep, QuestionPrompt, QuizError, QuizReply, QuizServices, Randomness, Recovery};
use storage::repository::QuestionRecord;

fn capital_rows() -> Vec<QuestionRecord> {
    let pairs = [
        ("Fransiya poytaxti?", "Parij"),
        ("Yaponiya poytaxti?", "Tokio"),
        ("Misr poytaxti?", "Qohira"),
        ("Italiya poytaxti?", "Rim"),
        ("Ispaniya poytaxti?", "Madrid"),
    ];
    let mut rows: Vec<_> = pairs
        .iter()
        .map(|(q, a)| QuestionRecord::new(Category::Capitals, Language::Uz, *q, *a))
        .collect();
    rows.push(QuestionRecord::new(
        Category::Capitals,
        Language::Ru,
        "Столица Франции?",
        "Париж",
    ));
    rows.push(QuestionRecord::new(
        Category::Web,
        Language::Uz,
        "HTML nima?",
        "Belgilash tili",
    ));
    rows.push(QuestionRecord::new(
        Category::Web,
        Language::Uz,
        "CSS nima?",
        "Uslublar jadvali",
    ));
    rows
}

fn answer_for(text: &str) -> &'static str {
    match text {
        "Fransiya poytaxti?" => "Parij",
        "Yaponiya poytaxti?" => "Tokio",
        "Misr poytaxti?" => "Qohira",
        "Italiya poytaxti?" => "Rim",
        "Ispaniya poytaxti?" => "Madrid",
        "HTML nima?" => "Belgilash tili",
        "CSS nima?" => "Uslublar jadvali",
        other => panic!("unexpected question {other}"),
    }
}

async fn services() -> QuizServices {
    QuizServices::in_memory(capital_rows(), Randomness::seeded(2024))
        .await
        .unwrap()
}

async fn start(services: &QuizServices, uid: UserId, category: Category, n: u32) -> QuestionPrompt {
    let ctl = services.controller();
    let events = [
        QuizEvent::ChooseLanguage(Language::Uz),
        QuizEvent::ChooseCategory(category),
        QuizEvent::ChooseCount(QuestionCount::new(n).unwrap()),
    ];
    let mut last = None;
    for event in events {
        last = Some(ctl.handle(uid, event).await.unwrap());
    }
    match last {
        Some(QuizReply::Question(prompt)) => prompt,
        other => panic!("expected first question, got {other:?}"),
    }
}

#[tokio::test]
async fn draws_requested_count_from_matching_rows() {
    let services = services().await;
    let uid = UserId::new(100);
    let prompt = start(&services, uid, Category::Capitals, 3).await;
    assert_eq!(prompt.total, 3);

    let session = services.sessions().get(uid).await.unwrap();
    let run = session.run().unwrap();
    assert_eq!(run.questions().len(), 3);
    for q in run.questions() {
        assert_eq!(answer_for(q.text()), q.answer());
        assert!(q.text().ends_with("poytaxti?"));
    }
}

#[tokio::test]
async fn correct_answer_moves_score_and_index_by_one() {
    let services = services().await;
    let uid = UserId::new(101);
    let prompt = start(&services, uid, Category::Capitals, 3).await;

    let reply = services
        .controller()
        .handle(uid, QuizEvent::SubmitAnswer(answer_for(&prompt.text).into()))
        .await
        .unwrap();
    let QuizReply::Answered { feedback, .. } = reply else {
        panic!("expected feedback");
    };
    assert!(feedback.correct);

    let session = services.sessions().get(uid).await.unwrap();
    let run = session.run().unwrap();
    assert_eq!(run.score(), 1);
    assert_eq!(run.current_index(), 1);
}

#[tokio::test]
async fn count_before_language_is_rejected_without_a_session() {
    let services = services().await;
    let uid = UserId::new(102);
    let err = services
        .controller()
        .handle(uid, QuizEvent::ChooseCount(QuestionCount::new(3).unwrap()))
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::State(_)));
    assert_eq!(err.recovery(), Recovery::Restart);
    assert!(services.sessions().get(uid).await.is_none());
}

#[tokio::test]
async fn small_category_offers_fewer_options() {
    let services = services().await;
    let prompt = start(&services, UserId::new(103), Category::Web, 3).await;

    // Web has two distinct answers, so a quiz of two with two options each.
    assert_eq!(prompt.total, 2);
    assert_eq!(prompt.options.len(), 2);
    assert!(prompt.options.contains(&answer_for(&prompt.text).to_string()));
}

#[tokio::test]
async fn finishing_reports_result_and_requires_restart() {
    let services = services().await;
    let ctl = services.controller();
    let uid = UserId::new(104);
    let mut prompt = start(&services, uid, Category::Capitals, 3).await;

    let mut result = None;
    for step in 0..3 {
        // miss the second question on purpose
        let answer = if step == 1 {
            "Toshkent".to_string()
        } else {
            answer_for(&prompt.text).to_string()
        };
        let QuizReply::Answered { feedback, next } = ctl
            .handle(uid, QuizEvent::SubmitAnswer(answer))
            .await
            .unwrap()
        else {
            panic!("expected feedback");
        };
        assert_eq!(feedback.correct, step != 1);
        match next {
            NextStep::Question(p) => {
                assert_eq!(p.number, step + 2);
                prompt = p;
            }
            NextStep::Completed(r) => result = Some(r),
        }
    }

    let result = result.unwrap();
    assert_eq!((result.score, result.total), (2, 3));
    assert_eq!(services.sessions().phase(uid).await, SessionPhase::Completed);

    let err = ctl
        .handle(uid, QuizEvent::SubmitAnswer("Parij".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::State(_)));

    let reply = ctl.handle(uid, QuizEvent::Restart).await.unwrap();
    assert!(matches!(reply, QuizReply::ChooseLanguage { .. }));
    assert_eq!(services.sessions().phase(uid).await, SessionPhase::Idle);

    // a fresh quiz can start right away
    start(&services, uid, Category::Capitals, 5).await;
}

#[tokio::test]
async fn language_without_rows_allows_another_count() {
    let services = services().await;
    let ctl = services.controller();
    let uid = UserId::new(105);
    ctl.handle(uid, QuizEvent::ChooseLanguage(Language::Ru))
        .await
        .unwrap();
    ctl.handle(uid, QuizEvent::ChooseCategory(Category::Football))
        .await
        .unwrap();

    let err = ctl
        .handle(uid, QuizEvent::ChooseCount(QuestionCount::new(5).unwrap()))
        .await
        .unwrap_err();
    assert!(matches!(err, QuizError::NoQuestions { .. }));
    assert_eq!(err.recovery(), Recovery::Retry);
    assert_eq!(
        services.sessions().phase(uid).await,
        SessionPhase::CategoryChosen
    );
}

#[tokio::test]
async fn options_always_include_the_answer_without_duplicates() {
    let services = services().await;
    let ctl = services.controller();
    let uid = UserId::new(106);
    let mut prompt = start(&services, uid, Category::Capitals, 5).await;

    loop {
        let correct = answer_for(&prompt.text).to_string();
        assert_eq!(prompt.options.len(), 4);
        assert_eq!(prompt.options.iter().filter(|o| **o == correct).count(), 1);
        let mut unique = prompt.options.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), prompt.options.len());

        match ctl.submit_answer(uid, &correct).await.unwrap() {
            QuizReply::Answered {
                next: NextStep::Question(p),
                ..
            } => prompt = p,
            QuizReply::Answered {
                next: NextStep::Completed(result),
                ..
            } => {
                assert_eq!(result.score, result.total);
                break;
            }
            other => panic!("unexpected reply {other:?}"),
        }
    }
}
