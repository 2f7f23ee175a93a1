//! Localised text for the terminal transport.

use quiz_core::model::{Category, Language, QuizResult};
use services::{NextStep, QuestionPrompt, QuizError, QuizReply, Recovery};

pub const GREETING: &str = "👋 Assalomu alaykum!\n\nIltimos, tilni tanlang / Пожалуйста, выберите язык:";

#[must_use]
pub fn language_label(lang: Language) -> &'static str {
    match lang {
        Language::Uz => "🇺🇿 O'zbek",
        Language::Ru => "🇷🇺 Русский",
    }
}

#[must_use]
pub fn category_label(category: Category, lang: Language) -> &'static str {
    match (category, lang) {
        (Category::Web, Language::Uz) => "💻 Web dasturlash",
        (Category::Web, Language::Ru) => "💻 Web программирование",
        (Category::Capitals, Language::Uz) => "🌍 Davlat Poytaxtlari",
        (Category::Capitals, Language::Ru) => "🌍 Столицы стран",
        (Category::Football, Language::Uz) => "⚽ Futbol o'yinlari",
        (Category::Football, Language::Ru) => "⚽ Футбол",
    }
}

fn restart_label(lang: Language) -> &'static str {
    match lang {
        Language::Uz => "🔄 Qaytadan boshlash",
        Language::Ru => "🔄 Начать заново",
    }
}

fn buttons<'a>(labels: impl IntoIterator<Item = &'a str>) -> String {
    labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| format!("  [{}] {label}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

fn question(prompt: &QuestionPrompt) -> String {
    format!(
        "{}. {}\n{}",
        prompt.number,
        prompt.text,
        buttons(prompt.options.iter().map(String::as_str))
    )
}

fn completed(result: &QuizResult) -> String {
    let headline = match result.lang {
        Language::Uz => format!("✅ Test tugadi! Natija: {}/{}", result.score, result.total),
        Language::Ru => format!("✅ Тест завершен! Результат: {}/{}", result.score, result.total),
    };
    format!("{headline}\n{}", buttons([restart_label(result.lang)]))
}

/// Render a controller reply. `lang` is the last language the user picked.
#[must_use]
pub fn reply(reply: &QuizReply, lang: Language) -> String {
    match reply {
        QuizReply::ChooseLanguage { languages } => format!(
            "{GREETING}\n{}",
            buttons(languages.iter().map(|l| language_label(*l)))
        ),
        QuizReply::ChooseCategory { lang, categories } => {
            let title = match lang {
                Language::Uz => "Qiziqtirgan yo'nalishni tanlang:",
                Language::Ru => "Выберите направление:",
            };
            format!(
                "{title}\n{}",
                buttons(categories.iter().map(|c| category_label(*c, *lang)))
            )
        }
        QuizReply::ChooseCount { lang, counts, .. } => {
            let title = match lang {
                Language::Uz => "Nechta savol tanlaysiz?",
                Language::Ru => "Сколько вопросов хотите?",
            };
            let labels: Vec<String> = counts.iter().map(u32::to_string).collect();
            format!("{title}\n{}", buttons(labels.iter().map(String::as_str)))
        }
        QuizReply::Question(prompt) => question(prompt),
        QuizReply::Answered { feedback, next } => {
            let verdict = match (feedback.correct, lang) {
                (true, Language::Uz) => "✅ To'g'ri javob!".to_string(),
                (true, Language::Ru) => "✅ Правильный ответ!".to_string(),
                (false, Language::Uz) => {
                    format!("❌ Noto'g'ri. To'g'ri javob: {}", feedback.correct_answer)
                }
                (false, Language::Ru) => {
                    format!("❌ Неправильно. Правильный ответ: {}", feedback.correct_answer)
                }
            };
            let rest = match next {
                NextStep::Question(prompt) => question(prompt),
                NextStep::Completed(result) => completed(result),
            };
            format!("{verdict}\n\n{rest}")
        }
        QuizReply::Stopped { .. } => {
            let text = match lang {
                Language::Uz => "⛔ Bot to‘xtatildi. Qayta ishga tushirish uchun tugmani bosing.",
                Language::Ru => "⛔ Бот остановлен. Нажмите кнопку, чтобы начать заново.",
            };
            format!("{text}\n{}", buttons([restart_label(lang)]))
        }
    }
}

/// Render a rejected event together with what the user can do next.
#[must_use]
pub fn error(err: &QuizError, lang: Language) -> String {
    let headline = match (err, lang) {
        (QuizError::NoQuestions { .. }, Language::Uz) => "⚠ Savollar topilmadi!",
        (QuizError::NoQuestions { .. }, Language::Ru) => "⚠ Вопросы не найдены!",
        (_, Language::Uz) => "❓ Noma'lum buyruq!",
        (_, Language::Ru) => "❓ Неизвестная команда!",
    };
    let hint = match (err.recovery(), lang) {
        (Recovery::Retry, Language::Uz) => "Boshqa variantni tanlang.",
        (Recovery::Retry, Language::Ru) => "Выберите другой вариант.",
        (Recovery::Restart, Language::Uz) => "⚠ Testni qaytadan boshlang! (/start)",
        (Recovery::Restart, Language::Ru) => "⚠ Начните тест заново! (/start)",
    };
    format!("{headline}\n{hint}")
}

#[must_use]
pub fn unrecognized(lang: Language) -> &'static str {
    match lang {
        Language::Uz => "Tugma raqamini yoki /start, /stop buyruqlarini kiriting.",
        Language::Ru => "Введите номер кнопки или команды /start, /stop.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerOutcome, SessionPhase, SessionStateError};

    #[test]
    fn question_is_numbered_with_buttons() {
        let prompt = QuestionPrompt {
            lang: Language::Uz,
            number: 2,
            total: 3,
            text: "Fransiya poytaxti?".into(),
            options: vec!["Rim".into(), "Parij".into()],
        };
        assert_eq!(
            reply(&QuizReply::Question(prompt), Language::Uz),
            "2. Fransiya poytaxti?\n  [1] Rim\n  [2] Parij"
        );
    }

    #[test]
    fn wrong_answer_shows_correct_one_in_russian() {
        let answered = QuizReply::Answered {
            feedback: AnswerOutcome {
                correct: false,
                correct_answer: "Париж".into(),
                score: 1,
                total: 3,
                session_complete: true,
            },
            next: NextStep::Completed(QuizResult {
                lang: Language::Ru,
                category: Category::Capitals,
                score: 1,
                total: 3,
            }),
        };
        let text = reply(&answered, Language::Ru);
        assert!(text.starts_with("❌ Неправильно. Правильный ответ: Париж"));
        assert!(text.contains("Результат: 1/3"));
        assert!(text.contains("[1] 🔄 Начать заново"));
    }

    #[test]
    fn state_errors_point_at_restart() {
        let err = QuizError::State(SessionStateError::UnexpectedEvent {
            event: "submit_answer",
            phase: SessionPhase::Idle,
        });
        assert!(error(&err, Language::Uz).contains("/start"));
    }
}
