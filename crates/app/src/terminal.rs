//! Line-based transport: decodes typed input into `QuizEvent`s against the
//! buttons currently on screen.

use std::str::FromStr;

use quiz_core::model::{Category, Language, QuestionCount, QuizEvent};
use services::{NextStep, QuizReply};

/// Buttons shown by the last reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Keyboard {
    #[default]
    Empty,
    Languages,
    Categories,
    Counts,
    Options(Vec<String>),
    Restart,
}

impl Keyboard {
    #[must_use]
    pub fn for_reply(reply: &QuizReply) -> Self {
        match reply {
            QuizReply::ChooseLanguage { .. } => Keyboard::Languages,
            QuizReply::ChooseCategory { .. } => Keyboard::Categories,
            QuizReply::ChooseCount { .. } => Keyboard::Counts,
            QuizReply::Question(prompt)
            | QuizReply::Answered {
                next: NextStep::Question(prompt),
                ..
            } => Keyboard::Options(prompt.options.clone()),
            QuizReply::Answered {
                next: NextStep::Completed(_),
                ..
            }
            | QuizReply::Stopped { .. } => Keyboard::Restart,
        }
    }

    /// Decode one input line. `None` means nothing on screen matches.
    ///
    /// Buttons are picked by their 1-based number or by their value.
    #[must_use]
    pub fn decode(&self, line: &str) -> Option<QuizEvent> {
        let input = line.trim();
        match input {
            "/start" | "/restart" => return Some(QuizEvent::Restart),
            "/stop" => return Some(QuizEvent::Stop),
            _ => {}
        }
        let pick = input.parse::<usize>().ok().and_then(|n| n.checked_sub(1));

        match self {
            Keyboard::Empty => None,
            Keyboard::Languages => pick
                .and_then(|i| Language::ALL.get(i).copied())
                .or_else(|| Language::from_str(input).ok())
                .map(QuizEvent::ChooseLanguage),
            Keyboard::Categories => pick
                .and_then(|i| Category::ALL.get(i).copied())
                .or_else(|| Category::from_str(input).ok())
                .map(QuizEvent::ChooseCategory),
            // Counts are labelled with their value, not an index.
            Keyboard::Counts => QuestionCount::from_str(input)
                .ok()
                .map(QuizEvent::ChooseCount),
            Keyboard::Options(options) => pick
                .and_then(|i| options.get(i))
                .or_else(|| options.iter().find(|o| o.as_str() == input))
                .map(|o| QuizEvent::SubmitAnswer(o.clone())),
            Keyboard::Restart => (pick == Some(0)).then_some(QuizEvent::Restart),
        }
    }
}

/// Language the user last picked, used to localise errors and notices.
#[must_use]
pub fn reply_language(reply: &QuizReply) -> Option<Language> {
    match reply {
        QuizReply::ChooseCategory { lang, .. } | QuizReply::ChooseCount { lang, .. } => Some(*lang),
        QuizReply::Question(prompt)
        | QuizReply::Answered {
            next: NextStep::Question(prompt),
            ..
        } => Some(prompt.lang),
        QuizReply::Answered {
            next: NextStep::Completed(result),
            ..
        } => Some(result.lang),
        QuizReply::ChooseLanguage { .. } | QuizReply::Stopped { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_decode_on_any_keyboard() {
        for keyboard in [Keyboard::Empty, Keyboard::Counts, Keyboard::Restart] {
            assert_eq!(keyboard.decode("/stop"), Some(QuizEvent::Stop));
            assert_eq!(keyboard.decode(" /start "), Some(QuizEvent::Restart));
        }
    }

    #[test]
    fn buttons_decode_by_number_or_value() {
        assert_eq!(
            Keyboard::Languages.decode("2"),
            Some(QuizEvent::ChooseLanguage(Language::Ru))
        );
        assert_eq!(
            Keyboard::Categories.decode("capitals"),
            Some(QuizEvent::ChooseCategory(Category::Capitals))
        );
        assert_eq!(
            Keyboard::Counts.decode("10"),
            Some(QuizEvent::ChooseCount(QuestionCount::new(10).unwrap()))
        );
        assert_eq!(Keyboard::Counts.decode("4"), None);

        let options = Keyboard::Options(vec!["Rim".into(), "Parij".into()]);
        assert_eq!(
            options.decode("2"),
            Some(QuizEvent::SubmitAnswer("Parij".into()))
        );
        assert_eq!(
            options.decode("Rim"),
            Some(QuizEvent::SubmitAnswer("Rim".into()))
        );
        assert_eq!(options.decode("3"), None);
        assert_eq!(options.decode("Madrid"), None);
    }

    #[test]
    fn nothing_decodes_without_buttons() {
        assert_eq!(Keyboard::Empty.decode("uz"), None);
        assert_eq!(Keyboard::Languages.decode("0"), None);
        assert_eq!(Keyboard::Restart.decode("1"), Some(QuizEvent::Restart));
    }

    #[test]
    fn stopped_reply_offers_restart() {
        let reply = QuizReply::Stopped { had_session: false };
        assert_eq!(Keyboard::for_reply(&reply), Keyboard::Restart);
        assert_eq!(reply_language(&reply), None);
    }
}
