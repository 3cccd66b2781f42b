//! The question a player is currently guessing, and how it arrives over the wire.

use std::collections::HashSet;
use std::convert::TryFrom;

use serde::Deserialize;

use crate::error::{FetchError, QuestionError};
use crate::score::Verdict;
use crate::util::capitalize;

/// One quiz round. Once built it is never modified; the next round replaces it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    sprite: String,
    types: Vec<String>,
    options: Vec<String>,
    correct: String,
}

impl Question {
    pub fn new(
        sprite: impl Into<String>,
        types: Vec<String>,
        options: Vec<String>,
        correct: impl Into<String>,
    ) -> Result<Question, QuestionError> {
        let sprite = sprite.into();
        let correct = correct.into();
        if sprite.trim().is_empty() {
            return Err(QuestionError::EmptySprite);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions(options.len()));
        }
        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if option.is_empty() {
                return Err(QuestionError::EmptyOption);
            }
            if !seen.insert(option.as_str()) {
                return Err(QuestionError::DuplicateOption(option.clone()));
            }
        }
        if !seen.contains(correct.as_str()) {
            return Err(QuestionError::UnknownAnswer(correct));
        }
        Ok(Question {
            sprite,
            types,
            options,
            correct,
        })
    }

    pub fn sprite(&self) -> &str {
        &self.sprite
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct(&self) -> &str {
        &self.correct
    }

    pub fn has_option(&self, label: &str) -> bool {
        self.options.iter().any(|o| o == label)
    }

    pub fn judge(&self, selected: &str) -> Verdict {
        Verdict::of(selected, &self.correct)
    }

    /// Display labels for the type badges, paired with their type code
    pub fn badges(&self) -> impl Iterator<Item = (&str, String)> {
        self.types.iter().map(|t| (t.as_str(), capitalize(t)))
    }
}

/// Body of a successful `/next-pokemon` reply
#[derive(Clone, Debug, Deserialize)]
pub struct QuestionBody {
    pub sprite: String,
    #[serde(default)]
    pub types: Vec<String>,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl TryFrom<QuestionBody> for Question {
    type Error = QuestionError;

    fn try_from(body: QuestionBody) -> Result<Question, QuestionError> {
        Question::new(body.sprite, body.types, body.options, body.correct_answer)
    }
}

/// Either side of the question service's JSON contract.
///
/// A non-empty `error` field wins over everything else in the body; an empty
/// one counts as absent.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    Failure { error: String },
    Question(QuestionBody),
}

/// Turn an HTTP status and body into a question.
///
/// The body is parsed whatever the status, since the service reports its own
/// failures as `{"error": ...}` alongside a 5xx.
pub fn parse_reply(status: u16, body: &str) -> Result<Question, FetchError> {
    let reply = match serde_json::from_str::<Reply>(body) {
        Ok(Reply::Failure { error }) if error.is_empty() => {
            serde_json::from_str::<QuestionBody>(body).map(Reply::Question)
        }
        other => other,
    };
    match reply {
        Ok(Reply::Failure { error }) => Err(FetchError::Service(error)),
        Ok(Reply::Question(body)) => Ok(Question::try_from(body)?),
        Err(_) if !(200..300).contains(&status) => Err(FetchError::Status(status)),
        Err(e) => Err(FetchError::Parse(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_question() {
        let body = r#"{"sprite":"/img/25.png","types":["electric"],
                       "options":["pikachu","raichu"],"correct_answer":"pikachu"}"#;
        let q = parse_reply(200, body).unwrap();
        assert_eq!(q.sprite(), "/img/25.png");
        assert_eq!(q.types(), &strings(&["electric"])[..]);
        assert_eq!(q.options(), &strings(&["pikachu", "raichu"])[..]);
        assert_eq!(q.correct(), "pikachu");
    }

    #[test]
    fn error_field_is_service_error() {
        let err = parse_reply(500, r#"{"error":"no more pokemon"}"#).unwrap_err();
        assert_eq!(err, FetchError::Service("no more pokemon".into()));
        // the error field wins even with a 200
        let err = parse_reply(200, r#"{"error":"nope"}"#).unwrap_err();
        assert_eq!(err, FetchError::Service("nope".into()));
    }

    #[test]
    fn error_beside_question_fields_wins() {
        let body = r#"{"error":"maintenance","sprite":"/img/25.png","types":["electric"],
                       "options":["pikachu","raichu"],"correct_answer":"pikachu"}"#;
        assert_eq!(
            parse_reply(200, body).unwrap_err(),
            FetchError::Service("maintenance".into())
        );
    }

    #[test]
    fn empty_error_counts_as_absent() {
        let body = r#"{"error":"","sprite":"/img/25.png","types":["electric"],
                       "options":["pikachu","raichu"],"correct_answer":"pikachu"}"#;
        assert_eq!(parse_reply(200, body).unwrap().correct(), "pikachu");
        let body = r#"{"error":null,"sprite":"/img/25.png","types":["electric"],
                       "options":["pikachu","raichu"],"correct_answer":"pikachu"}"#;
        assert_eq!(parse_reply(200, body).unwrap().correct(), "pikachu");
        // with nothing else in the body there is no question to show
        assert!(matches!(
            parse_reply(200, r#"{"error":""}"#),
            Err(FetchError::Parse(_))
        ));
        assert_eq!(
            parse_reply(500, r#"{"error":""}"#).unwrap_err(),
            FetchError::Status(500)
        );
    }

    #[test]
    fn garbage_body() {
        assert!(matches!(
            parse_reply(200, "<html>oops</html>"),
            Err(FetchError::Parse(_))
        ));
        assert_eq!(
            parse_reply(502, "Bad Gateway").unwrap_err(),
            FetchError::Status(502)
        );
        // missing fields
        assert!(matches!(
            parse_reply(200, r#"{"sprite":"/a.png"}"#),
            Err(FetchError::Parse(_))
        ));
    }

    #[test]
    fn answer_must_be_an_option() {
        let body = r#"{"sprite":"/a.png","types":[],"options":["a","b"],"correct_answer":"c"}"#;
        assert_eq!(
            parse_reply(200, body).unwrap_err(),
            FetchError::Invalid(QuestionError::UnknownAnswer("c".into()))
        );
    }

    #[test]
    fn rejects_inconsistent_questions() {
        assert_eq!(
            Question::new("/a.png", vec![], strings(&["a", "a"]), "a"),
            Err(QuestionError::DuplicateOption("a".into()))
        );
        assert_eq!(
            Question::new("/a.png", vec![], strings(&["a"]), "a"),
            Err(QuestionError::TooFewOptions(1))
        );
        assert_eq!(
            Question::new("  ", vec![], strings(&["a", "b"]), "a"),
            Err(QuestionError::EmptySprite)
        );
        assert_eq!(
            Question::new("/a.png", vec![], strings(&["a", ""]), "a"),
            Err(QuestionError::EmptyOption)
        );
    }

    #[test]
    fn badges_are_capitalized() {
        let q = Question::new(
            "/img/6.png",
            strings(&["fire", "flying"]),
            strings(&["charizard", "pidgeot"]),
            "charizard",
        )
        .unwrap();
        let badges: Vec<_> = q.badges().collect();
        assert_eq!(
            badges,
            vec![("fire", "Fire".to_string()), ("flying", "Flying".to_string())]
        );
        assert_eq!(q.judge("pidgeot"), Verdict::Wrong);
        assert!(q.has_option("pidgeot"));
        assert!(!q.has_option("mew"));
    }
}
