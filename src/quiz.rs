//! The quiz itself: state, messages, and how it renders.

use futures::FutureExt;

use crate::config::Config;
use crate::error::FetchError;
use crate::event::Activation;
use crate::fetch;
use crate::html::*;
use crate::question::{parse_reply, Question};
use crate::score::{Score, Verdict};
use crate::timer;
use crate::util::capitalize;
use crate::{Cmd, Model};

pub const ACTION_ANSWER: &str = "answer";
pub const ACTION_NEXT: &str = "next";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Msg {
    /// The player picked the option with this label
    Answer(String),
    /// Move on to a fresh question
    Next,
    Loaded(Result<Question, FetchError>),
}

/// The player's pick for the current question
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answer {
    pub selected: String,
    pub verdict: Verdict,
}

#[derive(Debug)]
pub struct Quiz {
    config: Config,
    score: Score,
    question: Option<Question>,
    answer: Option<Answer>,
    /// Attempt number of the pending fetch, if any
    in_flight: Option<u32>,
    /// Every attempt at the first question failed
    stalled: bool,
}

impl Quiz {
    pub fn new(config: Config, question: Option<Question>) -> Quiz {
        Quiz {
            config,
            score: Score::default(),
            question,
            answer: None,
            in_flight: None,
            stalled: false,
        }
    }

    /// Build the quiz from the mount element's `data-question` attribute.
    ///
    /// The attribute uses the same JSON as the question service. Without a
    /// usable one the quiz asks the service straight away. If that first
    /// fetch fails for good the page is not reloaded, since the reloaded page
    /// would start the same way; the quiz shows a "Try again" button instead.
    pub fn boot(config: Config, question: Option<&str>) -> (Quiz, Cmd<Msg>) {
        let question = question.and_then(|raw| match parse_reply(200, raw) {
            Ok(q) => Some(q),
            Err(e) => {
                warn!("Ignoring initial question: {}", e);
                None
            }
        });
        let cmd = if question.is_some() {
            Cmd::none()
        } else {
            Cmd::msg(Msg::Next)
        };
        (Quiz::new(config, question), cmd)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn answer(&self) -> Option<&Answer> {
        self.answer.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    fn submit_answer(&mut self, selected: String) -> Cmd<Msg> {
        let question = match &self.question {
            Some(q) => q,
            None => {
                debug!("No question on screen, ignoring answer");
                return Cmd::noop();
            }
        };
        if self.answer.is_some() {
            debug!("Question already answered, ignoring '{}'", selected);
            return Cmd::noop();
        }
        if !question.has_option(&selected) {
            warn!("'{}' is not an option for this question", selected);
            return Cmd::noop();
        }
        let verdict = question.judge(&selected);
        self.score.record(verdict);
        info!(
            "Answered '{}': {:?} (correct {}, wrong {})",
            selected,
            verdict,
            self.score.correct(),
            self.score.wrong()
        );
        self.answer = Some(Answer { selected, verdict });
        Cmd::none()
    }

    fn advance_question(&mut self) -> Cmd<Msg> {
        if let Some(attempt) = self.in_flight {
            debug!("Fetch attempt {} still pending, ignoring", attempt);
            return Cmd::noop();
        }
        self.in_flight = Some(1);
        self.stalled = false;
        let endpoint = self.config.endpoint.clone();
        Cmd::spawn(fetch::next_question(endpoint).map(Msg::Loaded))
    }

    fn on_loaded(&mut self, result: Result<Question, FetchError>) -> Cmd<Msg> {
        let attempt = self.in_flight.take().unwrap_or(1);
        match result {
            Ok(question) => {
                debug!("New question with {} options", question.options().len());
                self.question = Some(question);
                self.answer = None;
                Cmd::none()
            }
            Err(e) => {
                error!("Could not load the next question (attempt {}): {}", attempt, e);
                if attempt <= self.config.max_retries {
                    let wait = timer::backoff(self.config.retry_delay_ms, attempt);
                    info!("Retrying in {} ms", wait);
                    self.in_flight = Some(attempt + 1);
                    let endpoint = self.config.endpoint.clone();
                    Cmd::spawn(async move {
                        timer::delay(wait).await;
                        Msg::Loaded(fetch::next_question(endpoint).await)
                    })
                } else if self.question.is_none() {
                    warn!("No question to show yet, waiting for the player to retry");
                    self.stalled = true;
                    Cmd::none()
                } else {
                    Cmd::reload(self.config.alert_message.clone())
                }
            }
        }
    }

    fn feedback(&self) -> Option<(String, Verdict)> {
        let question = self.question.as_ref()?;
        let answer = self.answer.as_ref()?;
        let text = match answer.verdict {
            Verdict::Correct => format!("Correct! It's {}", question.correct()),
            Verdict::Wrong => format!("Wrong! It was {}", question.correct()),
        };
        Some((text, answer.verdict))
    }

    fn option_class(&self, question: &Question, option: &str) -> Option<&'static str> {
        let answer = self.answer.as_ref()?;
        if option == question.correct() {
            Some(Verdict::Correct.class())
        } else if option == answer.selected {
            Some(Verdict::Wrong.class())
        } else {
            None
        }
    }

    fn view_question(&self, question: &Question) -> Vec<Html> {
        let answered = self.answer.is_some();
        let sprite_class = if answered {
            "pokemon-sprite revealed"
        } else {
            "pokemon-sprite"
        };
        let badges = question
            .badges()
            .map(|(code, label)| span!(class(format!("type-badge type-{}", code)), label))
            .collect::<Vec<_>>();
        let options = question
            .options()
            .iter()
            .map(|option| {
                let mark = self.option_class(question, option);
                button!(
                    button_type("button"),
                    classes(vec!["option-btn", mark.unwrap_or("")]),
                    data_action(ACTION_ANSWER),
                    data_name(option.clone()),
                    if answered { Some(disabled()) } else { None },
                    capitalize(option)
                )
            })
            .collect::<Vec<_>>();
        vec![
            div!(
                class("sprite-frame"),
                img!(
                    id("pokemon-sprite"),
                    class(sprite_class),
                    src(question.sprite().to_string()),
                    alt("Who's that Pokémon?")
                )
            ),
            div!(id("types-container"), class("types"), badges),
            div!(class("options-grid"), options),
        ]
    }

    fn view_feedback(&self) -> Html {
        match self.feedback() {
            Some((text, verdict)) => p!(
                id("feedback"),
                classes(vec!["feedback", verdict.class()]),
                text
            ),
            None => p!(id("feedback"), class("feedback")),
        }
    }

    fn view_stats(&self) -> Html {
        div!(
            class("stats"),
            span!(
                class("stat"),
                "Correct: ",
                strong!(id("correct-count"), self.score.correct().to_string())
            ),
            span!(
                class("stat"),
                "Wrong: ",
                strong!(id("wrong-count"), self.score.wrong().to_string())
            )
        )
    }

    fn view_next(&self) -> Html {
        let display = if self.answer.is_some() {
            "display: block"
        } else {
            "display: none"
        };
        button!(
            id("next-btn"),
            button_type("button"),
            class("next-btn"),
            data_action(ACTION_NEXT),
            style(display),
            if self.is_loading() { Some(disabled()) } else { None },
            if self.is_loading() { "Loading..." } else { "Next" }
        )
    }
}

impl Model for Quiz {
    type Msg = Msg;

    fn view(&self) -> Html {
        let body = match &self.question {
            Some(question) => self.view_question(question),
            None if self.stalled => vec![
                p!(class("loading failed"), "Could not load a Pokémon."),
                button!(
                    id("retry-btn"),
                    button_type("button"),
                    class("next-btn"),
                    data_action(ACTION_NEXT),
                    "Try again"
                ),
            ],
            None => vec![p!(class("loading"), "Loading...")],
        };
        div!(
            class("quiz"),
            body,
            self.view_feedback(),
            self.view_stats(),
            self.view_next()
        )
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Answer(selected) => self.submit_answer(selected),
            Msg::Next => self.advance_question(),
            Msg::Loaded(result) => self.on_loaded(result),
        }
    }

    fn dispatch(&self, activation: &Activation) -> Option<Msg> {
        match (activation.action.as_str(), &activation.value) {
            (ACTION_ANSWER, Some(name)) => Some(Msg::Answer(name.clone())),
            (ACTION_NEXT, _) => Some(Msg::Next),
            _ => None,
        }
    }
}
