use pokequiz::config::{Config, DEFAULT_ALERT};
use pokequiz::error::FetchError;
use pokequiz::event::Activation;
use pokequiz::html::Html;
use pokequiz::question::{parse_reply, Question};
use pokequiz::{Model, Msg, Quiz};

const PIKACHU: &str = r#"{"sprite":"/img/25.png","types":["electric"],
                          "options":["pikachu","raichu"],"correct_answer":"pikachu"}"#;

fn option_buttons(html: &Html) -> Vec<(String, Vec<&'static str>, bool)> {
    html.find_all(|e| e.has_class("option-btn"))
        .into_iter()
        .map(|b| {
            let marks = ["correct", "wrong"]
                .iter()
                .copied()
                .filter(|m| b.has_class(m))
                .collect();
            (
                b.attr("data-name").unwrap_or_default().to_string(),
                marks,
                b.has_attr("disabled"),
            )
        })
        .collect()
}

fn click(quiz: &mut Quiz, activation: Activation) {
    if let Some(msg) = quiz.dispatch(&activation) {
        quiz.update(msg);
    }
}

fn answer(name: &str) -> Activation {
    Activation::new("answer", Some(name.to_string()))
}

#[test]
fn wrong_guess_scenario() {
    let (mut quiz, cmd) = Quiz::boot(Config::default(), Some(PIKACHU));
    assert!(cmd.is_none());

    click(&mut quiz, answer("raichu"));

    let html = quiz.view();
    assert_eq!(
        option_buttons(&html),
        vec![
            ("pikachu".to_string(), vec!["correct"], true),
            ("raichu".to_string(), vec!["wrong"], true),
        ]
    );
    let feedback = html.by_id("feedback").unwrap();
    assert!(feedback.has_class("wrong"));
    assert!(feedback.text().contains("pikachu"));
    assert_eq!(html.by_id("wrong-count").unwrap().text(), "1");
    assert_eq!(html.by_id("correct-count").unwrap().text(), "0");
    assert!(html.by_id("pokemon-sprite").unwrap().has_class("revealed"));
    assert_eq!(
        html.by_id("next-btn").unwrap().attr("style"),
        Some("display: block")
    );
}

#[test]
fn service_error_scenario() {
    let (mut quiz, _) = Quiz::boot(Config::default(), Some(PIKACHU));
    let cmd = quiz.update(Msg::Next);
    assert!(cmd.is_spawn());

    let failure = parse_reply(500, r#"{"error":"no more pokemon"}"#);
    assert_eq!(failure, Err(FetchError::Service("no more pokemon".into())));
    let cmd = quiz.update(Msg::Loaded(failure));
    assert_eq!(cmd.reload_notice(), Some(DEFAULT_ALERT));
    assert_eq!(quiz.score().answered(), 0);
}

#[test]
fn score_tracks_a_session() {
    let (mut quiz, _) = Quiz::boot(Config::default(), Some(PIKACHU));
    let rounds = [
        ("pikachu", "pikachu"),
        ("raichu", "pikachu"),
        ("bulbasaur", "bulbasaur"),
        ("ivysaur", "venusaur"),
        ("mew", "mew"),
    ];
    let mut last = quiz.score();
    for (i, &(guess, correct)) in rounds.iter().enumerate() {
        if i > 0 {
            let others: Vec<String> = ["pikachu", "raichu", "bulbasaur", "ivysaur", "venusaur", "mew"]
                .iter()
                .map(|s| s.to_string())
                .collect();
            let q = Question::new("/img/x.png", vec!["normal".into()], others, correct).unwrap();
            assert!(quiz.update(Msg::Next).is_spawn());
            quiz.update(Msg::Loaded(Ok(q)));
        }
        click(&mut quiz, answer(guess));
        // hammering the buttons after answering changes nothing
        click(&mut quiz, answer(correct));
        click(&mut quiz, answer(guess));

        let score = quiz.score();
        assert!(score.correct() >= last.correct());
        assert!(score.wrong() >= last.wrong());
        assert_eq!(score.answered(), i as u32 + 1);
        last = score;
    }
    assert_eq!(last.correct(), 3);
    assert_eq!(last.wrong(), 2);
}

#[test]
fn next_question_matches_the_server() {
    let (mut quiz, _) = Quiz::boot(Config::default(), Some(PIKACHU));
    click(&mut quiz, answer("pikachu"));
    click(&mut quiz, Activation::new("next", None));
    assert!(quiz.is_loading());

    let reply = r#"{"sprite":"/img/133.png","types":["normal"],
                   "options":["eevee","vaporeon","jolteon","flareon"],
                   "correct_answer":"jolteon"}"#;
    quiz.update(Msg::Loaded(parse_reply(200, reply)));

    let html = quiz.view();
    let names: Vec<String> = option_buttons(&html).into_iter().map(|b| b.0).collect();
    assert_eq!(names, vec!["eevee", "vaporeon", "jolteon", "flareon"]);
    assert_eq!(quiz.question().unwrap().correct(), "jolteon");
    assert!(option_buttons(&html).iter().all(|b| b.1.is_empty() && !b.2));
}

#[test]
fn question_missing_its_answer_is_a_failure() {
    let config = Config {
        max_retries: 1,
        ..Config::default()
    };
    let (mut quiz, _) = Quiz::boot(config, Some(PIKACHU));
    assert!(quiz.update(Msg::Next).is_spawn());
    let reply = r#"{"sprite":"/a.png","types":[],"options":["a","b"],"correct_answer":"c"}"#;
    let first = quiz.update(Msg::Loaded(parse_reply(200, reply)));
    assert!(first.is_spawn());
    let second = quiz.update(Msg::Loaded(parse_reply(200, reply)));
    assert!(second.reload_notice().is_some());
    assert_eq!(quiz.question().unwrap().correct(), "pikachu");
}

#[test]
fn service_down_from_the_start_does_not_reload() {
    let (mut quiz, cmd) = Quiz::boot(Config::default(), None);
    assert!(!cmd.is_none());
    assert!(quiz.update(Msg::Next).is_spawn());
    let failure = parse_reply(503, "Service Unavailable");
    assert_eq!(failure, Err(FetchError::Status(503)));
    let cmd = quiz.update(Msg::Loaded(failure));
    assert_eq!(cmd.reload_notice(), None);
    assert!(quiz.is_stalled());

    click(&mut quiz, Activation::new("next", None));
    assert!(quiz.is_loading());
    quiz.update(Msg::Loaded(parse_reply(200, PIKACHU)));
    assert!(!quiz.is_stalled());
    assert_eq!(option_buttons(&quiz.view()).len(), 2);
}
