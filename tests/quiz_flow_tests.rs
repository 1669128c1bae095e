//! Integration tests for the quiz service: bank loading, session lifecycle,
//! per-learner serialisation and the completion signal.

use std::io::Write;
use std::sync::Arc;

use scholar_irt::{
    CatEngine, EngineConfig, InMemorySessionRepository, IrtError, ItemBank, NextQuestion,
    QuizPhase, QuizService, SessionRepository,
};

fn demo_service() -> QuizService<Arc<InMemorySessionRepository>> {
    QuizService::new(
        CatEngine::default(),
        ItemBank::demo(),
        Arc::new(InMemorySessionRepository::new()),
    )
}

#[test]
fn test_full_quiz_until_complete() {
    let quiz = demo_service();
    let mut seen = Vec::new();

    loop {
        match quiz.next_question("learner").unwrap() {
            NextQuestion::Question { item, .. } => {
                assert!(!seen.contains(&item.id().to_string()));
                seen.push(item.id().to_string());
                let outcome = quiz.submit_answer("learner", item.id(), seen.len() % 2 == 1).unwrap();
                assert!((-4.0..=4.0).contains(&outcome.result.new_theta));
                assert_eq!(outcome.complete, seen.len() == 5);
            }
            NextQuestion::Complete { theta, mastery } => {
                assert!(mastery > 0.0 && mastery < 1.0);
                let session = quiz.session("learner").unwrap().unwrap();
                assert_eq!(session.theta, theta);
                break;
            }
        }
    }

    assert_eq!(seen.len(), 5);
    assert_eq!(seen[0], "q2");

    let session = quiz.session("learner").unwrap().unwrap();
    assert_eq!(session.phase, QuizPhase::Done);
    assert_eq!(session.history.len(), 5);
    for pair in session.history.windows(2) {
        assert_eq!(pair[0].new_theta, pair[1].old_theta);
    }

    // asking again after completion keeps signalling completion
    assert!(quiz.next_question("learner").unwrap().is_complete());
}

#[test]
fn test_empty_bank_completes_immediately() {
    let quiz = QuizService::new(
        CatEngine::default(),
        ItemBank::new(Vec::new()).unwrap(),
        InMemorySessionRepository::new(),
    );
    let next = quiz.next_question("learner").unwrap();
    assert_eq!(
        next,
        NextQuestion::Complete {
            theta: 0.0,
            mastery: 0.5
        }
    );
}

#[test]
fn test_sessions_are_independent() {
    let quiz = demo_service();
    quiz.start("strong", 2.5).unwrap();
    quiz.start("weak", -2.5).unwrap();

    let strong = quiz.next_question("strong").unwrap();
    let weak = quiz.next_question("weak").unwrap();
    assert_ne!(strong.item().map(|i| i.id().to_string()), weak.item().map(|i| i.id().to_string()));

    quiz.submit_answer("weak", weak.item().unwrap().id(), false).unwrap();
    let strong_session = quiz.session("strong").unwrap().unwrap();
    assert_eq!(strong_session.theta, 2.5);
    assert!(strong_session.answered.is_empty());
}

#[test]
fn test_concurrent_learners_do_not_interfere() {
    let repository = Arc::new(InMemorySessionRepository::new());
    let quiz = Arc::new(QuizService::new(
        CatEngine::default(),
        ItemBank::demo(),
        Arc::clone(&repository),
    ));

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let quiz = Arc::clone(&quiz);
            std::thread::spawn(move || {
                let learner = format!("learner-{n}");
                while let NextQuestion::Question { item, .. } = quiz.next_question(&learner).unwrap() {
                    quiz.submit_answer(&learner, item.id(), n % 2 == 0).unwrap();
                }
                learner
            })
        })
        .collect();

    for handle in handles {
        let learner = handle.join().unwrap();
        let session = repository.get(&learner).unwrap().unwrap();
        assert_eq!(session.answered.len(), 5);
        assert!(session.phase.is_done());
    }
    assert_eq!(repository.len(), 8);
}

#[test]
fn test_duplicate_submissions_for_one_learner_are_serialised() {
    let quiz = Arc::new(demo_service());
    let item_id = quiz
        .next_question("learner")
        .unwrap()
        .item()
        .map(|item| item.id().to_string())
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let quiz = Arc::clone(&quiz);
            let item_id = item_id.clone();
            std::thread::spawn(move || quiz.submit_answer("learner", &item_id, true))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let accepted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(accepted, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|err| matches!(err, IrtError::AlreadyAnswered(_))));

    let session = quiz.session("learner").unwrap().unwrap();
    assert_eq!(session.history.len(), 1);
}

#[test]
fn test_bank_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{"id": "easy", "concept": "add", "subject": "math", "difficulty": -2.0, "discrimination": 1.0}},
            {{"id": "mid", "concept": "mul", "subject": "math", "difficulty": 0.1, "discrimination": 1.4, "guessing": 0.2}},
            {{"id": "hard", "concept": "log", "subject": "math", "difficulty": 2.5, "discrimination": 1.9}}
        ]"#
    )
    .unwrap();

    let bank = ItemBank::from_json_file(file.path()).unwrap();
    assert_eq!(bank.len(), 3);

    let quiz = QuizService::new(CatEngine::default(), bank, InMemorySessionRepository::new());
    let next = quiz.next_question("learner").unwrap();
    assert_eq!(next.item().map(|item| item.id()), Some("mid"));
}

#[test]
fn test_bank_from_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = ItemBank::from_json_file(dir.path().join("missing.json"));
    assert!(matches!(result, Err(IrtError::Io(_))));
}

#[test]
fn test_custom_learning_rate_flows_through_service() {
    let engine = CatEngine::new(EngineConfig {
        learning_rate: 0.1,
        ..Default::default()
    })
    .unwrap();
    let quiz = QuizService::new(engine, ItemBank::demo(), InMemorySessionRepository::new());

    quiz.next_question("learner").unwrap();
    let outcome = quiz.submit_answer("learner", "q2", true).unwrap();
    let expected = 0.1 * outcome.result.delta;
    assert!((outcome.result.new_theta - expected).abs() < 1e-12);
}
