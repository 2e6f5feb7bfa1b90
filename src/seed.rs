use crate::error::StoreError;
use crate::models::{NewOption, NewQuestion};
use crate::store::QuestionStore;
use tracing::info;

pub fn sample_questions() -> Vec<NewQuestion> {
    let q = |text: &str, options: [&str; 4], correct: usize| NewQuestion {
        text: text.into(),
        options: options
            .iter()
            .enumerate()
            .map(|(i, o)| NewOption::new(*o, i == correct))
            .collect(),
    };

    vec![
        q(
            "What is a goroutine in Go?",
            ["A lightweight thread managed by Go runtime", "A Go function", "A Go package", "A Go variable"],
            0,
        ),
        q("Which keyword is used to define a new type in Go?", ["struct", "type", "var", "func"], 1),
        q("How do you declare a variable in Go?", ["let x int = 5", "x := 5", "var x = 5", "Both 2 and 3"], 3),
        q("What is the zero value of an int in Go?", ["nil", "0", "undefined", "false"], 1),
        q("Which package is used for formatted I/O in Go?", ["io", "fmt", "os", "bufio"], 1),
    ]
}

pub async fn seed_if_empty(store: &dyn QuestionStore) -> Result<usize, StoreError> {
    if !store.fetch_catalog().await?.is_empty() {
        info!("question store already populated, skipping seed");
        return Ok(0);
    }

    let questions = sample_questions();
    let count = questions.len();
    for question in questions {
        store.create_question(question).await?;
    }
    info!(count, "seeded sample questions");
    Ok(count)
}
