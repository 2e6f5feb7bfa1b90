use crate::models::{Answer, Catalog, Question, QuizOption};

pub fn question(id: i64, text: &str, options: &[(i64, &str, bool)]) -> Question {
    Question {
        id,
        text: text.into(),
        options: options
            .iter()
            .map(|&(id, text, is_correct)| QuizOption {
                id,
                text: text.into(),
                is_correct,
            })
            .collect(),
        created_at: None,
        updated_at: None,
    }
}

pub fn sample_catalog() -> Catalog {
    Catalog::new(vec![
        question(
            1,
            "What is a goroutine in Go?",
            &[
                (1, "A lightweight thread managed by Go runtime", true),
                (2, "A Go function", false),
                (3, "A Go package", false),
                (4, "A Go variable", false),
            ],
        ),
        question(
            2,
            "Which keyword is used to define a new type in Go?",
            &[
                (5, "struct", false),
                (6, "type", true),
                (7, "var", false),
                (8, "func", false),
            ],
        ),
        question(
            3,
            "How do you declare a variable in Go?",
            &[
                (9, "let x int = 5", false),
                (10, "x := 5", false),
                (11, "var x = 5", false),
                (12, "Both 2 and 3", true),
            ],
        ),
        question(
            4,
            "What is the zero value of an int in Go?",
            &[
                (13, "nil", false),
                (14, "0", true),
                (15, "undefined", false),
                (16, "false", false),
            ],
        ),
        question(
            5,
            "Which package is used for formatted I/O in Go?",
            &[
                (17, "io", false),
                (18, "fmt", true),
                (19, "os", false),
                (20, "bufio", false),
            ],
        ),
    ])
    .expect("sample catalog is consistent")
}

pub fn answer(question_id: i64, answer_id: i64) -> Answer {
    Answer {
        question_id,
        answer_id,
    }
}

pub fn all_correct() -> Vec<Answer> {
    vec![
        answer(1, 1),
        answer(2, 6),
        answer(3, 12),
        answer(4, 14),
        answer(5, 18),
    ]
}
