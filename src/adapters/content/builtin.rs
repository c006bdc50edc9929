//! Lessons shipped with the crate.

use crate::domain::models::{AnswerSpec, GuidedProblem, PracticeProblem, RemediationStep, SubStep};
use crate::domain::ports::ContentSupplier;

/// Authored lessons for the most common high-severity misunderstandings.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinContent;

impl BuiltinContent {
    pub const LESSON_IDS: [&'static str; 5] = [
        "add_no_carry",
        "sub_smaller_from_larger",
        "sub_borrow_no_decrement",
        "large_dropped_placeholder_zero",
        "large_left_aligned",
    ];

    pub fn new() -> Self {
        Self
    }
}

impl ContentSupplier for BuiltinContent {
    fn remediation_content(&self, misunderstanding_id: &str) -> Option<Vec<RemediationStep>> {
        match misunderstanding_id {
            "add_no_carry" => Some(add_no_carry()),
            "sub_smaller_from_larger" => Some(sub_smaller_from_larger()),
            "sub_borrow_no_decrement" => Some(sub_borrow_no_decrement()),
            "large_dropped_placeholder_zero" => Some(large_dropped_placeholder_zero()),
            "large_left_aligned" => Some(large_left_aligned()),
            _ => None,
        }
    }
}

fn illustrate(visual_type: &str, description: &str) -> RemediationStep {
    RemediationStep::Illustrate {
        visual_type: visual_type.to_string(),
        description: description.to_string(),
    }
}

fn explain(text: &str) -> RemediationStep {
    RemediationStep::Explain {
        text: text.to_string(),
    }
}

fn ask(prompt: &str, answer: AnswerSpec) -> SubStep {
    SubStep {
        prompt: prompt.to_string(),
        answer,
        hint: None,
    }
}

fn hinted(prompt: &str, answer: AnswerSpec, hint: &str) -> SubStep {
    SubStep {
        hint: Some(hint.to_string()),
        ..ask(prompt, answer)
    }
}

fn guided(problem: &str, sub_steps: Vec<SubStep>) -> GuidedProblem {
    GuidedProblem {
        problem: problem.to_string(),
        sub_steps,
    }
}

fn practice(problems: &[(&str, i64)]) -> Vec<PracticeProblem> {
    problems
        .iter()
        .map(|&(text, answer)| PracticeProblem::numeric(text, answer))
        .collect()
}

fn check(problems: &[(&str, i64)]) -> RemediationStep {
    RemediationStep::Check {
        problems: practice(problems),
        passing_score: 0.8,
    }
}

fn yes() -> AnswerSpec {
    AnswerSpec::exact_with("yes", &["y"])
}

fn add_no_carry() -> Vec<RemediationStep> {
    vec![
        illustrate(
            "place_value_chart",
            "27 + 15 as blocks: 2 tens and 7 ones plus 1 ten and 5 ones. The 12 ones are bundled into 1 ten and 2 ones.",
        ),
        explain(
            "When the ones add up to 10 or more, ten of them make a new ten. Write the ones digit and carry the ten into the tens column.",
        ),
        RemediationStep::GuidedPractice {
            problems: vec![
                guided(
                    "27 + 15",
                    vec![
                        ask(
                            "Estimate first: about how much is 27 + 15?",
                            AnswerSpec::Range {
                                expected: "40".to_string(),
                                min: 35.0,
                                max: 50.0,
                            },
                        ),
                        hinted("Add the ones: 7 + 5", AnswerSpec::number(12), "Count on 5 from 7."),
                        ask("How many tens are in 12?", AnswerSpec::number(1)),
                        ask("Which digit goes in the ones place?", AnswerSpec::number(2)),
                        hinted(
                            "Add the tens and the carried ten: 2 + 1 + 1",
                            AnswerSpec::number(4),
                            "Do not forget the ten you carried.",
                        ),
                        ask("So what is 27 + 15?", AnswerSpec::number(42)),
                    ],
                ),
                guided(
                    "38 + 46",
                    vec![
                        ask("Add the ones: 8 + 6", AnswerSpec::number(14)),
                        ask("Is there a ten to carry?", yes()),
                        ask("Add the tens and the carried ten: 3 + 4 + 1", AnswerSpec::number(8)),
                        ask("So what is 38 + 46?", AnswerSpec::number(84)),
                    ],
                ),
            ],
        },
        RemediationStep::IndependentPractice {
            problems: practice(&[("19 + 23", 42), ("45 + 37", 82), ("56 + 28", 84)]),
        },
        check(&[
            ("29 + 14", 43),
            ("36 + 47", 83),
            ("58 + 25", 83),
            ("17 + 65", 82),
            ("48 + 39", 87),
        ]),
    ]
}

fn sub_smaller_from_larger() -> Vec<RemediationStep> {
    vec![
        illustrate(
            "base_ten_blocks",
            "53 as 5 tens and 3 ones. Taking away 8 ones is only possible after one ten is traded for ten ones.",
        ),
        explain(
            "Always take the bottom digit away from the top digit. If the top digit is smaller, trade one ten from the next column for ten ones first. Flipping the digits gives a different answer.",
        ),
        RemediationStep::GuidedPractice {
            problems: vec![guided(
                "53 - 28",
                vec![
                    ask("Is the top ones digit (3) smaller than the bottom one (8)?", yes()),
                    hinted(
                        "Trade one ten. How many ones are on top now?",
                        AnswerSpec::number(13),
                        "Ten ones join the 3 ones.",
                    ),
                    ask("Take away the ones: 13 - 8", AnswerSpec::number(5)),
                    ask("How many tens are left on top?", AnswerSpec::number(4)),
                    ask("Take away the tens: 4 - 2", AnswerSpec::number(2)),
                    ask("So what is 53 - 28?", AnswerSpec::number(25)),
                ],
            )],
        },
        RemediationStep::IndependentPractice {
            problems: practice(&[("42 - 17", 25), ("61 - 34", 27), ("70 - 26", 44)]),
        },
        check(&[
            ("52 - 37", 15),
            ("83 - 45", 38),
            ("64 - 29", 35),
            ("91 - 56", 35),
            ("75 - 48", 27),
        ]),
    ]
}

fn sub_borrow_no_decrement() -> Vec<RemediationStep> {
    vec![
        illustrate(
            "place_value_chart",
            "62 as 6 tens and 2 ones. One ten moves into the ones column, leaving 5 tens behind.",
        ),
        explain(
            "Borrowing moves a ten, it does not make a new one. When the ones column gets ten more, the tens digit goes down by one.",
        ),
        RemediationStep::GuidedPractice {
            problems: vec![guided(
                "62 - 37",
                vec![
                    ask("How many ones after borrowing a ten?", AnswerSpec::number(12)),
                    ask("Take away the ones: 12 - 7", AnswerSpec::number(5)),
                    hinted(
                        "The tens digit was 6. What is it after lending one ten?",
                        AnswerSpec::number(5),
                        "The ten you borrowed came from here.",
                    ),
                    ask("Take away the tens: 5 - 3", AnswerSpec::number(2)),
                    ask("So what is 62 - 37?", AnswerSpec::number(25)),
                ],
            )],
        },
        RemediationStep::IndependentPractice {
            problems: practice(&[("73 - 48", 25), ("54 - 19", 35), ("81 - 27", 54)]),
        },
        check(&[
            ("62 - 38", 24),
            ("45 - 18", 27),
            ("93 - 57", 36),
            ("71 - 29", 42),
            ("84 - 46", 38),
        ]),
    ]
}

fn large_dropped_placeholder_zero() -> Vec<RemediationStep> {
    vec![
        illustrate(
            "place_value_chart",
            "405 in a hundreds, tens and ones chart. The tens column is empty, and the 0 shows that it is empty.",
        ),
        explain(
            "A zero holds a place. 405 means 4 hundreds, 0 tens and 5 ones. Without the zero it reads as 45.",
        ),
        RemediationStep::GuidedPractice {
            problems: vec![
                guided(
                    "300 + 105",
                    vec![
                        ask("How many hundreds altogether?", AnswerSpec::number(4)),
                        ask("How many tens?", AnswerSpec::number(0)),
                        ask("How many ones?", AnswerSpec::number(5)),
                        hinted(
                            "Write the answer",
                            AnswerSpec::number(405),
                            "Every place needs a digit, even an empty one.",
                        ),
                    ],
                ),
                guided(
                    "Expanded form of 507",
                    vec![ask(
                        "Write 507 as hundreds + ones",
                        AnswerSpec::partition("500+7"),
                    )],
                ),
            ],
        },
        RemediationStep::IndependentPractice {
            problems: practice(&[("200 + 307", 507), ("650 - 50", 600), ("1000 + 25", 1025)]),
        },
        check(&[
            ("400 + 208", 608),
            ("905 - 500", 405),
            ("730 - 30", 700),
            ("1200 + 6", 1206),
            ("350 + 250", 600),
        ]),
    ]
}

fn large_left_aligned() -> Vec<RemediationStep> {
    vec![
        illustrate(
            "column_alignment",
            "345 + 21 written with ones under ones: the 1 of 21 sits under the 5 of 345, not under the 3.",
        ),
        explain(
            "Line numbers up from the right, ones under ones and tens under tens. A shorter number simply has nothing in its highest columns.",
        ),
        RemediationStep::GuidedPractice {
            problems: vec![guided(
                "345 + 21",
                vec![
                    ask("Which digit of 345 is in the ones place?", AnswerSpec::number(5)),
                    hinted(
                        "Which digit of 21 goes under it?",
                        AnswerSpec::number(1),
                        "Look at the rightmost digit.",
                    ),
                    ask("Add the ones: 5 + 1", AnswerSpec::number(6)),
                    ask("Add the tens: 4 + 2", AnswerSpec::number(6)),
                    ask("How many hundreds?", AnswerSpec::number(3)),
                    ask("So what is 345 + 21?", AnswerSpec::number(366)),
                ],
            )],
        },
        RemediationStep::IndependentPractice {
            problems: practice(&[("512 + 34", 546), ("678 - 45", 633), ("1203 + 64", 1267)]),
        },
        check(&[
            ("423 + 51", 474),
            ("786 - 32", 754),
            ("2150 + 38", 2188),
            ("967 - 5", 962),
            ("304 + 62", 366),
        ]),
    ]
}
