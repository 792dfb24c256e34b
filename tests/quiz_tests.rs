use guiagen::guide::{QuizOption, QuizQuestion};
use guiagen::quiz::parse_quiz;
use spectral::assert_that;

fn option(label: char, text: &str, correct: bool) -> QuizOption {
    QuizOption {
        label,
        text: text.to_string(),
        correct,
    }
}

#[test]
fn inline_marker_selects_the_correct_option() {
    let text = "1. ¿Qué es X?\nA) uno\nB) dos (correcto)\nC) tres\nD) cuatro";

    let questions = parse_quiz(text);

    let expected = vec![QuizQuestion {
        question: "¿Qué es X?".to_string(),
        options: vec![
            option('A', "uno", false),
            option('B', "dos", true),
            option('C', "tres", false),
            option('D', "cuatro", false),
        ],
    }];
    assert_that(&questions).is_equal_to(expected);
}

#[test]
fn trailing_letter_annotation_wins_and_residual_option_is_dropped() {
    let text = "¿Capital de Perú?\nA) Lima\nB) Cusco\nC) Trujillo\n(A) correcto";

    let questions = parse_quiz(text);

    let expected = vec![QuizQuestion {
        question: "¿Capital de Perú?".to_string(),
        options: vec![
            option('A', "Lima", true),
            option('B', "Cusco", false),
            option('C', "Trujillo", false),
        ],
    }];
    assert_that(&questions).is_equal_to(expected);
}

#[test]
fn numbered_block_splits_into_multiple_questions() {
    let text = "1. Primera pregunta\nA) si\nB) no\n2. Segunda pregunta\nA) tal vez\nB) nunca";

    let questions = parse_quiz(text);

    let expected = vec![
        QuizQuestion {
            question: "Primera pregunta".to_string(),
            options: vec![option('A', "si", false), option('B', "no", false)],
        },
        QuizQuestion {
            question: "Segunda pregunta".to_string(),
            options: vec![option('A', "tal vez", false), option('B', "nunca", false)],
        },
    ];
    assert_that(&questions).is_equal_to(expected);
}

#[test]
fn single_line_body_splits_at_the_first_option_marker() {
    let text = "2. ¿Cuánto es 2+2? A) tres B) cuatro";

    let questions = parse_quiz(text);

    let expected = vec![QuizQuestion {
        question: "¿Cuánto es 2+2?".to_string(),
        options: vec![option('A', "tres", false), option('B', "cuatro", false)],
    }];
    assert_that(&questions).is_equal_to(expected);
}

#[test]
fn lowercase_option_letters_are_upper_cased() {
    let text = "¿Pregunta?\na) uno\nb) dos";

    let questions = parse_quiz(text);

    let expected = vec![QuizQuestion {
        question: "¿Pregunta?".to_string(),
        options: vec![option('A', "uno", false), option('B', "dos", false)],
    }];
    assert_that(&questions).is_equal_to(expected);
}

#[test]
fn a_question_without_options_is_still_emitted() {
    let text = "Explica el teorema fundamental del cálculo.";

    let questions = parse_quiz(text);

    let expected = vec![QuizQuestion {
        question: "Explica el teorema fundamental del cálculo.".to_string(),
        options: Vec::new(),
    }];
    assert_that(&questions).is_equal_to(expected);
}

#[test]
fn empty_input_yields_no_questions() {
    assert_that(&parse_quiz("").len()).is_equal_to(0);
    assert_that(&parse_quiz("  \n ").len()).is_equal_to(0);
}

#[test]
fn letters_glued_to_a_word_are_not_option_markers() {
    let text = "¿Qué figura se forma?\nA) un círculo (curva)\nB) una recta";

    let questions = parse_quiz(text);

    let expected = vec![QuizQuestion {
        question: "¿Qué figura se forma?".to_string(),
        options: vec![
            option('A', "un círculo (curva)", false),
            option('B', "una recta", false),
        ],
    }];
    assert_that(&questions).is_equal_to(expected);
}
