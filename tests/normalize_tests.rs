use guiagen::bibliography::make_search_url;
use guiagen::constants::DEFAULT_RUBRIC_TABLE;
use guiagen::guide::{BibliographyEntry, GuideContext, GuideDraft};
use guiagen::normalize::normalize_guide;
use guiagen::quiz::parse_quiz;
use spectral::assert_that;

fn context() -> GuideContext {
    GuideContext {
        subject: "Matemática".to_string(),
        unit: "Cálculo diferencial".to_string(),
        guide_number: "3".to_string(),
        topics: vec!["Límites".to_string(), "Derivadas".to_string()],
        start_week: "Semana 1".to_string(),
    }
}

#[test]
fn missing_datos_is_synthesized_from_the_context() {
    let normalized = normalize_guide(&GuideDraft::default(), &context());

    assert_that(&normalized.datos).is_equal_to(
        "Número de guía: 3\nAsignatura: Matemática\nUnidad de estudio: Cálculo diferencial\nTemas: Límites; Derivadas".to_string(),
    );
}

#[test]
fn synthesized_datos_omits_blank_fields() {
    let context = GuideContext {
        subject: "Física".to_string(),
        ..GuideContext::default()
    };

    let normalized = normalize_guide(&GuideDraft::default(), &context);

    assert_that(&normalized.datos).is_equal_to("Asignatura: Física".to_string());
}

#[test]
fn present_sections_are_kept_and_trimmed() {
    let draft = GuideDraft {
        datos: "  Asignatura: Química  ".to_string(),
        desarrollo: " Un párrafo. ".to_string(),
        ..GuideDraft::default()
    };

    let normalized = normalize_guide(&draft, &context());

    assert_that(&normalized.datos).is_equal_to("Asignatura: Química".to_string());
    assert_that(&normalized.desarrollo).is_equal_to("Un párrafo.".to_string());
}

#[test]
fn missing_rubric_falls_back_to_the_default_table() {
    let normalized = normalize_guide(&GuideDraft::default(), &context());

    assert_that(&normalized.rubrica).is_equal_to(DEFAULT_RUBRIC_TABLE.to_string());
}

#[test]
fn rubric_score_annotations_are_sanitized_in_place() {
    let draft = GuideDraft {
        rubrica: "| Exactitud | correcto (4 pts) | parcial | mínimo |".to_string(),
        ..GuideDraft::default()
    };

    let normalized = normalize_guide(&draft, &context());

    assert_that(&normalized.rubrica)
        .is_equal_to("| Exactitud | correcto  | parcial | mínimo |".to_string());
}

#[test]
fn template_self_assessment_parses_into_ten_questions_with_b_correct() {
    let normalized = normalize_guide(&GuideDraft::default(), &context());

    let questions = parse_quiz(&normalized.autoevaluacion);
    assert_that(&questions.len()).is_equal_to(10);
    for question in &questions {
        assert_that(&question.options.len()).is_equal_to(4);
        let correct: Vec<char> = question
            .options
            .iter()
            .filter(|option| option.correct)
            .map(|option| option.label)
            .collect();
        assert_that(&correct).is_equal_to(vec!['B']);
    }
    let first = questions.first().expect("Expected a first question.");
    assert_that(&first.question).is_equal_to("Pregunta sobre Límites".to_string());
}

#[test]
fn structured_bibliography_items_win_over_the_text_section() {
    let draft = GuideDraft {
        bibliografia: "Texto que debe perder | NO_LINK".to_string(),
        bibliografia_items: vec![BibliographyEntry {
            text: "Stewart, J. (2018). Cálculo.".to_string(),
            link: "https://example.com/stewart".to_string(),
        }],
        ..GuideDraft::default()
    };

    let normalized = normalize_guide(&draft, &context());

    assert_that(&normalized.bibliografia)
        .is_equal_to("Stewart, J. (2018). Cálculo. | https://example.com/stewart".to_string());
}

#[test]
fn bibliography_falls_back_to_activity_source_lines() {
    let draft = GuideDraft {
        actividades: "Tema: Límites\nFuente bibliográfica: Larson, R. (2016). Precálculo."
            .to_string(),
        ..GuideDraft::default()
    };

    let normalized = normalize_guide(&draft, &context());

    let expected = vec![BibliographyEntry {
        text: "Larson, R. (2016). Precálculo.".to_string(),
        link: make_search_url("Larson, R. (2016). Precálculo."),
    }];
    assert_that(&normalized.bibliografia_items).is_equal_to(expected);
}

#[test]
fn bibliography_last_resort_synthesizes_a_topic_entry() {
    let normalized = normalize_guide(&GuideDraft::default(), &context());

    let expected = vec![BibliographyEntry {
        text: "Recursos sobre Límites".to_string(),
        link: make_search_url("Límites"),
    }];
    assert_that(&normalized.bibliografia_items).is_equal_to(expected);
}

#[test]
fn normalization_is_idempotent() {
    let context = context();
    let draft = GuideDraft {
        desarrollo: "Un párrafo sobre límites.".to_string(),
        actividades: "Tema: Límites\nFuente: Stewart, J. (2018). Cálculo.".to_string(),
        ..GuideDraft::default()
    };

    let once = normalize_guide(&draft, &context);
    let twice = normalize_guide(&once, &context);

    assert_that(&twice).is_equal_to(once);
}
