use guiagen::guide::GuideDraft;
use guiagen::sections::{normalize_label, split_sections};
use spectral::assert_that;

#[test]
fn splits_two_sections_and_leaves_the_rest_empty() {
    let raw = "--DATOS--\nAsignatura: Mate\n\n--DESARROLLO--\nTexto.\n";

    let draft = split_sections(raw);

    let expected = GuideDraft {
        datos: "Asignatura: Mate".to_string(),
        desarrollo: "Texto.".to_string(),
        ..GuideDraft::default()
    };
    assert_that(&draft).is_equal_to(expected);
}

#[test]
fn recovers_every_body_regardless_of_marker_order() {
    let raw = "--BIBLIOGRAFIA--\nuna referencia\n--DATOS--\ndatos aquí\n--AUTOEVALUACION--\n1. pregunta\n--RUBRICA--\n| a | b |\n--ACTIVIDADES--\nTema: algo\n--DESARROLLO--\npárrafo\n";

    let draft = split_sections(raw);

    let expected = GuideDraft {
        datos: "datos aquí".to_string(),
        desarrollo: "párrafo".to_string(),
        actividades: "Tema: algo".to_string(),
        rubrica: "| a | b |".to_string(),
        autoevaluacion: "1. pregunta".to_string(),
        bibliografia: "una referencia".to_string(),
        ..GuideDraft::default()
    };
    assert_that(&draft).is_equal_to(expected);
}

#[test]
fn duplicate_markers_last_occurrence_wins() {
    let raw = "--DATOS--\nprimero\n--DATOS--\nsegundo\n";

    let draft = split_sections(raw);

    assert_that(&draft.datos).is_equal_to("segundo".to_string());
}

#[test]
fn tolerates_case_accents_and_pluralized_labels() {
    let raw = "--datos--\nuno\n-- Rúbricas --\ndos\n--AUTOEVALUACIÓN--\ntres\n";

    let draft = split_sections(raw);

    assert_that(&draft.datos).is_equal_to("uno".to_string());
    assert_that(&draft.rubrica).is_equal_to("dos".to_string());
    assert_that(&draft.autoevaluacion).is_equal_to("tres".to_string());
}

#[test]
fn unknown_labels_are_dropped_silently() {
    let raw = "--DATOS--\nuno\n--NOTAS--\nignorado\n--DESARROLLO--\ndos\n";

    let draft = split_sections(raw);

    assert_that(&draft.datos).is_equal_to("uno".to_string());
    assert_that(&draft.desarrollo).is_equal_to("dos".to_string());
}

#[test]
fn falls_back_to_literal_markers_when_no_marker_line_exists() {
    // Markers glued to the content never form a full marker line.
    let raw = "--DATOS-- Asignatura: Física --DESARROLLO-- Un párrafo.";

    let draft = split_sections(raw);

    assert_that(&draft.datos).is_equal_to("Asignatura: Física".to_string());
    assert_that(&draft.desarrollo).is_equal_to("Un párrafo.".to_string());
}

#[test]
fn text_without_any_marker_yields_an_empty_draft() {
    let draft = split_sections("una respuesta sin delimitadores");

    assert_that(&draft).is_equal_to(GuideDraft::default());
}

#[test]
fn normalize_label_strips_accents_spaces_and_case() {
    assert_that(&normalize_label("Número de Guía")).is_equal_to("NUMERODEGUIA".to_string());
    assert_that(&normalize_label("numero de guia")).is_equal_to("NUMERODEGUIA".to_string());
    assert_that(&normalize_label("  AUTOEVALUACIÓN ")).is_equal_to("AUTOEVALUACION".to_string());
    assert_that(&normalize_label("")).is_equal_to(String::new());
}
