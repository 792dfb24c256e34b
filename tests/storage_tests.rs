use chrono::DateTime;
use guiagen::guide::{BibliographyEntry, Guide};
use guiagen::storage::Storage;
use spectral::assert_that;

fn sample_guide(id: &str) -> Guide {
    Guide {
        id: id.to_string(),
        created_at: DateTime::from_timestamp_secs(1_700_000_000).expect("Valid timestamp."),
        title: "Guía de Cálculo".to_string(),
        subject: "Matemática".to_string(),
        unit: "Cálculo diferencial".to_string(),
        guide_number: "3".to_string(),
        image_url: "https://example.com/cover.png".to_string(),
        topics: vec!["Límites".to_string(), "Derivadas".to_string()],
        datos: "Asignatura: Matemática".to_string(),
        desarrollo: "Un párrafo.".to_string(),
        actividades: "Tema: Límites".to_string(),
        rubrica: "| Exactitud | a | b | c |".to_string(),
        autoevaluacion: "1. ¿Pregunta?\nA) uno\nB) dos".to_string(),
        bibliografia: "Stewart, J. (2018). Cálculo. | https://example.com".to_string(),
        bibliografia_items: vec![BibliographyEntry {
            text: "Stewart, J. (2018). Cálculo.".to_string(),
            link: "https://example.com".to_string(),
        }],
    }
}

#[test]
fn upsert_and_get_round_trips_a_guide() {
    let storage = Storage::new(":memory:").expect("Failed to open in-memory database.");
    let guide = sample_guide("guide-1");

    storage.upsert_guide(&guide).expect("Failed to upsert.");
    let fetched = storage
        .get_guide("guide-1")
        .expect("Failed to fetch.")
        .expect("Expected the guide to exist.");

    assert_that(&fetched).is_equal_to(guide);
}

#[test]
fn get_returns_none_for_an_unknown_id() {
    let storage = Storage::new(":memory:").expect("Failed to open in-memory database.");

    let fetched = storage.get_guide("missing").expect("Failed to fetch.");

    assert_that(&fetched).is_equal_to(None);
}

#[test]
fn upsert_with_the_same_id_replaces_the_guide() {
    let storage = Storage::new(":memory:").expect("Failed to open in-memory database.");
    let mut guide = sample_guide("guide-1");
    storage.upsert_guide(&guide).expect("Failed to upsert.");

    guide.title = "Título nuevo".to_string();
    storage.upsert_guide(&guide).expect("Failed to upsert.");

    let fetched = storage
        .get_guide("guide-1")
        .expect("Failed to fetch.")
        .expect("Expected the guide to exist.");
    assert_that(&fetched.title).is_equal_to("Título nuevo".to_string());
    assert_that(&storage.list_ids().expect("Failed to list.").len()).is_equal_to(1);
}

#[test]
fn list_ids_orders_by_creation_time() {
    let storage = Storage::new(":memory:").expect("Failed to open in-memory database.");
    let mut older = sample_guide("older");
    older.created_at = DateTime::from_timestamp_secs(1_600_000_000).expect("Valid timestamp.");
    let newer = sample_guide("newer");

    storage.upsert_guide(&newer).expect("Failed to upsert.");
    storage.upsert_guide(&older).expect("Failed to upsert.");

    let ids = storage.list_ids().expect("Failed to list.");
    assert_that(&ids).is_equal_to(vec!["older".to_string(), "newer".to_string()]);
}

#[test]
fn list_guides_returns_id_title_and_created_at() {
    let storage = Storage::new(":memory:").expect("Failed to open in-memory database.");
    let guide = sample_guide("guide-1");
    storage.upsert_guide(&guide).expect("Failed to upsert.");

    let listed = storage.list_guides().expect("Failed to list.");

    let expected = vec![("guide-1".to_string(), guide.title, guide.created_at)];
    assert_that(&listed).is_equal_to(expected);
}

#[test]
fn remove_reports_whether_a_guide_was_deleted() {
    let storage = Storage::new(":memory:").expect("Failed to open in-memory database.");
    storage
        .upsert_guide(&sample_guide("guide-1"))
        .expect("Failed to upsert.");

    assert_that(&storage.remove_guide("guide-1").expect("Failed to remove.")).is_equal_to(true);
    assert_that(&storage.remove_guide("guide-1").expect("Failed to remove.")).is_equal_to(false);
    assert_that(&storage.list_ids().expect("Failed to list.").len()).is_equal_to(0);
}
