pub const MODEL_API_KEY_ENV_NAME: &str = "GUIAGEN_MODEL_API_KEY";

pub(crate) const THINK_STRIPPER: &str = r"<think>[\s\S]*</think>\s*";

/// Base URL used to synthesize fallback search links for bibliography entries.
pub const SEARCH_URL_BASE: &str = "https://www.google.com/search";

/// Rubric table used whenever a guide arrives without a RUBRICA section.
pub const DEFAULT_RUBRIC_TABLE: &str = "| Criterio | Muy bien | Bien | En progreso |
| --- | --- | --- | --- |
| Exactitud | - | - | - |
| Presentación | - | - | - |
| Interpretación | - | - | - |
| Aplicación | - | - | - |";

pub(crate) const DEFAULT_PROMPT_TEMPLATE: &str = r#"Genera una guía de estudio dividida en secciones claramente delimitadas por etiquetas de texto plano (NO JSON, NO Markdown obligatorio). Usa los delimitadores exactamente así (en mayúsculas entre dos guiones cada uno) y responde solo con esas secciones y su texto plano:
--DATOS--
--DESARROLLO--
--ACTIVIDADES--
--RUBRICA--
--AUTOEVALUACION--
--BIBLIOGRAFIA--

Datos de entrada:
Asignatura: {subject}
Unidad de estudio: {unit}
Temas (máximo 4):
{topics}
Semana de inicio para las actividades: {start_week}

Instrucciones (texto plano):
- En --DESARROLLO-- escribe un párrafo extendido que describa la unidad (un solo párrafo sin saltos de línea).
- En --ACTIVIDADES-- genera una actividad por cada tema. Para cada actividad la descripción de la tarea, formato de entrega, fecha de entrega (por ejemplo: Semana 1, Semana 2, ...) y una fuente bibliográfica en formato APA (preferentemente en español cuando exista). Entrega la información en texto plano, separando actividades con líneas en blanco.
- En --RUBRICA-- entrega EXACTAMENTE 4 criterios. Para cada criterio proporciona tres niveles con estos títulos exactos: "Muy bien", "Bien", "En progreso". No añadas valores numéricos ni puntuaciones dentro de las descripciones de nivel. Puedes entregar la rúbrica como una tabla simple usando barras verticales (|) o como bloques etiquetados.
- En --AUTOEVALUACION-- entrega 10 preguntas de opción múltiple en texto plano; para cada pregunta incluye opciones A-D y especifica la respuesta correcta entre paréntesis al final (ej.: "(C) correcto").
- En --BIBLIOGRAFIA-- lista las referencias en formato APA, una por línea, con el formato "<referencia APA> | <URL o NO_LINK>".

Responde únicamente con las secciones delimitadas y su contenido en texto plano; no añadas explicaciones, encabezados extra ni JSON."#;
