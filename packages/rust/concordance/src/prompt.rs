//! Prompt construction and model output parsing.

use biblia_shared::{BibliaError, CrossReference, Result, VerseRef};

/// Build the instruction sent to the model for one verse.
pub fn build_prompt(reference: &VerseRef, verse_text: &str) -> String {
    format!(
        r#"Eres un experto en español bíblico. Proporciona hasta 3 referencias cruzadas (concordancias) para el versículo {reference} ("{verse_text}") en la Biblia. Cada referencia debe incluir libro, capítulo, versículo y un fragmento breve del texto (máximo 20 palabras). Responde solo con un array JSON de objetos, por ejemplo:
[
  {{"book": "Génesis", "chapter": 1, "verse": 1, "text": "En el principio creó..."}},
  {{"book": "Colosenses", "chapter": 1, "verse": 16, "text": "Porque en él fueron..."}}
]"#
    )
}

/// Parse the model's text as a JSON array of cross references.
///
/// A surrounding Markdown code fence is tolerated; anything else that is not
/// a JSON array of `{book, chapter, verse, text}` is an error.
pub fn parse_related(text: &str) -> Result<Vec<CrossReference>> {
    let body = strip_code_fence(text.trim());
    serde_json::from_str(body).map_err(|e| {
        BibliaError::Inference(format!(
            "model output is not a JSON array of cross references: {e}"
        ))
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an optional language tag on the opening fence line.
    let rest = rest.split_once('\n').map_or(rest, |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
