//! Question answering over a small knowledge base of form-filling tips.
//!
//! Matching itself is pluggable through [`TextMatcher`]; this module only
//! holds the data and the fallback behaviour.

use serde::{Deserialize, Serialize};

/// Reply used when no topic is close enough to the question.
pub const NOT_FOUND_REPLY: &str = "No encontré información exacta, pero puedes revisar los manuales disponibles en la sección de descargas.";

/// A stored answer for one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Field the answer is about, e.g. `CURP`. Matched against questions.
    pub topic: String,
    pub text: String,
    /// Document the answer was taken from.
    pub source: String,
}

/// Finds the stored answer closest to a free-text question.
pub trait TextMatcher {
    fn best_match(&self, query: &str) -> Option<&Answer>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    answers: Vec<Answer>,
}

impl KnowledgeBase {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self { answers }
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        const ENTRIES: &[(&str, &str, &str)] = &[
            (
                "CURP",
                "La CURP debe contener 18 caracteres en mayúsculas, sin espacios ni guiones. Ejemplo: ABCD010101HDFRRN09.",
                "INSTRUCCIONES DE LLENADO DEL PUB",
            ),
            (
                "SEXO",
                "En el campo SEXO utiliza 'H' para Hombre y 'M' para Mujer, según la clave del catálogo GENERO.xlsx.",
                "MANUAL GUÍA PUB PERSONAS",
            ),
            (
                "DOMICILIO",
                "Captura la dirección separando calle, número, colonia y código postal (5 dígitos).",
                "MANUAL ASESORÍA DIF JALISCO",
            ),
            (
                "ESCOLARIDAD",
                "Selecciona la clave correspondiente del catálogo ESCOLARIDAD.xlsx, según el nivel educativo alcanzado.",
                "MANUAL GUÍA PUB PERSONAS",
            ),
            (
                "ENTIDAD",
                "Usa la clave de 2 dígitos del catálogo CLAVE_ENT.xlsx.",
                "INSTRUCCIONES DE LLENADO DEL PUB",
            ),
            (
                "MUNICIPIO",
                "Usa la clave de 3 dígitos del catálogo CLAVE_MUN.xlsx para el municipio correspondiente.",
                "INSTRUCCIONES DE LLENADO DEL PUB",
            ),
        ];

        Self::new(
            ENTRIES
                .iter()
                .map(|(topic, text, source)| Answer {
                    topic: topic.to_string(),
                    text: text.to_string(),
                    source: source.to_string(),
                })
                .collect(),
        )
    }
}

/// Render the best answer with its source, or [`NOT_FOUND_REPLY`].
pub fn answer_or_fallback(matcher: &dyn TextMatcher, query: &str) -> String {
    match matcher.best_match(query) {
        Some(answer) => format!("{}\n\nFuente: {}", answer.text, answer.source),
        None => NOT_FOUND_REPLY.to_string(),
    }
}
