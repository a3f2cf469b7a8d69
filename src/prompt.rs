//! Grounding system instruction
//!
//! The assistant must answer exclusively from the loaded leaflet and say so
//! when the answer is not in it. The leaflet text is embedded verbatim.

const PHARMACIST_DIRECTIVE: &str = "Eres un farmacéutico experto y amable. \
Responde a las preguntas basándote EXCLUSIVAMENTE en el prospecto \
proporcionado a continuación. Si la información no está en el texto, \
indícalo. Mantén el contexto de la conversación.";

/// Build the system instruction for one grounded chat turn.
pub fn grounding_instruction(leaflet_text: &str) -> String {
    format!("{PHARMACIST_DIRECTIVE}\n\n--- PROSPECTO OFICIAL ---\n{leaflet_text}")
}
