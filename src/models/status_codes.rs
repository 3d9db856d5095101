//! Static classification tables
//!
//! Three mappings from a short despacho code (as printed in the RPI and shown
//! on the portal's result page) to its descriptive label. Compile-time
//! constant and never mutated.

use phf::{phf_map, Map};

/// Label for code 203, whose absence from the in-force matches triggers the
/// "exame técnico ausente" warning.
pub const EXAM_REQUESTED: &str = "203 - EXAME TÉCNICO SOLICITADO";

/// Label for code 120, whose absence from the substantive-analysis matches
/// triggers the "parecer técnico emitido" annotation.
pub const TECHNICAL_OPINION: &str = "120 - PARECER TÉCNICO";

/// Codes that terminate protection (arquivamento, extinção, indeferimento...)
pub static NOT_IN_FORCE: Map<&'static str, &'static str> = phf_map! {
    "8.12" => "8.12 - ARQ DEFINITIVO - FALTA DE PGT",
    "11.1.1" => "11.1.1 - ARQ DEFINITIVO - ANTERIORIDADE",
    "11.2" => "11.2 - ARQUIVAMENTO DEFINITIVO - ART. 33",
    "11.4" => "11.4 - ARQUIVAMENTO DEFINITIVO - ART. 86",
    "11.6" => "11.6 - ARQUIVAMENTO DEFINITIVO - EXIGÊNCIA NÃO RESPONDIDA",
    "11.11" => "11.11 - ARQUIVAMENTO DEFINITIVO",
    "11.20" => "11.20 - ARQUIVAMENTO - FALTA DE PEDIDO DE EXAME",
    "11.21" => "11.21 - ARQUIVAMENTO DEFINITIVO - ART. 216",
    "18.3" => "18.3 - ARQUIVAMENTO DO PEDIDO",
    "21.1" => "21.1 - EXTINÇÃO - FALTA DE PAGAMENTO DE ANUIDADE",
    "21.2" => "21.2 - EXTINÇÃO - RENÚNCIA",
    "21.7" => "21.7 - EXTINÇÃO - ART. 78",
    "9.2.4" => "9.2.4 - INDEFERIMENTO",
    "111" => "111 - NULIDADE ADMINISTRATIVA",
    "112" => "112 - NULIDADE - AÇÃO JUDICIAL",
    "113" => "113 - CADUCIDADE",
};

/// Codes indicating the protection is active or still progressing
pub static IN_FORCE: Map<&'static str, &'static str> = phf_map! {
    "9.1" => "9.1 - DEFERIMENTO",
    "16.1" => "16.1 - CONCESSÃO DE CARTA PATENTE",
    "100" => "100 - PUBLICAÇÃO DO PEDIDO",
    "203" => EXAM_REQUESTED,
};

/// Codes carrying substantive-examination annotations
pub static SUBSTANTIVE_ANALYSIS: Map<&'static str, &'static str> = phf_map! {
    "16.1" => "16.1 - CONCESSÃO DE CARTA PATENTE",
    "120" => TECHNICAL_OPINION,
    "121" => "121 - REPUBLICAÇÃO DE PARECER",
    "6.1" => "6.1 - EXIGÊNCIA TÉCNICA",
    "7.1" => "7.1 - CONHECIMENTO DE PARECER",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_labels_match_their_table_entries() {
        assert_eq!(IN_FORCE.get("203"), Some(&EXAM_REQUESTED));
        assert_eq!(SUBSTANTIVE_ANALYSIS.get("120"), Some(&TECHNICAL_OPINION));
    }

    #[test]
    fn a_code_may_live_in_more_than_one_table() {
        // 16.1 is both an in-force ruling and a substantive annotation
        assert!(IN_FORCE.contains_key("16.1"));
        assert!(SUBSTANTIVE_ANALYSIS.contains_key("16.1"));
    }
}
