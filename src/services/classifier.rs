//! Legal-status classification - service layer
//!
//! Pure function from an ordered code sequence to a verdict plus the
//! human-readable despacho and análise-substantiva annotations. Classification
//! policy is exact-match lookup against the static tables; the presence of any
//! not-in-force code is dispositive regardless of in-force codes also present
//! (administrative rulings override).

use crate::models::status_codes::{
    EXAM_REQUESTED, IN_FORCE, NOT_IN_FORCE, SUBSTANTIVE_ANALYSIS, TECHNICAL_OPINION,
};
use crate::models::{ClassificationResult, Verdict};

/// Synthesized when an in-force patent shows no technical opinion (code 120)
pub const OPINION_ISSUED_NOTE: &str = "- PARECER TÉCNICO EMITIDO -";

/// Synthesized when no technical examination request (code 203) was matched
pub const EXAM_ABSENT_NOTE: &str = "- EXAME TÉCNICO AUSENTE!!! -";

/// Classify one patent from its extracted status codes
pub fn classify(codes: &[String]) -> ClassificationResult {
    let mut nvig: Vec<String> = Vec::new();
    let mut vig: Vec<String> = Vec::new();
    let mut ansu: Vec<String> = Vec::new();

    // The three membership tests are independent: a single code may land in
    // more than one accumulator.
    for code in codes {
        let code = code.as_str();
        if let Some(label) = NOT_IN_FORCE.get(code) {
            nvig.push((*label).to_string());
        }
        if let Some(label) = IN_FORCE.get(code) {
            vig.push((*label).to_string());
        }
        if let Some(label) = SUBSTANTIVE_ANALYSIS.get(code) {
            ansu.push((*label).to_string());
        }
    }

    let verdict = if nvig.is_empty() {
        Verdict::InForce
    } else {
        Verdict::NotInForce
    };

    if verdict == Verdict::InForce && !ansu.iter().any(|label| label == TECHNICAL_OPINION) {
        ansu.push(OPINION_ISSUED_NOTE.to_string());
    }

    if !vig.iter().any(|label| label == EXAM_REQUESTED) {
        ansu.push(EXAM_ABSENT_NOTE.to_string());
    }

    let mut despacho = nvig;
    despacho.extend(vig);

    ClassificationResult {
        verdict,
        despacho,
        analise: ansu,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn classification_is_deterministic() {
        let c = codes(&["8.12", "9.1", "120"]);
        assert_eq!(classify(&c), classify(&c));
    }

    #[test]
    fn any_not_in_force_code_is_dispositive() {
        let result = classify(&codes(&["9.1", "16.1", "203", "21.2"]));
        assert_eq!(result.verdict, Verdict::NotInForce);
    }

    #[test]
    fn empty_codes_yield_in_force_with_both_warnings() {
        let result = classify(&[]);
        assert_eq!(result.verdict, Verdict::InForce);
        assert!(result.despacho.is_empty());
        assert_eq!(
            result.analise,
            vec![OPINION_ISSUED_NOTE.to_string(), EXAM_ABSENT_NOTE.to_string()]
        );
    }

    #[test]
    fn despacho_orders_not_in_force_before_in_force() {
        // Extraction order interleaves the groups; despacho regroups them
        let result = classify(&codes(&["9.1", "8.12", "16.1", "21.2"]));
        assert_eq!(
            result.despacho,
            vec![
                "8.12 - ARQ DEFINITIVO - FALTA DE PGT",
                "21.2 - EXTINÇÃO - RENÚNCIA",
                "9.1 - DEFERIMENTO",
                "16.1 - CONCESSÃO DE CARTA PATENTE",
            ]
        );
    }

    #[test]
    fn a_code_can_land_in_two_accumulators() {
        let result = classify(&codes(&["16.1"]));
        assert!(result.despacho.contains(&"16.1 - CONCESSÃO DE CARTA PATENTE".to_string()));
        assert!(result.analise.contains(&"16.1 - CONCESSÃO DE CARTA PATENTE".to_string()));
    }

    #[test]
    fn technical_opinion_note_is_suppressed_by_code_120() {
        let result = classify(&codes(&["120"]));
        assert_eq!(result.verdict, Verdict::InForce);
        assert!(!result.analise.contains(&OPINION_ISSUED_NOTE.to_string()));
        assert!(result.analise.contains(&"120 - PARECER TÉCNICO".to_string()));
    }

    #[test]
    fn technical_opinion_note_is_not_added_for_not_in_force_patents() {
        let result = classify(&codes(&["8.12"]));
        assert!(!result.analise.contains(&OPINION_ISSUED_NOTE.to_string()));
    }

    #[test]
    fn exam_absent_note_is_suppressed_by_code_203() {
        let result = classify(&codes(&["203"]));
        assert!(!result.analise.contains(&EXAM_ABSENT_NOTE.to_string()));
    }

    #[test]
    fn exam_absent_note_applies_regardless_of_verdict() {
        let result = classify(&codes(&["8.12"]));
        assert!(result.analise.contains(&EXAM_ABSENT_NOTE.to_string()));
    }

    #[test]
    fn duplicate_codes_produce_duplicate_labels() {
        let result = classify(&codes(&["9.1", "9.1"]));
        assert_eq!(
            result.despacho,
            vec!["9.1 - DEFERIMENTO", "9.1 - DEFERIMENTO"]
        );
    }

    #[test]
    fn display_joins_with_semicolons() {
        let result = classify(&codes(&["8.12", "9.1"]));
        assert_eq!(result.verdict, Verdict::NotInForce);
        assert_eq!(
            result.despacho_text(),
            "8.12 - ARQ DEFINITIVO - FALTA DE PGT; 9.1 - DEFERIMENTO"
        );
    }
}
