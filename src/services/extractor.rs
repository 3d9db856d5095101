//! Status-code extraction - service layer
//!
//! Pulls the despacho code tokens out of a patent's detail page. Pure: same
//! document in, same codes out.

use scraper::{Html, Selector};

use crate::infrastructure::Document;

/// Anchors carrying a status code: styled "normal" and deliberately
/// non-navigating (placeholder href).
const CODE_ANCHOR_SELECTOR: &str = r#"a.normal[href="javascript:void(0)"]"#;

/// Extract the status-code tokens from a detail page
///
/// Scans anchors in document order and keeps the trimmed text of every one
/// matching the code-anchor pattern. Order and duplicates are preserved
/// exactly as encountered; a page without matches yields an empty list, not
/// an error.
pub fn extract_status_codes(doc: &Document) -> Vec<String> {
    let dom = Html::parse_document(doc.html());
    let sel = Selector::parse(CODE_ANCHOR_SELECTOR).expect("hard-coded selector is valid CSS");

    dom.select(&sel)
        .filter_map(|anchor| {
            let text = anchor.text().collect::<String>();
            let text = text.trim();
            if text.is_empty() {
                None
            } else {
                Some(text.to_string())
            }
        })
        .collect()
}
