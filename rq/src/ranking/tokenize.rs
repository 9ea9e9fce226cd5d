//! Query/document segmentation
//!
//! Both documents and queries go through the same segmentation so term
//! matching is symmetric. Unicode word boundaries (UAX #29) handle scripts
//! without whitespace word separation: Han ideographs come out one segment
//! each, latin text comes out word per segment.

use unicode_segmentation::UnicodeSegmentation;

/// Segment text into matchable terms
pub fn tokenize(text: &str) -> Vec<String> {
    text.unicode_words().map(|w| w.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin_words() {
        assert_eq!(tokenize("Inbound receipt flow"), vec!["inbound", "receipt", "flow"]);
    }

    #[test]
    fn test_han_ideographs_segment_individually() {
        assert_eq!(tokenize("商品管理"), vec!["商", "品", "管", "理"]);
    }

    #[test]
    fn test_mixed_script_and_punctuation() {
        assert_eq!(tokenize("查閱「3.1入庫單維護」"), vec!["查", "閱", "3.1", "入", "庫", "單", "維", "護"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  \n\t").is_empty());
    }

    #[test]
    fn test_case_folding() {
        assert_eq!(tokenize("WMS Module"), vec!["wms", "module"]);
    }
}
