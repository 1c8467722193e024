//! Citation-indexed context formatting.

use crate::types::WebPage;

/// Serialize search hits into the context block the answer template cites.
///
/// Page `i` (1-based, in input order) becomes
/// `[webpage i begin]<summary>[webpage i end]`; segments are joined with a
/// single newline. Summaries are copied verbatim and identical summaries
/// still get their own segment. No pages yields an empty string.
pub fn format_webpages(pages: &[WebPage]) -> String {
    pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let index = i + 1;
            format!(
                "[webpage {} begin]{}[webpage {} end]",
                index, page.summary, index
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(summaries: &[&str]) -> Vec<WebPage> {
        summaries.iter().map(|s| WebPage::with_summary(*s)).collect()
    }

    #[test]
    fn test_two_pages() {
        assert_eq!(
            format_webpages(&pages(&["A", "B"])),
            "[webpage 1 begin]A[webpage 1 end]\n[webpage 2 begin]B[webpage 2 end]"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(format_webpages(&[]), "");
    }

    #[test]
    fn test_indices_contiguous_and_ordered() {
        let input = pages(&["s1", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10"]);
        let context = format_webpages(&input);
        let lines: Vec<&str> = context.split('\n').collect();

        assert_eq!(lines.len(), input.len());
        for (i, line) in lines.iter().enumerate() {
            let n = i + 1;
            assert_eq!(*line, format!("[webpage {n} begin]s{n}[webpage {n} end]"));
        }
    }

    #[test]
    fn test_duplicates_and_empty_summaries_kept() {
        let context = format_webpages(&pages(&["same", "", "same"]));
        assert_eq!(
            context,
            "[webpage 1 begin]same[webpage 1 end]\n\
             [webpage 2 begin][webpage 2 end]\n\
             [webpage 3 begin]same[webpage 3 end]"
        );
    }
}
