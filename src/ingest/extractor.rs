//! Candidate extraction from the notice-board markup
//!
//! The source page lists notices as table rows; each relevant row carries the
//! notice title in its first cell together with an anchor to the document.
//! This module is a pure structural projection: no date or identity logic.

use scraper::{Html, Selector};
use url::Url;

use crate::models::RawCandidate;

/// Row-oriented table extractor for notice candidates
pub struct NoticeExtractor {
    rows: Selector,
    cell: Selector,
    anchor: Selector,
}

impl NoticeExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: Selector::parse("table tr").expect("Invalid CSS selector: table tr"),
            cell: Selector::parse("td").expect("Invalid CSS selector: td"),
            anchor: Selector::parse("a").expect("Invalid CSS selector: a"),
        }
    }

    /// Project table rows into ordered candidates
    ///
    /// For each row the first cell supplies the trimmed title text and the
    /// first anchor's `href` supplies the link, resolved against `base`.
    /// Rows lacking either are skipped. Output preserves traversal order,
    /// which the source keeps newest-first.
    pub fn extract(&self, html: &str, base: &Url) -> Vec<RawCandidate> {
        let document = Html::parse_document(html);
        let mut candidates = Vec::new();

        for row in document.select(&self.rows) {
            let cell = match row.select(&self.cell).next() {
                Some(cell) => cell,
                None => continue,
            };

            let title = cell.text().collect::<String>().trim().to_string();
            if title.is_empty() {
                continue;
            }

            let href = match cell
                .select(&self.anchor)
                .next()
                .and_then(|a| a.value().attr("href"))
            {
                Some(href) => href,
                None => continue,
            };

            // Url::join also percent-encodes spaces in sloppy hrefs
            let url = match base.join(href) {
                Ok(url) => url,
                Err(err) => {
                    tracing::debug!(href, error = %err, "skipping row with unresolvable link");
                    continue;
                }
            };

            candidates.push(RawCandidate {
                title,
                url: url.to_string(),
                source_order: candidates.len(),
            });
        }

        candidates
    }
}

impl Default for NoticeExtractor {
    fn default() -> Self {
        Self::new()
    }
}
