//! Date inference for notice candidates
//!
//! The source page carries no structured timestamp; filenames encode one
//! unreliably and inconsistently across years. Inference therefore runs a
//! prioritized cascade of independently validated signals per candidate:
//!
//! 1. Digit-run patterns in the link (`DDMMYYnnn`, `DDMMYYYY`, `DDMMYY`,
//!    letter-prefixed codes, `YYYYMMDD`), first validated hit wins
//! 2. A `D[.-]M[.-]Y` substring in the title text
//! 3. Carry-forward from the last link-validated date in traversal order,
//!    which the newest-first listing makes a chronological neighbor
//! 4. Forward and backward gap-fill passes over the full sequence
//!
//! A candidate that survives all four steps without a date keeps the
//! `Unknown` sentinel; that is a legitimate terminal value, not a failure.

use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;

use crate::models::{Notice, RawCandidate};

/// Oldest publication year the source is known to carry
const MIN_YEAR: i32 = 2018;

/// Prioritized date-signal matcher over candidate links and titles
pub struct DateInference {
    letter_code: Regex,
    text_date: Regex,
}

impl DateInference {
    #[must_use]
    pub fn new() -> Self {
        Self {
            letter_code: Regex::new(r"[a-z]+(\d{2})(\d{2})(\d{2,4})")
                .expect("Invalid regex: letter code"),
            text_date: Regex::new(r"(\d{1,2})[.\-](\d{1,2})[.\-](\d{2,4})")
                .expect("Invalid regex: text date"),
        }
    }

    /// Assign a date to every candidate
    ///
    /// Signals are tried in strict priority order per candidate; remaining
    /// gaps are closed by propagation along the ordered sequence. The
    /// accumulator is threaded through the scan as a plain local, keeping
    /// the whole step a pure function of its input sequence.
    pub fn infer(&self, candidates: Vec<RawCandidate>) -> Vec<Notice> {
        let mut notices = Vec::with_capacity(candidates.len());

        // Last link-validated date seen in traversal order. Text-derived
        // dates do not feed propagation.
        let mut last_known: Option<NaiveDate> = None;

        for candidate in candidates {
            let date = if is_video_link(&candidate.url) {
                // Video links never date themselves; they inherit from the
                // nearest earlier dated candidate.
                last_known
            } else {
                match self.date_from_link(&candidate.url) {
                    Some(date) => {
                        last_known = Some(date);
                        Some(date)
                    }
                    None => self.date_from_text(&candidate.title).or(last_known),
                }
            };

            notices.push(Notice {
                title: candidate.title,
                url: candidate.url,
                date: date.into(),
            });
        }

        fill_gaps(&mut notices);
        notices
    }

    /// Try each link pattern in priority order; stop at the first that
    /// validates
    pub fn date_from_link(&self, url: &str) -> Option<NaiveDate> {
        const MATCHERS: &[fn(&DateInference, &str) -> Option<NaiveDate>] = &[
            DateInference::nine_digit_serial,
            DateInference::eight_digit_dmy,
            DateInference::six_digit_dmy,
            DateInference::letter_prefixed,
            DateInference::eight_digit_ymd,
        ];

        MATCHERS.iter().find_map(|matcher| matcher(self, url))
    }

    /// `D[.-]M[.-]Y` substring in the visible title text
    pub fn date_from_text(&self, text: &str) -> Option<NaiveDate> {
        let caps = self.text_date.captures(text)?;
        parse_dmy(&caps[1], &caps[2], &caps[3])
    }

    /// `DDMMYYnnn`: nine digits carrying a two-digit year and a serial suffix
    fn nine_digit_serial(&self, url: &str) -> Option<NaiveDate> {
        let run = first_digit_run(url, 9)?;
        parse_dmy(&run[0..2], &run[2..4], &run[4..6])
    }

    /// `DDMMYYYY`
    fn eight_digit_dmy(&self, url: &str) -> Option<NaiveDate> {
        let run = first_digit_run(url, 8)?;
        parse_dmy(&run[0..2], &run[2..4], &run[4..8])
    }

    /// `DDMMYY`
    fn six_digit_dmy(&self, url: &str) -> Option<NaiveDate> {
        let run = first_digit_run(url, 6)?;
        parse_dmy(&run[0..2], &run[2..4], &run[4..6])
    }

    /// Letter-prefixed code such as `nt180724` or `file130618`
    fn letter_prefixed(&self, url: &str) -> Option<NaiveDate> {
        let caps = self.letter_code.captures(url)?;
        parse_dmy(&caps[1], &caps[2], &caps[3])
    }

    /// `YYYYMMDD`, read from the tail of the digit run
    fn eight_digit_ymd(&self, url: &str) -> Option<NaiveDate> {
        let run = first_digit_run(url, 8)?;
        let tail = &run[run.len() - 8..];
        let year: i32 = tail[0..4].parse().ok()?;
        let month: u32 = tail[4..6].parse().ok()?;
        let day: u32 = tail[6..8].parse().ok()?;
        validated(day, month, year)
    }
}

impl Default for DateInference {
    fn default() -> Self {
        Self::new()
    }
}

/// External video links carry no usable date of their own
fn is_video_link(url: &str) -> bool {
    url.contains("youtube.com") || url.contains("youtu.be")
}

/// First contiguous ASCII digit run of at least `min_len` digits
fn first_digit_run(input: &str, min_len: usize) -> Option<&str> {
    let bytes = input.as_bytes();
    let mut start = None;

    for (i, byte) in bytes.iter().enumerate() {
        if byte.is_ascii_digit() {
            if start.is_none() {
                start = Some(i);
            }
        } else if let Some(s) = start.take() {
            if i - s >= min_len {
                return Some(&input[s..i]);
            }
        }
    }

    match start {
        Some(s) if bytes.len() - s >= min_len => Some(&input[s..]),
        _ => None,
    }
}

/// Interpret day/month/year digit groups; a two-digit year reads as `20YY`
fn parse_dmy(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    let d: u32 = day.parse().ok()?;
    let m: u32 = month.parse().ok()?;
    let mut y: i32 = year.parse().ok()?;
    if year.len() == 2 {
        y += 2000;
    }
    validated(d, m, y)
}

/// Calendar round-trip check plus the plausible-year window
fn validated(day: u32, month: u32, year: i32) -> Option<NaiveDate> {
    if !(MIN_YEAR..=Utc::now().year()).contains(&year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Close remaining gaps by propagation over the full sequence
///
/// Forward pass: copy the nearest preceding known date into each `Unknown`.
/// Backward pass: copy the nearest following known date into what is still
/// `Unknown`, which covers leading gaps. Anything left after both passes
/// stays `Unknown`.
fn fill_gaps(notices: &mut [Notice]) {
    use crate::models::NoticeDate;

    let mut last = None;
    for notice in notices.iter_mut() {
        match notice.date {
            NoticeDate::Known(date) => last = Some(date),
            NoticeDate::Unknown => {
                if let Some(date) = last {
                    notice.date = NoticeDate::Known(date);
                }
            }
        }
    }

    let mut next = None;
    for notice in notices.iter_mut().rev() {
        match notice.date {
            NoticeDate::Known(date) => next = Some(date),
            NoticeDate::Unknown => {
                if let Some(date) = next {
                    notice.date = NoticeDate::Known(date);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoticeDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn candidate(title: &str, url: &str, order: usize) -> RawCandidate {
        RawCandidate {
            title: title.to_string(),
            url: url.to_string(),
            source_order: order,
        }
    }

    #[test]
    fn test_six_digit_dmy_from_filename() {
        let inference = DateInference::new();
        let date = inference.date_from_link("http://www.ipu.ac.in/notices/nt180724.pdf");
        assert_eq!(date, Some(ymd(2024, 7, 18)));
    }

    #[test]
    fn test_eight_digit_dmy() {
        let inference = DateInference::new();
        let date = inference.date_from_link("http://host/docs/notice16072024.pdf");
        assert_eq!(date, Some(ymd(2024, 7, 16)));
    }

    #[test]
    fn test_nine_digit_serial() {
        let inference = DateInference::new();
        let date = inference.date_from_link("http://host/docs/200724401.pdf");
        assert_eq!(date, Some(ymd(2024, 7, 20)));
    }

    #[test]
    fn test_letter_prefixed_code_after_bad_leading_run() {
        let inference = DateInference::new();
        // The first long digit run reads as a pre-window year and fails
        // validation; the letter-prefixed code later in the path succeeds.
        let date = inference.date_from_link("http://host/101112/file130618.pdf");
        assert_eq!(date, Some(ymd(2018, 6, 13)));
    }

    #[test]
    fn test_yyyymmdd_from_run_tail() {
        let inference = DateInference::new();
        let date = inference.date_from_link("http://host/archive/20180622x.pdf");
        assert_eq!(date, Some(ymd(2018, 6, 22)));
    }

    #[test]
    fn test_year_window_rejected() {
        let inference = DateInference::new();
        // 2017 predates the window
        assert_eq!(inference.date_from_link("http://host/nt180717.pdf"), None);
        // far-future year
        assert_eq!(inference.date_from_link("http://host/doc20990101.pdf"), None);
    }

    #[test]
    fn test_invalid_calendar_date_rejected() {
        let inference = DateInference::new();
        // 31st of February never validates
        assert_eq!(inference.date_from_link("http://host/nt310224.pdf"), None);
    }

    #[test]
    fn test_no_digits_no_date() {
        let inference = DateInference::new();
        assert_eq!(inference.date_from_link("http://host/general-notice.pdf"), None);
    }

    #[test]
    fn test_text_date_variants() {
        let inference = DateInference::new();
        assert_eq!(
            inference.date_from_text("Result declared on 05.08.2024"),
            Some(ymd(2024, 8, 5))
        );
        assert_eq!(
            inference.date_from_text("Held on 13-06-18 at campus"),
            Some(ymd(2018, 6, 13))
        );
        assert_eq!(inference.date_from_text("No date here"), None);
    }

    #[test]
    fn test_link_pattern_beats_text() {
        let inference = DateInference::new();
        let notices = inference.infer(vec![candidate(
            "Notice of 01.01.2020",
            "http://host/nt180724.pdf",
            0,
        )]);
        assert_eq!(notices[0].date, NoticeDate::Known(ymd(2024, 7, 18)));
    }

    #[test]
    fn test_video_link_inherits_preceding_date() {
        let inference = DateInference::new();
        let notices = inference.infer(vec![
            candidate("Convocation notice", "http://host/nt010824.pdf", 0),
            candidate("Convocation stream", "https://www.youtube.com/watch?v=abc123", 1),
        ]);
        assert_eq!(notices[1].date, NoticeDate::Known(ymd(2024, 8, 1)));
    }

    #[test]
    fn test_video_link_ignores_own_digits() {
        let inference = DateInference::new();
        let notices = inference.infer(vec![
            candidate("Talk", "http://host/nt010824.pdf", 0),
            // the watch id contains a digit run that would parse as a date
            candidate("Stream", "https://youtu.be/x200724401", 1),
        ]);
        assert_eq!(notices[1].date, NoticeDate::Known(ymd(2024, 8, 1)));
    }

    #[test]
    fn test_undated_candidate_carries_forward() {
        let inference = DateInference::new();
        let notices = inference.infer(vec![
            candidate("Dated", "http://host/nt180724.pdf", 0),
            candidate("Undated form", "http://host/form.pdf", 1),
        ]);
        assert_eq!(notices[1].date, NoticeDate::Known(ymd(2024, 7, 18)));
    }

    #[test]
    fn test_leading_gap_filled_backward() {
        let inference = DateInference::new();
        let notices = inference.infer(vec![
            candidate("Leading video", "https://www.youtube.com/watch?v=zzz", 0),
            candidate("Undated", "http://host/form.pdf", 1),
            candidate("Dated", "http://host/nt250724.pdf", 2),
        ]);
        assert_eq!(notices[0].date, NoticeDate::Known(ymd(2024, 7, 25)));
        assert_eq!(notices[1].date, NoticeDate::Known(ymd(2024, 7, 25)));
    }

    #[test]
    fn test_propagation_completeness() {
        let inference = DateInference::new();
        let notices = inference.infer(vec![
            candidate("a", "http://host/one.pdf", 0),
            candidate("b", "http://host/nt180724.pdf", 1),
            candidate("c", "http://host/two.pdf", 2),
            candidate("d", "https://youtu.be/abc", 3),
        ]);
        // one known date in the run means no candidate stays Unknown
        assert!(notices.iter().all(|n| n.date.is_known()));
    }

    #[test]
    fn test_all_unknown_stays_unknown() {
        let inference = DateInference::new();
        let notices = inference.infer(vec![
            candidate("a", "http://host/one.pdf", 0),
            candidate("b", "http://host/two.pdf", 1),
        ]);
        assert!(notices.iter().all(|n| n.date == NoticeDate::Unknown));
    }

    #[test]
    fn test_text_date_does_not_propagate() {
        let inference = DateInference::new();
        let notices = inference.infer(vec![
            candidate("Dated 05.08.2024 in text", "http://host/one.pdf", 0),
            candidate("Stream", "https://youtu.be/abc", 1),
            candidate("Dated by link", "http://host/nt010824.pdf", 2),
        ]);
        assert_eq!(notices[0].date, NoticeDate::Known(ymd(2024, 8, 5)));
        // the accumulator skips the text-dated entry, so the video is still
        // Unknown after the scan; the forward gap-fill pass then copies the
        // nearest preceding known date
        assert_eq!(notices[1].date, NoticeDate::Known(ymd(2024, 8, 5)));
    }

    #[test]
    fn test_first_digit_run() {
        assert_eq!(first_digit_run("abc123456def", 6), Some("123456"));
        // short runs are skipped, not concatenated
        assert_eq!(first_digit_run("ab12cd345678", 6), Some("345678"));
        assert_eq!(first_digit_run("ab12cd34567", 8), None);
        assert_eq!(first_digit_run("digits at end 180724", 6), Some("180724"));
        assert_eq!(first_digit_run("none", 6), None);
    }
}
