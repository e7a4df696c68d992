//! Links to daily notes
//!
//! Daily pages are renamed to `YYYY-MM-DD`, so links written against the
//! long-form title (`[[March 3rd, 2023]]`) are rewritten to match.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::title::{iso_date, parse_long_date, LONG_DATE_PATTERN};

static DAY_LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\[\[({})\]\]", LONG_DATE_PATTERN)).expect("day link regex")
});

/// Rewrite the target of every long-form date link to ISO form.
///
/// Only the date between the brackets changes, so `#[[…]]` tags and
/// `![[…]]` embeds keep their markup. A rewritten target never matches
/// again, so a single left-to-right pass reaches the fixpoint. Targets that
/// are not real calendar dates are left as written.
pub fn normalize_day_links(text: &str) -> String {
    if !text.contains("[[") {
        return text.to_string();
    }

    DAY_LINK_REGEX
        .replace_all(text, |caps: &Captures| match parse_long_date(&caps[1]) {
            Some(date) => format!("[[{}]]", iso_date(date)),
            None => caps[0].to_string(),
        })
        .into_owned()
}
