//! Name lookup over free text, mirroring how the tooltip extension
//! consumes the map.
//!
//! Candidates are runs of 2-6 title-case words. A candidate is looked up
//! as-is (accent-folded first). Longer candidates that miss fall back to
//! each adjacent word pair, which catches "Yankees slugger Aaron Judge".

use crate::fold::fold_accents;
use crate::mapper::PlayerMap;
use crate::schema::Record;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static NAME_CANDIDATE: Lazy<Regex> = Lazy::new(|| {
    const UPPER: &str = "[A-ZÀ-ÖØ-öø-ÿ]";
    const LOWER: &str = "[a-zà-öø-ÿ]+";
    Regex::new(&format!(r"\b{UPPER}{LOWER}\s(?:{UPPER}{LOWER}\s){{0,4}}{UPPER}{LOWER}\b"))
        .expect("name candidate pattern is valid")
});

/// A name found in text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameMatch {
    /// Name as it appears in the text
    pub name: String,
    /// Map key it resolved to
    pub key: String,
    pub record: Record,
}

/// Find every known name in `text`, in text order.
pub fn find_names(map: &PlayerMap, text: &str) -> Vec<NameMatch> {
    let mut found = Vec::new();

    for candidate in NAME_CANDIDATE.find_iter(text) {
        let candidate = candidate.as_str();

        if let Some(hit) = resolve(map, candidate) {
            found.push(hit);
            continue;
        }

        let words: Vec<&str> = candidate.split_whitespace().collect();
        if words.len() > 2 {
            for pair in words.windows(2) {
                let pair = pair.join(" ");
                if let Some(hit) = resolve(map, &pair) {
                    found.push(hit);
                }
            }
        }
    }

    found
}

fn resolve(map: &PlayerMap, name: &str) -> Option<NameMatch> {
    let folded = fold_accents(name);
    let key = if map.contains(&folded) { folded } else { name.to_string() };
    map.get(&key).map(|record| NameMatch { name: name.to_string(), key, record: record.clone() })
}
