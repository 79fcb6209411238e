//! Learned-classification cache. Patterns distilled from confidently
//! classified rows are checked before the full stage cascade, so repeat
//! merchants resolve without hand-written rules.

use regex::Regex;
use rusqlite::OptionalExtension;

use crate::catalog::Catalog;
use crate::db::Store;
use crate::error::Result;
use crate::models::PatternScope;

/// Cap on candidates distilled per text field by `extract_and_learn`.
const MAX_CANDIDATES_PER_FIELD: usize = 5;

const INVESTMENT_TOKENS: &[&str] = &["dividend", "reinvest", "you bought", "you sold", "etf"];

#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch {
    pub category_id: i64,
    pub subcategory_id: Option<i64>,
    pub confidence: f64,
}

/// Upsert by (pattern, scope). A repeat learn bumps the usage count and
/// keeps the larger confidence; stored confidence never regresses.
/// One short write transaction per call serializes concurrent learners.
pub fn learn(
    store: &Store,
    pattern: &str,
    scope: PatternScope,
    category_id: i64,
    subcategory_id: Option<i64>,
    confidence: f64,
) -> Result<()> {
    let pattern = pattern.trim().to_lowercase();
    if pattern.is_empty() {
        return Ok(());
    }
    let tx = store.conn().unchecked_transaction()?;
    tx.execute(
        "INSERT INTO patterns (pattern, scope, category_id, subcategory_id, confidence) \
         VALUES (?1, ?2, ?3, ?4, ?5) \
         ON CONFLICT(pattern, scope) DO UPDATE SET \
             usage_count = usage_count + 1, \
             confidence = MAX(confidence, excluded.confidence), \
             last_used = datetime('now')",
        rusqlite::params![pattern, scope.key(), category_id, subcategory_id, confidence],
    )?;
    tx.commit()?;
    Ok(())
}

/// Fast path consulted before the stage cascade: walk stored patterns from
/// most to least trusted and return the first whose text is contained in the
/// scope-appropriate haystack. A hit bumps the pattern's usage count.
pub fn find(
    store: &Store,
    description: &str,
    action: &str,
    payee: Option<&str>,
) -> Result<Option<PatternMatch>> {
    let description = description.to_lowercase();
    let action = action.to_lowercase();
    let both = format!("{description} {action} {}", payee.unwrap_or_default().to_lowercase());

    let tx = store.conn().unchecked_transaction()?;
    let hit = {
        let mut stmt = tx.prepare_cached(
            "SELECT id, pattern, scope, category_id, subcategory_id, confidence \
             FROM patterns ORDER BY confidence DESC, usage_count DESC",
        )?;
        let mut rows = stmt.query([])?;
        let mut found: Option<(i64, PatternMatch)> = None;
        while let Some(row) = rows.next()? {
            let pattern: String = row.get(1)?;
            let scope = PatternScope::from_key(&row.get::<_, String>(2)?);
            let haystack = match scope {
                PatternScope::Description => &description,
                PatternScope::Action => &action,
                PatternScope::Both => &both,
            };
            if haystack.contains(&pattern) {
                found = Some((
                    row.get(0)?,
                    PatternMatch {
                        category_id: row.get(3)?,
                        subcategory_id: row.get(4)?,
                        confidence: row.get(5)?,
                    },
                ));
                break;
            }
        }
        found
    };

    if let Some((id, _)) = &hit {
        tx.execute(
            "UPDATE patterns SET usage_count = usage_count + 1, last_used = datetime('now') \
             WHERE id = ?1",
            [id],
        )?;
    }
    tx.commit()?;
    Ok(hit.map(|(_, m)| m))
}

/// Distill recognizable substrings out of a confidently classified row and
/// learn each one, so the next row from the same merchant takes the fast
/// path.
pub fn extract_and_learn(
    store: &Store,
    catalog: &Catalog,
    description: &str,
    action: &str,
    category_id: i64,
    subcategory_id: Option<i64>,
    confidence: f64,
) -> Result<usize> {
    let mut learned = 0;
    for (text, scope) in [(description, PatternScope::Description), (action, PatternScope::Action)] {
        for candidate in candidates(catalog, text) {
            learn(store, &candidate, scope, category_id, subcategory_id, confidence)?;
            learned += 1;
        }
    }
    Ok(learned)
}

/// Candidate substrings worth remembering from one text field: known
/// merchant and category keywords, investment-domain tokens, dotted domains,
/// and the merchant following a "purchase" marker.
fn candidates(catalog: &Catalog, text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut out: Vec<String> = Vec::new();

    let mut push = |candidate: String| {
        let candidate = candidate.trim().to_string();
        if candidate.len() >= 3 && !out.contains(&candidate) && out.len() < MAX_CANDIDATES_PER_FIELD {
            out.push(candidate);
        }
    };

    for group in catalog.merchant_groups {
        for kw in group.keywords {
            if lowered.contains(kw) {
                push(kw.to_string());
            }
        }
    }
    for (_, keywords) in catalog.category_keywords {
        for kw in keywords.iter() {
            if lowered.contains(kw) {
                push(kw.to_string());
            }
        }
    }
    for token in INVESTMENT_TOKENS {
        if lowered.contains(token) {
            push(token.to_string());
        }
    }

    let domain = Regex::new(r"[a-z0-9][a-z0-9\-]*\.(?:com|net|org|io|co)\b").expect("static regex");
    for m in domain.find_iter(&lowered) {
        push(m.as_str().to_string());
    }

    let purchase = Regex::new(r"purchase\s+([a-z0-9&'.\- ]{3,30})").expect("static regex");
    if let Some(caps) = purchase.captures(&lowered) {
        let merchant = caps[1].trim().trim_end_matches(|c: char| c.is_ascii_digit());
        push(merchant.trim().to_string());
    }

    out
}
