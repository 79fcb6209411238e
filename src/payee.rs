use regex::Regex;

use crate::catalog::Catalog;

/// Ordered structural matchers over action text, most specific first.
/// Evaluation stops at the first matcher whose capture canonicalizes to a
/// non-empty name; later, more generic matchers never override an earlier
/// hit. Deterministic and side-effect-free.
pub struct PayeeExtractor<'a> {
    catalog: &'a Catalog,
    structural: Vec<Regex>,
    trailing_junk: Regex,
    whitespace: Regex,
}

impl<'a> PayeeExtractor<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        let structural = [
            // 1. direct debit <company>, terminated by a parenthetical
            r"(?i)direct\s+debit\s+([^(]+?)\s*(?:\(|$)",
            // 2. payment processor marker with a sub-merchant
            r"(?i)\b(?:paypal|sq|tst|py|pp)\s*\*\s*([A-Za-z0-9&'./\- ]+)",
            // 3. card purchase with an inline vendor code
            r"(?i)card\s+purchase\s+(.+?)\s+[A-Z]\d{4,}\b",
            // 4. POS code purchase
            r"(?i)\bpos\s+(?:debit\s+|purchase\s+)?(?:\d{3,}\s+)?(.+)$",
            // 5. store name followed by a formatted phone number
            r"(?i)(?:(?:debit|credit)\s+)?(?:card\s+purchase\s+)?([A-Za-z][A-Za-z0-9&'./\- ]*?)\s+\d{3}[-.]\d{3}[-.]\d{4}\b",
            // 6. generic card purchase
            r"(?i)card\s+purchase\s+(?:\d{2}/\d{2}\s+)?(.+)$",
            // 7. ACH debit/credit counterparty
            r"(?i)\bach\s+(?:debit|credit)\s+(.+)$",
            // 8. numbered check with a payee memo
            r"(?i)\bcheck\s+#?\d+\s+(.+)$",
            // 9. wire transfer counterparty
            r"(?i)\bwire\s+(?:transfer\s+)?(?:in\s+|out\s+)?(?:from|to)\s+(.+)$",
            // 10. generic transfer counterparty
            r"(?i)\btransfer(?:red)?\s+(?:from|to)\s+(.+)$",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("static regex"))
        .collect();

        Self {
            catalog,
            structural,
            trailing_junk: Regex::new(
                r"(?:\s+(?:#\d+|\d[\d/-]*|[A-Z]\d{2,}|[A-Z]{2}|PPD|WEB|PYMT|PMT|PAYMT|ID))$",
            )
            .expect("static regex"),
            whitespace: Regex::new(r"\s+").expect("static regex"),
        }
    }

    pub fn extract(&self, action: &str, description: &str) -> Option<String> {
        let action = action.trim();

        for re in &self.structural {
            if let Some(caps) = re.captures(action) {
                if let Some(payee) = caps.get(1).and_then(|m| self.canonicalize(m.as_str())) {
                    return Some(payee);
                }
            }
        }

        for text in [action, description] {
            if let Some(payee) = self.suffix_heuristic(text) {
                return Some(payee);
            }
        }

        capitalized_run(description).and_then(|run| self.canonicalize(&run))
    }

    /// Merchant-suffix heuristics: an entity suffix (INC, LLC, ...), a
    /// financial-institution keyword, or a storefront-type keyword names the
    /// end of a merchant; the tokens running up to it are the merchant.
    fn suffix_heuristic(&self, text: &str) -> Option<String> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        for (i, tok) in tokens.iter().enumerate() {
            let t = clean_token(tok);
            if t.is_empty() {
                continue;
            }
            // Entity suffixes only name a merchant when something precedes them.
            if self.catalog.entity_suffixes.contains(&t.as_str()) && i > 0 {
                if let Some(run) = run_ending_at(&tokens, i) {
                    return self.canonicalize(&run);
                }
            }
            let institution_hit = self.catalog.institution_keywords.contains(&t.as_str())
                || (t == "union" && i > 0 && clean_token(tokens[i - 1]) == "credit");
            if institution_hit || self.catalog.storefront_keywords.contains(&t.as_str()) {
                if let Some(run) = run_ending_at(&tokens, i) {
                    return self.canonicalize(&run);
                }
            }
        }
        None
    }

    /// Raw capture → canonical merchant name: strip trailing numeric and
    /// location suffixes, collapse whitespace, then map through the alias
    /// table (exact first, then substring in either direction), falling back
    /// to title case.
    fn canonicalize(&self, raw: &str) -> Option<String> {
        let mut s = self.whitespace.replace_all(raw.trim(), " ").to_string();
        loop {
            let stripped = self.trailing_junk.replace(&s, "").trim().to_string();
            if stripped == s {
                break;
            }
            s = stripped;
        }
        if s.is_empty() {
            return None;
        }

        let upper = s.to_uppercase();
        for (needle, canonical) in self.catalog.aliases {
            if upper == *needle {
                return Some((*canonical).to_string());
            }
        }
        for (needle, canonical) in self.catalog.aliases {
            if upper.contains(needle) || needle.contains(upper.as_str()) {
                return Some((*canonical).to_string());
            }
        }
        Some(title_case(&s))
    }
}

// ---------------------------------------------------------------------------
// Token helpers
// ---------------------------------------------------------------------------

const STOPWORDS: &[&str] = &["to", "from", "for", "payment", "of", "the", "and", "via"];

fn clean_token(tok: &str) -> String {
    tok.trim_matches(|c: char| !c.is_ascii_alphanumeric()).to_lowercase()
}

/// Up to three eligible tokens preceding index `i`, plus the token at `i`.
fn run_ending_at(tokens: &[&str], i: usize) -> Option<String> {
    let mut start = i;
    while start > 0 && i - start < 3 {
        let prev = clean_token(tokens[start - 1]);
        if prev.is_empty()
            || prev.chars().any(|c| c.is_ascii_digit())
            || STOPWORDS.contains(&prev.as_str())
        {
            break;
        }
        start -= 1;
    }
    let run = tokens[start..=i].join(" ");
    (run.len() >= 3).then_some(run)
}

/// Banking boilerplate that never names a merchant on its own.
const BANK_JARGON: &[&str] = &[
    "check", "debit", "credit", "card", "purchase", "atm", "pos", "ach", "wire",
    "transfer", "pending", "withdrawal", "deposit", "payment", "online", "direct",
    "fee", "interest", "balance", "monthly",
];

/// Last-resort fallback: the first run of capitalized tokens in the
/// description that looks like a plausible merchant name.
fn capitalized_run(description: &str) -> Option<String> {
    let mut run: Vec<&str> = Vec::new();
    for tok in description.split_whitespace() {
        let first_upper = tok.chars().next().is_some_and(|c| c.is_ascii_uppercase());
        let has_letters = tok.chars().any(|c| c.is_ascii_alphabetic());
        let jargon = BANK_JARGON.contains(&clean_token(tok).as_str());
        if first_upper && has_letters && !jargon {
            run.push(tok);
            if run.len() == 4 {
                break;
            }
        } else if !run.is_empty() {
            break;
        }
    }
    let joined = run.join(" ");
    (joined.len() >= 3 && joined.len() <= 30).then_some(joined)
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|w| {
            let lower = w.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
