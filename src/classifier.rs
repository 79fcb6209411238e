use tracing::debug;

use crate::catalog::Catalog;
use crate::models::TransactionType;

/// Callers treat a suggestion as authoritative only at or above this
/// confidence; below it the row is parked for manual confirmation.
pub const ACCEPT_THRESHOLD: f64 = 0.7;

// Keyword-scoring constants. Kept exactly as-is for compatibility with
// learned-pattern data produced by earlier runs.
const KEYWORD_WEIGHT: f64 = 1.0;
const SUBCATEGORY_BONUS: f64 = 0.5;
const SCORE_DIVISOR: f64 = 5.0;
const COFFEE_OVERRIDE_SCORE: f64 = 4.5;
const COFFEE_AMOUNT_CEILING: f64 = 15.0;

#[derive(Debug, Clone, Copy)]
pub struct ClassifyInput<'a> {
    pub description: &'a str,
    pub action: &'a str,
    pub amount: f64,
    pub payee: Option<&'a str>,
    pub txn_type: TransactionType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub category: &'static str,
    pub subcategory: &'static str,
    pub confidence: f64,
}

// ---------------------------------------------------------------------------
// Stages — enum dispatch instead of trait objects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
    TypeRule,
    PayeeMatch,
    ActionRule,
    KeywordScore,
    AmountFallback,
}

/// Evaluation order is the contract: the first stage to produce a
/// suggestion wins and everything after it is skipped.
const STAGES: &[Stage] = &[
    Stage::TypeRule,
    Stage::PayeeMatch,
    Stage::ActionRule,
    Stage::KeywordScore,
    Stage::AmountFallback,
];

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::TypeRule => "type_rule",
            Stage::PayeeMatch => "payee_match",
            Stage::ActionRule => "action_rule",
            Stage::KeywordScore => "keyword_score",
            Stage::AmountFallback => "amount_fallback",
        }
    }

    fn attempt(&self, input: &ClassifyInput, catalog: &Catalog) -> Option<Suggestion> {
        match self {
            Stage::TypeRule => attempt_type_rule(input, catalog),
            Stage::PayeeMatch => attempt_payee_match(input, catalog),
            Stage::ActionRule => attempt_action_rule(input, catalog),
            Stage::KeywordScore => attempt_keyword_score(input, catalog),
            Stage::AmountFallback => Some(attempt_amount_fallback(input)),
        }
    }
}

pub struct Classifier<'a> {
    catalog: &'a Catalog,
}

impl<'a> Classifier<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Identical inputs always yield an identical suggestion; the same
    /// function serves bulk ingestion and the learned-pattern feedback loop.
    pub fn classify(&self, input: &ClassifyInput) -> Suggestion {
        for stage in STAGES {
            if let Some(suggestion) = stage.attempt(input, self.catalog) {
                debug!(
                    stage = stage.name(),
                    category = suggestion.category,
                    subcategory = suggestion.subcategory,
                    confidence = suggestion.confidence,
                    "classified"
                );
                return suggestion;
            }
        }
        // The fallback stage always answers; this is unreachable in practice.
        attempt_amount_fallback(input)
    }
}

// ---------------------------------------------------------------------------
// Stage A: transaction-type rule
// ---------------------------------------------------------------------------

fn suggest(category: &'static str, subcategory: &'static str, confidence: f64) -> Option<Suggestion> {
    Some(Suggestion { category, subcategory, confidence })
}

fn attempt_type_rule(input: &ClassifyInput, catalog: &Catalog) -> Option<Suggestion> {
    match input.txn_type {
        TransactionType::Dividend => suggest("Investment", "Dividend", 0.95),
        TransactionType::InvestmentTrade => suggest("Investment", "Stock Purchase", 0.95),
        TransactionType::Reinvestment => suggest("Investment", "ETF", 0.95),
        TransactionType::Transfer | TransactionType::Contribution | TransactionType::WireTransfer => {
            suggest("Banking", "Transfer", 0.90)
        }
        TransactionType::Fee => suggest("Banking", "Fees", 0.90),
        TransactionType::Interest => suggest("Banking", "Interest", 0.90),
        TransactionType::Atm => suggest("Banking", "ATM", 0.90),
        TransactionType::DirectDeposit | TransactionType::DirectDebit => {
            resolve_direct(input, catalog)
        }
        // Card, check and ACH activity varies too widely for a type-level
        // default; later stages decide.
        TransactionType::DebitCard
        | TransactionType::CreditCard
        | TransactionType::Check
        | TransactionType::AchDebit
        | TransactionType::AchCredit
        | TransactionType::Other => None,
    }
}

/// Direct deposits/debits are only classifiable once the payee gives them
/// away: payroll-like names are income, insurers and utilities are bills.
fn resolve_direct(input: &ClassifyInput, catalog: &Catalog) -> Option<Suggestion> {
    let payee = input.payee?.to_lowercase();
    if catalog.payroll_keywords.iter().any(|k| payee.contains(k)) {
        return suggest("Income", "Salary", 0.95);
    }
    if catalog.insurer_keywords.iter().any(|k| payee.contains(k)) {
        return suggest("Insurance", "Auto", 0.95);
    }
    if catalog.utility_keywords.iter().any(|k| payee.contains(k)) {
        return suggest("Utilities", "Electric", 0.90);
    }
    None
}

// ---------------------------------------------------------------------------
// Stage B: known-payee match, short-circuits at full confidence
// ---------------------------------------------------------------------------

fn attempt_payee_match(input: &ClassifyInput, catalog: &Catalog) -> Option<Suggestion> {
    let payee = input.payee?;
    let payee_up = payee.to_uppercase();
    for &(category, known) in catalog.known_payees {
        for &candidate in known {
            let candidate_up = candidate.to_uppercase();
            if payee_up == candidate_up
                || payee_up.contains(&candidate_up)
                || candidate_up.contains(&payee_up)
            {
                let subcategory = catalog
                    .subcategory_override(candidate)
                    .or_else(|| catalog.default_subcategory(category))?;
                return suggest(category, subcategory, 1.0);
            }
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Stage C: action-text rule
// ---------------------------------------------------------------------------

fn attempt_action_rule(input: &ClassifyInput, catalog: &Catalog) -> Option<Suggestion> {
    let action = input.action.to_lowercase();
    let payee = input.payee.map(str::to_lowercase).unwrap_or_default();

    if action.contains("direct debit") {
        let haystack = format!("{payee} {action}");
        if catalog.insurer_keywords.iter().any(|k| haystack.contains(k)) {
            return suggest("Insurance", "Auto", 0.95);
        }
    }

    if action.contains("card purchase") {
        let haystack = format!("{payee} {action}");
        for group in catalog.merchant_groups {
            if group.keywords.iter().any(|k| haystack.contains(k)) {
                return Some(Suggestion {
                    category: group.category,
                    subcategory: group.subcategory,
                    confidence: group.confidence,
                });
            }
        }
        // a card purchase with no recognizable merchant is still a purchase
        return suggest("Shopping", "General", 0.60);
    }

    None
}

// ---------------------------------------------------------------------------
// Stage D: keyword scoring
// ---------------------------------------------------------------------------

fn attempt_keyword_score(input: &ClassifyInput, catalog: &Catalog) -> Option<Suggestion> {
    let text = format!(
        "{} {} {}",
        input.payee.unwrap_or_default(),
        input.action,
        input.description
    )
    .to_lowercase();

    // Investment wording that slips past the type resolver.
    if text.contains("dividend") {
        return suggest("Investment", "Dividend", 0.9);
    }
    if text.contains("you bought") || text.contains(" bought ") {
        return suggest("Investment", "Stock Purchase", 0.8);
    }
    if text.contains("etf") {
        return suggest("Investment", "ETF", 0.7);
    }

    let mut best: Option<(&'static str, &'static str, f64)> = None;
    for &(category, keywords) in catalog.category_keywords {
        let hits = keywords.iter().filter(|k| text.contains(*k)).count();
        if hits == 0 {
            continue;
        }
        let mut score = hits as f64 * KEYWORD_WEIGHT;

        let mut matched_sub: Option<&'static str> = None;
        for &sub in catalog.subcategories_of(category) {
            let named = text.contains(&sub.to_lowercase());
            let keyword_hit = subcategory_keywords(catalog, sub)
                .iter()
                .any(|k| text.contains(*k));
            if named || keyword_hit {
                matched_sub = Some(sub);
                break;
            }
        }
        if matched_sub.is_some() {
            score += SUBCATEGORY_BONUS;
        }

        // strict greater-than keeps earlier catalog order on ties
        if best.is_none() || score > best.map(|(_, _, s)| s).unwrap_or(0.0) {
            let sub = matched_sub
                .or_else(|| catalog.default_subcategory(category))
                .unwrap_or("Other");
            best = Some((category, sub, score));
        }
    }

    // Small coffee-sized amounts with coffee wording are a confident hit
    // even when overall keyword density is thin.
    if input.amount.abs() < COFFEE_AMOUNT_CEILING {
        let coffee = subcategory_keywords(catalog, "Coffee Shops");
        if coffee.iter().any(|k| text.contains(*k)) {
            best = Some(("Food & Dining", "Coffee Shops", COFFEE_OVERRIDE_SCORE));
        }
    }

    best.map(|(category, subcategory, score)| Suggestion {
        category,
        subcategory,
        confidence: (score / SCORE_DIVISOR).min(1.0),
    })
}

fn subcategory_keywords(catalog: &Catalog, sub: &str) -> &'static [&'static str] {
    catalog
        .subcategory_keywords
        .iter()
        .find(|(s, _)| *s == sub)
        .map(|(_, k)| *k)
        .unwrap_or(&[])
}

// ---------------------------------------------------------------------------
// Stage E: amount fallback, always answers
// ---------------------------------------------------------------------------

fn attempt_amount_fallback(input: &ClassifyInput) -> Suggestion {
    if input.amount.abs() > 1000.0 {
        Suggestion {
            category: "Banking",
            subcategory: "Transfer",
            confidence: 0.3,
        }
    } else {
        Suggestion {
            category: "Miscellaneous",
            subcategory: "Other",
            confidence: 0.2,
        }
    }
}
