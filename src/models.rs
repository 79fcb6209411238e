use chrono::NaiveDate;

/// How a transaction moved money, resolved from its action text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    InvestmentTrade,
    Dividend,
    Reinvestment,
    Transfer,
    Contribution,
    DirectDeposit,
    DirectDebit,
    DebitCard,
    CreditCard,
    AchDebit,
    AchCredit,
    WireTransfer,
    Check,
    Atm,
    Fee,
    Interest,
    Other,
}

impl TransactionType {
    pub fn key(&self) -> &'static str {
        match self {
            Self::InvestmentTrade => "investment_trade",
            Self::Dividend => "dividend",
            Self::Reinvestment => "reinvestment",
            Self::Transfer => "transfer",
            Self::Contribution => "contribution",
            Self::DirectDeposit => "direct_deposit",
            Self::DirectDebit => "direct_debit",
            Self::DebitCard => "debit_card",
            Self::CreditCard => "credit_card",
            Self::AchDebit => "ach_debit",
            Self::AchCredit => "ach_credit",
            Self::WireTransfer => "wire_transfer",
            Self::Check => "check",
            Self::Atm => "atm",
            Self::Fee => "fee",
            Self::Interest => "interest",
            Self::Other => "other",
        }
    }

    pub fn from_key(key: &str) -> Self {
        match key {
            "investment_trade" => Self::InvestmentTrade,
            "dividend" => Self::Dividend,
            "reinvestment" => Self::Reinvestment,
            "transfer" => Self::Transfer,
            "contribution" => Self::Contribution,
            "direct_deposit" => Self::DirectDeposit,
            "direct_debit" => Self::DirectDebit,
            "debit_card" => Self::DebitCard,
            "credit_card" => Self::CreditCard,
            "ach_debit" => Self::AchDebit,
            "ach_credit" => Self::AchCredit,
            "wire_transfer" => Self::WireTransfer,
            "check" => Self::Check,
            "atm" => Self::Atm,
            "fee" => Self::Fee,
            "interest" => Self::Interest,
            _ => Self::Other,
        }
    }

    /// Trade, dividend and reinvestment rows never carry a cash-style payee.
    pub fn is_investment(&self) -> bool {
        matches!(self, Self::InvestmentTrade | Self::Dividend | Self::Reinvestment)
    }
}

/// One row as pulled out of a source file, before normalization.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub date: String,
    pub action: String,
    pub description: String,
    pub amount: String,
    pub account: Option<String>,
    pub account_number: Option<String>,
    pub symbol: Option<String>,
    pub currency: Option<String>,
}

/// Canonical transaction produced by the normalizer and enriched by the
/// payee extractor and classifier on its way into the store.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub date: NaiveDate,
    pub account: String,
    pub account_number: String,
    pub action: String,
    pub description: String,
    pub amount: f64,
    pub currency: String,
    pub symbol: Option<String>,
    pub payee: Option<String>,
    pub txn_type: TransactionType,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub confidence: f64,
    pub review_needed: bool,
    pub source_file: String,
    pub dedup_hash: String,
}

impl TransactionRecord {
    /// Investment exclusivity: a record with a ticker symbol or an
    /// investment-like type keeps payee at None no matter what the
    /// extractor would have produced.
    pub fn allows_payee(&self) -> bool {
        self.symbol.is_none() && !self.txn_type.is_investment()
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Subcategory {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
}

/// Which text a learned pattern is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternScope {
    Description,
    Action,
    Both,
}

impl PatternScope {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Action => "action",
            Self::Both => "both",
        }
    }

    pub fn from_key(key: &str) -> Self {
        match key {
            "description" => Self::Description,
            "action" => Self::Action,
            _ => Self::Both,
        }
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct LearnedPattern {
    pub id: i64,
    pub pattern: String,
    pub scope: PatternScope,
    pub category_id: i64,
    pub subcategory_id: Option<i64>,
    pub confidence: f64,
    pub usage_count: i64,
    pub last_used: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_key_roundtrip() {
        for t in [
            TransactionType::InvestmentTrade,
            TransactionType::Dividend,
            TransactionType::AchCredit,
            TransactionType::WireTransfer,
            TransactionType::Other,
        ] {
            assert_eq!(TransactionType::from_key(t.key()), t);
        }
    }

    #[test]
    fn test_unknown_type_key_is_other() {
        assert_eq!(TransactionType::from_key("warp_drive"), TransactionType::Other);
    }

    #[test]
    fn test_investment_types() {
        assert!(TransactionType::Dividend.is_investment());
        assert!(TransactionType::Reinvestment.is_investment());
        assert!(TransactionType::InvestmentTrade.is_investment());
        assert!(!TransactionType::DebitCard.is_investment());
        assert!(!TransactionType::Transfer.is_investment());
    }

    #[test]
    fn test_scope_key_roundtrip() {
        for s in [PatternScope::Description, PatternScope::Action, PatternScope::Both] {
            assert_eq!(PatternScope::from_key(s.key()), s);
        }
    }
}
