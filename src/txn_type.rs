use crate::models::TransactionType;

/// Resolve a transaction type from raw action text.
///
/// Fixed-priority, first-match-wins. Order matters: action strings routinely
/// contain more than one candidate keyword ("CHECKCARD" must resolve as a
/// card, not a check; "WIRE TRANSFER IN" as a wire, not a transfer).
pub fn resolve_type(action: &str) -> TransactionType {
    let a = action.to_lowercase();

    if TRADE_VERBS.iter().any(|v| a.contains(v)) {
        return TransactionType::InvestmentTrade;
    }
    if a.contains("dividend received") {
        return TransactionType::Dividend;
    }
    if a.contains("reinvestment") {
        return TransactionType::Reinvestment;
    }
    if TRANSFER_VERBS.iter().any(|v| a.contains(v)) {
        return TransactionType::Transfer;
    }
    if a.contains("cash contribution") {
        return TransactionType::Contribution;
    }
    if a.contains("direct deposit") {
        return TransactionType::DirectDeposit;
    }
    if a.contains("direct debit") {
        return TransactionType::DirectDebit;
    }
    if a.contains("card") {
        return if a.contains("credit") {
            TransactionType::CreditCard
        } else {
            TransactionType::DebitCard
        };
    }
    if leading_token(&a, "ach") {
        return if a.contains("credit") || a.contains("deposit") {
            TransactionType::AchCredit
        } else {
            TransactionType::AchDebit
        };
    }
    if a.contains("wire") {
        return TransactionType::WireTransfer;
    }
    if leading_token(&a, "check") {
        return TransactionType::Check;
    }
    if a.contains("atm") {
        return TransactionType::Atm;
    }
    if a.contains("fee") || a.contains("charge") {
        return TransactionType::Fee;
    }
    if a.contains("interest") {
        return TransactionType::Interest;
    }
    TransactionType::Other
}

const TRADE_VERBS: &[&str] = &["you bought", "you sold", "bought ", "sold "];

// Past-tense / online-banking phrasings only; "WIRE TRANSFER FROM" must fall
// through to the wire rule below.
const TRANSFER_VERBS: &[&str] = &["transferred from", "transferred to", "online transfer"];

fn leading_token(text: &str, token: &str) -> bool {
    text == token || text.starts_with(&format!("{token} "))
}
