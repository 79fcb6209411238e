//! Interface to an optional external text-understanding service used as a
//! last resort when the structural payee cascade comes up empty. The
//! pipeline only builds one batch per file and applies answers at or above
//! the confidence floor; timeouts and retries are the implementation's
//! problem, never this crate's.

use crate::error::Result;

/// Suggestions below this confidence are discarded rather than written.
pub const CONFIDENCE_FLOOR: f64 = 0.7;

#[derive(Debug, Clone)]
pub struct PayeeQuery {
    pub action: String,
    pub description: String,
    pub amount: f64,
}

#[derive(Debug, Clone)]
pub struct PayeeSuggestion {
    pub payee: Option<String>,
    pub confidence: f64,
    pub explanation: String,
}

/// One answer per query, in order. Implementations must not reorder or
/// drop items; a query the service cannot answer gets a None payee.
pub trait PayeeEnricher {
    fn suggest(&self, batch: &[PayeeQuery]) -> Result<Vec<PayeeSuggestion>>;
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Canned responder keyed on action substring, for pipeline tests.
    pub struct FixtureEnricher {
        pub answers: Vec<(&'static str, &'static str, f64)>,
    }

    impl PayeeEnricher for FixtureEnricher {
        fn suggest(&self, batch: &[PayeeQuery]) -> Result<Vec<PayeeSuggestion>> {
            Ok(batch
                .iter()
                .map(|q| {
                    for (needle, payee, confidence) in &self.answers {
                        if q.action.contains(needle) || q.description.contains(needle) {
                            return PayeeSuggestion {
                                payee: Some((*payee).to_string()),
                                confidence: *confidence,
                                explanation: format!("matched '{needle}'"),
                            };
                        }
                    }
                    PayeeSuggestion {
                        payee: None,
                        confidence: 0.0,
                        explanation: "no answer".to_string(),
                    }
                })
                .collect())
        }
    }
}
