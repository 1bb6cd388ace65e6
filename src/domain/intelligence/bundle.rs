//! Accumulated intelligence for a session.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The five categories of candidate indicators mined from a conversation.
///
/// Each field is a set: duplicates collapse, order is irrelevant. Merging
/// is a per-field union, so accumulation across turns is idempotent and
/// order-independent. There is no size cap; growth is bounded only by the
/// conversation itself.
///
/// Entries are *candidates*, not verified ground truth. The downstream
/// value predicate tolerates noise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntelligenceBundle {
    /// Payment handles (`local-part@provider-suffix`), allow-list filtered.
    pub payment_handles: BTreeSet<String>,

    /// Normalized 10-digit phone numbers.
    pub phone_numbers: BTreeSet<String>,

    /// Bank account number candidates (11-18 digit runs).
    pub bank_accounts: BTreeSet<String>,

    /// Link candidates (scheme-prefixed, www-prefixed, or shortener URLs).
    pub links: BTreeSet<String>,

    /// Suspicious vocabulary hits, lowercase.
    pub keywords: BTreeSet<String>,
}

impl IntelligenceBundle {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges another bundle into this one (per-field set union).
    pub fn merge(&mut self, other: &IntelligenceBundle) {
        self.payment_handles
            .extend(other.payment_handles.iter().cloned());
        self.phone_numbers
            .extend(other.phone_numbers.iter().cloned());
        self.bank_accounts
            .extend(other.bank_accounts.iter().cloned());
        self.links.extend(other.links.iter().cloned());
        self.keywords.extend(other.keywords.iter().cloned());
    }

    /// Returns true if nothing has been extracted yet.
    pub fn is_empty(&self) -> bool {
        self.payment_handles.is_empty()
            && self.phone_numbers.is_empty()
            && self.bank_accounts.is_empty()
            && self.links.is_empty()
            && self.keywords.is_empty()
    }

    /// Classifies this bundle as high-value intelligence.
    ///
    /// True iff at least one payment handle, OR at least one phone number
    /// together with at least one link, OR at least one bank account.
    /// Keyword hits alone are never high-value.
    pub fn is_high_value(&self) -> bool {
        !self.payment_handles.is_empty()
            || (!self.phone_numbers.is_empty() && !self.links.is_empty())
            || !self.bank_accounts.is_empty()
    }
}
