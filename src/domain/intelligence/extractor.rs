//! Regex-based intelligence extraction from message text.
//!
//! Everything here is a pure function: text in, candidate bundle out.
//! Candidates are allowed to be noisy; precision comes from the
//! payment-handle allow-list and the phone/bank disambiguation rules, and
//! the rest is tolerated by the downstream value predicate. Malformed or
//! empty input yields empty sets, never an error.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use super::IntelligenceBundle;

/// Email-shaped tokens; candidates until the allow-list filter runs.
static HANDLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[\w.-]+@[\w-]+\b").expect("handle pattern"));

/// 10-digit subscriber numbers with an optional country-code or
/// leading-zero prefix.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\+91|91|0)?[6-9]\d{9}\b").expect("phone pattern"));

/// Prefix stripped from phone matches before the 10-digit check.
static PHONE_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\+91|91|0)").expect("phone prefix pattern"));

/// Digit runs long enough to be account numbers.
static ACCOUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{9,18}\b").expect("account pattern"));

/// Common URL shapes: scheme-prefixed, www-prefixed, or known shorteners.
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://\S+|www\.\S+|bit\.ly/\S+|tinyurl\.com/\S+").expect("url pattern")
});

/// Payment-provider handle suffixes. A handle is kept only if its domain
/// part contains one of these; this allow-list is the precision control
/// that keeps ordinary email addresses out.
const HANDLE_SUFFIXES: &[&str] = &[
    "paytm",
    "phonepe",
    "gpay",
    "ybl",
    "upi",
    "okaxis",
    "okhdfcbank",
    "oksbi",
    "okicici",
    "apl",
    "ibl",
    "axl",
];

/// Fixed vocabulary of suspicious terms, matched case-insensitively by
/// containment. Each term is reported at most once per message.
const SUSPICIOUS_KEYWORDS: &[&str] = &[
    "kyc",
    "update",
    "verify",
    "account",
    "blocked",
    "suspended",
    "otp",
    "cvv",
    "pin",
    "password",
    "aadhaar",
    "pan",
    "prize",
    "lottery",
    "won",
    "congratulations",
    "urgent",
    "immediately",
    "expire",
    "cancel",
    "refund",
    "tax",
    "cashback",
    "reward",
    "click here",
    "download",
    "apk",
    "install",
    "bank",
    "axis",
    "hdfc",
    "sbi",
    "icici",
    "paytm",
    "phonepe",
    "googlepay",
    "police",
    "arrest",
    "court",
    "legal action",
    "loan approved",
    "credit card",
    "offer",
    "delivery",
    "courier",
    "parcel",
    "custom duty",
];

/// Extracts all candidate indicators from a single message.
///
/// Idempotent: identical text always yields an identical bundle.
pub fn extract_from_text(text: &str) -> IntelligenceBundle {
    let squashed = squash_digit_separators(text);
    let phones = extract_phones(&squashed);
    let bank_accounts = extract_bank_accounts(&squashed, &phones);

    IntelligenceBundle {
        payment_handles: extract_payment_handles(text),
        phone_numbers: phones,
        bank_accounts,
        links: extract_links(text),
        keywords: extract_keywords(text),
    }
}

/// Aggregates intelligence across a whole conversation: the pointwise
/// per-field union of each message's extraction. Order-independent.
pub fn extract_from_conversation<'a, I>(texts: I) -> IntelligenceBundle
where
    I: IntoIterator<Item = &'a str>,
{
    let mut aggregated = IntelligenceBundle::new();
    for text in texts {
        aggregated.merge(&extract_from_text(text));
    }
    aggregated
}

fn extract_payment_handles(text: &str) -> BTreeSet<String> {
    HANDLE_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .filter(|handle| {
            let domain = handle.rsplit('@').next().unwrap_or_default().to_lowercase();
            HANDLE_SUFFIXES.iter().any(|suffix| domain.contains(suffix))
        })
        .collect()
}

fn extract_phones(squashed: &str) -> BTreeSet<String> {
    PHONE_RE
        .find_iter(squashed)
        .filter_map(|m| {
            let stripped = PHONE_PREFIX_RE.replace(m.as_str(), "").into_owned();
            (stripped.len() == 10).then_some(stripped)
        })
        .collect()
}

fn extract_bank_accounts(squashed: &str, phones: &BTreeSet<String>) -> BTreeSet<String> {
    ACCOUNT_RE
        .find_iter(squashed)
        .map(|m| m.as_str().to_string())
        .filter(|run| {
            // A run that is a phone number once its dialing prefix is
            // stripped is not an account candidate; neither is anything
            // short enough to collide with phone numbers or short codes.
            let stripped = PHONE_PREFIX_RE.replace(run, "");
            run.len() >= 11 && !phones.contains(stripped.as_ref()) && !phones.contains(run.as_str())
        })
        .collect()
}

fn extract_links(text: &str) -> BTreeSet<String> {
    URL_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn extract_keywords(text: &str) -> BTreeSet<String> {
    let lowered = text.to_lowercase();
    SUSPICIOUS_KEYWORDS
        .iter()
        .filter(|keyword| lowered.contains(*keyword))
        .map(|keyword| keyword.to_string())
        .collect()
}

/// Removes spacing characters between digits so that `98765 43210` and
/// `98765-43210` read as one run. Separators elsewhere are preserved.
fn squash_digit_separators(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, ' ' | '-' | '(' | ')') {
            let prev_is_digit = result.chars().last().is_some_and(|p| p.is_ascii_digit());
            let next_is_digit = chars[i + 1..]
                .iter()
                .find(|n| !matches!(n, ' ' | '-' | '(' | ')'))
                .is_some_and(|n| n.is_ascii_digit());
            if prev_is_digit && next_is_digit {
                continue;
            }
        }
        result.push(c);
    }

    result
}
