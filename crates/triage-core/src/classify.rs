//! Keyword-rule classifier.
//!
//! Scores ticket text against two independent, immutable rule tables —
//! category and priority — and derives a confidence value from the combined
//! evidence. Rules are compiled once at first use and never mutated, so
//! concurrent callers share them freely.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::defaults::CONFIDENCE_SATURATION_HITS;
use crate::error::Result;
use crate::models::{
    Category, ClassificationDecision, ClassificationLogEntry, Priority, Ticket,
};
use crate::traits::ClassificationLog;

/// One scoring rule: a key and the keyword patterns that vote for it.
struct KeywordRule<K> {
    key: K,
    patterns: Vec<Regex>,
}

fn rule<K>(key: K, patterns: &[&str]) -> KeywordRule<K> {
    KeywordRule {
        key,
        patterns: patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .expect("keyword pattern")
            })
            .collect(),
    }
}

/// Category rules, in declaration order. On tied hit counts the earlier
/// rule wins.
static CATEGORY_RULES: Lazy<Vec<KeywordRule<Category>>> = Lazy::new(|| {
    vec![
        rule(
            Category::AccountAccess,
            &["login", "password", "2fa", r"two[-\s]?factor", "can't access"],
        ),
        rule(
            Category::TechnicalIssue,
            &["error", "crash", "fail", "exception", "bug"],
        ),
        rule(
            Category::BillingQuestion,
            &["payment", "invoice", "refund", "billing", "charge"],
        ),
        rule(
            Category::FeatureRequest,
            &["feature", "enhancement", "suggestion", "request"],
        ),
        rule(
            Category::BugReport,
            &["bug report", "reproduce", "steps to reproduce", "defect"],
        ),
    ]
});

/// Priority rules. Independent of the category rules; both may fire on the
/// same text.
static PRIORITY_RULES: Lazy<Vec<KeywordRule<Priority>>> = Lazy::new(|| {
    vec![
        rule(
            Priority::Urgent,
            &["can't access", "critical", "production down", "security"],
        ),
        rule(Priority::High, &["important", "blocking", "asap"]),
        rule(Priority::Low, &["minor", "cosmetic", "suggestion"]),
    ]
});

/// Scan one rule table: returns the winning key (strictly highest hit
/// count, earliest rule on ties, `None` below one hit) and its score, and
/// appends matched pattern sources to `keywords_found`.
fn scan<K: Copy>(
    rules: &[KeywordRule<K>],
    text: &str,
    keywords_found: &mut Vec<String>,
) -> (Option<K>, usize) {
    let mut winner = None;
    let mut best = 0;
    for rule in rules {
        let mut hits = 0;
        for pattern in &rule.patterns {
            if pattern.is_match(text) {
                hits += 1;
                let source = pattern.as_str().to_string();
                if !keywords_found.contains(&source) {
                    keywords_found.push(source);
                }
            }
        }
        if hits > best {
            winner = Some(rule.key);
            best = hits;
        }
    }
    (winner, best)
}

/// Score free text against both rule tables.
///
/// Pure: no clock, no log, no stored state. [`classify_ticket`] wraps this
/// with the log append and the ticket fold.
pub fn evaluate(subject: &str, description: &str) -> ClassificationDecision {
    let text = format!("{} {}", subject, description);
    let mut keywords_found = Vec::new();

    let (category, category_score) = scan(&CATEGORY_RULES, &text, &mut keywords_found);
    let (priority, priority_score) = scan(&PRIORITY_RULES, &text, &mut keywords_found);

    let confidence = f64::min(
        1.0,
        (category_score + priority_score) as f64 / CONFIDENCE_SATURATION_HITS,
    );
    let reasoning = format!(
        "Category inferred from {} keyword hits; priority from {} hits.",
        category_score, priority_score
    );

    ClassificationDecision {
        category: category.unwrap_or_default(),
        priority: priority.unwrap_or_default(),
        confidence,
        reasoning,
        keywords_found,
    }
}

/// A classification decision together with the ticket it was folded into.
#[derive(Debug, Clone)]
pub struct Classified {
    pub decision: ClassificationDecision,
    pub updated: Ticket,
}

/// Classify a ticket and append the decision to the classification log.
///
/// `updated` replaces only `category`, `priority`, and
/// `classification_confidence`; every other field — including `updated_at` —
/// is untouched. Bumping `updated_at` is the caller's decision.
pub async fn classify_ticket(
    ticket: &Ticket,
    log: &dyn ClassificationLog,
) -> Result<Classified> {
    let decision = evaluate(&ticket.subject, &ticket.description);

    log.append_log(ClassificationLogEntry {
        ticket_id: ticket.id,
        decision: decision.clone(),
        timestamp: Utc::now(),
    })
    .await?;

    tracing::debug!(
        ticket_id = %ticket.id,
        category = %decision.category,
        priority = %decision.priority,
        confidence = decision.confidence,
        "ticket classified"
    );

    let mut updated = ticket.clone();
    updated.category = decision.category;
    updated.priority = decision.priority;
    updated.classification_confidence = Some(decision.confidence);

    Ok(Classified { decision, updated })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_access_text() {
        let decision = evaluate(
            "Can't access my account",
            "I have a password issue with 2FA enabled.",
        );
        assert_eq!(decision.category, Category::AccountAccess);
        assert!(decision.confidence > 0.0);
    }

    #[test]
    fn test_technical_issue_text() {
        let decision = evaluate("Error occurs on save", "Crash when saving the report.");
        assert_eq!(decision.category, Category::TechnicalIssue);
    }

    #[test]
    fn test_urgent_priority_text() {
        let decision = evaluate(
            "Critical production down",
            "We can't access the dashboard at all.",
        );
        assert_eq!(decision.priority, Priority::Urgent);
    }

    #[test]
    fn test_no_keywords_yields_defaults() {
        let decision = evaluate("Greetings", "Just wanted to say the weather is nice.");
        assert_eq!(decision.category, Category::Other);
        assert_eq!(decision.priority, Priority::Medium);
        assert_eq!(decision.confidence, 0.0);
        assert!(decision.keywords_found.is_empty());
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let decision = evaluate("LOGIN BROKEN", "PASSWORD RESET DOES NOTHING HELPFUL");
        assert_eq!(decision.category, Category::AccountAccess);
    }

    #[test]
    fn test_tie_keeps_declaration_order() {
        // One hit for account_access ("login") and one for technical_issue
        // ("error"): the earlier rule wins the tie.
        let decision = evaluate("login error", "something is wrong with it");
        assert_eq!(decision.category, Category::AccountAccess);
    }

    #[test]
    fn test_confidence_saturates_at_one() {
        let decision = evaluate(
            "Critical security error: can't access after login",
            "Password and 2FA fail with an exception; production down, blocking and important, asap.",
        );
        assert_eq!(decision.confidence, 1.0);
    }

    #[test]
    fn test_keywords_found_spans_both_rule_lists() {
        let decision = evaluate("Billing suggestion", "Minor invoice layout request.");
        // "suggestion" appears in both the feature_request category rule and
        // the low priority rule; it must be reported once.
        let count = decision
            .keywords_found
            .iter()
            .filter(|k| k.as_str() == "suggestion")
            .count();
        assert_eq!(count, 1);
        assert!(decision.keywords_found.iter().any(|k| k == "invoice"));
        assert!(decision.keywords_found.iter().any(|k| k == "minor"));
    }

    #[test]
    fn test_keywords_are_bare_pattern_sources() {
        let decision = evaluate("two-factor trouble", "The two factor prompt never appears; login loops.");
        assert!(decision
            .keywords_found
            .iter()
            .any(|k| k == r"two[-\s]?factor"));
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let a = evaluate("Refund for double charge", "I was charged twice, need a refund.");
        let b = evaluate("Refund for double charge", "I was charged twice, need a refund.");
        assert_eq!(a.category, b.category);
        assert_eq!(a.priority, b.priority);
        assert_eq!(a.confidence, b.confidence);
        assert_eq!(a.keywords_found, b.keywords_found);
    }

    #[test]
    fn test_reasoning_reports_both_counts() {
        let decision = evaluate("login problem", "critical outage, production down");
        assert!(decision.reasoning.contains('1'));
        assert!(decision.reasoning.contains('2'));
    }

    struct RecordingLog(std::sync::Mutex<Vec<ClassificationLogEntry>>);

    #[async_trait::async_trait]
    impl ClassificationLog for RecordingLog {
        async fn append_log(&self, entry: ClassificationLogEntry) -> Result<()> {
            self.0.lock().unwrap().push(entry);
            Ok(())
        }

        async fn entries(&self) -> Result<Vec<ClassificationLogEntry>> {
            Ok(self.0.lock().unwrap().clone())
        }
    }

    fn sample_ticket() -> Ticket {
        crate::validate::validate_and_fill(crate::models::TicketDraft {
            customer_id: Some("cust-1".to_string()),
            customer_email: Some("ada@example.com".to_string()),
            customer_name: Some("Ada Lovelace".to_string()),
            subject: Some("Login fails".to_string()),
            description: Some("Password rejected with an error.".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_classify_ticket_appends_log_and_folds_decision() {
        let log = RecordingLog(std::sync::Mutex::new(Vec::new()));
        let ticket = sample_ticket();

        let classified = classify_ticket(&ticket, &log).await.unwrap();
        assert_eq!(classified.updated.category, classified.decision.category);
        assert_eq!(
            classified.updated.classification_confidence,
            Some(classified.decision.confidence)
        );

        // Only category/priority/confidence change; no updated_at bump.
        assert_eq!(classified.updated.updated_at, ticket.updated_at);
        assert_eq!(classified.updated.status, ticket.status);
        assert_eq!(classified.updated.tags, ticket.tags);

        let entries = log.entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].ticket_id, ticket.id);
    }

    #[tokio::test]
    async fn test_repeated_classification_grows_log_only() {
        let log = RecordingLog(std::sync::Mutex::new(Vec::new()));
        let ticket = sample_ticket();

        let first = classify_ticket(&ticket, &log).await.unwrap();
        let second = classify_ticket(&first.updated, &log).await.unwrap();

        assert_eq!(first.decision, second.decision);
        assert_eq!(log.entries().await.unwrap().len(), 2);
    }
}
