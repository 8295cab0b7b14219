use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::trace;

use super::category::Category;

/// `type(scope)!: description`, whitespace tolerated only around the colon
static SUBJECT_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)(?:\(([^)]*)\))?(!)?\s*:\s*(.*)$")
        .expect("subject grammar is a valid regex")
});

/// Unanchored so footers anywhere in the body are detected
static BREAKING_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)BREAKING CHANGE[:\s]").expect("breaking phrase is a valid regex")
});

/// A commit record exactly as read from history
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawCommit {
    pub id: String,
    pub subject: String,
    pub body: String,
}

impl RawCommit {
    pub fn new(id: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        RawCommit {
            id: id.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Split a full commit message into subject and body
    pub fn from_message(id: impl Into<String>, message: &str) -> Self {
        let (subject, body) = match message.split_once('\n') {
            Some((subject, body)) => (subject, body.trim()),
            None => (message, ""),
        };
        RawCommit::new(id, subject.trim(), body)
    }
}

/// Outcome of matching a subject line against the conventional grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Conventional {
        category: String,
        scope: Option<String>,
        description: String,
        breaking: bool,
    },
    /// Subject that does not follow the grammar, trimmed
    Opaque(String),
}

impl Subject {
    /// Parse a subject line. Returns `None` for blank subjects.
    pub fn parse(subject: &str) -> Option<Self> {
        let subject = subject.trim();
        if subject.is_empty() {
            return None;
        }

        let Some(captures) = SUBJECT_GRAMMAR.captures(subject) else {
            trace!(subject, "subject does not follow the conventional grammar");
            return Some(Subject::Opaque(subject.to_string()));
        };

        let category = captures
            .get(1)
            .map(|m| m.as_str().to_lowercase())
            .unwrap_or_default();
        let scope = captures
            .get(2)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let breaking = captures.get(3).is_some();
        let description = captures
            .get(4)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        Some(Subject::Conventional {
            category,
            scope,
            description,
            breaking,
        })
    }
}

/// A commit classified by type, scope and breaking status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedCommit {
    #[serde(rename = "hash")]
    pub id: String,
    #[serde(rename = "type")]
    pub category: String,
    pub scope: Option<String>,
    #[serde(rename = "description")]
    pub summary: String,
    #[serde(skip)]
    pub body: String,
    #[serde(rename = "breaking")]
    pub is_breaking: bool,
}

impl ClassifiedCommit {
    /// Classify one raw record. Blank subjects yield `None`; everything else
    /// yields a commit, falling back to the `other` category.
    pub fn parse(raw: &RawCommit) -> Option<Self> {
        let body_breaking = has_breaking_phrase(&raw.body);

        let commit = match Subject::parse(&raw.subject)? {
            Subject::Conventional {
                category,
                scope,
                description,
                breaking,
            } => ClassifiedCommit {
                id: raw.id.clone(),
                category,
                scope,
                summary: description,
                body: raw.body.clone(),
                is_breaking: breaking || body_breaking,
            },
            Subject::Opaque(subject) => ClassifiedCommit {
                id: raw.id.clone(),
                category: Category::Other.token().to_string(),
                scope: None,
                summary: subject,
                body: raw.body.clone(),
                is_breaking: body_breaking,
            },
        };

        Some(commit)
    }

    /// Registry category this commit renders under
    pub fn kind(&self) -> Category {
        Category::from_token(&self.category)
    }

    /// First seven characters of the identifier, if any
    pub fn short_id(&self) -> Option<&str> {
        if self.id.is_empty() {
            return None;
        }
        let end = self
            .id
            .char_indices()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(self.id.len());
        Some(&self.id[..end])
    }
}

/// Classify every record, dropping blank subjects and keeping input order
pub fn classify_all(records: &[RawCommit]) -> Vec<ClassifiedCommit> {
    records.iter().filter_map(ClassifiedCommit::parse).collect()
}

/// Whether a commit body carries a `BREAKING CHANGE` footer
pub fn has_breaking_phrase(body: &str) -> bool {
    BREAKING_PHRASE.is_match(body)
}
