use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

const HEADER_PATTERN: &str = r"^(\w+)(\(([^)]*)\))?:\s*(.*)$";
const FOOTER_PATTERN: &str = r"^([A-Z][A-Z0-9]*(?:[ -][A-Z0-9]+)*):\s*(.*)$";

/// A commit exactly as delivered by the source control platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCommit {
    pub sha: String,
    pub message: String,
    pub author: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl RawCommit {
    /// Create a commit without a timestamp
    pub fn new(sha: impl Into<String>, message: impl Into<String>, author: impl Into<String>) -> Self {
        RawCommit {
            sha: sha.into(),
            message: message.into(),
            author: author.into(),
            timestamp: None,
        }
    }

    /// Attach the authored timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// A footer entry such as `BREAKING CHANGE: <text>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub title: String,
    pub text: String,
}

impl Note {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Note {
            title: title.into(),
            text: text.into(),
        }
    }
}

/// Parsed representation of a conventional commit message
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedCommit {
    #[serde(rename = "type")]
    pub r#type: Option<String>,
    pub scope: Option<String>,
    pub subject: String,
    pub body: Option<String>,
    pub notes: Vec<Note>,
    pub sha: String,
    pub author: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl ParsedCommit {
    /// Parse a commit message according to the conventional commit header grammar
    ///
    /// The first line must look like `type(scope): subject`, scope optional.
    /// Anything between the parentheses is kept, so `controllers/auth` and
    /// `controllers auth` both survive intact. Lines below the header are
    /// scanned for `TITLE: text` footers; a footer's text keeps growing with
    /// the following lines until the next footer.
    ///
    /// Never fails: a header that does not match yields `type = None` and the
    /// whole first line as the subject.
    pub fn parse(message: &str) -> Self {
        let mut lines = message.lines();
        let header = lines.next().unwrap_or_default();

        let mut parsed = match Regex::new(HEADER_PATTERN)
            .ok()
            .and_then(|re| re.captures(header))
        {
            Some(captures) => ParsedCommit {
                r#type: captures.get(1).map(|m| m.as_str().to_string()),
                scope: captures
                    .get(3)
                    .map(|m| m.as_str().trim().to_string())
                    .filter(|scope| !scope.is_empty()),
                subject: captures
                    .get(4)
                    .map(|m| m.as_str().trim_end().to_string())
                    .unwrap_or_default(),
                ..ParsedCommit::default()
            },
            None => ParsedCommit {
                subject: header.to_string(),
                ..ParsedCommit::default()
            },
        };

        let footer = Regex::new(FOOTER_PATTERN).ok();
        let mut body_lines: Vec<&str> = Vec::new();
        let mut notes: Vec<Note> = Vec::new();

        for line in lines {
            if let Some(captures) = footer.as_ref().and_then(|re| re.captures(line)) {
                let title = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
                let text = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
                notes.push(Note::new(title, text));
            } else if let Some(note) = notes.last_mut() {
                note.text.push('\n');
                note.text.push_str(line);
            } else {
                body_lines.push(line);
            }
        }

        for note in &mut notes {
            note.text = note.text.trim().to_string();
        }

        let body = body_lines.join("\n").trim().to_string();
        parsed.body = (!body.is_empty()).then_some(body);
        parsed.notes = notes;
        parsed
    }

    /// Parse a raw commit, carrying its sha, author and timestamp along
    pub fn from_raw(raw: &RawCommit) -> Self {
        ParsedCommit {
            sha: raw.sha.clone(),
            author: raw.author.clone(),
            timestamp: raw.timestamp,
            ..ParsedCommit::parse(&raw.message)
        }
    }

    /// Whether the header matched the conventional grammar
    pub fn is_conventional(&self) -> bool {
        self.r#type.is_some()
    }

    /// Whether any footer carries the given title exactly
    pub fn has_note(&self, title: &str) -> bool {
        self.notes.iter().any(|note| note.title == title)
    }
}
