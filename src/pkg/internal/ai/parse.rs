use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

const FALLBACK_TEXT: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Score,
    Verdict,
    Summary,
    MissingSkills,
}

/// The labeled fields the analyzer is instructed to emit, in the order
/// they are expected to appear. Each field's segment runs from the end of
/// its label to the start of the next recognized label, or end of input.
const FIELD_LABELS: [(Field, &str); 4] = [
    (Field::Score, "Relevance Score"),
    (Field::Verdict, "Verdict"),
    (Field::Summary, "Summary"),
    (Field::MissingSkills, "Missing Skills"),
];

impl Field {
    fn from_label(label: &str) -> Field {
        FIELD_LABELS
            .iter()
            .find(|(_, l)| l.eq_ignore_ascii_case(label))
            .map(|(f, _)| *f)
            .unwrap_or(Field::MissingSkills)
    }
}

lazy_static! {
    // A label tolerates any letter case, `*` emphasis on either side and
    // an optional colon.
    static ref LABEL: Regex = {
        let alternation = FIELD_LABELS
            .iter()
            .map(|(_, label)| regex::escape(label))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"(?i)\*{{0,2}}({})(?:[\s:*]+|$)", alternation)).unwrap()
    };
    static ref LEADING_INT: Regex = Regex::new(r"^(\d+)").unwrap();
}

#[derive(Debug, Clone, Serialize)]
pub struct ParsedAnalysis {
    pub score: i64,
    pub verdict: String,
    pub summary: String,
    pub missing_keywords: String,
    #[serde(skip)]
    matched: usize,
}

impl ParsedAnalysis {
    fn fallback() -> ParsedAnalysis {
        ParsedAnalysis {
            score: 0,
            verdict: FALLBACK_TEXT.into(),
            summary: FALLBACK_TEXT.into(),
            missing_keywords: FALLBACK_TEXT.into(),
            matched: 0,
        }
    }

    /// True when no label matched at all, e.g. for the analyzer's error
    /// sentinel; every field then carries its fallback value.
    pub fn is_fallback_only(&self) -> bool {
        self.matched == 0
    }
}

/// Best-effort extraction of the four labeled fields from the model's
/// free-text reply. One scan locates the first occurrence of each label;
/// fields fail independently, a missing label only defaults its own field.
pub fn parse_analysis(raw: &str) -> ParsedAnalysis {
    let mut hits: Vec<(Field, usize, usize)> = Vec::new();
    for caps in LABEL.captures_iter(raw) {
        let m = caps.get(0).unwrap();
        let field = Field::from_label(caps.get(1).unwrap().as_str());
        if hits.iter().any(|(seen, _, _)| *seen == field) {
            continue;
        }
        hits.push((field, m.start(), m.end()));
    }

    let mut parsed = ParsedAnalysis::fallback();
    parsed.matched = hits.len();

    for (idx, (field, _, content_start)) in hits.iter().enumerate() {
        let end = hits
            .get(idx + 1)
            .map(|(_, label_start, _)| *label_start)
            .unwrap_or(raw.len());
        let segment = raw[*content_start..end].trim();
        match field {
            Field::Score => {
                if let Some(caps) = LEADING_INT.captures(segment) {
                    parsed.score = caps[1].parse().unwrap_or(0);
                }
            }
            Field::Verdict => {
                if let Some(line) = segment.lines().next() {
                    let line = line.trim().trim_end_matches('*').trim();
                    if !line.is_empty() {
                        parsed.verdict = line.to_string();
                    }
                }
            }
            Field::Summary => {
                if !segment.is_empty() {
                    parsed.summary = segment.to_string();
                }
            }
            Field::MissingSkills => {
                if !segment.is_empty() {
                    parsed.missing_keywords = segment.to_string();
                }
            }
        }
    }
    parsed
}

/// Display formatting for the missing-skills field: one bullet per
/// non-empty line, stripping any bullet markers the model already emitted.
pub fn bullet_lines(missing_keywords: &str) -> Vec<String> {
    missing_keywords
        .lines()
        .map(|line| line.trim().trim_start_matches(['-', '*', '•']).trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}
