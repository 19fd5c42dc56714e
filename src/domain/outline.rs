//! Concept outline parsing.
//!
//! The outline holds every lecture under a level-2 heading
//! (`## Class 2: ...`). Inside a lecture, concepts are numbered
//! paragraphs (`3.  **AR Models**`) followed by their bullets.

/// One numbered concept of a lecture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Concept {
    pub number: u32,
    pub title: String,
    /// Full concept text including its numbered first line.
    pub text: String,
}

impl Concept {
    /// Render the concept with its first line replaced by `heading`.
    ///
    /// Promotes the `Concept:` and `Use Cases:` bullets to bold labels and
    /// lifts doubly nested bullets one level.
    pub fn formatted(&self, heading: &str) -> String {
        let body = self.text.split_once('\n').map_or("", |(_, rest)| rest);

        format!("{heading}\n{body}")
            .replace("\n*   **Concept:**", "\n**Concept:**")
            .replace("\n*   **Use Cases:**", "\n**Use Cases:**")
            .replace("\n    *   *", "\n*   *")
            .trim()
            .to_string()
    }
}

/// The numbered concepts of one lecture, in outline order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConceptOutline {
    /// Prose before the first numbered concept.
    pub preamble: Option<String>,
    pub concepts: Vec<Concept>,
}

impl ConceptOutline {
    /// Partition a lecture body into numbered concepts.
    pub fn parse(body: &str) -> Self {
        let mut preamble: Vec<&str> = Vec::new();
        let mut concepts = Vec::new();
        let mut current: Option<(u32, String, Vec<&str>)> = None;

        for line in body.lines() {
            if let Some((number, title)) = concept_start(line) {
                if let Some(done) = current.take() {
                    concepts.push(finish(done));
                }
                current = Some((number, title, vec![line]));
            } else if let Some((_, _, lines)) = current.as_mut() {
                lines.push(line);
            } else {
                preamble.push(line);
            }
        }

        if let Some(done) = current {
            concepts.push(finish(done));
        }

        let preamble = preamble.join("\n").trim().to_string();

        Self {
            preamble: (!preamble.is_empty()).then_some(preamble),
            concepts,
        }
    }

    /// Index of the first concept with this number.
    pub fn position(&self, number: u32) -> Option<usize> {
        self.concepts.iter().position(|c| c.number == number)
    }

    pub fn get(&self, number: u32) -> Option<&Concept> {
        self.position(number).map(|i| &self.concepts[i])
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}

/// Locate a lecture in the outline.
///
/// The lecture starts at a level-2 heading beginning with `key`
/// (case-insensitive, and `Class 1` does not match `Class 10`) and runs
/// to the next level-2 heading starting with the key's first word.
pub fn lecture_body(outline: &str, key: &str) -> Option<String> {
    let key = key.trim();
    let leading_word = key.split_whitespace().next().unwrap_or(key);

    let mut lines = outline.lines();
    lines.find(|line| level_two_heading(line).is_some_and(|text| starts_with_key(text, key)))?;

    let body: Vec<&str> = lines
        .take_while(|line| {
            !level_two_heading(line).is_some_and(|text| starts_with_ignore_case(text, leading_word))
        })
        .collect();

    Some(body.join("\n").trim().to_string())
}

/// Text of a `## ` heading (but not `###`).
pub(crate) fn level_two_heading(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("##")?;
    if rest.starts_with('#') {
        return None;
    }
    Some(rest.trim())
}

/// Parses `<digits>.<whitespace or end>` at the start of `text`.
pub(crate) fn numbered_prefix(text: &str) -> Option<(u32, &str)> {
    let digits_end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    if digits_end == 0 {
        return None;
    }

    let number = text[..digits_end].parse().ok()?;
    let rest = text[digits_end..].strip_prefix('.')?;

    match rest.chars().next() {
        None => Some((number, "")),
        Some(c) if c.is_whitespace() => Some((number, rest.trim())),
        Some(_) => None,
    }
}

fn concept_start(line: &str) -> Option<(u32, String)> {
    let (number, rest) = numbered_prefix(line)?;
    Some((number, strip_emphasis(rest)))
}

/// Drops `*` runs and word-edge `_` runs, keeping `snake_case` underscores.
fn strip_emphasis(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c != '*' && c != '_' {
            out.push(c);
            i += 1;
            continue;
        }

        let run_end = chars[i..]
            .iter()
            .position(|&r| r != c)
            .map_or(chars.len(), |n| i + n);
        let inside_word = c == '_'
            && i > 0
            && chars[i - 1].is_alphanumeric()
            && chars.get(run_end).is_some_and(|n| n.is_alphanumeric());
        if inside_word {
            out.extend(&chars[i..run_end]);
        }
        i = run_end;
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn finish((number, title, lines): (u32, String, Vec<&str>)) -> Concept {
    Concept {
        number,
        title,
        text: lines.join("\n").trim().to_string(),
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn starts_with_key(text: &str, key: &str) -> bool {
    if !starts_with_ignore_case(text, key) {
        return false;
    }

    // A key ending in a word character must not run into another one.
    let ends_in_word = key.chars().last().is_some_and(char::is_alphanumeric);
    let next = text[key.len()..].chars().next();
    !ends_in_word || next.is_none_or(|c| !c.is_alphanumeric())
}
