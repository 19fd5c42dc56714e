//! Interpretation notes and commentary extraction.
//!
//! Interpretation documents are keyed by numbered level-2 headings
//! (`## 2. Model Summaries Interpretation`). Commentary for a code block
//! is either a section of that document, narrowed by an excerpt rule, or
//! the messages the block itself prints.

use regex::Regex;

use super::error::AssemblyError;
use super::outline::{level_two_heading, numbered_prefix};

/// Key for text before the first numbered heading.
pub const PREAMBLE_HEADING: &str = "General Introduction";

/// Default end of an excerpt: the next top-level bullet.
pub const DEFAULT_EXCERPT_END: &str = r"^\*\s";

/// An interpretation document split at its numbered headings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterpretationDoc {
    sections: Vec<(String, String)>,
}

impl InterpretationDoc {
    pub fn parse(text: &str) -> Self {
        let mut sections = Vec::new();
        let mut heading = PREAMBLE_HEADING.to_string();
        let mut lines: Vec<&str> = Vec::new();

        for line in text.lines() {
            match level_two_heading(line) {
                Some(title) if numbered_prefix(title).is_some() => {
                    push_section(&mut sections, heading, &lines);
                    heading = title.to_string();
                    lines.clear();
                }
                _ => lines.push(line),
            }
        }
        push_section(&mut sections, heading, &lines);

        Self { sections }
    }

    /// Body of the section with exactly this heading.
    pub fn section(&self, heading: &str) -> Option<&str> {
        let heading = heading.trim();
        self.sections
            .iter()
            .find(|(h, _)| h == heading)
            .map(|(_, body)| body.as_str())
    }

    /// Section headings in document order.
    pub fn headings(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(h, _)| h.as_str())
    }

    /// Commentary from a section, narrowed by `rule`.
    ///
    /// Falls back to the whole section when the rule has no start pattern
    /// or it does not match. `None` when the section is missing or blank,
    /// or when the start line matches but nothing follows it.
    pub fn excerpt(&self, heading: &str, rule: &ExcerptRule) -> Option<String> {
        let body = self.section(heading)?;
        let text = rule.apply(body).unwrap_or_else(|| body.to_string());
        (!text.is_empty()).then_some(text)
    }
}

fn push_section(sections: &mut Vec<(String, String)>, heading: String, lines: &[&str]) {
    let body = lines.join("\n").trim().to_string();
    // The preamble only counts when it has text.
    if heading == PREAMBLE_HEADING && body.is_empty() {
        return;
    }
    sections.push((heading, body));
}

/// Narrows a section to the lines after a start line.
#[derive(Debug, Clone)]
pub struct ExcerptRule {
    start: Option<Regex>,
    end: Regex,
}

impl ExcerptRule {
    /// # Errors
    /// Fails if either pattern is not a valid regex.
    pub fn new(start: Option<&str>, end: Option<&str>) -> Result<Self, AssemblyError> {
        let start = start
            .map(|p| Regex::new(p).map_err(|e| AssemblyError::invalid("excerpt start", p, e)))
            .transpose()?;
        let end_pattern = end.unwrap_or(DEFAULT_EXCERPT_END);
        let end = Regex::new(end_pattern)
            .map_err(|e| AssemblyError::invalid("excerpt end", end_pattern, e))?;

        Ok(Self { start, end })
    }

    /// A rule that always yields the whole section.
    pub fn whole_section() -> Result<Self, AssemblyError> {
        Self::new(None, None)
    }

    /// Lines after the start line, possibly empty; `None` if there is no
    /// start pattern or no line matches it.
    fn apply(&self, body: &str) -> Option<String> {
        let start = self.start.as_ref()?;

        let mut lines = body.lines().skip_while(|line| !start.is_match(line));
        lines.next()?;

        let taken: Vec<&str> = lines
            .take_while(|line| !self.end.is_match(line) && !line.starts_with("##"))
            .collect();
        Some(taken.join("\n").trim().to_string())
    }
}

/// Extracts the messages a code block prints.
#[derive(Debug, Clone)]
pub struct PrintedOutput {
    call: Regex,
    interpolation: Regex,
}

impl PrintedOutput {
    /// # Errors
    /// Never in practice; the patterns are fixed.
    pub fn new() -> Result<Self, AssemblyError> {
        const CALL: &str = r#"print\(f?(?:"(.*?)"|'(.*?)')\)"#;
        const INTERPOLATION: &str = r"\{[^}]*\}";

        Ok(Self {
            call: Regex::new(CALL).map_err(|e| AssemblyError::invalid("print", CALL, e))?,
            interpolation: Regex::new(INTERPOLATION)
                .map_err(|e| AssemblyError::invalid("interpolation", INTERPOLATION, e))?,
        })
    }

    /// One `> message` line per single-line `print("...")` call.
    ///
    /// Interpolations become `[value]`; leading `\n` escapes are dropped.
    pub fn extract(&self, code: &str) -> Vec<String> {
        code.lines()
            .filter(|line| line.trim_start().starts_with("print("))
            .filter_map(|line| self.call.captures(line))
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .filter_map(|m| {
                let text = self.interpolation.replace_all(m.as_str(), "[value]");
                let text = text.trim_start_matches("\\n").trim();
                (!text.is_empty()).then(|| format!("> {text}"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTES: &str = "\
Some opening remarks.

## 1. Model Performance Comparison (Test Set Forecasting)

ARIMA wins on RMSE.

## 2. Model Summaries Interpretation

*   **ARIMA(1,1,1) Summary:**
    *   AR term is significant.
    *   MA term is not.
*   **GARCH(1,1) Summary:**
    *   Volatility clusters.

### Not a section
Still part of section two.

## 3. Diagnostic Checks (Auto ARIMA Residuals)
";

    #[test]
    fn test_sections_and_preamble() {
        let doc = InterpretationDoc::parse(NOTES);
        let headings: Vec<&str> = doc.headings().collect();
        assert_eq!(
            headings,
            vec![
                PREAMBLE_HEADING,
                "1. Model Performance Comparison (Test Set Forecasting)",
                "2. Model Summaries Interpretation",
                "3. Diagnostic Checks (Auto ARIMA Residuals)",
            ]
        );
        assert_eq!(doc.section(PREAMBLE_HEADING), Some("Some opening remarks."));
        assert!(doc
            .section("2. Model Summaries Interpretation")
            .unwrap()
            .contains("Still part of section two."));
        assert_eq!(doc.section("3. Diagnostic Checks (Auto ARIMA Residuals)"), Some(""));
    }

    #[test]
    fn test_no_preamble_when_blank() {
        let doc = InterpretationDoc::parse("\n## 1. Only\nbody\n");
        assert_eq!(doc.headings().collect::<Vec<_>>(), vec!["1. Only"]);
    }

    #[test]
    fn test_excerpt_narrowed() {
        let doc = InterpretationDoc::parse(NOTES);
        let rule = ExcerptRule::new(Some(r"^\*\s+\*\*ARIMA\(1,1,1\) Summary"), None).unwrap();
        let text = doc.excerpt("2. Model Summaries Interpretation", &rule).unwrap();
        assert_eq!(text, "*   AR term is significant.\n    *   MA term is not.");
    }

    #[test]
    fn test_excerpt_stops_at_heading() {
        let doc = InterpretationDoc::parse(NOTES);
        let rule = ExcerptRule::new(Some(r"GARCH\(1,1\) Summary"), Some(r"^\*\s")).unwrap();
        let text = doc.excerpt("2. Model Summaries Interpretation", &rule).unwrap();
        assert_eq!(text, "*   Volatility clusters.");
    }

    #[test]
    fn test_excerpt_falls_back_to_section() {
        let doc = InterpretationDoc::parse(NOTES);
        let rule = ExcerptRule::new(Some("SARIMAX Summary"), None).unwrap();
        let text = doc
            .excerpt("1. Model Performance Comparison (Test Set Forecasting)", &rule)
            .unwrap();
        assert_eq!(text, "ARIMA wins on RMSE.");
    }

    #[test]
    fn test_excerpt_missing_or_blank_section() {
        let doc = InterpretationDoc::parse(NOTES);
        let rule = ExcerptRule::whole_section().unwrap();
        assert!(doc.excerpt("9. Nothing", &rule).is_none());
        assert!(doc
            .excerpt("3. Diagnostic Checks (Auto ARIMA Residuals)", &rule)
            .is_none());
    }

    #[test]
    fn test_excerpt_matched_but_empty() {
        let doc = InterpretationDoc::parse(
            "## 2. Model Summaries Interpretation\n\
             *   **ARIMA(1,1,1) Summary:** inline only.\n\
             *   **GARCH(1,1) Summary:**\n\
             \x20   *   Volatility clusters.\n",
        );
        let rule = ExcerptRule::new(Some(r"^\*\s+\*\*ARIMA\(1,1,1\) Summary"), None).unwrap();
        assert!(doc.excerpt("2. Model Summaries Interpretation", &rule).is_none());
    }

    #[test]
    fn test_invalid_excerpt_pattern() {
        assert!(ExcerptRule::new(Some("("), None).is_err());
        assert!(ExcerptRule::new(None, Some("[")).is_err());
    }

    #[test]
    fn test_printed_output() {
        let printed = PrintedOutput::new().unwrap();
        let code = "\
print(\"\\n--- 2. Calculating Moving Averages ---\")
x = 1
print(f\"Missing values: {ts.isnull().sum()}\")
    print('Saved plot: plot_02.png')
logger.print(\"ignored\")
print(\"\")
";
        assert_eq!(
            printed.extract(code),
            vec![
                "> --- 2. Calculating Moving Averages ---",
                "> Missing values: [value]",
                "> Saved plot: plot_02.png",
            ]
        );
    }
}
