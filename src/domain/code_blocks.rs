//! Demo script partitioning.
//!
//! Splits a demo script into numbered blocks at comment markers such as
//! `# --- 2. Moving Averages ---`. Text before the first marker becomes
//! the setup block. Blocks keep source order; a number that appears twice
//! yields two blocks so nothing is lost.

use std::collections::BTreeMap;

use regex::Regex;

use super::error::AssemblyError;

/// Marker used by the lecture demo scripts.
pub const DEFAULT_MARKER_PATTERN: &str = r"^# --- (\d+)\. (.+) ---";

/// Heading under which the setup block is shown.
pub const SETUP_HEADING: &str = "0. Setup and Imports";

/// Compiled section marker: group 1 is the number, group 2 the name.
#[derive(Debug, Clone)]
pub struct MarkerPattern {
    regex: Regex,
}

impl MarkerPattern {
    /// Compile a marker pattern.
    ///
    /// # Errors
    /// Fails if the regex is invalid or has fewer than two capture groups.
    pub fn new(pattern: &str) -> Result<Self, AssemblyError> {
        let regex =
            Regex::new(pattern).map_err(|e| AssemblyError::invalid("marker", pattern, e))?;

        // captures_len counts the implicit whole-match group.
        if regex.captures_len() < 3 {
            return Err(AssemblyError::MarkerGroups(pattern.to_string()));
        }

        Ok(Self { regex })
    }

    /// Returns `(number, name)` if the line is a section marker.
    pub fn match_line(&self, line: &str) -> Option<(u32, String)> {
        let caps = self.regex.captures(line)?;
        let number = caps.get(1)?.as_str().trim().parse().ok()?;
        let name = caps.get(2)?.as_str().trim().to_string();
        Some((number, name))
    }
}

/// One numbered block of a demo script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub number: u32,
    pub name: String,
    /// Verbatim code between this marker and the next, trimmed.
    pub code: String,
}

impl CodeBlock {
    /// `"<number>. <name>"`, the key the block is known by.
    pub fn title(&self) -> String {
        format!("{}. {}", self.number, self.name)
    }
}

/// A demo script split at its section markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodePartition {
    /// Text before the first marker, if not blank.
    pub setup: Option<String>,
    /// Numbered blocks in source order.
    pub blocks: Vec<CodeBlock>,
}

impl CodePartition {
    /// Partition `source` at every line matching `marker`.
    pub fn parse(source: &str, marker: &MarkerPattern) -> Self {
        let mut setup: Vec<&str> = Vec::new();
        let mut blocks = Vec::new();
        let mut current: Option<(u32, String, Vec<&str>)> = None;

        for line in source.lines() {
            if let Some((number, name)) = marker.match_line(line) {
                if let Some(done) = current.take() {
                    blocks.push(finish(done));
                }
                current = Some((number, name, Vec::new()));
            } else if let Some((_, _, lines)) = current.as_mut() {
                lines.push(line);
            } else {
                setup.push(line);
            }
        }

        if let Some(done) = current {
            blocks.push(finish(done));
        }

        let setup = setup.join("\n").trim().to_string();

        Self {
            setup: (!setup.is_empty()).then_some(setup),
            blocks,
        }
    }

    /// Index of the first block carrying each number, in ascending number order.
    pub fn first_by_number(&self) -> BTreeMap<u32, usize> {
        let mut firsts = BTreeMap::new();
        for (i, block) in self.blocks.iter().enumerate() {
            firsts.entry(block.number).or_insert(i);
        }
        firsts
    }
}

fn finish((number, name, lines): (u32, String, Vec<&str>)) -> CodeBlock {
    CodeBlock {
        number,
        name,
        code: lines.join("\n").trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker() -> MarkerPattern {
        MarkerPattern::new(DEFAULT_MARKER_PATTERN).unwrap()
    }

    const DEMO: &str = "\
import pandas as pd

# --- 1. Load and Initial Preprocessing ---
df = pd.read_csv(path)

# --- 2. Moving Averages ---
ma = ts.rolling(50).mean()
print(\"done\")
";

    #[test]
    fn test_setup_and_blocks() {
        let part = CodePartition::parse(DEMO, &marker());
        assert_eq!(part.setup.as_deref(), Some("import pandas as pd"));
        assert_eq!(part.blocks.len(), 2);
        assert_eq!(part.blocks[0].title(), "1. Load and Initial Preprocessing");
        assert_eq!(part.blocks[0].code, "df = pd.read_csv(path)");
        assert_eq!(part.blocks[1].name, "Moving Averages");
        assert_eq!(
            part.blocks[1].code,
            "ma = ts.rolling(50).mean()\nprint(\"done\")"
        );
    }

    #[test]
    fn test_blank_setup_is_dropped() {
        let part = CodePartition::parse("\n\n# --- 1. A ---\nx = 1\n", &marker());
        assert!(part.setup.is_none());
        assert_eq!(part.blocks.len(), 1);
    }

    #[test]
    fn test_no_markers_is_all_setup() {
        let part = CodePartition::parse("x = 1\ny = 2", &marker());
        assert_eq!(part.setup.as_deref(), Some("x = 1\ny = 2"));
        assert!(part.blocks.is_empty());
    }

    #[test]
    fn test_repeated_number_keeps_both_blocks() {
        let src = "# --- 3. First ---\na\n# --- 1. Other ---\nb\n# --- 3. Again ---\nc\n";
        let part = CodePartition::parse(src, &marker());
        assert_eq!(part.blocks.len(), 3);

        let firsts = part.first_by_number();
        assert_eq!(firsts.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(firsts[&3], 0);
    }

    #[test]
    fn test_empty_source() {
        let part = CodePartition::parse("", &marker());
        assert!(part.is_empty());
    }

    #[test]
    fn test_marker_needs_two_groups() {
        assert!(matches!(
            MarkerPattern::new(r"^# --- (\d+) ---"),
            Err(AssemblyError::MarkerGroups(_))
        ));
        assert!(matches!(
            MarkerPattern::new(r"^# --- (\d+"),
            Err(AssemblyError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_custom_marker() {
        let m = MarkerPattern::new(r"^// ## (\d+): (.+)$").unwrap();
        let part = CodePartition::parse("// ## 4: Rust block\nlet x = 1;", &m);
        assert_eq!(part.blocks[0].number, 4);
        assert_eq!(part.blocks[0].name, "Rust block");
    }
}
