//! Assembly plans.
//!
//! A plan holds what differs between lectures: which concepts a code
//! block covers, where each block's commentary comes from, and what is
//! shown before and after the code walk. Plans are deserialized straight
//! from the lecture config.

use serde::Deserialize;

/// Links a code block to the outline concepts it demonstrates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConceptLink {
    pub block: u32,
    pub concepts: Vec<u32>,
}

/// Where a code block's commentary cell comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum CommentaryRule {
    /// A section of the interpretation document.
    Section {
        block: u32,
        heading: String,
        /// Regex for the line after which the excerpt starts.
        #[serde(default)]
        excerpt_start: Option<String>,
        /// Regex for the line that ends the excerpt.
        #[serde(default)]
        excerpt_end: Option<String>,
        /// Markdown appended after the excerpt.
        #[serde(default)]
        note: Option<String>,
    },
    /// The messages the block prints.
    Printed {
        block: u32,
        #[serde(default)]
        note: Option<String>,
    },
    /// Fixed text.
    Text { block: u32, text: String },
}

impl CommentaryRule {
    pub fn block(&self) -> u32 {
        match self {
            Self::Section { block, .. } | Self::Printed { block, .. } | Self::Text { block, .. } => {
                *block
            }
        }
    }
}

/// Commentary for blocks without a rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentaryDefault {
    #[default]
    Placeholder,
    Printed,
}

/// A concept shown before any code, with an optional note after it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LeadConcept {
    pub concept: u32,
    #[serde(default)]
    pub note: Option<String>,
}

/// Material shown after the code walk.
///
/// A concept (if still unused), then an interpretation section: under its
/// own `heading` cell when given, prefixed with a bold `label` when given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClosingItem {
    #[serde(default)]
    pub concept: Option<u32>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

/// Everything the assembler needs to know about one lecture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyPlan {
    /// Lecture heading in the concept outline (e.g. `Class 2`).
    pub key: String,
    /// Notebook title.
    pub title: String,
    /// Intro cell; the outline's lecture preamble is used when absent.
    pub intro: Option<String>,
    pub concept_links: Vec<ConceptLink>,
    pub commentary: Vec<CommentaryRule>,
    pub commentary_default: CommentaryDefault,
    pub lead_concepts: Vec<LeadConcept>,
    pub closing: Vec<ClosingItem>,
}

impl AssemblyPlan {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Concepts a block covers: its links, or its own number.
    pub fn linked_concepts(&self, block: u32) -> Vec<u32> {
        let mut linked: Vec<u32> = self
            .concept_links
            .iter()
            .filter(|link| link.block == block)
            .flat_map(|link| link.concepts.iter().copied())
            .collect();

        if linked.is_empty() {
            linked.push(block);
        }

        let mut seen = std::collections::BTreeSet::new();
        linked.retain(|n| seen.insert(*n));
        linked
    }

    /// The first commentary rule for a block.
    pub fn rule_for(&self, block: u32) -> Option<&CommentaryRule> {
        self.commentary.iter().find(|rule| rule.block() == block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linked_concepts_default_to_block() {
        let plan = AssemblyPlan::new("Class 1", "Class 1");
        assert_eq!(plan.linked_concepts(4), vec![4]);
    }

    #[test]
    fn test_linked_concepts_merge_and_dedup() {
        let mut plan = AssemblyPlan::new("Class 2", "Class 2");
        plan.concept_links = vec![
            ConceptLink { block: 2, concepts: vec![2, 3] },
            ConceptLink { block: 2, concepts: vec![3, 1] },
        ];
        assert_eq!(plan.linked_concepts(2), vec![2, 3, 1]);
    }

    #[test]
    fn test_commentary_rule_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            commentary: Vec<CommentaryRule>,
        }

        let toml_src = r#"
[[commentary]]
source = "section"
block = 2
heading = "2. Model Summaries Interpretation"
excerpt_start = '^\*\s+\*\*ARIMA'

[[commentary]]
source = "printed"
block = 4

[[commentary]]
source = "text"
block = 1
text = "Loads the data."
"#;
        let parsed: Wrapper = toml::from_str(toml_src).unwrap();
        assert_eq!(parsed.commentary.len(), 3);
        assert!(matches!(
            &parsed.commentary[0],
            CommentaryRule::Section { block: 2, excerpt_start: Some(_), note: None, .. }
        ));
        assert_eq!(parsed.commentary[1].block(), 4);
        assert_eq!(
            parsed.commentary[2],
            CommentaryRule::Text { block: 1, text: "Loads the data.".into() }
        );
    }
}
