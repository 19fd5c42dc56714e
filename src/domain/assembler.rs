//! Notebook assembler.
//!
//! Interleaves outline concepts, demo code blocks and commentary into
//! notebook cells. Cell order follows the ascending numbers of the code
//! markers. Nothing is dropped: concepts and blocks the walk never
//! reaches are appended at the end, and gaps become placeholder cells.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use super::code_blocks::{CodeBlock, CodePartition, MarkerPattern, SETUP_HEADING};
use super::error::AssemblyError;
use super::interpretation::{ExcerptRule, InterpretationDoc, PrintedOutput};
use super::notebook::Cell;
use super::outline::{lecture_body, ConceptOutline};
use super::plan::{AssemblyPlan, CommentaryDefault, CommentaryRule};

pub const INTERPRETATION_LABEL: &str = "**Interpretation:**";
pub const OUTPUT_LABEL: &str = "**Interpretation/Output:**";

pub const CONCEPT_PLACEHOLDER: &str =
    "*Concept placeholder*  \n(No specific concept outline found for this section.)";
pub const INTERPRETATION_PLACEHOLDER: &str =
    "*Interpretation placeholder*  \n(No specific interpretation found for this section.)";
pub const CODE_PLACEHOLDER: &str =
    "*Code demonstration placeholder*  \n(No specific code block found in the demo script for this concept.)";

pub const ADDITIONAL_CONCEPTS_HEADING: &str = "## Additional Concepts\n\n\
    (The following concepts from the outline have no matching code block in the demonstration script.)";
pub const ADDITIONAL_CODE_HEADING: &str = "## Additional Code Demonstrations\n\n\
    (The following code blocks were present in the demonstration script but did not map to a section above.)";

/// Raw text of one lecture's sources. Missing sources are empty strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct LectureSources<'a> {
    pub outline: &'a str,
    pub demo: &'a str,
    pub interpretation: &'a str,
}

/// Result of assembling one lecture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub cells: Vec<Cell>,
    /// Placeholder cells emitted for gaps.
    pub placeholders: usize,
}

impl Assembly {
    pub fn code_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_code()).count()
    }
}

#[derive(Debug, Clone)]
enum Commentary {
    Section {
        heading: String,
        excerpt: ExcerptRule,
        note: Option<String>,
    },
    Printed {
        note: Option<String>,
    },
    Text(String),
}

/// Assembles notebooks for one lecture plan.
#[derive(Debug, Clone)]
pub struct Assembler {
    plan: AssemblyPlan,
    marker: MarkerPattern,
    commentary: BTreeMap<u32, Commentary>,
    printed: PrintedOutput,
}

impl Assembler {
    /// Compile the plan's patterns.
    ///
    /// # Errors
    /// Fails if an excerpt pattern is not a valid regex.
    pub fn new(plan: AssemblyPlan, marker: MarkerPattern) -> Result<Self, AssemblyError> {
        let mut commentary = BTreeMap::new();

        for rule in &plan.commentary {
            let compiled = match rule {
                CommentaryRule::Section {
                    heading,
                    excerpt_start,
                    excerpt_end,
                    note,
                    ..
                } => Commentary::Section {
                    heading: heading.clone(),
                    excerpt: ExcerptRule::new(excerpt_start.as_deref(), excerpt_end.as_deref())?,
                    note: note.clone(),
                },
                CommentaryRule::Printed { note, .. } => Commentary::Printed { note: note.clone() },
                CommentaryRule::Text { text, .. } => Commentary::Text(text.clone()),
            };
            // First rule for a block wins.
            commentary.entry(rule.block()).or_insert(compiled);
        }

        Ok(Self {
            plan,
            marker,
            commentary,
            printed: PrintedOutput::new()?,
        })
    }

    /// Build the cell sequence for one lecture.
    pub fn assemble(&self, sources: &LectureSources<'_>) -> Assembly {
        let code = CodePartition::parse(sources.demo, &self.marker);

        let body = lecture_body(sources.outline, &self.plan.key).unwrap_or_else(|| {
            if !sources.outline.trim().is_empty() {
                warn!(lecture = %self.plan.key, "Lecture heading not found in concept outline");
            }
            String::new()
        });
        let concepts = ConceptOutline::parse(&body);
        let notes = InterpretationDoc::parse(sources.interpretation);

        let mut walk = Walk {
            assembler: self,
            code: &code,
            concepts: &concepts,
            notes: &notes,
            cells: Vec::new(),
            used_concepts: BTreeSet::new(),
            emitted_blocks: BTreeSet::new(),
            placeholders: 0,
        };

        walk.opening();
        walk.lead_concepts();
        walk.code_walk();
        walk.closing();
        walk.leftovers();

        debug!(
            lecture = %self.plan.key,
            blocks = code.blocks.len(),
            concepts = concepts.len(),
            cells = walk.cells.len(),
            placeholders = walk.placeholders,
            "Lecture assembled"
        );

        Assembly {
            cells: walk.cells,
            placeholders: walk.placeholders,
        }
    }
}

/// Mutable state of one assembly pass.
struct Walk<'a> {
    assembler: &'a Assembler,
    code: &'a CodePartition,
    concepts: &'a ConceptOutline,
    notes: &'a InterpretationDoc,
    cells: Vec<Cell>,
    used_concepts: BTreeSet<usize>,
    emitted_blocks: BTreeSet<usize>,
    placeholders: usize,
}

impl Walk<'_> {
    fn markdown(&mut self, source: impl Into<String>) {
        self.cells.push(Cell::markdown(source));
    }

    fn code_cell(&mut self, source: &str) {
        self.cells.push(Cell::code(source));
    }

    fn placeholder(&mut self, source: String) {
        self.placeholders += 1;
        self.markdown(source);
    }

    /// Concept `index` under its own `## n. title` heading.
    fn concept(&mut self, index: usize) {
        let concepts = self.concepts;
        let concept = &concepts.concepts[index];
        let heading = format!("## {}. {}", concept.number, concept.title);
        self.used_concepts.insert(index);
        self.markdown(concept.formatted(&heading));
    }

    fn opening(&mut self) {
        let assembler = self.assembler;
        let plan = &assembler.plan;
        let (concepts, code) = (self.concepts, self.code);
        self.markdown(format!("# {}", plan.title));

        let intro = plan
            .intro
            .as_deref()
            .or(concepts.preamble.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty());
        if let Some(intro) = intro {
            self.markdown(intro);
        }

        if let Some(setup) = &code.setup {
            self.markdown(format!("## {SETUP_HEADING}"));
            self.code_cell(setup);
        }
    }

    fn lead_concepts(&mut self) {
        let assembler = self.assembler;
        for lead in &assembler.plan.lead_concepts {
            let Some(index) = self.concepts.position(lead.concept) else {
                debug!(concept = lead.concept, "Lead concept not in outline");
                continue;
            };
            if self.used_concepts.contains(&index) {
                continue;
            }

            self.concept(index);
            if let Some(note) = &lead.note {
                self.markdown(note.as_str());
            }
        }
    }

    fn code_walk(&mut self) {
        let code = self.code;
        for index in code.first_by_number().into_values() {
            let block = &code.blocks[index];
            self.emitted_blocks.insert(index);

            self.concept_heading(block);
            self.code_cell(&block.code);
            self.commentary(block);
        }
    }

    /// Heading and concept bodies for a block.
    fn concept_heading(&mut self, block: &CodeBlock) {
        let concepts = self.concepts;
        let linked: Vec<usize> = self
            .assembler
            .plan
            .linked_concepts(block.number)
            .into_iter()
            .filter_map(|n| concepts.position(n))
            .collect();

        let fresh: Vec<usize> = linked
            .iter()
            .copied()
            .filter(|i| !self.used_concepts.contains(i))
            .collect();

        if let Some(&first) = fresh.first() {
            let bodies: Vec<String> = fresh
                .iter()
                .map(|&i| {
                    let c = &concepts.concepts[i];
                    c.formatted(&format!("### {}. {}", c.number, c.title))
                })
                .collect();
            let title = &concepts.concepts[first].title;

            self.used_concepts.extend(fresh.iter().copied());
            self.markdown(format!(
                "## {}. {}\n\n{}",
                block.number,
                title,
                bodies.join("\n\n---\n\n")
            ));
        } else if linked.is_empty() {
            self.placeholder(format!("## {}\n\n{CONCEPT_PLACEHOLDER}", block.title()));
        } else {
            // Covered by an earlier section.
            self.markdown(format!("## {}", block.title()));
        }
    }

    fn commentary(&mut self, block: &CodeBlock) {
        let assembler = self.assembler;

        let text = match assembler.commentary.get(&block.number) {
            Some(Commentary::Section {
                heading,
                excerpt,
                note,
            }) => self
                .notes
                .excerpt(heading, excerpt)
                .map(|t| labelled(INTERPRETATION_LABEL, &t, note.as_deref())),
            Some(Commentary::Printed { note }) => self.printed(block, note.as_deref()),
            Some(Commentary::Text(text)) => Some(text.trim())
                .filter(|t| !t.is_empty())
                .map(|t| labelled(INTERPRETATION_LABEL, t, None)),
            None => match assembler.plan.commentary_default {
                CommentaryDefault::Placeholder => None,
                CommentaryDefault::Printed => self.printed(block, None),
            },
        };

        match text {
            Some(text) => self.markdown(text),
            None => self.placeholder(format!("{INTERPRETATION_LABEL}\n\n{INTERPRETATION_PLACEHOLDER}")),
        }
    }

    fn printed(&self, block: &CodeBlock, note: Option<&str>) -> Option<String> {
        let lines = self.assembler.printed.extract(&block.code);
        (!lines.is_empty()).then(|| labelled(OUTPUT_LABEL, &lines.join("\n"), note))
    }

    fn closing(&mut self) {
        let assembler = self.assembler;
        let notes = self.notes;
        for item in &assembler.plan.closing {
            if let Some(index) = item.concept.and_then(|n| self.concepts.position(n)) {
                if !self.used_concepts.contains(&index) {
                    self.concept(index);
                }
            }

            let Some(section) = &item.section else {
                continue;
            };
            let Some(body) = notes.section(section).filter(|b| !b.is_empty()) else {
                debug!(section = %section, "Closing section not in interpretation notes");
                continue;
            };

            if let Some(heading) = &item.heading {
                self.markdown(format!("## {heading}"));
            }
            let text = match &item.label {
                Some(label) => format!("**{label}:**\n\n{body}"),
                None => body.to_string(),
            };
            self.markdown(text);
        }
    }

    fn leftovers(&mut self) {
        let unused: Vec<usize> = (0..self.concepts.len())
            .filter(|i| !self.used_concepts.contains(i))
            .collect();
        if !unused.is_empty() {
            self.markdown(ADDITIONAL_CONCEPTS_HEADING);
            for index in unused {
                self.concept(index);
                self.placeholder(CODE_PLACEHOLDER.to_string());
            }
        }

        let code = self.code;
        let leftover: Vec<usize> = (0..code.blocks.len())
            .filter(|i| !self.emitted_blocks.contains(i))
            .collect();
        if !leftover.is_empty() {
            self.markdown(ADDITIONAL_CODE_HEADING);
            for index in leftover {
                let block = &code.blocks[index];
                self.emitted_blocks.insert(index);
                self.markdown(format!("### {}", block.title()));
                self.code_cell(&block.code);
            }
        }
    }
}

fn labelled(label: &str, body: &str, note: Option<&str>) -> String {
    match note {
        Some(note) => format!("{label}\n\n{body}\n\n{note}"),
        None => format!("{label}\n\n{body}"),
    }
}
