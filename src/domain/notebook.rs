//! Jupyter notebook model (nbformat 4.5).
//!
//! Cells only carry a kind and source text; the wire form adds the
//! fields nbformat requires. Cell ids are derived from position so the
//! same cells always serialize to the same bytes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const NBFORMAT: u32 = 4;
pub const NBFORMAT_MINOR: u32 = 5;

/// Kind of notebook cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Markdown,
    Code,
}

/// A single notebook cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub kind: CellKind,
    pub source: String,
}

impl Cell {
    pub fn markdown(source: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Markdown,
            source: source.into(),
        }
    }

    pub fn code(source: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Code,
            source: source.into(),
        }
    }

    pub fn is_code(&self) -> bool {
        self.kind == CellKind::Code
    }
}

/// Kernel the notebook is meant to run on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelSpec {
    pub display_name: String,
    pub language: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub name: String,
}

/// Notebook-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookMetadata {
    pub kernelspec: KernelSpec,
    pub language_info: LanguageInfo,
}

impl NotebookMetadata {
    pub fn new(kernel_name: &str, display_name: &str, language: &str) -> Self {
        Self {
            kernelspec: KernelSpec {
                display_name: display_name.to_string(),
                language: language.to_string(),
                name: kernel_name.to_string(),
            },
            language_info: LanguageInfo {
                name: language.to_string(),
            },
        }
    }
}

impl Default for NotebookMetadata {
    fn default() -> Self {
        Self::new("python3", "Python 3", "python")
    }
}

/// An assembled notebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notebook {
    pub cells: Vec<Cell>,
    pub metadata: NotebookMetadata,
}

impl Notebook {
    pub fn new(cells: Vec<Cell>, metadata: NotebookMetadata) -> Self {
        Self { cells, metadata }
    }

    pub fn code_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_code()).count()
    }

    /// Serialize as nbformat JSON (one-space indent, like nbformat itself).
    ///
    /// # Errors
    /// Propagates serializer failures.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let doc = WireNotebook {
            cells: self
                .cells
                .iter()
                .enumerate()
                .map(|(i, cell)| WireCell::from_cell(i, cell))
                .collect(),
            metadata: self.metadata.clone(),
            nbformat: NBFORMAT,
            nbformat_minor: NBFORMAT_MINOR,
        };

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        doc.serialize(&mut ser)?;

        // serde_json only emits UTF-8.
        let mut json = String::from_utf8_lossy(&buf).into_owned();
        json.push('\n');
        Ok(json)
    }

    /// Parse an nbformat 4 document, accepting string or line-list sources.
    ///
    /// Cell kinds other than markdown and code are skipped; metadata
    /// without a kernelspec falls back to the default kernel.
    ///
    /// # Errors
    /// Fails on malformed JSON or a missing `cells` list.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let doc: WireNotebookIn = serde_json::from_str(json)?;

        let cells = doc
            .cells
            .into_iter()
            .filter_map(|cell| {
                let kind = match cell.cell_type.as_str() {
                    "markdown" => CellKind::Markdown,
                    "code" => CellKind::Code,
                    _ => return None,
                };
                Some(Cell {
                    kind,
                    source: cell.source.into_text(),
                })
            })
            .collect();

        Ok(Self {
            cells,
            metadata: serde_json::from_value(doc.metadata).unwrap_or_default(),
        })
    }
}

#[derive(Serialize)]
struct WireNotebook<'a> {
    cells: Vec<WireCell<'a>>,
    metadata: NotebookMetadata,
    nbformat: u32,
    nbformat_minor: u32,
}

#[derive(Serialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
enum WireCell<'a> {
    Markdown {
        id: String,
        metadata: Map<String, Value>,
        source: &'a str,
    },
    Code {
        execution_count: Option<u32>,
        id: String,
        metadata: Map<String, Value>,
        outputs: Vec<Value>,
        source: &'a str,
    },
}

impl<'a> WireCell<'a> {
    fn from_cell(index: usize, cell: &'a Cell) -> Self {
        let id = format!("cell-{index:03}");
        match cell.kind {
            CellKind::Markdown => Self::Markdown {
                id,
                metadata: Map::new(),
                source: &cell.source,
            },
            CellKind::Code => Self::Code {
                execution_count: None,
                id,
                metadata: Map::new(),
                outputs: Vec::new(),
                source: &cell.source,
            },
        }
    }
}

#[derive(Deserialize)]
struct WireNotebookIn {
    cells: Vec<WireCellIn>,
    #[serde(default)]
    metadata: Value,
}

#[derive(Deserialize)]
struct WireCellIn {
    cell_type: String,
    #[serde(default)]
    source: WireSource,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireSource {
    Text(String),
    Lines(Vec<String>),
}

impl Default for WireSource {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl WireSource {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Lines(lines) => lines.concat(),
        }
    }
}
