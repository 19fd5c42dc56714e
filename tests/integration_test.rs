//! Integration Tests - End-to-end Notebook Build Testing
//!
//! Tests the interaction between the notebook builder, ports, and mock
//! adapters. Uses mockall for trait mocking and tokio::test for async tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mockall::mock;
use mockall::predicate::*;
use tokio_test::{assert_err, assert_ok};

use lecture_notebooks::adapters::fs::{FsTextSource, NotebookWriter};
use lecture_notebooks::config::LectureConfig;
use lecture_notebooks::domain::assembler::{CODE_PLACEHOLDER, INTERPRETATION_PLACEHOLDER};
use lecture_notebooks::domain::{
    CommentaryDefault, CommentaryRule, MarkerPattern, Notebook, NotebookMetadata,
    DEFAULT_MARKER_PATTERN,
};
use lecture_notebooks::ports::notebook_sink::NotebookSink;
use lecture_notebooks::ports::text_source::TextSource;
use lecture_notebooks::usecases::notebook_builder::{BuildSettings, NotebookBuilder};

// ---- Mock Definitions ----

mock! {
    pub Source {}

    #[async_trait::async_trait]
    impl TextSource for Source {
        async fn read_text(&self, path: &Path) -> String;
        async fn exists(&self, path: &Path) -> bool;
    }
}

mock! {
    pub Sink {}

    #[async_trait::async_trait]
    impl NotebookSink for Sink {
        async fn write_notebook(&self, path: &Path, notebook: &Notebook) -> anyhow::Result<()>;
    }
}

// ---- Fixtures ----

const OUTLINE: &str = "\
# Time Series Lectures

## Class 2: Statistical Modeling

Intro prose.

1.  **Data Preparation**
*   **Concept:** Split train and test.
2.  **ARIMA**
*   **Concept:** Integrate, then fit AR and MA terms.
3.  **Residual Checks**
*   **Concept:** Residuals should be white noise.
";

const DEMO: &str = "\
import pandas as pd

# --- 1. Load Data ---
df = pd.read_csv('prices.csv')
# --- 2. ARIMA Model ---
model = fit(df)
print(\"ARIMA fitted\")
";

const NOTES: &str = "\
## 1. Model Summaries
ARIMA fits well.
";

fn settings(output_dir: &Path) -> BuildSettings {
    BuildSettings {
        outline: PathBuf::from("/course/outline.md"),
        marker: MarkerPattern::new(DEFAULT_MARKER_PATTERN).unwrap(),
        output_dir: output_dir.to_path_buf(),
        metadata: NotebookMetadata::default(),
    }
}

fn lecture(key: &str, demo: &str, output: &str) -> LectureConfig {
    LectureConfig {
        key: key.to_string(),
        title: format!("{key}: Statistical Modeling"),
        intro: None,
        demo: PathBuf::from(demo),
        interpretation: Some(PathBuf::from("/course/notes.md")),
        output: output.to_string(),
        commentary_default: CommentaryDefault::Placeholder,
        concept_links: Vec::new(),
        commentary: vec![CommentaryRule::Section {
            block: 2,
            heading: "1. Model Summaries".to_string(),
            excerpt_start: None,
            excerpt_end: None,
            note: None,
        }],
        lead_concepts: Vec::new(),
        closing: Vec::new(),
    }
}

fn course_source() -> MockSource {
    let mut source = MockSource::new();
    source.expect_exists().returning(|path| path.ends_with("demo.py"));
    source.expect_read_text().returning(|path| {
        if path.ends_with("outline.md") {
            OUTLINE.to_string()
        } else if path.ends_with("demo.py") {
            DEMO.to_string()
        } else if path.ends_with("notes.md") {
            NOTES.to_string()
        } else {
            String::new()
        }
    });
    source
}

// ---- Integration Tests ----

#[tokio::test]
async fn test_build_lecture_writes_assembled_notebook() {
    let mut sink = MockSink::new();
    sink.expect_write_notebook()
        .withf(|path, notebook| {
            path == Path::new("/out/Class2.ipynb")
                && notebook.cells.len() == 13
                && notebook.code_cells() == 3
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let builder = NotebookBuilder::new(
        Arc::new(course_source()),
        Arc::new(sink),
        settings(Path::new("/out")),
    );

    let report = builder
        .build_lecture(&lecture("Class 2", "/course/demo.py", "Class2.ipynb"))
        .await
        .unwrap();

    assert_eq!(report.lecture, "Class 2");
    assert_eq!(report.path, Path::new("/out/Class2.ipynb"));
    assert_eq!(report.cells, 13);
    assert_eq!(report.code_cells, 3);
    // Block 1 commentary and concept 3's missing code.
    assert_eq!(report.placeholders, 2);
}

#[tokio::test]
async fn test_missing_demo_degrades_to_placeholders() {
    let mut source = MockSource::new();
    source
        .expect_exists()
        .with(eq(Path::new("/course/missing.py")))
        .returning(|_| false);
    source
        .expect_read_text()
        .withf(|path| !path.ends_with("missing.py"))
        .returning(|path| {
            if path.ends_with("outline.md") {
                OUTLINE.to_string()
            } else {
                String::new()
            }
        });

    let mut sink = MockSink::new();
    sink.expect_write_notebook()
        .withf(|_, notebook| {
            notebook.code_cells() == 0
                && notebook
                    .cells
                    .iter()
                    .filter(|c| c.source == CODE_PLACEHOLDER)
                    .count()
                    == 3
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let builder = NotebookBuilder::new(Arc::new(source), Arc::new(sink), settings(Path::new("/out")));
    let report = builder
        .build_lecture(&lecture("Class 2", "/course/missing.py", "Class2.ipynb"))
        .await
        .unwrap();

    // Title, intro, additional concepts heading, three concept + placeholder pairs.
    assert_eq!(report.cells, 9);
    assert_eq!(report.code_cells, 0);
    assert_eq!(report.placeholders, 3);
}

#[tokio::test]
async fn test_build_all_continues_after_failure() {
    let mut sink = MockSink::new();
    sink.expect_write_notebook()
        .withf(|path, _| path.ends_with("Broken.ipynb"))
        .times(1)
        .returning(|_, _| Err(anyhow::anyhow!("disk full")));
    sink.expect_write_notebook()
        .withf(|path, _| path.ends_with("Class2.ipynb"))
        .times(1)
        .returning(|_, _| Ok(()));

    let builder = NotebookBuilder::new(
        Arc::new(course_source()),
        Arc::new(sink),
        settings(Path::new("/out")),
    );

    let lectures = vec![
        lecture("Class 1", "/course/demo.py", "Broken.ipynb"),
        lecture("Class 2", "/course/demo.py", "Class2.ipynb"),
    ];
    let summary = builder.build_all(&lectures).await;

    assert!(!summary.is_success());
    assert_eq!(summary.reports.len(), 1);
    assert_eq!(summary.reports[0].lecture, "Class 2");
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].0, "Class 1");
    assert!(format!("{:#}", summary.failures[0].1).contains("disk full"));
}

#[tokio::test]
async fn test_invalid_commentary_rule_fails_lecture() {
    let sink = MockSink::new();
    let builder = NotebookBuilder::new(
        Arc::new(course_source()),
        Arc::new(sink),
        settings(Path::new("/out")),
    );

    let mut bad = lecture("Class 2", "/course/demo.py", "Class2.ipynb");
    bad.commentary = vec![CommentaryRule::Section {
        block: 2,
        heading: "1. Model Summaries".to_string(),
        excerpt_start: Some("(".to_string()),
        excerpt_end: None,
        note: None,
    }];

    assert_err!(builder.build_lecture(&bad).await);
}

#[tokio::test]
async fn test_filesystem_round_trip() {
    let root = std::env::temp_dir().join(format!("lecture-notebooks-it-{}", std::process::id()));
    let course = root.join("course");
    tokio::fs::create_dir_all(&course).await.unwrap();
    tokio::fs::write(course.join("outline.md"), OUTLINE).await.unwrap();
    tokio::fs::write(course.join("demo.py"), DEMO).await.unwrap();

    let mut settings = settings(&root.join("notebooks"));
    settings.outline = course.join("outline.md");

    let builder = NotebookBuilder::new(
        Arc::new(FsTextSource::new()),
        Arc::new(NotebookWriter::new()),
        settings,
    );

    // Interpretation notes are absent on disk.
    let config = lecture("Class 2", course.join("demo.py").to_str().unwrap(), "Class2.ipynb");
    let report = assert_ok!(builder.build_lecture(&config).await);

    let written = tokio::fs::read_to_string(&report.path).await.unwrap();
    let notebook = Notebook::from_json(&written).unwrap();

    assert_eq!(notebook.cells.len(), report.cells);
    assert_eq!(notebook.code_cells(), 3);
    assert_eq!(notebook.cells[0].source, "# Class 2: Statistical Modeling");
    assert_eq!(notebook.cells[1].source, "Intro prose.");
    assert!(notebook.cells[3].source.starts_with("import pandas"));
    assert!(notebook
        .cells
        .iter()
        .any(|c| c.source.ends_with(INTERPRETATION_PLACEHOLDER)));

    tokio::fs::remove_dir_all(&root).await.unwrap();
}
