//! Whitespace-delimited annotation tables keyed by image file name.
//!
//! An annotations directory holds one table per attribute group:
//!
//! ```text
//! list_category_cloth.txt   image_id category
//! list_attr_img.txt         image_id color pattern style [secondary_color ...]
//! ```
//!
//! Tables may open with a row-count line and a column header line; both are
//! skipped. Rows with too few columns are dropped.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::LoadError;

/// Layout of one annotation table inside the annotations directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnnotationFile {
    pub name: &'static str,
    /// Columns a row needs, the image id included.
    pub min_columns: usize,
}

pub const CATEGORY_FILE: AnnotationFile =
    AnnotationFile { name: "list_category_cloth.txt", min_columns: 2 };
pub const ATTRIBUTE_FILE: AnnotationFile =
    AnnotationFile { name: "list_attr_img.txt", min_columns: 4 };

const HEADER_IDS: [&str; 2] = ["image_id", "image_name"];

/// Rows of one table, keyed by image id. The first row for an id wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnnotationTable {
    rows: BTreeMap<String, Vec<String>>,
}

impl AnnotationTable {
    /// Parses table text. Returns `None` when no row has enough columns.
    pub fn parse(raw: &str, min_columns: usize) -> Option<Self> {
        let mut rows = BTreeMap::new();
        let mut short_rows = 0usize;

        let mut lines = raw.lines().map(str::trim).filter(|line| !line.is_empty()).peekable();
        if lines.peek().is_some_and(|line| line.parse::<usize>().is_ok()) {
            lines.next();
        }
        if lines.peek().is_some_and(|line| is_header(line)) {
            lines.next();
        }

        for line in lines {
            let columns: Vec<String> = line.split_whitespace().map(str::to_owned).collect();
            if columns.len() < min_columns {
                short_rows += 1;
                continue;
            }
            let mut columns = columns.into_iter();
            if let Some(image_id) = columns.next() {
                rows.entry(image_id).or_insert_with(|| columns.collect());
            }
        }

        if rows.is_empty() && short_rows > 0 {
            return None;
        }
        if short_rows > 0 {
            debug!(
                event_name = "annotations.rows.skipped",
                skipped = short_rows,
                min_columns,
                "dropping annotation rows with too few columns"
            );
        }
        Some(Self { rows })
    }

    /// Reads `file` from `dir`. A missing or unusable table is logged and
    /// reported as `None`; other read failures are errors.
    pub fn read(dir: &Path, file: AnnotationFile) -> Result<Option<Self>, LoadError> {
        let path = dir.join(file.name);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                warn!(
                    event_name = "annotations.file.missing",
                    path = %path.display(),
                    "annotation file not found; skipping"
                );
                return Ok(None);
            }
            Err(source) => return Err(LoadError::ReadFile { path, source }),
        };

        let table = Self::parse(&raw, file.min_columns);
        if table.is_none() {
            warn!(
                event_name = "annotations.file.too_few_columns",
                path = %path.display(),
                expected = file.min_columns,
                "annotation file has fewer columns than expected; skipping"
            );
        }
        Ok(table)
    }

    /// Columns after the image id.
    pub fn get(&self, image_id: &str) -> Option<&[String]> {
        self.rows.get(image_id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn is_header(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|first| HEADER_IDS.contains(&first.to_ascii_lowercase().as_str()))
}

/// Category and attribute tables from one annotations directory.
#[derive(Clone, Debug, Default)]
pub struct AnnotationSet {
    dir: PathBuf,
    pub categories: Option<AnnotationTable>,
    pub attributes: Option<AnnotationTable>,
}

impl AnnotationSet {
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, LoadError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(LoadError::AnnotationsDir { path: dir.to_path_buf() });
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            categories: AnnotationTable::read(dir, CATEGORY_FILE)?,
            attributes: AnnotationTable::read(dir, ATTRIBUTE_FILE)?,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Joined row for one image: its category column and its attribute
    /// columns. `None` when either table lacks the image.
    pub fn lookup(&self, image_id: &str) -> Option<AnnotatedImage<'_>> {
        let category = self.categories.as_ref()?.get(image_id)?.first()?;
        let attributes = self.attributes.as_ref()?.get(image_id)?;
        match attributes {
            [color, pattern, style, secondary @ ..] => {
                Some(AnnotatedImage { category, color, pattern, style, secondary })
            }
            _ => None,
        }
    }
}

/// Raw attribute tokens for one image, not yet validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnnotatedImage<'a> {
    pub category: &'a str,
    pub color: &'a str,
    pub pattern: &'a str,
    pub style: &'a str,
    pub secondary: &'a [String],
}
