use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::annotations::{AnnotatedImage, AnnotationSet};
use crate::domain::item::{Category, Color, Item, ItemId, Pattern, Style, TokenError};
use crate::errors::LoadError;
use crate::images::ImageIndex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogFormat {
    Toml,
    Json,
}

impl CatalogFormat {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .map(|extension| extension.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(LoadError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Read-only wardrobe. Items are kept ordered by id so every listing is stable.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    items: BTreeMap<ItemId, Item>,
}

/// Loads a catalog file, picking the format from its extension.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, LoadError> {
    Catalog::load(path)
}

impl Catalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let format = CatalogFormat::from_path(path)?;
        let raw = fs::read_to_string(path)
            .map_err(|source| LoadError::ReadFile { path: path.to_path_buf(), source })?;

        let catalog = Self::parse(&raw, format)?;
        info!(
            event_name = "catalog.load.completed",
            path = %path.display(),
            item_count = catalog.len(),
            "wardrobe catalog loaded"
        );
        Ok(catalog)
    }

    pub fn parse(raw: &str, format: CatalogFormat) -> Result<Self, LoadError> {
        let records = match format {
            CatalogFormat::Toml => {
                toml::from_str::<TomlDocument>(raw)
                    .map_err(|error| LoadError::Malformed(error.to_string()))?
                    .items
            }
            CatalogFormat::Json => match serde_json::from_str::<JsonDocument>(raw)
                .map_err(|error| LoadError::Malformed(error.to_string()))?
            {
                JsonDocument::List(items) | JsonDocument::Wrapped { items } => items,
            },
        };

        let items = records
            .into_iter()
            .enumerate()
            .map(|(offset, record)| record.into_item(offset + 1))
            .collect::<Result<Vec<_>, _>>()?;

        if items.is_empty() {
            warn!(event_name = "catalog.parse.empty", "catalog document lists no items");
        }
        Self::from_items(items)
    }

    /// Builds a catalog from ready items. Ids must be non-blank and unique.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Result<Self, LoadError> {
        let mut by_id = BTreeMap::new();
        for (offset, item) in items.into_iter().enumerate() {
            if item.id.as_str().trim().is_empty() {
                return Err(LoadError::EmptyId { index: offset + 1 });
            }
            if by_id.contains_key(&item.id) {
                return Err(LoadError::DuplicateId(item.id));
            }
            by_id.insert(item.id.clone(), item);
        }
        Ok(Self { items: by_id })
    }

    /// Builds a catalog from the photos under `images_root` and the annotation
    /// tables in `annotations_dir`, joined on image file name.
    ///
    /// Each image becomes an item whose id is its file name. Images missing
    /// from either table are left out and counted in a warning.
    pub fn from_annotations(
        images_root: impl AsRef<Path>,
        annotations_dir: impl AsRef<Path>,
    ) -> Result<Self, LoadError> {
        let images_root = images_root.as_ref();
        let annotations = AnnotationSet::load(annotations_dir)?;
        let index = ImageIndex::scan(images_root)?;
        if index.is_empty() {
            return Err(LoadError::NoImages { path: images_root.to_path_buf() });
        }

        let mut items = Vec::new();
        let mut unannotated = 0usize;
        for (offset, (file_name, path)) in index.files().enumerate() {
            let Some(row) = annotations.lookup(file_name) else {
                unannotated += 1;
                continue;
            };
            let mut item = annotated_item(offset + 1, file_name, row)?;
            if let Some(relative) = index.relative(path) {
                item = item.with_image(relative);
            }
            item.image_path = Some(path.to_path_buf());
            items.push(item);
        }

        if unannotated > 0 {
            warn!(
                event_name = "catalog.annotations.unmatched",
                annotations_dir = %annotations.dir().display(),
                unannotated,
                "images without category or attribute annotations were left out"
            );
        }

        let catalog = Self::from_items(items)?;
        info!(
            event_name = "catalog.annotations.completed",
            image_root = %images_root.display(),
            annotations_dir = %annotations.dir().display(),
            item_count = catalog.len(),
            "wardrobe catalog built from annotations"
        );
        Ok(catalog)
    }

    /// Attaches on-disk image locations. Absolute references that exist are
    /// kept as they are; everything else is looked up in the index.
    pub fn with_image_index(mut self, index: &ImageIndex) -> Self {
        let mut resolved = 0usize;
        for item in self.items.values_mut() {
            let Some(reference) = item.image.as_deref() else {
                continue;
            };
            let direct = Path::new(reference);
            item.image_path = if direct.is_absolute() && direct.is_file() {
                Some(direct.to_path_buf())
            } else {
                index.resolve(reference).map(Path::to_path_buf)
            };
            if item.image_path.is_some() {
                resolved += 1;
            }
        }

        debug!(
            event_name = "catalog.images.resolved",
            image_root = %index.root().display(),
            resolved,
            "catalog images resolved"
        );
        self
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn items_by_category(&self, category: Category) -> Vec<&Item> {
        self.items.values().filter(|item| item.category == category).collect()
    }

    /// Categories that have at least one item, in declaration order.
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|category| self.items.values().any(|item| item.category == *category))
            .collect()
    }

    /// Items that reference an image which could not be found.
    pub fn missing_images(&self) -> Vec<&Item> {
        self.items
            .values()
            .filter(|item| item.image.is_some() && item.image_path.is_none())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct TomlDocument {
    items: Vec<ItemRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonDocument {
    List(Vec<ItemRecord>),
    Wrapped { items: Vec<ItemRecord> },
}

#[derive(Debug, Default, Deserialize)]
struct ItemRecord {
    id: Option<String>,
    name: Option<String>,
    #[serde(alias = "item_type")]
    category: Option<String>,
    #[serde(alias = "primary_color")]
    color: Option<String>,
    #[serde(default)]
    secondary_colors: Vec<String>,
    pattern: Option<String>,
    style: Option<String>,
    #[serde(alias = "file_path")]
    image: Option<String>,
}

impl ItemRecord {
    fn into_item(self, index: usize) -> Result<Item, LoadError> {
        let id = required(self.id, index, "id")?;
        let id = id.trim().to_owned();
        if id.is_empty() {
            return Err(LoadError::EmptyId { index });
        }

        let invalid = |source: TokenError| LoadError::InvalidAttribute {
            index,
            id: id.clone(),
            source,
        };

        let category: Category =
            required(self.category, index, "category")?.parse().map_err(invalid)?;
        let primary_color: Color = required(self.color, index, "color")?.parse().map_err(invalid)?;
        let pattern: Pattern = required(self.pattern, index, "pattern")?.parse().map_err(invalid)?;
        let style: Style = required(self.style, index, "style")?.parse().map_err(invalid)?;
        let secondary_colors = self
            .secondary_colors
            .iter()
            .map(|color| color.parse::<Color>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;

        let mut item = Item::new(id.clone(), category, primary_color, pattern, style)
            .with_secondary_colors(secondary_colors);
        if let Some(name) = self.name.filter(|name| !name.trim().is_empty()) {
            item = item.with_name(name.trim());
        }
        if let Some(image) = self.image.filter(|image| !image.trim().is_empty()) {
            item = item.with_image(image.trim());
        }
        Ok(item)
    }
}

fn annotated_item(
    index: usize,
    file_name: &str,
    row: AnnotatedImage<'_>,
) -> Result<Item, LoadError> {
    let invalid = |source: TokenError| LoadError::InvalidAttribute {
        index,
        id: file_name.to_owned(),
        source,
    };

    let category: Category = row.category.parse().map_err(invalid)?;
    let primary_color: Color = row.color.parse().map_err(invalid)?;
    let pattern: Pattern = row.pattern.parse().map_err(invalid)?;
    let style: Style = row.style.parse().map_err(invalid)?;
    let secondary_colors = row
        .secondary
        .iter()
        .map(|color| color.parse::<Color>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(invalid)?;

    let name = Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_owned());
    Ok(Item::new(file_name, category, primary_color, pattern, style)
        .with_name(name)
        .with_secondary_colors(secondary_colors))
}

fn required(
    value: Option<String>,
    index: usize,
    attribute: &'static str,
) -> Result<String, LoadError> {
    value.ok_or(LoadError::MissingAttribute { index, attribute })
}
