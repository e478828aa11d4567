use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use closet_core::config::{resolve_config_path, AppConfig, LoadOptions};
use closet_core::Color;
use toml::Value;

/// Where a flag-backed key can be overridden from the command line.
const FLAG_KEYS: [(&str, &str); 6] = [
    ("catalog.path", "--catalog"),
    ("catalog.image_root", "--images"),
    ("catalog.annotations_dir", "--annotations"),
    ("recommender.default_limit", "--default-limit"),
    ("logging.level", "--log-level"),
    ("logging.format", "--log-format"),
];

pub fn run(options: &LoadOptions) -> String {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let sources = SourceLookup::new(options);
    let mut lines =
        vec!["effective config (source precedence: flag > env > file > default):".to_string()];

    lines.push(sources.line(
        "catalog.path",
        &config.catalog.path.display().to_string(),
        &["CLOSET_CATALOG_PATH"],
    ));
    let image_root = config
        .catalog
        .image_root
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<unset>".to_string());
    lines.push(sources.line("catalog.image_root", &image_root, &["CLOSET_IMAGE_ROOT"]));
    let annotations_dir = config
        .catalog
        .annotations_dir
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<unset>".to_string());
    lines.push(sources.line(
        "catalog.annotations_dir",
        &annotations_dir,
        &["CLOSET_ANNOTATIONS_DIR"],
    ));

    lines.push(sources.line(
        "recommender.default_limit",
        &config.recommender.default_limit.to_string(),
        &["CLOSET_DEFAULT_LIMIT"],
    ));
    lines.push(sources.line(
        "recommender.min_score",
        &config.recommender.min_score.to_string(),
        &["CLOSET_MIN_SCORE"],
    ));

    let weights = config.scoring.weights;
    lines.push(sources.line(
        "scoring.color_weight",
        &weights.color.to_string(),
        &["CLOSET_COLOR_WEIGHT"],
    ));
    lines.push(sources.line(
        "scoring.pattern_weight",
        &weights.pattern.to_string(),
        &["CLOSET_PATTERN_WEIGHT"],
    ));
    lines.push(sources.line(
        "scoring.style_weight",
        &weights.style.to_string(),
        &["CLOSET_STYLE_WEIGHT"],
    ));

    let relations = config.scoring.relations;
    for (name, value) in [
        ("complementary", relations.complementary),
        ("analogous", relations.analogous),
        ("monochrome", relations.monochrome),
        ("neutral", relations.neutral),
        ("unrelated", relations.unrelated),
        ("clash", relations.clash),
    ] {
        lines.push(sources.line(&format!("scoring.relations.{name}"), &value.to_string(), &[]));
    }

    lines.push(sources.line(
        "scoring.palette.complements",
        &render_pairs(&config.scoring.complements),
        &[],
    ));
    lines.push(sources.line(
        "scoring.palette.clashes",
        &render_pairs(&config.scoring.clashes),
        &[],
    ));

    lines.push(sources.line(
        "logging.level",
        &config.logging.level,
        &["CLOSET_LOGGING_LEVEL", "CLOSET_LOG_LEVEL"],
    ));
    lines.push(sources.line(
        "logging.format",
        &format!("{:?}", config.logging.format).to_ascii_lowercase(),
        &["CLOSET_LOGGING_FORMAT", "CLOSET_LOG_FORMAT"],
    ));

    lines.join("\n")
}

struct SourceLookup<'a> {
    options: &'a LoadOptions,
    file_path: Option<PathBuf>,
    file_doc: Option<Value>,
}

impl<'a> SourceLookup<'a> {
    fn new(options: &'a LoadOptions) -> Self {
        let file_path = resolve_config_path(options.config_path.as_deref());
        let file_doc = load_config_file_doc(file_path.as_deref());
        Self { options, file_path, file_doc }
    }

    fn line(&self, key_path: &str, value: &str, env_keys: &[&str]) -> String {
        render_line(key_path, value, self.field_source(key_path, env_keys))
    }

    fn field_source(&self, key_path: &str, env_keys: &[&str]) -> String {
        if let Some((_, flag)) = FLAG_KEYS.iter().find(|(key, _)| *key == key_path) {
            let overrides = &self.options.overrides;
            let set = match key_path {
                "catalog.path" => overrides.catalog_path.is_some(),
                "catalog.image_root" => overrides.image_root.is_some(),
                "catalog.annotations_dir" => overrides.annotations_dir.is_some(),
                "recommender.default_limit" => overrides.default_limit.is_some(),
                "logging.level" => overrides.log_level.is_some(),
                _ => overrides.log_format.is_some(),
            };
            if set {
                return format!("flag ({flag})");
            }
        }

        for env_key in env_keys {
            if env::var(env_key).is_ok_and(|value| !value.trim().is_empty()) {
                return format!("env ({env_key})");
            }
        }

        if let Some(doc) = &self.file_doc {
            if contains_path(doc, key_path) {
                let file_path = self
                    .file_path
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "config file".to_string());
                return format!("file ({file_path})");
            }
        }

        "default".to_string()
    }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn render_pairs(pairs: &[(Color, Color)]) -> String {
    if pairs.is_empty() {
        return "<none>".to_string();
    }
    pairs.iter().map(|(left, right)| format!("{left}/{right}")).collect::<Vec<_>>().join(", ")
}
