use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compatibility::{ColorTable, RelationScores, ScoringWeights};
use crate::domain::item::Color;
use crate::recommend::{DEFAULT_LIMIT, MAX_LIMIT};

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub recommender: RecommenderConfig,
    pub scoring: ScoringConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    pub path: PathBuf,
    pub image_root: Option<PathBuf>,
    /// When set, the catalog is built from annotation tables joined onto the
    /// images under `image_root` instead of being read from `path`.
    pub annotations_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecommenderConfig {
    pub default_limit: usize,
    pub min_score: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    pub relations: RelationScores,
    pub complements: Vec<(Color, Color)>,
    pub clashes: Vec<(Color, Color)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub catalog_path: Option<PathBuf>,
    pub image_root: Option<PathBuf>,
    pub annotations_dir: Option<PathBuf>,
    pub default_limit: Option<usize>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                path: PathBuf::from("wardrobe.toml"),
                image_root: None,
                annotations_dir: None,
            },
            recommender: RecommenderConfig { default_limit: DEFAULT_LIMIT, min_score: 0.0 },
            scoring: ScoringConfig::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let palette = ColorTable::default();
        Self {
            weights: ScoringWeights::default(),
            relations: RelationScores::default(),
            complements: palette.complements().collect(),
            clashes: palette.clashes().collect(),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch)?;
        } else if options.require_file || options.config_path.is_some() {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("closet.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(catalog) = patch.catalog {
            if let Some(path) = catalog.path {
                self.catalog.path = path;
            }
            if let Some(image_root) = catalog.image_root {
                self.catalog.image_root = Some(image_root);
            }
            if let Some(annotations_dir) = catalog.annotations_dir {
                self.catalog.annotations_dir = Some(annotations_dir);
            }
        }

        if let Some(recommender) = patch.recommender {
            if let Some(default_limit) = recommender.default_limit {
                self.recommender.default_limit = default_limit;
            }
            if let Some(min_score) = recommender.min_score {
                self.recommender.min_score = min_score;
            }
        }

        if let Some(scoring) = patch.scoring {
            if let Some(color_weight) = scoring.color_weight {
                self.scoring.weights.color = color_weight;
            }
            if let Some(pattern_weight) = scoring.pattern_weight {
                self.scoring.weights.pattern = pattern_weight;
            }
            if let Some(style_weight) = scoring.style_weight {
                self.scoring.weights.style = style_weight;
            }

            if let Some(relations) = scoring.relations {
                let scores = &mut self.scoring.relations;
                if let Some(value) = relations.complementary {
                    scores.complementary = value;
                }
                if let Some(value) = relations.analogous {
                    scores.analogous = value;
                }
                if let Some(value) = relations.monochrome {
                    scores.monochrome = value;
                }
                if let Some(value) = relations.neutral {
                    scores.neutral = value;
                }
                if let Some(value) = relations.unrelated {
                    scores.unrelated = value;
                }
                if let Some(value) = relations.clash {
                    scores.clash = value;
                }
            }

            if let Some(palette) = scoring.palette {
                if let Some(complements) = palette.complements {
                    self.scoring.complements = parse_pairs("scoring.palette.complements", &complements)?;
                }
                if let Some(clashes) = palette.clashes {
                    self.scoring.clashes = parse_pairs("scoring.palette.clashes", &clashes)?;
                }
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("CLOSET_CATALOG_PATH") {
            self.catalog.path = PathBuf::from(value);
        }
        if let Some(value) = read_env("CLOSET_IMAGE_ROOT") {
            self.catalog.image_root = Some(PathBuf::from(value));
        }
        if let Some(value) = read_env("CLOSET_ANNOTATIONS_DIR") {
            self.catalog.annotations_dir = Some(PathBuf::from(value));
        }

        if let Some(value) = read_env("CLOSET_DEFAULT_LIMIT") {
            self.recommender.default_limit = parse_usize("CLOSET_DEFAULT_LIMIT", &value)?;
        }
        if let Some(value) = read_env("CLOSET_MIN_SCORE") {
            self.recommender.min_score = parse_f64("CLOSET_MIN_SCORE", &value)?;
        }

        if let Some(value) = read_env("CLOSET_COLOR_WEIGHT") {
            self.scoring.weights.color = parse_f64("CLOSET_COLOR_WEIGHT", &value)?;
        }
        if let Some(value) = read_env("CLOSET_PATTERN_WEIGHT") {
            self.scoring.weights.pattern = parse_f64("CLOSET_PATTERN_WEIGHT", &value)?;
        }
        if let Some(value) = read_env("CLOSET_STYLE_WEIGHT") {
            self.scoring.weights.style = parse_f64("CLOSET_STYLE_WEIGHT", &value)?;
        }

        let log_level = read_env("CLOSET_LOGGING_LEVEL").or_else(|| read_env("CLOSET_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("CLOSET_LOGGING_FORMAT").or_else(|| read_env("CLOSET_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(catalog_path) = overrides.catalog_path {
            self.catalog.path = catalog_path;
        }
        if let Some(image_root) = overrides.image_root {
            self.catalog.image_root = Some(image_root);
        }
        if let Some(annotations_dir) = overrides.annotations_dir {
            self.catalog.annotations_dir = Some(annotations_dir);
        }
        if let Some(default_limit) = overrides.default_limit {
            self.recommender.default_limit = default_limit;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_catalog(&self.catalog)?;
        validate_recommender(&self.recommender)?;
        validate_scoring(&self.scoring)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("closet.toml"), PathBuf::from("config/closet.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn parse_pairs(key: &str, pairs: &[[String; 2]]) -> Result<Vec<(Color, Color)>, ConfigError> {
    pairs
        .iter()
        .map(|[left, right]| {
            let left = left
                .parse::<Color>()
                .map_err(|error| ConfigError::Validation(format!("{key}: {error}")))?;
            let right = right
                .parse::<Color>()
                .map_err(|error| ConfigError::Validation(format!("{key}: {error}")))?;
            Ok((left, right))
        })
        .collect()
}

fn validate_catalog(catalog: &CatalogConfig) -> Result<(), ConfigError> {
    if catalog.path.as_os_str().is_empty() {
        return Err(ConfigError::Validation("catalog.path must not be empty".to_string()));
    }

    if let Some(image_root) = &catalog.image_root {
        if image_root.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "catalog.image_root must not be empty when set".to_string(),
            ));
        }
    }

    if let Some(annotations_dir) = &catalog.annotations_dir {
        if annotations_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "catalog.annotations_dir must not be empty when set".to_string(),
            ));
        }
        if catalog.image_root.is_none() {
            return Err(ConfigError::Validation(
                "catalog.annotations_dir requires catalog.image_root".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_recommender(recommender: &RecommenderConfig) -> Result<(), ConfigError> {
    if recommender.default_limit == 0 || recommender.default_limit > MAX_LIMIT {
        return Err(ConfigError::Validation(format!(
            "recommender.default_limit must be in range 1..={MAX_LIMIT}"
        )));
    }

    if !(0.0..=1.0).contains(&recommender.min_score) {
        return Err(ConfigError::Validation(
            "recommender.min_score must be in range 0.0..=1.0".to_string(),
        ));
    }

    Ok(())
}

fn validate_scoring(scoring: &ScoringConfig) -> Result<(), ConfigError> {
    let weights = [
        ("scoring.color_weight", scoring.weights.color),
        ("scoring.pattern_weight", scoring.weights.pattern),
        ("scoring.style_weight", scoring.weights.style),
    ];
    for (key, weight) in weights {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ConfigError::Validation(format!("{key} must be a non-negative number")));
        }
    }
    if scoring.weights.total() <= 0.0 {
        return Err(ConfigError::Validation(
            "scoring weights must not all be zero".to_string(),
        ));
    }

    let relations = scoring.relations;
    let relation_scores = [
        ("complementary", relations.complementary),
        ("analogous", relations.analogous),
        ("monochrome", relations.monochrome),
        ("neutral", relations.neutral),
        ("unrelated", relations.unrelated),
        ("clash", relations.clash),
    ];
    for (name, value) in relation_scores {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::Validation(format!(
                "scoring.relations.{name} must be in range 0.0..=1.0"
            )));
        }
    }

    let palettes = [
        ("scoring.palette.complements", &scoring.complements),
        ("scoring.palette.clashes", &scoring.clashes),
    ];
    for (key, pairs) in palettes {
        if let Some((color, _)) = pairs.iter().find(|(left, right)| left == right) {
            return Err(ConfigError::Validation(format!(
                "{key} pairs {color} with itself; pairs must name two different colors"
            )));
        }
    }

    let overlap = scoring.complements.iter().find(|(a, b)| {
        scoring.clashes.iter().any(|(c, d)| (a == c && b == d) || (a == d && b == c))
    });
    if let Some((a, b)) = overlap {
        return Err(ConfigError::Validation(format!(
            "{a} & {b} cannot be both complementary and clashing"
        )));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse::<f64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    catalog: Option<CatalogPatch>,
    recommender: Option<RecommenderPatch>,
    scoring: Option<ScoringPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    path: Option<PathBuf>,
    image_root: Option<PathBuf>,
    annotations_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct RecommenderPatch {
    default_limit: Option<usize>,
    min_score: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ScoringPatch {
    color_weight: Option<f64>,
    pattern_weight: Option<f64>,
    style_weight: Option<f64>,
    relations: Option<RelationsPatch>,
    palette: Option<PalettePatch>,
}

#[derive(Debug, Default, Deserialize)]
struct RelationsPatch {
    complementary: Option<f64>,
    analogous: Option<f64>,
    monochrome: Option<f64>,
    neutral: Option<f64>,
    unrelated: Option<f64>,
    clash: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct PalettePatch {
    complements: Option<Vec<[String; 2]>>,
    clashes: Option<Vec<[String; 2]>>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
