pub mod browse;
pub mod config;
pub mod doctor;
pub mod recommend;
pub mod score;
pub mod show;

use closet_core::config::{AppConfig, LoadOptions};
use closet_core::{
    load_catalog, ApplicationError, Catalog, Category, ImageIndex, InterfaceError, Item, ItemId,
    LoadError,
};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

pub const EXIT_OK: u8 = 0;
pub const EXIT_INTERNAL: u8 = 1;
pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_CATALOG: u8 = 3;
pub const EXIT_INVALID_INPUT: u8 = 4;
pub const EXIT_NO_MATCHES: u8 = 5;
pub const EXIT_NOT_READY: u8 = 6;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    data: Option<Value>,
}

impl CommandResult {
    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: &impl Serialize,
    ) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(data) => data,
            Err(error) => {
                return Self::failure(command, "serialization", error.to_string(), EXIT_INTERNAL)
            }
        };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: Some(data),
        };
        Self { exit_code: EXIT_OK, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        Self::failure_with_data(command, error_class, message, exit_code, None)
    }

    fn failure_with_data(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
        data: Option<Value>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\",\"data\":null}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Loaded configuration and catalog shared by the data commands.
pub(crate) struct Session {
    pub config: AppConfig,
    pub catalog: Catalog,
}

pub(crate) fn open_session(command: &str, options: &LoadOptions) -> Result<Session, CommandResult> {
    let config = AppConfig::load(options.clone()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            EXIT_CONFIG,
        )
    })?;

    let catalog = load_wardrobe(&config).map_err(|error| {
        interface_failure(
            command,
            ApplicationError::from(error).into_interface(correlation_id(command)),
        )
    })?;

    Ok(Session { config, catalog })
}

/// Loads the configured catalog with images resolved. An annotations
/// directory takes the place of the catalog file.
pub(crate) fn load_wardrobe(config: &AppConfig) -> Result<Catalog, LoadError> {
    let catalog = &config.catalog;
    match (&catalog.annotations_dir, &catalog.image_root) {
        (Some(annotations_dir), Some(image_root)) => {
            Catalog::from_annotations(image_root, annotations_dir)
        }
        (_, Some(image_root)) => {
            let index = ImageIndex::scan(image_root)?;
            Ok(load_catalog(&catalog.path)?.with_image_index(&index))
        }
        (_, None) => load_catalog(&catalog.path),
    }
}

pub(crate) fn correlation_id(command: &str) -> String {
    format!("{command}-{}", std::process::id())
}

/// Renders an interface error with its user-facing message; the detail and
/// correlation id travel in `data`.
pub(crate) fn interface_failure(command: &str, error: InterfaceError) -> CommandResult {
    let (error_class, exit_code) = match &error {
        InterfaceError::InvalidCatalog { .. } => ("catalog_load", EXIT_CATALOG),
        InterfaceError::NoMatches { .. } => ("no_matches", EXIT_NO_MATCHES),
        InterfaceError::Internal { .. } => ("internal", EXIT_INTERNAL),
    };

    warn!(
        event_name = "cli.command.failed",
        command,
        error_class,
        correlation_id = error.correlation_id(),
        detail = %error,
        "command failed"
    );

    let data = serde_json::json!({
        "correlation_id": error.correlation_id(),
        "detail": error.to_string(),
    });
    CommandResult::failure_with_data(
        command,
        error_class,
        error.user_message(),
        exit_code,
        Some(data),
    )
}

pub(crate) fn find_item<'a>(
    command: &str,
    catalog: &'a Catalog,
    id: &str,
) -> Result<&'a Item, CommandResult> {
    catalog.get(&ItemId::from(id.trim())).ok_or_else(|| {
        CommandResult::failure(
            command,
            "not_found",
            format!("no item with id `{}` in the catalog", id.trim()),
            EXIT_INVALID_INPUT,
        )
    })
}

pub(crate) fn parse_category(command: &str, raw: &str) -> Result<Category, CommandResult> {
    raw.parse::<Category>().map_err(|error| {
        CommandResult::failure(command, "invalid_input", error.to_string(), EXIT_INVALID_INPUT)
    })
}

/// An item as shown to the user, with whether its photo was found.
#[derive(Debug, Serialize)]
pub(crate) struct ItemView<'a> {
    #[serde(flatten)]
    item: &'a Item,
    image_available: bool,
}

impl<'a> From<&'a Item> for ItemView<'a> {
    fn from(item: &'a Item) -> Self {
        Self { item, image_available: item.image_path.is_some() }
    }
}
