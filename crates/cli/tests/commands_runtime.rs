use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use closet_cli::commands::{browse, config, doctor, recommend, score, show};
use closet_core::config::{ConfigOverrides, LoadOptions};
use serde_json::Value;
use tempfile::TempDir;

const WARDROBE: &str = r#"
[[items]]
id = "T1"
name = "Blue oxford tee"
category = "top"
color = "blue"
pattern = "solid"
style = "casual"
image = "t1.jpg"

[[items]]
id = "T2"
name = "Red gingham shirt"
category = "top"
color = "red"
pattern = "checked"
style = "business"

[[items]]
id = "B1"
name = "Navy chinos"
category = "bottom"
color = "navy"
pattern = "solid"
style = "casual"

[[items]]
id = "B2"
name = "Orange plaid trousers"
category = "bottom"
color = "orange"
pattern = "plaid"
style = "formal"
"#;

const TOPS_ONLY: &str = r#"
[[items]]
id = "T1"
category = "top"
color = "blue"
pattern = "solid"
style = "casual"
"#;

#[test]
fn browse_groups_items_by_category() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let options = options_for(&write_catalog(&dir, WARDROBE));

        let result = browse::run(&options, None);
        assert_eq!(result.exit_code, 0, "expected successful browse");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "browse");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["categories"][0]["category"], "top");
        assert_eq!(payload["data"]["categories"][1]["category"], "bottom");
        assert_eq!(payload["data"]["categories"][1]["items"][0]["id"], "B1");
        assert_eq!(payload["data"]["categories"][0]["items"][0]["image_available"], false);
    });
}

#[test]
fn browse_rejects_unknown_category() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let options = options_for(&write_catalog(&dir, WARDROBE));

        let result = browse::run(&options, Some("hats"));
        assert_eq!(result.exit_code, 4, "expected invalid input code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "invalid_input");
    });
}

#[test]
fn show_unknown_item_is_not_found() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let options = options_for(&write_catalog(&dir, WARDROBE));

        let found = show::run(&options, "T1");
        assert_eq!(found.exit_code, 0);
        assert_eq!(parse_payload(&found.output)["data"]["name"], "Blue oxford tee");

        let missing = show::run(&options, "Z9");
        assert_eq!(missing.exit_code, 4, "expected not found code");
        assert_eq!(parse_payload(&missing.output)["error_class"], "not_found");
    });
}

#[test]
fn recommend_ranks_navy_chinos_first() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let options = options_for(&write_catalog(&dir, WARDROBE));

        let result = recommend::run(&options, "T1", None, None);
        assert_eq!(result.exit_code, 0, "expected successful recommendation");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "recommend");
        let items = &payload["data"]["recommendation"]["items"];
        assert_eq!(items[0]["item"]["id"], "B1");
        assert_eq!(items[1]["item"]["id"], "B2");

        let best = items[0]["score"].as_f64().expect("numeric score");
        assert!((best - 0.895).abs() < 1e-9);
        assert_eq!(items[0]["strength"], "strong");
        assert_eq!(payload["data"]["query"]["id"], "T1");
    });
}

#[test]
fn recommend_respects_limit_and_env_default() {
    with_env(&[("CLOSET_DEFAULT_LIMIT", "1")], || {
        let dir = TempDir::new().expect("temp dir");
        let options = options_for(&write_catalog(&dir, WARDROBE));

        let defaulted = parse_payload(&recommend::run(&options, "T1", None, None).output);
        assert_eq!(defaulted["data"]["recommendation"]["items"].as_array().map(Vec::len), Some(1));

        let explicit = parse_payload(&recommend::run(&options, "T1", Some(2), None).output);
        assert_eq!(explicit["data"]["recommendation"]["items"].as_array().map(Vec::len), Some(2));
    });
}

#[test]
fn recommend_without_bottoms_reports_no_matches() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let options = options_for(&write_catalog(&dir, TOPS_ONLY));

        let result = recommend::run(&options, "T1", None, None);
        assert_eq!(result.exit_code, 5, "expected no matches code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "no_matches");
        assert_eq!(payload["message"], "No matches found.");
        assert!(payload["data"]["correlation_id"].is_string());
    });
}

#[test]
fn recommend_rejects_same_category_target() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let options = options_for(&write_catalog(&dir, WARDROBE));

        let result = recommend::run(&options, "T1", None, Some("tops"));
        assert_eq!(result.exit_code, 4);
        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "invalid_input");
        assert_eq!(payload["message"], "cannot pair `T1` (top) with top items");
    });
}

#[test]
fn invalid_config_returns_config_failure() {
    with_env(&[("CLOSET_DEFAULT_LIMIT", "0")], || {
        let dir = TempDir::new().expect("temp dir");
        let options = options_for(&write_catalog(&dir, WARDROBE));

        let result = recommend::run(&options, "T1", None, None);
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn missing_catalog_returns_catalog_failure() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let options = options_for(&dir.path().join("absent.toml"));

        let result = browse::run(&options, None);
        assert_eq!(result.exit_code, 3, "expected catalog load failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "catalog_load");
        assert_eq!(
            payload["message"],
            "The wardrobe catalog could not be loaded. Check the catalog file and try again."
        );
        let detail = payload["data"]["detail"].as_str().unwrap_or_default();
        assert!(detail.contains("absent.toml"));
    });
}

#[test]
fn score_explains_a_pair_and_rejects_same_category() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let options = options_for(&write_catalog(&dir, WARDROBE));

        let result = score::run(&options, "T1", "B2");
        assert_eq!(result.exit_code, 0);
        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["compatibility"]["color_relation"], "complementary");
        assert_eq!(payload["message"], "`T1` with `B2`: 79% match");

        let invalid = score::run(&options, "T1", "T2");
        assert_eq!(invalid.exit_code, 4);
        assert_eq!(parse_payload(&invalid.output)["error_class"], "invalid_input");
    });
}

#[test]
fn config_reports_value_sources() {
    with_env(&[("CLOSET_MIN_SCORE", "0.3"), ("CLOSET_LOG_LEVEL", "warn")], || {
        let dir = TempDir::new().expect("temp dir");
        let options = options_for(&write_catalog(&dir, WARDROBE));

        let output = config::run(&options);
        assert!(output.contains("recommender.min_score = 0.3 (source: env (CLOSET_MIN_SCORE))"));
        assert!(output.contains("logging.level = warn (source: env (CLOSET_LOG_LEVEL))"));
        assert!(output.contains("catalog.path"));
        assert!(output.contains("(source: flag (--catalog))"));
        assert!(output.contains("recommender.default_limit = 5 (source: default)"));
    });
}

#[test]
fn config_reports_cli_flag_sources() {
    with_env(&[("CLOSET_DEFAULT_LIMIT", "7")], || {
        let dir = TempDir::new().expect("temp dir");
        let mut options = options_for(&write_catalog(&dir, WARDROBE));
        options.overrides.default_limit = Some(2);
        options.overrides.log_level = Some("debug".to_string());

        let output = config::run(&options);
        assert!(output.contains("recommender.default_limit = 2 (source: flag (--default-limit))"));
        assert!(output.contains("logging.level = debug (source: flag (--log-level))"));
        assert!(output.contains("logging.format = compact (source: default)"));
        assert!(output.contains("catalog.annotations_dir = <unset> (source: default)"));

        let limited = parse_payload(&recommend::run(&options, "T1", None, None).output);
        assert_eq!(limited["data"]["recommendation"]["items"].as_array().map(Vec::len), Some(2));
    });
}

#[test]
fn annotations_directory_replaces_catalog_file() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let images = dir.path().join("img");
        let annotations = dir.path().join("anno");
        fs::create_dir_all(images.join("tops")).expect("tops dir");
        fs::create_dir_all(images.join("bottoms")).expect("bottoms dir");
        fs::create_dir_all(&annotations).expect("annotations dir");
        fs::write(images.join("tops/tee.jpg"), b"jpg").expect("tee image");
        fs::write(images.join("bottoms/chinos.jpg"), b"jpg").expect("chinos image");
        fs::write(
            annotations.join("list_category_cloth.txt"),
            "image_name category\ntee.jpg top\nchinos.jpg bottom\n",
        )
        .expect("categories");
        fs::write(
            annotations.join("list_attr_img.txt"),
            "tee.jpg blue solid casual\nchinos.jpg navy solid casual\n",
        )
        .expect("attributes");

        let mut options = options_for(&dir.path().join("absent.toml"));
        options.overrides.image_root = Some(images);
        options.overrides.annotations_dir = Some(annotations);

        let result = recommend::run(&options, "tee.jpg", None, None);
        assert_eq!(result.exit_code, 0, "expected recommendation from annotations");
        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["recommendation"]["items"][0]["item"]["id"], "chinos.jpg");
        assert_eq!(payload["data"]["query"]["image_available"], true);

        let report: Value =
            serde_json::from_str(&doctor::run(&options, true).output).expect("doctor JSON");
        assert_eq!(report["overall_status"], "pass");
        assert_eq!(report["checks"][1]["status"], "pass");
    });
}

#[test]
fn annotations_without_image_root_fail_config_validation() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let mut options = options_for(&write_catalog(&dir, WARDROBE));
        options.overrides.annotations_dir = Some(dir.path().to_path_buf());

        let result = browse::run(&options, None);
        assert_eq!(result.exit_code, 2);
        assert_eq!(parse_payload(&result.output)["error_class"], "config_validation");
    });
}

#[test]
fn doctor_passes_with_complete_wardrobe_and_images() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let catalog = write_catalog(&dir, WARDROBE);
        let images = dir.path().join("photos");
        fs::create_dir_all(&images).expect("image dir");
        fs::write(images.join("t1.jpg"), b"jpg").expect("image file");

        let mut options = options_for(&catalog);
        options.overrides.image_root = Some(images);

        let result = doctor::run(&options, true);
        assert_eq!(result.exit_code, 0, "expected passing doctor report");

        let report: Value = serde_json::from_str(&result.output).expect("doctor JSON");
        assert_eq!(report["overall_status"], "pass");
        assert_eq!(report["checks"][3]["name"], "image_resolution");
        assert_eq!(report["checks"][3]["status"], "pass");
    });
}

#[test]
fn doctor_flags_missing_bottoms() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let options = options_for(&write_catalog(&dir, TOPS_ONLY));

        let result = doctor::run(&options, true);
        assert_eq!(result.exit_code, 6, "expected readiness failure code");

        let report: Value = serde_json::from_str(&result.output).expect("doctor JSON");
        assert_eq!(report["overall_status"], "fail");
        assert_eq!(report["checks"][2]["name"], "wardrobe_coverage");
        assert_eq!(report["checks"][2]["status"], "fail");
        assert_eq!(report["checks"][3]["status"], "skipped");
    });
}

fn write_catalog(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("wardrobe.toml");
    fs::write(&path, body).expect("catalog should be writable");
    path
}

fn options_for(catalog: &Path) -> LoadOptions {
    LoadOptions {
        overrides: ConfigOverrides {
            catalog_path: Some(catalog.to_path_buf()),
            ..ConfigOverrides::default()
        },
        ..LoadOptions::default()
    }
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "CLOSET_CATALOG_PATH",
        "CLOSET_IMAGE_ROOT",
        "CLOSET_ANNOTATIONS_DIR",
        "CLOSET_DEFAULT_LIMIT",
        "CLOSET_MIN_SCORE",
        "CLOSET_COLOR_WEIGHT",
        "CLOSET_PATTERN_WEIGHT",
        "CLOSET_STYLE_WEIGHT",
        "CLOSET_LOGGING_LEVEL",
        "CLOSET_LOGGING_FORMAT",
        "CLOSET_LOG_LEVEL",
        "CLOSET_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
