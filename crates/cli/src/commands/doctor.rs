use closet_core::config::{AppConfig, LoadOptions};
use closet_core::{load_catalog, Catalog, Category, ImageIndex};
use serde::Serialize;

use crate::commands::{load_wardrobe, CommandResult, EXIT_NOT_READY, EXIT_OK};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(options: &LoadOptions, json_output: bool) -> CommandResult {
    let report = build_report(options);
    let exit_code = if report.overall_status == CheckStatus::Pass { EXIT_OK } else { EXIT_NOT_READY };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report(options: &LoadOptions) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(options.clone()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            let (loaded, source) = match &config.catalog.annotations_dir {
                Some(annotations_dir) => (
                    load_wardrobe(&config),
                    format!("annotations in `{}`", annotations_dir.display()),
                ),
                None => (
                    load_catalog(&config.catalog.path),
                    format!("`{}`", config.catalog.path.display()),
                ),
            };
            match loaded {
                Ok(catalog) => {
                    checks.push(DoctorCheck {
                        name: "catalog_load",
                        status: CheckStatus::Pass,
                        details: format!("loaded {} items from {source}", catalog.len()),
                    });
                    checks.push(check_wardrobe_coverage(&catalog));
                    checks.push(check_images(&config, catalog));
                }
                Err(error) => {
                    checks.push(DoctorCheck {
                        name: "catalog_load",
                        status: CheckStatus::Fail,
                        details: error.to_string(),
                    });
                    checks.push(skipped("wardrobe_coverage", "catalog did not load"));
                    checks.push(skipped("image_resolution", "catalog did not load"));
                }
            }
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(skipped("catalog_load", "configuration did not load"));
            checks.push(skipped("wardrobe_coverage", "configuration did not load"));
            checks.push(skipped("image_resolution", "configuration did not load"));
        }
    }

    let all_ok = checks.iter().all(|check| check.status != CheckStatus::Fail)
        && checks.iter().any(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_ok { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_ok {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_wardrobe_coverage(catalog: &Catalog) -> DoctorCheck {
    let tops = catalog.items_by_category(Category::Top).len();
    let bottoms = catalog.items_by_category(Category::Bottom).len();
    let details = format!("{tops} tops, {bottoms} bottoms");

    if tops > 0 && bottoms > 0 {
        DoctorCheck { name: "wardrobe_coverage", status: CheckStatus::Pass, details }
    } else {
        DoctorCheck {
            name: "wardrobe_coverage",
            status: CheckStatus::Fail,
            details: format!("{details}; recommendations need at least one of each"),
        }
    }
}

fn check_images(config: &AppConfig, catalog: Catalog) -> DoctorCheck {
    let Some(image_root) = &config.catalog.image_root else {
        return skipped("image_resolution", "no image root configured");
    };

    let index = match ImageIndex::scan(image_root) {
        Ok(index) => index,
        Err(error) => {
            return DoctorCheck {
                name: "image_resolution",
                status: CheckStatus::Fail,
                details: error.to_string(),
            };
        }
    };

    let catalog = catalog.with_image_index(&index);
    let missing: Vec<String> =
        catalog.missing_images().into_iter().map(|item| item.id.to_string()).collect();

    if missing.is_empty() {
        DoctorCheck {
            name: "image_resolution",
            status: CheckStatus::Pass,
            details: format!("{} images indexed under `{}`", index.len(), image_root.display()),
        }
    } else {
        DoctorCheck {
            name: "image_resolution",
            status: CheckStatus::Fail,
            details: format!("images not found for: {}", missing.join(", ")),
        }
    }
}

fn skipped(name: &'static str, reason: &str) -> DoctorCheck {
    DoctorCheck {
        name,
        status: CheckStatus::Skipped,
        details: format!("skipped because {reason}"),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
