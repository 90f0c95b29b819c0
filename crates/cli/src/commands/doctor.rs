use serde::Serialize;

use crate::commands::build_runtime;
use stocky_core::config::{AppConfig, LoadOptions};
use stocky_db::{connect_with_settings, migrations};

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    ok: bool,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    status: &'static str,
    checks: Vec<DoctorCheck>,
}

pub fn run(json: bool) -> String {
    let mut checks = Vec::new();

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                ok: true,
                detail: "configuration loaded and validated".to_string(),
            });
            Some(config)
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                ok: false,
                detail: error.to_string(),
            });
            None
        }
    };

    if let Some(config) = config {
        match build_runtime() {
            Ok(runtime) => runtime.block_on(async {
                match connect_with_settings(
                    &config.database.url,
                    config.database.max_connections,
                    config.database.timeout_secs,
                )
                .await
                {
                    Ok(pool) => {
                        checks.push(DoctorCheck {
                            name: "database_connectivity",
                            ok: true,
                            detail: format!("connected to {}", config.database.url),
                        });

                        match migrations::inventory_table_exists(&pool).await {
                            Ok(true) => checks.push(DoctorCheck {
                                name: "inventory_table_present",
                                ok: true,
                                detail: "inventory table exists".to_string(),
                            }),
                            Ok(false) => checks.push(DoctorCheck {
                                name: "inventory_table_present",
                                ok: false,
                                detail: "inventory table missing; run `stocky migrate`".to_string(),
                            }),
                            Err(error) => checks.push(DoctorCheck {
                                name: "inventory_table_present",
                                ok: false,
                                detail: error.to_string(),
                            }),
                        }
                    }
                    Err(error) => checks.push(DoctorCheck {
                        name: "database_connectivity",
                        ok: false,
                        detail: error.to_string(),
                    }),
                }
            }),
            Err(error) => checks.push(DoctorCheck {
                name: "runtime_init",
                ok: false,
                detail: error.to_string(),
            }),
        }
    }

    let status = if checks.iter().all(|check| check.ok) { "healthy" } else { "unhealthy" };
    let report = DoctorReport { status, checks };

    if json {
        serde_json::to_string_pretty(&report)
            .unwrap_or_else(|_| r#"{"status":"serialization_error"}"#.to_string())
    } else {
        let mut lines = vec![format!("status: {}", report.status)];
        for check in &report.checks {
            let marker = if check.ok { "ok" } else { "fail" };
            lines.push(format!("{marker:>4} - {}: {}", check.name, check.detail));
        }
        lines.join("\n")
    }
}
