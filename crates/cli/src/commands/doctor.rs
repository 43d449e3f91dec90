use serde::Serialize;

use glowmatch_airtable::AirtableClient;
use glowmatch_core::config::{AppConfig, LoadOptions};

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

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                error.to_string().replace('"', "\\\"")
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_credentials(&config));
            checks.push(check_connectivity(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "airtable_credentials",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "airtable_connectivity",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    // Skipped checks are informational; only hard failures flip the summary.
    let any_fail = checks.iter().any(|check| check.status == CheckStatus::Fail);
    let overall_status = if any_fail { CheckStatus::Fail } else { CheckStatus::Pass };
    let summary = if any_fail {
        "doctor: one or more readiness checks failed".to_string()
    } else {
        "doctor: all readiness checks passed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_credentials(config: &AppConfig) -> DoctorCheck {
    if config.has_airtable_credentials() {
        DoctorCheck {
            name: "airtable_credentials",
            status: CheckStatus::Pass,
            details: "api key, base id, and table are configured".to_string(),
        }
    } else {
        DoctorCheck {
            name: "airtable_credentials",
            status: CheckStatus::Skipped,
            details: "no credentials configured; remote fetch unavailable (set \
                      GLOWMATCH_AIRTABLE_API_KEY, GLOWMATCH_AIRTABLE_BASE_ID, \
                      GLOWMATCH_AIRTABLE_TABLE)"
                .to_string(),
        }
    }
}

fn check_connectivity(config: &AppConfig) -> DoctorCheck {
    if !config.has_airtable_credentials() {
        return DoctorCheck {
            name: "airtable_connectivity",
            status: CheckStatus::Skipped,
            details: "skipped because credentials are not configured".to_string(),
        };
    }

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return DoctorCheck {
                name: "airtable_connectivity",
                status: CheckStatus::Fail,
                details: format!("failed to initialize async runtime: {error}"),
            };
        }
    };

    let result = runtime.block_on(async {
        let client = AirtableClient::new(&config.airtable)
            .map_err(|error| format!("failed to build airtable client: {error}"))?;
        let fetched = client
            .probe(1)
            .await
            .map_err(|error| format!("failed to reach airtable: {error}"))?;
        Ok::<usize, String>(fetched)
    });

    match result {
        Ok(fetched) => DoctorCheck {
            name: "airtable_connectivity",
            status: CheckStatus::Pass,
            details: format!("list endpoint reachable ({fetched} record probed)"),
        },
        Err(details) => DoctorCheck { name: "airtable_connectivity", status: CheckStatus::Fail, details },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = vec![report.summary.clone()];
    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "pass",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("  [{marker}] {}: {}", check.name, check.details));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_rendering_marks_each_check() {
        let report = DoctorReport {
            overall_status: CheckStatus::Fail,
            summary: "doctor: one or more readiness checks failed".to_string(),
            checks: vec![
                DoctorCheck {
                    name: "config_validation",
                    status: CheckStatus::Pass,
                    details: "ok".to_string(),
                },
                DoctorCheck {
                    name: "airtable_connectivity",
                    status: CheckStatus::Fail,
                    details: "timeout".to_string(),
                },
            ],
        };
        let output = render_human(&report);
        assert!(output.contains("[pass] config_validation"));
        assert!(output.contains("[FAIL] airtable_connectivity"));
    }
}
