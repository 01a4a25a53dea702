//! `onosdash test`: probe the controller and explain failures.

use serde::Serialize;

use onosdash_core::{ConnectionTest, EntityCollection, EntityKind};

use crate::cli::{ColorMode, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output::{self, Palette, detail_lines};

use super::util;

#[derive(Debug, Serialize)]
struct TestReport<'a> {
    profile: &'a str,
    #[serde(flatten)]
    result: &'a ConnectionTest,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_count: Option<usize>,
}

fn device_count(test: &ConnectionTest) -> Option<usize> {
    test.data
        .as_ref()
        .map(|body| EntityCollection::extract(EntityKind::Devices, body).len())
}

fn detail(report: &TestReport<'_>, palette: Palette) -> String {
    let t = report.result;
    let mut pairs = vec![
        ("Profile", report.profile.to_owned()),
        ("Endpoint", t.endpoint.clone()),
        (
            "Result",
            if t.success {
                palette.good("ok")
            } else {
                palette.bad("failed")
            },
        ),
    ];
    if let Some(n) = report.device_count {
        pairs.push(("Devices", n.to_string()));
    }
    detail_lines(&pairs)
}

pub async fn handle(resolved: &Resolved, global: &GlobalOpts) -> Result<(), CliError> {
    let client = util::client(&resolved.controller)?;

    let spinner = util::spinner(global, &format!("Testing {}", client.base_url()));
    let test = client.test_connection().await;
    util::finish(spinner);

    if !test.success {
        let suggestions = (!test.suggestions.is_empty()).then(|| {
            test.suggestions
                .iter()
                .map(|s| format!("- {s}"))
                .collect::<Vec<_>>()
                .join("\n")
        });
        return Err(CliError::ConnectionTest {
            endpoint: test.endpoint,
            message: test.error.unwrap_or_else(|| "unknown error".into()),
            kind: test.error_kind,
            status: test.status,
            suggestions,
        });
    }

    let report = TestReport {
        profile: &resolved.profile_name,
        device_count: device_count(&test),
        result: &test,
    };
    let palette = Palette::new(global.color);
    let out = output::render_single(
        global.output,
        &report,
        |r| detail(r, palette),
        |r| {
            let p = Palette::new(ColorMode::Never);
            format!("{} {}", p.good("ok"), r.result.endpoint)
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn device_count_reads_probe_body() {
        let test = ConnectionTest {
            success: true,
            endpoint: "http://127.0.0.1:8181/onos/v1/".into(),
            error: None,
            error_kind: None,
            status: None,
            suggestions: Vec::new(),
            data: Some(json!({ "devices": [{ "id": "of:1" }, { "id": "of:2" }] })),
        };
        assert_eq!(device_count(&test), Some(2));

        let report = TestReport {
            profile: "default",
            device_count: device_count(&test),
            result: &test,
        };
        let out = detail(&report, Palette::new(ColorMode::Never));
        assert!(out.contains("Result:   ok"));
        assert!(out.contains("Devices:  2"));
    }
}
