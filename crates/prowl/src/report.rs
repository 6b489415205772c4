//! Renders one run into `report.html` plus a machine-readable `trace.json`.

use crate::runner::{RunOutcome, TargetResult, sanitize_name};
use chrono::Local;
use prowl_common::trace::Step;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::info;

pub async fn write(outcome: &RunOutcome) -> std::io::Result<()> {
    let html = render_html(outcome);
    let report_path = outcome.result_dir.join("report.html");
    tokio::fs::write(&report_path, html).await?;
    info!("Report written to {}", report_path.display());

    let json = serde_json::to_string_pretty(&outcome.results)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    tokio::fs::write(outcome.result_dir.join("trace.json"), json).await?;
    Ok(())
}

fn render_html(outcome: &RunOutcome) -> String {
    let explored = outcome
        .results
        .iter()
        .filter(|r| r.failure.is_none())
        .count();
    let failed = outcome.results.len() - explored;

    let mut html = String::new();
    html.push_str(
        "<html>\n<head>\n<title>QA Automation Report</title>\n<style>\n\
         body { font-family: Arial, sans-serif; margin: 20px; }\n\
         h1 { color: #333; }\n\
         .summary { background: #f4f4f4; padding: 15px; border-radius: 5px; }\n\
         table { width: 100%; border-collapse: collapse; margin-top: 20px; }\n\
         th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }\n\
         th { background-color: #4CAF50; color: white; }\n\
         .INFO { color: #2196F3; }\n\
         .SUCCESS { color: #4CAF50; font-weight: bold; }\n\
         .ERROR { color: #f44336; font-weight: bold; }\n\
         .SKIP { color: #FF9800; }\n\
         .shots a { margin-right: 12px; }\n\
         </style>\n</head>\n<body>\n",
    );
    html.push_str("<h1>QA Automation Report</h1>\n");
    let _ = write!(
        html,
        "<div class=\"summary\">\n<p><strong>Run:</strong> {}</p>\n\
         <p><strong>Targets:</strong> {} explored, {} failed to load</p>\n</div>\n",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        explored,
        failed
    );

    for result in &outcome.results {
        render_target(&mut html, result);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_target(html: &mut String, result: &TargetResult) {
    let _ = write!(
        html,
        "<h2>{} &mdash; {}</h2>\n",
        escape(&result.target.name),
        escape(&result.target.url)
    );

    if let Some(failure) = &result.failure {
        let _ = write!(
            html,
            "<p class=\"ERROR\">Page never loaded: {}</p>\n",
            escape(failure)
        );
        return;
    }
    let Some(trace) = &result.trace else {
        return;
    };

    let _ = write!(
        html,
        "<p>{} clicks, {} inputs filled, {} viewport passes</p>\n",
        trace.click_count(),
        trace.input_count(),
        trace.viewport_count()
    );

    html.push_str("<table>\n<tr><th>#</th><th>Status</th><th>Step</th></tr>\n");
    for (index, step) in trace.steps.iter().enumerate() {
        let (status, description) = describe(step);
        let _ = write!(
            html,
            "<tr><td>{}</td><td class=\"{}\">{}</td><td>{}</td></tr>\n",
            index + 1,
            status,
            status,
            escape(&description)
        );
    }
    html.push_str("</table>\n");

    if !trace.errors.is_empty() {
        html.push_str("<h3>Errors</h3>\n<ul>\n");
        for error in &trace.errors {
            let _ = write!(html, "<li class=\"ERROR\">{}</li>\n", escape(error));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("<p class=\"shots\">");
    for shot in screenshot_paths(result) {
        let href = shot.to_string_lossy();
        let _ = write!(html, "<a href=\"{}\">{}</a>", href, escape(&href));
    }
    html.push_str("</p>\n");
}

/// Relative paths of the screenshots the explorer captures, one before/after
/// pair per viewport.
fn screenshot_paths(result: &TargetResult) -> Vec<PathBuf> {
    let base = PathBuf::from("shots").join(sanitize_name(&result.target.name));
    result
        .target
        .viewports
        .iter()
        .flat_map(|viewport| {
            [
                base.join(format!("{}_before.png", viewport.label)),
                base.join(format!("{}_after.png", viewport.label)),
            ]
        })
        .collect()
}

fn describe(step: &Step) -> (&'static str, String) {
    match step {
        Step::Viewport {
            width,
            height,
            label,
        } => ("INFO", format!("viewport {}x{} ({})", width, height, label)),
        Step::PhaseOneComplete => (
            "SUCCESS",
            "reached the bottom and returned to the top".to_string(),
        ),
        Step::Scroll { position } => ("INFO", format!("scan pass at {}px", position)),
        Step::ScrollError { message } => ("ERROR", format!("scroll failed: {}", message)),
        Step::Input { input_type } => ("SUCCESS", format!("filled a {} input", input_type)),
        Step::Click { text, tag } => match tag {
            Some(tag) => ("SUCCESS", format!("clicked '{}' <{}>", text, tag)),
            None => ("SUCCESS", format!("clicked '{}'", text)),
        },
        Step::SkipClick { reason, text } => ("SKIP", format!("skipped '{}' ({})", text, reason)),
        Step::ClickError { message } => ("ERROR", format!("click pass failed: {}", message)),
        Step::HorizontalScroll { count } => {
            ("SUCCESS", format!("scrolled {} horizontal region(s)", count))
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
