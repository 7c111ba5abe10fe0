use chrono::{DateTime, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use console_core::{ChartStatus, MaintainerSummary, PanelViewModel, PollPhase, ProjectTypeahead};
use console_engine::{ChartVersion, Configuration, Robot};

const NO_VALUE: &str = "-";

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| NO_VALUE.to_string())
}

/// Execution summary, task table and paging footer.
pub fn render_panel(view: &PanelViewModel) -> String {
    let status = match (view.status, view.execution_loading) {
        (Some(status), _) => status.to_string(),
        (None, true) => "loading".to_string(),
        (None, false) => "unknown".to_string(),
    };
    let trigger = if view.trigger.is_empty() {
        NO_VALUE
    } else {
        view.trigger.as_str()
    };

    let mut out = format!(
        "Execution #{} | {} | trigger: {} | started: {}\n",
        view.execution_id,
        status,
        trigger,
        format_time(view.start_time)
    );
    out.push_str(&format!(
        "succeeded {} | failed {} | in progress {} | stopped {}\n",
        view.succeeded, view.failed, view.in_progress, view.stopped
    ));

    let mut table = new_table();
    table.set_header(vec![
        "ID",
        "Resource type",
        "Source",
        "Destination",
        "Operation",
        "Status",
        "Start",
        "End",
    ]);
    for task in &view.tasks {
        table.add_row(vec![
            task.id.to_string(),
            task.resource_type.clone(),
            task.src_resource.clone(),
            task.dst_resource.clone(),
            task.operation.clone(),
            task.status.clone(),
            format_time(task.start_time),
            format_time(task.end_time),
        ]);
    }
    out.push_str(&table.to_string());
    out.push('\n');

    let mut footer = format!(
        "page {}/{} | {} per page | {} tasks",
        view.page, view.page_count, view.page_size, view.total_count
    );
    if !view.search.is_empty() {
        footer.push_str(&format!(" | {} = {:?}", view.filter_field, view.search));
    }
    if view.loading {
        footer.push_str(" | loading");
    }
    if view.poll == PollPhase::Polling {
        footer.push_str(" | auto-refresh on");
    }
    if view.stop_ongoing {
        footer.push_str(" | stopping");
    }
    out.push_str(&footer);
    if let Some(hint) = &view.hint {
        out.push_str(&format!("\n! {hint}"));
    }
    out
}

pub fn render_suggestions(typeahead: &ProjectTypeahead) -> String {
    let mut out = String::new();
    for (index, suggestion) in typeahead.suggestions().iter().enumerate() {
        out.push_str(&format!("  [{}] {}\n", index + 1, suggestion.name));
    }
    if let Some(hint) = typeahead.hint() {
        out.push_str(&format!("! {hint}\n"));
    }
    out
}

/// One row per setting; `{value, editable}` records are unpacked.
pub fn render_configuration(config: &Configuration) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Key", "Value", "Editable"]);
    for (key, entry) in config {
        let (value, editable) = match entry.get("value") {
            Some(value) => (
                value.clone(),
                entry
                    .get("editable")
                    .and_then(|e| e.as_bool())
                    .map_or(NO_VALUE.to_string(), |e| e.to_string()),
            ),
            None => (entry.clone(), NO_VALUE.to_string()),
        };
        let value = match value {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        };
        table.add_row(vec![key.clone(), value, editable]);
    }
    table
}

pub fn render_robots(robots: &[Robot]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["ID", "Name", "Description", "Expires", "Enabled", "Created"]);
    for robot in robots {
        table.add_row(vec![
            robot.id.to_string(),
            robot.name.clone(),
            robot.description.clone(),
            format_expiry(robot.expires_at),
            (!robot.disabled).to_string(),
            format_time(robot.creation_time),
        ]);
    }
    table
}

pub fn render_chart_versions(versions: &[ChartVersion]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Version", "App version", "Status", "Maintainers", "Created"]);
    for chart in versions {
        let names: Vec<&str> = chart
            .maintainers
            .iter()
            .flatten()
            .map(|m| m.name.as_str())
            .collect();
        let maintainers = MaintainerSummary::from_names(&names)
            .map(|summary| summary.to_string())
            .unwrap_or_else(|| NO_VALUE.to_string());
        table.add_row(vec![
            chart.version.clone(),
            chart.app_version.clone().unwrap_or_else(|| NO_VALUE.to_string()),
            ChartStatus::from_deprecated(chart.deprecated).to_string(),
            maintainers,
            format_time(chart.created),
        ]);
    }
    table
}

/// Robot expiry is a unix timestamp; non-positive means it never expires.
fn format_expiry(expires_at: i64) -> String {
    if expires_at <= 0 {
        return "never".to_string();
    }
    format_time(DateTime::from_timestamp(expires_at, 0))
}
