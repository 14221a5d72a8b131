//! The `show` command: loads one file, applies tag edits and prints a page of each group.

use crate::api::{self, Mode};
use crate::args::ShowArgs;
use crate::commands::Out;
use crate::dashboard::Dashboard;
use crate::model::{
    group_label, paginate, sort_rows, ColumnDescriptor, GroupBy, Row, SortOrder,
};
use crate::{Config, Result};
use anyhow::{bail, Context};
use serde::Serialize;
use std::fmt::Write;
use tracing::warn;

/// One file's rows as displayed: its columns and a page of each group.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub folder: String,
    pub filename: String,
    pub group_by: Option<GroupBy>,
    pub sort: Option<String>,
    pub order: SortOrder,
    pub columns: Vec<ColumnDescriptor>,
    pub groups: Vec<GroupView>,
}

/// A page of one group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
    /// The raw group key, empty for rows without tags.
    pub key: String,
    pub label: String,
    /// One-based page number.
    pub page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
    pub rows: Vec<Row>,
}

pub async fn show(config: Config, mode: Mode, args: ShowArgs) -> Result<Out<Report>> {
    let fetch = api::fetcher(&config, mode)?;
    let mut dashboard = Dashboard::new(config, fetch)?;
    dashboard.select_folder(args.folder())?;
    let state = dashboard.select_file(Some(args.file())).await?;
    if let Some(error) = state.error() {
        bail!("{error}");
    }

    for edit in args.tags() {
        if !dashboard.add_tag(edit.id(), edit.tag()) {
            warn!("Unable to tag row {} with '{}'", edit.id(), edit.tag());
        }
    }
    for id in args.clear() {
        if !dashboard.clear_tags(*id) {
            warn!("There is no row {id} to clear the tags of");
        }
    }
    dashboard.set_group_by(args.group_by());

    let columns = dashboard.columns();
    if let Some(field) = args.sort() {
        if !columns.is_empty() && !columns.iter().any(|c| c.field == field) {
            bail!("There is no column named '{field}' to sort by");
        }
    }

    let page_number = args.page().saturating_sub(1);
    let groups: Vec<GroupView> = dashboard
        .groups()
        .into_iter()
        .map(|(key, mut rows)| {
            if let Some(field) = args.sort() {
                sort_rows(&mut rows, field, args.order());
            }
            let page = paginate(&rows, page_number, args.page_size());
            GroupView {
                label: group_label(&key).to_string(),
                key,
                page: page.number + 1,
                total_pages: page.total_pages,
                total_rows: page.total_rows,
                rows: page.rows.into_iter().cloned().collect(),
            }
        })
        .collect();

    let report = Report {
        folder: dashboard.folder().to_string(),
        filename: args.file().to_string(),
        group_by: dashboard.group_by(),
        sort: args.sort().map(str::to_string),
        order: args.order(),
        columns,
        groups,
    };

    let message = if args.json() {
        serde_json::to_string_pretty(&report).context("Unable to serialize the report")?
    } else {
        render(&report)?
    };
    Ok(Out::new(message, report))
}

/// Renders every group of `report` as a markdown table under its own heading.
fn render(report: &Report) -> Result<String> {
    let mut out = format!("# {}/{}\n", report.folder, report.filename);
    if report.columns.is_empty() {
        out.push_str("\nThe report has no rows.");
        return Ok(out);
    }
    if let Some(field) = &report.sort {
        writeln!(out, "\nSorted by '{field}' ({})", report.order)?;
    }
    for group in &report.groups {
        writeln!(
            out,
            "\n## {} (page {} of {}, {} row(s))\n",
            group.label, group.page, group.total_pages, group.total_rows
        )?;
        out.push_str(&markdown_table(&report.columns, &group.rows));
    }
    Ok(out.trim_end().to_string())
}

fn markdown_table(columns: &[ColumnDescriptor], rows: &[Row]) -> String {
    let mut table = String::new();
    let header: Vec<String> = columns.iter().map(|c| escape(&c.header_name)).collect();
    table.push_str(&format!("| {} |\n", header.join(" | ")));
    table.push_str(&format!("|{}\n", "---|".repeat(columns.len())));
    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| row.cell(&c.field).map(|v| escape(&v)).unwrap_or_default())
            .collect();
        table.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    table
}

fn escape(value: &str) -> String {
    value.replace('|', "\\|").replace(['\r', '\n'], " ")
}
