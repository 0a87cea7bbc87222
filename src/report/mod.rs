//! Markdown and JSON rendering of an [`AnalysisReport`]
//!
//! Rendering is pure: the same report and settings always produce the same
//! text. Every Markdown report opens with a property block so the output can
//! itself be dropped into a graph as a page.

mod format;
mod table;

pub use format::{format_decimal, format_percent, hashtag, page_link};
pub use table::{parse_table, parse_tables, Alignment, MarkdownTable, ParsedTable};

use crate::aggregate::{AnalysisReport, DegreeMetric, DocumentDegree};
use crate::analysis::{TaskItem, TaskStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the rendered reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Summary,
    Network,
    Tags,
    Tasks,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::Summary,
        ReportKind::Network,
        ReportKind::Tags,
        ReportKind::Tasks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Summary => "summary",
            ReportKind::Network => "network",
            ReportKind::Tags => "tags",
            ReportKind::Tasks => "tasks",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Summary => "Knowledge Base Summary",
            ReportKind::Network => "Network Analysis",
            ReportKind::Tags => "Tag Analysis",
            ReportKind::Tasks => "Task Analysis",
        }
    }

    /// Output file name for Markdown output
    pub fn file_name(&self) -> &'static str {
        match self {
            ReportKind::Summary => "summary-report.md",
            ReportKind::Network => "network-analysis.md",
            ReportKind::Tags => "tag-analysis.md",
            ReportKind::Tasks => "task-analysis.md",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summary" => Ok(ReportKind::Summary),
            "network" | "links" => Ok(ReportKind::Network),
            "tags" => Ok(ReportKind::Tags),
            "tasks" => Ok(ReportKind::Tasks),
            other => Err(format!("unknown report: {}", other)),
        }
    }
}

/// Renders reports with a fixed decimal precision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRenderer {
    precision: usize,
    top_n: usize,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self {
            precision: 1,
            top_n: 10,
        }
    }
}

impl ReportRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Length of "top" rankings
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn render(&self, kind: ReportKind, report: &AnalysisReport) -> String {
        match kind {
            ReportKind::Summary => self.render_summary(report),
            ReportKind::Network => self.render_network(report),
            ReportKind::Tags => self.render_tags(report),
            ReportKind::Tasks => self.render_tasks(report),
        }
    }

    /// Every report, in [`ReportKind::ALL`] order
    pub fn render_all(&self, report: &AnalysisReport) -> Vec<(ReportKind, String)> {
        ReportKind::ALL
            .iter()
            .map(|kind| (*kind, self.render(*kind, report)))
            .collect()
    }

    pub fn render_json(&self, report: &AnalysisReport) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(report)
    }

    pub fn render_summary(&self, report: &AnalysisReport) -> String {
        let s = &report.summary;
        let mut out = header(ReportKind::Summary, report);

        out.push_str("## Overview\n\n");
        out.push_str(&metric_table(&[
            ("Total Documents", s.documents.to_string()),
            ("Pages", s.pages.to_string()),
            ("Journals", s.journals.to_string()),
            ("Blocks", s.blocks.to_string()),
            ("Headings", s.headings.to_string()),
            ("Words", s.words.to_string()),
            ("Total Links", s.total_references.to_string()),
            ("External Links", s.external_links.to_string()),
            ("Distinct Tags", s.distinct_tags.to_string()),
            ("Tasks", s.tasks.to_string()),
            (
                "Task Completion",
                format_percent(report.tasks.completion_percent(), self.precision),
            ),
        ]));

        out.push_str("\n## Most Referenced Pages\n\n");
        out.push_str(&self.ranking(
            &report.network.most_referenced(self.top_n),
            DegreeMetric::In,
            "References",
        ));

        out.push_str("\n## Top Tags\n\n");
        let ranked = report.tags.ranked();
        if ranked.is_empty() {
            out.push_str("No tags found.\n");
        } else {
            for stat in ranked.iter().take(self.top_n) {
                out.push_str(&format!(
                    "- {} ({})\n",
                    hashtag(&stat.name),
                    times_used(stat.count(report.tags.mode))
                ));
            }
        }

        out.push_str("\n## Property Usage\n\n");
        if report.properties.is_empty() {
            out.push_str("No properties found.\n");
        } else {
            let mut table = MarkdownTable::new()
                .column("Property", Alignment::None)
                .column("Pages", Alignment::Right)
                .column("Blocks", Alignment::Right);
            for usage in &report.properties {
                table.push_row([
                    format!("{}::", usage.key),
                    usage.documents.to_string(),
                    usage.block_uses.to_string(),
                ]);
            }
            out.push_str(&table.render());
        }

        if !report.warnings.is_empty() {
            out.push_str("\n## Warnings\n\n");
            for warning in &report.warnings {
                out.push_str(&format!("- {}\n", warning));
            }
        }

        out
    }

    pub fn render_network(&self, report: &AnalysisReport) -> String {
        let s = &report.summary;
        let network = &report.network;
        let mut out = header(ReportKind::Network, report);

        out.push_str("## Overview\n\n");
        out.push_str(&metric_table(&[
            ("Total Pages", s.documents.to_string()),
            ("Total Links", s.total_references.to_string()),
            ("Resolved Links", s.resolved_references.to_string()),
            ("Missing Pages", s.missing_pages.to_string()),
            ("Isolated Pages", s.isolated.to_string()),
            ("Orphan Pages", s.orphans.to_string()),
            ("Hub Pages", s.hubs.to_string()),
            (
                "Average Links per Page",
                format_decimal(s.average_references, self.precision),
            ),
            ("Link Density", format_percent(s.density_percent, self.precision)),
        ]));

        out.push_str("\n## Most Referenced\n\n");
        out.push_str(&self.ranking(
            &network.most_referenced(self.top_n),
            DegreeMetric::In,
            "References",
        ));

        out.push_str("\n## Most Linking\n\n");
        out.push_str(&self.ranking(
            &network.most_linking(self.top_n),
            DegreeMetric::Out,
            "Links",
        ));

        out.push_str(&format!(
            "\n## Highly Connected Pages\n\nPages with more than {} incoming or outgoing links.\n\n",
            network.hub_threshold
        ));
        let hubs = network.hubs();
        if hubs.is_empty() {
            out.push_str("None.\n");
        } else {
            let mut table = MarkdownTable::new()
                .column("Page", Alignment::None)
                .column("In", Alignment::Right)
                .column("Out", Alignment::Right);
            for hub in hubs {
                table.push_row([
                    page_link(hub.id.as_str()),
                    hub.in_degree.to_string(),
                    hub.out_degree.to_string(),
                ]);
            }
            out.push_str(&table.render());
        }

        out.push_str("\n## Isolated Pages\n\nPages without outgoing links.\n\n");
        let isolated = network.isolated();
        if isolated.is_empty() {
            out.push_str("None.\n");
        } else {
            for degree in isolated {
                out.push_str(&format!("- {}\n", page_link(degree.id.as_str())));
            }
        }

        if !network.missing.is_empty() {
            out.push_str("\n## Missing Pages\n\n");
            let mut table = MarkdownTable::new()
                .column("Page", Alignment::None)
                .column("References", Alignment::Right)
                .column("Referenced By", Alignment::None);
            for page in &network.missing {
                let sources: Vec<String> = page
                    .referenced_by
                    .iter()
                    .map(|id| page_link(id.as_str()))
                    .collect();
                table.push_row([
                    page_link(&page.name),
                    page.references.to_string(),
                    sources.join(", "),
                ]);
            }
            out.push_str(&table.render());
        }

        out
    }

    pub fn render_tags(&self, report: &AnalysisReport) -> String {
        let tags = &report.tags;
        let mut out = header(ReportKind::Tags, report);

        out.push_str("## Overview\n\n");
        out.push_str(&metric_table(&[
            ("Distinct Tags", tags.tags.len().to_string()),
            ("Tag Occurrences", tags.total_occurrences.to_string()),
            ("Tagged Pages", tags.by_document.len().to_string()),
        ]));

        out.push_str("\n## Tag Frequency\n\n");
        let ranked = tags.ranked();
        if ranked.is_empty() {
            out.push_str("No tags found.\n");
            return out;
        }

        let mut table = MarkdownTable::new()
            .column("Tag", Alignment::None)
            .column("Occurrences", Alignment::Right)
            .column("Pages", Alignment::Right)
            .column("Share", Alignment::Right);
        for stat in &ranked {
            table.push_row([
                hashtag(&stat.name),
                stat.occurrences.to_string(),
                stat.documents.to_string(),
                format_percent(tags.share_percent(stat), self.precision),
            ]);
        }
        out.push_str(&table.render());

        out.push_str("\n## Top Tags\n\n");
        for stat in ranked.iter().take(self.top_n) {
            out.push_str(&format!(
                "- {} ({})\n",
                hashtag(&stat.name),
                times_used(stat.count(tags.mode))
            ));
        }

        out.push_str("\n## Tags by Page\n\n");
        for entry in &tags.by_document {
            let labels: Vec<String> = entry.tags.iter().map(|t| hashtag(t)).collect();
            out.push_str(&format!(
                "- {}: {}\n",
                page_link(entry.document.as_str()),
                labels.join(" ")
            ));
        }

        out
    }

    pub fn render_tasks(&self, report: &AnalysisReport) -> String {
        let tasks = &report.tasks;
        let mut out = header(ReportKind::Tasks, report);

        out.push_str("## Overview\n\n");
        out.push_str(&metric_table(&[
            ("Total Tasks", tasks.total.to_string()),
            ("Open Tasks", tasks.open().to_string()),
            ("Completed", tasks.count(TaskStatus::Done).to_string()),
            (
                "Completion Rate",
                format_percent(tasks.completion_percent(), self.precision),
            ),
            ("Overdue", tasks.overdue.len().to_string()),
        ]));

        out.push_str("\n## Status Distribution\n\n");
        let mut table = MarkdownTable::new()
            .column("Status", Alignment::Center)
            .column("Count", Alignment::Right)
            .column("Share", Alignment::Right);
        for (status, count) in &tasks.by_status {
            table.push_row([
                status.to_string(),
                count.to_string(),
                format_percent(tasks.share_percent(*count), self.precision),
            ]);
        }
        out.push_str(&table.render());

        out.push_str("\n## Priority Distribution\n\n");
        let mut table = MarkdownTable::new()
            .column("Priority", Alignment::Center)
            .column("Count", Alignment::Right)
            .column("Share", Alignment::Right);
        for (priority, count) in &tasks.by_priority {
            let label = match priority {
                Some(p) => format!("[#{}]", p.as_str()),
                None => "None".to_string(),
            };
            table.push_row([
                label,
                count.to_string(),
                format_percent(tasks.share_percent(*count), self.precision),
            ]);
        }
        out.push_str(&table.render());

        out.push_str("\n## Overdue\n\n");
        task_list(&mut out, &tasks.overdue);

        out.push_str("\n## Upcoming Deadlines\n\n");
        task_list(&mut out, &tasks.upcoming);

        out
    }

    fn ranking(&self, degrees: &[&DocumentDegree], metric: DegreeMetric, label: &str) -> String {
        if degrees.is_empty() {
            return "None.\n".to_string();
        }
        let mut table = MarkdownTable::new()
            .column("Rank", Alignment::Right)
            .column("Page", Alignment::None)
            .column(label, Alignment::Right);
        for (rank, degree) in degrees.iter().enumerate() {
            let value = match metric {
                DegreeMetric::In => degree.in_degree,
                DegreeMetric::Out => degree.out_degree,
                DegreeMetric::Total => degree.in_degree + degree.out_degree,
            };
            table.push_row([
                (rank + 1).to_string(),
                page_link(degree.id.as_str()),
                value.to_string(),
            ]);
        }
        table.render()
    }
}

/// `used 1 time`, `used 3 times`
fn times_used(count: usize) -> String {
    if count == 1 {
        "used 1 time".to_string()
    } else {
        format!("used {} times", count)
    }
}

/// Property block and title
fn header(kind: ReportKind, report: &AnalysisReport) -> String {
    format!(
        "type:: report\nreport:: {}\nas-of:: {}\n\n# {}\n\n",
        kind.as_str(),
        report.as_of.format("%Y-%m-%d"),
        kind.title()
    )
}

fn metric_table(rows: &[(&str, String)]) -> String {
    let mut table = MarkdownTable::new()
        .column("Metric", Alignment::None)
        .column("Value", Alignment::Right);
    for (metric, value) in rows {
        table.push_row([metric.to_string(), value.clone()]);
    }
    table.render()
}

fn task_list(out: &mut String, tasks: &[TaskItem]) {
    if tasks.is_empty() {
        out.push_str("None.\n");
        return;
    }
    for task in tasks {
        let priority = task
            .priority
            .map(|p| format!(" [#{}]", p.as_str()))
            .unwrap_or_default();
        let due = task
            .due()
            .map(|d| format!(", due {}", d.format("%Y-%m-%d")))
            .unwrap_or_default();
        out.push_str(&format!(
            "- {}{} {} ({}{})\n",
            task.status,
            priority,
            task.text,
            page_link(task.document.as_str()),
            due
        ));
    }
}
