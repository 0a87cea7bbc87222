//! Task analyzer
//!
//! Recognizes blocks starting with a status marker (`TODO`, `DONE`, ...)
//! and reads their priority and `SCHEDULED:` / `DEADLINE:` dates.

use crate::analysis::{
    AnalysisCapability, AnalysisError, AnalysisResult, AnalysisScope, DocumentAnalyzer, Priority,
    TaskItem, TaskStatus,
};
use crate::graph::{Block, Document};
use async_trait::async_trait;
use chrono::NaiveDate;
use regex_lite::Regex;
use std::sync::OnceLock;

fn priority_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[#([ABC])\]").expect("valid priority pattern"))
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(SCHEDULED|DEADLINE):\s*<(\d{4}-\d{2}-\d{2})[^>]*>").expect("valid date pattern")
    })
}

/// Analyzer that extracts task items
pub struct TaskAnalyzer {
    priority: u32,
}

impl Default for TaskAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskAnalyzer {
    pub fn new() -> Self {
        Self { priority: 40 }
    }

    /// Split a leading status marker from a line
    fn split_marker(line: &str) -> Option<(TaskStatus, &str)> {
        let line = line.trim_start();
        let (word, rest) = match line.find(char::is_whitespace) {
            Some(pos) => (&line[..pos], &line[pos..]),
            None => (line, ""),
        };
        let status = word.parse::<TaskStatus>().ok()?;
        Some((status, rest.trim()))
    }

    /// Parse a block as a task, if it is one
    pub fn parse_task(doc: &Document, index: usize, block: &Block) -> Option<TaskItem> {
        let (status, rest) = Self::split_marker(block.first_line())?;

        let priority = priority_pattern()
            .captures(rest)
            .and_then(|caps| Priority::from_letter(caps.get(1)?.as_str()));
        let text = priority_pattern()
            .replace_all(rest, "")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        let mut scheduled = None;
        let mut deadline = None;
        for caps in date_pattern().captures_iter(&block.content) {
            let (Some(kind), Some(date)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            // Impossible dates like 2024-02-30 are ignored
            let Ok(date) = NaiveDate::parse_from_str(date.as_str(), "%Y-%m-%d") else {
                continue;
            };
            match kind.as_str() {
                "SCHEDULED" => scheduled = scheduled.or(Some(date)),
                _ => deadline = deadline.or(Some(date)),
            }
        }

        Some(TaskItem {
            document: doc.id.clone(),
            block: index,
            status,
            priority,
            text,
            scheduled,
            deadline,
            properties: block.properties.clone(),
        })
    }
}

#[async_trait]
impl DocumentAnalyzer for TaskAnalyzer {
    fn id(&self) -> &str {
        "task-analyzer"
    }

    fn name(&self) -> &str {
        "Task Analyzer"
    }

    fn capabilities(&self) -> Vec<AnalysisCapability> {
        vec![AnalysisCapability::Tasks]
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    async fn analyze(&self, scope: &AnalysisScope<'_>) -> Result<AnalysisResult, AnalysisError> {
        let mut result = AnalysisResult::new();
        for doc in scope.items_to_analyze() {
            for (index, block) in doc.blocks.iter().enumerate() {
                if let Some(task) = Self::parse_task(doc, index, block) {
                    result.tasks.push(task);
                }
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DocumentStore;

    fn task(content: &str) -> Option<TaskItem> {
        TaskAnalyzer::parse_task(&Document::new("Tasks"), 0, &Block::new(content))
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_simple_task() {
        let t = task("TODO Write the report").unwrap();
        assert_eq!(t.status, TaskStatus::Todo);
        assert_eq!(t.text, "Write the report");
        assert_eq!(t.priority, None);
    }

    #[test]
    fn test_parse_priority_and_dates() {
        let t = task("DOING [#A] Ship release\nSCHEDULED: <2024-01-15 Mon>\nDEADLINE: <2024-01-20 Sat 10:00 +1w>").unwrap();
        assert_eq!(t.status, TaskStatus::Doing);
        assert_eq!(t.priority, Some(Priority::A));
        assert_eq!(t.text, "Ship release");
        assert_eq!(t.scheduled, Some(date("2024-01-15")));
        assert_eq!(t.deadline, Some(date("2024-01-20")));
    }

    #[test]
    fn test_marker_must_lead_and_match_case() {
        assert!(task("Remember TODO later").is_none());
        assert!(task("todo lowercase").is_none());
        assert!(task("TODOS are not tasks").is_none());
        assert_eq!(task("DONE").unwrap().text, "");
    }

    #[test]
    fn test_invalid_date_is_ignored() {
        let t = task("LATER Check\nDEADLINE: <2024-02-30 Fri>").unwrap();
        assert_eq!(t.deadline, None);
    }

    #[tokio::test]
    async fn test_analyze_all_statuses() {
        let mut doc = Document::new("Tasks");
        for status in TaskStatus::ALL {
            doc = doc.with_block(Block::new(format!("{} item", status)));
        }
        doc = doc.with_block(Block::new("plain note"));
        let store = DocumentStore::from_documents(vec![doc]).unwrap();

        let result = TaskAnalyzer::new()
            .analyze(&AnalysisScope::new(&store))
            .await
            .unwrap();

        let statuses: Vec<_> = result.tasks.iter().map(|t| t.status).collect();
        assert_eq!(statuses, TaskStatus::ALL.to_vec());
    }
}
