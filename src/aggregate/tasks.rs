//! Task statistics

use crate::analysis::{Extraction, Priority, TaskItem, TaskStatus};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TaskSummary {
    /// Every status in marker order, zeros included
    pub by_status: Vec<(TaskStatus, usize)>,
    /// A, B, C, then tasks without priority (`None`)
    pub by_priority: Vec<(Option<Priority>, usize)>,
    pub total: usize,
    /// Open tasks due before `as_of`, earliest first
    pub overdue: Vec<TaskItem>,
    /// Open tasks with a deadline within the upcoming window, earliest first
    pub upcoming: Vec<TaskItem>,
    pub as_of: NaiveDate,
}

impl TaskSummary {
    pub fn build(extraction: &Extraction, as_of: NaiveDate, upcoming_days: u32) -> Self {
        let tasks = &extraction.tasks;

        let by_status = TaskStatus::ALL
            .iter()
            .map(|status| (*status, tasks.iter().filter(|t| t.status == *status).count()))
            .collect();

        let mut by_priority: Vec<(Option<Priority>, usize)> = Priority::ALL
            .iter()
            .map(|p| (Some(*p), tasks.iter().filter(|t| t.priority == Some(*p)).count()))
            .collect();
        by_priority.push((None, tasks.iter().filter(|t| t.priority.is_none()).count()));

        // Windows reaching past the calendar cover every later date
        let horizon = as_of
            .checked_add_signed(Duration::days(i64::from(upcoming_days)))
            .unwrap_or(NaiveDate::MAX);

        let mut overdue: Vec<TaskItem> = tasks
            .iter()
            .filter(|t| !t.status.is_closed() && t.due().map(|d| d < as_of).unwrap_or(false))
            .cloned()
            .collect();
        overdue.sort_by_key(|t| t.due());

        let mut upcoming: Vec<TaskItem> = tasks
            .iter()
            .filter(|t| {
                !t.status.is_closed()
                    && t.deadline
                        .map(|d| d >= as_of && d <= horizon)
                        .unwrap_or(false)
            })
            .cloned()
            .collect();
        upcoming.sort_by_key(|t| t.deadline);

        Self {
            by_status,
            by_priority,
            total: tasks.len(),
            overdue,
            upcoming,
            as_of,
        }
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        self.by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    /// Tasks not DONE or CANCELLED
    pub fn open(&self) -> usize {
        self.by_status
            .iter()
            .filter(|(s, _)| !s.is_closed())
            .map(|(_, n)| n)
            .sum()
    }

    /// DONE tasks as a percentage of all tasks
    pub fn completion_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.count(TaskStatus::Done) as f64 / self.total as f64 * 100.0
        }
    }

    /// Share of a count among all tasks, as a percentage
    pub fn share_percent(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64 * 100.0
        }
    }
}
