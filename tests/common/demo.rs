//! A small demo knowledge base
//!
//! Seven documents, ten references (nine resolved, one to a missing page),
//! two isolated pages and six tasks.

use super::TestGraph;
use chrono::NaiveDate;

/// Date the demo's task expectations are computed against
pub fn demo_as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date")
}

pub fn demo_graph() -> TestGraph {
    TestGraph::new()
        .page(
            "Home",
            "type:: index\ntags:: demo\n\n\
             - Welcome, start at [[Projects]] and [[Reading List]]\n\
             - See [[Contacts]]\n\
             - [Logseq](https://logseq.com)\n",
        )
        .page(
            "Projects",
            "tags:: work\n\n\
             - [[Alpha]] is active #work\n\
             - TODO [#A] ship [[Alpha]]\n  DEADLINE: <2024-01-12 Fri>\n\
             - DONE plan [[Home]]\n",
        )
        .page(
            "Alpha",
            "- part of [[Projects]] #work\n\
             - LATER write docs\n  SCHEDULED: <2024-01-05 Fri>\n",
        )
        .page(
            "Reading List",
            "- #books to read\n- `[[Not A Link]]` in code\n",
        )
        .page("Contacts", "- nobody yet\n")
        .journal(
            "2024_01_08",
            "- Met about [[Alpha]] #meeting\n- NOW review [[Projects]]\n- CANCELLED old idea\n",
        )
        .journal("2024_01_09", "- Drafted [[Future Page]]\n- DOING cleanup\n")
        .file("logseq/config.edn", "{:meta/version 1}")
        .file("logseq/bak/pages/Old.md", "- [[Home]] [[Home]]")
}
