//! End-to-end analysis of the demo knowledge base
//!
//! Loads the graph from disk, runs every analyzer, aggregates and renders,
//! then checks the numbers a reader would see in the reports.

mod common;

use common::{demo_as_of, demo_graph, TestGraph};
use kbgraph::analysis::TaskStatus;
use kbgraph::report::{parse_tables, ParsedTable};
use kbgraph::{DocumentKind, KbConfig, KnowledgeBase, ReportKind};

fn open(graph: &TestGraph) -> KnowledgeBase {
    let config = KbConfig::load(None, graph.path()).expect("Failed to load config");
    KnowledgeBase::open(graph.path(), config).expect("Failed to open graph")
}

fn metric<'a>(table: &'a ParsedTable, name: &str) -> &'a str {
    let row = table
        .rows
        .iter()
        .position(|r| r[0] == name)
        .unwrap_or_else(|| panic!("no row {}", name));
    table.cell(row, "Value").unwrap()
}

#[test]
fn test_load_demo_graph() {
    let graph = demo_graph();
    let kb = open(&graph);

    let names: Vec<_> = kb.store().iter().map(|d| d.name().to_string()).collect();
    assert_eq!(
        names,
        vec![
            "Alpha",
            "Contacts",
            "Home",
            "Projects",
            "Reading List",
            "Jan 8th, 2024",
            "Jan 9th, 2024"
        ]
    );
    assert_eq!(kb.store().journals().count(), 2);
    assert_eq!(
        kb.store().get("jan 8th, 2024").unwrap().kind,
        DocumentKind::Journal
    );
    assert_eq!(kb.store().get("Home").unwrap().properties["type"], "index");
    assert!(kb.skipped().is_empty());
}

#[tokio::test]
async fn test_demo_network() {
    let graph = demo_graph();
    let kb = open(&graph);
    let report = kb.analyze(demo_as_of()).await.unwrap();
    let network = &report.network;

    assert_eq!(report.summary.total_references, 10);
    assert_eq!(report.summary.resolved_references, 9);
    assert_eq!(report.summary.external_links, 1);

    let out_degrees: usize = network.degrees.iter().map(|d| d.out_degree).sum();
    assert_eq!(out_degrees, 10);

    let isolated: Vec<_> = network.isolated().iter().map(|d| d.id.as_str()).collect();
    assert_eq!(isolated, vec!["Contacts", "Reading List"]);
    assert!(network.orphans().is_empty());
    assert!(network.hubs().is_empty());

    let ranked: Vec<_> = network
        .most_referenced(10)
        .iter()
        .map(|d| (d.id.as_str(), d.in_degree))
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("Alpha", 3),
            ("Projects", 3),
            ("Contacts", 1),
            ("Home", 1),
            ("Reading List", 1)
        ]
    );

    assert_eq!(network.missing.len(), 1);
    assert_eq!(network.missing[0].name, "Future Page");
    assert_eq!(network.missing[0].referenced_by[0].as_str(), "Jan 9th, 2024");
}

#[tokio::test]
async fn test_demo_tags_and_tasks() {
    let graph = demo_graph();
    let kb = open(&graph);
    let report = kb.analyze(demo_as_of()).await.unwrap();

    let tags: Vec<_> = report
        .tags
        .ranked()
        .iter()
        .map(|t| (t.name.as_str(), t.occurrences, t.documents))
        .collect();
    assert_eq!(
        tags,
        vec![("work", 3, 2), ("demo", 1, 1), ("books", 1, 1), ("meeting", 1, 1)]
    );

    let tasks = &report.tasks;
    assert_eq!(tasks.total, 6);
    assert_eq!(tasks.count(TaskStatus::Done), 1);
    assert_eq!(tasks.count(TaskStatus::Waiting), 0);
    assert_eq!(tasks.overdue.len(), 1);
    assert_eq!(tasks.overdue[0].status, TaskStatus::Later);
    assert_eq!(tasks.upcoming.len(), 1);
    assert_eq!(tasks.upcoming[0].text, "ship [[Alpha]]");
}

#[tokio::test]
async fn test_write_reports() {
    let graph = demo_graph();
    let kb = open(&graph);
    let report = kb.analyze(demo_as_of()).await.unwrap();

    let out = tempfile::TempDir::new().unwrap();
    let paths = kb.write_reports(&report, out.path()).unwrap();
    assert_eq!(paths.len(), ReportKind::ALL.len());
    for kind in ReportKind::ALL {
        assert!(out.path().join(kind.file_name()).is_file());
    }

    let network = std::fs::read_to_string(out.path().join("network-analysis.md")).unwrap();
    assert!(network.starts_with("type:: report\nreport:: network\nas-of:: 2024-01-10\n"));
    let overview = &parse_tables(&network)[0];
    assert_eq!(metric(overview, "Total Links"), "10");
    assert_eq!(metric(overview, "Isolated Pages"), "2");
    assert_eq!(metric(overview, "Missing Pages"), "1");

    let tasks = std::fs::read_to_string(out.path().join("task-analysis.md")).unwrap();
    assert_eq!(metric(&parse_tables(&tasks)[0], "Completion Rate"), "16.7%");
    assert!(tasks.contains("- LATER write docs ([[Alpha]], due 2024-01-05)"));

    let json_path = kb.write_json(&report, out.path()).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(json["summary"]["total_references"], 10);
}

#[tokio::test]
async fn test_graph_config_file() {
    let graph = demo_graph().file(
        "kbgraph.yaml",
        "hub_threshold: 2\ndecimal_places: 2\ninclude_journals: false\n",
    );
    let kb = open(&graph);
    assert_eq!(kb.store().len(), 5);

    let report = kb.analyze(demo_as_of()).await.unwrap();
    let hubs: Vec<_> = report
        .network
        .hubs()
        .iter()
        .map(|d| d.id.as_str())
        .collect();
    assert_eq!(hubs, vec!["Home", "Projects"]);

    let markdown = kb.render(ReportKind::Tasks, &report);
    assert_eq!(metric(&parse_tables(&markdown)[0], "Completion Rate"), "33.33%");
}
