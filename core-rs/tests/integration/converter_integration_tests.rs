//! Converter integration tests
//!
//! Runs the edge list → RDF pipeline against real files and reloads the
//! written Turtle and N-Triples into fresh stores.

#[path = "../common/mod.rs"]
mod common;

use common::{capture_logs, lines_at};
use oxigraph::io::RdfFormat;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use roadnet_sparql::ontology::converter::{NTRIPLES_FILE, TURTLE_FILE};
use roadnet_sparql::{Classification, EdgeListOptions, RdfConverter, RoadNetwork, RoadnetError};
use std::fs;
use tempfile::TempDir;

const EDGE_LIST: &str = "\
# Directed graph (each unordered pair of nodes is saved once): roadNet-PA.txt
# Pennsylvania road network
# Nodes: 6 Edges: 6
# FromNodeId\tToNodeId
0\t1
0\t2
0\t3
1\t0
2\t4
3\t5
not an edge
4 5 6
";

fn write_edge_list(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("roadNet-PA.txt");
    fs::write(&path, EDGE_LIST).unwrap();
    path
}

fn load(path: &std::path::Path, format: RdfFormat) -> Store {
    let store = Store::new().unwrap();
    let content = fs::read(path).unwrap();
    store.load_from_reader(format, content.as_slice()).unwrap();
    store
}

fn ask(store: &Store, query: &str) -> bool {
    match store.query(query).unwrap() {
        QueryResults::Boolean(answer) => answer,
        _ => panic!("expected ASK result"),
    }
}

#[test]
fn test_edge_list_file_to_rdf_files() {
    let temp = TempDir::new().unwrap();
    let input = write_edge_list(&temp);
    let output_dir = temp.path().join("output");

    let network = RoadNetwork::from_path(&input, &EdgeListOptions::default()).unwrap();
    assert_eq!(network.node_count(), 6);
    assert_eq!(network.edge_count(), 6);

    let converter = RdfConverter::convert(&network).unwrap();
    let output = converter.save(&output_dir).unwrap();

    assert_eq!(output.turtle, output_dir.join(TURTLE_FILE));
    assert_eq!(output.ntriples, output_dir.join(NTRIPLES_FILE));
    assert!(output.turtle.exists());
    assert!(output.ntriples.exists());
    assert_eq!(output.triple_count, converter.triple_count().unwrap());
}

#[test]
fn test_written_files_reload_to_same_graph() {
    let temp = TempDir::new().unwrap();
    let input = write_edge_list(&temp);

    let network = RoadNetwork::from_path(&input, &EdgeListOptions::default()).unwrap();
    let output = RdfConverter::convert(&network).unwrap().save(temp.path()).unwrap();

    let turtle = load(&output.turtle, RdfFormat::Turtle);
    let ntriples = load(&output.ntriples, RdfFormat::NTriples);

    assert_eq!(turtle.len().unwrap(), output.triple_count);
    assert_eq!(ntriples.len().unwrap(), output.triple_count);

    let text = fs::read_to_string(&output.turtle).unwrap();
    assert!(text.contains("@prefix roadonto:"));
    assert!(text.contains("@prefix road:"));
}

#[test]
fn test_reloaded_graph_has_degrees_and_classification() {
    let temp = TempDir::new().unwrap();
    let input = write_edge_list(&temp);

    let network = RoadNetwork::from_path(&input, &EdgeListOptions::default()).unwrap();
    let output = RdfConverter::convert(&network).unwrap().save(temp.path()).unwrap();
    let store = load(&output.turtle, RdfFormat::Turtle);

    // Node 0: out 0→1 0→2 0→3, in 1→0
    assert!(ask(
        &store,
        "PREFIX road: <http://example.org/roadnet/pa#>
         PREFIX roadonto: <http://example.org/roadnet/ontology#>
         ASK {
             road:node_0 a roadonto:RoadNode ;
                 roadonto:hasNodeId 0 ;
                 roadonto:hasDegree 4 ;
                 roadonto:hasInDegree 1 ;
                 roadonto:hasOutDegree 3 ;
                 roadonto:hasClassification road:Intersection ;
                 roadonto:connectsTo road:node_1 , road:node_2 , road:node_3 .
         }"
    ));

    // Node 5 is only a target
    assert!(ask(
        &store,
        "PREFIX road: <http://example.org/roadnet/pa#>
         PREFIX roadonto: <http://example.org/roadnet/ontology#>
         ASK {
             road:node_5 roadonto:hasDegree 1 ;
                 roadonto:hasClassification road:DeadEnd .
             FILTER NOT EXISTS { road:node_5 roadonto:connectsTo ?any }
         }"
    ));
}

#[test]
fn test_reloaded_concept_scheme() {
    let temp = TempDir::new().unwrap();
    let input = write_edge_list(&temp);

    let network = RoadNetwork::from_path(&input, &EdgeListOptions::default()).unwrap();
    let output = RdfConverter::convert(&network).unwrap().save(temp.path()).unwrap();
    let store = load(&output.ntriples, RdfFormat::NTriples);

    for class in Classification::ALL {
        let query = format!(
            "PREFIX skos: <http://www.w3.org/2004/02/skos/core#>
             PREFIX road: <http://example.org/roadnet/pa#>
             ASK {{
                 <{iri}> a skos:Concept ;
                     skos:inScheme road:ConceptScheme ;
                     skos:prefLabel \"{label}\"@en .
             }}",
            iri = class.iri(),
            label = class.label()
        );
        assert!(ask(&store, &query), "missing concept {}", class);
    }

    let super_hub = Classification::SuperHub.iri();
    assert!(ask(
        &store,
        &format!(
            "PREFIX roadonto: <http://example.org/roadnet/ontology#>
             ASK {{ <{}> roadonto:minDegree 11 . FILTER NOT EXISTS {{ <{}> roadonto:maxDegree ?max }} }}",
            super_hub, super_hub
        )
    ));
}

#[test]
fn test_max_edges_limits_conversion() {
    let temp = TempDir::new().unwrap();
    let input = write_edge_list(&temp);

    let options = EdgeListOptions {
        max_edges: Some(2),
        sample_rate: 1.0,
    };
    let network = RoadNetwork::from_path(&input, &options).unwrap();

    assert_eq!(network.edge_count(), 2);
    assert_eq!(network.node_count(), 3);

    let summary = network.summary();
    assert_eq!(summary.max_degree, 2);
    assert_eq!(summary.degree_distribution, vec![(1, 2), (2, 1)]);
}

#[test]
fn test_zero_sample_rate_keeps_schema_only() {
    let temp = TempDir::new().unwrap();
    let input = write_edge_list(&temp);

    let options = EdgeListOptions {
        max_edges: None,
        sample_rate: 0.0,
    };
    let network = RoadNetwork::from_path(&input, &options).unwrap();
    assert_eq!(network.edge_count(), 0);

    // Ontology and concept scheme are still written
    let output = RdfConverter::convert(&network).unwrap().save(temp.path()).unwrap();
    assert!(output.triple_count > 0);
    assert_eq!(load(&output.turtle, RdfFormat::Turtle).len().unwrap(), output.triple_count);
}

#[test]
fn test_missing_input_file() {
    let temp = TempDir::new().unwrap();
    let result = RoadNetwork::from_path(temp.path().join("absent.txt"), &EdgeListOptions::default());
    assert!(matches!(result, Err(RoadnetError::FileNotFound(_))));
}

#[test]
fn test_invalid_sample_rate_rejected() {
    let temp = TempDir::new().unwrap();
    let input = write_edge_list(&temp);

    let options = EdgeListOptions {
        max_edges: None,
        sample_rate: 1.5,
    };
    assert!(RoadNetwork::from_path(&input, &options).is_err());
}

#[test]
fn test_summary_is_logged_at_info() {
    let temp = TempDir::new().unwrap();
    let input = write_edge_list(&temp);
    let network = RoadNetwork::from_path(&input, &EdgeListOptions::default()).unwrap();

    let (summary, logs) = capture_logs(|| network.summary());

    assert_eq!(summary.node_count, 6);
    assert_eq!(
        lines_at(&logs, "INFO", "Network summary: 6 nodes, 6 edges").len(),
        1,
        "logs:\n{}",
        logs
    );
    assert_eq!(lines_at(&logs, "INFO", "Average degree: 2.00, max degree: 4").len(), 1);
    assert_eq!(lines_at(&logs, "INFO", "Degree 1: 2 nodes").len(), 1);
    assert_eq!(lines_at(&logs, "INFO", "Degree 2: 3 nodes").len(), 1);
}
