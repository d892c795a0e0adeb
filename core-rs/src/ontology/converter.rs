//! Road network → RDF conversion
//!
//! Reads a SNAP-style edge list (`from<ws>to` per line, `#` comments),
//! builds a directed graph with per-node degrees and writes the road-network
//! ontology, the SKOS classification scheme, every node and every
//! `connectsTo` edge into an in-memory oxigraph store. The store can then be
//! dumped as Turtle and N-Triples for loading into a triplestore.

use oxigraph::io::{RdfFormat, RdfSerializer};
use oxigraph::model::vocab::{rdf, rdfs, xsd};
use oxigraph::model::{GraphName, GraphNameRef, Literal, NamedNode, Quad, Term};
use oxigraph::store::Store;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::classification::Classification;
use super::vocab;
use crate::errors::{Result, RoadnetError};

/// Progress is logged every this many nodes/edges
const PROGRESS_BATCH: usize = 10_000;

/// Number of lowest degrees reported in the summary distribution
const DISTRIBUTION_ROWS: usize = 10;

pub const TURTLE_FILE: &str = "roadnet_complete.ttl";
pub const NTRIPLES_FILE: &str = "roadnet_complete.nt";

/// Edge list loading options
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeListOptions {
    /// Stop after this many accepted edge lines; `Some(0)` means no limit
    pub max_edges: Option<usize>,
    /// Probability of keeping each edge line (0.0..=1.0)
    pub sample_rate: f64,
}

impl Default for EdgeListOptions {
    fn default() -> Self {
        Self {
            max_edges: None,
            sample_rate: 1.0,
        }
    }
}

impl EdgeListOptions {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.sample_rate) {
            return Err(RoadnetError::ValidationError(format!(
                "sample rate must be within 0..=1, got {}",
                self.sample_rate
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeDegree {
    pub in_degree: u64,
    pub out_degree: u64,
}

impl NodeDegree {
    pub fn total(&self) -> u64 {
        self.in_degree + self.out_degree
    }
}

/// Directed road graph; parallel edges collapse into one
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    nodes: BTreeMap<i64, NodeDegree>,
    edges: BTreeSet<(i64, i64)>,
}

/// Aggregate numbers printed after loading
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub avg_degree: f64,
    pub max_degree: u64,
    /// `(degree, node count)` for the lowest degrees present
    pub degree_distribution: Vec<(u64, usize)>,
}

impl NetworkSummary {
    fn log(&self) {
        info!(
            "Network summary: {} nodes, {} edges",
            self.node_count, self.edge_count
        );
        info!(
            "  Average degree: {:.2}, max degree: {}",
            self.avg_degree, self.max_degree
        );
        for (degree, count) in &self.degree_distribution {
            info!("  Degree {}: {} nodes", degree, count);
        }
    }
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directed edge, returns false when it was already present
    pub fn add_edge(&mut self, from: i64, to: i64) -> bool {
        if !self.edges.insert((from, to)) {
            return false;
        }
        self.nodes.entry(from).or_default().out_degree += 1;
        self.nodes.entry(to).or_default().in_degree += 1;
        true
    }

    /// Load an edge list file
    pub fn from_path<P: AsRef<Path>>(path: P, options: &EdgeListOptions) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RoadnetError::FileNotFound(path.to_string_lossy().to_string()));
        }
        info!("Loading edge list from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), options)
    }

    pub fn from_reader<R: BufRead>(reader: R, options: &EdgeListOptions) -> Result<Self> {
        Self::from_reader_with_rng(reader, options, &mut rand::thread_rng())
    }

    /// Load an edge list using the given RNG for sampling
    pub fn from_reader_with_rng<R: BufRead, G: Rng>(
        reader: R,
        options: &EdgeListOptions,
        rng: &mut G,
    ) -> Result<Self> {
        options.validate()?;

        let mut network = Self::new();
        let mut accepted = 0usize;
        let max_edges = options.max_edges.filter(|&max| max > 0);

        for line in reader.lines() {
            let line = line?;
            if line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() != 2 {
                continue;
            }

            if options.sample_rate < 1.0 && rng.gen::<f64>() > options.sample_rate {
                continue;
            }

            let (from, to) = match (parts[0].parse::<i64>(), parts[1].parse::<i64>()) {
                (Ok(from), Ok(to)) => (from, to),
                _ => continue,
            };

            network.add_edge(from, to);
            accepted += 1;

            if max_edges.map_or(false, |max| accepted >= max) {
                break;
            }
            if accepted % (PROGRESS_BATCH * 10) == 0 {
                debug!("Loaded {} edges...", accepted);
            }
        }

        info!(
            "Loaded {} edges, {} nodes",
            network.edge_count(),
            network.node_count()
        );
        Ok(network)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn degree(&self, node: i64) -> Option<NodeDegree> {
        self.nodes.get(&node).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (i64, NodeDegree)> + '_ {
        self.nodes.iter().map(|(id, degree)| (*id, *degree))
    }

    pub fn edges(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.edges.iter().copied()
    }

    pub fn summary(&self) -> NetworkSummary {
        let mut distribution: BTreeMap<u64, usize> = BTreeMap::new();
        let mut total = 0u64;
        let mut max_degree = 0u64;

        for degree in self.nodes.values() {
            let d = degree.total();
            total += d;
            max_degree = max_degree.max(d);
            *distribution.entry(d).or_default() += 1;
        }

        let avg_degree = if self.nodes.is_empty() {
            0.0
        } else {
            total as f64 / self.nodes.len() as f64
        };

        let summary = NetworkSummary {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            avg_degree,
            max_degree,
            degree_distribution: distribution.into_iter().take(DISTRIBUTION_ROWS).collect(),
        };
        summary.log();
        summary
    }
}

/// Files written by [`RdfConverter::save`]
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    pub turtle: PathBuf,
    pub ntriples: PathBuf,
    pub triple_count: usize,
}

/// Builds the road-network RDF graph in an oxigraph store
pub struct RdfConverter {
    store: Store,
}

fn named(iri: String) -> NamedNode {
    NamedNode::new_unchecked(iri)
}

fn integer(value: impl std::fmt::Display) -> Literal {
    Literal::new_typed_literal(value.to_string(), xsd::INTEGER)
}

fn english(value: &str) -> Literal {
    Literal::new_language_tagged_literal_unchecked(value, "en")
}

impl RdfConverter {
    pub fn new() -> Result<Self> {
        let store = Store::new()?;
        Ok(Self { store })
    }

    /// Ontology, classification scheme and the given network in one store
    pub fn convert(network: &RoadNetwork) -> Result<Self> {
        let converter = Self::new()?;
        converter.add_ontology()?;
        converter.add_concept_scheme()?;
        converter.add_network(network)?;
        Ok(converter)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn into_store(self) -> Store {
        self.store
    }

    pub fn triple_count(&self) -> Result<usize> {
        Ok(self.store.len()?)
    }

    fn insert(&self, subject: &NamedNode, predicate: &NamedNode, object: impl Into<Term>) -> Result<()> {
        let quad = Quad::new(
            subject.clone(),
            predicate.clone(),
            object,
            GraphName::DefaultGraph,
        );
        self.store.insert(&quad)?;
        Ok(())
    }

    /// OWL classes and properties of the road-network ontology
    pub fn add_ontology(&self) -> Result<()> {
        info!("Creating ontology...");

        let rdf_type = rdf::TYPE.into_owned();
        let label = rdfs::LABEL.into_owned();
        let comment = rdfs::COMMENT.into_owned();
        let domain = rdfs::DOMAIN.into_owned();
        let range = rdfs::RANGE.into_owned();
        let owl_class = named(vocab::owl("Class"));
        let object_property = named(vocab::owl("ObjectProperty"));
        let datatype_property = named(vocab::owl("DatatypeProperty"));

        let ontology = named(vocab::roadonto(""));
        self.insert(&ontology, &rdf_type, named(vocab::owl("Ontology")))?;
        self.insert(
            &ontology,
            &label,
            Literal::new_simple_literal("Pennsylvania Road Network Ontology"),
        )?;

        let node_class = named(vocab::roadonto(vocab::ROAD_NODE));
        self.insert(&node_class, &rdf_type, owl_class.clone())?;
        self.insert(&node_class, &label, Literal::new_simple_literal("Road Network Node"))?;
        self.insert(
            &node_class,
            &comment,
            Literal::new_simple_literal("Represents an intersection or endpoint in the road network"),
        )?;

        let edge_class = named(vocab::roadonto(vocab::ROAD_EDGE));
        self.insert(&edge_class, &rdf_type, owl_class)?;
        self.insert(&edge_class, &label, Literal::new_simple_literal("Road Connection"))?;

        let connects_to = named(vocab::roadonto(vocab::CONNECTS_TO));
        self.insert(&connects_to, &rdf_type, object_property)?;
        self.insert(&connects_to, &domain, node_class.clone())?;
        self.insert(&connects_to, &range, node_class.clone())?;
        self.insert(&connects_to, &label, Literal::new_simple_literal("connects to"))?;

        let integer_range = xsd::INTEGER.into_owned();
        for property in [
            vocab::HAS_NODE_ID,
            vocab::HAS_DEGREE,
            vocab::HAS_IN_DEGREE,
            vocab::HAS_OUT_DEGREE,
        ] {
            let property = named(vocab::roadonto(property));
            self.insert(&property, &rdf_type, datatype_property.clone())?;
            self.insert(&property, &domain, node_class.clone())?;
            self.insert(&property, &range, integer_range.clone())?;
        }
        self.insert(
            &named(vocab::roadonto(vocab::HAS_DEGREE)),
            &label,
            Literal::new_simple_literal("connectivity degree"),
        )?;

        Ok(())
    }

    /// SKOS scheme with one concept per [`Classification`]
    pub fn add_concept_scheme(&self) -> Result<()> {
        info!("Creating SKOS concepts...");

        let rdf_type = rdf::TYPE.into_owned();
        let pref_label = named(vocab::skos("prefLabel"));
        let scheme = named(vocab::road(vocab::CONCEPT_SCHEME));

        self.insert(&scheme, &rdf_type, named(vocab::skos("ConceptScheme")))?;
        self.insert(&scheme, &pref_label, english("Road Network Node Classification"))?;

        let concept_class = named(vocab::skos("Concept"));
        let in_scheme = named(vocab::skos("inScheme"));
        let definition = named(vocab::skos("definition"));
        let broader = named(vocab::skos("broader"));
        let min_degree = named(vocab::roadonto(vocab::MIN_DEGREE));
        let max_degree = named(vocab::roadonto(vocab::MAX_DEGREE));

        for class in Classification::ALL {
            let concept = named(class.iri());
            self.insert(&concept, &rdf_type, concept_class.clone())?;
            self.insert(&concept, &in_scheme, scheme.clone())?;
            self.insert(&concept, &pref_label, english(class.label()))?;
            self.insert(&concept, &definition, english(class.definition()))?;
            self.insert(&concept, &min_degree, integer(class.min_degree()))?;
            if let Some(max) = class.max_degree() {
                self.insert(&concept, &max_degree, integer(max))?;
            }
            if let Some(parent) = class.broader() {
                self.insert(&concept, &broader, named(parent.iri()))?;
            }
        }

        Ok(())
    }

    /// Node instances with degrees and classification, then `connectsTo` edges
    pub fn add_network(&self, network: &RoadNetwork) -> Result<()> {
        info!("Converting network to RDF...");

        let rdf_type = rdf::TYPE.into_owned();
        let road_node = named(vocab::roadonto(vocab::ROAD_NODE));
        let has_node_id = named(vocab::roadonto(vocab::HAS_NODE_ID));
        let has_degree = named(vocab::roadonto(vocab::HAS_DEGREE));
        let has_in_degree = named(vocab::roadonto(vocab::HAS_IN_DEGREE));
        let has_out_degree = named(vocab::roadonto(vocab::HAS_OUT_DEGREE));
        let has_classification = named(vocab::roadonto(vocab::HAS_CLASSIFICATION));
        let connects_to = named(vocab::roadonto(vocab::CONNECTS_TO));

        let mut node_count = 0usize;
        for (id, degree) in network.nodes() {
            let node = named(vocab::node_iri(id));
            self.insert(&node, &rdf_type, road_node.clone())?;
            self.insert(&node, &has_node_id, integer(id))?;
            self.insert(&node, &has_in_degree, integer(degree.in_degree))?;
            self.insert(&node, &has_out_degree, integer(degree.out_degree))?;
            self.insert(&node, &has_degree, integer(degree.total()))?;

            if let Some(class) = Classification::for_degree(degree.total()) {
                self.insert(&node, &has_classification, named(class.iri()))?;
            }

            node_count += 1;
            if node_count % PROGRESS_BATCH == 0 {
                info!("  Processed {} nodes...", node_count);
            }
        }

        let mut edge_count = 0usize;
        for (from, to) in network.edges() {
            self.insert(&named(vocab::node_iri(from)), &connects_to, named(vocab::node_iri(to)))?;

            edge_count += 1;
            if edge_count % PROGRESS_BATCH == 0 {
                info!("  Processed {} edges...", edge_count);
            }
        }

        info!("Converted {} nodes and {} edges to RDF", node_count, edge_count);
        Ok(())
    }

    fn serializer(format: RdfFormat) -> Result<RdfSerializer> {
        let serializer = RdfSerializer::from_format(format);
        if format != RdfFormat::Turtle {
            return Ok(serializer);
        }
        [
            ("road", vocab::ROAD_NS),
            ("roadonto", vocab::ROADONTO_NS),
            ("skos", vocab::SKOS_NS),
            ("owl", vocab::OWL_NS),
            ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
            ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
            ("xsd", "http://www.w3.org/2001/XMLSchema#"),
        ]
        .into_iter()
        .try_fold(serializer, |serializer, (name, iri)| {
            serializer
                .with_prefix(name, iri)
                .map_err(|e| RoadnetError::Store(e.to_string()))
        })
    }

    /// Serialize the default graph in the given format
    pub fn write_to<W: Write>(&self, format: RdfFormat, writer: W) -> Result<W> {
        self.store
            .dump_graph_to_writer(GraphNameRef::DefaultGraph, Self::serializer(format)?, writer)
            .map_err(|e| RoadnetError::Store(e.to_string()))
    }

    /// Write `roadnet_complete.ttl` and `roadnet_complete.nt` into `output_dir`
    pub fn save<P: AsRef<Path>>(&self, output_dir: P) -> Result<ConversionOutput> {
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir)?;
        info!("Saving RDF data to {}/...", output_dir.display());

        let turtle = output_dir.join(TURTLE_FILE);
        let mut writer = self.write_to(RdfFormat::Turtle, BufWriter::new(File::create(&turtle)?))?;
        writer.flush()?;
        info!("  Saved complete graph to {}", turtle.display());

        let ntriples = output_dir.join(NTRIPLES_FILE);
        let mut writer = self.write_to(RdfFormat::NTriples, BufWriter::new(File::create(&ntriples)?))?;
        writer.flush()?;
        info!("  Saved N-Triples to {}", ntriples.display());

        let triple_count = self.triple_count()?;
        info!("  Total triples: {}", triple_count);

        Ok(ConversionOutput {
            turtle,
            ntriples,
            triple_count,
        })
    }
}
