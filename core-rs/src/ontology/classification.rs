//! SKOS classification of road nodes by connectivity degree
//!
//! Five concepts form a `skos:broader` chain from `SuperHub` down to
//! `DeadEnd`. Degree bounds are inclusive; `SuperHub` is open-ended.

use std::fmt;

use super::vocab;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    DeadEnd,
    SimpleJunction,
    Intersection,
    MajorHub,
    SuperHub,
}

impl Classification {
    /// All concepts, lowest degree first
    pub const ALL: [Classification; 5] = [
        Classification::DeadEnd,
        Classification::SimpleJunction,
        Classification::Intersection,
        Classification::MajorHub,
        Classification::SuperHub,
    ];

    /// Local name in the `road:` namespace
    pub fn local_name(&self) -> &'static str {
        match self {
            Classification::DeadEnd => "DeadEnd",
            Classification::SimpleJunction => "SimpleJunction",
            Classification::Intersection => "Intersection",
            Classification::MajorHub => "MajorHub",
            Classification::SuperHub => "SuperHub",
        }
    }

    /// `skos:prefLabel` (English)
    pub fn label(&self) -> &'static str {
        match self {
            Classification::DeadEnd => "Dead End",
            Classification::SimpleJunction => "Simple Junction",
            Classification::Intersection => "Intersection",
            Classification::MajorHub => "Major Hub",
            Classification::SuperHub => "Super Hub",
        }
    }

    /// `skos:definition` (English)
    pub fn definition(&self) -> &'static str {
        match self {
            Classification::DeadEnd => "Node with only one connection",
            Classification::SimpleJunction => "Node with 2-3 connections",
            Classification::Intersection => "Node with 4-5 connections",
            Classification::MajorHub => "Node with 6-10 connections",
            Classification::SuperHub => "Node with more than 10 connections",
        }
    }

    pub fn min_degree(&self) -> u64 {
        match self {
            Classification::DeadEnd => 1,
            Classification::SimpleJunction => 2,
            Classification::Intersection => 4,
            Classification::MajorHub => 6,
            Classification::SuperHub => 11,
        }
    }

    /// Upper bound, `None` for the open-ended `SuperHub`
    pub fn max_degree(&self) -> Option<u64> {
        match self {
            Classification::DeadEnd => Some(1),
            Classification::SimpleJunction => Some(3),
            Classification::Intersection => Some(5),
            Classification::MajorHub => Some(10),
            Classification::SuperHub => None,
        }
    }

    /// Concept this one is `skos:broader` than
    pub fn broader(&self) -> Option<Classification> {
        match self {
            Classification::DeadEnd => None,
            Classification::SimpleJunction => Some(Classification::DeadEnd),
            Classification::Intersection => Some(Classification::SimpleJunction),
            Classification::MajorHub => Some(Classification::Intersection),
            Classification::SuperHub => Some(Classification::MajorHub),
        }
    }

    /// Prefixed name used in query text (`road:DeadEnd`)
    pub fn prefixed(&self) -> String {
        format!("road:{}", self.local_name())
    }

    pub fn iri(&self) -> String {
        vocab::road(self.local_name())
    }

    /// Classify a node by total degree; isolated nodes are unclassified
    pub fn for_degree(degree: u64) -> Option<Classification> {
        Self::ALL.into_iter().find(|class| {
            degree >= class.min_degree() && class.max_degree().map_or(true, |max| degree <= max)
        })
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
