//! core::verify
//!
//! Structural verification of a [`Net`].
//!
//! # Checks
//!
//! - Every id is non-empty
//! - Place and transition ids are unique across both kinds (arcs address
//!   either kind through the same id space)
//! - Arc ids are unique across input and output arcs
//! - Token ids are unique
//! - Input arcs run from an existing place to an existing transition
//! - Output arcs run from an existing transition to an existing place
//! - Every token sits on an existing place
//!
//! # Invariants
//!
//! - Never mutates the net
//! - Reports every violation, in a deterministic order: node ids, input
//!   arcs, output arcs, tokens, each in collection order

use std::collections::HashSet;

use thiserror::Error;

use super::net::{ArcDirection, Net};

/// Kind of entity a violation talks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Place,
    Transition,
    Arc,
    Token,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Place => write!(f, "place"),
            EntityKind::Transition => write!(f, "transition"),
            EntityKind::Arc => write!(f, "arc"),
            EntityKind::Token => write!(f, "token"),
        }
    }
}

/// Which end of an arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArcEnd {
    From,
    To,
}

impl std::fmt::Display for ArcEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArcEnd::From => write!(f, "from"),
            ArcEnd::To => write!(f, "to"),
        }
    }
}

/// A single broken invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("{kind} has an empty id")]
    EmptyId { kind: EntityKind },

    #[error("duplicate node id: {0}")]
    DuplicateNodeId(String),

    #[error("duplicate arc id: {0}")]
    DuplicateArcId(String),

    #[error("duplicate token id: {0}")]
    DuplicateTokenId(String),

    #[error("{direction} arc {arc:?} has invalid {end} id {id:?} (expected a {expected})")]
    DanglingArcEndpoint {
        arc: String,
        direction: ArcDirection,
        end: ArcEnd,
        id: String,
        expected: EntityKind,
    },

    #[error("token {token:?} has invalid place id {place:?}")]
    DanglingTokenPlace { token: String, place: String },
}

/// A net that parsed but breaks referential invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid net: {}", summarize(.violations))]
pub struct SchemaError {
    pub violations: Vec<Violation>,
}

fn summarize(violations: &[Violation]) -> String {
    match violations {
        [] => "no violations".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{} (and {} more)", first, rest.len()),
    }
}

/// Check every structural invariant of `net`.
///
/// # Errors
///
/// Returns `SchemaError` listing all violations found.
pub fn validate(net: &Net) -> Result<(), SchemaError> {
    let violations = collect_violations(net);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaError { violations })
    }
}

/// All violations in `net`; empty when the net is valid.
pub fn collect_violations(net: &Net) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut node_ids = HashSet::new();
    let places: HashSet<&str> = net.places.iter().map(|p| p.id.as_str()).collect();
    let transitions: HashSet<&str> = net.transitions.iter().map(|t| t.id.as_str()).collect();

    let nodes = net
        .places
        .iter()
        .map(|p| (EntityKind::Place, p.id.as_str()))
        .chain(
            net.transitions
                .iter()
                .map(|t| (EntityKind::Transition, t.id.as_str())),
        );
    for (kind, id) in nodes {
        if id.is_empty() {
            violations.push(Violation::EmptyId { kind });
        } else if !node_ids.insert(id) {
            violations.push(Violation::DuplicateNodeId(id.to_string()));
        }
    }

    let mut arc_ids = HashSet::new();
    let arcs = net
        .input_arcs
        .iter()
        .map(|a| (ArcDirection::Input, a))
        .chain(net.output_arcs.iter().map(|a| (ArcDirection::Output, a)));
    for (direction, arc) in arcs {
        if arc.id.is_empty() {
            violations.push(Violation::EmptyId {
                kind: EntityKind::Arc,
            });
        } else if !arc_ids.insert(arc.id.as_str()) {
            violations.push(Violation::DuplicateArcId(arc.id.clone()));
        }

        let (from_kind, from_set, to_kind, to_set) = match direction {
            ArcDirection::Input => (
                EntityKind::Place,
                &places,
                EntityKind::Transition,
                &transitions,
            ),
            ArcDirection::Output => (
                EntityKind::Transition,
                &transitions,
                EntityKind::Place,
                &places,
            ),
        };
        for (end, id, expected, set) in [
            (ArcEnd::From, &arc.from_id, from_kind, from_set),
            (ArcEnd::To, &arc.to_id, to_kind, to_set),
        ] {
            if !set.contains(id.as_str()) {
                violations.push(Violation::DanglingArcEndpoint {
                    arc: arc.id.clone(),
                    direction,
                    end,
                    id: id.clone(),
                    expected,
                });
            }
        }
    }

    let mut token_ids = HashSet::new();
    for token in &net.tokens {
        if token.id.is_empty() {
            violations.push(Violation::EmptyId {
                kind: EntityKind::Token,
            });
        } else if !token_ids.insert(token.id.as_str()) {
            violations.push(Violation::DuplicateTokenId(token.id.clone()));
        }
        if !places.contains(token.place_id.as_str()) {
            violations.push(Violation::DanglingTokenPlace {
                token: token.id.clone(),
                place: token.place_id.clone(),
            });
        }
    }

    violations
}
