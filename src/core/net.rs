//! core::net
//!
//! Petri net entities and derived views.
//!
//! # Types
//!
//! - [`Place`] - A holder of tokens
//! - [`Transition`] - A firable action node
//! - [`Arc`] - Directed edge; input arcs run place → transition, output arcs
//!   run transition → place
//! - [`Token`] - A unit of state residing at a place
//! - [`Net`] - The whole model
//!
//! # Lifecycle
//!
//! A `Net` is never patched in place by the session. Every change (initial
//! load, accepted editor edit, fire response) replaces it wholesale, and the
//! replacement is validated with [`crate::core::verify::validate`] first.
//!
//! # Wire shape
//!
//! The JSON document has the five top-level keys `places`, `transitions`,
//! `input_arcs`, `output_arcs` and `tokens`. All five must be present. A
//! `null` collection reads as empty and a `null` token colour reads as the
//! empty string, because fire backends emit both for freshly produced tokens.
//! Unknown fields (such as an arc `expr`) are ignored.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A place in the net.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
}

/// A transition in the net.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Transition {
    pub id: String,
}

/// A directed arc.
///
/// The same shape serves both directions; which collection of the [`Net`] the
/// arc lives in decides whether `from_id` names a place or a transition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Arc {
    pub id: String,
    pub from_id: String,
    pub to_id: String,
}

impl Arc {
    /// Build an arc.
    pub fn new(id: impl Into<String>, from_id: impl Into<String>, to_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from_id: from_id.into(),
            to_id: to_id.into(),
        }
    }
}

impl std::fmt::Display for Arc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from_id, self.to_id)
    }
}

/// A token sitting on a place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    pub place_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub color: String,
}

/// The Petri net model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Net {
    #[serde(deserialize_with = "null_as_default")]
    pub places: Vec<Place>,
    #[serde(deserialize_with = "null_as_default")]
    pub transitions: Vec<Transition>,
    #[serde(deserialize_with = "null_as_default")]
    pub input_arcs: Vec<Arc>,
    #[serde(deserialize_with = "null_as_default")]
    pub output_arcs: Vec<Arc>,
    /// Token order is significant and preserved through (de)serialization.
    #[serde(deserialize_with = "null_as_default")]
    pub tokens: Vec<Token>,
}

/// Which way an arc points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArcDirection {
    /// place → transition
    Input,
    /// transition → place
    Output,
}

impl std::fmt::Display for ArcDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArcDirection::Input => write!(f, "input"),
            ArcDirection::Output => write!(f, "output"),
        }
    }
}

impl Net {
    /// An empty net.
    pub fn empty() -> Self {
        Self {
            places: Vec::new(),
            transitions: Vec::new(),
            input_arcs: Vec::new(),
            output_arcs: Vec::new(),
            tokens: Vec::new(),
        }
    }

    /// The net installed at session start.
    ///
    /// Five places, four transitions, a fork at `t1`, a join at `p4`, and a
    /// loop back from `t4` to `p1`. One token starts on `p1`.
    pub fn default_net() -> Self {
        let places = ["p1", "p2", "p3", "p4", "p5"]
            .iter()
            .map(|id| Place { id: id.to_string() })
            .collect();
        let transitions = ["t1", "t2", "t3", "t4"]
            .iter()
            .map(|id| Transition { id: id.to_string() })
            .collect();
        let input_arcs = [("p1", "t1"), ("p2", "t2"), ("p3", "t3"), ("p4", "t4")]
            .iter()
            .map(|(from, to)| Arc::new(format!("{from}{to}"), *from, *to))
            .collect();
        let output_arcs = [
            ("t1", "p2"),
            ("t1", "p3"),
            ("t2", "p4"),
            ("t3", "p4"),
            ("t4", "p5"),
            ("t4", "p1"),
        ]
        .iter()
        .map(|(from, to)| Arc::new(format!("{from}{to}"), *from, *to))
        .collect();

        Self {
            places,
            transitions,
            input_arcs,
            output_arcs,
            tokens: vec![Token {
                id: "t1".to_string(),
                place_id: "p1".to_string(),
                color: "foobar".to_string(),
            }],
        }
    }

    /// Number of tokens on each place.
    ///
    /// Every place of the net appears in the result; places holding no
    /// token map to 0. Tokens referencing an unknown place are counted under
    /// that id as well so a dangling reference is visible rather than lost.
    pub fn token_count_by_place(&self) -> BTreeMap<String, usize> {
        let mut counts: BTreeMap<String, usize> =
            self.places.iter().map(|p| (p.id.clone(), 0)).collect();
        for token in &self.tokens {
            *counts.entry(token.place_id.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Transitions whose every input place currently holds a token.
    ///
    /// A transition without input arcs is never reported as enabled. This is
    /// a display aid only; which transition actually fires is decided by the
    /// execution backend.
    pub fn enabled_transitions(&self) -> Vec<&Transition> {
        let counts = self.token_count_by_place();
        let mut inputs: HashMap<&str, Vec<&str>> = HashMap::new();
        for arc in &self.input_arcs {
            inputs
                .entry(arc.to_id.as_str())
                .or_default()
                .push(arc.from_id.as_str());
        }

        self.transitions
            .iter()
            .filter(|t| match inputs.get(t.id.as_str()) {
                Some(places) => places
                    .iter()
                    .all(|p| counts.get(*p).copied().unwrap_or(0) > 0),
                None => false,
            })
            .collect()
    }

    /// Total number of tokens.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Structural equality ignoring the order of places, transitions and arcs.
    ///
    /// Token order still has to match.
    pub fn equivalent(&self, other: &Net) -> bool {
        fn sorted<T: Ord + Clone>(items: &[T]) -> Vec<T> {
            let mut items = items.to_vec();
            items.sort();
            items
        }

        sorted(&self.places) == sorted(&other.places)
            && sorted(&self.transitions) == sorted(&other.transitions)
            && sorted(&self.input_arcs) == sorted(&other.input_arcs)
            && sorted(&self.output_arcs) == sorted(&other.output_arcs)
            && self.tokens == other.tokens
    }
}

impl Default for Net {
    fn default() -> Self {
        Self::default_net()
    }
}

/// Derived marking view of `net`. Free-function form of
/// [`Net::token_count_by_place`].
pub fn token_count_by_place(net: &Net) -> BTreeMap<String, usize> {
    net.token_count_by_place()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
