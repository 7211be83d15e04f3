//! render
//!
//! Maps the canonical net onto the input of the external graph-rendering
//! component.
//!
//! # Design
//!
//! [`to_elements`] is a pure function of the net. [`RenderAdapter`] wraps a
//! [`Surface`] (the graph component plus the error banner) and hands it a
//! complete [`Scene`] on every call: elements, the fixed style table and the
//! fixed layout descriptor. There is no incremental diffing; every render
//! asks the component for a full layout.
//!
//! # Element mapping
//!
//! | net entity   | element kind  | source / target          | label        |
//! |--------------|---------------|--------------------------|--------------|
//! | place        | `place`       | -                        | token count  |
//! | transition   | `transition`  | -                        | -            |
//! | input arc    | `input_arc`   | place → transition       | -            |
//! | output arc   | `output_arc`  | transition → place       | -            |

mod surface;
pub mod text;

pub use surface::{RecordingSurface, Surface};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

use crate::core::net::Net;

/// Kind tag of a rendered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Place,
    Transition,
    InputArc,
    OutputArc,
}

impl ElementKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Place => "place",
            ElementKind::Transition => "transition",
            ElementKind::InputArc => "input_arc",
            ElementKind::OutputArc => "output_arc",
        }
    }

    /// Whether the kind is drawn as an edge.
    pub fn is_edge(&self) -> bool {
        matches!(self, ElementKind::InputArc | ElementKind::OutputArc)
    }
}

/// One node or edge handed to the graph component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    pub kind: ElementKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Style for one element kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRule {
    pub selector: String,
    pub style: BTreeMap<String, String>,
}

/// Layout request for the graph component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDescriptor {
    pub algorithm: String,
    pub directed: bool,
}

impl Default for LayoutDescriptor {
    fn default() -> Self {
        Self {
            algorithm: "breadthfirst".to_string(),
            directed: true,
        }
    }
}

/// Complete input for one render of the graph component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub elements: Vec<Element>,
    #[serde(rename = "styleTable")]
    pub style_table: Vec<StyleRule>,
    #[serde(rename = "layoutDescriptor")]
    pub layout: LayoutDescriptor,
}

impl Scene {
    /// Scene for `net` with the fixed style table and layout.
    pub fn for_net(net: &Net) -> Self {
        Self {
            elements: to_elements(net),
            style_table: style_table(),
            layout: LayoutDescriptor::default(),
        }
    }

    /// Element by id.
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }
}

/// Map a net to graph elements.
///
/// Nodes come first (places, then transitions), then edges (input arcs,
/// then output arcs), each in collection order.
pub fn to_elements(net: &Net) -> Vec<Element> {
    let counts = net.token_count_by_place();
    let mut elements = Vec::with_capacity(
        net.places.len() + net.transitions.len() + net.input_arcs.len() + net.output_arcs.len(),
    );

    for place in &net.places {
        let count = counts.get(&place.id).copied().unwrap_or(0);
        elements.push(Element {
            id: place.id.clone(),
            kind: ElementKind::Place,
            source: None,
            target: None,
            label: Some(count.to_string()),
        });
    }
    for transition in &net.transitions {
        elements.push(Element {
            id: transition.id.clone(),
            kind: ElementKind::Transition,
            source: None,
            target: None,
            label: None,
        });
    }
    for (kind, arcs) in [
        (ElementKind::InputArc, &net.input_arcs),
        (ElementKind::OutputArc, &net.output_arcs),
    ] {
        for arc in arcs {
            elements.push(Element {
                id: arc.id.clone(),
                kind,
                source: Some(arc.from_id.clone()),
                target: Some(arc.to_id.clone()),
                label: None,
            });
        }
    }

    elements
}

/// The fixed style table, one rule per element kind.
pub fn style_table() -> Vec<StyleRule> {
    fn rule(selector: &str, props: &[(&str, &str)]) -> StyleRule {
        StyleRule {
            selector: selector.to_string(),
            style: props
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    let edge = [
        ("width", "3"),
        ("line-color", "#000"),
        ("target-arrow-color", "#000"),
        ("target-arrow-shape", "triangle"),
        ("curve-style", "bezier"),
    ];

    vec![
        rule(
            "node[kind='place']",
            &[
                ("background-color", "#00A29C"),
                ("label", "data(label)"),
                ("font-size", "36px"),
            ],
        ),
        rule(
            "node[kind='transition']",
            &[("background-color", "#CE3262"), ("shape", "rectangle")],
        ),
        rule("edge[kind='input_arc']", &edge),
        rule("edge[kind='output_arc']", &edge),
    ]
}

/// Drives a [`Surface`] from the canonical net.
pub struct RenderAdapter {
    surface: Box<dyn Surface>,
    renders: u64,
}

impl RenderAdapter {
    /// Wrap a surface.
    pub fn new(surface: Box<dyn Surface>) -> Self {
        Self {
            surface,
            renders: 0,
        }
    }

    /// Full re-render: banner text, then elements with a fresh layout.
    pub fn render(&mut self, net: &Net, banner: &str) {
        let scene = Scene::for_net(net);
        self.renders += 1;
        trace!(
            render = self.renders,
            elements = scene.elements.len(),
            "rendering net"
        );
        self.surface.set_banner(banner);
        self.surface.draw(&scene);
    }
}

impl std::fmt::Debug for RenderAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderAdapter")
            .field("renders", &self.renders)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::net::Token;

    #[test]
    fn default_net_elements() {
        let elements = to_elements(&Net::default_net());
        assert_eq!(elements.len(), 5 + 4 + 4 + 6);

        let p1 = &elements[0];
        assert_eq!(p1.id, "p1");
        assert_eq!(p1.kind, ElementKind::Place);
        assert_eq!(p1.label.as_deref(), Some("1"));
        assert_eq!(elements[1].label.as_deref(), Some("0"));

        let t1 = elements.iter().find(|e| e.id == "t1").unwrap();
        assert_eq!(t1.kind, ElementKind::Transition);
        assert!(t1.label.is_none());
    }

    #[test]
    fn arcs_become_directed_edges() {
        let elements = to_elements(&Net::default_net());
        let input = elements.iter().find(|e| e.id == "p1t1").unwrap();
        assert_eq!(input.kind, ElementKind::InputArc);
        assert_eq!(input.source.as_deref(), Some("p1"));
        assert_eq!(input.target.as_deref(), Some("t1"));

        let output = elements.iter().find(|e| e.id == "t4p1").unwrap();
        assert_eq!(output.kind, ElementKind::OutputArc);
        assert_eq!(output.source.as_deref(), Some("t4"));
        assert_eq!(output.target.as_deref(), Some("p1"));
        assert!(output.kind.is_edge());
    }

    #[test]
    fn labels_follow_marking() {
        let mut net = Net::default_net();
        net.tokens.push(Token {
            id: "k2".into(),
            place_id: "p1".into(),
            color: String::new(),
        });
        let scene = Scene::for_net(&net);
        assert_eq!(scene.element("p1").unwrap().label.as_deref(), Some("2"));
    }

    #[test]
    fn scene_wire_shape() {
        let value = serde_json::to_value(Scene::for_net(&Net::default_net())).unwrap();
        assert_eq!(value["layoutDescriptor"]["algorithm"], "breadthfirst");
        assert_eq!(value["layoutDescriptor"]["directed"], true);
        assert_eq!(value["elements"][0]["kind"], "place");
        assert!(value["elements"][0].get("source").is_none());
        assert_eq!(value["styleTable"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn style_table_covers_every_kind() {
        let table = style_table();
        for kind in [
            ElementKind::Place,
            ElementKind::Transition,
            ElementKind::InputArc,
            ElementKind::OutputArc,
        ] {
            assert!(table
                .iter()
                .any(|r| r.selector.contains(&format!("'{}'", kind.as_str()))));
        }
    }

    #[test]
    fn adapter_renders_full_scene_every_time() {
        let surface = RecordingSurface::new();
        let mut adapter = RenderAdapter::new(Box::new(surface.clone()));
        adapter.render(&Net::default_net(), "");
        adapter.render(&Net::default_net(), "boom");

        assert_eq!(adapter.renders, 2);
        assert_eq!(surface.draw_count(), 2);
        assert_eq!(surface.banner(), "boom");
        assert_eq!(surface.last_scene().unwrap().elements.len(), 19);
    }
}
