use std::fmt::Display;
use std::io::Read;

use log::debug;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::name::LocalName;
use quick_xml::Reader;
use thiserror::Error;

use crate::routing::VrpInstance;
use crate::routing::VrpInstanceError;

/// How the travel costs are given in a VRP-REP file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum VrpFormat {
    /// Every node has coordinates `cx` and `cy`; costs are euclidean distances.
    #[default]
    A,
    /// The network lists links between nodes with their `length`.
    C,
}

impl Display for VrpFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VrpFormat::A => write!(f, "a"),
            VrpFormat::C => write!(f, "c"),
        }
    }
}

#[derive(Error, Debug)]
pub enum VrpParseError {
    #[error("failed to read the instance")]
    Io(#[from] std::io::Error),
    #[error("invalid XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("invalid XML attribute: {0}")]
    Attribute(#[from] AttrError),
    #[error("missing element '{0}'")]
    MissingElement(&'static str),
    #[error("element '{element}' has no attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    #[error("'{value}' is not a valid value for '{element}'")]
    InvalidNumber { element: String, value: String },
    #[error("node {0} is not one of the nodes of the network")]
    UnknownNode(usize),
    #[error("the instance is invalid: {0}")]
    Instance(#[from] VrpInstanceError),
}

#[derive(Debug, Default)]
struct PendingNode {
    id: usize,
    cx: Option<f64>,
    cy: Option<f64>,
}

#[derive(Debug, Default)]
struct PendingLink {
    head: usize,
    tail: usize,
    length: Option<f64>,
}

#[derive(Debug, Default)]
struct PendingRequest {
    node: usize,
    quantity: Option<f64>,
}

#[derive(Debug, Default)]
struct VrpRepDocument {
    nodes: Vec<PendingNode>,
    links: Vec<PendingLink>,
    requests: Vec<PendingRequest>,
    capacity: Option<f64>,
    vehicles: Option<f64>,
}

/// Reads a capacitated vehicle routing instance in the VRP-REP XML format.
///
/// Nodes are numbered from 1, where node 1 is the depot. The fleet is read from
/// `fleet/vehicle_profile/{capacity, number}` and the demands from
/// `requests/request[@node]/quantity`.
pub fn parse_vrp_rep(
    mut source: impl Read,
    format: VrpFormat,
) -> Result<VrpInstance, VrpParseError> {
    let mut content = String::new();
    let _ = source.read_to_string(&mut content)?;

    let document = read_document(&content)?;
    debug!(
        "Read {} nodes, {} links and {} requests",
        document.nodes.len(),
        document.links.len(),
        document.requests.len()
    );

    let num_nodes = document.nodes.len();
    let capacity = document
        .capacity
        .ok_or(VrpParseError::MissingElement("capacity"))?;
    let vehicles = document
        .vehicles
        .ok_or(VrpParseError::MissingElement("number"))?;
    if !vehicles.is_finite() || vehicles < 0.0 || vehicles.fract() != 0.0 {
        return Err(VrpParseError::InvalidNumber {
            element: "number".to_owned(),
            value: vehicles.to_string(),
        });
    }

    let mut demands = vec![0.0; num_nodes];
    for request in &document.requests {
        let node = node_index(request.node, num_nodes)?;
        demands[node] = request
            .quantity
            .ok_or(VrpParseError::MissingElement("quantity"))?;
    }

    let instance = match format {
        VrpFormat::A => {
            let mut coordinates = vec![(0.0, 0.0); num_nodes];
            for node in &document.nodes {
                let index = node_index(node.id, num_nodes)?;
                coordinates[index] = (
                    node.cx.ok_or(VrpParseError::MissingElement("cx"))?,
                    node.cy.ok_or(VrpParseError::MissingElement("cy"))?,
                );
            }
            VrpInstance::from_coordinates(&coordinates, demands, vehicles as usize, capacity)?
        }
        VrpFormat::C => {
            let mut costs = vec![vec![0.0; num_nodes]; num_nodes];
            for link in &document.links {
                let head = node_index(link.head, num_nodes)?;
                let tail = node_index(link.tail, num_nodes)?;
                let length = link
                    .length
                    .ok_or(VrpParseError::MissingElement("length"))?;
                costs[head][tail] = length;
                costs[tail][head] = length;
            }
            VrpInstance::new(costs, demands, vehicles as usize, capacity)?
        }
    };

    Ok(instance)
}

fn read_document(content: &str) -> Result<VrpRepDocument, VrpParseError> {
    let mut reader = Reader::from_str(content);
    let _ = reader.trim_text(true);

    let mut document = VrpRepDocument::default();
    let mut path: Vec<String> = vec![];
    let mut current_node: Option<PendingNode> = None;
    let mut current_link: Option<PendingLink> = None;
    let mut current_request: Option<PendingRequest> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let name = e.local_name();
                let tag = local_name_as_str(&name);
                match (tag, open_element(&path)) {
                    ("node", Some("nodes")) => current_node = Some(read_node(e)?),
                    ("link", Some("links")) => current_link = Some(read_link(e)?),
                    ("request", Some("requests")) => current_request = Some(read_request(e)?),
                    _ => {}
                }
                path.push(tag.to_owned());
            }
            Event::Empty(ref e) => {
                let name = e.local_name();
                let tag = local_name_as_str(&name);
                match (tag, open_element(&path)) {
                    ("node", Some("nodes")) => document.nodes.push(read_node(e)?),
                    ("link", Some("links")) => document.links.push(read_link(e)?),
                    ("request", Some("requests")) => document.requests.push(read_request(e)?),
                    _ => {}
                }
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                let Some(element) = path.last() else {
                    continue;
                };

                match (element.as_str(), parent_of_last(&path)) {
                    ("cx", Some("node")) => {
                        if let Some(node) = current_node.as_mut() {
                            node.cx = Some(parse_number("cx", &text)?);
                        }
                    }
                    ("cy", Some("node")) => {
                        if let Some(node) = current_node.as_mut() {
                            node.cy = Some(parse_number("cy", &text)?);
                        }
                    }
                    ("length", Some("link")) => {
                        if let Some(link) = current_link.as_mut() {
                            link.length = Some(parse_number("length", &text)?);
                        }
                    }
                    ("quantity", Some("request")) => {
                        if let Some(request) = current_request.as_mut() {
                            request.quantity = Some(parse_number("quantity", &text)?);
                        }
                    }
                    ("capacity", Some("vehicle_profile")) => {
                        document.capacity = Some(parse_number("capacity", &text)?);
                    }
                    ("number", Some("vehicle_profile")) => {
                        document.vehicles = Some(parse_number("number", &text)?);
                    }
                    _ => {}
                }
            }
            Event::End(ref e) => {
                let name = e.local_name();
                match local_name_as_str(&name) {
                    "node" => document.nodes.extend(current_node.take()),
                    "link" => document.links.extend(current_link.take()),
                    "request" => document.requests.extend(current_request.take()),
                    _ => {}
                }
                let _ = path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(document)
}

fn read_node(event: &BytesStart) -> Result<PendingNode, VrpParseError> {
    Ok(PendingNode {
        id: required_index(event, "node", "id")?,
        ..Default::default()
    })
}

fn read_link(event: &BytesStart) -> Result<PendingLink, VrpParseError> {
    Ok(PendingLink {
        head: required_index(event, "link", "head")?,
        tail: required_index(event, "link", "tail")?,
        length: None,
    })
}

fn read_request(event: &BytesStart) -> Result<PendingRequest, VrpParseError> {
    Ok(PendingRequest {
        node: required_index(event, "request", "node")?,
        quantity: None,
    })
}

/// The innermost element which is open.
fn open_element(path: &[String]) -> Option<&str> {
    path.last().map(String::as_str)
}

fn parent_of_last(path: &[String]) -> Option<&str> {
    path.len()
        .checked_sub(2)
        .map(|index| path[index].as_str())
}

fn required_index(
    event: &BytesStart,
    element: &'static str,
    attribute: &'static str,
) -> Result<usize, VrpParseError> {
    let value = attribute_value(event, attribute)?
        .ok_or(VrpParseError::MissingAttribute { element, attribute })?;

    value
        .trim()
        .parse::<usize>()
        .map_err(|_| VrpParseError::InvalidNumber {
            element: format!("{element}/@{attribute}"),
            value,
        })
}

fn parse_number(element: &str, text: &str) -> Result<f64, VrpParseError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| VrpParseError::InvalidNumber {
            element: element.to_owned(),
            value: text.to_owned(),
        })
}

fn node_index(id: usize, num_nodes: usize) -> Result<usize, VrpParseError> {
    if id == 0 || id > num_nodes {
        return Err(VrpParseError::UnknownNode(id));
    }
    Ok(id - 1)
}

fn attribute_value(event: &BytesStart, key: &str) -> Result<Option<String>, VrpParseError> {
    for attr in event.attributes().with_checks(false) {
        let attr = attr?;
        if let Ok(name) = std::str::from_utf8(attr.key.local_name().as_ref()) {
            if name.eq_ignore_ascii_case(key) {
                return Ok(Some(attr.unescape_value()?.into_owned()));
            }
        }
    }
    Ok(None)
}

fn local_name_as_str<'a>(name: &'a LocalName<'a>) -> &'a str {
    std::str::from_utf8(name.as_ref()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TYPE_A: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<instance>
  <network>
    <nodes>
      <node id="1" type="0"><cx>0.0</cx><cy>0.0</cy></node>
      <node id="2" type="1"><cx>3.0</cx><cy>4.0</cy></node>
      <node id="3" type="1"><cx>0.0</cx><cy>4.0</cy></node>
    </nodes>
  </network>
  <fleet>
    <vehicle_profile type="0">
      <departure_node>1</departure_node>
      <arrival_node>1</arrival_node>
      <capacity>10.0</capacity>
      <number>2</number>
    </vehicle_profile>
  </fleet>
  <requests>
    <request id="1" node="2"><quantity>4.0</quantity></request>
    <request id="2" node="3"><quantity>5.0</quantity></request>
  </requests>
</instance>"#;

    const TYPE_C: &str = r#"<instance>
  <network>
    <nodes>
      <node id="1" type="0"/>
      <node id="2" type="1"/>
      <node id="3" type="1"/>
    </nodes>
    <links symmetric="true">
      <link head="1" tail="2"><length>7</length></link>
      <link head="1" tail="3"><length>9</length></link>
      <link head="2" tail="3"><length>2</length></link>
    </links>
  </network>
  <fleet>
    <vehicle_profile type="0"><capacity>6</capacity><number>1</number></vehicle_profile>
  </fleet>
  <requests>
    <request id="1" node="2"><quantity>3</quantity></request>
    <request id="2" node="3"><quantity>3</quantity></request>
  </requests>
</instance>"#;

    #[test]
    fn coordinates_are_read_from_type_a() {
        let instance = parse_vrp_rep(TYPE_A.as_bytes(), VrpFormat::A).expect("valid instance");

        assert_eq!(instance.num_nodes(), 3);
        assert_eq!(instance.vehicles(), 2);
        assert_eq!(instance.capacity(), 10.0);
        assert_eq!(instance.demand(0), 0.0);
        assert_eq!(instance.demand(2), 5.0);
        assert_eq!(instance.cost(0, 1), 5.0);
        assert_eq!(instance.cost(2, 1), 3.0);
    }

    #[test]
    fn links_are_read_from_type_c() {
        let instance = parse_vrp_rep(TYPE_C.as_bytes(), VrpFormat::C).expect("valid instance");

        assert_eq!(instance.num_nodes(), 3);
        assert_eq!(instance.cost(0, 2), 9.0);
        assert_eq!(instance.cost(2, 0), 9.0);
        assert_eq!(instance.cost(1, 2), 2.0);
        assert_eq!(instance.demand(1), 3.0);
    }

    #[test]
    fn type_c_nodes_have_no_coordinates() {
        let result = parse_vrp_rep(TYPE_C.as_bytes(), VrpFormat::A);

        assert!(matches!(result, Err(VrpParseError::MissingElement("cx"))));
    }

    #[test]
    fn requests_for_unknown_nodes_are_rejected() {
        let source = TYPE_C.replace(r#"node="3""#, r#"node="7""#);

        let result = parse_vrp_rep(source.as_bytes(), VrpFormat::C);

        assert!(matches!(result, Err(VrpParseError::UnknownNode(7))));
    }
}
