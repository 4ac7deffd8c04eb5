//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use serde::Serialize;
use xml::reader::{EventReader, ParserConfig, XmlEvent};

// Minimal owned XML element tree, used to inspect NETCONF messages.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[derive(Serialize)]
pub struct Element {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

// ===== impl Element =====

impl Element {
    // Parses a document and returns its root element.
    pub fn parse(input: &str) -> Result<Element, String> {
        let config = ParserConfig::new()
            .trim_whitespace(true)
            .cdata_to_characters(true);
        let reader = EventReader::new_with_config(input.as_bytes(), config);

        let mut stack: Vec<Element> = vec![];
        let mut root = None;
        for event in reader {
            match event.map_err(|error| error.to_string())? {
                XmlEvent::StartElement {
                    name, attributes, ..
                } => {
                    if root.is_some() {
                        return Err("content after the root element".into());
                    }
                    stack.push(Element {
                        name: name.local_name,
                        namespace: name.namespace,
                        attributes: attributes
                            .into_iter()
                            .map(|attr| (attr.name.local_name, attr.value))
                            .collect(),
                        ..Default::default()
                    });
                }
                XmlEvent::EndElement { .. } => {
                    let element =
                        stack.pop().ok_or("unbalanced end element")?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => root = Some(element),
                    }
                }
                XmlEvent::Characters(text) => {
                    if let Some(element) = stack.last_mut() {
                        element.text.push_str(&text);
                    }
                }
                _ => (),
            }
        }

        root.ok_or_else(|| "no root element".to_owned())
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn text(&self) -> &str {
        self.text.trim()
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(Element::text)
    }
}
