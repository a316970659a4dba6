// src/process/mod.rs
//! Markup helpers shared by the three extractors.

use once_cell::sync::Lazy;
use scraper::{node::Node, ElementRef, Html, Selector};

pub mod box_score;
pub mod headers;
pub mod results;
pub mod sanitize;
pub mod season;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static CSS selector should parse")
}

pub(crate) static SPAN: Lazy<Selector> = Lazy::new(|| selector("span"));
pub(crate) static TABLE: Lazy<Selector> = Lazy::new(|| selector("table"));
pub(crate) static TFOOT: Lazy<Selector> = Lazy::new(|| selector("tfoot"));
pub(crate) static TR: Lazy<Selector> = Lazy::new(|| selector("tr"));
pub(crate) static TH: Lazy<Selector> = Lazy::new(|| selector("th"));
pub(crate) static TD: Lazy<Selector> = Lazy::new(|| selector("td"));

/// The text of an element whose only content is a single string, descending
/// through single-child wrappers (`<td><a>Name</a></td>` gives `Name`).
/// Elements that are empty or have mixed content give `None`.
pub fn own_string(el: ElementRef<'_>) -> Option<String> {
    let mut node = *el;
    loop {
        let mut children = node.children();
        let only = children.next()?;
        if children.next().is_some() {
            return None;
        }
        match only.value() {
            Node::Text(text) => return Some(String::from(&**text)),
            Node::Element(_) => node = only,
            _ => return None,
        }
    }
}

/// `own_string` of every `<td>` in a row.
pub fn data_cells(row: ElementRef<'_>) -> Vec<Option<String>> {
    row.select(&TD).map(own_string).collect()
}

/// Rows of a table section that carry at least one `<td>`.
pub fn data_rows<'a>(section: ElementRef<'a>) -> impl Iterator<Item = Vec<Option<String>>> + 'a {
    section
        .select(&TR)
        .map(data_cells)
        .filter(|cells| !cells.is_empty())
}

/// A `<table>` with both a `<thead>` and a `<tbody>`.
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    pub head: ElementRef<'a>,
    pub body: ElementRef<'a>,
}

/// Head/body pairs in document order. Pairing happens per table, so a layout
/// table without a head cannot shift the pairing of the ones after it.
pub fn sections(doc: &Html) -> Vec<Section<'_>> {
    doc.select(&TABLE)
        .filter_map(|table| {
            let mut head = None;
            let mut body = None;
            for child in table.children().filter_map(ElementRef::wrap) {
                match child.value().name() {
                    "thead" if head.is_none() => head = Some(child),
                    "tbody" if body.is_none() => body = Some(child),
                    _ => {}
                }
            }
            Some(Section {
                head: head?,
                body: body?,
            })
        })
        .collect()
}
