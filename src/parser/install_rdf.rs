//! Version lookup in `install.rdf`
//!
//! Legacy extensions declare their version as `<em:version>` in the
//! `http://www.mozilla.org/2004/em-rdf#` namespace. Lookup is two-tiered:
//! the first namespaced `version` element wins if it carries text, otherwise
//! the first element whose local name is `version` (any prefix, any
//! namespace) with non-empty text is used. Both tiers walk the document in
//! order. Unreadable or malformed files never error; they report why no
//! version was found.

use anyhow::{bail, Result};
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use std::fs;
use std::path::Path;

pub const EM_RDF_NS: &str = "http://www.mozilla.org/2004/em-rdf#";

const VERSION_TAG: &[u8] = b"version";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionLookup {
    Found(String),
    NotFound(NotFoundReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFoundReason {
    MissingFile,
    Unreadable(String),
    Malformed(String),
    NoVersionElement,
}

impl VersionLookup {
    pub fn into_option(self) -> Option<String> {
        match self {
            VersionLookup::Found(version) => Some(version),
            VersionLookup::NotFound(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, VersionLookup::Found(_))
    }
}

/// Read the version from a metadata file, `None` when there is none.
pub fn resolve_version(path: &Path) -> Option<String> {
    lookup_version(path).into_option()
}

/// Read the version from a metadata file.
pub fn lookup_version(path: &Path) -> VersionLookup {
    if !path.exists() {
        return VersionLookup::NotFound(NotFoundReason::MissingFile);
    }

    let content = match fs::read(path) {
        Ok(content) => content,
        Err(err) => return VersionLookup::NotFound(NotFoundReason::Unreadable(err.to_string())),
    };

    match std::str::from_utf8(&content) {
        Ok(xml) => lookup_version_in_str(xml),
        Err(err) => VersionLookup::NotFound(NotFoundReason::Malformed(format!(
            "invalid UTF-8: {}",
            err
        ))),
    }
}

/// Same as [`lookup_version`] for a document already in memory.
pub fn lookup_version_in_str(xml: &str) -> VersionLookup {
    match scan_version_elements(xml) {
        Ok(elements) => match select_version(&elements) {
            Some(version) => VersionLookup::Found(version),
            None => VersionLookup::NotFound(NotFoundReason::NoVersionElement),
        },
        Err(err) => VersionLookup::NotFound(NotFoundReason::Malformed(err.to_string())),
    }
}

/// A `version` element and the text preceding its first child.
#[derive(Debug)]
struct VersionElement {
    namespaced: bool,
    text: String,
}

/// Parse the whole document, collecting every `version` element in
/// document order. Any well-formedness problem fails the scan.
fn scan_version_elements(xml: &str) -> Result<Vec<VersionElement>> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = NsReader::from_str(xml);

    let mut found: Vec<VersionElement> = Vec::new();
    // One slot per open element: the index into `found` for a version element
    // still collecting text. Only text before the first child element counts.
    let mut open: Vec<Option<usize>> = Vec::new();
    let mut seen_root = false;

    loop {
        let (ns, event) = reader.read_resolved_event()?;

        match event {
            Event::Start(e) => {
                enter_element(&mut open, &mut seen_root)?;
                let slot = record_version(&mut found, &ns, e.local_name().as_ref())?;
                open.push(slot);
            }
            Event::Empty(e) => {
                enter_element(&mut open, &mut seen_root)?;
                record_version(&mut found, &ns, e.local_name().as_ref())?;
            }
            Event::End(_) => {
                if open.pop().is_none() {
                    bail!("closing tag without matching opening tag");
                }
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                match open.last() {
                    Some(Some(index)) => found[*index].text.push_str(&text),
                    Some(None) => {}
                    None if text.trim().is_empty() => {}
                    None => bail!("text outside of the document element"),
                }
            }
            Event::CData(e) => {
                let text = std::str::from_utf8(&e)?;
                match open.last() {
                    Some(Some(index)) => found[*index].text.push_str(text),
                    Some(None) => {}
                    None => bail!("CDATA outside of the document element"),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !open.is_empty() {
        bail!("unclosed element at end of document");
    }
    if !seen_root {
        bail!("no element found");
    }

    Ok(found)
}

fn enter_element(open: &mut [Option<usize>], seen_root: &mut bool) -> Result<()> {
    match open.last_mut() {
        Some(parent) => *parent = None,
        None if *seen_root => bail!("junk after document element"),
        None => *seen_root = true,
    }
    Ok(())
}

fn record_version(
    found: &mut Vec<VersionElement>,
    ns: &ResolveResult,
    local_name: &[u8],
) -> Result<Option<usize>> {
    let namespaced = match ns {
        ResolveResult::Bound(Namespace(uri)) => *uri == EM_RDF_NS.as_bytes(),
        ResolveResult::Unbound => false,
        ResolveResult::Unknown(prefix) => {
            bail!("unbound prefix '{}'", String::from_utf8_lossy(prefix))
        }
    };

    if local_name != VERSION_TAG {
        return Ok(None);
    }

    found.push(VersionElement {
        namespaced,
        text: String::new(),
    });
    Ok(Some(found.len() - 1))
}

fn select_version(elements: &[VersionElement]) -> Option<String> {
    if let Some(first) = elements.iter().find(|e| e.namespaced) {
        let text = first.text.trim();
        if !text.is_empty() {
            return Some(text.to_string());
        }
    }

    elements
        .iter()
        .map(|e| e.text.trim())
        .find(|text| !text.is_empty())
        .map(str::to_string)
}
