//! Minimal plist tree: the five node kinds an MDM file uses, plus the
//! XML reader and writer for them.
//!
//! Anything outside `dict`, `array`, `string`, `integer`, `true` and `false`
//! is not representable. The reader reports such nodes as warnings and drops
//! them instead of failing.

use crate::ImportError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

const INDENT: &str = "  ";

/// A plist value node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlistValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Array(Vec<PlistValue>),
    Dict(PlistDict),
}

impl PlistValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            PlistValue::String(_) => "string",
            PlistValue::Integer(_) => "integer",
            PlistValue::Boolean(_) => "boolean",
            PlistValue::Array(_) => "array",
            PlistValue::Dict(_) => "dict",
        }
    }

    /// Coerce a scalar to text. Arrays and dicts have no text form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            PlistValue::String(s) => Some(s.clone()),
            PlistValue::Integer(n) => Some(n.to_string()),
            PlistValue::Boolean(b) => Some(b.to_string()),
            PlistValue::Array(_) | PlistValue::Dict(_) => None,
        }
    }

    /// Coerce a scalar to an integer. Booleans count as 1 and 0, strings are
    /// parsed as base-10.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PlistValue::Integer(n) => Some(*n),
            PlistValue::String(s) => parse_integer(s),
            PlistValue::Boolean(b) => Some(i64::from(*b)),
            PlistValue::Array(_) | PlistValue::Dict(_) => None,
        }
    }

    /// Truthiness of a value: zero and the empty string are false, containers
    /// are always true.
    pub fn as_bool(&self) -> bool {
        match self {
            PlistValue::Boolean(b) => *b,
            PlistValue::Integer(n) => *n != 0,
            PlistValue::String(s) => !s.is_empty(),
            PlistValue::Array(_) | PlistValue::Dict(_) => true,
        }
    }

    pub fn as_array(&self) -> Option<&[PlistValue]> {
        match self {
            PlistValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&PlistDict> {
        match self {
            PlistValue::Dict(dict) => Some(dict),
            _ => None,
        }
    }
}

/// Ordered key/value map backing a `<dict>`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlistDict {
    entries: Vec<(String, PlistValue)>,
}

impl PlistDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. A repeated key keeps its original position and takes
    /// the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: PlistValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PlistValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PlistValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Escape the five XML metacharacters
pub fn escape_text(value: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(value)
}

/// Base-10 integer literal, surrounding whitespace allowed
pub fn parse_integer(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

// ==================== Writing ====================

/// Render a root dict as a complete plist document
pub fn render_document(root: &PlistDict) -> String {
    let mut lines = vec![
        XML_DECLARATION.to_string(),
        r#"<plist version="1.0">"#.to_string(),
    ];
    write_dict(&mut lines, root, 0);
    lines.push("</plist>".to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn write_dict(lines: &mut Vec<String>, dict: &PlistDict, depth: usize) {
    let pad = INDENT.repeat(depth);
    if dict.is_empty() {
        lines.push(format!("{}<dict/>", pad));
        return;
    }

    lines.push(format!("{}<dict>", pad));
    for (key, value) in dict.iter() {
        lines.push(format!("{}{}<key>{}</key>", pad, INDENT, escape_text(key)));
        write_value(lines, value, depth + 1);
    }
    lines.push(format!("{}</dict>", pad));
}

fn write_value(lines: &mut Vec<String>, value: &PlistValue, depth: usize) {
    let pad = INDENT.repeat(depth);
    match value {
        PlistValue::String(s) => lines.push(format!("{}<string>{}</string>", pad, escape_text(s))),
        PlistValue::Integer(n) => lines.push(format!("{}<integer>{}</integer>", pad, n)),
        PlistValue::Boolean(true) => lines.push(format!("{}<true/>", pad)),
        PlistValue::Boolean(false) => lines.push(format!("{}<false/>", pad)),
        PlistValue::Array(items) if items.is_empty() => lines.push(format!("{}<array/>", pad)),
        PlistValue::Array(items) => {
            lines.push(format!("{}<array>", pad));
            for item in items {
                write_value(lines, item, depth + 1);
            }
            lines.push(format!("{}</array>", pad));
        }
        PlistValue::Dict(dict) => write_dict(lines, dict, depth),
    }
}

// ==================== Reading ====================

/// Generic XML element, just enough structure to walk a plist
#[derive(Debug, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn new(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            ..Self::default()
        }
    }

    /// First element with the given name in document order, self included
    fn find(&self, name: &str) -> Option<&Element> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    fn find_descendant(&self, name: &str) -> Option<&Element> {
        self.children.iter().find_map(|child| child.find(name))
    }
}

fn malformed(msg: impl std::fmt::Display) -> ImportError {
    ImportError::MalformedXml(msg.to_string())
}

/// Parse XML text into its single root element
fn read_element_tree(xml: &str) -> Result<Element, ImportError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut roots: Vec<Element> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            malformed(format!("{} at position {}", e, reader.buffer_position()))
        })?;

        match event {
            Event::Start(e) => stack.push(Element::new(e.name().as_ref())),
            Event::Empty(e) => {
                let element = Element::new(e.name().as_ref());
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => roots.push(element),
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| malformed("unexpected closing tag"))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => roots.push(element),
                }
            }
            Event::Text(e) => {
                let raw = e.decode().map_err(malformed)?;
                let text = quick_xml::escape::unescape(&raw).map_err(malformed)?;
                append_text(&mut stack, &text)?;
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                append_text(&mut stack, &text)?;
            }
            Event::GeneralRef(e) => {
                let resolved = match e.resolve_char_ref().map_err(malformed)? {
                    Some(ch) => ch.to_string(),
                    None => {
                        let name = e.decode().map_err(malformed)?;
                        quick_xml::escape::resolve_predefined_entity(&name)
                            .ok_or_else(|| malformed(format!("unknown entity '&{};'", name)))?
                            .to_string()
                    }
                };
                append_text(&mut stack, &resolved)?;
            }
            Event::Eof => break,
            // Declarations, doctypes, comments and processing instructions carry no data
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(malformed(format!(
            "unexpected end of document, <{}> is not closed",
            open.name
        )));
    }

    let mut roots = roots.into_iter();
    let root = roots
        .next()
        .ok_or_else(|| malformed("document has no root element"))?;
    if roots.next().is_some() {
        return Err(malformed("document has more than one root element"));
    }
    Ok(root)
}

fn append_text(stack: &mut [Element], text: &str) -> Result<(), ImportError> {
    match stack.last_mut() {
        Some(current) => {
            current.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(malformed("text outside of the root element")),
    }
}

/// Read a plist document and return its top-level dict.
///
/// Fails only when the XML is not well-formed or the plist/dict skeleton is
/// missing. Value nodes that cannot be represented are skipped, with a note
/// pushed to `warnings`.
pub fn read_document(xml: &str, warnings: &mut Vec<String>) -> Result<PlistDict, ImportError> {
    let root = read_element_tree(xml)?;
    let plist = root.find("plist").ok_or(ImportError::MissingPlist)?;
    let dict = plist
        .find_descendant("dict")
        .ok_or(ImportError::MissingRootDict)?;
    Ok(decode_dict(dict, warnings))
}

/// Children of a dict alternate `<key>` and value. Pairs whose first element
/// is not a key, and a trailing key without value, are ignored.
fn decode_dict(element: &Element, warnings: &mut Vec<String>) -> PlistDict {
    let mut dict = PlistDict::new();
    for pair in element.children.chunks(2) {
        let [key, value] = pair else {
            continue;
        };
        if key.name != "key" {
            continue;
        }
        if let Some(decoded) = decode_value(value, Some(&key.text), warnings) {
            dict.insert(key.text.clone(), decoded);
        }
    }
    dict
}

fn decode_value(
    element: &Element,
    key: Option<&str>,
    warnings: &mut Vec<String>,
) -> Option<PlistValue> {
    let location = || match key {
        Some(key) => format!("for '{}'", key),
        None => "in array".to_string(),
    };

    match element.name.as_str() {
        "string" => Some(PlistValue::String(element.text.clone())),
        "integer" => match parse_integer(&element.text) {
            Some(n) => Some(PlistValue::Integer(n)),
            None => {
                warnings.push(format!(
                    "Invalid integer value {}: '{}' was skipped",
                    location(),
                    element.text.trim()
                ));
                None
            }
        },
        "true" => Some(PlistValue::Boolean(true)),
        "false" => Some(PlistValue::Boolean(false)),
        "array" => Some(PlistValue::Array(
            element
                .children
                .iter()
                .filter_map(|child| decode_value(child, None, warnings))
                .collect(),
        )),
        "dict" => Some(PlistValue::Dict(decode_dict(element, warnings))),
        other => {
            warnings.push(format!(
                "Unsupported value type <{}> {} was skipped",
                other,
                location()
            ));
            None
        }
    }
}
