//! Keyed language files: a root element wrapping a flat list of
//! `<Key>text</Key>` entries.
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <LanguageData>
//! 	<Greeting>Hello</Greeting>
//! 	<Farewell/>
//! </LanguageData>
//! ```

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Minimal valid document used to seed a new target file.
pub const BOILERPLATE: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<LanguageData></LanguageData>";

#[derive(Debug, Error)]
pub enum KeyedError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("document has no root element")]
    MissingRoot,

    #[error("unexpected text directly under <{root}>")]
    StrayText { root: String },

    #[error("entry <{key}> contains nested element <{child}>")]
    NestedElement { key: String, child: String },

    #[error("root element <{root}> is never closed")]
    Unclosed { root: String },

    #[error("content outside the root element")]
    OutsideRoot,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One translatable string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    /// `None` when the element has no text content at all.
    pub text: Option<String>,
}

impl Entry {
    pub fn new(key: impl Into<String>, text: Option<&str>) -> Self {
        Self {
            key: key.into(),
            text: text.map(str::to_string),
        }
    }
}

/// All entries of one keyed file, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTree {
    pub root: String,
    pub attributes: Vec<(String, String)>,
    pub entries: Vec<Entry>,
}

impl Default for LanguageTree {
    fn default() -> Self {
        Self {
            root: "LanguageData".to_string(),
            attributes: Vec::new(),
            entries: Vec::new(),
        }
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn is_blank(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

fn stray_content(tree: Option<&LanguageTree>, closed: bool) -> KeyedError {
    match tree {
        Some(t) if !closed => KeyedError::StrayText {
            root: t.root.clone(),
        },
        _ => KeyedError::OutsideRoot,
    }
}

impl LanguageTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(xml: &str) -> Result<Self, KeyedError> {
        let mut reader = Reader::from_str(xml);

        let mut tree: Option<LanguageTree> = None;
        let mut closed = false;
        // Entry currently open: key plus any text seen so far.
        let mut open: Option<(String, Option<String>)> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    if closed {
                        return Err(KeyedError::OutsideRoot);
                    }
                    if let Some((key, _)) = &open {
                        return Err(KeyedError::NestedElement {
                            key: key.clone(),
                            child: element_name(&e),
                        });
                    }
                    if tree.is_none() {
                        tree = Some(Self::from_root(&e)?);
                    } else {
                        open = Some((element_name(&e), None));
                    }
                }
                Event::Empty(e) => {
                    if closed {
                        return Err(KeyedError::OutsideRoot);
                    }
                    if let Some((key, _)) = &open {
                        return Err(KeyedError::NestedElement {
                            key: key.clone(),
                            child: element_name(&e),
                        });
                    }
                    if let Some(t) = tree.as_mut() {
                        t.entries.push(Entry {
                            key: element_name(&e),
                            text: None,
                        });
                    } else {
                        tree = Some(Self::from_root(&e)?);
                        closed = true;
                    }
                }
                Event::Text(e) => {
                    let text = e.unescape().map_err(quick_xml::Error::from)?;
                    if let Some((_, buf)) = open.as_mut() {
                        buf.get_or_insert_with(String::new).push_str(&text);
                    } else if !is_blank(&text) {
                        return Err(stray_content(tree.as_ref(), closed));
                    }
                }
                Event::CData(e) => {
                    let raw = e.into_inner();
                    if let Some((_, buf)) = open.as_mut() {
                        buf.get_or_insert_with(String::new)
                            .push_str(&String::from_utf8_lossy(&raw));
                    } else {
                        return Err(stray_content(tree.as_ref(), closed));
                    }
                }
                Event::End(_) => match open.take() {
                    Some((key, text)) => {
                        if let Some(t) = tree.as_mut() {
                            t.entries.push(Entry { key, text });
                        }
                    }
                    None => closed = true,
                },
                Event::Eof => break,
                // Declaration, comments, processing instructions, doctype.
                _ => {}
            }
        }

        match tree {
            Some(tree) if closed => Ok(tree),
            Some(tree) => Err(KeyedError::Unclosed { root: tree.root }),
            None => Err(KeyedError::MissingRoot),
        }
    }

    fn from_root(e: &BytesStart<'_>) -> Result<Self, KeyedError> {
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(quick_xml::Error::from)?;
            attributes.push((key, value.into_owned()));
        }
        Ok(Self {
            root: element_name(e),
            attributes,
            entries: Vec::new(),
        })
    }

    /// Serialize with an XML declaration, one tab-indented entry per line.
    pub fn to_xml(&self) -> Result<String, KeyedError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);

        write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let root = BytesStart::new(self.root.as_str()).with_attributes(
            self.attributes
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );
        write(&mut writer, Event::Start(root))?;

        for entry in &self.entries {
            let key = entry.key.as_str();
            match &entry.text {
                Some(text) => {
                    write(&mut writer, Event::Start(BytesStart::new(key)))?;
                    // Quotes stay literal in text content; only `&`, `<` and `>` are escaped.
                    let escaped = partial_escape(text.as_str());
                    write(&mut writer, Event::Text(BytesText::from_escaped(escaped)))?;
                    write(&mut writer, Event::End(BytesEnd::new(key)))?;
                }
                None => write(&mut writer, Event::Empty(BytesStart::new(key)))?,
            }
        }

        write(&mut writer, Event::End(BytesEnd::new(self.root.as_str())))?;

        let mut xml = String::from_utf8_lossy(&writer.into_inner()).into_owned();
        xml.push('\n');
        Ok(xml)
    }

    pub async fn load(path: &Path) -> Result<Self, KeyedError> {
        let xml = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| KeyedError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Self::parse(&xml)
    }

    /// Rewrite the whole file at `path`.
    pub async fn save(&self, path: &Path) -> Result<(), KeyedError> {
        let xml = self.to_xml()?;
        tokio::fs::write(path, xml)
            .await
            .map_err(|source| KeyedError::Io {
                path: path.display().to_string(),
                source,
            })
    }

    /// First entry with the given key.
    pub fn find(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn keys(&self) -> HashSet<&str> {
        self.entries.iter().map(|e| e.key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), KeyedError> {
    writer
        .write_event(event)
        .map_err(quick_xml::Error::from)
        .map_err(KeyedError::from)
}
