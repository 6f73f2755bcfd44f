//! XML persistence for descriptor trees.
//!
//! Descriptors are loaded into the core's `Element` tree, mutated there,
//! and written back with a fixed two-space indentation. Hand-edited
//! content survives a reload as long as it stays well-formed; mixed
//! content (text interleaved with child elements) is not supported, which
//! is fine for deployment descriptors.

use std::path::Path;
use std::sync::Arc;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::debug;

use entigen_core::application::ApplicationError;
use entigen_core::application::ports::{DescriptorStore, Filesystem};
use entigen_core::domain::Element;
use entigen_core::error::{EntigenError, EntigenResult};

/// Descriptor store backed by a filesystem port, so tests can run it
/// against the in-memory adapter.
pub struct XmlDescriptorStore {
    fs: Arc<dyn Filesystem>,
}

impl XmlDescriptorStore {
    pub fn new(fs: Arc<dyn Filesystem>) -> Self {
        Self { fs }
    }
}

impl DescriptorStore for XmlDescriptorStore {
    fn load(&self, path: &Path) -> EntigenResult<Option<Element>> {
        if !self.fs.exists(path) {
            return Ok(None);
        }
        let raw = self.fs.read_file(path)?;
        let root = parse(&raw).map_err(|reason| descriptor_error(path, reason))?;
        debug!(path = %path.display(), "descriptor loaded");
        Ok(Some(root))
    }

    fn save(&self, path: &Path, root: &Element) -> EntigenResult<()> {
        let rendered = render(root).map_err(|reason| descriptor_error(path, reason))?;
        self.fs.write_file(path, &rendered)?;
        debug!(path = %path.display(), "descriptor saved");
        Ok(())
    }
}

fn descriptor_error(path: &Path, reason: String) -> EntigenError {
    ApplicationError::DescriptorError {
        path: path.to_path_buf(),
        reason,
    }
    .into()
}

/// Parse an XML document into an element tree.
pub fn parse(raw: &str) -> Result<Element, String> {
    let mut reader = Reader::from_str(raw);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(start) => {
                stack.push(element_from(&start)?);
            }
            Event::Empty(start) => {
                let element = element_from(&start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => return Ok(element),
                }
            }
            Event::End(_) => {
                let element = match stack.pop() {
                    Some(element) => element,
                    None => return Err("unbalanced closing tag".into()),
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => return Ok(element),
                }
            }
            Event::Text(text) => {
                let value = text.xml_content().map_err(|e| e.to_string())?;
                if let Some(top) = stack.last_mut() {
                    top.text = Some(value.into_owned());
                }
            }
            Event::Eof => return Err("document has no root element".into()),
            // Declarations, comments, processing instructions and CDATA
            // carry no descriptor content.
            _ => {}
        }
    }
}

fn element_from(start: &BytesStart<'_>) -> Result<Element, String> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = Element::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value().map_err(|e| e.to_string())?;
        element.set_attr(key, value.into_owned());
    }
    Ok(element)
}

/// Print an element tree as an XML document with two-space indentation.
pub fn render(root: &Element) -> Result<String, String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| e.to_string())?;
    write_element(&mut writer, root)?;
    let mut out = String::from_utf8(writer.into_inner()).map_err(|e| e.to_string())?;
    out.push('\n');
    Ok(out)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), String> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    let empty = element.text.is_none() && element.children.is_empty();
    if empty {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| e.to_string());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| e.to_string())?;
    if let Some(text) = &element.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(|e| e.to_string())?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::filesystem::MemoryFilesystem;
    use entigen_core::domain::Identity;

    fn store() -> (XmlDescriptorStore, MemoryFilesystem) {
        let fs = MemoryFilesystem::new();
        (XmlDescriptorStore::new(Arc::new(fs.clone())), fs)
    }

    #[test]
    fn missing_descriptor_loads_as_none() {
        let (store, _) = store();
        assert!(store.load(Path::new("/app/web.xml")).unwrap().is_none());
    }

    #[test]
    fn parses_attributes_text_and_nesting() {
        let root = parse(
            r#"<?xml version="1.0"?>
            <web-app version="6.0">
                <data-source>
                    <name>java:app/jdbc/shop</name>
                </data-source>
            </web-app>"#,
        )
        .unwrap();

        assert_eq!(root.name, "web-app");
        assert_eq!(root.attr("version"), Some("6.0"));
        let ds = root.child("data-source").unwrap();
        assert_eq!(ds.child_text("name"), Some("java:app/jdbc/shop"));
    }

    #[test]
    fn parse_unescapes_text_content() {
        let root = parse("<pool><url>jdbc:h2:mem:a &amp; b</url></pool>").unwrap();
        assert_eq!(root.child_text("url"), Some("jdbc:h2:mem:a & b"));
    }

    #[test]
    fn parse_rejects_truncated_documents() {
        assert!(parse("<project><dependencies>").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn save_then_load_round_trips_the_tree() {
        let (store, _) = store();
        let path = PathBuf::from("/app/pom.xml");

        let mut project = Element::new("project");
        project.ensure_child_text("modelVersion", "4.0.0");
        let deps = project.find_or_create("dependencies", &Identity::ByName);
        let dep = deps.find_or_create(
            "dependency",
            &Identity::by_coordinate("com.h2database", "h2"),
        );
        dep.ensure_child_text("version", "2.3.232");

        store.save(&path, &project).unwrap();
        let reloaded = store.load(&path).unwrap().unwrap();
        assert_eq!(reloaded, project);
    }

    #[test]
    fn rendered_document_keeps_child_order_and_escapes_text() {
        let mut root = Element::new("resources");
        root.create_child_with_text("first", "a & b");
        root.create_child("second");
        let text = render(&root).unwrap();

        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(text.contains("<first>a &amp; b</first>"));
        assert!(text.find("first").unwrap() < text.find("second").unwrap());
        assert!(text.contains("<second/>"));
    }

    #[test]
    fn empty_root_renders_self_closed() {
        let text = render(&Element::new("server")).unwrap();
        assert!(text.contains("<server/>"));
    }
}
