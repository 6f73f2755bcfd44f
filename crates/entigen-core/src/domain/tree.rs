//! Merge-aware document tree.
//!
//! [`Element`] wraps a hierarchical descriptor (web descriptor, runtime
//! server descriptor, build descriptor) as a mutable tree and exposes the
//! find-or-create primitives every descriptor emitter writes through.
//!
//! # Idempotency contract
//!
//! Invoking the same logical "ensure node with key K under parent P"
//! operation any number of times in sequence yields exactly one such node.
//! [`Element::find_or_create`] upholds this for every [`Identity`] shape;
//! [`Element::create_child`] is the deliberate, unconditional escape hatch.
//!
//! Persistence is explicit: callers save through the `DescriptorStore` port,
//! never implicitly.

use std::fmt;

/// The caller-supplied rule deciding whether a child node already exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Tag name alone.
    ByName,
    /// Tag name plus one attribute value (e.g. a pool name or resource
    /// binding name).
    ByAttribute { name: String, value: String },
    /// Composite coordinate: `groupId` + `artifactId` child text, used for
    /// dependency and plugin entries in the build descriptor.
    ByCoordinate { group: String, artifact: String },
}

impl Identity {
    pub fn by_attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::ByAttribute {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn by_coordinate(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self::ByCoordinate {
            group: group.into(),
            artifact: artifact.into(),
        }
    }

    /// Whether `candidate` satisfies this identity. Tag-name equality is
    /// checked by the caller; this only checks the discriminating part.
    fn matches(&self, candidate: &Element) -> bool {
        match self {
            Self::ByName => true,
            Self::ByAttribute { name, value } => candidate.attr(name) == Some(value.as_str()),
            Self::ByCoordinate { group, artifact } => {
                candidate.child_text("groupId") == Some(group.as_str())
                    && candidate.child_text("artifactId") == Some(artifact.as_str())
            }
        }
    }
}

/// One node of a structured descriptor tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    /// Attributes in insertion order (printing preserves it).
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    // ── attributes ───────────────────────────────────────────────────────────

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value for the same key.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            self.attributes.push((name, value));
        }
        self
    }

    // ── children ─────────────────────────────────────────────────────────────

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text content of the first child with the given tag name.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(|c| c.text.as_deref())
    }

    /// Unconditionally append a child and return it.
    pub fn create_child(&mut self, name: impl Into<String>) -> &mut Element {
        let idx = self.children.len();
        self.children.push(Element::new(name));
        &mut self.children[idx]
    }

    /// Unconditionally append a child with text content.
    pub fn create_child_with_text(
        &mut self,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> &mut Element {
        let child = self.create_child(name);
        child.text = Some(text.into());
        child
    }

    /// Return the first existing child matching `identity` under the given
    /// tag name, else create, append, and return a new one.
    ///
    /// For `ByAttribute` the discriminating attribute is set on a freshly
    /// created child so the subsequent invocation finds it again; for
    /// `ByCoordinate` the `groupId`/`artifactId` children are created.
    pub fn find_or_create(&mut self, name: &str, identity: &Identity) -> &mut Element {
        if let Some(idx) = self
            .children
            .iter()
            .position(|c| c.name == name && identity.matches(c))
        {
            return &mut self.children[idx];
        }

        let child = self.create_child(name);
        match identity {
            Identity::ByName => {}
            Identity::ByAttribute { name, value } => {
                child.set_attr(name.clone(), value.clone());
            }
            Identity::ByCoordinate { group, artifact } => {
                child.create_child_with_text("groupId", group.clone());
                child.create_child_with_text("artifactId", artifact.clone());
            }
        }
        child
    }

    /// Ensure a child with the given tag name exists and carries exactly
    /// `text`. Existing text is overwritten; the node is never duplicated.
    pub fn ensure_child_text(&mut self, name: &str, text: impl Into<String>) -> &mut Element {
        let child = self.find_or_create(name, &Identity::ByName);
        child.text = Some(text.into());
        child
    }

    /// Descend a tag-name path from this element, returning every element
    /// reachable through it.
    pub fn locate(&self, path: &[&str]) -> Vec<&Element> {
        let mut current = vec![self];
        for segment in path {
            // Filter inline: the borrows must be tied to `self`, not to the
            // segment strings.
            current = current
                .into_iter()
                .flat_map(|el| el.children.iter().filter(|c| c.name == *segment))
                .collect();
        }
        current
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.name)
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_or_create_by_name_is_idempotent() {
        let mut root = Element::new("web-app");
        root.find_or_create("data-source", &Identity::ByName);
        root.find_or_create("data-source", &Identity::ByName);
        assert_eq!(root.children_named("data-source").count(), 1);
    }

    #[test]
    fn find_or_create_by_attribute_is_idempotent() {
        let mut root = Element::new("resources");
        let key = Identity::by_attribute("name", "shopPool");
        root.find_or_create("jdbc-connection-pool", &key);
        root.find_or_create("jdbc-connection-pool", &key);
        assert_eq!(root.children_named("jdbc-connection-pool").count(), 1);
        assert_eq!(
            root.child("jdbc-connection-pool").unwrap().attr("name"),
            Some("shopPool")
        );
    }

    #[test]
    fn by_attribute_distinguishes_values() {
        let mut root = Element::new("resources");
        root.find_or_create("pool", &Identity::by_attribute("name", "a"));
        root.find_or_create("pool", &Identity::by_attribute("name", "b"));
        assert_eq!(root.children_named("pool").count(), 2);
    }

    #[test]
    fn find_or_create_by_coordinate_is_idempotent() {
        let mut deps = Element::new("dependencies");
        let key = Identity::by_coordinate("org.postgresql", "postgresql");
        {
            let dep = deps.find_or_create("dependency", &key);
            dep.ensure_child_text("version", "42.7.3");
        }
        deps.find_or_create("dependency", &key);
        assert_eq!(deps.children_named("dependency").count(), 1);
        let dep = deps.child("dependency").unwrap();
        assert_eq!(dep.child_text("groupId"), Some("org.postgresql"));
        assert_eq!(dep.child_text("version"), Some("42.7.3"));
    }

    #[test]
    fn by_coordinate_distinguishes_artifacts() {
        let mut deps = Element::new("dependencies");
        deps.find_or_create("dependency", &Identity::by_coordinate("g", "a"));
        deps.find_or_create("dependency", &Identity::by_coordinate("g", "b"));
        assert_eq!(deps.children_named("dependency").count(), 2);
    }

    #[test]
    fn create_child_is_unconditional() {
        let mut root = Element::new("configuration");
        root.create_child("item");
        root.create_child("item");
        assert_eq!(root.children_named("item").count(), 2);
    }

    #[test]
    fn ensure_child_text_overwrites_without_duplicating() {
        let mut el = Element::new("data-source");
        el.ensure_child_text("url", "jdbc:h2:mem:one");
        el.ensure_child_text("url", "jdbc:h2:mem:two");
        assert_eq!(el.children_named("url").count(), 1);
        assert_eq!(el.child_text("url"), Some("jdbc:h2:mem:two"));
    }

    #[test]
    fn locate_descends_paths() {
        let mut root = Element::new("project");
        root.create_child("build")
            .create_child("plugins")
            .create_child("plugin")
            .create_child_with_text("artifactId", "maven-war-plugin");
        let found = root.locate(&["build", "plugins", "plugin"]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].child_text("artifactId"), Some("maven-war-plugin"));
        assert!(root.locate(&["build", "nothing"]).is_empty());
    }

    #[test]
    fn locate_segments_may_outlive_their_source() {
        let mut root = Element::new("project");
        root.create_child("build").create_child("plugins");
        let segments: Vec<String> = vec!["build".into(), "plugins".into()];
        let refs: Vec<&str> = segments.iter().map(String::as_str).collect();
        let found = root.locate(&refs);
        drop(refs);
        drop(segments);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn set_attr_replaces_existing() {
        let mut el = Element::new("httpEndpoint");
        el.set_attr("httpPort", "9080");
        el.set_attr("httpPort", "9081");
        assert_eq!(el.attributes.len(), 1);
        assert_eq!(el.attr("httpPort"), Some("9081"));
    }
}
