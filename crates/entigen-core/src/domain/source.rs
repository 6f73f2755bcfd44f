//! Structured generated-source builder.
//!
//! Emitters assemble a [`JavaSource`] instead of concatenating strings; the
//! printer is the single place that knows the textual policy (4-space
//! indentation, one blank line between members, imports deduplicated in
//! first-seen order). Tests assert on structure, the printer guarantees the
//! text.

use std::path::{Path, PathBuf};

/// One method of a generated class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpec {
    pub annotations: Vec<String>,
    /// Signature without the opening brace, e.g.
    /// `public Customer findByEmail(String email)`.
    pub signature: String,
    pub body: Vec<String>,
}

impl MethodSpec {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            annotations: Vec::new(),
            signature: signature.into(),
            body: Vec::new(),
        }
    }

    pub fn annotate(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.body.push(line.into());
        self
    }

    /// Render at the given member indentation depth.
    pub fn render(&self, depth: usize) -> String {
        let pad = "    ".repeat(depth);
        let inner = "    ".repeat(depth + 1);
        let mut out = String::new();
        for annotation in &self.annotations {
            out.push_str(&pad);
            out.push_str(annotation);
            out.push('\n');
        }
        out.push_str(&pad);
        out.push_str(&self.signature);
        out.push_str(" {\n");
        for line in &self.body {
            if line.is_empty() {
                out.push('\n');
            } else {
                out.push_str(&inner);
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push_str(&pad);
        out.push_str("}\n");
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Member {
    Field {
        annotations: Vec<String>,
        declaration: String,
    },
    Method(MethodSpec),
}

/// A generated class file under assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaSource {
    pub package: String,
    pub class_name: String,
    imports: Vec<String>,
    annotations: Vec<String>,
    /// Full declaration line, e.g. `public class Customer implements Serializable`.
    declaration: String,
    members: Vec<Member>,
}

impl JavaSource {
    /// Start a plain public class.
    pub fn class(package: impl Into<String>, class_name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        Self {
            package: package.into(),
            declaration: format!("public class {class_name}"),
            class_name,
            imports: Vec::new(),
            annotations: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Override the declaration line (extends/implements clauses).
    pub fn declaration(mut self, declaration: impl Into<String>) -> Self {
        self.declaration = declaration.into();
        self
    }

    /// Record an import; duplicates are dropped, first-seen order kept.
    pub fn import(&mut self, import: impl Into<String>) -> &mut Self {
        let import = import.into();
        if !self.imports.contains(&import) {
            self.imports.push(import);
        }
        self
    }

    pub fn annotate(&mut self, annotation: impl Into<String>) -> &mut Self {
        self.annotations.push(annotation.into());
        self
    }

    pub fn add_field(
        &mut self,
        annotations: Vec<String>,
        declaration: impl Into<String>,
    ) -> &mut Self {
        self.members.push(Member::Field {
            annotations,
            declaration: declaration.into(),
        });
        self
    }

    pub fn add_method(&mut self, method: MethodSpec) -> &mut Self {
        self.members.push(Member::Method(method));
        self
    }

    pub fn method_count(&self) -> usize {
        self.members
            .iter()
            .filter(|m| matches!(m, Member::Method(_)))
            .count()
    }

    /// File name for this class.
    pub fn file_name(&self) -> String {
        format!("{}.java", self.class_name)
    }

    /// Print the complete compilation unit.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("package {};\n\n", self.package));

        if !self.imports.is_empty() {
            for import in &self.imports {
                out.push_str(&format!("import {import};\n"));
            }
            out.push('\n');
        }

        for annotation in &self.annotations {
            out.push_str(annotation);
            out.push('\n');
        }
        out.push_str(&self.declaration);
        out.push_str(" {\n");

        let mut first = true;
        for member in &self.members {
            if !first {
                out.push('\n');
            }
            first = false;
            match member {
                Member::Field {
                    annotations,
                    declaration,
                } => {
                    for annotation in annotations {
                        out.push_str("    ");
                        out.push_str(annotation);
                        out.push('\n');
                    }
                    out.push_str("    ");
                    out.push_str(declaration);
                    out.push('\n');
                }
                Member::Method(method) => out.push_str(&method.render(1)),
            }
        }

        out.push_str("}\n");
        out
    }
}

/// Directory for a package under the source root, splitting the configured
/// package name on its separator.
pub fn package_dir(source_root: &Path, package: &str) -> PathBuf {
    let mut dir = source_root.to_path_buf();
    for segment in package.split('.') {
        dir.push(segment);
    }
    dir
}

/// Uppercase the first character, e.g. `users` → `Users`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_minimal_class() {
        let mut source = JavaSource::class("com.example", "Customer");
        source.annotate("@Entity");
        source.add_field(vec!["@Id".into()], "private Long id;");
        let text = source.render();
        assert!(text.starts_with("package com.example;\n"));
        assert!(text.contains("@Entity\npublic class Customer {\n"));
        assert!(text.contains("    @Id\n    private Long id;\n"));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn imports_are_deduplicated_in_order() {
        let mut source = JavaSource::class("com.example", "A");
        source.import("jakarta.persistence.Entity");
        source.import("java.util.List");
        source.import("jakarta.persistence.Entity");
        let text = source.render();
        assert_eq!(text.matches("import jakarta.persistence.Entity;").count(), 1);
        let entity = text.find("jakarta.persistence.Entity").unwrap();
        let list = text.find("java.util.List").unwrap();
        assert!(entity < list);
    }

    #[test]
    fn method_renders_with_body_indent() {
        let method = MethodSpec::new("public Long count()")
            .annotate("@Override")
            .line("return 0L;");
        assert_eq!(
            method.render(1),
            "    @Override\n    public Long count() {\n        return 0L;\n    }\n"
        );
    }

    #[test]
    fn package_dir_splits_on_dots() {
        let dir = package_dir(Path::new("src/main/java"), "com.example.shop");
        assert_eq!(dir, Path::new("src/main/java/com/example/shop"));
    }

    #[test]
    fn capitalize_first_char() {
        assert_eq!(capitalize("users"), "Users");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("x"), "X");
    }
}
