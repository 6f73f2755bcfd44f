//! REST endpoint class emitter.
//!
//! The shared root prefix is the longest common character sequence across
//! all path keys, compared positionally against the first path and capped
//! at the last `/` boundary. Each path (prefix stripped) maps to a resource
//! class named after its first segment; exactly one of GET/POST/PUT/DELETE
//! is handled per path item, checked in that fixed priority order.
//!
//! Re-running against an existing resource class merges instead of
//! appending blindly: every generated method carries a
//! `// operation: <id>` marker line, and a method whose marker is already
//! present in the file is skipped.

use std::path::Path;

use tracing::{debug, instrument, warn};

use crate::application::emitters::{source_root, write_source};
use crate::application::ports::Filesystem;
use crate::domain::model::{OperationModel, OrderedMap};
use crate::domain::source::{capitalize, package_dir};
use crate::domain::{ApiModel, DomainError, JavaSource, MethodSpec};
use crate::error::EntigenResult;

/// What one emission pass produced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResourceOutcome {
    pub classes: usize,
    pub methods_added: usize,
    pub methods_skipped: usize,
}

/// Longest common positional prefix across all path keys, capped at the
/// last `/` boundary.
///
/// The scan compares every path against the first, character by character,
/// and stops at the first position where any path disagrees or is shorter.
/// Capping at a segment boundary keeps the stripped paths from starting
/// mid-segment; in particular a single-path document still produces a
/// named resource class instead of swallowing its own first segment.
pub fn common_root(paths: &[&str]) -> String {
    let Some(first) = paths.first() else {
        return String::new();
    };
    let first_chars: Vec<char> = first.chars().collect();
    let others: Vec<Vec<char>> = paths[1..].iter().map(|p| p.chars().collect()).collect();

    let mut end = 0;
    'scan: for (i, c) in first_chars.iter().enumerate() {
        for other in &others {
            if other.get(i) != Some(c) {
                break 'scan;
            }
        }
        end = i + 1;
    }
    let prefix: String = first_chars[..end].iter().collect();
    match prefix.rfind('/') {
        Some(pos) => prefix[..=pos].to_string(),
        None => prefix,
    }
}

/// Resource class name for a prefix-stripped path.
pub fn resource_class_name(stripped: &str) -> String {
    format!("{}Resource", capitalize(first_segment(stripped)))
}

fn first_segment(stripped: &str) -> &str {
    stripped
        .trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or("")
}

/// Sub-path of a stripped path after its first segment, without the
/// leading slash. Empty for the collection path itself.
fn sub_path(stripped: &str) -> &str {
    let rest = stripped.trim_start_matches('/');
    match rest.split_once('/') {
        Some((_, tail)) => tail,
        None => "",
    }
}

/// Emit schema types and resource classes for the API model.
#[instrument(skip_all, fields(paths = api.paths.len()))]
pub fn emit(
    fs: &dyn Filesystem,
    api: &ApiModel,
    package: &str,
    base: &Path,
) -> EntigenResult<ResourceOutcome> {
    let mut outcome = ResourceOutcome::default();

    // Request/response types first, so operations can reference them.
    for (name, properties) in &api.schemas {
        let source = schema_source(package, name, properties);
        write_source(fs, base, &source)?;
        outcome.classes += 1;
    }

    let keys: Vec<&str> = api.paths.iter().map(|(k, _)| k.as_str()).collect();
    let prefix = common_root(&keys);
    debug!(%prefix, "computed shared root prefix");

    // Group paths by resource class, preserving first-seen order.
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
    for (idx, (key, _)) in api.paths.iter().enumerate() {
        let stripped = &key[prefix.len()..];
        let class = resource_class_name(stripped);
        match groups.iter_mut().find(|(name, _)| *name == class) {
            Some((_, members)) => members.push(idx),
            None => groups.push((class, vec![idx])),
        }
    }

    for (class, members) in groups {
        let emitted = emit_resource(fs, api, package, base, &prefix, &class, &members)?;
        outcome.classes += 1;
        outcome.methods_added += emitted.methods_added;
        outcome.methods_skipped += emitted.methods_skipped;
    }

    Ok(outcome)
}

fn emit_resource(
    fs: &dyn Filesystem,
    api: &ApiModel,
    package: &str,
    base: &Path,
    prefix: &str,
    class: &str,
    members: &[usize],
) -> EntigenResult<ResourceOutcome> {
    let rest_package = format!("{package}.rest");
    let mut outcome = ResourceOutcome::default();

    let mut methods = Vec::new();
    for &idx in members {
        let (key, path_item) = &api.paths[idx];
        let Some((verb, op)) = path_item.operation() else {
            continue;
        };
        let stripped = &key[prefix.len()..];
        match operation_method(api, verb, stripped, op) {
            Ok(method) => methods.push(method),
            Err(e) => {
                // An unresolved schema reference skips only this method.
                warn!(path = %key, error = %e, "operation skipped");
            }
        }
    }

    let class_dir = package_dir(&source_root(base), &rest_package);
    let class_path = class_dir.join(format!("{class}.java"));

    if fs.exists(&class_path) {
        // Merge: load, drop the trailing closing brace, append unseen
        // methods with any imports they need, close again.
        let existing = fs.read_file(&class_path)?;
        let body = match existing.rfind('}') {
            Some(pos) => existing[..pos].to_string(),
            None => existing,
        };
        let mut imports = Vec::new();
        let mut appended = String::new();
        for method in methods {
            let marker = &method.body[0];
            if body.contains(marker.as_str()) {
                outcome.methods_skipped += 1;
                continue;
            }
            for import in method_imports(&method) {
                if !imports.contains(&import) {
                    imports.push(import);
                }
            }
            appended.push('\n');
            appended.push_str(&method.render(1));
            outcome.methods_added += 1;
        }
        let mut body = splice_imports(&body, &imports);
        body.push_str(&appended);
        body.push_str("}\n");
        fs.write_file(&class_path, &body)?;
        debug!(class, added = outcome.methods_added, skipped = outcome.methods_skipped,
            "merged into existing resource");
        return Ok(outcome);
    }

    let first_key = &api.paths[members[0]].0;
    let class_route = format!("{prefix}{}", first_segment(&first_key[prefix.len()..]));
    let mut source = JavaSource::class(rest_package, class.to_string());
    source.import("jakarta.ws.rs.Path");
    source.import("jakarta.ws.rs.Produces");
    source.import("jakarta.ws.rs.Consumes");
    source.import("jakarta.ws.rs.core.MediaType");
    source.annotate(format!("@Path(\"{class_route}\")"));
    source.annotate("@Produces(MediaType.APPLICATION_JSON)");
    source.annotate("@Consumes(MediaType.APPLICATION_JSON)");
    for method in methods {
        for import in method_imports(&method) {
            source.import(import);
        }
        outcome.methods_added += 1;
        source.add_method(method);
    }
    write_source(fs, base, &source)?;
    Ok(outcome)
}

/// Imports one generated method depends on, derived from its annotations
/// and signature.
fn method_imports(method: &MethodSpec) -> Vec<String> {
    let mut imports = Vec::new();
    for verb in ["GET", "POST", "PUT", "DELETE"] {
        if method.annotations.iter().any(|a| a == &format!("@{verb}")) {
            imports.push(format!("jakarta.ws.rs.{verb}"));
        }
    }
    if method.annotations.iter().any(|a| a.starts_with("@Path(")) {
        imports.push("jakarta.ws.rs.Path".to_string());
    }
    if method.signature.contains("@PathParam") {
        imports.push("jakarta.ws.rs.PathParam".to_string());
    }
    if method.signature.contains("@QueryParam") {
        imports.push("jakarta.ws.rs.QueryParam".to_string());
    }
    if method.signature.starts_with("public List<") {
        imports.push("java.util.List".to_string());
        imports.push("java.util.Collections".to_string());
    }
    imports
}

/// Insert each missing `import X;` line into an existing compilation unit,
/// after the last import already present (or after the package line when
/// the file has no import block). Returns the input unchanged when nothing
/// is missing.
fn splice_imports(body: &str, imports: &[String]) -> String {
    let missing: Vec<&String> = imports
        .iter()
        .filter(|import| !body.contains(&format!("import {import};")))
        .collect();
    if missing.is_empty() {
        return body.to_string();
    }

    let mut lines: Vec<String> = body.lines().map(str::to_string).collect();
    match lines.iter().rposition(|l| l.starts_with("import ")) {
        Some(last) => {
            for (offset, import) in missing.iter().enumerate() {
                lines.insert(last + 1 + offset, format!("import {import};"));
            }
        }
        None => {
            // `package x;` is followed by a blank line; the new block goes
            // after it, with its own trailing blank line.
            let at = lines
                .iter()
                .position(|l| l.starts_with("package "))
                .map(|i| i + 2)
                .unwrap_or(0);
            for (offset, import) in missing.iter().enumerate() {
                lines.insert(at + offset, format!("import {import};"));
            }
            lines.insert(at + missing.len(), String::new());
        }
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Build the method for one operation, resolving its schema references.
fn operation_method(
    api: &ApiModel,
    verb: &str,
    stripped: &str,
    op: &OperationModel,
) -> Result<MethodSpec, DomainError> {
    let name = op.operation_id.clone().unwrap_or_else(|| {
        format!(
            "{}{}",
            verb.to_ascii_lowercase(),
            capitalize(first_segment(stripped))
        )
    });

    let mut params = Vec::new();
    for parameter in &op.parameters {
        let binding = if parameter.location == "path" {
            format!("@PathParam(\"{}\")", parameter.name)
        } else {
            format!("@QueryParam(\"{}\")", parameter.name)
        };
        params.push(format!("{binding} {} {}", parameter.ty, parameter.name));
    }
    if let Some(body_ref) = &op.body {
        // A present request body must resolve to a previously emitted type.
        if api.schema(body_ref).is_none() {
            return Err(DomainError::UnresolvedSchemaRef {
                reference: body_ref.clone(),
            });
        }
        params.push(format!("{body_ref} body"));
    }

    let (return_type, return_line) = match &op.response {
        Some(reference) => {
            let (element, is_array) = match reference.strip_suffix("[]") {
                Some(element) => (element, true),
                None => (reference.as_str(), false),
            };
            if api.schema(element).is_none() {
                return Err(DomainError::UnresolvedSchemaRef {
                    reference: reference.clone(),
                });
            }
            if is_array {
                (
                    format!("List<{element}>"),
                    Some("return Collections.emptyList();".to_string()),
                )
            } else {
                (element.to_string(), Some(format!("return new {element}();")))
            }
        }
        None => ("void".to_string(), None),
    };

    let mut method = MethodSpec::new(format!(
        "public {return_type} {name}({})",
        params.join(", ")
    ))
    .annotate(format!("@{verb}"));

    let tail = sub_path(stripped);
    if !tail.is_empty() {
        method = method.annotate(format!("@Path(\"{tail}\")"));
    }

    // The marker line is the dedup key for merge-on-rerun.
    method = method.line(format!("// operation: {name}"));
    if let Some(line) = return_line {
        method = method.line(line);
    }
    Ok(method)
}

/// A plain value type for one schema entry.
pub fn schema_source(package: &str, name: &str, properties: &OrderedMap<String>) -> JavaSource {
    let mut source = JavaSource::class(format!("{package}.rest"), name.to_string());
    for (property, ty) in properties {
        if let Some(import) = crate::application::emitters::import_for_type(ty) {
            source.import(import);
        }
        source.add_field(Vec::new(), format!("private {ty} {property};"));
    }
    for (property, ty) in properties {
        let cap = capitalize(property);
        source.add_method(
            MethodSpec::new(format!("public {ty} get{cap}()")).line(format!("return {property};")),
        );
        source.add_method(
            MethodSpec::new(format!("public void set{cap}({ty} {property})"))
                .line(format!("this.{property} = {property};")),
        );
    }
    source
}

// ── tests ─────────────────────────────────────────────────────────────────────
