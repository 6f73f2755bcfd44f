//! Form and view class emitters.
//!
//! One value-holder type per named field group, with Bean-Validation
//! markers inserted per recognized validation keyword; one holder type per
//! named view path, collection-vs-singular shape and scope marker both
//! selected by the entry's `type: "list"` flag.

use std::path::Path;

use tracing::{debug, instrument, warn};

use crate::application::emitters::write_source;
use crate::application::ports::Filesystem;
use crate::domain::model::view::concrete_type;
use crate::domain::source::capitalize;
use crate::domain::{FormFieldModel, JavaSource, MethodSpec, ViewEntry, ViewModel};
use crate::error::EntigenResult;

/// Emit form beans and view holders. Returns the class count.
#[instrument(skip_all, fields(forms = view.forms.len(), views = view.views.len()))]
pub fn emit(
    fs: &dyn Filesystem,
    view: &ViewModel,
    package: &str,
    base: &Path,
) -> EntigenResult<usize> {
    let mut count = 0;
    for (name, fields) in &view.forms {
        let source = form_source(package, name, fields);
        let path = write_source(fs, base, &source)?;
        debug!(form = %name, path = %path.display(), "form bean emitted");
        count += 1;
    }
    for (path_key, entry) in &view.views {
        let source = view_source(package, path_key, entry);
        let path = write_source(fs, base, &source)?;
        debug!(view = %path_key, path = %path.display(), "view holder emitted");
        count += 1;
    }
    Ok(count)
}

/// Class name for a form group: `customerForm` → `CustomerForm`.
pub fn form_class_name(form: &str) -> String {
    capitalize(form)
}

/// Class name for a view path: `/customers/edit` → `CustomersEditView`.
pub fn view_class_name(path: &str) -> String {
    let mut name = String::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        name.push_str(&capitalize(segment));
    }
    name.push_str("View");
    name
}

/// One value-holder type per named field group.
pub fn form_source(package: &str, form: &str, fields: &[FormFieldModel]) -> JavaSource {
    let class = form_class_name(form);
    let mut source = JavaSource::class(format!("{package}.view"), class.clone())
        .declaration(format!("public class {class} implements Serializable"));
    source.import("java.io.Serializable");

    for field in fields {
        let ty = concrete_type(&field.ty);
        let mut annotations = Vec::new();
        for keyword in &field.validate {
            match validation_marker(keyword) {
                Some((import, marker)) => {
                    source.import(import);
                    annotations.push(marker);
                }
                None => warn!(form, field = %field.name, keyword = %keyword,
                    "unrecognized validation keyword ignored"),
            }
        }
        source.add_field(annotations, format!("private {ty} {};", field.name));
    }

    for field in fields {
        let ty = concrete_type(&field.ty);
        let name = &field.name;
        let cap = capitalize(name);
        source.add_method(
            MethodSpec::new(format!("public {ty} get{cap}()")).line(format!("return {name};")),
        );
        source.add_method(
            MethodSpec::new(format!("public void set{cap}({ty} {name})"))
                .line(format!("this.{name} = {name};")),
        );
    }
    source
}

/// Import and annotation for one recognized validation keyword.
fn validation_marker(keyword: &str) -> Option<(String, String)> {
    let base = "jakarta.validation.constraints";
    let (keyword, argument) = match keyword.split_once(':') {
        Some((k, a)) => (k, Some(a)),
        None => (keyword, None),
    };
    match (keyword.to_ascii_lowercase().as_str(), argument) {
        ("required", _) => Some((format!("{base}.NotNull"), "@NotNull".into())),
        ("email", _) => Some((format!("{base}.Email"), "@Email".into())),
        ("past", _) => Some((format!("{base}.Past"), "@Past".into())),
        ("future", _) => Some((format!("{base}.Future"), "@Future".into())),
        ("min", Some(n)) => Some((format!("{base}.Min"), format!("@Min({n})"))),
        ("max", Some(n)) => Some((format!("{base}.Max"), format!("@Max({n})"))),
        ("pattern", Some(re)) => Some((
            format!("{base}.Pattern"),
            format!("@Pattern(regexp = \"{re}\")"),
        )),
        _ => None,
    }
}

/// One holder type per named view path.
pub fn view_source(package: &str, path: &str, entry: &ViewEntry) -> JavaSource {
    let class = view_class_name(path);
    let form = form_class_name(&entry.form);
    let mut source = JavaSource::class(format!("{package}.view"), class.clone())
        .declaration(format!("public class {class} implements Serializable"));
    source.import("java.io.Serializable");
    source.import("jakarta.inject.Named");
    source.annotate("@Named");

    if entry.is_list() {
        source.import("jakarta.enterprise.context.SessionScoped");
        source.import("java.util.ArrayList");
        source.import("java.util.List");
        source.annotate("@SessionScoped");
        source.add_field(
            Vec::new(),
            format!("private List<{form}> items = new ArrayList<>();"),
        );
        source.add_method(
            MethodSpec::new(format!("public List<{form}> getItems()")).line("return items;"),
        );
        source.add_method(
            MethodSpec::new(format!("public void setItems(List<{form}> items)"))
                .line("this.items = items;"),
        );
    } else {
        source.import("jakarta.enterprise.context.RequestScoped");
        source.annotate("@RequestScoped");
        source.add_field(
            Vec::new(),
            format!("private {form} item = new {form}();"),
        );
        source.add_method(
            MethodSpec::new(format!("public {form} getItem()")).line("return item;"),
        );
        source.add_method(
            MethodSpec::new(format!("public void setItem({form} item)"))
                .line("this.item = item;"),
        );
    }
    source
}

// ── tests ─────────────────────────────────────────────────────────────────────
