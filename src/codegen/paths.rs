use crate::codegen::artifact::ComponentKind;
use crate::story::story_model::Workflow;

/// `LoginPage` -> `login_page`, `AuthTasks` -> `auth_tasks`.
///
/// An underscore goes before every interior ASCII uppercase letter, so
/// acronyms split per letter (`HTMLPage` -> `h_t_m_l_page`).
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            out.push('_');
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

/// Canonical on-disk path for a generated component.
///
/// Pages always land in `framework/pages/common/`. Tests without a workflow
/// go straight under `tests/`.
pub fn resolve(kind: ComponentKind, logical_name: &str, workflow: Option<Workflow>) -> String {
    let snake = to_snake_case(logical_name);
    match kind {
        ComponentKind::Test => match workflow {
            Some(w) => format!("tests/{}/{}.py", w, snake),
            None => format!("tests/{}.py", snake),
        },
        ComponentKind::Role => format!("framework/roles/{}.py", snake),
        ComponentKind::Task => format!("framework/tasks/{}.py", snake),
        ComponentKind::Page => format!("framework/pages/common/{}.py", snake),
    }
}

/// Dotted module path relative to the `framework/` package root, as seen by
/// generated tests that put `framework/` on `sys.path`.
pub fn module_path(kind: ComponentKind, logical_name: &str) -> String {
    let path = resolve(kind, logical_name, None);
    let relative = path.strip_prefix("framework/").unwrap_or(&path);
    import_path_from_file(relative)
}

/// `framework/pages/common/login_page.py` -> `framework.pages.common.login_page`.
pub fn import_path_from_file(file_path: &str) -> String {
    file_path
        .strip_suffix(".py")
        .unwrap_or(file_path)
        .replace(['/', '\\'], ".")
}
