use std::fs;
use std::path::{Path, PathBuf};

use crate::codegen::artifact::GeneratedArtifact;
use crate::codegen::method_scan::PageObjectMethodSet;
use crate::codegen::page_object::{PageElement, generate_page_object};
use crate::codegen::python::capitalize;
use crate::codegen::role::{Credentials, RoleGeneration, generate_role};
use crate::codegen::task::{PageObjectDescriptor, TaskGeneration, generate_task};
use crate::codegen::test_template::{DEFAULT_ROLE, generate_test};
use crate::discovery::inspector::ElementInspector;
use crate::error::ScaffoldError;
use crate::story::story_model::{TestScenario, Workflow};
use crate::tools::handlers::{ElementInput, story_scenarios};
use crate::trace::logger::Logger;
use crate::trace::timed::{note, timed};

// ============================================================================
// Request / report
// ============================================================================

/// One end-to-end scaffold run: story text in, every layer's artifacts out.
#[derive(Debug, Clone)]
pub struct ScaffoldRequest {
    pub story: String,
    pub workflow: Workflow,
    /// Page to inspect for the page object. Without it the task is scaffolding.
    pub url: Option<String>,
    pub page_name: Option<String>,
    pub task_name: Option<String>,
    pub role: String,
    pub capabilities: Vec<String>,
    pub credentials: Option<Credentials>,
}

impl ScaffoldRequest {
    pub fn new(story: impl Into<String>, workflow: Workflow) -> Self {
        let capabilities = match workflow {
            Workflow::Auth => vec!["can_login".to_string()],
            _ => Vec::new(),
        };
        Self {
            story: story.into(),
            workflow,
            url: None,
            page_name: None,
            task_name: None,
            role: DEFAULT_ROLE.to_string(),
            capabilities,
            credentials: None,
        }
    }

    /// `auth` -> `AuthPage` unless overridden.
    pub fn page_name(&self) -> String {
        self.page_name
            .clone()
            .unwrap_or_else(|| format!("{}Page", capitalize(self.workflow.as_str())))
    }

    /// `auth` -> `AuthTasks` unless overridden.
    pub fn task_name(&self) -> String {
        self.task_name
            .clone()
            .unwrap_or_else(|| self.workflow.task_class())
    }
}

#[derive(Debug, Clone)]
pub struct ScaffoldReport {
    pub story_title: String,
    pub workflow: Workflow,
    pub scenarios: Vec<TestScenario>,
    pub elements_discovered: usize,
    pub page: Option<GeneratedArtifact>,
    pub task: TaskGeneration,
    pub role: RoleGeneration,
    pub tests: Vec<GeneratedArtifact>,
}

impl ScaffoldReport {
    /// Artifacts in dependency order: page, task, role, tests.
    pub fn artifacts(&self) -> Vec<&GeneratedArtifact> {
        let mut all: Vec<&GeneratedArtifact> = Vec::new();
        all.extend(self.page.as_ref());
        all.push(&self.task.artifact);
        all.push(&self.role.artifact);
        all.extend(self.tests.iter());
        all
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Run story -> page -> task -> role -> tests.
///
/// The page object is only produced when a URL and an inspector are both
/// available; the task then consumes the method names scraped back out of the
/// generated page object source.
pub fn scaffold(
    request: &ScaffoldRequest,
    inspector: Option<&mut dyn ElementInspector>,
    logger: &dyn Logger,
) -> Result<ScaffoldReport, ScaffoldError> {
    let (story_title, scenarios) = timed(logger, "pipeline", "parse_story", || {
        story_scenarios(&request.story, request.workflow)
    })?;
    note(
        logger,
        "pipeline",
        "parse_story",
        format!("{} scenario(s) from '{}'", scenarios.len(), story_title),
    );

    let (page, elements_discovered) = match (&request.url, inspector) {
        (Some(url), Some(inspector)) => {
            let discovered = timed(logger, "pipeline", "discover", || inspector.inspect(url))?;
            let elements: Vec<PageElement> = discovered
                .iter()
                .map(ElementInput::from)
                .filter_map(ElementInput::into_page_element)
                .collect();
            let page = generate_page_object(&request.page_name(), &elements);
            note(logger, "pipeline", "page_object", &page.file_path);
            (Some(page), discovered.len())
        }
        (Some(url), None) => {
            tracing::warn!(url = %url, "no inspector available, skipping page discovery");
            (None, 0)
        }
        _ => (None, 0),
    };

    let descriptors: Vec<PageObjectDescriptor> = page
        .iter()
        .map(|p| PageObjectDescriptor {
            name: p.logical_name.clone(),
            file_path: p.file_path.clone(),
            methods: PageObjectMethodSet::from_source(&p.source_text),
        })
        .collect();
    let task = generate_task(&request.task_name(), None, &descriptors);
    note(logger, "pipeline", "task", task.status.as_str());

    let role = generate_role(&request.role, &request.capabilities, request.credentials.as_ref());
    if !role.ignored_capabilities.is_empty() {
        note(
            logger,
            "pipeline",
            "role",
            format!("ignored capabilities: {}", role.ignored_capabilities.join(", ")),
        );
    }

    let tests = scenarios
        .iter()
        .map(|s| {
            generate_test(
                &s.name,
                request.workflow,
                Some(request.role.as_str()),
                Some(&s.scenario()),
                Some(s.description.as_str()),
            )
        })
        .collect();

    Ok(ScaffoldReport {
        story_title,
        workflow: request.workflow,
        scenarios,
        elements_discovered,
        page,
        task,
        role,
        tests,
    })
}

// ============================================================================
// Persistence
// ============================================================================

/// Write artifacts under `out_dir` at their canonical relative paths.
///
/// Without `overwrite`, every target is checked before anything is written,
/// so a refused run leaves the tree untouched.
pub fn write_artifacts(
    out_dir: &Path,
    artifacts: &[&GeneratedArtifact],
    overwrite: bool,
) -> Result<Vec<PathBuf>, ScaffoldError> {
    let targets: Vec<PathBuf> = artifacts.iter().map(|a| out_dir.join(&a.file_path)).collect();

    if !overwrite {
        if let Some(existing) = targets.iter().find(|t| t.exists()) {
            return Err(ScaffoldError::AlreadyExists(existing.display().to_string()));
        }
    }

    for (artifact, target) in artifacts.iter().zip(&targets) {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ScaffoldError::io(parent.display().to_string(), e))?;
        }
        fs::write(target, &artifact.source_text)
            .map_err(|e| ScaffoldError::io(target.display().to_string(), e))?;
        tracing::info!(path = %target.display(), kind = %artifact.component_kind, "wrote artifact");
    }

    Ok(targets)
}
