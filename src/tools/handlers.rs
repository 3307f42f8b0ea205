use std::collections::BTreeMap;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::codegen::method_scan::PageObjectMethodSet;
use crate::codegen::page_object::{PageElement, generate_page_object};
use crate::codegen::role::{Credentials, generate_role};
use crate::codegen::task::{PageObjectDescriptor, generate_task};
use crate::codegen::test_template::{architecture, ensure_test_prefix, generate_test};
use crate::discovery::element_model::{DiscoveredElement, ElementType, LocatorCandidates};
use crate::discovery::inspector::ElementInspector;
use crate::error::ScaffoldError;
use crate::story::naming::{generate_test_name, validate};
use crate::story::parser::parse;
use crate::story::story_model::{Scenario, TestScenario, Workflow};

pub type Payload = Map<String, Value>;

fn parse_args<T: DeserializeOwned>(tool: &str, args: &Value) -> Result<T, ScaffoldError> {
    serde_json::from_value(args.clone()).map_err(|source| ScaffoldError::JsonParse {
        context: format!("{} arguments", tool),
        source,
    })
}

fn required<'a>(field: &'static str, value: &'a Option<String>) -> Result<&'a str, ScaffoldError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ScaffoldError::MissingField(field))
}

pub fn parse_workflow(value: &Option<String>) -> Result<Workflow, ScaffoldError> {
    required("workflow", value)?.parse()
}

fn to_value<T: serde::Serialize>(context: &str, value: &T) -> Result<Value, ScaffoldError> {
    serde_json::to_value(value).map_err(|source| ScaffoldError::JsonSerialize {
        context: context.to_string(),
        source,
    })
}

fn next_steps(steps: &[&str]) -> Value {
    json!(steps)
}

// ============================================================================
// generate_tests_from_user_story
// ============================================================================

#[derive(Debug, Deserialize)]
struct StoryArgs {
    #[serde(default)]
    user_story: Option<String>,
    #[serde(default)]
    workflow: Option<String>,
}

/// Parsed scenarios bound to a workflow. Blocks missing When or Then are
/// dropped; an empty result is `NoScenarios`.
pub fn story_scenarios(text: &str, workflow: Workflow) -> Result<(String, Vec<TestScenario>), ScaffoldError> {
    let story = parse(text);
    if story.scenarios.is_empty() {
        return Err(ScaffoldError::NoScenarios);
    }
    let scenarios = story
        .scenarios
        .iter()
        .filter(|s| validate(s))
        .map(|s| TestScenario {
            name: generate_test_name(s),
            description: format!("Verify {}", s.when),
            given: s.given.clone(),
            when: s.when.clone(),
            then: s.then.clone(),
            workflow,
        })
        .collect();
    Ok((story.title, scenarios))
}

pub fn generate_tests_from_user_story(args: &Value) -> Result<Payload, ScaffoldError> {
    let args: StoryArgs = parse_args("generate_tests_from_user_story", args)?;
    let text = required("user_story", &args.user_story)?;
    let workflow = parse_workflow(&args.workflow)?;

    let (title, scenarios) = story_scenarios(text, workflow)?;

    let mut payload = Payload::new();
    payload.insert("user_story_title".into(), json!(title));
    payload.insert("workflow".into(), json!(workflow));
    payload.insert("scenarios_count".into(), json!(scenarios.len()));
    payload.insert("scenarios".into(), to_value("scenarios", &scenarios)?);
    payload.insert(
        "next_step".into(),
        json!("Use generate_test_template to create pytest test code from these scenarios"),
    );
    Ok(payload)
}

// ============================================================================
// discover_page_elements
// ============================================================================

#[derive(Debug, Deserialize)]
struct DiscoverArgs {
    #[serde(default)]
    url: Option<String>,
}

pub fn discover_page_elements(
    args: &Value,
    inspector: &mut dyn ElementInspector,
) -> Result<Payload, ScaffoldError> {
    let args: DiscoverArgs = parse_args("discover_page_elements", args)?;
    let url = required("url", &args.url)?;
    if !url.starts_with("http") {
        return Err(ScaffoldError::invalid("url", "must start with http:// or https://"));
    }

    let elements = inspector.inspect(url)?;

    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    for element in &elements {
        *by_type.entry(element.element_type.to_string()).or_default() += 1;
    }

    let mut payload = Payload::new();
    payload.insert("url".into(), json!(url));
    payload.insert("total_elements".into(), json!(elements.len()));
    payload.insert("elements_by_type".into(), json!(by_type));
    payload.insert("elements".into(), to_value("elements", &elements)?);
    payload.insert(
        "next_steps".into(),
        next_steps(&[
            "Review discovered elements",
            "Select relevant elements for the page object",
            "Use generate_page_object to create page object code",
        ]),
    );
    Ok(payload)
}

// ============================================================================
// generate_page_object
// ============================================================================

/// An element as callers hand it in: either a full discovery record, the
/// flat `locator_id`/`locator_css`/`locator_xpath` form, or `{name, locator}`.
#[derive(Debug, Default, Deserialize)]
pub struct ElementInput {
    #[serde(default)]
    pub suggested_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub element_type: Option<Value>,
    #[serde(default)]
    pub locator_candidates: LocatorCandidates,
    #[serde(default)]
    pub locator_id: Option<String>,
    #[serde(default)]
    pub locator_css: Option<String>,
    #[serde(default)]
    pub locator_xpath: Option<String>,
    #[serde(default)]
    pub locator: Option<String>,
}

impl ElementInput {
    /// Same id > css > xpath priority as discovery, then any bare `locator`.
    pub fn into_page_element(self) -> Option<PageElement> {
        let flat = [&self.locator_id, &self.locator_css, &self.locator_xpath, &self.locator]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .cloned();
        let locator = self
            .locator_candidates
            .preferred()
            .map(str::to_string)
            .or(flat)?;

        let name = if !self.suggested_name.is_empty() {
            self.suggested_name
        } else if self.locator.is_some() {
            self.name.unwrap_or_default()
        } else {
            String::new()
        };
        if name.is_empty() {
            return None;
        }

        let element_type = self
            .element_type
            .and_then(|v| serde_json::from_value::<ElementType>(v).ok());

        Some(PageElement {
            name,
            locator,
            element_type,
        })
    }
}

impl From<&DiscoveredElement> for ElementInput {
    fn from(element: &DiscoveredElement) -> Self {
        ElementInput {
            suggested_name: element.suggested_name.clone(),
            element_type: Some(json!(element.element_type)),
            locator_candidates: element.locator_candidates.clone(),
            ..ElementInput::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct PageArgs {
    #[serde(default)]
    page_name: Option<String>,
    #[serde(default)]
    elements: Vec<ElementInput>,
    #[serde(default)]
    workflow: Option<String>,
}

pub fn generate_page_object_tool(args: &Value) -> Result<Payload, ScaffoldError> {
    let args: PageArgs = parse_args("generate_page_object", args)?;
    let page_name = required("page_name", &args.page_name)?.to_string();
    if args.elements.is_empty() {
        return Err(ScaffoldError::MissingField("elements"));
    }
    if args.workflow.as_deref().is_some_and(|w| !w.trim().is_empty()) {
        parse_workflow(&args.workflow)?;
    }

    let elements: Vec<PageElement> = args
        .elements
        .into_iter()
        .filter_map(ElementInput::into_page_element)
        .collect();
    let artifact = generate_page_object(&page_name, &elements);

    let mut payload = Payload::new();
    payload.insert("page_name".into(), json!(page_name));
    payload.insert("file_path".into(), json!(artifact.file_path));
    payload.insert("elements_count".into(), json!(elements.len()));
    payload.insert("methods".into(), artifact.metadata.get("methods").cloned().unwrap_or(json!([])));
    payload.insert("sha1".into(), json!(artifact.fingerprint()));
    payload.insert("code".into(), json!(artifact.source_text));
    payload.insert(
        "next_steps".into(),
        next_steps(&[
            "Save page object code to suggested file path",
            "Import page object in task methods",
            "Use page object methods in task workflows",
            "Write tests that use task methods",
        ]),
    );
    Ok(payload)
}

// ============================================================================
// generate_task
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PageObjectInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub methods: Option<Vec<String>>,
}

impl PageObjectInput {
    /// Page objects without a name or file path are dropped. Methods come
    /// from scraping `code` when present, else from the explicit list.
    pub fn into_descriptor(self) -> Option<PageObjectDescriptor> {
        if self.name.is_empty() || self.file_path.is_empty() {
            return None;
        }
        let methods = match (self.code, self.methods) {
            (Some(code), _) if !code.is_empty() => PageObjectMethodSet::from_source(&code),
            (_, Some(names)) => PageObjectMethodSet::new(names),
            _ => PageObjectMethodSet::default(),
        };
        Some(PageObjectDescriptor {
            name: self.name,
            file_path: self.file_path,
            methods,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TaskArgs {
    #[serde(default)]
    task_name: Option<String>,
    #[serde(default)]
    workflow_description: Option<String>,
    #[serde(default)]
    page_objects: Vec<PageObjectInput>,
}

pub fn generate_task_tool(args: &Value) -> Result<Payload, ScaffoldError> {
    let args: TaskArgs = parse_args("generate_task", args)?;
    let task_name = required("task_name", &args.task_name)?.to_string();
    let page_objects: Vec<PageObjectDescriptor> = args
        .page_objects
        .into_iter()
        .filter_map(PageObjectInput::into_descriptor)
        .collect();

    let generation = generate_task(&task_name, args.workflow_description.as_deref(), &page_objects);

    let mut payload = Payload::new();
    payload.insert("task_name".into(), json!(task_name));
    payload.insert("file_path".into(), json!(generation.artifact.file_path));
    payload.insert("code".into(), json!(generation.artifact.source_text));
    payload.insert("page_objects_used".into(), json!(page_objects.len()));
    payload.insert("workflows_generated".into(), json!(generation.status));
    payload.insert("methods_found".into(), json!(generation.methods_found));
    payload.insert("capabilities".into(), to_value("capabilities", &generation.capabilities)?);
    payload.insert(
        "next_steps".into(),
        next_steps(&[
            "Save task code to suggested file path",
            "Import task in role classes",
            "Use task methods in tests",
            "Verify workflows execute correctly",
        ]),
    );
    Ok(payload)
}

// ============================================================================
// generate_role
// ============================================================================

#[derive(Debug, Deserialize)]
struct RoleArgs {
    #[serde(default)]
    role_name: Option<String>,
    #[serde(default)]
    capabilities: Vec<String>,
    #[serde(default)]
    credentials: Option<Credentials>,
}

pub fn generate_role_tool(args: &Value) -> Result<Payload, ScaffoldError> {
    let args: RoleArgs = parse_args("generate_role", args)?;
    let role_name = required("role_name", &args.role_name)?.to_string();

    let generation = generate_role(&role_name, &args.capabilities, args.credentials.as_ref());

    let mut payload = Payload::new();
    payload.insert("role_name".into(), json!(role_name));
    payload.insert("file_path".into(), json!(generation.artifact.file_path));
    payload.insert("capabilities".into(), json!(args.capabilities));
    payload.insert("ignored_capabilities".into(), json!(generation.ignored_capabilities));
    payload.insert("code".into(), json!(generation.artifact.source_text));
    payload.insert(
        "next_steps".into(),
        next_steps(&[
            "Save role code to suggested file path",
            "Implement capability methods",
            "Use role in tests",
        ]),
    );
    Ok(payload)
}

// ============================================================================
// generate_test_template
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ScenarioInput {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub scenario: Scenario,
}

#[derive(Debug, Deserialize)]
struct TestArgs {
    #[serde(default)]
    test_name: Option<String>,
    #[serde(default)]
    workflow: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    scenario: Option<ScenarioInput>,
}

pub fn generate_test_template_tool(args: &Value, default_role: &str) -> Result<Payload, ScaffoldError> {
    let args: TestArgs = parse_args("generate_test_template", args)?;
    let test_name = ensure_test_prefix(required("test_name", &args.test_name)?);
    let workflow = parse_workflow(&args.workflow)?;
    let role = args
        .role
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(default_role)
        .to_string();

    let (scenario, description) = match &args.scenario {
        Some(input) if input.scenario.has_content() => {
            (Some(&input.scenario), input.description.as_deref())
        }
        _ => (None, None),
    };

    let artifact = generate_test(&test_name, workflow, Some(&role), scenario, description);

    let mut payload = Payload::new();
    payload.insert("test_name".into(), json!(test_name));
    payload.insert("workflow".into(), json!(workflow));
    payload.insert("role".into(), json!(role));
    payload.insert("file_path".into(), json!(artifact.file_path));
    payload.insert("code".into(), json!(artifact.source_text));
    payload.insert("architecture".into(), json!(architecture(&role)));
    payload.insert(
        "next_steps".into(),
        json!([
            "Save this test code to the suggested file path",
            format!("Ensure {} role exists in framework/roles/", role),
            "Ensure supporting Task and Page objects exist",
            "Run pytest to execute the test",
        ]),
    );
    Ok(payload)
}
