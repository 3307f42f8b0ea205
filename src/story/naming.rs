use crate::story::story_model::Scenario;

/// Derive a pytest function name from a scenario.
///
/// Source text is the explicit scenario label, else `when`, else `then`.
/// Collisions between scenarios are left to the caller.
pub fn generate_test_name(scenario: &Scenario) -> String {
    let source = [&scenario.name, &scenario.when, &scenario.then]
        .into_iter()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .unwrap_or("test");

    let cleaned: String = source
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    let name = cleaned.split_whitespace().collect::<Vec<_>>().join("_");

    if name.starts_with("test_") {
        name
    } else {
        format!("test_{}", name)
    }
}

/// A scenario is usable downstream only when both `when` and `then` are set.
pub fn validate(scenario: &Scenario) -> bool {
    !scenario.when.is_empty() && !scenario.then.is_empty()
}
