use crate::story::story_model::{Scenario, UserStory};

// ============================================================================
// User story parsing
// ============================================================================

const UNTITLED: &str = "Untitled User Story";

/// Parse free-text user story into title, description, criteria and scenarios.
///
/// Never fails: malformed text narrows the result, possibly to zero
/// scenarios. Callers decide whether an empty scenario list is an error.
pub fn parse(text: &str) -> UserStory {
    UserStory {
        title: extract_title(text),
        description: extract_description(text),
        acceptance_criteria: extract_acceptance_criteria(text),
        scenarios: extract_scenarios(text),
    }
}

/// First non-empty line, verbatim (trimmed).
pub fn extract_title(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or(UNTITLED)
        .to_string()
}

/// Every line before the first one mentioning a criteria/GWT keyword.
pub fn extract_description(text: &str) -> String {
    let keywords = ["acceptance criteria", "given", "when", "then"];

    text.trim()
        .lines()
        .map(str::trim)
        .take_while(|line| {
            let lower = line.to_lowercase();
            !keywords.iter().any(|k| lower.contains(k))
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Bullet lines between "acceptance criteria" and the first given/scenario line.
pub fn extract_acceptance_criteria(text: &str) -> Vec<String> {
    let mut criteria = Vec::new();
    let mut in_section = false;

    for line in text.lines() {
        let stripped = line.trim();
        let lower = stripped.to_lowercase();

        if lower.contains("acceptance criteria") {
            in_section = true;
            continue;
        }

        if !in_section {
            continue;
        }

        if lower.contains("given") || lower.contains("scenario") {
            break;
        }

        if stripped.starts_with(['-', '*', '•']) {
            criteria.push(
                stripped
                    .trim_start_matches(['-', '*', '•'])
                    .trim()
                    .to_string(),
            );
        }
    }

    criteria
}

// ============================================================================
// Scenario segmentation
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clause {
    Given,
    When,
    Then,
    And,
}

impl Clause {
    const ORDER: [(Clause, &'static str); 4] = [
        (Clause::Given, "given"),
        (Clause::When, "when"),
        (Clause::Then, "then"),
        (Clause::And, "and"),
    ];

    /// Classify by case-insensitive keyword prefix; returns the clause body.
    fn classify(line: &str) -> Option<(Clause, &str)> {
        Self::ORDER
            .iter()
            .find_map(|(clause, keyword)| strip_keyword(line, keyword).map(|rest| (*clause, rest)))
    }
}

/// Strip a leading ASCII keyword (any case), then an optional `:` and spaces.
fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let head = line.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    let rest = line[keyword.len()..].trim_start();
    let rest = rest.strip_prefix(':').unwrap_or(rest);
    Some(rest.trim())
}

/// Explicit scenario marker: `Scenario: name` or a `## Scenario` heading.
///
/// Returns the label (empty when the marker carried none).
fn scenario_marker(line: &str) -> Option<String> {
    let lower = line.to_lowercase();
    if !(lower.starts_with("scenario:") || lower.starts_with("## scenario")) {
        return None;
    }
    Some(
        line.split_once(':')
            .map(|(_, name)| name.trim().to_string())
            .unwrap_or_default(),
    )
}

/// Split story text into Given/When/Then scenarios.
///
/// A leading `And` extends whichever of then/when/given was most recently
/// populated, in that priority order, joined with `" AND "`.
pub fn extract_scenarios(text: &str) -> Vec<Scenario> {
    let mut scenarios = Vec::new();
    let mut current: Option<Scenario> = None;

    for raw in text.lines() {
        let line = raw.trim();

        if let Some(name) = scenario_marker(line) {
            if let Some(done) = current.take() {
                scenarios.push(done);
            }
            current = Some(Scenario {
                name,
                ..Scenario::default()
            });
            continue;
        }

        let Some((clause, body)) = Clause::classify(line) else {
            continue;
        };

        // A Given opens an implicit scenario only when none is open.
        if clause == Clause::Given && current.is_none() {
            current = Some(Scenario::default());
        }

        let Some(scenario) = current.as_mut() else {
            continue;
        };

        match clause {
            Clause::Given => scenario.given = body.to_string(),
            Clause::When => scenario.when = body.to_string(),
            Clause::Then => scenario.then = body.to_string(),
            Clause::And => {
                let target = if !scenario.then.is_empty() {
                    Some(&mut scenario.then)
                } else if !scenario.when.is_empty() {
                    Some(&mut scenario.when)
                } else if !scenario.given.is_empty() {
                    Some(&mut scenario.given)
                } else {
                    None
                };
                if let Some(field) = target {
                    field.push_str(" AND ");
                    field.push_str(body);
                }
            }
        }
    }

    if let Some(last) = current {
        if last.has_content() {
            scenarios.push(last);
        }
    }

    scenarios
}
