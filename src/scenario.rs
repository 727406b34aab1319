//! Scenario records and the session-scoped scenario store

use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// A named rehearsal context with an optional suggested script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Suggested opening line, empty when the author gave none
    pub script: String,
}

impl Scenario {
    pub fn has_script(&self) -> bool {
        !self.script.is_empty()
    }
}

fn default_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            id: "apologize".to_string(),
            title: "Apologising to a friend".to_string(),
            description: "Practice saying sorry effectively and sincerely.".to_string(),
            script: "Hi [friend], I want to apologize for [situation]. I realize it was wrong and I hope we can move forward.".to_string(),
        },
        Scenario {
            id: "promotion".to_string(),
            title: "Asking for a promotion".to_string(),
            description: "Practice asking your manager for a raise or promotion.".to_string(),
            script: "Hello [manager], I would like to discuss my role and contribution. Based on my performance, I believe I am ready for a promotion.".to_string(),
        },
        Scenario {
            id: "rejection".to_string(),
            title: "Facing rejection".to_string(),
            description: "Practice responding to rejection with grace and confidence.".to_string(),
            script: "Thank you for the feedback. I understand your decision and will continue improving my skills.".to_string(),
        },
    ]
}

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex is valid"))
}

/// Lower-case the title and collapse each whitespace run into a single `-`
pub fn slugify(title: &str) -> String {
    whitespace_run()
        .replace_all(&title.to_lowercase(), "-")
        .into_owned()
}

/// Ordered, append-only collection of scenarios.
///
/// Ids are unique: user-authored entries get a millisecond timestamp suffix,
/// bumped forward whenever it would repeat an id already in the store.
#[derive(Debug, Clone)]
pub struct ScenarioStore {
    scenarios: Vec<Scenario>,
    ids: HashSet<String>,
}

impl Default for ScenarioStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioStore {
    /// Store seeded with the three default scenarios
    pub fn new() -> Self {
        let scenarios = default_scenarios();
        let ids = scenarios.iter().map(|s| s.id.clone()).collect();
        Self { scenarios, ids }
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn all(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn get(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.scenarios.iter().position(|s| s.id == id)
    }

    pub fn first(&self) -> &Scenario {
        // Seeded with defaults and never shrinks
        &self.scenarios[0]
    }

    /// Append a user-authored scenario. Returns `None` when the title is blank.
    pub fn add(&mut self, title: &str, description: &str, script: &str) -> Option<&Scenario> {
        self.add_at(title, description, script, Utc::now().timestamp_millis())
    }

    fn add_at(
        &mut self,
        title: &str,
        description: &str,
        script: &str,
        now_millis: i64,
    ) -> Option<&Scenario> {
        if title.trim().is_empty() {
            return None;
        }

        let slug = slugify(title);
        let mut stamp = now_millis;
        let mut id = format!("{}-{}", slug, stamp);
        while self.ids.contains(&id) {
            stamp += 1;
            id = format!("{}-{}", slug, stamp);
        }

        self.ids.insert(id.clone());
        self.scenarios.push(Scenario {
            id,
            title: title.to_string(),
            description: description.to_string(),
            script: script.to_string(),
        });
        self.scenarios.last()
    }
}
