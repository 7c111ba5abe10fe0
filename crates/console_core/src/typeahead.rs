use std::fmt;
use std::time::{Duration, Instant};

use console_logging::console_debug;

use crate::list::ApplyOutcome;
use crate::{validate_project_name, Debouncer, FetchFailure, ValidationError};

pub const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectHint {
    /// The typed name is not a valid project name.
    NameTooltip,
    /// No existing project has exactly the typed name.
    NoProjectInfo,
}

impl fmt::Display for ProjectHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectHint::NameTooltip => f.write_str(
                "project names are lowercase letters and digits, optionally separated by '.', '_' or '-'",
            ),
            ProjectHint::NoProjectInfo => f.write_str("no project with that name exists"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSuggestion {
    pub project_id: i64,
    pub name: String,
}

/// Project-name field with debounced server lookup of matching projects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTypeahead {
    name: String,
    debouncer: Debouncer<String>,
    suggestions: Vec<ProjectSuggestion>,
    hint: Option<ProjectHint>,
}

impl Default for ProjectTypeahead {
    fn default() -> Self {
        Self::new(crate::debounce::DEFAULT_QUIET_PERIOD)
    }
}

impl ProjectTypeahead {
    pub fn new(quiet: Duration) -> Self {
        Self {
            name: String::new(),
            debouncer: Debouncer::new(quiet),
            suggestions: Vec::new(),
            hint: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn suggestions(&self) -> &[ProjectSuggestion] {
        &self.suggestions
    }

    pub fn hint(&self) -> Option<ProjectHint> {
        self.hint
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Takes the current field text. Invalid names never become lookups.
    pub fn input(&mut self, name: &str, now: Instant) -> Result<(), ValidationError> {
        self.name = name.to_string();
        match validate_project_name(name) {
            Ok(()) => {
                self.debouncer.push(self.name.clone(), now);
                Ok(())
            }
            Err(err) => {
                self.debouncer.cancel();
                self.hint = Some(ProjectHint::NameTooltip);
                Err(err)
            }
        }
    }

    /// The name to look up, once typing has paused long enough.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let query = self.debouncer.poll(now)?;
        self.hint = None;
        self.suggestions.clear();
        Some(query)
    }

    pub fn apply_results(
        &mut self,
        query: &str,
        result: Result<Vec<ProjectSuggestion>, FetchFailure>,
    ) -> ApplyOutcome {
        if self.debouncer.last_dispatched().map(String::as_str) != Some(query) {
            console_debug!("Discarding project lookup for superseded query {:?}", query);
            return ApplyOutcome::Stale;
        }
        match result {
            Ok(projects) => {
                let exists = projects.iter().any(|project| project.name == query);
                self.suggestions = projects.into_iter().take(MAX_SUGGESTIONS).collect();
                self.hint = if exists {
                    None
                } else {
                    Some(ProjectHint::NoProjectInfo)
                };
                ApplyOutcome::Applied
            }
            Err(failure) => {
                self.hint = Some(ProjectHint::NoProjectInfo);
                ApplyOutcome::Failed(failure)
            }
        }
    }

    pub fn select(&mut self, name: &str) {
        self.name = name.to_string();
        self.suggestions.clear();
        self.hint = None;
    }

    pub fn leave(&mut self) {
        self.suggestions.clear();
    }

    /// Accepts the field for submission. An invalid name is refused and
    /// re-raises the name tooltip.
    pub fn submit(&mut self) -> Result<&str, ValidationError> {
        if let Err(err) = validate_project_name(&self.name) {
            self.hint = Some(ProjectHint::NameTooltip);
            return Err(err);
        }
        self.leave();
        Ok(&self.name)
    }
}
