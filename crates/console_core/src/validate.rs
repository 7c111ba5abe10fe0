use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

pub const PROJECT_NAME_MIN_LEN: usize = 2;
pub const REPOSITORY_NAME_MAX_LEN: usize = 256;
pub const ROBOT_NAME_MAX_LEN: usize = 255;

static PROJECT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:[._-][a-z0-9]+)*$").expect("project pattern"));
static REPOSITORY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(?:[._-][a-z0-9]+)*(/[a-z0-9]+(?:[._-][a-z0-9]+)*)*$")
        .expect("repository pattern")
});
static TAG_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]{0,127}$").expect("tag pattern")
});

/// Input rejected before it can reach the network layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} has an invalid format")]
    Pattern { field: &'static str },
    #[error("page must be 1 or greater (got {0})")]
    PageOutOfRange(u32),
    #[error("page size must be greater than zero")]
    PageSizeZero,
}

pub fn validate_project_name(name: &str) -> Result<(), ValidationError> {
    const FIELD: &str = "project name";
    if name.is_empty() {
        return Err(ValidationError::Required { field: FIELD });
    }
    if name.chars().count() < PROJECT_NAME_MIN_LEN {
        return Err(ValidationError::TooShort {
            field: FIELD,
            min: PROJECT_NAME_MIN_LEN,
        });
    }
    if !PROJECT_NAME.is_match(name) {
        return Err(ValidationError::Pattern { field: FIELD });
    }
    Ok(())
}

pub fn validate_repository_name(name: &str) -> Result<(), ValidationError> {
    const FIELD: &str = "repository name";
    if name.is_empty() {
        return Err(ValidationError::Required { field: FIELD });
    }
    if name.chars().count() > REPOSITORY_NAME_MAX_LEN {
        return Err(ValidationError::TooLong {
            field: FIELD,
            max: REPOSITORY_NAME_MAX_LEN,
        });
    }
    if !REPOSITORY_NAME.is_match(name) {
        return Err(ValidationError::Pattern { field: FIELD });
    }
    Ok(())
}

pub fn validate_tag(tag: &str) -> Result<(), ValidationError> {
    const FIELD: &str = "tag";
    if tag.is_empty() {
        return Err(ValidationError::Required { field: FIELD });
    }
    if !TAG_NAME.is_match(tag) {
        return Err(ValidationError::Pattern { field: FIELD });
    }
    Ok(())
}

pub fn validate_robot_name(name: &str) -> Result<(), ValidationError> {
    const FIELD: &str = "robot name";
    if name.trim().is_empty() {
        return Err(ValidationError::Required { field: FIELD });
    }
    if name.chars().count() > ROBOT_NAME_MAX_LEN {
        return Err(ValidationError::TooLong {
            field: FIELD,
            max: ROBOT_NAME_MAX_LEN,
        });
    }
    Ok(())
}

/// A `project/repository:tag` reference whose parts have all been validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageName {
    project: String,
    repository: String,
    tag: String,
}

impl ImageName {
    pub fn new(
        project: impl Into<String>,
        repository: impl Into<String>,
        tag: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let project = project.into();
        let repository = repository.into();
        let tag = tag.into();
        validate_project_name(&project)?;
        validate_repository_name(&repository)?;
        validate_tag(&tag)?;
        Ok(Self {
            project,
            repository,
            tag,
        })
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.project, self.repository, self.tag)
    }
}
