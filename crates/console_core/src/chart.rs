use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartStatus {
    Active,
    Deprecated,
}

impl ChartStatus {
    pub fn from_deprecated(deprecated: bool) -> Self {
        if deprecated {
            ChartStatus::Deprecated
        } else {
            ChartStatus::Active
        }
    }
}

impl fmt::Display for ChartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartStatus::Active => f.write_str("Active"),
            ChartStatus::Deprecated => f.write_str("Deprecated"),
        }
    }
}

/// How the maintainers column of a chart version is summarised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaintainerSummary {
    Single(String),
    Several { first: String, count: usize },
}

impl MaintainerSummary {
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Option<Self> {
        let first = names.first()?.as_ref().to_string();
        if names.len() == 1 {
            Some(MaintainerSummary::Single(first))
        } else {
            Some(MaintainerSummary::Several {
                first,
                count: names.len(),
            })
        }
    }
}

impl fmt::Display for MaintainerSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaintainerSummary::Single(name) => f.write_str(name),
            MaintainerSummary::Several { first, count } => {
                write!(f, "{first} and {} others", count - 1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_deprecated_flag() {
        assert_eq!(ChartStatus::from_deprecated(true), ChartStatus::Deprecated);
        assert_eq!(ChartStatus::from_deprecated(false).to_string(), "Active");
    }

    #[test]
    fn maintainers_are_summarised() {
        let none: [&str; 0] = [];
        assert_eq!(MaintainerSummary::from_names(&none), None);
        assert_eq!(
            MaintainerSummary::from_names(&["ana"]),
            Some(MaintainerSummary::Single("ana".into()))
        );
        let several = MaintainerSummary::from_names(&["ana", "bo", "cy"]).unwrap();
        assert_eq!(several.to_string(), "ana and 2 others");
    }
}
