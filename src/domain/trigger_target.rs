use serde::Deserialize;
use std::fmt;

/// A downstream repository and branch whose build should be requested.
///
/// `owner` and `repo` form the Travis repository slug `owner/repo`, so neither
/// may contain a `/` or whitespace. All three parts must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerTarget {
    owner: String,
    repo: String,
    branch: String,
}

impl TriggerTarget {
    /// Creates a new `TriggerTarget` instance.
    ///
    /// # Examples
    ///
    /// ```
    /// use trigger_dependants::domain::TriggerTarget;
    ///
    /// let target = TriggerTarget::new("vladfaust", "crystalworld", "master").unwrap();
    /// assert_eq!(target.to_string(), "vladfaust/crystalworld@master");
    /// ```
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
    ) -> Result<Self, String> {
        let target = TriggerTarget {
            owner: owner.into().trim().to_string(),
            repo: repo.into().trim().to_string(),
            branch: branch.into().trim().to_string(),
        };
        target.validate()?;
        Ok(target)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    fn validate(&self) -> Result<(), String> {
        for (name, value) in [("owner", &self.owner), ("repo", &self.repo)] {
            if value.is_empty() {
                return Err(format!("Trigger target {name} must not be empty"));
            }
            if value.contains('/') || value.chars().any(char::is_whitespace) {
                return Err(format!(
                    "Trigger target {name} '{value}' must not contain '/' or whitespace"
                ));
            }
        }
        if self.branch.is_empty() {
            return Err("Trigger target branch must not be empty".to_string());
        }
        Ok(())
    }
}

impl fmt::Display for TriggerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repo, self.branch)
    }
}

impl<'de> Deserialize<'de> for TriggerTarget {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawTarget {
            owner: String,
            repo: String,
            branch: String,
        }

        let raw = RawTarget::deserialize(deserializer)?;
        TriggerTarget::new(raw.owner, raw.repo, raw.branch).map_err(serde::de::Error::custom)
    }
}
