use crate::dto::lenient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub domain: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub position: String,
    #[serde(default, alias = "exp_years", deserialize_with = "lenient::u32_or_zero")]
    pub exp_years: u32,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub stack: Vec<String>,
    #[serde(default, alias = "file_name", deserialize_with = "lenient::optional_string")]
    pub file_name: Option<String>,
    #[serde(default, alias = "uploaded_by", deserialize_with = "lenient::optional_string")]
    pub uploaded_by: Option<String>,
    #[serde(default, alias = "uploaded_at", deserialize_with = "lenient::timestamp")]
    pub uploaded_at: Option<DateTime<Utc>>,
    /// Profile the server extracted from the CV. Not interpreted by the client.
    #[serde(
        default,
        rename = "cvJson",
        alias = "cv_json",
        deserialize_with = "lenient::profile"
    )]
    pub profile: JsonValue,
}

impl Candidate {
    /// Skills deduplicated and sorted for display.
    pub fn display_skills(&self) -> BTreeSet<&str> {
        self.skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// View over the candidate cache. Never sent to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFilters {
    pub domain: String,
    pub search: String,
}

#[derive(Debug, Clone, Default)]
pub struct FilterUpdate {
    pub domain: Option<String>,
    pub search: Option<String>,
}

impl CandidateFilters {
    pub fn new(domain: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            search: search.into(),
        }
    }

    pub fn merge(&mut self, update: FilterUpdate) {
        if let Some(domain) = update.domain {
            self.domain = domain;
        }
        if let Some(search) = update.search {
            self.search = search;
        }
    }

    pub fn matches(&self, candidate: &Candidate) -> bool {
        let domain_ok = self.domain.is_empty() || candidate.domain == self.domain;
        let search_ok = self.search.is_empty() || {
            let needle = self.search.to_lowercase();
            candidate.name.to_lowercase().contains(&needle)
                || candidate.position.to_lowercase().contains(&needle)
        };
        domain_ok && search_ok
    }

    pub fn apply(&self, candidates: &[Candidate]) -> Vec<Candidate> {
        candidates
            .iter()
            .filter(|c| self.matches(c))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn candidate(id: i64, name: &str, domain: &str, position: &str) -> Candidate {
        Candidate {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            phone: None,
            domain: domain.to_string(),
            position: position.to_string(),
            exp_years: 3,
            skills: vec![],
            stack: vec![],
            file_name: None,
            uploaded_by: None,
            uploaded_at: None,
            profile: JsonValue::Null,
        }
    }
}
