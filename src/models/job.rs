use crate::dto::lenient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescription {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub field: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub position: String,
    /// Authoring order is preserved.
    #[serde(default, alias = "required_skills", deserialize_with = "lenient::string_list")]
    pub required_skills: Vec<String>,
    #[serde(default, alias = "min_exp_years", deserialize_with = "lenient::u32_or_zero")]
    pub min_exp_years: u32,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, alias = "created_at", deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "created_by", deserialize_with = "lenient::optional_string")]
    pub created_by: Option<String>,
    #[serde(default, alias = "match_results", deserialize_with = "match_results")]
    pub match_results: Vec<MatchResult>,
}

impl JobDescription {
    /// Matches ordered by descending score; ties keep server order.
    pub fn ranked_matches(&self) -> Vec<&MatchResult> {
        let mut ranked: Vec<&MatchResult> = self.match_results.iter().collect();
        ranked.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
        ranked
    }
}

fn match_results<'de, D>(deserializer: D) -> Result<Vec<MatchResult>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<MatchResult>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Score of one candidate against one job, computed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub id: i64,
    #[serde(default, alias = "candidate_id", deserialize_with = "lenient::optional_id")]
    pub candidate_id: Option<i64>,
    #[serde(default, alias = "candidate_name", deserialize_with = "lenient::string")]
    pub candidate_name: String,
    #[serde(default, alias = "candidate_email", deserialize_with = "lenient::string")]
    pub candidate_email: String,
    #[serde(default, alias = "candidate_position", deserialize_with = "lenient::string")]
    pub candidate_position: String,
    #[serde(default, alias = "match_score", deserialize_with = "lenient::score")]
    pub match_score: f64,
    #[serde(default, alias = "match_reasons", deserialize_with = "lenient::string_list")]
    pub match_reasons: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub gaps: Vec<String>,
    #[serde(default, alias = "matched_at", deserialize_with = "lenient::timestamp")]
    pub matched_at: Option<DateTime<Utc>>,
}

impl MatchResult {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::of(self.match_score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Strong,
    Partial,
    Weak,
}

impl ScoreBand {
    pub fn of(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBand::Strong
        } else if score >= 60.0 {
            ScoreBand::Partial
        } else {
            ScoreBand::Weak
        }
    }
}
