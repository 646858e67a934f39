use serde::Serialize;
use validator::Validate;

pub const DEFAULT_FIELD: &str = "tech";

/// Job definition sent to create-and-match.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateJobPayload {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub field: String,
    #[validate(length(min = 1, message = "Position is required"))]
    pub position: String,
    pub required_skills: Vec<String>,
    pub min_exp_years: u32,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

impl Default for CreateJobPayload {
    fn default() -> Self {
        Self {
            title: String::new(),
            field: DEFAULT_FIELD.to_string(),
            position: String::new(),
            required_skills: Vec::new(),
            min_exp_years: 1,
            description: String::new(),
        }
    }
}

impl CreateJobPayload {
    /// Appends a trimmed skill unless it is empty or already listed. Returns whether it was added.
    pub fn add_skill(&mut self, skill: &str) -> bool {
        let skill = skill.trim();
        if skill.is_empty() || self.required_skills.iter().any(|s| s == skill) {
            return false;
        }
        self.required_skills.push(skill.to_string());
        true
    }

    pub fn remove_skill(&mut self, skill: &str) {
        self.required_skills.retain(|s| s != skill);
    }
}
