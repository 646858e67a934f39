use std::fmt;

/// Client surfaces a navigation intent can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Candidates,
    CandidateDetail(i64),
    Jobs,
    JobDetail(i64),
    Assistant,
}

impl Route {
    /// Landing surface after a successful sign-in.
    pub const HOME: Route = Route::Candidates;

    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["login"] => Some(Route::Login),
            [] | ["candidates"] => Some(Route::Candidates),
            ["candidates", id] => id.parse().ok().map(Route::CandidateDetail),
            ["jobs"] => Some(Route::Jobs),
            ["jobs", id] => id.parse().ok().map(Route::JobDetail),
            ["assistant"] => Some(Route::Assistant),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Candidates => "/candidates".to_string(),
            Route::CandidateDetail(id) => format!("/candidates/{}", id),
            Route::Jobs => "/jobs".to_string(),
            Route::JobDetail(id) => format!("/jobs/{}", id),
            Route::Assistant => "/assistant".to_string(),
        }
    }

    pub fn is_login(&self) -> bool {
        matches!(self, Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
