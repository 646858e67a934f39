use recruitment_client::{
    config::{get_config, init_config},
    dto::auth_dto::LoginPayload,
    middleware::GuardDecision,
    routes::Route,
    AppState,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    init_config()?;
    let config = get_config()?;
    info!(api = %config.api_base_url, "Starting recruitment client");

    let state = AppState::new(config)?;

    if !state.auth.is_authenticated() {
        match (std::env::var("HR_EMAIL"), std::env::var("HR_PASSWORD")) {
            (Ok(email), Ok(password)) => {
                if let Err(e) = state.auth.login(LoginPayload::new(email, password)).await {
                    anyhow::bail!("Login failed: {}", e);
                }
            }
            _ => tracing::warn!("No saved session and HR_EMAIL/HR_PASSWORD not set"),
        }
    }

    if let GuardDecision::Redirect(route) = state.guard.evaluate(&Route::HOME) {
        info!(%route, "Sign in required");
        return Ok(());
    }

    let (candidates, jobs) = tokio::join!(state.candidates.fetch_all(), state.jobs.fetch_all());
    if let Err(e) = candidates.and(jobs) {
        tracing::error!(error = ?e, "Initial load failed");
    }

    info!(
        candidates = state.candidates.list().len(),
        jobs = state.jobs.list().len(),
        "Workspace loaded"
    );
    for job in state.jobs.list() {
        if let Some(best) = job.ranked_matches().first() {
            info!(job = %job.title, candidate = %best.candidate_name, score = best.match_score, band = ?best.band(), "Top match");
        }
    }

    if let Some(question) = std::env::args().nth(1) {
        match state.chat.send(question, None).await {
            Ok(reply) => info!(reply = %reply.message, "Assistant"),
            Err(e) => tracing::error!(error = ?e, "Assistant unavailable"),
        }
    }

    for notification in state.notifications.list() {
        info!(severity = ?notification.severity, message = %notification.message, "Notification");
    }

    Ok(())
}
