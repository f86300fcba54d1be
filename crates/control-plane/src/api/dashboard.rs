// Dashboard API routes
// Decision: Figures are fixed sample values until candidate and job collections exist

use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::auth::{AuthState, AuthUser};

/// Headline counters shown on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_candidates: u32,
    pub active_jobs: u32,
    pub interviews_scheduled: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityItem {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub recent_activity: Vec<ActivityItem>,
}

/// Create dashboard routes
pub fn routes(state: AuthState) -> Router {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .with_state(state)
}

// TODO: count from the candidates/jobs/interviews collections once they are modeled
fn sample_dashboard() -> DashboardResponse {
    DashboardResponse {
        stats: DashboardStats {
            total_candidates: 150,
            active_jobs: 25,
            interviews_scheduled: 12,
        },
        recent_activity: vec![
            ActivityItem {
                id: 1,
                kind: "interview".to_string(),
                title: "New interview scheduled".to_string(),
            },
            ActivityItem {
                id: 2,
                kind: "candidate".to_string(),
                title: "New candidate applied".to_string(),
            },
        ],
    }
}

/// GET /dashboard - Summary for the signed-in user
pub async fn get_dashboard(user: AuthUser) -> Json<DashboardResponse> {
    tracing::debug!(user_id = %user.id, "Dashboard requested");
    Json(sample_dashboard())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_wire_format() {
        let json = serde_json::to_value(sample_dashboard()).unwrap();
        assert_eq!(json["stats"]["totalCandidates"], 150);
        assert_eq!(json["stats"]["activeJobs"], 25);
        assert_eq!(json["stats"]["interviewsScheduled"], 12);
        assert_eq!(json["recentActivity"][0]["type"], "interview");
        assert_eq!(json["recentActivity"][1]["title"], "New candidate applied");
    }
}
