use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::types::DashboardSummary;

impl ApiClient {
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, ApiError> {
        self.send(ApiRequest::get("dashboard/summary")).await?.json()
    }
}

#[cfg(test)]
mod tests {
    use crate::client::testing::{client, QueueTransport, StubRefresher};

    #[tokio::test]
    async fn summary_counters_parse() {
        let body = r#"{"activeCourses": 4, "pendingAssignments": 2, "unreadNotifications": 9}"#;
        let transport = QueueTransport::new(vec![(200, body)]);
        let api = client(transport, StubRefresher::ok("unused"));

        let summary = api.dashboard_summary().await.unwrap();

        assert_eq!(summary.active_courses, 4);
        assert_eq!(summary.unread_notifications, 9);
        assert!(summary.generated_at.is_none());
    }
}
