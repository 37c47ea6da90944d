use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,
    Instructor,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Payload returned by `auth/login` and persisted into the session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub refresh_token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default)]
    pub enrolled: bool,
}

/// Standard pagination envelope used by the list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total_pages: u32,
    pub total_items: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumThread {
    pub id: String,
    pub title: String,
    pub author: String,
    pub reply_count: u32,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumPost {
    pub id: String,
    pub author: String,
    pub body: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub active_courses: u32,
    pub pending_assignments: u32,
    pub unread_notifications: u32,
    #[serde(default)]
    pub generated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    pub id: String,
    pub file_name: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_parses_camel_case_wire_shape() {
        let raw = r#"{
            "token": "abc",
            "refreshToken": "r1",
            "user": {
                "id": "u1",
                "name": "Ada",
                "email": "ada@campus.test",
                "role": "instructor"
            }
        }"#;
        let parsed: LoginResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.refresh_token, "r1");
        assert_eq!(parsed.user.role, UserRole::Instructor);
        assert!(parsed.user.avatar_url.is_none());
    }

    #[test]
    fn page_envelope_parses() {
        let raw = r#"{
            "items": [{"id": "c1", "title": "Rust 101"}],
            "page": 1,
            "totalPages": 3,
            "totalItems": 25
        }"#;
        let parsed: Page<Course> = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.items.len(), 1);
        assert!(!parsed.items[0].enrolled);
        assert_eq!(parsed.total_pages, 3);
    }
}
