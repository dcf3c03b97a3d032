use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// An entry of a user's purchased courses, with the course resolved to
/// display fields.
#[derive(Debug, Serialize)]
pub struct PurchasedCourse {
    pub course: CourseSummary,
    #[serde(rename = "purchasedAt", with = "time::serde::rfc3339")]
    pub purchased_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
}

/// Admin listing entry: user plus purchased course titles.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListItem {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub contact: String,
    pub role: String,
    pub purchased_courses: Vec<PurchasedCourse>,
}

/// Profile response; never includes credentials.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub contact: String,
    pub role: String,
    pub purchased_courses: Vec<PurchasedCourse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_serializes_camel_case_and_omits_missing_course_fields() {
        let profile = UserProfile {
            id: Uuid::new_v4(),
            email: "a@b.co".into(),
            username: "a".into(),
            contact: "+1 555 0100".into(),
            role: "user".into(),
            purchased_courses: vec![PurchasedCourse {
                course: CourseSummary {
                    id: Uuid::new_v4(),
                    title: "Robotics 101".into(),
                    img_url: None,
                    description: None,
                    price: Some(100),
                },
                purchased_at: OffsetDateTime::UNIX_EPOCH,
            }],
        };
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("purchasedCourses"));
        assert!(json.contains("purchasedAt"));
        assert!(!json.contains("imgUrl"));
        assert!(!json.contains("password"));
    }
}
