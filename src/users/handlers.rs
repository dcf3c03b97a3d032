use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        claims::Role,
        extractors::{AdminUser, AuthUser},
        repo::User,
    },
    state::AppState,
};

use super::dto::{CourseSummary, PurchasedCourse, UserListItem, UserProfile};
use super::repo;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user))
        .route("/users/:id", delete(delete_user))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
) -> Result<Json<Vec<UserListItem>>, (StatusCode, String)> {
    let rows = repo::list_with_enrollments(&state.db)
        .await
        .map_err(internal)?;
    Ok(Json(fold_user_rows(rows)))
}

/// Folds the joined user/enrollment rows into one entry per user,
/// preserving first-seen order. Does not rely on rows for a user being
/// adjacent.
fn fold_user_rows(rows: Vec<repo::UserEnrollmentRow>) -> Vec<UserListItem> {
    let mut items: Vec<UserListItem> = Vec::new();
    for row in rows {
        let idx = match items.iter().position(|u| u.id == row.id) {
            Some(idx) => idx,
            None => {
                items.push(UserListItem {
                    id: row.id,
                    email: row.email,
                    username: row.username,
                    contact: row.contact,
                    role: row.role,
                    purchased_courses: Vec::new(),
                });
                items.len() - 1
            }
        };
        if let (Some(course_id), Some(title), Some(purchased_at)) =
            (row.course_id, row.course_title, row.purchased_at)
        {
            items[idx].purchased_courses.push(PurchasedCourse {
                course: CourseSummary {
                    id: course_id,
                    title,
                    img_url: None,
                    description: None,
                    price: None,
                },
                purchased_at,
            });
        }
    }
    items
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserProfile>, (StatusCode, String)> {
    // Only the user themselves or an admin may read a profile.
    if caller.id != id && caller.role != Role::Admin {
        warn!(caller = %caller.id, target = %id, "profile access denied");
        return Err((StatusCode::FORBIDDEN, "Access denied: not your profile".into()));
    }

    let user = match User::find_by_id(&state.db, id).await {
        Ok(Some(u)) => u,
        Ok(None) => return Err((StatusCode::NOT_FOUND, "User not found".into())),
        Err(e) => {
            error!(error = %e, %id, "find_by_id failed");
            return Err(internal(e));
        }
    };

    let courses = repo::purchased_courses(&state.db, id)
        .await
        .map_err(internal)?;

    Ok(Json(UserProfile {
        id: user.id,
        email: user.email,
        username: user.username,
        contact: user.contact,
        role: user.role,
        purchased_courses: courses
            .into_iter()
            .map(|c| PurchasedCourse {
                course: CourseSummary {
                    id: c.course_id,
                    title: c.title,
                    img_url: Some(c.img_url),
                    description: Some(c.description),
                    price: Some(c.price),
                },
                purchased_at: c.purchased_at,
            })
            .collect(),
    }))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(_admin_id): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    match repo::delete(&state.db, id).await {
        Ok(true) => {
            info!(user_id = %id, "user deleted");
            Ok(Json(serde_json::json!({ "message": "User deleted successfully" })))
        }
        Ok(false) => Err((StatusCode::NOT_FOUND, "User not found".into())),
        Err(e) => {
            error!(error = %e, %id, "delete_user failed");
            Err(internal(e))
        }
    }
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo::UserEnrollmentRow;
    use time::OffsetDateTime;

    fn row(user_id: Uuid, username: &str, course: Option<(Uuid, &str)>) -> UserEnrollmentRow {
        UserEnrollmentRow {
            id: user_id,
            email: format!("{username}@example.com"),
            username: username.into(),
            contact: "+1 555 0100".into(),
            role: "user".into(),
            course_id: course.map(|(id, _)| id),
            course_title: course.map(|(_, title)| title.to_string()),
            purchased_at: course.map(|_| OffsetDateTime::UNIX_EPOCH),
        }
    }

    #[test]
    fn fold_groups_interleaved_rows_by_user() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let c1 = Uuid::new_v4();
        let c2 = Uuid::new_v4();
        // Two users with identical created_at can interleave in the join.
        let rows = vec![
            row(alice, "alice", Some((c1, "Robotics 101"))),
            row(bob, "bob", None),
            row(alice, "alice", Some((c2, "Welding"))),
        ];

        let items = fold_user_rows(rows);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].username, "alice");
        assert_eq!(items[0].purchased_courses.len(), 2);
        assert_eq!(items[0].purchased_courses[1].course.title, "Welding");
        assert_eq!(items[1].username, "bob");
        assert!(items[1].purchased_courses.is_empty());
    }

    #[test]
    fn fold_keeps_user_without_enrollments() {
        let id = Uuid::new_v4();
        let items = fold_user_rows(vec![row(id, "solo", None)]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, id);
        assert!(items[0].purchased_courses.is_empty());
    }
}
