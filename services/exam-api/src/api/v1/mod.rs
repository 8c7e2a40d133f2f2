//! API v1 routes.

mod courses;
mod exams;
mod rooms;
mod seating;
mod students;

use axum::Router;

use crate::state::AppState;

/// Create API v1 routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/courses", courses::routes())
        // Seating operations live under an exam: /v1/exams/{exam_id}/allocation
        .nest("/exams", exams::routes().merge(seating::routes()))
        .nest("/rooms", rooms::routes())
        .nest("/students", students::routes())
}
