use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;
use uuid::Uuid;

/// Cookie carrying the classroom session id.
pub const SESSION_COOKIE: &str = "session_id";
/// Cookie carrying the caller's role tag (`teacher` or `student`).
pub const ROLE_COOKIE: &str = "role";
/// Cookie carrying the student id; only set for students.
pub const STUDENT_COOKIE: &str = "student_id";

pub const TEACHER_ROLE: &str = "teacher";
pub const STUDENT_ROLE: &str = "student";

fn identity_cookie(name: &'static str, value: String, max_age_hours: i64) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::hours(max_age_hours))
        .build()
}

/// Attach the identity cookies for a freshly logged-in caller.
pub fn grant_identity(
    jar: CookieJar,
    session_id: Uuid,
    role: &'static str,
    student_id: Option<Uuid>,
    max_age_hours: i64,
) -> CookieJar {
    let mut jar = jar
        .add(identity_cookie(
            SESSION_COOKIE,
            session_id.to_string(),
            max_age_hours,
        ))
        .add(identity_cookie(ROLE_COOKIE, role.to_owned(), max_age_hours));

    if let Some(id) = student_id {
        jar = jar.add(identity_cookie(
            STUDENT_COOKIE,
            id.to_string(),
            max_age_hours,
        ));
    }

    jar
}

/// Remove all three identity cookies; this logs the caller out.
pub fn clear_identity(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/").build())
        .remove(Cookie::build(ROLE_COOKIE).path("/").build())
        .remove(Cookie::build(STUDENT_COOKIE).path("/").build())
}
