use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use server::entity::{classroom_session, student};

use crate::common::{TestApp, routes};

mod teacher_login {
    use super::*;

    #[tokio::test]
    async fn successful_login_opens_a_session_with_an_8_digit_code() {
        let app = TestApp::spawn().await;

        let (client, code) = app.login_teacher("ms_frizzle").await;

        assert_eq!(code.len(), 8);
        assert!(code.bytes().all(|b| b.is_ascii_digit()));

        let res = app.get(&client, routes::SESSION).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["user"]["role"], "teacher");
        assert_eq!(res.body["user"]["username"], "ms_frizzle");
        assert_eq!(res.body["session"]["classroom_code"], code);
    }

    #[tokio::test]
    async fn rejected_credentials_yield_401() {
        let app = TestApp::spawn().await;

        Mock::given(method("POST"))
            .and(path("/verify"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&app.verifier)
            .await;

        let client = app.new_client();
        let res = app
            .post(
                &client,
                routes::TEACHER_LOGIN,
                &json!({ "username": "ms_frizzle", "password": "wrong" }),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn verifier_success_false_also_yields_401() {
        let app = TestApp::spawn().await;

        Mock::given(method("POST"))
            .and(path("/verify"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "success": false, "user": null })),
            )
            .mount(&app.verifier)
            .await;

        let client = app.new_client();
        let res = app
            .post(
                &client,
                routes::TEACHER_LOGIN,
                &json!({ "username": "ms_frizzle", "password": "expired" }),
            )
            .await;

        assert_eq!(res.status, 401);
    }

    #[tokio::test]
    async fn second_login_deactivates_the_previous_session() {
        let app = TestApp::spawn().await;

        let (first_client, first_code) = app.login_teacher("ms_frizzle").await;
        let (_second_client, second_code) = app.login_teacher("ms_frizzle").await;

        assert_ne!(first_code, second_code);

        // At most one active session per teacher.
        let active = classroom_session::Entity::find()
            .filter(classroom_session::Column::IsActive.eq(true))
            .all(&app.db)
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].classroom_code, second_code);

        // The superseded session is stamped with an end time.
        let ended = classroom_session::Entity::find()
            .filter(classroom_session::Column::ClassroomCode.eq(&first_code))
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert!(!ended.is_active);
        assert!(ended.ended_at.is_some());

        // The first browser's cookies now point at a dead session.
        let res = app.get(&first_client, routes::SESSION).await;
        assert_eq!(res.status, 401);
    }

    #[tokio::test]
    async fn code_collision_is_reported_without_poisoning_the_transaction() {
        use sea_orm::TransactionTrait;
        use server::entity::teacher;
        use server::handlers::auth::try_create_session;

        let app = TestApp::spawn().await;
        app.login_teacher("ms_frizzle").await;

        let teacher = teacher::Entity::find()
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();

        let txn = app.db.begin().await.unwrap();

        let first = try_create_session(&txn, teacher.id, "31415926".into())
            .await
            .unwrap();
        assert!(first.is_some());

        // Two logins racing for the same code: a collision, not a 500.
        let second = try_create_session(&txn, teacher.id, "31415926".into())
            .await
            .unwrap();
        assert!(second.is_none());

        // The transaction is still usable after the rolled-back insert.
        let third = try_create_session(&txn, teacher.id, "27182818".into())
            .await
            .unwrap();
        assert!(third.is_some());

        txn.commit().await.unwrap();
    }
}

mod student_login {
    use super::*;

    #[tokio::test]
    async fn code_of_wrong_length_is_rejected_before_any_lookup() {
        let app = TestApp::spawn().await;

        let client = app.new_client();
        let res = app
            .post(
                &client,
                routes::STUDENT_LOGIN,
                &json!({ "classroom_code": "1234567", "name": "Alice" }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn non_numeric_code_is_rejected() {
        let app = TestApp::spawn().await;

        let client = app.new_client();
        let res = app
            .post(
                &client,
                routes::STUDENT_LOGIN,
                &json!({ "classroom_code": "12E45678", "name": "Alice" }),
            )
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn unknown_code_yields_404() {
        let app = TestApp::spawn().await;

        let client = app.new_client();
        let res = app
            .post(
                &client,
                routes::STUDENT_LOGIN,
                &json!({ "classroom_code": "00000000", "name": "Alice" }),
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn ended_session_code_yields_404() {
        let app = TestApp::spawn().await;
        let (teacher, code) = app.login_teacher("ms_frizzle").await;

        let res = app.post(&teacher, routes::SESSION_END, &json!({})).await;
        assert_eq!(res.status, 200);

        let client = app.new_client();
        let res = app
            .post(
                &client,
                routes::STUDENT_LOGIN,
                &json!({ "classroom_code": code, "name": "Alice" }),
            )
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn joining_sets_a_student_identity() {
        let app = TestApp::spawn().await;
        let (_teacher, code) = app.login_teacher("ms_frizzle").await;

        let alice = app.join_student(&code, "Alice").await;

        let res = app.get(&alice, routes::SESSION).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["user"]["role"], "student");
        assert_eq!(res.body["user"]["username"], "Alice");
    }

    #[tokio::test]
    async fn duplicate_nickname_in_the_same_session_conflicts() {
        let app = TestApp::spawn().await;
        let (_teacher, code) = app.login_teacher("ms_frizzle").await;
        let _alice = app.join_student(&code, "Alice").await;

        let client = app.new_client();
        let res = app
            .post(
                &client,
                routes::STUDENT_LOGIN,
                &json!({ "classroom_code": code, "name": "Alice" }),
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "NICKNAME_TAKEN");
    }

    #[tokio::test]
    async fn same_nickname_is_fine_in_a_different_session() {
        let app = TestApp::spawn().await;

        let (_t1, code1) = app.login_teacher("ms_frizzle").await;
        let (_t2, code2) = app.login_teacher("mr_keating").await;

        let _a1 = app.join_student(&code1, "Alice").await;
        let _a2 = app.join_student(&code2, "Alice").await;
    }

    #[tokio::test]
    async fn removed_student_cannot_rejoin_under_the_same_nickname() {
        let app = TestApp::spawn().await;
        let (_teacher, code) = app.login_teacher("ms_frizzle").await;
        let _alice = app.join_student(&code, "Alice").await;

        // The teacher removed Alice from the session.
        let alice_row = student::Entity::find()
            .filter(student::Column::Username.eq("Alice"))
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        let mut update: student::ActiveModel = alice_row.into();
        update.status = Set(common::StudentStatus::Removed);
        update.update(&app.db).await.unwrap();

        let client = app.new_client();
        let res = app
            .post(
                &client,
                routes::STUDENT_LOGIN,
                &json!({ "classroom_code": code, "name": "Alice" }),
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "STUDENT_REMOVED");
    }
}

mod session {
    use super::*;

    #[tokio::test]
    async fn anonymous_session_query_yields_401() {
        let app = TestApp::spawn().await;

        let client = app.new_client();
        let res = app.get(&client, routes::SESSION).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "NOT_AUTHENTICATED");
    }

    #[tokio::test]
    async fn students_cannot_end_the_session() {
        let app = TestApp::spawn().await;
        let (_teacher, code) = app.login_teacher("ms_frizzle").await;
        let alice = app.join_student(&code, "Alice").await;

        let res = app.post(&alice, routes::SESSION_END, &json!({})).await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn ending_a_session_logs_the_teacher_out() {
        let app = TestApp::spawn().await;
        let (teacher, _code) = app.login_teacher("ms_frizzle").await;

        let res = app.post(&teacher, routes::SESSION_END, &json!({})).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["success"], true);

        let res = app.get(&teacher, routes::SESSION).await;
        assert_eq!(res.status, 401);
    }

    #[tokio::test]
    async fn students_of_an_ended_session_lose_their_identity() {
        let app = TestApp::spawn().await;
        let (teacher, code) = app.login_teacher("ms_frizzle").await;
        let alice = app.join_student(&code, "Alice").await;

        app.post(&teacher, routes::SESSION_END, &json!({})).await;

        let res = app.get(&alice, routes::SESSION).await;
        assert_eq!(res.status, 401);
    }
}

mod activity {
    use super::*;

    #[tokio::test]
    async fn students_cannot_read_the_activity_feed() {
        let app = TestApp::spawn().await;
        let (_teacher, code) = app.login_teacher("ms_frizzle").await;
        let alice = app.join_student(&code, "Alice").await;

        let res = app.get(&alice, routes::ACTIVITY).await;

        assert_eq!(res.status, 403);
    }

    #[tokio::test]
    async fn feed_lists_active_students() {
        let app = TestApp::spawn().await;
        let (teacher, code) = app.login_teacher("ms_frizzle").await;
        let _alice = app.join_student(&code, "Alice").await;
        let _bob = app.join_student(&code, "Bob").await;

        let res = app.get(&teacher, routes::ACTIVITY).await;

        assert_eq!(res.status, 200);
        let students = res.body["students"].as_array().unwrap();
        assert_eq!(students.len(), 2);
        assert!(res.body["submissions"].as_array().unwrap().is_empty());
    }
}

mod health {
    use super::*;

    #[tokio::test]
    async fn health_reports_credentials_and_database() {
        let app = TestApp::spawn().await;

        let client = app.new_client();
        let res = app.get(&client, routes::HEALTH).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "ok");
        assert_eq!(res.body["has_provider_credentials"], true);
        assert_eq!(res.body["db"], "connected");
    }

    #[tokio::test]
    async fn health_flags_missing_provider_credentials() {
        let app = TestApp::spawn_without_provider_credentials().await;

        let client = app.new_client();
        let res = app.get(&client, routes::HEALTH).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["has_provider_credentials"], false);
    }
}
