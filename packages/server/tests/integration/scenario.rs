//! End-to-end classroom walkthrough: a teacher opens a session, students
//! join, one generates a video, and the dashboard catches up.

use common::SubmissionStatus;
use serde_json::json;

use crate::common::{TestApp, processing_body, routes, succeed_body};

#[tokio::test]
async fn classroom_walkthrough() {
    let app = TestApp::spawn().await;

    // Teacher opens the classroom.
    let (teacher, code) = app.login_teacher("ms_frizzle").await;

    // Alice joins; a second Alice is turned away.
    let alice = app.join_student(&code, "Alice").await;
    let impostor = app.new_client();
    let res = app
        .post(
            &impostor,
            routes::STUDENT_LOGIN,
            &json!({ "classroom_code": code, "name": "Alice" }),
        )
        .await;
    assert_eq!(res.status, 409);

    // Alice submits a text prompt; the provider accepts it.
    app.stub_provider_accepts("text2video", "task-777").await;
    let res = app
        .post(
            &alice,
            routes::TEXT2VIDEO,
            &json!({ "model": "kling-v1", "prompt": "a paper boat on a rainy street" }),
        )
        .await;
    assert_eq!(res.status, 200);
    let task_id = res.body["data"]["task_id"].as_str().unwrap().to_string();

    // The dashboard already shows the pending submission.
    let res = app.get(&teacher, routes::ACTIVITY).await;
    let feed = res.body["submissions"].as_array().unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["status"], "PENDING");
    assert_eq!(feed[0]["student"]["username"], "Alice");

    // First poll: still processing, the stored row stays pending.
    app.stub_status_once("text2video", &task_id, processing_body(&task_id))
        .await;
    let res = app
        .get(&alice, &routes::task_status("text2video", &task_id))
        .await;
    assert_eq!(res.body["data"]["task_status"], "processing");

    // Second poll: done. The row flips to success with the video URL.
    let url = "https://cdn.example/boat.mp4";
    app.stub_status_once("text2video", &task_id, succeed_body(&task_id, url))
        .await;
    let res = app
        .get(&alice, &routes::task_status("text2video", &task_id))
        .await;
    assert_eq!(res.body["data"]["task_status"], "succeed");

    // The teacher's next refresh reflects the finished video.
    let res = app.get(&teacher, routes::ACTIVITY).await;
    let feed = res.body["submissions"].as_array().unwrap();
    assert_eq!(feed[0]["status"], json!(SubmissionStatus::Success));
    assert_eq!(feed[0]["video_url"], url);

    // Alice is still on the active roster.
    assert_eq!(res.body["students"][0]["username"], "Alice");
}
