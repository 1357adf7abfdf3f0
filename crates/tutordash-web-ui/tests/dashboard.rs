mod common;

use common::{TestServer, location, set_cookies};
use reqwest::StatusCode;

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn sidebar_lists_only_permitted_views() {
    let server = TestServer::start().await;

    let teacher = server.driver();
    teacher.login("teacher").await;
    let body = teacher.get("/").await.text().await.unwrap();
    assert!(body.contains(r#"href="/view/class-radar""#));
    assert!(body.contains(r#"href="/view/override-panel""#));
    assert!(!body.contains(r#"href="/view/audit-log-viewer""#));

    let dpo = server.driver();
    dpo.login("dpo").await;
    let body = dpo.get("/view/audit-log-viewer").await.text().await.unwrap();
    assert!(body.contains(r#"href="/view/audit-log-viewer""#));
    assert!(!body.contains(r#"href="/view/class-radar""#));

    server.shutdown().await;
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn forbidden_view_is_denied_without_data() {
    let server = TestServer::start().await;
    let driver = server.driver();
    driver.login("dpo").await;

    // Default view is the class radar, which a DPO may not open.
    let resp = driver.get("/").await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Access denied"));
    assert!(!body.contains("Solving Linear Equations"));

    let teacher = server.driver();
    teacher.login("teacher").await;
    let resp = teacher.get("/view/audit-log-viewer").await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(!resp.text().await.unwrap().contains("log_001"));

    server.shutdown().await;
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn unknown_view_falls_back_to_default() {
    let server = TestServer::start().await;
    let driver = server.driver();
    driver.login("administrator").await;

    let resp = driver.get("/view/settings").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Class Radar"));

    server.shutdown().await;
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn class_radar_filters_rows() {
    let server = TestServer::start().await;
    let driver = server.driver();
    driver.login("teacher").await;

    let body = driver
        .get("/view/class-radar?topic=Algebra&uncertainty=high")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Solving Linear Equations"));
    assert!(body.contains("Factoring Quadratics"));
    assert!(!body.contains("Area of Triangles"));

    let body = driver
        .get("/view/class-radar?topic=Calculus&uncertainty=high")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("No data matches the selected filters."));

    server.shutdown().await;
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn class_radar_falls_back_to_demo_data() {
    let server = TestServer::start_with_unreachable_data_api().await;
    let driver = server.driver();
    driver.login("teacher").await;

    let resp = driver.get("/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Could not load class data"));
    assert!(body.contains("Solving Linear Equations"));

    let resp = driver.get("/api/class-radar").await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    server.shutdown().await;
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn student_drill_down_shows_mastery() {
    let server = TestServer::start().await;
    let driver = server.driver();
    driver.login("teacher").await;

    let body = driver
        .get("/view/student-drill-down")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Alice Smith"));
    assert!(body.contains("72.7%"));
    assert!(body.contains("62.0%"));

    let body = driver
        .get("/view/student-drill-down?student=STU-0000")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Student not found."));

    server.shutdown().await;
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn override_is_applied_and_audited() {
    let server = TestServer::start().await;

    let teacher = server.driver();
    teacher.login("teacher").await;
    let resp = teacher
        .post_form(
            "/override",
            &[
                ("hint_strictness", "80"),
                ("model_input", "simplified"),
                ("custom_feature", ""),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Overrides applied"));
    assert!(body.contains("Hint strictness: 80%"));
    assert!(body.contains("Custom feature: N/A"));

    let resp = teacher
        .post_form(
            "/override",
            &[("hint_strictness", "lots"), ("model_input", "default")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let admin = server.driver();
    admin.login("administrator").await;
    let body = admin
        .get("/view/audit-log-viewer?search=strictness+to+80")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("log_006"));
    assert!(body.contains("teacher_123"));

    server.shutdown().await;
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn override_requires_modify_settings() {
    let server = TestServer::start().await;

    let dpo = server.driver();
    dpo.login("dpo").await;
    let resp = dpo
        .post_form("/override", &[("hint_strictness", "10")])
        .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let anonymous = server.driver();
    let resp = anonymous
        .post_form("/override", &[("hint_strictness", "10")])
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");

    server.shutdown().await;
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn audit_log_filters_by_role_and_search() {
    let server = TestServer::start().await;
    let driver = server.driver();
    driver.login("dpo").await;

    let body = driver
        .get("/view/audit-log-viewer?role=Teacher&search=stu-")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("log_001"));
    assert!(body.contains("log_005"));
    assert!(!body.contains("log_004"));

    let body = driver
        .get("/view/audit-log-viewer?role=DPO&search=drill")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("No logs found matching your criteria."));

    server.shutdown().await;
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn sidebar_toggle_flips_cookie() {
    let server = TestServer::start().await;
    let driver = server.driver();
    driver.login("teacher").await;

    let body = driver.get("/").await.text().await.unwrap();
    assert!(body.contains(r#"data-state="collapsed""#));

    let resp = driver
        .post_form("/sidebar/toggle", &[("redirect", "/view/override-panel")])
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/view/override-panel");
    assert!(
        set_cookies(resp.headers())
            .iter()
            .any(|c| c.starts_with("sidebar:state=true"))
    );

    let body = driver.get("/view/override-panel").await.text().await.unwrap();
    assert!(body.contains(r#"data-state="expanded""#));

    server.shutdown().await;
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn lti_launch_is_simulated() {
    let server = TestServer::start().await;
    let driver = server.driver();

    let resp = driver.get("/lti-launch").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("oauth_consumer_key"));

    let resp = driver
        .post_form(
            "/lti-launch",
            &[
                ("lis_person_name_full", "Jane Roe"),
                ("lti_message_type", "basic-lti-launch-request"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("LTI Launch Simulated!"));
    assert!(body.contains("Jane Roe"));

    server.shutdown().await;
}

#[test_log::test(tokio::test(flavor = "multi_thread"))]
async fn html_is_not_cached_and_css_is_served() {
    let server = TestServer::start().await;
    let driver = server.driver();

    let resp = driver.get("/login").await;
    assert_eq!(
        resp.headers().get("cache-control").unwrap(),
        "no-store"
    );

    let resp = driver.get("/assets/style.css").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("cache-control").unwrap(),
        "public, max-age=600"
    );

    let resp = driver.post_form("/login", &[("role", "teacher")]).await;
    assert_eq!(
        resp.headers().get("cache-control").unwrap(),
        "no-store"
    );

    let resp = driver.get("/assets/missing.css").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_ne!(
        resp.headers().get("cache-control").map(|v| v.as_bytes()),
        Some(&b"public, max-age=3600"[..])
    );

    server.shutdown().await;
}
