use reqwest::{Method, StatusCode};

use serde_json::{json, Value};

use sqlx::PgPool;

use crate::helpers::{alert_header, assert_bad_request, TestApp};

const DEFAULT_PROBLEM_NAME: &str = "AAAAAAAAAA";
const UPDATED_PROBLEM_NAME: &str = "BBBBBBBBBB";
const DEFAULT_PROBLEM_LINK: &str = "AAAAAAAAAA";
const UPDATED_PROBLEM_LINK: &str = "BBBBBBBBBB";
const DEFAULT_START: &str = "1970-01-01T00:00:00Z";
const DEFAULT_END: &str = "1970-01-01T00:00:00Z";
const UPDATED_END: &str = "2023-05-01T18:30:00Z";

fn default_practice() -> Value {
    json!({
        "problemName": DEFAULT_PROBLEM_NAME,
        "problemLink": DEFAULT_PROBLEM_LINK,
        "start": DEFAULT_START,
        "end": DEFAULT_END,
        "result": "PASS"
    })
}

async fn practice_count(pool: &PgPool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>("select count(*) from practice")
        .fetch_one(pool)
        .await
}

#[sqlx::test]
async fn create_stores_practice(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app
        .send_json(Method::POST, "api/practices", &default_practice())
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::CREATED, res.status());
    let location = res.headers().get("location").cloned().expect("Missing location header");
    let body: Value = res.json().await.unwrap();
    let id = body["id"].as_i64().unwrap();
    assert_eq!(location, format!("/api/practices/{}", id).as_str());

    let (name, link, result) = sqlx::query_as::<_, (String, String, Option<String>)>(
        "select problem_name, problem_link, result from practice where id=$1",
    )
    .bind(id)
    .fetch_one(&pool)
    .await?;

    assert_eq!(DEFAULT_PROBLEM_NAME, name);
    assert_eq!(DEFAULT_PROBLEM_LINK, link);
    assert_eq!(Some("PASS".to_string()), result);
    assert_eq!(DEFAULT_START, body["start"]);
    assert_eq!("PASS", body["result"]);

    Ok(())
}

#[sqlx::test]
async fn create_rejects_invalid_bodies(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let test_cases = vec![
        ("missing problem name", json!({ "problemLink": DEFAULT_PROBLEM_LINK })),
        ("missing problem link", json!({ "problemName": DEFAULT_PROBLEM_NAME })),
        (
            "blank problem name",
            json!({ "problemName": "  ", "problemLink": DEFAULT_PROBLEM_LINK }),
        ),
        (
            "unknown result",
            json!({
                "problemName": DEFAULT_PROBLEM_NAME,
                "problemLink": DEFAULT_PROBLEM_LINK,
                "result": "MAYBE"
            }),
        ),
        (
            "malformed timestamp",
            json!({
                "problemName": DEFAULT_PROBLEM_NAME,
                "problemLink": DEFAULT_PROBLEM_LINK,
                "start": "yesterday"
            }),
        ),
        (
            "existing id",
            json!({
                "id": 1,
                "problemName": DEFAULT_PROBLEM_NAME,
                "problemLink": DEFAULT_PROBLEM_LINK
            }),
        ),
    ];

    for (desc, body) in test_cases {
        let res = app
            .send_json(Method::POST, "api/practices", &body)
            .await
            .expect("Failed to execute request");

        assert_eq!(StatusCode::BAD_REQUEST, res.status(), "API accepted {}", desc);
    }

    assert_eq!(0, practice_count(&pool).await?);

    Ok(())
}

#[sqlx::test]
async fn create_rejects_text_longer_than_column(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let test_cases = vec![
        (
            "256 char problem name",
            json!({ "problemName": "a".repeat(256), "problemLink": DEFAULT_PROBLEM_LINK }),
        ),
        (
            "256 char problem link",
            json!({ "problemName": DEFAULT_PROBLEM_NAME, "problemLink": "a".repeat(256) }),
        ),
        (
            "255 graphemes of 2 chars each",
            json!({ "problemName": "e\u{301}".repeat(255), "problemLink": DEFAULT_PROBLEM_LINK }),
        ),
    ];

    for (desc, body) in test_cases {
        let res = app
            .send_json(Method::POST, "api/practices", &body)
            .await
            .expect("Failed to execute request");

        let problem = assert_bad_request(res, desc).await;
        assert_eq!(400, problem["status"]);
    }

    assert_eq!(0, practice_count(&pool).await?);

    Ok(())
}

#[sqlx::test]
async fn create_accepts_text_at_column_width(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let name = "ё".repeat(255);

    let id = app
        .create_practice(&json!({ "problemName": name, "problemLink": "a".repeat(255) }))
        .await;

    let stored = sqlx::query_scalar::<_, String>("select problem_name from practice where id=$1")
        .bind(id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(name, stored);

    Ok(())
}

#[sqlx::test]
async fn create_with_unknown_session_is_rejected(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let mut body = default_practice();
    body["practiceSession"] = json!({ "id": 4242 });

    let res = app
        .send_json(Method::POST, "api/practices", &body)
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    let body: Value = res.json().await.unwrap();
    assert_eq!("practiceSession", body["entityName"]);
    assert_eq!("idnotfound", body["errorKey"]);
    assert_eq!(0, practice_count(&pool).await?);

    Ok(())
}

#[sqlx::test]
async fn get_returns_practice_with_session(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let session_id = app.create_session(&json!({ "start": DEFAULT_START })).await;

    let mut body = default_practice();
    body["practiceSession"] = json!({ "id": session_id });
    let id = app.create_practice(&body).await;

    let res = app
        .get(&format!("api/practices/{}", id))
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());
    let body: Value = res.json().await.unwrap();
    assert_eq!(DEFAULT_PROBLEM_NAME, body["problemName"]);
    assert_eq!(session_id, body["practiceSession"]["id"].as_i64().unwrap());
    assert_eq!(DEFAULT_START, body["practiceSession"]["start"]);

    Ok(())
}

#[sqlx::test]
async fn get_unknown_practice_is_not_found(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app.get("api/practices/4242").await.expect("Failed to execute request");
    assert_eq!(StatusCode::NOT_FOUND, res.status());

    let res = app.get("api/practices/abc").await.expect("Failed to execute request");
    assert_eq!(StatusCode::BAD_REQUEST, res.status());

    Ok(())
}

#[sqlx::test]
async fn list_returns_json_or_ndjson(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    app.create_practice(&default_practice()).await;
    app.create_practice(&default_practice()).await;

    let res = app.get("api/practices").await.expect("Failed to execute request");
    assert_eq!(StatusCode::OK, res.status());
    let practices: Vec<Value> = res.json().await.unwrap();
    assert_eq!(2, practices.len());

    let res = app
        .request(Method::GET, "api/practices")
        .header("accept", "application/x-ndjson")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::OK, res.status());
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "application/x-ndjson"
    );

    let text = res.text().await.unwrap();
    let lines: Vec<Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).expect("Line is not a JSON document"))
        .collect();
    assert_eq!(2, lines.len());
    assert_eq!(DEFAULT_PROBLEM_NAME, lines[0]["problemName"]);

    Ok(())
}

#[sqlx::test]
async fn list_can_filter_practices_without_session(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let session_id = app.create_session(&json!({})).await;

    let mut linked = default_practice();
    linked["practiceSession"] = json!({ "id": session_id });
    app.create_practice(&linked).await;
    let orphan_id = app.create_practice(&default_practice()).await;

    let res = app
        .get("api/practices?filter=practicesession-is-null")
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::OK, res.status());
    let practices: Vec<Value> = res.json().await.unwrap();
    assert_eq!(1, practices.len());
    assert_eq!(orphan_id, practices[0]["id"].as_i64().unwrap());
    assert!(practices[0].get("practiceSession").is_none());

    let res = app
        .get("api/practices?filter=practicesession-is-set")
        .await
        .expect("Failed to execute request");
    assert_bad_request(res, "unknown filter").await;

    Ok(())
}

#[sqlx::test]
async fn list_rejects_out_of_range_paging(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    app.create_practice(&default_practice()).await;

    let test_cases = vec![
        ("empty page", "size=0"),
        ("oversized page", "size=2001"),
        ("offset past i64", "page=9223372036854775807&size=20"),
        ("offset past i64 with default size", "page=9223372036854775807"),
    ];

    for (desc, query) in test_cases {
        let res = app
            .get(&format!("api/practices?{}", query))
            .await
            .expect("Failed to execute request");

        assert_bad_request(res, desc).await;
    }

    Ok(())
}

#[sqlx::test]
async fn put_replaces_practice(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let session_id = app.create_session(&json!({})).await;

    let mut body = default_practice();
    body["practiceSession"] = json!({ "id": session_id });
    let id = app.create_practice(&body).await;

    let res = app
        .send_json(
            Method::PUT,
            &format!("api/practices/{}", id),
            &json!({
                "id": id,
                "problemName": UPDATED_PROBLEM_NAME,
                "problemLink": UPDATED_PROBLEM_LINK,
                "end": UPDATED_END,
                "result": "FAIL"
            }),
        )
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());
    assert_eq!(
        Some(format!("A practice is updated with identifier {}", id)),
        alert_header(&res)
    );

    let body: Value = res.json().await.unwrap();
    assert_eq!(UPDATED_PROBLEM_NAME, body["problemName"]);
    assert_eq!(UPDATED_PROBLEM_LINK, body["problemLink"]);
    assert!(body["start"].is_null());
    assert_eq!(UPDATED_END, body["end"]);
    assert_eq!("FAIL", body["result"]);
    // A full replace without a session reference unlinks the practice
    assert!(body.get("practiceSession").is_none());

    Ok(())
}

#[sqlx::test]
async fn put_validates_body(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let id = app.create_practice(&default_practice()).await;

    let res = app
        .send_json(
            Method::PUT,
            &format!("api/practices/{}", id),
            &json!({ "id": id, "problemLink": UPDATED_PROBLEM_LINK }),
        )
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::BAD_REQUEST, res.status());

    let name = sqlx::query_scalar::<_, String>("select problem_name from practice where id=$1")
        .bind(id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(DEFAULT_PROBLEM_NAME, name);

    Ok(())
}

#[sqlx::test]
async fn patch_merges_present_members(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let session_id = app.create_session(&json!({})).await;

    let mut body = default_practice();
    body["practiceSession"] = json!({ "id": session_id });
    let id = app.create_practice(&body).await;

    let res = app
        .send_json(
            Method::PATCH,
            &format!("api/practices/{}", id),
            &json!({
                "id": id,
                "problemName": UPDATED_PROBLEM_NAME,
                "problemLink": UPDATED_PROBLEM_LINK,
                "end": UPDATED_END
            }),
        )
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::OK, res.status());

    let body: Value = res.json().await.unwrap();
    assert_eq!(UPDATED_PROBLEM_NAME, body["problemName"]);
    assert_eq!(UPDATED_PROBLEM_LINK, body["problemLink"]);
    assert_eq!(DEFAULT_START, body["start"]);
    assert_eq!(UPDATED_END, body["end"]);
    assert_eq!("PASS", body["result"]);
    assert_eq!(session_id, body["practiceSession"]["id"].as_i64().unwrap());

    Ok(())
}

#[sqlx::test]
async fn patch_of_unknown_practice_is_rejected(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app
        .send_json(
            Method::PATCH,
            "api/practices/4242",
            &json!({ "id": 4242, "problemName": UPDATED_PROBLEM_NAME }),
        )
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    let body: Value = res.json().await.unwrap();
    assert_eq!("idnotfound", body["errorKey"]);
    assert_eq!("error.idnotfound", body["message"]);

    Ok(())
}

#[sqlx::test]
async fn put_of_unknown_practice_is_rejected(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let mut body = default_practice();
    body["id"] = json!(4242);

    let res = app
        .send_json(Method::PUT, "api/practices/4242", &body)
        .await
        .expect("Failed to execute request");

    let body = assert_bad_request(res, "unknown practice").await;
    assert_eq!("practice", body["entityName"]);
    assert_eq!("idnotfound", body["errorKey"]);
    assert_eq!(0, practice_count(&pool).await?);

    Ok(())
}

#[sqlx::test]
async fn delete_removes_practice(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let id = app.create_practice(&default_practice()).await;
    assert_eq!(1, practice_count(&pool).await?);

    let res = app
        .delete(&format!("api/practices/{}", id))
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::NO_CONTENT, res.status());
    assert_eq!(
        Some(format!("A practice is deleted with identifier {}", id)),
        alert_header(&res)
    );
    assert_eq!(0, practice_count(&pool).await?);

    // Deleting again is still a success
    let res = app
        .delete(&format!("api/practices/{}", id))
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::NO_CONTENT, res.status());

    Ok(())
}

#[sqlx::test]
async fn put_without_id_is_not_allowed(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    app.create_practice(&default_practice()).await;

    let mut body = default_practice();
    body["id"] = json!(1);

    let res = app
        .send_json(Method::PUT, "api/practices", &body)
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::METHOD_NOT_ALLOWED, res.status());
    assert_eq!(1, practice_count(&pool).await?);

    Ok(())
}
