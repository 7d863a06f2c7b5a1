//! Integration tests for multipart uploads: normalization, cleanup of
//! replaced and deleted files, and rollback of files when the row write fails.

mod common;

use std::path::Path;

use axum::http::StatusCode;
use common::{
    body_bytes, body_json, delete, get, image_part, png_bytes, post_multipart, put_multipart,
    Part, TestContext,
};
use portico_core::storage::{BlobStorage, DEFAULT_BOARD_MEMBER_IMAGE};
use serde_json::json;
use sqlx::PgPool;

/// Number of regular files directly inside `dir`; zero when it does not exist.
fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|e| e.path().is_file())
                .count()
        })
        .unwrap_or(0)
}

async fn create_project(ctx: &TestContext, parts: Vec<Part>) -> serde_json::Value {
    let response = post_multipart(ctx.app(), "/api/v1/admin/projects", parts).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

fn project_payload(title: &str) -> Part {
    Part::Payload(json!({ "title": title, "start_date": "2023-01-15" }))
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn large_picture_is_downscaled_on_upload(pool: PgPool) {
    let ctx = TestContext::new(pool);
    let project = create_project(
        &ctx,
        vec![
            project_payload("Riverside Clinic"),
            image_part("picture", "site.png", png_bytes(2400, 1600)),
        ],
    )
    .await;

    let path = project["picture"].as_str().unwrap();
    assert!(path.starts_with("projects/main_pictures/site-"));

    let stored = std::fs::read(ctx.media.path().join(path)).unwrap();
    let img = image::load_from_memory(&stored).unwrap();
    assert_eq!((img.width(), img.height()), (1200, 800));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn undecodable_picture_is_rejected_and_nothing_is_written(pool: PgPool) {
    let ctx = TestContext::new(pool);
    let response = post_multipart(
        ctx.app(),
        "/api/v1/admin/projects",
        vec![
            project_payload("Broken Upload"),
            Part::File {
                field: "picture",
                filename: "site.jpg",
                content_type: "image/jpeg",
                data: b"definitely not a jpeg".to_vec(),
            },
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "DECODE_ERROR");
    assert_eq!(file_count(&ctx.media.path().join("projects/main_pictures")), 0);

    let json = body_json(get(ctx.app(), "/api/v1/projects").await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stored_picture_is_removed_when_the_row_write_fails(pool: PgPool) {
    let ctx = TestContext::new(pool);
    let response = post_multipart(
        ctx.app(),
        "/api/v1/admin/projects",
        vec![
            Part::Payload(json!({
                "title": "Orphan",
                "start_date": "2023-01-15",
                "category_id": 987_654,
            })),
            image_part("picture", "orphan.png", png_bytes(40, 40)),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(file_count(&ctx.media.path().join("projects/main_pictures")), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn replacing_and_deleting_a_project_cleans_up_files(pool: PgPool) {
    let ctx = TestContext::new(pool);
    let project = create_project(
        &ctx,
        vec![
            project_payload("Harbour Offices"),
            image_part("picture", "front.png", png_bytes(50, 50)),
        ],
    )
    .await;
    let id = project["id"].as_i64().unwrap();
    let first = project["picture"].as_str().unwrap().to_string();

    let response = post_multipart(
        ctx.app(),
        &format!("/api/v1/admin/projects/{id}/images"),
        vec![
            Part::Payload(json!({ "image_type": "construction" })),
            image_part("image", "crane.png", png_bytes(30, 20)),
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let gallery_path = body_json(response).await["data"]["image"]
        .as_str()
        .unwrap()
        .to_string();

    let response = put_multipart(
        ctx.app(),
        &format!("/api/v1/admin/projects/{id}"),
        vec![image_part("picture", "front.png", png_bytes(60, 60))],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    let second = updated["picture"].as_str().unwrap().to_string();
    assert_eq!(updated["title"], "Harbour Offices");
    assert_ne!(first, second);
    assert!(!ctx.stored(&first));
    assert!(ctx.stored(&second));

    let detail = body_json(get(ctx.app(), &format!("/api/v1/projects/{id}")).await).await;
    assert_eq!(detail["data"]["gallery"]["construction"].as_array().unwrap().len(), 1);
    assert!(detail["data"]["gallery"]["project"].as_array().unwrap().is_empty());

    let response = delete(ctx.app(), &format!("/api/v1/admin/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(!ctx.stored(&second));
    assert!(!ctx.stored(&gallery_path));

    let response = get(ctx.app(), &format!("/api/v1/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_without_a_file_keeps_the_picture(pool: PgPool) {
    let ctx = TestContext::new(pool);
    let project = create_project(
        &ctx,
        vec![
            project_payload("Library"),
            image_part("picture", "library.png", png_bytes(20, 20)),
        ],
    )
    .await;
    let picture = project["picture"].as_str().unwrap().to_string();

    let response = put_multipart(
        ctx.app(),
        &format!("/api/v1/admin/projects/{}", project["id"]),
        vec![Part::Payload(json!({ "client": "City Council" }))],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["client"], "City Council");
    assert_eq!(updated["picture"], picture.as_str());
    assert!(ctx.stored(&picture));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn completion_before_start_is_rejected(pool: PgPool) {
    let ctx = TestContext::new(pool);
    let response = post_multipart(
        ctx.app(),
        "/api/v1/admin/projects",
        vec![Part::Payload(json!({
            "title": "Time Travel",
            "start_date": "2024-05-01",
            "completed_date": "2023-05-01",
        }))],
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn board_member_default_image_survives_delete(pool: PgPool) {
    let ctx = TestContext::new(pool);
    ctx.storage()
        .put(DEFAULT_BOARD_MEMBER_IMAGE, b"placeholder")
        .await
        .unwrap();

    let response = post_multipart(
        ctx.app(),
        "/api/v1/admin/board-members",
        vec![Part::Payload(json!({ "name": "A. Chair", "position": "Chairperson" }))],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let member = body_json(response).await["data"].clone();
    assert_eq!(member["image"], DEFAULT_BOARD_MEMBER_IMAGE);

    let response = delete(
        ctx.app(),
        &format!("/api/v1/admin/board-members/{}", member["id"]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(ctx.stored(DEFAULT_BOARD_MEMBER_IMAGE));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn publication_document_downloads_as_attachment(pool: PgPool) {
    let ctx = TestContext::new(pool);
    let document = b"%PDF-1.4 annual report".to_vec();
    let response = post_multipart(
        ctx.app(),
        "/api/v1/admin/publications",
        vec![
            Part::Payload(json!({ "title": "Annual Report", "publication_type": "Annual Report" })),
            Part::File {
                field: "document",
                filename: "Annual Report.pdf",
                content_type: "application/pdf",
                data: document.clone(),
            },
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let publication = body_json(response).await["data"].clone();
    let path = publication["document"].as_str().unwrap().to_string();
    assert!(path.starts_with("publications/annual-report-"));
    assert!(path.ends_with(".pdf"));

    let response = get(
        ctx.app(),
        &format!("/api/v1/publications/{}/download", publication["id"]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/pdf");
    let disposition = response.headers()["content-disposition"].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\"annual-report-"));
    assert_eq!(body_bytes(response).await, document);

    let response = delete(
        ctx.app(),
        &format!("/api/v1/admin/publications/{}", publication["id"]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(!ctx.stored(&path));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn publication_without_document_has_nothing_to_download(pool: PgPool) {
    let ctx = TestContext::new(pool);
    let response = post_multipart(
        ctx.app(),
        "/api/v1/admin/publications",
        vec![Part::Payload(json!({ "title": "Newsletter" }))],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].clone();

    let response = get(ctx.app(), &format!("/api/v1/publications/{id}/download")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

fn broken_cover() -> Part {
    Part::File {
        field: "cover_image",
        filename: "cover.jpg",
        content_type: "image/jpeg",
        data: b"not a jpeg either".to_vec(),
    }
}

fn report_document() -> Part {
    Part::File {
        field: "document",
        filename: "report.pdf",
        content_type: "application/pdf",
        data: b"%PDF-1.4 report".to_vec(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stored_document_is_removed_when_the_cover_fails_to_decode(pool: PgPool) {
    let ctx = TestContext::new(pool);
    let response = post_multipart(
        ctx.app(),
        "/api/v1/admin/publications",
        vec![
            Part::Payload(json!({ "title": "Half Uploaded" })),
            report_document(),
            broken_cover(),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(file_count(&ctx.media.path().join("publications")), 0);
    assert_eq!(file_count(&ctx.media.path().join("publications/covers")), 0);

    let json = body_json(get(ctx.app(), "/api/v1/publications").await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_cover_on_update_keeps_the_old_document_only(pool: PgPool) {
    let ctx = TestContext::new(pool);
    let response = post_multipart(
        ctx.app(),
        "/api/v1/admin/publications",
        vec![Part::Payload(json!({ "title": "Quarterly" })), report_document()],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let publication = body_json(response).await["data"].clone();
    let original = publication["document"].as_str().unwrap().to_string();

    let response = put_multipart(
        ctx.app(),
        &format!("/api/v1/admin/publications/{}", publication["id"]),
        vec![report_document(), broken_cover()],
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(ctx.stored(&original));
    assert_eq!(file_count(&ctx.media.path().join("publications")), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn identical_uploads_do_not_share_a_file(pool: PgPool) {
    let ctx = TestContext::new(pool);
    let bytes = png_bytes(32, 32);
    let first = create_project(
        &ctx,
        vec![
            project_payload("North Wing"),
            image_part("picture", "site.png", bytes.clone()),
        ],
    )
    .await;
    let second = create_project(
        &ctx,
        vec![
            project_payload("South Wing"),
            image_part("picture", "site.png", bytes),
        ],
    )
    .await;

    let kept = second["picture"].as_str().unwrap().to_string();
    assert_ne!(first["picture"].as_str().unwrap(), kept);

    let response = delete(ctx.app(), &format!("/api/v1/admin/projects/{}", first["id"])).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(ctx.stored(&kept));

    let response = get(ctx.app(), &format!("/media/{kept}")).await;
    assert_eq!(response.status(), StatusCode::OK);
}
