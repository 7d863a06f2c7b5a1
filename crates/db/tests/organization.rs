//! Integration tests for the management tree, board members, publications
//! and the standalone gallery.

use portico_core::documents::type_prefix_pattern;
use portico_core::gallery::GalleryCategory;
use portico_core::storage::DEFAULT_BOARD_MEMBER_IMAGE;
use portico_db::models::board_member::{CreateBoardMember, UpdateBoardMember};
use portico_db::models::gallery_image::CreateGalleryImage;
use portico_db::models::management::{CreateStaff, CreateSubCategory};
use portico_db::models::publication::CreatePublication;
use portico_db::repositories::{
    BoardMemberRepo, GalleryImageRepo, MainCategoryRepo, PublicationRepo, StaffRepo,
    SubCategoryRepo,
};
use sqlx::PgPool;

fn new_staff(sub_category_id: i64, name: &str, image: Option<&str>) -> (CreateStaff, Option<String>) {
    (
        CreateStaff {
            sub_category_id,
            name: name.to_string(),
            grade: None,
            region: None,
            email: format!("{}@example.com", name.to_lowercase()),
            description: None,
        },
        image.map(str::to_string),
    )
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_management_tree_and_cascade(pool: PgPool) {
    let directors = MainCategoryRepo::create(&pool, "Directors").await.unwrap();
    let heads = MainCategoryRepo::create(&pool, "Regional Heads").await.unwrap();
    let exec = SubCategoryRepo::create(
        &pool,
        &CreateSubCategory {
            main_category_id: directors.id,
            name: "Executive".into(),
        },
    )
    .await
    .unwrap();
    SubCategoryRepo::create(
        &pool,
        &CreateSubCategory {
            main_category_id: heads.id,
            name: "Northern".into(),
        },
    )
    .await
    .unwrap();

    for (name, image) in [("Kofi", Some("staff_images/kofi-11111111.jpg")), ("Ama", None)] {
        let (input, image) = new_staff(exec.id, name, image);
        let staff = StaffRepo::create(&pool, &input, image.as_deref()).await.unwrap();
        assert_eq!(staff.region, "Not a Regional Head");
    }

    let tree = MainCategoryRepo::tree(&pool).await.unwrap();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].main_category.name, "Directors");
    let names: Vec<_> = tree[0].sub_categories[0]
        .staff
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(names, vec!["Ama", "Kofi"]);

    let images = MainCategoryRepo::delete(&pool, directors.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(images, vec!["staff_images/kofi-11111111.jpg"]);
    assert!(StaffRepo::list(&pool).await.unwrap().is_empty());
    assert_eq!(SubCategoryRepo::list(&pool).await.unwrap().len(), 1);
    assert!(MainCategoryRepo::delete(&pool, directors.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_board_member_defaults_and_ordering(pool: PgPool) {
    for name in ["Yaw Mensah", "Abena Osei"] {
        BoardMemberRepo::create(
            &pool,
            &CreateBoardMember {
                name: name.into(),
                position: None,
                about: None,
                linkedin: None,
                twitter: None,
            },
            None,
        )
        .await
        .unwrap();
    }

    let members = BoardMemberRepo::list(&pool).await.unwrap();
    assert_eq!(members[0].name, "Abena Osei");
    assert_eq!(members[0].image, DEFAULT_BOARD_MEMBER_IMAGE);
    assert_eq!(members[0].position, "Board Member");

    let updated = BoardMemberRepo::update(
        &pool,
        members[0].id,
        &UpdateBoardMember {
            position: Some("Chair".into()),
            ..Default::default()
        },
        Some("board_members/abena-12345678.jpg"),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.position, "Chair");
    assert_eq!(updated.image, "board_members/abena-12345678.jpg");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_publication_type_prefix_filter(pool: PgPool) {
    for (title, kind) in [
        ("Annual Report", "Report"),
        ("Quarterly Report", "report - quarterly"),
        ("Newsletter 1", "Newsletter"),
    ] {
        PublicationRepo::create(
            &pool,
            &CreatePublication {
                title: title.into(),
                publication_type: Some(kind.into()),
                author: None,
            },
            Some("publications/doc-00000000.pdf"),
            None,
        )
        .await
        .unwrap();
    }

    let pattern = type_prefix_pattern(Some("rep"));
    let reports = PublicationRepo::list(&pool, pattern.as_deref()).await.unwrap();
    assert_eq!(reports.len(), 2);

    let all = PublicationRepo::list(&pool, None).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_gallery_lists_active_by_category(pool: PgPool) {
    let specs = [
        (GalleryCategory::Office, true),
        (GalleryCategory::Office, false),
        (GalleryCategory::Health, true),
    ];
    for (i, (category, active)) in specs.into_iter().enumerate() {
        GalleryImageRepo::create(
            &pool,
            &CreateGalleryImage {
                alt_text: None,
                category: category.name().into(),
                is_active: Some(active),
                related_project_id: None,
            },
            category,
            &format!("gallery/g{i}-0000000{i}.jpg"),
        )
        .await
        .unwrap();
    }

    let office = GalleryImageRepo::list_active(&pool, Some(GalleryCategory::Office))
        .await
        .unwrap();
    assert_eq!(office.len(), 1);
    assert_eq!(GalleryImageRepo::list_active(&pool, None).await.unwrap().len(), 2);
    assert!(GalleryImageRepo::list_active(&pool, Some(GalleryCategory::Civic))
        .await
        .unwrap()
        .is_empty());
}
