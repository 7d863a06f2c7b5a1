//! Repositories for the management tree: `main_categories`,
//! `sub_categories` and `staff`.

use portico_core::types::DbId;
use sqlx::PgPool;

use crate::models::management::{
    build_tree, CreateStaff, CreateSubCategory, MainCategory, MainCategoryNode, Staff,
    SubCategory, UpdateMainCategory, UpdateStaff, UpdateSubCategory,
};

const MAIN_COLUMNS: &str = "id, name, created_at, updated_at";
const SUB_COLUMNS: &str = "id, main_category_id, name, created_at, updated_at";
const STAFF_COLUMNS: &str = "id, sub_category_id, name, image, grade, region, email, \
    description, created_at, updated_at";

// ---------------------------------------------------------------------------
// Main categories
// ---------------------------------------------------------------------------

pub struct MainCategoryRepo;

impl MainCategoryRepo {
    pub async fn create(pool: &PgPool, name: &str) -> Result<MainCategory, sqlx::Error> {
        let query =
            format!("INSERT INTO main_categories (name) VALUES ($1) RETURNING {MAIN_COLUMNS}");
        sqlx::query_as::<_, MainCategory>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<MainCategory>, sqlx::Error> {
        let query = format!("SELECT {MAIN_COLUMNS} FROM main_categories ORDER BY id");
        sqlx::query_as::<_, MainCategory>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMainCategory,
    ) -> Result<Option<MainCategory>, sqlx::Error> {
        let query = format!(
            "UPDATE main_categories SET name = COALESCE($2, name)
             WHERE id = $1
             RETURNING {MAIN_COLUMNS}"
        );
        sqlx::query_as::<_, MainCategory>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a main category with its sub categories and staff. Returns the
    /// staff image paths removed by the cascade, or `None` if the category
    /// did not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Vec<String>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let images: Vec<(String,)> = sqlx::query_as(
            "SELECT s.image FROM staff s
             JOIN sub_categories sc ON sc.id = s.sub_category_id
             WHERE sc.main_category_id = $1 AND s.image IS NOT NULL",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM main_categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(images.into_iter().map(|(path,)| path).collect()))
    }

    /// The whole management tree, categories in creation order and staff by
    /// name.
    pub async fn tree(pool: &PgPool) -> Result<Vec<MainCategoryNode>, sqlx::Error> {
        let mains = Self::list(pool).await?;
        let subs = SubCategoryRepo::list(pool).await?;
        let staff = StaffRepo::list(pool).await?;
        Ok(build_tree(mains, subs, staff))
    }
}

// ---------------------------------------------------------------------------
// Sub categories
// ---------------------------------------------------------------------------

pub struct SubCategoryRepo;

impl SubCategoryRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateSubCategory,
    ) -> Result<SubCategory, sqlx::Error> {
        let query = format!(
            "INSERT INTO sub_categories (main_category_id, name) VALUES ($1, $2)
             RETURNING {SUB_COLUMNS}"
        );
        sqlx::query_as::<_, SubCategory>(&query)
            .bind(input.main_category_id)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<SubCategory>, sqlx::Error> {
        let query = format!("SELECT {SUB_COLUMNS} FROM sub_categories ORDER BY id");
        sqlx::query_as::<_, SubCategory>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSubCategory,
    ) -> Result<Option<SubCategory>, sqlx::Error> {
        let query = format!(
            "UPDATE sub_categories SET
                main_category_id = COALESCE($2, main_category_id),
                name = COALESCE($3, name)
             WHERE id = $1
             RETURNING {SUB_COLUMNS}"
        );
        sqlx::query_as::<_, SubCategory>(&query)
            .bind(id)
            .bind(input.main_category_id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a sub category with its staff. Returns the cascaded staff image
    /// paths, or `None` if the sub category did not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Vec<String>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let images: Vec<(String,)> = sqlx::query_as(
            "SELECT image FROM staff WHERE sub_category_id = $1 AND image IS NOT NULL",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM sub_categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(images.into_iter().map(|(path,)| path).collect()))
    }
}

// ---------------------------------------------------------------------------
// Staff
// ---------------------------------------------------------------------------

pub struct StaffRepo;

impl StaffRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateStaff,
        image: Option<&str>,
    ) -> Result<Staff, sqlx::Error> {
        let query = format!(
            "INSERT INTO staff (sub_category_id, name, image, grade, region, email, description)
             VALUES ($1, $2, $3, COALESCE($4, ''), COALESCE($5, 'Not a Regional Head'), $6,
                     COALESCE($7, ''))
             RETURNING {STAFF_COLUMNS}"
        );
        sqlx::query_as::<_, Staff>(&query)
            .bind(input.sub_category_id)
            .bind(&input.name)
            .bind(image)
            .bind(&input.grade)
            .bind(&input.region)
            .bind(&input.email)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Staff>, sqlx::Error> {
        let query = format!("SELECT {STAFF_COLUMNS} FROM staff WHERE id = $1");
        sqlx::query_as::<_, Staff>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Staff>, sqlx::Error> {
        let query = format!("SELECT {STAFF_COLUMNS} FROM staff ORDER BY name, id");
        sqlx::query_as::<_, Staff>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStaff,
        image: Option<&str>,
    ) -> Result<Option<Staff>, sqlx::Error> {
        let query = format!(
            "UPDATE staff SET
                sub_category_id = COALESCE($2, sub_category_id),
                name = COALESCE($3, name),
                image = COALESCE($4, image),
                grade = COALESCE($5, grade),
                region = COALESCE($6, region),
                email = COALESCE($7, email),
                description = COALESCE($8, description)
             WHERE id = $1
             RETURNING {STAFF_COLUMNS}"
        );
        sqlx::query_as::<_, Staff>(&query)
            .bind(id)
            .bind(input.sub_category_id)
            .bind(&input.name)
            .bind(image)
            .bind(&input.grade)
            .bind(&input.region)
            .bind(&input.email)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Staff>, sqlx::Error> {
        let query = format!("DELETE FROM staff WHERE id = $1 RETURNING {STAFF_COLUMNS}");
        sqlx::query_as::<_, Staff>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
