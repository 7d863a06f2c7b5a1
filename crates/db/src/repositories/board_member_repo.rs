//! Repository for the `board_members` table.

use portico_core::types::DbId;
use sqlx::PgPool;

use crate::models::board_member::{BoardMember, CreateBoardMember, UpdateBoardMember};

const COLUMNS: &str =
    "id, name, image, position, about, linkedin, twitter, created_at, updated_at";

pub struct BoardMemberRepo;

impl BoardMemberRepo {
    /// Insert a board member. Without an uploaded `image` the column default
    /// (the shared placeholder) applies.
    pub async fn create(
        pool: &PgPool,
        input: &CreateBoardMember,
        image: Option<&str>,
    ) -> Result<BoardMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO board_members (name, image, position, about, linkedin, twitter)
             VALUES ($1, COALESCE($2, 'board_members/default.jpg'),
                     COALESCE($3, 'Board Member'), COALESCE($4, ''), COALESCE($5, ''),
                     COALESCE($6, ''))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BoardMember>(&query)
            .bind(&input.name)
            .bind(image)
            .bind(&input.position)
            .bind(&input.about)
            .bind(&input.linkedin)
            .bind(&input.twitter)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BoardMember>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM board_members WHERE id = $1");
        sqlx::query_as::<_, BoardMember>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All board members ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<BoardMember>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM board_members ORDER BY name, id");
        sqlx::query_as::<_, BoardMember>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBoardMember,
        image: Option<&str>,
    ) -> Result<Option<BoardMember>, sqlx::Error> {
        let query = format!(
            "UPDATE board_members SET
                name = COALESCE($2, name),
                image = COALESCE($3, image),
                position = COALESCE($4, position),
                about = COALESCE($5, about),
                linkedin = COALESCE($6, linkedin),
                twitter = COALESCE($7, twitter)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BoardMember>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(image)
            .bind(&input.position)
            .bind(&input.about)
            .bind(&input.linkedin)
            .bind(&input.twitter)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<BoardMember>, sqlx::Error> {
        let query = format!("DELETE FROM board_members WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, BoardMember>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
