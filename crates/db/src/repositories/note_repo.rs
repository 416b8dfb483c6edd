//! Repository for the `notes` table.

use sqlx::PgPool;
use tempo_core::types::DbId;

use crate::models::note::{CreateNote, Note};

/// Column list for notes queries.
const COLUMNS: &str = "id, work_record_id, content, pos_x, pos_y, color_tag, stack_order, created_at";

/// Default colour applied when a note carries no tag.
const DEFAULT_COLOR_TAG: &str = "yellow";

/// Provides operations for a record's sticky-note board.
pub struct NoteRepo;

impl NoteRepo {
    /// List a record's notes in stacking order.
    pub async fn list_for_record(
        pool: &PgPool,
        work_record_id: DbId,
    ) -> Result<Vec<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notes
             WHERE work_record_id = $1
             ORDER BY stack_order ASC, id ASC"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(work_record_id)
            .fetch_all(pool)
            .await
    }

    /// Replace the whole board for a record: delete existing notes and bulk
    /// insert the new set inside one transaction.
    pub async fn replace_for_record(
        pool: &PgPool,
        work_record_id: DbId,
        notes: &[CreateNote],
    ) -> Result<Vec<Note>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM notes WHERE work_record_id = $1")
            .bind(work_record_id)
            .execute(&mut *tx)
            .await?;

        let insert = format!(
            "INSERT INTO notes (work_record_id, content, pos_x, pos_y, color_tag, stack_order)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let mut created = Vec::with_capacity(notes.len());
        for note in notes {
            let row = sqlx::query_as::<_, Note>(&insert)
                .bind(work_record_id)
                .bind(&note.content)
                .bind(note.pos_x)
                .bind(note.pos_y)
                .bind(note.color_tag.as_deref().unwrap_or(DEFAULT_COLOR_TAG))
                .bind(note.stack_order)
                .fetch_one(&mut *tx)
                .await?;
            created.push(row);
        }

        tx.commit().await?;
        Ok(created)
    }
}
