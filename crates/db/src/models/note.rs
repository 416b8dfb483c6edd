//! Sticky-note entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tempo_core::types::{DbId, Timestamp};

/// A row from the `notes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Note {
    pub id: DbId,
    pub work_record_id: DbId,
    pub content: String,
    pub pos_x: f64,
    pub pos_y: f64,
    pub color_tag: String,
    pub stack_order: i32,
    pub created_at: Timestamp,
}

/// DTO for one note in a board replace-all write.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNote {
    pub content: String,
    #[serde(default)]
    pub pos_x: f64,
    #[serde(default)]
    pub pos_y: f64,
    pub color_tag: Option<String>,
    #[serde(default)]
    pub stack_order: i32,
}
