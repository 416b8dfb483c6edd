//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod note_repo;
pub mod user_repo;
pub mod work_record_repo;

pub use note_repo::NoteRepo;
pub use user_repo::UserRepo;
pub use work_record_repo::WorkRecordRepo;
