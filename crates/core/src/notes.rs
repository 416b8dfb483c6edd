//! Sticky-note constants and validation.

/// Maximum length of a note's content in characters.
pub const MAX_NOTE_CONTENT_LENGTH: usize = 2_000;

/// Maximum number of notes a single board (work record) may hold.
pub const MAX_NOTES_PER_BOARD: usize = 100;

/// Colour tags the board UI knows how to render.
pub const VALID_COLOR_TAGS: &[&str] = &["yellow", "pink", "blue", "green", "orange"];

/// Validate note content: non-empty after trimming, within the length cap.
pub fn validate_note_content(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Note content must not be empty".to_string());
    }
    if content.chars().count() > MAX_NOTE_CONTENT_LENGTH {
        return Err(format!(
            "Note content must be at most {MAX_NOTE_CONTENT_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Validate that the colour tag is one of the allowed values.
pub fn validate_color_tag(color_tag: &str) -> Result<(), String> {
    if VALID_COLOR_TAGS.contains(&color_tag) {
        Ok(())
    } else {
        Err(format!(
            "Invalid color tag '{color_tag}'. Valid values: {}",
            VALID_COLOR_TAGS.join(", ")
        ))
    }
}

/// Validate a whole board payload before a replace-all write.
pub fn validate_board_size(count: usize) -> Result<(), String> {
    if count > MAX_NOTES_PER_BOARD {
        return Err(format!(
            "A board may hold at most {MAX_NOTES_PER_BOARD} notes"
        ));
    }
    Ok(())
}
