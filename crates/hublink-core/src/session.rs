// Session identity used to correlate all backend calls
// Format: "user-<unix-millis>-<8 hex chars>"

use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::Utc;

const SESSION_ID_FILE: &str = "session_id.txt";
const SESSION_ID_PREFIX: &str = "user-";

/// Error type for session identity operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid session ID format: {0}")]
    InvalidFormat(String),
}

/// Get or create the session ID at the specified path.
/// Creates a new session ID file if it doesn't exist; later calls return
/// the stored value unchanged. The ID is never rotated or deleted.
///
/// # Arguments
/// * `path` - Directory path where session_id.txt is stored
///
/// # Returns
/// Session ID string in format "user-<unix-millis>-<8 hex chars>"
pub fn get_or_create_session_id_at(path: &Path) -> Result<String, SessionError> {
    let session_id_path = path.join(SESSION_ID_FILE);

    // Try to read existing session ID
    if session_id_path.exists() {
        let content = fs::read_to_string(&session_id_path)?;
        let session_id = content.trim().to_string();

        // Validate format
        if session_id.starts_with(SESSION_ID_PREFIX) {
            return Ok(session_id);
        } else {
            return Err(SessionError::InvalidFormat(session_id));
        }
    }

    // Generate new session ID: fixed prefix + time component + random component
    let millis = Utc::now().timestamp_millis();
    let random: u32 = rand::random();
    let session_id = format!("{}{}-{:08x}", SESSION_ID_PREFIX, millis, random);

    // Ensure directory exists
    if !path.exists() {
        fs::create_dir_all(path)?;
    }

    // Write session ID to file
    let mut file = fs::File::create(&session_id_path)?;
    writeln!(file, "{}", session_id)?;

    Ok(session_id)
}

/// Get or create the session ID using the default data directory.
///
/// # Returns
/// Session ID string in format "user-<unix-millis>-<8 hex chars>"
pub fn get_or_create_session_id() -> Result<String, SessionError> {
    let data_dir = dirs::data_local_dir()
        .map(|p| p.join("hublink"))
        .ok_or_else(|| {
            SessionError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine data directory",
            ))
        })?;

    get_or_create_session_id_at(&data_dir)
}
