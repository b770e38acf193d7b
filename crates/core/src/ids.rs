//! Opaque, URL-safe identifiers for scan flows.
//!
//! Ids are generated server-side (never supplied by the caller) with a
//! UUIDv4-derived hex suffix for collision resistance.

use uuid::Uuid;

pub const SCAN_ID_PREFIX: &str = "scan_";
pub const BATCH_SESSION_ID_PREFIX: &str = "session_";

fn hex_suffix(len: usize) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..len].to_string()
}

/// New single-scan session id, e.g. `scan_3fa85f64a1b2`.
pub fn new_scan_id() -> String {
    format!("{SCAN_ID_PREFIX}{}", hex_suffix(12))
}

/// New batch scan session id, e.g. `session_9d4e1c0a77fb`.
pub fn new_batch_session_id() -> String {
    format!("{BATCH_SESSION_ID_PREFIX}{}", hex_suffix(12))
}

/// Logical id for a refinement image uploaded into an existing session.
pub fn new_refine_image_id(scan_id: &str) -> String {
    format!("{scan_id}_refine_{}", hex_suffix(8))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn is_url_safe(id: &str) -> bool {
        id.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }

    #[test]
    fn scan_id_shape() {
        let id = new_scan_id();
        assert!(id.starts_with(SCAN_ID_PREFIX));
        assert_eq!(id.len(), SCAN_ID_PREFIX.len() + 12);
        assert!(is_url_safe(&id));
    }

    #[test]
    fn batch_session_id_shape() {
        let id = new_batch_session_id();
        assert!(id.starts_with(BATCH_SESSION_ID_PREFIX));
        assert_eq!(id.len(), BATCH_SESSION_ID_PREFIX.len() + 12);
        assert!(is_url_safe(&id));
    }

    #[test]
    fn refine_image_id_embeds_scan_id() {
        let id = new_refine_image_id("scan_abc123def456");
        assert!(id.starts_with("scan_abc123def456_refine_"));
        assert_eq!(id.len(), "scan_abc123def456_refine_".len() + 8);
        assert!(is_url_safe(&id));
    }

    #[test]
    fn ids_are_unique() {
        let a = new_scan_id();
        let b = new_scan_id();
        assert_ne!(a, b);
    }
}
