//! Object-storage path conventions.
//!
//! - citizen documents: `documents/{user_id}/{category}/{file_id}`
//! - application attachments: `applications/{user_id}/{service_type}/{file_id}`
//!
//! Each segment is restricted to `[A-Za-z0-9_-]`; any other character is
//! replaced by `_` so user-supplied values cannot introduce extra path levels.

use crate::services::ServiceType;

/// Prefix for citizen document uploads.
pub const DOCUMENTS_PREFIX: &str = "documents";

/// Prefix for application attachments.
pub const APPLICATIONS_PREFIX: &str = "applications";

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
///
/// An empty segment becomes `_`.
pub fn sanitize_segment(segment: &str) -> String {
    let cleaned: String = segment
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}

/// Storage path for a citizen document.
pub fn document_path(user_id: &str, category: &str, file_id: &str) -> String {
    format!(
        "{DOCUMENTS_PREFIX}/{}/{}/{}",
        sanitize_segment(user_id),
        sanitize_segment(category),
        sanitize_segment(file_id)
    )
}

/// Storage path for an application attachment.
pub fn application_file_path(user_id: &str, service_type: ServiceType, file_id: &str) -> String {
    format!(
        "{APPLICATIONS_PREFIX}/{}/{}/{}",
        sanitize_segment(user_id),
        service_type.as_str(),
        sanitize_segment(file_id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_path_layout() {
        assert_eq!(
            document_path("u123", "identity", "f-1"),
            "documents/u123/identity/f-1"
        );
    }

    #[test]
    fn application_path_layout() {
        assert_eq!(
            application_file_path("u123", ServiceType::BirthCertificate, "abc_1"),
            "applications/u123/birth_certificate/abc_1"
        );
    }

    #[test]
    fn segments_cannot_escape() {
        assert_eq!(
            document_path("../../etc", "a/b", "x.pdf"),
            "documents/______etc/a_b/x_pdf"
        );
        assert_eq!(sanitize_segment("   "), "_");
    }
}
