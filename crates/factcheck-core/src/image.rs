//! Image verification.
//!
//! The hosted backend has no vision model, so every image request gets the
//! same "unavailable" result.

use factcheck_contracts::result::VerificationResult;

/// Return the fixed "unsupported" result. The bytes are never inspected.
pub fn verify_image(_image: &[u8]) -> VerificationResult {
    VerificationResult::new(
        false,
        0,
        "Image analysis is not available in cloud deployment. Please use text or PDF files.",
        vec!["Image verification requires local deployment with LLaVA model".to_string()],
        "Image verification unavailable",
    )
}
