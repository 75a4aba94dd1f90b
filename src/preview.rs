//! Signature preview bookkeeping.
//!
//! Every file selection issues a new token; a finished read is only shown
//! if its token is still the latest one, so a slow read for an abandoned
//! selection can never overwrite a newer preview.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewToken(u64);

#[derive(Debug, Default)]
pub struct PreviewTokens {
    latest: u64,
}

impl PreviewTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding any pending one.
    pub fn issue(&mut self) -> PreviewToken {
        self.latest = self.latest.wrapping_add(1);
        PreviewToken(self.latest)
    }

    /// Drop whatever is pending without starting a new read.
    pub fn invalidate(&mut self) {
        self.issue();
    }

    pub fn is_current(&self, token: PreviewToken) -> bool {
        token.0 == self.latest
    }
}

/// Whether a file's declared MIME type is an image.
pub fn is_image_type(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_token_wins() {
        let mut tokens = PreviewTokens::new();
        let first = tokens.issue();
        let second = tokens.issue();
        assert!(!tokens.is_current(first));
        assert!(tokens.is_current(second));
    }

    #[test]
    fn invalidate_drops_pending_read() {
        let mut tokens = PreviewTokens::new();
        let pending = tokens.issue();
        tokens.invalidate();
        assert!(!tokens.is_current(pending));
    }

    #[test]
    fn image_types() {
        assert!(is_image_type("image/png"));
        assert!(is_image_type("image/jpeg"));
        assert!(is_image_type("IMAGE/GIF"));
        assert!(!is_image_type("application/pdf"));
        assert!(!is_image_type(""));
    }
}
