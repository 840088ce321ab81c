use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

/// Stored in place of a password hash for accounts created through OAuth.
/// Such accounts can never authenticate with a password.
pub const OAUTH_PASSWORD_SENTINEL: &str = "oauth";

const SCHEME: &str = "sha256";
const MIN_PASSWORD_LEN: usize = 6;

/// Salted digest in the form `sha256$<salt>$<hex>`. A fresh random salt is
/// drawn per call, so hashing the same password twice yields different strings.
pub fn hash_password(password: &str) -> String {
    let salt = uuid::Uuid::new_v4().simple().to_string();
    let digest = salted_digest(&salt, password);
    format!("{SCHEME}${salt}${digest}")
}

pub fn verify_password(stored: &str, password: &str) -> bool {
    if stored == OAUTH_PASSWORD_SENTINEL {
        return false;
    }
    let mut parts = stored.splitn(3, '$');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(salt), Some(digest)) if scheme == SCHEME => {
            salted_digest(salt, password) == digest
        }
        _ => false,
    }
}

fn salted_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b"$");
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters long");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> bool {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL_RE.get_or_init(|| {
        // Literal pattern, cannot fail to compile.
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email regex")
    });
    re.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let stored = hash_password("hunter22");
        assert!(stored.starts_with("sha256$"));
        assert!(verify_password(&stored, "hunter22"));
        assert!(!verify_password(&stored, "hunter23"));
    }

    #[test]
    fn salts_differ_between_calls() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn oauth_sentinel_never_verifies() {
        assert!(!verify_password(OAUTH_PASSWORD_SENTINEL, "oauth"));
        assert!(!verify_password(OAUTH_PASSWORD_SENTINEL, ""));
    }

    #[test]
    fn malformed_hashes_are_rejected() {
        assert!(!verify_password("", "pw"));
        assert!(!verify_password("md5$abc$def", "pw"));
        assert!(!verify_password("sha256$missingdigest", "pw"));
    }

    #[test]
    fn password_length_rule() {
        assert!(validate_password("abcdef").is_ok());
        assert!(validate_password("abcde").is_err());
    }

    #[test]
    fn email_shapes() {
        assert!(validate_email("a.user+tag@example.co"));
        assert!(validate_email("x@y.io"));
        assert!(!validate_email("not-an-email"));
        assert!(!validate_email("missing@tld"));
        assert!(!validate_email("@example.com"));
    }
}
