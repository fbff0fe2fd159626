use rand::distributions::Alphanumeric;
use rand::Rng;
use time::{Duration, OffsetDateTime};

use crate::auth::password::verify_password;

/// A pending reset code is valid for ten minutes after issuance.
pub const OTP_TTL_MINUTES: i64 = 10;

/// Random 6-digit numeric code for the password reset flow.
pub fn generate_otp() -> String {
    rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}

/// Random temporary password for admin-created committee accounts.
pub fn generate_temporary_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

pub fn otp_expiry_from(now: OffsetDateTime) -> OffsetDateTime {
    now + Duration::minutes(OTP_TTL_MINUTES)
}

/// Outcome of a reset attempt against the stored credential fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetCheck {
    /// No pending reset on the account.
    Missing,
    /// The pending code has expired; the caller must clear the stored state.
    Expired,
    /// A pending code exists but the supplied one does not match. The
    /// pending state stays in place.
    Mismatch,
    Valid,
}

/// Decide a reset attempt. Expiry is evaluated before the hash comparison so
/// an expired code never validates, even when the hash would match.
pub fn check_reset(
    otp_hash: Option<&str>,
    expires_at: Option<OffsetDateTime>,
    code: &str,
    now: OffsetDateTime,
) -> ResetCheck {
    let (Some(hash), Some(expires_at)) = (otp_hash, expires_at) else {
        return ResetCheck::Missing;
    };
    if now > expires_at {
        return ResetCheck::Expired;
    }
    match verify_password(code, hash) {
        Ok(true) => ResetCheck::Valid,
        _ => ResetCheck::Mismatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;

    #[test]
    fn otp_is_six_ascii_digits() {
        for _ in 0..50 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 6);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn temporary_password_is_long_enough() {
        let pw = generate_temporary_password();
        assert_eq!(pw.len(), 16);
        assert!(pw.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn check_reset_missing_without_pending_state() {
        let now = OffsetDateTime::now_utc();
        assert_eq!(check_reset(None, None, "123456", now), ResetCheck::Missing);
        // Partially cleared state counts as missing too.
        assert_eq!(
            check_reset(Some("hash"), None, "123456", now),
            ResetCheck::Missing
        );
    }

    #[test]
    fn check_reset_valid_within_window() {
        let now = OffsetDateTime::now_utc();
        let hash = hash_password("654321").expect("hash");
        let expires = otp_expiry_from(now);
        assert_eq!(
            check_reset(Some(&hash), Some(expires), "654321", now),
            ResetCheck::Valid
        );
    }

    #[test]
    fn check_reset_mismatch_keeps_state_meaning() {
        let now = OffsetDateTime::now_utc();
        let hash = hash_password("654321").expect("hash");
        let expires = otp_expiry_from(now);
        assert_eq!(
            check_reset(Some(&hash), Some(expires), "000000", now),
            ResetCheck::Mismatch
        );
    }

    #[test]
    fn expired_code_never_validates_even_if_hash_matches() {
        let issued = OffsetDateTime::now_utc();
        let hash = hash_password("654321").expect("hash");
        let expires = otp_expiry_from(issued);
        let later = expires + Duration::seconds(1);
        assert_eq!(
            check_reset(Some(&hash), Some(expires), "654321", later),
            ResetCheck::Expired
        );
    }

    #[test]
    fn code_at_exact_expiry_still_validates() {
        let issued = OffsetDateTime::now_utc();
        let hash = hash_password("654321").expect("hash");
        let expires = otp_expiry_from(issued);
        assert_eq!(
            check_reset(Some(&hash), Some(expires), "654321", expires),
            ResetCheck::Valid
        );
    }
}
