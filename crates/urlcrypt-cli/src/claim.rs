//! Email verification links.
//!
//! A link carries its own proof: the claim (who, when, from where) is sealed into the token in
//! the last path segment, so checking a link needs only the secret and a clock.

use std::net::IpAddr;

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use urlcrypt::Token;

/// Tolerated difference between the issuing and verifying clocks.
pub const MAX_CLOCK_SKEW: SignedDuration = SignedDuration::from_secs(60);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimError {
    #[error("'{0}' is not an email address")]
    InvalidEmail(String),

    #[error("link expired: issued {age:#} ago, links are valid for {max_age:#}")]
    Expired {
        age: SignedDuration,
        max_age: SignedDuration,
    },

    #[error("link was issued in the future ({0})")]
    IssuedInFuture(Timestamp),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationClaim {
    pub email: String,
    pub issued_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_address: Option<IpAddr>,
}

impl VerificationClaim {
    pub fn new(
        email: &str,
        source_address: Option<IpAddr>,
        issued_at: Timestamp,
    ) -> Result<VerificationClaim, ClaimError> {
        let email = email.trim();
        if !is_plausible_email(email) {
            return Err(ClaimError::InvalidEmail(email.to_string()));
        }

        Ok(VerificationClaim {
            email: email.to_string(),
            issued_at,
            source_address,
        })
    }

    /// Accept the claim if it was issued no more than `max_age` before `now`.
    pub fn check_age(&self, now: Timestamp, max_age: SignedDuration) -> Result<(), ClaimError> {
        let age = now.duration_since(self.issued_at);

        if age < -MAX_CLOCK_SKEW {
            return Err(ClaimError::IssuedInFuture(self.issued_at));
        }

        if age > max_age {
            return Err(ClaimError::Expired { age, max_age });
        }

        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Append `token` to `base_url` as a new path segment.
pub fn make_link(base_url: &str, token: &Token) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), token)
}

/// Extract the token from a verification link. A bare token is returned unchanged.
pub fn token_from_link(link: &str) -> &str {
    let link = link.trim();
    let link = link.split(['?', '#']).next().unwrap_or(link);
    let link = link.trim_end_matches('/');

    link.rsplit('/').next().unwrap_or(link)
}

#[cfg(test)]
mod tests {
    use urlcrypt::{Codec, CodecConfig};

    use super::*;

    fn codec() -> Codec {
        let config = CodecConfig::builder("a".repeat(43))
            .iterations(1000)
            .build()
            .unwrap();
        Codec::from_config(config)
    }

    fn ts(seconds: i64) -> Timestamp {
        Timestamp::from_second(seconds).unwrap()
    }

    #[test]
    fn claim_roundtrips_through_codec() {
        let claim = VerificationClaim::new(
            "email@example.com",
            Some("192.0.2.7".parse().unwrap()),
            ts(1_700_000_000),
        )
        .unwrap();

        let codec = codec();
        let token = codec.encode(&claim).unwrap();
        let decoded: VerificationClaim = codec.decode(token.as_str()).unwrap();

        assert_eq!(decoded, claim);
    }

    #[test]
    fn claim_serializes_with_camel_case_fields() {
        let claim = VerificationClaim::new("email@example.com", None, ts(0)).unwrap();
        let json = serde_json::to_value(&claim).unwrap();

        assert_eq!(json["email"], "email@example.com");
        assert_eq!(json["issuedAt"], "1970-01-01T00:00:00Z");
        assert!(json.get("sourceAddress").is_none());
    }

    #[test]
    fn email_is_trimmed_and_checked() {
        let claim = VerificationClaim::new("  email@example.com\n", None, ts(0)).unwrap();
        assert_eq!(claim.email, "email@example.com");

        for bad in ["", "example.com", "@example.com", "email@", "a@b@c", "a b@example.com"] {
            assert!(
                matches!(
                    VerificationClaim::new(bad, None, ts(0)),
                    Err(ClaimError::InvalidEmail(_))
                ),
                "{bad:?} accepted"
            );
        }
    }

    #[test]
    fn fresh_claim_is_accepted() {
        let claim = VerificationClaim::new("email@example.com", None, ts(1_000)).unwrap();
        let max_age = SignedDuration::from_hours(24);

        assert!(claim.check_age(ts(1_000), max_age).is_ok());
        assert!(claim.check_age(ts(1_000 + 86_400), max_age).is_ok());
    }

    #[test]
    fn old_claim_is_rejected() {
        let claim = VerificationClaim::new("email@example.com", None, ts(1_000)).unwrap();
        let max_age = SignedDuration::from_hours(24);

        assert_eq!(
            claim.check_age(ts(1_000 + 86_401), max_age),
            Err(ClaimError::Expired {
                age: SignedDuration::from_secs(86_401),
                max_age,
            })
        );
    }

    #[test]
    fn future_claim_is_rejected_beyond_skew() {
        let claim = VerificationClaim::new("email@example.com", None, ts(10_000)).unwrap();
        let max_age = SignedDuration::from_hours(24);

        assert!(claim.check_age(ts(10_000 - 60), max_age).is_ok());
        assert_eq!(
            claim.check_age(ts(10_000 - 61), max_age),
            Err(ClaimError::IssuedInFuture(ts(10_000)))
        );
    }

    #[test]
    fn link_joins_base_and_token() {
        let token = codec().encode("x").unwrap();

        let with_slash = make_link("http://localhost:9876/register/checkLink/", &token);
        let without_slash = make_link("http://localhost:9876/register/checkLink", &token);

        assert_eq!(with_slash, without_slash);
        assert_eq!(
            with_slash,
            format!("http://localhost:9876/register/checkLink/{token}")
        );
    }

    #[test]
    fn token_is_extracted_from_link() {
        let token = codec().encode("x").unwrap();
        let link = make_link("https://example.com/register/checkLink", &token);

        assert_eq!(token_from_link(&link), token.as_str());
        assert_eq!(token_from_link(&format!("{link}/")), token.as_str());
        assert_eq!(token_from_link(&format!("{link}?utm=mail")), token.as_str());
        assert_eq!(token_from_link(&format!("{link}#top")), token.as_str());
        assert_eq!(token_from_link(&format!("  {link}\n")), token.as_str());
        assert_eq!(token_from_link(token.as_str()), token.as_str());
    }
}
