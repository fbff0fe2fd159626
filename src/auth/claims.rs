use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload used for authentication. A single token kind: bearer tokens
/// are valid until natural expiry and re-login is required afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,   // user ID
    pub iat: usize,  // issued at (unix timestamp)
    pub exp: usize,  // expires at (unix timestamp)
    pub iss: String, // issuer
    pub aud: String, // audience
}
