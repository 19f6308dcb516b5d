//! JWT claim structure for access tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// JWT claims for access tokens.
///
/// The subject is the id of the teacher who logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Teacher ID (subject claim)
    pub sub: String,
    /// Login name of the teacher
    pub username: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    /// The subject parsed as a teacher id.
    pub fn teacher_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize() {
        let claims = Claims {
            sub: "teacher-id-123".to_string(),
            username: "jdoe".to_string(),
            exp: 1234567890,
            iat: 1234567800,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""sub":"teacher-id-123""#));
        assert!(serialized.contains(r#""username":"jdoe""#));
    }

    #[test]
    fn test_claims_deserialize() {
        let json = r#"{"sub":"abc","username":"ms.frizzle","exp":9999999999,"iat":9999999900}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.username, "ms.frizzle");
        assert_eq!(claims.exp, 9999999999);
        assert!(claims.teacher_id().is_none());
    }

    #[test]
    fn test_teacher_id_parses_uuid_subject() {
        let id = Uuid::new_v4();
        let claims = Claims {
            sub: id.to_string(),
            username: "jdoe".to_string(),
            exp: 0,
            iat: 0,
        };
        assert_eq!(claims.teacher_id(), Some(id));
    }
}
