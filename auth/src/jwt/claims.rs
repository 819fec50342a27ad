use std::collections::HashMap;

use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Bearer-token payload for the HR identity platform.
///
/// Carries the standard RFC 7519 claims the platform uses plus the identity
/// fields every consumer of a token needs: the principal's email and role
/// tag. Anything else goes through the flattened `extra` map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (principal or company identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Email address of the authenticated identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Role tag ("employee", "admin", "super_admin") for principals;
    /// absent on company tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Additional custom fields (flattened into the token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create claims for an authenticated principal.
    ///
    /// # Arguments
    /// * `principal_id` - Unique principal identifier
    /// * `email` - Normalized email address
    /// * `role` - Role tag carried by the principal
    /// * `expiration_days` - Days until the token expires
    ///
    /// # Returns
    /// Claims with sub, exp, iat, email, and role set
    pub fn for_principal(
        principal_id: impl ToString,
        email: String,
        role: String,
        expiration_days: i64,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::days(expiration_days);

        Self {
            sub: Some(principal_id.to_string()),
            exp: Some(expiration.timestamp()),
            iat: Some(now.timestamp()),
            iss: None,
            email: Some(email),
            role: Some(role),
            extra: HashMap::new(),
        }
    }

    /// Create claims for an authenticated company.
    ///
    /// Company tokens carry no role tag; the subject alone identifies the
    /// company account.
    pub fn for_company(company_id: impl ToString, email: String, expiration_days: i64) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::days(expiration_days);

        Self {
            sub: Some(company_id.to_string()),
            exp: Some(expiration.timestamp()),
            iat: Some(now.timestamp()),
            iss: None,
            email: Some(email),
            role: None,
            extra: HashMap::new(),
        }
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Set issuer.
    pub fn with_issuer(mut self, iss: String) -> Self {
        self.iss = Some(iss);
        self
    }

    /// Set email.
    pub fn with_email(mut self, email: String) -> Self {
        self.email = Some(email);
        self
    }

    /// Set role tag.
    pub fn with_role(mut self, role: String) -> Self {
        self.role = Some(role);
        self
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Check if the token is expired at the given instant.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp.map_or(false, |exp| exp < current_timestamp)
    }
}

impl Default for Claims {
    fn default() -> Self {
        Self {
            sub: None,
            exp: None,
            iat: None,
            iss: None,
            email: None,
            role: None,
            extra: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claims() {
        let claims = Claims::new().with_subject("principal-1");
        assert_eq!(claims.sub, Some("principal-1".to_string()));
        assert!(claims.exp.is_none());
        assert!(claims.role.is_none());
    }

    #[test]
    fn test_for_principal() {
        let claims = Claims::for_principal(
            "principal-1",
            "a@x.com".to_string(),
            "employee".to_string(),
            7,
        );

        assert_eq!(claims.sub, Some("principal-1".to_string()));
        assert_eq!(claims.email, Some("a@x.com".to_string()));
        assert_eq!(claims.role, Some("employee".to_string()));

        let exp = claims.exp.unwrap();
        let iat = claims.iat.unwrap();
        assert_eq!(exp - iat, 7 * 24 * 60 * 60); // 7 days
    }

    #[test]
    fn test_for_company_has_no_role() {
        let claims = Claims::for_company("company-1", "hr@corp.com".to_string(), 7);

        assert_eq!(claims.sub, Some("company-1".to_string()));
        assert_eq!(claims.email, Some("hr@corp.com".to_string()));
        assert!(claims.role.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let claims = Claims::new()
            .with_subject("principal-1")
            .with_expiration(1234567890)
            .with_issued_at(1234567800)
            .with_issuer("identity-service".to_string())
            .with_role("admin".to_string())
            .with_extra("company_id", "company-1");

        assert_eq!(claims.sub, Some("principal-1".to_string()));
        assert_eq!(claims.exp, Some(1234567890));
        assert_eq!(claims.iat, Some(1234567800));
        assert_eq!(claims.iss, Some("identity-service".to_string()));
        assert_eq!(claims.role, Some("admin".to_string()));
        assert_eq!(
            claims.extra.get("company_id").unwrap().as_str(),
            Some("company-1")
        );
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims::new().with_expiration(1000);

        assert!(!claims.is_expired(999));
        assert!(!claims.is_expired(1000));
        assert!(claims.is_expired(1001));
    }

    #[test]
    fn test_is_expired_no_exp_claim() {
        let claims = Claims::new();
        assert!(!claims.is_expired(9999999999)); // Never expires without exp
    }
}
