use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::principal::errors::IdParseError;
use crate::domain::principal::models::EmailAddress;

/// Company unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompanyId(pub Uuid);

impl CompanyId {
    /// Generate a new random company ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a company ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, IdParseError> {
        Uuid::parse_str(s)
            .map(CompanyId)
            .map_err(|e| IdParseError::InvalidFormat(e.to_string()))
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Per-module access switches granted to a company account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModulePermissions {
    pub hrm: bool,
    pub crm: bool,
    pub recruitment: bool,
}

impl Default for ModulePermissions {
    fn default() -> Self {
        Self {
            hrm: true,
            crm: false,
            recruitment: false,
        }
    }
}

/// Company aggregate entity: the second top-level principal type.
///
/// A company authenticates against its own collection, independently of the
/// generic-user collection; like [`Principal`] it carries no password field,
/// the digest stays behind the repository's explicit load capability.
///
/// [`Principal`]: crate::domain::principal::models::Principal
#[derive(Debug, Clone)]
pub struct Company {
    pub id: CompanyId,
    pub company_name: String,
    pub email: EmailAddress,
    pub phone: String,
    pub address: String,
    pub gst_number: String,
    pub module_permissions: ModulePermissions,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Command to register a new company with domain types.
#[derive(Debug)]
pub struct RegisterCompanyCommand {
    pub company_name: String,
    pub email: EmailAddress,
    pub phone: String,
    pub address: String,
    pub gst_number: String,
    pub password: String,
    pub module_permissions: ModulePermissions,
}

/// Result of a successful company authentication.
#[derive(Debug)]
pub struct AuthenticatedCompany {
    pub company: Company,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_permissions_default_to_hrm_only() {
        let permissions = ModulePermissions::default();
        assert!(permissions.hrm);
        assert!(!permissions.crm);
        assert!(!permissions.recruitment);
    }

    #[test]
    fn test_company_id_parse() {
        let id = CompanyId::new();
        let parsed = CompanyId::from_string(&id.to_string()).unwrap();
        assert_eq!(parsed, id);

        assert!(CompanyId::from_string("not-a-uuid").is_err());
    }
}
