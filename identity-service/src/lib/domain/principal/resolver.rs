use std::sync::Arc;

use crate::domain::principal::errors::IdentityError;
use crate::domain::principal::models::Principal;
use crate::domain::principal::models::Role;
use crate::domain::principal::models::RoleEntity;
use crate::domain::principal::ports::RoleEntityRepository;

/// Maps a principal's `{role, role_entity_ref}` pair to the concrete
/// role-specific record.
///
/// This is the only place the role tag is interpreted. Dispatch is
/// exhaustive over the closed role set; a tag outside it is surfaced as
/// [`IdentityError::UnknownRole`], never silently ignored. A missing record
/// behind a valid tag is a dangling weak reference and resolves to
/// `Ok(None)`: callers treat that as "proceed without enriched profile
/// data", never as an authentication failure.
pub struct EntityResolver<RR>
where
    RR: RoleEntityRepository,
{
    entities: Arc<RR>,
}

impl<RR> EntityResolver<RR>
where
    RR: RoleEntityRepository,
{
    pub fn new(entities: Arc<RR>) -> Self {
        Self { entities }
    }

    /// Resolve the role-specific record a principal points at.
    ///
    /// # Errors
    /// * `UnknownRole` - Role tag outside the closed set
    /// * `StoreUnavailable` - Underlying fetch failed or timed out
    pub async fn resolve(
        &self,
        principal: &Principal,
    ) -> Result<Option<RoleEntity>, IdentityError> {
        let role = Role::from_tag(&principal.role)
            .ok_or_else(|| IdentityError::UnknownRole(principal.role.to_string()))?;

        let entity = match role {
            Role::Employee => self
                .entities
                .find_employee(&principal.role_entity_ref)
                .await?
                .map(RoleEntity::Employee),
            Role::Admin => self
                .entities
                .find_admin(&principal.role_entity_ref)
                .await?
                .map(RoleEntity::Admin),
            Role::SuperAdmin => self
                .entities
                .find_super_admin(&principal.role_entity_ref)
                .await?
                .map(RoleEntity::SuperAdmin),
        };

        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::company::models::CompanyId;
    use crate::domain::principal::models::Admin;
    use crate::domain::principal::models::EmailAddress;
    use crate::domain::principal::models::Employee;
    use crate::domain::principal::models::PrincipalId;
    use crate::domain::principal::models::RoleEntityId;
    use crate::domain::principal::models::RoleTag;
    use crate::domain::principal::models::SuperAdmin;
    use crate::domain::principal::models::Username;

    mock! {
        pub TestRoleEntityRepository {}

        #[async_trait]
        impl RoleEntityRepository for TestRoleEntityRepository {
            async fn find_employee(&self, id: &RoleEntityId) -> Result<Option<Employee>, IdentityError>;
            async fn find_admin(&self, id: &RoleEntityId) -> Result<Option<Admin>, IdentityError>;
            async fn find_super_admin(&self, id: &RoleEntityId) -> Result<Option<SuperAdmin>, IdentityError>;
        }
    }

    fn principal_with_role(tag: &str, entity_ref: RoleEntityId) -> Principal {
        Principal {
            id: PrincipalId::new(),
            user_name: Username::new("jdoe_01".to_string()).unwrap(),
            email: EmailAddress::new("jdoe@corp.com".to_string()).unwrap(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            mobile: "5550001234".to_string(),
            role: RoleTag::new(tag),
            role_entity_ref: entity_ref,
            company_id: CompanyId::new(),
            is_active: true,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_resolve_employee() {
        let entity_ref = RoleEntityId::new();
        let mut entities = MockTestRoleEntityRepository::new();

        entities
            .expect_find_employee()
            .withf(move |id| *id == entity_ref)
            .times(1)
            .returning(move |id| {
                Ok(Some(Employee {
                    id: *id,
                    first_name: "Jane".to_string(),
                    last_name: "Doe".to_string(),
                    email: EmailAddress::new("jdoe@corp.com".to_string()).unwrap(),
                    emp_code: "EMP-0042".to_string(),
                    department: Some("Engineering".to_string()),
                    designation: None,
                }))
            });

        let resolver = EntityResolver::new(Arc::new(entities));
        let principal = principal_with_role("employee", entity_ref);

        let resolved = resolver.resolve(&principal).await.unwrap();
        let entity = resolved.expect("expected an employee record");
        assert_eq!(entity.id(), entity_ref);
        assert!(matches!(entity, RoleEntity::Employee(_)));
    }

    #[tokio::test]
    async fn test_resolve_admin() {
        let entity_ref = RoleEntityId::new();
        let mut entities = MockTestRoleEntityRepository::new();

        entities.expect_find_admin().times(1).returning(move |id| {
            Ok(Some(Admin {
                id: *id,
                first_name: "Sam".to_string(),
                last_name: "Lee".to_string(),
                user_name: "slee".to_string(),
                email: EmailAddress::new("slee@corp.com".to_string()).unwrap(),
                permissions: vec!["read".to_string(), "write".to_string()],
            }))
        });

        let resolver = EntityResolver::new(Arc::new(entities));
        let principal = principal_with_role("admin", entity_ref);

        let resolved = resolver.resolve(&principal).await.unwrap();
        assert!(matches!(resolved, Some(RoleEntity::Admin(_))));
    }

    #[tokio::test]
    async fn test_dangling_reference_resolves_to_none() {
        let mut entities = MockTestRoleEntityRepository::new();
        entities
            .expect_find_employee()
            .times(1)
            .returning(|_| Ok(None));

        let resolver = EntityResolver::new(Arc::new(entities));
        let principal = principal_with_role("employee", RoleEntityId::new());

        let resolved = resolver.resolve(&principal).await.unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn test_unknown_role_tag_is_rejected() {
        // No expectations: an unknown tag must fail before any fetch.
        let entities = MockTestRoleEntityRepository::new();

        let resolver = EntityResolver::new(Arc::new(entities));
        let principal = principal_with_role("ghost", RoleEntityId::new());

        let result = resolver.resolve(&principal).await;
        match result {
            Err(IdentityError::UnknownRole(tag)) => assert_eq!(tag, "ghost"),
            other => panic!("expected UnknownRole, got {:?}", other.map(|_| ())),
        }
    }
}
