use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Claims;
use chrono::Utc;

use crate::domain::principal::errors::IdentityError;
use crate::domain::principal::models::AuthenticatedPrincipal;
use crate::domain::principal::models::ChangePasswordCommand;
use crate::domain::principal::models::EmailAddress;
use crate::domain::principal::models::PasswordDigest;
use crate::domain::principal::models::Principal;
use crate::domain::principal::models::PrincipalId;
use crate::domain::principal::models::PrincipalProfile;
use crate::domain::principal::models::RegisterPrincipalCommand;
use crate::domain::principal::models::RoleTag;
use crate::domain::principal::models::UpdateProfileCommand;
use crate::domain::principal::models::validate_password_strength;
use crate::domain::principal::ports::IdentityServicePort;
use crate::domain::principal::ports::PrincipalRepository;
use crate::domain::principal::ports::RoleEntityRepository;
use crate::domain::principal::resolver::EntityResolver;

/// Domain service for principal authentication and account operations.
///
/// Orchestrates the credential store, the password hasher / token issuer
/// (via [`auth::Authenticator`]) and the entity resolver. All dependencies
/// are injected; there is no process-wide state.
pub struct IdentityService<PR, RR>
where
    PR: PrincipalRepository,
    RR: RoleEntityRepository,
{
    principals: Arc<PR>,
    resolver: EntityResolver<RR>,
    authenticator: Arc<Authenticator>,
    token_ttl_days: i64,
}

impl<PR, RR> IdentityService<PR, RR>
where
    PR: PrincipalRepository,
    RR: RoleEntityRepository,
{
    /// Create a new identity service with injected dependencies.
    ///
    /// # Arguments
    /// * `principals` - Principal persistence implementation
    /// * `role_entities` - Role-entity lookup implementation
    /// * `authenticator` - Password verification and token minting
    /// * `token_ttl_days` - Bearer token lifetime in days
    pub fn new(
        principals: Arc<PR>,
        role_entities: Arc<RR>,
        authenticator: Arc<Authenticator>,
        token_ttl_days: i64,
    ) -> Self {
        Self {
            principals,
            resolver: EntityResolver::new(role_entities),
            authenticator,
            token_ttl_days,
        }
    }
}

#[async_trait]
impl<PR, RR> IdentityServicePort for IdentityService<PR, RR>
where
    PR: PrincipalRepository,
    RR: RoleEntityRepository,
{
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedPrincipal, IdentityError> {
        // Normalization also rejects malformed input; an address that cannot
        // exist folds into the same error as one that does not.
        let email = EmailAddress::new(email.to_string())
            .map_err(|_| IdentityError::InvalidCredentials)?;

        let mut principal = self
            .principals
            .find_by_email(&email)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        // The digest is outside the default projection; load it explicitly.
        let digest = self
            .principals
            .load_password_hash(&principal.id)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        let claims = Claims::for_principal(
            principal.id,
            principal.email.as_str().to_string(),
            principal.role.as_str().to_string(),
            self.token_ttl_days,
        );
        let token = self
            .authenticator
            .authenticate(password, digest.as_str(), &claims)
            .map_err(IdentityError::from)?
            .access_token;

        // Enrichment is best-effort: a dangling reference yields None, but a
        // corrupt role tag still aborts loudly.
        let role_entity = self.resolver.resolve(&principal).await?;

        let now = Utc::now();
        if let Err(e) = self.principals.record_login(&principal.id, now).await {
            tracing::warn!(
                "Failed to record login for principal {}: {}",
                principal.id,
                e
            );
        }
        principal.last_login_at = Some(now);

        Ok(AuthenticatedPrincipal {
            principal,
            role_entity,
            token,
        })
    }

    async fn register(
        &self,
        command: RegisterPrincipalCommand,
    ) -> Result<Principal, IdentityError> {
        validate_password_strength(&command.password)?;

        // Hash exactly once, here, where the password value is set.
        let digest = PasswordDigest::new(self.authenticator.hash_password(&command.password)?);

        let now = Utc::now();
        let principal = Principal {
            id: PrincipalId::new(),
            user_name: command.user_name,
            email: command.email,
            first_name: command.first_name,
            last_name: command.last_name,
            mobile: command.mobile,
            role: RoleTag::from(command.role),
            role_entity_ref: command.role_entity_ref,
            company_id: command.company_id,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };

        self.principals.create(principal, digest).await
    }

    async fn get_profile(&self, id: &PrincipalId) -> Result<PrincipalProfile, IdentityError> {
        let principal = self
            .principals
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::NotFound(id.to_string()))?;

        let role_entity = self.resolver.resolve(&principal).await?;

        Ok(PrincipalProfile {
            principal,
            role_entity,
        })
    }

    async fn update_profile(
        &self,
        id: &PrincipalId,
        command: UpdateProfileCommand,
    ) -> Result<Principal, IdentityError> {
        let mut principal = self
            .principals
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::NotFound(id.to_string()))?;

        if let Some(new_user_name) = command.user_name {
            principal.user_name = new_user_name;
        }

        if let Some(new_first_name) = command.first_name {
            principal.first_name = new_first_name;
        }

        if let Some(new_last_name) = command.last_name {
            principal.last_name = new_last_name;
        }

        if let Some(new_mobile) = command.mobile {
            principal.mobile = new_mobile;
        }

        principal.updated_at = Utc::now();

        self.principals.update_profile(principal).await
    }

    async fn change_password(
        &self,
        id: &PrincipalId,
        command: ChangePasswordCommand,
    ) -> Result<(), IdentityError> {
        let principal = self
            .principals
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::NotFound(id.to_string()))?;

        let digest = self
            .principals
            .load_password_hash(&principal.id)
            .await?
            .ok_or(IdentityError::NotFound(id.to_string()))?;

        let current_matches = self
            .authenticator
            .verify_password(&command.current_password, digest.as_str())?;
        if !current_matches {
            return Err(IdentityError::InvalidCredentials);
        }

        validate_password_strength(&command.new_password)?;

        let new_digest =
            PasswordDigest::new(self.authenticator.hash_password(&command.new_password)?);

        self.principals
            .update_password_hash(&principal.id, &new_digest)
            .await
    }
}
