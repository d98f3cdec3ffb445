//! Purchaser resolution.

use std::sync::Arc;

use attar::{address::parse_delivery_address, ids::UserUuid, purchaser::Purchaser};
use tracing::debug;

use crate::identity::{IdentityError, IdentityProvider, bearer_token};

/// What the caller claims about who they are.
#[derive(Debug, Clone, Copy)]
pub struct IdentityClaim<'a> {
    pub is_guest: bool,
    pub claimed_user: Option<UserUuid>,
    /// Raw `Authorization` header value.
    pub authorization: Option<&'a str>,
    pub delivery_address: &'a str,
}

#[derive(Clone)]
pub struct IdentityResolver {
    provider: Arc<dyn IdentityProvider>,
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver").finish_non_exhaustive()
    }
}

impl IdentityResolver {
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Resolve the purchaser for a checkout.
    ///
    /// Guests are described by the contact segments of the delivery address.
    /// Registered customers are identified by the claimed user id, falling
    /// back to token introspection; their contact email and name fall back to
    /// the address segments when the provider has none.
    ///
    /// # Errors
    ///
    /// - [`IdentityError::MissingCredentials`]: registered checkout with
    ///   neither a user id nor a bearer token.
    /// - Any error from the identity provider.
    pub async fn resolve(&self, claim: IdentityClaim<'_>) -> Result<Purchaser, IdentityError> {
        if claim.is_guest {
            return Ok(Purchaser::guest_from_address(claim.delivery_address));
        }

        let contact = parse_delivery_address(claim.delivery_address).contact;

        if let Some(user) = claim.claimed_user {
            return Ok(Purchaser::Registered {
                user,
                email: contact.email,
                name: contact.name,
            });
        }

        let token = claim
            .authorization
            .and_then(bearer_token)
            .ok_or(IdentityError::MissingCredentials)?;

        let identity = self.provider.introspect(token).await?;

        debug!(user_uuid = %identity.id, "resolved purchaser from token");

        Ok(Purchaser::Registered {
            user: identity.id,
            email: identity.email.or(contact.email),
            name: identity.metadata.full_name.or(contact.name),
        })
    }

    /// Introspect a bearer token directly.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::MissingCredentials`] when the header is not a
    /// bearer token, or any error from the identity provider.
    pub async fn authenticate(
        &self,
        authorization: &str,
    ) -> Result<crate::identity::models::IdentityUser, IdentityError> {
        let token = bearer_token(authorization).ok_or(IdentityError::MissingCredentials)?;

        self.provider.introspect(token).await
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use testresult::TestResult;

    use crate::identity::{
        MockIdentityProvider,
        models::{IdentityUser, UserMetadata},
    };

    use super::*;

    const ADDRESS: &str = "Villa 9, Al Barsha, Dubai | Contact: Noor | Phone: 0501112222 | Email: noor@example.com";

    fn resolver(provider: MockIdentityProvider) -> IdentityResolver {
        IdentityResolver::new(Arc::new(provider))
    }

    #[tokio::test]
    async fn guests_are_read_from_the_address() -> TestResult {
        let purchaser = resolver(MockIdentityProvider::new())
            .resolve(IdentityClaim {
                is_guest: true,
                claimed_user: None,
                authorization: Some("Bearer ignored"),
                delivery_address: ADDRESS,
            })
            .await?;

        assert_eq!(
            purchaser,
            Purchaser::Guest {
                name: Some("Noor".to_string()),
                email: Some("noor@example.com".to_string()),
                phone: Some("0501112222".to_string()),
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn claimed_user_skips_introspection() -> TestResult {
        let user = UserUuid::new();

        let purchaser = resolver(MockIdentityProvider::new())
            .resolve(IdentityClaim {
                is_guest: false,
                claimed_user: Some(user),
                authorization: None,
                delivery_address: ADDRESS,
            })
            .await?;

        assert_eq!(purchaser.user(), Some(user));
        assert_eq!(purchaser.email(), Some("noor@example.com"));

        Ok(())
    }

    #[tokio::test]
    async fn bearer_token_is_introspected() -> TestResult {
        let user = UserUuid::new();
        let mut provider = MockIdentityProvider::new();

        provider
            .expect_introspect()
            .with(eq("token-1"))
            .times(1)
            .return_once(move |_| {
                Ok(IdentityUser {
                    id: user,
                    email: Some("account@example.com".to_string()),
                    metadata: UserMetadata {
                        full_name: Some("Account Name".to_string()),
                        ..UserMetadata::default()
                    },
                })
            });

        let purchaser = resolver(provider)
            .resolve(IdentityClaim {
                is_guest: false,
                claimed_user: None,
                authorization: Some("Bearer token-1"),
                delivery_address: ADDRESS,
            })
            .await?;

        assert_eq!(purchaser.user(), Some(user));
        assert_eq!(purchaser.email(), Some("account@example.com"));
        assert_eq!(purchaser.name(), Some("Account Name"));

        Ok(())
    }

    #[tokio::test]
    async fn registered_without_credentials_is_rejected() {
        let result = resolver(MockIdentityProvider::new())
            .resolve(IdentityClaim {
                is_guest: false,
                claimed_user: None,
                authorization: Some("Basic abc"),
                delivery_address: ADDRESS,
            })
            .await;

        assert!(
            matches!(result, Err(IdentityError::MissingCredentials)),
            "expected MissingCredentials, got {result:?}"
        );
    }

    #[tokio::test]
    async fn provider_rejection_is_propagated() {
        let mut provider = MockIdentityProvider::new();

        provider
            .expect_introspect()
            .return_once(|_| Err(IdentityError::InvalidToken));

        let result = resolver(provider)
            .resolve(IdentityClaim {
                is_guest: false,
                claimed_user: None,
                authorization: Some("Bearer expired"),
                delivery_address: ADDRESS,
            })
            .await;

        assert!(matches!(result, Err(IdentityError::InvalidToken)));
    }
}
