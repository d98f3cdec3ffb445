//! Identity models.

use attar::ids::UserUuid;
use serde::Deserialize;

/// Role granting access to the admin endpoints.
pub const ADMIN_ROLE: &str = "admin";

/// A user as reported by token introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUser {
    pub id: UserUuid,
    pub email: Option<String>,
    pub metadata: UserMetadata,
}

impl IdentityUser {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.metadata.role.as_deref() == Some(ADMIN_ROLE)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub role: Option<String>,
}

/// Wire body of `GET /auth/v1/user`.
#[derive(Debug, Deserialize)]
pub(crate) struct IntrospectionBody {
    pub(crate) id: String,

    #[serde(default)]
    pub(crate) email: Option<String>,

    #[serde(default)]
    pub(crate) user_metadata: UserMetadata,
}

impl TryFrom<IntrospectionBody> for IdentityUser {
    type Error = uuid::Error;

    fn try_from(body: IntrospectionBody) -> Result<Self, Self::Error> {
        Ok(Self {
            id: body.id.parse()?,
            email: body.email.filter(|email| !email.is_empty()),
            metadata: body.user_metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_introspection_body() -> TestResult {
        let body: IntrospectionBody = serde_json::from_value(serde_json::json!({
            "id": "0190f5e2-6c1b-7a4e-8a31-5b2f6f0f1c2d",
            "email": "layla@example.com",
            "user_metadata": { "full_name": "Layla", "role": "admin" },
        }))?;

        let user = IdentityUser::try_from(body)?;

        assert_eq!(user.id.to_string(), "0190f5e2-6c1b-7a4e-8a31-5b2f6f0f1c2d");
        assert_eq!(user.email.as_deref(), Some("layla@example.com"));
        assert!(user.is_admin());

        Ok(())
    }

    #[test]
    fn missing_metadata_means_customer() -> TestResult {
        let body: IntrospectionBody = serde_json::from_value(serde_json::json!({
            "id": "0190f5e2-6c1b-7a4e-8a31-5b2f6f0f1c2d",
        }))?;

        let user = IdentityUser::try_from(body)?;

        assert!(!user.is_admin());
        assert_eq!(user.email, None);

        Ok(())
    }
}
