use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use snafu::Snafu;
use tracing::{debug, error};

use crate::LOG_TARGET;

/// One of the fixed identities a dashboard user can log in as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Administrator,
    /// Data Protection Officer
    Dpo,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Teacher, Role::Administrator, Role::Dpo];

    /// Identifier used on the wire (form field values, JSON)
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Teacher => "teacher",
            Role::Administrator => "administrator",
            Role::Dpo => "dpo",
        }
    }

    /// Human readable label, as shown in the audit log
    pub fn label(self) -> &'static str {
        match self {
            Role::Teacher => "Teacher",
            Role::Administrator => "Administrator",
            Role::Dpo => "DPO",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Snafu)]
#[snafu(display("Unknown role: {name:?}"))]
pub struct UnknownRoleError {
    name: String,
}

impl FromStr for Role {
    type Err = UnknownRoleError;

    /// Case-sensitive; callers are expected to trim
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRoleSnafu { name: s }.build())
    }
}

/// Opaque bearer credential bound to a [`Role`] by a static table.
///
/// Not cryptographically generated. Anyone who knows the table can forge one.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&self.0).finish()
    }
}

/// The mock role to token table.
pub const ROLE_TOKENS: &[(Role, &str)] = &[
    (Role::Teacher, "teacher_123"),
    (Role::Administrator, "admin_001"),
    (Role::Dpo, "dpo_001"),
];

/// Role resolution failures, reported inline to whoever submitted the login
/// form.
#[derive(Debug, Snafu, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    #[snafu(display("No form data submitted."))]
    MissingSubmission,
    #[snafu(display("Invalid role selected."))]
    InvalidRole,
}

pub type LoginResult<T> = std::result::Result<T, LoginError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRole {
    pub role: Role,
    pub token: SessionToken,
}

/// Translates a user-asserted role name into the token the rest of the
/// system trusts for that role.
#[derive(Debug, Clone, Copy)]
pub struct RoleResolver {
    table: &'static [(Role, &'static str)],
}

impl Default for RoleResolver {
    fn default() -> Self {
        Self::new(ROLE_TOKENS)
    }
}

impl RoleResolver {
    pub const fn new(table: &'static [(Role, &'static str)]) -> Self {
        Self { table }
    }

    /// Resolve a raw form value into a role and its token.
    ///
    /// Never creates a session by itself.
    pub fn resolve(&self, raw: &str) -> LoginResult<ResolvedRole> {
        let raw = raw.trim();

        let role = match Role::from_str(raw) {
            Ok(role) => role,
            Err(err) => {
                debug!(target: LOG_TARGET, %err, "Rejected role submission");
                return InvalidRoleSnafu.fail();
            }
        };

        let Some(token) = self.token_for(role) else {
            // The valid-role set and the token table disagree.
            error!(
                target: LOG_TARGET,
                %role,
                "Attempted to log in with a role that has no token"
            );
            return InvalidRoleSnafu.fail();
        };

        Ok(ResolvedRole { role, token })
    }

    /// Like [`Self::resolve`], but `None` means no form data arrived at all.
    pub fn resolve_submission(&self, raw: Option<&str>) -> LoginResult<ResolvedRole> {
        let Some(raw) = raw else {
            return MissingSubmissionSnafu.fail();
        };
        self.resolve(raw)
    }

    pub fn token_for(&self, role: Role) -> Option<SessionToken> {
        self.table
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, token)| SessionToken::new(*token))
    }

    /// Recover the role a token was issued for.
    pub fn role_for_token(&self, token: &SessionToken) -> Option<Role> {
        self.table
            .iter()
            .find(|(_, t)| *t == token.as_str())
            .map(|(role, _)| *role)
    }

    pub fn entries(&self) -> impl Iterator<Item = (Role, SessionToken)> + '_ {
        self.table
            .iter()
            .map(|(role, token)| (*role, SessionToken::new(*token)))
    }
}

#[cfg(test)]
mod tests;
