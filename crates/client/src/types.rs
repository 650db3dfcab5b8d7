use std::fmt;

use fodupload_protocol::constants::OAUTH_SCOPE;

/// Login material for the token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// API key and secret (`client_credentials` grant).
    ApiKey { key: String, secret: String },
    /// Tenant user login (`password` grant).
    User {
        tenant: String,
        username: String,
        password: String,
    },
}

impl Credentials {
    /// Form fields posted to the token endpoint.
    pub fn form(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::ApiKey { key, secret } => vec![
                ("scope", OAUTH_SCOPE.to_string()),
                ("grant_type", "client_credentials".to_string()),
                ("client_id", key.clone()),
                ("client_secret", secret.clone()),
            ],
            Self::User {
                tenant,
                username,
                password,
            } => vec![
                ("scope", OAUTH_SCOPE.to_string()),
                ("grant_type", "password".to_string()),
                ("username", format!("{tenant}\\{username}")),
                ("password", password.clone()),
            ],
        }
    }
}

// Secrets stay out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey { key, .. } => f
                .debug_struct("ApiKey")
                .field("key", key)
                .field("secret", &"***")
                .finish(),
            Self::User {
                tenant, username, ..
            } => f
                .debug_struct("User")
                .field("tenant", tenant)
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}
