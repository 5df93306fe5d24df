//! API Docs Config

use clap::{ArgAction, Args};

/// API document and Swagger UI settings.
#[derive(Debug, Clone, Args)]
pub struct DocsConfig {
    /// Serve the API document and Swagger UI
    #[arg(
        id = "swagger_enabled",
        long = "swagger-enabled",
        env = "SWAGGER_ENABLED",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub enabled: bool,

    /// Title of the API document
    #[arg(
        id = "swagger_title",
        long = "swagger-title",
        env = "SWAGGER_TITLE",
        default_value = "Mesh Gateway API"
    )]
    pub title: String,

    /// Version of the API document
    #[arg(
        id = "swagger_version",
        long = "swagger-version",
        env = "SWAGGER_VERSION",
        default_value = env!("CARGO_PKG_VERSION")
    )]
    pub version: String,

    /// Docs username
    #[arg(
        id = "swagger_username",
        long = "swagger-username",
        env = "SWAGGER_USERNAME",
        default_value = "admin"
    )]
    pub username: String,

    /// Docs password; the docs are unauthenticated when unset
    #[arg(id = "swagger_password", long = "swagger-password", env = "SWAGGER_PASSWORD")]
    pub password: Option<String>,
}

impl DocsConfig {
    /// Basic auth credentials, when a password is configured.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.password
            .as_deref()
            .map(|password| (self.username.as_str(), password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(password: Option<&str>) -> DocsConfig {
        DocsConfig {
            enabled: true,
            title: "Mesh Gateway API".to_string(),
            version: "1.0.0".to_string(),
            username: "admin".to_string(),
            password: password.map(ToString::to_string),
        }
    }

    #[test]
    fn credentials_need_a_password() {
        assert_eq!(docs(None).credentials(), None);
        assert_eq!(docs(Some("secret")).credentials(), Some(("admin", "secret")));
    }
}
