//! API credentials and environment selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const PROD_BASE_URL: &str = "https://api.cloudmersive.com";
const TEST_BASE_URL: &str = "https://testapi.cloudmersive.com";

/// A string whose value must never show up in logs or `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"***\"")
    }
}

/// Which Cloudmersive deployment requests go to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Test,
    Prod,
}

impl Environment {
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Prod => PROD_BASE_URL,
            Self::Test => TEST_BASE_URL,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Test => write!(f, "test"),
            Self::Prod => write!(f, "prod"),
        }
    }
}

impl FromStr for Environment {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "test" => Ok(Self::Test),
            "prod" => Ok(Self::Prod),
            other => Err(format!("unknown environment: {other} (expected 'test' or 'prod')")),
        }
    }
}

/// The `cloudmersiveApi` credential: an API key plus the target environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudmersiveCredentials {
    pub api_key: Secret,
    #[serde(default)]
    pub environment: Environment,
}

impl CloudmersiveCredentials {
    pub fn new(api_key: impl Into<String>, environment: Environment) -> Self {
        Self { api_key: Secret::new(api_key), environment }
    }

    pub fn base_url(&self) -> &'static str {
        self.environment.base_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn environment_selects_host() {
        assert_eq!(Environment::Prod.base_url(), "https://api.cloudmersive.com");
        assert_eq!(Environment::Test.base_url(), "https://testapi.cloudmersive.com");
    }

    #[test]
    fn environment_defaults_to_test() {
        let creds: CloudmersiveCredentials =
            serde_json::from_value(json!({ "apiKey": "k" })).unwrap();
        assert_eq!(creds.environment, Environment::Test);
        assert_eq!(creds.base_url(), TEST_BASE_URL);
    }

    #[test]
    fn debug_output_hides_api_key() {
        let creds = CloudmersiveCredentials::new("super-secret", Environment::Prod);
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn environment_parses_from_str() {
        assert_eq!("prod".parse::<Environment>(), Ok(Environment::Prod));
        assert!("staging".parse::<Environment>().is_err());
    }
}
