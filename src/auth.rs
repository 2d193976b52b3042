use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::exit_codes::exit;
use crate::ux::{self, StageSpinner};

/// Endpoint used to validate an API key.
const DEFAULT_VERIFY_ENDPOINT: &str = "https://api.terragram.io/v1/auth/verify";

/// Seam for API-key validation, so the login flow can be tested without a
/// network.
pub trait KeyVerifier {
    /// Ok(true) for a valid key, Ok(false) for a rejected one; Err only for
    /// transport-level failures.
    fn verify(&self, key: &str) -> Result<bool>;
}

/// Validates a key against the terragram API over HTTP.
pub struct ApiVerifier {
    endpoint: String,
}

impl ApiVerifier {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for ApiVerifier {
    fn default() -> Self {
        Self::new(DEFAULT_VERIFY_ENDPOINT)
    }
}

impl KeyVerifier for ApiVerifier {
    fn verify(&self, key: &str) -> Result<bool> {
        match ureq::get(self.endpoint.as_str())
            .header("Authorization", format!("Bearer {key}"))
            .call()
        {
            Ok(_) => Ok(true),
            Err(ureq::Error::StatusCode(401 | 403)) => Ok(false),
            Err(err) => Err(err).context("API key verification request failed"),
        }
    }
}

/// Single-line credentials file in the user's config directory.
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_location() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("io", "terragram", "terragram")
            .context("could not determine a home directory for credentials")?;
        Ok(Self::at(dirs.config_dir().join("credentials")))
    }

    pub fn store(&self, key: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("could not create {}", parent.display()))?;
        }
        std::fs::write(&self.path, format!("{key}\n"))
            .with_context(|| format!("could not write {}", self.path.display()))
    }

    pub fn load(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text.trim().to_string()).filter(|k| !k.is_empty())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => {
                Err(err).with_context(|| format!("could not read {}", self.path.display()))
            }
        }
    }
}

/// Interactive login: prompt for an API key (unless one was passed on the
/// command line), verify it, and persist it on success.
pub fn login<V: KeyVerifier>(
    api_key: Option<String>,
    verifier: &V,
    store: &CredentialStore,
) -> Result<i32> {
    ux::print_head();

    let key = match api_key {
        Some(key) => key,
        None => prompt_for_key()?,
    };

    let spinner = StageSpinner::start(
        "Verifying your API key",
        "Your API key is valid, you are logged in",
        "API key verification failed",
    );

    match verifier.verify(&key) {
        Ok(true) => match store.store(&key) {
            Ok(()) => {
                spinner.succeed();
                Ok(exit::SUCCESS)
            }
            Err(err) => {
                spinner.fail();
                Err(err.context("setting API key in credentials file failed"))
            }
        },
        Ok(false) => {
            spinner.fail();
            eprintln!("The passed API key is invalid, try again.");
            Ok(exit::AUTH_FAILURE)
        }
        Err(err) => {
            spinner.fail();
            Err(err.context("verifying API key failed"))
        }
    }
}

fn prompt_for_key() -> Result<String> {
    print!("→ Enter API key: ");
    std::io::stdout().flush().context("could not flush stdout")?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("could not read API key from stdin")?;
    let key = line.trim().to_string();
    anyhow::ensure!(!key.is_empty(), "no API key entered");
    Ok(key)
}
