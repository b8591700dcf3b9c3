//! Registry credentials and the stores they are resolved from
//!
//! Credentials either come straight from the command line or are looked up
//! in the login files written by `docker login` / `podman login`, including
//! any credential helper those files delegate to.

use crate::error::{RegistryError, Result};
use crate::logging::Logger;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

const DOCKER_HUB: &str = "docker.io";
const DOCKER_HUB_SERVER_URL: &str = "https://index.docker.io/v1/";

/// Username and password for one registry. An empty username means anonymous.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Parse `username[:password]`, splitting once on the first `:`.
    pub fn from_flag(value: &str) -> Self {
        match value.split_once(':') {
            Some((username, password)) => Self::new(username, password),
            None => Self::new(value, ""),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.username.is_empty()
    }

    /// `Basic base64(username:password)`, or `None` for anonymous access.
    pub fn authorization_header(&self) -> Option<String> {
        if self.is_anonymous() {
            return None;
        }
        let pair = format!("{}:{}", self.username, self.password);
        Some(format!("Basic {}", STANDARD.encode(pair)))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Source of credentials for a registry host.
pub trait CredentialResolver {
    /// Credentials for `registry` (`host[:port]`); anonymous when nothing is stored.
    fn resolve(&self, registry: &str) -> Result<Credentials>;
}

/// Fixed credentials, as given with `--creds`
#[derive(Debug, Clone)]
pub struct StaticCredentials(pub Credentials);

impl CredentialResolver for StaticCredentials {
    fn resolve(&self, _registry: &str) -> Result<Credentials> {
        Ok(self.0.clone())
    }
}

/// Layout of a login file on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFileFormat {
    /// `config.json` / `auth.json` with `auths`, `credHelpers`, `credsStore`
    Config,
    /// `~/.dockercfg`: a bare map of registry to entry
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFileLocation {
    pub path: PathBuf,
    pub format: AuthFileFormat,
}

impl AuthFileLocation {
    pub fn config(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: AuthFileFormat::Config,
        }
    }

    pub fn legacy(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: AuthFileFormat::Legacy,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginFile {
    #[serde(default)]
    auths: HashMap<String, AuthEntry>,
    #[serde(default)]
    cred_helpers: HashMap<String, String>,
    #[serde(default)]
    creds_store: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AuthEntry {
    #[serde(default)]
    auth: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HelperCredentials {
    #[serde(rename = "Username")]
    username: String,
    #[serde(rename = "Secret")]
    secret: String,
}

/// Resolves credentials from docker/podman login files
#[derive(Debug, Clone)]
pub struct LoginFileResolver {
    locations: Vec<AuthFileLocation>,
    /// `PATH`-style list of directories searched for credential helpers
    helper_path: Option<String>,
    logger: Logger,
}

impl LoginFileResolver {
    pub fn new(locations: Vec<AuthFileLocation>, logger: Logger) -> Self {
        Self {
            locations,
            helper_path: std::env::var("PATH").ok(),
            logger,
        }
    }

    /// Only the given file, as with `--authfile`
    pub fn with_authfile(path: impl Into<PathBuf>, logger: Logger) -> Self {
        Self::new(vec![AuthFileLocation::config(path)], logger)
    }

    /// The standard search path, driven by the process environment
    pub fn from_env(logger: Logger) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), dirs::home_dir(), logger)
    }

    /// The standard search path, with variables read through `lookup`
    pub fn from_lookup<F>(lookup: F, home: Option<PathBuf>, logger: Logger) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::new(Self::default_locations(&lookup, home.as_deref()), logger)
            .with_helper_path(lookup("PATH"))
    }

    /// Directories searched for `docker-credential-<name>` programs
    pub fn with_helper_path(mut self, helper_path: Option<String>) -> Self {
        self.helper_path = helper_path;
        self
    }

    pub fn default_locations<F>(lookup: &F, home: Option<&Path>) -> Vec<AuthFileLocation>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut locations = Vec::new();

        if let Some(path) = lookup("REGISTRY_AUTH_FILE") {
            locations.push(AuthFileLocation::config(path));
        }

        if let Some(dir) = lookup("XDG_RUNTIME_DIR") {
            locations.push(AuthFileLocation::config(
                PathBuf::from(dir).join("containers").join("auth.json"),
            ));
        }

        let config_home = lookup("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| home.map(|h| h.join(".config")));
        if let Some(dir) = config_home {
            locations.push(AuthFileLocation::config(
                dir.join("containers").join("auth.json"),
            ));
        }

        match lookup("DOCKER_CONFIG") {
            Some(dir) => locations.push(AuthFileLocation::config(
                PathBuf::from(dir).join("config.json"),
            )),
            None => {
                if let Some(home) = home {
                    locations.push(AuthFileLocation::config(
                        home.join(".docker").join("config.json"),
                    ));
                }
            }
        }

        if let Some(home) = home {
            locations.push(AuthFileLocation::legacy(home.join(".dockercfg")));
        }

        locations
    }

    /// First `docker-credential-<helper>` on the helper path, or the bare
    /// program name when none is found.
    fn helper_program(&self, helper: &str) -> PathBuf {
        let name = format!("docker-credential-{}", helper);
        self.helper_path
            .as_deref()
            .and_then(|dirs| {
                std::env::split_paths(dirs)
                    .map(|dir| dir.join(&name))
                    .find(|candidate| candidate.is_file())
            })
            .unwrap_or_else(|| PathBuf::from(name))
    }

    fn lookup(&self, location: &AuthFileLocation, registry: &str) -> Result<Option<Credentials>> {
        let content = match std::fs::read_to_string(&location.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(RegistryError::Credential(format!(
                    "reading {} failed: {}",
                    location.path.display(),
                    e
                )));
            }
        };

        let file = parse_login_file(&content, location.format).map_err(|e| {
            RegistryError::Credential(format!("parsing {} failed: {}", location.path.display(), e))
        })?;

        if let Some(helper) = find_entry(&file.cred_helpers, registry) {
            self.logger
                .verbose(&format!("Using credential helper {} for {}", helper, registry));
            return run_credential_helper(&self.helper_program(helper), registry).map(Some);
        }

        if let Some(entry) = find_entry(&file.auths, registry) {
            self.logger.verbose(&format!(
                "Using stored credentials for {} from {}",
                registry,
                location.path.display()
            ));
            return entry_credentials(entry, registry, &location.path).map(Some);
        }

        if let Some(helper) = &file.creds_store {
            self.logger
                .verbose(&format!("Using credential store {} for {}", helper, registry));
            return run_credential_helper(&self.helper_program(helper), registry).map(Some);
        }

        Ok(None)
    }
}

impl CredentialResolver for LoginFileResolver {
    fn resolve(&self, registry: &str) -> Result<Credentials> {
        for location in &self.locations {
            self.logger
                .detail(&format!("Checking {}", location.path.display()));
            if let Some(credentials) = self.lookup(location, registry)? {
                return Ok(credentials);
            }
        }

        self.logger.verbose(&format!(
            "No stored credentials for {}, using anonymous access",
            registry
        ));
        Ok(Credentials::anonymous())
    }
}

fn parse_login_file(content: &str, format: AuthFileFormat) -> serde_json::Result<LoginFile> {
    if content.trim().is_empty() {
        return Ok(LoginFile::default());
    }
    match format {
        AuthFileFormat::Config => serde_json::from_str(content),
        AuthFileFormat::Legacy => Ok(LoginFile {
            auths: serde_json::from_str(content)?,
            ..LoginFile::default()
        }),
    }
}

/// Reduce a login-file key (`https://host/v1/`, `host`, ...) to `host[:port]`.
pub fn normalize_registry(key: &str) -> String {
    let stripped = key
        .strip_prefix("https://")
        .or_else(|| key.strip_prefix("http://"))
        .unwrap_or(key);
    let host = stripped.split('/').next().unwrap_or(stripped);

    match host {
        "index.docker.io" | "registry-1.docker.io" => DOCKER_HUB.to_string(),
        other => other.to_string(),
    }
}

fn find_entry<'a, V>(entries: &'a HashMap<String, V>, registry: &str) -> Option<&'a V> {
    let wanted = normalize_registry(registry);
    entries.get(registry).or_else(|| {
        entries
            .iter()
            .find(|(key, _)| normalize_registry(key) == wanted)
            .map(|(_, value)| value)
    })
}

fn entry_credentials(entry: &AuthEntry, registry: &str, path: &Path) -> Result<Credentials> {
    if let Some(auth) = entry.auth.as_deref().filter(|a| !a.is_empty()) {
        return decode_auth(auth).ok_or_else(|| {
            RegistryError::Credential(format!(
                "invalid auth entry for {} in {}",
                registry,
                path.display()
            ))
        });
    }

    Ok(Credentials::new(
        entry.username.clone().unwrap_or_default(),
        entry.password.clone().unwrap_or_default(),
    ))
}

/// Decode a base64 `user:pass` auth field.
pub fn decode_auth(auth: &str) -> Option<Credentials> {
    let decoded = STANDARD.decode(auth.trim()).ok()?;
    let pair = String::from_utf8(decoded).ok()?;
    let (username, password) = pair.split_once(':')?;
    Some(Credentials::new(username, password))
}

/// Run `<program> get` with the server on stdin.
pub fn run_credential_helper(program: &Path, registry: &str) -> Result<Credentials> {
    let name = program.display();
    let server = if normalize_registry(registry) == DOCKER_HUB {
        DOCKER_HUB_SERVER_URL
    } else {
        registry
    };

    let mut child = Command::new(program)
        .arg("get")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| RegistryError::Credential(format!("failed to execute {}: {}", name, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(server.as_bytes())
            .map_err(|e| RegistryError::Credential(format!("writing to {} failed: {}", name, e)))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| RegistryError::Credential(format!("{} failed: {}", name, e)))?;

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if is_not_found(&stdout) || is_not_found(&stderr) {
            return Ok(Credentials::anonymous());
        }
        return Err(RegistryError::Credential(format!(
            "{} failed: {}",
            name,
            stderr.trim()
        )));
    }

    parse_helper_output(&output.stdout)
}

fn is_not_found(message: &str) -> bool {
    message.contains("credentials not found")
}

pub(crate) fn parse_helper_output(stdout: &[u8]) -> Result<Credentials> {
    let credentials: HelperCredentials = serde_json::from_slice(stdout)?;
    if credentials.username == "<token>" {
        return Err(RegistryError::Credential(
            "credential helper returned an identity token, which basic auth cannot use".to_string(),
        ));
    }
    Ok(Credentials::new(credentials.username, credentials.secret))
}
