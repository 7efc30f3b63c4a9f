//! Application configuration loaded from environment variables.
//!
//! Loading happens before the tracing subscriber is installed, so problems
//! with individual variables are reported on stderr and the default is used.

use std::env;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use crate::export::DEFAULT_FILE_NAME;
use crate::preview::DEFAULT_PRODUCT_INSET;
use crate::types::Vec3;

/// Complete application configuration, loaded from environment variables or default values.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub export: ExportConfig,
    pub preview: PreviewConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Creates a configuration from the currently available environment variables.
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            export: ExportConfig::from_env(),
            preview: PreviewConfig::from_env(),
            log: LogConfig::from_env(),
        }
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    bind_ip: IpAddr,
    display_host: String,
    port: u16,
}

impl ApiConfig {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 8080;

    fn from_env() -> Self {
        let host_value =
            env_string("VIRTUPACK_API_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string());
        let (bind_ip, display_host) = match host_value.parse::<IpAddr>() {
            Ok(ip) => (ip, host_value),
            Err(err) => {
                eprintln!(
                    "⚠️ Could not parse VIRTUPACK_API_HOST ('{}'): {}. Using {}.",
                    host_value,
                    err,
                    Self::DEFAULT_HOST
                );
                (
                    IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                    Self::DEFAULT_HOST.to_string(),
                )
            }
        };

        let port = match env_string("VIRTUPACK_API_PORT") {
            Some(raw) => parse_port(&raw).unwrap_or(Self::DEFAULT_PORT),
            None => Self::DEFAULT_PORT,
        };

        Self {
            bind_ip,
            display_host,
            port,
        }
    }

    /// Socket address to bind the server to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }

    /// Visible hostname for logging and hints.
    pub fn display_host(&self) -> &str {
        &self.display_host
    }

    /// Configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Indicates whether binding to all interfaces.
    pub fn binds_to_all_interfaces(&self) -> bool {
        match self.bind_ip {
            IpAddr::V4(addr) => addr == Ipv4Addr::UNSPECIFIED,
            IpAddr::V6(addr) => addr == Ipv6Addr::UNSPECIFIED,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            display_host: Self::DEFAULT_HOST.to_string(),
            port: Self::DEFAULT_PORT,
        }
    }
}

/// Configuration for the export download.
#[derive(Clone, Debug)]
pub struct ExportConfig {
    file_name: String,
}

impl ExportConfig {
    const FILE_NAME_VAR: &'static str = "VIRTUPACK_EXPORT_FILE_NAME";

    fn from_env() -> Self {
        let file_name = match env_string(Self::FILE_NAME_VAR) {
            Some(raw) => match validate_file_name(&raw) {
                Some(name) => name,
                None => {
                    eprintln!(
                        "⚠️ {} must be a plain file name ending in .json ({:?}). Using {}.",
                        Self::FILE_NAME_VAR,
                        raw,
                        DEFAULT_FILE_NAME
                    );
                    DEFAULT_FILE_NAME.to_string()
                }
            },
            None => DEFAULT_FILE_NAME.to_string(),
        };
        Self { file_name }
    }

    /// File name offered in the download's Content-Disposition header.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

/// Configuration for the 3D preview.
#[derive(Clone, Debug)]
pub struct PreviewConfig {
    product_inset: Vec3,
}

impl PreviewConfig {
    const INSET_X_VAR: &'static str = "VIRTUPACK_PREVIEW_INSET_X";
    const INSET_Y_VAR: &'static str = "VIRTUPACK_PREVIEW_INSET_Y";
    const INSET_Z_VAR: &'static str = "VIRTUPACK_PREVIEW_INSET_Z";

    fn from_env() -> Self {
        let load = |var: &str, default: f64| {
            load_f64_with_warning(
                var,
                default,
                |value| value >= 0.0 && value.is_finite(),
                "must be a finite value >= 0",
                "Note: Adjusted preview inset changes where the product is drawn",
            )
        };

        Self {
            product_inset: Vec3::new(
                load(Self::INSET_X_VAR, DEFAULT_PRODUCT_INSET.x),
                load(Self::INSET_Y_VAR, DEFAULT_PRODUCT_INSET.y),
                load(Self::INSET_Z_VAR, DEFAULT_PRODUCT_INSET.z),
            ),
        }
    }

    /// Offset at which the product is drawn inside the box.
    pub fn product_inset(&self) -> Vec3 {
        self.product_inset
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            product_inset: DEFAULT_PRODUCT_INSET,
        }
    }
}

/// Configuration for log output.
#[derive(Clone, Debug, Default)]
pub struct LogConfig {
    json: bool,
}

impl LogConfig {
    const JSON_VAR: &'static str = "VIRTUPACK_LOG_JSON";

    fn from_env() -> Self {
        let json = env_string(Self::JSON_VAR)
            .and_then(|raw| parse_bool(&raw, Self::JSON_VAR))
            .unwrap_or(false);
        Self { json }
    }

    /// Whether log lines are emitted as JSON objects.
    pub fn json(&self) -> bool {
        self.json
    }
}

fn env_string(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        }
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            eprintln!(
                "⚠️ Access to {} failed: {}. Using default value.",
                name, err
            );
            None
        }
    }
}

fn parse_port(raw: &str) -> Option<u16> {
    match raw.parse::<u16>() {
        Ok(0) => {
            eprintln!("⚠️ VIRTUPACK_API_PORT must not be 0. Using default port.");
            None
        }
        Ok(value) => Some(value),
        Err(err) => {
            eprintln!(
                "⚠️ Could not parse VIRTUPACK_API_PORT ('{}'): {}. Using default port.",
                raw, err
            );
            None
        }
    }
}

fn parse_bool(raw: &str, var_name: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        other => {
            eprintln!(
                "⚠️ Could not interpret {} ('{}') as boolean value. Using default value.",
                var_name, other
            );
            None
        }
    }
}

fn validate_file_name(raw: &str) -> Option<String> {
    let is_plain = !raw.contains(['/', '\\', '"'])
        && !raw.chars().any(char::is_control)
        && raw != ".json";
    if is_plain && raw.to_ascii_lowercase().ends_with(".json") {
        Some(raw.to_string())
    } else {
        None
    }
}

fn parse_f64_checked(
    raw: &str,
    var_name: &str,
    default: f64,
    validator: impl Fn(f64) -> bool,
    invalid_hint: &str,
) -> f64 {
    match raw.parse::<f64>() {
        Ok(value) if validator(value) => value,
        Ok(_) => {
            eprintln!(
                "⚠️ {} contains invalid value '{}': {}. Using {}.",
                var_name, raw, invalid_hint, default
            );
            default
        }
        Err(err) => {
            eprintln!(
                "⚠️ Could not parse {} ('{}') as number: {}. Using {}.",
                var_name, raw, err, default
            );
            default
        }
    }
}

fn load_f64_with_warning(
    var_name: &str,
    default: f64,
    validator: impl Fn(f64) -> bool,
    invalid_hint: &str,
    warning: &str,
) -> f64 {
    match env_string(var_name) {
        Some(raw) => {
            let value = parse_f64_checked(&raw, var_name, default, validator, invalid_hint);
            let tolerance = (default.abs().max(1.0)) * 1e-9;
            if (value - default).abs() > tolerance {
                eprintln!("⚠️ {} ({} = {}).", warning, var_name, value);
            }
            value
        }
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_true_values() {
        assert_eq!(parse_bool("1", "TEST_VAR"), Some(true));
        assert_eq!(parse_bool("true", "TEST_VAR"), Some(true));
        assert_eq!(parse_bool("yes", "TEST_VAR"), Some(true));
        assert_eq!(parse_bool("ON", "TEST_VAR"), Some(true));
        assert_eq!(parse_bool(" true ", "TEST_VAR"), Some(true));
    }

    #[test]
    fn test_parse_bool_false_values() {
        assert_eq!(parse_bool("0", "TEST_VAR"), Some(false));
        assert_eq!(parse_bool("false", "TEST_VAR"), Some(false));
        assert_eq!(parse_bool("No", "TEST_VAR"), Some(false));
        assert_eq!(parse_bool("  off  ", "TEST_VAR"), Some(false));
    }

    #[test]
    fn test_parse_bool_invalid_values() {
        assert_eq!(parse_bool("maybe", "TEST_VAR"), None);
        assert_eq!(parse_bool("2", "TEST_VAR"), None);
        assert_eq!(parse_bool("", "TEST_VAR"), None);
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("9090"), Some(9090));
        assert_eq!(parse_port("0"), None);
        assert_eq!(parse_port("70000"), None);
        assert_eq!(parse_port("http"), None);
    }

    #[test]
    fn test_validate_file_name() {
        assert_eq!(
            validate_file_name("pack.json").as_deref(),
            Some("pack.json")
        );
        assert_eq!(
            validate_file_name("Report.JSON").as_deref(),
            Some("Report.JSON")
        );
        assert_eq!(validate_file_name("pack.txt"), None);
        assert_eq!(validate_file_name("../pack.json"), None);
        assert_eq!(validate_file_name("a\"b.json"), None);
        assert_eq!(validate_file_name(".json"), None);
        assert_eq!(validate_file_name("pack\tlist.json"), None);
        assert_eq!(validate_file_name("pack\u{1}.json"), None);
    }

    #[test]
    fn test_parse_f64_checked_falls_back() {
        let non_negative = |v: f64| v >= 0.0;
        assert_eq!(parse_f64_checked("25", "V", 50.0, non_negative, "hint"), 25.0);
        assert_eq!(parse_f64_checked("-1", "V", 50.0, non_negative, "hint"), 50.0);
        assert_eq!(parse_f64_checked("abc", "V", 50.0, non_negative, "hint"), 50.0);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ExportConfig::default().file_name(), "virtupack_simulation.json");
        assert_eq!(
            PreviewConfig::default().product_inset(),
            Vec3::new(50.0, 50.0, 10.0)
        );
        assert!(!LogConfig::default().json());
        assert!(ApiConfig::default().binds_to_all_interfaces());
        assert_eq!(ApiConfig::default().port(), 8080);
    }
}
