//! Parsing helpers for raw environment values.

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::defaults::MAX_ENGINE_TIMEOUT_SECS;
use crate::error::{ConfigError, ConfigResult};
use crate::model::{CollisionPolicy, LogFormatPreference};

pub(crate) fn parse_bind_addr(field: &'static str, raw: &str) -> ConfigResult<IpAddr> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::invalid(field, "not_an_ip_address", raw))
}

pub(crate) fn parse_port(field: &'static str, raw: &str) -> ConfigResult<u16> {
    let port: u16 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(field, "out_of_range", raw))?;
    if port == 0 {
        return Err(ConfigError::invalid(field, "zero", raw));
    }
    Ok(port)
}

pub(crate) fn parse_positive_usize(field: &'static str, raw: &str) -> ConfigResult<usize> {
    let value: usize = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(field, "not_a_number", raw))?;
    if value == 0 {
        return Err(ConfigError::invalid(field, "zero", raw));
    }
    Ok(value)
}

pub(crate) fn parse_timeout(field: &'static str, raw: &str) -> ConfigResult<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(field, "not_a_number", raw))?;
    if !(1..=MAX_ENGINE_TIMEOUT_SECS).contains(&secs) {
        return Err(ConfigError::invalid(field, "out_of_range", raw));
    }
    Ok(Duration::from_secs(secs))
}

pub(crate) fn parse_path(field: &'static str, raw: &str) -> ConfigResult<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::invalid(field, "empty", raw));
    }
    Ok(PathBuf::from(trimmed))
}

pub(crate) fn parse_non_empty(field: &'static str, raw: &str) -> ConfigResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::invalid(field, "empty", raw));
    }
    Ok(trimmed.to_string())
}

/// Split a comma separated extension list, dropping leading dots and blanks.
pub(crate) fn parse_extensions(field: &'static str, raw: &str) -> ConfigResult<Vec<String>> {
    let mut extensions: Vec<String> = raw
        .split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect();
    if extensions.is_empty() {
        return Err(ConfigError::invalid(field, "empty", raw));
    }
    if extensions
        .iter()
        .any(|ext| ext.contains(['/', '\\', '.']))
    {
        return Err(ConfigError::invalid(field, "invalid_extension", raw));
    }
    extensions.sort();
    extensions.dedup();
    Ok(extensions)
}

pub(crate) fn parse_collision_policy(
    field: &'static str,
    raw: &str,
) -> ConfigResult<CollisionPolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "overwrite" => Ok(CollisionPolicy::Overwrite),
        "rename" => Ok(CollisionPolicy::Rename),
        _ => Err(ConfigError::invalid(field, "unknown_policy", raw)),
    }
}

pub(crate) fn parse_log_format(
    field: &'static str,
    raw: &str,
) -> ConfigResult<LogFormatPreference> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "json" => Ok(LogFormatPreference::Json),
        "pretty" => Ok(LogFormatPreference::Pretty),
        _ => Err(ConfigError::invalid(field, "unknown_format", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_rejects_zero_and_overflow() {
        assert_eq!(parse_port("P", "8080"), Ok(8080));
        assert!(matches!(
            parse_port("P", "0"),
            Err(ConfigError::InvalidField { reason: "zero", .. })
        ));
        assert!(matches!(
            parse_port("P", "70000"),
            Err(ConfigError::InvalidField {
                reason: "out_of_range",
                ..
            })
        ));
    }

    #[test]
    fn timeout_is_bounded() {
        assert_eq!(parse_timeout("T", " 30 "), Ok(Duration::from_secs(30)));
        assert!(parse_timeout("T", "0").is_err());
        assert!(parse_timeout("T", "3601").is_err());
        assert!(parse_timeout("T", "soon").is_err());
    }

    #[test]
    fn extensions_are_normalised() {
        assert_eq!(
            parse_extensions("E", " TXT, .png,,txt "),
            Ok(vec!["png".to_string(), "txt".to_string()])
        );
        assert!(parse_extensions("E", " , ").is_err());
        assert!(parse_extensions("E", "tar.gz").is_err());
    }

    #[test]
    fn enumerations_parse_case_insensitively() {
        assert_eq!(
            parse_collision_policy("C", "Rename"),
            Ok(CollisionPolicy::Rename)
        );
        assert!(parse_collision_policy("C", "version").is_err());
        assert_eq!(
            parse_log_format("F", "JSON"),
            Ok(LogFormatPreference::Json)
        );
        assert!(parse_log_format("F", "xml").is_err());
    }

    #[test]
    fn paths_and_names_must_not_be_blank() {
        assert!(parse_path("D", "   ").is_err());
        assert_eq!(parse_path("D", "/srv/data"), Ok(PathBuf::from("/srv/data")));
        assert!(parse_non_empty("N", "").is_err());
        assert!(parse_bind_addr("B", "localhost").is_err());
        assert_eq!(
            parse_bind_addr("B", "127.0.0.1"),
            Ok(IpAddr::from([127, 0, 0, 1]))
        );
        assert!(parse_positive_usize("M", "0").is_err());
    }
}
