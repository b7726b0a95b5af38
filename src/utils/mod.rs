use std::path::Path;
use std::str::FromStr;

use alloy_primitives::{Address, B256};
use tracing::info;

use crate::models::common::{Config, DEFAULT_BLOCKS, DEFAULT_RPC_URL};
use crate::models::errors::SnapshotError;

const TOPIC_HEX_LEN: usize = 66;

/// Load settings from built-in defaults overlaid with a YAML file.
///
/// An explicit `path` must exist. Without one, `config.yml` in the working
/// directory is read if present.
pub fn load_config(path: Option<&Path>) -> Result<Config, SnapshotError> {
    let builder = config::Config::builder()
        .set_default("rpc_url", DEFAULT_RPC_URL)?
        .set_default("blocks", DEFAULT_BLOCKS)?
        .set_default("pretty", false)?
        .set_default("human", true)?
        .set_default("metrics.enabled", false)?;

    let builder = match path {
        Some(path) => {
            info!("Config path: {}", path.display());
            builder.add_source(config::File::from(path).required(true))
        }
        None => builder.add_source(config::File::with_name("config").required(false)),
    };

    Ok(builder.build()?.try_deserialize()?)
}

pub fn parse_address(input: &str) -> Result<Address, SnapshotError> {
    Address::from_str(input.trim()).map_err(|_| SnapshotError::InvalidAddress {
        input: input.to_string(),
    })
}

/// Accepts exactly `0x` followed by 64 hex characters, in any case.
pub fn parse_topic0(input: &str) -> Result<B256, SnapshotError> {
    let topic = input.trim();
    let invalid = |reason: String| SnapshotError::InvalidTopic {
        input: input.to_string(),
        reason,
    };

    if topic.is_empty() {
        return Err(invalid("empty topic string".to_string()));
    }
    if !topic.starts_with("0x") {
        return Err(invalid("must be hex starting with 0x".to_string()));
    }
    if topic.len() != TOPIC_HEX_LEN {
        return Err(invalid(format!(
            "must be 32-byte keccak hex (0x + 64 chars), got length {}",
            topic.len()
        )));
    }

    B256::from_str(topic).map_err(|e| invalid(e.to_string()))
}

/// Reduce an HTML error page returned by a gateway to its first line of text.
pub fn strip_html(error: &str) -> String {
    if error.contains("<!doctype html>") || error.contains("<html>") {
        error
            .lines()
            .map(|line| line.trim())
            .find(|line| {
                !line.starts_with('<')
                    && !line.ends_with('>')
                    && !line.is_empty()
                    && *line != "html"
                    && *line != "body"
            })
            .unwrap_or(error)
            .to_string()
    } else {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_accepts_any_case() {
        let lower = parse_address(" 0xdac17f958d2ee523a2206206994597c13d831ec7 ").unwrap();
        let mixed = parse_address("0xdAC17F958D2ee523a2206206994597C13D831ec7").unwrap();
        assert_eq!(lower, mixed);
        assert_eq!(
            lower.to_checksum(None),
            "0xdAC17F958D2ee523a2206206994597C13D831ec7"
        );
    }

    #[test]
    fn test_parse_address_rejects_garbage() {
        assert!(matches!(
            parse_address("0x1234"),
            Err(SnapshotError::InvalidAddress { .. })
        ));
        assert!(parse_address("not an address").is_err());
    }

    #[test]
    fn test_parse_topic0() {
        let upper = format!("0x{}", "AB".repeat(32));
        assert_eq!(parse_topic0(&upper).unwrap(), B256::repeat_byte(0xab));

        let unprefixed = "ab".repeat(33);
        let non_hex = format!("0x{}", "zz".repeat(32));
        for bad in ["", "   ", unprefixed.as_str(), "0xabcd", non_hex.as_str()] {
            assert!(
                matches!(parse_topic0(bad), Err(SnapshotError::InvalidTopic { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_strip_html() {
        let page = "<!doctype html>\n<html>\n<body>\n<h1>\n413 Request Entity Too Large\n</h1>\n</body>\n</html>";
        assert_eq!(strip_html(page), "413 Request Entity Too Large");
        assert_eq!(strip_html("query returned more than 10000 results"), "query returned more than 10000 results");
    }

    #[test]
    fn test_load_config_from_file() {
        let missing = load_config(Some(Path::new("does-not-exist.yml")));
        assert!(matches!(missing, Err(SnapshotError::Config(_))));

        let path = std::env::temp_dir().join(format!(
            "zk_event_commitment_config_{}.yml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "rpc_url: https://eth.drpc.org\nblocks: 50\nmetrics:\n  enabled: true\n  textfile_path: /tmp/zk.prom\n",
        )
        .unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.rpc_url, "https://eth.drpc.org");
        assert_eq!(config.blocks, 50);
        assert!(!config.pretty);
        assert!(config.human);
        assert!(config.metrics.enabled);
        assert_eq!(config.metrics.textfile_path.as_deref(), Some("/tmp/zk.prom"));
    }
}
