use std::{env, fmt::Display, io, path::PathBuf, str::FromStr};

use tabsplit_application::IdPolicy;
use tabsplit_domain::{MoneyContext, SettlementMethod, UnsupportedScale};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

const DATA_DIR_VAR: &str = "TABSPLIT_DATA_DIR";
const ID_POLICY_VAR: &str = "TABSPLIT_ID_POLICY";
const SETTLEMENT_VAR: &str = "TABSPLIT_SETTLEMENT";
const SCALE_VAR: &str = "TABSPLIT_SCALE";

const DEFAULT_DATA_DIR: &str = ".tabsplit";
const DEFAULT_SCALE: u32 = 2;
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error(transparent)]
    Scale(#[from] UnsupportedScale),
}

/// Values given on the command line; each one wins over its environment variable.
#[derive(Debug, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub id_policy: Option<IdPolicy>,
    pub settlement: Option<SettlementMethod>,
    pub scale: Option<u32>,
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub id_policy: IdPolicy,
    pub settlement: SettlementMethod,
    pub money: MoneyContext,
}

impl AppConfig {
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(overrides, |key| env::var(key).ok())
    }

    fn from_lookup(
        overrides: Overrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let data_dir = match overrides.data_dir {
            Some(dir) => dir,
            None => lookup(DATA_DIR_VAR)
                .filter(|dir| !dir.trim().is_empty())
                .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from),
        };
        let id_policy = match overrides.id_policy {
            Some(policy) => policy,
            None => parse_var(&lookup, ID_POLICY_VAR)?.unwrap_or_default(),
        };
        let settlement = match overrides.settlement {
            Some(method) => method,
            None => parse_var(&lookup, SETTLEMENT_VAR)?.unwrap_or_default(),
        };
        let scale = match overrides.scale {
            Some(scale) => scale,
            None => parse_var(&lookup, SCALE_VAR)?.unwrap_or(DEFAULT_SCALE),
        };

        Ok(Self {
            data_dir,
            id_policy,
            settlement,
            money: MoneyContext::try_new(scale)?,
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    let Some(value) = lookup(key) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|err: T::Err| ConfigError::InvalidValue {
            key,
            reason: err.to_string(),
            value,
        })
}

/// Initialize logging and tracing. Output goes to stderr so tables on stdout stay clean.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config =
            AppConfig::from_lookup(Overrides::default(), lookup_from(&[])).expect("valid config");

        assert_eq!(
            config,
            AppConfig {
                data_dir: PathBuf::from(".tabsplit"),
                id_policy: IdPolicy::Monotonic,
                settlement: SettlementMethod::FunnelCascade,
                money: MoneyContext::cents(),
            }
        );
    }

    #[test]
    fn environment_values_are_parsed() {
        let lookup = lookup_from(&[
            (DATA_DIR_VAR, "/tmp/ledger"),
            (ID_POLICY_VAR, "fill-gap"),
            (SETTLEMENT_VAR, "greedy"),
            (SCALE_VAR, " 0 "),
        ]);

        let config = AppConfig::from_lookup(Overrides::default(), lookup).expect("valid config");

        assert_eq!(config.data_dir, PathBuf::from("/tmp/ledger"));
        assert_eq!(config.id_policy, IdPolicy::FillLowestGap);
        assert_eq!(config.settlement, SettlementMethod::GreedyMatch);
        assert_eq!(config.money.scale(), 0);
    }

    #[test]
    fn flags_override_environment() {
        let lookup = lookup_from(&[(DATA_DIR_VAR, "/from/env"), (SCALE_VAR, "3")]);
        let overrides = Overrides {
            data_dir: Some(PathBuf::from("/from/flag")),
            scale: Some(1),
            ..Default::default()
        };

        let config = AppConfig::from_lookup(overrides, lookup).expect("valid config");

        assert_eq!(config.data_dir, PathBuf::from("/from/flag"));
        assert_eq!(config.money.scale(), 1);
    }

    #[rstest]
    #[case::id_policy(ID_POLICY_VAR, "random")]
    #[case::settlement(SETTLEMENT_VAR, "optimal")]
    #[case::scale(SCALE_VAR, "two")]
    fn invalid_values_name_the_variable(#[case] key: &'static str, #[case] value: &str) {
        let result = AppConfig::from_lookup(Overrides::default(), lookup_from(&[(key, value)]));

        match result {
            Err(ConfigError::InvalidValue { key: reported, .. }) => assert_eq!(reported, key),
            other => panic!("expected invalid value error, got {other:?}"),
        }
    }

    #[test]
    fn unsupported_scale_is_rejected() {
        let result =
            AppConfig::from_lookup(Overrides::default(), lookup_from(&[(SCALE_VAR, "40")]));
        assert!(matches!(result, Err(ConfigError::Scale(_))));
    }
}
