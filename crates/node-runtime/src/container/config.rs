//! # Node Configuration
//!
//! Runtime parameters and the selection of component variants.
//!
//! ## Environment Overrides
//!
//! | Variable | Field |
//! |----------|-------|
//! | `BN_RING_BUFFER_SIZE` | `mediator.ring_buffer_size` |
//! | `BN_POLLER_BATCH_SIZE` | `mediator.poller_batch_size` |
//! | `BN_WAIT_STRATEGY` | `mediator.wait_strategy` |
//! | `BN_LIVE_STREAM_CAPACITY` | `mediator.live_stream_capacity` |
//! | `BN_PERSISTENCE_TYPE` | `persistence.persistence_type` |
//! | `BN_LIVE_ROOT_PATH` | `persistence.live_root_path` |
//! | `BN_PRODUCER_TYPE` | `producer.producer_type` |
//! | `BN_VERIFIER_TYPE` | `verification.verifier_type` |
//! | `BN_LEDGER_PUBLIC_KEY` | `verification.ledger_public_key` (hex) |

use bn_03_signature_verification::{Ed25519SignatureVerifier, KeyError};
use shared_bus::{WaitStrategy, DEFAULT_POLLER_BATCH_SIZE, DEFAULT_RING_BUFFER_SIZE};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    pub mediator: MediatorConfig,
    pub persistence: PersistenceConfig,
    pub producer: ProducerConfig,
    pub verification: VerificationConfig,
}

impl NodeConfig {
    /// Defaults overridden from `BN_*` environment variables.
    ///
    /// # Errors
    ///
    /// `ConfigError` if a variable is present but does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// `ConfigError` if a variable is present but does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("BN_RING_BUFFER_SIZE") {
            config.mediator.ring_buffer_size = parse_number("BN_RING_BUFFER_SIZE", &value)?;
        }
        if let Some(value) = lookup("BN_POLLER_BATCH_SIZE") {
            config.mediator.poller_batch_size = parse_number("BN_POLLER_BATCH_SIZE", &value)?;
        }
        if let Some(value) = lookup("BN_WAIT_STRATEGY") {
            config.mediator.wait_strategy =
                value.parse().map_err(|e: shared_bus::wait::ParseWaitStrategyError| {
                    ConfigError::InvalidValue {
                        variable: "BN_WAIT_STRATEGY",
                        value: value.clone(),
                        reason: e.to_string(),
                    }
                })?;
        }
        if let Some(value) = lookup("BN_LIVE_STREAM_CAPACITY") {
            config.mediator.live_stream_capacity = parse_number("BN_LIVE_STREAM_CAPACITY", &value)?;
        }
        if let Some(value) = lookup("BN_PERSISTENCE_TYPE") {
            config.persistence.persistence_type = value.parse()?;
        }
        if let Some(value) = lookup("BN_LIVE_ROOT_PATH") {
            config.persistence.live_root_path = PathBuf::from(value);
        }
        if let Some(value) = lookup("BN_PRODUCER_TYPE") {
            config.producer.producer_type = value.parse()?;
        }
        if let Some(value) = lookup("BN_VERIFIER_TYPE") {
            config.verification.verifier_type = value.parse()?;
        }
        if let Some(value) = lookup("BN_LEDGER_PUBLIC_KEY") {
            config.verification.ledger_public_key = Some(value);
        }

        Ok(config)
    }

    /// Check internal consistency.
    ///
    /// # Errors
    ///
    /// - `InvalidRingBufferSize` unless the size is a non-zero power of two
    /// - `InvalidBatchSize` if the batch size is zero or exceeds the ring
    /// - `ZeroLiveStreamCapacity`
    /// - `MissingLedgerKey` / `InvalidLedgerKey` for the production verifier
    pub fn validate(&self) -> Result<(), ConfigError> {
        let size = self.mediator.ring_buffer_size;
        if size == 0 || !size.is_power_of_two() {
            return Err(ConfigError::InvalidRingBufferSize { size });
        }

        let batch_size = self.mediator.poller_batch_size;
        if batch_size == 0 || batch_size > size {
            return Err(ConfigError::InvalidBatchSize {
                batch_size,
                ring_buffer_size: size,
            });
        }

        if self.mediator.live_stream_capacity == 0 {
            return Err(ConfigError::ZeroLiveStreamCapacity);
        }

        if self.verification.verifier_type == VerifierType::Production {
            self.verification.production_verifier()?;
        }
        Ok(())
    }

    /// [`Self::validate`], plus rejection of development-only variants.
    ///
    /// # Errors
    ///
    /// `NonProductionVariant` naming the first offending component.
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        self.validate()?;

        if self.producer.producer_type != ProducerType::Production {
            return Err(ConfigError::NonProductionVariant {
                component: "producer",
                variant: self.producer.producer_type.to_string(),
            });
        }
        if self.persistence.persistence_type != PersistenceType::BlockAsLocalFile {
            return Err(ConfigError::NonProductionVariant {
                component: "persistence",
                variant: self.persistence.persistence_type.to_string(),
            });
        }
        if self.verification.verifier_type == VerifierType::Dummy {
            return Err(ConfigError::NonProductionVariant {
                component: "verification",
                variant: self.verification.verifier_type.to_string(),
            });
        }
        Ok(())
    }
}

fn parse_number(variable: &'static str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
        variable,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Ring buffer size {size} must be a non-zero power of two")]
    InvalidRingBufferSize { size: usize },

    #[error("Poller batch size {batch_size} must be between 1 and the ring buffer size {ring_buffer_size}")]
    InvalidBatchSize {
        batch_size: usize,
        ring_buffer_size: usize,
    },

    #[error("Live stream capacity must be greater than zero")]
    ZeroLiveStreamCapacity,

    #[error("PRODUCTION verifier requires BN_LEDGER_PUBLIC_KEY")]
    MissingLedgerKey,

    #[error("Invalid ledger public key: {0}")]
    InvalidLedgerKey(#[from] KeyError),

    #[error("Unknown {kind} {value:?}")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("Invalid value {value:?} for {variable}: {reason}")]
    InvalidValue {
        variable: &'static str,
        value: String,
        reason: String,
    },

    #[error("{component} variant {variant} is not allowed in production")]
    NonProductionVariant {
        component: &'static str,
        variant: String,
    },
}

/// Ring buffer and subscriber parameters.
#[derive(Debug, Clone)]
pub struct MediatorConfig {
    /// Slots in the ring buffer. Power of two.
    pub ring_buffer_size: usize,
    /// Batches each subscriber drains per poll cycle.
    pub poller_batch_size: usize,
    /// Idle policy of the publisher and subscriber loops.
    pub wait_strategy: WaitStrategy,
    /// Batches buffered per live stream client.
    pub live_stream_capacity: usize,
}

impl Default for MediatorConfig {
    fn default() -> Self {
        Self {
            ring_buffer_size: DEFAULT_RING_BUFFER_SIZE,
            poller_batch_size: DEFAULT_POLLER_BATCH_SIZE,
            wait_strategy: WaitStrategy::default(),
            live_stream_capacity: 64,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    pub persistence_type: PersistenceType,
    /// Directory of completed block files.
    pub live_root_path: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            persistence_type: PersistenceType::BlockAsLocalFile,
            live_root_path: PathBuf::from("./data/live"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProducerConfig {
    pub producer_type: ProducerType,
}

#[derive(Debug, Clone, Default)]
pub struct VerificationConfig {
    pub verifier_type: VerifierType,
    /// Hex encoded ed25519 ledger key, required by the production verifier.
    pub ledger_public_key: Option<String>,
}

impl VerificationConfig {
    /// Build the production verifier from the configured key.
    ///
    /// # Errors
    ///
    /// `MissingLedgerKey` or `InvalidLedgerKey`.
    pub fn production_verifier(&self) -> Result<Ed25519SignatureVerifier, ConfigError> {
        let key = self
            .ledger_public_key
            .as_deref()
            .ok_or(ConfigError::MissingLedgerKey)?;
        Ok(Ed25519SignatureVerifier::from_hex(key)?)
    }
}

/// Declares a configuration variant enum with its textual names.
macro_rules! config_variant {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, default = $default:ident,
        { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $($name::$variant => f.write_str($text)),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_uppercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(ConfigError::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

config_variant! {
    /// Storage behind the persistence subscriber.
    PersistenceType, "persistence type", default = BlockAsLocalFile,
    {
        BlockAsLocalFile => "BLOCK_AS_LOCAL_FILE",
        NoOp => "NO_OP",
    }
}

config_variant! {
    /// Source of published batches. `NO_OP` drops everything, for troubleshooting.
    ProducerType, "producer type", default = Production,
    {
        Production => "PRODUCTION",
        NoOp => "NO_OP",
    }
}

config_variant! {
    /// Block proof verifier. `NO_OP` runs no verification subscriber.
    VerifierType, "verifier type", default = Dummy,
    {
        Production => "PRODUCTION",
        Dummy => "DUMMY",
        NoOp => "NO_OP",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn from_vars(vars: &[(&str, &str)]) -> Result<NodeConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NodeConfig::from_lookup(|name| vars.get(name).cloned())
    }

    const LEDGER_KEY: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";

    #[test]
    fn test_defaults_are_valid() {
        let config = NodeConfig::default();
        config.validate().unwrap();
        assert_eq!(config.persistence.persistence_type, PersistenceType::BlockAsLocalFile);
        assert_eq!(config.producer.producer_type, ProducerType::Production);
    }

    #[test]
    fn test_env_overrides() {
        let config = from_vars(&[
            ("BN_RING_BUFFER_SIZE", "64"),
            ("BN_POLLER_BATCH_SIZE", "4"),
            ("BN_WAIT_STRATEGY", "sleeping:20"),
            ("BN_PERSISTENCE_TYPE", "no_op"),
            ("BN_LIVE_ROOT_PATH", "/tmp/blocks"),
            ("BN_PRODUCER_TYPE", "NO_OP"),
            ("BN_VERIFIER_TYPE", "PRODUCTION"),
            ("BN_LEDGER_PUBLIC_KEY", LEDGER_KEY),
        ])
        .unwrap();

        assert_eq!(config.mediator.ring_buffer_size, 64);
        assert_eq!(config.mediator.poller_batch_size, 4);
        assert_eq!(
            config.mediator.wait_strategy,
            WaitStrategy::Sleeping(Duration::from_micros(20))
        );
        assert_eq!(config.persistence.persistence_type, PersistenceType::NoOp);
        assert_eq!(config.persistence.live_root_path, PathBuf::from("/tmp/blocks"));
        assert_eq!(config.producer.producer_type, ProducerType::NoOp);
        assert_eq!(config.verification.verifier_type, VerifierType::Production);
        config.validate().unwrap();
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(matches!(
            from_vars(&[("BN_RING_BUFFER_SIZE", "lots")]),
            Err(ConfigError::InvalidValue { variable: "BN_RING_BUFFER_SIZE", .. })
        ));
        assert!(matches!(
            from_vars(&[("BN_PRODUCER_TYPE", "TURBO")]),
            Err(ConfigError::UnknownVariant { kind: "producer type", .. })
        ));
        assert!(matches!(
            from_vars(&[("BN_WAIT_STRATEGY", "BLOCKING")]),
            Err(ConfigError::InvalidValue { variable: "BN_WAIT_STRATEGY", .. })
        ));
    }

    #[test]
    fn test_validate_sizes() {
        let mut config = NodeConfig::default();
        config.mediator.ring_buffer_size = 100;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRingBufferSize { size: 100 })));

        config.mediator.ring_buffer_size = 8;
        config.mediator.poller_batch_size = 16;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBatchSize { .. })));

        config.mediator.poller_batch_size = 8;
        config.mediator.live_stream_capacity = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroLiveStreamCapacity)));
    }

    #[test]
    fn test_production_verifier_needs_key() {
        let mut config = NodeConfig::default();
        config.verification.verifier_type = VerifierType::Production;
        assert!(matches!(config.validate(), Err(ConfigError::MissingLedgerKey)));

        config.verification.ledger_public_key = Some("00ff".into());
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLedgerKey(_))));

        config.verification.ledger_public_key = Some(LEDGER_KEY.into());
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_for_production() {
        let mut config = NodeConfig::default();
        assert!(matches!(
            config.validate_for_production(),
            Err(ConfigError::NonProductionVariant { component: "verification", .. })
        ));

        config.verification.verifier_type = VerifierType::Production;
        config.verification.ledger_public_key = Some(LEDGER_KEY.into());
        config.validate_for_production().unwrap();

        config.producer.producer_type = ProducerType::NoOp;
        assert!(matches!(
            config.validate_for_production(),
            Err(ConfigError::NonProductionVariant { component: "producer", .. })
        ));
    }

    #[test]
    fn test_variant_names_round_trip() {
        for t in [PersistenceType::BlockAsLocalFile, PersistenceType::NoOp] {
            assert_eq!(t.to_string().parse::<PersistenceType>().unwrap(), t);
        }
        assert_eq!("dummy".parse::<VerifierType>().unwrap(), VerifierType::Dummy);
    }
}
