//! Name → constructor registry for cloud providers.
//!
//! Provider crates register a factory under a fixed name; the orchestrator
//! instantiates one by name, handing it an optional configuration stream.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::CloudProvider;

/// Constructor for a provider. `None` means no configuration was supplied.
pub type ProviderFactory =
    Box<dyn Fn(Option<&mut dyn Read>) -> ProviderResult<Box<dyn CloudProvider>> + Send + Sync>;

#[derive(Default)]
pub struct ProviderRegistry {
    factories: BTreeMap<String, ProviderFactory>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `name`. Names are unique.
    pub fn register(&mut self, name: &str, factory: ProviderFactory) -> ProviderResult<()> {
        if self.factories.contains_key(name) {
            return Err(ProviderError::DuplicateProvider(name.to_string()));
        }
        debug!(provider = name, "registered cloud provider");
        self.factories.insert(name.to_string(), factory);
        Ok(())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Construct the provider registered as `name`.
    pub fn get_provider(
        &self,
        name: &str,
        config: Option<&mut dyn Read>,
    ) -> ProviderResult<Box<dyn CloudProvider>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ProviderError::UnknownProvider(name.to_string()))?;
        factory(config)
    }

    /// Construct a provider from an optional config file.
    ///
    /// An empty `name` means no provider is wanted and yields `Ok(None)`.
    pub fn init_provider(
        &self,
        name: &str,
        config_path: Option<&Path>,
    ) -> ProviderResult<Option<Box<dyn CloudProvider>>> {
        if name.is_empty() {
            info!("no cloud provider specified");
            return Ok(None);
        }

        let provider = match config_path {
            Some(path) => {
                let mut file = File::open(path)?;
                self.get_provider(name, Some(&mut file))?
            }
            None => self.get_provider(name, None)?,
        };

        info!(provider = name, config = ?config_path, "cloud provider initialized");
        Ok(Some(provider))
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;

    struct Echo {
        config: String,
    }

    impl CloudProvider for Echo {
        fn provider_name(&self) -> &str {
            &self.config
        }
    }

    fn echo_factory() -> ProviderFactory {
        Box::new(|config: Option<&mut dyn Read>| -> ProviderResult<Box<dyn CloudProvider>> {
            let Some(reader) = config else {
                return Err(ProviderError::Config("no config".to_string()));
            };
            let mut config = String::new();
            reader.read_to_string(&mut config)?;
            Ok(Box::new(Echo { config }))
        })
    }

    #[test]
    fn resolves_registered_provider_by_name() {
        let mut registry = ProviderRegistry::new();
        registry.register("echo", echo_factory()).unwrap();

        let mut config: &[u8] = b"hello";
        let provider = registry.get_provider("echo", Some(&mut config)).unwrap();
        assert_eq!(provider.provider_name(), "hello");
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = ProviderRegistry::new();
        registry.register("echo", echo_factory()).unwrap();
        let err = registry.register("echo", echo_factory()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Registry);
        assert_eq!(registry.names(), vec!["echo"]);
    }

    #[test]
    fn unknown_provider_is_an_error() {
        let registry = ProviderRegistry::new();
        let err = registry.get_provider("nope", None).err().unwrap();
        assert!(matches!(err, ProviderError::UnknownProvider(ref n) if n == "nope"));
    }

    #[test]
    fn init_with_empty_name_yields_nothing() {
        let registry = ProviderRegistry::new();
        assert!(registry.init_provider("", None).unwrap().is_none());
    }

    #[test]
    fn init_reads_config_file() {
        let mut registry = ProviderRegistry::new();
        registry.register("echo", echo_factory()).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "from-file").unwrap();

        let provider = registry
            .init_provider("echo", Some(file.path()))
            .unwrap()
            .unwrap();
        assert_eq!(provider.provider_name(), "from-file");
    }

    #[test]
    fn init_without_path_passes_no_config() {
        let mut registry = ProviderRegistry::new();
        registry.register("echo", echo_factory()).unwrap();
        let err = registry.init_provider("echo", None).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn init_with_missing_file_is_io_error() {
        let mut registry = ProviderRegistry::new();
        registry.register("echo", echo_factory()).unwrap();
        let err = registry
            .init_provider("echo", Some(Path::new("/nonexistent/provider.toml")))
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
