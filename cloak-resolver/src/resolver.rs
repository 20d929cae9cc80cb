//! Name → published-keys resolution.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::{debug, info, instrument};

use cloak_core::error::{CloakError, Result};
use cloak_core::traits::{NameService, RegistryTransport};
use cloak_core::types::{EthAddress, PublishedKeys};
use cloak_registry::RegistryClient;

/// Resolver configuration.
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// Whether resolved keys are cached.
    pub enable_cache: bool,
    /// How long a cached resolution stays fresh.
    pub cache_ttl: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            enable_cache: true,
            cache_ttl: Duration::from_secs(3600),
        }
    }
}

impl ResolverConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Disables caching.
    pub fn no_cache(mut self) -> Self {
        self.enable_cache = false;
        self
    }

    /// Sets the cache TTL.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

/// Resolves names to published stealth keys through pluggable name services
/// and the key registry.
pub struct DomainResolver<T: RegistryTransport> {
    services: Vec<Box<dyn NameService>>,
    registry: RegistryClient<T>,
    cache: DashMap<String, (PublishedKeys, Instant)>,
    config: ResolverConfig,
}

impl<T: RegistryTransport> DomainResolver<T> {
    /// Creates a resolver over the given registry client.
    pub fn new(registry: RegistryClient<T>) -> Self {
        Self::with_config(registry, ResolverConfig::default())
    }

    /// Creates a resolver with custom configuration.
    pub fn with_config(registry: RegistryClient<T>, config: ResolverConfig) -> Self {
        Self {
            services: Vec::new(),
            registry,
            cache: DashMap::new(),
            config,
        }
    }

    /// Adds a name service. Services are consulted in registration order;
    /// the first one that supports the name handles it.
    pub fn service(mut self, service: Box<dyn NameService>) -> Self {
        self.services.push(service);
        self
    }

    /// Resolves a name to its address via the responsible name service.
    #[instrument(skip(self))]
    pub async fn resolve_address(&self, name: &str) -> Result<EthAddress> {
        let service = self
            .services
            .iter()
            .find(|service| service.supports(name))
            .ok_or_else(|| CloakError::ResolutionFailed {
                name: name.to_string(),
                reason: "no configured name service handles this domain".into(),
            })?;

        match service.resolve_address(name).await? {
            Some(address) => Ok(address),
            None => Err(CloakError::NameNotRegistered(name.to_string())),
        }
    }

    /// Resolves a name to the published stealth keys of its owner.
    ///
    /// # Errors
    /// - `NameNotRegistered` — the name definitively has no owner
    /// - `NoKeysRegistered` — the owner never registered stealth keys
    /// - transport kinds — a lookup service was unreachable; never collapsed
    ///   into a false negative
    #[instrument(skip(self))]
    pub async fn resolve(&self, name: &str) -> Result<PublishedKeys> {
        let normalized = name.trim().to_lowercase();

        if self.config.enable_cache {
            if let Some(entry) = self.cache.get(&normalized) {
                let (keys, stored_at) = entry.value();
                if stored_at.elapsed() < self.config.cache_ttl {
                    debug!(name = %normalized, "cache hit");
                    return Ok(keys.clone());
                }
            }
        }

        let address = self.resolve_address(&normalized).await?;
        let keys = self.registry.get_stealth_keys(&address).await?;
        info!(name = %normalized, %address, "resolved stealth keys");

        if self.config.enable_cache {
            self.cache
                .insert(normalized, (keys.clone(), Instant::now()));
        }
        Ok(keys)
    }

    /// Drops all cached resolutions.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::StaticNameService;
    use async_trait::async_trait;
    use cloak_crypto::KeyPair;
    use cloak_registry::MemoryRegistry;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn registry_address() -> EthAddress {
        EthAddress::from_array([0xE7; 20])
    }

    /// A service that fails like an unreachable backend.
    struct UnreachableService;

    #[async_trait]
    impl NameService for UnreachableService {
        fn supports(&self, _name: &str) -> bool {
            true
        }

        async fn resolve_address(&self, _name: &str) -> Result<Option<EthAddress>> {
            Err(CloakError::HttpError("connection refused".into()))
        }
    }

    /// Counts lookups to observe caching.
    struct CountingService {
        inner: StaticNameService,
        lookups: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl NameService for CountingService {
        fn supports(&self, name: &str) -> bool {
            self.inner.supports(name)
        }

        async fn resolve_address(&self, name: &str) -> Result<Option<EthAddress>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.resolve_address(name).await
        }
    }

    async fn registered_client(owner: EthAddress) -> (RegistryClient<MemoryRegistry>, KeyPair, KeyPair) {
        let client = RegistryClient::new(MemoryRegistry::new(owner), registry_address(), 1);
        let spending = KeyPair::generate();
        let viewing = KeyPair::generate();
        client.set_stealth_keys(&spending, &viewing).await.unwrap();
        (client, spending, viewing)
    }

    #[tokio::test]
    async fn test_resolve_happy_path() {
        let owner = EthAddress::from_array([0xAA; 20]);
        let (client, spending, viewing) = registered_client(owner).await;

        let resolver = DomainResolver::new(client).service(Box::new(
            StaticNameService::new([".eth"]).with_entry("alice.eth", owner),
        ));

        let keys = resolver.resolve("alice.eth").await.unwrap();
        assert_eq!(keys.spending_public_key_hex(), spending.public_key_hex());
        assert_eq!(keys.viewing_public_key_hex(), viewing.public_key_hex());
    }

    #[tokio::test]
    async fn test_unregistered_name() {
        let owner = EthAddress::from_array([0xAA; 20]);
        let (client, _, _) = registered_client(owner).await;
        let resolver =
            DomainResolver::new(client).service(Box::new(StaticNameService::new([".eth"])));

        let result = resolver.resolve("nobody.eth").await;
        assert!(matches!(result, Err(CloakError::NameNotRegistered(_))));
    }

    #[tokio::test]
    async fn test_name_without_keys_is_distinct_from_unregistered() {
        let owner = EthAddress::from_array([0xAA; 20]);
        let keyless = EthAddress::from_array([0xBB; 20]);
        let (client, _, _) = registered_client(owner).await;

        let resolver = DomainResolver::new(client).service(Box::new(
            StaticNameService::new([".eth"]).with_entry("keyless.eth", keyless),
        ));

        let result = resolver.resolve("keyless.eth").await;
        assert!(matches!(result, Err(CloakError::NoKeysRegistered(_))));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_not_a_false_negative() {
        let owner = EthAddress::from_array([0xAA; 20]);
        let (client, _, _) = registered_client(owner).await;
        let resolver = DomainResolver::new(client).service(Box::new(UnreachableService));

        let result = resolver.resolve("alice.eth").await;
        match result {
            Err(err) => {
                assert!(err.is_recoverable());
                assert!(!matches!(err, CloakError::NoKeysRegistered(_)));
                assert!(!matches!(err, CloakError::NameNotRegistered(_)));
            }
            Ok(_) => panic!("unreachable service must surface an error"),
        }
    }

    #[tokio::test]
    async fn test_unsupported_domain() {
        let owner = EthAddress::from_array([0xAA; 20]);
        let (client, _, _) = registered_client(owner).await;
        let resolver =
            DomainResolver::new(client).service(Box::new(StaticNameService::new([".eth"])));

        let result = resolver.resolve("alice.crypto").await;
        assert!(matches!(result, Err(CloakError::ResolutionFailed { .. })));
    }

    #[tokio::test]
    async fn test_cache_short_circuits_lookups() {
        let owner = EthAddress::from_array([0xAA; 20]);
        let (client, _, _) = registered_client(owner).await;

        let lookups = Arc::new(AtomicUsize::new(0));
        let resolver = DomainResolver::new(client).service(Box::new(CountingService {
            inner: StaticNameService::new([".eth"]).with_entry("alice.eth", owner),
            lookups: lookups.clone(),
        }));

        resolver.resolve("alice.eth").await.unwrap();
        resolver.resolve("Alice.ETH").await.unwrap(); // same name, different case
        assert_eq!(lookups.load(Ordering::SeqCst), 1);

        resolver.clear_cache();
        resolver.resolve("alice.eth").await.unwrap();
        assert_eq!(lookups.load(Ordering::SeqCst), 2);
    }
}
