use crate::chunk::DecodingTrailer;
use crate::enums::{HttpMethod, MethodSet};
use crate::path::normalize;
use crate::readonly::RouterReadOnly;
use crate::registry::{RegistryMetrics, RouteRegistry};
use crate::router::{RouterError, RouterOptions, RouterResult, Scope};
use crate::types::{Dispatch, RouteSlot};
use parking_lot::{RwLock, RwLockWriteGuard};
use std::fmt;
use std::sync::Arc;
use std::sync::OnceLock;

struct RouterState<H> {
    registry: RouteRegistry<H>,
    readonly: OnceLock<Arc<RouterReadOnly<H>>>,
}

/// Route table with a single-writer build phase followed by read-only
/// dispatch. Routes are added until [`Router::seal`] freezes the chunk
/// sequence; lookups are only served afterwards.
pub struct Router<H> {
    inner: RwLock<RouterState<H>>,
    options: RouterOptions,
}

impl<H: Clone> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Clone> Router<H> {
    pub fn new() -> Self {
        let options = RouterOptions::default();
        let registry = RouteRegistry::new(
            DecodingTrailer::default(),
            options.case_sensitive,
            options.regex_size_limit,
        );
        Self::from_parts(registry, options)
    }

    pub fn with_options(options: RouterOptions) -> RouterResult<Self> {
        let trailer = options.trailer()?;
        let registry = RouteRegistry::new(trailer, options.case_sensitive, options.regex_size_limit);
        Ok(Self::from_parts(registry, options))
    }

    fn from_parts(registry: RouteRegistry<H>, options: RouterOptions) -> Self {
        Self {
            inner: RwLock::new(RouterState {
                registry,
                readonly: OnceLock::new(),
            }),
            options,
        }
    }

    pub fn router_options(&self) -> &RouterOptions {
        &self.options
    }

    /// Registers `handler` for `method`. The path is normalized to a single
    /// leading `/` without trailing `/`.
    pub fn add(&self, method: HttpMethod, path: &str, handler: H) -> RouterResult<RouteSlot> {
        let mut guard = self.writable(path)?;
        Ok(guard.registry.insert(method, &normalize(path), handler)?)
    }

    /// Registers `handler` under one pattern for every method in `methods`,
    /// returning one slot per method in declaration order.
    pub fn add_route(
        &self,
        methods: impl Into<MethodSet>,
        path: &str,
        handler: H,
    ) -> RouterResult<Vec<RouteSlot>> {
        let mut guard = self.writable(path)?;
        Ok(guard
            .registry
            .insert_many(methods.into(), &normalize(path), handler)?)
    }

    pub fn add_bulk<I>(&self, entries: I) -> RouterResult<Vec<RouteSlot>>
    where
        I: IntoIterator<Item = (HttpMethod, String, H)>,
    {
        let mut guard = self.inner.write();

        if guard.readonly.get().is_some() {
            let count = entries.into_iter().count();
            return Err(RouterError::BulkAddWhileSealed { count });
        }

        let entries = entries
            .into_iter()
            .map(|(method, path, handler)| (method, normalize(&path), handler));
        Ok(guard.registry.insert_bulk(entries)?)
    }

    /// Runs `body` with a scope whose routes are all registered under
    /// `prefix`. The scope lives only for the duration of the call.
    pub fn prefix<F>(&self, prefix: &str, body: F) -> RouterResult<()>
    where
        F: FnOnce(&Scope<'_, H>) -> RouterResult<()>,
    {
        let scope = Scope::new(self, normalize(prefix));
        body(&scope)
    }

    verb_helpers! {
        get => Get,
        post => Post,
        put => Put,
        patch => Patch,
        delete => Delete,
        options => Options,
        head => Head,
    }

    pub fn seal(&self) {
        let mut guard = self.inner.write();
        if guard.readonly.get().is_some() {
            return;
        }

        let chunks = guard.registry.finalize();
        let snapshot = RouterReadOnly::new(
            chunks,
            guard.registry.trailer().clone(),
            self.options.normalization(),
            self.options.debug,
        );
        tracing::debug!(
            routes = snapshot.route_count(),
            chunks = snapshot.chunk_count(),
            "router sealed"
        );
        let _ = guard.readonly.set(Arc::new(snapshot));
    }

    pub fn is_sealed(&self) -> bool {
        self.inner.read().readonly.get().is_some()
    }

    pub fn find(&self, method: HttpMethod, path: &str) -> RouterResult<Dispatch<H>> {
        let readonly = self
            .readonly()
            .ok_or(RouterError::FindWhileMutable)?;
        Ok(readonly.find(method, path)?.cloned())
    }

    /// String-method form of [`Router::find`]; an unknown method is a miss.
    pub fn make(&self, method: &str, uri: &str) -> RouterResult<Dispatch<H>> {
        let readonly = self
            .readonly()
            .ok_or(RouterError::FindWhileMutable)?;
        Ok(readonly.make(method, uri)?.cloned())
    }

    pub fn get_readonly(&self) -> RouterResult<Arc<RouterReadOnly<H>>> {
        self.readonly().ok_or(RouterError::ReadOnlyUnavailable)
    }

    pub fn metrics(&self) -> RegistryMetrics {
        self.inner.read().registry.metrics().clone()
    }

    fn writable(&self, path: &str) -> RouterResult<RwLockWriteGuard<'_, RouterState<H>>> {
        let guard = self.inner.write();
        if guard.readonly.get().is_some() {
            return Err(RouterError::AddWhileSealed {
                path: path.to_string(),
            });
        }
        Ok(guard)
    }

    fn readonly(&self) -> Option<Arc<RouterReadOnly<H>>> {
        self.inner.read().readonly.get().cloned()
    }
}

impl<H> fmt::Debug for Router<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.inner.read();
        f.debug_struct("Router")
            .field("options", &self.options)
            .field("sealed", &guard.readonly.get().is_some())
            .field("metrics", guard.registry.metrics())
            .finish()
    }
}
