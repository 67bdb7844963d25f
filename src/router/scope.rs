use crate::enums::{HttpMethod, MethodSet};
use crate::path::join;
use crate::router::{Router, RouterResult};
use crate::types::RouteSlot;

/// Registration context that places every route under a fixed prefix.
///
/// Created by [`Router::prefix`] and [`Scope::prefix`]; nesting joins the
/// prefixes and the scope disappears when the grouping callback returns.
pub struct Scope<'r, H> {
    router: &'r Router<H>,
    prefix: String,
}

impl<'r, H: Clone> Scope<'r, H> {
    pub(crate) fn new(router: &'r Router<H>, prefix: String) -> Self {
        Self { router, prefix }
    }

    pub fn current_prefix(&self) -> &str {
        &self.prefix
    }

    pub fn add(&self, method: HttpMethod, path: &str, handler: H) -> RouterResult<RouteSlot> {
        self.router.add(method, &join(&self.prefix, path), handler)
    }

    pub fn add_route(
        &self,
        methods: impl Into<MethodSet>,
        path: &str,
        handler: H,
    ) -> RouterResult<Vec<RouteSlot>> {
        self.router
            .add_route(methods, &join(&self.prefix, path), handler)
    }

    pub fn prefix<F>(&self, prefix: &str, body: F) -> RouterResult<()>
    where
        F: FnOnce(&Scope<'r, H>) -> RouterResult<()>,
    {
        let nested = Scope::new(self.router, join(&self.prefix, prefix));
        body(&nested)
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
}
