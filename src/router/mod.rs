/// Generates one registration helper per HTTP verb on a type exposing
/// `add(method, path, handler)`.
macro_rules! verb_helpers {
    ($($name:ident => $method:ident),* $(,)?) => {
        $(
            pub fn $name(
                &self,
                path: &str,
                handler: H,
            ) -> crate::router::RouterResult<crate::types::RouteSlot> {
                self.add(crate::enums::HttpMethod::$method, path, handler)
            }
        )*
    };
}

mod errors;
mod options;
mod scope;
mod service;

pub use errors::{RouterError, RouterResult};
pub use options::{
    DEFAULT_REGEX_SIZE_LIMIT, MAX_CHUNK_CAPACITY, RouterOptions, RouterOptionsBuilder,
    RouterOptionsError,
};
pub use scope::Scope;
pub use service::Router;
