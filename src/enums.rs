use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const HTTP_METHOD_COUNT: usize = 7;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum HttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
    Patch = 4,
    Head = 5,
    Options = 6,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; HTTP_METHOD_COUNT] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown http method '{0}'")]
pub struct UnknownMethod(pub String);

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .iter()
            .copied()
            .find(|method| method.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

bitflags! {
    /// Set of methods a single route registration applies to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MethodSet: u8 {
        const GET = 1 << HttpMethod::Get as u8;
        const POST = 1 << HttpMethod::Post as u8;
        const PUT = 1 << HttpMethod::Put as u8;
        const DELETE = 1 << HttpMethod::Delete as u8;
        const PATCH = 1 << HttpMethod::Patch as u8;
        const HEAD = 1 << HttpMethod::Head as u8;
        const OPTIONS = 1 << HttpMethod::Options as u8;
    }
}

impl MethodSet {
    pub fn contains_method(&self, method: HttpMethod) -> bool {
        self.contains(MethodSet::from(method))
    }

    pub fn methods(&self) -> impl Iterator<Item = HttpMethod> + '_ {
        HttpMethod::ALL
            .into_iter()
            .filter(move |method| self.contains_method(*method))
    }
}

impl From<HttpMethod> for MethodSet {
    fn from(method: HttpMethod) -> Self {
        MethodSet::from_bits_retain(1 << method as u8)
    }
}

impl From<&[HttpMethod]> for MethodSet {
    fn from(methods: &[HttpMethod]) -> Self {
        methods
            .iter()
            .fold(MethodSet::empty(), |acc, method| acc | MethodSet::from(*method))
    }
}

impl<const N: usize> From<[HttpMethod; N]> for MethodSet {
    fn from(methods: [HttpMethod; N]) -> Self {
        MethodSet::from(&methods[..])
    }
}
