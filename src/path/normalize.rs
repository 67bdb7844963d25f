use crate::path::{PathError, PathResult};
use memchr::memchr2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NormalizationOptions {
    pub decode_percent: bool,
    pub allow_duplicate_slash: bool,
    pub strict_trailing_slash: bool,
}

/// Registration-side normalization: exactly one leading `/`, no trailing `/`.
/// The empty route and any run of slashes normalize to `/`. A trailing `\/`
/// is a literal slash and is kept.
pub fn normalize(route: &str) -> String {
    let trimmed = trim_unescaped_trailing_slashes(route.trim_start_matches('/'));
    let mut out = String::with_capacity(trimmed.len() + 1);
    out.push('/');
    out.push_str(trimmed);
    out
}

fn trim_unescaped_trailing_slashes(route: &str) -> &str {
    let mut end = route.len();
    while end > 0 && route.as_bytes()[end - 1] == b'/' {
        let escapes = route.as_bytes()[..end - 1]
            .iter()
            .rev()
            .take_while(|&&byte| byte == b'\\')
            .count();
        if escapes % 2 == 1 {
            break;
        }
        end -= 1;
    }
    &route[..end]
}

/// Appends `route` under `prefix`, both normalized. A root prefix leaves the
/// route untouched and a root route resolves to the prefix itself.
pub fn join(prefix: &str, route: &str) -> String {
    let prefix = normalize(prefix);
    let route = normalize(route);
    match (prefix.as_str(), route.as_str()) {
        ("/", _) => route,
        (_, "/") => prefix,
        _ => prefix + &route,
    }
}

#[tracing::instrument(level = "trace", skip(path, options), fields(path_len = path.len() as u64))]
pub fn normalize_request_path(path: &str, options: &NormalizationOptions) -> PathResult<String> {
    let end = memchr2(b'?', b'#', path.as_bytes()).unwrap_or(path.len());
    let raw = &path[..end];

    let mut output: Vec<u8> = Vec::with_capacity(raw.len() + 1);
    if !raw.starts_with('/') {
        output.push(b'/');
    }

    let bytes = raw.as_bytes();
    let mut idx = 0usize;
    while idx < bytes.len() {
        let mut byte = bytes[idx];
        let mut width = 1usize;

        if options.decode_percent && byte == b'%' {
            if idx + 2 >= bytes.len() {
                return Err(PathError::InvalidPercentEncoding {
                    input: path.to_string(),
                    index: idx,
                });
            }
            byte = decode_hex_pair(bytes[idx + 1], bytes[idx + 2]).ok_or_else(|| {
                PathError::InvalidPercentEncoding {
                    input: path.to_string(),
                    index: idx,
                }
            })?;
            width = 3;
        }

        if byte < 0x20 || byte == 0x7f {
            return Err(PathError::ControlOrWhitespace {
                input: path.to_string(),
                byte,
            });
        }

        let duplicate_slash = byte == b'/' && output.last() == Some(&b'/');
        if !duplicate_slash || options.allow_duplicate_slash {
            output.push(byte);
        }
        idx += width;
    }

    if !options.strict_trailing_slash {
        while output.len() > 1 && output.last() == Some(&b'/') {
            output.pop();
        }
    }

    String::from_utf8(output).map_err(|_| PathError::InvalidUtf8AfterDecoding {
        input: path.to_string(),
    })
}

fn decode_hex_pair(hi: u8, lo: u8) -> Option<u8> {
    fn val(byte: u8) -> Option<u8> {
        match byte {
            b'0'..=b'9' => Some(byte - b'0'),
            b'a'..=b'f' => Some(byte - b'a' + 10),
            b'A'..=b'F' => Some(byte - b'A' + 10),
            _ => None,
        }
    }

    Some(val(hi)? << 4 | val(lo)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_yields_single_leading_separator() {
        assert_eq!(normalize("/a/b/"), "/a/b");
        assert_eq!(normalize("a/b"), "/a/b");
        assert_eq!(normalize("/a/b"), "/a/b");
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("///"), "/");
    }

    #[test]
    fn normalize_keeps_escaped_trailing_separator() {
        assert_eq!(normalize("/a\\/"), "/a\\/");
        assert_eq!(normalize("/a\\//"), "/a\\/");
        assert_eq!(normalize("/a\\\\/"), "/a\\\\");
    }

    #[test]
    fn join_composes_prefix_and_route() {
        assert_eq!(join("/api", "/users"), "/api/users");
        assert_eq!(join("api/", "users/"), "/api/users");
        assert_eq!(join("/", "/users"), "/users");
        assert_eq!(join("/api", "/"), "/api");
    }

    #[test]
    fn collapses_duplicates_and_trims_trailing_slashes() {
        let normalized =
            normalize_request_path("//foo//bar///", &NormalizationOptions::default()).unwrap();
        assert_eq!(normalized, "/foo/bar");
    }

    #[test]
    fn preserves_duplicates_when_allowed() {
        let options = NormalizationOptions {
            allow_duplicate_slash: true,
            ..Default::default()
        };
        let normalized = normalize_request_path("//foo//bar///", &options).unwrap();
        assert_eq!(normalized, "//foo//bar");
    }

    #[test]
    fn keeps_trailing_slash_when_strict() {
        let options = NormalizationOptions {
            strict_trailing_slash: true,
            ..Default::default()
        };
        let normalized = normalize_request_path("/foo/", &options).unwrap();
        assert_eq!(normalized, "/foo/");
    }

    #[test]
    fn strips_query_and_fragment() {
        let options = NormalizationOptions::default();
        assert_eq!(normalize_request_path("/a/b?x=1", &options).unwrap(), "/a/b");
        assert_eq!(normalize_request_path("/a#top", &options).unwrap(), "/a");
        assert_eq!(normalize_request_path("?x=1", &options).unwrap(), "/");
    }

    #[test]
    fn percent_decoding_is_optional() {
        let raw = normalize_request_path("/caf%C3%A9", &NormalizationOptions::default()).unwrap();
        assert_eq!(raw, "/caf%C3%A9");

        let options = NormalizationOptions {
            decode_percent: true,
            ..Default::default()
        };
        let decoded = normalize_request_path("/caf%C3%A9", &options).unwrap();
        assert_eq!(decoded, "/café");
    }

    #[test]
    fn rejects_truncated_percent_escape() {
        let options = NormalizationOptions {
            decode_percent: true,
            ..Default::default()
        };
        let err = normalize_request_path("/foo%2", &options).unwrap_err();
        assert!(matches!(err, PathError::InvalidPercentEncoding { index: 4, .. }));
    }

    #[test]
    fn rejects_control_bytes_after_decoding() {
        let options = NormalizationOptions {
            decode_percent: true,
            ..Default::default()
        };
        let err = normalize_request_path("/foo%00bar", &options).unwrap_err();
        match err {
            PathError::ControlOrWhitespace { byte, .. } => assert_eq!(byte, 0),
            other => panic!("expected ControlOrWhitespace, got {other:?}"),
        }
    }
}
