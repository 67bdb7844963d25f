use memchr::memchr3;
use regex::Regex;

use crate::pattern::segment::{Pattern, Placeholder, Segment};
use crate::pattern::{PatternError, PatternResult};

/// Parses a route pattern into literal and placeholder segments.
///
/// Supported placeholder forms are `{}`, `{name}`, `{name:regex}`, and at the
/// start of a path segment `:name` or `:name(regex)`. A backslash turns the
/// next character into a literal, so `\/` never acts as a separator.
#[tracing::instrument(level = "trace", skip_all, fields(pattern = %pattern))]
pub fn parse_pattern(pattern: &str) -> PatternResult<Pattern> {
    let bytes = pattern.as_bytes();
    if memchr3(b'{', b'}', b'\\', bytes).is_none() && !has_colon_placeholder(pattern) {
        let segments = if pattern.is_empty() {
            Vec::new()
        } else {
            vec![Segment::Literal(pattern.to_string())]
        };
        return Ok(Pattern::new(pattern.to_string(), segments));
    }

    let mut parser = PatternParser::new(pattern);
    let segments = parser.parse()?;
    validate_constraints(&segments, pattern)?;
    Ok(Pattern::new(pattern.to_string(), segments))
}

fn has_colon_placeholder(pattern: &str) -> bool {
    pattern.starts_with(':') || pattern.contains("/:")
}

struct PatternParser<'a> {
    pattern: &'a str,
    chars: Vec<(usize, char)>,
    index: usize,
}

impl<'a> PatternParser<'a> {
    fn new(pattern: &'a str) -> Self {
        Self {
            pattern,
            chars: pattern.char_indices().collect(),
            index: 0,
        }
    }

    fn parse(&mut self) -> PatternResult<Vec<Segment>> {
        let mut segments = Vec::new();
        let mut literal = String::new();

        while let Some(ch) = self.peek() {
            match ch {
                '{' => {
                    flush_literal(&mut literal, &mut segments);
                    segments.push(self.parse_braced_placeholder()?);
                }
                ':' if self.at_segment_start() => {
                    flush_literal(&mut literal, &mut segments);
                    segments.push(self.parse_colon_placeholder()?);
                }
                '}' => {
                    return Err(PatternError::UnexpectedClosingBrace {
                        pattern: self.pattern.to_string(),
                        index: self.current_byte_index(),
                    });
                }
                '\\' => literal.push(self.consume_escape_char()?),
                _ => {
                    literal.push(ch);
                    self.next();
                }
            }
        }

        flush_literal(&mut literal, &mut segments);
        Ok(segments)
    }

    fn parse_braced_placeholder(&mut self) -> PatternResult<Segment> {
        let start = self.current_byte_index();
        self.expect('{');

        let mut name = String::new();
        loop {
            match self.peek() {
                Some('}') | Some(':') => break,
                Some(ch) => {
                    name.push(ch);
                    self.next();
                }
                None => {
                    return Err(PatternError::UnterminatedPlaceholder {
                        pattern: self.pattern.to_string(),
                        start,
                    });
                }
            }
        }

        if !name.is_empty() {
            self.validate_name(&name)?;
        }

        let constraint = if self.peek() == Some(':') {
            self.next();
            let raw = self.read_braced_constraint(&name, start)?;
            if raw.is_empty() {
                return Err(PatternError::EmptyConstraint {
                    pattern: self.pattern.to_string(),
                    name,
                });
            }
            Some(raw)
        } else {
            self.expect('}');
            None
        };

        Ok(Segment::Placeholder(Placeholder {
            name: (!name.is_empty()).then_some(name),
            constraint,
        }))
    }

    fn parse_colon_placeholder(&mut self) -> PatternResult<Segment> {
        let start = self.current_byte_index();
        self.expect(':');

        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                name.push(ch);
                self.next();
            } else {
                break;
            }
        }

        if name.is_empty() {
            return Err(PatternError::ParameterMissingName {
                pattern: self.pattern.to_string(),
                index: start,
            });
        }
        self.validate_name(&name)?;

        let constraint = if self.peek() == Some('(') {
            let raw = self.read_inline_constraint(&name, start)?;
            if raw.is_empty() {
                return Err(PatternError::EmptyConstraint {
                    pattern: self.pattern.to_string(),
                    name,
                });
            }
            Some(raw)
        } else {
            None
        };

        Ok(Segment::Placeholder(Placeholder {
            name: Some(name),
            constraint,
        }))
    }

    /// Reads up to the `}` that balances the opening brace, consuming it.
    fn read_braced_constraint(&mut self, name: &str, start: usize) -> PatternResult<String> {
        let mut depth = 1usize;
        let mut value = String::new();
        while let Some(ch) = self.peek() {
            match ch {
                '\\' => {
                    value.push('\\');
                    value.push(self.consume_escape_char()?);
                    continue;
                }
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        self.next();
                        return Ok(value);
                    }
                }
                _ => {}
            }
            value.push(ch);
            self.next();
        }

        Err(PatternError::UnterminatedConstraint {
            pattern: self.pattern.to_string(),
            name: name.to_string(),
            start,
        })
    }

    fn read_inline_constraint(&mut self, name: &str, start: usize) -> PatternResult<String> {
        self.expect('(');
        let mut depth = 1usize;
        let mut value = String::new();
        while let Some(ch) = self.peek() {
            match ch {
                '\\' => {
                    value.push('\\');
                    value.push(self.consume_escape_char()?);
                    continue;
                }
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        self.next();
                        return Ok(value);
                    }
                }
                _ => {}
            }
            value.push(ch);
            self.next();
        }

        Err(PatternError::UnterminatedConstraint {
            pattern: self.pattern.to_string(),
            name: name.to_string(),
            start,
        })
    }

    fn validate_name(&self, name: &str) -> PatternResult<()> {
        let mut chars = name.chars();
        if let Some(first) = chars.next()
            && !(first.is_ascii_alphabetic() || first == '_')
        {
            return Err(PatternError::ParameterInvalidStart {
                pattern: self.pattern.to_string(),
                name: name.to_string(),
                found: first,
            });
        }
        if let Some(invalid) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
            return Err(PatternError::ParameterInvalidCharacter {
                pattern: self.pattern.to_string(),
                name: name.to_string(),
                invalid,
            });
        }
        Ok(())
    }

    fn at_segment_start(&self) -> bool {
        self.index == 0 || self.chars.get(self.index - 1).map(|(_, ch)| *ch) == Some('/')
    }

    fn expect(&mut self, expected: char) {
        let actual = self.next();
        debug_assert_eq!(Some(expected), actual);
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).map(|(_, ch)| *ch)
    }

    fn next(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.index += 1;
        }
        ch
    }

    fn current_byte_index(&self) -> usize {
        self.chars
            .get(self.index)
            .map(|(idx, _)| *idx)
            .unwrap_or(self.pattern.len())
    }

    fn consume_escape_char(&mut self) -> PatternResult<char> {
        let escape_index = self.current_byte_index();
        self.expect('\\');
        self.next().ok_or_else(|| PatternError::LoneEscapeCharacter {
            pattern: self.pattern.to_string(),
            index: escape_index,
        })
    }
}

fn flush_literal(literal: &mut String, segments: &mut Vec<Segment>) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}

fn validate_constraints(segments: &[Segment], pattern: &str) -> PatternResult<()> {
    for segment in segments {
        let Segment::Placeholder(placeholder) = segment else {
            continue;
        };
        let Some(raw) = placeholder.constraint.as_deref() else {
            continue;
        };
        let name = placeholder.name.clone().unwrap_or_default();
        // Compiled bare: an unbalanced constraint must not close the group it
        // is rendered into.
        let regex = Regex::new(raw).map_err(|err| {
            PatternError::RegexConstraintInvalid {
                pattern: pattern.to_string(),
                name: name.clone(),
                error: err.to_string(),
            }
        })?;
        if regex.captures_len() > 1 {
            return Err(PatternError::CapturingGroupInConstraint {
                pattern: pattern.to_string(),
                name,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(value: &str) -> Segment {
        Segment::Literal(value.to_string())
    }

    fn placeholder(name: Option<&str>, constraint: Option<&str>) -> Segment {
        Segment::Placeholder(Placeholder {
            name: name.map(str::to_string),
            constraint: constraint.map(str::to_string),
        })
    }

    #[test]
    fn static_pattern_is_one_literal() {
        let pattern = parse_pattern("/users/all").unwrap();
        assert_eq!(pattern.segments(), &[literal("/users/all")]);
        assert!(pattern.is_static());
    }

    #[test]
    fn colon_inside_a_segment_stays_literal() {
        let pattern = parse_pattern("/v1:batch").unwrap();
        assert_eq!(pattern.segments(), &[literal("/v1:batch")]);
    }

    #[test]
    fn escaped_separator_is_literal() {
        let pattern = parse_pattern("/a\\/b/{}").unwrap();
        assert_eq!(
            pattern.segments(),
            &[literal("/a/b/"), placeholder(None, None)]
        );
    }

    #[test]
    fn nested_braces_stay_inside_constraint() {
        let pattern = parse_pattern("/year/{y:\\d{4}}.json").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                literal("/year/"),
                placeholder(Some("y"), Some("\\d{4}")),
                literal(".json"),
            ]
        );
    }

    #[test]
    fn constraint_that_closes_its_group_is_rejected() {
        let err = parse_pattern("/x/{id:a)|(?:/y}").unwrap_err();
        assert!(matches!(
            err,
            PatternError::RegexConstraintInvalid { ref name, .. } if name == "id"
        ));

        let pattern = parse_pattern("/x/{id:a|b}").unwrap();
        assert_eq!(pattern.to_regex(), "/x/(a|b)");
    }
}
