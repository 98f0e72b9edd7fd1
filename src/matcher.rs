//! Element matchers for the built-in document source.
//!
//! Supports the CSS subset that heading selectors use in practice:
//!
//! - type (`h2`), universal (`*`), id (`#intro`), class (`.chapter`)
//! - attributes: `[data-toc]`, `[lang=en]`, `~=`, `^=`, `$=`, `*=`
//! - negation of a compound: `:not(.skip)`
//! - descendant (`article h2`) and child (`main > h2`) combinators
//! - groups: `h1, .title`
//!
//! Matching is evaluated against the element's ancestor chain from the
//! document root, so `article h2` also matches when the article sits above
//! the scanned scope.

use std::str::FromStr;

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{map, opt, value},
    error::{ErrorKind, ParseError},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded},
};

use crate::error::{TocError, TocResult};
use crate::node::Element;

// =============================================================================
// Matcher
// =============================================================================

/// A parsed selector group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matcher {
    source: String,
    alternatives: Vec<Complex>,
}

impl Matcher {
    /// Parse a selector group.
    pub fn parse(source: &str) -> TocResult<Self> {
        let alternatives =
            parse_selector_group(source).map_err(|reason| TocError::invalid_matcher(source, reason))?;
        Ok(Self {
            source: source.to_string(),
            alternatives,
        })
    }

    /// The selector text this matcher was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Check `elem`, whose ancestors from the document root down to its
    /// parent are `ancestors`.
    pub fn matches(&self, elem: &Element, ancestors: &[&Element]) -> bool {
        self.alternatives
            .iter()
            .any(|complex| complex.matches(elem, ancestors))
    }
}

impl FromStr for Matcher {
    type Err = TocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// =============================================================================
// Selector AST
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// Compounds joined by combinators. Each combinator links its compound to
/// the one on its left; the first combinator is unused.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    parts: Vec<(Combinator, Compound)>,
}

impl Complex {
    fn matches(&self, elem: &Element, ancestors: &[&Element]) -> bool {
        Self::matches_parts(&self.parts, elem, ancestors)
    }

    /// Right-to-left match of `parts` ending at `elem`.
    fn matches_parts(parts: &[(Combinator, Compound)], elem: &Element, ancestors: &[&Element]) -> bool {
        let Some(((combinator, compound), rest)) = parts.split_last() else {
            return true;
        };
        if !compound.matches(elem) {
            return false;
        }
        if rest.is_empty() {
            return true;
        }
        match combinator {
            Combinator::Child => ancestors
                .split_last()
                .is_some_and(|(parent, above)| Self::matches_parts(rest, parent, above)),
            Combinator::Descendant => (0..ancestors.len())
                .rev()
                .any(|i| Self::matches_parts(rest, ancestors[i], &ancestors[..i])),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCondition>,
    negations: Vec<Compound>,
}

impl Compound {
    fn matches(&self, elem: &Element) -> bool {
        self.tag.as_deref().is_none_or(|tag| elem.tag.eq_ignore_ascii_case(tag))
            && self.ids.iter().all(|id| elem.id() == Some(id.as_str()))
            && self.classes.iter().all(|class| elem.has_class(class))
            && self.attrs.iter().all(|cond| cond.matches(elem))
            && !self.negations.iter().any(|neg| neg.matches(elem))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals,
    Includes,
    Prefix,
    Suffix,
    Contains,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrCondition {
    name: String,
    op: AttrOp,
    value: String,
}

impl AttrCondition {
    fn matches(&self, elem: &Element) -> bool {
        let Some(actual) = elem.get_attr(&self.name) else {
            return false;
        };
        let expected = self.value.as_str();
        match self.op {
            AttrOp::Exists => true,
            AttrOp::Equals => actual == expected,
            AttrOp::Includes => actual.split_ascii_whitespace().any(|w| w == expected),
            AttrOp::Prefix => !expected.is_empty() && actual.starts_with(expected),
            AttrOp::Suffix => !expected.is_empty() && actual.ends_with(expected),
            AttrOp::Contains => !expected.is_empty() && actual.contains(expected),
        }
    }
}

// =============================================================================
// Parser
// =============================================================================

/// One simple selector following the optional type selector of a compound.
enum Simple {
    Id(String),
    Class(String),
    Attr(AttrCondition),
    Not(Compound),
}

fn parse_selector_group(source: &str) -> Result<Vec<Complex>, String> {
    let input = source.trim();
    if input.is_empty() {
        return Err("expected a selector".to_string());
    }
    match selector_group(input) {
        Ok(("", alternatives)) => Ok(alternatives),
        Ok((rest, _)) => Err(format!("unexpected `{rest}`")),
        Err(err) => Err(err.to_string()),
    }
}

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

fn selector_group(input: &str) -> IResult<&str, Vec<Complex>> {
    separated_list1(ws(char(',')), complex).parse(input)
}

fn complex(input: &str) -> IResult<&str, Complex> {
    let (input, first) = compound(input)?;
    let (input, rest) = many0(pair(combinator, compound)).parse(input)?;

    let mut parts = Vec::with_capacity(rest.len() + 1);
    parts.push((Combinator::Descendant, first));
    parts.extend(rest);
    Ok((input, Complex { parts }))
}

fn combinator(input: &str) -> IResult<&str, Combinator> {
    alt((
        value(Combinator::Child, ws(char('>'))),
        value(Combinator::Descendant, multispace1),
    ))
    .parse(input)
}

fn compound(input: &str) -> IResult<&str, Compound> {
    let (rest, (type_sel, simples)) = pair(opt(type_selector), many0(simple)).parse(input)?;
    if type_sel.is_none() && simples.is_empty() {
        return Err(nom::Err::Error(ParseError::from_error_kind(input, ErrorKind::Verify)));
    }

    let mut compound = Compound {
        tag: type_sel.flatten(),
        ..Compound::default()
    };
    for simple in simples {
        match simple {
            Simple::Id(id) => compound.ids.push(id),
            Simple::Class(class) => compound.classes.push(class),
            Simple::Attr(cond) => compound.attrs.push(cond),
            Simple::Not(negated) => compound.negations.push(negated),
        }
    }
    Ok((rest, compound))
}

/// `*` (no tag constraint) or a tag name.
fn type_selector(input: &str) -> IResult<&str, Option<String>> {
    alt((
        value(None, char('*')),
        map(name, |tag| Some(tag.to_ascii_lowercase())),
    ))
    .parse(input)
}

fn simple(input: &str) -> IResult<&str, Simple> {
    alt((
        map(preceded(char('#'), name), |id| Simple::Id(id.to_string())),
        map(preceded(char('.'), name), |class| Simple::Class(class.to_string())),
        map(delimited(char('['), attr_condition, char(']')), Simple::Attr),
        map(delimited(tag_no_case(":not("), ws(compound), char(')')), Simple::Not),
    ))
    .parse(input)
}

fn attr_condition(input: &str) -> IResult<&str, AttrCondition> {
    let (input, attr) = ws(name).parse(input)?;
    let (input, test) = opt(pair(ws(attr_op), ws(attr_value))).parse(input)?;
    let (op, value) = test.unwrap_or((AttrOp::Exists, String::new()));
    Ok((
        input,
        AttrCondition {
            name: attr.to_ascii_lowercase(),
            op,
            value,
        },
    ))
}

fn attr_op(input: &str) -> IResult<&str, AttrOp> {
    alt((
        value(AttrOp::Includes, tag("~=")),
        value(AttrOp::Prefix, tag("^=")),
        value(AttrOp::Suffix, tag("$=")),
        value(AttrOp::Contains, tag("*=")),
        value(AttrOp::Equals, char('=')),
    ))
    .parse(input)
}

fn attr_value(input: &str) -> IResult<&str, String> {
    map(
        alt((
            delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
            delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
            name,
        )),
        str::to_string,
    )
    .parse(input)
}

fn name(input: &str) -> IResult<&str, &str> {
    take_while1(is_name_char).parse(input)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(selector: &str, elem: &Element, ancestors: &[&Element]) -> bool {
        Matcher::parse(selector).unwrap().matches(elem, ancestors)
    }

    #[test]
    fn test_type_and_universal() {
        let h2 = Element::new("h2");
        assert!(check("h2", &h2, &[]));
        assert!(check("H2", &h2, &[]));
        assert!(check("*", &h2, &[]));
        assert!(!check("h3", &h2, &[]));
    }

    #[test]
    fn test_id_class_attr() {
        let elem = Element::new("h2")
            .with_id("intro")
            .with_class("title lead")
            .attr("lang", "en-GB")
            .attr("data-toc", "");

        assert!(check("#intro", &elem, &[]));
        assert!(check("h2.title.lead", &elem, &[]));
        assert!(!check(".title.missing", &elem, &[]));
        assert!(check("[data-toc]", &elem, &[]));
        assert!(check("[lang=en-GB]", &elem, &[]));
        assert!(check("[lang='en-GB']", &elem, &[]));
        assert!(check("[lang^=en]", &elem, &[]));
        assert!(check("[lang$=\"GB\"]", &elem, &[]));
        assert!(check("[lang*=n-G]", &elem, &[]));
        assert!(check("[class~=lead]", &elem, &[]));
        assert!(!check("[class~=lea]", &elem, &[]));
        assert!(!check("[hidden]", &elem, &[]));
    }

    #[test]
    fn test_negation() {
        let plain = Element::new("h2").with_class("test");
        let excluded = Element::new("h2").with_class("test this");
        assert!(check(".test:not(.this)", &plain, &[]));
        assert!(!check(".test:not(.this)", &excluded, &[]));
    }

    #[test]
    fn test_combinators() {
        let article = Element::new("article");
        let section = Element::new("section");
        let h2 = Element::new("h2");

        assert!(check("article h2", &h2, &[&article, &section]));
        assert!(check("article > section > h2", &h2, &[&article, &section]));
        assert!(check("article>section h2", &h2, &[&article, &section]));
        assert!(!check("article > h2", &h2, &[&article, &section]));
        assert!(!check("aside h2", &h2, &[&article, &section]));
        assert!(!check("article h2", &h2, &[]));
    }

    #[test]
    fn test_group() {
        let h1 = Element::new("h1");
        let p = Element::new("p").with_class("title");
        let matcher = Matcher::parse("h1, .title").unwrap();
        assert!(matcher.matches(&h1, &[]));
        assert!(matcher.matches(&p, &[]));
        assert_eq!(matcher.source(), "h1, .title");
    }

    #[test]
    fn test_invalid_matchers() {
        for bad in ["", "h2 >", ">", ".", "h2:hover", "[lang", "[lang=\"en]", "h2,", "h2 )"] {
            let err = Matcher::parse(bad).unwrap_err();
            assert!(matches!(err, TocError::InvalidMatcher { .. }), "{bad:?} should fail");
        }
    }

    #[test]
    fn test_whitespace_and_case() {
        let h2 = Element::new("h2").with_class("lead");
        assert!(check("  h1 ,  h2  ", &h2, &[]));
        assert!(check("h2:NOT( .skip )", &h2, &[]));
        assert!(check("[ class ~= 'lead' ]", &h2, &[]));
    }

    #[test]
    fn test_error_reports_leftover_input() {
        let err = Matcher::parse("h2 )").unwrap_err();
        assert_eq!(err.to_string(), "invalid matcher `h2 )`: unexpected ` )`");
    }

    #[test]
    fn test_from_str() {
        let matcher: Matcher = "section h3".parse().unwrap();
        assert_eq!(matcher.source(), "section h3");
    }
}
