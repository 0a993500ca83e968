//! Root custom-property extraction from CSS.
//!
//! The color table is built from the root element's computed custom
//! properties. In a browser those come from `getComputedStyle`; everywhere else
//! [`parse_root_properties`] reads them out of a stylesheet so an in-memory
//! document can serve the same values.
//!
//! Only custom properties (`--name: value`) declared in rules whose selector
//! list contains `:root` or `html` are collected. Everything else, including
//! at-rules, is skipped. Parsing is tolerant: malformed rules are dropped with
//! a debug log instead of failing the whole sheet.
//!
//! ```rust
//! let props = themeswitch::parse_root_properties(
//!     ":root { --color--brand: #111; --dark--brand: #eee; }\n.card { --ignored: 1px; }",
//! );
//! assert_eq!(props, vec![
//!     ("--color--brand".to_string(), "#111".to_string()),
//!     ("--dark--brand".to_string(), "#eee".to_string()),
//! ]);
//! ```
//!
//! Values are kept as their raw source text, trimmed, with any `!important`
//! suffix removed.

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, ToCss, Token,
};

const ROOT_SELECTORS: &[&str] = &[":root", "html"];

/// Returns `(name, value)` for every root custom property, in source order.
pub fn parse_root_properties(css: &str) -> Vec<(String, String)> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);

    let mut sheet = RootRuleParser {
        properties: Vec::new(),
    };

    let rules = cssparser::StyleSheetParser::new(&mut parser, &mut sheet);
    for result in rules {
        if let Err((err, source)) = result {
            log::debug!("skipping CSS rule {:?}: {:?}", source, err.kind);
        }
    }

    sheet.properties
}

struct RootRuleParser {
    properties: Vec<(String, String)>,
}

impl<'i> QualifiedRuleParser<'i> for RootRuleParser {
    /// Whether the selector list targets the root element.
    type Prelude = bool;
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        // Rebuilt from tokens so comments never reach the comparison.
        let mut selectors = vec![String::new()];
        while let Ok(token) = input.next_including_whitespace() {
            match token {
                Token::Comma => selectors.push(String::new()),
                Token::WhiteSpace(_) => push_text(&mut selectors, " "),
                token => {
                    let text = token.to_css_string();
                    push_text(&mut selectors, &text);
                }
            }
        }

        Ok(selectors
            .iter()
            .map(|selector| selector.trim())
            .any(|selector| ROOT_SELECTORS.contains(&selector)))
    }

    fn parse_block<'t>(
        &mut self,
        is_root: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let mut decl_parser = CustomPropertyParser;
        let body = RuleBodyParser::new(input, &mut decl_parser);
        let declarations: Vec<(String, String)> = body.flatten().collect();

        if is_root {
            self.properties.extend(declarations);
        }
        Ok(())
    }
}

impl<'i> AtRuleParser<'i> for RootRuleParser {
    type Prelude = ();
    type AtRule = ();
    type Error = ();
}

fn push_text(selectors: &mut [String], text: &str) {
    if let Some(current) = selectors.last_mut() {
        current.push_str(text);
    }
}

struct CustomPropertyParser;

impl<'i> DeclarationParser<'i> for CustomPropertyParser {
    type Declaration = (String, String);
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        if !name.starts_with("--") {
            return Err(input.new_custom_error::<(), ()>(()));
        }

        let start = input.position();
        while input.next_including_whitespace_and_comments().is_ok() {}
        let raw = input.slice_from(start);

        Ok((name.as_ref().to_string(), clean_value(raw)))
    }
}

impl<'i> AtRuleParser<'i> for CustomPropertyParser {
    type Prelude = ();
    type AtRule = (String, String);
    type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for CustomPropertyParser {
    type Prelude = ();
    type QualifiedRule = (String, String);
    type Error = ();
}

impl<'i> RuleBodyItemParser<'i, (String, String), ()> for CustomPropertyParser {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}

fn clean_value(raw: &str) -> String {
    let value = raw.trim();
    let lower = value.to_ascii_lowercase();
    match lower.strip_suffix("important") {
        Some(rest) if rest.trim_end().ends_with('!') => {
            let cut = rest.trim_end().len() - 1;
            value[..cut].trim_end().to_string()
        }
        _ => value.to_string(),
    }
}
