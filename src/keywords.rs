//! Free-identifier extraction for code fragments.

use lazy_static::lazy_static;
use oxc_allocator::Allocator;
use oxc_ast::ast::{BindingIdentifier, IdentifierReference};
use oxc_ast_visit::Visit;
use oxc_parser::Parser;
use oxc_span::SourceType;
use regex::Regex;
use std::collections::HashSet;
use tracing::trace;

/// Lexical scan of a code fragment.
pub trait KeywordExtractor: Send + Sync {
    /// Identifiers referenced by `code` that it does not bind itself.
    fn free_identifiers(&self, code: &str) -> HashSet<String>;
}

lazy_static! {
    static ref JS_RESERVED: HashSet<&'static str> = [
        "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
        "default", "delete", "do", "else", "export", "extends", "false", "finally", "for",
        "function", "if", "import", "in", "instanceof", "let", "new", "null", "of", "return",
        "static", "super", "switch", "this", "throw", "true", "try", "typeof", "var", "void",
        "while", "with", "yield",
    ]
    .into_iter()
    .collect();

    static ref STRING_LITERAL_RE: Regex =
        Regex::new(r#""(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'|`(?:[^`\\]|\\.)*`"#).unwrap();

    // Identifier not preceded by `.`, so member names are skipped.
    static ref FREE_IDENT_RE: Regex =
        Regex::new(r"(?:^|[^.\w$])([A-Za-z_$][\w$]*)").unwrap();
}

pub(crate) fn fragment_source_type() -> SourceType {
    SourceType::default()
        .with_typescript(true)
        .with_module(true)
        .with_jsx(true)
}

/// Parser-backed extractor; falls back to a regex scan when the fragment
/// is not a parseable expression.
#[derive(Debug, Default, Clone, Copy)]
pub struct OxcKeywordExtractor;

impl KeywordExtractor for OxcKeywordExtractor {
    fn free_identifiers(&self, code: &str) -> HashSet<String> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, code, fragment_source_type()).parse_expression();

        match ret {
            Ok(expr) => {
                let mut collector = ReferenceCollector::default();
                collector.visit_expression(&expr);
                collector
                    .references
                    .into_iter()
                    .filter(|name| !collector.bindings.contains(name))
                    .collect()
            }
            Err(errors) => {
                trace!(
                    errors = errors.len(),
                    "fragment did not parse, scanning identifiers lexically"
                );
                scan_identifiers(code)
            }
        }
    }
}

#[derive(Default)]
struct ReferenceCollector {
    references: Vec<String>,
    bindings: HashSet<String>,
}

impl<'a> Visit<'a> for ReferenceCollector {
    fn visit_identifier_reference(&mut self, ident: &IdentifierReference<'a>) {
        self.references.push(ident.name.to_string());
    }

    fn visit_binding_identifier(&mut self, ident: &BindingIdentifier<'a>) {
        self.bindings.insert(ident.name.to_string());
    }
}

/// Regex identifier scan: string literals and member names are ignored,
/// reserved words dropped.
pub fn scan_identifiers(code: &str) -> HashSet<String> {
    let stripped = STRING_LITERAL_RE.replace_all(code, "\"\"");
    FREE_IDENT_RE
        .captures_iter(&stripped)
        .map(|cap| cap[1].to_string())
        .filter(|ident| !JS_RESERVED.contains(ident.as_str()))
        .collect()
}
