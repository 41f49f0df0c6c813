use crate::ast::Span;
use crate::parser::Rule;
use thiserror::Error;

/// Error produced while turning source text into a syntax tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The grammar rejected the input.
    #[error("{}", format_syntax_error(.0))]
    Syntax(Box<pest::error::Error<Rule>>),

    /// A token matched the grammar but could not be converted.
    #[error("invalid {what} literal `{text}`")]
    InvalidLiteral {
        what: &'static str,
        text: String,
        span: Span,
    },

    /// The parse tree did not have the shape the grammar guarantees.
    #[error("malformed parse tree: expected {expected}")]
    Malformed { expected: &'static str, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::Syntax(err) => match err.location {
                pest::error::InputLocation::Pos(pos) => Span(pos..pos),
                pest::error::InputLocation::Span((start, end)) => Span(start..end),
            },
            ParseError::InvalidLiteral { span, .. } | ParseError::Malformed { span, .. } => {
                span.clone()
            }
        }
    }
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        ParseError::Syntax(Box::new(err))
    }
}

fn format_syntax_error(err: &pest::error::Error<Rule>) -> String {
    use pest::error::ErrorVariant;

    match &err.variant {
        ErrorVariant::ParsingError { positives, .. } => {
            format!("expected {}", describe_expected(positives))
        }
        ErrorVariant::CustomError { message } => message.clone(),
    }
}

/// Collapse grammar rules into the concepts a user would recognise.
fn describe_expected(rules: &[Rule]) -> String {
    let mut concepts: Vec<&'static str> = Vec::new();

    for rule in rules {
        let concept = match rule {
            Rule::number | Rule::string | Rule::boolean | Rule::null | Rule::undefined => {
                "literal"
            }
            Rule::ident => "identifier",
            Rule::EOI => "end of input",
            Rule::block => "block",
            Rule::params => "parameter list",
            Rule::strict_eq
            | Rule::strict_neq
            | Rule::le
            | Rule::ge
            | Rule::lt
            | Rule::gt
            | Rule::add
            | Rule::sub
            | Rule::mul
            | Rule::div
            | Rule::rem
            | Rule::and
            | Rule::or => "operator",
            Rule::call => "argument list",
            _ => "expression",
        };
        if !concepts.contains(&concept) {
            concepts.push(concept);
        }
    }

    match concepts.split_last() {
        None => "something else".to_string(),
        Some((last, [])) => last.to_string(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}
