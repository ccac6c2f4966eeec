//! # Macro-String Notation
//!
//! A human-readable rendering of [`EncodedText`], parsed with `nom` and
//! produced by the `Display` impls in this module:
//!
//! ```text
//! Hello <color(0xFF0000FF)><pcname(lnum1)><color(stackcolor)>!
//! <if([lnum1>=2],<num(lnum1)> items,one item)>
//! ```
//!
//! * `<name>` / `<name(arg,...)>` invoke a macro; unknown codes render as
//!   `macro_XX` with a two digit hex code.
//! * Arguments are integers (`12`, `0x1F`), placeholders (`t_hour`,
//!   `stackcolor`, `ph_XX`), parameters (`lnum1`, `gstr(<num(2)>)`), binary
//!   comparisons in brackets, or otherwise nested encoded text.
//! * `\` escapes the next character.

use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1, take_while_m_n},
    character::complete::{anychar, char, digit1, hex_digit1, one_of},
    combinator::{all_consuming, map, map_opt, map_res, peek, value},
    error::{context, convert_error, VerboseError},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{BinaryOp, EncodedText, Expression, MacroCode, ParameterKind, Payload, PlaceholderKind};
use crate::error::{Error, InternalResult};

pub type ParserResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

const TOP_STOP: &str = "";
const ARGUMENT_STOP: &str = ",)";
const OPERAND_STOP: &str = "<>=!],)";

/// Parses a complete macro string.
pub fn parse(input: &str) -> InternalResult<EncodedText> {
    match all_consuming(encoded(TOP_STOP, true))(input) {
        Ok((_, text)) => Ok(text),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(Error::MacroString {
            message: convert_error(input, e),
        }),
        Err(nom::Err::Incomplete(_)) => Err(Error::MacroString {
            message: "incomplete input".to_string(),
        }),
    }
}

enum Piece {
    Text(String),
    Payload(Payload),
}

fn assemble(pieces: Vec<Piece>) -> EncodedText {
    let mut payloads: Vec<Payload> = Vec::with_capacity(pieces.len());
    for piece in pieces {
        match piece {
            Piece::Text(text) => match payloads.last_mut() {
                Some(Payload::Text(last)) => last.push_str(&text),
                _ => payloads.push(Payload::Text(text)),
            },
            Piece::Payload(payload) => payloads.push(payload),
        }
    }
    EncodedText::new(payloads)
}

fn piece<'a>(
    stop: &'static str,
    allow_macros: bool,
) -> impl FnMut(&'a str) -> ParserResult<'a, Piece> {
    move |input: &'a str| {
        if allow_macros && input.starts_with('<') {
            return map(parse_macro, Piece::Payload)(input);
        }
        alt((
            map(preceded(char('\\'), anychar), |c: char| {
                Piece::Text(c.to_string())
            }),
            map(
                take_while1(move |c: char| c != '<' && c != '\\' && !stop.contains(c)),
                |s: &str| Piece::Text(s.to_string()),
            ),
        ))(input)
    }
}

fn encoded<'a>(
    stop: &'static str,
    allow_macros: bool,
) -> impl FnMut(&'a str) -> ParserResult<'a, EncodedText> {
    map(many0(piece(stop, allow_macros)), assemble)
}

#[tracing::instrument(level = "trace", skip(input))]
fn parse_macro(input: &str) -> ParserResult<Payload> {
    context(
        "macro",
        map(
            delimited(char('<'), pair(macro_name, arguments_opt), char('>')),
            |(code, expressions)| Payload::new_macro(code, expressions),
        ),
    )(input)
}

fn macro_name(input: &str) -> ParserResult<MacroCode> {
    context(
        "macro name",
        alt((
            map_res(
                preceded(tag("macro_"), take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit())),
                |hex: &str| u8::from_str_radix(hex, 16).map(MacroCode::from_code),
            ),
            map_opt(
                take_while1(|c: char| c.is_ascii_alphanumeric()),
                MacroCode::from_name,
            ),
        )),
    )(input)
}

fn arguments_opt(input: &str) -> ParserResult<Vec<Expression>> {
    if input.starts_with('(') {
        arguments(input)
    } else {
        Ok((input, Vec::new()))
    }
}

fn arguments(input: &str) -> ParserResult<Vec<Expression>> {
    context(
        "arguments",
        delimited(
            char('('),
            alt((
                map(peek(char(')')), |_| Vec::new()),
                separated_list1(char(','), argument),
            )),
            char(')'),
        ),
    )(input)
}

fn argument(input: &str) -> ParserResult<Expression> {
    alt((
        terminated(atom, peek(one_of(ARGUMENT_STOP))),
        map(encoded(ARGUMENT_STOP, true), Expression::String),
    ))(input)
}

fn operand(input: &str) -> ParserResult<Expression> {
    alt((
        terminated(atom, peek(one_of("<>=!]"))),
        map(encoded(OPERAND_STOP, false), Expression::String),
    ))(input)
}

fn atom(input: &str) -> ParserResult<Expression> {
    alt((binary, parameter, placeholder, integer))(input)
}

fn integer(input: &str) -> ParserResult<Expression> {
    context(
        "integer",
        alt((
            map_res(preceded(tag("0x"), hex_digit1), |hex: &str| {
                u32::from_str_radix(hex, 16).map(Expression::UInt)
            }),
            map_res(digit1, |digits: &str| digits.parse::<u32>().map(Expression::UInt)),
        )),
    )(input)
}

fn placeholder(input: &str) -> ParserResult<Expression> {
    context(
        "placeholder",
        alt((
            map_res(
                preceded(tag("ph_"), take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit())),
                |hex: &str| {
                    u8::from_str_radix(hex, 16)
                        .map(|code| Expression::Placeholder(PlaceholderKind::from_code(code)))
                },
            ),
            map_opt(
                take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
                |word: &str| {
                    PlaceholderKind::NAMED
                        .iter()
                        .find(|kind| kind.keyword() == Some(word))
                        .map(|kind| Expression::Placeholder(*kind))
                },
            ),
        )),
    )(input)
}

fn parameter_kind(input: &str) -> ParserResult<ParameterKind> {
    alt((
        value(ParameterKind::LocalNumber, tag("lnum")),
        value(ParameterKind::GlobalNumber, tag("gnum")),
        value(ParameterKind::LocalString, tag("lstr")),
        value(ParameterKind::GlobalString, tag("gstr")),
    ))(input)
}

fn parameter(input: &str) -> ParserResult<Expression> {
    context(
        "parameter",
        map(
            pair(
                parameter_kind,
                alt((
                    map_res(digit1, |digits: &str| digits.parse::<u32>().map(Expression::UInt)),
                    delimited(char('('), argument, char(')')),
                )),
            ),
            |(kind, index)| Expression::Parameter(kind, Box::new(index)),
        ),
    )(input)
}

fn binary_op(input: &str) -> ParserResult<BinaryOp> {
    alt((
        value(BinaryOp::GreaterThanOrEqual, tag(">=")),
        value(BinaryOp::LessThanOrEqual, tag("<=")),
        value(BinaryOp::NotEqual, tag("!=")),
        value(BinaryOp::GreaterThan, tag(">")),
        value(BinaryOp::LessThan, tag("<")),
        value(BinaryOp::Equal, tag("=")),
    ))(input)
}

fn binary(input: &str) -> ParserResult<Expression> {
    context(
        "binary expression",
        map(
            delimited(char('['), tuple((operand, binary_op, operand)), char(']')),
            |(lhs, op, rhs)| Expression::binary(op, lhs, rhs),
        ),
    )(input)
}

fn looks_like_atom(text: &str) -> bool {
    all_consuming(atom)(text).is_ok()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Nesting {
    Top,
    Argument,
    Operand,
}

impl Nesting {
    fn escapes(self, c: char) -> bool {
        match self {
            Nesting::Top => matches!(c, '<' | '\\'),
            Nesting::Argument => matches!(c, '<' | '\\' | ',' | ')'),
            Nesting::Operand => OPERAND_STOP.contains(c) || c == '\\',
        }
    }
}

fn write_text(f: &mut fmt::Formatter<'_>, text: &EncodedText, nesting: Nesting) -> fmt::Result {
    let guard_atom = nesting != Nesting::Top && text.len() == 1;
    for payload in text {
        match payload {
            Payload::Text(run) => {
                let mut chars = run.chars();
                if guard_atom && looks_like_atom(run) {
                    if let Some(first) = chars.next() {
                        write!(f, "\\{}", first)?;
                    }
                }
                for c in chars {
                    if nesting.escapes(c) {
                        write!(f, "\\{}", c)?;
                    } else {
                        write!(f, "{}", c)?;
                    }
                }
            }
            Payload::Macro(m) => {
                match m.code.name() {
                    Some(name) => write!(f, "<{}", name)?,
                    None => write!(f, "<macro_{:02x}", m.code.code())?,
                }
                if !m.expressions.is_empty() {
                    write!(f, "(")?;
                    for (i, expression) in m.expressions.iter().enumerate() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        write_expression(f, expression, Nesting::Argument)?;
                    }
                    write!(f, ")")?;
                }
                write!(f, ">")?;
            }
            Payload::Invalid(_) => write!(f, "\u{FFFD}")?,
        }
    }
    Ok(())
}

fn write_expression(
    f: &mut fmt::Formatter<'_>,
    expression: &Expression,
    nesting: Nesting,
) -> fmt::Result {
    match expression {
        Expression::UInt(value) => write!(f, "{}", value),
        Expression::String(text) => write_text(f, text, nesting),
        Expression::Placeholder(kind) => match kind.keyword() {
            Some(keyword) => write!(f, "{}", keyword),
            None => write!(f, "ph_{:02x}", kind.code()),
        },
        Expression::Parameter(kind, index) => match index.as_ref() {
            Expression::UInt(n) => write!(f, "{}{}", kind, n),
            other => {
                write!(f, "{}(", kind)?;
                write_expression(f, other, Nesting::Argument)?;
                write!(f, ")")
            }
        },
        Expression::Binary(op, lhs, rhs) => {
            write!(f, "[")?;
            write_expression(f, lhs, Nesting::Operand)?;
            write!(f, "{}", op.symbol())?;
            write_expression(f, rhs, Nesting::Operand)?;
            write!(f, "]")
        }
    }
}

impl fmt::Display for EncodedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_text(f, self, Nesting::Top)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expression(f, self, Nesting::Argument)
    }
}

impl std::str::FromStr for EncodedText {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl Serialize for EncodedText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EncodedText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_text() {
        let text = parse("hello, world (really)").unwrap();
        assert_eq!(text.payloads(), &[Payload::text("hello, world (really)")]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn test_macro_with_arguments() {
        let text = parse("a<if(1,yes,no)>b").unwrap();
        assert_eq!(
            text.payloads(),
            &[
                Payload::text("a"),
                Payload::new_macro(
                    MacroCode::If,
                    vec![
                        Expression::uint(1),
                        Expression::string("yes"),
                        Expression::string("no"),
                    ]
                ),
                Payload::text("b"),
            ]
        );
    }

    #[test]
    fn test_macro_without_arguments() {
        let text = parse("x<br>y").unwrap();
        assert_eq!(text.payloads()[1], Payload::new_macro(MacroCode::NewLine, vec![]));
    }

    #[test]
    fn test_hex_placeholder_and_parameters() {
        let text = parse("<color(0xFF00FF00)><color(stackcolor)><num(lnum2)><num(gnum(lnum1))>")
            .unwrap();
        let exprs: Vec<&Expression> = text
            .iter()
            .map(|p| &p.as_macro().unwrap().expressions[0])
            .collect();
        assert_eq!(exprs[0], &Expression::uint(0xFF00FF00));
        assert_eq!(exprs[1], &Expression::placeholder(PlaceholderKind::StackColor));
        assert_eq!(exprs[2], &Expression::local_number(2));
        assert_eq!(
            exprs[3],
            &Expression::Parameter(
                ParameterKind::GlobalNumber,
                Box::new(Expression::local_number(1))
            )
        );
    }

    #[test]
    fn test_binary_expression() {
        let text = parse("<if([lnum1>=10],big,small)>").unwrap();
        let m = text.payloads()[0].as_macro().unwrap();
        assert_eq!(
            m.expressions[0],
            Expression::binary(
                BinaryOp::GreaterThanOrEqual,
                Expression::local_number(1),
                Expression::uint(10)
            )
        );
    }

    #[test]
    fn test_string_equality_operands() {
        let text = parse("<if([abc=abc],same,different)>").unwrap();
        let m = text.payloads()[0].as_macro().unwrap();
        assert_eq!(
            m.expressions[0],
            Expression::binary(
                BinaryOp::Equal,
                Expression::string("abc"),
                Expression::string("abc")
            )
        );
    }

    #[test]
    fn test_nested_macro_in_argument() {
        let text = parse("<string(<num(5)> apples)>").unwrap();
        let m = text.payloads()[0].as_macro().unwrap();
        let inner = m.expressions[0].as_string().unwrap();
        assert_eq!(inner.len(), 2);
        assert_eq!(inner.payloads()[1], Payload::text(" apples"));
    }

    #[test]
    fn test_empty_argument() {
        let text = parse("<if(0,,b)>").unwrap();
        let m = text.payloads()[0].as_macro().unwrap();
        assert_eq!(m.expressions[1], Expression::String(EncodedText::empty()));
    }

    #[test]
    fn test_unknown_macro_code() {
        let text = parse("<macro_7f(1)>").unwrap();
        assert_eq!(
            text.payloads()[0].as_macro().unwrap().code,
            MacroCode::Unknown(0x7F)
        );
        assert_eq!(text.to_string(), "<macro_7f(1)>");
    }

    #[test]
    fn test_rejects_malformed_macro() {
        assert!(parse("<nosuchmacro(1)>").is_err());
        assert!(parse("<if(1,a").is_err());
    }

    #[test]
    fn test_display_escapes_and_guards_atoms() {
        let text = EncodedText::new(vec![Payload::new_macro(
            MacroCode::String,
            vec![Expression::string("12"), Expression::string("a,b")],
        )]);
        let rendered = text.to_string();
        assert_eq!(rendered, "<string(\\12,a\\,b)>");
        assert_eq!(parse(&rendered).unwrap(), text);
    }

    #[test]
    fn test_display_round_trip() {
        let source = "Hi <color(4278190335)><if([lnum1>=2],<num(lnum1)> items,one item)><color(stackcolor)>\\<3";
        let text = parse(source).unwrap();
        assert_eq!(text.to_string(), source);
    }

    #[test]
    fn test_serde_uses_notation() {
        let text = parse("<num(3)>x").unwrap();
        let json = serde_json::to_string(&text).unwrap();
        assert_eq!(json, "\"<num(3)>x\"");
        let back: EncodedText = serde_json::from_str(&json).unwrap();
        assert_eq!(back, text);
    }
}
