//! Token to [`Value`] conversion.

use base64::{engine::general_purpose::STANDARD as B64, Engine as _};

use crate::error::{ErrorKind, ParseError};
use crate::escape;
use crate::token::{Literal, Token, TokenKind};
use crate::value::Value;

/// Map a literal token to its value.
///
/// Pure: the same token always gives the same result. `NumberFloat128`
/// scans fine but has no value representation.
pub fn materialize(token: &Token<'_>) -> Result<Value, ParseError> {
    let lexeme = token.lexeme;
    let span = token.span;
    let invalid_number = || {
        ParseError::new(
            ErrorKind::InvalidNumber {
                lexeme: lexeme.to_string(),
                kind: token.kind,
            },
            span,
        )
    };

    match token.kind {
        TokenKind::NumberInt32 => lexeme
            .parse::<i32>()
            .map(|i| Value::Integer(i64::from(i)))
            .map_err(|_| invalid_number()),
        TokenKind::NumberInt64 => lexeme
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| invalid_number()),
        // Out-of-range literals parse to infinity, which has no literal form.
        TokenKind::NumberFloat32 => match lexeme.parse::<f32>() {
            Ok(x) if x.is_finite() => Ok(Value::Floating(f64::from(x))),
            _ => Err(invalid_number()),
        },
        TokenKind::NumberFloat64 => match lexeme.parse::<f64>() {
            Ok(x) if x.is_finite() => Ok(Value::Floating(x)),
            _ => Err(invalid_number()),
        },
        TokenKind::NumberFloat128 => Err(ParseError::new(
            ErrorKind::UnsupportedLiteralWidth(TokenKind::NumberFloat128),
            span,
        )),
        TokenKind::BooleanTrue => Ok(Value::Boolean(true)),
        TokenKind::BooleanFalse => Ok(Value::Boolean(false)),
        TokenKind::Null => Ok(Value::Null),
        TokenKind::StringBackQuoted => Ok(Value::String(lexeme.to_string())),
        TokenKind::StringDoubleQuoted => escape::decode_string(lexeme)
            .map(|s| Value::String(s.into_owned()))
            .map_err(|e| e.or_span(span)),
        TokenKind::Binary => decode_binary(lexeme)
            .map(Value::Binary)
            .map_err(|msg| ParseError::new(ErrorKind::MalformedBinary(msg), span)),
        TokenKind::Date | TokenKind::DateTime => match token.literal {
            Literal::DateTime(dt) => Ok(Value::DateTime(dt)),
            _ => Err(not_a_value(token)),
        },
        TokenKind::TimeSpan => match token.literal {
            Literal::TimeSpan(ts) => Ok(Value::TimeSpan(ts)),
            _ => Err(not_a_value(token)),
        },
        _ => Err(not_a_value(token)),
    }
}

fn not_a_value(token: &Token<'_>) -> ParseError {
    ParseError::new(
        ErrorKind::NotAValueToken {
            kind: token.kind,
            lexeme: token.lexeme.to_string(),
        },
        token.span,
    )
}

/// Standard-alphabet base64 with ASCII whitespace ignored.
fn decode_binary(lexeme: &str) -> Result<Vec<u8>, String> {
    let compact: Vec<u8> = lexeme
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    B64.decode(compact).map_err(|e| e.to_string())
}
