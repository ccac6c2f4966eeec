//! Numeric formatting macros. Output is culture-invariant.

use crate::error::{EvalError, EvalResult};
use crate::eval::context::EvaluationContext;
use crate::eval::evaluator::Evaluator;
use crate::eval::expression::operands;
use crate::text::Expression;

/// `num(value)`: signed decimal, `0` when the operand is missing or
/// unresolvable.
pub(crate) fn num(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let value = e.first().and_then(|v| eval.resolve_int(ctx, v).ok());
    match value {
        Some(value) => ctx.builder.append_text(&value.to_string()),
        None => ctx.builder.append_char('0'),
    };
    Ok(())
}

pub(crate) fn hex(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [value] = operands::<1>(e)?;
    let value = eval.resolve_uint(ctx, value)?;
    ctx.builder.append_text(&format!("0x{:08X}", value));
    Ok(())
}

/// `kilo(value, separator)`: decimal grouped by thousands.
pub(crate) fn kilo(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let value = match operands::<2>(e) {
        Ok([value, _]) => eval.resolve_int(ctx, value).ok(),
        Err(_) => None,
    };
    let Some(value) = value else {
        ctx.builder.append_char('0');
        return Ok(());
    };
    let separator = &e[1];

    if value == i32::MIN {
        for (i, group) in ["-2", "147", "483", "648"].iter().enumerate() {
            if i > 0 {
                let _ = eval.resolve_string(ctx, separator);
            }
            ctx.builder.append_text(group);
        }
        return Ok(());
    }

    if value < 0 {
        ctx.builder.append_char('-');
    }
    let digits = value.unsigned_abs().to_string();
    let len = digits.len();
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            let _ = eval.resolve_string(ctx, separator);
        }
        ctx.builder.append_char(digit);
    }
    Ok(())
}

/// `sec(value)`: at least two digits.
pub(crate) fn sec(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [value] = operands::<1>(e)?;
    let value = eval.resolve_uint(ctx, value)?;
    ctx.builder.append_text(&format!("{:02}", value));
    Ok(())
}

/// `float(value, radix, separator)`: fixed point `value / radix`. The
/// fractional part is floored towards negative infinity and printed with one
/// digit per power of ten below `radix`.
pub(crate) fn float(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [value, radix, separator] = operands::<3>(e)?;
    let value = eval.resolve_int(ctx, value)?;
    let radix = eval.resolve_int(ctx, radix)?;
    let (mut integer, mut fraction) = value
        .checked_div(radix)
        .zip(value.checked_rem(radix))
        .ok_or_else(|| EvalError::malformed(format!("cannot divide {} by {}", value, radix)))?;
    if fraction < 0 {
        integer -= 1;
        fraction += radix;
    }

    ctx.builder.append_text(&integer.to_string());
    eval.resolve_string(ctx, separator)?;

    let mut digits = Vec::new();
    let mut r = radix;
    while r > 1 {
        digits.push(char::from(b'0' + (fraction % 10).unsigned_abs() as u8));
        fraction /= 10;
        r /= 10;
    }
    let fraction: String = digits.iter().rev().collect();
    ctx.builder.append_text(&fraction);
    Ok(())
}

/// `digit(value, width)`: zero-padded to `width` digits, sign excluded.
pub(crate) fn digit(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [value, width] = operands::<2>(e)?;
    let value = eval.resolve_int(ctx, value)?;
    let width = eval.resolve_int(ctx, width)?;
    let width = usize::try_from(width)
        .map_err(|_| EvalError::malformed(format!("negative digit width {}", width)))?;
    let sign = if value < 0 { "-" } else { "" };
    ctx.builder
        .append_text(&format!("{}{:0width$}", sign, value.unsigned_abs(), width = width));
    Ok(())
}

/// `ordinal(value)`: English ordinal suffix.
pub(crate) fn ordinal(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [value] = operands::<1>(e)?;
    let value = eval.resolve_uint(ctx, value)?;
    ctx.builder
        .append_text(&format!("{}{}", value, ordinal_suffix(value)));
    Ok(())
}

pub(crate) fn ordinal_suffix(value: u32) -> &'static str {
    if (value / 10) % 10 == 1 {
        return "th";
    }
    match value % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::ordinal_suffix;
    use crate::eval::handlers::test_support::{evaluator, render};
    use crate::provider::InMemorySheets;
    use crate::text::LocalParameter;

    fn run(source: &str, params: &[LocalParameter]) -> String {
        render(&evaluator(InMemorySheets::new()), source, params)
    }

    #[test]
    fn test_num() {
        assert_eq!(run("<num(42)>", &[]), "42");
        assert_eq!(run("<num(lnum1)>", &[(-3i32).into()]), "-3");
        assert_eq!(run("<num(lstr1)>", &["x".into()]), "0");
        assert_eq!(run("<num>", &[]), "0");
    }

    #[test]
    fn test_hex() {
        assert_eq!(run("<hex(255)>", &[]), "0x000000FF");
        assert_eq!(run("<hex(lstr1)>", &["x".into()]), "<hex(lstr1)>");
    }

    #[test]
    fn test_kilo() {
        assert_eq!(run("<kilo(1234567,\\,)>", &[]), "1,234,567");
        assert_eq!(run("<kilo(999,\\,)>", &[]), "999");
        assert_eq!(run("<kilo(1000,.)>", &[]), "1.000");
        assert_eq!(run("<kilo(0,\\,)>", &[]), "0");
        assert_eq!(run("<kilo(lnum1,\\,)>", &[(-1234i32).into()]), "-1,234");
        assert_eq!(run("<kilo(lnum1,\\,)>", &[i32::MIN.into()]), "-2,147,483,648");
        assert_eq!(run("<kilo(lstr1,\\,)>", &["x".into()]), "0");
    }

    #[test]
    fn test_sec() {
        assert_eq!(run("<sec(5)>", &[]), "05");
        assert_eq!(run("<sec(123)>", &[]), "123");
    }

    #[test]
    fn test_float() {
        assert_eq!(run("<float(12345,100,.)>", &[]), "123.45");
        assert_eq!(run("<float(5,100,.)>", &[]), "0.05");
        assert_eq!(run("<float(lnum1,10,.)>", &[(-15i32).into()]), "-2.5");
        assert_eq!(run("<float(1,0,.)>", &[]), "<float(1,0,.)>");
    }

    #[test]
    fn test_digit() {
        assert_eq!(run("<digit(7,3)>", &[]), "007");
        assert_eq!(run("<digit(lnum1,3)>", &[(-7i32).into()]), "-007");
        assert_eq!(run("<digit(1234,2)>", &[]), "1234");
    }

    #[test]
    fn test_ordinal() {
        assert_eq!(run("<ordinal(1)>", &[]), "1st");
        assert_eq!(run("<ordinal(11)>", &[]), "11th");
        assert_eq!(run("<ordinal(21)>", &[]), "21st");
        assert_eq!(run("<ordinal(13)>", &[]), "13th");
        assert_eq!(ordinal_suffix(112), "th");
        assert_eq!(ordinal_suffix(102), "nd");
    }
}
