//! Macro handlers, one function per macro code, grouped by family.
//!
//! Every handler has the [`Handler`](super::dispatch::Handler) signature and
//! reports failure through [`EvalError`]; the dispatcher turns any failure into
//! a verbatim copy of the macro. Handlers may have written partial output
//! before failing.

pub(crate) mod case;
pub(crate) mod completion;
pub(crate) mod control;
pub(crate) mod extract;
pub(crate) mod fixed;
pub(crate) mod geometry;
pub(crate) mod identity;
pub(crate) mod noun;
pub(crate) mod number;
pub(crate) mod style;

use crate::error::{EvalError, EvalResult};
use crate::language::ClientLanguage;
use crate::sheets;
use crate::text::{EncodedText, Expression, LocalParameter};

use super::context::EvaluationContext;
use super::evaluator::Evaluator;

/// Appends an evaluated `Addon` row.
pub(crate) fn append_addon(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    addon_id: u32,
    params: &[LocalParameter],
) {
    let text = eval.evaluate_from_addon(addon_id, params, Some(ctx.language));
    ctx.builder.append(&text);
}

/// Raw text of an `Addon` row.
pub(crate) fn addon_text(
    eval: &Evaluator,
    addon_id: u32,
    language: ClientLanguage,
) -> EvalResult<EncodedText> {
    Ok(eval
        .row(sheets::addon::NAME, addon_id, language)?
        .read_text(sheets::addon::TEXT))
}

pub(crate) fn world_name(
    eval: &Evaluator,
    world_id: u32,
    language: ClientLanguage,
) -> EvalResult<EncodedText> {
    Ok(eval
        .row(sheets::world::NAME, world_id, language)?
        .read_text(sheets::world::WORLD_NAME))
}

/// An operand that must be a string literal.
pub(crate) fn string_literal(expression: &Expression) -> EvalResult<&EncodedText> {
    expression
        .as_string()
        .ok_or_else(|| EvalError::malformed(format!("{} is not a string", expression)))
}
