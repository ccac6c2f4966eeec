//! Letter-case macros.
//!
//! The operand is evaluated in full into a separate builder first, because
//! its shape (where text runs start and end) is only known after nested
//! macros have run. The payloads are then re-emitted with the case mapping
//! applied to the runs it covers. Invalid payloads are dropped.

use crate::error::EvalResult;
use crate::eval::context::EvaluationContext;
use crate::eval::evaluator::Evaluator;
use crate::eval::expression::operands;
use crate::language::{first_char_to_lower, first_char_to_upper, ClientLanguage};
use crate::text::{Expression, Payload};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaseMapping {
    Upper,
    UpperFirst,
    LowerFirst,
    Title,
    Lower,
}

impl CaseMapping {
    /// Mappings limited to the leading payload, and only if it is text.
    fn leading_only(self) -> bool {
        matches!(
            self,
            CaseMapping::Upper | CaseMapping::UpperFirst | CaseMapping::LowerFirst
        )
    }

    fn apply(self, text: &str, language: ClientLanguage) -> String {
        match self {
            CaseMapping::Upper => text.to_uppercase(),
            CaseMapping::UpperFirst => first_char_to_upper(text),
            CaseMapping::LowerFirst => first_char_to_lower(text),
            CaseMapping::Title => language.title_case(text),
            CaseMapping::Lower => text.to_lowercase(),
        }
    }
}

fn map_case(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
    mapping: CaseMapping,
) -> EvalResult<()> {
    let [operand] = operands::<1>(e)?;
    let text = eval.resolve_to_text(ctx, operand)?;

    for (index, payload) in text.iter().enumerate() {
        match payload {
            Payload::Invalid(_) => {}
            Payload::Text(run) if !mapping.leading_only() || index == 0 => {
                ctx.builder.append_text(&mapping.apply(run, ctx.language));
            }
            other => {
                ctx.builder.append_payload(other);
            }
        }
    }
    Ok(())
}

pub(crate) fn caps(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    map_case(eval, ctx, e, CaseMapping::Upper)
}

pub(crate) fn head(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    map_case(eval, ctx, e, CaseMapping::UpperFirst)
}

pub(crate) fn lower_head(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    map_case(eval, ctx, e, CaseMapping::LowerFirst)
}

pub(crate) fn head_all(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    map_case(eval, ctx, e, CaseMapping::Title)
}

pub(crate) fn lower(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    map_case(eval, ctx, e, CaseMapping::Lower)
}
