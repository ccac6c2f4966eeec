use crate::builder::ColorTarget;
use crate::error::EvalResult;
use crate::eval::context::EvaluationContext;
use crate::eval::evaluator::Evaluator;
use crate::eval::expression::operands;
use crate::sheets::ui_color;
use crate::text::{Expression, PlaceholderKind};

/// `stackcolor` pops; anything resolvable is pushed as BGRA; anything else is
/// dropped.
fn push_or_pop(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
    target: ColorTarget,
) -> EvalResult<()> {
    let [color] = operands::<1>(e)?;
    if color.as_placeholder() == Some(PlaceholderKind::StackColor) {
        ctx.builder.pop_color(target);
    } else if let Ok(bgra) = eval.resolve_uint(ctx, color) {
        ctx.builder.push_color(target, bgra);
    }
    Ok(())
}

pub(crate) fn color(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    push_or_pop(eval, ctx, e, ColorTarget::Foreground)
}

pub(crate) fn edge_color(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    push_or_pop(eval, ctx, e, ColorTarget::Edge)
}

pub(crate) fn shadow_color(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    push_or_pop(eval, ctx, e, ColorTarget::Shadow)
}

pub(crate) fn bold(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [enable] = operands::<1>(e)?;
    let enable = eval.resolve_bool(ctx, enable)?;
    ctx.builder.set_bold(enable);
    Ok(())
}

pub(crate) fn italic(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [enable] = operands::<1>(e)?;
    let enable = eval.resolve_bool(ctx, enable)?;
    ctx.builder.set_italic(enable);
    Ok(())
}

/// `UIColor` rows store RGBA; the stacks take BGRA-ordered words.
fn ui_color_type(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
    target: ColorTarget,
) -> EvalResult<()> {
    let [color_type] = operands::<1>(e)?;
    let color_type = eval.resolve_uint(ctx, color_type)?;
    if color_type == 0 {
        ctx.builder.pop_color(target);
    } else if let Some(rgba) = eval
        .sheets
        .get_row(ui_color::NAME, color_type, ctx.language)
        .and_then(|row| row.read_u32(ui_color::FOREGROUND))
    {
        ctx.builder.push_color(target, rgba.rotate_right(8));
    }
    Ok(())
}

pub(crate) fn color_type(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    ui_color_type(eval, ctx, e, ColorTarget::Foreground)
}

pub(crate) fn edge_color_type(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    ui_color_type(eval, ctx, e, ColorTarget::Edge)
}
