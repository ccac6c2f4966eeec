//! Macros reading characters known to the client.
//!
//! `pcname` and `ifself` read live player state; they are only meaningful on
//! the main thread.

use tracing::trace;

use crate::error::{EvalError, EvalResult};
use crate::eval::context::EvaluationContext;
use crate::eval::evaluator::Evaluator;
use crate::eval::expression::operands;
use crate::provider::CharacterInfo;
use crate::text::Expression;

use super::{string_literal, world_name};

/// Icon shown before a foreign home world.
pub(crate) const CROSS_WORLD_ICON: u32 = 88;

fn character(eval: &Evaluator, entity_id: u32) -> EvalResult<CharacterInfo> {
    eval.names
        .character_info(entity_id)
        .ok_or_else(|| EvalError::miss(format!("no character with entity id {}", entity_id)))
}

/// A foreign home world always gets the cross-world icon; the world name
/// follows only with `LogCrossWorldName` enabled.
pub(crate) fn pc_name(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [entity] = operands::<1>(e)?;
    let entity_id = eval.resolve_uint(ctx, entity)?;
    let info = character(eval, entity_id)?;
    ctx.builder.append(&info.name);

    if info.home_world_id != eval.player.home_world_id() {
        if let Ok(world) = world_name(eval, info.home_world_id, ctx.language) {
            ctx.builder.append_icon(CROSS_WORLD_ICON);
            if eval.ui_config.get_uint("LogCrossWorldName") == Some(1) {
                ctx.builder.append(&world);
            }
        }
    }
    Ok(())
}

pub(crate) fn if_pc_gender(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [entity, male, female] = operands::<3>(e)?;
    let entity_id = eval.resolve_uint(ctx, entity)?;
    let info = character(eval, entity_id)?;
    eval.resolve_string(ctx, if info.sex == 0 { male } else { female })
}

pub(crate) fn if_pc_name(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [entity, name, when_true, when_false] = operands::<4>(e)?;
    let entity_id = eval.resolve_uint(ctx, entity)?;
    let name = eval.evaluate(string_literal(name)?, ctx.local_parameters, Some(ctx.language));
    let info = character(eval, entity_id)?;
    let matches = name == info.name;
    trace!("ifpcname {} matches: {}", entity_id, matches);
    eval.resolve_string(ctx, if matches { when_true } else { when_false })
}

pub(crate) fn if_self(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [entity, when_true, when_false] = operands::<3>(e)?;
    let entity_id = eval.resolve_uint(ctx, entity)?;
    let branch = if eval.player.entity_id() == entity_id {
        when_true
    } else {
        when_false
    };
    eval.resolve_string(ctx, branch)
}
