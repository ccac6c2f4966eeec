use tracing::error;

use crate::clock::time_component;
use crate::error::{EvalError, EvalResult};
use crate::provider::GlobalParameter;
use crate::text::{BinaryOp, EncodedText, Expression, ParameterKind, Payload, PlaceholderKind};

use super::context::EvaluationContext;
use super::evaluator::Evaluator;

/// The first `N` operands of a macro.
pub(crate) fn operands<const N: usize>(
    expressions: &[Expression],
) -> EvalResult<[&Expression; N]> {
    if expressions.len() < N {
        return Err(EvalError::malformed(format!(
            "expected at least {} operands, got {}",
            N,
            expressions.len()
        )));
    }
    Ok(std::array::from_fn(|i| &expressions[i]))
}

impl Evaluator {
    pub(crate) fn resolve_uint(
        &self,
        ctx: &EvaluationContext<'_>,
        expression: &Expression,
    ) -> EvalResult<u32> {
        match expression {
            Expression::UInt(value) => Ok(*value),
            Expression::Placeholder(PlaceholderKind::Millisecond) => Ok(self.clock.millisecond()),
            Expression::Placeholder(kind) => time_component(&self.clock.now(), *kind)
                .ok_or_else(|| EvalError::malformed(format!("{:?} is not a number", kind))),
            Expression::Parameter(kind, index) => {
                let index = self.resolve_uint(ctx, index)?;
                if index == 0 {
                    return Err(EvalError::malformed("parameter index 0"));
                }
                match kind {
                    ParameterKind::LocalNumber => ctx.local_number(index as usize - 1),
                    ParameterKind::GlobalNumber => match self.global_parameter(index - 1)? {
                        GlobalParameter::Integer(value) => Ok(value as u32),
                        other => {
                            error!(
                                "Requested a number; {} global parameter at {}.",
                                other.kind_name(),
                                index - 1
                            );
                            Err(EvalError::malformed(format!(
                                "global parameter {} is a {}",
                                index,
                                other.kind_name()
                            )))
                        }
                    },
                    ParameterKind::LocalString | ParameterKind::GlobalString => Err(
                        EvalError::malformed(format!("{} is not a number", kind)),
                    ),
                }
            }
            Expression::Binary(op, lhs, rhs) => self.resolve_binary(ctx, *op, lhs, rhs),
            Expression::String(text) => {
                let evaluated = self.evaluate(text, ctx.local_parameters, Some(ctx.language));
                match evaluated.payloads().first() {
                    Some(Payload::Macro(m)) => match m.expressions.first() {
                        Some(inner) => self.resolve_uint(ctx, inner),
                        None => Err(EvalError::malformed("string reduces to a bare macro")),
                    },
                    _ => Err(EvalError::malformed("string is not a number")),
                }
            }
        }
    }

    pub(crate) fn resolve_int(
        &self,
        ctx: &EvaluationContext<'_>,
        expression: &Expression,
    ) -> EvalResult<i32> {
        self.resolve_uint(ctx, expression).map(|v| v as i32)
    }

    pub(crate) fn resolve_bool(
        &self,
        ctx: &EvaluationContext<'_>,
        expression: &Expression,
    ) -> EvalResult<bool> {
        self.resolve_uint(ctx, expression).map(|v| v != 0)
    }

    /// Comparisons are signed. Equality falls back to comparing two string
    /// literals by their evaluated output; when neither comparison applies the
    /// result is false (0) rather than a failure.
    fn resolve_binary(
        &self,
        ctx: &EvaluationContext<'_>,
        op: BinaryOp,
        lhs: &Expression,
        rhs: &Expression,
    ) -> EvalResult<u32> {
        if !op.is_equality() {
            let lhs = self.resolve_int(ctx, lhs)?;
            let rhs = self.resolve_int(ctx, rhs)?;
            return Ok(op.compare(lhs, rhs) as u32);
        }

        if let (Ok(lhs), Ok(rhs)) = (self.resolve_int(ctx, lhs), self.resolve_int(ctx, rhs)) {
            return Ok(op.compare(lhs, rhs) as u32);
        }

        if let (Expression::String(lhs), Expression::String(rhs)) = (lhs, rhs) {
            let lhs = self.evaluate(lhs, ctx.local_parameters, Some(ctx.language));
            let rhs = self.evaluate(rhs, ctx.local_parameters, Some(ctx.language));
            let equal = lhs == rhs;
            return Ok(match op {
                BinaryOp::Equal => equal as u32,
                _ => !equal as u32,
            });
        }

        Ok(0)
    }

    /// Appends the string value of an expression to the context's builder.
    pub(crate) fn resolve_string(
        &self,
        ctx: &mut EvaluationContext<'_>,
        expression: &Expression,
    ) -> EvalResult<()> {
        match expression {
            Expression::String(text) => {
                self.evaluate_nested(ctx.builder, text, ctx.local_parameters, ctx.language);
                Ok(())
            }
            Expression::Parameter(kind, index) => {
                let index = self.resolve_uint(ctx, index)?;
                if index == 0 {
                    return Err(EvalError::malformed("parameter index 0"));
                }
                match kind {
                    ParameterKind::LocalNumber => {
                        let value = ctx.local_number(index as usize - 1)?;
                        ctx.builder.append_text(&(value as i32).to_string());
                        Ok(())
                    }
                    ParameterKind::LocalString => {
                        let text = ctx.local_string(index as usize - 1)?;
                        self.evaluate_nested(ctx.builder, text, &[], ctx.language);
                        Ok(())
                    }
                    ParameterKind::GlobalNumber => match self.global_parameter(index - 1)? {
                        GlobalParameter::Integer(value) => {
                            ctx.builder.append_text(&value.to_string());
                            Ok(())
                        }
                        other => {
                            error!(
                                "Requested a number; {} global parameter at {}.",
                                other.kind_name(),
                                index - 1
                            );
                            Err(EvalError::malformed(format!(
                                "global parameter {} is a {}",
                                index,
                                other.kind_name()
                            )))
                        }
                    },
                    ParameterKind::GlobalString => self.append_global(ctx, index - 1),
                }
            }
            other => {
                let value = self.resolve_int(ctx, other)?;
                ctx.builder.append_text(&value.to_string());
                Ok(())
            }
        }
    }

    /// Evaluates an expression into a standalone text.
    pub(crate) fn resolve_to_text(
        &self,
        ctx: &EvaluationContext<'_>,
        expression: &Expression,
    ) -> EvalResult<EncodedText> {
        let mut builder = self.pool.rent();
        let mut sub = EvaluationContext::new(ctx.language, ctx.local_parameters, &mut builder);
        self.resolve_string(&mut sub, expression)?;
        Ok(builder.take_encoded_text())
    }

    fn append_global(&self, ctx: &mut EvaluationContext<'_>, index: u32) -> EvalResult<()> {
        match self.global_parameter(index)? {
            GlobalParameter::Integer(value) => {
                ctx.builder.append_text(&value.to_string());
                Ok(())
            }
            GlobalParameter::String(text) | GlobalParameter::ReferencedString(text) => {
                self.evaluate_nested(ctx.builder, &text, &[], ctx.language);
                Ok(())
            }
            GlobalParameter::Uninitialized => Err(EvalError::miss(format!(
                "global parameter {} is uninitialized",
                index + 1
            ))),
        }
    }

    /// Zero-based global parameter read, gated to the main thread.
    pub(crate) fn global_parameter(&self, index: u32) -> EvalResult<GlobalParameter> {
        if !self.affinity.is_main_thread() {
            error!("Global parameters may only be used from the main thread.");
            return Err(EvalError::PolicyViolation(format!(
                "global parameter {} read off the main thread",
                index + 1
            )));
        }
        self.globals
            .get(index)
            .ok_or_else(|| EvalError::miss(format!("global parameter {} not set", index + 1)))
    }
}
