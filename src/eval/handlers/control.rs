//! Clock macros and branching.

use chrono::Utc;

use crate::clock::{reset_time, unix_to_local, utc_to_local};
use crate::error::{EvalError, EvalResult};
use crate::eval::context::EvaluationContext;
use crate::eval::evaluator::Evaluator;
use crate::eval::expression::operands;
use crate::text::Expression;

/// `setresettime(hour[, weekday])`: sets the macro clock to the next reset.
pub(crate) fn set_reset_time(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [hour] = operands::<1>(e)?;
    let hour = eval.resolve_int(ctx, hour)?;
    let weekday = e.get(1).and_then(|w| eval.resolve_int(ctx, w).ok());
    let reset = reset_time(Utc::now(), hour, weekday)
        .ok_or_else(|| EvalError::malformed(format!("reset hour {} out of range", hour)))?;
    eval.clock.set(utc_to_local(reset));
    Ok(())
}

/// `settime(unix_seconds)`
pub(crate) fn set_time(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [time] = operands::<1>(e)?;
    let seconds = eval.resolve_uint(ctx, time)?;
    let local = unix_to_local(seconds)
        .ok_or_else(|| EvalError::malformed(format!("timestamp {} out of range", seconds)))?;
    eval.clock.set(local);
    Ok(())
}

/// `if(cond, then, else)`. An unresolvable condition takes the else branch.
pub(crate) fn if_else(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [cond, when_true, when_false] = operands::<3>(e)?;
    let branch = if eval.resolve_bool(ctx, cond).unwrap_or(false) {
        when_true
    } else {
        when_false
    };
    eval.resolve_string(ctx, branch)
}

/// `switch(selector, case1, case2, ...)`. Cases are 1-based; a selector of 0
/// or an unresolvable one picks the first case. Running out of cases fails.
pub(crate) fn switch(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [selector] = operands::<1>(e)?;
    let mut remaining = eval.resolve_int(ctx, selector).unwrap_or(0);
    for case in &e[1..] {
        if remaining > 1 {
            remaining -= 1;
        } else {
            return eval.resolve_string(ctx, case);
        }
    }
    Err(EvalError::miss(format!(
        "switch has no case for selector (cases: {})",
        e.len() - 1
    )))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Timelike;

    use crate::clock::SystemMacroClock;
    use crate::eval::Evaluator;
    use crate::provider::{InMemorySheets, MacroClock};
    use crate::text::LocalParameter;

    fn evaluator(clock: Arc<SystemMacroClock>) -> Evaluator {
        Evaluator::builder(Arc::new(InMemorySheets::new()))
            .clock(clock)
            .build()
    }

    fn eval(source: &str, params: &[LocalParameter]) -> String {
        let evaluator = evaluator(Arc::new(SystemMacroClock::new()));
        evaluator
            .evaluate_macro_string(source, params, None)
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_if_branches() {
        assert_eq!(eval("<if(1,A,B)>", &[]), "A");
        assert_eq!(eval("<if(0,A,B)>", &[]), "B");
        assert_eq!(eval("<if([lnum1>3],big,small)>", &[5u32.into()]), "big");
    }

    #[test]
    fn test_if_with_unresolvable_condition_takes_else() {
        assert_eq!(eval("<if(lstr1,A,B)>", &["x".into()]), "B");
    }

    #[test]
    fn test_switch() {
        assert_eq!(eval("<switch(2,a,b,c)>", &[]), "b");
        assert_eq!(eval("<switch(1,a,b,c)>", &[]), "a");
        assert_eq!(eval("<switch(0,a,b,c)>", &[]), "a");
        assert_eq!(eval("<switch(5,a,b)>", &[]), "<switch(5,a,b)>");
    }

    #[test]
    fn test_set_time_moves_the_clock() {
        let clock = Arc::new(SystemMacroClock::new());
        let evaluator = evaluator(clock.clone());
        let out = evaluator
            .evaluate_macro_string("<settime(86400)><num(t_year)>", &[], None)
            .unwrap();
        assert_eq!(out.to_string(), "1970");
        assert_eq!(
            clock.now().date(),
            crate::clock::unix_to_local(86400).unwrap().date()
        );
    }

    #[test]
    fn test_set_reset_time() {
        let clock = Arc::new(SystemMacroClock::new());
        let evaluator = evaluator(clock.clone());
        evaluator
            .evaluate_macro_string("<setresettime(15)>", &[], None)
            .unwrap();
        let utc = clock
            .now()
            .and_local_timezone(chrono::Local)
            .single()
            .map(|t| t.with_timezone(&chrono::Utc));
        if let Some(utc) = utc {
            assert_eq!((utc.hour(), utc.minute()), (15, 0));
        }

        let bad = evaluator
            .evaluate_macro_string("<setresettime(24)>", &[], None)
            .unwrap();
        assert_eq!(bad.to_string(), "<setresettime(24)>");
    }
}
