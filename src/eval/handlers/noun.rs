//! Declined noun macros.
//!
//! `<xxnoun(sheet, article, row[, amount[, case]])>`. The sheet reference is
//! redirected first; declension itself belongs to the [`NounProcessor`].
//!
//! [`NounProcessor`]: crate::provider::NounProcessor

use tracing::trace;

use crate::error::{EvalError, EvalResult};
use crate::eval::context::EvaluationContext;
use crate::eval::evaluator::Evaluator;
use crate::eval::expression::operands;
use crate::language::ClientLanguage;
use crate::provider::{NounParams, SheetRedirectFlags};
use crate::text::Expression;

/// Column argument telling the redirect resolver that no column is involved.
const NO_COLUMN: u32 = u16::MAX as u32;

fn noun(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
    language: ClientLanguage,
) -> EvalResult<()> {
    let [sheet, article, row] = operands::<3>(e)?;
    let sheet = eval.resolve_to_text(ctx, sheet)?.extract_text();
    let article_type = eval.resolve_int(ctx, article)?;
    let row_id = eval.resolve_uint(ctx, row)?;
    let quantity = match e.get(3) {
        Some(amount) => eval.resolve_int(ctx, amount)?,
        None => 1,
    };
    let grammatical_case = match e.get(4) {
        Some(case) => eval.resolve_int(ctx, case)?,
        None => 1,
    };

    let redirect = eval.redirects.resolve(&sheet, row_id, NO_COLUMN);
    if redirect.sheet_name.is_empty() {
        return Err(EvalError::miss(format!("{} has no redirect target", sheet)));
    }

    let params = NounParams {
        language,
        sheet_name: redirect.sheet_name,
        row_id: redirect.row_id,
        quantity,
        article_type,
        grammatical_case: grammatical_case - 1,
        is_action_sheet: redirect.flags.contains(SheetRedirectFlags::ACTION),
    };
    trace!("noun request {:?}", params);
    let text = eval.nouns.process_noun(&params);
    ctx.builder.append(&text);
    Ok(())
}

pub(crate) fn ja_noun(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    noun(eval, ctx, e, ClientLanguage::Japanese)
}

pub(crate) fn en_noun(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    noun(eval, ctx, e, ClientLanguage::English)
}

pub(crate) fn de_noun(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    noun(eval, ctx, e, ClientLanguage::German)
}

pub(crate) fn fr_noun(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    noun(eval, ctx, e, ClientLanguage::French)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockall::predicate::function;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::eval::handlers::test_support::render;
    use crate::provider::{
        InMemorySheets, MockNounProcessor, MockSheetRedirectResolver, SheetRedirect,
    };
    use crate::text::EncodedText;

    fn redirects() -> MockSheetRedirectResolver {
        let mut redirects = MockSheetRedirectResolver::new();
        redirects
            .expect_resolve()
            .returning(|sheet, row_id, _| SheetRedirect {
                sheet_name: if sheet == "Nowhere" {
                    String::new()
                } else {
                    format!("{}Name", sheet)
                },
                row_id,
                column: 0,
                flags: if sheet == "Action" {
                    SheetRedirectFlags::ACTION
                } else {
                    SheetRedirectFlags::empty()
                },
            });
        redirects
    }

    fn evaluator(nouns: MockNounProcessor) -> Evaluator {
        Evaluator::builder(Arc::new(InMemorySheets::new()))
            .redirects(Arc::new(redirects()))
            .nouns(Arc::new(nouns))
            .build()
    }

    #[test]
    fn test_noun_request_defaults() {
        let mut nouns = MockNounProcessor::new();
        nouns
            .expect_process_noun()
            .with(function(|p: &NounParams| {
                *p == NounParams {
                    language: ClientLanguage::German,
                    sheet_name: "BNpcNameName".to_string(),
                    row_id: 12,
                    quantity: 1,
                    article_type: 2,
                    grammatical_case: 0,
                    is_action_sheet: false,
                }
            }))
            .times(1)
            .returning(|_| EncodedText::from_text("der Mogry"));
        let eval = evaluator(nouns);
        assert_eq!(render(&eval, "<denoun(BNpcName,2,12)>", &[]), "der Mogry");
    }

    #[test]
    fn test_noun_amount_and_case() {
        let mut nouns = MockNounProcessor::new();
        nouns
            .expect_process_noun()
            .with(function(|p: &NounParams| {
                p.language == ClientLanguage::French
                    && p.quantity == 3
                    && p.grammatical_case == 2
                    && p.is_action_sheet
            }))
            .times(1)
            .returning(|_| EncodedText::from_text("3 sorts"));
        let eval = evaluator(nouns);
        assert_eq!(
            render(&eval, "<frnoun(Action,0,lnum1,3,3)>", &[7u32.into()]),
            "3 sorts"
        );
    }

    #[test]
    fn test_noun_failures_pass_through() {
        let mut nouns = MockNounProcessor::new();
        nouns.expect_process_noun().never();
        let eval = evaluator(nouns);
        assert_eq!(
            render(&eval, "<ennoun(Nowhere,0,1)>", &[]),
            "<ennoun(Nowhere,0,1)>"
        );
        assert_eq!(
            render(&eval, "<ennoun(Item,0,1,lstr1)>", &["x".into()]),
            "<ennoun(Item,0,1,lstr1)>"
        );
        assert_eq!(render(&eval, "<janoun(Item,0)>", &[]), "<janoun(Item,0)>");
    }
}
