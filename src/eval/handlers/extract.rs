//! `string`, `split` and `sheet`.

use tracing::trace;

use crate::builder::LinkKind;
use crate::error::{EvalError, EvalResult};
use crate::eval::context::EvaluationContext;
use crate::eval::evaluator::Evaluator;
use crate::eval::expression::operands;
use crate::language::ClientLanguage;
use crate::provider::{SheetRedirect, SheetRedirectFlags};
use crate::sheets::{self, ColumnValue};
use crate::text::{EncodedText, Expression, LocalParameter};

use super::{addon_text, string_literal};

const ITEM_RARITY_ADDON: u32 = 6;
const HQ_SYMBOL_ADDON: u32 = 9;
const COLLECTIBLE_SYMBOL_ADDON: u32 = 150;
const BUFF_SYMBOL_ADDON: u32 = 376;
const DEBUFF_SYMBOL_ADDON: u32 = 377;

const HIGH_QUALITY_ID_OFFSET: u32 = 1_000_000;
const COLLECTIBLE_ID_OFFSET: u32 = 500_000;
const EVENT_ITEM_RARITY: u32 = 8;
/// Item filter groups that never get an item link.
const UNLINKED_FILTER_GROUPS: [u32; 2] = [38, 50];

pub(crate) fn string(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [text] = operands::<1>(e)?;
    eval.resolve_string(ctx, text)
}

/// `split(text, separator, index)`: the 1-based `index`th segment of `text`
/// split on the first character of the literal `separator`.
pub(crate) fn split(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [text, separator, index] = operands::<3>(e)?;
    let separator = string_literal(separator)?.extract_text();
    let index = index
        .as_uint()
        .filter(|i| *i > 0)
        .ok_or_else(|| EvalError::malformed(format!("split index {} is not a positive literal", index)))?;

    let text = eval.resolve_to_text(ctx, text)?.extract_text();
    let separator = separator
        .chars()
        .next()
        .ok_or_else(|| EvalError::malformed("empty split separator"))?;
    let segment = text
        .split(separator)
        .nth(index as usize - 1)
        .ok_or_else(|| EvalError::miss(format!("split has no segment {}", index)))?;
    ctx.builder.append_text(segment);
    Ok(())
}

/// `sheet(name, row, column[, column_param])`.
pub(crate) fn sheet(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [name, row, column] = operands::<3>(e)?;
    let name = string_literal(name)?;
    let row_id = eval.resolve_uint(ctx, row)?;
    let column = eval.resolve_uint(ctx, column)?;
    let column_param = e
        .get(3)
        .and_then(|p| eval.resolve_uint(ctx, p).ok())
        .unwrap_or(0);

    let name = eval
        .evaluate(name, ctx.local_parameters, Some(ctx.language))
        .extract_text();
    let redirect = eval.redirects.resolve(&name, row_id, column);
    if redirect.sheet_name.is_empty() {
        return Err(EvalError::miss(format!("{} has no redirect target", name)));
    }
    trace!("sheet {}#{} -> {:?}", name, row_id, redirect);

    let text = format_sheet_value(
        eval,
        ctx.language,
        &redirect.sheet_name,
        redirect.row_id,
        redirect.column,
        column_param,
    )?;
    let text = decorate_item(eval, ctx.language, text, &redirect);

    let link_param = if redirect.sheet_name == "DescriptionString" {
        column_param
    } else {
        row_id
    };
    append_sheet_link(eval, ctx, &redirect, text, link_param);
    Ok(())
}

/// A cell rendered as text. Text cells are evaluated with `column_param` as
/// their only local number; empty results count as missing.
pub(crate) fn format_sheet_value(
    eval: &Evaluator,
    language: ClientLanguage,
    sheet: &str,
    row_id: u32,
    column: u32,
    column_param: u32,
) -> EvalResult<EncodedText> {
    let row = eval.row(sheet, row_id, language)?;
    let cell = row
        .column(column as usize)
        .ok_or_else(|| EvalError::miss(format!("{}#{} has no column {}", sheet, row_id, column)))?;
    let text = match cell {
        ColumnValue::String(text) => eval.evaluate(
            text,
            &[LocalParameter::Number(column_param)],
            Some(language),
        ),
        scalar => scalar
            .format_scalar()
            .map(EncodedText::from)
            .unwrap_or_default(),
    };
    if text.is_empty() {
        return Err(EvalError::miss(format!(
            "{}#{} column {} is empty",
            sheet, row_id, column
        )));
    }
    Ok(text)
}

/// Rarity color, item link and quality symbol around item names.
fn decorate_item(
    eval: &Evaluator,
    language: ClientLanguage,
    text: EncodedText,
    redirect: &SheetRedirect,
) -> EncodedText {
    let flags = redirect.flags;
    if !flags.contains(SheetRedirectFlags::ITEM) {
        return text;
    }

    let mut rarity = 1;
    let mut skip_link = false;
    if flags.contains(SheetRedirectFlags::EVENT_ITEM) {
        rarity = EVENT_ITEM_RARITY;
        skip_link = true;
    }

    if let Some(item) = eval
        .sheets
        .get_row(sheets::item::NAME, redirect.row_id, language)
    {
        rarity = item.read_u32(sheets::item::RARITY).unwrap_or(0).max(1);
        if item
            .read_u32(sheets::item::FILTER_GROUP)
            .is_some_and(|group| UNLINKED_FILTER_GROUPS.contains(&group))
        {
            skip_link = true;
        }
    }

    let mut item_id = redirect.row_id;
    if flags.contains(SheetRedirectFlags::COLLECTIBLE) {
        item_id = item_id.wrapping_add(COLLECTIBLE_ID_OFFSET);
    } else if flags.contains(SheetRedirectFlags::HIGH_QUALITY) {
        item_id = item_id.wrapping_add(HIGH_QUALITY_ID_OFFSET);
    }

    let mut builder = eval.pool.rent();
    builder.append(&eval.evaluate_from_addon(
        ITEM_RARITY_ADDON,
        &[LocalParameter::Number(rarity)],
        Some(language),
    ));
    if !skip_link {
        builder.push_link(LinkKind::Item, item_id, rarity, 0, None);
    }
    builder.append(&text);

    let symbol = if flags.contains(SheetRedirectFlags::HIGH_QUALITY) {
        addon_text(eval, HQ_SYMBOL_ADDON, language).ok()
    } else if flags.contains(SheetRedirectFlags::COLLECTIBLE) {
        addon_text(eval, COLLECTIBLE_SYMBOL_ADDON, language).ok()
    } else {
        None
    };
    if let Some(symbol) = symbol {
        builder.append(&symbol);
    }

    if !skip_link {
        builder.pop_link();
    }
    builder.take_encoded_text()
}

fn append_sheet_link(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    redirect: &SheetRedirect,
    text: EncodedText,
    link_param: u32,
) {
    let row_id = redirect.row_id;
    let link = match redirect.sheet_name.as_str() {
        "Achievement" => Some((LinkKind::Achievement, row_id, 0)),
        "HowTo" => Some((LinkKind::HowTo, row_id, 0)),
        "Status" => {
            if let Some(status) = eval
                .sheets
                .get_row(sheets::status::NAME, row_id, ctx.language)
            {
                ctx.builder
                    .push_link(LinkKind::Status, row_id, 0, 0, Some(&EncodedText::empty()));
                let symbol = match status.read_u32(sheets::status::STATUS_CATEGORY) {
                    Some(1) => Some(BUFF_SYMBOL_ADDON),
                    Some(2) => Some(DEBUFF_SYMBOL_ADDON),
                    _ => None,
                };
                if let Some(symbol) = symbol {
                    let symbol = eval.evaluate_from_addon(symbol, &[], Some(ctx.language));
                    ctx.builder.append(&symbol);
                }
                ctx.builder.append(&text);
                ctx.builder.pop_link();
                return;
            }
            None
        }
        "AkatsukiNoteString" => Some((LinkKind::AkatsukiNote, link_param, 0)),
        "DescriptionString" if link_param > 0 => {
            Some((LinkKind::Description, row_id, link_param))
        }
        "WKSPioneeringTrailString" => Some((LinkKind::WksPioneeringTrail, row_id, link_param)),
        "MKDLore" => Some((LinkKind::MkdLore, row_id, 0)),
        _ => None,
    };

    match link {
        Some((kind, arg1, arg2)) => {
            ctx.builder.push_link(kind, arg1, arg2, 0, Some(&text));
            ctx.builder.append(&text);
            ctx.builder.pop_link();
        }
        None => {
            ctx.builder.append(&text);
        }
    }
}
