//! Auto-translation phrases.
//!
//! `fixed(e0, e1)` with `e0` outside the formatter range names row `e1` of
//! completion group `e0 + 1`. The group's lookup table says where the phrase
//! lives:
//!
//! * `@`: the `Completion` sheet itself.
//! * `#`: the client's category cache, which is not supported.
//! * `Sheet`: column 0 of `Sheet[e1]`.
//! * `Sheet[entries]`: comma separated entries, each a row id, a row range
//!   `a-b`, `col-N` (first non-empty of the listed columns wins), `noun` or
//!   `tail`.
//!
//! Output is always wrapped in the auto-translation bracket icons.

use std::collections::HashMap;

use tracing::trace;

use crate::error::{EvalError, EvalResult};
use crate::eval::context::EvaluationContext;
use crate::eval::evaluator::Evaluator;
use crate::language::ClientLanguage;
use crate::provider::{NounParams, GERMAN_ZERO_ARTICLE};
use crate::sheets::{completion, SheetRow};

const OPEN_ICON: u32 = 54;
const CLOSE_ICON: u32 = 55;
const MAX_COLUMNS: usize = 8;

pub(crate) fn auto_translate(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e0: i32,
    e1: i32,
) -> EvalResult<()> {
    let group = e0.wrapping_add(1) as u32;
    let row_id = e1 as u32;
    let language = ctx.language;
    let local_parameters = ctx.local_parameters;
    ctx.builder
        .append_icon_wrapped(OPEN_ICON, CLOSE_ICON, |builder| {
            let mut ctx = EvaluationContext::new(language, local_parameters, builder);
            lookup(eval, &mut ctx, group, row_id)
        })
}

/// First row of each group with a non-empty lookup table.
fn index_groups(eval: &Evaluator, language: ClientLanguage) -> HashMap<u32, u32> {
    let mut groups = HashMap::new();
    for id in eval.sheets.row_ids(completion::NAME, language) {
        let Some(row) = eval.sheets.get_row(completion::NAME, id, language) else {
            continue;
        };
        if row.read_text(completion::LOOKUP_TABLE).is_empty() {
            continue;
        }
        if let Some(group) = row.read_u32(completion::GROUP) {
            groups.entry(group).or_insert(id);
        }
    }
    groups
}

fn group_row(eval: &Evaluator, group: u32, language: ClientLanguage) -> Option<SheetRow> {
    let groups = eval
        .completion_groups
        .groups(language, || index_groups(eval, language));
    let row_id = *groups.get(&group)?;
    eval.sheets.get_row(completion::NAME, row_id, language)
}

fn lookup(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    group: u32,
    row_id: u32,
) -> EvalResult<()> {
    let group_row = group_row(eval, group, ctx.language)
        .ok_or_else(|| EvalError::miss(format!("no completion group {}", group)))?;
    let table = group_row.read_text(completion::LOOKUP_TABLE);
    let table = if table.is_text_only() {
        table
    } else {
        eval.evaluate(&table, ctx.local_parameters, Some(ctx.language))
    }
    .extract_text();
    trace!("completion group {} looks up {}", group, table);

    match table.as_str() {
        "@" => {
            if let Some(row) = eval
                .sheets
                .get_row(completion::NAME, row_id, ctx.language)
            {
                ctx.builder.append(&row.read_text(completion::TEXT));
            }
            return Ok(());
        }
        "#" => return Err(EvalError::unsupported("completion category cache")),
        _ => {}
    }

    let Some((sheet, entries)) = table.split_once('[') else {
        let row = eval.row(&table, row_id, ctx.language)?;
        ctx.builder.append(&row.read_text(0));
        return Ok(());
    };
    let entries = entries.strip_suffix(']').unwrap_or(entries);
    if entries.is_empty() {
        return Ok(());
    }
    let ranges = LookupRanges::parse(entries, row_id)?;
    if ranges.restricts_rows && !ranges.contains_row {
        return Err(EvalError::miss(format!(
            "{} row {} is outside [{}]",
            sheet, row_id, entries
        )));
    }

    if ranges.noun && ctx.language == ClientLanguage::German && sheet == "Companion" {
        let text = eval.nouns.process_noun(&NounParams {
            language: ClientLanguage::German,
            sheet_name: sheet.to_string(),
            row_id,
            quantity: 1,
            article_type: GERMAN_ZERO_ARTICLE,
            grammatical_case: 0,
            is_action_sheet: false,
        });
        ctx.builder.append(&text);
        return Ok(());
    }

    let Some(row) = eval.sheets.get_row(sheet, row_id, ctx.language) else {
        return Ok(());
    };
    if ranges.columns.is_empty() {
        ctx.builder.append(&row.read_text(0));
    } else if let Some(text) = ranges
        .columns
        .iter()
        .map(|column| row.read_text(*column))
        .find(|text| !text.is_empty())
    {
        ctx.builder.append(&text);
    }
    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct LookupRanges {
    noun: bool,
    columns: Vec<usize>,
    restricts_rows: bool,
    contains_row: bool,
}

impl LookupRanges {
    fn parse(entries: &str, row_id: u32) -> EvalResult<Self> {
        let mut ranges = LookupRanges::default();
        for entry in entries.split(',').map(str::trim) {
            if entry.is_empty() {
                continue;
            }
            if entry.starts_with("noun") {
                ranges.noun = true;
            } else if let Some(column) = entry.strip_prefix("col") {
                if ranges.columns.len() < MAX_COLUMNS {
                    let column = column.trim_start_matches('-');
                    ranges.columns.push(parse_number(column)? as usize);
                }
            } else if entry.starts_with("tail") {
                return Err(EvalError::unsupported("completion tail ranges"));
            } else {
                ranges.restricts_rows = true;
                let contains = match entry.split_once('-') {
                    Some((first, last)) => {
                        (parse_number(first)?..=parse_number(last)?).contains(&row_id)
                    }
                    None => parse_number(entry)? == row_id,
                };
                ranges.contains_row |= contains;
            }
        }
        Ok(ranges)
    }
}

fn parse_number(text: &str) -> EvalResult<u32> {
    text.trim()
        .parse()
        .map_err(|_| EvalError::malformed(format!("bad completion range entry {:?}", text)))
}
