//! `fixed(e0, e1, ...)`.
//!
//! `e0` of 100 or 200 selects a client-side formatter by `e1`; any other value
//! is an auto-translation reference handled in [`super::completion`].

use tracing::trace;

use crate::builder::{ColorTarget, LinkKind};
use crate::error::{EvalError, EvalResult};
use crate::eval::context::EvaluationContext;
use crate::eval::evaluator::{Evaluator, OBJ_STR_ADDON};
use crate::eval::expression::operands;
use crate::sheets::{class_job, map, place_name, status, territory_type};
use crate::text::{EncodedText, Expression, LocalParameter};

use super::geometry::{map_x, map_y};
use super::identity::CROSS_WORLD_ICON;
use super::{addon_text, append_addon, completion, string_literal, world_name};

/// Arrow-prefixed link text wrapper.
const LINK_TEXT_ADDON: u32 = 371;
const ITEM_RARITY_ADDON: u32 = 6;
const MAP_LINK_ADDON: u32 = 1635;
const MAP_LINK_WITH_HEIGHT_ADDON: u32 = 1636;
const TIME_REMAINING_ADDON: u32 = 33;
const NO_TIME_REMAINING_ADDON: u32 = 48;
const BUFF_SYMBOL_ADDON: u32 = 376;
const DEBUFF_SYMBOL_ADDON: u32 = 377;
const PARTY_FINDER_ADDON: u32 = 2265;

/// Raw Z marking a map link without height.
const NO_HEIGHT: i32 = -30000;
const CROSS_WORLD_DUTY_FLAG: u32 = 0x10;
const INSTANCE_GLYPH_BASE: u32 = 0xE0B0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FixedKind {
    PlayerLink,
    ClassJobLevel,
    MapLink,
    ItemLink,
    ChatSoundEffect,
    ObjStr,
    FixedString,
    TimeRemaining,
    /// Records the novice network mentor state; produces nothing.
    MentorState,
    StatusLink,
    PartyFinderLink,
    QuestLink,
}

impl FixedKind {
    fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            1 => FixedKind::PlayerLink,
            2 => FixedKind::ClassJobLevel,
            3 => FixedKind::MapLink,
            4 => FixedKind::ItemLink,
            5 => FixedKind::ChatSoundEffect,
            6 => FixedKind::ObjStr,
            7 => FixedKind::FixedString,
            8 => FixedKind::TimeRemaining,
            9 => FixedKind::MentorState,
            10 => FixedKind::StatusLink,
            11 => FixedKind::PartyFinderLink,
            12 => FixedKind::QuestLink,
            _ => return None,
        })
    }
}

pub(crate) fn fixed(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [e0, e1] = operands::<2>(e)?;
    let e0 = eval.resolve_int(ctx, e0)?;
    let e1 = eval.resolve_int(ctx, e1)?;
    let rest = &e[2..];

    if e0 != 100 && e0 != 200 {
        return completion::auto_translate(eval, ctx, e0, e1);
    }

    let kind = FixedKind::from_code(e1)
        .ok_or_else(|| EvalError::unsupported(format!("fixed formatter {}", e1)))?;
    trace!("fixed {:?}", kind);
    match kind {
        FixedKind::PlayerLink => player_link(eval, ctx, rest),
        FixedKind::ClassJobLevel => class_job_level(eval, ctx, rest),
        FixedKind::MapLink => map_link(eval, ctx, rest),
        FixedKind::ItemLink => item_link(eval, ctx, rest),
        FixedKind::ChatSoundEffect => {
            let [id] = operands::<1>(rest)?;
            let id = eval.resolve_uint(ctx, id)?;
            ctx.builder
                .append_text(&format!("<se.{}>", id.wrapping_add(1)));
            Ok(())
        }
        FixedKind::ObjStr => {
            let [id] = operands::<1>(rest)?;
            let id = eval.resolve_uint(ctx, id)?;
            append_addon(eval, ctx, OBJ_STR_ADDON, &[LocalParameter::Number(id)]);
            Ok(())
        }
        FixedKind::FixedString => {
            let [text] = operands::<1>(rest)?;
            let text = string_literal(text)?.extract_text();
            ctx.builder.append_text(&text);
            Ok(())
        }
        FixedKind::TimeRemaining => time_remaining(eval, ctx, rest),
        FixedKind::MentorState => Ok(()),
        FixedKind::StatusLink => status_link(eval, ctx, rest),
        FixedKind::PartyFinderLink => party_finder_link(eval, ctx, rest),
        FixedKind::QuestLink => quest_link(eval, ctx, rest),
    }
}

/// Two capitalized words of letters, apostrophes and hyphens.
pub(crate) fn is_valid_player_name(name: &str) -> bool {
    if name.chars().count() > 21 {
        return false;
    }
    let words: Vec<&str> = name.split(' ').collect();
    words.len() == 2
        && words.iter().all(|word| {
            let mut chars = word.chars();
            let len = word.chars().count();
            (2..=15).contains(&len)
                && chars.next().is_some_and(char::is_uppercase)
                && chars.all(|c| c.is_alphabetic() || c == '\'' || c == '-')
        })
}

fn player_link(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [world, name] = operands::<2>(e)?;
    let world_id = eval.resolve_uint(ctx, world)?;
    let name = string_literal(name)?;

    if is_valid_player_name(&name.extract_text()) {
        let flags = if eval.player.is_in_cross_world_duty() {
            CROSS_WORLD_DUTY_FLAG
        } else {
            0
        };
        ctx.builder
            .push_link(LinkKind::Character, flags, world_id, 0, Some(name))
            .append(name)
            .pop_link();
    } else {
        ctx.builder.append(name);
    }

    if world_id == eval.player.home_world_id() {
        return Ok(());
    }
    let world = world_name(eval, world_id, ctx.language)?;
    ctx.builder.append_icon(CROSS_WORLD_ICON).append(&world);
    Ok(())
}

fn class_job_level(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [class_job_id, level] = operands::<2>(e)?;
    let class_job_id = eval.resolve_int(ctx, class_job_id)?;
    if class_job_id <= 0 {
        return Err(EvalError::malformed(format!(
            "class job id {} is not positive",
            class_job_id
        )));
    }
    let level = eval.resolve_int(ctx, level)?;
    let row = eval.row(class_job::NAME, class_job_id as u32, ctx.language)?;
    ctx.builder.append(&row.read_text(class_job::JOB_NAME));
    if level != 0 {
        ctx.builder.append_text(&format!("({})", level));
    }
    Ok(())
}

fn map_link(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [territory, packed, x, y, z, place] = operands::<6>(e)?;
    let territory_id = eval.resolve_uint(ctx, territory)?;
    let packed = eval.resolve_uint(ctx, packed)?;
    let raw_x = eval.resolve_int(ctx, x)?;
    let raw_y = eval.resolve_int(ctx, y)?;
    let raw_z = eval.resolve_int(ctx, z)?;
    let place_id = eval.resolve_uint(ctx, place)?;
    let instance = packed >> 16;
    let map_id = packed & 0xFFFF;

    let Some(territory) = eval
        .sheets
        .get_row(territory_type::NAME, territory_id, ctx.language)
    else {
        let addon_id = match map_id {
            0 => 875,
            1 => 874,
            2 => 13743,
            _ => {
                return Err(EvalError::miss(format!(
                    "territory {} not found",
                    territory_id
                )))
            }
        };
        if let Ok(text) = addon_text(eval, addon_id, ctx.language) {
            ctx.builder.append(&text);
        }
        return Ok(());
    };

    let place_id = if place_id == 0 {
        territory.read_u32(territory_type::PLACE_NAME).unwrap_or(0)
    } else {
        place_id
    };
    let place = eval
        .row(place_name::NAME, place_id, ctx.language)?
        .read_text(place_name::PLACE_NAME);
    let map_row = eval.row(map::NAME, map_id, ctx.language)?;

    let mut place_with_instance = eval.pool.rent();
    place_with_instance.append(&place);
    if (1..=9).contains(&instance) {
        if let Some(glyph) = char::from_u32(INSTANCE_GLYPH_BASE + instance) {
            place_with_instance.append_char(glyph);
        }
    }
    let place = place_with_instance.take_encoded_text();

    let pos_x = map_x(&map_row, raw_x as f32 / 1000.0);
    let pos_y = map_y(&map_row, raw_y as f32 / 1000.0);
    let link_text = if raw_z == NO_HEIGHT {
        eval.evaluate_from_addon(
            MAP_LINK_ADDON,
            &[place.into(), pos_x.into(), pos_y.into()],
            Some(ctx.language),
        )
    } else {
        let height = raw_z / if raw_z >= 0 { 10 } else { -10 };
        eval.evaluate_from_addon(
            MAP_LINK_WITH_HEIGHT_ADDON,
            &[
                place.into(),
                pos_x.into(),
                pos_y.into(),
                height.into(),
                raw_z.into(),
            ],
            Some(ctx.language),
        )
    };

    ctx.builder.push_link(
        LinkKind::MapPosition,
        (territory_id << 16) | map_id,
        raw_x as u32,
        raw_y as u32,
        None,
    );
    append_addon(eval, ctx, LINK_TEXT_ADDON, &[link_text.into()]);
    ctx.builder.pop_link();
    Ok(())
}

fn item_link(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [item, rarity, unk2, unk3, name] = operands::<5>(e)?;
    let item_id = eval.resolve_uint(ctx, item)?;
    let rarity = eval.resolve_uint(ctx, rarity)?;
    let unk2 = eval.resolve_int(ctx, unk2)?;
    let unk3 = eval.resolve_int(ctx, unk3)?;
    let name = string_literal(name)?.clone();

    append_addon(eval, ctx, ITEM_RARITY_ADDON, &[rarity.into()]);
    let extra = (unk2 & 0xFF).wrapping_add(unk3.wrapping_shl(16)) as u16;
    ctx.builder
        .push_link(LinkKind::Item, item_id, rarity, u32::from(extra), None);
    append_addon(eval, ctx, LINK_TEXT_ADDON, &[name.into()]);
    ctx.builder.pop_link().pop_color(ColorTarget::Foreground);
    Ok(())
}

fn time_remaining(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [seconds] = operands::<1>(e)?;
    let seconds = eval.resolve_uint(ctx, seconds)?;
    if seconds != 0 {
        append_addon(
            eval,
            ctx,
            TIME_REMAINING_ADDON,
            &[(seconds / 60).into(), (seconds % 60).into()],
        );
    } else if let Ok(text) = addon_text(eval, NO_TIME_REMAINING_ADDON, ctx.language) {
        ctx.builder.append(&text);
    }
    Ok(())
}

fn status_link(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [id, has_override] = operands::<2>(e)?;
    let status_id = eval.resolve_uint(ctx, id)?;
    let has_override = eval.resolve_bool(ctx, has_override)?;
    let row = eval.row(status::NAME, status_id, ctx.language)?;

    let (name, description) = if has_override {
        let [_, _, name, description] = operands::<4>(e)?;
        (
            string_literal(name)?.clone(),
            string_literal(description)?.clone(),
        )
    } else {
        (
            row.read_text(status::STATUS_NAME),
            row.read_text(status::DESCRIPTION),
        )
    };

    let mut link_text = eval.pool.rent();
    let symbol = match row.read_u32(status::STATUS_CATEGORY) {
        Some(1) => Some(BUFF_SYMBOL_ADDON),
        Some(2) => Some(DEBUFF_SYMBOL_ADDON),
        _ => None,
    };
    if let Some(symbol) = symbol {
        link_text.append(&eval.evaluate_from_addon(symbol, &[], Some(ctx.language)));
    }
    link_text.append(&name);
    let link_text = link_text.take_encoded_text();

    ctx.builder.push_link_raw(
        LinkKind::Status,
        vec![
            Expression::uint(LinkKind::Status.code()),
            Expression::uint(status_id),
            Expression::uint(0),
            Expression::uint(0),
            Expression::String(name),
            Expression::String(description),
        ],
    );
    append_addon(eval, ctx, LINK_TEXT_ADDON, &[link_text.into()]);
    ctx.builder.pop_link();
    Ok(())
}

fn party_finder_link(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [listing, unk1, world, cross_world, name] = operands::<5>(e)?;
    let listing_id = eval.resolve_uint(ctx, listing)?;
    let unk1 = eval.resolve_uint(ctx, unk1)?;
    let world_id = eval.resolve_uint(ctx, world)?;
    // 0 is cross-world, 1 is not.
    let cross_world = eval.resolve_int(ctx, cross_world)?;
    let name = string_literal(name)?.clone();

    ctx.builder.push_link(
        LinkKind::PartyFinder,
        listing_id,
        unk1,
        (cross_world as u32).wrapping_shl(16).wrapping_add(world_id),
        None,
    );
    let label = eval.evaluate_from_addon(
        PARTY_FINDER_ADDON,
        &[name.into(), cross_world.into()],
        Some(ctx.language),
    );
    append_addon(eval, ctx, LINK_TEXT_ADDON, &[label.into()]);
    ctx.builder.pop_link();
    Ok(())
}

fn quest_link(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [quest, _, _, _, name] = operands::<5>(e)?;
    let quest_id = eval.resolve_uint(ctx, quest)?;
    let name: EncodedText = string_literal(name)?.clone();

    ctx.builder.push_link(LinkKind::Quest, quest_id, 0, 0, None);
    append_addon(eval, ctx, LINK_TEXT_ADDON, &[name.into()]);
    ctx.builder.pop_link();
    Ok(())
}
