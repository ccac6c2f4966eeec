//! Map coordinates.

use crate::error::{EvalError, EvalResult};
use crate::eval::context::EvaluationContext;
use crate::eval::evaluator::Evaluator;
use crate::eval::expression::operands;
use crate::sheets::{level, map, place_name, SheetRow};
use crate::text::{Expression, LocalParameter};

use super::append_addon;

/// `place (x, y)` template used by `levelpos`.
const LEVEL_POS_ADDON: u32 = 1637;

/// Converts a raw world coordinate into tenths of a map coordinate.
pub(crate) fn map_coordinate(size_factor: f32, offset: f32, value: f32) -> u32 {
    let scale = size_factor / 100.0;
    let scaled = (((value + offset) * scale) + 1024.0) * -0.2 / scale;
    (10.0 - scaled.floor()).round() as u32
}

pub(crate) fn map_x(map_row: &SheetRow, x: f32) -> u32 {
    map_axis(map_row, map::OFFSET_X, x)
}

pub(crate) fn map_y(map_row: &SheetRow, y: f32) -> u32 {
    map_axis(map_row, map::OFFSET_Y, y)
}

fn map_axis(map_row: &SheetRow, offset_column: usize, value: f32) -> u32 {
    let size_factor = map_row.read_f32(map::SIZE_FACTOR).unwrap_or(100.0);
    let offset = map_row.read_f32(offset_column).unwrap_or(0.0);
    map_coordinate(size_factor, offset, value)
}

/// `levelpos(level)`: place name and map coordinates of a `Level` row. The
/// map's vertical axis is the level's Z.
pub(crate) fn level_pos(
    eval: &Evaluator,
    ctx: &mut EvaluationContext<'_>,
    e: &[Expression],
) -> EvalResult<()> {
    let [level_id] = operands::<1>(e)?;
    let level_id = eval.resolve_uint(ctx, level_id)?;
    let level_row = eval.row(level::NAME, level_id, ctx.language)?;
    let map_id = level_row
        .read_u32(level::MAP)
        .ok_or_else(|| EvalError::miss(format!("level {} has no map", level_id)))?;
    let map_row = eval.row(map::NAME, map_id, ctx.language)?;
    let place_id = map_row.read_u32(map::PLACE_NAME).unwrap_or(0);
    let place = eval
        .row(place_name::NAME, place_id, ctx.language)?
        .read_text(place_name::PLACE_NAME);

    let x = map_x(&map_row, level_row.read_f32(level::X).unwrap_or(0.0));
    let y = map_y(&map_row, level_row.read_f32(level::Z).unwrap_or(0.0));
    append_addon(
        eval,
        ctx,
        LEVEL_POS_ADDON,
        &[
            LocalParameter::String(place),
            LocalParameter::Number(x),
            LocalParameter::Number(y),
        ],
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::eval::handlers::test_support::{evaluator, render};
    use crate::language::ClientLanguage;
    use crate::provider::InMemorySheets;
    use crate::sheets::{addon, ColumnValue};
    use crate::text::macro_string;

    const EN: ClientLanguage = ClientLanguage::English;

    fn sheets() -> InMemorySheets {
        let template =
            macro_string::parse("<string(lstr1)> (<float(lnum2,10,.)>, <float(lnum3,10,.)>)")
                .unwrap();
        InMemorySheets::new()
            .with_row(
                EN,
                level::NAME,
                10,
                vec![
                    ColumnValue::Float(100.0),
                    ColumnValue::Float(5.0),
                    ColumnValue::Float(-100.0),
                    ColumnValue::Int(2),
                ],
            )
            .with_row(
                EN,
                level::NAME,
                11,
                vec![
                    ColumnValue::Float(0.0),
                    ColumnValue::Float(0.0),
                    ColumnValue::Float(0.0),
                    ColumnValue::Int(3),
                ],
            )
            .with_row(
                EN,
                map::NAME,
                2,
                vec![
                    ColumnValue::Int(100),
                    ColumnValue::Int(0),
                    ColumnValue::Int(0),
                    ColumnValue::Int(30),
                ],
            )
            .with_row(
                EN,
                map::NAME,
                3,
                vec![
                    ColumnValue::Int(100),
                    ColumnValue::Int(0),
                    ColumnValue::Int(0),
                    ColumnValue::Int(31),
                ],
            )
            .with_row(EN, place_name::NAME, 30, vec!["Limsa Lominsa".into()])
            .with_row(EN, addon::NAME, LEVEL_POS_ADDON, vec![ColumnValue::String(template)])
    }

    #[test]
    fn test_map_coordinate() {
        assert_eq!(map_coordinate(100.0, 0.0, 0.0), 215);
        assert_eq!(map_coordinate(200.0, 0.0, 0.0), 215);
        assert_eq!(map_coordinate(100.0, 0.0, 1024.0), 420);
        assert_eq!(map_coordinate(100.0, -100.0, 100.0), 215);
    }

    #[test]
    fn test_level_pos() {
        let eval = evaluator(sheets());
        assert_eq!(
            render(&eval, "<levelpos(10)>", &[]),
            "Limsa Lominsa (23.5, 19.5)"
        );
    }

    #[test]
    fn test_level_pos_misses_pass_through() {
        let eval = evaluator(sheets());
        assert_eq!(render(&eval, "<levelpos(99)>", &[]), "<levelpos(99)>");
        assert_eq!(render(&eval, "<levelpos(11)>", &[]), "<levelpos(11)>");
    }
}
