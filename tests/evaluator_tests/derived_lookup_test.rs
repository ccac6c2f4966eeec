use std::sync::Arc;

use mockall::predicate::{always, eq};
use pretty_assertions::assert_eq;
use seval::{
    kinds::{ActionKind, ObjectKind},
    language::ClientLanguage,
    provider::{InMemorySheets, MockSheetRowProvider},
    sheets::{ColumnValue, SheetRow},
    text::macro_string,
    Evaluator, ACT_STR_ADDON, OBJ_STR_ADDON,
};

use super::evaluator;

fn addon_row(row_id: u32, source: &str) -> SheetRow {
    SheetRow::new(
        row_id,
        vec![ColumnValue::String(macro_string::parse(source).unwrap())],
    )
}

#[test]
fn test_act_str_is_looked_up_once() {
    let mut sheets = MockSheetRowProvider::new();
    sheets
        .expect_get_row()
        .with(eq("Addon"), eq(ACT_STR_ADDON), always())
        .times(1)
        .returning(|_, row_id, _| Some(addon_row(row_id, "Hi\u{AD}-Potion #<num(lnum1)>")));
    let eval = Evaluator::new(Arc::new(sheets));

    let first = eval.evaluate_act_str(ActionKind::Item, 4551, Some(ClientLanguage::English));
    assert_eq!(&*first, "Hi-Potion #2004551");
    let second = eval.evaluate_act_str(ActionKind::Item, 4551, Some(ClientLanguage::English));
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(eval.cache().len(), 1);
}

#[test]
fn test_obj_str_is_cached_per_language() {
    let mut sheets = MockSheetRowProvider::new();
    sheets
        .expect_get_row()
        .with(eq("Addon"), eq(OBJ_STR_ADDON), always())
        .times(2)
        .returning(|_, row_id, language| {
            let name = match language {
                ClientLanguage::German => "Kiste",
                _ => "Chest",
            };
            Some(addon_row(row_id, name))
        });
    let eval = Evaluator::new(Arc::new(sheets));

    for _ in 0..3 {
        assert_eq!(
            &*eval.evaluate_obj_str(ObjectKind::Treasure, 7, Some(ClientLanguage::English)),
            "Chest"
        );
        assert_eq!(
            &*eval.evaluate_obj_str(ObjectKind::Treasure, 7, Some(ClientLanguage::German)),
            "Kiste"
        );
    }
    assert_eq!(eval.cache().len(), 2);
}

#[test]
fn test_sheet_text_entry_points() {
    let en = ClientLanguage::English;
    let sheets = InMemorySheets::new()
        .with_row(
            en,
            "Addon",
            12,
            vec![ColumnValue::String(
                macro_string::parse("<num(lnum1)> left").unwrap(),
            )],
        )
        .with_row(en, "Lobby", 3, vec!["Select a data center.".into()])
        .with_row(en, "LogMessage", 9, vec!["You obtain nothing.".into()]);
    let eval = evaluator(sheets);

    assert_eq!(
        eval.evaluate_from_addon(12, &[5u32.into()], None).to_string(),
        "5 left"
    );
    assert_eq!(
        eval.evaluate_from_lobby(3, &[], None).extract_text(),
        "Select a data center."
    );
    assert_eq!(
        eval.evaluate_from_log_message(9, &[], None).extract_text(),
        "You obtain nothing."
    );
    assert!(eval.evaluate_from_addon(404, &[], None).is_empty());
    assert!(eval
        .evaluate_from_log_message(9, &[], Some(ClientLanguage::French))
        .is_empty());
}
