use pretty_assertions::assert_eq;
use proptest::prelude::*;
use seval::{
    provider::InMemorySheets, EncodedText, Expression, LocalParameter, MacroCode, Payload,
};

use super::{evaluator, render};

proptest! {
    #[test]
    fn text_only_input_is_returned_unchanged(text in "\\PC*") {
        let eval = evaluator(InMemorySheets::new());
        let input = EncodedText::from_text(&text);
        let output = eval.evaluate(&input, &[], None);
        prop_assert_eq!(&output, &input);
        prop_assert!(output.shares_storage_with(&input));
    }

    #[test]
    fn digit_pads_to_width(value in -99_999i32..99_999, width in 0i32..8) {
        let eval = evaluator(InMemorySheets::new());
        let out = render(&eval, "<digit(lnum1,lnum2)>", &[value.into(), width.into()]);
        let digits = out.trim_start_matches('-');
        prop_assert!(digits.len() >= width as usize);
        prop_assert_eq!(digits.parse::<i32>().unwrap(), value.abs());
    }
}

#[test]
fn test_conditionals() {
    let eval = evaluator(InMemorySheets::new());
    assert_eq!(render(&eval, "<if(1,A,B)>", &[]), "A");
    assert_eq!(render(&eval, "<if(0,A,B)>", &[]), "B");
    assert_eq!(render(&eval, "<switch(2,a,b,c)>", &[]), "b");
    assert_eq!(render(&eval, "<switch(5,a,b)>", &[]), "<switch(5,a,b)>");
}

#[test]
fn test_number_formatting() {
    let eval = evaluator(InMemorySheets::new());
    assert_eq!(render(&eval, "<kilo(1234567,\\,)>", &[]), "1,234,567");
    assert_eq!(
        render(&eval, "<kilo(lnum1,\\,)>", &[LocalParameter::from(i32::MIN)]),
        "-2,147,483,648"
    );
    assert_eq!(render(&eval, "<hex(255)>", &[]), "0x000000FF");
    assert_eq!(render(&eval, "<ordinal(1)>", &[]), "1st");
    assert_eq!(render(&eval, "<ordinal(11)>", &[]), "11th");
    assert_eq!(render(&eval, "<ordinal(21)>", &[]), "21st");
    assert_eq!(render(&eval, "<ordinal(13)>", &[]), "13th");
    assert_eq!(render(&eval, "<digit(7,3)>", &[]), "007");
    assert_eq!(
        render(&eval, "<digit(lnum1,3)>", &[LocalParameter::from(-7i32)]),
        "-007"
    );
}

#[test]
fn test_missing_sheet_passes_through() {
    let eval = evaluator(InMemorySheets::new());
    assert_eq!(
        render(&eval, "<sheet(MissingSheet,1,0)>", &[]),
        "<sheet(MissingSheet,1,0)>"
    );
}

fn icon() -> Payload {
    Payload::new_macro(MacroCode::Icon, vec![Expression::uint(1)])
}

fn case_input(code: MacroCode) -> EncodedText {
    let operand: EncodedText = vec![Payload::text("hello "), icon(), Payload::text("world")].into();
    vec![Payload::new_macro(code, vec![Expression::string(operand)])].into()
}

#[test]
fn test_caps_transforms_only_the_leading_run() {
    let eval = evaluator(InMemorySheets::new());
    let out = eval.evaluate(&case_input(MacroCode::Caps), &[], None);
    assert_eq!(
        out.payloads(),
        &[Payload::text("HELLO "), icon(), Payload::text("world")]
    );
}

#[test]
fn test_head_all_transforms_every_run() {
    let eval = evaluator(InMemorySheets::new());
    let out = eval.evaluate(&case_input(MacroCode::HeadAll), &[], None);
    assert_eq!(
        out.payloads(),
        &[Payload::text("Hello "), icon(), Payload::text("World")]
    );
}
