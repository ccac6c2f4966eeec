use std::sync::Arc;

use pretty_assertions::assert_eq;
use seval::{
    provider::{GlobalParameter, InMemorySheets, StaticGlobalParameters},
    EncodedText, Evaluator,
};

use super::render;

fn evaluator() -> Evaluator {
    Evaluator::builder(Arc::new(InMemorySheets::new()))
        .globals(Arc::new(StaticGlobalParameters::new(vec![
            GlobalParameter::Integer(42),
            GlobalParameter::String(EncodedText::from_text("Gridania")),
            GlobalParameter::Uninitialized,
        ])))
        .build()
}

#[test]
fn test_globals_on_main_thread() {
    let eval = evaluator();
    assert_eq!(render(&eval, "<num(gnum1)>", &[]), "42");
    assert_eq!(render(&eval, "<string(gstr2)>", &[]), "Gridania");
    assert_eq!(render(&eval, "<string(gnum1)>", &[]), "42");
    assert_eq!(render(&eval, "<string(gstr3)>", &[]), "<string(gstr3)>");
    assert_eq!(render(&eval, "<string(gstr9)>", &[]), "<string(gstr9)>");
}

#[test]
fn test_gnum_requires_an_integer_global() {
    let eval = evaluator();
    assert_eq!(render(&eval, "<string(gnum2)>", &[]), "<string(gnum2)>");
    assert_eq!(render(&eval, "<num(gnum2)>", &[]), "0");
    assert_eq!(render(&eval, "[<string(gnum3)>]", &[]), "[<string(gnum3)>]");
}

#[test]
fn test_globals_off_main_thread_pass_through() {
    let eval = evaluator();
    std::thread::scope(|scope| {
        scope
            .spawn(|| {
                assert_eq!(render(&eval, "<hex(gnum1)>", &[]), "<hex(gnum1)>");
                assert_eq!(render(&eval, "a<string(gstr2)>b", &[]), "a<string(gstr2)>b");
                assert_eq!(render(&eval, "<if(1,yes,no)>", &[]), "yes");
            })
            .join()
            .unwrap();
    });
}

#[test]
fn test_main_thread_can_be_reassigned() {
    let eval = evaluator();
    std::thread::scope(|scope| {
        scope
            .spawn(|| {
                eval.affinity().set_main_thread(std::thread::current().id());
                assert_eq!(render(&eval, "<num(gnum1)>", &[]), "42");
            })
            .join()
            .unwrap();
    });
    assert_eq!(render(&eval, "<hex(gnum1)>", &[]), "<hex(gnum1)>");
}
