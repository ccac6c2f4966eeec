use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use seval::{
    language::ClientLanguage, provider::InMemorySheets, sheets::ColumnValue, text::macro_string,
    EncodedText, Evaluator, LocalParameter,
};

fn evaluator() -> Evaluator {
    let sheets = InMemorySheets::new()
        .with_row(
            ClientLanguage::English,
            "Addon",
            1,
            vec![ColumnValue::String(
                macro_string::parse("<kilo(lnum1,\\,)> gil<if([lnum1>1000],!,.)>").unwrap(),
            )],
        )
        .with_row(ClientLanguage::English, "Mount", 1, vec!["Company Chocobo".into()]);
    Evaluator::new(Arc::new(sheets))
}

fn bench_text_only(c: &mut Criterion) {
    let evaluator = evaluator();
    let text = EncodedText::from_text("Plain text without any macros.");
    c.bench_function("text only", |b| {
        b.iter(|| evaluator.evaluate(black_box(&text), &[], None))
    });
}

fn bench_macros(c: &mut Criterion) {
    let evaluator = evaluator();
    let text = macro_string::parse(
        "<caps(<sheet(Mount,1,0)>)> costs <kilo(lnum1,\\,)> (<ordinal(lnum2)> offer)",
    )
    .unwrap();
    let params: Vec<LocalParameter> = vec![1234567u32.into(), 3u32.into()];
    c.bench_function("nested macros", |b| {
        b.iter(|| evaluator.evaluate(black_box(&text), &params, None))
    });
}

fn bench_addon(c: &mut Criterion) {
    let evaluator = evaluator();
    let params: Vec<LocalParameter> = vec![5000u32.into()];
    c.bench_function("addon row", |b| {
        b.iter(|| evaluator.evaluate_from_addon(black_box(1), &params, None))
    });
}

criterion_group!(benches, bench_text_only, bench_macros, bench_addon);
criterion_main!(benches);
