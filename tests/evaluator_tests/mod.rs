mod derived_lookup_test;
mod fixture_test;
mod global_parameter_test;
mod properties_test;

use std::sync::Arc;

use seval::{provider::InMemorySheets, Evaluator, LocalParameter};

pub fn evaluator(sheets: InMemorySheets) -> Evaluator {
    Evaluator::new(Arc::new(sheets))
}

pub fn render(evaluator: &Evaluator, source: &str, params: &[LocalParameter]) -> String {
    evaluator
        .evaluate_macro_string(source, params, None)
        .unwrap()
        .to_string()
}
