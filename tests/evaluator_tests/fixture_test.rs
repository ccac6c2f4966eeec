use std::io::Write;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use seval::{
    config::EvaluatorConfig, language::ClientLanguage, provider::InMemorySheets, Evaluator,
};
use tempfile::NamedTempFile;

const FIXTURE: &str = r#"{
    "shared": {
        "Map": { "2": [100, 0, 0, 30] },
        "Level": { "10": [100.0, 5.0, -100.0, 2] }
    },
    "languages": {
        "en": {
            "PlaceName": { "30": ["Limsa Lominsa"] },
            "Addon": {
                "1637": ["<string(lstr1)> (<float(lnum2,10,.)>, <float(lnum3,10,.)>)"],
                "6": ["<color(lnum1)>"]
            },
            "Mount": { "1": ["Company Chocobo"] }
        },
        "de": {
            "PlaceName": { "30": ["Limsa Lominsa"] },
            "Addon": {
                "1637": ["<string(lstr1)> (<float(lnum2,10,\\,)> / <float(lnum3,10,\\,)>)"]
            },
            "Mount": { "1": ["Gesellschafts-Chocobo"] }
        }
    }
}"#;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn evaluator_from_files(config: &str) -> Evaluator {
    let fixture = write_temp(FIXTURE);
    let config = write_temp(config);
    let sheets = InMemorySheets::from_file(fixture.path()).unwrap();
    let config = EvaluatorConfig::from_file(config.path()).unwrap();
    Evaluator::builder(Arc::new(sheets)).config(config).build()
}

#[test]
fn test_fixture_and_config_files() {
    let eval = evaluator_from_files(r#"{ "default_language": "de" }"#);
    assert_eq!(eval.default_language(), ClientLanguage::German);
    assert_eq!(eval.config().pool.max_retained, 32);

    let out = eval
        .evaluate_macro_string("<levelpos(10)>: <sheet(Mount,1,0)>", &[], None)
        .unwrap();
    assert_eq!(out.to_string(), "Limsa Lominsa (23,5 / 19,5): Gesellschafts-Chocobo");

    let out = eval
        .evaluate_macro_string("<levelpos(10)>", &[], Some(ClientLanguage::English))
        .unwrap();
    assert_eq!(out.to_string(), "Limsa Lominsa (23.5, 19.5)");
}

#[test]
fn test_bad_fixture_is_an_error() {
    let fixture = write_temp("{ \"languages\": { \"en\": { \"Addon\": { \"1\": [\"<if(\"] } } } }");
    assert!(InMemorySheets::from_file(fixture.path()).is_err());
    assert!(EvaluatorConfig::from_file("/nonexistent/seval.json").is_err());
}

#[test]
fn test_concurrent_evaluations_are_independent() {
    let eval = evaluator_from_files(r#"{ "pool": { "max_retained": 4 } }"#);
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8u32)
            .map(|i| {
                let eval = &eval;
                scope.spawn(move || {
                    (0..50)
                        .map(|_| {
                            eval.evaluate_macro_string(
                                "<caps(<sheet(Mount,1,0)>)> #<num(lnum1)>",
                                &[i.into()],
                                None,
                            )
                            .unwrap()
                            .to_string()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            for out in handle.join().unwrap() {
                assert_eq!(out, format!("COMPANY CHOCOBO #{}", i));
            }
        }
    });
    assert!(eval.pool().idle() <= 4);
}
