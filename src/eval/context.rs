use crate::builder::OutputBuilder;
use crate::error::{EvalError, EvalResult};
use crate::language::ClientLanguage;
use crate::text::{EncodedText, LocalParameter};

/// State of one (sub-)evaluation: output language, the caller's local
/// parameters and the builder receiving output.
///
/// A context is created per top-level call and per nested evaluation and is
/// never shared between threads.
pub struct EvaluationContext<'a> {
    pub language: ClientLanguage,
    pub local_parameters: &'a [LocalParameter],
    pub builder: &'a mut OutputBuilder,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(
        language: ClientLanguage,
        local_parameters: &'a [LocalParameter],
        builder: &'a mut OutputBuilder,
    ) -> Self {
        Self {
            language,
            local_parameters,
            builder,
        }
    }

    /// Local number at a zero-based index.
    pub fn local_number(&self, index: usize) -> EvalResult<u32> {
        match self.local_parameters.get(index) {
            Some(LocalParameter::Number(value)) => Ok(*value),
            Some(LocalParameter::String(_)) => Err(EvalError::malformed(format!(
                "local parameter {} is a string",
                index + 1
            ))),
            None => Err(EvalError::malformed(format!(
                "local parameter {} out of range ({} given)",
                index + 1,
                self.local_parameters.len()
            ))),
        }
    }

    /// Local string at a zero-based index.
    pub fn local_string(&self, index: usize) -> EvalResult<&'a EncodedText> {
        match self.local_parameters.get(index) {
            Some(LocalParameter::String(text)) => Ok(text),
            Some(LocalParameter::Number(_)) => Err(EvalError::malformed(format!(
                "local parameter {} is a number",
                index + 1
            ))),
            None => Err(EvalError::malformed(format!(
                "local parameter {} out of range ({} given)",
                index + 1,
                self.local_parameters.len()
            ))),
        }
    }
}
