use std::collections::HashMap;

use lazy_static::lazy_static;
use tracing::{debug, trace};

use crate::builder::OutputBuilder;
use crate::error::EvalResult;
use crate::language::ClientLanguage;
use crate::text::{EncodedText, Expression, LocalParameter, MacroCode, MacroPayload, Payload};

use super::context::EvaluationContext;
use super::evaluator::Evaluator;
use super::handlers::{case, control, extract, fixed, geometry, identity, noun, number, style};

pub(crate) type Handler =
    fn(&Evaluator, &mut EvaluationContext<'_>, &[Expression]) -> EvalResult<()>;

lazy_static! {
    static ref HANDLERS: HashMap<MacroCode, Handler> = {
        let mut m: HashMap<MacroCode, Handler> = HashMap::new();
        m.insert(MacroCode::SetResetTime, control::set_reset_time);
        m.insert(MacroCode::SetTime, control::set_time);
        m.insert(MacroCode::If, control::if_else);
        m.insert(MacroCode::Switch, control::switch);
        m.insert(MacroCode::PcName, identity::pc_name);
        m.insert(MacroCode::IfPcGender, identity::if_pc_gender);
        m.insert(MacroCode::IfPcName, identity::if_pc_name);
        m.insert(MacroCode::IfSelf, identity::if_self);
        m.insert(MacroCode::Color, style::color);
        m.insert(MacroCode::EdgeColor, style::edge_color);
        m.insert(MacroCode::ShadowColor, style::shadow_color);
        m.insert(MacroCode::Bold, style::bold);
        m.insert(MacroCode::Italic, style::italic);
        m.insert(MacroCode::ColorType, style::color_type);
        m.insert(MacroCode::EdgeColorType, style::edge_color_type);
        m.insert(MacroCode::Num, number::num);
        m.insert(MacroCode::Hex, number::hex);
        m.insert(MacroCode::Kilo, number::kilo);
        m.insert(MacroCode::Sec, number::sec);
        m.insert(MacroCode::Float, number::float);
        m.insert(MacroCode::Digit, number::digit);
        m.insert(MacroCode::Ordinal, number::ordinal);
        m.insert(MacroCode::Caps, case::caps);
        m.insert(MacroCode::Head, case::head);
        m.insert(MacroCode::HeadAll, case::head_all);
        m.insert(MacroCode::Lower, case::lower);
        m.insert(MacroCode::LowerHead, case::lower_head);
        m.insert(MacroCode::String, extract::string);
        m.insert(MacroCode::Split, extract::split);
        m.insert(MacroCode::Sheet, extract::sheet);
        m.insert(MacroCode::JaNoun, noun::ja_noun);
        m.insert(MacroCode::EnNoun, noun::en_noun);
        m.insert(MacroCode::DeNoun, noun::de_noun);
        m.insert(MacroCode::FrNoun, noun::fr_noun);
        m.insert(MacroCode::LevelPos, geometry::level_pos);
        m.insert(MacroCode::Fixed, fixed::fixed);
        m
    };
}

/// Whether a macro code has a handler. Every other code passes through.
pub fn is_handled(code: MacroCode) -> bool {
    HANDLERS.contains_key(&code)
}

impl Evaluator {
    pub(crate) fn evaluate_into(
        &self,
        builder: &mut OutputBuilder,
        text: &EncodedText,
        local_parameters: &[LocalParameter],
        language: ClientLanguage,
    ) {
        let mut ctx = EvaluationContext::new(language, local_parameters, builder);
        for payload in text {
            match payload {
                Payload::Macro(m) => self.dispatch(&mut ctx, payload, m),
                other => {
                    ctx.builder.append_payload(other);
                }
            }
        }
    }

    fn dispatch(&self, ctx: &mut EvaluationContext<'_>, payload: &Payload, m: &MacroPayload) {
        let Some(handler) = HANDLERS.get(&m.code) else {
            trace!("No handler for {:?}", m.code);
            ctx.builder.append_payload(payload);
            return;
        };
        if let Err(err) = handler(self, ctx, &m.expressions) {
            debug!("Passing {:?} through unresolved: {}", m.code, err);
            ctx.builder.append_payload(payload);
        }
    }
}
