//! # Output Builder
//!
//! Accumulates the payloads produced by an evaluation. Adjacent text appends
//! coalesce into a single text payload, so `"a"` followed by `"b"` yields one
//! run `"ab"`.
//!
//! Styling is emitted as macros the renderer understands. The builder mirrors
//! the renderer's color stacks and the open link so callers can inspect what is
//! currently in effect.

use crate::text::{EncodedText, Expression, MacroCode, Payload, PlaceholderKind};

/// Interactive link kinds carried by `Link` macros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum LinkKind {
    Character,
    Item,
    MapPosition,
    Quest,
    Achievement,
    HowTo,
    PartyFinderNotification,
    Status,
    PartyFinder,
    AkatsukiNote,
    Description,
    WksPioneeringTrail,
    MkdLore,
}

impl LinkKind {
    pub fn code(self) -> u32 {
        match self {
            LinkKind::Character => 0,
            LinkKind::Item => 2,
            LinkKind::MapPosition => 3,
            LinkKind::Quest => 4,
            LinkKind::Achievement => 5,
            LinkKind::HowTo => 6,
            LinkKind::PartyFinderNotification => 7,
            LinkKind::Status => 8,
            LinkKind::PartyFinder => 9,
            LinkKind::AkatsukiNote => 10,
            LinkKind::Description => 11,
            LinkKind::WksPioneeringTrail => 12,
            LinkKind::MkdLore => 13,
        }
    }
}

/// Link macro argument closing the innermost link.
pub const LINK_TERMINATOR: u32 = 0xEC;

/// Which of the three color stacks a color macro addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    Foreground,
    Edge,
    Shadow,
}

impl ColorTarget {
    pub fn macro_code(self) -> MacroCode {
        match self {
            ColorTarget::Foreground => MacroCode::Color,
            ColorTarget::Edge => MacroCode::EdgeColor,
            ColorTarget::Shadow => MacroCode::ShadowColor,
        }
    }
}

#[derive(Debug, Default)]
pub struct OutputBuilder {
    payloads: Vec<Payload>,
    colors: Vec<u32>,
    edge_colors: Vec<u32>,
    shadow_colors: Vec<u32>,
    links: Vec<LinkKind>,
}

impl OutputBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets all state while keeping allocated capacity.
    pub fn clear(&mut self) {
        self.payloads.clear();
        self.colors.clear();
        self.edge_colors.clear();
        self.shadow_colors.clear();
        self.links.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    pub fn payloads(&self) -> &[Payload] {
        &self.payloads
    }

    pub fn append_text(&mut self, text: &str) -> &mut Self {
        if text.is_empty() {
            return self;
        }
        match self.payloads.last_mut() {
            Some(Payload::Text(last)) => last.push_str(text),
            _ => self.payloads.push(Payload::Text(text.to_string())),
        }
        self
    }

    pub fn append_char(&mut self, c: char) -> &mut Self {
        let mut buf = [0u8; 4];
        self.append_text(c.encode_utf8(&mut buf))
    }

    pub fn append_payload(&mut self, payload: &Payload) -> &mut Self {
        match payload {
            Payload::Text(text) => self.append_text(text),
            other => {
                self.payloads.push(other.clone());
                self
            }
        }
    }

    pub fn append(&mut self, text: &EncodedText) -> &mut Self {
        for payload in text {
            self.append_payload(payload);
        }
        self
    }

    pub fn append_macro(&mut self, code: MacroCode, expressions: Vec<Expression>) -> &mut Self {
        self.payloads.push(Payload::new_macro(code, expressions));
        self
    }

    fn stack_mut(&mut self, target: ColorTarget) -> &mut Vec<u32> {
        match target {
            ColorTarget::Foreground => &mut self.colors,
            ColorTarget::Edge => &mut self.edge_colors,
            ColorTarget::Shadow => &mut self.shadow_colors,
        }
    }

    pub fn color_stack(&self, target: ColorTarget) -> &[u32] {
        match target {
            ColorTarget::Foreground => &self.colors,
            ColorTarget::Edge => &self.edge_colors,
            ColorTarget::Shadow => &self.shadow_colors,
        }
    }

    pub fn push_color(&mut self, target: ColorTarget, bgra: u32) -> &mut Self {
        self.stack_mut(target).push(bgra);
        self.append_macro(target.macro_code(), vec![Expression::uint(bgra)])
    }

    /// Emits the pop marker even when the local stack is empty; the color may
    /// have been pushed by an enclosing text.
    pub fn pop_color(&mut self, target: ColorTarget) -> &mut Self {
        self.stack_mut(target).pop();
        self.append_macro(
            target.macro_code(),
            vec![Expression::placeholder(PlaceholderKind::StackColor)],
        )
    }

    pub fn set_bold(&mut self, enable: bool) -> &mut Self {
        self.append_macro(MacroCode::Bold, vec![Expression::uint(enable as u32)])
    }

    pub fn set_italic(&mut self, enable: bool) -> &mut Self {
        self.append_macro(MacroCode::Italic, vec![Expression::uint(enable as u32)])
    }

    pub fn append_icon(&mut self, icon_id: u32) -> &mut Self {
        self.append_macro(MacroCode::Icon, vec![Expression::uint(icon_id)])
    }

    /// Runs `f` between two icons. The closing icon is emitted whatever `f`
    /// returns.
    pub fn append_icon_wrapped<T>(
        &mut self,
        open_icon: u32,
        close_icon: u32,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        self.append_icon(open_icon);
        let result = f(self);
        self.append_icon(close_icon);
        result
    }

    pub fn push_link(
        &mut self,
        kind: LinkKind,
        arg1: u32,
        arg2: u32,
        arg3: u32,
        text: Option<&EncodedText>,
    ) -> &mut Self {
        let mut expressions = vec![
            Expression::uint(kind.code()),
            Expression::uint(arg1),
            Expression::uint(arg2),
            Expression::uint(arg3),
        ];
        if let Some(text) = text {
            expressions.push(Expression::String(text.clone()));
        }
        self.push_link_raw(kind, expressions)
    }

    /// Opens a link with caller-built operands; the first operand must be the
    /// link kind code.
    pub fn push_link_raw(&mut self, kind: LinkKind, expressions: Vec<Expression>) -> &mut Self {
        self.links.push(kind);
        self.append_macro(MacroCode::Link, expressions)
    }

    pub fn pop_link(&mut self) -> &mut Self {
        self.links.pop();
        self.append_macro(MacroCode::Link, vec![Expression::uint(LINK_TERMINATOR)])
    }

    pub fn open_links(&self) -> &[LinkKind] {
        &self.links
    }

    pub fn to_encoded_text(&self) -> EncodedText {
        EncodedText::new(self.payloads.clone())
    }

    pub fn take_encoded_text(&mut self) -> EncodedText {
        let text = EncodedText::new(std::mem::take(&mut self.payloads));
        self.clear();
        text
    }
}
