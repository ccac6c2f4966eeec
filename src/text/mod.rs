//! # Encoded Text Model
//!
//! In-memory representation of the game's encoded text: an ordered sequence of
//! [`Payload`]s, each either a run of literal text or a typed macro invocation
//! whose operands are [`Expression`]s.
//!
//! The binary wire codec lives outside this crate. Everything here is the
//! decoded form the evaluator walks, plus the human-readable notation in
//! [`macro_string`] used by tests, fixtures and the CLI.
//!
//! [`EncodedText`] is immutable and cheap to clone; cloning shares the payload
//! storage, which is what lets the evaluator return text-only input unchanged
//! without copying it.

pub mod macro_string;

use std::fmt;
use std::sync::Arc;

macro_rules! macro_codes {
    ($($variant:ident = $code:literal => $name:literal,)*) => {
        /// Macro code selecting a macro's behavior.
        ///
        /// The catalog mirrors the game's numeric codes. Codes that are not part
        /// of the catalog survive decoding as [`MacroCode::Unknown`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum MacroCode {
            $($variant,)*
            Unknown(u8),
        }

        impl MacroCode {
            /// Every known macro code, in numeric order.
            pub const ALL: &'static [MacroCode] = &[$(MacroCode::$variant,)*];

            pub fn from_code(code: u8) -> Self {
                match code {
                    $($code => MacroCode::$variant,)*
                    other => MacroCode::Unknown(other),
                }
            }

            pub fn code(self) -> u8 {
                match self {
                    $(MacroCode::$variant => $code,)*
                    MacroCode::Unknown(code) => code,
                }
            }

            /// Lowercase name used by the macro-string notation.
            pub fn name(self) -> Option<&'static str> {
                match self {
                    $(MacroCode::$variant => Some($name),)*
                    MacroCode::Unknown(_) => None,
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(MacroCode::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

macro_codes! {
    SetResetTime = 0x06 => "setresettime",
    SetTime = 0x07 => "settime",
    If = 0x08 => "if",
    Switch = 0x09 => "switch",
    PcName = 0x0A => "pcname",
    IfPcGender = 0x0B => "ifpcgender",
    IfPcName = 0x0C => "ifpcname",
    Josa = 0x0D => "josa",
    Josaro = 0x0E => "josaro",
    IfSelf = 0x0F => "ifself",
    NewLine = 0x10 => "br",
    Wait = 0x11 => "wait",
    Icon = 0x12 => "icon",
    Color = 0x13 => "color",
    EdgeColor = 0x14 => "edgecolor",
    ShadowColor = 0x15 => "shadowcolor",
    SoftHyphen = 0x16 => "softhyphen",
    Key = 0x17 => "key",
    Scale = 0x18 => "scale",
    Bold = 0x19 => "bold",
    Italic = 0x1A => "italic",
    Edge = 0x1B => "edge",
    Shadow = 0x1C => "shadow",
    NonBreakingSpace = 0x1D => "nbsp",
    Icon2 = 0x1E => "icon2",
    Hyphen = 0x1F => "hyphen",
    Num = 0x20 => "num",
    Hex = 0x21 => "hex",
    Kilo = 0x22 => "kilo",
    Byte = 0x23 => "byte",
    Sec = 0x24 => "sec",
    Time = 0x25 => "time",
    Float = 0x26 => "float",
    Link = 0x27 => "link",
    Sheet = 0x28 => "sheet",
    String = 0x29 => "string",
    Caps = 0x2A => "caps",
    Head = 0x2B => "head",
    Split = 0x2C => "split",
    HeadAll = 0x2D => "headall",
    Fixed = 0x2E => "fixed",
    Lower = 0x2F => "lower",
    JaNoun = 0x30 => "janoun",
    EnNoun = 0x31 => "ennoun",
    DeNoun = 0x32 => "denoun",
    FrNoun = 0x33 => "frnoun",
    ChNoun = 0x34 => "chnoun",
    LowerHead = 0x40 => "lowerhead",
    ColorType = 0x48 => "colortype",
    EdgeColorType = 0x49 => "edgecolortype",
    Ruby = 0x4A => "ruby",
    Digit = 0x50 => "digit",
    Ordinal = 0x51 => "ordinal",
    Sound = 0x60 => "sound",
    LevelPos = 0x61 => "levelpos",
}

/// Placeholder expression tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderKind {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Weekday,
    Month,
    Year,
    /// Pop marker understood by the color macros.
    StackColor,
    Other(u8),
}

impl PlaceholderKind {
    pub const NAMED: &'static [PlaceholderKind] = &[
        PlaceholderKind::Millisecond,
        PlaceholderKind::Second,
        PlaceholderKind::Minute,
        PlaceholderKind::Hour,
        PlaceholderKind::Day,
        PlaceholderKind::Weekday,
        PlaceholderKind::Month,
        PlaceholderKind::Year,
        PlaceholderKind::StackColor,
    ];

    pub fn from_code(code: u8) -> Self {
        match code {
            0xD8 => PlaceholderKind::Millisecond,
            0xD9 => PlaceholderKind::Second,
            0xDA => PlaceholderKind::Minute,
            0xDB => PlaceholderKind::Hour,
            0xDC => PlaceholderKind::Day,
            0xDD => PlaceholderKind::Weekday,
            0xDE => PlaceholderKind::Month,
            0xDF => PlaceholderKind::Year,
            0xEC => PlaceholderKind::StackColor,
            other => PlaceholderKind::Other(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            PlaceholderKind::Millisecond => 0xD8,
            PlaceholderKind::Second => 0xD9,
            PlaceholderKind::Minute => 0xDA,
            PlaceholderKind::Hour => 0xDB,
            PlaceholderKind::Day => 0xDC,
            PlaceholderKind::Weekday => 0xDD,
            PlaceholderKind::Month => 0xDE,
            PlaceholderKind::Year => 0xDF,
            PlaceholderKind::StackColor => 0xEC,
            PlaceholderKind::Other(code) => code,
        }
    }

    pub fn keyword(self) -> Option<&'static str> {
        match self {
            PlaceholderKind::Millisecond => Some("t_msec"),
            PlaceholderKind::Second => Some("t_sec"),
            PlaceholderKind::Minute => Some("t_min"),
            PlaceholderKind::Hour => Some("t_hour"),
            PlaceholderKind::Day => Some("t_day"),
            PlaceholderKind::Weekday => Some("t_wday"),
            PlaceholderKind::Month => Some("t_mon"),
            PlaceholderKind::Year => Some("t_year"),
            PlaceholderKind::StackColor => Some("stackcolor"),
            PlaceholderKind::Other(_) => None,
        }
    }

    pub fn is_time_component(self) -> bool {
        !matches!(self, PlaceholderKind::StackColor | PlaceholderKind::Other(_))
    }
}

/// Parameter reference tags.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum ParameterKind {
    #[strum(serialize = "lnum")]
    LocalNumber,
    #[strum(serialize = "gnum")]
    GlobalNumber,
    #[strum(serialize = "lstr")]
    LocalString,
    #[strum(serialize = "gstr")]
    GlobalString,
}

impl ParameterKind {
    pub fn code(self) -> u8 {
        match self {
            ParameterKind::LocalNumber => 0xE8,
            ParameterKind::GlobalNumber => 0xE9,
            ParameterKind::LocalString => 0xEA,
            ParameterKind::GlobalString => 0xEB,
        }
    }

    pub fn is_string(self) -> bool {
        matches!(self, ParameterKind::LocalString | ParameterKind::GlobalString)
    }
}

/// Comparison operators of binary expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum BinaryOp {
    GreaterThanOrEqual,
    GreaterThan,
    LessThanOrEqual,
    LessThan,
    Equal,
    NotEqual,
}

impl BinaryOp {
    pub fn code(self) -> u8 {
        match self {
            BinaryOp::GreaterThanOrEqual => 0xE0,
            BinaryOp::GreaterThan => 0xE1,
            BinaryOp::LessThanOrEqual => 0xE2,
            BinaryOp::LessThan => 0xE3,
            BinaryOp::Equal => 0xE4,
            BinaryOp::NotEqual => 0xE5,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::GreaterThanOrEqual => ">=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::LessThanOrEqual => "<=",
            BinaryOp::LessThan => "<",
            BinaryOp::Equal => "=",
            BinaryOp::NotEqual => "!=",
        }
    }

    /// Applies an ordering operator to two signed operands.
    pub fn compare(self, lhs: i32, rhs: i32) -> bool {
        match self {
            BinaryOp::GreaterThanOrEqual => lhs >= rhs,
            BinaryOp::GreaterThan => lhs > rhs,
            BinaryOp::LessThanOrEqual => lhs <= rhs,
            BinaryOp::LessThan => lhs < rhs,
            BinaryOp::Equal => lhs == rhs,
            BinaryOp::NotEqual => lhs != rhs,
        }
    }

    pub fn is_equality(self) -> bool {
        matches!(self, BinaryOp::Equal | BinaryOp::NotEqual)
    }
}

/// A macro operand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    UInt(u32),
    String(EncodedText),
    Placeholder(PlaceholderKind),
    Parameter(ParameterKind, Box<Expression>),
    Binary(BinaryOp, Box<Expression>, Box<Expression>),
}

impl Expression {
    pub fn uint(value: u32) -> Self {
        Expression::UInt(value)
    }

    pub fn string(text: impl Into<EncodedText>) -> Self {
        Expression::String(text.into())
    }

    pub fn placeholder(kind: PlaceholderKind) -> Self {
        Expression::Placeholder(kind)
    }

    pub fn parameter(kind: ParameterKind, index: u32) -> Self {
        Expression::Parameter(kind, Box::new(Expression::UInt(index)))
    }

    pub fn local_number(index: u32) -> Self {
        Self::parameter(ParameterKind::LocalNumber, index)
    }

    pub fn local_string(index: u32) -> Self {
        Self::parameter(ParameterKind::LocalString, index)
    }

    pub fn global_number(index: u32) -> Self {
        Self::parameter(ParameterKind::GlobalNumber, index)
    }

    pub fn global_string(index: u32) -> Self {
        Self::parameter(ParameterKind::GlobalString, index)
    }

    pub fn binary(op: BinaryOp, lhs: Expression, rhs: Expression) -> Self {
        Expression::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn as_uint(&self) -> Option<u32> {
        match self {
            Expression::UInt(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&EncodedText> {
        match self {
            Expression::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_placeholder(&self) -> Option<PlaceholderKind> {
        match self {
            Expression::Placeholder(kind) => Some(*kind),
            _ => None,
        }
    }
}

/// A macro invocation: code plus ordered operands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MacroPayload {
    pub code: MacroCode,
    pub expressions: Vec<Expression>,
}

/// One unit of encoded text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Payload {
    Text(String),
    Macro(MacroPayload),
    /// Bytes the wire decoder could not make sense of. Carried through untouched.
    Invalid(Vec<u8>),
}

impl Payload {
    pub fn text(text: impl Into<String>) -> Self {
        Payload::Text(text.into())
    }

    pub fn new_macro(code: MacroCode, expressions: Vec<Expression>) -> Self {
        Payload::Macro(MacroPayload { code, expressions })
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_macro(&self) -> Option<&MacroPayload> {
        match self {
            Payload::Macro(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn is_macro(&self) -> bool {
        matches!(self, Payload::Macro(_))
    }
}

/// Immutable, cheaply clonable sequence of payloads.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EncodedText(Arc<[Payload]>);

impl Default for EncodedText {
    fn default() -> Self {
        Self::empty()
    }
}

impl EncodedText {
    pub fn empty() -> Self {
        Self(Arc::from(Vec::new()))
    }

    pub fn new(payloads: Vec<Payload>) -> Self {
        Self(Arc::from(payloads))
    }

    /// A single text run. Empty input produces an empty text.
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            Self::empty()
        } else {
            Self::new(vec![Payload::text(text)])
        }
    }

    pub fn payloads(&self) -> &[Payload] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Payload> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when no payload is a macro invocation.
    pub fn is_text_only(&self) -> bool {
        !self.0.iter().any(Payload::is_macro)
    }

    /// True when both values share the same payload storage.
    pub fn shares_storage_with(&self, other: &EncodedText) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Plain text view: text runs plus the macros that stand for a character.
    pub fn extract_text(&self) -> String {
        let mut out = String::new();
        for payload in self.0.iter() {
            match payload {
                Payload::Text(text) => out.push_str(text),
                Payload::Macro(m) => match m.code {
                    MacroCode::NewLine => out.push('\n'),
                    MacroCode::SoftHyphen => out.push(SOFT_HYPHEN),
                    MacroCode::NonBreakingSpace => out.push('\u{A0}'),
                    MacroCode::Hyphen => out.push('-'),
                    _ => {}
                },
                Payload::Invalid(_) => {}
            }
        }
        out
    }
}

pub const SOFT_HYPHEN: char = '\u{AD}';

pub fn strip_soft_hyphen(text: &str) -> String {
    text.chars().filter(|c| *c != SOFT_HYPHEN).collect()
}

impl<'a> IntoIterator for &'a EncodedText {
    type Item = &'a Payload;
    type IntoIter = std::slice::Iter<'a, Payload>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Payload> for EncodedText {
    fn from_iter<I: IntoIterator<Item = Payload>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<Vec<Payload>> for EncodedText {
    fn from(payloads: Vec<Payload>) -> Self {
        Self::new(payloads)
    }
}

impl From<&str> for EncodedText {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl From<String> for EncodedText {
    fn from(text: String) -> Self {
        Self::from_text(&text)
    }
}

impl fmt::Debug for EncodedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedText({:?})", self.to_string())
    }
}

/// A caller-supplied local parameter, addressed 1-based by `lnum`/`lstr`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocalParameter {
    Number(u32),
    String(EncodedText),
}

impl From<u32> for LocalParameter {
    fn from(value: u32) -> Self {
        LocalParameter::Number(value)
    }
}

impl From<i32> for LocalParameter {
    fn from(value: i32) -> Self {
        LocalParameter::Number(value as u32)
    }
}

impl From<EncodedText> for LocalParameter {
    fn from(value: EncodedText) -> Self {
        LocalParameter::String(value)
    }
}

impl From<&str> for LocalParameter {
    fn from(value: &str) -> Self {
        LocalParameter::String(EncodedText::from_text(value))
    }
}
