use std::sync::Arc;

use tracing::debug;

use crate::builder::OutputBuilder;
use crate::cache::{CacheKey, CompletionGroupIndex, NameKind, ResultCache};
use crate::clock::SystemMacroClock;
use crate::config::EvaluatorConfig;
use crate::error::{EvalError, EvalResult, InternalResult};
use crate::kinds::{ActionKind, ObjectKind};
use crate::language::ClientLanguage;
use crate::pool::BuilderPool;
use crate::provider::{
    GlobalParameterStore, IdRemapper, IdentityRedirect, KindOffsetRemapper, MacroClock, NameCache,
    NounProcessor, PlainNounProcessor, PlayerState, SheetRedirectResolver, SheetRowProvider,
    StaticGlobalParameters, StaticNameCache, StaticPlayerState, StaticUiConfig, UiConfig,
};
use crate::sheets::{self, SheetRow};
use crate::text::{macro_string, strip_soft_hyphen, EncodedText, LocalParameter};
use crate::thread_safety::ThreadAffinity;

pub const ACT_STR_ADDON: u32 = 2026;
pub const OBJ_STR_ADDON: u32 = 2025;

/// Evaluates encoded text against game data and live state.
///
/// Evaluation never fails: a macro that cannot be resolved is copied to the
/// output unchanged. Independent calls may run concurrently from any thread,
/// but global parameters are only readable on the thread registered with
/// [`ThreadAffinity`], and `pcname`/`ifself` read state that is only
/// meaningful there.
pub struct Evaluator {
    pub(crate) sheets: Arc<dyn SheetRowProvider>,
    pub(crate) redirects: Arc<dyn SheetRedirectResolver>,
    pub(crate) nouns: Arc<dyn NounProcessor>,
    pub(crate) names: Arc<dyn NameCache>,
    pub(crate) player: Arc<dyn PlayerState>,
    pub(crate) globals: Arc<dyn GlobalParameterStore>,
    pub(crate) clock: Arc<dyn MacroClock>,
    pub(crate) remapper: Arc<dyn IdRemapper>,
    pub(crate) ui_config: Arc<dyn UiConfig>,
    pub(crate) affinity: Arc<ThreadAffinity>,
    pub(crate) pool: BuilderPool,
    pub(crate) completion_groups: CompletionGroupIndex,
    cache: ResultCache,
    config: EvaluatorConfig,
}

impl Evaluator {
    pub fn builder(sheets: Arc<dyn SheetRowProvider>) -> EvaluatorBuilder {
        EvaluatorBuilder::new(sheets)
    }

    /// Evaluator with default collaborators over the given sheets.
    pub fn new(sheets: Arc<dyn SheetRowProvider>) -> Self {
        EvaluatorBuilder::new(sheets).build()
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn default_language(&self) -> ClientLanguage {
        self.config.default_language
    }

    pub fn affinity(&self) -> &Arc<ThreadAffinity> {
        &self.affinity
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn pool(&self) -> &BuilderPool {
        &self.pool
    }

    /// Resolves every macro of `text`. Text without macros is returned as is,
    /// sharing its storage.
    #[tracing::instrument(level = "trace", skip(self, text, local_parameters))]
    pub fn evaluate(
        &self,
        text: &EncodedText,
        local_parameters: &[LocalParameter],
        language: Option<ClientLanguage>,
    ) -> EncodedText {
        if text.is_text_only() {
            return text.clone();
        }
        let language = language.unwrap_or(self.config.default_language);
        let mut builder = self.pool.rent();
        self.evaluate_into(&mut builder, text, local_parameters, language);
        builder.take_encoded_text()
    }

    /// Parses macro-string notation and evaluates the result.
    pub fn evaluate_macro_string(
        &self,
        macro_string: &str,
        local_parameters: &[LocalParameter],
        language: Option<ClientLanguage>,
    ) -> InternalResult<EncodedText> {
        let text = macro_string::parse(macro_string)?;
        Ok(self.evaluate(&text, local_parameters, language))
    }

    /// Evaluates the text of an `Addon` row. A missing row yields empty text.
    pub fn evaluate_from_addon(
        &self,
        addon_id: u32,
        local_parameters: &[LocalParameter],
        language: Option<ClientLanguage>,
    ) -> EncodedText {
        self.evaluate_sheet_text(sheets::addon::NAME, addon_id, local_parameters, language)
    }

    /// Evaluates the text of a `Lobby` row. A missing row yields empty text.
    pub fn evaluate_from_lobby(
        &self,
        lobby_id: u32,
        local_parameters: &[LocalParameter],
        language: Option<ClientLanguage>,
    ) -> EncodedText {
        self.evaluate_sheet_text(sheets::lobby::NAME, lobby_id, local_parameters, language)
    }

    /// Evaluates the text of a `LogMessage` row. A missing row yields empty
    /// text.
    pub fn evaluate_from_log_message(
        &self,
        log_message_id: u32,
        local_parameters: &[LocalParameter],
        language: Option<ClientLanguage>,
    ) -> EncodedText {
        self.evaluate_sheet_text(
            sheets::log_message::NAME,
            log_message_id,
            local_parameters,
            language,
        )
    }

    /// Display name of an action-like row, cached for the process lifetime.
    pub fn evaluate_act_str(
        &self,
        kind: ActionKind,
        id: u32,
        language: Option<ClientLanguage>,
    ) -> Arc<str> {
        let language = language.unwrap_or(self.config.default_language);
        let key = CacheKey {
            kind: NameKind::Action(kind),
            id,
            language,
        };
        self.cache.get_or_insert_with(key, || {
            let parameter = LocalParameter::Number(self.remapper.act_str_id(kind, id));
            self.plain_addon_text(ACT_STR_ADDON, parameter, language)
        })
    }

    /// Display name of a world object, cached for the process lifetime.
    pub fn evaluate_obj_str(
        &self,
        kind: ObjectKind,
        id: u32,
        language: Option<ClientLanguage>,
    ) -> Arc<str> {
        let language = language.unwrap_or(self.config.default_language);
        let key = CacheKey {
            kind: NameKind::Object(kind),
            id,
            language,
        };
        self.cache.get_or_insert_with(key, || {
            let parameter = LocalParameter::Number(self.remapper.obj_str_id(kind, id));
            self.plain_addon_text(OBJ_STR_ADDON, parameter, language)
        })
    }

    fn plain_addon_text(
        &self,
        addon_id: u32,
        parameter: LocalParameter,
        language: ClientLanguage,
    ) -> String {
        let text = self.evaluate_from_addon(addon_id, &[parameter], Some(language));
        strip_soft_hyphen(&text.extract_text())
    }

    fn evaluate_sheet_text(
        &self,
        sheet: &str,
        row_id: u32,
        local_parameters: &[LocalParameter],
        language: Option<ClientLanguage>,
    ) -> EncodedText {
        let language = language.unwrap_or(self.config.default_language);
        match self.sheets.get_row(sheet, row_id, language) {
            Some(row) => self.evaluate(&row.read_text(0), local_parameters, Some(language)),
            None => {
                debug!("{} row {} not found ({})", sheet, row_id, language);
                EncodedText::empty()
            }
        }
    }

    /// Row lookup for typed reads. Unknown sheets are logged.
    pub(crate) fn row(
        &self,
        sheet: &str,
        row_id: u32,
        language: ClientLanguage,
    ) -> EvalResult<SheetRow> {
        if !self.sheets.has_sheet(sheet) {
            tracing::warn!("Sheet {} is not available", sheet);
            return Err(EvalError::miss(format!("sheet {} not found", sheet)));
        }
        self.sheets
            .get_row(sheet, row_id, language)
            .ok_or_else(|| EvalError::miss(format!("{} row {} not found", sheet, row_id)))
    }

    /// Evaluates into an existing builder; nested evaluations share the
    /// caller's output.
    pub(crate) fn evaluate_nested(
        &self,
        builder: &mut OutputBuilder,
        text: &EncodedText,
        local_parameters: &[LocalParameter],
        language: ClientLanguage,
    ) {
        if text.is_text_only() {
            builder.append(text);
        } else {
            self.evaluate_into(builder, text, local_parameters, language);
        }
    }
}

/// Assembles an [`Evaluator`]. Collaborators that are not set get a neutral
/// default: identity redirects, plain noun declension, no known characters,
/// no global parameters, the process-wide system clock, `kind * 1_000_000 + id`
/// remapping and an empty UI configuration.
pub struct EvaluatorBuilder {
    sheets: Arc<dyn SheetRowProvider>,
    redirects: Option<Arc<dyn SheetRedirectResolver>>,
    nouns: Option<Arc<dyn NounProcessor>>,
    names: Option<Arc<dyn NameCache>>,
    player: Option<Arc<dyn PlayerState>>,
    globals: Option<Arc<dyn GlobalParameterStore>>,
    clock: Option<Arc<dyn MacroClock>>,
    remapper: Option<Arc<dyn IdRemapper>>,
    ui_config: Option<Arc<dyn UiConfig>>,
    affinity: Option<Arc<ThreadAffinity>>,
    config: EvaluatorConfig,
}

impl EvaluatorBuilder {
    pub fn new(sheets: Arc<dyn SheetRowProvider>) -> Self {
        Self {
            sheets,
            redirects: None,
            nouns: None,
            names: None,
            player: None,
            globals: None,
            clock: None,
            remapper: None,
            ui_config: None,
            affinity: None,
            config: EvaluatorConfig::default(),
        }
    }

    pub fn redirects(mut self, redirects: Arc<dyn SheetRedirectResolver>) -> Self {
        self.redirects = Some(redirects);
        self
    }

    pub fn nouns(mut self, nouns: Arc<dyn NounProcessor>) -> Self {
        self.nouns = Some(nouns);
        self
    }

    pub fn names(mut self, names: Arc<dyn NameCache>) -> Self {
        self.names = Some(names);
        self
    }

    pub fn player(mut self, player: Arc<dyn PlayerState>) -> Self {
        self.player = Some(player);
        self
    }

    pub fn globals(mut self, globals: Arc<dyn GlobalParameterStore>) -> Self {
        self.globals = Some(globals);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn MacroClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn remapper(mut self, remapper: Arc<dyn IdRemapper>) -> Self {
        self.remapper = Some(remapper);
        self
    }

    pub fn ui_config(mut self, ui_config: Arc<dyn UiConfig>) -> Self {
        self.ui_config = Some(ui_config);
        self
    }

    pub fn affinity(mut self, affinity: Arc<ThreadAffinity>) -> Self {
        self.affinity = Some(affinity);
        self
    }

    pub fn config(mut self, config: EvaluatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Evaluator {
        let sheets = self.sheets;
        let nouns = self
            .nouns
            .unwrap_or_else(|| Arc::new(PlainNounProcessor::new(sheets.clone())));
        debug!(
            "Building evaluator (default language {}, pool {})",
            self.config.default_language, self.config.pool.max_retained
        );
        Evaluator {
            redirects: self.redirects.unwrap_or_else(|| Arc::new(IdentityRedirect)),
            nouns,
            names: self
                .names
                .unwrap_or_else(|| Arc::new(StaticNameCache::new())),
            player: self
                .player
                .unwrap_or_else(|| Arc::new(StaticPlayerState::default())),
            globals: self
                .globals
                .unwrap_or_else(|| Arc::new(StaticGlobalParameters::default())),
            clock: self.clock.unwrap_or_else(|| SystemMacroClock::global()),
            remapper: self.remapper.unwrap_or_else(|| Arc::new(KindOffsetRemapper)),
            ui_config: self
                .ui_config
                .unwrap_or_else(|| Arc::new(StaticUiConfig::new())),
            affinity: self
                .affinity
                .unwrap_or_else(|| Arc::new(ThreadAffinity::current())),
            pool: BuilderPool::new(self.config.pool.max_retained),
            completion_groups: CompletionGroupIndex::new(),
            cache: ResultCache::new(),
            sheets,
            config: self.config,
        }
    }
}
