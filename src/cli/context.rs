//! Shell state, dispatch and the bridge between flows and the gateway.

use std::{io, sync::Arc};

use dialoguer::Confirm;
use strsim::levenshtein;
use supplier_config::{resolve_base_dir, Config, ConfigError, ConfigManager, LatencySettings};
use supplier_core::{
    default_saved_banner, perform, ApplyFlow, ApplyMessage, Banner, Clock, Completion, CoreError,
    FlowAction, FlowError, ListFlow, ListMessage, Navigator, PageSize, SearchFlow, SearchMessage,
    SupplierGateway, SystemClock, UpdateFlow, UpdateMessage, UpdateResult, ValidationPolicy,
};
use supplier_domain::DomainError;
use supplier_gateway_mock::{InMemorySupplierGateway, Latency};
use tracing::{debug, warn};

use super::commands::{self, CommandDefinition, CommandRegistry};
use super::output;
use crate::errors::CliError;

/// Warning shown while the submit control is disabled.
pub(crate) const REQUIRED_NOTICE: &str =
    "必須項目を入力してください。調達先名と13桁の法人番号は必須です。";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Unavailable(String),
    #[error(transparent)]
    Flow(#[from] FlowError),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

/// Everything a command handler may touch.
pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) registry: CommandRegistry,
    pub(crate) gateway: Arc<dyn SupplierGateway>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: Config,
    pub(crate) store: Option<ConfigManager>,
    pub(crate) navigator: Navigator,
    pub(crate) apply: ApplyFlow,
    pub(crate) update: UpdateFlow,
    pub(crate) search: SearchFlow,
    pub(crate) list: ListFlow,
    pub(crate) last_command: Option<String>,
    pub(crate) running: bool,
}

impl ShellContext {
    /// Loads the stored config and wires the in-memory gateway.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let manager = ConfigManager::with_base_dir(resolve_base_dir()?)?;
        let config = manager.load()?;
        debug!(path = %manager.config_path().display(), "configuration loaded");

        output::set_preferences(output::OutputPreferences {
            color_enabled: config.ui_color_enabled && mode == CliMode::Interactive,
        });

        let gateway = InMemorySupplierGateway::seeded().with_latency(latency(&config.latency));
        let mut context = Self::with_parts(mode, config, Arc::new(gateway), Arc::new(SystemClock));
        context.store = Some(manager);
        Ok(context)
    }

    pub fn with_parts(
        mode: CliMode,
        config: Config,
        gateway: Arc<dyn SupplierGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let policy = ValidationPolicy {
            digits_only: config.strict_corporate_id,
        };
        let saved_banner = chrono::Duration::from_std(config.saved_banner())
            .unwrap_or_else(|_| default_saved_banner());
        let page_size = PageSize::from_len(config.default_page_size).unwrap_or_default();

        Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            gateway,
            clock,
            navigator: Navigator::default(),
            apply: ApplyFlow::new(policy),
            update: UpdateFlow::new(policy, saved_banner),
            search: SearchFlow::new(),
            list: ListFlow::new(page_size),
            config,
            store: None,
            last_command: None,
            running: true,
        }
    }

    pub fn mode(&self) -> CliMode {
        self.mode
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn apply_flow(&self) -> &ApplyFlow {
        &self.apply
    }

    pub fn update_flow(&self) -> &UpdateFlow {
        &self.update
    }

    pub fn search_flow(&self) -> &SearchFlow {
        &self.search
    }

    pub fn list_flow(&self) -> &ListFlow {
        &self.list
    }

    pub(crate) fn validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            digits_only: self.config.strict_corporate_id,
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        format!("supplier-desk [{}] ⮞ ", self.navigator.breadcrumb())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        self.tick();
        let Some(handler) = self.registry.get(command).map(|definition| definition.handler) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(&err);
                return Ok(LoopControl::Continue);
            }
        };
        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&raw.to_lowercase(), raw, &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &input.to_lowercase()), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::new()
            .with_prompt("Exit Supplier Desk?")
            .default(false)
            .interact()
            .map_err(|err| CliError::Command(err.to_string()))
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::info("Use `help <command>` for usage details.");
            }
            CommandError::Flow(FlowError::Invalid(issues)) => {
                for issue in &issues {
                    output::warning(issue);
                }
                output::warning(REQUIRED_NOTICE);
            }
            CommandError::Flow(FlowError::Busy) => {
                output::warning("処理中です。完了までお待ちください。");
            }
            CommandError::Io(err) => return Err(err.into()),
            other => output::error(other),
        }
        Ok(())
    }

    /// Lets the transient "saved" banner expire against the current time.
    pub(crate) fn tick(&mut self) {
        let now = self.clock.now();
        if let Err(err) = self.update.update(UpdateMessage::Tick(now)) {
            warn!(error = %err, "tick rejected");
        }
    }

    /// Follows the action a transition asked for, if any.
    pub(crate) fn drive(&mut self, result: UpdateResult) -> CommandResult {
        match result.action {
            Some(action) => self.run_action(action),
            None => Ok(()),
        }
    }

    pub(crate) fn run_action(&mut self, action: FlowAction) -> CommandResult {
        match action {
            FlowAction::Navigate(screen) => self.open(screen),
            FlowAction::NavigateBack => {
                self.navigator.back();
                self.enter_current()
            }
            FlowAction::ReturnToMenu => {
                self.navigator.return_to_menu();
                self.enter_current()
            }
            call => {
                if let Some(label) = busy_label(&call) {
                    output::info(label);
                }
                match perform(self.gateway.as_ref(), &call) {
                    Some(completion) => {
                        let next = self.route(completion)?;
                        self.drive(next)
                    }
                    None => Ok(()),
                }
            }
        }
    }

    /// Hands a completion to the flow that owns that kind of call.
    fn route(&mut self, completion: Completion) -> Result<UpdateResult, CommandError> {
        let result = match completion {
            Completion::DraftSaved { .. } | Completion::Created { .. } => {
                self.apply.update(ApplyMessage::Completed(completion))
            }
            Completion::Fetched { .. } | Completion::Updated { .. } => {
                let at = self.clock.now();
                self.update
                    .update(UpdateMessage::Completed { completion, at })
            }
            Completion::Searched { .. } => self.search.update(SearchMessage::Completed(completion)),
            Completion::Listed { .. } => self.list.update(ListMessage::Completed(completion)),
        };
        Ok(result?)
    }

    pub(crate) fn show_banner(banner: Option<&Banner>) {
        match banner {
            Some(Banner::Success(message)) => output::success(message),
            Some(Banner::Info(message)) => output::info(message),
            Some(Banner::Error { message, retryable }) => {
                output::error(message);
                if *retryable {
                    output::info("時間をおいて再度実行してください。");
                }
            }
            None => {}
        }
    }
}

fn busy_label(action: &FlowAction) -> Option<&'static str> {
    match action {
        FlowAction::SaveDraft { .. } => Some("下書きを保存中..."),
        FlowAction::Create { .. } => Some("申請中..."),
        FlowAction::Fetch { .. } => None,
        FlowAction::Update { .. } => Some("更新中..."),
        FlowAction::Search { .. } => Some("検索中..."),
        FlowAction::List { .. } => Some("読み込み中..."),
        FlowAction::Navigate(_) | FlowAction::NavigateBack | FlowAction::ReturnToMenu => None,
    }
}

fn latency(settings: &LatencySettings) -> Latency {
    use std::time::Duration;
    Latency {
        save_draft: Duration::from_millis(settings.save_draft_ms),
        submit: Duration::from_millis(settings.submit_ms),
        update: Duration::from_millis(settings.update_ms),
        search: Duration::from_millis(settings.search_ms),
        list: Duration::from_millis(settings.list_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use supplier_core::{ApplyPhase, ManualClock, Screen, UpdatePhase};
    use supplier_domain::{Country, SupplierId};

    fn context() -> (ShellContext, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 9, 1, 9, 0, 0).unwrap(),
        ));
        let gateway = InMemorySupplierGateway::seeded()
            .with_latency(Latency::zero())
            .with_clock(clock.clone());
        let context = ShellContext::with_parts(
            CliMode::Script,
            Config::default(),
            Arc::new(gateway),
            clock.clone(),
        );
        (context, clock)
    }

    fn run(context: &mut ShellContext, lines: &[&str]) {
        for line in lines {
            context
                .process_line(line)
                .unwrap_or_else(|err| panic!("`{line}` failed: {err}"));
        }
    }

    #[test]
    fn latency_settings_map_to_gateway_latency() {
        let mapped = latency(&LatencySettings::default());
        assert_eq!(mapped, Latency::default());
        assert_eq!(latency(&LatencySettings::instant()), Latency::zero());
    }

    #[test]
    fn application_is_submitted_from_the_shell() {
        let (mut context, _) = context();
        run(
            &mut context,
            &[
                "open apply",
                r#"set name "新規サプライヤー株式会社""#,
                "set corporate-id 1234567890123",
                "set rating 5",
                "submit",
            ],
        );
        match context.apply_flow().phase() {
            ApplyPhase::Submitted { id, draft } => {
                assert_eq!(id, &SupplierId::parse("SUP-0006").unwrap());
                assert_eq!(draft.name, "新規サプライヤー株式会社");
                assert_eq!(draft.rating.value(), 5);
            }
            other => panic!("unexpected phase {other:?}"),
        }
        assert_eq!(*context.navigator().current(), Screen::Apply);
    }

    #[test]
    fn incomplete_application_is_rejected() {
        let (mut context, _) = context();
        run(&mut context, &["open apply", "set name 株式会社テスト"]);
        let err = context.process_line("submit").unwrap_err();
        assert!(matches!(err, CommandError::Flow(FlowError::Invalid(_))));
        assert_eq!(*context.apply_flow().phase(), ApplyPhase::Editing);
    }

    #[test]
    fn form_commands_need_a_form_screen() {
        let (mut context, _) = context();
        let err = context.process_line("set name X").unwrap_err();
        assert!(matches!(err, CommandError::Unavailable(_)));
    }

    #[test]
    fn search_conditions_carry_over_to_the_list() {
        let (mut context, _) = context();
        run(&mut context, &["open search", "search --country US", "to-list"]);
        assert_eq!(*context.navigator().current(), Screen::List);
        let list = context.list_flow();
        assert_eq!(list.query().country, Some(Country::Us));
        assert_eq!(list.rows().len(), 1);
        assert_eq!(list.rows()[0].name, "ABC Manufacturing Inc.");
    }

    #[test]
    fn list_shows_all_suppliers_and_tracks_selection() {
        let (mut context, _) = context();
        run(&mut context, &["open list", "select SUP-0001", "select SUP-0002"]);
        let stats = context.list_flow().stats();
        assert_eq!(stats.total, 5);
        assert_eq!(stats.selected, 2);
        run(&mut context, &["select none"]);
        assert!(context.list_flow().selection().is_empty());
    }

    #[test]
    fn saved_banner_expires_with_the_clock() {
        let (mut context, clock) = context();
        run(
            &mut context,
            &["open list", "edit SUP-0003", "set email buyer@abc-mfg.com", "update"],
        );
        let update = context.update_flow();
        assert!(matches!(update.phase(), UpdatePhase::Saved { .. }));
        assert_eq!(
            update.record().map(|record| record.email.as_str()),
            Some("buyer@abc-mfg.com")
        );

        clock.advance(Duration::seconds(3));
        run(&mut context, &["show"]);
        assert_eq!(*context.update_flow().phase(), UpdatePhase::Editing);
        assert!(context.update_flow().banner().is_none());
    }

    #[test]
    fn cancel_returns_to_the_previous_screen() {
        let (mut context, _) = context();
        run(&mut context, &["open list", "open apply", "cancel"]);
        assert_eq!(*context.navigator().current(), Screen::List);
    }

    #[test]
    fn exit_stops_the_loop() {
        let (mut context, _) = context();
        assert_eq!(context.process_line("exit").unwrap(), LoopControl::Exit);
        assert_eq!(context.process_line("unknown").unwrap(), LoopControl::Continue);
    }
}
