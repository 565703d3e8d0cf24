//! Screen entry and rendering for the shell.

use supplier_core::{
    ApplyFlow, ApplyPhase, FormTab, ListMessage, MenuEntry, Screen, SearchPhase, SupplierForm,
    UpdateMessage, UpdatePhase,
};
use supplier_domain::{fixtures::update_seed, SupplierId};

use super::context::{CommandResult, ShellContext, REQUIRED_NOTICE};
use super::{output, render};

impl ShellContext {
    /// Moves to `screen` and runs whatever loading it needs.
    pub(crate) fn open(&mut self, screen: Screen) -> CommandResult {
        self.navigator.navigate_to(screen);
        self.enter_current()
    }

    pub(crate) fn enter_current(&mut self) -> CommandResult {
        match self.navigator.current().clone() {
            Screen::List => {
                let query = self.search.carried_query();
                let result = self.list.update(ListMessage::Load(Some(query)))?;
                self.drive(result)?;
            }
            Screen::Apply => {
                if matches!(self.apply.phase(), ApplyPhase::Submitted { .. }) {
                    self.apply = ApplyFlow::new(self.validation_policy());
                }
            }
            Screen::Update { id } => {
                let target = id.unwrap_or_else(default_update_id);
                let loaded = self.update.record().map(|record| &record.id) == Some(&target);
                if !loaded || *self.update.phase() == UpdatePhase::Idle {
                    let result = self.update.update(UpdateMessage::Load(target))?;
                    self.drive(result)?;
                }
            }
            Screen::Menu | Screen::Search => {}
        }
        self.render_current();
        Ok(())
    }

    pub(crate) fn render_current(&self) {
        output::section(self.navigator.current().title());
        output::info(self.navigator.breadcrumb());
        match self.navigator.current() {
            Screen::Menu => self.render_menu(),
            Screen::Search => self.render_search(),
            Screen::List => self.render_list(),
            Screen::Apply => self.render_apply(),
            Screen::Update { .. } => self.render_update(),
        }
    }

    fn render_menu(&self) {
        output::plain(render::menu(&MenuEntry::all()));
        output::plain(render::notices());
        output::info("`open <search|list|apply|update>` で画面を開きます。");
    }

    fn render_search(&self) {
        let form = self.search.form();
        let country = form
            .country()
            .map(|country| format!("{} ({})", country.label(), country.code()))
            .unwrap_or_else(|| "すべて".into());
        output::plain(format!(
            "  キーワード  {}\n  国          {}",
            if form.keyword().is_empty() { "-" } else { form.keyword() },
            country
        ));
        Self::show_banner(self.search.banner());
        match self.search.phase() {
            SearchPhase::Completed { count } => {
                output::success(format!("検索結果: {}件", count));
                if *count > 0 {
                    output::plain(render::supplier_table(
                        self.search.results(),
                        &Default::default(),
                    ));
                }
                output::info("`to-list` で一覧画面へ移動します。");
            }
            SearchPhase::Idle => output::info("`search [keyword] [--country CC]` で検索します。"),
            SearchPhase::Searching { .. } => output::info("検索中..."),
        }
    }

    fn render_list(&self) {
        output::info(format!("条件: {}", render::chips(self.list.query())));
        Self::show_banner(self.list.banner());
        output::plain(render::stats(&self.list.stats()));
        let Some(page) = self.list.page() else {
            return;
        };
        if page.rows.is_empty() {
            output::warning("該当する調達先はありません。");
        } else {
            output::plain(render::supplier_table(&page.rows, self.list.selection()));
        }
        output::info(render::page_footer(page));
        let selected = self.list.selection().len();
        if selected > 0 {
            output::info(format!("{}件選択中", selected));
        }
    }

    fn render_apply(&self) {
        output::plain(render::stepper(self.apply.step()));
        Self::show_banner(self.apply.banner());
        if let ApplyPhase::Submitted { id, draft } = self.apply.phase() {
            output::plain(format!("  申請番号  {}\n  調達先名  {}", id, draft.name));
            output::info("`menu` でメニューへ戻ります。");
            return;
        }
        self.render_form_body(self.apply.tab(), self.apply.form());
        if !self.apply.can_submit() {
            output::warning(REQUIRED_NOTICE);
        }
    }

    fn render_update(&self) {
        Self::show_banner(self.update.banner());
        let Some(record) = self.update.record() else {
            output::warning("調達先が読み込まれていません。`edit <id>` で対象を指定してください。");
            return;
        };
        output::plain(format!(
            "  ID {}  ステータス {}  最終更新 {}",
            record.id,
            record.status.label(),
            record.last_updated.format("%Y-%m-%d")
        ));
        self.render_form_body(self.update.tab(), self.update.form());
    }

    fn render_form_body(&self, tab: FormTab, form: &SupplierForm) {
        output::plain(render::tabs(tab));
        match tab.notice() {
            Some(notice) => output::info(notice),
            None => output::plain(render::form(form)),
        }
    }
}

fn default_update_id() -> SupplierId {
    update_seed().id
}
