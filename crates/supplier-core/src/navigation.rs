//! Screen history, breadcrumb and menu entries.

use std::fmt;

use supplier_domain::SupplierId;

/// Screens of the supplier desk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Menu,
    Search,
    List,
    Apply,
    /// Update form; without an id the default record is loaded.
    Update { id: Option<SupplierId> },
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Menu => "メニュー",
            Screen::Search => "調達先検索",
            Screen::List => "調達先一覧",
            Screen::Apply => "調達先申請",
            Screen::Update { .. } => "調達先更新",
        }
    }

    /// Route of the screen, with the update id as a query parameter.
    pub fn route(&self) -> String {
        match self {
            Screen::Menu => "/".into(),
            Screen::Search => "/suppliers".into(),
            Screen::List => "/suppliers/list".into(),
            Screen::Apply => "/suppliers/apply".into(),
            Screen::Update { id: None } => "/suppliers/update".into(),
            Screen::Update { id: Some(id) } => format!("/suppliers/update?id={id}"),
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Back-stack navigation between screens.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    current: Screen,
    history: Vec<Screen>,
}

impl Navigator {
    pub fn current(&self) -> &Screen {
        &self.current
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    /// Moves to `screen`, remembering the current one. Re-opening the current screen is a no-op.
    pub fn navigate_to(&mut self, screen: Screen) {
        if screen == self.current {
            return;
        }
        let previous = std::mem::replace(&mut self.current, screen);
        self.history.push(previous);
    }

    /// Returns to the previous screen. At the root this stays on the menu.
    pub fn back(&mut self) -> &Screen {
        self.current = self.history.pop().unwrap_or_default();
        &self.current
    }

    pub fn return_to_menu(&mut self) {
        self.history.clear();
        self.current = Screen::Menu;
    }

    /// `ホーム > 調達先一覧` style trail.
    pub fn breadcrumb(&self) -> String {
        format!("ホーム > {}", self.current.title())
    }
}

/// Cards offered by the menu screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub screen: Screen,
}

impl MenuEntry {
    pub fn all() -> Vec<MenuEntry> {
        vec![
            MenuEntry {
                key: "search",
                title: "調達先検索",
                description: "既存の調達先を条件を指定して検索できます。キーワードや国による絞り込みが可能です。",
                screen: Screen::Search,
            },
            MenuEntry {
                key: "list",
                title: "調達先一覧",
                description: "検索結果や全ての調達先をリスト形式で確認できます。詳細情報の閲覧や編集が可能です。",
                screen: Screen::List,
            },
            MenuEntry {
                key: "apply",
                title: "調達先申請",
                description: "新規調達先の申請を行います。基本情報、与信情報、担当者情報を入力して申請できます。",
                screen: Screen::Apply,
            },
            MenuEntry {
                key: "update",
                title: "調達先更新",
                description: "既存調達先の情報を更新します。基本情報、与信情報、担当者情報の変更が可能です。",
                screen: Screen::Update { id: None },
            },
        ]
    }

    pub fn find(key: &str) -> Option<MenuEntry> {
        let key = key.trim().to_ascii_lowercase();
        Self::all().into_iter().find(|entry| entry.key == key)
    }
}
