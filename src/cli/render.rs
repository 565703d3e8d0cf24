//! Plain-text rendering of the desk screens.
//!
//! Everything here returns a `String` so the shell decides where it goes and
//! tests can compare the layout directly.

use supplier_core::{
    ApplyStep, FormField, FormTab, ListStats, MenuEntry, Page, SearchQuery, Selection,
    SupplierForm,
};
use supplier_domain::{Country, SupplierRecord};
use unicode_width::UnicodeWidthChar;

/// Describes how a column should align its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: &'static str,
    pub alignment: Alignment,
}

impl TableColumn {
    pub const fn left(header: &'static str) -> Self {
        Self {
            header,
            alignment: Alignment::Left,
        }
    }

    pub const fn right(header: &'static str) -> Self {
        Self {
            header,
            alignment: Alignment::Right,
        }
    }
}

/// Column-aligned grid of cells.
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| display_width(cell))
                    .fold(display_width(column.header), usize::max)
            })
            .collect()
    }

    fn render_row(&self, cells: &[&str], widths: &[usize]) -> String {
        self.columns
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, (column, width))| {
                let text = cells.get(idx).copied().unwrap_or("");
                pad(text, *width, column.alignment)
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let header: Vec<&str> = self.columns.iter().map(|column| column.header).collect();
        let mut lines = vec![self.render_row(&header, &widths)];
        let rule_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        lines.push("-".repeat(rule_width));
        for row in &self.rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            lines.push(self.render_row(&cells, &widths));
        }
        lines.join("\n")
    }
}

fn pad(text: &str, width: usize, alignment: Alignment) -> String {
    let fill = " ".repeat(width.saturating_sub(display_width(text)));
    match alignment {
        Alignment::Left => format!("{text}{fill}"),
        Alignment::Right => format!("{fill}{text}"),
    }
}

/// Terminal columns taken by `text`, ignoring ANSI escape sequences.
pub fn display_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            if chars.peek() == Some(&'[') {
                chars.next();
                for next in chars.by_ref() {
                    if ('\u{40}'..='\u{7e}').contains(&next) {
                        break;
                    }
                }
            }
            continue;
        }
        width += ch.width().unwrap_or(0);
    }
    width
}

pub fn menu(entries: &[MenuEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("  {:<8} {}\n           {}", entry.key, entry.title, entry.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fixed announcements shown under the menu cards.
const NOTICES: [(&str, &str); 3] = [
    ("重要", "システムメンテナンスのお知らせ（2025/08/30 02:00-04:00）"),
    ("更新", "調達先管理システム v2.1.0 がリリースされました"),
    ("情報", "新しい検索機能が追加されました"),
];

pub fn notices() -> String {
    let mut lines = vec!["  お知らせ".to_string()];
    lines.extend(
        NOTICES
            .iter()
            .map(|(tag, text)| format!("    [{tag}] {text}")),
    );
    lines.join("\n")
}

/// `✓ 基本情報入力 ─ ● 内容確認 ─ ○ 申請完了`
pub fn stepper(current: ApplyStep) -> String {
    ApplyStep::ALL
        .iter()
        .map(|step| {
            let mark = match step.index().cmp(&current.index()) {
                std::cmp::Ordering::Less => "✓",
                std::cmp::Ordering::Equal if current == ApplyStep::Complete => "✓",
                std::cmp::Ordering::Equal => "●",
                std::cmp::Ordering::Greater => "○",
            };
            format!("{mark} {}", step.label())
        })
        .collect::<Vec<_>>()
        .join(" ─ ")
}

pub fn tabs(active: FormTab) -> String {
    [FormTab::Basic, FormTab::Credit, FormTab::Contact]
        .iter()
        .map(|tab| {
            if *tab == active {
                format!("[{}]", tab.label())
            } else {
                format!(" {} ", tab.label())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Basic-information fields with inline warnings under the offending inputs.
pub fn form(form: &SupplierForm) -> String {
    let draft = form.draft();
    let issues = form.issues();
    let mut lines = Vec::new();
    for field in FormField::ALL {
        let value = match field {
            FormField::Name => draft.name.clone(),
            FormField::CorporateId => draft.corporate_id.clone(),
            FormField::Country => country_cell(draft.country),
            FormField::Email => draft.email.clone(),
            FormField::Rating => format!("{} ({})", draft.rating.stars(), draft.rating),
        };
        let marker = if field.is_required() { "*" } else { " " };
        let label = format!("{}{}", field.label(), marker);
        lines.push(format!(
            "  {} {}  [{}]",
            pad(&label, 10, Alignment::Left),
            if value.is_empty() { "-" } else { value.as_str() },
            field.key()
        ));
        for issue in issues.iter().filter(|issue| issue.field == field) {
            lines.push(format!("             ⚠ {}", issue.message));
        }
    }
    lines.join("\n")
}

fn country_cell(country: Country) -> String {
    format!("{} ({})", country.label(), country.code())
}

pub fn supplier_table(rows: &[SupplierRecord], selection: &Selection) -> String {
    let table = Table {
        columns: vec![
            TableColumn::left(""),
            TableColumn::left("ID"),
            TableColumn::left("調達先名"),
            TableColumn::left("法人番号"),
            TableColumn::left("国"),
            TableColumn::left("メール"),
            TableColumn::left("推奨度"),
            TableColumn::left("ステータス"),
            TableColumn::right("最終更新"),
        ],
        rows: rows
            .iter()
            .map(|row| {
                vec![
                    if selection.contains(&row.id) { "[x]" } else { "[ ]" }.to_string(),
                    row.id.to_string(),
                    row.name.clone(),
                    row.corporate_id.clone(),
                    row.country.label().to_string(),
                    row.email.clone(),
                    row.rating.stars(),
                    row.status.label().to_string(),
                    row.last_updated.format("%Y-%m-%d").to_string(),
                ]
            })
            .collect(),
    };
    table.render()
}

pub fn stats(stats: &ListStats) -> String {
    format!(
        "総件数 {} | 有効 {} | 審査中 {} | 選択中 {}",
        stats.total, stats.active, stats.pending, stats.selected
    )
}

/// `1-5 / 5件 (ページ 1/1, 10件表示)`
pub fn page_footer<T>(page: &Page<T>) -> String {
    let first = if page.rows.is_empty() {
        0
    } else {
        page.page * page.page_size.get() + 1
    };
    let last = page.page * page.page_size.get() + page.rows.len();
    format!(
        "{first}-{last} / {}件 (ページ {}/{}, {}件表示)",
        page.total,
        page.page + 1,
        page.page_count().max(1),
        page.page_size
    )
}

pub fn chips(query: &SearchQuery) -> String {
    let chips = query.chips();
    if chips.is_empty() {
        "条件なし".to_string()
    } else {
        chips
            .iter()
            .map(|chip| format!("[{chip}]"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub fn detail(record: &SupplierRecord) -> String {
    [
        ("ID", record.id.to_string()),
        ("調達先名", record.name.clone()),
        ("法人番号", record.corporate_id.clone()),
        ("国", country_cell(record.country)),
        ("メール", record.email.clone()),
        ("推奨度", format!("{} ({})", record.rating.stars(), record.rating)),
        ("ステータス", record.status.label().to_string()),
        ("最終更新", record.last_updated.format("%Y-%m-%d").to_string()),
    ]
    .iter()
    .map(|(label, value)| format!("  {} {}", pad(label, 10, Alignment::Left), value))
    .collect::<Vec<_>>()
    .join("\n")
}
