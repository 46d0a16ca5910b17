use crate::creation::view::{CreationView, MainPage, SettingsPage};
use crate::summary::view::{
    DialogView, ListFooter, Loadable, MainView, ResultsContent, SummaryPage, TabContent, TabsView,
};
use crate::view::ErrorView;
use std::fmt::Write;

const BAR_WIDTH: u64 = 20;
const PLACEHOLDER: &str = "...";

fn bar(percentage: u64) -> String {
    let filled = (percentage.min(100) * BAR_WIDTH / 100) as usize;
    format!("[{}{}]", "#".repeat(filled), " ".repeat(BAR_WIDTH as usize - filled))
}

fn error(out: &mut String, view: &ErrorView) {
    let _ = writeln!(out, "{}", view.title);
    if let Some(subtitle) = &view.subtitle {
        let _ = writeln!(out, "{}", subtitle);
    }
    let _ = writeln!(out, "[{}]", view.button);
}

pub fn creation(view: &CreationView) -> String {
    let mut out = String::new();
    match view {
        CreationView::Loading => out.push_str(PLACEHOLDER),
        CreationView::Error(e) => error(&mut out, e),
        CreationView::Main(page) => creation_main(&mut out, page),
        CreationView::Settings(page) => creation_settings(&mut out, page),
    }
    out
}

fn creation_main(out: &mut String, page: &MainPage) {
    let _ = writeln!(out, "{}", or_placeholder(&page.title.value, &page.title.placeholder));
    if let Some(e) = &page.title.error {
        let _ = writeln!(out, "  ! {}", e);
    }
    for (index, choice) in page.choices.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {}",
            index + 1,
            or_placeholder(&choice.field.value, &choice.field.placeholder)
        );
        if let Some(e) = &choice.field.error {
            let _ = writeln!(out, "     ! {}", e);
        }
    }
    if let Some(add) = &page.add_choice {
        let _ = writeln!(out, "  + {}", add);
    }
    let _ = writeln!(out, "{}: {}", page.settings_label, page.settings_summary);
    let _ = write!(out, "[{}]", page.next.label);
    if page.next.loading {
        out.push_str(" ...");
    }
}

fn creation_settings(out: &mut String, page: &SettingsPage) {
    let _ = writeln!(out, "{}: {}", page.due_by_label, page.due_date_text);
    let _ = writeln!(out, "{}", page.visibility_label);
    for option in &page.visibility_options {
        let mark = if option.checked { "(x)" } else { "( )" };
        let _ = writeln!(out, "  {} {}", mark, option.label);
    }
    let _ = write!(out, "< {}", page.back);
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() { placeholder } else { value }
}

pub fn summary(page: &SummaryPage) -> String {
    let mut out = String::new();
    match page {
        SummaryPage::Deleted(e) | SummaryPage::Error(e) => error(&mut out, e),
        SummaryPage::Main(view) => summary_main(&mut out, view),
        SummaryPage::Tabs(view) => summary_tabs(&mut out, view),
    }
    out
}

fn line<T>(out: &mut String, section: &Loadable<T>, text: impl FnOnce(&T) -> String) {
    match section {
        Loadable::Loading => {
            let _ = writeln!(out, "{}", PLACEHOLDER);
        }
        Loadable::Ready(value) => {
            let _ = writeln!(out, "{}", text(value));
        }
    }
}

fn summary_main(out: &mut String, view: &MainView) {
    line(out, &view.header, |header| {
        let menu: Vec<&str> = header.menu.iter().map(|item| item.label.as_str()).collect();
        if menu.is_empty() {
            header.status.clone()
        } else {
            format!("{}  [{}]", header.status, menu.join(" | "))
        }
    });
    line(out, &view.participation, |p| {
        format!("{} {}\n{}", bar(p.percentage), p.title, p.summary)
    });
    line(out, &view.my_response, |r| format!("{}: {}", r.user_name, r.text));

    match &view.results {
        Loadable::Loading => {
            let _ = writeln!(out, "{}", PLACEHOLDER);
        }
        Loadable::Ready(results) => {
            let _ = writeln!(out, "{}", results.title);
            match &results.content {
                ResultsContent::Chart { options, .. } => {
                    for option in options {
                        let _ = writeln!(
                            out,
                            "  {} {:>4} {} ({})",
                            bar(option.percentage),
                            option.percentage_text,
                            option.title,
                            option.count
                        );
                    }
                }
                ResultsContent::Hidden { message, download_link } => {
                    let _ = writeln!(out, "  {}", message);
                    if let Some(link) = download_link {
                        let _ = writeln!(out, "  > {}", link);
                    }
                }
            }
        }
    }

    if let Some(footer) = &view.footer {
        let labels: Vec<&str> = footer.menu.iter().map(|(_, label)| label.as_str()).collect();
        let _ = writeln!(out, "[{}: {}]", footer.download.label, labels.join(" | "));
    }
    for dialog in &view.dialogs {
        summary_dialog(out, dialog);
    }
}

fn summary_dialog(out: &mut String, dialog: &DialogView) {
    let _ = writeln!(out, "== {} ==", dialog.header);
    if let Some(message) = &dialog.message {
        let _ = writeln!(out, "{}", message);
    }
    if let Some(error) = &dialog.error {
        let _ = writeln!(out, "! {}", error);
    }
    let confirm = if dialog.confirm.loading {
        PLACEHOLDER.to_string()
    } else {
        dialog.confirm.label.clone()
    };
    let _ = writeln!(out, "[{}] [{}]", dialog.cancel, confirm);
}

fn summary_tabs(out: &mut String, view: &TabsView) {
    let _ = writeln!(out, "{}", view.participation);
    let tabs: Vec<String> = view
        .tabs
        .iter()
        .map(|tab| {
            if tab.selected {
                format!("*{}*", tab.label)
            } else {
                tab.label.clone()
            }
        })
        .collect();
    let _ = writeln!(out, "{}", tabs.join(" | "));

    match &view.content {
        TabContent::Responders(list) => {
            for row in &list.rows {
                let _ = writeln!(
                    out,
                    "  {}  {}  {}",
                    row.user_name,
                    row.subtitle.as_deref().unwrap_or_default(),
                    row.date
                );
            }
            match &list.footer {
                ListFooter::None => {}
                ListFooter::Loader => {
                    let _ = writeln!(out, "  {}", PLACEHOLDER);
                }
                ListFooter::Retry(message) => {
                    let _ = writeln!(out, "  {}", message);
                }
            }
        }
        TabContent::NonResponders(list) => {
            if list.loading {
                let _ = writeln!(out, "  {}", PLACEHOLDER);
            }
            for name in &list.names {
                let _ = writeln!(out, "  {}", name);
            }
        }
    }
    let _ = write!(out, "< {}", view.back);
}
