use crate::config::MIN_DUE_DATE_CHANGE_SECS;
use crate::datetime::format_date;
use crate::localization::{Localizer, is_rtl};
use crate::models::{ActionStatus, DataRow};
use crate::progress::ProgressState;
use crate::summary::actions::SummaryAction;
use crate::summary::store::{Operation, SummaryStore, ViewType};
use crate::view::{ButtonView, ErrorView};
use log::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loadable<T> {
    Loading,
    Ready(T),
}

impl<T> Loadable<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            Loadable::Loading => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ChangeDueDate,
    ClosePoll,
    DeletePoll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub action: MenuAction,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub status: String,
    pub menu: Vec<MenuItem>,
    pub menu_open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipationView {
    pub title: String,
    pub percentage: u64,
    pub summary: String,
    pub opens_responders: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MyResponseView {
    pub user_name: String,
    pub text: String,
    pub responded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionResult {
    pub id: String,
    pub title: String,
    pub count: u64,
    pub percentage: u64,
    pub percentage_text: String,
    pub accessibility_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsContent {
    Chart { label: String, options: Vec<OptionResult> },
    Hidden {
        message: String,
        download_link: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    pub title: String,
    pub content: ResultsContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadKind {
    Image,
    Responses,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterView {
    pub download: ButtonView,
    pub menu: Vec<(DownloadKind, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    ClosePoll,
    DeletePoll,
    ChangeDueDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView {
    pub kind: DialogKind,
    pub header: String,
    pub message: Option<String>,
    pub due_date: Option<i64>,
    pub confirm: ButtonView,
    pub cancel: String,
    pub cancel_accessibility_label: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainView {
    pub header: Loadable<HeaderView>,
    pub participation: Loadable<ParticipationView>,
    pub my_response: Loadable<MyResponseView>,
    pub results: Loadable<ResultsView>,
    pub footer: Option<FooterView>,
    pub dialogs: Vec<DialogView>,
    pub rtl: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponderRow {
    pub user_name: String,
    pub subtitle: Option<String>,
    pub date: String,
    pub accessibility_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFooter {
    None,
    Loader,
    Retry(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponderList {
    pub rows: Vec<ResponderRow>,
    pub footer: ListFooter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonResponderList {
    pub loading: bool,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabContent {
    Responders(ResponderList),
    NonResponders(NonResponderList),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabItem {
    pub label: String,
    pub view: ViewType,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabsView {
    pub title: String,
    pub participation: String,
    pub tabs: Vec<TabItem>,
    pub content: TabContent,
    pub back: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryPage {
    Deleted(ErrorView),
    Error(ErrorView),
    Main(MainView),
    Tabs(TabsView),
}

pub fn render_page(store: &SummaryStore) -> SummaryPage {
    let strings = &store.strings;
    if store.is_action_deleted {
        return SummaryPage::Deleted(ErrorView::deleted(strings));
    }

    let status = &store.progress_status;
    let failed = [
        status.action_instance,
        status.action_instance_summary,
        status.localization,
        status.member_count,
    ]
    .iter()
    .any(|state| state.is_failed());
    if failed {
        return SummaryPage::Error(ErrorView::generic(strings));
    }

    match store.current_view {
        ViewType::Main => SummaryPage::Main(render_main(store)),
        ViewType::ResponderView | ViewType::NonResponderView => SummaryPage::Tabs(render_tabs(store)),
    }
}

pub fn is_page_ready(store: &SummaryStore) -> bool {
    let status = &store.progress_status;
    [
        status.action_instance,
        status.action_instance_summary,
        status.localization,
        status.member_count,
    ]
    .iter()
    .all(|state| state.is_completed())
}

pub fn render_main(store: &SummaryStore) -> MainView {
    let rtl = store
        .context
        .as_ref()
        .is_some_and(|context| is_rtl(&context.locale));

    MainView {
        header: header(store),
        participation: participation(store),
        my_response: my_response(store),
        results: results(store),
        footer: footer(store),
        dialogs: dialogs(store),
        rtl,
    }
}

fn status_line(store: &SummaryStore) -> Option<String> {
    let strings = &store.strings;
    let action = store.action_instance.as_ref()?;
    let line = match action.status {
        ActionStatus::Active => strings.format("dueByDate", &[&format_date(action.expiry_time)]),
        ActionStatus::Closed => {
            let closed_at = if action.update_time > 0 {
                action.update_time
            } else {
                action.expiry_time
            };
            strings.format("ClosedOn", &[&format_date(closed_at)])
        }
        ActionStatus::Expired => strings.format("ExpiredOn", &[&format_date(action.expiry_time)]),
    };
    Some(line)
}

fn header(store: &SummaryStore) -> Loadable<HeaderView> {
    if !store.progress_status.action_instance.is_completed() {
        return Loadable::Loading;
    }
    let Some(status) = status_line(store) else {
        return Loadable::Loading;
    };

    let strings = &store.strings;
    let mut menu = Vec::new();
    if store.is_current_user_creator() && store.is_poll_active() {
        menu.push(MenuItem {
            action: MenuAction::ChangeDueDate,
            label: strings.get("ChangeDueBy"),
        });
        menu.push(MenuItem {
            action: MenuAction::ClosePoll,
            label: strings.get("ClosePoll"),
        });
    }
    if store.is_current_user_creator() {
        menu.push(MenuItem {
            action: MenuAction::DeletePoll,
            label: strings.get("DeletePoll"),
        });
    }

    Loadable::Ready(HeaderView {
        status,
        menu,
        menu_open: store.show_more_options,
    })
}

pub fn percent(part: u64, whole: u64) -> u64 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u64
}

fn participation_line(strings: &Localizer, row_count: u64, member_count: u64) -> String {
    let key = if row_count == 1 {
        "ParticipationIndicatorSingular"
    } else {
        "ParticipationIndicatorPlural"
    };
    strings.format(key, &[&row_count, &member_count])
}

fn participation(store: &SummaryStore) -> Loadable<ParticipationView> {
    let status = &store.progress_status;
    let ready = status.member_count.is_completed()
        && status.action_instance.is_completed()
        && status.action_instance_summary.is_completed();
    if !ready {
        return Loadable::Loading;
    }

    let strings = &store.strings;
    let row_count = store.action_summary.as_ref().map_or(0, |summary| summary.row_count);
    let member_count = store.member_count.unwrap_or(0);
    let percentage = percent(row_count, member_count);

    Loadable::Ready(ParticipationView {
        title: strings.format("Participation", &[&percentage]),
        percentage,
        summary: participation_line(strings, row_count, member_count),
        opens_responders: store.can_current_user_view_results(),
    })
}

fn chosen_option<'a>(store: &'a SummaryStore, row: &DataRow) -> Option<&'a str> {
    let action = store.action_instance.as_ref()?;
    let column = action.question()?;
    let option_name = row.column_values.get(&column.name)?;
    action.choice_display_name(option_name)
}

fn my_response(store: &SummaryStore) -> Loadable<MyResponseView> {
    let strings = &store.strings;
    let status = &store.progress_status;
    if !status.my_row.is_completed() || !status.action_instance.is_completed() {
        return Loadable::Loading;
    }

    let user_name = store
        .context
        .as_ref()
        .and_then(|context| store.user_display_name(&context.user_id))
        .map(str::to_string)
        .unwrap_or_else(|| strings.get("You"));

    let choice = store.my_row.as_ref().and_then(|row| chosen_option(store, row));
    let view = match choice {
        Some(choice) => MyResponseView {
            user_name,
            text: strings.format("YourResponse", &[&choice]),
            responded: true,
        },
        None => MyResponseView {
            user_name,
            text: strings.get("NotResponded"),
            responded: false,
        },
    };
    Loadable::Ready(view)
}

pub fn option_results(store: &SummaryStore) -> Option<Vec<OptionResult>> {
    let status = &store.progress_status;
    if !status.action_instance.is_completed() || !status.action_instance_summary.is_completed() {
        return None;
    }
    let action = store.action_instance.as_ref()?;
    let summary = store.action_summary.clone().unwrap_or_default();
    let column = action.question()?;

    let counts = summary.option_counts(&column.name).unwrap_or_else(|e| {
        warn!("Unreadable aggregate for column {}: {}", column.name, e);
        Default::default()
    });

    let strings = &store.strings;
    let results = column
        .options
        .iter()
        .map(|option| {
            let count = counts.get(&option.name).copied().unwrap_or(0);
            let percentage = percent(count, summary.row_count);
            let percentage_text = strings.format("BarPercentage", &[&percentage]);
            OptionResult {
                id: option.name.clone(),
                title: option.display_name.clone(),
                count,
                percentage,
                accessibility_label: strings.format(
                    "OptionResponseAccessibility",
                    &[&option.display_name, &count, &percentage_text],
                ),
                percentage_text,
            }
        })
        .collect();
    Some(results)
}

fn results(store: &SummaryStore) -> Loadable<ResultsView> {
    let Some(options) = option_results(store) else {
        return Loadable::Loading;
    };
    let strings = &store.strings;
    let title = store.question_title().unwrap_or_default().to_string();

    let content = if store.can_current_user_view_results() {
        ResultsContent::Chart {
            label: strings.get("PollOptions"),
            options,
        }
    } else {
        let responded = store.my_row.is_some();
        let message = if !store.is_poll_active() && !responded {
            strings.get("NotRespondedLabel")
        } else {
            strings.get("VisibilityCreatorOnlyLabel")
        };
        ResultsContent::Hidden {
            message,
            download_link: responded.then(|| strings.get("DownloadYourResponses")),
        }
    };

    Loadable::Ready(ResultsView { title, content })
}

fn footer(store: &SummaryStore) -> Option<FooterView> {
    if !store.progress_status.action_instance.is_completed() || !store.can_current_user_view_results() {
        return None;
    }
    let strings = &store.strings;
    let downloading = store.progress_status.download_data.is_in_progress();
    let mut download = ButtonView::new(strings.get("Download"));
    download.loading = downloading;
    download.disabled = downloading;

    Some(FooterView {
        download,
        menu: vec![
            (DownloadKind::Image, strings.get("DownloadImage")),
            (DownloadKind::Responses, strings.get("DownloadResponses")),
        ],
    })
}

fn dialog(
    store: &SummaryStore,
    kind: DialogKind,
    title_key: &str,
    confirm_key: &str,
    slot: ProgressState,
) -> DialogView {
    let strings = &store.strings;
    let header = strings.get(title_key);
    let cancel = strings.get("Cancel");
    let mut confirm = ButtonView::new(strings.get(confirm_key));
    confirm.loading = slot.is_in_progress();
    DialogView {
        kind,
        cancel_accessibility_label: strings.format("DialogTalkback", &[&header, &cancel]),
        header,
        message: None,
        due_date: None,
        confirm,
        cancel,
        error: slot.is_failed().then(|| strings.get("SomethingWentWrong")),
    }
}

fn dialogs(store: &SummaryStore) -> Vec<DialogView> {
    if !store.progress_status.action_instance.is_completed() {
        return Vec::new();
    }
    let strings = &store.strings;
    let status = &store.progress_status;
    let mut open = Vec::new();

    if store.is_delete_poll_alert_open {
        let mut view = dialog(store, DialogKind::DeletePoll, "DeletePoll", "Confirm", status.delete_action_instance);
        view.message = Some(strings.get("DeletePollConfirmation"));
        open.push(view);
    }
    if store.is_poll_close_alert_open {
        let mut view = dialog(store, DialogKind::ClosePoll, "ClosePoll", "Confirm", status.close_action_instance);
        view.message = Some(strings.get("ClosePollConfirmation"));
        open.push(view);
    }
    if store.is_change_expiry_alert_open {
        let mut view = dialog(
            store,
            DialogKind::ChangeDueDate,
            "ChangeDueDate",
            "Change",
            status.update_action_instance,
        );
        view.due_date = Some(store.due_date);
        let expiry = store.action_instance.as_ref().map_or(0, |action| action.expiry_time);
        view.confirm.disabled = (store.due_date - expiry).abs() / 1000 <= MIN_DUE_DATE_CHANGE_SECS;
        open.push(view);
    }
    open
}

fn responder_list(store: &SummaryStore) -> ResponderList {
    let strings = &store.strings;
    let mut rows = Vec::new();
    let mut profile_pending = false;

    if store.action_instance.is_some() {
        for row in &store.action_instance_rows {
            let Some(member) = store.user_profile.get(&row.creator_id) else {
                profile_pending = true;
                continue;
            };
            let user_name = member
                .display_name
                .clone()
                .unwrap_or_else(|| strings.get("UnknownMember"));
            let subtitle = chosen_option(store, row).map(str::to_string);
            let date = format_date(row.update_time);
            rows.push(ResponderRow {
                accessibility_label: strings.format(
                    "ResponderAccessibilityLabel",
                    &[&user_name, &subtitle.clone().unwrap_or_default(), &date],
                ),
                user_name,
                subtitle,
                date,
            });
        }
    }

    let footer = match store.progress_status.action_instance_rows {
        ProgressState::Failed => ListFooter::Retry(strings.get("ResponseFetchError")),
        ProgressState::InProgress => ListFooter::Loader,
        _ if profile_pending => ListFooter::Loader,
        _ => ListFooter::None,
    };
    ResponderList { rows, footer }
}

fn non_responder_list(store: &SummaryStore) -> NonResponderList {
    let strings = &store.strings;
    let state = store.progress_status.non_responders;
    if state.is_in_progress() {
        return NonResponderList {
            loading: true,
            names: Vec::new(),
        };
    }

    let mut names = Vec::new();
    if state.is_completed() {
        for member in store.non_responders.iter().flatten() {
            let name = store
                .user_display_name(&member.id)
                .map(str::to_string)
                .unwrap_or_else(|| strings.get("UnknownMember"));
            names.push(name);
        }
    }
    NonResponderList { loading: false, names }
}

pub fn render_tabs(store: &SummaryStore) -> TabsView {
    let strings = &store.strings;
    let row_count = store.action_summary.as_ref().map_or(0, |summary| summary.row_count);
    let member_count = store.member_count.unwrap_or(0);

    let tab = |key: &str, view: ViewType| TabItem {
        label: strings.get(key),
        view,
        selected: store.current_view == view,
    };

    let content = if store.current_view == ViewType::NonResponderView {
        TabContent::NonResponders(non_responder_list(store))
    } else {
        TabContent::Responders(responder_list(store))
    };

    TabsView {
        title: strings.get("ViewResponses"),
        participation: participation_line(strings, row_count, member_count),
        tabs: vec![
            tab("Responders", ViewType::ResponderView),
            tab("NonResponders", ViewType::NonResponderView),
        ],
        content,
        back: strings.get("Back"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryInput {
    Mounted,
    OpenResponders,
    OpenNonResponders,
    ResponderRowRendered(usize),
    RetryRows,
    Back,
    MoreOptionsToggled,
    MenuSelected(MenuAction),
    DueDatePicked(i64),
    DialogConfirmed(DialogKind),
    DialogCancelled(DialogKind),
    Download(DownloadKind),
}

pub fn actions_for(store: &SummaryStore, input: SummaryInput) -> Vec<SummaryAction> {
    let status = &store.progress_status;
    match input {
        SummaryInput::Mounted => vec![SummaryAction::Initialize],
        SummaryInput::OpenResponders => {
            let mut actions = vec![SummaryAction::SetCurrentView(ViewType::ResponderView)];
            let creators: Vec<String> = store
                .action_instance_rows
                .iter()
                .map(|row| row.creator_id.clone())
                .collect();
            actions.push(SummaryAction::FetchUserDetails(creators));
            if store.action_instance_rows.is_empty() {
                actions.push(SummaryAction::FetchActionInstanceRows {
                    should_fetch_user_details: true,
                });
            }
            actions
        }
        SummaryInput::OpenNonResponders => vec![
            SummaryAction::SetCurrentView(ViewType::NonResponderView),
            SummaryAction::FetchNonResponders,
        ],
        SummaryInput::ResponderRowRendered(index) => {
            let near_end = index + store.row_fetch_threshold > store.action_instance_rows.len();
            if near_end && !status.action_instance_rows.is_failed() {
                vec![SummaryAction::FetchActionInstanceRows {
                    should_fetch_user_details: true,
                }]
            } else {
                Vec::new()
            }
        }
        SummaryInput::RetryRows => vec![SummaryAction::FetchActionInstanceRows {
            should_fetch_user_details: true,
        }],
        SummaryInput::Back => vec![SummaryAction::GoBack],
        SummaryInput::MoreOptionsToggled => vec![SummaryAction::ShowMoreOptions(!store.show_more_options)],
        SummaryInput::MenuSelected(item) => {
            let (operation, open) = match item {
                MenuAction::ChangeDueDate => (
                    Operation::UpdateActionInstance,
                    SummaryAction::PollExpiryChangeAlertOpen(true),
                ),
                MenuAction::ClosePoll => (Operation::CloseActionInstance, SummaryAction::PollCloseAlertOpen(true)),
                MenuAction::DeletePoll => (Operation::DeleteActionInstance, SummaryAction::PollDeleteAlertOpen(true)),
            };
            let mut actions = vec![SummaryAction::ShowMoreOptions(false)];
            if !status.get(operation).is_in_progress() {
                actions.push(SummaryAction::progress(operation, ProgressState::NotStarted));
            }
            actions.push(open);
            actions
        }
        SummaryInput::DueDatePicked(date) => vec![SummaryAction::SetDueDate(date)],
        SummaryInput::DialogConfirmed(kind) => vec![match kind {
            DialogKind::ClosePoll => SummaryAction::ClosePoll,
            DialogKind::DeletePoll => SummaryAction::DeletePoll,
            DialogKind::ChangeDueDate => SummaryAction::UpdateDueDate(store.due_date),
        }],
        SummaryInput::DialogCancelled(kind) => vec![match kind {
            DialogKind::ClosePoll => SummaryAction::PollCloseAlertOpen(false),
            DialogKind::DeletePoll => SummaryAction::PollDeleteAlertOpen(false),
            DialogKind::ChangeDueDate => SummaryAction::PollExpiryChangeAlertOpen(false),
        }],
        SummaryInput::Download(DownloadKind::Image) => vec![SummaryAction::DownloadImage],
        SummaryInput::Download(DownloadKind::Responses) => vec![SummaryAction::DownloadCsv],
    }
}
