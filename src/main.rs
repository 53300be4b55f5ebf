use iced::widget::{button, column, container, row, text, text_input, Column};
use iced::{event, keyboard, Event};
use iced::{Alignment, Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use tracing::{info, warn};

use photo_layout::config::Config;
use photo_layout::layout::{GridEvent, Modifiers, PointerButton, PointerEvent};
use photo_layout::logging;
use photo_layout::state::library::{ImportResult, LibraryGateway};
use photo_layout::state::data::PhotographUpdate;
use photo_layout::state::{LayoutGateway, LayoutSession, Photograph};

// Declare the ui module
mod ui;

/// Main application state
struct LayoutEditor {
    /// Catalog the session loads from and saves to
    gateway: LibraryGateway,
    /// The layout being edited
    session: LayoutSession,
    /// Keyboard modifiers currently held (for ctrl/shift clicks)
    modifiers: keyboard::Modifiers,
    /// Status message to display to the user
    status: String,
    /// Photograph whose title is being edited, with the draft title
    editing: Option<(String, String)>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// Initial load finished
    Loaded(Result<Vec<Photograph>, String>),
    /// User asked to discard local edits and load again
    Reload,
    ModifiersChanged(keyboard::Modifiers),
    /// Click on an entry in the available list
    AvailableSelected(String),
    /// Left/right click on a layout cell
    CellPressed(String, PointerButton),
    /// Move, resize or remove button on a layout cell
    Grid(GridEvent),
    Save,
    Saved(Result<(), String>),
    Rebuild,
    RebuildRequested(Result<(), String>),
    /// Open the title editor for a photograph
    EditTitle(String),
    TitleChanged(String),
    CommitTitle,
    CancelEdit,
    /// Catalog update finished
    TitleUpdated(Result<(String, PhotographUpdate), String>),
    /// User clicked the "Import Folder" button
    ImportFolder,
    /// Background import completed, with the reloaded catalog
    ImportComplete(Result<(ImportResult, Vec<Photograph>), String>),
}

impl LayoutEditor {
    /// Create a new instance of the application and start loading
    fn new(config: Config) -> (Self, Task<Message>) {
        let gateway = LibraryGateway::new(config.db_path);
        info!(db = %gateway.path().display(), "layout editor starting");

        let editor = LayoutEditor {
            gateway,
            session: LayoutSession::new(),
            modifiers: keyboard::Modifiers::default(),
            status: "Loading...".to_string(),
            editing: None,
        };
        let task = editor.load();

        (editor, task)
    }

    fn load(&self) -> Task<Message> {
        let gateway = self.gateway.clone();
        Task::perform(
            async move {
                gateway
                    .load_all_photographs()
                    .await
                    .map_err(|e| e.to_string())
            },
            Message::Loaded,
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Loaded(result) => {
                self.session.finish_load(result);
                self.status = format!(
                    "Ready. {} in layout, {} available.",
                    self.session.selected().len(),
                    self.session.available().len()
                );
                Task::none()
            }
            Message::Reload => {
                self.session = LayoutSession::new();
                self.status = "Loading...".to_string();
                self.load()
            }
            Message::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers;
                Task::none()
            }
            Message::AvailableSelected(id) => {
                self.session.available_selected(&id);
                Task::none()
            }
            Message::CellPressed(id, button) => {
                let modifiers = Modifiers {
                    ctrl: self.modifiers.control(),
                    shift: self.modifiers.shift(),
                };
                self.session
                    .pointer(&id, PointerEvent::with_modifiers(button, modifiers));
                Task::none()
            }
            Message::Grid(event) => {
                self.session.grid(&event);
                Task::none()
            }
            Message::Save => match self.session.begin_save() {
                Ok(mapping) => {
                    self.status = "Saving...".to_string();
                    let gateway = self.gateway.clone();
                    Task::perform(
                        async move { gateway.save_layout(mapping).await.map_err(|e| e.to_string()) },
                        Message::Saved,
                    )
                }
                Err(e) => {
                    warn!(error = %e, "save not started");
                    Task::none()
                }
            },
            Message::Saved(result) => {
                self.status = match &result {
                    Ok(()) => "✅ Layout saved.".to_string(),
                    Err(_) => "⚠️  Layout not saved.".to_string(),
                };
                self.session.finish_save(result);
                Task::none()
            }
            Message::Rebuild => {
                self.status = "Requesting site rebuild...".to_string();
                let gateway = self.gateway.clone();
                Task::perform(
                    async move { gateway.request_rebuild().await.map_err(|e| e.to_string()) },
                    Message::RebuildRequested,
                )
            }
            Message::RebuildRequested(result) => {
                self.status = match result {
                    Ok(()) => "✅ Site rebuild requested.".to_string(),
                    Err(e) => format!("⚠️  Rebuild request failed: {}", e),
                };
                Task::none()
            }
            Message::EditTitle(id) => {
                self.editing = self
                    .session
                    .photographs()
                    .iter()
                    .find(|p| p.id == id)
                    .map(|p| (id, p.title.clone()));
                Task::none()
            }
            Message::TitleChanged(draft) => {
                if let Some((_, title)) = &mut self.editing {
                    *title = draft;
                }
                Task::none()
            }
            Message::CancelEdit => {
                self.editing = None;
                Task::none()
            }
            Message::CommitTitle => {
                let Some((id, title)) = self.editing.take() else {
                    return Task::none();
                };
                let Some(photograph) = self.session.photographs().iter().find(|p| p.id == id) else {
                    return Task::none();
                };
                let update = PhotographUpdate {
                    title: title.trim().to_string(),
                    capture_time: photograph.capture_time,
                };
                if update.title.is_empty() {
                    return Task::none();
                }

                let gateway = self.gateway.clone();
                Task::perform(
                    async move {
                        gateway
                            .update_photograph(id.clone(), update.clone())
                            .await
                            .map(|()| (id, update))
                            .map_err(|e| e.to_string())
                    },
                    Message::TitleUpdated,
                )
            }
            Message::TitleUpdated(Ok((id, update))) => {
                self.session.update_details(&id, &update);
                self.status = format!("✅ Renamed to \"{}\".", update.title);
                Task::none()
            }
            Message::TitleUpdated(Err(e)) => {
                self.status = format!("⚠️  Rename failed: {}", e);
                Task::none()
            }
            Message::ImportFolder => {
                // Show the native folder picker dialog
                let folder = FileDialog::new()
                    .set_title("Select Folder with Photographs")
                    .pick_folder();

                if let Some(folder_path) = folder {
                    self.status = format!("Importing from {}...", folder_path.display());

                    let gateway = self.gateway.clone();
                    return Task::perform(
                        import_and_reload(gateway, folder_path),
                        Message::ImportComplete,
                    );
                }

                Task::none()
            }
            Message::ImportComplete(Ok((result, photographs))) => {
                let added = self.session.merge_new(photographs);
                self.status = format!(
                    "✅ Import complete! Added {} images, skipped {} duplicates, {} failed.",
                    result.imported_count, result.skipped_count, result.failed_count
                );
                info!(added, "import merged into session");
                Task::none()
            }
            Message::ImportComplete(Err(e)) => {
                self.status = format!("⚠️  Import failed: {}", e);
                Task::none()
            }
        }
    }

    /// Track modifier keys so clicks can be interpreted as ctrl/shift clicks
    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                Some(Message::ModifiersChanged(modifiers))
            }
            _ => None,
        })
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        if self.session.is_loading() {
            return container(text("Loading...").size(32))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into();
        }

        let saving = self.session.is_saving();

        let toolbar = row![
            text("Layout").size(32),
            button(if saving { "Saving..." } else { "Save" })
                .on_press_maybe((!saving).then_some(Message::Save))
                .padding(10),
            button("Rebuild Site").on_press(Message::Rebuild).padding(10),
            button("Import Folder").on_press(Message::ImportFolder).padding(10),
            button("Reload")
                .on_press_maybe((!saving).then_some(Message::Reload))
                .padding(10),
        ]
        .spacing(20)
        .align_y(Alignment::Center);

        let mut header: Column<Message> = column![toolbar, text(&self.status).size(16)].spacing(10);
        if let Some(error) = self.session.error() {
            header = header.push(text(format!("Error: {}", error)).size(16).style(text::danger));
        }
        if let Some((_, draft)) = &self.editing {
            header = header.push(
                row![
                    text("Title").size(16),
                    text_input("Title", draft)
                        .on_input(Message::TitleChanged)
                        .on_submit(Message::CommitTitle)
                        .width(Length::Fixed(320.0)),
                    button("Apply").on_press(Message::CommitTitle),
                    button("Cancel").on_press(Message::CancelEdit),
                ]
                .spacing(10)
                .align_y(Alignment::Center),
            );
        }

        let selected = self.session.selected();
        let available = self.session.available();

        let content = column![
            header,
            row![
                ui::grid::view(&selected),
                ui::sidebar::view(&available, selected.first().copied()),
            ]
            .spacing(30),
            controls_help(),
        ]
        .spacing(20)
        .padding(30);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn controls_help() -> Element<'static, Message> {
    let lines = [
        ("Left Click", "Switch image with next image"),
        ("Right Click", "Switch image with previous image"),
        ("Shift + Left Click", "Increase width (up to 3)"),
        ("Shift + Right Click", "Decrease width"),
        ("Ctrl + Left Click", "Remove image"),
    ];

    lines
        .iter()
        .fold(Column::new().spacing(4), |help, (input, effect)| {
            help.push(row![text(*input).size(13).width(180.0), text(*effect).size(13)])
        })
        .into()
}

/// Import a folder into the catalog, then read the catalog back
async fn import_and_reload(
    gateway: LibraryGateway,
    folder: PathBuf,
) -> Result<(ImportResult, Vec<Photograph>), String> {
    let result = gateway
        .import_folder(folder)
        .await
        .map_err(|e| e.to_string())?;
    let photographs = gateway
        .load_all_photographs()
        .await
        .map_err(|e| e.to_string())?;
    Ok((result, photographs))
}

fn main() -> iced::Result {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("photo-layout: {}", e);
            std::process::exit(1);
        }
    };

    logging::init(&config.log_filter);

    iced::application("Photo Layout", LayoutEditor::update, LayoutEditor::view)
        .subscription(LayoutEditor::subscription)
        .theme(LayoutEditor::theme)
        .centered()
        .run_with(move || LayoutEditor::new(config))
}
