use iced::widget::image::{Handle, Image};
use iced::widget::{button, container, row, slider, text, Column};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use std::sync::Arc;

use brightness_editor::config::AppConfig;
use brightness_editor::photo::{capture, preview};
use brightness_editor::{BrightnessLevel, EditSession, ImageSaver, MediaStore, SaveOptions};

/// Main application state
struct BrightnessEditor {
    /// Photo, slider position and save flag
    session: EditSession,
    /// Background save pipeline
    saver: ImageSaver,
    config: AppConfig,
    /// Where captured photos are kept
    private_dir: PathBuf,
    /// Decimated copy of the photo, before any adjustment
    thumbnail: Option<image::RgbaImage>,
    /// Thumbnail with the current transform applied
    preview: Option<Handle>,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked "Take Photo"
    TakePhoto,
    /// Slider moved
    BrightnessChanged(i32),
    /// User clicked "Save"
    Save,
    /// Background save finished with this result
    SaveComplete(bool),
}

impl BrightnessEditor {
    /// Open the media index and start the save worker
    fn new() -> brightness_editor::Result<Self> {
        let config = AppConfig::load(&AppConfig::default_path())?;

        let root = config.media_root.clone().unwrap_or_else(MediaStore::default_root);
        let db_path = config
            .media_index_path
            .clone()
            .unwrap_or_else(MediaStore::default_db_path);
        let store = MediaStore::open(root, db_path)?;
        store.verify_files()?;
        log::info!("🎨 Brightness Editor initialized with {} saved photos", store.entry_count()?);

        let private_dir = config
            .private_pictures_dir
            .clone()
            .unwrap_or_else(capture::default_private_dir);
        let saver = ImageSaver::new(Arc::new(store), SaveOptions::from(&config))?;

        Ok(BrightnessEditor {
            session: EditSession::new(),
            saver,
            config,
            private_dir,
            thumbnail: None,
            preview: None,
            status: "Take a photo to get started.".to_string(),
        })
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TakePhoto => {
                // No camera on desktop: pick an existing photo instead
                let picked = FileDialog::new()
                    .set_title("Select a Photo")
                    .add_filter("JPEG", &["jpg", "jpeg"])
                    .pick_file();

                if let Some(source) = picked {
                    self.capture(source);
                }

                Task::none()
            }
            Message::BrightnessChanged(level) => {
                match self.session.set_brightness(level) {
                    Ok(_) => self.refresh_preview(),
                    Err(e) => log::warn!("Ignoring slider value: {}", e),
                }
                Task::none()
            }
            Message::Save => {
                // begin_save() disables Save until SaveComplete arrives
                let Some(request) = self.session.begin_save() else {
                    return Task::none();
                };

                self.status = format!("Saving {}...", request.photo.display_name());
                Task::perform(
                    self.saver.save(&request.photo, request.transform),
                    Message::SaveComplete,
                )
            }
            Message::SaveComplete(result) => {
                let outcome = self.session.finish_save(result);
                self.status = outcome.message().to_string();
                Task::none()
            }
        }
    }

    /// Copy the picked file in as a new capture and show its preview
    fn capture(&mut self, source: PathBuf) {
        let photo = match capture::import_photo(&source, &self.private_dir) {
            Ok(photo) => photo,
            Err(e) => {
                log::error!("Failed to capture {}: {}", source.display(), e);
                self.status = "Could not take photo.".to_string();
                return;
            }
        };

        match preview::load_preview(
            photo.path(),
            self.config.preview_width,
            self.config.preview_height,
        ) {
            Ok(thumbnail) => {
                self.status = format!("Editing {}", photo.display_name());
                self.thumbnail = Some(thumbnail);
                self.session.photo_captured(photo);
                self.refresh_preview();
            }
            Err(e) => {
                log::error!("Failed to load preview for {}: {}", photo.path().display(), e);
                self.status = "Could not read photo.".to_string();
            }
        }
    }

    fn refresh_preview(&mut self) {
        self.preview = self.thumbnail.as_ref().map(|thumbnail| {
            let rendered = preview::render_preview(thumbnail, &self.session.transform());
            Handle::from_rgba(rendered.width(), rendered.height(), rendered.into_raw())
        });
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let mut content: Column<Message> = Column::new()
            .push(text("Brightness Editor").size(32))
            .spacing(20)
            .padding(40)
            .align_x(Alignment::Center);

        if let Some(handle) = &self.preview {
            let photo: Image<Handle> = Image::new(handle.clone());
            content = content.push(photo.width(Length::Fill).height(Length::Fill));
        }

        // The slider only appears once there is something to adjust
        if self.session.photo().is_some() {
            content = content.push(
                row![
                    text("Brightness"),
                    slider(
                        BrightnessLevel::MIN.value()..=BrightnessLevel::MAX.value(),
                        self.session.brightness().value(),
                        Message::BrightnessChanged,
                    ),
                ]
                .spacing(10)
                .align_y(Alignment::Center),
            );
        }

        content = content.push(
            row![
                button("Take Photo")
                    .on_press(Message::TakePhoto)
                    .padding(10),
                button("Save")
                    .on_press_maybe(self.session.can_save().then_some(Message::Save))
                    .padding(10),
            ]
            .spacing(20),
        );

        content = content.push(text(&self.status).size(16));

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = BrightnessEditor::new()?;

    iced::application(
        "Brightness Editor",
        BrightnessEditor::update,
        BrightnessEditor::view,
    )
    .theme(BrightnessEditor::theme)
    .centered()
    .run_with(move || (app, Task::none()))?;

    Ok(())
}
