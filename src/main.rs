use iced::widget::{button, column, container, row, scrollable, text};
use iced::{Alignment, Element, Length, Task, Theme};
use rfd::FileDialog;
use std::path::{Path, PathBuf};
use thumbtile::{Canvas, ImageDescriptor, Invocation, Options, OptionsPatch, Registry, ThumbTile};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

mod ui;

/// Container id of the single gallery in the window
const GALLERY: &str = "gallery";

/// Pixel width the gallery is laid out for
const GALLERY_WIDTH: f64 = 1160.0;

/// Main application state
struct Viewer {
    /// Tile instances keyed by container
    registry: Registry<Canvas>,
    /// Options applied to every new gallery
    options: Options,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked the "Open Folder" button
    OpenFolder,
    /// Background load finished its first render
    GalleryReady(ThumbTile<Canvas>),
    /// User clicked "Refresh" to pick up images that loaded late
    Refresh,
}

impl Viewer {
    fn new() -> (Self, Task<Message>) {
        let options = Options::load_or_default().unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable options file: {}", e);
            Options::default()
        });

        (
            Viewer {
                registry: Registry::new(),
                options,
                status: "Open a folder of images to tile them.".to_string(),
            },
            Task::none(),
        )
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenFolder => {
                let folder = FileDialog::new()
                    .set_title("Select Folder with Images")
                    .pick_folder();

                if let Some(folder_path) = folder {
                    self.status = format!("Loading {}...", folder_path.display());

                    return Task::perform(
                        open_gallery(folder_path, self.options.clone()),
                        Message::GalleryReady,
                    );
                }

                Task::none()
            }
            Message::GalleryReady(tile) => {
                let painted = tile.with_surface(|canvas| canvas.placements().len());
                self.status = format!(
                    "Showing {} of {} images ({} still loading).",
                    painted,
                    tile.items().len(),
                    tile.outstanding()
                );

                self.registry.insert(GALLERY, tile);
                Task::none()
            }
            Message::Refresh => {
                let rendered = self
                    .registry
                    .invoke(GALLERY, || Canvas::new(GALLERY_WIDTH), Invocation::Render);

                if let Some(tile) = rendered {
                    let painted = tile.with_surface(|canvas| canvas.placements().len());
                    self.status = format!("Showing {} of {} images.", painted, tile.items().len());
                }

                Task::none()
            }
        }
    }

    fn view(&self) -> Element<Message> {
        let placements = self
            .registry
            .get(GALLERY)
            .map(|tile| tile.with_surface(|canvas| canvas.placements().to_vec()))
            .unwrap_or_default();

        let toolbar = row![
            button("Open Folder").on_press(Message::OpenFolder).padding(10),
            button("Refresh").on_press(Message::Refresh).padding(10),
            text(&self.status).size(16),
        ]
        .spacing(20)
        .align_y(Alignment::Center);

        let content = column![toolbar, scrollable(ui::gallery::gallery(&placements))]
            .spacing(20)
            .padding(20);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting ThumbTile viewer");

    iced::application("ThumbTile", Viewer::update, Viewer::view)
        .theme(Viewer::theme)
        .window_size((GALLERY_WIDTH as f32 + 60.0, 900.0))
        .centered()
        .run_with(Viewer::new)
}

/// Build a tile instance for every image under `folder_path` and wait for its
/// first render. Runs on the tokio executor so the loader can spawn tasks.
async fn open_gallery(folder_path: PathBuf, options: Options) -> ThumbTile<Canvas> {
    let images = scan_folder(&folder_path);
    tracing::info!("🔍 Found {} images in {}", images.len(), folder_path.display());

    // A broken file must not keep the gallery blank forever.
    let options = OptionsPatch::from(options).count_failures(true);

    let tile = ThumbTile::new(Canvas::new(GALLERY_WIDTH), images, options);
    tile.rendered().await;
    tile
}

/// Collect image files recursively, sorted by path
fn scan_folder(folder_path: &Path) -> Vec<ImageDescriptor> {
    let extensions = ["jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff"];

    let mut paths: Vec<PathBuf> = WalkDir::new(folder_path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .map(|ext| extensions.contains(&ext.to_string_lossy().to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let name = path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            ImageDescriptor::new(path.to_string_lossy()).with_data("title", name)
        })
        .collect()
}
