mod messages;
mod state;
mod update;
mod view;

pub use state::App;

use crate::config::AppConfig;
use crate::story::Story;
use iced::{Size, Theme, window};

/// Helper to launch the app with the provided story.
pub fn run_app(story: Story, config: AppConfig) -> iced::Result {
    let window_settings = window::Settings {
        size: Size::new(config.window_width, config.window_height),
        ..window::Settings::default()
    };

    let title = story.title.clone();
    iced::application(move |_app: &App| title.clone(), App::update, App::view)
        .window(window_settings)
        .subscription(App::subscription)
        .theme(|_app: &App| Theme::Dark)
        .run_with(move || App::bootstrap(story, config))
}
