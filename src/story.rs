//! Story manifest loading.
//!
//! A story is a TOML file listing the book's pages in order: an optional
//! media clip (the video stand-in), a caption for the spread art, and an
//! optional mini-game bound to the page. A built-in manifest ships the moon
//! story so the viewer runs with no arguments.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct Story {
    pub title: String,
    #[serde(default)]
    pub pages: Vec<PageSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageSpec {
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub media: Option<MediaSpec>,
    #[serde(default)]
    pub game: Option<GameKind>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaSpec {
    /// Clip length in seconds of media time.
    pub duration: f64,
    #[serde(default)]
    pub looping: bool,
    /// Page whose clip this one leads; the host keeps the pair in sync.
    #[serde(default)]
    pub lead_of: Option<usize>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    Building,
    Control,
}

impl Story {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Index of the page the given game is bound to, if any.
    pub fn game_page(&self, kind: GameKind) -> Option<usize> {
        self.pages.iter().position(|page| page.game == Some(kind))
    }

    fn validate(&self) -> Result<()> {
        if self.pages.is_empty() {
            bail!("story '{}' has no pages", self.title);
        }
        for (index, page) in self.pages.iter().enumerate() {
            if page.game.is_some() && page.media.is_none() {
                bail!("page {index} binds a game but has no media to drive it");
            }
            if let Some(media) = &page.media {
                if media.duration <= 0.0 {
                    bail!("page {index} media has non-positive duration");
                }
                if let Some(target) = media.lead_of {
                    if target == index || target >= self.pages.len() {
                        bail!("page {index} leads out-of-range page {target}");
                    }
                    if self.pages[target].media.is_none() {
                        bail!("page {index} leads page {target}, which has no media");
                    }
                }
            }
        }
        for kind in [GameKind::Building, GameKind::Control] {
            let bound = self
                .pages
                .iter()
                .filter(|page| page.game == Some(kind))
                .count();
            if bound > 1 {
                bail!("{kind:?} game is bound to {bound} pages; at most one is supported");
            }
        }
        Ok(())
    }
}

/// Loads and validates a story manifest.
pub fn load_story(path: &Path) -> Result<Story> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read story manifest {}", path.display()))?;
    let story: Story = toml::from_str(&raw)
        .with_context(|| format!("Failed to parse story manifest {}", path.display()))?;
    story.validate()?;
    info!(title = %story.title, pages = story.pages.len(), "Loaded story manifest");
    Ok(story)
}

/// The built-in moon story: a cover, ambient spreads, the construction site
/// with the building game, a synced hangar pair, the flight spread with the
/// mission-control game, and the landing.
pub fn builtin_story() -> Story {
    fn page(caption: &str) -> PageSpec {
        PageSpec {
            caption: caption.to_string(),
            media: None,
            game: None,
        }
    }
    fn clip(caption: &str, duration: f64, looping: bool) -> PageSpec {
        PageSpec {
            caption: caption.to_string(),
            media: Some(MediaSpec {
                duration,
                looping,
                lead_of: None,
            }),
            game: None,
        }
    }

    let mut pages = vec![
        page("Cover"),
        page("A little fox looks up at the night sky"),
        clip("Fireflies over the meadow", 8.0, true),
        page("The fox decides to build a launch site"),
        clip("The construction site", 40.2, false),
        clip("The rocket grows in the hangar", 12.0, false),
        clip("Hangar doors swing open", 12.0, false),
        page("Countdown at mission control"),
        clip("The flight to the moon", 35.0, false),
        page("Paw prints in the moon dust"),
        clip("The flag waves slowly", 6.0, true),
        page("Back cover"),
    ];
    pages[4].game = Some(GameKind::Building);
    pages[8].game = Some(GameKind::Control);
    if let Some(media) = pages[5].media.as_mut() {
        media.lead_of = Some(6);
    }

    let story = Story {
        title: "The Little Fox Flies to the Moon".to_string(),
        pages,
    };
    debug_assert!(story.validate().is_ok());
    story
}
