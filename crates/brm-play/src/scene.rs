use brm_types::{BgImage, SongInfo, Spotlight, TextBox};

use crate::event::EventId;

/// Text box currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTextBox {
    pub source: EventId,
    pub text: String,
    pub requires_input: bool,
    /// Remaining lock-out before the player may dismiss it.
    pub secs_before_can_input: f64,
}

impl ActiveTextBox {
    pub fn can_dismiss(&self) -> bool {
        self.requires_input && self.secs_before_can_input <= 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisibleImage {
    pub source: EventId,
    pub texture_hash: String,
    pub foreground: bool,
    /// `0.0..=1.0` through the image event.
    pub progress: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveSpotlight {
    pub source: EventId,
    pub shadow: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SongBanner {
    pub source: EventId,
    pub text: String,
    pub static_mode: bool,
    pub progress: f64,
}

/// Presentation state produced by event hooks, read by renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub text_box: Option<ActiveTextBox>,
    pub images: Vec<VisibleImage>,
    pub spotlight: Option<ActiveSpotlight>,
    pub song_banner: Option<SongBanner>,
    /// Tempo reported by the most recent tempo marker.
    pub marker_bpm: Option<f64>,
    /// Volume requested by the most recent volume marker.
    pub music_volume: f32,
    pause_requested: bool,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            text_box: None,
            images: Vec::new(),
            spotlight: None,
            song_banner: None,
            marker_bpm: None,
            music_volume: 1.0,
            pause_requested: false,
        }
    }
}

impl SceneState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn open_text_box(&mut self, source: EventId, text_box: &TextBox) {
        self.text_box = Some(ActiveTextBox {
            source,
            text: text_box.text.clone(),
            requires_input: text_box.requires_input,
            secs_before_can_input: text_box.secs_before_can_input,
        });
        if text_box.requires_input {
            self.pause_requested = true;
        }
    }

    /// Closes the text box if `source` opened it.
    pub fn close_text_box(&mut self, source: EventId) {
        if self.text_box.as_ref().is_some_and(|t| t.source == source) {
            self.text_box = None;
        }
    }

    pub fn show_image(&mut self, source: EventId, image: &BgImage) {
        if self.images.iter().any(|i| i.source == source) {
            return;
        }
        self.images.push(VisibleImage {
            source,
            texture_hash: image.texture_hash.clone(),
            foreground: image.foreground,
            progress: 0.0,
        });
    }

    pub fn hide_image(&mut self, source: EventId) {
        self.images.retain(|i| i.source != source);
    }

    pub fn set_image_progress(&mut self, source: EventId, progress: f64) {
        if let Some(image) = self.images.iter_mut().find(|i| i.source == source) {
            image.progress = progress;
        }
    }

    pub fn background_images(&self) -> impl Iterator<Item = &VisibleImage> {
        self.images.iter().filter(|i| !i.foreground)
    }

    pub fn foreground_images(&self) -> impl Iterator<Item = &VisibleImage> {
        self.images.iter().filter(|i| i.foreground)
    }

    pub fn light_spotlight(&mut self, source: EventId, spotlight: &Spotlight) {
        self.spotlight = Some(ActiveSpotlight {
            source,
            shadow: spotlight.shadow,
        });
    }

    pub fn clear_spotlight(&mut self, source: EventId) {
        if self.spotlight.is_some_and(|s| s.source == source) {
            self.spotlight = None;
        }
    }

    pub fn show_song_banner(&mut self, source: EventId, info: &SongInfo, progress: f64) {
        match &mut self.song_banner {
            Some(banner) if banner.source == source => banner.progress = progress,
            _ => {
                self.song_banner = Some(SongBanner {
                    source,
                    text: info.concatenated(),
                    static_mode: info.static_mode,
                    progress,
                })
            }
        }
    }

    pub fn hide_song_banner(&mut self, source: EventId) {
        if self.song_banner.as_ref().is_some_and(|b| b.source == source) {
            self.song_banner = None;
        }
    }

    /// Takes a pending pause request raised by an input-gated text box.
    pub fn take_pause_request(&mut self) -> bool {
        std::mem::take(&mut self.pause_requested)
    }
}
