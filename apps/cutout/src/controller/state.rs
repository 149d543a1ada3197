//! Session state owned by the UI loop.

use shared::domain::{DataUri, HexColor};

use crate::controller::events::UiError;

/// The four mutually exclusive view sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Upload,
    Processing,
    Result,
    Error,
}

impl Section {
    pub fn label(self) -> &'static str {
        match self {
            Section::Upload => "upload",
            Section::Processing => "processing",
            Section::Result => "result",
            Section::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundTab {
    #[default]
    Color,
    Image,
}

impl BackgroundTab {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "color" => Some(BackgroundTab::Color),
            "image" => Some(BackgroundTab::Image),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundSelection {
    SolidColor(HexColor),
    Image(DataUri),
}

/// Two-tab background chooser. The color value always exists; the image only
/// once one has been picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackgroundChooser {
    pub tab: BackgroundTab,
    pub color: HexColor,
    pub image: Option<DataUri>,
}

/// Generation tag attached to every backend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestToken(pub u64);

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub original: Option<DataUri>,
    pub processed: Option<DataUri>,
    pub background: BackgroundChooser,
    pub final_image: Option<DataUri>,
    pub section: Section,
    pub error: Option<UiError>,
    pub drag_over: bool,
    pub final_panel_visible: bool,
    pub background_preview_visible: bool,
    /// File inputs show a selection until reset clears them.
    pub upload_input: Option<String>,
    pub background_input: Option<String>,
    generation: RequestToken,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_token(&self) -> RequestToken {
        self.generation
    }

    /// Start a new generation; completions carrying older tokens are stale.
    pub(crate) fn issue_token(&mut self) -> RequestToken {
        self.generation = RequestToken(self.generation.0 + 1);
        self.generation
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token == self.generation
    }

    pub fn color_display(&self) -> String {
        self.background.color.to_string()
    }

    pub fn view(&self) -> ViewModel {
        ViewModel {
            section: self.section,
            error_message: self.error.as_ref().map(|e| e.message().to_string()),
            color_display: self.color_display(),
            active_tab: self.background.tab,
            drag_over: self.drag_over,
            final_panel_visible: self.final_panel_visible,
            background_preview_visible: self.background_preview_visible,
            has_original: self.original.is_some(),
            has_processed: self.processed.is_some(),
            has_final: self.final_image.is_some(),
        }
    }
}

/// Snapshot rendered by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    pub section: Section,
    pub error_message: Option<String>,
    pub color_display: String,
    pub active_tab: BackgroundTab,
    pub drag_over: bool,
    pub final_panel_visible: bool,
    pub background_preview_visible: bool,
    pub has_original: bool,
    pub has_processed: bool,
    pub has_final: bool,
}

impl ViewModel {
    pub fn section_visible(&self, section: Section) -> bool {
        self.section == section
    }

    pub fn tab_panel_visible(&self, tab: BackgroundTab) -> bool {
        self.active_tab == tab
    }
}

/// Fixed download names.
pub const FINAL_IMAGE_FILENAME: &str = "final-image.png";
pub const TRANSPARENT_IMAGE_FILENAME: &str = "transparent-background.png";
