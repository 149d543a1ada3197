//! Terminal rendering of the studio view.

use std::path::PathBuf;

use shared::domain::DataUri;
use tracing::{error, info};

use crate::{
    controller::{orchestration::Presenter, state::ViewModel},
    media,
};

/// Writes downloads into `out_dir` and logs each view change once.
pub struct CliShell {
    out_dir: PathBuf,
    saved: Vec<PathBuf>,
    last_view: Option<ViewModel>,
}

impl CliShell {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            saved: Vec::new(),
            last_view: None,
        }
    }

    pub fn saved(&self) -> &[PathBuf] {
        &self.saved
    }
}

impl Presenter for CliShell {
    fn render(&mut self, view: &ViewModel) {
        if self.last_view.as_ref() == Some(view) {
            return;
        }
        match &view.error_message {
            Some(message) => error!(section = view.section.label(), "{message}"),
            None => info!(
                section = view.section.label(),
                color = %view.color_display,
                processed = view.has_processed,
                final_image = view.has_final,
                "view updated"
            ),
        }
        self.last_view = Some(view.clone());
    }

    fn save_file(&mut self, filename: &str, image: &DataUri) -> anyhow::Result<()> {
        let path = media::save_data_uri(&self.out_dir, filename, image)?;
        info!(path = %path.display(), "saved image");
        self.saved.push(path);
        Ok(())
    }

    fn reveal_final(&mut self) {
        info!("final image ready");
    }
}
