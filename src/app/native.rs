use std::path::PathBuf;

use eframe::egui;
use log::info;

use crate::{Config, output_file_name};

use super::{Paths, RetouchApp};

#[derive(Debug, thiserror::Error)]
#[error("usage: matte-retouch <original> <matte> [output]")]
pub struct UsageError;

impl Paths {
    /// Without an explicit output, the result lands next to the original as
    /// `no_bg_<stem>.png`.
    pub(crate) fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self, UsageError> {
        let original = PathBuf::from(args.next().ok_or(UsageError)?);
        let matte = PathBuf::from(args.next().ok_or(UsageError)?);
        let output = match args.next() {
            Some(output) => PathBuf::from(output),
            None => {
                let stem = original
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("image");
                original.with_file_name(output_file_name(stem))
            }
        };
        Ok(Self {
            original,
            matte,
            output,
        })
    }
}

pub fn run_native() -> Result<(), eframe::Error> {
    env_logger::init();

    let config =
        Config::load("config.json").map_err(|e| eframe::Error::AppCreation(Box::new(e)))?;
    let paths = Paths::from_args(std::env::args().skip(1))
        .map_err(|e| eframe::Error::AppCreation(Box::new(e)))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(config.viewport),
        ..Default::default()
    };

    info!("Run with config: {config:?}, paths: {paths:?}");
    eframe::run_native(
        "Matte Retouch",
        options,
        Box::new(move |cc| Ok(Box::new(RetouchApp::new(cc, config, paths)))),
    )
}
