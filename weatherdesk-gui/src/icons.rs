//! Static asset lookup: condition images, UI icons, background, font.
//!
//! Asset failures never fail the app. A missing image renders as an empty
//! region and a missing font falls back to the default font.

use iced::widget::image;
use std::fs;
use std::path::{Path, PathBuf};

const ASSETS_DIR: &str = "weatherdesk-gui/assets";
const UI_FONT_FILE: &str = "fonts/Poppins-Black.ttf";

/// The image shown in the condition area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherIcon {
    Clear,
    Rain,
    Snow,
    Cloudy,
    Error,
}

impl WeatherIcon {
    fn file_name(self) -> &'static str {
        match self {
            WeatherIcon::Clear => "clear.png",
            WeatherIcon::Rain => "rain.png",
            WeatherIcon::Snow => "snow.png",
            WeatherIcon::Cloudy => "cloudy.png",
            WeatherIcon::Error => "error.png",
        }
    }

    pub fn handle(self) -> image::Handle {
        asset_handle(self.file_name())
    }
}

/// Map a condition description to its icon. Case-insensitive substring
/// checks, first match wins, in this order: sunny, rain, snow, cloud.
///
/// Conditions matching none of the keywords ("clear sky", "mist", ...) fall
/// through to the error image even on a successful lookup. That is a known
/// quirk of this mapping table, kept as-is; see DESIGN.md.
pub fn icon_for_condition(condition: &str) -> WeatherIcon {
    let condition = condition.to_lowercase();

    if condition.contains("sunny") {
        WeatherIcon::Clear
    } else if condition.contains("rain") {
        WeatherIcon::Rain
    } else if condition.contains("snow") {
        WeatherIcon::Snow
    } else if condition.contains("cloud") {
        WeatherIcon::Cloudy
    } else {
        WeatherIcon::Error
    }
}

fn asset_path(name: &str) -> PathBuf {
    Path::new(ASSETS_DIR).join(name)
}

pub fn asset_handle(name: &str) -> image::Handle {
    image::Handle::from_path(asset_path(name))
}

pub fn search_icon() -> image::Handle {
    asset_handle("search.png")
}

pub fn humidity_icon() -> image::Handle {
    asset_handle("humidity.png")
}

pub fn windspeed_icon() -> image::Handle {
    asset_handle("windspeed.png")
}

pub fn background() -> image::Handle {
    asset_handle("background.jpg")
}

/// Read the UI font from the assets directory, if present.
pub fn load_ui_font() -> Option<Vec<u8>> {
    fs::read(asset_path(UI_FONT_FILE)).ok()
}
