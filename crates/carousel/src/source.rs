use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFormat {
    Csv,
    Json,
}

impl DataFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            DataFormat::Csv => "csv",
            DataFormat::Json => "json",
        }
    }
}

/// A bundled store list the deck can show.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    #[default]
    #[strum(to_string = "information", serialize = "csv")]
    Information,
    #[strum(to_string = "back_door", serialize = "backdoor", serialize = "後門")]
    BackDoor,
    #[strum(to_string = "supper_street", serialize = "supper", serialize = "宵夜街")]
    SupperStreet,
}

impl DataSource {
    pub fn resource(&self) -> &'static str {
        match self {
            DataSource::Information => "information",
            DataSource::BackDoor => "back_door",
            DataSource::SupperStreet => "supper_street",
        }
    }

    pub fn format(&self) -> DataFormat {
        match self {
            DataSource::Information => DataFormat::Csv,
            DataSource::BackDoor | DataSource::SupperStreet => DataFormat::Json,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.resource(), self.format().extension())
    }

    pub fn location(&self) -> Option<&'static str> {
        match self {
            DataSource::Information => None,
            DataSource::BackDoor => Some("後門"),
            DataSource::SupperStreet => Some("宵夜街"),
        }
    }

    pub fn map(&self) -> Option<MapOverlay> {
        match self {
            DataSource::Information => None,
            DataSource::BackDoor => Some(MapOverlay {
                title: "後門地圖",
                image: "back_door_map",
            }),
            DataSource::SupperStreet => Some(MapOverlay {
                title: "宵夜街地圖",
                image: "supper_street_map",
            }),
        }
    }
}

/// Map of the area a location-based source covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapOverlay {
    pub title: &'static str,
    pub image: &'static str,
}
