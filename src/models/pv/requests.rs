use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/pv.ts")]
pub enum PvFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pv.ts")]
pub struct PvQuery {
    pub academic_year: String,
    pub format: Option<PvFormat>,
}
