use serde::Deserialize;

use crate::domain::profile::{NamedProfile, ParallelismProfile};

#[derive(Debug, Deserialize)]
pub struct ProfilesDto {
    pub profiles: Vec<ProfileDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
    pub name: String,
    pub outer_dop: u32,
    pub outer_dop_per_group: u32,
    pub inner_dop: u32,
    pub inner_dop_per_group: u32,
}

impl From<ProfileDto> for NamedProfile {
    fn from(dto: ProfileDto) -> Self {
        NamedProfile {
            name: dto.name,
            profile: ParallelismProfile::new(dto.outer_dop, dto.outer_dop_per_group, dto.inner_dop, dto.inner_dop_per_group),
        }
    }
}
