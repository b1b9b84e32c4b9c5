pub mod job_graph_dto;
pub mod profile_dto;
