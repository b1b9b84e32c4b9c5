pub mod constraint;
pub mod edge;
pub mod profile;
pub mod stage;
pub mod task;
pub mod topology;
