pub mod media;
pub mod projects;
pub mod skills;
