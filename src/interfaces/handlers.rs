pub mod home;
pub mod media;
pub mod projects;
pub mod skills;
pub mod system;
