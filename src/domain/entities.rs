pub mod media;
pub mod option_fields;
pub mod project;
pub mod skill;
