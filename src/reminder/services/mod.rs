//! Application services shared by reminder consumers.

mod settings;

pub use settings::get_or_create_settings;
