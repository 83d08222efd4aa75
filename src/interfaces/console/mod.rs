pub mod navigator;
pub mod status_writer;
