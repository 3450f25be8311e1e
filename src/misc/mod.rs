mod color_mode;
mod output_format;

pub use color_mode::ColorMode;
pub use output_format::OutputFormat;
