#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct GraphArgs {
    /// Graph width in px
    #[cfg_attr(feature = "clap", arg(long, default_value_t = 1600.0))]
    pub width: f32,

    /// Graph height in px
    #[cfg_attr(feature = "clap", arg(long, default_value_t = 1000.0))]
    pub height: f32,

    // Font size
    #[cfg_attr(feature = "clap", arg(long, default_value_t = 24.0))]
    pub font_size: f32,

    // Line stroke width
    #[cfg_attr(feature = "clap", arg(long, default_value_t = 2))]
    pub stroke_width: u32,

    // Font color
    #[cfg_attr(feature = "clap", arg(long, default_value_t = String::from("black")))]
    pub color: String,

    // Background color
    #[cfg_attr(feature = "clap", arg(long, default_value_t = String::from("white")))]
    pub background_color: String,
}

impl Default for GraphArgs {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 1000.0,
            font_size: 24.0,
            stroke_width: 2,
            color: String::from("black"),
            background_color: String::from("white"),
        }
    }
}
