use super::Parser;

#[derive(Parser, Debug)]
#[command(about = "Token issuing and refresh-rotation service")]
pub struct Cli {
    /// Path to a settings TOML file.
    #[arg(long)]
    pub settings: Option<String>,
}
