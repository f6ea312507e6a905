use clap::Parser;

#[derive(Parser, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// ONNX classifier weights path
    #[arg(long, required = true)]
    pub model: String,

    /// class-index label table (JSON, {"label": index})
    #[arg(long, required = true)]
    pub labels: String,

    /// image to classify
    #[arg(long, required = true)]
    pub image: String,

    /// username credited with the classification
    #[arg(long, required = true)]
    pub user: String,

    /// leaderboard database path
    #[arg(long, default_value_t = String::from("leaderboard.db"))]
    pub db: String,

    /// run inference on CUDA
    #[arg(long, default_value_t = false)]
    pub cuda: bool,

    /// leaderboard rows to print after scoring
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}
