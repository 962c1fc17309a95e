use anyhow::{Context, Result};
use exam_roster::{logger, App, Config};
use tokio::io::BufReader;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load().context("加载配置失败")?;

    // 初始化日志
    logger::init(&config)?;

    // 初始化并运行应用
    let mut app = App::initialize(config);
    app.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;

    Ok(())
}
