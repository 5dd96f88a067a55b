#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    let cfg = portfolio_fx::config::Config::parse();
    cfg.validate()?;
    portfolio_fx::logging::init(cfg.log_file.as_deref())?;

    portfolio_fx::app::run(cfg)
}

// The browser build is a library loaded by the page; see `portfolio_fx::web`.
#[cfg(target_arch = "wasm32")]
fn main() {}
