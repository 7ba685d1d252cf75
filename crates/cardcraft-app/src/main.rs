//! Main application entry point.

fn main() {
    env_logger::init();
    log::info!("Starting CardCraft");

    let result = cardcraft_app::Args::parse(std::env::args().skip(1)).and_then(cardcraft_app::run);
    match result {
        Ok(scene) => println!("{}", scene),
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
