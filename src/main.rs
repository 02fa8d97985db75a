//! Dash Progress save inspector
//!
//! Usage: dash-progress <save.bin> [show | reset | grant <coins> <premium> | fill <count>]

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The store is driven by the game on web; nothing to inspect here
}

#[cfg(not(target_arch = "wasm32"))]
fn run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    use dash_progress::{ProgressStore, StoreConfig};

    let Some(path) = args.first() else {
        return Err(
            "usage: dash-progress <save.bin> [show | reset | grant <coins> <premium> | fill <count>]"
                .into(),
        );
    };
    let mut store = ProgressStore::open(&StoreConfig::new(path))?;

    let number = |i: usize| -> Result<u32, Box<dyn std::error::Error>> {
        let raw = args.get(i).ok_or("missing amount")?;
        Ok(raw.parse::<u32>()?)
    };

    match args.get(1).map(String::as_str).unwrap_or("show") {
        "show" => {}
        "reset" => {
            store.reset()?;
            log::info!("Save reset");
        }
        "grant" => store.grant_debug_currency(number(2)?, number(3)?)?,
        "fill" => store.fill_consumables(number(2)?)?,
        other => return Err(format!("unknown command: {other}").into()),
    }

    println!("{}", serde_json::to_string_pretty(store.data())?);
    Ok(())
}
