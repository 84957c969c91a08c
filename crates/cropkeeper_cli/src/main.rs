//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `cropkeeper_core` wiring end
//!   to end: storage bootstrap, a submitted farm, the settle event and the
//!   recomputed stats.
//! - Keep output deterministic for quick local sanity checks.

use cropkeeper_core::db::open_db_in_memory;
use cropkeeper_core::{FarmDraft, FarmStore, SqliteBlobStore, SUBMIT_LATENCY};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("cropkeeper_core version={}", cropkeeper_core::core_version());

    let conn = open_db_in_memory()?;
    let blobs = SqliteBlobStore::try_new(&conn)?;
    let mut store = FarmStore::open(blobs);

    store.submit_farm(FarmDraft {
        farm_name: "Sunrise Valley Farm".to_string(),
        location: "Linn, IA".to_string(),
        size: "10.5".to_string(),
        crop_type: "Corn".to_string(),
        ..FarmDraft::default()
    })?;

    // The host event loop owns the save-latency timer.
    std::thread::sleep(SUBMIT_LATENCY);
    let settled = store.complete_submission();
    println!("settled={}", settled.is_some());

    let stats = store.stats();
    println!(
        "farms={} crops={} tasks={}",
        stats.farms, stats.crops, stats.tasks
    );

    Ok(())
}
