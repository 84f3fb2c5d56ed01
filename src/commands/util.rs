//! Utility commands (local state cleanup).

use anyhow::Result;

use crate::currency::RateCache;
use crate::favorites::FavoriteCache;
use crate::session::SessionStore;

/// Clear local state: session, favorites cache, and cached rate.
pub fn execute_clean() -> Result<()> {
    match FavoriteCache::new().clear() {
        Ok((count, dir)) => {
            println!(
                "Cleared favorites cache: {} file(s) removed ({})",
                count,
                dir.display()
            );
        }
        Err(e) => {
            eprintln!("Failed to clear favorites cache: {}", e);
        }
    }

    let store = SessionStore::new();
    match store.clear() {
        Ok(true) => println!("Cleared session ({})", store.path().display()),
        Ok(false) => {}
        Err(e) => eprintln!("Failed to clear session: {}", e),
    }

    let rate = RateCache::new();
    match rate.clear() {
        Ok(true) => println!("Cleared cached rate ({})", rate.path().display()),
        Ok(false) => {}
        Err(e) => eprintln!("Failed to clear cached rate: {}", e),
    }

    Ok(())
}
