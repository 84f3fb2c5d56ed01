//! Account commands - record the signed-in user.
//!
//! Authentication itself happens elsewhere; these commands only record
//! the `{ id, isGuest }` pair the account backend hands back.

use anyhow::Result;
use colored::Colorize;

use crate::session::{SessionStore, UserSession};

/// Execute the login command.
pub fn execute_login(store: &SessionStore, user_id: i64, guest: bool) -> Result<()> {
    let mut session = store.load();
    session.user = Some(UserSession {
        id: user_id,
        is_guest: guest,
    });
    store.save(&session)?;

    if guest {
        println!(
            "{} Signed in as guest (favorites stay disabled)",
            "✓".green().bold()
        );
    } else {
        println!("{} Signed in as user {}", "✓".green().bold(), user_id);
    }

    Ok(())
}

/// Execute the logout command.
pub fn execute_logout(store: &SessionStore) -> Result<()> {
    let mut session = store.load();
    session.user = None;
    store.save(&session)?;

    println!("{} Signed out", "✓".green().bold());
    Ok(())
}
