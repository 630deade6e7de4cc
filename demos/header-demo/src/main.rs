//! Console rendition of the Bestbook header.
//!
//! Walks one scripted session lifecycle: anonymous, signed in, expired
//! and signed out automatically, signed in again, signed out by hand.
//!
//! `BESTBOOK_CONFIG` points at a JSON config override, `BESTBOOK_API` at
//! the API root. With no API running the server notification fails and is
//! logged; the local sign-out happens regardless.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use bestbook::prelude::*;
use bestbook_token::unix_now;
use tokio::sync::watch;

// ---------------------------------------------------------------------------
// Stand-in sign-in flow
// ---------------------------------------------------------------------------

/// Mints an unsigned token the way the API would shape it.
fn mint(session_id: &str, lifetime_secs: u64) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(
        r#"{{"exp":{},"sessionId":"{session_id}"}}"#,
        unix_now() + lifetime_secs
    ));
    format!("{header}.{payload}.demo")
}

fn reader(session_id: &str, lifetime_secs: u64) -> Result<Session, BestbookError> {
    let profile = Profile {
        username: "reader".into(),
        email: "reader@bestbook.example".into(),
        avatar: None,
    };
    Ok(Session::new(mint(session_id, lifetime_secs), session_id, profile)?)
}

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

fn load_config() -> Result<LifecycleConfig, BestbookError> {
    match std::env::var("BESTBOOK_CONFIG") {
        Ok(path) => {
            tracing::info!(%path, "loading config");
            Ok(LifecycleConfig::from_json_file(path)?)
        }
        // Short interval so the scripted expiry shows up quickly.
        Err(_) => Ok(LifecycleConfig {
            poll_interval: Duration::from_secs(1),
            ..Default::default()
        }),
    }
}

/// Prints the header on every state change until it reaches `until`.
async fn watch_header<S, C, N>(
    header: &HeaderView<S, C, N>,
    mut changes: watch::Receiver<MonitorState>,
    until: MonitorState,
) where
    S: SessionStore,
    C: SignoutClient,
    N: Navigator,
{
    loop {
        println!("  header: {}", header.render());
        if *changes.borrow_and_update() == until {
            return;
        }
        if changes.changed().await.is_err() {
            return;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    bestbook::telemetry::init();

    let base_url =
        std::env::var("BESTBOOK_API").unwrap_or_else(|_| bestbook::DEFAULT_BASE_URL.into());
    let app = BestbookBuilder::new()
        .base_url(&base_url)
        .config(load_config()?)
        .build(|route: &str| println!("  -> navigate {route}"))?;

    let header = HeaderView::mount(&app);
    println!("mounted");
    println!("  header: {}", header.render());

    println!("sign in with a token good for 3s");
    let changes = header.state_changes();
    app.sign_in(reader("demo-1", 3)?);
    watch_header(&header, changes.clone(), MonitorState::Expired).await;
    watch_header(&header, changes, MonitorState::Anonymous).await;

    println!("sign in again, then click sign out");
    app.sign_in(reader("demo-2", 3600)?);
    tokio::time::sleep(Duration::from_millis(50)).await;
    println!("  header: {}", header.render());
    println!("  cart: {} (badge {:?})", header.cart_target(), header.cart_badge(2));

    let outcome = header.sign_out().await;
    println!("  sign out: {outcome:?}");
    println!("  header: {}", header.render());
    println!("  cart: {} (badge {:?})", header.cart_target(), header.cart_badge(2));

    drop(header);
    println!("unmounted");
    Ok(())
}
